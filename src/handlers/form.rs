//! Multipart decoding for restaurant writes.
//!
//! Nested values use bracketed keys: `cuisines[0]`, `menuItems[1][price]`,
//! `review[0][rating]`. Indexed entries are ordered by index, not by arrival.

use axum::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use axum::http::StatusCode;
use std::collections::BTreeMap;

use crate::error::ApiError;
use crate::services::{MenuItemInput, RestaurantForm, ReviewInput};
use crate::upload::ImageUpload;

pub const IMAGE_FIELD: &str = "imageFile";

#[derive(Debug, Clone, PartialEq)]
enum FormKey {
    RestaurantName,
    City,
    Country,
    Description,
    Cuisine(Option<usize>),
    MenuItem(usize, EntryField),
    Review(usize, EntryField),
    Image,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum EntryField {
    Id,
    Name,
    Price,
    Rating,
    About,
}

fn parse_key(name: &str) -> FormKey {
    match name {
        "restaurantName" => return FormKey::RestaurantName,
        "city" => return FormKey::City,
        "country" => return FormKey::Country,
        "description" => return FormKey::Description,
        "cuisines" | "cuisines[]" => return FormKey::Cuisine(None),
        IMAGE_FIELD => return FormKey::Image,
        _ => {}
    }

    let Some((base, rest)) = name.split_once('[') else {
        return FormKey::Unknown;
    };
    let segments: Vec<&str> = rest
        .trim_end_matches(']')
        .split("][")
        .collect();
    let index = match segments.first().map(|s| s.parse::<usize>()) {
        Some(Ok(index)) => index,
        _ => return FormKey::Unknown,
    };

    match (base, &segments[1..]) {
        ("cuisines", []) => FormKey::Cuisine(Some(index)),
        ("menuItems", [field]) => match *field {
            "_id" => FormKey::MenuItem(index, EntryField::Id),
            "name" => FormKey::MenuItem(index, EntryField::Name),
            "price" => FormKey::MenuItem(index, EntryField::Price),
            _ => FormKey::Unknown,
        },
        ("review", [field]) => match *field {
            "_id" => FormKey::Review(index, EntryField::Id),
            "name" => FormKey::Review(index, EntryField::Name),
            "rating" => FormKey::Review(index, EntryField::Rating),
            "about" => FormKey::Review(index, EntryField::About),
            _ => FormKey::Unknown,
        },
        _ => FormKey::Unknown,
    }
}

/// Accumulates text parts until the multipart stream ends.
#[derive(Debug, Default)]
struct FormBuilder {
    form: RestaurantForm,
    indexed_cuisines: BTreeMap<usize, String>,
    appended_cuisines: Vec<String>,
    menu_items: BTreeMap<usize, MenuItemInput>,
    reviews: BTreeMap<usize, ReviewInput>,
}

impl FormBuilder {
    fn push(&mut self, name: &str, value: String) {
        match parse_key(name) {
            FormKey::RestaurantName => self.form.restaurant_name = Some(value),
            FormKey::City => self.form.city = Some(value),
            FormKey::Country => self.form.country = Some(value),
            FormKey::Description => self.form.description = Some(value),
            FormKey::Cuisine(Some(index)) => {
                self.indexed_cuisines.insert(index, value);
            }
            FormKey::Cuisine(None) => self.appended_cuisines.push(value),
            FormKey::MenuItem(index, field) => {
                let item = self.menu_items.entry(index).or_default();
                match field {
                    EntryField::Id => item.id = Some(value),
                    EntryField::Name => item.name = Some(value),
                    EntryField::Price => item.price = Some(value),
                    EntryField::Rating | EntryField::About => {}
                }
            }
            FormKey::Review(index, field) => {
                let review = self.reviews.entry(index).or_default();
                match field {
                    EntryField::Id => review.id = Some(value),
                    EntryField::Name => review.name = Some(value),
                    EntryField::Rating => review.rating = Some(value),
                    EntryField::About => review.about = Some(value),
                    EntryField::Price => {}
                }
            }
            FormKey::Image | FormKey::Unknown => {
                tracing::debug!(field = %name, "Ignoring form field");
            }
        }
    }

    fn finish(self) -> RestaurantForm {
        let mut form = self.form;

        if !self.indexed_cuisines.is_empty() || !self.appended_cuisines.is_empty() {
            let mut cuisines: Vec<String> = self.indexed_cuisines.into_values().collect();
            cuisines.extend(self.appended_cuisines);
            form.cuisines = Some(cuisines);
        }
        if !self.menu_items.is_empty() {
            form.menu_items = Some(self.menu_items.into_values().collect());
        }
        if !self.reviews.is_empty() {
            form.review = Some(self.reviews.into_values().collect());
        }

        form
    }
}

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::payload_too_large(err.body_text())
    } else {
        ApiError::bad_request(format!("Invalid multipart body: {}", err.body_text()))
    }
}

/// Decode a restaurant multipart body into the optional image and raw form fields.
pub async fn read_restaurant_form(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(Option<ImageUpload>, RestaurantForm), ApiError> {
    let mut multipart = multipart.map_err(|rejection| {
        ApiError::bad_request(format!("Expected multipart/form-data: {}", rejection.body_text()))
    })?;

    let mut builder = FormBuilder::default();
    let mut image = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();

        if name == IMAGE_FIELD {
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let file_name = field.file_name().map(str::to_string);
            let bytes = field.bytes().await.map_err(multipart_error)?;

            // Browsers send an empty unnamed part when no file was picked
            if bytes.is_empty() && file_name.as_deref().map_or(true, str::is_empty) {
                continue;
            }
            if image.is_some() {
                tracing::debug!("Ignoring additional image part");
                continue;
            }

            let mut upload = ImageUpload::new(bytes.to_vec(), content_type);
            if let Some(file_name) = file_name.filter(|n| !n.is_empty()) {
                upload = upload.with_file_name(file_name);
            }
            image = Some(upload);
        } else {
            let value = field.text().await.map_err(multipart_error)?;
            builder.push(&name, value);
        }
    }

    Ok((image, builder.finish()))
}
