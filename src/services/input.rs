// Restaurant write payloads: raw form values in, typed fields out.
//
// Create requires every field; update validates only what was supplied.

use rust_decimal::Decimal;
use std::collections::HashSet;
use std::str::FromStr;
use uuid::Uuid;

use crate::database::models::{MenuItem, Review};
use crate::error::FieldErrors;

/// Raw restaurant fields as submitted by the client. `None` means "not sent".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestaurantForm {
    pub restaurant_name: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub description: Option<String>,
    pub cuisines: Option<Vec<String>>,
    pub menu_items: Option<Vec<MenuItemInput>>,
    pub review: Option<Vec<ReviewInput>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MenuItemInput {
    pub id: Option<String>,
    pub name: Option<String>,
    pub price: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewInput {
    pub id: Option<String>,
    pub name: Option<String>,
    pub rating: Option<String>,
    pub about: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Create,
    Update,
}

/// Typed fields that passed validation. In `Mode::Create` every field
/// except `review` is `Some`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidForm {
    pub restaurant_name: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub description: Option<String>,
    pub cuisines: Option<Vec<String>>,
    pub menu_items: Option<Vec<MenuItemDraft>>,
    pub review: Option<Vec<ReviewDraft>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MenuItemDraft {
    pub requested_id: Option<Uuid>,
    pub name: String,
    pub price: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReviewDraft {
    pub requested_id: Option<Uuid>,
    pub name: String,
    pub rating: u8,
    pub about: String,
}

impl RestaurantForm {
    pub fn validate(self, mode: Mode) -> Result<ValidForm, FieldErrors> {
        let mut errors = FieldErrors::new();

        let valid = ValidForm {
            restaurant_name: text("restaurantName", self.restaurant_name, mode, &mut errors),
            city: text("city", self.city, mode, &mut errors),
            country: text("country", self.country, mode, &mut errors),
            description: text("description", self.description, mode, &mut errors),
            cuisines: cuisines(self.cuisines, mode, &mut errors),
            menu_items: menu_items(self.menu_items, mode, &mut errors),
            review: self.review.map(|entries| reviews(entries, &mut errors)),
        };

        if errors.is_empty() {
            Ok(valid)
        } else {
            Err(errors)
        }
    }
}

fn required(field: &str, mode: Mode, errors: &mut FieldErrors) {
    if mode == Mode::Create {
        errors.insert(field.to_string(), format!("{} is required", field));
    }
}

fn text(field: &str, value: Option<String>, mode: Mode, errors: &mut FieldErrors) -> Option<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Some(v),
        Some(_) => {
            errors.insert(field.to_string(), format!("{} must not be empty", field));
            None
        }
        None => {
            required(field, mode, errors);
            None
        }
    }
}

fn cuisines(value: Option<Vec<String>>, mode: Mode, errors: &mut FieldErrors) -> Option<Vec<String>> {
    let Some(entries) = value else {
        required("cuisines", mode, errors);
        return None;
    };
    if entries.is_empty() {
        errors.insert("cuisines".to_string(), "at least one cuisine is required".to_string());
        return None;
    }

    let mut out = Vec::with_capacity(entries.len());
    for (i, entry) in entries.into_iter().enumerate() {
        let entry = entry.trim().to_string();
        if entry.is_empty() {
            errors.insert(format!("cuisines[{}]", i), "cuisine must not be empty".to_string());
        } else {
            out.push(entry);
        }
    }
    Some(out)
}

fn menu_items(
    value: Option<Vec<MenuItemInput>>,
    mode: Mode,
    errors: &mut FieldErrors,
) -> Option<Vec<MenuItemDraft>> {
    let Some(entries) = value else {
        required("menuItems", mode, errors);
        return None;
    };
    if entries.is_empty() {
        errors.insert("menuItems".to_string(), "at least one menu item is required".to_string());
        return None;
    }

    let mut out = Vec::with_capacity(entries.len());
    for (i, entry) in entries.into_iter().enumerate() {
        let name = entry.name.map(|n| n.trim().to_string()).unwrap_or_default();
        if name.is_empty() {
            errors.insert(format!("menuItems[{}].name", i), "name is required".to_string());
        }

        let price_field = format!("menuItems[{}].price", i);
        let price = match entry.price.as_deref().map(str::trim) {
            None | Some("") => {
                errors.insert(price_field, "price is required".to_string());
                None
            }
            Some(raw) => match Decimal::from_str(raw) {
                Ok(p) if p.is_sign_negative() && !p.is_zero() => {
                    errors.insert(price_field, "price must not be negative".to_string());
                    None
                }
                Ok(p) => Some(p),
                Err(_) => {
                    errors.insert(price_field, format!("'{}' is not a valid price", raw));
                    None
                }
            },
        };

        if let (false, Some(price)) = (name.is_empty(), price) {
            out.push(MenuItemDraft {
                requested_id: entry.id.as_deref().and_then(|id| Uuid::parse_str(id.trim()).ok()),
                name,
                price,
            });
        }
    }
    Some(out)
}

fn reviews(entries: Vec<ReviewInput>, errors: &mut FieldErrors) -> Vec<ReviewDraft> {
    let mut out = Vec::with_capacity(entries.len());
    for (i, entry) in entries.into_iter().enumerate() {
        let name = entry.name.map(|n| n.trim().to_string()).unwrap_or_default();
        if name.is_empty() {
            errors.insert(format!("review[{}].name", i), "name is required".to_string());
        }

        let rating_field = format!("review[{}].rating", i);
        let rating = match entry.rating.as_deref().map(str::trim).map(str::parse::<i64>) {
            None => {
                errors.insert(rating_field, "rating is required".to_string());
                None
            }
            Some(Ok(r)) if (1..=5).contains(&r) => Some(r as u8),
            Some(_) => {
                errors.insert(rating_field, "rating must be an integer between 1 and 5".to_string());
                None
            }
        };

        if let (false, Some(rating)) = (name.is_empty(), rating) {
            out.push(ReviewDraft {
                requested_id: entry.id.as_deref().and_then(|id| Uuid::parse_str(id.trim()).ok()),
                name,
                rating,
                about: entry.about.map(|a| a.trim().to_string()).unwrap_or_default(),
            });
        }
    }
    out
}

/// Keep a requested id only when it names an existing entry not already
/// claimed in this batch; everything else gets a fresh id.
fn resolve_id(requested: Option<Uuid>, existing: &HashSet<Uuid>, claimed: &mut HashSet<Uuid>) -> Uuid {
    match requested {
        Some(id) if existing.contains(&id) && claimed.insert(id) => id,
        _ => {
            let id = Uuid::new_v4();
            claimed.insert(id);
            id
        }
    }
}

pub fn assign_menu_ids(drafts: Vec<MenuItemDraft>, existing: &[MenuItem]) -> Vec<MenuItem> {
    let known: HashSet<Uuid> = existing.iter().map(|m| m.id).collect();
    let mut claimed = HashSet::new();
    drafts
        .into_iter()
        .map(|d| MenuItem {
            id: resolve_id(d.requested_id, &known, &mut claimed),
            name: d.name,
            price: d.price,
        })
        .collect()
}

pub fn assign_review_ids(drafts: Vec<ReviewDraft>, existing: &[Review]) -> Vec<Review> {
    let known: HashSet<Uuid> = existing.iter().map(|r| r.id).collect();
    let mut claimed = HashSet::new();
    drafts
        .into_iter()
        .map(|d| Review {
            id: resolve_id(d.requested_id, &known, &mut claimed),
            name: d.name,
            rating: d.rating,
            about: d.about,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, price: &str) -> MenuItemInput {
        MenuItemInput {
            id: None,
            name: Some(name.to_string()),
            price: Some(price.to_string()),
        }
    }

    fn complete() -> RestaurantForm {
        RestaurantForm {
            restaurant_name: Some(" Bistro ".to_string()),
            city: Some("Lyon".to_string()),
            country: Some("France".to_string()),
            description: Some("Bouchon".to_string()),
            cuisines: Some(vec!["French".to_string()]),
            menu_items: Some(vec![item("Quenelle", "14.50")]),
            review: None,
        }
    }

    #[test]
    fn create_requires_every_field() {
        let errors = RestaurantForm::default().validate(Mode::Create).unwrap_err();
        for field in ["restaurantName", "city", "country", "description", "cuisines", "menuItems"] {
            assert!(errors.contains_key(field), "missing error for {}", field);
        }
        assert!(!errors.contains_key("review"));
    }

    #[test]
    fn update_accepts_empty_form() {
        let valid = RestaurantForm::default().validate(Mode::Update).unwrap();
        assert_eq!(valid, ValidForm::default());
    }

    #[test]
    fn values_are_trimmed() {
        let valid = complete().validate(Mode::Create).unwrap();
        assert_eq!(valid.restaurant_name.as_deref(), Some("Bistro"));
        assert_eq!(valid.menu_items.unwrap()[0].price, Decimal::new(1450, 2));
    }

    #[test]
    fn blank_supplied_field_is_rejected_on_update() {
        let form = RestaurantForm {
            city: Some("   ".to_string()),
            ..Default::default()
        };
        let errors = form.validate(Mode::Update).unwrap_err();
        assert_eq!(errors.get("city").map(String::as_str), Some("city must not be empty"));
    }

    #[test]
    fn negative_and_malformed_prices_are_rejected() {
        let form = RestaurantForm {
            menu_items: Some(vec![item("a", "-1"), item("b", "abc"), item("c", "0")]),
            ..Default::default()
        };
        let errors = form.validate(Mode::Update).unwrap_err();
        assert!(errors.contains_key("menuItems[0].price"));
        assert!(errors.contains_key("menuItems[1].price"));
        assert!(!errors.contains_key("menuItems[2].price"));
    }

    #[test]
    fn ratings_outside_one_to_five_are_rejected() {
        let review = |rating: &str| ReviewInput {
            name: Some("Jane".to_string()),
            rating: Some(rating.to_string()),
            ..Default::default()
        };
        let form = RestaurantForm {
            review: Some(vec![review("0"), review("6"), review("4.5"), review("5")]),
            ..Default::default()
        };
        let errors = form.validate(Mode::Update).unwrap_err();
        assert!(errors.contains_key("review[0].rating"));
        assert!(errors.contains_key("review[1].rating"));
        assert!(errors.contains_key("review[2].rating"));
        assert!(!errors.contains_key("review[3].rating"));
    }

    #[test]
    fn existing_ids_are_kept_and_unknown_ids_replaced() {
        let existing = vec![MenuItem {
            id: Uuid::new_v4(),
            name: "Old".to_string(),
            price: Decimal::ONE,
        }];
        let stranger = Uuid::new_v4();
        let drafts = vec![
            MenuItemDraft { requested_id: Some(existing[0].id), name: "Kept".into(), price: Decimal::ONE },
            MenuItemDraft { requested_id: Some(existing[0].id), name: "Dup".into(), price: Decimal::ONE },
            MenuItemDraft { requested_id: Some(stranger), name: "New".into(), price: Decimal::ONE },
        ];

        let items = assign_menu_ids(drafts, &existing);
        assert_eq!(items[0].id, existing[0].id);
        assert_ne!(items[1].id, existing[0].id);
        assert_ne!(items[2].id, stranger);
        let unique: HashSet<Uuid> = items.iter().map(|i| i.id).collect();
        assert_eq!(unique.len(), 3);
    }
}
