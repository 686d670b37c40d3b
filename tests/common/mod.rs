#![allow(dead_code)]

use anyhow::{Context, Result};
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use restro_api::auth::TokenKeys;
use restro_api::config::AppConfig;
use restro_api::database::{MemoryAdminRepository, MemoryRestaurantRepository};
use restro_api::state::AppState;
use restro_api::upload::MemoryBlobStore;

pub const SECRET: &str = "integration-test-secret";
pub const BOUNDARY: &str = "----restro-test-boundary";

/// Router over in-memory stores, plus handles for inspecting them
pub struct TestApp {
    pub router: Router,
    pub restaurants: Arc<MemoryRestaurantRepository>,
    pub blobs: Arc<MemoryBlobStore>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestApp {
    pub fn new() -> Self {
        let config = AppConfig::development();
        let restaurants = Arc::new(MemoryRestaurantRepository::new());
        let blobs = Arc::new(MemoryBlobStore::new("http://localhost:7000/blobs"));
        let tokens = TokenKeys::new(SECRET, 1).expect("token keys");

        let state = AppState::new(
            restaurants.clone(),
            Arc::new(MemoryAdminRepository::new()),
            blobs.clone(),
            tokens,
            &config,
        );

        Self {
            router: restro_api::app(state, &config),
            restaurants,
            blobs,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Result<TestResponse> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .with_context(|| format!("non-JSON body: {}", String::from_utf8_lossy(&bytes)))?
        };
        Ok(TestResponse { status, body })
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Result<TestResponse> {
        let mut builder = Request::builder().method(Method::GET).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        self.send(builder.body(Body::empty())?).await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> Result<TestResponse> {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))?;
        self.send(request).await
    }

    pub async fn multipart(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        form: &MultipartBody,
    ) -> Result<TestResponse> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            );
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        self.send(builder.body(Body::from(form.build()))?).await
    }

    /// Sign up a fresh admin and return its bearer token
    pub async fn signup(&self, email: &str) -> Result<String> {
        let res = self
            .post_json(
                "/api/my/admin/signup",
                json!({ "email": email, "password": "password123" }),
            )
            .await?;
        anyhow::ensure!(res.status == StatusCode::CREATED, "signup failed: {}", res.body);
        res.body["data"]["token"]
            .as_str()
            .map(str::to_string)
            .context("signup response missing token")
    }

    /// Create a restaurant for `token` with the standard form
    pub async fn create_restaurant(&self, token: &str, city: &str) -> Result<TestResponse> {
        let form = restaurant_form(city).file("imageFile", "bistro.jpg", "image/jpeg", vec![0xFF, 0xD8, 0xFF, 0xE0]);
        self.multipart(Method::POST, "/api/my/restro/manage", Some(token), &form)
            .await
    }
}

/// Hand-built multipart/form-data body
#[derive(Default)]
pub struct MultipartBody {
    parts: Vec<Part>,
}

enum Part {
    Text { name: String, value: String },
    File { name: String, file_name: String, content_type: String, bytes: Vec<u8> },
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.parts.push(Part::Text {
            name: name.to_string(),
            value: value.to_string(),
        });
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, bytes: Vec<u8>) -> Self {
        self.parts.push(Part::File {
            name: name.to_string(),
            file_name: file_name.to_string(),
            content_type: content_type.to_string(),
            bytes,
        });
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut body = Vec::new();
        for part in &self.parts {
            body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
            match part {
                Part::Text { name, value } => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                    );
                    body.extend_from_slice(value.as_bytes());
                }
                Part::File { name, file_name, content_type, bytes } => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                            name, file_name, content_type
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(bytes);
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        body
    }
}

/// Complete create form without the image part
pub fn restaurant_form(city: &str) -> MultipartBody {
    MultipartBody::new()
        .text("restaurantName", "The Gourmet Bistro")
        .text("city", city)
        .text("country", "USA")
        .text("description", "A cozy bistro serving classic dishes")
        .text("cuisines[0]", "Italian")
        .text("cuisines[1]", "French")
        .text("menuItems[0][name]", "Spaghetti Carbonara")
        .text("menuItems[0][price]", "12.99")
        .text("menuItems[1][name]", "Beef Wellington")
        .text("menuItems[1][price]", "24.99")
}
