mod common;

use anyhow::Result;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};

use common::{restaurant_form, MultipartBody, TestApp};

const MANAGE: &str = "/api/my/restro/manage";

#[tokio::test]
async fn create_returns_created_document() -> Result<()> {
    let app = TestApp::new();
    let token = app.signup("owner@example.com").await?;

    let res = app.create_restaurant(&token, "New York").await?;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["success"], true);

    let data = &res.body["data"];
    assert!(data["_id"].is_string());
    assert!(data["user"].is_string());
    assert_eq!(data["restaurantName"], "The Gourmet Bistro");
    assert_eq!(data["city"], "New York");
    assert_eq!(data["cuisines"], serde_json::json!(["Italian", "French"]));
    assert_eq!(data["menuItems"][0]["name"], "Spaghetti Carbonara");
    assert_eq!(data["menuItems"][0]["price"], 12.99);
    assert!(data["menuItems"][0]["_id"].is_string());
    assert_eq!(data["review"], serde_json::json!([]));
    let image_url = data["imageUrl"].as_str().unwrap();
    assert!(image_url.starts_with("http://localhost:7000/blobs/"));
    let blob = app.blobs.get(image_url).await.expect("image stored");
    assert_eq!(blob.content_type, "image/jpeg");
    assert!(data["lastUpdated"].is_string());

    let fetched = app.get(MANAGE, Some(&token)).await?;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["data"], res.body["data"]);
    Ok(())
}

#[tokio::test]
async fn second_create_for_same_owner_conflicts() -> Result<()> {
    let app = TestApp::new();
    let token = app.signup("owner@example.com").await?;
    app.create_restaurant(&token, "New York").await?;

    let res = app.create_restaurant(&token, "Boston").await?;
    assert_eq!(res.status, StatusCode::CONFLICT);
    assert_eq!(res.body["code"], "CONFLICT");
    assert_eq!(app.restaurants.len().await, 1);
    Ok(())
}

#[tokio::test]
async fn repeat_create_with_empty_form_conflicts() -> Result<()> {
    let app = TestApp::new();
    let token = app.signup("owner@example.com").await?;
    app.create_restaurant(&token, "New York").await?;

    let res = app
        .multipart(Method::POST, MANAGE, Some(&token), &MultipartBody::new())
        .await?;
    assert_eq!(res.status, StatusCode::CONFLICT);
    assert_eq!(res.body["code"], "CONFLICT");
    assert_eq!(app.restaurants.len().await, 1);
    Ok(())
}

#[tokio::test]
async fn create_without_image_names_the_field() -> Result<()> {
    let app = TestApp::new();
    let token = app.signup("owner@example.com").await?;

    let res = app
        .multipart(Method::POST, MANAGE, Some(&token), &restaurant_form("Paris"))
        .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.body["field_errors"]["imageFile"].is_string());
    assert!(app.restaurants.is_empty().await);
    Ok(())
}

#[tokio::test]
async fn incomplete_create_lists_missing_fields() -> Result<()> {
    let app = TestApp::new();
    let token = app.signup("owner@example.com").await?;

    let form = MultipartBody::new()
        .text("restaurantName", "Half done")
        .text("menuItems[0][name]", "Soup")
        .text("menuItems[0][price]", "-3")
        .file("imageFile", "a.png", "image/png", vec![1, 2, 3]);
    let res = app.multipart(Method::POST, MANAGE, Some(&token), &form).await?;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    let fields = &res.body["field_errors"];
    assert!(fields["city"].is_string());
    assert!(fields["country"].is_string());
    assert!(fields["cuisines"].is_string());
    assert!(fields["menuItems[0].price"].is_string());
    assert_eq!(app.blobs.count().await, 0);
    Ok(())
}

#[tokio::test]
async fn six_mebibyte_image_is_rejected() -> Result<()> {
    let app = TestApp::new();
    let token = app.signup("owner@example.com").await?;

    let form = restaurant_form("New York").file("imageFile", "big.jpg", "image/jpeg", vec![0; 6 * 1024 * 1024]);
    let res = app.multipart(Method::POST, MANAGE, Some(&token), &form).await?;

    assert_eq!(res.status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(res.body["code"], "PAYLOAD_TOO_LARGE");
    assert!(app.restaurants.is_empty().await);
    assert_eq!(app.blobs.count().await, 0);
    Ok(())
}

#[tokio::test]
async fn body_over_request_limit_is_payload_too_large() -> Result<()> {
    let app = TestApp::new();
    let token = app.signup("owner@example.com").await?;

    let form = restaurant_form("New York").file("imageFile", "huge.jpg", "image/jpeg", vec![0; 11 * 1024 * 1024]);
    let res = app.multipart(Method::POST, MANAGE, Some(&token), &form).await?;

    assert_eq!(res.status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(app.restaurants.is_empty().await);
    Ok(())
}

#[tokio::test]
async fn non_image_upload_is_unsupported_media_type() -> Result<()> {
    let app = TestApp::new();
    let token = app.signup("owner@example.com").await?;

    let form = restaurant_form("New York").file("imageFile", "menu.pdf", "application/pdf", b"%PDF-1.7".to_vec());
    let res = app.multipart(Method::POST, MANAGE, Some(&token), &form).await?;

    assert_eq!(res.status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(app.restaurants.is_empty().await);
    Ok(())
}

#[tokio::test]
async fn unreachable_blob_store_is_service_unavailable() -> Result<()> {
    let app = TestApp::new();
    let token = app.signup("owner@example.com").await?;
    app.blobs.set_offline(true);

    let res = app.create_restaurant(&token, "New York").await?;
    assert_eq!(res.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(res.body["code"], "UPSTREAM_UNAVAILABLE");
    assert!(app.restaurants.is_empty().await);
    Ok(())
}

#[tokio::test]
async fn non_multipart_body_is_bad_request() -> Result<()> {
    let app = TestApp::new();
    let token = app.signup("owner@example.com").await?;

    let request = Request::builder()
        .method(Method::POST)
        .uri(MANAGE)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"city":"Paris"}"#))?;
    let res = app.send(request).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn partial_update_changes_only_supplied_fields() -> Result<()> {
    let app = TestApp::new();
    let token = app.signup("owner@example.com").await?;
    let created = app.create_restaurant(&token, "New York").await?.body["data"].clone();

    let form = MultipartBody::new().text("city", "Paris");
    let res = app.multipart(Method::PUT, MANAGE, Some(&token), &form).await?;
    assert_eq!(res.status, StatusCode::OK);

    let updated = &res.body["data"];
    assert_eq!(updated["city"], "Paris");
    for field in ["_id", "user", "restaurantName", "country", "description", "cuisines", "menuItems", "imageUrl", "review"] {
        assert_eq!(updated[field], created[field], "{} changed", field);
    }
    Ok(())
}

#[tokio::test]
async fn update_with_new_image_replaces_url() -> Result<()> {
    let app = TestApp::new();
    let token = app.signup("owner@example.com").await?;
    let created = app.create_restaurant(&token, "New York").await?.body["data"].clone();

    let form = MultipartBody::new().file("imageFile", "new.png", "image/png", vec![5, 6, 7, 8]);
    let res = app.multipart(Method::PUT, MANAGE, Some(&token), &form).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_ne!(res.body["data"]["imageUrl"], created["imageUrl"]);
    assert_eq!(app.blobs.count().await, 2);
    Ok(())
}

#[tokio::test]
async fn update_keeps_existing_menu_item_ids() -> Result<()> {
    let app = TestApp::new();
    let token = app.signup("owner@example.com").await?;
    let created = app.create_restaurant(&token, "New York").await?.body["data"].clone();
    let kept_id = created["menuItems"][0]["_id"].as_str().unwrap().to_string();

    let form = MultipartBody::new()
        .text("menuItems[0][_id]", &kept_id)
        .text("menuItems[0][name]", "Carbonara")
        .text("menuItems[0][price]", "13.5")
        .text("menuItems[1][name]", "Tiramisu")
        .text("menuItems[1][price]", "7");
    let res = app.multipart(Method::PUT, MANAGE, Some(&token), &form).await?;
    assert_eq!(res.status, StatusCode::OK);

    let items = &res.body["data"]["menuItems"];
    assert_eq!(items[0]["_id"], kept_id.as_str());
    assert_eq!(items[0]["price"], 13.5);
    assert_ne!(items[1]["_id"], created["menuItems"][1]["_id"]);
    Ok(())
}

#[tokio::test]
async fn invalid_rating_leaves_document_unchanged() -> Result<()> {
    let app = TestApp::new();
    let token = app.signup("owner@example.com").await?;
    let created = app.create_restaurant(&token, "New York").await?.body["data"].clone();

    let form = MultipartBody::new()
        .text("city", "Paris")
        .text("review[0][name]", "Jane")
        .text("review[0][rating]", "6");
    let res = app.multipart(Method::PUT, MANAGE, Some(&token), &form).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.body["field_errors"]["review[0].rating"].is_string());

    let fetched = app.get(MANAGE, Some(&token)).await?;
    assert_eq!(fetched.body["data"], created);
    Ok(())
}

#[tokio::test]
async fn reviews_are_stored_with_ids() -> Result<()> {
    let app = TestApp::new();
    let token = app.signup("owner@example.com").await?;
    app.create_restaurant(&token, "New York").await?;

    let form = MultipartBody::new()
        .text("review[0][name]", "Jane")
        .text("review[0][rating]", "5")
        .text("review[0][about]", "Lovely");
    let res = app.multipart(Method::PUT, MANAGE, Some(&token), &form).await?;
    assert_eq!(res.status, StatusCode::OK);

    let review = &res.body["data"]["review"][0];
    assert_eq!(review["name"], "Jane");
    assert_eq!(review["rating"], 5);
    assert_eq!(review["about"], "Lovely");
    assert!(review["_id"].is_string());
    Ok(())
}

#[tokio::test]
async fn update_without_restaurant_is_not_found() -> Result<()> {
    let app = TestApp::new();
    let token = app.signup("owner@example.com").await?;

    let form = MultipartBody::new().text("city", "Paris");
    let res = app.multipart(Method::PUT, MANAGE, Some(&token), &form).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn owners_only_see_their_own_restaurant() -> Result<()> {
    let app = TestApp::new();
    let alice = app.signup("alice@example.com").await?;
    let bob = app.signup("bob@example.com").await?;
    app.create_restaurant(&alice, "Lyon").await?;
    app.create_restaurant(&bob, "Nice").await?;

    let res = app.get(MANAGE, Some(&bob)).await?;
    assert_eq!(res.body["data"]["city"], "Nice");

    let form = MultipartBody::new().text("city", "Marseille");
    app.multipart(Method::PUT, MANAGE, Some(&bob), &form).await?;
    let res = app.get(MANAGE, Some(&alice)).await?;
    assert_eq!(res.body["data"]["city"], "Lyon");
    Ok(())
}
