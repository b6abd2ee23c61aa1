mod common;

use common::{json_body, TestApp};
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn duplicate_email_is_rejected_and_not_persisted() {
    let app = TestApp::spawn().await;

    let response = app
        .create_user(json!({ "name": "Ana", "email": "ana@x.com" }))
        .await;
    assert_eq!(response.status().as_u16(), 201);
    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "User created successfully");
    assert_eq!(body["data"]["name"], "Ana");
    assert_eq!(body["data"]["email"], "ana@x.com");

    let response = app
        .create_user(json!({ "name": "Ana2", "email": "ana@x.com" }))
        .await;
    assert_eq!(response.status().as_u16(), 400);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("already exists"));

    let body = json_body(app.get("").await).await;
    let users = body["data"].as_array().unwrap();
    let matching = users.iter().filter(|u| u["email"] == "ana@x.com").count();
    assert_eq!(matching, 1);
}

#[tokio::test]
async fn envelope_carries_second_precision_timestamp() {
    let app = TestApp::spawn().await;

    let body = json_body(app.get("").await).await;

    let timestamp = body["timestamp"].as_str().unwrap();
    assert_eq!(timestamp.len(), "2024-01-31 23:59:59".len());
    assert!(
        chrono::NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M:%S").is_ok(),
        "unexpected timestamp {}",
        timestamp
    );
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn invalid_payload_returns_field_errors() {
    let app = TestApp::spawn().await;

    let response = app
        .create_user(json!({ "name": "  ", "email": "not-an-email" }))
        .await;

    assert_eq!(response.status().as_u16(), 400);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Validation errors");
    assert!(body["data"]["name"].is_string());
    assert!(body["data"]["email"].is_string());
}

#[tokio::test]
async fn null_required_field_returns_field_errors() {
    let app = TestApp::spawn().await;

    let response = app
        .create_user(json!({ "name": null, "email": "ana@x.com" }))
        .await;

    assert_eq!(response.status().as_u16(), 400);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Validation errors");
    assert_eq!(body["data"]["name"], "Name is required");
    assert!(body["data"].get("email").is_none());
}

#[tokio::test]
async fn server_managed_fields_are_never_exposed() {
    let app = TestApp::spawn().await;
    let id = app.seed_user("Ana", "ana@x.com").await;

    let body = json_body(app.get(&format!("/{}", id)).await).await;

    let dto = body["data"].as_object().unwrap();
    assert!(!dto.contains_key("id"));
    assert!(!dto.contains_key("active"));
    assert!(!dto.contains_key("createdAt"));
}

#[tokio::test]
async fn get_unknown_user_is_not_found() {
    let app = TestApp::spawn().await;
    let id = Uuid::new_v4();

    let response = app.get(&format!("/{}", id)).await;

    assert_eq!(response.status().as_u16(), 404);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], format!("User not found with id: {}", id));
}

#[tokio::test]
async fn malformed_id_is_bad_request() {
    let app = TestApp::spawn().await;

    let response = app.get("/42").await;

    assert_eq!(response.status().as_u16(), 400);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn update_merges_and_clears_nullable_fields() {
    let app = TestApp::spawn().await;
    let response = app
        .create_user(json!({
            "name": "Ana",
            "email": "ana@x.com",
            "googleId": "g-ana",
            "imageUrl": "http://img/ana.png"
        }))
        .await;
    assert_eq!(response.status().as_u16(), 201);
    let id = app.id_of("ana@x.com").await;

    let response = app
        .put(
            &format!("/{}", id),
            Some(json!({ "name": "Ana Maria", "email": "ana@x.com" })),
        )
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let body = json_body(response).await;
    assert_eq!(body["message"], "User updated successfully");
    assert_eq!(body["data"]["name"], "Ana Maria");
    assert_eq!(body["data"]["googleId"], serde_json::Value::Null);
    assert_eq!(body["data"]["imageUrl"], serde_json::Value::Null);
}

#[tokio::test]
async fn update_unknown_user_is_not_found() {
    let app = TestApp::spawn().await;

    let response = app
        .put(
            &format!("/{}", Uuid::new_v4()),
            Some(json!({ "name": "Ghost", "email": "ghost@x.com" })),
        )
        .await;

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn update_cannot_take_another_users_email() {
    let app = TestApp::spawn().await;
    app.seed_user("Ana", "ana@x.com").await;
    let bruno = app.seed_user("Bruno", "bruno@x.com").await;

    let response = app
        .put(
            &format!("/{}", bruno),
            Some(json!({ "name": "Bruno", "email": "ana@x.com" })),
        )
        .await;

    assert_eq!(response.status().as_u16(), 400);
    let body = json_body(app.get(&format!("/{}", bruno)).await).await;
    assert_eq!(body["data"]["email"], "bruno@x.com");
}

#[tokio::test]
async fn deleted_user_is_gone() {
    let app = TestApp::spawn().await;
    let id = app.seed_user("Ana", "ana@x.com").await;

    let response = app.delete(&format!("/{}", id)).await;
    assert_eq!(response.status().as_u16(), 200);
    let body = json_body(response).await;
    assert_eq!(body["message"], "User deleted successfully");
    assert_eq!(body["data"], serde_json::Value::Null);

    let response = app.get(&format!("/{}", id)).await;
    assert_eq!(response.status().as_u16(), 404);

    let response = app.delete(&format!("/{}", id)).await;
    assert_eq!(response.status().as_u16(), 404);
}
