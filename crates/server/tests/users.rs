mod common;

use axum::http::{Method, StatusCode};
use common::{json_body, TestApp};
use serde_json::json;
use shared::{api::Object, model::User, types::Uuid};

#[tokio::test]
async fn created_user_fetches_back_equal() {
    let app = TestApp::new().await;

    let created = app.seed_user("alice").await;
    assert_eq!(created.username, "alice");
    assert!(created.email.is_none());
    assert!(created.last_login_date.is_none());

    let response = app
        .get(
            &Object::UserId.path().replace(":id", &created.id.to_string()),
            &created.id,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let fetched: User = json_body(response).await;
    assert_eq!(created, fetched);
}

#[tokio::test]
async fn unknown_user_is_not_found() {
    let app = TestApp::new().await;

    let id = Uuid::new_v4();
    let response = app
        .get(&Object::UserId.path().replace(":id", &id.to_string()), &id)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn short_usernames_are_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            Object::User.path(),
            None,
            Some(json!({ "username": "ab" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
