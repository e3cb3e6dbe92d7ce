//! End-to-end tests for the user APIs

mod support;

use axum::http::StatusCode;
use serde_json::json;

use support::{PASSWORD, obtain_token, register_and_login, register_user, request, setup};

#[tokio::test]
async fn test_create_user_success() {
    let (app, _state) = setup().await;

    let (status, body) = request(
        &app,
        "POST",
        "/api/user/create/",
        None,
        Some(json!({ "email": "test@example.com", "password": PASSWORD })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], "test@example.com");
    // The name defaults to the local part of the email.
    assert_eq!(body["name"], "test");
    // The credential never leaves the service.
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn test_create_user_with_explicit_name() {
    let (app, _state) = setup().await;

    let (status, body) = request(
        &app,
        "POST",
        "/api/user/create/",
        None,
        Some(json!({
            "email": "named@example.com",
            "password": PASSWORD,
            "name": "Sample Name"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Sample Name");
}

#[tokio::test]
async fn test_create_user_normalizes_email_domain() {
    let (app, _state) = setup().await;

    let (status, body) = request(
        &app,
        "POST",
        "/api/user/create/",
        None,
        Some(json!({ "email": "Test2@Example.com", "password": PASSWORD })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], "Test2@example.com");
}

#[tokio::test]
async fn test_create_user_empty_email_fails() {
    let (app, _state) = setup().await;

    let (status, _body) = request(
        &app,
        "POST",
        "/api/user/create/",
        None,
        Some(json!({ "email": "", "password": PASSWORD })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_user_email_exists_fails() {
    let (app, _state) = setup().await;
    register_user(&app, "test@example.com").await;

    let (status, _body) = request(
        &app,
        "POST",
        "/api/user/create/",
        None,
        Some(json!({ "email": "test@example.com", "password": "other_pass_123" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_user_small_password_fails() {
    let (app, state) = setup().await;

    let (status, _body) = request(
        &app,
        "POST",
        "/api/user/create/",
        None,
        Some(json!({ "email": "test_pass@example.com", "password": "t_p12" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);

    let user = state
        .user_repository
        .find_by_email("test_pass@example.com")
        .await
        .unwrap();
    assert!(user.is_none());
}

#[tokio::test]
async fn test_obtain_token_success() {
    let (app, _state) = setup().await;
    register_user(&app, "test@example.com").await;

    let token = obtain_token(&app, "test@example.com", PASSWORD).await;
    assert!(!token.is_empty());
}

#[tokio::test]
async fn test_obtain_token_wrong_password_fails() {
    let (app, _state) = setup().await;
    register_user(&app, "test@example.com").await;

    let (status, body) = request(
        &app,
        "POST",
        "/api/user/token/",
        None,
        Some(json!({ "email": "test@example.com", "password": "wrong_pass_123" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("token").is_none());
}

#[tokio::test]
async fn test_obtain_token_unknown_user_fails() {
    let (app, _state) = setup().await;

    let (status, body) = request(
        &app,
        "POST",
        "/api/user/token/",
        None,
        Some(json!({ "email": "nobody@example.com", "password": PASSWORD })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("token").is_none());
}

#[tokio::test]
async fn test_obtain_token_blank_credentials_fail() {
    let (app, _state) = setup().await;

    let (status, body) = request(
        &app,
        "POST",
        "/api/user/token/",
        None,
        Some(json!({ "email": "", "password": "" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("token").is_none());
}

#[tokio::test]
async fn test_profile_requires_authentication() {
    let (app, _state) = setup().await;

    let (status, _body) = request(&app, "GET", "/api/user/profile/", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _body) =
        request(&app, "GET", "/api/user/profile/", Some("not-a-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_profile_retrieve_success() {
    let (app, _state) = setup().await;
    let token = register_and_login(&app, "test@example.com").await;

    let (status, body) = request(&app, "GET", "/api/user/profile/", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "test@example.com");
    assert_eq!(body["name"], "test");
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn test_profile_update_name_and_password() {
    let (app, _state) = setup().await;
    let token = register_and_login(&app, "test@example.com").await;

    let (status, body) = request(
        &app,
        "PATCH",
        "/api/user/profile/",
        Some(&token),
        Some(json!({ "name": "New Name", "password": "new_pass_12345" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "New Name");

    // The old password no longer works, the new one does.
    let (status, _body) = request(
        &app,
        "POST",
        "/api/user/token/",
        None,
        Some(json!({ "email": "test@example.com", "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let token = obtain_token(&app, "test@example.com", "new_pass_12345").await;
    assert!(!token.is_empty());
}

#[tokio::test]
async fn test_profile_update_short_password_fails() {
    let (app, _state) = setup().await;
    let token = register_and_login(&app, "test@example.com").await;

    let (status, _body) = request(
        &app,
        "PATCH",
        "/api/user/profile/",
        Some(&token),
        Some(json!({ "password": "short" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_profile_post_method_not_allowed() {
    let (app, _state) = setup().await;
    let token = register_and_login(&app, "test@example.com").await;

    let (status, _body) = request(
        &app,
        "POST",
        "/api/user/profile/",
        Some(&token),
        Some(json!({ "name": "nope" })),
    )
    .await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_profile_delete_removes_account() {
    let (app, _state) = setup().await;
    let token = register_and_login(&app, "test@example.com").await;

    let (status, _body) = request(&app, "DELETE", "/api/user/profile/", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // The account is gone; the still-valid token no longer resolves.
    let (status, _body) = request(&app, "GET", "/api/user/profile/", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
