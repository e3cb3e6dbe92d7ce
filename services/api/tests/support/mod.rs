//! Shared helpers for the API integration tests
#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::sqlite::SqlitePoolOptions;
use tower::util::ServiceExt;
use uuid::Uuid;

use api::filter::QueryPolicy;
use api::jwt::{JwtConfig, JwtService};
use api::models::Message;
use api::repositories::{UserRepository, message::MessageRepository};
use api::routes;
use api::state::AppState;

pub const PASSWORD: &str = "test_pass12345";

/// Build a router backed by a fresh in-memory database.
pub async fn setup() -> (Router, AppState) {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");

    common::database::ensure_schema(&pool)
        .await
        .expect("Failed to set up schema");

    let jwt_service = JwtService::new(JwtConfig {
        secret: "integration-test-secret".to_string(),
        token_expiry: 3600,
    });

    let state = AppState {
        db_pool: pool.clone(),
        user_repository: UserRepository::new(pool.clone()),
        message_repository: MessageRepository::new(pool),
        jwt_service,
        query_policy: QueryPolicy::default(),
    };

    (routes::create_router(state.clone()), state)
}

/// Send one request through the router and collect the JSON response.
pub async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .expect("Failed to build request"),
        None => builder.body(Body::empty()).expect("Failed to build request"),
    };

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Request did not complete");

    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();

    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Response body is not JSON")
    };

    (status, value)
}

/// Register a user through the API.
pub async fn register_user(app: &Router, email: &str) -> Value {
    let (status, body) = request(
        app,
        "POST",
        "/api/user/create/",
        None,
        Some(json!({ "email": email, "password": PASSWORD })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "registration failed: {}", body);
    body
}

/// Exchange credentials for a bearer token through the API.
pub async fn obtain_token(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = request(
        app,
        "POST",
        "/api/user/token/",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    body["token"].as_str().expect("token missing").to_string()
}

/// Register a user and return a bearer token for them.
pub async fn register_and_login(app: &Router, email: &str) -> String {
    register_user(app, email).await;
    obtain_token(app, email, PASSWORD).await
}

/// Look up a user's id by email, bypassing the HTTP surface.
pub async fn user_id(state: &AppState, email: &str) -> Uuid {
    state
        .user_repository
        .find_by_email(email)
        .await
        .expect("user lookup failed")
        .expect("user not found")
        .id
}

/// Insert a message directly through the repository, so tests can
/// control status flags and timestamps.
pub async fn seed_message(
    state: &AppState,
    owner: Uuid,
    mutate: impl FnOnce(&mut Message),
) -> Message {
    let mut message = Message::new(
        owner,
        Some("subscriber@example.com".to_string()),
        Some("John Doe".to_string()),
        Some("Sample message title".to_string()),
        "Sample content for the message".to_string(),
    );
    mutate(&mut message);

    state
        .message_repository
        .insert(&message)
        .await
        .expect("failed to seed message");

    message
}
