//! API service routes

use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::{
    error::ApiError,
    filter::ListFilter,
    middleware::{AuthUser, require_user, require_user_or_forbidden},
    models::{
        CreateMessageRequest, CreateUserRequest, Message, MessageDetail, MessageQuery,
        MessageSummary, TokenRequest, TokenResponse, UpdateMessageRequest, UpdateProfileRequest,
        UserResponse,
    },
    state::AppState,
    validation,
};

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let profile_routes = Router::new()
        .route(
            "/api/user/profile/",
            get(get_profile).patch(update_profile).delete(delete_profile),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_user));

    let message_routes = Router::new()
        .route(
            "/api/message/messages/",
            get(list_messages).post(create_message),
        )
        .route(
            "/api/message/messages/:id/",
            get(get_message).patch(update_message).delete(delete_message),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_user_or_forbidden,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/user/create/", post(create_user))
        .route("/api/user/token/", post(obtain_token))
        .merge(profile_routes)
        .merge(message_routes)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database = common::database::health_check(&state.db_pool)
        .await
        .unwrap_or(false);
    let status = if database { "ok" } else { "degraded" };

    Json(json!({
        "status": status,
        "service": "message-desk-api"
    }))
}

/// Register a new user
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validation::validate_email(&payload.email).map_err(|m| ApiError::validation("email", m))?;
    validation::validate_password(&payload.password)
        .map_err(|m| ApiError::validation("password", m))?;

    let user = state
        .user_repository
        .create(&payload.email, payload.name.as_deref(), &payload.password)
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// Exchange credentials for an API token
pub async fn obtain_token(
    State(state): State<AppState>,
    Json(payload): Json<TokenRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::validation(
            "credentials",
            "Email and password are required",
        ));
    }

    let email = validation::normalize_email(&payload.email);
    let user = state
        .user_repository
        .find_by_email(&email)
        .await?
        .ok_or_else(invalid_credentials)?;

    if !state
        .user_repository
        .verify_password(&user, &payload.password)
        .await?
    {
        return Err(invalid_credentials());
    }

    let token = state.jwt_service.generate_token(&user).map_err(|e| {
        error!("Failed to generate token: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(TokenResponse { token }))
}

fn invalid_credentials() -> ApiError {
    ApiError::validation("credentials", "Unable to log in with provided credentials")
}

/// Return the authenticated user's profile
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .user_repository
        .find_by_id(user.id)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    Ok(Json(UserResponse::from(&user)))
}

/// Update the authenticated user's name and/or password
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(password) = payload.password.as_deref() {
        validation::validate_password(password)
            .map_err(|m| ApiError::validation("password", m))?;
    }

    let user = state
        .user_repository
        .update_profile(user.id, payload.name.as_deref(), payload.password.as_deref())
        .await?;

    Ok(Json(UserResponse::from(&user)))
}

/// Remove the authenticated user's account
pub async fn delete_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    state.user_repository.delete(user.id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// List the caller's messages, filtered per the query parameters
pub async fn list_messages(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<MessageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = ListFilter::from_query(&query)?;

    let messages = state.message_repository.list_for_user(user.id).await?;
    let messages = filter.apply(messages, &state.query_policy);

    let summaries: Vec<MessageSummary> = messages.iter().map(MessageSummary::from).collect();

    Ok(Json(summaries))
}

/// Create a new message owned by the caller
pub async fn create_message(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateMessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let content = payload.content.as_deref().unwrap_or("");
    validation::validate_content(content).map_err(|m| ApiError::validation("content", m))?;

    let email = payload.email.filter(|e| !e.is_empty());
    if let Some(email) = email.as_deref() {
        validation::validate_email(email).map_err(|m| ApiError::validation("email", m))?;
    }
    if let Some(name) = payload.name.as_deref() {
        validation::validate_sender_name(name).map_err(|m| ApiError::validation("name", m))?;
    }
    if let Some(title) = payload.title.as_deref() {
        validation::validate_title(title).map_err(|m| ApiError::validation("title", m))?;
    }

    let message = Message::new(
        user.id,
        email,
        payload.name,
        payload.title,
        content.to_string(),
    );
    state.message_repository.insert(&message).await?;

    Ok((StatusCode::CREATED, Json(MessageDetail::from(&message))))
}

/// Retrieve one of the caller's messages
pub async fn get_message(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let message = state
        .message_repository
        .find_for_user(id, user.id)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(MessageDetail::from(&message)))
}

/// Partially update one of the caller's messages
pub async fn update_message(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut message = state
        .message_repository
        .find_for_user(id, user.id)
        .await?
        .ok_or(ApiError::NotFound)?;

    if let Some(email) = payload.email {
        if email.is_empty() {
            message.email = None;
        } else {
            validation::validate_email(&email).map_err(|m| ApiError::validation("email", m))?;
            message.email = Some(email);
        }
    }
    if let Some(name) = payload.name {
        validation::validate_sender_name(&name).map_err(|m| ApiError::validation("name", m))?;
        message.name = Some(name);
    }
    if let Some(title) = payload.title {
        validation::validate_title(&title).map_err(|m| ApiError::validation("title", m))?;
        message.title = Some(title);
    }
    if let Some(content) = payload.content {
        validation::validate_content(&content)
            .map_err(|m| ApiError::validation("content", m))?;
        message.content = content;
    }
    if let Some(is_recent) = payload.is_recent {
        message.is_recent = is_recent;
    }
    if let Some(is_read) = payload.is_read {
        message.is_read = is_read;
    }
    if let Some(is_answered) = payload.is_answered {
        message.is_answered = is_answered;
    }
    if let Some(is_banned) = payload.is_banned {
        message.is_banned = is_banned;
    }

    state.message_repository.update(&message).await?;

    Ok(Json(MessageDetail::from(&message)))
}

/// Remove one of the caller's messages
pub async fn delete_message(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = state
        .message_repository
        .delete_for_user(id, user.id)
        .await?;

    if !deleted {
        return Err(ApiError::NotFound);
    }

    Ok(StatusCode::NO_CONTENT)
}
