//! Application state shared across handlers

use sqlx::SqlitePool;

use crate::filter::QueryPolicy;
use crate::jwt::JwtService;
use crate::repositories::{UserRepository, message::MessageRepository};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub user_repository: UserRepository,
    pub message_repository: MessageRepository,
    pub jwt_service: JwtService,
    pub query_policy: QueryPolicy,
}
