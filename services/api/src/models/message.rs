//! Message model and related payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Message entity
///
/// `id`, `user_id` and `created_at` never change after creation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Message {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Contact email of the sender
    pub email: Option<String>,
    /// Display name of the sender
    pub name: Option<String>,
    pub title: Option<String>,
    pub content: String,
    pub is_recent: bool,
    pub is_read: bool,
    pub is_answered: bool,
    pub is_banned: bool,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Build a new message owned by `user_id`, stamped with the current
    /// time and the default status flags.
    pub fn new(
        user_id: Uuid,
        email: Option<String>,
        name: Option<String>,
        title: Option<String>,
        content: String,
    ) -> Self {
        Message {
            id: Uuid::new_v4(),
            user_id,
            email,
            name,
            title,
            content,
            is_recent: true,
            is_read: false,
            is_answered: false,
            is_banned: false,
            created_at: Utc::now(),
        }
    }
}

/// Message creation payload
#[derive(Debug, Deserialize)]
pub struct CreateMessageRequest {
    pub email: Option<String>,
    pub name: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Partial update payload. `id`, `user_id` and `created_at` are not part
/// of the payload and stay unchanged.
#[derive(Debug, Deserialize, Default)]
pub struct UpdateMessageRequest {
    pub email: Option<String>,
    pub name: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub is_recent: Option<bool>,
    pub is_read: Option<bool>,
    pub is_answered: Option<bool>,
    pub is_banned: Option<bool>,
}

/// Query parameters for message listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageQuery {
    /// Comma-separated subset of "recent", "read", "answered"
    pub filter: Option<String>,
    /// Substring to look for in the title, content and contact email
    pub search: Option<String>,
    /// Inclusive lower bound on the creation date, YYYY-MM-DD
    pub fd: Option<String>,
    /// Exclusive upper bound on the creation date, YYYY-MM-DD
    pub td: Option<String>,
}

/// Summary view used by the list endpoint
#[derive(Debug, Serialize)]
pub struct MessageSummary {
    pub email: Option<String>,
    pub name: Option<String>,
    pub title: Option<String>,
}

impl From<&Message> for MessageSummary {
    fn from(message: &Message) -> Self {
        MessageSummary {
            email: message.email.clone(),
            name: message.name.clone(),
            title: message.title.clone(),
        }
    }
}

/// Detail view returned by create, retrieve and update
#[derive(Debug, Serialize)]
pub struct MessageDetail {
    pub id: Uuid,
    pub email: Option<String>,
    pub name: Option<String>,
    pub title: Option<String>,
    pub content: String,
    pub is_recent: bool,
    pub is_read: bool,
    pub is_answered: bool,
    pub is_banned: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Message> for MessageDetail {
    fn from(message: &Message) -> Self {
        MessageDetail {
            id: message.id,
            email: message.email.clone(),
            name: message.name.clone(),
            title: message.title.clone(),
            content: message.content.clone(),
            is_recent: message.is_recent,
            is_read: message.is_read,
            is_answered: message.is_answered,
            is_banned: message.is_banned,
            created_at: message.created_at,
        }
    }
}
