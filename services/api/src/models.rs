//! API models for entities, request and response payloads

pub mod message;
pub mod user;

// Re-export for convenience
pub use message::{
    CreateMessageRequest, Message, MessageDetail, MessageQuery, MessageSummary,
    UpdateMessageRequest,
};
pub use user::{
    CreateUserRequest, TokenRequest, TokenResponse, UpdateProfileRequest, User, UserResponse,
};
