//! Shared infrastructure for the message desk services.
//!
//! This crate provides the pieces every service needs regardless of its
//! domain: database configuration, connection pooling, schema setup and
//! the error types surfaced by storage operations.

pub mod database;
pub mod error;
