//! API module
//!
//! Contains HTTP request handlers for user, swipe, and points endpoints

pub mod links;
pub mod points;
pub mod swipes;
pub mod users;

use serde::Serialize;

/// Generic acknowledgement payload
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Human-readable message
    pub message: String,
    /// Status indicator (e.g., "ok", "accepted")
    pub status: String,
}
