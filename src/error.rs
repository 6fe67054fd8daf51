//! Error types and error handling for the application
//!
//! This module defines custom error types that can be converted to HTTP responses.
//! All errors implement `IntoResponse` to provide consistent error formatting.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

/// Application-level error types
///
/// Each variant maps to a fixed HTTP status via `IntoResponse`.
#[derive(Error, Debug)]
pub enum AppError {
    /// A user with the given UNI is already registered
    #[error("User already exists: {0}")]
    UserAlreadyExists(String),

    /// No user with the given UNI
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// A swipe with the given id already exists
    #[error("Swipe already exists: {0}")]
    SwipeAlreadyExists(i64),

    /// No swipe with the given id
    #[error("Swipe not found: {0}")]
    SwipeNotFound(i64),

    /// A list request resolved to an empty page
    #[error("No users found for page {page} with page_size {page_size}")]
    EmptyPage {
        /// Requested page number
        page: u64,
        /// Requested page size
        page_size: u64,
    },

    /// Storage backend failure
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Internal server error (catch-all for unexpected errors)
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::UserAlreadyExists(_) => (StatusCode::CONFLICT, self.to_string()),
            AppError::UserNotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            // Duplicate swipe ids report as a bad request, not a conflict.
            AppError::SwipeAlreadyExists(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::SwipeNotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::EmptyPage { .. } => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
