/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Registration and login
/// - `users`: User lookup
/// - `organisations`: Organization listing, creation and membership

pub mod auth;
pub mod health;
pub mod organisations;
pub mod users;

use serde::Serialize;

/// Success envelope shared by every `/api` handler
///
/// ```json
/// { "status": "success", "message": "...", "data": { ... } }
/// ```
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub status: &'static str,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(message: &'static str, data: T) -> Self {
        Self {
            status: "success",
            message,
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// Envelope without a `data` field
    pub fn message(message: &'static str) -> Self {
        Self {
            status: "success",
            message,
            data: None,
        }
    }
}
