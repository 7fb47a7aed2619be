//! Custom error types for the application.
//!
//! - [`ApiError`] - Transport and server failures, normalized at the client boundary
//! - [`StorageError`] - localStorage operations for session persistence
//! - [`ValidationErrors`] - Client-side form validation, resolved before any request

use std::collections::BTreeMap;

use thiserror::Error;

use crate::models::QueryError;

/// Failure of a REST call.
///
/// `Display` is the single human-readable message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced an HTTP response (offline, CORS, timeout).
    #[error("Network error: {0}")]
    Network(String),
    /// Non-2xx response; `message` comes from the `{ message }` body when present.
    #[error("{message}")]
    Server { status: u16, message: String },
    /// 2xx response whose body did not match the expected envelope.
    #[error("Unexpected response from server: {0}")]
    Decode(String),
    /// The request was rejected before being sent.
    #[error("Invalid request: {0}")]
    InvalidQuery(#[from] QueryError),
}

impl ApiError {
    /// Build a server error from a status and raw response body.
    ///
    /// Accepts `{ "message": "..." }` and `{ "message": ["...", "..."] }`;
    /// anything else falls back to a generic message for the status.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| match value.get("message") {
                Some(serde_json::Value::String(msg)) if !msg.trim().is_empty() => {
                    Some(msg.clone())
                }
                Some(serde_json::Value::Array(parts)) => {
                    let parts: Vec<&str> = parts.iter().filter_map(|p| p.as_str()).collect();
                    (!parts.is_empty()).then(|| parts.join(", "))
                }
                _ => None,
            })
            .unwrap_or_else(|| default_status_message(status).to_string());
        Self::Server { status, message }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Message for toasts and inline error states.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

fn default_status_message(status: u16) -> &'static str {
    match status {
        400 => "The request was invalid",
        401 => "Your session has expired. Please sign in again.",
        403 => "You do not have permission to perform this action",
        404 => "The requested resource was not found",
        409 => "The resource was modified by someone else",
        413 => "The request is too large",
        422 => "The submitted data was rejected",
        429 => "Too many requests. Please try again shortly.",
        500..=599 => "The server encountered an error",
        _ => "Request failed",
    }
}

/// Session persistence errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("localStorage not available")]
    StorageUnavailable,
    #[error("failed to serialize data")]
    SerializationFailed,
    #[error("failed to write to localStorage")]
    WriteFailed,
    #[error("failed to remove from localStorage")]
    RemoveFailed,
}

/// Field-level validation messages for a form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{}", summary(.fields))]
pub struct ValidationErrors {
    fields: BTreeMap<&'static str, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for `field`. The first message per field wins.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// `Ok(())` when no field failed.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

fn summary(fields: &BTreeMap<&'static str, String>) -> String {
    fields.values().cloned().collect::<Vec<_>>().join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_message_string() {
        let err = ApiError::from_response(409, r#"{"message":"Folder name already exists"}"#);
        assert_eq!(err.to_string(), "Folder name already exists");
        assert_eq!(err.status(), Some(409));
    }

    #[test]
    fn test_server_message_array() {
        let err = ApiError::from_response(
            400,
            r#"{"message":["name should not be empty","url must be an URL"],"error":"Bad Request"}"#,
        );
        assert_eq!(
            err.message(),
            "name should not be empty, url must be an URL"
        );
    }

    #[test]
    fn test_server_message_fallback() {
        assert_eq!(
            ApiError::from_response(502, "<html>Bad gateway</html>").message(),
            "The server encountered an error"
        );
        assert_eq!(
            ApiError::from_response(404, r#"{"message":""}"#).message(),
            "The requested resource was not found"
        );
        assert!(ApiError::from_response(401, "").is_unauthorized());
    }

    #[test]
    fn test_network_error_message() {
        let err = ApiError::Network("Failed to fetch".into());
        assert_eq!(err.message(), "Network error: Failed to fetch");
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_query_error_converts() {
        let err: ApiError = QueryError::ZeroLimit.into();
        assert_eq!(err.message(), "Invalid request: limit must be greater than 0");
    }

    #[test]
    fn test_validation_errors() {
        let mut errors = ValidationErrors::new();
        assert!(errors.clone().into_result().is_ok());

        errors.add("name", "Name is required");
        errors.add("name", "ignored");
        errors.add("url", "URL is required");
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("name"), Some("Name is required"));
        assert_eq!(errors.to_string(), "Name is required; URL is required");
        assert!(errors.into_result().is_err());
    }
}
