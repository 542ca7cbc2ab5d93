//! Request and Response message types.
//!
//! Defines the envelope exchanged between the local end (this crate) and the
//! remote end over the WebSocket transport.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::identifiers::RequestId;

use super::Command;

// ============================================================================
// Request
// ============================================================================

/// A command request from local end to remote end.
///
/// # Format
///
/// ```json
/// {
///   "id": "uuid",
///   "method": "module.methodName",
///   "params": { ... }
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Request {
    /// Unique identifier for request/response correlation.
    pub id: RequestId,

    /// Command with method and params.
    #[serde(flatten)]
    pub command: Command,
}

impl Request {
    /// Creates a new request with auto-generated ID.
    #[inline]
    #[must_use]
    pub fn new(command: Command) -> Self {
        Self {
            id: RequestId::generate(),
            command,
        }
    }
}

// ============================================================================
// Response
// ============================================================================

/// A response from remote end to local end.
///
/// # Format
///
/// Success:
/// ```json
/// {
///   "id": "uuid",
///   "type": "success",
///   "result": ...
/// }
/// ```
///
/// Error:
/// ```json
/// {
///   "id": "uuid",
///   "type": "error",
///   "error": "no such element",
///   "message": "error message"
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Response {
    /// Matches the request `id`.
    pub id: RequestId,

    /// Response type.
    #[serde(rename = "type")]
    pub response_type: ResponseType,

    /// Result data (if success).
    #[serde(default)]
    pub result: Option<Value>,

    /// Error code (if error).
    #[serde(default)]
    pub error: Option<String>,

    /// Error message (if error).
    #[serde(default)]
    pub message: Option<String>,
}

impl Response {
    /// Returns `true` if this is a success response.
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.response_type == ResponseType::Success
    }

    /// Returns `true` if this is an error response.
    #[inline]
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.response_type == ResponseType::Error
    }

    /// Extracts the result value, returning error if response was error.
    ///
    /// A success response without a result yields `null`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Remote`] carrying the remote error code and message.
    pub fn into_result(self) -> Result<Value> {
        match self.response_type {
            ResponseType::Success => Ok(self.result.unwrap_or(Value::Null)),
            ResponseType::Error => {
                let code = self.error.unwrap_or_else(|| "unknown error".to_string());
                let message = self.message.unwrap_or_else(|| code.clone());
                Err(Error::remote(code, message))
            }
        }
    }
}

// ============================================================================
// ResponseType
// ============================================================================

/// Response type discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    /// Successful response.
    Success,
    /// Error response.
    Error,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::BrowsingContextCommand;

    #[test]
    fn test_request_serialization() {
        let command = Command::BrowsingContext(BrowsingContextCommand::Navigate {
            url: "https://example.com".to_string(),
        });

        let request = Request::new(command);
        let json = serde_json::to_value(&request).expect("serialize");

        assert_eq!(json["method"], "browsingContext.navigate");
        assert_eq!(json["params"]["url"], "https://example.com");
        assert_eq!(json["id"], request.id.to_string());
    }

    #[test]
    fn test_success_response() {
        let json_str = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "type": "success",
            "result": "Example"
        }"#;

        let response: Response = serde_json::from_str(json_str).expect("parse");
        assert!(response.is_success());
        assert!(!response.is_error());
        assert_eq!(response.into_result().expect("success"), "Example");
    }

    #[test]
    fn test_success_without_result_is_null() {
        let json_str = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "type": "success"
        }"#;

        let response: Response = serde_json::from_str(json_str).expect("parse");
        assert!(response.into_result().expect("success").is_null());
    }

    #[test]
    fn test_error_response_into_remote() {
        let json_str = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "type": "error",
            "error": "no such element",
            "message": "Element not found"
        }"#;

        let response: Response = serde_json::from_str(json_str).expect("parse");
        assert!(response.is_error());

        let err = response.into_result().unwrap_err();
        assert_eq!(err.remote_code(), Some("no such element"));
        assert_eq!(err.to_string(), "Remote error (no such element): Element not found");
    }

    #[test]
    fn test_error_response_without_message() {
        let json_str = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "type": "error"
        }"#;

        let response: Response = serde_json::from_str(json_str).expect("parse");
        let err = response.into_result().unwrap_err();
        assert_eq!(err.remote_code(), Some("unknown error"));
    }
}
