//! Uniform response envelope.
//!
//! Every handler returns `{success, message, data, error}` regardless
//! of outcome; the transport layer only adds a status code on top.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ErrorCategory, HubError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
    pub data: Value,
    pub error: Value,
}

impl ApiResponse {
    pub fn ok(message: impl Into<String>, data: Value) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
            error: Value::Object(Default::default()),
        }
    }

    pub fn ok_empty(message: impl Into<String>) -> Self {
        Self::ok(message, Value::Object(Default::default()))
    }

    pub fn err(message: impl Into<String>, error: Value) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: Value::Object(Default::default()),
            error,
        }
    }
}

/// Envelope plus the error category the transport maps to a status
/// code. Success carries no category.
#[derive(Debug)]
pub struct HandlerReply {
    pub response: ApiResponse,
    pub category: Option<ErrorCategory>,
}

impl HandlerReply {
    pub fn success(message: impl Into<String>, data: Value) -> Self {
        Self {
            response: ApiResponse::ok(message, data),
            category: None,
        }
    }

    pub fn failure(err: &HubError) -> Self {
        let category = err.category();
        // Infrastructure detail stays out of the client message;
        // validation/state errors keep their specific text.
        let (message, detail) = match category {
            ErrorCategory::Internal => (
                "Something went wrong".to_string(),
                Value::String(err.to_string()),
            ),
            _ => (err.to_string(), Value::Object(Default::default())),
        };
        Self {
            response: ApiResponse::err(message, detail),
            category: Some(category),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_envelope_shape() {
        let r = ApiResponse::ok("done", serde_json::json!({"id": 1}));
        assert!(r.success);
        assert_eq!(r.message, "done");
        assert_eq!(r.data["id"], 1);
        assert_eq!(r.error, serde_json::json!({}));
    }

    #[test]
    fn internal_errors_are_masked_but_not_lost() {
        let err = HubError::Database("pool exhausted".into());
        let reply = HandlerReply::failure(&err);
        assert!(!reply.response.success);
        assert_eq!(reply.response.message, "Something went wrong");
        assert!(reply.response.error.as_str().unwrap().contains("pool exhausted"));
        assert_eq!(reply.category, Some(ErrorCategory::Internal));
    }

    #[test]
    fn state_errors_keep_their_message() {
        let err = HubError::State {
            message: "Verification code expired".into(),
        };
        let reply = HandlerReply::failure(&err);
        assert_eq!(reply.response.message, "Invalid state: Verification code expired");
        assert_eq!(reply.category, Some(ErrorCategory::State));
    }
}
