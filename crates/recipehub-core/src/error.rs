//! Error types for the RecipeHub system.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HubError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Entity already exists: {entity}")]
    AlreadyExists { entity: String },

    #[error("Authentication failed: {reason}")]
    AuthenticationFailed { reason: String },

    #[error("Authorization denied: {reason}")]
    AuthorizationDenied { reason: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid state: {message}")]
    State { message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Cryptography error: {0}")]
    Crypto(String),

    #[error("Mail delivery failed: {0}")]
    Mail(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type HubResult<T> = Result<T, HubError>;

/// Coarse classification used by the transport layer to pick a status
/// code. The mapping itself (HTTP codes) lives outside this workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Malformed or missing input (400-equivalent).
    Validation,
    /// Entity absent or logically deleted (404-equivalent).
    NotFound,
    /// Duplicate unique key (409-equivalent).
    Conflict,
    /// Bad or expired credential/code/token (400/401-equivalent).
    State,
    /// Missing or unresolvable identity (401-equivalent).
    Unauthenticated,
    /// Authenticated but lacking the required permission (403-equivalent).
    Forbidden,
    /// Persistence, mail, or other infrastructure failure (500-equivalent).
    Internal,
}

impl HubError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            HubError::NotFound { .. } => ErrorCategory::NotFound,
            HubError::AlreadyExists { .. } => ErrorCategory::Conflict,
            HubError::AuthenticationFailed { .. } => ErrorCategory::Unauthenticated,
            HubError::AuthorizationDenied { .. } => ErrorCategory::Forbidden,
            HubError::Validation { .. } => ErrorCategory::Validation,
            HubError::State { .. } => ErrorCategory::State,
            HubError::Database(_)
            | HubError::Crypto(_)
            | HubError::Mail(_)
            | HubError::Internal(_) => ErrorCategory::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_follow_the_taxonomy() {
        let not_found = HubError::NotFound {
            entity: "user".into(),
            id: "x".into(),
        };
        assert_eq!(not_found.category(), ErrorCategory::NotFound);

        let dup = HubError::AlreadyExists {
            entity: "favorite".into(),
        };
        assert_eq!(dup.category(), ErrorCategory::Conflict);

        let denied = HubError::AuthorizationDenied {
            reason: "missing permission".into(),
        };
        assert_eq!(denied.category(), ErrorCategory::Forbidden);

        // Infrastructure failures collapse to Internal without masking
        // the message.
        let db = HubError::Database("connection refused".into());
        assert_eq!(db.category(), ErrorCategory::Internal);
        assert!(db.to_string().contains("connection refused"));
    }
}
