//! Authentication error types.

use recipehub_core::error::HubError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("account is not verified")]
    AccountNotVerified,

    #[error("account is already verified")]
    AlreadyVerified,

    #[error("invalid verification code")]
    CodeMismatch,

    #[error("verification code expired")]
    CodeExpired,

    #[error("verification code is still valid")]
    CodeStillValid,

    #[error("invalid or unknown reset token")]
    ResetTokenInvalid,

    #[error("reset token expired")]
    ResetTokenExpired,

    #[error("token has expired")]
    TokenExpired,

    #[error("invalid token: {0}")]
    TokenInvalid(String),

    #[error("password must be at least {0} characters")]
    PasswordTooShort(usize),

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for HubError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials
            | AuthError::AccountNotVerified
            | AuthError::TokenExpired
            | AuthError::TokenInvalid(_) => HubError::AuthenticationFailed {
                reason: err.to_string(),
            },
            // Expired/mismatched codes and tokens are state errors,
            // distinguishable by message, reported synchronously.
            AuthError::AlreadyVerified
            | AuthError::CodeMismatch
            | AuthError::CodeExpired
            | AuthError::CodeStillValid
            | AuthError::ResetTokenInvalid
            | AuthError::ResetTokenExpired => HubError::State {
                message: err.to_string(),
            },
            AuthError::PasswordTooShort(_) => HubError::Validation {
                message: err.to_string(),
            },
            AuthError::Crypto(msg) => HubError::Crypto(msg),
        }
    }
}
