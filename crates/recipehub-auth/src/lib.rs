//! RecipeHub Auth — password verification, JWT issuance/validation,
//! email-verification and password-reset lifecycles, and the
//! role/permission authorization service.

pub mod authz;
pub mod config;
pub mod error;
pub mod mailer;
pub mod password;
pub mod service;
pub mod token;

pub use authz::AuthzService;
pub use config::AuthConfig;
pub use error::AuthError;
pub use mailer::{LoggingMailer, VerificationMailer};
pub use service::{AccountService, RegisterInput, TokenPair};
pub use token::AccessTokenClaims;
