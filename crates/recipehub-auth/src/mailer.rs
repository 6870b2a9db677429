//! Outbound mail seam.
//!
//! Mail transport is an external collaborator; this trait is the
//! boundary. The default implementation only logs, which is also what
//! the test suites use.

use recipehub_core::error::HubResult;
use tracing::info;

pub trait VerificationMailer: Send + Sync {
    /// Deliver a verification code to a freshly registered (or
    /// re-requesting) user.
    fn send_verification_code(
        &self,
        email: &str,
        code: &str,
    ) -> impl Future<Output = HubResult<()>> + Send;

    /// Deliver a raw password-reset token.
    fn send_reset_token(
        &self,
        email: &str,
        token: &str,
    ) -> impl Future<Output = HubResult<()>> + Send;
}

/// Mailer that records deliveries in the log instead of sending.
#[derive(Debug, Clone, Default)]
pub struct LoggingMailer;

impl VerificationMailer for LoggingMailer {
    async fn send_verification_code(&self, email: &str, code: &str) -> HubResult<()> {
        info!(email, code, "verification code issued");
        Ok(())
    }

    async fn send_reset_token(&self, email: &str, token: &str) -> HubResult<()> {
        info!(email, token, "password-reset token issued");
        Ok(())
    }
}
