//! Account service — registration, email verification, login, and the
//! password-reset lifecycle.

use chrono::{Duration, Utc};
use recipehub_core::error::{HubError, HubResult};
use recipehub_core::models::user::{CreateUser, User};
use recipehub_core::repository::UserRepository;
use tracing::warn;
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::mailer::VerificationMailer;
use crate::password;
use crate::token;

/// Input for the registration flow.
#[derive(Debug)]
pub struct RegisterInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub phone_number: Option<String>,
    pub country: Option<String>,
}

/// Access + refresh JWT pair issued on verification and login.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Account lifecycle service.
///
/// Generic over the repository and mailer so the auth layer has no
/// dependency on the database crate or a mail transport.
pub struct AccountService<U: UserRepository, M: VerificationMailer> {
    user_repo: U,
    mailer: M,
    config: AuthConfig,
}

impl<U: UserRepository, M: VerificationMailer> AccountService<U, M> {
    pub fn new(user_repo: U, mailer: M, config: AuthConfig) -> Self {
        Self {
            user_repo,
            mailer,
            config,
        }
    }

    fn check_password_policy(&self, password: &str) -> Result<(), AuthError> {
        if password.len() < self.config.min_password_length {
            return Err(AuthError::PasswordTooShort(self.config.min_password_length));
        }
        Ok(())
    }

    fn issue_token_pair(&self, user_id: Uuid, email: &str) -> HubResult<TokenPair> {
        Ok(TokenPair {
            access_token: token::issue_access_token(user_id, email, &self.config)?,
            refresh_token: token::issue_refresh_token(user_id, email, &self.config)?,
        })
    }

    /// Create an unverified user with a fresh verification code.
    ///
    /// The email unique index rejects duplicates at commit time. There
    /// is no pre-check, so two concurrent registrations for the same
    /// address resolve to one success and one conflict.
    pub async fn register(&self, input: RegisterInput) -> HubResult<User> {
        self.check_password_policy(&input.password)?;

        let code = token::generate_verification_code();
        let expires_at =
            Utc::now() + Duration::seconds(self.config.verification_code_lifetime_secs as i64);

        let user = self
            .user_repo
            .create(CreateUser {
                first_name: input.first_name,
                last_name: input.last_name,
                email: input.email,
                password: input.password,
                phone_number: input.phone_number,
                country: input.country,
                verification_code: code.clone(),
                verification_code_expires_at: expires_at,
            })
            .await?;

        // The account exists either way; a failed delivery is retried
        // via the resend flow.
        if let Err(e) = self.mailer.send_verification_code(&user.email, &code).await {
            warn!(email = %user.email, error = %e, "verification mail delivery failed");
        }

        Ok(user)
    }

    /// Confirm a verification code and mark the account verified.
    ///
    /// Succeeds only if the code matches exactly and the current time
    /// is before the stored expiry; mismatch and expiry are distinct
    /// failures and leave the row unchanged. On success a token pair is
    /// issued, matching the login flow.
    pub async fn verify_email(&self, email: &str, code: &str) -> HubResult<TokenPair> {
        let user = self.user_repo.get_by_email(email).await?;

        if user.is_verified {
            return Err(AuthError::AlreadyVerified.into());
        }

        match user.verification_code.as_deref() {
            Some(stored) if stored == code => {}
            _ => return Err(AuthError::CodeMismatch.into()),
        }

        match user.verification_code_expires_at {
            Some(expiry) if Utc::now() < expiry => {}
            _ => return Err(AuthError::CodeExpired.into()),
        }

        self.user_repo.mark_verified(user.id).await?;

        self.issue_token_pair(user.id, &user.email)
    }

    /// Regenerate the verification code once the previous one expired.
    ///
    /// While the old code is still valid the request is rejected; the
    /// pending code keeps working until its expiry passes.
    pub async fn resend_verification(&self, email: &str) -> HubResult<()> {
        let user = self.user_repo.get_by_email(email).await?;

        if user.is_verified {
            return Err(AuthError::AlreadyVerified.into());
        }

        if let Some(expiry) = user.verification_code_expires_at {
            if Utc::now() < expiry {
                return Err(AuthError::CodeStillValid.into());
            }
        }

        let code = token::generate_verification_code();
        let expires_at =
            Utc::now() + Duration::seconds(self.config.verification_code_lifetime_secs as i64);

        self.user_repo
            .set_verification_code(user.id, &code, expires_at)
            .await?;

        self.mailer.send_verification_code(&user.email, &code).await
    }

    /// Authenticate with email + password and issue a token pair.
    pub async fn login(&self, email: &str, password: &str) -> HubResult<(User, TokenPair)> {
        let user = match self.user_repo.get_by_email(email).await {
            Ok(u) => u,
            Err(HubError::NotFound { .. }) => return Err(AuthError::InvalidCredentials.into()),
            Err(e) => return Err(e),
        };

        // A soft-deleted account looks identical to a missing one.
        if user.is_deleted {
            return Err(AuthError::InvalidCredentials.into());
        }

        if !user.is_verified {
            return Err(AuthError::AccountNotVerified.into());
        }

        let valid = password::verify_password(
            password,
            &user.password_hash,
            self.config.pepper.as_deref(),
        )?;
        if !valid {
            return Err(AuthError::InvalidCredentials.into());
        }

        let tokens = self.issue_token_pair(user.id, &user.email)?;
        Ok((user, tokens))
    }

    /// Change the password of an authenticated user.
    pub async fn change_password(
        &self,
        user_id: Uuid,
        old_password: &str,
        new_password: &str,
    ) -> HubResult<()> {
        let user = self.user_repo.get_by_id(user_id).await?;
        if user.is_deleted {
            return Err(HubError::NotFound {
                entity: "user".into(),
                id: user_id.to_string(),
            });
        }

        let valid = password::verify_password(
            old_password,
            &user.password_hash,
            self.config.pepper.as_deref(),
        )?;
        if !valid {
            return Err(AuthError::InvalidCredentials.into());
        }

        self.check_password_policy(new_password)?;
        self.user_repo.update_password(user.id, new_password).await
    }

    /// Start the password-reset flow: generate an opaque token, store
    /// its hash + expiry, and hand the raw token to the mailer.
    ///
    /// A new request overwrites any pending reset.
    pub async fn request_password_reset(&self, email: &str) -> HubResult<String> {
        let user = self.user_repo.get_by_email(email).await?;
        if user.is_deleted {
            return Err(HubError::NotFound {
                entity: "user".into(),
                id: format!("email={email}"),
            });
        }

        let raw_token = token::generate_reset_token();
        let token_hash = token::hash_reset_token(&raw_token);
        let expires_at =
            Utc::now() + Duration::seconds(self.config.reset_token_lifetime_secs as i64);

        self.user_repo
            .set_reset_token(user.id, &token_hash, expires_at)
            .await?;

        self.mailer.send_reset_token(&user.email, &raw_token).await?;

        Ok(raw_token)
    }

    /// Complete the reset: the token must match a pending hash and be
    /// unexpired. The token pair is cleared in the same statement that
    /// stores the new password, so a second confirm with the same token
    /// fails.
    pub async fn confirm_password_reset(
        &self,
        raw_token: &str,
        new_password: &str,
    ) -> HubResult<()> {
        self.check_password_policy(new_password)?;

        let token_hash = token::hash_reset_token(raw_token);
        let user = match self.user_repo.get_by_reset_token_hash(&token_hash).await {
            Ok(u) => u,
            Err(HubError::NotFound { .. }) => return Err(AuthError::ResetTokenInvalid.into()),
            Err(e) => return Err(e),
        };

        match user.reset_token_expires_at {
            Some(expiry) if Utc::now() < expiry => {}
            _ => return Err(AuthError::ResetTokenExpired.into()),
        }

        self.user_repo
            .complete_password_reset(user.id, new_password)
            .await
    }
}
