//! Identity handlers: registration, verification, login, profile, and
//! the password flows.

use recipehub_core::error::{HubError, HubResult};
use recipehub_core::repository::UserRepository;
use recipehub_core::response::HandlerReply;
use recipehub_auth::mailer::VerificationMailer;
use recipehub_auth::service::{AccountService, RegisterInput, TokenPair};
use serde_json::json;
use uuid::Uuid;

use super::finish;
use crate::validate::{
    ChangePasswordRequest, LoginRequest, PageQuery, PasswordResetConfirmRequest,
    PasswordResetRequest, RegisterRequest, ResendCodeRequest, UpdateProfileRequest, Validate,
    VerifyEmailRequest, rejection,
};
use crate::view::{UserView, paginated, to_json};

pub struct UserHandlers<U: UserRepository, M: VerificationMailer> {
    users: U,
    account: AccountService<U, M>,
}

impl<U: UserRepository, M: VerificationMailer> UserHandlers<U, M> {
    pub fn new(users: U, account: AccountService<U, M>) -> Self {
        Self { users, account }
    }

    async fn active_user(&self, user_id: Uuid) -> HubResult<recipehub_core::models::user::User> {
        let user = self.users.get_by_id(user_id).await?;
        if user.is_deleted {
            return Err(HubError::NotFound {
                entity: "user".into(),
                id: user_id.to_string(),
            });
        }
        Ok(user)
    }

    fn token_payload(tokens: &TokenPair) -> serde_json::Value {
        json!({
            "access_token": tokens.access_token,
            "refresh_token": tokens.refresh_token,
        })
    }

    pub async fn register(&self, req: RegisterRequest) -> HandlerReply {
        if let Err(errors) = req.validate() {
            return rejection(errors);
        }
        finish(async {
            let user = self
                .account
                .register(RegisterInput {
                    first_name: req.first_name,
                    last_name: req.last_name,
                    email: req.email,
                    password: req.password,
                    phone_number: req.phone_number,
                    country: req.country,
                })
                .await?;
            Ok(HandlerReply::success(
                "Registration successful, verification code sent",
                to_json(&UserView::from(&user))?,
            ))
        }
        .await)
    }

    pub async fn verify_email(&self, req: VerifyEmailRequest) -> HandlerReply {
        if let Err(errors) = req.validate() {
            return rejection(errors);
        }
        finish(async {
            let tokens = self
                .account
                .verify_email(&req.email, &req.verification_code)
                .await?;
            Ok(HandlerReply::success(
                "Email verified",
                Self::token_payload(&tokens),
            ))
        }
        .await)
    }

    pub async fn resend_code(&self, req: ResendCodeRequest) -> HandlerReply {
        if let Err(errors) = req.validate() {
            return rejection(errors);
        }
        finish(async {
            self.account.resend_verification(&req.email).await?;
            Ok(HandlerReply::success(
                "New verification code sent",
                json!({}),
            ))
        }
        .await)
    }

    pub async fn login(&self, req: LoginRequest) -> HandlerReply {
        if let Err(errors) = req.validate() {
            return rejection(errors);
        }
        finish(async {
            let (user, tokens) = self.account.login(&req.email, &req.password).await?;
            Ok(HandlerReply::success(
                "Login successful",
                json!({
                    "user": to_json(&UserView::from(&user))?,
                    "tokens": Self::token_payload(&tokens),
                }),
            ))
        }
        .await)
    }

    pub async fn get_profile(&self, user_id: Uuid) -> HandlerReply {
        finish(async {
            let user = self.active_user(user_id).await?;
            Ok(HandlerReply::success(
                "Profile retrieved",
                to_json(&UserView::from(&user))?,
            ))
        }
        .await)
    }

    pub async fn update_profile(&self, user_id: Uuid, req: UpdateProfileRequest) -> HandlerReply {
        finish(async {
            self.active_user(user_id).await?;
            let updated = self
                .users
                .update(
                    user_id,
                    recipehub_core::models::user::UpdateUser {
                        phone_number: req.phone_number,
                        country: req.country,
                        profile_image: req.profile_image,
                    },
                )
                .await?;
            Ok(HandlerReply::success(
                "Profile updated",
                to_json(&UserView::from(&updated))?,
            ))
        }
        .await)
    }

    pub async fn change_password(&self, user_id: Uuid, req: ChangePasswordRequest) -> HandlerReply {
        if let Err(errors) = req.validate() {
            return rejection(errors);
        }
        finish(async {
            self.account
                .change_password(user_id, &req.old_password, &req.new_password)
                .await?;
            Ok(HandlerReply::success("Password updated", json!({})))
        }
        .await)
    }

    /// Soft delete: the row stays, login and listing stop seeing it.
    pub async fn delete_account(&self, user_id: Uuid) -> HandlerReply {
        finish(async {
            self.active_user(user_id).await?;
            self.users.delete(user_id).await?;
            Ok(HandlerReply::success("Account deleted", json!({})))
        }
        .await)
    }

    pub async fn list_users(&self, query: PageQuery) -> HandlerReply {
        finish(async {
            let page = self.users.list(query.pagination()).await?;
            let views: Vec<UserView> = page.items.iter().map(UserView::from).collect();
            let page = recipehub_core::repository::PaginatedResult {
                items: views,
                total: page.total,
                offset: page.offset,
                limit: page.limit,
            };
            Ok(HandlerReply::success("Users retrieved", paginated(&page)?))
        }
        .await)
    }

    /// The raw token goes out through the mailer only; the envelope
    /// never carries it.
    pub async fn request_password_reset(&self, req: PasswordResetRequest) -> HandlerReply {
        if let Err(errors) = req.validate() {
            return rejection(errors);
        }
        finish(async {
            self.account.request_password_reset(&req.email).await?;
            Ok(HandlerReply::success("Password reset link sent", json!({})))
        }
        .await)
    }

    pub async fn confirm_password_reset(&self, req: PasswordResetConfirmRequest) -> HandlerReply {
        if let Err(errors) = req.validate() {
            return rejection(errors);
        }
        finish(async {
            self.account
                .confirm_password_reset(&req.token, &req.new_password)
                .await?;
            Ok(HandlerReply::success("Password reset successful", json!({})))
        }
        .await)
    }
}
