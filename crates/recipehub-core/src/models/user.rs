//! User domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub country: Option<String>,
    pub profile_image: Option<String>,
    /// Argon2id PHC-format hash; never the raw password.
    pub password_hash: String,
    pub is_verified: bool,
    /// Soft-delete flag; deleted users are never physically removed.
    pub is_deleted: bool,
    /// 6-digit email verification code, present only while unverified.
    pub verification_code: Option<String>,
    pub verification_code_expires_at: Option<DateTime<Utc>>,
    /// SHA-256 hash of the pending password-reset token, if any.
    pub reset_token_hash: Option<String>,
    pub reset_token_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// A user is active when it has not been soft-deleted.
    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Raw password (hashed with Argon2id before storage).
    pub password: String,
    pub phone_number: Option<String>,
    pub country: Option<String>,
    /// Initial verification code; set together with its expiry.
    pub verification_code: String,
    pub verification_code_expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateUser {
    pub phone_number: Option<String>,
    pub country: Option<String>,
    pub profile_image: Option<String>,
}
