//! Typed request structs and their validation.
//!
//! Validation returns `Result<(), Vec<FieldError>>` so a caller gets
//! every broken field at once, not just the first. Handlers turn a
//! failure into a validation envelope before any service is touched.

use recipehub_core::error::ErrorCategory;
use recipehub_core::repository::Pagination;
use recipehub_core::response::{ApiResponse, HandlerReply};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// One broken field and why.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

pub type ValidationResult = Result<(), Vec<FieldError>>;

pub trait Validate {
    fn validate(&self) -> ValidationResult;
}

/// Build the validation-failure envelope for a set of field errors.
pub fn rejection(errors: Vec<FieldError>) -> HandlerReply {
    let detail = serde_json::to_value(&errors).unwrap_or_else(|_| Value::Array(Vec::new()));
    HandlerReply {
        response: ApiResponse::err("Validation failed", detail),
        category: Some(ErrorCategory::Validation),
    }
}

/// Syntactic email check: one `@`, a non-empty local part, and a
/// dotted domain. Deliverability is the mailer's problem.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

fn require(errors: &mut Vec<FieldError>, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, "must not be empty"));
    }
}

fn require_email(errors: &mut Vec<FieldError>, field: &'static str, value: &str) {
    if !is_valid_email(value) {
        errors.push(FieldError::new(field, "must be a valid email address"));
    }
}

fn done(errors: Vec<FieldError>) -> ValidationResult {
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub phone_number: Option<String>,
    pub country: Option<String>,
}

impl Validate for RegisterRequest {
    fn validate(&self) -> ValidationResult {
        let mut errors = Vec::new();
        require(&mut errors, "first_name", &self.first_name);
        require(&mut errors, "last_name", &self.last_name);
        require_email(&mut errors, "email", &self.email);
        require(&mut errors, "password", &self.password);
        done(errors)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerifyEmailRequest {
    pub email: String,
    pub verification_code: String,
}

impl Validate for VerifyEmailRequest {
    fn validate(&self) -> ValidationResult {
        let mut errors = Vec::new();
        require_email(&mut errors, "email", &self.email);
        require(&mut errors, "verification_code", &self.verification_code);
        done(errors)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResendCodeRequest {
    pub email: String,
}

impl Validate for ResendCodeRequest {
    fn validate(&self) -> ValidationResult {
        let mut errors = Vec::new();
        require_email(&mut errors, "email", &self.email);
        done(errors)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> ValidationResult {
        let mut errors = Vec::new();
        require_email(&mut errors, "email", &self.email);
        require(&mut errors, "password", &self.password);
        done(errors)
    }
}

/// All fields optional; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub phone_number: Option<String>,
    pub country: Option<String>,
    pub profile_image: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

impl Validate for ChangePasswordRequest {
    fn validate(&self) -> ValidationResult {
        let mut errors = Vec::new();
        require(&mut errors, "old_password", &self.old_password);
        require(&mut errors, "new_password", &self.new_password);
        done(errors)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PasswordResetRequest {
    pub email: String,
}

impl Validate for PasswordResetRequest {
    fn validate(&self) -> ValidationResult {
        let mut errors = Vec::new();
        require_email(&mut errors, "email", &self.email);
        done(errors)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PasswordResetConfirmRequest {
    pub token: String,
    pub new_password: String,
}

impl Validate for PasswordResetConfirmRequest {
    fn validate(&self) -> ValidationResult {
        let mut errors = Vec::new();
        require(&mut errors, "token", &self.token);
        require(&mut errors, "new_password", &self.new_password);
        done(errors)
    }
}

// ---------------------------------------------------------------------------
// Roles & permissions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct CreateRoleRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl Validate for CreateRoleRequest {
    fn validate(&self) -> ValidationResult {
        let mut errors = Vec::new();
        require(&mut errors, "name", &self.name);
        done(errors)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePermissionRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl Validate for CreatePermissionRequest {
    fn validate(&self) -> ValidationResult {
        let mut errors = Vec::new();
        require(&mut errors, "name", &self.name);
        done(errors)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssignPermissionsRequest {
    pub permission_ids: Vec<Uuid>,
}

impl Validate for AssignPermissionsRequest {
    fn validate(&self) -> ValidationResult {
        let mut errors = Vec::new();
        if self.permission_ids.is_empty() {
            errors.push(FieldError::new("permission_ids", "must not be empty"));
        }
        done(errors)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssignRolesRequest {
    pub role_ids: Vec<Uuid>,
}

impl Validate for AssignRolesRequest {
    fn validate(&self) -> ValidationResult {
        let mut errors = Vec::new();
        if self.role_ids.is_empty() {
            errors.push(FieldError::new("role_ids", "must not be empty"));
        }
        done(errors)
    }
}

// ---------------------------------------------------------------------------
// Recipes & interactions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCategoriesRequest {
    pub names: Vec<String>,
}

impl Validate for CreateCategoriesRequest {
    fn validate(&self) -> ValidationResult {
        let mut errors = Vec::new();
        if self.names.is_empty() {
            errors.push(FieldError::new("names", "must not be empty"));
        } else if self.names.iter().any(|n| n.trim().is_empty()) {
            errors.push(FieldError::new("names", "entries must not be empty"));
        }
        done(errors)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateRecipeRequest {
    pub title: String,
    pub content: String,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
}

impl Validate for CreateRecipeRequest {
    fn validate(&self) -> ValidationResult {
        let mut errors = Vec::new();
        require(&mut errors, "title", &self.title);
        require(&mut errors, "content", &self.content);
        done(errors)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FavoriteRequest {
    pub recipe_id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCommentRequest {
    pub recipe_id: Uuid,
    pub body: String,
}

impl Validate for CreateCommentRequest {
    fn validate(&self) -> ValidationResult {
        let mut errors = Vec::new();
        require(&mut errors, "body", &self.body);
        done(errors)
    }
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

const DEFAULT_PER_PAGE: u64 = 10;
const MAX_PER_PAGE: u64 = 100;

/// 1-based page query as it arrives on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl PageQuery {
    pub fn pagination(&self) -> Pagination {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self
            .per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE);
        Pagination {
            offset: (page - 1) * per_page,
            limit: per_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_syntax() {
        assert!(is_valid_email("ada@example.com"));
        assert!(is_valid_email("a.b+c@sub.example.co.uk"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ada@nodot"));
        assert!(!is_valid_email("ada@.example.com"));
        assert!(!is_valid_email("ada@example.com."));
        assert!(!is_valid_email("ada@@example.com"));
    }

    #[test]
    fn register_collects_all_field_errors() {
        let req = RegisterRequest {
            first_name: " ".into(),
            last_name: String::new(),
            email: "bad".into(),
            password: String::new(),
            phone_number: None,
            country: None,
        };
        let errors = req.validate().unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["first_name", "last_name", "email", "password"]);
    }

    #[test]
    fn page_query_defaults_and_clamps() {
        let p = PageQuery::default().pagination();
        assert_eq!((p.offset, p.limit), (0, 10));

        let p = PageQuery {
            page: Some(3),
            per_page: Some(20),
        }
        .pagination();
        assert_eq!((p.offset, p.limit), (40, 20));

        let p = PageQuery {
            page: Some(0),
            per_page: Some(10_000),
        }
        .pagination();
        assert_eq!((p.offset, p.limit), (0, MAX_PER_PAGE));
    }

    #[test]
    fn rejection_envelope_carries_field_detail() {
        let reply = rejection(vec![FieldError::new("email", "must be a valid email address")]);
        assert!(!reply.response.success);
        assert_eq!(reply.response.message, "Validation failed");
        assert_eq!(reply.response.error[0]["field"], "email");
        assert_eq!(reply.category, Some(ErrorCategory::Validation));
    }
}
