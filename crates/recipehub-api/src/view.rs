//! Response projections: what a row looks like on the wire.

use recipehub_core::error::{HubError, HubResult};
use recipehub_core::models::user::User;
use recipehub_core::repository::PaginatedResult;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Value, json};
use uuid::Uuid;

/// Public shape of a user. Credential and lifecycle fields (password
/// hash, codes, token hashes) never leave the service.
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub country: Option<String>,
    pub profile_image: Option<String>,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            phone_number: user.phone_number.clone(),
            country: user.country.clone(),
            profile_image: user.profile_image.clone(),
            is_verified: user.is_verified,
            created_at: user.created_at,
        }
    }
}

pub fn to_json<T: Serialize>(value: &T) -> HubResult<Value> {
    serde_json::to_value(value).map_err(|e| HubError::Internal(e.to_string()))
}

/// Wrap a page of items with its 1-based pagination metadata.
pub fn paginated<T: Serialize>(result: &PaginatedResult<T>) -> HubResult<Value> {
    let page = result.offset / result.limit + 1;
    let pages = result.total.div_ceil(result.limit);
    Ok(json!({
        "items": to_json(&result.items)?,
        "meta": {
            "total": result.total,
            "page": page,
            "per_page": result.limit,
            "pages": pages,
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_view_omits_credentials() {
        let user = User {
            id: Uuid::new_v4(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            phone_number: None,
            country: None,
            profile_image: None,
            password_hash: "$argon2id$secret".into(),
            is_verified: true,
            is_deleted: false,
            verification_code: Some("123456".into()),
            verification_code_expires_at: None,
            reset_token_hash: None,
            reset_token_expires_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let value = to_json(&UserView::from(&user)).unwrap();
        let rendered = value.to_string();
        assert!(!rendered.contains("argon2id"));
        assert!(!rendered.contains("123456"));
        assert_eq!(value["email"], "ada@example.com");
    }

    #[test]
    fn paginated_meta() {
        let result = PaginatedResult {
            items: vec!["a", "b"],
            total: 23,
            offset: 20,
            limit: 10,
        };
        let value = paginated(&result).unwrap();
        assert_eq!(value["meta"]["page"], 3);
        assert_eq!(value["meta"]["pages"], 3);
        assert_eq!(value["meta"]["total"], 23);
        assert_eq!(value["items"].as_array().unwrap().len(), 2);
    }
}
