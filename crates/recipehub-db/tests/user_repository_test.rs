//! Integration tests for the user repository using in-memory SurrealDB.

use chrono::{Duration, Utc};
use recipehub_core::error::HubError;
use recipehub_core::models::user::{CreateUser, UpdateUser};
use recipehub_core::repository::{Pagination, UserRepository};
use recipehub_db::repository::SurrealUserRepository;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

async fn setup() -> Surreal<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    recipehub_db::run_migrations(&db).await.unwrap();
    db
}

fn new_user(email: &str) -> CreateUser {
    CreateUser {
        first_name: "Ada".into(),
        last_name: "Lovelace".into(),
        email: email.into(),
        password: "SuperSecret123!".into(),
        phone_number: None,
        country: Some("UK".into()),
        verification_code: "123456".into(),
        verification_code_expires_at: Utc::now() + Duration::minutes(2),
    }
}

#[tokio::test]
async fn create_and_get_user() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo.create(new_user("ada@example.com")).await.unwrap();

    assert_eq!(user.email, "ada@example.com");
    assert!(!user.is_verified);
    assert!(!user.is_deleted);
    assert_eq!(user.verification_code.as_deref(), Some("123456"));

    // Password must be hashed, never stored raw.
    assert_ne!(user.password_hash, "SuperSecret123!");
    assert!(user.password_hash.starts_with("$argon2id$"));

    let fetched = repo.get_by_id(user.id).await.unwrap();
    assert_eq!(fetched.id, user.id);

    let by_email = repo.get_by_email("ada@example.com").await.unwrap();
    assert_eq!(by_email.id, user.id);
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    repo.create(new_user("dup@example.com")).await.unwrap();
    let err = repo.create(new_user("dup@example.com")).await.unwrap_err();

    assert!(matches!(err, HubError::AlreadyExists { .. }), "got {err:?}");
}

#[tokio::test]
async fn update_profile_fields() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);
    let user = repo.create(new_user("profile@example.com")).await.unwrap();

    let updated = repo
        .update(
            user.id,
            UpdateUser {
                phone_number: Some("+441234567890".into()),
                country: Some("France".into()),
                profile_image: Some("avatars/ada.png".into()),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.phone_number.as_deref(), Some("+441234567890"));
    assert_eq!(updated.country.as_deref(), Some("France"));
    assert_eq!(updated.profile_image.as_deref(), Some("avatars/ada.png"));
    // Untouched fields survive.
    assert_eq!(updated.email, "profile@example.com");
}

#[tokio::test]
async fn mark_verified_clears_the_code_pair() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);
    let user = repo.create(new_user("verify@example.com")).await.unwrap();

    repo.mark_verified(user.id).await.unwrap();

    let fetched = repo.get_by_id(user.id).await.unwrap();
    assert!(fetched.is_verified);
    assert!(fetched.verification_code.is_none());
    assert!(fetched.verification_code_expires_at.is_none());
}

#[tokio::test]
async fn set_verification_code_replaces_both_fields() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);
    let user = repo.create(new_user("resend@example.com")).await.unwrap();

    let expiry = Utc::now() + Duration::minutes(2);
    repo.set_verification_code(user.id, "654321", expiry)
        .await
        .unwrap();

    let fetched = repo.get_by_id(user.id).await.unwrap();
    assert_eq!(fetched.verification_code.as_deref(), Some("654321"));
    assert!(fetched.verification_code_expires_at.is_some());
}

#[tokio::test]
async fn reset_token_roundtrip_is_single_use() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);
    let user = repo.create(new_user("reset@example.com")).await.unwrap();

    let token_hash = "a".repeat(64);
    repo.set_reset_token(user.id, &token_hash, Utc::now() + Duration::minutes(30))
        .await
        .unwrap();

    let found = repo.get_by_reset_token_hash(&token_hash).await.unwrap();
    assert_eq!(found.id, user.id);

    repo.complete_password_reset(user.id, "NewSecret456!")
        .await
        .unwrap();

    // Token pair is cleared in the same statement as the new hash.
    let fetched = repo.get_by_id(user.id).await.unwrap();
    assert!(fetched.reset_token_hash.is_none());
    assert!(fetched.reset_token_expires_at.is_none());
    assert_ne!(fetched.password_hash, user.password_hash);

    let err = repo.get_by_reset_token_hash(&token_hash).await.unwrap_err();
    assert!(matches!(err, HubError::NotFound { .. }));
}

#[tokio::test]
async fn soft_delete_hides_from_listing_but_keeps_the_row() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let keep = repo.create(new_user("keep@example.com")).await.unwrap();
    let gone = repo.create(new_user("gone@example.com")).await.unwrap();

    repo.delete(gone.id).await.unwrap();

    let page = repo.list(Pagination::default()).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].id, keep.id);

    // Row still exists, flagged.
    let fetched = repo.get_by_id(gone.id).await.unwrap();
    assert!(fetched.is_deleted);
}

#[tokio::test]
async fn listing_paginates() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    for i in 0..5 {
        repo.create(new_user(&format!("user{i}@example.com")))
            .await
            .unwrap();
    }

    let page = repo
        .list(Pagination {
            offset: 0,
            limit: 2,
        })
        .await
        .unwrap();
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.total, 5);

    let last = repo
        .list(Pagination {
            offset: 4,
            limit: 2,
        })
        .await
        .unwrap();
    assert_eq!(last.items.len(), 1);
    assert_eq!(last.total, 5);
}
