//! SurrealDB implementation of [`UserRepository`].
//!
//! Password hashing uses Argon2id with OWASP-recommended parameters
//! (memory: 19 MiB, iterations: 2, parallelism: 1). Salt is randomly
//! generated per hash. An optional pepper (server-side secret) can be
//! provided at construction time.

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHasher};
use chrono::{DateTime, Utc};
use recipehub_core::error::HubResult;
use recipehub_core::models::user::{CreateUser, UpdateUser, User};
use recipehub_core::repository::{PaginatedResult, Pagination, UserRepository};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct UserRow {
    first_name: String,
    last_name: String,
    email: String,
    phone_number: Option<String>,
    country: Option<String>,
    profile_image: Option<String>,
    password_hash: String,
    is_verified: bool,
    is_deleted: bool,
    verification_code: Option<String>,
    verification_code_expires_at: Option<DateTime<Utc>>,
    reset_token_hash: Option<String>,
    reset_token_expires_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct UserRowWithId {
    record_id: String,
    first_name: String,
    last_name: String,
    email: String,
    phone_number: Option<String>,
    country: Option<String>,
    profile_image: Option<String>,
    password_hash: String,
    is_verified: bool,
    is_deleted: bool,
    verification_code: Option<String>,
    verification_code_expires_at: Option<DateTime<Utc>>,
    reset_token_hash: Option<String>,
    reset_token_expires_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self, id: Uuid) -> User {
        User {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone_number: self.phone_number,
            country: self.country,
            profile_image: self.profile_image,
            password_hash: self.password_hash,
            is_verified: self.is_verified,
            is_deleted: self.is_deleted,
            verification_code: self.verification_code,
            verification_code_expires_at: self.verification_code_expires_at,
            reset_token_hash: self.reset_token_hash,
            reset_token_expires_at: self.reset_token_expires_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl UserRowWithId {
    fn try_into_user(self) -> Result<User, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Query(format!("invalid UUID: {e}")))?;
        Ok(User {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone_number: self.phone_number,
            country: self.country,
            profile_image: self.profile_image,
            password_hash: self.password_hash,
            is_verified: self.is_verified,
            is_deleted: self.is_deleted,
            verification_code: self.verification_code,
            verification_code_expires_at: self.verification_code_expires_at,
            reset_token_hash: self.reset_token_hash,
            reset_token_expires_at: self.reset_token_expires_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// Hash a password with Argon2id using OWASP-recommended parameters.
///
/// If a pepper is provided, it is prepended to the password before
/// hashing. The salt is randomly generated for each call.
fn hash_password(password: &str, pepper: Option<&str>) -> Result<String, DbError> {
    // OWASP ASVS recommended: m=19456 (19 MiB), t=2, p=1
    let params = argon2::Params::new(19456, 2, 1, None)
        .map_err(|e| DbError::Query(format!("argon2 params error: {e}")))?;
    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

    let peppered: String;
    let input = match pepper {
        Some(p) => {
            peppered = format!("{p}{password}");
            peppered.as_bytes()
        }
        None => password.as_bytes(),
    };

    let salt = SaltString::generate(&mut argon2::password_hash::rand_core::OsRng);
    let hash = argon2
        .hash_password(input, &salt)
        .map_err(|e| DbError::Query(format!("password hash error: {e}")))?;

    Ok(hash.to_string())
}

/// SurrealDB implementation of the User repository.
#[derive(Clone)]
pub struct SurrealUserRepository<C: Connection> {
    db: Surreal<C>,
    /// Optional server-side pepper for password hashing.
    pepper: Option<String>,
}

impl<C: Connection> SurrealUserRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db, pepper: None }
    }

    pub fn with_pepper(db: Surreal<C>, pepper: String) -> Self {
        Self {
            db,
            pepper: Some(pepper),
        }
    }
}

impl<C: Connection> UserRepository for SurrealUserRepository<C> {
    async fn create(&self, input: CreateUser) -> HubResult<User> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let password_hash = hash_password(&input.password, self.pepper.as_deref())?;

        let result = self
            .db
            .query(
                "CREATE type::record('user', $id) SET \
                 first_name = $first_name, last_name = $last_name, \
                 email = $email, \
                 phone_number = $phone_number, country = $country, \
                 profile_image = NONE, \
                 password_hash = $password_hash, \
                 is_verified = false, is_deleted = false, \
                 verification_code = $code, \
                 verification_code_expires_at = $code_expires_at, \
                 reset_token_hash = NONE, \
                 reset_token_expires_at = NONE",
            )
            .bind(("id", id_str.clone()))
            .bind(("first_name", input.first_name))
            .bind(("last_name", input.last_name))
            .bind(("email", input.email))
            .bind(("phone_number", input.phone_number))
            .bind(("country", input.country))
            .bind(("password_hash", password_hash))
            .bind(("code", input.verification_code))
            .bind(("code_expires_at", input.verification_code_expires_at))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::from_statement("user", e))?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: id_str,
        })?;

        Ok(row.into_user(id))
    }

    async fn get_by_id(&self, id: Uuid) -> HubResult<User> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('user', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: id_str,
        })?;

        Ok(row.into_user(id))
    }

    async fn get_by_email(&self, email: &str) -> HubResult<User> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM user \
                 WHERE email = $email",
            )
            .bind(("email", email.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: format!("email={email}"),
        })?;

        Ok(row.try_into_user()?)
    }

    async fn get_by_reset_token_hash(&self, token_hash: &str) -> HubResult<User> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM user \
                 WHERE reset_token_hash = $token_hash",
            )
            .bind(("token_hash", token_hash.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: "reset_token".into(),
        })?;

        Ok(row.try_into_user()?)
    }

    async fn update(&self, id: Uuid, input: UpdateUser) -> HubResult<User> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.phone_number.is_some() {
            sets.push("phone_number = $phone_number");
        }
        if input.country.is_some() {
            sets.push("country = $country");
        }
        if input.profile_image.is_some() {
            sets.push("profile_image = $profile_image");
        }
        sets.push("updated_at = time::now()");

        let query = format!("UPDATE type::record('user', $id) SET {}", sets.join(", "));

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(phone_number) = input.phone_number {
            builder = builder.bind(("phone_number", phone_number));
        }
        if let Some(country) = input.country {
            builder = builder.bind(("country", country));
        }
        if let Some(profile_image) = input.profile_image {
            builder = builder.bind(("profile_image", profile_image));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::from_statement("user", e))?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: id_str,
        })?;

        Ok(row.into_user(id))
    }

    async fn set_verification_code(
        &self,
        id: Uuid,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> HubResult<()> {
        // Code and expiry change in one statement: both or neither.
        self.db
            .query(
                "UPDATE type::record('user', $id) SET \
                 verification_code = $code, \
                 verification_code_expires_at = $expires_at, \
                 updated_at = time::now()",
            )
            .bind(("id", id.to_string()))
            .bind(("code", code.to_string()))
            .bind(("expires_at", expires_at))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::from_statement("user", e))?;

        Ok(())
    }

    async fn mark_verified(&self, id: Uuid) -> HubResult<()> {
        // Verified flag flips and the code pair clears atomically.
        self.db
            .query(
                "UPDATE type::record('user', $id) SET \
                 is_verified = true, \
                 verification_code = NONE, \
                 verification_code_expires_at = NONE, \
                 updated_at = time::now()",
            )
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::from_statement("user", e))?;

        Ok(())
    }

    async fn set_reset_token(
        &self,
        id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> HubResult<()> {
        // A new request overwrites any pending reset.
        self.db
            .query(
                "UPDATE type::record('user', $id) SET \
                 reset_token_hash = $token_hash, \
                 reset_token_expires_at = $expires_at, \
                 updated_at = time::now()",
            )
            .bind(("id", id.to_string()))
            .bind(("token_hash", token_hash.to_string()))
            .bind(("expires_at", expires_at))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::from_statement("user", e))?;

        Ok(())
    }

    async fn complete_password_reset(&self, id: Uuid, new_password: &str) -> HubResult<()> {
        let password_hash = hash_password(new_password, self.pepper.as_deref())?;

        // New hash lands and the token pair clears in one statement, so
        // the token cannot be replayed after this commits.
        self.db
            .query(
                "UPDATE type::record('user', $id) SET \
                 password_hash = $password_hash, \
                 reset_token_hash = NONE, \
                 reset_token_expires_at = NONE, \
                 updated_at = time::now()",
            )
            .bind(("id", id.to_string()))
            .bind(("password_hash", password_hash))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::from_statement("user", e))?;

        Ok(())
    }

    async fn update_password(&self, id: Uuid, new_password: &str) -> HubResult<()> {
        let password_hash = hash_password(new_password, self.pepper.as_deref())?;

        self.db
            .query(
                "UPDATE type::record('user', $id) SET \
                 password_hash = $password_hash, \
                 updated_at = time::now()",
            )
            .bind(("id", id.to_string()))
            .bind(("password_hash", password_hash))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::from_statement("user", e))?;

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> HubResult<()> {
        // Soft-delete: the row stays, the flag flips.
        self.db
            .query(
                "UPDATE type::record('user', $id) SET \
                 is_deleted = true, updated_at = time::now()",
            )
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list(&self, pagination: Pagination) -> HubResult<PaginatedResult<User>> {
        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM user \
                 WHERE is_deleted = false GROUP ALL",
            )
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM user \
                 WHERE is_deleted = false \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_user())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
