//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings. Uniqueness invariants (user email,
//! role/permission/category names, favorite pairs, graph edges) are
//! enforced by UNIQUE indexes so that concurrent duplicate writes
//! resolve at the storage level, not in handler logic.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Users
-- =======================================================================
DEFINE TABLE user SCHEMAFULL;
DEFINE FIELD first_name ON TABLE user TYPE string;
DEFINE FIELD last_name ON TABLE user TYPE string;
DEFINE FIELD email ON TABLE user TYPE string;
DEFINE FIELD phone_number ON TABLE user TYPE option<string>;
DEFINE FIELD country ON TABLE user TYPE option<string>;
DEFINE FIELD profile_image ON TABLE user TYPE option<string>;
DEFINE FIELD password_hash ON TABLE user TYPE string;
DEFINE FIELD is_verified ON TABLE user TYPE bool DEFAULT false;
DEFINE FIELD is_deleted ON TABLE user TYPE bool DEFAULT false;
DEFINE FIELD verification_code ON TABLE user TYPE option<string>;
DEFINE FIELD verification_code_expires_at ON TABLE user \
    TYPE option<datetime>;
DEFINE FIELD reset_token_hash ON TABLE user TYPE option<string>;
DEFINE FIELD reset_token_expires_at ON TABLE user TYPE option<datetime>;
DEFINE FIELD created_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_user_email ON TABLE user COLUMNS email UNIQUE;
DEFINE INDEX idx_user_reset_token ON TABLE user \
    COLUMNS reset_token_hash;

-- =======================================================================
-- Roles
-- =======================================================================
DEFINE TABLE role SCHEMAFULL;
DEFINE FIELD name ON TABLE role TYPE string;
DEFINE FIELD description ON TABLE role TYPE string;
DEFINE FIELD created_at ON TABLE role TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE role TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_role_name ON TABLE role COLUMNS name UNIQUE;

-- =======================================================================
-- Permissions
-- =======================================================================
DEFINE TABLE permission SCHEMAFULL;
DEFINE FIELD name ON TABLE permission TYPE string;
DEFINE FIELD description ON TABLE permission TYPE string;
DEFINE FIELD created_at ON TABLE permission TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE permission TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_permission_name ON TABLE permission \
    COLUMNS name UNIQUE;

-- =======================================================================
-- Recipe categories
-- =======================================================================
DEFINE TABLE recipe_category SCHEMAFULL;
DEFINE FIELD name ON TABLE recipe_category TYPE string;
DEFINE FIELD created_at ON TABLE recipe_category TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE recipe_category TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_category_name ON TABLE recipe_category \
    COLUMNS name UNIQUE;

-- =======================================================================
-- Recipes
-- =======================================================================
DEFINE TABLE recipe SCHEMAFULL;
DEFINE FIELD author_id ON TABLE recipe TYPE string;
DEFINE FIELD category_id ON TABLE recipe TYPE option<string>;
DEFINE FIELD title ON TABLE recipe TYPE string;
DEFINE FIELD description ON TABLE recipe TYPE option<string>;
DEFINE FIELD content ON TABLE recipe TYPE string;
DEFINE FIELD created_at ON TABLE recipe TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE recipe TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_recipe_author ON TABLE recipe COLUMNS author_id;

-- =======================================================================
-- Favorites
-- =======================================================================
DEFINE TABLE favorite SCHEMAFULL;
DEFINE FIELD user_id ON TABLE favorite TYPE string;
DEFINE FIELD recipe_id ON TABLE favorite TYPE string;
DEFINE FIELD created_at ON TABLE favorite TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_favorite_pair ON TABLE favorite \
    COLUMNS user_id, recipe_id UNIQUE;

-- =======================================================================
-- Comments
-- =======================================================================
DEFINE TABLE comment SCHEMAFULL;
DEFINE FIELD user_id ON TABLE comment TYPE string;
DEFINE FIELD recipe_id ON TABLE comment TYPE string;
DEFINE FIELD body ON TABLE comment TYPE string;
DEFINE FIELD created_at ON TABLE comment TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_comment_recipe ON TABLE comment COLUMNS recipe_id;

-- =======================================================================
-- Graph Edge Tables (relations)
-- =======================================================================

-- User -> Role assignment
DEFINE TABLE has_role TYPE RELATION SCHEMAFULL;
DEFINE INDEX idx_has_role_pair ON TABLE has_role COLUMNS in, out UNIQUE;

-- Role -> Permission grants
DEFINE TABLE grants TYPE RELATION SCHEMAFULL;
DEFINE INDEX idx_grants_pair ON TABLE grants COLUMNS in, out UNIQUE;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    // Determine current schema version.
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            // Record the applied migration.
            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}

/// Returns the raw schema DDL for version 1.
///
/// Exposed for testing with in-memory SurrealDB instances that
/// bypass the migration runner.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_v1_is_nonempty() {
        assert!(!SCHEMA_V1.is_empty());
    }

    #[test]
    fn migrations_are_ordered() {
        for window in MIGRATIONS.windows(2) {
            assert!(
                window[0].version < window[1].version,
                "Migrations must be in ascending version order"
            );
        }
    }

    #[test]
    fn uniqueness_invariants_are_constraint_level() {
        // Email, favorite pair, and both edge tables must be unique
        // indexes; handlers rely on the storage layer for these.
        assert!(SCHEMA_V1.contains("COLUMNS email UNIQUE"));
        assert!(SCHEMA_V1.contains("COLUMNS user_id, recipe_id UNIQUE"));
        assert!(SCHEMA_V1.contains("idx_has_role_pair"));
        assert!(SCHEMA_V1.contains("idx_grants_pair"));
    }
}
