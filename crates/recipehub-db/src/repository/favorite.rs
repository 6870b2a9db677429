//! SurrealDB implementation of [`FavoriteRepository`].
//!
//! Duplicate `(user_id, recipe_id)` pairs are rejected by the unique
//! index, never by a read-then-write check: two concurrent adds for
//! the same pair resolve to one success and one conflict.

use chrono::{DateTime, Utc};
use recipehub_core::error::HubResult;
use recipehub_core::models::favorite::{CreateFavorite, Favorite};
use recipehub_core::repository::{FavoriteRepository, PaginatedResult, Pagination};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct FavoriteRow {
    user_id: String,
    recipe_id: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct FavoriteRowWithId {
    record_id: String,
    user_id: String,
    recipe_id: String,
    created_at: DateTime<Utc>,
}

impl FavoriteRowWithId {
    fn try_into_favorite(self) -> Result<Favorite, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Query(format!("invalid UUID: {e}")))?;
        let user_id = Uuid::parse_str(&self.user_id)
            .map_err(|e| DbError::Query(format!("invalid user UUID: {e}")))?;
        let recipe_id = Uuid::parse_str(&self.recipe_id)
            .map_err(|e| DbError::Query(format!("invalid recipe UUID: {e}")))?;
        Ok(Favorite {
            id,
            user_id,
            recipe_id,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Favorite repository.
#[derive(Clone)]
pub struct SurrealFavoriteRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealFavoriteRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> FavoriteRepository for SurrealFavoriteRepository<C> {
    async fn create(&self, input: CreateFavorite) -> HubResult<Favorite> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('favorite', $id) SET \
                 user_id = $user_id, recipe_id = $recipe_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("user_id", input.user_id.to_string()))
            .bind(("recipe_id", input.recipe_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::from_statement("favorite", e))?;

        let rows: Vec<FavoriteRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "favorite".into(),
            id: id_str,
        })?;

        let user_id = Uuid::parse_str(&row.user_id)
            .map_err(|e| DbError::Query(format!("invalid user UUID: {e}")))?;
        let recipe_id = Uuid::parse_str(&row.recipe_id)
            .map_err(|e| DbError::Query(format!("invalid recipe UUID: {e}")))?;

        Ok(Favorite {
            id,
            user_id,
            recipe_id,
            created_at: row.created_at,
        })
    }

    async fn delete(&self, user_id: Uuid, recipe_id: Uuid) -> HubResult<()> {
        self.db
            .query(
                "DELETE favorite WHERE \
                 user_id = $user_id AND recipe_id = $recipe_id",
            )
            .bind(("user_id", user_id.to_string()))
            .bind(("recipe_id", recipe_id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        pagination: Pagination,
    ) -> HubResult<PaginatedResult<Favorite>> {
        let user_id_str = user_id.to_string();

        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM favorite \
                 WHERE user_id = $user_id GROUP ALL",
            )
            .bind(("user_id", user_id_str.clone()))
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM favorite \
                 WHERE user_id = $user_id \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("user_id", user_id_str))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<FavoriteRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_favorite())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
