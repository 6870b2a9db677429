//! SurrealDB implementation of [`CategoryRepository`].

use chrono::{DateTime, Utc};
use recipehub_core::error::HubResult;
use recipehub_core::models::category::{CreateRecipeCategory, RecipeCategory};
use recipehub_core::repository::{CategoryRepository, PaginatedResult, Pagination};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct CategoryRow {
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct CategoryRowWithId {
    record_id: String,
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CategoryRowWithId {
    fn try_into_category(self) -> Result<RecipeCategory, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Query(format!("invalid UUID: {e}")))?;
        Ok(RecipeCategory {
            id,
            name: self.name,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the RecipeCategory repository.
#[derive(Clone)]
pub struct SurrealCategoryRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealCategoryRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> CategoryRepository for SurrealCategoryRepository<C> {
    async fn create(&self, input: CreateRecipeCategory) -> HubResult<RecipeCategory> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query("CREATE type::record('recipe_category', $id) SET name = $name")
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::from_statement("recipe_category", e))?;

        let rows: Vec<CategoryRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "recipe_category".into(),
            id: id_str,
        })?;

        Ok(RecipeCategory {
            id,
            name: row.name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    async fn get_by_id(&self, id: Uuid) -> HubResult<RecipeCategory> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('recipe_category', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CategoryRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "recipe_category".into(),
            id: id_str,
        })?;

        Ok(RecipeCategory {
            id,
            name: row.name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    async fn list(&self, pagination: Pagination) -> HubResult<PaginatedResult<RecipeCategory>> {
        let mut count_result = self
            .db
            .query("SELECT count() AS total FROM recipe_category GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM recipe_category \
                 ORDER BY name ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CategoryRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_category())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
