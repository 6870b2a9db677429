//! SurrealDB implementation of [`RecipeRepository`].

use chrono::{DateTime, Utc};
use recipehub_core::error::HubResult;
use recipehub_core::models::recipe::{CreateRecipe, Recipe};
use recipehub_core::repository::{PaginatedResult, Pagination, RecipeRepository};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct RecipeRow {
    author_id: String,
    category_id: Option<String>,
    title: String,
    description: Option<String>,
    content: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct RecipeRowWithId {
    record_id: String,
    author_id: String,
    category_id: Option<String>,
    title: String,
    description: Option<String>,
    content: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_category(category_id: Option<String>) -> Result<Option<Uuid>, DbError> {
    category_id
        .map(|c| {
            Uuid::parse_str(&c).map_err(|e| DbError::Query(format!("invalid category UUID: {e}")))
        })
        .transpose()
}

impl RecipeRow {
    fn into_recipe(self, id: Uuid) -> Result<Recipe, DbError> {
        let author_id = Uuid::parse_str(&self.author_id)
            .map_err(|e| DbError::Query(format!("invalid author UUID: {e}")))?;
        Ok(Recipe {
            id,
            author_id,
            category_id: parse_category(self.category_id)?,
            title: self.title,
            description: self.description,
            content: self.content,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl RecipeRowWithId {
    fn try_into_recipe(self) -> Result<Recipe, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Query(format!("invalid UUID: {e}")))?;
        let author_id = Uuid::parse_str(&self.author_id)
            .map_err(|e| DbError::Query(format!("invalid author UUID: {e}")))?;
        Ok(Recipe {
            id,
            author_id,
            category_id: parse_category(self.category_id)?,
            title: self.title,
            description: self.description,
            content: self.content,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Recipe repository.
#[derive(Clone)]
pub struct SurrealRecipeRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealRecipeRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> RecipeRepository for SurrealRecipeRepository<C> {
    async fn create(&self, input: CreateRecipe) -> HubResult<Recipe> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('recipe', $id) SET \
                 author_id = $author_id, \
                 category_id = $category_id, \
                 title = $title, description = $description, \
                 content = $content",
            )
            .bind(("id", id_str.clone()))
            .bind(("author_id", input.author_id.to_string()))
            .bind(("category_id", input.category_id.map(|c| c.to_string())))
            .bind(("title", input.title))
            .bind(("description", input.description))
            .bind(("content", input.content))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::from_statement("recipe", e))?;

        let rows: Vec<RecipeRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "recipe".into(),
            id: id_str,
        })?;

        Ok(row.into_recipe(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> HubResult<Recipe> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('recipe', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RecipeRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "recipe".into(),
            id: id_str,
        })?;

        Ok(row.into_recipe(id)?)
    }

    async fn delete(&self, id: Uuid) -> HubResult<()> {
        self.db
            .query("DELETE type::record('recipe', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list_by_author(
        &self,
        author_id: Uuid,
        pagination: Pagination,
    ) -> HubResult<PaginatedResult<Recipe>> {
        let author_id_str = author_id.to_string();

        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM recipe \
                 WHERE author_id = $author_id GROUP ALL",
            )
            .bind(("author_id", author_id_str.clone()))
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM recipe \
                 WHERE author_id = $author_id \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("author_id", author_id_str))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RecipeRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_recipe())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn list_all(&self) -> HubResult<Vec<Recipe>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM recipe \
                 ORDER BY created_at ASC",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RecipeRowWithId> = result.take(0).map_err(DbError::from)?;

        let recipes = rows
            .into_iter()
            .map(|row| row.try_into_recipe())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(recipes)
    }
}
