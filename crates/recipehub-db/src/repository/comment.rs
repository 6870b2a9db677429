//! SurrealDB implementation of [`CommentRepository`].

use chrono::{DateTime, Utc};
use recipehub_core::error::HubResult;
use recipehub_core::models::comment::{Comment, CreateComment};
use recipehub_core::repository::{CommentRepository, PaginatedResult, Pagination};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct CommentRow {
    user_id: String,
    recipe_id: String,
    body: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct CommentRowWithId {
    record_id: String,
    user_id: String,
    recipe_id: String,
    body: String,
    created_at: DateTime<Utc>,
}

impl CommentRowWithId {
    fn try_into_comment(self) -> Result<Comment, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Query(format!("invalid UUID: {e}")))?;
        let user_id = Uuid::parse_str(&self.user_id)
            .map_err(|e| DbError::Query(format!("invalid user UUID: {e}")))?;
        let recipe_id = Uuid::parse_str(&self.recipe_id)
            .map_err(|e| DbError::Query(format!("invalid recipe UUID: {e}")))?;
        Ok(Comment {
            id,
            user_id,
            recipe_id,
            body: self.body,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Comment repository.
#[derive(Clone)]
pub struct SurrealCommentRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealCommentRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> CommentRepository for SurrealCommentRepository<C> {
    async fn create(&self, input: CreateComment) -> HubResult<Comment> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('comment', $id) SET \
                 user_id = $user_id, recipe_id = $recipe_id, \
                 body = $body",
            )
            .bind(("id", id_str.clone()))
            .bind(("user_id", input.user_id.to_string()))
            .bind(("recipe_id", input.recipe_id.to_string()))
            .bind(("body", input.body))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::from_statement("comment", e))?;

        let rows: Vec<CommentRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "comment".into(),
            id: id_str,
        })?;

        let user_id = Uuid::parse_str(&row.user_id)
            .map_err(|e| DbError::Query(format!("invalid user UUID: {e}")))?;
        let recipe_id = Uuid::parse_str(&row.recipe_id)
            .map_err(|e| DbError::Query(format!("invalid recipe UUID: {e}")))?;

        Ok(Comment {
            id,
            user_id,
            recipe_id,
            body: row.body,
            created_at: row.created_at,
        })
    }

    async fn list_by_recipe(
        &self,
        recipe_id: Uuid,
        pagination: Pagination,
    ) -> HubResult<PaginatedResult<Comment>> {
        let recipe_id_str = recipe_id.to_string();

        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM comment \
                 WHERE recipe_id = $recipe_id GROUP ALL",
            )
            .bind(("recipe_id", recipe_id_str.clone()))
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM comment \
                 WHERE recipe_id = $recipe_id \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("recipe_id", recipe_id_str))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CommentRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_comment())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
