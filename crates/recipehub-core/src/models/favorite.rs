//! Favorite domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user bookmarking a recipe. The `(user_id, recipe_id)` pair is
/// unique at the storage level, so concurrent duplicate adds resolve to
/// exactly one success.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Favorite {
    pub id: Uuid,
    pub user_id: Uuid,
    pub recipe_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFavorite {
    pub user_id: Uuid,
    pub recipe_id: Uuid,
}
