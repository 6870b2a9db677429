//! Favorites and comments.

use recipehub_core::error::HubError;
use recipehub_core::models::comment::CreateComment;
use recipehub_core::models::favorite::CreateFavorite;
use recipehub_core::repository::{
    CommentRepository, FavoriteRepository, RecipeRepository, UserRepository,
};
use recipehub_core::response::HandlerReply;
use serde_json::json;
use uuid::Uuid;

use super::finish;
use crate::validate::{CreateCommentRequest, FavoriteRequest, PageQuery, Validate, rejection};
use crate::view::{paginated, to_json};

pub struct InteractionHandlers<U, K, F, C>
where
    U: UserRepository,
    K: RecipeRepository,
    F: FavoriteRepository,
    C: CommentRepository,
{
    users: U,
    recipes: K,
    favorites: F,
    comments: C,
}

impl<U, K, F, C> InteractionHandlers<U, K, F, C>
where
    U: UserRepository,
    K: RecipeRepository,
    F: FavoriteRepository,
    C: CommentRepository,
{
    pub fn new(users: U, recipes: K, favorites: F, comments: C) -> Self {
        Self {
            users,
            recipes,
            favorites,
            comments,
        }
    }

    async fn active_verified_user(&self, user_id: Uuid) -> Result<(), HubError> {
        let user = self.users.get_by_id(user_id).await?;
        if user.is_deleted {
            return Err(HubError::NotFound {
                entity: "user".into(),
                id: user_id.to_string(),
            });
        }
        if !user.is_verified {
            return Err(HubError::State {
                message: "account is not verified".into(),
            });
        }
        Ok(())
    }

    /// Bookmark a recipe. The `(user, recipe)` unique index turns a
    /// duplicate into a conflict, so concurrent double-adds resolve to
    /// one success without any pre-check here.
    pub async fn add_favorite(&self, user_id: Uuid, req: FavoriteRequest) -> HandlerReply {
        finish(async {
            self.active_verified_user(user_id).await?;
            self.recipes.get_by_id(req.recipe_id).await?;

            let favorite = self
                .favorites
                .create(CreateFavorite {
                    user_id,
                    recipe_id: req.recipe_id,
                })
                .await?;

            Ok(HandlerReply::success(
                "Recipe added to favorites",
                to_json(&favorite)?,
            ))
        }
        .await)
    }

    pub async fn remove_favorite(&self, user_id: Uuid, recipe_id: Uuid) -> HandlerReply {
        finish(async {
            self.favorites.delete(user_id, recipe_id).await?;
            Ok(HandlerReply::success("Recipe removed from favorites", json!({})))
        }
        .await)
    }

    pub async fn list_favorites(&self, user_id: Uuid, query: PageQuery) -> HandlerReply {
        finish(async {
            let page = self
                .favorites
                .list_by_user(user_id, query.pagination())
                .await?;
            Ok(HandlerReply::success(
                "Favorites retrieved",
                paginated(&page)?,
            ))
        }
        .await)
    }

    pub async fn create_comment(&self, user_id: Uuid, req: CreateCommentRequest) -> HandlerReply {
        if let Err(errors) = req.validate() {
            return rejection(errors);
        }
        finish(async {
            self.active_verified_user(user_id).await?;
            self.recipes.get_by_id(req.recipe_id).await?;

            let comment = self
                .comments
                .create(CreateComment {
                    user_id,
                    recipe_id: req.recipe_id,
                    body: req.body,
                })
                .await?;

            Ok(HandlerReply::success("Comment posted", to_json(&comment)?))
        }
        .await)
    }

    pub async fn list_comments(&self, recipe_id: Uuid, query: PageQuery) -> HandlerReply {
        finish(async {
            self.recipes.get_by_id(recipe_id).await?;
            let page = self
                .comments
                .list_by_recipe(recipe_id, query.pagination())
                .await?;
            Ok(HandlerReply::success("Comments retrieved", paginated(&page)?))
        }
        .await)
    }
}
