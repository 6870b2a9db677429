//! Recipe and category handlers.

use std::collections::HashSet;

use recipehub_core::error::HubError;
use recipehub_core::models::category::CreateRecipeCategory;
use recipehub_core::models::recipe::CreateRecipe;
use recipehub_core::repository::{
    CategoryRepository, PermissionRepository, RecipeRepository, RoleRepository, UserRepository,
};
use recipehub_core::response::HandlerReply;
use recipehub_auth::AuthzService;
use serde_json::json;
use uuid::Uuid;

use super::finish;
use crate::guard::with_permission;
use crate::validate::{
    CreateCategoriesRequest, CreateRecipeRequest, PageQuery, Validate, rejection,
};
use crate::view::{paginated, to_json};

/// Permission gating category creation.
pub const CREATE_CATEGORY: &str = "create_category";

pub struct RecipeHandlers<U, C, K, R, P>
where
    U: UserRepository,
    C: CategoryRepository,
    K: RecipeRepository,
    R: RoleRepository,
    P: PermissionRepository,
{
    users: U,
    categories: C,
    recipes: K,
    authz: AuthzService<R, P>,
}

impl<U, C, K, R, P> RecipeHandlers<U, C, K, R, P>
where
    U: UserRepository,
    C: CategoryRepository,
    K: RecipeRepository,
    R: RoleRepository,
    P: PermissionRepository,
{
    pub fn new(users: U, categories: C, recipes: K, authz: AuthzService<R, P>) -> Self {
        Self {
            users,
            categories,
            recipes,
            authz,
        }
    }

    async fn active_verified_author(
        &self,
        user_id: Uuid,
    ) -> Result<recipehub_core::models::user::User, HubError> {
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
        Ok(user)
    }

    /// Bulk category creation, guarded by `create_category`.
    ///
    /// Names are deduplicated within the request (case-insensitive);
    /// names already in the table are skipped via the unique-index
    /// conflict rather than a pre-check.
    pub async fn create_categories(
        &self,
        user_id: Uuid,
        req: CreateCategoriesRequest,
    ) -> HandlerReply {
        if let Err(errors) = req.validate() {
            return rejection(errors);
        }
        finish(
            with_permission(&self.authz, user_id, CREATE_CATEGORY, move || async move {
                self.active_verified_author(user_id).await?;

                let mut seen = HashSet::new();
                let mut created = Vec::new();
                let mut skipped_existing = 0usize;
                for name in req.names {
                    let name = name.trim().to_string();
                    if !seen.insert(name.to_lowercase()) {
                        continue;
                    }
                    match self.categories.create(CreateRecipeCategory { name }).await {
                        Ok(category) => created.push(category),
                        Err(HubError::AlreadyExists { .. }) => skipped_existing += 1,
                        Err(e) => return Err(e),
                    }
                }

                Ok(HandlerReply::success(
                    "Categories created",
                    json!({
                        "created": to_json(&created)?,
                        "skipped_existing": skipped_existing,
                    }),
                ))
            })
            .await,
        )
    }

    pub async fn list_categories(&self, query: PageQuery) -> HandlerReply {
        finish(async {
            let page = self.categories.list(query.pagination()).await?;
            Ok(HandlerReply::success(
                "Categories retrieved",
                paginated(&page)?,
            ))
        }
        .await)
    }

    /// Create a recipe for a verified author. A supplied category must
    /// exist; an absent one leaves the recipe uncategorized.
    pub async fn create_recipe(&self, user_id: Uuid, req: CreateRecipeRequest) -> HandlerReply {
        if let Err(errors) = req.validate() {
            return rejection(errors);
        }
        finish(async {
            self.active_verified_author(user_id).await?;

            if let Some(category_id) = req.category_id {
                self.categories.get_by_id(category_id).await?;
            }

            let recipe = self
                .recipes
                .create(CreateRecipe {
                    author_id: user_id,
                    category_id: req.category_id,
                    title: req.title,
                    description: req.description,
                    content: req.content,
                })
                .await?;

            Ok(HandlerReply::success("Recipe created", to_json(&recipe)?))
        }
        .await)
    }

    pub async fn get_recipe(&self, recipe_id: Uuid) -> HandlerReply {
        finish(async {
            let recipe = self.recipes.get_by_id(recipe_id).await?;
            Ok(HandlerReply::success("Recipe retrieved", to_json(&recipe)?))
        }
        .await)
    }

    pub async fn delete_recipe(&self, user_id: Uuid, recipe_id: Uuid) -> HandlerReply {
        finish(async {
            let recipe = self.recipes.get_by_id(recipe_id).await?;
            if recipe.author_id != user_id {
                return Err(HubError::AuthorizationDenied {
                    reason: "only the author may delete a recipe".into(),
                });
            }
            self.recipes.delete(recipe_id).await?;
            Ok(HandlerReply::success("Recipe deleted", json!({})))
        }
        .await)
    }

    pub async fn list_by_author(&self, author_id: Uuid, query: PageQuery) -> HandlerReply {
        finish(async {
            self.active_verified_author(author_id).await?;
            let page = self
                .recipes
                .list_by_author(author_id, query.pagination())
                .await?;
            Ok(HandlerReply::success("Recipes retrieved", paginated(&page)?))
        }
        .await)
    }

    /// Full dump of every recipe, unpaginated.
    pub async fn export_recipes(&self) -> HandlerReply {
        finish(async {
            let recipes = self.recipes.list_all().await?;
            Ok(HandlerReply::success(
                "Recipes exported",
                json!({
                    "count": recipes.len(),
                    "recipes": to_json(&recipes)?,
                }),
            ))
        }
        .await)
    }
}
