//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Each method is a single unit of
//! work: it commits or fails as a whole, and multi-field state
//! transitions (verification code + expiry, reset token + expiry) are
//! set or cleared together, never one without the other.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::HubResult;
use crate::models::{
    category::{CreateRecipeCategory, RecipeCategory},
    comment::{Comment, CreateComment},
    favorite::{CreateFavorite, Favorite},
    permission::{CreatePermission, Permission},
    recipe::{CreateRecipe, Recipe},
    role::{CreateRole, Role},
    user::{CreateUser, UpdateUser, User},
};

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 10,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

// ---------------------------------------------------------------------------
// Identity store
// ---------------------------------------------------------------------------

pub trait UserRepository: Send + Sync {
    /// Create an unverified user. The email unique index rejects
    /// duplicates at the storage level.
    fn create(&self, input: CreateUser) -> impl Future<Output = HubResult<User>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = HubResult<User>> + Send;
    fn get_by_email(&self, email: &str) -> impl Future<Output = HubResult<User>> + Send;
    /// Find the user holding the given reset-token hash, if pending.
    fn get_by_reset_token_hash(
        &self,
        token_hash: &str,
    ) -> impl Future<Output = HubResult<User>> + Send;
    fn update(&self, id: Uuid, input: UpdateUser) -> impl Future<Output = HubResult<User>> + Send;
    /// Replace the verification code and its expiry in one statement.
    fn set_verification_code(
        &self,
        id: Uuid,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> impl Future<Output = HubResult<()>> + Send;
    /// Mark verified and clear the code + expiry pair in one statement.
    fn mark_verified(&self, id: Uuid) -> impl Future<Output = HubResult<()>> + Send;
    /// Store the reset-token hash and its expiry in one statement,
    /// overwriting any pending reset.
    fn set_reset_token(
        &self,
        id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> impl Future<Output = HubResult<()>> + Send;
    /// Replace the password hash and clear the reset-token pair in one
    /// statement (single-use guarantee).
    fn complete_password_reset(
        &self,
        id: Uuid,
        new_password: &str,
    ) -> impl Future<Output = HubResult<()>> + Send;
    /// Re-hash and store a new password (change-password flow).
    fn update_password(
        &self,
        id: Uuid,
        new_password: &str,
    ) -> impl Future<Output = HubResult<()>> + Send;
    /// Soft-delete: sets `is_deleted`, never removes the row.
    fn delete(&self, id: Uuid) -> impl Future<Output = HubResult<()>> + Send;
    /// Non-deleted users only.
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = HubResult<PaginatedResult<User>>> + Send;
}

// ---------------------------------------------------------------------------
// Role-permission graph
// ---------------------------------------------------------------------------

pub trait RoleRepository: Send + Sync {
    fn create(&self, input: CreateRole) -> impl Future<Output = HubResult<Role>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = HubResult<Role>> + Send;
    fn get_by_name(&self, name: &str) -> impl Future<Output = HubResult<Role>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = HubResult<PaginatedResult<Role>>> + Send;

    /// Assign a role to a user. Already-assigned pairs are a no-op.
    fn assign_to_user(
        &self,
        user_id: Uuid,
        role_id: Uuid,
    ) -> impl Future<Output = HubResult<()>> + Send;

    /// Remove a role assignment from a user.
    fn unassign_from_user(
        &self,
        user_id: Uuid,
        role_id: Uuid,
    ) -> impl Future<Output = HubResult<()>> + Send;

    /// All roles assigned to a user.
    fn get_user_roles(&self, user_id: Uuid) -> impl Future<Output = HubResult<Vec<Role>>> + Send;
}

pub trait PermissionRepository: Send + Sync {
    fn create(
        &self,
        input: CreatePermission,
    ) -> impl Future<Output = HubResult<Permission>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = HubResult<Permission>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = HubResult<PaginatedResult<Permission>>> + Send;

    /// Grant a permission to a role (creates a `grants` edge).
    /// Already-granted pairs are a no-op.
    fn grant_to_role(
        &self,
        role_id: Uuid,
        permission_id: Uuid,
    ) -> impl Future<Output = HubResult<()>> + Send;

    /// Revoke a permission from a role.
    fn revoke_from_role(
        &self,
        role_id: Uuid,
        permission_id: Uuid,
    ) -> impl Future<Output = HubResult<()>> + Send;

    /// All permissions granted to a role.
    fn get_role_permissions(
        &self,
        role_id: Uuid,
    ) -> impl Future<Output = HubResult<Vec<Permission>>> + Send;
}

// ---------------------------------------------------------------------------
// Recipes & categories
// ---------------------------------------------------------------------------

pub trait RecipeRepository: Send + Sync {
    fn create(&self, input: CreateRecipe) -> impl Future<Output = HubResult<Recipe>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = HubResult<Recipe>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = HubResult<()>> + Send;
    fn list_by_author(
        &self,
        author_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = HubResult<PaginatedResult<Recipe>>> + Send;
    /// Every recipe row, unpaginated. This is the export path.
    fn list_all(&self) -> impl Future<Output = HubResult<Vec<Recipe>>> + Send;
}

pub trait CategoryRepository: Send + Sync {
    fn create(
        &self,
        input: CreateRecipeCategory,
    ) -> impl Future<Output = HubResult<RecipeCategory>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = HubResult<RecipeCategory>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = HubResult<PaginatedResult<RecipeCategory>>> + Send;
}

// ---------------------------------------------------------------------------
// Interactions
// ---------------------------------------------------------------------------

pub trait FavoriteRepository: Send + Sync {
    /// The `(user_id, recipe_id)` unique index rejects duplicates;
    /// there is deliberately no pre-existence check here.
    fn create(&self, input: CreateFavorite) -> impl Future<Output = HubResult<Favorite>> + Send;
    fn delete(
        &self,
        user_id: Uuid,
        recipe_id: Uuid,
    ) -> impl Future<Output = HubResult<()>> + Send;
    fn list_by_user(
        &self,
        user_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = HubResult<PaginatedResult<Favorite>>> + Send;
}

pub trait CommentRepository: Send + Sync {
    fn create(&self, input: CreateComment) -> impl Future<Output = HubResult<Comment>> + Send;
    fn list_by_recipe(
        &self,
        recipe_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = HubResult<PaginatedResult<Comment>>> + Send;
}
