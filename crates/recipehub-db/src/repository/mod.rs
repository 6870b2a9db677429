//! SurrealDB repository implementations.

mod category;
mod comment;
mod favorite;
mod permission;
mod recipe;
mod role;
mod user;

pub use category::SurrealCategoryRepository;
pub use comment::SurrealCommentRepository;
pub use favorite::SurrealFavoriteRepository;
pub use permission::SurrealPermissionRepository;
pub use recipe::SurrealRecipeRepository;
pub use role::SurrealRoleRepository;
pub use user::SurrealUserRepository;
