//! RecipeHub server — application entry point.

mod config;

use std::error::Error;

use recipehub_api::{InteractionHandlers, RecipeHandlers, RoleHandlers, UserHandlers};
use recipehub_auth::{AccountService, AuthzService, LoggingMailer};
use recipehub_db::repository::{
    SurrealCategoryRepository, SurrealCommentRepository, SurrealFavoriteRepository,
    SurrealPermissionRepository, SurrealRecipeRepository, SurrealRoleRepository,
    SurrealUserRepository,
};
use recipehub_db::{DbManager, run_migrations};
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("recipehub=info".parse()?),
        )
        .json()
        .init();

    tracing::info!("Starting RecipeHub server...");

    let config = ServerConfig::from_env()?;

    let manager = DbManager::connect(&config.db).await?;
    run_migrations(manager.client()).await?;

    let db = manager.client().clone();
    let users = match config.auth.pepper.clone() {
        Some(pepper) => SurrealUserRepository::with_pepper(db.clone(), pepper),
        None => SurrealUserRepository::new(db.clone()),
    };
    let roles = SurrealRoleRepository::new(db.clone());
    let permissions = SurrealPermissionRepository::new(db.clone());
    let categories = SurrealCategoryRepository::new(db.clone());
    let recipes = SurrealRecipeRepository::new(db.clone());
    let favorites = SurrealFavoriteRepository::new(db.clone());
    let comments = SurrealCommentRepository::new(db);

    let account = AccountService::new(users.clone(), LoggingMailer, config.auth.clone());
    let authz = AuthzService::new(roles.clone(), permissions.clone());

    let _user_handlers = UserHandlers::new(users.clone(), account);
    let _role_handlers = RoleHandlers::new(roles, permissions, users.clone());
    let _recipe_handlers = RecipeHandlers::new(users.clone(), categories, recipes.clone(), authz);
    let _interaction_handlers = InteractionHandlers::new(users, recipes, favorites, comments);

    tracing::info!("Handlers wired, schema up to date");

    // TODO: mount the handler groups on an HTTP transport and map
    // ErrorCategory to status codes.

    tracing::info!("RecipeHub server stopped.");
    Ok(())
}
