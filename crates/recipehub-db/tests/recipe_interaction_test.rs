//! Integration tests for recipes, categories, favorites, and comments.

use chrono::{Duration, Utc};
use recipehub_core::error::HubError;
use recipehub_core::models::category::CreateRecipeCategory;
use recipehub_core::models::comment::CreateComment;
use recipehub_core::models::favorite::CreateFavorite;
use recipehub_core::models::recipe::CreateRecipe;
use recipehub_core::models::user::CreateUser;
use recipehub_core::repository::{
    CategoryRepository, CommentRepository, FavoriteRepository, Pagination, RecipeRepository,
    UserRepository,
};
use recipehub_db::repository::{
    SurrealCategoryRepository, SurrealCommentRepository, SurrealFavoriteRepository,
    SurrealRecipeRepository, SurrealUserRepository,
};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

type Db = Surreal<surrealdb::engine::local::Db>;

async fn setup() -> (Db, Uuid) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    recipehub_db::run_migrations(&db).await.unwrap();

    let users = SurrealUserRepository::new(db.clone());
    let author = users
        .create(CreateUser {
            first_name: "Julia".into(),
            last_name: "Child".into(),
            email: "julia@example.com".into(),
            password: "SuperSecret123!".into(),
            phone_number: None,
            country: Some("US".into()),
            verification_code: "222222".into(),
            verification_code_expires_at: Utc::now() + Duration::minutes(2),
        })
        .await
        .unwrap();

    (db, author.id)
}

fn new_recipe(author_id: Uuid, title: &str) -> CreateRecipe {
    CreateRecipe {
        author_id,
        category_id: None,
        title: title.into(),
        description: Some("A classic".into()),
        content: "Whisk, fold, bake.".into(),
    }
}

#[tokio::test]
async fn create_and_get_recipe() {
    let (db, author_id) = setup().await;
    let recipes = SurrealRecipeRepository::new(db);

    let recipe = recipes
        .create(new_recipe(author_id, "Tarte Tatin"))
        .await
        .unwrap();
    assert_eq!(recipe.author_id, author_id);
    assert_eq!(recipe.title, "Tarte Tatin");
    assert!(recipe.category_id.is_none());

    let fetched = recipes.get_by_id(recipe.id).await.unwrap();
    assert_eq!(fetched.id, recipe.id);
}

#[tokio::test]
async fn recipe_with_category() {
    let (db, author_id) = setup().await;
    let categories = SurrealCategoryRepository::new(db.clone());
    let recipes = SurrealRecipeRepository::new(db);

    let category = categories
        .create(CreateRecipeCategory {
            name: "Desserts".into(),
        })
        .await
        .unwrap();

    let recipe = recipes
        .create(CreateRecipe {
            category_id: Some(category.id),
            ..new_recipe(author_id, "Crepes")
        })
        .await
        .unwrap();

    assert_eq!(recipe.category_id, Some(category.id));
}

#[tokio::test]
async fn duplicate_category_name_is_a_conflict() {
    let (db, _) = setup().await;
    let categories = SurrealCategoryRepository::new(db);

    categories
        .create(CreateRecipeCategory {
            name: "Desserts".into(),
        })
        .await
        .unwrap();
    let err = categories
        .create(CreateRecipeCategory {
            name: "Desserts".into(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, HubError::AlreadyExists { .. }), "got {err:?}");
}

#[tokio::test]
async fn list_by_author_and_list_all() {
    let (db, author_id) = setup().await;
    let recipes = SurrealRecipeRepository::new(db);

    for i in 0..3 {
        recipes
            .create(new_recipe(author_id, &format!("Recipe {i}")))
            .await
            .unwrap();
    }

    let page = recipes
        .list_by_author(author_id, Pagination::default())
        .await
        .unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(page.items.len(), 3);

    let all = recipes.list_all().await.unwrap();
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn deleting_a_recipe_removes_it() {
    let (db, author_id) = setup().await;
    let recipes = SurrealRecipeRepository::new(db);

    let recipe = recipes
        .create(new_recipe(author_id, "Short-lived"))
        .await
        .unwrap();
    recipes.delete(recipe.id).await.unwrap();

    let err = recipes.get_by_id(recipe.id).await.unwrap_err();
    assert!(matches!(err, HubError::NotFound { .. }));
}

#[tokio::test]
async fn duplicate_favorite_is_a_conflict() {
    let (db, user_id) = setup().await;
    let recipes = SurrealRecipeRepository::new(db.clone());
    let favorites = SurrealFavoriteRepository::new(db);

    let recipe = recipes
        .create(new_recipe(user_id, "Bookmarked"))
        .await
        .unwrap();

    favorites
        .create(CreateFavorite {
            user_id,
            recipe_id: recipe.id,
        })
        .await
        .unwrap();

    // No pre-check anywhere: the unique pair index is the arbiter.
    let err = favorites
        .create(CreateFavorite {
            user_id,
            recipe_id: recipe.id,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, HubError::AlreadyExists { .. }), "got {err:?}");
}

#[tokio::test]
async fn remove_favorite_then_refavorite() {
    let (db, user_id) = setup().await;
    let recipes = SurrealRecipeRepository::new(db.clone());
    let favorites = SurrealFavoriteRepository::new(db);

    let recipe = recipes
        .create(new_recipe(user_id, "On-off"))
        .await
        .unwrap();

    favorites
        .create(CreateFavorite {
            user_id,
            recipe_id: recipe.id,
        })
        .await
        .unwrap();
    favorites.delete(user_id, recipe.id).await.unwrap();

    let page = favorites
        .list_by_user(user_id, Pagination::default())
        .await
        .unwrap();
    assert_eq!(page.total, 0);

    // The pair is free again after removal.
    favorites
        .create(CreateFavorite {
            user_id,
            recipe_id: recipe.id,
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn comments_list_in_posting_order() {
    let (db, user_id) = setup().await;
    let recipes = SurrealRecipeRepository::new(db.clone());
    let comments = SurrealCommentRepository::new(db);

    let recipe = recipes
        .create(new_recipe(user_id, "Talked about"))
        .await
        .unwrap();

    for body in ["First!", "Looks delicious", "Tried it, loved it"] {
        comments
            .create(CreateComment {
                user_id,
                recipe_id: recipe.id,
                body: body.into(),
            })
            .await
            .unwrap();
    }

    let page = comments
        .list_by_recipe(recipe.id, Pagination::default())
        .await
        .unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(page.items[0].body, "First!");
    assert_eq!(page.items[2].body, "Tried it, loved it");
}
