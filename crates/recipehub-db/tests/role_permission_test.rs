//! Integration tests for the role/permission graph.

use chrono::{Duration, Utc};
use recipehub_core::error::HubError;
use recipehub_core::models::permission::CreatePermission;
use recipehub_core::models::role::CreateRole;
use recipehub_core::models::user::CreateUser;
use recipehub_core::repository::{
    Pagination, PermissionRepository, RoleRepository, UserRepository,
};
use recipehub_db::repository::{
    SurrealPermissionRepository, SurrealRoleRepository, SurrealUserRepository,
};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

async fn setup() -> Surreal<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    recipehub_db::run_migrations(&db).await.unwrap();
    db
}

async fn make_user(db: &Surreal<surrealdb::engine::local::Db>, email: &str) -> Uuid {
    let repo = SurrealUserRepository::new(db.clone());
    repo.create(CreateUser {
        first_name: "Grace".into(),
        last_name: "Hopper".into(),
        email: email.into(),
        password: "SuperSecret123!".into(),
        phone_number: None,
        country: None,
        verification_code: "111111".into(),
        verification_code_expires_at: Utc::now() + Duration::minutes(2),
    })
    .await
    .unwrap()
    .id
}

#[tokio::test]
async fn create_and_fetch_role() {
    let db = setup().await;
    let repo = SurrealRoleRepository::new(db);

    let role = repo
        .create(CreateRole {
            name: "editor".into(),
            description: "Can manage categories".into(),
        })
        .await
        .unwrap();

    let by_name = repo.get_by_name("editor").await.unwrap();
    assert_eq!(by_name.id, role.id);
    assert_eq!(by_name.description, "Can manage categories");
}

#[tokio::test]
async fn duplicate_role_name_is_a_conflict() {
    let db = setup().await;
    let repo = SurrealRoleRepository::new(db);

    let input = CreateRole {
        name: "editor".into(),
        description: String::new(),
    };
    repo.create(input.clone()).await.unwrap();
    let err = repo.create(input).await.unwrap_err();

    assert!(matches!(err, HubError::AlreadyExists { .. }), "got {err:?}");
}

#[tokio::test]
async fn assign_role_to_user_and_list() {
    let db = setup().await;
    let user_id = make_user(&db, "grace@example.com").await;
    let roles = SurrealRoleRepository::new(db);

    let editor = roles
        .create(CreateRole {
            name: "editor".into(),
            description: String::new(),
        })
        .await
        .unwrap();
    let admin = roles
        .create(CreateRole {
            name: "admin".into(),
            description: String::new(),
        })
        .await
        .unwrap();

    roles.assign_to_user(user_id, editor.id).await.unwrap();
    roles.assign_to_user(user_id, admin.id).await.unwrap();

    let mut names: Vec<String> = roles
        .get_user_roles(user_id)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.name)
        .collect();
    names.sort();
    assert_eq!(names, vec!["admin", "editor"]);
}

#[tokio::test]
async fn reassigning_a_role_is_a_noop() {
    let db = setup().await;
    let user_id = make_user(&db, "noop@example.com").await;
    let roles = SurrealRoleRepository::new(db);

    let role = roles
        .create(CreateRole {
            name: "editor".into(),
            description: String::new(),
        })
        .await
        .unwrap();

    roles.assign_to_user(user_id, role.id).await.unwrap();
    // Second assignment hits the unique edge index and is absorbed.
    roles.assign_to_user(user_id, role.id).await.unwrap();

    assert_eq!(roles.get_user_roles(user_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn unassign_removes_only_that_role() {
    let db = setup().await;
    let user_id = make_user(&db, "unassign@example.com").await;
    let roles = SurrealRoleRepository::new(db);

    let editor = roles
        .create(CreateRole {
            name: "editor".into(),
            description: String::new(),
        })
        .await
        .unwrap();
    let viewer = roles
        .create(CreateRole {
            name: "viewer".into(),
            description: String::new(),
        })
        .await
        .unwrap();

    roles.assign_to_user(user_id, editor.id).await.unwrap();
    roles.assign_to_user(user_id, viewer.id).await.unwrap();

    roles.unassign_from_user(user_id, editor.id).await.unwrap();

    let remaining = roles.get_user_roles(user_id).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].name, "viewer");
}

#[tokio::test]
async fn grant_and_revoke_permissions() {
    let db = setup().await;
    let roles = SurrealRoleRepository::new(db.clone());
    let permissions = SurrealPermissionRepository::new(db);

    let role = roles
        .create(CreateRole {
            name: "editor".into(),
            description: String::new(),
        })
        .await
        .unwrap();
    let create_category = permissions
        .create(CreatePermission {
            name: "create_category".into(),
            description: String::new(),
        })
        .await
        .unwrap();
    let delete_user = permissions
        .create(CreatePermission {
            name: "delete_user".into(),
            description: String::new(),
        })
        .await
        .unwrap();

    permissions
        .grant_to_role(role.id, create_category.id)
        .await
        .unwrap();
    permissions
        .grant_to_role(role.id, delete_user.id)
        .await
        .unwrap();
    // Re-granting is absorbed.
    permissions
        .grant_to_role(role.id, create_category.id)
        .await
        .unwrap();

    let mut names: Vec<String> = permissions
        .get_role_permissions(role.id)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    names.sort();
    assert_eq!(names, vec!["create_category", "delete_user"]);

    permissions
        .revoke_from_role(role.id, delete_user.id)
        .await
        .unwrap();

    let remaining = permissions.get_role_permissions(role.id).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].name, "create_category");
}

#[tokio::test]
async fn role_listing_paginates() {
    let db = setup().await;
    let roles = SurrealRoleRepository::new(db);

    for i in 0..3 {
        roles
            .create(CreateRole {
                name: format!("role-{i}"),
                description: String::new(),
            })
            .await
            .unwrap();
    }

    let page = roles
        .list(Pagination {
            offset: 0,
            limit: 2,
        })
        .await
        .unwrap();
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.total, 3);
}
