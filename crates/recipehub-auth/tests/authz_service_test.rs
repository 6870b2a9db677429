//! Integration tests for the authorization service over a real
//! role/permission graph.

use chrono::{Duration, Utc};
use recipehub_auth::AuthzService;
use recipehub_core::models::permission::CreatePermission;
use recipehub_core::models::role::CreateRole;
use recipehub_core::models::user::CreateUser;
use recipehub_core::repository::{PermissionRepository, RoleRepository, UserRepository};
use recipehub_db::repository::{
    SurrealPermissionRepository, SurrealRoleRepository, SurrealUserRepository,
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
    let user = users
        .create(CreateUser {
            first_name: "Alan".into(),
            last_name: "Turing".into(),
            email: "alan@example.com".into(),
            password: "SuperSecret123!".into(),
            phone_number: None,
            country: None,
            verification_code: "333333".into(),
            verification_code_expires_at: Utc::now() + Duration::minutes(2),
        })
        .await
        .unwrap();

    (db, user.id)
}

fn service(db: &Db) -> AuthzService<
    SurrealRoleRepository<surrealdb::engine::local::Db>,
    SurrealPermissionRepository<surrealdb::engine::local::Db>,
> {
    AuthzService::new(
        SurrealRoleRepository::new(db.clone()),
        SurrealPermissionRepository::new(db.clone()),
    )
}

#[tokio::test]
async fn user_with_no_roles_is_denied() {
    let (db, user_id) = setup().await;
    let authz = service(&db);

    assert!(!authz.is_authorized(user_id, "create_category").await.unwrap());
}

#[tokio::test]
async fn granted_permission_allows_ungranted_denies() {
    let (db, user_id) = setup().await;
    let roles = SurrealRoleRepository::new(db.clone());
    let permissions = SurrealPermissionRepository::new(db.clone());
    let authz = service(&db);

    let editor = roles
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

    permissions
        .grant_to_role(editor.id, create_category.id)
        .await
        .unwrap();
    roles.assign_to_user(user_id, editor.id).await.unwrap();

    assert!(authz.is_authorized(user_id, "create_category").await.unwrap());
    assert!(!authz.is_authorized(user_id, "delete_user").await.unwrap());
}

#[tokio::test]
async fn any_of_several_roles_may_grant() {
    let (db, user_id) = setup().await;
    let roles = SurrealRoleRepository::new(db.clone());
    let permissions = SurrealPermissionRepository::new(db.clone());
    let authz = service(&db);

    let viewer = roles
        .create(CreateRole {
            name: "viewer".into(),
            description: String::new(),
        })
        .await
        .unwrap();
    let editor = roles
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

    // Only the second role carries the grant.
    permissions
        .grant_to_role(editor.id, create_category.id)
        .await
        .unwrap();
    roles.assign_to_user(user_id, viewer.id).await.unwrap();
    roles.assign_to_user(user_id, editor.id).await.unwrap();

    assert!(authz.is_authorized(user_id, "create_category").await.unwrap());
}

#[tokio::test]
async fn admin_role_bypasses_grants_entirely() {
    let (db, user_id) = setup().await;
    let roles = SurrealRoleRepository::new(db.clone());
    let authz = service(&db);

    let admin = roles
        .create(CreateRole {
            name: "admin".into(),
            description: "Super user".into(),
        })
        .await
        .unwrap();
    roles.assign_to_user(user_id, admin.id).await.unwrap();

    // No permission rows exist at all; admin still passes, even for
    // names nobody ever defined.
    assert!(authz.is_authorized(user_id, "create_category").await.unwrap());
    assert!(authz.is_authorized(user_id, "no_such_permission").await.unwrap());
}

#[tokio::test]
async fn unknown_permission_name_is_just_a_deny() {
    let (db, user_id) = setup().await;
    let roles = SurrealRoleRepository::new(db.clone());
    let authz = service(&db);

    let editor = roles
        .create(CreateRole {
            name: "editor".into(),
            description: String::new(),
        })
        .await
        .unwrap();
    roles.assign_to_user(user_id, editor.id).await.unwrap();

    // Never an error, merely false.
    assert!(!authz.is_authorized(user_id, "does_not_exist").await.unwrap());
}
