//! Role and permission administration handlers.
//!
//! These are admin-surface operations; the transport guards them with
//! `manage_roles` via [`with_permission`](crate::guard::with_permission).

use recipehub_core::error::HubError;
use recipehub_core::models::{permission::CreatePermission, role::CreateRole};
use recipehub_core::repository::{PermissionRepository, RoleRepository, UserRepository};
use recipehub_core::response::HandlerReply;
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use super::finish;
use crate::validate::{
    AssignPermissionsRequest, AssignRolesRequest, CreatePermissionRequest, CreateRoleRequest,
    PageQuery, Validate, rejection,
};
use crate::view::{paginated, to_json};

pub struct RoleHandlers<R, P, U>
where
    R: RoleRepository,
    P: PermissionRepository,
    U: UserRepository,
{
    roles: R,
    permissions: P,
    users: U,
}

impl<R, P, U> RoleHandlers<R, P, U>
where
    R: RoleRepository,
    P: PermissionRepository,
    U: UserRepository,
{
    pub fn new(roles: R, permissions: P, users: U) -> Self {
        Self {
            roles,
            permissions,
            users,
        }
    }

    pub async fn create_role(&self, req: CreateRoleRequest) -> HandlerReply {
        if let Err(errors) = req.validate() {
            return rejection(errors);
        }
        finish(async {
            let role = self
                .roles
                .create(CreateRole {
                    name: req.name,
                    description: req.description,
                })
                .await?;
            Ok(HandlerReply::success("Role created", to_json(&role)?))
        }
        .await)
    }

    pub async fn create_permission(&self, req: CreatePermissionRequest) -> HandlerReply {
        if let Err(errors) = req.validate() {
            return rejection(errors);
        }
        finish(async {
            let permission = self
                .permissions
                .create(CreatePermission {
                    name: req.name,
                    description: req.description,
                })
                .await?;
            Ok(HandlerReply::success(
                "Permission created",
                to_json(&permission)?,
            ))
        }
        .await)
    }

    /// Grant each resolvable permission to the role. IDs that resolve
    /// to nothing are skipped, not fatal; grants already in place are
    /// no-ops.
    pub async fn assign_permissions_to_role(
        &self,
        role_id: Uuid,
        req: AssignPermissionsRequest,
    ) -> HandlerReply {
        if let Err(errors) = req.validate() {
            return rejection(errors);
        }
        finish(async {
            let role = self.roles.get_by_id(role_id).await?;

            let mut granted = Vec::new();
            for permission_id in req.permission_ids {
                match self.permissions.get_by_id(permission_id).await {
                    Ok(permission) => {
                        self.permissions.grant_to_role(role.id, permission.id).await?;
                        granted.push(permission.name);
                    }
                    Err(HubError::NotFound { .. }) => {
                        debug!(%permission_id, "skipping unknown permission");
                    }
                    Err(e) => return Err(e),
                }
            }

            Ok(HandlerReply::success(
                "Permissions assigned to role",
                json!({ "role": role.name, "granted": granted }),
            ))
        }
        .await)
    }

    /// Assign each resolvable role to the user, same skip semantics as
    /// permission grants.
    pub async fn assign_roles_to_user(
        &self,
        user_id: Uuid,
        req: AssignRolesRequest,
    ) -> HandlerReply {
        if let Err(errors) = req.validate() {
            return rejection(errors);
        }
        finish(async {
            let user = self.users.get_by_id(user_id).await?;
            if user.is_deleted {
                return Err(HubError::NotFound {
                    entity: "user".into(),
                    id: user_id.to_string(),
                });
            }

            let mut assigned = Vec::new();
            for role_id in req.role_ids {
                match self.roles.get_by_id(role_id).await {
                    Ok(role) => {
                        self.roles.assign_to_user(user.id, role.id).await?;
                        assigned.push(role.name);
                    }
                    Err(HubError::NotFound { .. }) => {
                        debug!(%role_id, "skipping unknown role");
                    }
                    Err(e) => return Err(e),
                }
            }

            Ok(HandlerReply::success(
                "Roles assigned to user",
                json!({ "user_id": user.id, "assigned": assigned }),
            ))
        }
        .await)
    }

    pub async fn list_roles(&self, query: PageQuery) -> HandlerReply {
        finish(async {
            let page = self.roles.list(query.pagination()).await?;
            Ok(HandlerReply::success("Roles retrieved", paginated(&page)?))
        }
        .await)
    }

    pub async fn list_permissions(&self, query: PageQuery) -> HandlerReply {
        finish(async {
            let page = self.permissions.list(query.pagination()).await?;
            Ok(HandlerReply::success(
                "Permissions retrieved",
                paginated(&page)?,
            ))
        }
        .await)
    }

    pub async fn user_roles(&self, user_id: Uuid) -> HandlerReply {
        finish(async {
            let roles = self.roles.get_user_roles(user_id).await?;
            Ok(HandlerReply::success("User roles retrieved", to_json(&roles)?))
        }
        .await)
    }

    pub async fn role_permissions(&self, role_id: Uuid) -> HandlerReply {
        finish(async {
            let permissions = self.permissions.get_role_permissions(role_id).await?;
            Ok(HandlerReply::success(
                "Role permissions retrieved",
                to_json(&permissions)?,
            ))
        }
        .await)
    }
}
