//! Authorization service — loads the role/permission graph and
//! delegates to the pure evaluator in `recipehub-core`.

use recipehub_core::authz::{self, RoleGrants};
use recipehub_core::error::HubResult;
use recipehub_core::repository::{PermissionRepository, RoleRepository};
use uuid::Uuid;

/// Decides whether a user may execute a permission-guarded operation.
///
/// Generic over repository implementations so this layer has no
/// dependency on the database crate. The decision itself is a value:
/// `Ok(false)` is a deny, never an error; errors only signal that the
/// graph could not be loaded.
pub struct AuthzService<R: RoleRepository, P: PermissionRepository> {
    role_repo: R,
    permission_repo: P,
}

impl<R: RoleRepository, P: PermissionRepository> AuthzService<R, P> {
    pub fn new(role_repo: R, permission_repo: P) -> Self {
        Self {
            role_repo,
            permission_repo,
        }
    }

    /// Load the user's roles and their grants, then evaluate.
    ///
    /// The admin short-circuit happens before any grant is loaded:
    /// holding the `admin` role allows without touching the
    /// permission.
    pub async fn is_authorized(&self, user_id: Uuid, permission_name: &str) -> HubResult<bool> {
        let roles = self.role_repo.get_user_roles(user_id).await?;

        if roles.iter().any(|r| r.name == authz::ADMIN_ROLE) {
            return Ok(true);
        }

        let mut grants = Vec::with_capacity(roles.len());
        for role in roles {
            let permissions = self.permission_repo.get_role_permissions(role.id).await?;
            grants.push(RoleGrants { role, permissions });
        }

        Ok(authz::evaluate(&grants, permission_name))
    }
}
