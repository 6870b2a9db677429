//! Authentication and authorization guards shared by the handlers.

use recipehub_core::error::{HubError, HubResult};
use recipehub_core::models::user::User;
use recipehub_core::repository::{PermissionRepository, RoleRepository, UserRepository};
use recipehub_auth::AccessTokenClaims;
use recipehub_auth::AuthzService;
use uuid::Uuid;

/// Resolve validated token claims to a live account.
///
/// A malformed subject, an unknown ID, and a soft-deleted account all
/// fail identically so the response never reveals which it was.
pub async fn current_user<U: UserRepository>(
    users: &U,
    claims: &AccessTokenClaims,
) -> HubResult<User> {
    let denied = || HubError::AuthenticationFailed {
        reason: "account not recognized".into(),
    };

    let user_id = Uuid::parse_str(&claims.sub).map_err(|_| denied())?;

    let user = match users.get_by_id(user_id).await {
        Ok(u) => u,
        Err(HubError::NotFound { .. }) => return Err(denied()),
        Err(e) => return Err(e),
    };

    if user.is_deleted {
        return Err(denied());
    }

    Ok(user)
}

/// Run `handler` only if the user holds `permission` (or the admin
/// role). A deny never reaches the handler.
pub async fn with_permission<R, P, F, Fut, T>(
    authz: &AuthzService<R, P>,
    user_id: Uuid,
    permission: &str,
    handler: F,
) -> HubResult<T>
where
    R: RoleRepository,
    P: PermissionRepository,
    F: FnOnce() -> Fut,
    Fut: Future<Output = HubResult<T>>,
{
    if !authz.is_authorized(user_id, permission).await? {
        return Err(HubError::AuthorizationDenied {
            reason: format!("requires permission '{permission}'"),
        });
    }
    handler().await
}
