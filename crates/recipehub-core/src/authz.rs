//! Authorization evaluator.
//!
//! A pure allow/deny decision over already-loaded role/permission data.
//! Loading the data from storage is the job of the auth layer; this
//! module performs no I/O and never returns an error: deny is a value,
//! and the caller translates it into a forbidden response.

use crate::models::{permission::Permission, role::Role};

/// Name of the super-user role that bypasses explicit grants. Exists so
/// operational/bootstrap accounts can never be locked out by a missing
/// grant.
pub const ADMIN_ROLE: &str = "admin";

/// A role together with its granted permissions, as loaded from the
/// role-permission graph.
#[derive(Debug, Clone)]
pub struct RoleGrants {
    pub role: Role,
    pub permissions: Vec<Permission>,
}

impl RoleGrants {
    fn grants(&self, permission_name: &str) -> bool {
        self.permissions.iter().any(|p| p.name == permission_name)
    }
}

/// Decide whether a user holding `roles` may perform the operation
/// guarded by `permission_name`.
///
/// 1. A role named `admin` allows unconditionally.
/// 2. Otherwise allow iff any role's permission set contains the name.
/// 3. Otherwise deny. A user with zero roles is always denied.
///
/// A permission name absent from the catalog altogether denies exactly
/// like a missing grant; no existence check is performed.
pub fn evaluate(roles: &[RoleGrants], permission_name: &str) -> bool {
    if roles.iter().any(|rg| rg.role.name == ADMIN_ROLE) {
        return true;
    }
    roles.iter().any(|rg| rg.grants(permission_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn role(name: &str) -> Role {
        Role {
            id: Uuid::new_v4(),
            name: name.into(),
            description: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn permission(name: &str) -> Permission {
        Permission {
            id: Uuid::new_v4(),
            name: name.into(),
            description: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn grants(role_name: &str, perms: &[&str]) -> RoleGrants {
        RoleGrants {
            role: role(role_name),
            permissions: perms.iter().map(|p| permission(p)).collect(),
        }
    }

    #[test]
    fn admin_bypasses_explicit_grants() {
        // No grants at all, only the role name matters.
        let roles = [grants("admin", &[])];
        assert!(evaluate(&roles, "delete_user"));
        assert!(evaluate(&roles, "permission_that_does_not_exist"));
    }

    #[test]
    fn grant_membership_allows() {
        let roles = [grants("editor", &["create_category"])];
        assert!(evaluate(&roles, "create_category"));
        assert!(!evaluate(&roles, "delete_user"));
    }

    #[test]
    fn zero_roles_always_denies() {
        assert!(!evaluate(&[], "create_category"));
        assert!(!evaluate(&[], "anything_at_all"));
    }

    #[test]
    fn any_role_with_the_grant_suffices() {
        let roles = [
            grants("viewer", &["read_recipe"]),
            grants("moderator", &["delete_comment", "create_category"]),
        ];
        assert!(evaluate(&roles, "create_category"));
        assert!(evaluate(&roles, "read_recipe"));
        assert!(!evaluate(&roles, "delete_user"));
    }

    #[test]
    fn unknown_permission_denies_like_a_missing_grant() {
        // No catalog existence check: an undefined name is just a deny.
        let roles = [grants("editor", &["create_category"])];
        assert!(!evaluate(&roles, "no_such_permission"));
    }
}
