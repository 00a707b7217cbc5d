//! Route access decisions.

use crate::auth::{AuthSnapshot, LOGIN_ROUTE};
use marketplace_types::Role;

/// Landing page for regular users.
pub const USER_DASHBOARD: &str = "/user/dashboard";
/// Landing page for admins.
pub const ADMIN_DASHBOARD: &str = "/admin/dashboard";

/// Outcome of a guard check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Not enough information yet; render nothing.
    Pending,
    /// Render the route.
    Allow,
    /// Navigate elsewhere.
    Redirect(&'static str),
}

/// Access rule for one route.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteGuard {
    allowed_roles: Option<Vec<Role>>,
}

impl RouteGuard {
    /// Any authenticated user.
    pub fn authenticated() -> Self {
        Self { allowed_roles: None }
    }

    /// Only the listed roles. Admins also pass wherever `user` is listed.
    pub fn roles(roles: impl IntoIterator<Item = Role>) -> Self {
        Self { allowed_roles: Some(roles.into_iter().collect()) }
    }

    pub fn admin_only() -> Self {
        Self::roles([Role::Admin])
    }

    pub fn user_only() -> Self {
        Self::roles([Role::User])
    }

    /// Whether `role` may enter, applying the admin-over-user widening.
    pub fn permits(&self, role: &Role) -> bool {
        match &self.allowed_roles {
            None => true,
            Some(allowed) => {
                allowed.contains(role) || (role.is_admin() && allowed.contains(&Role::User))
            }
        }
    }

    /// Decide what to render.
    ///
    /// `role` is `None` while the current-user query is still in flight;
    /// role-restricted routes stay [`GuardDecision::Pending`] until it
    /// resolves so unauthorized content never flashes.
    pub fn evaluate(&self, auth: AuthSnapshot, role: Option<&Role>) -> GuardDecision {
        if !auth.mounted || auth.is_loading {
            return GuardDecision::Pending;
        }
        if !auth.is_authenticated {
            return GuardDecision::Redirect(LOGIN_ROUTE);
        }
        if self.allowed_roles.is_none() {
            return GuardDecision::Allow;
        }
        let Some(role) = role else {
            return GuardDecision::Pending;
        };
        if self.permits(role) {
            GuardDecision::Allow
        } else {
            tracing::debug!("Role '{}' denied, redirecting", role);
            GuardDecision::Redirect(home_route(role))
        }
    }
}

/// Dashboard a role lands on.
pub fn home_route(role: &Role) -> &'static str {
    if role.is_admin() {
        ADMIN_DASHBOARD
    } else {
        USER_DASHBOARD
    }
}
