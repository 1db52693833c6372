//! Access gate for protected portal views.
//!
//! [`decide`] runs on every protected navigation; [`decide_landing`] picks
//! where the portal root sends a principal. Both are pure: the caller
//! supplies the identity and the allowed roles and maps the outcome to a
//! redirect or a rendered view.

use serde::Serialize;

use crate::identity::IdentityState;
use crate::roles::Role;

pub const LOGIN_PATH: &str = "/login";
pub const ONBOARDING_PATH: &str = "/onboarding";
pub const ROOT_PATH: &str = "/";

pub const ADMIN_DASHBOARD_PATH: &str = "/admin/dashboard";
pub const DIRECTOR_DASHBOARD_PATH: &str = "/director/dashboard";
pub const TEACHER_DASHBOARD_PATH: &str = "/teacher/dashboard";
pub const STUDENT_DASHBOARD_PATH: &str = "/student/dashboard";

/// Outcome of gating one navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "role", rename_all = "snake_case")]
pub enum AccessDecision {
    /// Identity still resolving; show a loading affordance.
    Pending,
    Unauthenticated,
    NeedsOnboarding,
    /// Signed in and onboarded, but the role is not allowed here.
    Forbidden(Role),
    Allowed,
}

impl AccessDecision {
    /// Where the caller should navigate instead of rendering, if anywhere.
    pub fn redirect_target(&self) -> Option<&'static str> {
        match self {
            Self::Unauthenticated => Some(LOGIN_PATH),
            Self::NeedsOnboarding => Some(ONBOARDING_PATH),
            Self::Pending | Self::Forbidden(_) | Self::Allowed => None,
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// Gate a navigation to `current_path`.
///
/// Checks run in a fixed order and the first match wins: pending identity,
/// missing identity, unfinished onboarding (skipped while already on the
/// onboarding path), then the role allow-list. `allowed_roles == None`
/// admits every signed-in, onboarded role.
pub fn decide(
    identity: &IdentityState,
    current_path: &str,
    allowed_roles: Option<&[Role]>,
) -> AccessDecision {
    let identity = match identity {
        IdentityState::Pending => return AccessDecision::Pending,
        IdentityState::SignedOut => return AccessDecision::Unauthenticated,
        IdentityState::SignedIn(identity) => identity,
    };

    if identity.needs_onboarding() && current_path != ONBOARDING_PATH {
        return AccessDecision::NeedsOnboarding;
    }

    if let Some(allowed) = allowed_roles {
        if !allowed.contains(&identity.role) {
            return AccessDecision::Forbidden(identity.role);
        }
    }

    AccessDecision::Allowed
}

/// Where the portal root sends a principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "redirect", rename_all = "snake_case")]
pub enum LandingDecision {
    Pending,
    Redirect(&'static str),
}

/// Resolve the landing page for the portal root.
///
/// Uses the same super-admin-exempt onboarding rule as [`decide`].
pub fn decide_landing(identity: &IdentityState) -> LandingDecision {
    let identity = match identity {
        IdentityState::Pending => return LandingDecision::Pending,
        IdentityState::SignedOut => return LandingDecision::Redirect(LOGIN_PATH),
        IdentityState::SignedIn(identity) => identity,
    };

    if identity.needs_onboarding() {
        return LandingDecision::Redirect(ONBOARDING_PATH);
    }

    LandingDecision::Redirect(dashboard_path(identity.role).unwrap_or(LOGIN_PATH))
}

/// The dashboard a role lands on, if it has one.
pub fn dashboard_path(role: Role) -> Option<&'static str> {
    match role {
        Role::SuperAdmin => Some(ADMIN_DASHBOARD_PATH),
        Role::Director => Some(DIRECTOR_DASHBOARD_PATH),
        Role::Teacher => Some(TEACHER_DASHBOARD_PATH),
        Role::Student => Some(STUDENT_DASHBOARD_PATH),
        Role::Guest => None,
    }
}
