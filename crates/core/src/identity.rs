//! Identity snapshot of the authenticated principal.
//!
//! Supplied by the identity provider and read by the access gate. Profile
//! fields are filled in by the onboarding flow; until then they are absent.

use serde::{Deserialize, Serialize};

use crate::roles::Role;
use crate::types::PrincipalId;

/// The principal's profile as last reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: PrincipalId,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paternal_surname: Option<String>,
    /// Tri-state: explicitly finished, explicitly unfinished, or unknown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub onboarding_complete: Option<bool>,
}

impl Identity {
    /// A freshly signed-in principal with no profile yet.
    pub fn new(id: impl Into<PrincipalId>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
            school_id: None,
            school_name: None,
            given_name: None,
            paternal_surname: None,
            onboarding_complete: None,
        }
    }

    /// Whether the principal must finish onboarding before using the portal.
    ///
    /// Super-admins are exempt. Everyone else needs the school and name
    /// fields present (empty strings count as missing) and must not be
    /// explicitly flagged as unfinished.
    pub fn needs_onboarding(&self) -> bool {
        if self.role.is_onboarding_exempt() {
            return false;
        }
        self.onboarding_complete == Some(false)
            || is_missing(&self.school_id)
            || is_missing(&self.school_name)
            || is_missing(&self.given_name)
            || is_missing(&self.paternal_surname)
    }
}

fn is_missing(field: &Option<String>) -> bool {
    field.as_deref().map_or(true, str::is_empty)
}

/// What the identity provider currently knows about the principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityState {
    /// Resolution still in flight.
    Pending,
    /// Nobody is signed in.
    SignedOut,
    SignedIn(Identity),
}

impl IdentityState {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::SignedIn(identity) => Some(identity),
            _ => None,
        }
    }
}

impl From<Option<Identity>> for IdentityState {
    fn from(identity: Option<Identity>) -> Self {
        identity.map_or(Self::SignedOut, Self::SignedIn)
    }
}
