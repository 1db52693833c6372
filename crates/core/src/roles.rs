//! Portal roles.
//!
//! The role set is closed. String forms are what the identity provider
//! writes into token claims and what route tables list.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const ROLE_SUPERADMIN: &str = "superadmin";
pub const ROLE_DIRECTOR: &str = "director";
pub const ROLE_TEACHER: &str = "teacher";
pub const ROLE_STUDENT: &str = "student";
pub const ROLE_GUEST: &str = "guest";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[serde(rename = "superadmin")]
    SuperAdmin,
    Director,
    Teacher,
    Student,
    Guest,
}

impl Role {
    /// All roles, most privileged first.
    pub const ALL: [Role; 5] = [
        Role::SuperAdmin,
        Role::Director,
        Role::Teacher,
        Role::Student,
        Role::Guest,
    ];

    /// Parse a role name as stored in claims.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            ROLE_SUPERADMIN => Ok(Self::SuperAdmin),
            ROLE_DIRECTOR => Ok(Self::Director),
            ROLE_TEACHER => Ok(Self::Teacher),
            ROLE_STUDENT => Ok(Self::Student),
            ROLE_GUEST => Ok(Self::Guest),
            _ => Err(CoreError::Validation(format!(
                "Invalid role '{s}'. Must be one of: superadmin, director, teacher, student, guest"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SuperAdmin => ROLE_SUPERADMIN,
            Self::Director => ROLE_DIRECTOR,
            Self::Teacher => ROLE_TEACHER,
            Self::Student => ROLE_STUDENT,
            Self::Guest => ROLE_GUEST,
        }
    }

    /// Super-admins are never sent through onboarding.
    pub fn is_onboarding_exempt(&self) -> bool {
        matches!(self, Self::SuperAdmin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
