//! Portal route table: which paths are public and which roles may open the
//! protected ones.

use crate::access::{self, AccessDecision};
use crate::identity::IdentityState;
use crate::roles::Role;

/// Path of the page hosting the socioeducational questionnaire.
pub const STUDENT_QUESTIONNAIRE_PATH: &str = "/student/questionnaire";

/// Path of the page hosting the student profile intake.
pub const TEACHER_DIAGNOSTIC_PATH: &str = "/teacher/diagnostic";

/// One entry in the route table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRule {
    /// Segment pattern; `:name` segments match any single segment.
    pub pattern: String,
    pub access: RouteAccess,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteAccess {
    Public,
    /// `None` admits every signed-in, onboarded role.
    Protected(Option<Vec<Role>>),
}

/// Result of resolving a path against the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteMatch<'a> {
    Public,
    Protected(Option<&'a [Role]>),
    Unknown,
}

#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    rules: Vec<RouteRule>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn public(mut self, pattern: &str) -> Self {
        self.rules.push(RouteRule {
            pattern: pattern.to_string(),
            access: RouteAccess::Public,
        });
        self
    }

    pub fn protected(mut self, pattern: &str, roles: &[Role]) -> Self {
        self.rules.push(RouteRule {
            pattern: pattern.to_string(),
            access: RouteAccess::Protected(Some(roles.to_vec())),
        });
        self
    }

    /// The school portal's routes.
    pub fn portal() -> Self {
        use Role::{Director, Student, SuperAdmin, Teacher};

        Self::new()
            .public(access::LOGIN_PATH)
            .public("/register")
            .protected(
                access::ONBOARDING_PATH,
                &[Teacher, Director, SuperAdmin, Student],
            )
            .protected(access::TEACHER_DASHBOARD_PATH, &[Teacher, SuperAdmin])
            .protected("/teacher/curriculum-guide", &[Teacher, SuperAdmin])
            .protected("/teacher/curriculum-guide/:subjectId", &[Teacher, SuperAdmin])
            .protected("/teacher/tools", &[Teacher, SuperAdmin])
            .protected(TEACHER_DIAGNOSTIC_PATH, &[Teacher, SuperAdmin])
            .protected(access::DIRECTOR_DASHBOARD_PATH, &[Director, SuperAdmin])
            .protected(access::ADMIN_DASHBOARD_PATH, &[SuperAdmin])
            .protected("/admin/users", &[SuperAdmin])
            .protected(access::STUDENT_DASHBOARD_PATH, &[Student])
            .protected(STUDENT_QUESTIONNAIRE_PATH, &[Student, Teacher, SuperAdmin])
    }

    /// Find the first rule whose pattern matches `path`.
    pub fn resolve(&self, path: &str) -> RouteMatch<'_> {
        let rule = self
            .rules
            .iter()
            .find(|rule| pattern_matches(&rule.pattern, path));

        match rule.map(|rule| &rule.access) {
            Some(RouteAccess::Public) => RouteMatch::Public,
            Some(RouteAccess::Protected(roles)) => RouteMatch::Protected(roles.as_deref()),
            None => RouteMatch::Unknown,
        }
    }

    /// Gate `path` using the table's allow-list.
    ///
    /// Public paths are always allowed. Unknown paths are reported as
    /// `None` so the caller can send the principal to the root.
    pub fn authorize(&self, identity: &IdentityState, path: &str) -> Option<AccessDecision> {
        match self.resolve(path) {
            RouteMatch::Public => Some(AccessDecision::Allowed),
            RouteMatch::Protected(roles) => Some(access::decide(identity, path, roles)),
            RouteMatch::Unknown => None,
        }
    }
}

/// Segment-wise match. Trailing slashes and query strings are ignored.
fn pattern_matches(pattern: &str, path: &str) -> bool {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let mut pattern_segments = segments(pattern);
    let mut path_segments = segments(path);

    loop {
        match (pattern_segments.next(), path_segments.next()) {
            (None, None) => return true,
            (Some(expected), Some(actual)) => {
                if !expected.starts_with(':') && expected != actual {
                    return false;
                }
            }
            _ => return false,
        }
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}
