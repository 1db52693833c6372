use crate::roles::Role;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Onboarding required before accessing {0}")]
    OnboardingRequired(String),

    #[error("Forbidden for role {0}")]
    Forbidden(Role),

    #[error("Submission failed: {0}")]
    SubmissionFailed(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
