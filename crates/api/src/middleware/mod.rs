//! Identity and access-gate extractors.
//!
//! - [`auth::MaybeIdentity`] -- Resolves the principal from a JWT Bearer token, if any.
//! - [`gate::IntakeAccess`] -- Admits a request to an intake only when the
//!   access gate allows the page hosting it.

pub mod auth;
pub mod gate;
