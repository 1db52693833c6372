//! Identity transport.
//!
//! - [`jwt`] -- HS256 access tokens carrying the identity snapshot.

pub mod jwt;
