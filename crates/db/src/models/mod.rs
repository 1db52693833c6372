//! Row structs for the tables this crate owns.

pub mod submission;
