//! Domain logic for the school portal: roles and identity, the access gate,
//! the route table, and the resumable intake questionnaires.
//!
//! Nothing here touches the network or the database. Storage and the
//! submission write path sit behind traits so the api and db crates can
//! plug in real backends.

pub mod access;
pub mod completion;
pub mod draft_store;
pub mod error;
pub mod identity;
pub mod intake;
pub mod roles;
pub mod routes;
pub mod storage;
pub mod submission;
pub mod types;
pub mod wizard;
