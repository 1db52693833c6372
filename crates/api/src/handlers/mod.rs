pub mod access;
pub mod intake;
