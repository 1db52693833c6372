/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Opaque identifier handed out by the identity provider.
pub type PrincipalId = String;
