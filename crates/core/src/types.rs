//! Shared primitive type aliases.

/// All primary keys are 24-character lowercase hex strings, generated by
/// [`crate::id::new_entity_id`] and stored as TEXT.
pub type EntityId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
