/// Grace period past the rental deadline before a contract counts as late.
pub const LATE_GRACE_HOURS: i64 = 1;

/// Hex length of a document-store object identifier.
pub const OBJECT_ID_HEX_LENGTH: usize = 24;

/// Calendar-date format accepted by report query parameters.
pub const QUERY_DATE_FORMAT: &str = "%Y-%m-%d";
