use bson::oid::ObjectId;
use chrono::NaiveDate;

use crate::error::AppError;
use easyloc_shared::{OBJECT_ID_HEX_LENGTH, QUERY_DATE_FORMAT};

/// Parse a document-store identifier. A structurally invalid id is a
/// validation failure and must never reach the store.
pub fn parse_object_id(raw: &str) -> Result<ObjectId, AppError> {
    if raw.len() != OBJECT_ID_HEX_LENGTH || !raw.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(AppError::Validation(format!(
            "'{}' is not a valid document id.",
            raw
        )));
    }
    ObjectId::parse_str(raw)
        .map_err(|_| AppError::Validation(format!("'{}' is not a valid document id.", raw)))
}

/// Parse a relational primary key.
pub fn parse_integer_id(raw: &str) -> Result<i32, AppError> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| AppError::Validation(format!("'{}' is not a valid integer id.", raw)))
}

/// Parse a calendar date used by report query parameters.
pub fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, QUERY_DATE_FORMAT).map_err(|_| {
        AppError::Validation(format!(
            "'{}' is not a valid date (expected YYYY-MM-DD).",
            raw
        ))
    })
}

/// Parse a boolean query flag.
pub fn parse_bool(raw: &str) -> Result<bool, AppError> {
    match raw {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(AppError::Validation(format!(
            "'{}' is not a valid boolean flag (expected true or false).",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_id_requires_24_hex_characters() {
        assert!(parse_object_id("0123456789abcdef01234567").is_ok());
        assert!(parse_object_id("0123456789ABCDEF01234567").is_ok());

        assert!(parse_object_id("too-short").is_err());
        assert!(parse_object_id("0123456789abcdef0123456z").is_err()); // non-hex
        assert!(parse_object_id("0123456789abcdef012345678").is_err()); // 25 chars
    }

    #[test]
    fn integer_id_rejects_non_integers() {
        assert_eq!(parse_integer_id("42").unwrap(), 42);
        assert_eq!(parse_integer_id(" 7 ").unwrap(), 7);

        assert!(parse_integer_id("4.2").is_err());
        assert!(parse_integer_id("abc").is_err());
        assert!(parse_integer_id("").is_err());
    }

    #[test]
    fn date_requires_iso_calendar_format() {
        assert_eq!(
            parse_date("2024-01-31").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
        );

        assert!(parse_date("31/01/2024").is_err());
        assert!(parse_date("2024-13-01").is_err());
        assert!(parse_date("yesterday").is_err());
    }

    #[test]
    fn bool_flag_accepts_lowercase_literals_only() {
        assert!(parse_bool("true").unwrap());
        assert!(!parse_bool("false").unwrap());
        assert!(parse_bool("1").is_err());
        assert!(parse_bool("True").is_err());
    }
}
