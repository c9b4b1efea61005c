//! Generic query-to-filter translator for document-store list endpoints.
//!
//! Request query parameters are matched against a whitelist of queryable
//! fields: unrecognized keys are ignored, recognized keys become equality
//! filters, and the `sort` key maps to a sort document. Values of typed
//! fields must parse; a malformed value fails the request.

use bson::Document;
use std::collections::HashMap;

use crate::error::AppError;

/// Field kinds understood by the translator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
}

/// A whitelisted queryable field of a collection.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

pub const fn text(name: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        kind: FieldKind::Text,
    }
}

pub const fn integer(name: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        kind: FieldKind::Integer,
    }
}

/// Translate request query parameters into a filter and a sort document.
///
/// `sort` accepts a comma-separated list of field names, each with an
/// optional `-` prefix for descending order; unknown sort fields are
/// ignored like unknown filter keys.
pub fn translate(
    params: &HashMap<String, String>,
    fields: &[FieldSpec],
) -> Result<(Document, Document), AppError> {
    let mut filter = Document::new();
    let mut sort = Document::new();

    for (key, value) in params {
        if key == "sort" {
            for spec in value.split(',') {
                let spec = spec.trim();
                let (name, direction) = match spec.strip_prefix('-') {
                    Some(name) => (name, -1),
                    None => (spec, 1),
                };
                if fields.iter().any(|field| field.name == name) {
                    sort.insert(name, direction);
                }
            }
            continue;
        }

        let Some(field) = fields.iter().find(|field| field.name == key.as_str()) else {
            continue;
        };
        match field.kind {
            FieldKind::Text => {
                filter.insert(field.name, value.as_str());
            }
            FieldKind::Integer => {
                let parsed: i64 = value.parse().map_err(|_| {
                    AppError::Validation(format!(
                        "'{}' is not a valid integer value for '{}'.",
                        value, field.name
                    ))
                })?;
                filter.insert(field.name, parsed);
            }
        }
    }

    Ok((filter, sort))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIELDS: &[FieldSpec] = &[text("first_name"), text("last_name"), integer("km")];

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn unrecognized_keys_are_ignored() {
        let (filter, sort) = translate(
            &params(&[("first_name", "Jane"), ("favourite_color", "blue")]),
            FIELDS,
        )
        .unwrap();

        assert_eq!(filter.get_str("first_name").unwrap(), "Jane");
        assert!(!filter.contains_key("favourite_color"));
        assert!(sort.is_empty());
    }

    #[test]
    fn integer_fields_must_parse() {
        let (filter, _) = translate(&params(&[("km", "12000")]), FIELDS).unwrap();
        assert_eq!(filter.get_i64("km").unwrap(), 12000);

        assert!(translate(&params(&[("km", "a lot")]), FIELDS).is_err());
    }

    #[test]
    fn sort_prefix_controls_direction() {
        let (_, sort) = translate(&params(&[("sort", "-last_name,first_name")]), FIELDS).unwrap();

        assert_eq!(sort.get_i32("last_name").unwrap(), -1);
        assert_eq!(sort.get_i32("first_name").unwrap(), 1);
    }

    #[test]
    fn unknown_sort_fields_are_dropped() {
        let (_, sort) = translate(&params(&[("sort", "-shoe_size")]), FIELDS).unwrap();
        assert!(sort.is_empty());
    }
}
