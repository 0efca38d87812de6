//! Built-in sample schema
//!
//! A book-catalog schema exercising every rule kind: a required title, a
//! language enum, an ISBN-10 pattern plus check-digit predicate, and a price
//! that is required only while the book is in print. `init` writes it into a
//! fresh data directory so a new deployment has a working example to poke at.

use serde_json::json;

use super::registry::SchemaSpec;

/// Languages the catalog accepts.
pub const LANGUAGES: [&str; 6] = [
    "English", "French", "German", "Spanish", "Japanese", "Chinese",
];

/// ISBN-10 shape: nine digits plus a final digit or X.
pub const ISBN10_PATTERN: &str = r"^\d{9}(\d|X)$";

/// The sample book schema, wire form.
pub fn book_spec() -> SchemaSpec {
    serde_json::from_value(json!({
        "schema_id": "books",
        "schema_version": "v1",
        "description": "Book catalog records",
        "fields": [
            { "name": "title", "type": "text", "required": true },
            { "name": "author", "type": "list" },
            {
                "name": "language",
                "type": "text",
                "constraints": [
                    {
                        "rule": "enum",
                        "allowed": LANGUAGES,
                        "message": "Language `{VALUE}` is not allowed for `{PATH}`"
                    }
                ]
            },
            { "name": "published", "type": "date" },
            {
                "name": "isbn",
                "type": "text",
                "constraints": [
                    {
                        "rule": "pattern",
                        "pattern": ISBN10_PATTERN,
                        "message": "ISBN `{VALUE}` must match the ISBN-10 format"
                    },
                    {
                        "rule": "custom",
                        "predicate": "isbn10_check_digit",
                        "message": "ISBN `{VALUE}` has an invalid check digit"
                    }
                ]
            },
            { "name": "inPrint", "type": "boolean" },
            {
                "name": "price",
                "type": "number",
                "required": { "when": { "field": "inPrint", "equals": true } },
                "constraints": [ { "rule": "range", "min": 0 } ]
            }
        ]
    }))
    .expect("built-in book schema must deserialize")
}

/// A document that satisfies the sample schema.
pub fn book_document() -> serde_json::Value {
    json!({
        "title": "Catch-22",
        "author": [ { "name": "Joseph Heller" } ],
        "published": "10 November 1961",
        "isbn": "0684833395",
        "inPrint": true,
        "language": "English",
        "price": 11.99
    })
}
