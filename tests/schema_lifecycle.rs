//! Schema lifecycle tests
//!
//! A schema travels: wire-form JSON file on disk -> registry load ->
//! compiled rule table -> validation. These tests run the full path the
//! CLI takes, against a temporary data directory.

use serde_json::json;
use tempfile::TempDir;

use veridoc::schema::{samples, Outcome, PredicateRegistry, SchemaRegistry, SchemaSpec, Validator};

fn loaded_registry(temp_dir: &TempDir) -> SchemaRegistry {
    let seed = SchemaRegistry::new(temp_dir.path(), PredicateRegistry::with_builtins());
    seed.save_spec(&samples::book_spec()).unwrap();

    let mut registry = SchemaRegistry::new(temp_dir.path(), PredicateRegistry::with_builtins());
    registry.load_all().unwrap();
    registry
}

#[test]
fn schema_file_roundtrip_validates_documents() {
    let temp_dir = TempDir::new().unwrap();
    let registry = loaded_registry(&temp_dir);
    let validator = Validator::new(&registry);

    let outcome = validator
        .check("books", "v1", &samples::book_document())
        .unwrap();
    assert!(outcome.is_accepted());
}

#[test]
fn loaded_schema_rejects_like_the_original() {
    let temp_dir = TempDir::new().unwrap();
    let registry = loaded_registry(&temp_dir);
    let validator = Validator::new(&registry);

    let mut doc = samples::book_document();
    doc["language"] = json!("Klingon");
    doc["isbn"] = json!("0684833396"); // shape fine, check digit wrong

    let outcome = validator.check("books", "v1", &doc).unwrap();
    let rejection = match outcome {
        Outcome::Rejected(rejection) => rejection,
        Outcome::Accepted => panic!("expected rejection"),
    };

    assert_eq!(rejection.fields(), vec!["language", "isbn"]);
    let isbn_failure = rejection.for_field("isbn").next().unwrap();
    assert_eq!(isbn_failure.kind, "user defined");
    assert!(isbn_failure.message.contains("0684833396"));
}

#[test]
fn registered_version_cannot_be_replaced() {
    let temp_dir = TempDir::new().unwrap();
    let mut registry = loaded_registry(&temp_dir);

    let err = registry.register_spec(&samples::book_spec()).unwrap_err();
    assert_eq!(err.code().code(), "VERI_SCHEMA_IMMUTABLE");
}

#[test]
fn second_version_coexists_with_first() {
    let temp_dir = TempDir::new().unwrap();
    let mut registry = loaded_registry(&temp_dir);

    let mut v2 = samples::book_spec();
    v2.schema_version = "v2".to_string();
    registry.register_spec(&v2).unwrap();

    assert!(registry.exists("books", "v1"));
    assert!(registry.exists("books", "v2"));
    assert_eq!(registry.len(), 2);
}

#[test]
fn schema_naming_unregistered_predicate_fails_at_load() {
    let temp_dir = TempDir::new().unwrap();
    let seed = SchemaRegistry::new(temp_dir.path(), PredicateRegistry::with_builtins());
    seed.save_spec(&samples::book_spec()).unwrap();

    // Same files, but a process without the built-in predicates.
    let mut bare = SchemaRegistry::new(temp_dir.path(), PredicateRegistry::new());
    let err = bare.load_all().unwrap_err();
    assert_eq!(err.code().code(), "VERI_SCHEMA_UNKNOWN_PREDICATE");
}

#[test]
fn condition_on_undefined_sibling_fails_at_load() {
    let spec: SchemaSpec = serde_json::from_value(json!({
        "schema_id": "books",
        "schema_version": "v1",
        "fields": [
            {
                "name": "price",
                "type": "number",
                "required": { "when": { "field": "reprinted", "equals": true } }
            }
        ]
    }))
    .unwrap();

    let temp_dir = TempDir::new().unwrap();
    let mut registry = SchemaRegistry::new(temp_dir.path(), PredicateRegistry::new());
    let err = registry.register_spec(&spec).unwrap_err();
    assert_eq!(err.code().code(), "VERI_SCHEMA_UNKNOWN_SIBLING");
}

#[test]
fn malformed_schema_file_aborts_load() {
    let temp_dir = TempDir::new().unwrap();
    let mut registry = SchemaRegistry::new(temp_dir.path(), PredicateRegistry::new());

    std::fs::create_dir_all(registry.schema_dir()).unwrap();
    std::fs::write(
        registry.schema_dir().join("schema_books_v1.json"),
        r#"{ "schema_id": "books" }"#,
    )
    .unwrap();

    let err = registry.load_all().unwrap_err();
    assert_eq!(err.code().code(), "VERI_SCHEMA_MALFORMED");
}
