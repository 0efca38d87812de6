//! Store collaborator tests
//!
//! The caller-side flow: validate, then hand the accepted document to the
//! store. Uniqueness violations must surface as store errors, a separate
//! class from validation rejection.

use std::collections::HashMap;

use serde_json::json;
use tempfile::TempDir;

use veridoc::schema::{samples, validate, PredicateRegistry};
use veridoc::store::{DocumentStore, StoreError};

fn unique_isbn() -> HashMap<String, Vec<String>> {
    HashMap::from([("books".to_string(), vec!["isbn".to_string()])])
}

#[test]
fn accepted_document_persists_and_scans_back() {
    let temp_dir = TempDir::new().unwrap();
    let schema = samples::book_spec()
        .compile(&PredicateRegistry::with_builtins())
        .unwrap();
    let store = DocumentStore::open(temp_dir.path(), unique_isbn()).unwrap();

    let doc = samples::book_document();
    assert!(validate(&schema, &doc).unwrap().is_accepted());

    let id = store.insert("books", "books", "v1", &doc).unwrap();
    let stored = store.scan("books").unwrap();

    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].0, id);
    assert_eq!(stored[0].1, doc);
}

#[test]
fn duplicate_unique_value_is_a_store_error_not_a_rejection() {
    let temp_dir = TempDir::new().unwrap();
    let schema = samples::book_spec()
        .compile(&PredicateRegistry::with_builtins())
        .unwrap();
    let store = DocumentStore::open(temp_dir.path(), unique_isbn()).unwrap();

    let doc = samples::book_document();
    store.insert("books", "books", "v1", &doc).unwrap();

    // The reprint still validates: uniqueness is not a schema rule.
    let mut reprint = doc.clone();
    reprint["title"] = json!("Catch-22 (reprint)");
    assert!(validate(&schema, &reprint).unwrap().is_accepted());

    let err = store.insert("books", "books", "v1", &reprint).unwrap_err();
    match err {
        StoreError::UniqueViolation { field, .. } => assert_eq!(field, "isbn"),
        other => panic!("expected UniqueViolation, got {:?}", other),
    }
    assert_eq!(store.count("books").unwrap(), 1);
}

#[test]
fn inserts_survive_reopening_the_store() {
    let temp_dir = TempDir::new().unwrap();
    let doc = samples::book_document();

    {
        let store = DocumentStore::open(temp_dir.path(), unique_isbn()).unwrap();
        store.insert("books", "books", "v1", &doc).unwrap();
    }

    let reopened = DocumentStore::open(temp_dir.path(), unique_isbn()).unwrap();
    assert_eq!(reopened.count("books").unwrap(), 1);

    // The unique index is rebuilt from the log, so the conflict still holds.
    let err = reopened.insert("books", "books", "v1", &doc).unwrap_err();
    assert!(matches!(err, StoreError::UniqueViolation { .. }));
}

#[test]
fn collections_are_independent() {
    let temp_dir = TempDir::new().unwrap();
    let store = DocumentStore::open(temp_dir.path(), unique_isbn()).unwrap();

    store
        .insert("books", "books", "v1", &json!({ "isbn": "0684833395" }))
        .unwrap();
    store
        .insert("drafts", "books", "v1", &json!({ "isbn": "0684833395" }))
        .unwrap();

    assert_eq!(store.count("books").unwrap(), 1);
    assert_eq!(store.count("drafts").unwrap(), 1);
}
