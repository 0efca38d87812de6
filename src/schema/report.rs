//! Validation outcomes and failure records
//!
//! An `Outcome` is a value, not an error: a rejected document travels back to
//! the caller as data so it can be reported, corrected, and retried. Outcomes
//! are immutable once produced.

use serde::Serialize;
use serde_json::Value;

/// Failure classification tags rendered into `{TYPE}`.
pub mod kind {
    pub const REQUIRED: &str = "required";
    pub const TYPE: &str = "type";
    pub const ENUM: &str = "enum";
    pub const REGEXP: &str = "regexp";
    pub const RANGE: &str = "range";
    pub const MIN: &str = "min";
    pub const MAX: &str = "max";
    pub const USER_DEFINED: &str = "user defined";
}

/// One recorded constraint failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldFailure {
    /// Field path the failure is attributed to
    pub path: String,
    /// Classification tag ("required", "type", "enum", "regexp", ...)
    pub kind: String,
    /// Rendered message with placeholders already substituted
    pub message: String,
    /// The offending value (`null` when the field was absent)
    pub value: Value,
}

impl FieldFailure {
    pub fn new(
        path: impl Into<String>,
        kind: impl Into<String>,
        message: impl Into<String>,
        value: Value,
    ) -> Self {
        Self {
            path: path.into(),
            kind: kind.into(),
            message: message.into(),
            value,
        }
    }
}

/// The complete failure report for one rejected document.
///
/// Failures appear in field-definition order; a field with several failing
/// constraints contributes one record per failing constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct Rejection {
    failures: Vec<FieldFailure>,
}

impl Rejection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a failure.
    pub(crate) fn push(&mut self, failure: FieldFailure) {
        self.failures.push(failure);
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    /// All failure records, in field-definition order.
    pub fn failures(&self) -> &[FieldFailure] {
        &self.failures
    }

    /// Failure records attributed to one field.
    pub fn for_field<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a FieldFailure> {
        self.failures.iter().filter(move |f| f.path == path)
    }

    /// Distinct failing field paths, in first-failure order.
    pub fn fields(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for failure in &self.failures {
            if !seen.contains(&failure.path.as_str()) {
                seen.push(failure.path.as_str());
            }
        }
        seen
    }
}

/// Result of running a schema against one candidate document.
///
/// `Accepted` guarantees the candidate document was left untouched; the
/// caller's copy is the accepted document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum Outcome {
    Accepted,
    Rejected(Rejection),
}

impl Outcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Outcome::Accepted)
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Outcome::Accepted => None,
            Outcome::Rejected(rejection) => Some(rejection),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_rejection() -> Rejection {
        let mut rejection = Rejection::new();
        rejection.push(FieldFailure::new(
            "language",
            kind::ENUM,
            "`Klingon` is not an allowed value for `language`",
            json!("Klingon"),
        ));
        rejection.push(FieldFailure::new(
            "isbn",
            kind::REGEXP,
            "`12345` does not match the required pattern for `isbn`",
            json!("12345"),
        ));
        rejection.push(FieldFailure::new(
            "isbn",
            "user defined",
            "check digit",
            json!("12345"),
        ));
        rejection
    }

    #[test]
    fn test_fields_deduplicated_in_order() {
        let rejection = sample_rejection();
        assert_eq!(rejection.fields(), vec!["language", "isbn"]);
    }

    #[test]
    fn test_for_field_collects_all_records() {
        let rejection = sample_rejection();
        assert_eq!(rejection.for_field("isbn").count(), 2);
        assert_eq!(rejection.for_field("language").count(), 1);
        assert_eq!(rejection.for_field("title").count(), 0);
    }

    #[test]
    fn test_outcome_accessors() {
        let accepted = Outcome::Accepted;
        assert!(accepted.is_accepted());
        assert!(accepted.rejection().is_none());

        let rejected = Outcome::Rejected(sample_rejection());
        assert!(!rejected.is_accepted());
        assert_eq!(rejected.rejection().unwrap().len(), 3);
    }

    #[test]
    fn test_rejection_serializes_records() {
        let rejected = Outcome::Rejected(sample_rejection());
        let encoded = serde_json::to_value(&rejected).unwrap();
        assert_eq!(encoded["outcome"], "rejected");
        assert_eq!(encoded["failures"].as_array().unwrap().len(), 3);
        assert_eq!(encoded["failures"][0]["path"], "language");
        assert_eq!(encoded["failures"][0]["value"], "Klingon");
    }
}
