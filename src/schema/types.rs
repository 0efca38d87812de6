//! Field definition types
//!
//! A schema is a declarative rule table: an ordered list of field
//! definitions, each naming a value type, a requirement, and zero or more
//! constraints. Constraints are a tagged variant, not a trait hierarchy, so
//! the evaluator stays a dispatch-on-tag function over plain data.
//!
//! Supported value types:
//! - text: UTF-8 string
//! - number: JSON number
//! - date: textual date (RFC 3339 or common calendar forms)
//! - binary: base64 text
//! - boolean: true/false
//! - mixed: anything
//! - reference: document id (UUID text)
//! - list: JSON array

use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::errors::{ConfigError, ConfigResult};
use super::predicate::{DocPredicate, PredicateError, ValuePredicate};

/// Supported field value types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldType {
    /// UTF-8 string
    Text,
    /// JSON number
    Number,
    /// Textual date
    Date,
    /// Base64-encoded bytes
    Binary,
    /// Boolean
    Boolean,
    /// Any value
    Mixed,
    /// Document id referencing another record
    Reference,
    /// JSON array
    List,
}

impl FieldType {
    /// Returns the type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Date => "date",
            FieldType::Binary => "binary",
            FieldType::Boolean => "boolean",
            FieldType::Mixed => "mixed",
            FieldType::Reference => "reference",
            FieldType::List => "list",
        }
    }
}

/// Whether a field must be present.
///
/// `If` carries a predicate over the whole candidate document, so a
/// requirement can depend on sibling values ("price is required only if
/// inPrint is true"). The predicate sees the original document, never
/// partial validation state.
#[derive(Clone, Default)]
pub enum Requirement {
    Always,
    #[default]
    Never,
    If(DocPredicate),
}

impl Requirement {
    /// Resolves the requirement against a candidate document.
    pub fn resolve(&self, document: &Map<String, Value>) -> Result<bool, PredicateError> {
        match self {
            Requirement::Always => Ok(true),
            Requirement::Never => Ok(false),
            Requirement::If(predicate) => predicate(document),
        }
    }

    /// Requirement conditioned on a sibling field holding an exact value.
    pub fn when_equals(sibling: impl Into<String>, expected: Value) -> Self {
        let sibling = sibling.into();
        Requirement::If(Arc::new(move |document| {
            Ok(document.get(&sibling) == Some(&expected))
        }))
    }
}

impl From<bool> for Requirement {
    fn from(required: bool) -> Self {
        if required {
            Requirement::Always
        } else {
            Requirement::Never
        }
    }
}

impl fmt::Debug for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requirement::Always => write!(f, "Always"),
            Requirement::Never => write!(f, "Never"),
            Requirement::If(_) => write!(f, "If(<predicate>)"),
        }
    }
}

/// A single named rule attached to a field.
///
/// Evaluated in declaration order; every constraint runs even after an
/// earlier one fails, so one field can accumulate several failure records.
#[derive(Clone)]
pub enum Constraint {
    /// Value's text form must be a member of the allowed set.
    Enum {
        allowed: Vec<String>,
        message: Option<String>,
    },
    /// Value's text form must match the regular expression.
    Pattern {
        regex: Regex,
        message: Option<String>,
    },
    /// Numeric value must fall within [min, max]; either bound optional.
    Range {
        min: Option<f64>,
        max: Option<f64>,
        message: Option<String>,
    },
    /// Registered predicate over the value and document context.
    Custom {
        name: String,
        predicate: ValuePredicate,
        message: String,
        tag: String,
    },
}

impl Constraint {
    /// Enum constraint with the default message template.
    pub fn enum_of<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Constraint::Enum {
            allowed: allowed.into_iter().map(Into::into).collect(),
            message: None,
        }
    }

    /// Pattern constraint; the source compiles eagerly so a bad pattern is a
    /// configuration error at schema build time, not at validation time.
    pub fn pattern(field: &str, source: &str) -> ConfigResult<Self> {
        let regex = Regex::new(source)
            .map_err(|e| ConfigError::invalid_pattern(field, source, e))?;
        Ok(Constraint::Pattern {
            regex,
            message: None,
        })
    }

    /// Range constraint with optional bounds.
    pub fn range(min: Option<f64>, max: Option<f64>) -> Self {
        Constraint::Range {
            min,
            max,
            message: None,
        }
    }

    /// Custom constraint over a named predicate.
    pub fn custom(
        name: impl Into<String>,
        predicate: ValuePredicate,
        message: impl Into<String>,
        tag: impl Into<String>,
    ) -> Self {
        Constraint::Custom {
            name: name.into(),
            predicate,
            message: message.into(),
            tag: tag.into(),
        }
    }

    /// Overrides the failure message template.
    pub fn with_message(mut self, template: impl Into<String>) -> Self {
        match &mut self {
            Constraint::Enum { message, .. }
            | Constraint::Pattern { message, .. }
            | Constraint::Range { message, .. } => *message = Some(template.into()),
            Constraint::Custom { message, .. } => *message = template.into(),
        }
        self
    }
}

impl fmt::Debug for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Enum { allowed, .. } => {
                f.debug_struct("Enum").field("allowed", allowed).finish()
            }
            Constraint::Pattern { regex, .. } => {
                f.debug_struct("Pattern").field("regex", &regex.as_str()).finish()
            }
            Constraint::Range { min, max, .. } => f
                .debug_struct("Range")
                .field("min", min)
                .field("max", max)
                .finish(),
            Constraint::Custom { name, tag, .. } => f
                .debug_struct("Custom")
                .field("name", name)
                .field("tag", tag)
                .finish(),
        }
    }
}

/// Definition of one document field.
#[derive(Debug, Clone)]
pub struct FieldDef {
    /// Field name, unique within the schema, sole error-report key
    pub name: String,
    /// Declared value type
    pub field_type: FieldType,
    /// Presence requirement
    pub required: Requirement,
    /// Ordered constraint list
    pub constraints: Vec<Constraint>,
}

impl FieldDef {
    /// An optional field with no constraints.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: Requirement::Never,
            constraints: Vec::new(),
        }
    }

    /// Marks the field unconditionally required.
    pub fn required(mut self) -> Self {
        self.required = Requirement::Always;
        self
    }

    /// Conditions the requirement on a document predicate.
    pub fn required_if(mut self, predicate: DocPredicate) -> Self {
        self.required = Requirement::If(predicate);
        self
    }

    /// Appends a constraint.
    pub fn constrain(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }
}

/// A complete schema: an identity plus an ordered field-definition table.
///
/// Construction rejects duplicate field names eagerly; the definition set is
/// read-only after that.
#[derive(Debug, Clone)]
pub struct Schema {
    pub schema_id: String,
    pub schema_version: String,
    pub description: Option<String>,
    fields: Vec<FieldDef>,
}

impl Schema {
    /// Builds a schema, rejecting an empty definition set and duplicate
    /// field names.
    pub fn new(
        schema_id: impl Into<String>,
        schema_version: impl Into<String>,
        fields: Vec<FieldDef>,
    ) -> ConfigResult<Self> {
        let schema_id = schema_id.into();
        if fields.is_empty() {
            return Err(ConfigError::empty_schema(&schema_id));
        }

        let mut seen: Vec<&str> = Vec::with_capacity(fields.len());
        for field in &fields {
            if seen.contains(&field.name.as_str()) {
                return Err(ConfigError::duplicate_field(&field.name));
            }
            seen.push(&field.name);
        }

        Ok(Self {
            schema_id: schema_id.into(),
            schema_version: schema_version.into(),
            description: None,
            fields,
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns the unique registry key (id, version).
    pub fn key(&self) -> (&str, &str) {
        (&self.schema_id, &self.schema_version)
    }

    /// Field definitions in declaration order.
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Looks up a field definition by name.
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_type_names() {
        assert_eq!(FieldType::Text.type_name(), "text");
        assert_eq!(FieldType::Number.type_name(), "number");
        assert_eq!(FieldType::Reference.type_name(), "reference");
        assert_eq!(FieldType::List.type_name(), "list");
    }

    #[test]
    fn test_field_type_serde_tag() {
        let encoded = serde_json::to_value(FieldType::Text).unwrap();
        assert_eq!(encoded, json!({ "type": "text" }));

        let decoded: FieldType = serde_json::from_value(json!({ "type": "boolean" })).unwrap();
        assert_eq!(decoded, FieldType::Boolean);
    }

    #[test]
    fn test_requirement_resolution() {
        let doc = serde_json::from_value::<Map<String, Value>>(json!({ "inPrint": true }))
            .unwrap();

        assert!(Requirement::Always.resolve(&doc).unwrap());
        assert!(!Requirement::Never.resolve(&doc).unwrap());

        let conditional = Requirement::when_equals("inPrint", json!(true));
        assert!(conditional.resolve(&doc).unwrap());

        let other = serde_json::from_value::<Map<String, Value>>(json!({ "inPrint": false }))
            .unwrap();
        assert!(!conditional.resolve(&other).unwrap());
    }

    #[test]
    fn test_requirement_missing_sibling_is_false() {
        let conditional = Requirement::when_equals("inPrint", json!(true));
        assert!(!conditional.resolve(&Map::new()).unwrap());
    }

    #[test]
    fn test_requirement_from_bool() {
        let doc = Map::new();
        assert!(Requirement::from(true).resolve(&doc).unwrap());
        assert!(!Requirement::from(false).resolve(&doc).unwrap());
    }

    #[test]
    fn test_pattern_compiles_eagerly() {
        assert!(Constraint::pattern("isbn", r"^\d{9}(\d|X)$").is_ok());

        let err = Constraint::pattern("isbn", r"(unclosed").unwrap_err();
        assert_eq!(err.code().code(), "VERI_SCHEMA_INVALID_PATTERN");
        assert_eq!(err.field(), Some("isbn"));
    }

    #[test]
    fn test_schema_rejects_empty_definition_set() {
        let err = Schema::new("books", "v1", Vec::new()).unwrap_err();
        assert_eq!(err.code().code(), "VERI_SCHEMA_MALFORMED");
    }

    #[test]
    fn test_schema_rejects_duplicate_names() {
        let fields = vec![
            FieldDef::new("title", FieldType::Text).required(),
            FieldDef::new("title", FieldType::Text),
        ];

        let err = Schema::new("books", "v1", fields).unwrap_err();
        assert_eq!(err.code().code(), "VERI_SCHEMA_DUPLICATE_FIELD");
    }

    #[test]
    fn test_schema_field_lookup_and_order() {
        let schema = Schema::new(
            "books",
            "v1",
            vec![
                FieldDef::new("title", FieldType::Text).required(),
                FieldDef::new("price", FieldType::Number),
            ],
        )
        .unwrap();

        assert_eq!(schema.key(), ("books", "v1"));
        assert_eq!(schema.fields().len(), 2);
        assert_eq!(schema.fields()[0].name, "title");
        assert!(schema.field("price").is_some());
        assert!(schema.field("missing").is_none());
    }
}
