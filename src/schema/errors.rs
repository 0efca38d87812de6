//! Schema configuration errors
//!
//! Error codes:
//! - VERI_SCHEMA_DUPLICATE_FIELD
//! - VERI_SCHEMA_INVALID_PATTERN
//! - VERI_SCHEMA_UNKNOWN_PREDICATE
//! - VERI_SCHEMA_UNKNOWN_SIBLING
//! - VERI_SCHEMA_PREDICATE_FAILED
//! - VERI_SCHEMA_UNKNOWN
//! - VERI_SCHEMA_UNKNOWN_VERSION
//! - VERI_SCHEMA_IMMUTABLE
//! - VERI_SCHEMA_MALFORMED
//!
//! A `ConfigError` means the schema or its predicates are broken, not the
//! document. Document failures travel as `Outcome::Rejected` values and
//! never through this type.

use std::fmt;

/// Configuration error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorCode {
    /// Two field definitions share a name
    DuplicateField,
    /// A pattern constraint does not compile
    InvalidPattern,
    /// A custom constraint names an unregistered predicate
    UnknownPredicate,
    /// A conditional requirement references a field the schema does not define
    UnknownSibling,
    /// A predicate errored during evaluation
    PredicateFailed,
    /// Schema ID not registered
    UnknownSchema,
    /// Schema version not registered
    UnknownVersion,
    /// Attempt to re-register an existing schema version
    SchemaImmutable,
    /// Schema file unreadable or structurally invalid
    MalformedSchema,
}

impl ConfigErrorCode {
    /// Returns the stable string code.
    pub fn code(&self) -> &'static str {
        match self {
            ConfigErrorCode::DuplicateField => "VERI_SCHEMA_DUPLICATE_FIELD",
            ConfigErrorCode::InvalidPattern => "VERI_SCHEMA_INVALID_PATTERN",
            ConfigErrorCode::UnknownPredicate => "VERI_SCHEMA_UNKNOWN_PREDICATE",
            ConfigErrorCode::UnknownSibling => "VERI_SCHEMA_UNKNOWN_SIBLING",
            ConfigErrorCode::PredicateFailed => "VERI_SCHEMA_PREDICATE_FAILED",
            ConfigErrorCode::UnknownSchema => "VERI_SCHEMA_UNKNOWN",
            ConfigErrorCode::UnknownVersion => "VERI_SCHEMA_UNKNOWN_VERSION",
            ConfigErrorCode::SchemaImmutable => "VERI_SCHEMA_IMMUTABLE",
            ConfigErrorCode::MalformedSchema => "VERI_SCHEMA_MALFORMED",
        }
    }
}

impl fmt::Display for ConfigErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A defect in the schema or its predicates.
///
/// Not recoverable by adjusting the document; surfaced fatally by callers
/// rather than reported alongside field failures.
#[derive(Debug)]
pub struct ConfigError {
    code: ConfigErrorCode,
    message: String,
    field: Option<String>,
}

impl ConfigError {
    /// Two field definitions share a name.
    pub fn duplicate_field(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            code: ConfigErrorCode::DuplicateField,
            message: format!("Field '{}' is defined more than once", name),
            field: Some(name),
        }
    }

    /// A pattern constraint source failed to compile.
    pub fn invalid_pattern(field: impl Into<String>, source: &str, reason: impl fmt::Display) -> Self {
        let field = field.into();
        Self {
            code: ConfigErrorCode::InvalidPattern,
            message: format!("Field '{}': pattern '{}' does not compile: {}", field, source, reason),
            field: Some(field),
        }
    }

    /// A custom constraint names a predicate that is not registered.
    pub fn unknown_predicate(field: impl Into<String>, name: &str) -> Self {
        let field = field.into();
        Self {
            code: ConfigErrorCode::UnknownPredicate,
            message: format!("Field '{}': predicate '{}' is not registered", field, name),
            field: Some(field),
        }
    }

    /// A conditional requirement references an undefined sibling field.
    pub fn unknown_sibling(field: impl Into<String>, sibling: &str) -> Self {
        let field = field.into();
        Self {
            code: ConfigErrorCode::UnknownSibling,
            message: format!(
                "Field '{}': requirement condition references undefined field '{}'",
                field, sibling
            ),
            field: Some(field),
        }
    }

    /// A predicate returned an error instead of a verdict.
    pub fn predicate_failed(field: impl Into<String>, reason: impl fmt::Display) -> Self {
        let field = field.into();
        Self {
            code: ConfigErrorCode::PredicateFailed,
            message: format!("Field '{}': predicate failed to evaluate: {}", field, reason),
            field: Some(field),
        }
    }

    /// Schema ID not found in the registry.
    pub fn unknown_schema(schema_id: impl Into<String>) -> Self {
        Self {
            code: ConfigErrorCode::UnknownSchema,
            message: format!("Schema '{}' not found", schema_id.into()),
            field: None,
        }
    }

    /// Schema version not found in the registry.
    pub fn unknown_version(schema_id: &str, version: &str) -> Self {
        Self {
            code: ConfigErrorCode::UnknownVersion,
            message: format!("Schema '{}' version '{}' not found", schema_id, version),
            field: None,
        }
    }

    /// Attempt to replace a registered schema version.
    pub fn schema_immutable(schema_id: &str, version: &str) -> Self {
        Self {
            code: ConfigErrorCode::SchemaImmutable,
            message: format!("Schema '{}' version '{}' is immutable", schema_id, version),
            field: None,
        }
    }

    /// A schema that defines no fields.
    pub fn empty_schema(schema_id: impl fmt::Display) -> Self {
        Self {
            code: ConfigErrorCode::MalformedSchema,
            message: format!("Schema '{}' defines no fields", schema_id),
            field: None,
        }
    }

    /// Schema file unreadable or structurally invalid.
    pub fn malformed_schema(path: impl fmt::Display, reason: impl fmt::Display) -> Self {
        Self {
            code: ConfigErrorCode::MalformedSchema,
            message: format!("Malformed schema '{}': {}", path, reason),
            field: None,
        }
    }

    /// Returns the error code.
    pub fn code(&self) -> ConfigErrorCode {
        self.code
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the field the error is attributed to, if any.
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Result type for schema configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
