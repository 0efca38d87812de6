//! Document validator
//!
//! Evaluation contract:
//! - Fields are checked independently, in definition order; order affects
//!   only the report ordering, never the outcome.
//! - A failed presence check stops all further checks for that field.
//! - After the presence check, every remaining constraint runs even when an
//!   earlier one failed, so a field can accumulate several failure records.
//! - The candidate document and the field definitions are never mutated.
//! - Validation failures are values (`Outcome::Rejected`); only broken
//!   schemas or predicates surface as `Err(ConfigError)`.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::{DateTime, NaiveDate};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::errors::{ConfigError, ConfigResult};
use super::message::{self, Placeholders};
use super::registry::SchemaRegistry;
use super::report::{kind, FieldFailure, Outcome, Rejection};
use super::types::{Constraint, FieldDef, FieldType, Schema};

/// Validates a candidate document against a schema.
///
/// Returns `Outcome::Accepted` when every field satisfies its declared
/// constraints, otherwise `Outcome::Rejected` with one failure record per
/// failing constraint. A malformed schema or erroring predicate returns
/// `Err` instead.
pub fn validate(schema: &Schema, document: &Value) -> ConfigResult<Outcome> {
    let doc_obj = match document.as_object() {
        Some(obj) => obj,
        None => {
            let mut rejection = Rejection::new();
            let placeholders = Placeholders::new("$root", document, "document");
            rejection.push(FieldFailure::new(
                "$root",
                kind::TYPE,
                message::render(message::TYPE_TEMPLATE, &placeholders),
                document.clone(),
            ));
            return Ok(Outcome::Rejected(rejection));
        }
    };

    let mut rejection = Rejection::new();
    for field in schema.fields() {
        check_field(field, doc_obj, &mut rejection)?;
    }

    if rejection.is_empty() {
        Ok(Outcome::Accepted)
    } else {
        Ok(Outcome::Rejected(rejection))
    }
}

/// Registry-backed validator: resolves a schema binding, then validates.
pub struct Validator<'a> {
    registry: &'a SchemaRegistry,
}

impl<'a> Validator<'a> {
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Validates a document against a registered schema version.
    ///
    /// An unregistered schema id or version is a configuration error, not a
    /// rejection: the document was never judged.
    pub fn check(
        &self,
        schema_id: &str,
        schema_version: &str,
        document: &Value,
    ) -> ConfigResult<Outcome> {
        if !self.registry.id_exists(schema_id) {
            return Err(ConfigError::unknown_schema(schema_id));
        }

        let schema = self
            .registry
            .get(schema_id, schema_version)
            .ok_or_else(|| ConfigError::unknown_version(schema_id, schema_version))?;

        validate(schema, document)
    }
}

/// Runs the presence, type, and constraint checks for one field.
fn check_field(
    field: &FieldDef,
    document: &Map<String, Value>,
    rejection: &mut Rejection,
) -> ConfigResult<()> {
    let required = field
        .required
        .resolve(document)
        .map_err(|e| ConfigError::predicate_failed(&field.name, e))?;

    let value = document.get(&field.name);

    if !is_present(value) {
        if required {
            let absent = value.cloned().unwrap_or(Value::Null);
            let placeholders = Placeholders::new(&field.name, &absent, kind::REQUIRED);
            rejection.push(FieldFailure::new(
                &field.name,
                kind::REQUIRED,
                message::render(message::REQUIRED_TEMPLATE, &placeholders),
                absent.clone(),
            ));
        }
        // Absent and not required: nothing more to check.
        return Ok(());
    }
    let value = value.expect("presence check guarantees a value");

    if !type_matches(field.field_type, value) {
        let type_name = field.field_type.type_name();
        let placeholders = Placeholders::new(&field.name, value, type_name);
        rejection.push(FieldFailure::new(
            &field.name,
            kind::TYPE,
            message::render(message::TYPE_TEMPLATE, &placeholders),
            value.clone(),
        ));
    }

    for constraint in &field.constraints {
        check_constraint(field, constraint, value, document, rejection)?;
    }

    Ok(())
}

/// Presence test: absent, null, and empty text all count as missing.
fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

/// Shape test for a present value against the declared type.
fn type_matches(field_type: FieldType, value: &Value) -> bool {
    match field_type {
        FieldType::Text => value.is_string(),
        FieldType::Number => value.is_number(),
        FieldType::Boolean => value.is_boolean(),
        FieldType::List => value.is_array(),
        FieldType::Mixed => true,
        FieldType::Date => value.as_str().is_some_and(is_date_text),
        FieldType::Binary => value.as_str().is_some_and(|s| BASE64.decode(s).is_ok()),
        FieldType::Reference => value.as_str().is_some_and(|s| Uuid::parse_str(s).is_ok()),
    }
}

/// Accepted textual date forms: RFC 3339, ISO calendar date, and the long
/// form used in publishing metadata ("10 November 1961").
fn is_date_text(text: &str) -> bool {
    DateTime::parse_from_rfc3339(text).is_ok()
        || NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok()
        || NaiveDate::parse_from_str(text, "%d %B %Y").is_ok()
}

/// Dispatch-on-tag evaluation of a single constraint.
fn check_constraint(
    field: &FieldDef,
    constraint: &Constraint,
    value: &Value,
    document: &Map<String, Value>,
    rejection: &mut Rejection,
) -> ConfigResult<()> {
    match constraint {
        Constraint::Enum { allowed, message } => {
            let text = message::value_text(value);
            if !allowed.iter().any(|a| a == &text) {
                let template = message.as_deref().unwrap_or(message::ENUM_TEMPLATE);
                let placeholders = Placeholders::new(&field.name, value, kind::ENUM);
                rejection.push(FieldFailure::new(
                    &field.name,
                    kind::ENUM,
                    message::render(template, &placeholders),
                    value.clone(),
                ));
            }
        }

        Constraint::Pattern { regex, message } => {
            let text = message::value_text(value);
            if !regex.is_match(&text) {
                let template = message.as_deref().unwrap_or(message::PATTERN_TEMPLATE);
                let placeholders = Placeholders::new(&field.name, value, kind::REGEXP);
                rejection.push(FieldFailure::new(
                    &field.name,
                    kind::REGEXP,
                    message::render(template, &placeholders),
                    value.clone(),
                ));
            }
        }

        Constraint::Range { min, max, message } => {
            let number = match value.as_f64() {
                Some(n) => n,
                None => {
                    let template = message.as_deref().unwrap_or(message::NOT_NUMERIC_TEMPLATE);
                    let placeholders = Placeholders::new(&field.name, value, kind::RANGE)
                        .with_bounds(*min, *max);
                    rejection.push(FieldFailure::new(
                        &field.name,
                        kind::RANGE,
                        message::render(template, &placeholders),
                        value.clone(),
                    ));
                    return Ok(());
                }
            };

            if let Some(lower) = min {
                if number < *lower {
                    let template = message.as_deref().unwrap_or(message::MIN_TEMPLATE);
                    let placeholders =
                        Placeholders::new(&field.name, value, kind::MIN).with_bounds(*min, *max);
                    rejection.push(FieldFailure::new(
                        &field.name,
                        kind::MIN,
                        message::render(template, &placeholders),
                        value.clone(),
                    ));
                }
            }
            if let Some(upper) = max {
                if number > *upper {
                    let template = message.as_deref().unwrap_or(message::MAX_TEMPLATE);
                    let placeholders =
                        Placeholders::new(&field.name, value, kind::MAX).with_bounds(*min, *max);
                    rejection.push(FieldFailure::new(
                        &field.name,
                        kind::MAX,
                        message::render(template, &placeholders),
                        value.clone(),
                    ));
                }
            }
        }

        Constraint::Custom {
            name,
            predicate,
            message,
            tag,
        } => {
            let verdict = predicate(value, document).map_err(|e| {
                ConfigError::predicate_failed(&field.name, format!("'{}': {}", name, e))
            })?;
            if !verdict {
                let placeholders = Placeholders::new(&field.name, value, tag);
                rejection.push(FieldFailure::new(
                    &field.name,
                    tag.clone(),
                    message::render(message, &placeholders),
                    value.clone(),
                ));
            }
        }
    }

    Ok(())
}
