//! Predicate support for conditional requirements and custom constraints
//!
//! Predicates are synchronous, side-effect-free functions over read-only
//! input. A predicate signals "constraint not satisfied" by returning
//! `Ok(false)`; an `Err` means the predicate itself is broken and is
//! surfaced as a configuration error, never as a validation failure.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

/// Error raised by a predicate that could not evaluate its input.
///
/// Distinct from a `false` result: `false` rejects the document,
/// a `PredicateError` indicts the schema.
#[derive(Debug, Clone)]
pub struct PredicateError {
    message: String,
}

impl PredicateError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for PredicateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for PredicateError {}

/// Predicate over the whole candidate document.
///
/// Used to resolve conditional requirements ("price is required only if
/// inPrint is true"). Receives the full original document, never partial
/// validation state.
pub type DocPredicate = Arc<dyn Fn(&Map<String, Value>) -> Result<bool, PredicateError> + Send + Sync>;

/// Predicate over a single field value, with the whole document as context.
pub type ValuePredicate =
    Arc<dyn Fn(&Value, &Map<String, Value>) -> Result<bool, PredicateError> + Send + Sync>;

/// Named predicate registry.
///
/// Schema files reference custom predicates by name; the registry maps
/// those names to process-local functions. A schema naming an unregistered
/// predicate fails to compile.
pub struct PredicateRegistry {
    predicates: HashMap<String, ValuePredicate>,
}

impl PredicateRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            predicates: HashMap::new(),
        }
    }

    /// Creates a registry pre-loaded with the built-in predicates.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("isbn10_check_digit", Arc::new(isbn10_check_digit));
        registry
    }

    /// Registers a predicate under a name, replacing any previous entry.
    pub fn register(&mut self, name: impl Into<String>, predicate: ValuePredicate) {
        self.predicates.insert(name.into(), predicate);
    }

    /// Looks up a predicate by name.
    pub fn get(&self, name: &str) -> Option<&ValuePredicate> {
        self.predicates.get(name)
    }

    /// Returns whether a predicate with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.predicates.contains_key(name)
    }
}

impl Default for PredicateRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Built-in ISBN-10 check-digit predicate.
///
/// The pattern constraint covers the shape (`^\d{9}(\d|X)$`); this covers the
/// arithmetic: the weighted sum of all ten digits must be divisible by 11,
/// with `X` standing for 10 in the final position.
fn isbn10_check_digit(value: &Value, _document: &Map<String, Value>) -> Result<bool, PredicateError> {
    let text = match value.as_str() {
        Some(s) => s,
        None => return Ok(false),
    };

    if text.len() != 10 {
        return Ok(false);
    }

    let mut sum: u32 = 0;
    for (i, c) in text.chars().enumerate() {
        let digit = match c {
            '0'..='9' => c as u32 - '0' as u32,
            'X' if i == 9 => 10,
            _ => return Ok(false),
        };
        sum += digit * (10 - i as u32);
    }

    Ok(sum % 11 == 0)
}
