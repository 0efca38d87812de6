//! Schema validator subsystem
//!
//! # Design principles
//!
//! - Rule tables are data: constraints are a tagged variant evaluated by a
//!   dispatch-on-tag function, never a trait hierarchy.
//! - Outcomes are values: a rejected document is a result to report, not an
//!   error to raise. Only broken schemas and predicates raise errors.
//! - Conditional requirements are pure predicates over the whole candidate
//!   document, never over validator state.
//! - No mutation: the candidate document and the field definitions are
//!   read-only for the lifetime of a call.

mod errors;
mod message;
mod predicate;
mod registry;
mod report;
pub mod samples;
mod types;
mod validator;

pub use errors::{ConfigError, ConfigErrorCode, ConfigResult};
pub use message::{render, Placeholders};
pub use predicate::{DocPredicate, PredicateError, PredicateRegistry, ValuePredicate};
pub use registry::{ConstraintSpec, FieldSpec, RequiredSpec, SchemaRegistry, SchemaSpec, SiblingCondition};
pub use report::{kind, FieldFailure, Outcome, Rejection};
pub use types::{Constraint, FieldDef, FieldType, Requirement, Schema};
pub use validator::{validate, Validator};
