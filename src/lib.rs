//! veridoc - a strict, deterministic document validation engine
//!
//! A declarative schema (field types, requirements, constraints) is
//! evaluated against candidate JSON documents; accepted documents can be
//! appended to a checksummed collection log with out-of-band uniqueness.

pub mod cli;
pub mod observability;
pub mod schema;
pub mod store;
