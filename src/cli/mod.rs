//! CLI module for veridoc
//!
//! Provides the command-line caller around the validator:
//! - init: create the data directory layout and sample schema
//! - validate: one-shot validation of a stdin document
//! - insert: validate, then append to a collection
//! - schemas: list registered schemas

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{init, insert, run, run_command, schemas, validate, Config};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_document, write_error, write_rejection, write_response};
