//! CLI argument definitions using clap
//!
//! Commands:
//! - veridoc init --config <path>
//! - veridoc validate --config <path> --schema <id> [--version <v>]
//! - veridoc insert --config <path> --collection <name> --schema <id> [--version <v>]
//! - veridoc schemas --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// veridoc - a strict, deterministic document validation engine
#[derive(Parser, Debug)]
#[command(name = "veridoc")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize a new veridoc data directory with the sample schema
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./veridoc.json")]
        config: PathBuf,
    },

    /// Validate a JSON document from stdin against a registered schema
    Validate {
        /// Path to configuration file
        #[arg(long, default_value = "./veridoc.json")]
        config: PathBuf,

        /// Schema id to validate against
        #[arg(long)]
        schema: String,

        /// Schema version
        #[arg(long, default_value = "v1")]
        version: String,
    },

    /// Validate a JSON document from stdin, then append it to a collection
    Insert {
        /// Path to configuration file
        #[arg(long, default_value = "./veridoc.json")]
        config: PathBuf,

        /// Target collection
        #[arg(long)]
        collection: String,

        /// Schema id to validate against
        #[arg(long)]
        schema: String,

        /// Schema version
        #[arg(long, default_value = "v1")]
        version: String,
    },

    /// List registered schemas
    Schemas {
        /// Path to configuration file
        #[arg(long, default_value = "./veridoc.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
