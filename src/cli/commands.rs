//! CLI command implementations
//!
//! The CLI is the caller in the validation contract: it loads the
//! configuration, builds the schema registry and (for inserts) the store
//! handle, feeds the stdin document through the validator, and reports
//! the outcome. The store handle is constructed here and passed down
//! explicitly; no subsystem reaches for a process-wide connection.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::observability::Logger;
use crate::schema::{samples, Outcome, PredicateRegistry, SchemaRegistry, Validator};
use crate::store::{DocumentStore, StoreError};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{read_document, write_error, write_rejection, write_response};

/// Configuration file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory (required)
    pub data_dir: String,

    /// Unique field declarations per collection (optional)
    #[serde(default)]
    pub unique_fields: HashMap<String, Vec<String>>,
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.data_dir.trim().is_empty() {
            return Err(CliError::config_error("data_dir must not be empty"));
        }

        for (collection, fields) in &self.unique_fields {
            if fields.iter().any(|f| f.trim().is_empty()) {
                return Err(CliError::config_error(format!(
                    "unique_fields for '{}' contains an empty field name",
                    collection
                )));
            }
        }

        Ok(())
    }

    /// Get data directory as Path
    pub fn data_path(&self) -> &Path {
        Path::new(&self.data_dir)
    }
}

/// Parse arguments and dispatch.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Dispatch a parsed command.
pub fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Init { config } => init(&config),
        Command::Validate {
            config,
            schema,
            version,
        } => validate(&config, &schema, &version),
        Command::Insert {
            config,
            collection,
            schema,
            version,
        } => insert(&config, &collection, &schema, &version),
        Command::Schemas { config } => schemas(&config),
    }
}

/// Creates the data directory layout and writes the sample book schema.
pub fn init(config_path: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let data_path = config.data_path();

    let registry = SchemaRegistry::new(data_path, PredicateRegistry::with_builtins());
    if registry.schema_dir().exists() {
        let occupied = fs::read_dir(registry.schema_dir())?.next().is_some();
        if occupied {
            return Err(CliError::already_initialized());
        }
    }

    fs::create_dir_all(registry.schema_dir())?;
    fs::create_dir_all(data_path.join("collections"))?;

    let spec = samples::book_spec();
    let path = registry.save_spec(&spec)?;

    Logger::info(
        "INIT_COMPLETE",
        &[
            ("data_dir", &config.data_dir),
            ("sample_schema", &path.display().to_string()),
        ],
    );
    write_response(json!({
        "data_dir": config.data_dir,
        "schemas": [{ "schema_id": spec.schema_id, "schema_version": spec.schema_version }]
    }))
}

/// Opens the registry for a command that requires an initialized directory.
fn open_registry(config: &Config) -> CliResult<SchemaRegistry> {
    let data_path = config.data_path();
    if !data_path.exists() {
        return Err(CliError::not_initialized());
    }

    let mut registry = SchemaRegistry::new(data_path, PredicateRegistry::with_builtins());
    registry.load_all()?;
    Logger::info(
        "SCHEMAS_LOADED",
        &[("count", &registry.len().to_string())],
    );
    Ok(registry)
}

/// Validates one stdin document against a registered schema.
pub fn validate(config_path: &Path, schema_id: &str, version: &str) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let registry = open_registry(&config)?;
    let document = read_document()?;

    match Validator::new(&registry).check(schema_id, version, &document)? {
        Outcome::Accepted => {
            Logger::info(
                "DOCUMENT_ACCEPTED",
                &[("schema_id", schema_id), ("schema_version", version)],
            );
            write_response(document)
        }
        Outcome::Rejected(rejection) => {
            Logger::warn(
                "DOCUMENT_REJECTED",
                &[
                    ("schema_id", schema_id),
                    ("failures", &rejection.len().to_string()),
                ],
            );
            write_rejection(&rejection)?;
            Err(CliError::rejected(rejection.len()))
        }
    }
}

/// Validates one stdin document, then appends it to a collection.
pub fn insert(
    config_path: &Path,
    collection: &str,
    schema_id: &str,
    version: &str,
) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let registry = open_registry(&config)?;
    let document = read_document()?;

    if let Outcome::Rejected(rejection) =
        Validator::new(&registry).check(schema_id, version, &document)?
    {
        Logger::warn(
            "DOCUMENT_REJECTED",
            &[
                ("schema_id", schema_id),
                ("failures", &rejection.len().to_string()),
            ],
        );
        write_rejection(&rejection)?;
        return Err(CliError::rejected(rejection.len()));
    }

    let store = DocumentStore::open(config.data_path(), config.unique_fields.clone())?;
    match store.insert(collection, schema_id, version, &document) {
        Ok(document_id) => {
            Logger::info(
                "DOCUMENT_INSERTED",
                &[("collection", collection), ("document_id", &document_id)],
            );
            write_response(json!({
                "document_id": document_id,
                "document": document
            }))
        }
        Err(err @ StoreError::UniqueViolation { .. }) => {
            // Accepted by validation, refused by the store: a different
            // failure class, reported as such.
            Logger::error("UNIQUE_VIOLATION", &[("collection", collection)]);
            write_error("VERI_STORE_UNIQUE", &err.to_string())?;
            Err(err.into())
        }
        Err(err) => Err(err.into()),
    }
}

/// Lists registered schemas.
pub fn schemas(config_path: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let registry = open_registry(&config)?;

    let mut listed: Vec<(String, String)> = registry
        .keys()
        .map(|(id, version)| (id.to_string(), version.to_string()))
        .collect();
    listed.sort();

    write_response(json!({
        "schemas": listed
            .iter()
            .map(|(id, version)| json!({ "schema_id": id, "schema_version": version }))
            .collect::<Vec<_>>()
    }))
}

/// Writes a default config file; used by tests and first-run setups.
pub fn write_default_config(path: &Path, data_dir: &Path) -> CliResult<PathBuf> {
    let config = Config {
        data_dir: data_dir.display().to_string(),
        unique_fields: HashMap::from([(
            "books".to_string(),
            vec!["isbn".to_string()],
        )]),
    };

    fs::write(path, serde_json::to_string_pretty(&config)?)?;
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_load_and_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("veridoc.json");
        fs::write(&path, r#"{ "data_dir": "./data" }"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.data_dir, "./data");
        assert!(config.unique_fields.is_empty());
    }

    #[test]
    fn test_config_rejects_empty_data_dir() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("veridoc.json");
        fs::write(&path, r#"{ "data_dir": "  " }"#).unwrap();

        let err = Config::load(&path).unwrap_err();
        assert_eq!(err.code_str(), "VERI_CLI_CONFIG_ERROR");
    }

    #[test]
    fn test_config_rejects_blank_unique_field() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("veridoc.json");
        fs::write(
            &path,
            r#"{ "data_dir": "./data", "unique_fields": { "books": [""] } }"#,
        )
        .unwrap();

        let err = Config::load(&path).unwrap_err();
        assert_eq!(err.code_str(), "VERI_CLI_CONFIG_ERROR");
    }

    #[test]
    fn test_config_missing_file() {
        let err = Config::load(Path::new("/nonexistent/veridoc.json")).unwrap_err();
        assert_eq!(err.code_str(), "VERI_CLI_CONFIG_ERROR");
    }

    #[test]
    fn test_init_creates_layout_and_sample_schema() {
        let temp_dir = TempDir::new().unwrap();
        let data_dir = temp_dir.path().join("data");
        let config_path = temp_dir.path().join("veridoc.json");
        write_default_config(&config_path, &data_dir).unwrap();

        init(&config_path).unwrap();

        assert!(data_dir.join("collections").is_dir());
        assert!(data_dir
            .join("metadata")
            .join("schemas")
            .join("schema_books_v1.json")
            .is_file());
    }

    #[test]
    fn test_init_twice_fails() {
        let temp_dir = TempDir::new().unwrap();
        let data_dir = temp_dir.path().join("data");
        let config_path = temp_dir.path().join("veridoc.json");
        write_default_config(&config_path, &data_dir).unwrap();

        init(&config_path).unwrap();
        let err = init(&config_path).unwrap_err();
        assert_eq!(err.code_str(), "VERI_CLI_ALREADY_INITIALIZED");
    }

    #[test]
    fn test_open_registry_requires_init() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            data_dir: temp_dir.path().join("missing").display().to_string(),
            unique_fields: HashMap::new(),
        };

        let err = open_registry(&config).unwrap_err();
        assert_eq!(err.code_str(), "VERI_CLI_NOT_INITIALIZED");
    }

    #[test]
    fn test_open_registry_loads_sample_schema() {
        let temp_dir = TempDir::new().unwrap();
        let data_dir = temp_dir.path().join("data");
        let config_path = temp_dir.path().join("veridoc.json");
        write_default_config(&config_path, &data_dir).unwrap();
        init(&config_path).unwrap();

        let config = Config::load(&config_path).unwrap();
        let registry = open_registry(&config).unwrap();
        assert!(registry.exists("books", "v1"));
    }
}
