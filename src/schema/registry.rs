//! Schema registry and on-disk schema files
//!
//! Schemas are declared as JSON files at
//! `<data_dir>/metadata/schemas/schema_<id>_<version>.json`, one file per
//! version, loaded into an in-memory registry at boot. Registered versions
//! are immutable.
//!
//! The wire form (`SchemaSpec`) is plain serde data. Compilation turns it
//! into the runtime `Schema`: pattern sources compile to regexes, `when`
//! conditions become sibling predicates, and `custom` rules resolve their
//! predicate names against the process predicate registry. Every compilation
//! failure is a `ConfigError` raised at load time, before any document is
//! judged.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{ConfigError, ConfigResult};
use super::predicate::PredicateRegistry;
use super::types::{Constraint, FieldDef, FieldType, Requirement, Schema};

/// Wire form of a schema file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaSpec {
    pub schema_id: String,
    pub schema_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub fields: Vec<FieldSpec>,
}

/// Wire form of one field definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(flatten)]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: RequiredSpec,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<ConstraintSpec>,
}

/// Wire form of a requirement: a plain flag, or a sibling condition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequiredSpec {
    Flag(bool),
    When { when: SiblingCondition },
}

impl Default for RequiredSpec {
    fn default() -> Self {
        RequiredSpec::Flag(false)
    }
}

/// "Required when `field` equals `equals`" - the declarative form of a
/// requirement predicate over a sibling value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiblingCondition {
    pub field: String,
    pub equals: Value,
}

/// Wire form of a constraint rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "lowercase")]
pub enum ConstraintSpec {
    Enum {
        allowed: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    Pattern {
        pattern: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    Range {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    Custom {
        predicate: String,
        message: String,
        #[serde(default = "default_custom_tag")]
        tag: String,
    },
}

fn default_custom_tag() -> String {
    "user defined".to_string()
}

impl SchemaSpec {
    /// Compiles the wire form into a runtime schema.
    pub fn compile(&self, predicates: &PredicateRegistry) -> ConfigResult<Schema> {
        let mut fields = Vec::with_capacity(self.fields.len());
        for field_spec in &self.fields {
            fields.push(self.compile_field(field_spec, predicates)?);
        }

        let mut schema = Schema::new(&self.schema_id, &self.schema_version, fields)?;
        if let Some(description) = &self.description {
            schema = schema.with_description(description);
        }
        Ok(schema)
    }

    fn compile_field(
        &self,
        spec: &FieldSpec,
        predicates: &PredicateRegistry,
    ) -> ConfigResult<FieldDef> {
        let required = match &spec.required {
            RequiredSpec::Flag(flag) => Requirement::from(*flag),
            RequiredSpec::When { when } => {
                // The condition must name a field this schema defines.
                if !self.fields.iter().any(|f| f.name == when.field) {
                    return Err(ConfigError::unknown_sibling(&spec.name, &when.field));
                }
                Requirement::when_equals(&when.field, when.equals.clone())
            }
        };

        let mut constraints = Vec::with_capacity(spec.constraints.len());
        for constraint_spec in &spec.constraints {
            constraints.push(match constraint_spec {
                ConstraintSpec::Enum { allowed, message } => {
                    let mut constraint = Constraint::enum_of(allowed.clone());
                    if let Some(template) = message {
                        constraint = constraint.with_message(template);
                    }
                    constraint
                }
                ConstraintSpec::Pattern { pattern, message } => {
                    let mut constraint = Constraint::pattern(&spec.name, pattern)?;
                    if let Some(template) = message {
                        constraint = constraint.with_message(template);
                    }
                    constraint
                }
                ConstraintSpec::Range { min, max, message } => {
                    let mut constraint = Constraint::range(*min, *max);
                    if let Some(template) = message {
                        constraint = constraint.with_message(template);
                    }
                    constraint
                }
                ConstraintSpec::Custom {
                    predicate,
                    message,
                    tag,
                } => {
                    let resolved = predicates
                        .get(predicate)
                        .cloned()
                        .ok_or_else(|| ConfigError::unknown_predicate(&spec.name, predicate))?;
                    Constraint::custom(predicate, resolved, message, tag)
                }
            });
        }

        Ok(FieldDef {
            name: spec.name.clone(),
            field_type: spec.field_type,
            required,
            constraints,
        })
    }
}

/// In-memory schema registry backed by a schema directory on disk.
pub struct SchemaRegistry {
    schema_dir: PathBuf,
    predicates: PredicateRegistry,
    schemas: HashMap<(String, String), Schema>,
}

impl std::fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaRegistry")
            .field("schema_dir", &self.schema_dir)
            .field("schemas", &self.schemas)
            .finish_non_exhaustive()
    }
}

impl SchemaRegistry {
    /// Creates a registry rooted at `<data_dir>/metadata/schemas`.
    pub fn new(data_dir: &Path, predicates: PredicateRegistry) -> Self {
        Self {
            schema_dir: data_dir.join("metadata").join("schemas"),
            predicates,
            schemas: HashMap::new(),
        }
    }

    /// Returns the schema directory path.
    pub fn schema_dir(&self) -> &Path {
        &self.schema_dir
    }

    /// Loads and compiles every schema file in the schema directory.
    ///
    /// A missing directory is created empty; an unreadable or uncompilable
    /// file aborts the load.
    pub fn load_all(&mut self) -> ConfigResult<()> {
        if !self.schema_dir.exists() {
            fs::create_dir_all(&self.schema_dir).map_err(|e| {
                ConfigError::malformed_schema(
                    self.schema_dir.display(),
                    format!("cannot create schema directory: {}", e),
                )
            })?;
            return Ok(());
        }

        let entries = fs::read_dir(&self.schema_dir).map_err(|e| {
            ConfigError::malformed_schema(
                self.schema_dir.display(),
                format!("cannot read schema directory: {}", e),
            )
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| {
                ConfigError::malformed_schema(
                    self.schema_dir.display(),
                    format!("cannot read directory entry: {}", e),
                )
            })?;

            let path = entry.path();
            if path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }

            self.load_schema_file(&path)?;
        }

        Ok(())
    }

    fn load_schema_file(&mut self, path: &Path) -> ConfigResult<()> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::malformed_schema(path.display(), format!("cannot read file: {}", e))
        })?;

        let spec: SchemaSpec = serde_json::from_str(&content).map_err(|e| {
            ConfigError::malformed_schema(path.display(), format!("invalid JSON: {}", e))
        })?;

        let schema = spec.compile(&self.predicates)?;
        self.register(schema)
    }

    /// Registers a compiled schema; registered versions are immutable.
    pub fn register(&mut self, schema: Schema) -> ConfigResult<()> {
        let key = (schema.schema_id.clone(), schema.schema_version.clone());
        if self.schemas.contains_key(&key) {
            return Err(ConfigError::schema_immutable(
                &schema.schema_id,
                &schema.schema_version,
            ));
        }

        self.schemas.insert(key, schema);
        Ok(())
    }

    /// Compiles and registers a wire-form spec.
    pub fn register_spec(&mut self, spec: &SchemaSpec) -> ConfigResult<()> {
        let schema = spec.compile(&self.predicates)?;
        self.register(schema)
    }

    /// Gets a schema by id and version.
    pub fn get(&self, schema_id: &str, schema_version: &str) -> Option<&Schema> {
        self.schemas
            .get(&(schema_id.to_string(), schema_version.to_string()))
    }

    /// Returns whether any version of a schema id is registered.
    pub fn id_exists(&self, schema_id: &str) -> bool {
        self.schemas.keys().any(|(id, _)| id == schema_id)
    }

    /// Returns whether an exact id+version is registered.
    pub fn exists(&self, schema_id: &str, schema_version: &str) -> bool {
        self.get(schema_id, schema_version).is_some()
    }

    /// Registered (id, version) pairs.
    pub fn keys(&self) -> impl Iterator<Item = (&str, &str)> {
        self.schemas
            .values()
            .map(|s| (s.schema_id.as_str(), s.schema_version.as_str()))
    }

    /// Number of registered schemas.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Writes a wire-form spec to its standard file location.
    ///
    /// Compiles first, so a broken spec never lands on disk, and refuses to
    /// overwrite an existing version.
    pub fn save_spec(&self, spec: &SchemaSpec) -> ConfigResult<PathBuf> {
        spec.compile(&self.predicates)?;

        let filename = format!("schema_{}_{}.json", spec.schema_id, spec.schema_version);
        let path = self.schema_dir.join(&filename);

        if path.exists() {
            return Err(ConfigError::schema_immutable(
                &spec.schema_id,
                &spec.schema_version,
            ));
        }

        if !self.schema_dir.exists() {
            fs::create_dir_all(&self.schema_dir).map_err(|e| {
                ConfigError::malformed_schema(
                    self.schema_dir.display(),
                    format!("cannot create schema directory: {}", e),
                )
            })?;
        }

        let content = serde_json::to_string_pretty(spec).map_err(|e| {
            ConfigError::malformed_schema(path.display(), format!("cannot serialize: {}", e))
        })?;

        fs::write(&path, content).map_err(|e| {
            ConfigError::malformed_schema(path.display(), format!("cannot write file: {}", e))
        })?;

        Ok(path)
    }
}
