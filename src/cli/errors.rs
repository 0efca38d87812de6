//! CLI-specific error types
//!
//! Every CLI error terminates the process with a non-zero exit code. A
//! document rejection also exits non-zero, but only after the structured
//! rejection report has been written to stdout.

use std::fmt;
use std::io;

use crate::schema::ConfigError;
use crate::store::StoreError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (stdin/stdout)
    IoError,
    /// Data directory already initialized
    AlreadyInitialized,
    /// Data directory missing
    NotInitialized,
    /// Schema or predicate defect
    SchemaConfig,
    /// Document failed validation
    Rejected,
    /// Store operation failed
    StoreFailure,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "VERI_CLI_CONFIG_ERROR",
            Self::IoError => "VERI_CLI_IO_ERROR",
            Self::AlreadyInitialized => "VERI_CLI_ALREADY_INITIALIZED",
            Self::NotInitialized => "VERI_CLI_NOT_INITIALIZED",
            Self::SchemaConfig => "VERI_CLI_SCHEMA_CONFIG",
            Self::Rejected => "VERI_CLI_REJECTED",
            Self::StoreFailure => "VERI_CLI_STORE_FAILURE",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Config file error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Already initialized
    pub fn already_initialized() -> Self {
        Self::new(
            CliErrorCode::AlreadyInitialized,
            "Data directory already initialized",
        )
    }

    /// Not initialized
    pub fn not_initialized() -> Self {
        Self::new(
            CliErrorCode::NotInitialized,
            "Data directory not initialized. Run 'veridoc init' first.",
        )
    }

    /// Document rejected by validation
    pub fn rejected(failure_count: usize) -> Self {
        Self::new(
            CliErrorCode::Rejected,
            format!("Document rejected with {} failure(s)", failure_count),
        )
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::new(CliErrorCode::SchemaConfig, e.to_string())
    }
}

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        Self::new(CliErrorCode::StoreFailure, e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
