//! CLI error types with miette diagnostics.
//!
//! Maps core, config, and I/O failures into user-facing errors with help
//! text and a process exit code.

use miette::Diagnostic;
use thiserror::Error;

use leadgate_config::ConfigError;
use leadgate_core::{CoreError, Rejection};

/// Process exit codes.
pub mod exit_code {
    #[allow(dead_code)]
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const REJECTED: i32 = 6;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Decisions ────────────────────────────────────────────────────
    #[error("Submission rejected ({reason}): {message}")]
    #[diagnostic(
        code(leadgate::rejected),
        help("Fix the submission and check it again.")
    )]
    Rejected { reason: String, message: String },

    // ── Input ────────────────────────────────────────────────────────
    #[error("File not found: {path}")]
    #[diagnostic(code(leadgate::not_found), help("Check the path and try again."))]
    FileNotFound { path: String },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(leadgate::validation))]
    Validation { field: String, reason: String },

    #[error("Could not read {path}: {reason}")]
    #[diagnostic(
        code(leadgate::invalid_file),
        help("Submission and records files must be JSON documents.")
    )]
    InvalidFile { path: String, reason: String },

    // ── Store ────────────────────────────────────────────────────────
    #[error("{entity_type} '{identifier}' not found")]
    #[diagnostic(code(leadgate::record_not_found))]
    RecordNotFound {
        entity_type: String,
        identifier: String,
    },

    #[error("{entity_type} '{key}' already exists in the records file")]
    #[diagnostic(
        code(leadgate::duplicate),
        help("Each (email, course) pair may appear at most once.")
    )]
    Duplicate { entity_type: String, key: String },

    #[error("Store error: {message}")]
    #[diagnostic(code(leadgate::store))]
    Store { message: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(
        code(leadgate::config),
        help("Inspect the effective settings with: leadgate config show")
    )]
    Config(#[from] ConfigError),

    #[error("Configuration file already exists: {path}")]
    #[diagnostic(
        code(leadgate::config_exists),
        help("Use --force to overwrite it.")
    )]
    ConfigExists { path: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Serialization failed: {0}")]
    #[diagnostic(code(leadgate::serialize))]
    Serialize(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Rejected { .. } => exit_code::REJECTED,
            Self::FileNotFound { .. } | Self::RecordNotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::InvalidFile { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

impl From<Rejection> for CliError {
    fn from(rejection: Rejection) -> Self {
        Self::Rejected {
            reason: rejection.reason.code().into(),
            message: rejection.message,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound {
                entity_type,
                identifier,
            } => Self::RecordNotFound {
                entity_type,
                identifier,
            },
            CoreError::Duplicate { entity_type, key } => Self::Duplicate { entity_type, key },
            CoreError::Store { message } => Self::Store { message },
            CoreError::Config { message } => Self::Validation {
                field: "config".into(),
                reason: message,
            },
            CoreError::Internal(message) => Self::Store { message },
        }
    }
}
