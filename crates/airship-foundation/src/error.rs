//! Error handling for the Airship tooling

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Core error type used throughout the Airship tooling
///
/// Every variant is a local, recoverable condition: it is reported to the
/// user and the next invocation starts from scratch.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AirshipError {
    #[error("tsconfig not found for {}", path.display())]
    ConfigNotFound { path: PathBuf },

    #[error("Failed to parse {}: {message}", path.display())]
    ConfigParse {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    #[error("Circular extends dependency detected: {}", chain_display(chain))]
    CircularExtends { chain: Vec<PathBuf> },

    #[error("Extended configuration '{reference}' not found (referenced from {})", from.display())]
    ExtendsNotFound { reference: String, from: PathBuf },

    #[error("{option} not specified in {}", config.display())]
    MissingRequiredOption {
        option: &'static str,
        config: PathBuf,
    },

    #[error("File not in srcDir: {}", path.display())]
    NoMatchingRoot { path: PathBuf },

    #[error("Output file could not be found: {}", path.display())]
    OutputNotFound { path: PathBuf },

    #[error("Could not create Component with name '{name}' - not a valid name for a component")]
    InvalidComponentName { name: String },

    #[error("File already exists: {}", path.display())]
    AlreadyExists { path: PathBuf },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("I/O error: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },
}

fn chain_display(chain: &[PathBuf]) -> String {
    chain
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Result type alias for convenience
pub type AirshipResult<T> = Result<T, AirshipError>;

/// Stable error codes, one per [`AirshipError`] variant
pub mod error_codes {
    pub const E2000_CONFIG_NOT_FOUND: &str = "E2000";
    pub const E2001_CONFIG_PARSE: &str = "E2001";
    pub const E2002_CIRCULAR_EXTENDS: &str = "E2002";
    pub const E2003_EXTENDS_NOT_FOUND: &str = "E2003";
    pub const E2004_MISSING_REQUIRED_OPTION: &str = "E2004";
    pub const E2005_NO_MATCHING_ROOT: &str = "E2005";
    pub const E2006_OUTPUT_NOT_FOUND: &str = "E2006";
    pub const E2007_INVALID_COMPONENT_NAME: &str = "E2007";
    pub const E2008_ALREADY_EXISTS: &str = "E2008";
    pub const E2009_CONFIG: &str = "E2009";
    pub const E2010_IO: &str = "E2010";
}

impl AirshipError {
    pub fn config_not_found(path: impl Into<PathBuf>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn config_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ConfigParse {
            path: path.into(),
            message: message.into(),
            source: None,
        }
    }

    pub fn missing_option(option: &'static str, config: impl Into<PathBuf>) -> Self {
        Self::MissingRequiredOption {
            option,
            config: config.into(),
        }
    }

    pub fn no_matching_root(path: impl Into<PathBuf>) -> Self {
        Self::NoMatchingRoot { path: path.into() }
    }

    pub fn output_not_found(path: impl Into<PathBuf>) -> Self {
        Self::OutputNotFound { path: path.into() }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Wrap an I/O failure together with the path that caused it
    pub fn io_at(path: &Path, err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{}: {}", path.display(), err),
            path: Some(path.to_path_buf()),
            source: Some(err),
        }
    }

    /// Machine-readable code for this error
    pub fn error_code(&self) -> &'static str {
        use error_codes::*;

        match self {
            Self::ConfigNotFound { .. } => E2000_CONFIG_NOT_FOUND,
            Self::ConfigParse { .. } => E2001_CONFIG_PARSE,
            Self::CircularExtends { .. } => E2002_CIRCULAR_EXTENDS,
            Self::ExtendsNotFound { .. } => E2003_EXTENDS_NOT_FOUND,
            Self::MissingRequiredOption { .. } => E2004_MISSING_REQUIRED_OPTION,
            Self::NoMatchingRoot { .. } => E2005_NO_MATCHING_ROOT,
            Self::OutputNotFound { .. } => E2006_OUTPUT_NOT_FOUND,
            Self::InvalidComponentName { .. } => E2007_INVALID_COMPONENT_NAME,
            Self::AlreadyExists { .. } => E2008_ALREADY_EXISTS,
            Self::Config { .. } => E2009_CONFIG,
            Self::Io { .. } => E2010_IO,
        }
    }

    /// Actionable hint shown next to the message, when there is one
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::ConfigNotFound { .. } => {
                Some("Open a file that belongs to an Airship TypeScript project (a directory with a tsconfig.json above it)")
            }
            Self::MissingRequiredOption { .. } => {
                Some("Add the option to compilerOptions in tsconfig.json")
            }
            Self::NoMatchingRoot { .. } => {
                Some("Only files under the rootDir or rootDirs declared in tsconfig.json have compiled output")
            }
            Self::OutputNotFound { .. } => Some(
                "The output file for this TypeScript source file could not be found, make sure the unity editor is running the TypeScript compiler and try again.",
            ),
            Self::InvalidComponentName { .. } => {
                Some("Use letters, digits, '.', '-' or '_' only, e.g. SpinnerComponent")
            }
            _ => None,
        }
    }

    /// Context fields attached to the report
    fn details(&self) -> Option<Value> {
        match self {
            Self::ConfigNotFound { path }
            | Self::NoMatchingRoot { path }
            | Self::OutputNotFound { path }
            | Self::AlreadyExists { path } => Some(json!({ "path": path.display().to_string() })),
            Self::ConfigParse { path, .. } => {
                Some(json!({ "config": path.display().to_string() }))
            }
            Self::CircularExtends { chain } => Some(json!({
                "chain": chain.iter().map(|p| p.display().to_string()).collect::<Vec<_>>()
            })),
            Self::ExtendsNotFound { reference, from } => Some(json!({
                "extends": reference,
                "config": from.display().to_string()
            })),
            Self::MissingRequiredOption { option, config } => Some(json!({
                "option": option,
                "config": config.display().to_string()
            })),
            Self::Io {
                path: Some(path), ..
            } => Some(json!({ "path": path.display().to_string() })),
            _ => None,
        }
    }
}

impl From<std::io::Error> for AirshipError {
    fn from(err: std::io::Error) -> Self {
        AirshipError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

/// Serializable error payload printed by the CLI
///
/// # Example
/// ```rust
/// use airship_foundation::{AirshipError, ErrorReport};
///
/// let report = ErrorReport::from(&AirshipError::no_matching_root("/proj/lib/a.ts"));
/// assert_eq!(report.code, "E2005");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Machine-readable error code
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional context
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// Optional actionable suggestion for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl From<&AirshipError> for ErrorReport {
    fn from(err: &AirshipError) -> Self {
        Self {
            code: err.error_code().to_string(),
            message: err.to_string(),
            details: err.details(),
            suggestion: err.suggestion().map(str::to_string),
        }
    }
}

impl std::fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {}", suggestion)?;
        }
        Ok(())
    }
}
