// Cerebro - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// All errors preserve the causal chain for diagnostic logging.
//
// Malformed spreadsheet rows are not errors: the extractor drops them.
// Bridge errors never reach the user: query resolution falls back to a
// local substring search.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all Cerebro operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum CerebroError {
    /// Catalog store read/write failed.
    Store(StoreError),

    /// Export operation failed.
    Export(ExportError),

    /// Configuration loading or validation failed.
    Config(ConfigError),

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },

    /// Import file exceeds the maximum allowed size.
    InputTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },
}

impl fmt::Display for CerebroError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Store(e) => write!(f, "Store error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
            Self::InputTooLarge {
                path,
                size,
                max_size,
            } => write!(
                f,
                "Input '{}' is {size} bytes, exceeds maximum of {max_size} bytes",
                path.display()
            ),
        }
    }
}

impl std::error::Error for CerebroError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Io { source, .. } => Some(source),
            Self::InputTooLarge { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Bridge errors
// ---------------------------------------------------------------------------

/// Failures of the natural-language query bridge.
///
/// Deliberately not convertible into `CerebroError`: every variant is
/// recovered by falling back to a local substring query.
#[derive(Debug)]
pub enum BridgeError {
    /// No bridge is configured (disabled, offline, or no API key).
    Unconfigured,

    /// The API key environment variable is not set.
    MissingApiKey { env_var: String },

    /// Transport-level failure (DNS, TLS, timeout, body read).
    Http(reqwest::Error),

    /// The service answered with a non-success status.
    Status { status: u16, body: String },

    /// The response envelope did not contain a candidate text part.
    MalformedEnvelope { reason: String },

    /// The candidate text was not a valid query descriptor.
    MalformedDescriptor { raw: String, reason: String },
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unconfigured => write!(f, "Query bridge is not configured"),
            Self::MissingApiKey { env_var } => {
                write!(f, "Query bridge API key variable '{env_var}' is not set")
            }
            Self::Http(e) => write!(f, "Query bridge request failed: {e}"),
            Self::Status { status, body } => {
                write!(f, "Query bridge returned HTTP {status}: {body}")
            }
            Self::MalformedEnvelope { reason } => {
                write!(f, "Query bridge response is malformed: {reason}")
            }
            Self::MalformedDescriptor { raw, reason } => {
                write!(f, "Query bridge descriptor '{raw}' is invalid: {reason}")
            }
        }
    }
}

impl std::error::Error for BridgeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for BridgeError {
    /// The request URL is stripped so it never reaches the logs.
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e.without_url())
    }
}

// ---------------------------------------------------------------------------
// Store errors
// ---------------------------------------------------------------------------

/// Errors related to the catalog store.
#[derive(Debug)]
pub enum StoreError {
    /// I/O error reading or writing the catalog file.
    Io { path: PathBuf, source: io::Error },

    /// The catalog file is not a valid JSON record array.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Catalog I/O error '{}': {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "Catalog file '{}' is corrupt: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}

impl From<StoreError> for CerebroError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to export operations.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the export file.
    Io { path: PathBuf, source: io::Error },

    /// CSV serialisation error.
    Csv { path: PathBuf, source: csv::Error },

    /// JSON serialisation error.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Export I/O error '{}': {source}", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "CSV export error '{}': {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "JSON export error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}

impl From<ExportError> for CerebroError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
///
/// `load_config` reports these as warnings and falls back to defaults;
/// only an explicitly requested `--config` path that cannot be read is fatal.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for CerebroError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for Cerebro results.
pub type Result<T> = std::result::Result<T, CerebroError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_store_error_chain_preserved() {
        let inner = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err: CerebroError = StoreError::Io {
            path: PathBuf::from("catalog.json"),
            source: inner,
        }
        .into();
        assert!(err.to_string().contains("catalog.json"));
        let store = err.source().expect("store error source");
        assert!(store.source().is_some());
    }

    #[test]
    fn test_config_out_of_range_message() {
        let err = ConfigError::ValueOutOfRange {
            field: "bridge.timeout_secs".to_string(),
            value: "0".to_string(),
            expected: "1-120".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Config 'bridge.timeout_secs' = '0' is out of range. Expected: 1-120"
        );
    }
}
