// Cerebro - platform/config.rs
//
// Platform data directory resolution and config.toml loading with
// startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for Cerebro data and configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/cerebro/ or %APPDATA%\Cerebro\config\)
    pub config_dir: PathBuf,

    /// Data directory holding the catalog snapshot.
    pub data_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            let data_dir = proj_dirs.data_dir().to_path_buf();

            tracing::debug!(
                config = %config_dir.display(),
                data = %data_dir.display(),
                "Platform paths resolved"
            );

            Self {
                config_dir,
                data_dir,
            }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            let fallback = PathBuf::from(".");
            Self {
                config_dir: fallback.clone(),
                data_dir: fallback,
            }
        }
    }

    /// Default config file path.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }

    /// Default catalog snapshot path.
    pub fn catalog_file(&self) -> PathBuf {
        self.data_dir.join(constants::CATALOG_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[bridge]` section.
    pub bridge: BridgeSection,
    /// `[storage]` section.
    pub storage: StorageSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[bridge]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct BridgeSection {
    /// Set to false to always use local substring search.
    pub enabled: Option<bool>,
    /// Base URL of the generative-language API.
    pub endpoint: Option<String>,
    /// Model name.
    pub model: Option<String>,
    /// Name of the environment variable holding the API key.
    pub api_key_env: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

/// `[storage]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct StorageSection {
    /// Catalog snapshot path (empty = platform data dir).
    pub catalog_file: Option<String>,
    /// Records written per batch.
    pub batch_size: Option<usize>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
    /// Log file path (empty = stderr only).
    pub file: Option<String>,
}

/// Validated query bridge settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    pub enabled: bool,
    pub endpoint: String,
    pub model: String,
    pub api_key_env: String,
    pub timeout_secs: u64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: constants::DEFAULT_BRIDGE_ENDPOINT.to_string(),
            model: constants::DEFAULT_BRIDGE_MODEL.to_string(),
            api_key_env: constants::DEFAULT_BRIDGE_API_KEY_ENV.to_string(),
            timeout_secs: constants::DEFAULT_BRIDGE_TIMEOUT_SECS,
        }
    }
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // -- Bridge --
    pub bridge: BridgeConfig,

    // -- Storage --
    /// Catalog snapshot override; `None` = platform data dir.
    pub catalog_file: Option<PathBuf>,
    /// Records written per store batch.
    pub batch_size: usize,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
    /// Log file path.
    pub log_file: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bridge: BridgeConfig::default(),
            catalog_file: None,
            batch_size: constants::DEFAULT_UPLOAD_BATCH_SIZE,
            log_level: None,
            log_file: None,
        }
    }
}

/// Load and validate the config file at `config_path`.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// If the file does not exist, returns defaults with no warnings (first-run).
/// If the file is unreadable or unparseable, returns defaults with a warning.
pub fn load_config(config_path: &Path) -> (AppConfig, Vec<String>) {
    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), Vec::new());
    }

    match load_config_strict(config_path) {
        Ok(loaded) => loaded,
        Err(e) => {
            let msg = format!("{e}. Using defaults.");
            tracing::warn!("{}", msg);
            (AppConfig::default(), vec![msg])
        }
    }
}

/// Load a config file that must exist and parse.
///
/// Used for an explicit `--config` path, where silently falling back to
/// defaults would hide a typo. Out-of-range values are still warnings.
pub fn load_config_strict(config_path: &Path) -> Result<(AppConfig, Vec<String>), ConfigError> {
    let content = std::fs::read_to_string(config_path).map_err(|e| ConfigError::Io {
        path: config_path.to_path_buf(),
        source: e,
    })?;

    let raw: RawConfig = toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
        path: config_path.to_path_buf(),
        source: e,
    })?;

    tracing::info!(path = %config_path.display(), "Loaded config.toml");
    Ok(validate(raw))
}

/// Validate each field against named constants, accumulating all warnings.
pub fn validate(raw: RawConfig) -> (AppConfig, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();
    let mut config = AppConfig::default();

    let out_of_range = |field: &str, value: String, expected: String| {
        ConfigError::ValueOutOfRange {
            field: field.to_string(),
            value,
            expected,
        }
        .to_string()
    };

    // -- Bridge --
    if let Some(enabled) = raw.bridge.enabled {
        config.bridge.enabled = enabled;
    }
    if let Some(endpoint) = raw.bridge.endpoint {
        let trimmed = endpoint.trim_end_matches('/');
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            config.bridge.endpoint = trimmed.to_string();
        } else {
            warnings.push(format!(
                "[bridge] endpoint = \"{endpoint}\" is not an http(s) URL. Using default ({}).",
                constants::DEFAULT_BRIDGE_ENDPOINT,
            ));
        }
    }
    if let Some(model) = raw.bridge.model {
        if model.trim().is_empty() {
            warnings.push(format!(
                "[bridge] model is empty. Using default ({}).",
                constants::DEFAULT_BRIDGE_MODEL,
            ));
        } else {
            config.bridge.model = model;
        }
    }
    if let Some(env_var) = raw.bridge.api_key_env {
        if env_var.trim().is_empty() {
            warnings.push(format!(
                "[bridge] api_key_env is empty. Using default ({}).",
                constants::DEFAULT_BRIDGE_API_KEY_ENV,
            ));
        } else {
            config.bridge.api_key_env = env_var;
        }
    }
    if let Some(secs) = raw.bridge.timeout_secs {
        if (constants::MIN_BRIDGE_TIMEOUT_SECS..=constants::MAX_BRIDGE_TIMEOUT_SECS).contains(&secs)
        {
            config.bridge.timeout_secs = secs;
        } else {
            warnings.push(format!(
                "{}. Using default ({}).",
                out_of_range(
                    "bridge.timeout_secs",
                    secs.to_string(),
                    format!(
                        "{}-{}",
                        constants::MIN_BRIDGE_TIMEOUT_SECS,
                        constants::MAX_BRIDGE_TIMEOUT_SECS
                    ),
                ),
                constants::DEFAULT_BRIDGE_TIMEOUT_SECS,
            ));
        }
    }

    // -- Storage --
    if let Some(ref file) = raw.storage.catalog_file {
        if !file.is_empty() {
            config.catalog_file = Some(PathBuf::from(file));
        }
    }
    if let Some(size) = raw.storage.batch_size {
        if (constants::MIN_UPLOAD_BATCH_SIZE..=constants::MAX_UPLOAD_BATCH_SIZE).contains(&size) {
            config.batch_size = size;
        } else {
            warnings.push(format!(
                "{}. Using default ({}).",
                out_of_range(
                    "storage.batch_size",
                    size.to_string(),
                    format!(
                        "{}-{}",
                        constants::MIN_UPLOAD_BATCH_SIZE,
                        constants::MAX_UPLOAD_BATCH_SIZE
                    ),
                ),
                constants::DEFAULT_UPLOAD_BATCH_SIZE,
            ));
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default (info).",
            ));
        }
    }

    // -- Logging: file --
    if let Some(ref file) = raw.logging.file {
        if !file.is_empty() {
            config.log_file = Some(file.clone());
        }
    }

    if !warnings.is_empty() {
        tracing::warn!(
            count = warnings.len(),
            "Config validation produced warnings"
        );
    }

    (config, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml_text: &str) -> (AppConfig, Vec<String>) {
        validate(toml::from_str(toml_text).unwrap())
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let (config, warnings) = parse("");
        assert!(warnings.is_empty());
        assert_eq!(config.bridge, BridgeConfig::default());
        assert_eq!(config.batch_size, constants::DEFAULT_UPLOAD_BATCH_SIZE);
        assert!(config.catalog_file.is_none());
    }

    #[test]
    fn test_valid_values_applied() {
        let (config, warnings) = parse(
            r#"
            [bridge]
            enabled = false
            endpoint = "http://localhost:8080/v1/"
            model = "local-model"
            api_key_env = "MY_KEY"
            timeout_secs = 30

            [storage]
            catalog_file = "/tmp/catalog.json"
            batch_size = 100

            [logging]
            level = "DEBUG"
            "#,
        );
        assert!(warnings.is_empty(), "{warnings:?}");
        assert!(!config.bridge.enabled);
        assert_eq!(config.bridge.endpoint, "http://localhost:8080/v1");
        assert_eq!(config.bridge.model, "local-model");
        assert_eq!(config.bridge.api_key_env, "MY_KEY");
        assert_eq!(config.bridge.timeout_secs, 30);
        assert_eq!(config.catalog_file, Some(PathBuf::from("/tmp/catalog.json")));
        assert_eq!(config.batch_size, 100);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_invalid_values_warn_and_default() {
        let (config, warnings) = parse(
            r#"
            [bridge]
            endpoint = "ftp://example"
            timeout_secs = 0

            [storage]
            batch_size = 0

            [logging]
            level = "loud"
            "#,
        );
        assert_eq!(warnings.len(), 4, "{warnings:?}");
        assert_eq!(config.bridge, BridgeConfig::default());
        assert_eq!(config.batch_size, constants::DEFAULT_UPLOAD_BATCH_SIZE);
        assert!(config.log_level.is_none());
        assert!(warnings.iter().any(|w| w.contains("bridge.timeout_secs")));
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let (_, warnings) = parse("[future]\nflag = true\n[bridge]\nretries = 3\n");
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_missing_file_is_silent() {
        let dir = tempfile::tempdir().unwrap();
        let (config, warnings) = load_config(&dir.path().join("config.toml"));
        assert!(warnings.is_empty());
        assert!(config.bridge.enabled);
    }

    #[test]
    fn test_unparseable_file_warns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[bridge\nenabled = ").unwrap();
        let (_, warnings) = load_config(&path);
        assert_eq!(warnings.len(), 1);
        assert!(matches!(
            load_config_strict(&path),
            Err(ConfigError::TomlParse { .. })
        ));
    }

    #[test]
    fn test_strict_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_config_strict(&dir.path().join("nope.toml")),
            Err(ConfigError::Io { .. })
        ));
    }
}
