// Cerebro - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "Cerebro";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "Cerebro";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Extraction
// =============================================================================

/// Number of leading cells searched for the month/year anchor.
pub const ANCHOR_SEARCH_WINDOW: usize = 15;

/// Exclusive lower bound for a plausible publication year.
pub const MIN_YEAR_EXCLUSIVE: i64 = 1900;

/// Exclusive upper bound for a plausible publication year.
pub const MAX_YEAR_EXCLUSIVE: i64 = 2100;

/// Collection name assigned to issues with no collected edition.
pub const UNCOLLECTED_COLLECTION: &str = "Uncollected / Single Issue";

/// Format assigned to issues with no collected edition.
pub const NOT_PRINTED_FORMAT: &str = "Not Printed";

/// Format assigned to collected issues whose format cell is blank.
pub const UNKNOWN_FORMAT: &str = "Unknown";

/// Tokens appended to the search index of uncollected issues.
pub const UNCOLLECTED_SEARCH_TOKENS: &str = "uncollected missing";

/// Line count above which extraction fans out across the rayon pool.
/// Small uploads are faster on a single thread.
pub const PARALLEL_LINE_THRESHOLD: usize = 2_048;

// =============================================================================
// Storage
// =============================================================================

/// Default number of records written per store batch.
pub const DEFAULT_UPLOAD_BATCH_SIZE: usize = 450;

/// Minimum configurable batch size.
pub const MIN_UPLOAD_BATCH_SIZE: usize = 1;

/// Maximum configurable batch size.
pub const MAX_UPLOAD_BATCH_SIZE: usize = 10_000;

/// File name of the local catalog snapshot inside the data directory.
pub const CATALOG_FILE_NAME: &str = "catalog.json";

/// Maximum size of an import file in bytes (64 MB).
pub const MAX_IMPORT_FILE_SIZE: u64 = 64 * 1024 * 1024;

// =============================================================================
// Query bridge
// =============================================================================

/// Default base URL of the generative-language API.
pub const DEFAULT_BRIDGE_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model used to translate free-text queries.
pub const DEFAULT_BRIDGE_MODEL: &str = "gemini-2.5-flash-preview-09-2025";

/// Environment variable holding the bridge API key.
pub const DEFAULT_BRIDGE_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Default bridge request timeout in seconds.
pub const DEFAULT_BRIDGE_TIMEOUT_SECS: u64 = 10;

/// Minimum configurable bridge timeout in seconds.
pub const MIN_BRIDGE_TIMEOUT_SECS: u64 = 1;

/// Maximum configurable bridge timeout in seconds.
pub const MAX_BRIDGE_TIMEOUT_SECS: u64 = 120;

// =============================================================================
// Logging / config
// =============================================================================

/// Default log level when neither RUST_LOG, --debug, nor config sets one.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Config file name, looked up in the platform config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";
