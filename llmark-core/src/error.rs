/// Top-level LLMark error type.
///
/// All fallible operations in `llmark-core` return [`Result<T, MarkError>`](Result).
/// Each variant wraps a domain-specific error enum, allowing callers to
/// match on the error source without losing type information.
#[derive(thiserror::Error, Debug)]
pub enum MarkError {
    /// Error from the bookmark persistence layer.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Error in configuration parsing or validation.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors from the key-value persistence layer.
///
/// Note that most consumers never see these: `BookmarkStore` deliberately
/// degrades reads to an empty list and skips writes when the backend is
/// unavailable, logging at `warn` instead of propagating.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// Underlying `SQLite` operation failed.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// JSON serialization/deserialization of stored records failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The storage backend is unreachable or the capability was revoked.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// A guarded (compare-and-swap) write lost the race too many times.
    #[error("Write conflict on key '{key}' after {attempts} attempts")]
    Conflict {
        /// Storage key the write was targeting.
        key: String,
        /// Number of compare-and-swap attempts made before giving up.
        attempts: u32,
    },
}

/// Errors in LLMark configuration parsing and validation.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The configuration file does not exist at the expected path.
    #[error("Config file not found: {0}")]
    NotFound(String),

    /// Configuration values are present but semantically invalid.
    #[error("Invalid config: {0}")]
    Invalid(String),

    /// Configuration file syntax could not be parsed (TOML error).
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Convenience alias for `Result<T, MarkError>`.
pub type Result<T> = std::result::Result<T, MarkError>;
