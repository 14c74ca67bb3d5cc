//! Error types for the onboarding engine.

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    #[error("Output error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Failure to obtain the education dataset.
///
/// This is the only error the session surfaces; its `Display` output is what
/// ends up in `SessionState::error`.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Request to {url} failed: {reason}")]
    Http { url: String, reason: String },

    #[error("Request to {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("Malformed education metadata: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Collaborator-specific failure carrying a ready-made message.
    #[error("{0}")]
    Other(String),
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;
