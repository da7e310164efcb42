//! Error types for slidenav_core

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while setting up the navigation overlay
///
/// Overlay transitions themselves never fail; these cover configuration,
/// content loading and runtime wiring.
#[derive(Error, Debug)]
pub enum SlidenavError {
    /// Failed to read a file from disk
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML for the expected schema
    #[error("Configuration parsing failed: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Menu content is not valid JSON for the expected schema
    #[error("Menu content parsing failed: {0}")]
    ContentParse(#[from] serde_json::Error),

    /// Configuration parsed but is not usable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A locale tag was requested as default but has no labels
    #[error("No labels registered for locale '{0}'")]
    UnknownLocale(String),

    /// Navigation listener needs a running tokio runtime
    #[error("No async runtime available to host the navigation listener")]
    NoRuntime,
}

/// Result type for slidenav_core operations
pub type Result<T> = std::result::Result<T, SlidenavError>;
