use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Collection error: {0}")]
    Collection(#[from] CollectionError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Sentiment error: {0}")]
    Sentiment(#[from] SentimentError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Failures raised by a browser session while collecting links or items.
#[derive(Error, Debug, Clone)]
pub enum CollectionError {
    #[error("Navigation to {url} failed: {reason}")]
    NavigationFailed { url: String, reason: String },

    #[error("Timed out after {seconds}s waiting for {what}")]
    WaitTimeout { what: String, seconds: u64 },

    #[error("Element not found: {what}")]
    ElementNotFound { what: String },

    #[error("Element is no longer attached to the page")]
    StaleElement,

    #[error("Load-more control unavailable")]
    LoadMoreUnavailable,

    #[error("Not an item URL: {url}")]
    InvalidItemUrl { url: String },

    #[error("Tab {index} is not open (pool has {open})")]
    TabUnavailable { index: usize, open: usize },

    #[error("Browser session closed")]
    SessionClosed,

    #[error("Browser error: {reason}")]
    Browser { reason: String },
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Required input file missing: {path}")]
    MissingInput { path: String },

    #[error("Failed to write {path}: {reason}")]
    WriteFailed { path: String, reason: String },

    #[error("Failed to replace {path}: {reason}")]
    ReplaceFailed { path: String, reason: String },

    #[error("Corrupt file {path}: {reason}")]
    Corrupt { path: String, reason: String },
}

#[derive(Error, Debug, Clone)]
pub enum SentimentError {
    #[error("Language detection failed for text of {text_length} characters")]
    LanguageDetectionFailed { text_length: usize },

    #[error("Scorer returned no value for {field}")]
    MissingScore { field: String },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Configuration file {path} could not be read: {reason}")]
    Unreadable { path: String, reason: String },

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("Configuration validation failed: {reason}")]
    ValidationFailed { reason: String },

    #[error("Configuration parsing error: {0}")]
    Parse(#[from] toml::de::Error),
}
