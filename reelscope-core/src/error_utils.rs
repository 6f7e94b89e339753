use crate::error::*;
use tracing::{error, info, warn};

pub trait ErrorExt {
    fn log_error(&self) -> &Self;
    fn log_warn(&self) -> &Self;
    /// True for "no new data this iteration" failures that feed a stall
    /// counter instead of surfacing to the caller.
    fn is_stall(&self) -> bool;
    fn user_friendly_message(&self) -> String;
    fn error_code(&self) -> String;
}

impl ErrorExt for CoreError {
    fn log_error(&self) -> &Self {
        error!("CoreError: {}", self);
        match self {
            CoreError::Collection(e) => {
                error!("Collection error details: {:?}", e);
            }
            CoreError::Store(e) => {
                error!("Store error details: {:?}", e);
            }
            CoreError::Sentiment(e) => {
                error!("Sentiment error details: {:?}", e);
            }
            CoreError::Config(e) => {
                error!("Configuration error details: {:?}", e);
            }
            _ => {}
        }
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("CoreError (warning): {}", self);
        self
    }

    fn is_stall(&self) -> bool {
        match self {
            CoreError::Collection(e) => e.is_stall(),
            _ => false,
        }
    }

    fn user_friendly_message(&self) -> String {
        match self {
            CoreError::Collection(e) => e.user_friendly_message(),
            CoreError::Store(e) => e.user_friendly_message(),
            CoreError::Sentiment(e) => e.user_friendly_message(),
            CoreError::Config(e) => e.user_friendly_message(),
            CoreError::Io(e) => format!("File operation failed: {}", e),
            CoreError::Serialization(_) => {
                "A data file could not be read or written as JSON.".to_string()
            }
        }
    }

    fn error_code(&self) -> String {
        match self {
            CoreError::Collection(_) => "COLLECTION".to_string(),
            CoreError::Store(_) => "STORE".to_string(),
            CoreError::Sentiment(_) => "SENTIMENT".to_string(),
            CoreError::Config(_) => "CONFIG".to_string(),
            CoreError::Io(_) => "IO".to_string(),
            CoreError::Serialization(_) => "SERIALIZATION".to_string(),
        }
    }
}

impl ErrorExt for CollectionError {
    fn log_error(&self) -> &Self {
        error!("CollectionError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("CollectionError (warning): {}", self);
        self
    }

    fn is_stall(&self) -> bool {
        matches!(
            self,
            CollectionError::WaitTimeout { .. }
                | CollectionError::StaleElement
                | CollectionError::LoadMoreUnavailable
                | CollectionError::ElementNotFound { .. }
        )
    }

    fn user_friendly_message(&self) -> String {
        match self {
            CollectionError::NavigationFailed { url, .. } => {
                format!("Could not open {}. The page may be unavailable.", url)
            }
            CollectionError::WaitTimeout { what, seconds } => {
                format!("Gave up waiting for {} after {} seconds.", what, seconds)
            }
            CollectionError::InvalidItemUrl { url } => {
                format!("'{}' does not look like a reel link.", url)
            }
            CollectionError::SessionClosed => {
                "The browser session was closed. Please start a new run.".to_string()
            }
            _ => "Browser interaction failed. The run will continue.".to_string(),
        }
    }

    fn error_code(&self) -> String {
        match self {
            CollectionError::NavigationFailed { .. } => "COLLECT_NAVIGATION_FAILED".to_string(),
            CollectionError::WaitTimeout { .. } => "COLLECT_WAIT_TIMEOUT".to_string(),
            CollectionError::ElementNotFound { .. } => "COLLECT_ELEMENT_NOT_FOUND".to_string(),
            CollectionError::StaleElement => "COLLECT_STALE_ELEMENT".to_string(),
            CollectionError::LoadMoreUnavailable => "COLLECT_LOAD_MORE_UNAVAILABLE".to_string(),
            CollectionError::InvalidItemUrl { .. } => "COLLECT_INVALID_ITEM_URL".to_string(),
            CollectionError::TabUnavailable { .. } => "COLLECT_TAB_UNAVAILABLE".to_string(),
            CollectionError::SessionClosed => "COLLECT_SESSION_CLOSED".to_string(),
            CollectionError::Browser { .. } => "COLLECT_BROWSER_ERROR".to_string(),
        }
    }
}

impl ErrorExt for StoreError {
    fn log_error(&self) -> &Self {
        error!("StoreError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("StoreError (warning): {}", self);
        self
    }

    fn is_stall(&self) -> bool {
        false
    }

    fn user_friendly_message(&self) -> String {
        match self {
            StoreError::MissingInput { path } => {
                format!("Input file '{}' not found. Run the collection step first.", path)
            }
            StoreError::WriteFailed { path, .. } | StoreError::ReplaceFailed { path, .. } => {
                format!("Could not save '{}'. Check disk space and permissions.", path)
            }
            StoreError::Corrupt { path, .. } => {
                format!("'{}' is not valid JSON and was ignored.", path)
            }
        }
    }

    fn error_code(&self) -> String {
        match self {
            StoreError::MissingInput { .. } => "STORE_MISSING_INPUT".to_string(),
            StoreError::WriteFailed { .. } => "STORE_WRITE_FAILED".to_string(),
            StoreError::ReplaceFailed { .. } => "STORE_REPLACE_FAILED".to_string(),
            StoreError::Corrupt { .. } => "STORE_CORRUPT".to_string(),
        }
    }
}

impl ErrorExt for SentimentError {
    fn log_error(&self) -> &Self {
        error!("SentimentError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("SentimentError (warning): {}", self);
        self
    }

    fn is_stall(&self) -> bool {
        false
    }

    fn user_friendly_message(&self) -> String {
        match self {
            SentimentError::LanguageDetectionFailed { .. } => {
                "Could not identify the language of a comment; it was skipped.".to_string()
            }
            SentimentError::MissingScore { .. } => {
                "Sentiment scoring failed for a comment.".to_string()
            }
        }
    }

    fn error_code(&self) -> String {
        match self {
            SentimentError::LanguageDetectionFailed { .. } => {
                "SENTIMENT_LANGUAGE_DETECTION_FAILED".to_string()
            }
            SentimentError::MissingScore { .. } => "SENTIMENT_MISSING_SCORE".to_string(),
        }
    }
}

impl ErrorExt for ConfigError {
    fn log_error(&self) -> &Self {
        error!("ConfigError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("ConfigError (warning): {}", self);
        self
    }

    fn is_stall(&self) -> bool {
        false
    }

    fn user_friendly_message(&self) -> String {
        match self {
            ConfigError::FileNotFound { path } => {
                format!("Configuration file '{}' not found.", path)
            }
            ConfigError::Unreadable { path, .. } => {
                format!("Configuration file '{}' could not be read.", path)
            }
            ConfigError::Parse(_) => {
                "Configuration file format is invalid. Please check the settings.".to_string()
            }
            ConfigError::InvalidValue { field, .. } => {
                format!("Invalid value for configuration field '{}'.", field)
            }
            ConfigError::ValidationFailed { reason } => {
                format!("Configuration rejected: {}", reason)
            }
        }
    }

    fn error_code(&self) -> String {
        match self {
            ConfigError::FileNotFound { .. } => "CONFIG_FILE_NOT_FOUND".to_string(),
            ConfigError::Unreadable { .. } => "CONFIG_UNREADABLE".to_string(),
            ConfigError::InvalidValue { .. } => "CONFIG_INVALID_VALUE".to_string(),
            ConfigError::ValidationFailed { .. } => "CONFIG_VALIDATION_FAILED".to_string(),
            ConfigError::Parse(_) => "CONFIG_PARSE_ERROR".to_string(),
        }
    }
}

/// Logs a fatal error with its code and user-facing message.
#[derive(Debug, Default)]
pub struct ErrorReporter;

impl ErrorReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn report_error(&self, error: &CoreError) {
        error.log_error();
        info!("Error code: {}", error.error_code());
        info!("User message: {}", error.user_friendly_message());
    }
}
