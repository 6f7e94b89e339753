//! TOML-backed run configuration. Every field has a default, so a missing
//! file or a partial one is fine.

use crate::ConfigError;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Inclusive millisecond range a randomized delay is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayRange(pub u64, pub u64);

impl DelayRange {
    pub fn from_secs(min: u64, max: u64) -> Self {
        Self(min * 1000, max * 1000)
    }

    pub fn none() -> Self {
        Self(0, 0)
    }

    /// Lower bound, whichever way round the pair was written.
    pub fn min(&self) -> Duration {
        Duration::from_millis(self.0.min(self.1))
    }

    pub fn max(&self) -> Duration {
        Duration::from_millis(self.0.max(self.1))
    }

    /// Draws a duration uniformly from the range. An inverted pair is
    /// treated as its ordered equivalent.
    pub fn sample(&self) -> Duration {
        let (low, high) = (self.0.min(self.1), self.0.max(self.1));
        Duration::from_millis(fastrand::u64(low..=high))
    }

    fn validate(&self, field: &str) -> Result<(), ConfigError> {
        if self.0 > self.1 {
            return Err(ConfigError::ValidationFailed {
                reason: format!("{} minimum {} exceeds maximum {}", field, self.0, self.1),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReelscopeConfig {
    pub paths: PathsConfig,
    pub links: LinksConfig,
    pub comments: CommentsConfig,
    pub batch: BatchConfig,
    pub sentiment: SentimentConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub reels_file: PathBuf,
    pub output_file: PathBuf,
    pub analysis_file: PathBuf,
    pub plot_file: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            reels_file: PathBuf::from("data/reels.json"),
            output_file: PathBuf::from("data/reels-data.json"),
            analysis_file: PathBuf::from("data/vader-analysis.json"),
            plot_file: PathBuf::from("data/interactive-plot.html"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinksConfig {
    pub max_count: usize,
    pub max_retries: u32,
    pub scroll_step_px: u32,
    /// The feed stops serving links past roughly this many; reaching it with
    /// no new links ends the scroll early.
    pub platform_cap: usize,
    pub settle_ms: u64,
    pub fallback_settle_ms: u64,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            max_count: 6,
            max_retries: 3,
            scroll_step_px: 900,
            platform_cap: 24,
            settle_ms: 2000,
            fallback_settle_ms: 3000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentsConfig {
    pub target_count: usize,
    pub max_attempts: u32,
    pub author_prefix: usize,
    pub text_prefix: usize,
    pub load_delay_ms: DelayRange,
    pub load_more_timeout_secs: u64,
}

impl Default for CommentsConfig {
    fn default() -> Self {
        Self {
            target_count: 100,
            max_attempts: 10,
            author_prefix: 10,
            text_prefix: 30,
            load_delay_ms: DelayRange::from_secs(1, 2),
            load_more_timeout_secs: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub batch_width: usize,
    pub save_every: usize,
    pub batch_delay_ms: DelayRange,
    pub item_delay_ms: DelayRange,
    pub page_timeout_secs: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_width: 3,
            save_every: 3,
            batch_delay_ms: DelayRange::from_secs(5, 10),
            item_delay_ms: DelayRange::from_secs(1, 3),
            page_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentConfig {
    /// ISO 639-3 code, e.g. "eng".
    pub target_language: String,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            target_language: "eng".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5050,
        }
    }
}

impl ReelscopeConfig {
    /// Loads and validates a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => ConfigError::Unreadable {
                path: path.display().to_string(),
                reason: e.to_string(),
            },
        })?;
        Self::from_toml(&content)
    }

    /// Loads `path` if it exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: ReelscopeConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("batch.batch_width", self.batch.batch_width),
            ("batch.save_every", self.batch.save_every),
            ("comments.target_count", self.comments.target_count),
            ("links.max_count", self.links.max_count),
        ];
        for (field, value) in positive {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: value.to_string(),
                });
            }
        }

        self.comments.load_delay_ms.validate("comments.load_delay_ms")?;
        self.batch.batch_delay_ms.validate("batch.batch_delay_ms")?;
        self.batch.item_delay_ms.validate("batch.item_delay_ms")?;

        if whatlang::Lang::from_code(&self.sentiment.target_language).is_none() {
            return Err(ConfigError::InvalidValue {
                field: "sentiment.target_language".to_string(),
                value: self.sentiment.target_language.clone(),
            });
        }

        Ok(())
    }
}
