use reelscope_core::{ConfigError, SentimentError};
use whatlang::Lang;

/// Decides whether a cleaned comment is kept for scoring.
pub trait LanguageFilter {
    /// `Ok(false)` for text in another language; `Err` when the check itself
    /// could not decide.
    fn check(&self, text: &str) -> Result<bool, SentimentError>;

    /// Failed checks count as "not kept".
    fn accepts(&self, text: &str) -> bool {
        self.check(text).unwrap_or(false)
    }
}

/// Keeps comments whose detected language is the target language. Empty
/// text and failed detections are rejected.
#[derive(Debug, Clone, Copy)]
pub struct WhatlangFilter {
    target: Lang,
}

impl WhatlangFilter {
    pub fn new(target: Lang) -> Self {
        Self { target }
    }

    /// Builds from an ISO 639-3 code such as `"eng"`.
    pub fn from_code(code: &str) -> Result<Self, ConfigError> {
        Lang::from_code(code)
            .map(Self::new)
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "sentiment.target_language".to_string(),
                value: code.to_string(),
            })
    }

    pub fn target(&self) -> Lang {
        self.target
    }

    fn detect(&self, text: &str) -> Result<Lang, SentimentError> {
        whatlang::detect(text)
            .map(|info| info.lang())
            .ok_or(SentimentError::LanguageDetectionFailed {
                text_length: text.chars().count(),
            })
    }
}

impl LanguageFilter for WhatlangFilter {
    fn check(&self, text: &str) -> Result<bool, SentimentError> {
        if text.trim().is_empty() {
            return Ok(false);
        }
        Ok(self.detect(text)? == self.target)
    }
}

/// Keeps every non-empty comment.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl LanguageFilter for AcceptAll {
    fn check(&self, text: &str) -> Result<bool, SentimentError> {
        Ok(!text.trim().is_empty())
    }
}

impl<F> LanguageFilter for F
where
    F: Fn(&str) -> bool,
{
    fn check(&self, text: &str) -> Result<bool, SentimentError> {
        Ok(self(text))
    }
}
