use crate::CollectionError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use url::Url;

/// One rendered comment on an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub text: String,
    pub author: String,
}

impl Comment {
    pub fn new(author: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            author: author.into(),
        }
    }
}

/// Like count as displayed: a number when it parses, otherwise the raw text
/// (e.g. "1.2M").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Likes {
    Count(u64),
    Text(String),
}

impl Likes {
    /// Builds from the first whitespace token of the visible likes text.
    pub fn from_display(text: &str) -> Self {
        let token = text.split_whitespace().next().unwrap_or("").to_string();
        match token.replace(',', "").parse::<u64>() {
            Ok(count) => Likes::Count(count),
            Err(_) => Likes::Text(token),
        }
    }

    /// Numeric value, expanding K/M suffixes on textual counts.
    pub fn as_count(&self) -> Option<u64> {
        match self {
            Likes::Count(count) => Some(*count),
            Likes::Text(text) => parse_compact_count(text),
        }
    }
}

impl Default for Likes {
    fn default() -> Self {
        Likes::Count(0)
    }
}

/// Parses "12,345", "1.2K" or "3M" into a count.
pub fn parse_compact_count(text: &str) -> Option<u64> {
    let cleaned = text.trim().replace(',', "");
    let (digits, multiplier) = match cleaned.chars().last()? {
        'k' | 'K' => (&cleaned[..cleaned.len() - 1], 1_000.0),
        'm' | 'M' => (&cleaned[..cleaned.len() - 1], 1_000_000.0),
        _ => (cleaned.as_str(), 1.0),
    };
    let value: f64 = digits.parse().ok()?;
    if value.is_sign_negative() || !value.is_finite() {
        return None;
    }
    Some((value * multiplier).round() as u64)
}

/// A successfully scraped item. Replaced wholesale on re-scrape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    #[serde(default)]
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub likes: Likes,
    #[serde(default)]
    pub meta_likes: Option<String>,
    #[serde(default)]
    pub meta_comments: Option<String>,
    #[serde(default)]
    pub post_date: Option<NaiveDate>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

/// Id -> record; the persisted source of truth for finished work.
pub type ProgressMap = BTreeMap<String, ItemRecord>;

/// Result of collecting one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemOutcome {
    Collected { id: String, data: ItemRecord },
    Failed { id: String, error: String },
}

impl ItemOutcome {
    pub fn id(&self) -> &str {
        match self {
            ItemOutcome::Collected { id, .. } | ItemOutcome::Failed { id, .. } => id,
        }
    }

    pub fn is_collected(&self) -> bool {
        matches!(self, ItemOutcome::Collected { .. })
    }
}

/// Extracts the item id: the path segment following `/reel/`.
pub fn item_id_from_url(raw: &str) -> Result<String, CollectionError> {
    let invalid = || CollectionError::InvalidItemUrl {
        url: raw.to_string(),
    };
    let parsed = Url::parse(raw).map_err(|_| invalid())?;
    let mut segments = parsed.path_segments().ok_or_else(invalid)?;
    segments
        .by_ref()
        .find(|segment| *segment == "reel")
        .ok_or_else(invalid)?;
    match segments.next() {
        Some(id) if !id.is_empty() => Ok(id.to_string()),
        _ => Err(invalid()),
    }
}

/// Polarity scores for one text, or their average over many.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PolarityScores {
    pub neg: f64,
    pub neu: f64,
    pub pos: f64,
    pub compound: f64,
}

impl PolarityScores {
    /// Component-wise arithmetic mean; `None` for an empty slice so that
    /// "no signal" stays distinct from a neutral average.
    pub fn mean(scores: &[PolarityScores]) -> Option<PolarityScores> {
        if scores.is_empty() {
            return None;
        }
        let n = scores.len() as f64;
        let sum = scores.iter().fold(PolarityScores::default(), |acc, s| PolarityScores {
            neg: acc.neg + s.neg,
            neu: acc.neu + s.neu,
            pos: acc.pos + s.pos,
            compound: acc.compound + s.compound,
        });
        Some(PolarityScores {
            neg: sum.neg / n,
            neu: sum.neu / n,
            pos: sum.pos / n,
            compound: sum.compound / n,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedComment {
    pub text: String,
    pub original_text: String,
    pub author: String,
    pub sentiment: PolarityScores,
}

/// Per-item output of the sentiment pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemAnalysis {
    pub url: String,
    pub likes: Likes,
    pub comments_count: usize,
    pub avg_sentiment: Option<PolarityScores>,
    pub comments: Vec<AnalyzedComment>,
}

pub type AnalysisMap = BTreeMap<String, ItemAnalysis>;

/// Aggregate returned to the browser extension.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    pub compound: f64,
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
    pub processed_comments: usize,
}
