use reelscope_core::{PolarityScores, SentimentError};
use std::collections::HashMap;
use vader_sentiment::SentimentIntensityAnalyzer;

/// Lexicon scorer seam.
pub trait PolarityScorer {
    fn polarity(&self, text: &str) -> Result<PolarityScores, SentimentError>;
}

/// VADER, the rule-based scorer tuned for social media text.
pub struct VaderScorer {
    analyzer: SentimentIntensityAnalyzer<'static>,
}

impl VaderScorer {
    pub fn new() -> Self {
        Self {
            analyzer: SentimentIntensityAnalyzer::new(),
        }
    }
}

impl Default for VaderScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl PolarityScorer for VaderScorer {
    fn polarity(&self, text: &str) -> Result<PolarityScores, SentimentError> {
        scores_from_map(&self.analyzer.polarity_scores(text))
    }
}

fn scores_from_map(scores: &HashMap<&str, f64>) -> Result<PolarityScores, SentimentError> {
    let field = |name: &str| {
        scores
            .get(name)
            .copied()
            .ok_or_else(|| SentimentError::MissingScore {
                field: name.to_string(),
            })
    };

    Ok(PolarityScores {
        neg: field("neg")?,
        neu: field("neu")?,
        pos: field("pos")?,
        compound: field("compound")?,
    })
}
