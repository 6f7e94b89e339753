use crate::scorer::PolarityScorer;
use reelscope_core::{BatchSummary, ErrorExt};
use tracing::debug;

/// Compound scores above this count as positive, below its negation as
/// negative.
pub const NEUTRAL_BAND: f64 = 0.05;

/// Scores raw texts and reduces them to the extension's summary. An empty
/// input yields all zeros.
pub fn summarize_batch<S, T>(scorer: &S, texts: &[T]) -> BatchSummary
where
    S: PolarityScorer + ?Sized,
    T: AsRef<str>,
{
    let mut compounds = Vec::with_capacity(texts.len());
    for (i, text) in texts.iter().enumerate() {
        let text = text.as_ref();
        match scorer.polarity(text) {
            Ok(scores) => {
                debug!(
                    "comment {}: {} -> compound {:.4} | pos {:.2} | neu {:.2} | neg {:.2}",
                    i + 1,
                    preview(text, 50),
                    scores.compound,
                    scores.pos,
                    scores.neu,
                    scores.neg
                );
                compounds.push(scores.compound);
            }
            Err(e) => {
                e.log_warn();
            }
        }
    }

    let mut summary = summarize_compounds(&compounds);
    summary.processed_comments = texts.len();
    summary
}

/// Mean compound plus the positive/neutral/negative fractions.
pub fn summarize_compounds(compounds: &[f64]) -> BatchSummary {
    if compounds.is_empty() {
        return BatchSummary::default();
    }

    let n = compounds.len() as f64;
    let fraction = |pred: fn(f64) -> bool| {
        compounds.iter().filter(|&&c| pred(c)).count() as f64 / n
    };

    BatchSummary {
        compound: compounds.iter().sum::<f64>() / n,
        positive: fraction(|c| c > NEUTRAL_BAND),
        neutral: fraction(|c| (-NEUTRAL_BAND..=NEUTRAL_BAND).contains(&c)),
        negative: fraction(|c| c < -NEUTRAL_BAND),
        processed_comments: compounds.len(),
    }
}

fn preview(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}
