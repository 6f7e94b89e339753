use crate::clean::clean_text;
use crate::language::{LanguageFilter, WhatlangFilter};
use crate::scorer::{PolarityScorer, VaderScorer};
use progress_store::{write_json_atomic, ProgressStore};
use reelscope_core::{
    AnalysisMap, AnalyzedComment, Comment, CoreError, ErrorExt, ErrorRecovery, ItemAnalysis,
    ItemRecord, PolarityScores, RecoveryAction, SentimentConfig, SentimentError,
};
use std::path::Path;
use tracing::{debug, info, warn};

/// Scores every item's comments and reduces them to per-item averages.
pub struct SentimentAggregator<L = WhatlangFilter, S = VaderScorer> {
    filter: L,
    scorer: S,
}

impl SentimentAggregator<WhatlangFilter, VaderScorer> {
    pub fn from_config(config: &SentimentConfig) -> Result<Self, CoreError> {
        let filter = WhatlangFilter::from_code(&config.target_language)?;
        Ok(Self::new(filter, VaderScorer::new()))
    }
}

impl<L: LanguageFilter, S: PolarityScorer> SentimentAggregator<L, S> {
    pub fn new(filter: L, scorer: S) -> Self {
        Self { filter, scorer }
    }

    /// Items left with no scorable comments are kept, with `avg_sentiment`
    /// unset and a zero count.
    pub fn analyze<'a, I>(&self, items: I) -> AnalysisMap
    where
        I: IntoIterator<Item = (&'a String, &'a ItemRecord)>,
    {
        items
            .into_iter()
            .map(|(id, record)| (id.clone(), self.analyze_item(record)))
            .collect()
    }

    pub fn analyze_item(&self, record: &ItemRecord) -> ItemAnalysis {
        let comments: Vec<AnalyzedComment> = record
            .comments
            .iter()
            .filter_map(|comment| self.analyze_comment(comment))
            .collect();

        let scores: Vec<PolarityScores> = comments.iter().map(|c| c.sentiment).collect();

        ItemAnalysis {
            url: record.url.clone(),
            likes: record.likes.clone(),
            comments_count: comments.len(),
            avg_sentiment: PolarityScores::mean(&scores),
            comments,
        }
    }

    fn analyze_comment(&self, comment: &Comment) -> Option<AnalyzedComment> {
        let text = clean_text(&comment.text);
        match self.filter.check(&text) {
            Ok(true) => {}
            Ok(false) => return None,
            Err(e) => return discard(e),
        }

        match self.scorer.polarity(&text) {
            Ok(sentiment) => Some(AnalyzedComment {
                text,
                original_text: comment.text.clone(),
                author: comment.author.clone(),
                sentiment,
            }),
            Err(e) => discard(e),
        }
    }

    /// Reads the collection output at `input`, analyzes it and writes the
    /// result to `output`. A missing input file is an error; nothing is
    /// written in that case.
    pub fn run_analysis(&self, input: &Path, output: &Path) -> Result<AnalysisMap, CoreError> {
        let items = ProgressStore::new(input).load_required()?;
        info!("loaded data for {} reels", items.len());

        let results = self.analyze(&items);
        match corpus_mean(&results) {
            Some(overall) => info!(
                "corpus average over {} comments: compound {:.4} | pos {:.3} | neu {:.3} | neg {:.3}",
                results.values().map(|a| a.comments_count).sum::<usize>(),
                overall.compound,
                overall.pos,
                overall.neu,
                overall.neg
            ),
            None => warn!("no comments survived filtering"),
        }
        for (id, analysis) in &results {
            debug!(
                "{}: {} of {} comments kept",
                id,
                analysis.comments_count,
                items.get(id).map(|r| r.comments.len()).unwrap_or(0)
            );
        }

        write_json_atomic(output, &results)?;
        info!("saved results to {}", output.display());
        Ok(results)
    }
}

/// Mean over every kept comment in `results`, weighting each comment equally
/// rather than each item.
pub fn corpus_mean(results: &AnalysisMap) -> Option<PolarityScores> {
    let scores: Vec<PolarityScores> = results
        .values()
        .flat_map(|analysis| analysis.comments.iter().map(|c| c.sentiment))
        .collect();
    PolarityScores::mean(&scores)
}

fn discard(error: SentimentError) -> Option<AnalyzedComment> {
    let error = CoreError::Sentiment(error);
    match ErrorRecovery::classify(&error) {
        RecoveryAction::Discard => debug!("discarding comment: {}", error),
        _ => {
            error.log_warn();
        }
    }
    None
}
