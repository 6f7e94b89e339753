use crate::browser::{BrowserSession, ItemTab};
use crate::comments::{CommentDeduplicator, Fingerprint, PrefixFingerprint};
use crate::meta::extract_page_meta;
use crate::pacing::{Pacer, PacingConfig, PacingStats};
use crate::tab_pool::TabPool;
use progress_store::{LinkStore, ProgressStore};
use reelscope_core::{
    item_id_from_url, BatchConfig, CollectionError, CommentsConfig, CoreError, ErrorExt,
    ErrorRecovery, ItemOutcome, ItemRecord, Likes, ProgressMap, RecoveryAction,
};
use std::time::Duration;
use tracing::{error, info, warn};

/// Counters for one orchestrator run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub processed: usize,
    pub collected: usize,
    pub failed: usize,
    pub saves: usize,
    pub outcomes: Vec<ItemOutcome>,
    pub pacing: PacingStats,
}

/// Drives per-item collection over a pool of tabs, one group at a time,
/// flushing successes to the progress store as it goes.
pub struct BatchOrchestrator<'s, F = PrefixFingerprint> {
    store: &'s ProgressStore,
    deduplicator: CommentDeduplicator<F>,
    save_every: usize,
    page_timeout: Duration,
    pacing: PacingConfig,
}

impl<'s> BatchOrchestrator<'s, PrefixFingerprint> {
    pub fn new(store: &'s ProgressStore, batch: &BatchConfig, comments: &CommentsConfig) -> Self {
        Self::with_deduplicator(store, batch, CommentDeduplicator::from_config(comments))
    }
}

impl<'s, F: Fingerprint> BatchOrchestrator<'s, F> {
    pub fn with_deduplicator(
        store: &'s ProgressStore,
        batch: &BatchConfig,
        deduplicator: CommentDeduplicator<F>,
    ) -> Self {
        Self {
            store,
            deduplicator,
            save_every: batch.save_every.max(1),
            page_timeout: Duration::from_secs(batch.page_timeout_secs),
            pacing: PacingConfig::from_batch(batch),
        }
    }

    pub fn with_pacing(mut self, pacing: PacingConfig) -> Self {
        self.pacing = pacing;
        self
    }

    /// Opens a tab pool on `session`, runs, and closes the session whether
    /// or not the run succeeded.
    pub async fn run_session<S: BrowserSession>(
        &self,
        mut session: S,
        batch_width: usize,
        pending_urls: &[String],
    ) -> Result<RunReport, CoreError> {
        let result = match session.open_tabs(batch_width).await {
            Ok(tabs) => match TabPool::new(tabs) {
                Ok(mut pool) => self.run(&mut pool, pending_urls).await,
                Err(e) => Err(e.into()),
            },
            Err(e) => Err(e.into()),
        };

        close_session(session).await;
        result
    }

    /// Runs every saved link the progress store does not hold yet. With
    /// nothing pending the session is closed without opening tabs.
    pub async fn collect_pending<S: BrowserSession>(
        &self,
        session: S,
        links: &LinkStore,
        batch_width: usize,
    ) -> Result<RunReport, CoreError> {
        let work = match links.load().and_then(|saved| self.store.pending(&saved)) {
            Ok(work) => work,
            Err(e) => {
                close_session(session).await;
                return Err(e);
            }
        };
        info!(
            "{} reels already collected, {} pending",
            work.already_done,
            work.pending.len()
        );
        if !work.unrecognized.is_empty() {
            warn!("skipping {} links that are not reel URLs", work.unrecognized.len());
        }

        if work.pending.is_empty() {
            close_session(session).await;
            return Ok(RunReport::default());
        }
        self.run_session(session, batch_width, &work.pending).await
    }

    /// Processes `pending_urls` in groups of the pool's width.
    pub async fn run<T: ItemTab>(
        &self,
        pool: &mut TabPool<T>,
        pending_urls: &[String],
    ) -> Result<RunReport, CoreError> {
        let mut pacer = Pacer::new(self.pacing.clone());
        let mut report = RunReport::default();
        let mut unsaved = ProgressMap::new();

        let groups: Vec<&[String]> = pending_urls.chunks(pool.width()).collect();
        let group_count = groups.len();

        info!("total reels to process: {}", pending_urls.len());

        for (group_index, group) in groups.into_iter().enumerate() {
            info!("processing batch of {} reels...", group.len());
            pool.start_group();

            for (member, url) in group.iter().enumerate() {
                let (tab_index, tab) = pool.checkout();
                let outcome = match self.collect_outcome(tab, url).await {
                    Ok(outcome) => outcome,
                    Err(fatal) => {
                        error!("Aborting run: {}", fatal);
                        if !unsaved.is_empty() {
                            self.store.merge_and_save(&unsaved)?;
                            report.saves += 1;
                        }
                        return Err(fatal);
                    }
                };
                report.processed += 1;

                match &outcome {
                    ItemOutcome::Collected { id, data } => {
                        info!(
                            "tab {}: got {:?} likes, {} comments",
                            tab_index,
                            data.likes,
                            data.comments.len()
                        );
                        info!(
                            "meta: {} likes, {} comments, posted {}",
                            data.meta_likes.as_deref().unwrap_or("?"),
                            data.meta_comments.as_deref().unwrap_or("?"),
                            data.post_date
                                .map(|d| d.to_string())
                                .unwrap_or_else(|| "unknown".to_string())
                        );
                        report.collected += 1;
                        unsaved.insert(id.clone(), data.clone());
                    }
                    ItemOutcome::Failed { id, error } => {
                        warn!("failed {}: {}", id, error);
                        report.failed += 1;
                    }
                }
                report.outcomes.push(outcome);

                pacer.after_item(member, group.len()).await;
            }

            let is_last = group_index + 1 == group_count;
            if (group_index + 1) % self.save_every == 0 || is_last {
                self.store.merge_and_save(&unsaved)?;
                unsaved.clear();
                report.saves += 1;
            }

            pacer.after_group(group_index, group_count).await;
        }

        info!("done processing {} reels", report.processed);
        report.pacing = pacer.stats().clone();
        Ok(report)
    }

    /// Collects one item, turning recoverable failures into an error entry.
    /// Only failures that end the whole run come back as `Err`.
    async fn collect_outcome<T: ItemTab>(
        &self,
        tab: &mut T,
        url: &str,
    ) -> Result<ItemOutcome, CoreError> {
        let id = match item_id_from_url(url) {
            Ok(id) => id,
            Err(e) => {
                return Ok(ItemOutcome::Failed {
                    id: url.to_string(),
                    error: e.to_string(),
                })
            }
        };

        match self.collect_item(tab, &id, url).await {
            Ok(data) => Ok(ItemOutcome::Collected { id, data }),
            Err(e) => {
                let error = CoreError::Collection(e);
                if ErrorRecovery::classify(&error) == RecoveryAction::Abort {
                    return Err(error);
                }
                error.log_warn();
                Ok(ItemOutcome::Failed {
                    id,
                    error: error.to_string(),
                })
            }
        }
    }

    async fn collect_item<T: ItemTab>(
        &self,
        tab: &mut T,
        id: &str,
        url: &str,
    ) -> Result<ItemRecord, CollectionError> {
        tab.navigate(url, self.page_timeout).await?;

        let html = tab.page_html().await?;
        let meta = extract_page_meta(&html);

        let likes_text = tab.likes_text(self.page_timeout).await?;
        let comments = self.deduplicator.load_comments(tab).await;

        Ok(ItemRecord {
            id: id.to_string(),
            url: url.to_string(),
            likes: Likes::from_display(&likes_text),
            meta_likes: meta.likes,
            meta_comments: meta.comments,
            post_date: meta.post_date,
            comments,
        })
    }
}

async fn close_session<S: BrowserSession>(session: S) {
    if let Err(e) = session.close().await {
        warn!("Closing browser session failed: {}", e);
    }
}
