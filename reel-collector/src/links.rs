use crate::browser::FeedPage;
use crate::retry::BoundedRetry;
use progress_store::LinkStore;
use reelscope_core::{CoreError, LinksConfig};
use std::collections::HashSet;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

const ITEM_PATH_MARKER: &str = "/reel/";

/// Why a link scroll ended. None of these is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    TargetReached,
    Stalled,
    PlatformCap,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkCollection {
    /// Distinct item URLs in discovery order, at most `max_count`.
    pub links: Vec<String>,
    pub stop_reason: StopReason,
}

/// Scrolls a feed and accumulates distinct item URLs.
pub struct LinkCollector {
    config: LinksConfig,
}

impl LinkCollector {
    pub fn new(config: LinksConfig) -> Self {
        Self { config }
    }

    pub async fn collect<P: FeedPage>(&self, page: &mut P) -> LinkCollection {
        let max_count = self.config.max_count;
        let mut retry = BoundedRetry::with_max_attempts(self.config.max_retries);
        let mut seen = HashSet::new();
        let mut links = Vec::new();
        let mut position = 0u32;

        let stop_reason = loop {
            if links.len() >= max_count {
                break StopReason::TargetReached;
            }
            if retry.is_exhausted() {
                break StopReason::Stalled;
            }

            if let Err(e) = page
                .scroll_to(position.saturating_add(self.config.scroll_step_px))
                .await
            {
                warn!("Scroll failed: {}", e);
            }
            sleep(Duration::from_millis(self.config.settle_ms)).await;

            let found = match page.anchor_hrefs().await {
                Ok(hrefs) => hrefs,
                Err(e) => {
                    warn!("Could not read links: {}", e);
                    Vec::new()
                }
            };

            let before = links.len();
            for href in found {
                if href.contains(ITEM_PATH_MARKER) && seen.insert(href.clone()) {
                    links.push(href);
                }
            }
            let gained = links.len() - before;

            if gained == 0 {
                retry.record_stall();
                info!(
                    "no new reels (retry {}/{})",
                    retry.attempts(),
                    retry.max_attempts()
                );
                if let Err(e) = page.page_down().await {
                    warn!("Fallback scroll failed: {}", e);
                }
                sleep(Duration::from_millis(self.config.fallback_settle_ms)).await;
            } else {
                retry.observe(links.len());
                info!("found {}/{} reels", links.len().min(max_count), max_count);
            }

            match page.scroll_position().await {
                Ok(y) => position = y,
                Err(e) => warn!("Could not read scroll position: {}", e),
            }

            if gained == 0 && links.len() >= self.config.platform_cap {
                info!("hit the feed's link cap - try again later");
                break StopReason::PlatformCap;
            }
        };

        links.truncate(max_count);
        LinkCollection { links, stop_reason }
    }

    /// Scrolls `page`, then merges what it found into the saved link list.
    /// Returns the full saved list, earlier runs' links first.
    pub async fn collect_and_save<P: FeedPage>(
        &self,
        page: &mut P,
        links: &LinkStore,
    ) -> Result<Vec<String>, CoreError> {
        let collection = self.collect(page).await;
        info!(
            "collected {} reels ({:?})",
            collection.links.len(),
            collection.stop_reason
        );
        links.save_union(&collection.links)
    }
}
