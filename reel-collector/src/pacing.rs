use reelscope_core::{BatchConfig, DelayRange};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

/// Randomized waits between requests to keep request density low.
#[derive(Debug, Clone)]
pub struct PacingConfig {
    /// Wait between consecutive groups of items
    pub between_groups: DelayRange,
    /// Wait between items inside one group
    pub between_items: DelayRange,
}

impl PacingConfig {
    pub fn from_batch(config: &BatchConfig) -> Self {
        Self {
            between_groups: config.batch_delay_ms,
            between_items: config.item_delay_ms,
        }
    }

    /// No waiting at all; for tests and dry runs.
    pub fn immediate() -> Self {
        Self {
            between_groups: DelayRange::none(),
            between_items: DelayRange::none(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PacingStats {
    pub group_waits: u32,
    pub item_waits: u32,
    pub total_waited: Duration,
}

#[derive(Debug)]
pub struct Pacer {
    config: PacingConfig,
    stats: PacingStats,
}

impl Pacer {
    pub fn new(config: PacingConfig) -> Self {
        Self {
            config,
            stats: PacingStats::default(),
        }
    }

    /// Waits after item `index` of a group of `group_len`; no wait after the
    /// last item.
    pub async fn after_item(&mut self, index: usize, group_len: usize) {
        if index + 1 >= group_len {
            return;
        }
        let delay = self.config.between_items.sample();
        debug!("Waiting {:?} before next item", delay);
        self.stats.item_waits += 1;
        self.stats.total_waited += delay;
        sleep(delay).await;
    }

    /// Waits after group `index` of `group_count`; no wait after the last
    /// group.
    pub async fn after_group(&mut self, index: usize, group_count: usize) {
        if index + 1 >= group_count {
            return;
        }
        let delay = self.config.between_groups.sample();
        info!("waiting {:.1} seconds...", delay.as_secs_f64());
        self.stats.group_waits += 1;
        self.stats.total_waited += delay;
        sleep(delay).await;
    }

    pub fn stats(&self) -> &PacingStats {
        &self.stats
    }
}
