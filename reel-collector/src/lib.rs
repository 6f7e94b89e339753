//! Resumable, deduplicating collection of reel links, metadata and comments.

pub mod browser;
pub mod comments;
pub mod links;
pub mod meta;
pub mod orchestrator;
pub mod pacing;
pub mod retry;
pub mod tab_pool;

pub use browser::{BrowserSession, FeedPage, ItemTab};
pub use comments::{CommentAccumulator, CommentDeduplicator, Fingerprint, PrefixFingerprint};
pub use links::{LinkCollection, LinkCollector, StopReason};
pub use meta::{extract_page_meta, PageMeta};
pub use orchestrator::{BatchOrchestrator, RunReport};
pub use pacing::{Pacer, PacingConfig, PacingStats};
pub use retry::{BoundedRetry, RetryConfig, RetryState};
pub use tab_pool::TabPool;
