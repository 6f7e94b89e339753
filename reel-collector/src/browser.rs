//! Seams between the collection loops and whatever drives the browser.
//!
//! Implementations own the site-specific parts (selectors, scroll scripts,
//! login). The loops in this crate only rely on the contracts below: every
//! wait is bounded by the timeout it is given, and a failure to find or read
//! something is reported as an error rather than blocking.

use reelscope_core::{Comment, CollectionError};
use std::time::Duration;

/// A scrollable feed page listing item links.
pub trait FeedPage {
    /// Scrolls the viewport to vertical offset `y`.
    async fn scroll_to(&mut self, y: u32) -> Result<(), CollectionError>;

    /// Current vertical scroll offset.
    async fn scroll_position(&mut self) -> Result<u32, CollectionError>;

    /// `href` of every anchor currently rendered.
    async fn anchor_hrefs(&mut self) -> Result<Vec<String>, CollectionError>;

    /// Alternate scroll gesture used when plain scrolling stops yielding links.
    async fn page_down(&mut self) -> Result<(), CollectionError>;
}

/// One browser tab that can show a single item at a time.
pub trait ItemTab {
    /// Loads `url` and waits until the tab is showing an item page.
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<(), CollectionError>;

    /// Full HTML of the current page.
    async fn page_html(&mut self) -> Result<String, CollectionError>;

    /// Visible likes text, e.g. "12,345 likes".
    async fn likes_text(&mut self, timeout: Duration) -> Result<String, CollectionError>;

    /// Currently rendered comments. Each element is read independently, so
    /// one that went stale fails on its own.
    async fn comment_elements(
        &mut self,
    ) -> Result<Vec<Result<Comment, CollectionError>>, CollectionError>;

    /// Clicks "load more comments" if it shows up within `timeout`.
    async fn load_more(&mut self, timeout: Duration) -> Result<(), CollectionError>;
}

/// An authenticated browser with an explicit open/close lifecycle.
pub trait BrowserSession {
    type Tab: ItemTab;

    /// Opens `count` tabs for item collection.
    async fn open_tabs(&mut self, count: usize) -> Result<Vec<Self::Tab>, CollectionError>;

    /// Shuts the browser down. Called once, after all tabs are dropped.
    async fn close(self) -> Result<(), CollectionError>;
}
