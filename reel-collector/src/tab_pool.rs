use reelscope_core::CollectionError;

/// Fixed pool of execution contexts (browser tabs) handed out round-robin.
///
/// Checkouts are sequential: a tab is borrowed mutably, used for one item,
/// and returned before the next checkout. Within a group, member `i` gets
/// tab `i` because each group starts with [`TabPool::start_group`].
#[derive(Debug)]
pub struct TabPool<T> {
    tabs: Vec<T>,
    cursor: usize,
}

impl<T> TabPool<T> {
    pub fn new(tabs: Vec<T>) -> Result<Self, CollectionError> {
        if tabs.is_empty() {
            return Err(CollectionError::TabUnavailable { index: 0, open: 0 });
        }
        Ok(Self {
            tabs,
            cursor: 0,
        })
    }

    /// Number of tabs, i.e. the batch width.
    pub fn width(&self) -> usize {
        self.tabs.len()
    }

    /// Rewinds the cursor so the next checkout returns tab 0.
    pub fn start_group(&mut self) {
        self.cursor = 0;
    }

    /// Next tab in round-robin order with its index.
    pub fn checkout(&mut self) -> (usize, &mut T) {
        let index = self.cursor;
        self.cursor = (self.cursor + 1) % self.tabs.len();
        (index, &mut self.tabs[index])
    }

    pub fn into_tabs(self) -> Vec<T> {
        self.tabs
    }
}
