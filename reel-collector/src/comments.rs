use crate::browser::ItemTab;
use crate::retry::BoundedRetry;
use reelscope_core::{Comment, CommentsConfig, DelayRange};
use std::collections::HashSet;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Derives the key two comments are considered duplicates under.
pub trait Fingerprint {
    fn fingerprint(&self, comment: &Comment) -> String;
}

/// `author[..author_chars]_text[..text_chars]`, counted in chars. Lossy on
/// purpose: re-rendered comments with small trailing differences collapse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefixFingerprint {
    pub author_chars: usize,
    pub text_chars: usize,
}

impl PrefixFingerprint {
    pub fn from_config(config: &CommentsConfig) -> Self {
        Self {
            author_chars: config.author_prefix,
            text_chars: config.text_prefix,
        }
    }
}

impl Default for PrefixFingerprint {
    fn default() -> Self {
        Self {
            author_chars: 10,
            text_chars: 30,
        }
    }
}

impl Fingerprint for PrefixFingerprint {
    fn fingerprint(&self, comment: &Comment) -> String {
        let author: String = comment.author.chars().take(self.author_chars).collect();
        let text: String = comment.text.chars().take(self.text_chars).collect();
        format!("{}_{}", author, text)
    }
}

impl<F> Fingerprint for F
where
    F: Fn(&Comment) -> String,
{
    fn fingerprint(&self, comment: &Comment) -> String {
        self(comment)
    }
}

/// Ordered, fingerprint-unique, size-capped comment list.
#[derive(Debug)]
pub struct CommentAccumulator<'f, F: Fingerprint> {
    fingerprint: &'f F,
    seen: HashSet<String>,
    comments: Vec<Comment>,
    capacity: usize,
}

impl<'f, F: Fingerprint> CommentAccumulator<'f, F> {
    pub fn new(fingerprint: &'f F, capacity: usize) -> Self {
        Self {
            fingerprint,
            seen: HashSet::new(),
            comments: Vec::new(),
            capacity,
        }
    }

    /// Adds `comment` unless full or its fingerprint was seen. Returns
    /// whether it was added.
    pub fn offer(&mut self, comment: Comment) -> bool {
        if self.is_full() {
            return false;
        }
        if !self.seen.insert(self.fingerprint.fingerprint(&comment)) {
            return false;
        }
        self.comments.push(comment);
        true
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.comments.len() >= self.capacity
    }

    pub fn into_comments(self) -> Vec<Comment> {
        self.comments
    }
}

/// Loads comments on one item until a target count or the stall budget.
pub struct CommentDeduplicator<F = PrefixFingerprint> {
    fingerprint: F,
    target_count: usize,
    max_attempts: u32,
    load_more_timeout: Duration,
    load_delay: DelayRange,
}

impl CommentDeduplicator<PrefixFingerprint> {
    pub fn from_config(config: &CommentsConfig) -> Self {
        Self::with_fingerprint(config, PrefixFingerprint::from_config(config))
    }
}

impl<F: Fingerprint> CommentDeduplicator<F> {
    pub fn with_fingerprint(config: &CommentsConfig, fingerprint: F) -> Self {
        Self {
            fingerprint,
            target_count: config.target_count,
            max_attempts: config.max_attempts,
            load_more_timeout: Duration::from_secs(config.load_more_timeout_secs),
            load_delay: config.load_delay_ms,
        }
    }

    pub fn target_count(&self) -> usize {
        self.target_count
    }

    pub async fn load_comments<T: ItemTab>(&self, tab: &mut T) -> Vec<Comment> {
        let mut accumulator = CommentAccumulator::new(&self.fingerprint, self.target_count);
        let mut retry = BoundedRetry::with_max_attempts(self.max_attempts);

        while retry.should_continue(accumulator.is_full()) {
            match tab.comment_elements().await {
                Ok(elements) => {
                    for element in elements {
                        match element {
                            Ok(comment) => {
                                accumulator.offer(comment);
                                if accumulator.is_full() {
                                    break;
                                }
                            }
                            Err(e) => debug!("Skipping unreadable comment: {}", e),
                        }
                    }
                }
                Err(e) => {
                    warn!("error getting comments: {}", e);
                    retry.record_stall();
                    continue;
                }
            }

            retry.observe(accumulator.len());
            if !retry.should_continue(accumulator.is_full()) {
                break;
            }

            match tab.load_more(self.load_more_timeout).await {
                Ok(()) => sleep(self.load_delay.sample()).await,
                Err(e) => {
                    debug!("Load more unavailable: {}", e);
                    retry.record_stall();
                }
            }
        }

        accumulator.into_comments()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_fingerprint_truncates_by_chars() {
        let fp = PrefixFingerprint {
            author_chars: 3,
            text_chars: 5,
        };
        let comment = Comment::new("josé_maria", "ñandú everywhere");
        assert_eq!(fp.fingerprint(&comment), "jos_ñandú");
    }

    #[test]
    fn test_accumulator_rejects_duplicate_fingerprints() {
        let fp = PrefixFingerprint::default();
        let mut acc = CommentAccumulator::new(&fp, 10);

        assert!(acc.offer(Comment::new("ana", "this is the best thing I have seen today")));
        // Same first 30 chars of text, different tail
        assert!(!acc.offer(Comment::new("ana", "this is the best thing I have seen all week")));
        assert!(acc.offer(Comment::new("bo", "this is the best thing I have seen today")));
        assert_eq!(acc.len(), 2);
    }

    #[test]
    fn test_accumulator_caps_at_capacity() {
        let fp = PrefixFingerprint::default();
        let mut acc = CommentAccumulator::new(&fp, 2);
        acc.offer(Comment::new("a", "1"));
        acc.offer(Comment::new("b", "2"));
        assert!(!acc.offer(Comment::new("c", "3")));
        assert!(acc.is_full());
        assert_eq!(acc.into_comments().len(), 2);
    }

    #[test]
    fn test_closure_fingerprint() {
        let by_author = |c: &Comment| c.author.clone();
        let mut acc = CommentAccumulator::new(&by_author, 10);
        acc.offer(Comment::new("ana", "first"));
        acc.offer(Comment::new("ana", "second"));
        assert_eq!(acc.len(), 1);
    }
}
