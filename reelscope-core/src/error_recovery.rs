//! Recovery actions for the failure classes a collection or analysis run
//! can hit.
//!
//! Nothing here retries by itself; callers look up the action for an error
//! and apply it in their own loop (stall counters, error entries, fallback to
//! an empty state).

use crate::{CollectionError, CoreError, ErrorExt, StoreError};

/// What a caller should do with a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryAction {
    /// No new data this iteration; bump the stall counter and keep looping
    CountAsStall,
    /// One item failed; record an error entry and move on to the next item
    RecordAndContinue,
    /// Persisted state is missing or unreadable; continue as if it were empty
    TreatAsEmpty,
    /// Drop the single input (e.g. a comment in the wrong language)
    Discard,
    /// Nothing sensible can continue; propagate to the caller
    Abort,
}

/// Maps errors onto [`RecoveryAction`]s
pub struct ErrorRecovery;

impl ErrorRecovery {
    pub fn classify(error: &CoreError) -> RecoveryAction {
        if error.is_stall() {
            return RecoveryAction::CountAsStall;
        }

        match error {
            // The browser is gone; later items cannot succeed either
            CoreError::Collection(CollectionError::SessionClosed) => RecoveryAction::Abort,
            CoreError::Collection(_) => RecoveryAction::RecordAndContinue,

            CoreError::Store(StoreError::Corrupt { .. }) => RecoveryAction::TreatAsEmpty,
            // Without input there is nothing to analyze
            CoreError::Store(StoreError::MissingInput { .. }) => RecoveryAction::Abort,
            CoreError::Store(_) => RecoveryAction::Abort,

            CoreError::Sentiment(_) => RecoveryAction::Discard,

            CoreError::Serialization(_) => RecoveryAction::TreatAsEmpty,
            CoreError::Io(e) if e.kind() == std::io::ErrorKind::NotFound => {
                RecoveryAction::TreatAsEmpty
            }

            CoreError::Config(_) | CoreError::Io(_) => RecoveryAction::Abort,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConfigError, SentimentError};
    use std::io;

    #[test]
    fn test_stalls_are_counted_not_surfaced() {
        let error = CoreError::Collection(CollectionError::LoadMoreUnavailable);
        assert_eq!(ErrorRecovery::classify(&error), RecoveryAction::CountAsStall);

        let error = CoreError::Collection(CollectionError::WaitTimeout {
            what: "comments".to_string(),
            seconds: 3,
        });
        assert_eq!(ErrorRecovery::classify(&error), RecoveryAction::CountAsStall);
    }

    #[test]
    fn test_item_failures_are_recorded() {
        let error = CoreError::Collection(CollectionError::NavigationFailed {
            url: "https://www.instagram.com/reel/abc/".to_string(),
            reason: "net::ERR_ABORTED".to_string(),
        });
        assert_eq!(
            ErrorRecovery::classify(&error),
            RecoveryAction::RecordAndContinue
        );
    }

    #[test]
    fn test_closed_session_aborts() {
        let error = CoreError::Collection(CollectionError::SessionClosed);
        assert_eq!(ErrorRecovery::classify(&error), RecoveryAction::Abort);
    }

    #[test]
    fn test_persisted_state_failures() {
        let missing = CoreError::Io(io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert_eq!(ErrorRecovery::classify(&missing), RecoveryAction::TreatAsEmpty);

        let corrupt = CoreError::Store(StoreError::Corrupt {
            path: "reels.json".to_string(),
            reason: "EOF while parsing".to_string(),
        });
        assert_eq!(ErrorRecovery::classify(&corrupt), RecoveryAction::TreatAsEmpty);

        let no_input = CoreError::Store(StoreError::MissingInput {
            path: "reels-data.json".to_string(),
        });
        assert_eq!(ErrorRecovery::classify(&no_input), RecoveryAction::Abort);
    }

    #[test]
    fn test_language_failures_discard() {
        let error = CoreError::Sentiment(SentimentError::LanguageDetectionFailed {
            text_length: 3,
        });
        assert_eq!(ErrorRecovery::classify(&error), RecoveryAction::Discard);
    }

    #[test]
    fn test_config_errors_abort() {
        let error = CoreError::Config(ConfigError::ValidationFailed {
            reason: "batch_width must be at least 1".to_string(),
        });
        assert_eq!(ErrorRecovery::classify(&error), RecoveryAction::Abort);
    }
}
