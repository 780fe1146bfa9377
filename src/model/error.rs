//! Error taxonomy for the feed engine
//!
//! None of these conditions are fatal. They travel to the surrounding screen
//! through [`CellDelegate`](super::cell::CellDelegate) callbacks and are
//! logged where they occur.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FeedError {
    /// The media URL could not be turned into a playable handle
    #[error("media unavailable for {url}: {reason}")]
    MediaUnavailable { url: String, reason: String },

    /// Reading, decoding or writing the remote like record failed
    #[error("like sync failed for user {user}: {reason}")]
    SyncFailed { user: String, reason: String },

    /// A completion arrived after its cell moved on
    #[error("completion arrived after the cell was rebound")]
    StaleCompletion,
}

impl FeedError {
    pub fn media_unavailable(url: &str, reason: impl Into<String>) -> Self {
        Self::MediaUnavailable {
            url: url.to_string(),
            reason: reason.into(),
        }
    }

    pub fn sync_failed(user: &str, reason: impl std::fmt::Display) -> Self {
        Self::SyncFailed {
            user: user.to_string(),
            reason: reason.to_string(),
        }
    }
}
