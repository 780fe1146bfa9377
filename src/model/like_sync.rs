//! Like state reconciliation against the remote user record
//!
//! A toggle reads the user's record, flips membership of the clip key and
//! writes the list back. There is no compare-and-swap and toggles are not
//! serialized: two overlapping toggles on the same clip race, and the UI ends
//! up showing whichever completion arrives last.

use std::sync::Arc;

use serde_json::Value;

use super::clip::ClipKey;
use super::error::FeedError;
use super::events::{BindTicket, EventSender, FeedEvent};
use super::store::{LIKED_CLIPS_FIELD, RemoteStore, UserDocument};

/// Decoded view of a user document
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LikeRecord {
    pub user_key: String,
    pub liked_clips: Vec<String>,
}

impl LikeRecord {
    pub fn decode(user_key: &str, document: &UserDocument) -> Result<Self, FeedError> {
        let fields = document
            .as_object()
            .ok_or_else(|| FeedError::sync_failed(user_key, "user record is not an object"))?;

        let liked = fields
            .get(LIKED_CLIPS_FIELD)
            .and_then(Value::as_array)
            .ok_or_else(|| {
                FeedError::sync_failed(user_key, format!("user record has no {LIKED_CLIPS_FIELD} list"))
            })?;

        let liked_clips = liked
            .iter()
            .map(|entry| {
                entry.as_str().map(str::to_string).ok_or_else(|| {
                    FeedError::sync_failed(user_key, format!("non-string entry in {LIKED_CLIPS_FIELD}"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            user_key: user_key.to_string(),
            liked_clips,
        })
    }

    pub fn is_flagged(&self, clip: &ClipKey) -> bool {
        self.liked_clips.iter().any(|key| *key == clip.0)
    }

    /// Flip the flag of `clip` and return its new value
    pub fn flip(&mut self, clip: &ClipKey) -> bool {
        if self.is_flagged(clip) {
            self.liked_clips.retain(|key| *key != clip.0);
            false
        } else {
            self.liked_clips.push(clip.0.clone());
            true
        }
    }
}

pub struct LikeStateSync {
    store: Arc<dyn RemoteStore>,
}

impl LikeStateSync {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self { store }
    }

    /// Read the record of `user`, flip `clip` and write it back.
    ///
    /// Resolves to the flag value that was written.
    pub async fn toggle(&self, user: &str, clip: &ClipKey) -> Result<bool, FeedError> {
        tracing::debug!(user, clip = %clip, "Toggling like");

        let document = self
            .store
            .read_user_record(user)
            .await
            .map_err(|e| FeedError::sync_failed(user, format!("read failed: {e:#}")))?
            .ok_or_else(|| FeedError::sync_failed(user, "no user record"))?;

        let mut record = LikeRecord::decode(user, &document)?;
        let was_flagged = record.is_flagged(clip);
        let flagged = record.flip(clip);

        self.store
            .write_user_record(user, &record.liked_clips)
            .await
            .map_err(|e| FeedError::sync_failed(user, format!("write failed: {e:#}")))?;

        tracing::info!(user = %record.user_key, clip = %clip, was_flagged, flagged, "Like toggled");
        Ok(flagged)
    }

    /// Run [`toggle`](Self::toggle) in the background and post the outcome
    /// for the cell identified by `ticket`.
    pub fn spawn_toggle(
        self: &Arc<Self>,
        user: String,
        clip: ClipKey,
        ticket: BindTicket,
        events: EventSender,
    ) -> tokio::task::JoinHandle<()> {
        let sync = Arc::clone(self);
        tokio::spawn(async move {
            let outcome = sync.toggle(&user, &clip).await;
            if let Err(ref e) = outcome {
                tracing::warn!(error = %e, clip = %clip, "Like sync failed");
            }
            if events
                .send(FeedEvent::LikeResolved {
                    ticket,
                    clip,
                    outcome,
                })
                .is_err()
            {
                tracing::debug!("Event queue closed, dropping like outcome");
            }
        })
    }
}
