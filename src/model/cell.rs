//! Reusable feed cells
//!
//! A cell hosts at most one [`PlaybackSession`] for the clip it is bound to.
//! All methods run on the UI context; background work reports back through
//! [`FeedEvent`](super::events::FeedEvent)s that the owner feeds into
//! [`Cell::handle_played_to_end`] and [`Cell::apply_like_outcome`].

use std::sync::{Arc, Weak};

use super::clip::{ClipDescriptor, SharedClip};
use super::error::FeedError;
use super::events::{BindTicket, CellId, Completion, EventSender, FeedEvent};
use super::identity::IdentityProvider;
use super::like_sync::LikeStateSync;
use super::media::MediaResolver;
use super::session::{PlaybackSession, SessionId, SessionInfo};

/// Fire-and-forget notifications to the surrounding screen
pub trait CellDelegate: Send + Sync {
    fn on_like_tapped(&self, clip: &ClipDescriptor);

    fn on_details_tapped(&self, clip: &ClipDescriptor);

    fn on_volume_tapped(&self, clip: &ClipDescriptor);

    fn on_media_unavailable(&self, _clip: &ClipDescriptor, _error: &FeedError) {}

    fn on_sync_failed(&self, _clip: &ClipDescriptor, _error: &FeedError) {}
}

/// Collaborators shared by every cell of a feed
#[derive(Clone)]
pub struct FeedContext {
    pub resolver: Arc<dyn MediaResolver>,
    pub likes: Arc<LikeStateSync>,
    pub identity: Arc<dyn IdentityProvider>,
    pub events: EventSender,
}

/// What the cell shows besides the video
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CellDisplay {
    pub caption: String,
    pub section: String,
    pub event: String,
    pub like_selected: bool,
    pub media_unavailable: bool,
}

pub struct Cell {
    id: CellId,
    context: FeedContext,
    delegate: Weak<dyn CellDelegate>,
    clip: Option<SharedClip>,
    session: Option<PlaybackSession>,
    display: CellDisplay,
    generation: u64,
}

impl Cell {
    pub fn new(id: CellId, context: FeedContext, delegate: Weak<dyn CellDelegate>) -> Self {
        Self {
            id,
            context,
            delegate,
            clip: None,
            session: None,
            display: CellDisplay::default(),
            generation: 0,
        }
    }

    pub fn id(&self) -> CellId {
        self.id
    }

    #[cfg(test)]
    pub fn clip(&self) -> Option<&SharedClip> {
        self.clip.as_ref()
    }

    pub fn display(&self) -> &CellDisplay {
        &self.display
    }

    #[cfg(test)]
    pub fn session(&self) -> Option<&PlaybackSession> {
        self.session.as_ref()
    }

    pub fn session_info(&self) -> Option<SessionInfo> {
        self.session.as_ref().map(PlaybackSession::info)
    }

    pub fn is_bound(&self) -> bool {
        self.clip.is_some()
    }

    /// Ticket completions issued now will be checked against
    pub fn ticket(&self) -> BindTicket {
        BindTicket {
            cell: self.id,
            generation: self.generation,
        }
    }

    fn delegate(&self) -> Option<Arc<dyn CellDelegate>> {
        self.delegate.upgrade()
    }

    pub fn bind(&mut self, clip: SharedClip) {
        if let Some(previous) = self.session.take() {
            tracing::warn!(cell = self.id.0, session = previous.id().0, "Bind over a live session, releasing it");
            drop(previous);
        }

        self.generation += 1;
        // Sessions start muted, so the toggle must start there too
        clip.reset_mute();
        self.display = CellDisplay {
            caption: clip.caption.clone(),
            section: clip.section.clone(),
            event: clip.event.clone(),
            ..CellDisplay::default()
        };

        match self.context.resolver.resolve(&clip.media_url) {
            Ok(handle) => {
                let events = self.context.events.clone();
                let cell = self.id;
                let session = PlaybackSession::start(handle, move |session| {
                    let _ = events.send(FeedEvent::PlayedToEnd { cell, session });
                });
                tracing::debug!(
                    cell = self.id.0,
                    session = session.id().0,
                    url = %clip.media_url,
                    "Cell bound"
                );
                self.session = Some(session);
            }
            Err(error) => {
                tracing::warn!(cell = self.id.0, error = %error, "Cell bound without video");
                self.display.media_unavailable = true;
                if let Some(delegate) = self.delegate() {
                    delegate.on_media_unavailable(&clip, &error);
                }
            }
        }

        self.clip = Some(clip);
    }

    /// Release the session and clear everything. Safe on an unbound cell.
    pub fn unbind(&mut self) {
        if self.clip.is_none() && self.session.is_none() {
            return;
        }

        if let Some(session) = self.session.take() {
            drop(session);
        }
        self.clip = None;
        self.display = CellDisplay::default();
        self.generation += 1;
        tracing::debug!(cell = self.id.0, "Cell unbound");
    }

    pub fn on_like_tapped(&mut self) {
        let Some(clip) = self.clip.clone() else {
            return;
        };
        if let Some(delegate) = self.delegate() {
            delegate.on_like_tapped(&clip);
        }

        let user = self.context.identity.current_user_key();
        self.context.likes.spawn_toggle(
            user,
            clip.key(),
            self.ticket(),
            self.context.events.clone(),
        );
    }

    pub fn on_details_tapped(&mut self) {
        let Some(clip) = self.clip.as_ref() else {
            return;
        };
        if let Some(delegate) = self.delegate() {
            delegate.on_details_tapped(clip);
        }
    }

    pub fn on_volume_tapped(&mut self) {
        let Some(clip) = self.clip.clone() else {
            return;
        };

        let unmuted = clip.toggle_mute() == 1;
        if let Some(session) = self.session.as_mut() {
            session.set_volume(if unmuted { 1.0 } else { 0.0 });
        }
        tracing::debug!(cell = self.id.0, unmuted, "Volume toggled");

        if let Some(delegate) = self.delegate() {
            delegate.on_volume_tapped(&clip);
        }
    }

    /// Run the loop protocol if `session` is still this cell's session
    pub fn handle_played_to_end(&mut self, session: SessionId) -> Completion {
        let (Some(current), Some(clip)) = (self.session.as_mut(), self.clip.as_ref()) else {
            tracing::debug!(cell = self.id.0, session = session.0, "End of media for an unbound cell");
            return Completion::Stale;
        };
        if current.id() != session {
            tracing::debug!(cell = self.id.0, session = session.0, "End of media for a released session");
            return Completion::Stale;
        }
        if !current.is_looping() {
            return Completion::Applied;
        }

        current.restart_loop();
        clip.reset_mute();
        Completion::Applied
    }

    /// Reflect the resolved remote like flag issued under `ticket`
    pub fn apply_like_outcome(
        &mut self,
        ticket: BindTicket,
        outcome: Result<bool, FeedError>,
    ) -> Completion {
        if ticket != self.ticket() || self.clip.is_none() {
            tracing::debug!(
                cell = self.id.0,
                ticket = ticket.generation,
                current = self.generation,
                error = %FeedError::StaleCompletion,
                "Discarding like outcome"
            );
            return Completion::Stale;
        }

        match outcome {
            Ok(liked) => {
                self.display.like_selected = liked;
                Completion::Applied
            }
            Err(error) => {
                if let (Some(delegate), Some(clip)) = (self.delegate(), self.clip.as_ref()) {
                    delegate.on_sync_failed(clip, &error);
                }
                Completion::Failed
            }
        }
    }
}

impl Drop for Cell {
    fn drop(&mut self) {
        self.unbind();
    }
}

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    use super::*;
    use crate::model::events::{self, EventReceiver};
    use crate::model::identity::StaticIdentity;
    use crate::model::like_sync::testing::{ScriptedRead, ScriptedStore};
    use crate::model::session::testing::FakeResolver;
    use crate::model::store::JsonFileStore;

    #[derive(Default)]
    struct RecordingDelegate {
        calls: Mutex<Vec<String>>,
    }

    impl RecordingDelegate {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().clone()
        }
    }

    impl CellDelegate for RecordingDelegate {
        fn on_like_tapped(&self, clip: &ClipDescriptor) {
            self.calls.lock().push(format!("like:{}", clip.event));
        }

        fn on_details_tapped(&self, clip: &ClipDescriptor) {
            self.calls.lock().push(format!("details:{}", clip.event));
        }

        fn on_volume_tapped(&self, clip: &ClipDescriptor) {
            self.calls
                .lock()
                .push(format!("volume:{}", clip.mute_tap_count()));
        }

        fn on_media_unavailable(&self, clip: &ClipDescriptor, _error: &FeedError) {
            self.calls.lock().push(format!("media_unavailable:{}", clip.media_url));
        }

        fn on_sync_failed(&self, _clip: &ClipDescriptor, _error: &FeedError) {
            self.calls.lock().push("sync_failed".to_string());
        }
    }

    struct Harness {
        cell: Cell,
        resolver: FakeResolver,
        delegate: Arc<RecordingDelegate>,
        events: EventReceiver,
    }

    fn harness_with_store(store: Arc<dyn crate::model::store::RemoteStore>) -> Harness {
        let resolver = FakeResolver::default();
        let (tx, rx) = events::channel();
        let context = FeedContext {
            resolver: Arc::new(resolver.clone()),
            likes: Arc::new(LikeStateSync::new(store)),
            identity: Arc::new(StaticIdentity::new(Some("alice".to_string()))),
            events: tx,
        };
        let delegate = Arc::new(RecordingDelegate::default());
        let weak: Weak<dyn CellDelegate> = Arc::downgrade(&delegate) as Weak<dyn CellDelegate>;
        Harness {
            cell: Cell::new(CellId(0), context, weak),
            resolver,
            delegate,
            events: rx,
        }
    }

    fn harness() -> Harness {
        harness_with_store(Arc::new(JsonFileStore::in_memory()))
    }

    fn clip(url: &str, event: &str) -> SharedClip {
        Arc::new(ClipDescriptor::new(url, "caption", "section", event))
    }

    /// Pump the next event into the cell, as the run loop does
    async fn pump(h: &mut Harness) -> Completion {
        match h.events.recv().await.expect("event queue closed") {
            FeedEvent::PlayedToEnd { session, .. } => h.cell.handle_played_to_end(session),
            FeedEvent::LikeResolved {
                ticket, outcome, ..
            } => h.cell.apply_like_outcome(ticket, outcome),
        }
    }

    #[test]
    fn bind_starts_muted_session_and_fills_display() {
        let mut h = harness();
        h.cell.bind(clip("clip.mp4", "X"));

        let session = h.cell.session().unwrap();
        assert_eq!(session.volume(), 0.0);
        assert!(session.is_looping());
        assert_eq!(h.resolver.media.live_handles(), 1);
        assert_eq!(h.resolver.media.observer_count(), 1);
        assert_eq!(
            h.cell.display(),
            &CellDisplay {
                caption: "caption".to_string(),
                section: "section".to_string(),
                event: "X".to_string(),
                like_selected: false,
                media_unavailable: false,
            }
        );
    }

    #[test]
    fn unbind_releases_everything_and_is_idempotent() {
        let mut h = harness();
        h.cell.bind(clip("clip.mp4", "X"));

        h.cell.unbind();
        assert!(h.cell.session().is_none());
        assert!(!h.cell.is_bound());
        assert_eq!(h.cell.display(), &CellDisplay::default());
        assert_eq!(h.resolver.media.live_handles(), 0);
        assert_eq!(h.resolver.media.observer_count(), 0);
        let ticket = h.cell.ticket();

        h.cell.unbind();
        assert_eq!(h.cell.ticket(), ticket);
        assert_eq!(h.resolver.media.live_handles(), 0);
        assert_eq!(h.resolver.media.observer_count(), 0);
    }

    #[test]
    fn unbind_on_fresh_cell_is_noop() {
        let mut h = harness();
        h.cell.unbind();
        assert!(h.cell.session().is_none());
        assert_eq!(h.cell.ticket().generation, 0);
    }

    #[test]
    fn bind_sequences_never_leak_sessions() {
        let mut h = harness();
        let steps = [true, true, false, true, false, false, true, true, true, false];
        for (i, bind) in steps.into_iter().enumerate() {
            if bind {
                h.cell.bind(clip(&format!("clip{i}.mp4"), "X"));
                assert_eq!(h.resolver.media.live_handles(), 1);
                assert_eq!(h.resolver.media.observer_count(), 1);
            } else {
                h.cell.unbind();
                assert_eq!(h.resolver.media.live_handles(), 0);
                assert_eq!(h.resolver.media.observer_count(), 0);
            }
        }
    }

    #[test]
    fn double_bind_keeps_only_second_session() {
        let mut h = harness();
        h.cell.bind(clip("first.mp4", "X"));
        let first = h.cell.session().unwrap().id();

        h.cell.bind(clip("second.mp4", "Y"));
        let second = h.cell.session().unwrap().id();

        assert_ne!(first, second);
        assert_eq!(h.resolver.media.live_handles(), 1);
        assert_eq!(h.resolver.media.observer_count(), 1);
        assert_eq!(h.cell.clip().unwrap().media_url, "second.mp4");
    }

    #[test]
    fn unresolvable_media_reports_and_keeps_chrome() {
        let mut h = harness();
        h.cell.bind(clip("bad:clip", "X"));

        assert!(h.cell.session().is_none());
        assert!(h.cell.is_bound());
        assert!(h.cell.display().media_unavailable);
        assert_eq!(h.cell.display().event, "X");

        h.cell.on_details_tapped();
        h.cell.on_volume_tapped();
        assert_eq!(
            h.delegate.calls(),
            vec!["media_unavailable:bad:clip", "details:X", "volume:1"]
        );
    }

    #[tokio::test]
    async fn volume_tap_then_loop_end_reverts_to_muted() {
        let mut h = harness();
        let bound = clip("clip.mp4", "X");
        h.cell.bind(bound.clone());

        h.cell.on_volume_tapped();
        assert_eq!(h.cell.session().unwrap().volume(), 1.0);
        assert_eq!(bound.mute_tap_count(), 1);
        assert_eq!(h.resolver.media.state.lock().volume, 1.0);

        h.resolver.media.play_to_end();
        assert_eq!(pump(&mut h).await, Completion::Applied);

        assert_eq!(h.cell.session().unwrap().volume(), 0.0);
        assert_eq!(bound.mute_tap_count(), 0);
        let media = h.resolver.media.state.lock();
        assert_eq!(media.position, Duration::ZERO);
        assert_eq!(media.volume, 0.0);
        assert!(media.playing);
    }

    #[tokio::test]
    async fn loop_end_mutes_regardless_of_prior_state() {
        for taps in 0..3 {
            let mut h = harness();
            let bound = clip("clip.mp4", "X");
            h.cell.bind(bound.clone());
            for _ in 0..taps {
                h.cell.on_volume_tapped();
            }

            h.resolver.media.play_to_end();
            pump(&mut h).await;

            assert_eq!(h.cell.session().unwrap().volume(), 0.0);
            assert_eq!(bound.mute_tap_count(), 0);
            assert_eq!(h.resolver.media.state.lock().position, Duration::ZERO);
        }
    }

    #[test]
    fn end_of_media_for_released_session_is_ignored() {
        let mut h = harness();
        let first = clip("first.mp4", "X");
        h.cell.bind(first.clone());
        let stale = h.cell.session().unwrap().id();

        let second = clip("second.mp4", "X");
        h.cell.bind(second.clone());
        h.cell.on_volume_tapped();

        assert_eq!(h.cell.handle_played_to_end(stale), Completion::Stale);
        assert_eq!(second.mute_tap_count(), 1);
        assert_eq!(h.cell.session().unwrap().volume(), 1.0);

        h.cell.unbind();
        assert_eq!(h.cell.handle_played_to_end(stale), Completion::Stale);
    }

    #[tokio::test]
    async fn like_tap_waits_for_remote_value() {
        let store = Arc::new(ScriptedStore::default());
        let gate = store.push_read(ScriptedRead::Liked(vec![]));
        let mut h = harness_with_store(store.clone());
        h.cell.bind(clip("clip.mp4", "X"));

        h.cell.on_like_tapped();
        assert!(!h.cell.display().like_selected);
        assert_eq!(h.delegate.calls(), vec!["like:X"]);

        gate.send(()).unwrap();
        assert_eq!(pump(&mut h).await, Completion::Applied);
        assert!(h.cell.display().like_selected);
        assert_eq!(store.writes.lock().len(), 1);
    }

    #[tokio::test]
    async fn liked_clip_toggles_off() {
        let store = Arc::new(ScriptedStore::default());
        let key = clip("clip.mp4", "X").key().0;
        store.push_read(ScriptedRead::Liked(vec![key])).send(()).unwrap();
        let mut h = harness_with_store(store);
        h.cell.bind(clip("clip.mp4", "X"));

        h.cell.on_like_tapped();
        assert_eq!(pump(&mut h).await, Completion::Applied);
        assert!(!h.cell.display().like_selected);
    }

    #[tokio::test]
    async fn read_failure_leaves_flag_unchanged() {
        let store = Arc::new(ScriptedStore::default());
        store.push_read(ScriptedRead::Liked(vec![])).send(()).unwrap();
        store.push_read(ScriptedRead::Fail).send(()).unwrap();
        let mut h = harness_with_store(store.clone());
        h.cell.bind(clip("clip.mp4", "X"));

        h.cell.on_like_tapped();
        pump(&mut h).await;
        assert!(h.cell.display().like_selected);

        h.cell.on_like_tapped();
        assert_eq!(pump(&mut h).await, Completion::Failed);
        assert!(h.cell.display().like_selected);
        assert_eq!(h.delegate.calls(), vec!["like:X", "like:X", "sync_failed"]);
        assert_eq!(store.writes.lock().len(), 1);
    }

    /// Toggles are read-then-write with no serialization. When two overlap,
    /// the UI shows whichever completion arrives last, not the last tap.
    #[tokio::test]
    async fn racing_toggles_show_last_completion_to_arrive() {
        let store = Arc::new(ScriptedStore::default());
        let key = clip("clip.mp4", "clipA").key().0;
        let first_gate = store.push_read(ScriptedRead::Liked(vec![key]));
        let second_gate = store.push_read(ScriptedRead::Liked(vec![]));
        let mut h = harness_with_store(store.clone());
        h.cell.bind(clip("clip.mp4", "clipA"));

        h.cell.on_like_tapped();
        h.cell.on_like_tapped();

        // The second tap resolves first (to true), the first tap last (to false).
        second_gate.send(()).unwrap();
        assert_eq!(pump(&mut h).await, Completion::Applied);
        assert!(h.cell.display().like_selected);

        first_gate.send(()).unwrap();
        assert_eq!(pump(&mut h).await, Completion::Applied);
        assert!(!h.cell.display().like_selected);
        assert_eq!(store.writes.lock().len(), 2);
    }

    #[tokio::test]
    async fn completion_after_unbind_is_discarded() {
        let store = Arc::new(ScriptedStore::default());
        let gate = store.push_read(ScriptedRead::Liked(vec![]));
        let mut h = harness_with_store(store);
        h.cell.bind(clip("clip.mp4", "X"));

        h.cell.on_like_tapped();
        h.cell.unbind();
        assert_eq!(h.resolver.media.live_handles(), 0);
        assert_eq!(h.resolver.media.observer_count(), 0);

        gate.send(()).unwrap();
        assert_eq!(pump(&mut h).await, Completion::Stale);
        assert_eq!(h.cell.display(), &CellDisplay::default());
    }

    #[tokio::test]
    async fn completion_after_rebind_is_discarded() {
        let store = Arc::new(ScriptedStore::default());
        let gate = store.push_read(ScriptedRead::Liked(vec![]));
        let mut h = harness_with_store(store);
        h.cell.bind(clip("clip.mp4", "X"));

        h.cell.on_like_tapped();
        h.cell.unbind();
        h.cell.bind(clip("clip.mp4", "X"));

        gate.send(()).unwrap();
        assert_eq!(pump(&mut h).await, Completion::Stale);
        assert!(!h.cell.display().like_selected);
    }

    #[test]
    fn taps_on_unbound_cell_do_nothing() {
        let mut h = harness();
        h.cell.on_like_tapped();
        h.cell.on_details_tapped();
        h.cell.on_volume_tapped();
        assert!(h.delegate.calls().is_empty());
        assert!(h.events.try_recv().is_err());
    }

    #[test]
    fn dropped_delegate_is_tolerated() {
        let mut h = harness();
        h.cell.bind(clip("clip.mp4", "X"));
        let Harness { mut cell, delegate, .. } = h;
        drop(delegate);

        cell.on_volume_tapped();
        cell.on_details_tapped();
        assert_eq!(cell.session().unwrap().volume(), 1.0);
    }
}
