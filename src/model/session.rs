//! Playback sessions and the loop protocol

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use super::media::{EndCallback, MediaHandle, ObserverToken};

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a playback session
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SessionId(pub u64);

impl SessionId {
    fn next() -> Self {
        Self(NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Playing,
    Restarting,
}

/// Snapshot of a session for rendering
#[derive(Clone, Debug)]
pub struct SessionInfo {
    pub position: Duration,
    pub duration: Option<Duration>,
    pub volume: f32,
}

/// One live media pipeline bound to a clip
///
/// Dropping the session cancels its loop observer and stops the handle, so
/// no end-of-media callback can outlive it.
pub struct PlaybackSession {
    id: SessionId,
    handle: Box<dyn MediaHandle>,
    volume: f32,
    is_looping: bool,
    state: LoopState,
    loop_observer: Option<ObserverToken>,
}

impl PlaybackSession {
    /// Start muted playback and register the loop observer.
    ///
    /// `on_end` receives the new session's id so the owner can route the
    /// notification back to the right session.
    pub fn start(
        mut handle: Box<dyn MediaHandle>,
        on_end: impl Fn(SessionId) + Send + Sync + 'static,
    ) -> Self {
        let id = SessionId::next();

        handle.set_volume(0.0);
        handle.play();

        let callback: EndCallback = Box::new(move || on_end(id));
        let token = handle.observe_end(callback);

        tracing::debug!(session = id.0, "Playback session started");

        Self {
            id,
            handle,
            volume: 0.0,
            is_looping: true,
            state: LoopState::Playing,
            loop_observer: Some(token),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn is_looping(&self) -> bool {
        self.is_looping
    }

    #[cfg(test)]
    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        self.handle.set_volume(volume);
    }

    /// Playing -> Restarting -> Playing. Unmute never survives this.
    pub fn restart_loop(&mut self) {
        self.state = LoopState::Restarting;
        self.handle.seek_to_start();
        self.set_volume(0.0);
        self.handle.play();
        self.state = LoopState::Playing;
        tracing::trace!(session = self.id.0, state = ?self.state, "Loop restarted");
    }

    pub fn info(&self) -> SessionInfo {
        SessionInfo {
            position: self.handle.position(),
            duration: self.handle.duration(),
            volume: self.volume,
        }
    }
}

impl Drop for PlaybackSession {
    fn drop(&mut self) {
        if let Some(token) = self.loop_observer.take() {
            self.handle.cancel_observer(token);
        }
        self.handle.pause();
        tracing::debug!(session = self.id.0, "Playback session released");
    }
}


#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;

    use super::testing::FakeResolver;
    use super::*;
    use crate::model::media::MediaResolver;

    #[test]
    fn start_is_muted_looping_and_observed() {
        let resolver = FakeResolver::default();
        let handle = resolver.resolve("clip.mp4").unwrap();
        let session = PlaybackSession::start(handle, |_| {});

        assert_eq!(session.volume(), 0.0);
        assert!(session.is_looping());
        assert_eq!(session.state(), LoopState::Playing);
        assert_eq!(resolver.media.observer_count(), 1);
        assert!(resolver.media.state.lock().playing);
    }

    #[test]
    fn restart_loop_rewinds_and_mutes() {
        let resolver = FakeResolver::default();
        let mut session = PlaybackSession::start(resolver.resolve("clip.mp4").unwrap(), |_| {});
        session.set_volume(1.0);
        resolver.media.play_to_end();

        session.restart_loop();

        let state = resolver.media.state.lock();
        assert_eq!(state.position, Duration::ZERO);
        assert_eq!(state.volume, 0.0);
        assert!(state.playing);
        drop(state);
        assert_eq!(session.volume(), 0.0);
        assert_eq!(session.state(), LoopState::Playing);
    }

    #[test]
    fn end_callback_carries_session_id() {
        let resolver = FakeResolver::default();
        let seen = Arc::new(AtomicU64::new(0));
        let seen_in_callback = seen.clone();
        let session = PlaybackSession::start(resolver.resolve("clip.mp4").unwrap(), move |id| {
            seen_in_callback.store(id.0, Ordering::SeqCst);
        });

        resolver.media.play_to_end();
        assert_eq!(seen.load(Ordering::SeqCst), session.id().0);
    }

    #[test]
    fn drop_cancels_observer_and_releases_handle() {
        let resolver = FakeResolver::default();
        let fired = Arc::new(AtomicUsize::new(0));
        let fired_in_callback = fired.clone();
        let session = PlaybackSession::start(resolver.resolve("clip.mp4").unwrap(), move |_| {
            fired_in_callback.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(resolver.media.live_handles(), 1);

        drop(session);

        assert_eq!(resolver.media.live_handles(), 0);
        assert_eq!(resolver.media.observer_count(), 0);
        resolver.media.play_to_end();
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn session_ids_are_unique() {
        let resolver = FakeResolver::default();
        let a = PlaybackSession::start(resolver.resolve("a.mp4").unwrap(), |_| {});
        let b = PlaybackSession::start(resolver.resolve("b.mp4").unwrap(), |_| {});
        assert_ne!(a.id(), b.id());
    }
}
