//! Wall-clock media backend
//!
//! There is no decoder behind these handles. Each one advances a clock while
//! playing and fires its end observers once the configured clip length is
//! reached, which is all the feed engine needs from real media.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::error::FeedError;
use super::media::{EndCallback, MediaHandle, MediaResolver, ObserverToken};

const SUPPORTED_SCHEMES: [&str; 3] = ["http", "https", "file"];

#[derive(Default)]
struct Clock {
    playing: bool,
    base: Duration,
    resumed_at: Option<Instant>,
    ended: bool,
    volume: f32,
}

impl Clock {
    fn position(&self, length: Duration) -> Duration {
        let running = match (self.playing, self.resumed_at) {
            (true, Some(at)) => at.elapsed(),
            _ => Duration::ZERO,
        };
        (self.base + running).min(length)
    }
}

struct Shared {
    clock: Mutex<Clock>,
    observers: Mutex<HashMap<u64, Arc<EndCallback>>>,
    length: Duration,
}

pub struct SimulatedHandle {
    shared: Arc<Shared>,
    next_token: u64,
    watcher: JoinHandle<()>,
}

impl SimulatedHandle {
    fn spawn(length: Duration, tick: Duration) -> Self {
        let shared = Arc::new(Shared {
            clock: Mutex::new(Clock::default()),
            observers: Mutex::new(HashMap::new()),
            length,
        });

        let watched = Arc::clone(&shared);
        let watcher = tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick);
            loop {
                interval.tick().await;
                let reached_end = {
                    let mut clock = watched.clock.lock();
                    if clock.playing && !clock.ended && clock.position(watched.length) >= watched.length {
                        clock.base = watched.length;
                        clock.playing = false;
                        clock.resumed_at = None;
                        clock.ended = true;
                        true
                    } else {
                        false
                    }
                };

                if reached_end {
                    let callbacks: Vec<Arc<EndCallback>> =
                        watched.observers.lock().values().cloned().collect();
                    for callback in callbacks {
                        (**callback)();
                    }
                }
            }
        });

        Self {
            shared,
            next_token: 0,
            watcher,
        }
    }

    #[cfg(test)]
    fn volume(&self) -> f32 {
        self.shared.clock.lock().volume
    }
}

impl MediaHandle for SimulatedHandle {
    fn play(&mut self) {
        let mut clock = self.shared.clock.lock();
        if !clock.playing {
            clock.playing = true;
            clock.resumed_at = Some(Instant::now());
        }
    }

    fn pause(&mut self) {
        let mut clock = self.shared.clock.lock();
        clock.base = clock.position(self.shared.length);
        clock.playing = false;
        clock.resumed_at = None;
    }

    fn seek_to_start(&mut self) {
        let mut clock = self.shared.clock.lock();
        clock.base = Duration::ZERO;
        clock.ended = false;
        if clock.playing {
            clock.resumed_at = Some(Instant::now());
        }
    }

    fn set_volume(&mut self, volume: f32) {
        self.shared.clock.lock().volume = volume.clamp(0.0, 1.0);
    }

    fn position(&self) -> Duration {
        self.shared.clock.lock().position(self.shared.length)
    }

    fn duration(&self) -> Option<Duration> {
        Some(self.shared.length)
    }

    fn observe_end(&mut self, callback: EndCallback) -> ObserverToken {
        self.next_token += 1;
        self.shared
            .observers
            .lock()
            .insert(self.next_token, Arc::new(callback));
        ObserverToken(self.next_token)
    }

    fn cancel_observer(&mut self, token: ObserverToken) {
        self.shared.observers.lock().remove(&token.0);
    }
}

impl Drop for SimulatedHandle {
    fn drop(&mut self) {
        self.watcher.abort();
        self.shared.observers.lock().clear();
    }
}

/// Resolver producing [`SimulatedHandle`]s of a fixed length.
///
/// Must be used from within a tokio runtime.
#[derive(Clone, Debug)]
pub struct SimulatedResolver {
    clip_length: Duration,
    tick: Duration,
}

impl SimulatedResolver {
    pub fn new(clip_length: Duration, tick: Duration) -> Self {
        Self { clip_length, tick }
    }
}

/// Accept `scheme://path` URLs with a supported scheme and a non-empty path
pub fn validate_media_url(url: &str) -> Result<(), FeedError> {
    let (scheme, rest) = url
        .split_once("://")
        .ok_or_else(|| FeedError::media_unavailable(url, "not a URL"))?;

    if !SUPPORTED_SCHEMES.contains(&scheme.to_ascii_lowercase().as_str()) {
        return Err(FeedError::media_unavailable(
            url,
            format!("unsupported scheme {scheme:?}"),
        ));
    }
    if rest.trim_matches('/').is_empty() {
        return Err(FeedError::media_unavailable(url, "empty path"));
    }
    Ok(())
}

impl MediaResolver for SimulatedResolver {
    fn resolve(&self, url: &str) -> Result<Box<dyn MediaHandle>, FeedError> {
        validate_media_url(url)?;
        tracing::trace!(url, length_ms = self.clip_length.as_millis() as u64, "Resolved simulated media");
        Ok(Box::new(SimulatedHandle::spawn(self.clip_length, self.tick)))
    }
}
