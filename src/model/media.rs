//! Media resolution collaborator interface

use std::time::Duration;

use super::error::FeedError;

/// Callback invoked by a media handle when it plays to the end
pub type EndCallback = Box<dyn Fn() + Send + Sync>;

/// Registration of an end-of-media observer on one handle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObserverToken(pub u64);

/// A playable decode/render pipeline for one media URL
pub trait MediaHandle: Send {
    fn play(&mut self);

    fn pause(&mut self);

    fn seek_to_start(&mut self);

    fn set_volume(&mut self, volume: f32);

    fn position(&self) -> Duration;

    /// Total length, when the backend knows it
    fn duration(&self) -> Option<Duration>;

    /// Register `callback` for "did play to end" on this handle only
    fn observe_end(&mut self, callback: EndCallback) -> ObserverToken;

    /// Remove a registration. Unknown tokens are ignored.
    fn cancel_observer(&mut self, token: ObserverToken);
}

/// Turns URL strings into playable handles
pub trait MediaResolver: Send + Sync {
    fn resolve(&self, url: &str) -> Result<Box<dyn MediaHandle>, FeedError>;
}
