//! Model module - feed engine state and collaborators
//!
//! - `clip`: Clip descriptors and the feed data source
//! - `media`: Media resolution interface
//! - `simulated`: Wall-clock media backend used by the terminal shell
//! - `session`: Playback sessions and the loop protocol
//! - `cell`: Reusable cells and their bind/unbind lifecycle
//! - `store`: Remote user record store
//! - `identity`: Current user with default fallback
//! - `like_sync`: Read-then-write like reconciliation
//! - `events`: Completions marshaled back onto the UI context
//! - `screen`: Screen UI state, the delegate of every cell
//! - `error`: Error taxonomy

mod cell;
mod clip;
mod error;
mod events;
mod identity;
mod like_sync;
mod media;
mod screen;
mod session;
mod simulated;
mod store;

pub use cell::{Cell, CellDelegate, FeedContext};
pub use clip::{SharedClip, load_feed, sections};
pub use events::{CellId, Completion, EventReceiver, FeedEvent, channel};
pub use identity::{IdentityProvider, StaticIdentity};
pub use like_sync::LikeStateSync;
pub use screen::{CellView, ClipDetails, FeedScreen, FeedSnapshot, Overlay, UiState};
pub use simulated::SimulatedResolver;
pub use store::JsonFileStore;

#[cfg(test)]
pub(crate) mod testing {
    pub use super::clip::ClipDescriptor;
    pub use super::session::testing::FakeResolver;
    pub use super::store::RemoteStore;
}
