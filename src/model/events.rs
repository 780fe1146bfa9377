//! Events marshaled back onto the UI context
//!
//! Media callbacks and remote-store completions never touch a cell directly.
//! They post a [`FeedEvent`] and the run loop applies it.

use tokio::sync::mpsc;

use super::clip::ClipKey;
use super::error::FeedError;
use super::session::SessionId;

/// Index of a cell in the pool
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellId(pub usize);

/// Identifies one binding of one cell; completions carry it back
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BindTicket {
    pub cell: CellId,
    pub generation: u64,
}

#[derive(Debug)]
pub enum FeedEvent {
    /// The media of `session` played to its end
    PlayedToEnd { cell: CellId, session: SessionId },
    /// A like toggle finished
    LikeResolved {
        ticket: BindTicket,
        clip: ClipKey,
        outcome: Result<bool, FeedError>,
    },
}

impl FeedEvent {
    pub fn cell(&self) -> CellId {
        match self {
            Self::PlayedToEnd { cell, .. } => *cell,
            Self::LikeResolved { ticket, .. } => ticket.cell,
        }
    }
}

pub type EventSender = mpsc::UnboundedSender<FeedEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<FeedEvent>;

pub fn channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}

/// How the owning cell handled a completion
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Failed,
    Stale,
}
