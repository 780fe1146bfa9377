//! Controller module - feed orchestration and event handling
//!
//! The controller owns the feed data and the cell pool and runs on the UI
//! context. It is organized into submodules by responsibility:
//!
//! - `pool`: Bounded set of reusable cells
//! - `feed`: Scroll window, bind/unbind and taps on the current cell
//! - `input`: Key event handling
//! - `feed_events`: Applying background completions to cells

mod feed;
mod feed_events;
mod input;
mod pool;

use std::sync::Arc;

use crate::model::{
    CellDelegate, EventReceiver, FeedContext, FeedScreen, IdentityProvider, SharedClip,
};
use pool::CellPool;

pub struct FeedController {
    clips: Vec<SharedClip>,
    pool: CellPool,
    screen: Arc<FeedScreen>,
    events: EventReceiver,
    title: String,
    user: String,
    selected: usize,
}

impl FeedController {
    pub fn new(
        clips: Vec<SharedClip>,
        pool_size: usize,
        context: FeedContext,
        events: EventReceiver,
        screen: Arc<FeedScreen>,
        title: String,
    ) -> Self {
        let user = context.identity.current_user_key();
        let delegate: Arc<dyn CellDelegate> = screen.clone();
        let pool = CellPool::new(pool_size, &context, &delegate);

        tracing::info!(clips = clips.len(), cells = pool.len(), user = %user, "Feed controller ready");

        Self {
            clips,
            pool,
            screen,
            events,
            title,
            user,
            selected: 0,
        }
    }

    pub fn screen(&self) -> &Arc<FeedScreen> {
        &self.screen
    }

    #[cfg(test)]
    pub fn clips(&self) -> &[SharedClip] {
        &self.clips
    }

    #[cfg(test)]
    pub fn selected(&self) -> usize {
        self.selected
    }
}
