//! Screen-level UI state and the cell delegate

use std::time::{Duration, Instant};

use parking_lot::Mutex;

use super::cell::{CellDelegate, CellDisplay};
use super::clip::ClipDescriptor;
use super::error::FeedError;
use super::session::SessionInfo;

const ERROR_DISPLAY_TIME: Duration = Duration::from_secs(5);

/// Details of a clip shown in the details overlay
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClipDetails {
    pub media_url: String,
    pub caption: String,
    pub section: String,
    pub event: String,
}

impl From<&ClipDescriptor> for ClipDetails {
    fn from(clip: &ClipDescriptor) -> Self {
        Self {
            media_url: clip.media_url.clone(),
            caption: clip.caption.clone(),
            section: clip.section.clone(),
            event: clip.event.clone(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Overlay {
    #[default]
    None,
    Details(ClipDetails),
    Sections {
        sections: Vec<(String, usize)>,
        selected: usize,
    },
    Help,
}

/// UI state for the feed screen
#[derive(Clone, Debug, Default)]
pub struct UiState {
    pub error_message: Option<String>,
    pub error_timestamp: Option<Instant>,
    pub status: Option<String>,
    pub overlay: Overlay,
    pub should_quit: bool,
}

/// Render data for one bound cell
#[derive(Clone, Debug)]
pub struct CellView {
    pub clip_index: usize,
    pub selected: bool,
    pub display: CellDisplay,
    pub session: Option<SessionInfo>,
}

impl CellView {
    pub fn is_muted(&self) -> bool {
        self.session.as_ref().is_none_or(|session| session.volume == 0.0)
    }
}

/// Everything the view needs to draw the feed
#[derive(Clone, Debug, Default)]
pub struct FeedSnapshot {
    pub title: String,
    pub user: String,
    pub selected: usize,
    pub total: usize,
    pub cells: Vec<CellView>,
}

/// Delegate of every cell; the run loop reads the state it accumulates
#[derive(Default)]
pub struct FeedScreen {
    state: Mutex<UiState>,
}

impl FeedScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ui_state(&self) -> UiState {
        self.state.lock().clone()
    }

    pub fn set_error(&self, message: String) {
        let mut state = self.state.lock();
        state.error_message = Some(message);
        state.error_timestamp = Some(Instant::now());
    }

    pub fn clear_error(&self) {
        let mut state = self.state.lock();
        state.error_message = None;
        state.error_timestamp = None;
    }

    pub fn has_error(&self) -> bool {
        self.state.lock().error_message.is_some()
    }

    pub fn auto_clear_old_errors(&self) {
        let mut state = self.state.lock();
        if state
            .error_timestamp
            .is_some_and(|timestamp| timestamp.elapsed() > ERROR_DISPLAY_TIME)
        {
            state.error_message = None;
            state.error_timestamp = None;
        }
    }

    pub fn set_status(&self, status: impl Into<String>) {
        self.state.lock().status = Some(status.into());
    }

    pub fn overlay(&self) -> Overlay {
        self.state.lock().overlay.clone()
    }

    pub fn set_overlay(&self, overlay: Overlay) {
        self.state.lock().overlay = overlay;
    }

    pub fn close_overlay(&self) {
        self.set_overlay(Overlay::None);
    }

    /// Move the sections overlay selection, wrapping at both ends
    pub fn move_section_selection(&self, forward: bool) {
        let mut state = self.state.lock();
        if let Overlay::Sections { sections, selected } = &mut state.overlay {
            if sections.is_empty() {
                return;
            }
            *selected = if forward {
                (*selected + 1) % sections.len()
            } else {
                selected.checked_sub(1).unwrap_or(sections.len() - 1)
            };
        }
    }

    pub fn should_quit(&self) -> bool {
        self.state.lock().should_quit
    }

    pub fn set_should_quit(&self, quit: bool) {
        self.state.lock().should_quit = quit;
    }
}

impl CellDelegate for FeedScreen {
    fn on_like_tapped(&self, clip: &ClipDescriptor) {
        tracing::info!(clip = %clip.key(), "Like tapped");
        self.set_status("Syncing like...");
    }

    fn on_details_tapped(&self, clip: &ClipDescriptor) {
        self.set_overlay(Overlay::Details(ClipDetails::from(clip)));
    }

    fn on_volume_tapped(&self, clip: &ClipDescriptor) {
        let status = if clip.mute_tap_count() == 1 {
            "Sound on"
        } else {
            "Muted"
        };
        self.set_status(status);
    }

    fn on_media_unavailable(&self, clip: &ClipDescriptor, error: &FeedError) {
        // Status only: cells next to the selection bind ahead of it
        tracing::warn!(url = %clip.media_url, error = %error, "Media unavailable");
        self.set_status(format!("Video unavailable: {}", clip.caption));
    }

    fn on_sync_failed(&self, _clip: &ClipDescriptor, error: &FeedError) {
        tracing::error!(error = %error, "Like could not be saved");
        self.set_error("Could not save like. Try again.".to_string());
    }
}
