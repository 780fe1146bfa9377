//! View module - UI rendering
//!
//! This module handles all UI rendering for the feed using ratatui.
//! It is organized into submodules by component type:
//!
//! - `utils`: Shared utility functions (formatting, popup placement)
//! - `layout`: Top bar and bottom status bar
//! - `feed`: The stack of bound cells
//! - `overlays`: Modal overlays (error, details, sections, help)

mod feed;
mod layout;
mod overlays;
mod utils;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::model::{FeedSnapshot, Overlay, UiState};

pub struct FeedView;

impl FeedView {
    pub fn render(frame: &mut Frame, snapshot: &FeedSnapshot, ui_state: &UiState) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Event title + user
                Constraint::Min(0),    // Feed cells
                Constraint::Length(3), // Status bar
            ])
            .split(frame.area());

        layout::render_top_bar(frame, chunks[0], snapshot);
        feed::render_feed(frame, chunks[1], snapshot);
        layout::render_status_bar(frame, chunks[2], snapshot, ui_state);

        match &ui_state.overlay {
            Overlay::None => {}
            Overlay::Details(details) => overlays::render_details(frame, details),
            Overlay::Sections { sections, selected } => {
                overlays::render_sections(frame, sections, *selected)
            }
            Overlay::Help => overlays::render_help_popup(frame),
        }

        // Errors draw above everything else
        if ui_state.error_message.is_some() {
            overlays::render_error_notification(frame, ui_state);
        }
    }
}
