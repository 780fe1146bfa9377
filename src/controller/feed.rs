//! Scroll window, cell binding and taps on the current cell

use std::ops::Range;

use crate::model::{CellId, CellView, FeedSnapshot, Overlay, sections};

use super::FeedController;

impl FeedController {
    /// Feed indices that should be bound for the current selection
    pub fn window(&self) -> Range<usize> {
        let total = self.clips.len();
        let size = self.pool.len().min(total);
        let start = self
            .selected
            .saturating_sub(size / 2)
            .min(total - size);
        start..start + size
    }

    /// Bind `cell` to the clip at `clip_index`
    pub fn bind(&mut self, cell: CellId, clip_index: usize) {
        let Some(clip) = self.clips.get(clip_index).cloned() else {
            tracing::warn!(clip_index, "Bind requested past the end of the feed");
            return;
        };
        let Some(target) = self.pool.get_mut(cell) else {
            return;
        };

        target.bind(clip);
        self.pool.assign(cell, Some(clip_index));
    }

    pub fn unbind(&mut self, cell: CellId) {
        if let Some(target) = self.pool.get_mut(cell) {
            target.unbind();
        }
        self.pool.assign(cell, None);
    }

    /// Select `index` and rebind the pool so the window around it is live
    pub fn scroll_to(&mut self, index: usize) {
        if self.clips.is_empty() {
            return;
        }
        self.selected = index.min(self.clips.len() - 1);
        let window = self.window();

        for (cell, clip_index) in self.pool.bound() {
            if !window.contains(&clip_index) {
                self.unbind(cell);
            }
        }

        for clip_index in window {
            if self.pool.cell_for(clip_index).is_some() {
                continue;
            }
            match self.pool.free_cell() {
                Some(cell) => self.bind(cell, clip_index),
                None => {
                    tracing::error!(clip_index, "No free cell for visible clip");
                    break;
                }
            }
        }

        tracing::debug!(selected = self.selected, "Feed scrolled");
    }

    pub fn scroll_by(&mut self, delta: isize) {
        let target = self.selected.saturating_add_signed(delta);
        self.scroll_to(target);
    }

    fn selected_cell(&self) -> Option<CellId> {
        self.pool.cell_for(self.selected)
    }

    pub fn tap_like(&mut self) {
        if let Some(cell) = self.selected_cell().and_then(|id| self.pool.get_mut(id)) {
            cell.on_like_tapped();
        }
    }

    pub fn tap_volume(&mut self) {
        if let Some(cell) = self.selected_cell().and_then(|id| self.pool.get_mut(id)) {
            cell.on_volume_tapped();
        }
    }

    pub fn tap_details(&mut self) {
        if let Some(cell) = self.selected_cell().and_then(|id| self.pool.get_mut(id)) {
            cell.on_details_tapped();
        }
    }

    pub fn open_sections(&self) {
        let sections = sections(&self.clips);
        let selected = sections
            .iter()
            .rposition(|(_, first)| *first <= self.selected)
            .unwrap_or(0);
        self.screen.set_overlay(Overlay::Sections { sections, selected });
    }

    /// Jump to the first clip of the section picked in the overlay
    pub fn jump_to_selected_section(&mut self) {
        if let Overlay::Sections { sections, selected } = self.screen.overlay() {
            self.screen.close_overlay();
            if let Some((name, first)) = sections.get(selected) {
                tracing::info!(section = %name, index = first, "Jumping to section");
                self.scroll_to(*first);
            }
        }
    }

    /// Unbind every cell, releasing all sessions
    pub fn release_all(&mut self) {
        for (cell, _) in self.pool.bound() {
            self.unbind(cell);
        }
    }

    pub fn snapshot(&self) -> FeedSnapshot {
        let mut cells: Vec<CellView> = self
            .pool
            .bound()
            .into_iter()
            .filter_map(|(id, clip_index)| {
                let cell = self.pool.get(id).filter(|cell| cell.is_bound())?;
                Some(CellView {
                    clip_index,
                    selected: clip_index == self.selected,
                    display: cell.display().clone(),
                    session: cell.session_info(),
                })
            })
            .collect();
        cells.sort_by_key(|view| view.clip_index);

        FeedSnapshot {
            title: self.title.clone(),
            user: self.user.clone(),
            selected: self.selected,
            total: self.clips.len(),
            cells,
        }
    }
}
