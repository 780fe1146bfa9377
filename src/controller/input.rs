//! Key event handling

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::model::Overlay;

use super::FeedController;

impl FeedController {
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.screen.set_should_quit(true);
            return Ok(());
        }

        // Error message blocks all other interactions
        if self.screen.has_error() {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                self.screen.clear_error();
            }
            return Ok(());
        }

        match self.screen.overlay() {
            Overlay::None => {}
            Overlay::Sections { .. } => {
                match key.code {
                    KeyCode::Up | KeyCode::Char('k') => self.screen.move_section_selection(false),
                    KeyCode::Down | KeyCode::Char('j') => self.screen.move_section_selection(true),
                    KeyCode::Enter => self.jump_to_selected_section(),
                    KeyCode::Esc | KeyCode::Char('s') => self.screen.close_overlay(),
                    _ => {}
                }
                return Ok(());
            }
            Overlay::Details(_) | Overlay::Help => {
                if matches!(
                    key.code,
                    KeyCode::Esc | KeyCode::Enter | KeyCode::Char('d') | KeyCode::Char('?')
                ) {
                    self.screen.close_overlay();
                }
                return Ok(());
            }
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => self.screen.set_should_quit(true),
            KeyCode::Down | KeyCode::Char('j') => self.scroll_by(1),
            KeyCode::Up | KeyCode::Char('k') => self.scroll_by(-1),
            KeyCode::PageDown => self.scroll_by(self.pool.len() as isize),
            KeyCode::PageUp => self.scroll_by(-(self.pool.len() as isize)),
            KeyCode::Home | KeyCode::Char('g') => self.scroll_to(0),
            KeyCode::End | KeyCode::Char('G') => self.scroll_to(usize::MAX),
            KeyCode::Char('l') | KeyCode::Char(' ') => self.tap_like(),
            KeyCode::Char('m') => self.tap_volume(),
            KeyCode::Char('d') | KeyCode::Enter => self.tap_details(),
            KeyCode::Char('s') => self.open_sections(),
            KeyCode::Char('?') => self.screen.set_overlay(Overlay::Help),
            _ => {}
        }

        Ok(())
    }
}
