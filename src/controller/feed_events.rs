//! Applying background completions on the UI context

use crate::model::{Completion, FeedEvent};

use super::FeedController;

impl FeedController {
    /// Route one event to the cell it was issued for
    pub fn handle_event(&mut self, event: FeedEvent) -> Completion {
        let Some(cell) = self.pool.get_mut(event.cell()) else {
            tracing::warn!(cell = event.cell().0, "Event for unknown cell");
            return Completion::Stale;
        };

        match event {
            FeedEvent::PlayedToEnd { session, .. } => {
                tracing::trace!(cell = cell.id().0, session = session.0, "FeedEvent::PlayedToEnd");
                cell.handle_played_to_end(session)
            }
            FeedEvent::LikeResolved {
                ticket,
                clip,
                outcome,
            } => {
                tracing::debug!(cell = ticket.cell.0, clip = %clip, ok = outcome.is_ok(), "FeedEvent::LikeResolved");
                let completion = cell.apply_like_outcome(ticket, outcome);
                match completion {
                    Completion::Applied => {
                        let liked = cell.display().like_selected;
                        self.screen.set_status(if liked { "Saved to likes" } else { "Removed from likes" });
                    }
                    Completion::Failed | Completion::Stale => {}
                }
                completion
            }
        }
    }

    /// Apply every event queued so far; returns how many were handled
    pub fn drain_events(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.events.try_recv() {
            self.handle_event(event);
            handled += 1;
        }
        handled
    }
}
