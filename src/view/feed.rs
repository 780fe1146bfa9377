//! Feed rendering, one block per bound cell

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Padding, Paragraph},
    Frame,
};

use crate::model::{CellView, FeedSnapshot};
use super::utils::{format_duration, truncate_string};

pub fn render_feed(frame: &mut Frame, area: Rect, snapshot: &FeedSnapshot) {
    if snapshot.cells.is_empty() {
        let empty = Paragraph::new("No clips for this event yet")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).padding(Padding::horizontal(1)));
        frame.render_widget(empty, area);
        return;
    }

    let constraints: Vec<Constraint> = snapshot
        .cells
        .iter()
        .map(|_| Constraint::Ratio(1, snapshot.cells.len() as u32))
        .collect();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (cell, chunk) in snapshot.cells.iter().zip(chunks.iter()) {
        render_cell(frame, *chunk, cell);
    }
}

fn render_cell(frame: &mut Frame, area: Rect, cell: &CellView) {
    let border_style = if cell.selected {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let like = if cell.display.like_selected { "♥" } else { "♡" };
    let sound = if cell.is_muted() { "🔇" } else { "🔊" };
    let title = format!(" #{} {} {} ", cell.clip_index + 1, like, sound);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding::horizontal(1))
        .border_style(border_style);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Labels
            Constraint::Length(1), // Playback progress
        ])
        .split(inner);

    let width = rows[0].width as usize;
    let label_style = if cell.selected {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    let labels = vec![
        Line::from(Span::styled(truncate_string(&cell.display.caption, width), label_style)),
        Line::from(Span::styled(
            truncate_string(&format!("Section {}", cell.display.section), width),
            Style::default().fg(Color::Gray),
        )),
        Line::from(Span::styled(
            truncate_string(&cell.display.event, width),
            Style::default().fg(Color::Gray),
        )),
    ];
    frame.render_widget(Paragraph::new(labels), rows[0]);

    match &cell.session {
        Some(session) => {
            let duration = session.duration.unwrap_or_default();
            let ratio = if duration.is_zero() {
                0.0
            } else {
                (session.position.as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0)
            };
            let gauge = Gauge::default()
                .gauge_style(Style::default().fg(Color::Green))
                .ratio(ratio)
                .label(format!(
                    "{} / {}",
                    format_duration(session.position),
                    format_duration(duration)
                ));
            frame.render_widget(gauge, rows[1]);
        }
        None if cell.display.media_unavailable => {
            let unavailable = Paragraph::new("Video unavailable").style(Style::default().fg(Color::Red));
            frame.render_widget(unavailable, rows[1]);
        }
        None => {}
    }
}
