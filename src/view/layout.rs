//! Layout rendering (top bar, status bar)

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Padding, Paragraph},
    Frame,
};

use crate::model::{FeedSnapshot, UiState};

pub fn render_top_bar(frame: &mut Frame, area: Rect, snapshot: &FeedSnapshot) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),     // Event title
            Constraint::Length(28), // Signed-in user
        ])
        .split(area);

    let title = Paragraph::new(snapshot.title.as_str())
        .style(Style::default().fg(Color::Green))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Event ")
                .padding(Padding::horizontal(1))
                .border_style(Style::default().fg(Color::Green)),
        );
    frame.render_widget(title, chunks[0]);

    let user = Paragraph::new(format!("👤 {}", snapshot.user))
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL).title(" User "));
    frame.render_widget(user, chunks[1]);
}

pub fn render_status_bar(frame: &mut Frame, area: Rect, snapshot: &FeedSnapshot, ui_state: &UiState) {
    let position = if snapshot.total == 0 {
        "No clips".to_string()
    } else {
        format!("Clip {} / {}", snapshot.selected + 1, snapshot.total)
    };
    let status = ui_state.status.as_deref().unwrap_or("");
    let hints = " j/k scroll | m sound | l like | d details | s sections | ? help | q quit ";

    let bar = Paragraph::new(format!(" {} {}", position, status))
        .style(Style::default().fg(Color::White))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title_bottom(Line::from(hints).right_aligned()),
        );
    frame.render_widget(bar, area);
}
