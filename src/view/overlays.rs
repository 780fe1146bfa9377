//! Overlay rendering (error notification, clip details, sections, help popup)

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::model::{ClipDetails, UiState};
use super::utils::centered_popup;

pub fn render_error_notification(frame: &mut Frame, ui_state: &UiState) {
    if let Some(ref error_msg) = ui_state.error_message {
        let area = frame.area();

        let popup_width = 52u16.min(area.width.saturating_sub(4));
        let inner_width = popup_width.saturating_sub(4).max(1) as usize;

        // Lines the message takes when wrapped
        let error_line_count = error_msg.chars().count().div_ceil(inner_width) as u16;

        let popup_area = centered_popup(area, popup_width, 2 + error_line_count.max(1));

        frame.render_widget(Clear, popup_area);

        let error_widget = Paragraph::new(error_msg.to_string())
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red))
                    .title(" Error (Esc to dismiss) ")
                    .title_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
                    .style(Style::default().bg(Color::Black)),
            );

        frame.render_widget(error_widget, popup_area);
    }
}

pub fn render_details(frame: &mut Frame, details: &ClipDetails) {
    let popup_area = centered_popup(frame.area(), 64, 8);
    frame.render_widget(Clear, popup_area);

    let field = |name: &'static str, value: &str| {
        Line::from(vec![
            Span::styled(
                format!("{:>8}", name),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(value.to_string(), Style::default().fg(Color::White)),
        ])
    };

    let lines = vec![
        field("Caption", &details.caption),
        field("Section", &details.section),
        field("Event", &details.event),
        field("Video", &details.media_url),
    ];

    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Clip Details (Esc to close) ")
                .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                .style(Style::default().bg(Color::Black)),
        );

    frame.render_widget(widget, popup_area);
}

pub fn render_sections(frame: &mut Frame, sections: &[(String, usize)], selected: usize) {
    let longest = sections
        .iter()
        .map(|(name, _)| name.chars().count() + 14)
        .max()
        .unwrap_or(30);
    let popup_width = (longest as u16 + 6).clamp(35, 60);
    let popup_height = (sections.len() as u16 + 2).max(4);
    let popup_area = centered_popup(frame.area(), popup_width, popup_height);

    frame.render_widget(Clear, popup_area);

    let items: Vec<ListItem> = sections
        .iter()
        .enumerate()
        .map(|(i, (name, first))| {
            let style = if i == selected {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Green)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            let label = if name.is_empty() { "(no section)" } else { name.as_str() };
            ListItem::new(format!("{}  · from #{}", label, first + 1)).style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Sections (↑↓ Enter Esc) ")
            .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .style(Style::default().bg(Color::Black)),
    );

    let mut list_state = ListState::default();
    list_state.select(Some(selected));

    frame.render_stateful_widget(list, popup_area, &mut list_state);
}

pub fn render_help_popup(frame: &mut Frame) {
    let keybindings = [
        ("", "── Feed ──"),
        ("↑ / ↓  k / j", "Previous / next clip"),
        ("PgUp / PgDn", "Jump a page"),
        ("g / G", "First / last clip"),
        ("s", "Sections"),
        ("", ""),
        ("", "── Clip ──"),
        ("m", "Sound on / off (resets on loop)"),
        ("l / Space", "Like / Unlike"),
        ("d / Enter", "Clip details"),
        ("", ""),
        ("", "── General ──"),
        ("?", "Toggle this help"),
        ("q", "Quit"),
    ];

    let popup_area = centered_popup(frame.area(), 62, keybindings.len() as u16 + 2);
    frame.render_widget(Clear, popup_area);

    let lines: Vec<Line> = keybindings
        .iter()
        .map(|(key, desc)| {
            if key.is_empty() {
                Line::from(Span::styled(
                    format!("{:^38}", desc),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(vec![
                    Span::styled(
                        format!("{:>18}", key),
                        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw("  "),
                    Span::styled(desc.to_string(), Style::default().fg(Color::White)),
                ])
            }
        })
        .collect();

    let help_text = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help (? or Esc to close) ")
                .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                .style(Style::default().bg(Color::Black)),
        )
        .style(Style::default().bg(Color::Black));

    frame.render_widget(help_text, popup_area);
}
