//! Notification feed (log order, newest first) and the single-line toast.

use fleetwatch::notifications::NotificationLog;
use fleetwatch::types::Notification;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

use crate::ui::theme::kind_color;
use crate::ui::util::clock;

pub fn draw_notifications(f: &mut ratatui::Frame<'_>, area: Rect, log: &NotificationLog) {
    let visible = area.height.saturating_sub(2) as usize;
    let items: Vec<ListItem> = log
        .iter()
        .take(visible)
        .map(|n| {
            let mut spans = vec![
                Span::styled(clock(n.timestamp_ms), Style::default().fg(Color::DarkGray)),
                Span::raw(" "),
                Span::styled(
                    format!("{:<9}", n.kind),
                    Style::default().fg(kind_color(&n.kind)),
                ),
                Span::raw(" "),
                Span::styled(n.title.clone(), Style::default().add_modifier(Modifier::BOLD)),
            ];
            if let Some(first) = n.details.first() {
                spans.push(Span::styled(
                    format!("  {first}"),
                    Style::default().fg(Color::Gray),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();
    let title = format!("Notifications ({}/{})", log.len(), log.capacity());
    f.render_widget(
        List::new(items).block(Block::default().borders(Borders::ALL).title(title)),
        area,
    );
}

pub fn draw_toast(f: &mut ratatui::Frame<'_>, area: Rect, toast: Option<&Notification>) {
    let line = match toast {
        Some(n) => Line::from(vec![
            Span::styled(
                format!(" {} ", n.kind),
                Style::default()
                    .fg(Color::Black)
                    .bg(kind_color(&n.kind))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(" {}", n.title)),
            Span::styled(
                n.details
                    .iter()
                    .map(|d| format!(" · {d}"))
                    .collect::<String>(),
                Style::default().fg(Color::Gray),
            ),
        ]),
        None => Line::from(""),
    };
    f.render_widget(Paragraph::new(line), area);
}
