//! Top header: connection indicator, search status and fleet totals.

use fleetwatch::{ConnectionState, Snapshot};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::ui::util::human_count;

pub fn draw_header(
    f: &mut ratatui::Frame<'_>,
    area: Rect,
    conn: ConnectionState,
    snap: &Snapshot,
) {
    let (dot, color) = match conn {
        ConnectionState::Connected => ("●", Color::Green),
        ConnectionState::Connecting => ("◌", Color::Yellow),
        ConnectionState::Disconnected => ("○", Color::Red),
    };
    let status = match &snap.status {
        Some(s) if s.active => match &s.checkpoint {
            Some(cp) => format!("searching: {}", cp.describe()),
            None => "searching".into(),
        },
        Some(_) => "idle".into(),
        None => "no status yet".into(),
    };
    let totals = format!(
        "workers {} | cores {} | tested {} | found {}",
        snap.fleet.workers.len(),
        snap.fleet.total_cores,
        human_count(snap.fleet.total_tested),
        human_count(snap.fleet.total_found),
    );
    let line = Line::from(vec![
        Span::raw("fleetwatch "),
        Span::styled(format!("{dot} {}", conn.label()), Style::default().fg(color)),
        Span::raw(format!(" | {status} | {totals}  (press 'q' to quit)")),
    ]);
    f.render_widget(
        Paragraph::new(line).block(Block::default().borders(Borders::BOTTOM)),
        area,
    );
}
