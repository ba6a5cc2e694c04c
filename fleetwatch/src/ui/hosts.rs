//! Host table: one row per derived host card, coordinator first, with a scrollbar.

use crossterm::event::{KeyCode, KeyEvent};
use fleetwatch::HostNode;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};

use crate::ui::theme::{COORDINATOR, SB_ARROW, SB_THUMB, SB_TRACK, ZEBRA};
use crate::ui::util::{human_count, short_age, truncate_middle, usage_color};

const COLS: [Constraint; 11] = [
    Constraint::Percentage(22), // Host
    Constraint::Length(8),      // Workers
    Constraint::Length(6),      // Cores
    Constraint::Length(9),      // Tested
    Constraint::Length(6),      // Found
    Constraint::Length(7),      // CPU %
    Constraint::Length(7),      // Mem %
    Constraint::Length(7),      // Disk %
    Constraint::Length(6),      // Load 1m
    Constraint::Length(12),     // Jobs / deploys
    Constraint::Length(7),      // freshest heartbeat
];

fn pct_cell(v: Option<f64>) -> Cell<'static> {
    match v {
        Some(p) => Cell::from(format!("{p:>5.1}")).style(Style::default().fg(usage_color(p))),
        None => Cell::from("   --").style(Style::default().fg(Color::DarkGray)),
    }
}

fn host_row(h: &HostNode, zebra: bool, name_width: usize) -> Row<'static> {
    let name = if h.is_coordinator {
        format!("★ {}", truncate_middle(&h.hostname, name_width.saturating_sub(2)))
    } else {
        truncate_middle(&h.hostname, name_width)
    };
    let name_style = if h.is_coordinator {
        Style::default().fg(COORDINATOR).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let m = h.metrics.as_ref();
    let failed_deploys = h
        .deployments
        .iter()
        .filter(|d| d.status == "failed" || d.error.is_some())
        .count();
    let jobs = format!("{}s/{}d", h.searches.len(), h.deployments.len());
    let jobs_style = if failed_deploys > 0 {
        Style::default().fg(Color::Red)
    } else {
        Style::default()
    };

    let beat = match h.workers.iter().map(|w| w.last_heartbeat_secs_ago).min() {
        Some(s) if s > 60 => Cell::from(short_age(s)).style(Style::default().fg(Color::Red)),
        Some(s) => Cell::from(short_age(s)),
        None => Cell::from("--").style(Style::default().fg(Color::DarkGray)),
    };

    let row = Row::new(vec![
        Cell::from(name).style(name_style),
        Cell::from(h.workers.len().to_string()),
        Cell::from(h.total_cores.to_string()),
        Cell::from(human_count(h.total_tested)),
        Cell::from(h.total_found.to_string()).style(if h.total_found > 0 {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        }),
        pct_cell(m.map(|m| m.cpu_usage_percent)),
        pct_cell(m.map(|m| m.memory_usage_percent)),
        pct_cell(m.map(|m| m.disk_usage_percent)),
        Cell::from(
            m.map(|m| format!("{:.2}", m.load_avg_1m))
                .unwrap_or_else(|| "--".into()),
        ),
        Cell::from(jobs).style(jobs_style),
        beat,
    ]);
    if zebra {
        row.style(Style::default().bg(ZEBRA))
    } else {
        row
    }
}

pub fn draw_hosts(
    f: &mut ratatui::Frame<'_>,
    area: Rect,
    hosts: &[HostNode],
    scroll_offset: usize,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Hosts ({})", hosts.len()));
    f.render_widget(block, area);

    let inner = Rect {
        x: area.x + 1,
        y: area.y + 1,
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    };
    if inner.height < 2 || inner.width < 10 {
        return;
    }
    // reserve 2 columns for the scrollbar
    let content = Rect {
        width: inner.width.saturating_sub(2),
        ..inner
    };

    let viewport_rows = content.height.saturating_sub(1) as usize;
    let offset = clamp_offset(scroll_offset, hosts.len(), viewport_rows);
    let name_width = (content.width as usize * 22 / 100).max(4);

    let rows = hosts
        .iter()
        .enumerate()
        .skip(offset)
        .take(viewport_rows)
        .map(|(i, h)| host_row(h, i % 2 == 1, name_width));

    let header = Row::new(vec![
        "Host", "Workers", "Cores", "Tested", "Found", "CPU %", "Mem %", "Disk %", "Load", "Jobs",
        "Beat",
    ])
    .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

    let table = Table::new(rows, COLS.to_vec()).header(header).column_spacing(1);
    f.render_widget(table, content);

    draw_scrollbar(
        f,
        Rect {
            x: inner.x + inner.width.saturating_sub(1),
            y: inner.y,
            width: 1,
            height: inner.height,
        },
        hosts.len(),
        viewport_rows,
        offset,
    );
}

fn draw_scrollbar(
    f: &mut ratatui::Frame<'_>,
    area: Rect,
    total: usize,
    view: usize,
    offset: usize,
) {
    if area.height < 3 {
        return;
    }
    let track = (area.height - 2) as usize;
    let total = total.max(1);
    let view = view.clamp(1, total);
    let max_off = total.saturating_sub(view);
    let thumb_len = (track * view).div_ceil(total).clamp(1, track);
    let thumb_top = if max_off == 0 {
        0
    } else {
        ((track - thumb_len) * offset + max_off / 2) / max_off
    };

    let mut lines: Vec<Line> = Vec::with_capacity(area.height as usize);
    lines.push(Line::from(Span::styled("▲", Style::default().fg(SB_ARROW))));
    for i in 0..track {
        let (glyph, color) = if i >= thumb_top && i < thumb_top + thumb_len {
            ("█", SB_THUMB)
        } else {
            ("│", SB_TRACK)
        };
        lines.push(Line::from(Span::styled(glyph, Style::default().fg(color))));
    }
    lines.push(Line::from(Span::styled("▼", Style::default().fg(SB_ARROW))));
    f.render_widget(Paragraph::new(lines), area);
}

pub fn clamp_offset(offset: usize, total: usize, view: usize) -> usize {
    offset.min(total.saturating_sub(view))
}

/// Up/Down/PageUp/PageDown/Home/End scrolling.
pub fn hosts_handle_key(offset: &mut usize, key: KeyEvent, page: usize) {
    let page = page.max(1);
    match key.code {
        KeyCode::Up => *offset = offset.saturating_sub(1),
        KeyCode::Down => *offset = offset.saturating_add(1),
        KeyCode::PageUp => *offset = offset.saturating_sub(page),
        KeyCode::PageDown => *offset = offset.saturating_add(page),
        KeyCode::Home => *offset = 0,
        KeyCode::End => *offset = usize::MAX,
        _ => {}
    }
}
