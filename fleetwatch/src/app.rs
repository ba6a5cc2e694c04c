//! App state and main loop: input handling, refreshing derived host cards, toasts, and drawing.

use std::{
    collections::VecDeque,
    io,
    time::{Duration, Instant},
};

use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use fleetwatch::{toasts::PresentedIds, types::Notification, FleetClient, HostNode};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    Terminal,
};
use tokio::time::sleep;

use crate::ui::{
    header::draw_header,
    hosts::{clamp_offset, draw_hosts, hosts_handle_key},
    notifications::{draw_notifications, draw_toast},
};

const TOAST_TTL: Duration = Duration::from_secs(4);
const TICK: Duration = Duration::from_millis(200);

pub struct App {
    client: FleetClient,

    // Derived on every refresh; never patched in place
    hosts: Vec<HostNode>,

    presented: PresentedIds,
    toast_queue: VecDeque<Notification>,
    toast: Option<(Notification, Instant)>,

    hosts_scroll: usize,
    last_hosts_area: Option<Rect>,
    should_quit: bool,
}

impl App {
    pub fn new(client: FleetClient) -> Self {
        Self {
            client,
            hosts: Vec::new(),
            presented: PresentedIds::new(),
            toast_queue: VecDeque::new(),
            toast: None,
            hosts_scroll: 0,
            last_hosts_area: None,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        let res = self.event_loop(&mut terminal).await;

        // Teardown
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        res
    }

    async fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> anyhow::Result<()> {
        loop {
            // Input (non-blocking)
            while event::poll(Duration::from_millis(10))? {
                if let Event::Key(k) = event::read()? {
                    if matches!(
                        k.code,
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc
                    ) {
                        self.should_quit = true;
                    }
                    let page = self
                        .last_hosts_area
                        .map(|a| a.height.saturating_sub(3) as usize)
                        .unwrap_or(1);
                    hosts_handle_key(&mut self.hosts_scroll, k, page);
                    self.hosts_scroll = clamp_offset(self.hosts_scroll, self.hosts.len(), page);
                }
            }
            if self.should_quit {
                break;
            }

            self.refresh();
            terminal.draw(|f| self.draw(f))?;
            sleep(TICK).await;
        }
        Ok(())
    }

    fn refresh(&mut self) {
        {
            let state = self.client.state();
            self.hosts = state.snapshot.hosts();
            self.toast_queue
                .extend(self.presented.take_unpresented(&state.notifications));
        }

        let expired = self
            .toast
            .as_ref()
            .map_or(true, |(_, shown)| shown.elapsed() >= TOAST_TTL);
        if expired {
            self.toast = self.toast_queue.pop_front().map(|n| (n, Instant::now()));
        }
    }

    pub fn draw(&mut self, f: &mut ratatui::Frame<'_>) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),  // header
                Constraint::Min(6),     // hosts
                Constraint::Length(12), // notifications
                Constraint::Length(1),  // toast
            ])
            .split(f.area());

        let conn = self.client.connection_state();
        {
            let state = self.client.state();
            draw_header(f, rows[0], conn, &state.snapshot);
            draw_notifications(f, rows[2], &state.notifications);
        }

        self.last_hosts_area = Some(rows[1]);
        draw_hosts(f, rows[1], &self.hosts, self.hosts_scroll);
        draw_toast(f, rows[3], self.toast.as_ref().map(|(n, _)| n));
    }
}
