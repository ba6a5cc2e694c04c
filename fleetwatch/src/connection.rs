//! Connection lifecycle and reconnection policy, free of any I/O.
//!
//! The driver in [`crate::client`] feeds transport events in and gets back
//! how long to wait before the next attempt. Keeping the clock and the RNG
//! outside makes the schedule deterministic under test.

use std::time::Duration;

pub const BACKOFF_FLOOR: Duration = Duration::from_secs(1);
pub const BACKOFF_CEILING: Duration = Duration::from_secs(30);
pub const MAX_JITTER: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

impl ConnectionState {
    pub fn label(self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
        }
    }
}

/// Exponential backoff: floor, doubling per failure, capped at the ceiling.
#[derive(Debug, Clone)]
pub struct Backoff {
    current: Duration,
    floor: Duration,
    ceiling: Duration,
}

impl Backoff {
    pub fn new(floor: Duration, ceiling: Duration) -> Self {
        Self {
            current: floor,
            floor,
            ceiling: ceiling.max(floor),
        }
    }

    /// Delay before the next attempt, then double for the one after.
    pub fn next_delay(&mut self, jitter: Duration) -> Duration {
        let delay = self.current.min(self.ceiling) + jitter;
        self.current = self.current.saturating_mul(2).min(self.ceiling);
        delay
    }

    pub fn reset(&mut self) {
        self.current = self.floor;
    }

    pub fn current(&self) -> Duration {
        self.current
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new(BACKOFF_FLOOR, BACKOFF_CEILING)
    }
}

#[derive(Debug, Default)]
pub struct ConnectionManager {
    state: ConnectionState,
    backoff: Backoff,
    disposed: bool,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_backoff(backoff: Backoff) -> Self {
        Self {
            backoff,
            ..Self::default()
        }
    }

    /// Returns true when the caller should open a transport now.
    pub fn connect(&mut self) -> bool {
        if self.disposed || self.state != ConnectionState::Disconnected {
            return false;
        }
        self.state = ConnectionState::Connecting;
        true
    }

    pub fn on_open(&mut self) {
        if self.disposed {
            return;
        }
        self.state = ConnectionState::Connected;
        self.backoff.reset();
    }

    /// Errors never schedule a retry themselves. Returns whether the caller
    /// should force the transport closed; that close schedules the retry.
    pub fn on_error(&mut self) -> bool {
        self.state != ConnectionState::Disconnected
    }

    /// Transport closed (cleanly, by error, or before it ever opened).
    /// Returns the reconnect delay, or `None` once disposed.
    pub fn on_close(&mut self, jitter: Duration) -> Option<Duration> {
        self.state = ConnectionState::Disconnected;
        if self.disposed {
            return None;
        }
        Some(self.backoff.next_delay(jitter.min(MAX_JITTER)))
    }

    pub fn dispose(&mut self) {
        self.disposed = true;
        self.state = ConnectionState::Disconnected;
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn backoff(&self) -> &Backoff {
        &self.backoff
    }
}
