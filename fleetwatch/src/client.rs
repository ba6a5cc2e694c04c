//! One connection, many readers.
//!
//! [`Connection::spawn`] starts a single driver task that owns the socket,
//! the reconnect policy and the canonical [`FleetState`]. Readers hold
//! [`FleetClient`] clones: a read-only view over `watch` channels plus a
//! fire-and-forget `send`.

use futures_util::{SinkExt, StreamExt};
use rand::Rng;
use serde::Serialize;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, info, warn};

use crate::config::ConnectOptions;
use crate::connection::{ConnectionManager, ConnectionState, MAX_JITTER};
use crate::frame;
use crate::hosts::HostNode;
use crate::snapshot::FleetState;
use crate::ws::{self, WsStream};

// Outbound is best-effort; a full buffer drops the message.
const OUTBOUND_BUFFER: usize = 64;

/// Read-only handle to the live state. Cheap to clone; never opens its own socket.
#[derive(Clone)]
pub struct FleetClient {
    state: watch::Receiver<FleetState>,
    conn: watch::Receiver<ConnectionState>,
    outbound: mpsc::Sender<String>,
}

impl FleetClient {
    pub fn state(&self) -> watch::Ref<'_, FleetState> {
        self.state.borrow()
    }

    pub fn hosts(&self) -> Vec<HostNode> {
        self.state.borrow().snapshot.hosts()
    }

    pub fn connection_state(&self) -> ConnectionState {
        *self.conn.borrow()
    }

    pub fn is_connected(&self) -> bool {
        self.connection_state() == ConnectionState::Connected
    }

    /// Wait for the next change to either the state or the connection flag.
    /// Returns false once the driver has stopped.
    pub async fn changed(&mut self) -> bool {
        tokio::select! {
            r = self.state.changed() => r.is_ok(),
            r = self.conn.changed() => r.is_ok(),
        }
    }

    /// Serialize and queue `msg` for the open connection. Dropped (returns false)
    /// when not connected; nothing is buffered across reconnects.
    pub fn send<T: Serialize + ?Sized>(&self, msg: &T) -> bool {
        if !self.is_connected() {
            return false;
        }
        match serde_json::to_string(msg) {
            Ok(text) => self.outbound.try_send(text).is_ok(),
            Err(e) => {
                warn!(error = %e, "outbound message not serializable");
                false
            }
        }
    }
}

/// Owner of the driver task. Dropping it cancels any pending reconnect and closes the socket.
pub struct Connection {
    client: FleetClient,
    cancel: CancellationToken,
    _guard: DropGuard,
    task: Option<JoinHandle<()>>,
}

impl Connection {
    /// Start connecting in the background. Must be called inside a tokio runtime.
    pub fn spawn(opts: ConnectOptions) -> Self {
        let (state_tx, state_rx) = watch::channel(FleetState::default());
        let (conn_tx, conn_rx) = watch::channel(ConnectionState::Disconnected);
        let (out_tx, out_rx) = mpsc::channel(OUTBOUND_BUFFER);
        let cancel = CancellationToken::new();

        let driver = Driver {
            manager: ConnectionManager::with_backoff(opts.backoff.clone()),
            opts,
            state_tx,
            conn_tx,
            outbound: out_rx,
            cancel: cancel.clone(),
        };
        let task = tokio::spawn(driver.run());

        Self {
            client: FleetClient {
                state: state_rx,
                conn: conn_rx,
                outbound: out_tx,
            },
            _guard: cancel.clone().drop_guard(),
            cancel,
            task: Some(task),
        }
    }

    pub fn client(&self) -> FleetClient {
        self.client.clone()
    }

    /// Cancel the reconnect timer, close the socket and wait for the driver to exit.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!(error = %e, "connection driver did not exit cleanly");
            }
        }
    }
}

enum PumpExit {
    Closed,
    Cancelled,
}

struct Driver {
    opts: ConnectOptions,
    manager: ConnectionManager,
    state_tx: watch::Sender<FleetState>,
    conn_tx: watch::Sender<ConnectionState>,
    outbound: mpsc::Receiver<String>,
    cancel: CancellationToken,
}

impl Driver {
    async fn run(mut self) {
        loop {
            if !self.manager.connect() {
                break;
            }
            self.publish_connection();
            debug!(url = %self.opts.url, "connecting");

            let attempt = tokio::select! {
                _ = self.cancel.cancelled() => break,
                r = ws::connect(&self.opts.url, self.opts.tls_ca.as_deref()) => r,
            };
            match attempt {
                Ok(socket) => {
                    self.manager.on_open();
                    self.publish_connection();
                    info!(url = %self.opts.url, "connected");
                    if let PumpExit::Cancelled = self.pump(socket).await {
                        break;
                    }
                }
                Err(e) => {
                    warn!(url = %self.opts.url, error = %e, "connect failed");
                    self.manager.on_error();
                }
            }

            let Some(delay) = self.manager.on_close(sample_jitter()) else {
                break;
            };
            self.publish_connection();
            self.discard_outbound();
            info!(delay_ms = delay.as_millis() as u64, "disconnected; reconnect scheduled");

            tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }
        self.manager.dispose();
        self.publish_connection();
        debug!("connection driver stopped");
    }

    async fn pump(&mut self, socket: WsStream) -> PumpExit {
        let (mut sink, mut stream) = socket.split();
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    let _ = sink.close().await;
                    return PumpExit::Cancelled;
                }
                msg = stream.next() => match msg {
                    Some(Ok(Message::Text(text))) => self.on_text(&text),
                    Some(Ok(Message::Close(reason))) => {
                        info!(?reason, "coordinator closed the connection");
                        return PumpExit::Closed;
                    }
                    // ping/pong are answered by tungstenite; binary is not part of the protocol
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!(error = %e, "transport error");
                        if self.manager.on_error() {
                            let _ = sink.close().await;
                        }
                        return PumpExit::Closed;
                    }
                    None => return PumpExit::Closed,
                },
                Some(text) = self.outbound.recv() => {
                    if let Err(e) = sink.send(Message::Text(text)).await {
                        warn!(error = %e, "send failed");
                        if self.manager.on_error() {
                            let _ = sink.close().await;
                        }
                        return PumpExit::Closed;
                    }
                }
            }
        }
    }

    fn on_text(&self, text: &str) {
        match frame::decode(text) {
            Ok(frame) => {
                self.state_tx.send_if_modified(|state| state.apply_frame(frame));
            }
            Err(e) => debug!(error = %e, "dropping frame"),
        }
    }

    fn publish_connection(&self) {
        let next = self.manager.state();
        self.conn_tx.send_if_modified(|cur| {
            if *cur == next {
                return false;
            }
            *cur = next;
            true
        });
    }

    // Messages queued for a connection that is gone are not replayed.
    fn discard_outbound(&mut self) {
        let mut dropped = 0usize;
        while self.outbound.try_recv().is_ok() {
            dropped += 1;
        }
        if dropped > 0 {
            debug!(dropped, "discarded outbound messages queued before disconnect");
        }
    }
}

fn sample_jitter() -> Duration {
    let max = MAX_JITTER.as_millis() as u64;
    Duration::from_millis(rand::thread_rng().gen_range(0..=max))
}
