//! Live fleet view for a distributed search coordinator.
//!
//! A single WebSocket connection feeds partial update frames into a canonical
//! [`snapshot::Snapshot`] and a bounded [`notifications::NotificationLog`];
//! readers share that state through [`client::FleetClient`] handles and derive
//! per-host cards with [`hosts::group_by_host`].

pub mod client;
pub mod config;
pub mod connection;
pub mod error;
pub mod frame;
pub mod hosts;
pub mod notifications;
pub mod profiles;
pub mod snapshot;
pub mod toasts;
pub mod types;
pub mod ws;

pub use client::{Connection, FleetClient};
pub use config::ConnectOptions;
pub use connection::ConnectionState;
pub use hosts::{group_by_host, HostNode};
pub use snapshot::{FleetState, Snapshot};
