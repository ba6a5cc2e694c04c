//! Typed errors for the library. None of these reach consumers of the live
//! state; the driver logs them and carries on.

use thiserror::Error;

/// Why an inbound frame was dropped.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("frame is not valid JSON: {0}")]
    Json(#[source] serde_json::Error),
    #[error("frame has no \"type\" discriminant")]
    MissingType,
    #[error("unrecognized frame type {0:?}")]
    UnknownType(String),
    #[error("malformed {kind} frame: {source}")]
    Shape {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid endpoint url {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("endpoint {0:?} must use ws:// or wss://")]
    UnsupportedScheme(String),
    #[error("origin {0:?} has no host")]
    MissingHost(String),
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("websocket: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("reading CA bundle {path}: {source}")]
    CaBundle {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("CA bundle {0} contains no usable certificates")]
    EmptyCaBundle(String),
    #[error("tls: {0}")]
    Tls(#[from] rustls::Error),
}
