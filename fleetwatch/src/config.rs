//! Endpoint resolution.
//!
//! Precedence: an explicit URL (command line or profile), then
//! `FLEETWATCH_WS_URL`, then `/ws` on the dashboard origin with the scheme
//! mapped http -> ws and https -> wss.

use url::Url;

use crate::connection::Backoff;
use crate::error::ConfigError;

pub const ENV_WS_URL: &str = "FLEETWATCH_WS_URL";
pub const ENV_ORIGIN: &str = "FLEETWATCH_ORIGIN";
pub const DEFAULT_ORIGIN: &str = "http://127.0.0.1:7001";

/// Everything the driver needs to (re)open the transport.
#[derive(Debug, Clone)]
pub struct ConnectOptions {
    pub url: Url,
    pub tls_ca: Option<String>,
    pub backoff: Backoff,
}

impl ConnectOptions {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            tls_ca: None,
            backoff: Backoff::default(),
        }
    }

    pub fn with_tls_ca(mut self, tls_ca: Option<String>) -> Self {
        self.tls_ca = tls_ca;
        self
    }
}

/// Parse and check a `ws://` / `wss://` endpoint.
pub fn parse_endpoint(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidUrl {
        url: raw.to_string(),
        source,
    })?;
    match url.scheme() {
        "ws" | "wss" => Ok(url),
        _ => Err(ConfigError::UnsupportedScheme(raw.to_string())),
    }
}

/// Same-origin endpoint: `<ws|wss>://<host>[:port]/ws`.
pub fn endpoint_from_origin(origin: &str) -> Result<Url, ConfigError> {
    let base = Url::parse(origin.trim()).map_err(|source| ConfigError::InvalidUrl {
        url: origin.to_string(),
        source,
    })?;
    // Host's Display keeps IPv6 brackets
    let host = base
        .host()
        .ok_or_else(|| ConfigError::MissingHost(origin.to_string()))?;
    let scheme = if matches!(base.scheme(), "https" | "wss") {
        "wss"
    } else {
        "ws"
    };
    let authority = match base.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    };
    parse_endpoint(&format!("{scheme}://{authority}/ws"))
}

/// Pick the endpoint. `env` is injected so callers (and tests) control the lookup.
pub fn resolve_endpoint(
    explicit: Option<&str>,
    origin: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Url, ConfigError> {
    if let Some(raw) = explicit.filter(|s| !s.trim().is_empty()) {
        return parse_endpoint(raw);
    }
    if let Some(raw) = env(ENV_WS_URL).filter(|s| !s.trim().is_empty()) {
        return parse_endpoint(&raw);
    }
    let origin = origin
        .map(str::to_string)
        .or_else(|| env(ENV_ORIGIN))
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_ORIGIN.to_string());
    endpoint_from_origin(&origin)
}

/// `resolve_endpoint` against the process environment.
pub fn resolve_endpoint_from_env(
    explicit: Option<&str>,
    origin: Option<&str>,
) -> Result<Url, ConfigError> {
    resolve_endpoint(explicit, origin, |k| std::env::var(k).ok())
}
