//! Opens the WebSocket transport to the coordinator.

use std::{fs::File, io::BufReader, sync::Arc};

use tokio::net::TcpStream;
use tokio_tungstenite::{
    connect_async, connect_async_tls_with_config, Connector, MaybeTlsStream, WebSocketStream,
};
use url::Url;

use crate::error::TransportError;

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Connect to the endpoint. `tls_ca` pins a custom CA bundle (PEM) for `wss://`
/// coordinators running on self-signed certificates.
pub async fn connect(url: &Url, tls_ca: Option<&str>) -> Result<WsStream, TransportError> {
    let ws = match tls_ca {
        Some(path) if url.scheme() == "wss" => {
            let connector = Connector::Rustls(Arc::new(client_config_with_ca(path)?));
            let (ws, _) =
                connect_async_tls_with_config(url.as_str(), None, false, Some(connector)).await?;
            ws
        }
        _ => {
            let (ws, _) = connect_async(url.as_str()).await?;
            ws
        }
    };
    Ok(ws)
}

fn client_config_with_ca(path: &str) -> Result<rustls::ClientConfig, TransportError> {
    let file = File::open(path).map_err(|source| TransportError::CaBundle {
        path: path.to_string(),
        source,
    })?;
    let mut reader = BufReader::new(file);
    let mut roots = rustls::RootCertStore::empty();
    for cert in rustls_pemfile::certs(&mut reader) {
        let cert = cert.map_err(|source| TransportError::CaBundle {
            path: path.to_string(),
            source,
        })?;
        roots.add(cert)?;
    }
    if roots.is_empty() {
        return Err(TransportError::EmptyCaBundle(path.to_string()));
    }
    Ok(rustls::ClientConfig::builder()
        .with_root_certificates(roots)
        .with_no_client_auth())
}
