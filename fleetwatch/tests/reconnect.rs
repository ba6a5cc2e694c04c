//! End-to-end against a loopback WebSocket server: merge over the wire,
//! reconnect after a remote close or a dropped socket, best-effort send,
//! and cancellation.
use std::time::{Duration, Instant};

use fleetwatch::{ConnectOptions, Connection, ConnectionState, FleetClient};
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tokio_tungstenite::{accept_async, tungstenite::Message, WebSocketStream};
use url::Url;

const WAIT: Duration = Duration::from_secs(5);

async fn listen() -> (TcpListener, Url) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let url = Url::parse(&format!("ws://{addr}/ws")).expect("url");
    (listener, url)
}

async fn accept_ws(listener: &TcpListener) -> WebSocketStream<TcpStream> {
    let (stream, _) = timeout(WAIT, listener.accept())
        .await
        .expect("client connected in time")
        .expect("accept");
    accept_async(stream).await.expect("handshake")
}

async fn wait_until(client: &mut FleetClient, what: &str, pred: impl Fn(&FleetClient) -> bool) {
    let reached = timeout(WAIT, async {
        while !pred(client) {
            if !client.changed().await {
                return false;
            }
        }
        true
    })
    .await;
    assert!(matches!(reached, Ok(true)), "timed out waiting for {what}");
}

fn update_with_workers() -> Message {
    Message::Text(
        json!({
            "type": "update",
            "status": { "active": true },
            "fleet": { "workers": [
                { "worker_id": "a", "hostname": "h1", "cores": 16, "tested": 3 },
                { "worker_id": "b", "hostname": "h1", "cores": 16, "tested": 4 }
            ] },
            "coordinator": { "cpu_usage_percent": 10.0 }
        })
        .to_string(),
    )
}

fn status_only(active: bool) -> Message {
    Message::Text(json!({ "type": "update", "status": { "active": active } }).to_string())
}

#[tokio::test]
async fn reconnects_after_remote_close_and_keeps_merged_state() {
    let (listener, url) = listen().await;
    let conn = Connection::spawn(ConnectOptions::new(url));
    let mut client = conn.client();

    let mut ws = accept_ws(&listener).await;
    ws.send(update_with_workers()).await.unwrap();
    ws.send(Message::Text("{garbage".into())).await.unwrap();
    ws.send(Message::Text(r#"{"type":"heartbeat"}"#.into())).await.unwrap();
    ws.send(status_only(false)).await.unwrap();

    wait_until(&mut client, "merged status", |c| {
        c.state().snapshot.status.as_ref().is_some_and(|s| !s.active)
    })
    .await;
    assert!(client.is_connected());
    assert_eq!(client.state().snapshot.fleet.workers.len(), 2);
    // the status-only frame carried no coordinator metrics, which clears them
    assert!(client.state().snapshot.coordinator.is_none());
    let hosts = client.hosts();
    assert_eq!(hosts.len(), 1);
    assert!(!hosts[0].is_coordinator);
    assert_eq!(hosts[0].hostname, "h1");
    assert_eq!(hosts[0].total_cores, 16);
    assert_eq!(hosts[0].total_tested, 7);

    // remote end drops the connection
    ws.close(None).await.unwrap();
    drop(ws);
    let dropped_at = Instant::now();
    wait_until(&mut client, "disconnect", |c| !c.is_connected()).await;
    assert!(!client.send(&json!({ "type": "hello" })), "send while disconnected must be dropped");

    let mut ws2 = accept_ws(&listener).await;
    let waited = dropped_at.elapsed();
    assert!(
        waited >= Duration::from_millis(900) && waited < Duration::from_secs(3),
        "reconnect after {waited:?}, expected about 1s plus jitter"
    );
    wait_until(&mut client, "reconnect", |c| c.is_connected()).await;

    // nothing regresses across the reconnect
    assert_eq!(client.state().snapshot.fleet.workers.len(), 2);

    // outbound flows once connected again; the message dropped earlier is not replayed
    assert!(client.send(&json!({ "type": "hello", "n": 2 })));
    let got = timeout(WAIT, ws2.next()).await.expect("message in time");
    match got {
        Some(Ok(Message::Text(text))) => {
            let v: serde_json::Value = serde_json::from_str(&text).unwrap();
            assert_eq!(v["n"], 2);
        }
        other => panic!("unexpected frame {other:?}"),
    }

    // backoff was reset by the successful open: the next drop waits ~1s again
    ws2.close(None).await.unwrap();
    drop(ws2);
    let dropped_at = Instant::now();
    let _ws3 = accept_ws(&listener).await;
    let waited = dropped_at.elapsed();
    assert!(waited < Duration::from_millis(1900), "second reconnect after {waited:?}");

    conn.shutdown().await;
    assert_eq!(client.connection_state(), ConnectionState::Disconnected);
}

#[tokio::test]
async fn socket_dropped_without_close_frame_retries_once() {
    let (listener, url) = listen().await;
    let conn = Connection::spawn(ConnectOptions::new(url));
    let mut client = conn.client();

    let mut ws = accept_ws(&listener).await;
    ws.send(update_with_workers()).await.unwrap();
    wait_until(&mut client, "first update", |c| c.state().snapshot.fleet.workers.len() == 2).await;

    // tear the TCP stream down mid-session: the client reads a transport error, not a close
    drop(ws);
    let dropped_at = Instant::now();
    wait_until(&mut client, "disconnect", |c| !c.is_connected()).await;

    let _ws2 = accept_ws(&listener).await;
    let waited = dropped_at.elapsed();
    assert!(
        waited >= Duration::from_millis(900) && waited < Duration::from_secs(3),
        "reconnect after {waited:?}, expected about 1s plus jitter"
    );
    wait_until(&mut client, "reconnect", |c| c.is_connected()).await;
    assert_eq!(client.state().snapshot.fleet.workers.len(), 2);

    // the error and the close it forced scheduled a single attempt
    assert!(
        timeout(Duration::from_millis(1500), listener.accept()).await.is_err(),
        "a second attempt was made while the first reconnect is healthy"
    );
    assert!(client.is_connected());

    conn.shutdown().await;
}

#[tokio::test]
async fn notifications_arrive_once_newest_first() {
    let (listener, url) = listen().await;
    let conn = Connection::spawn(ConnectOptions::new(url));
    let mut client = conn.client();
    let mut ws = accept_ws(&listener).await;

    for id in [1u64, 2, 2, 3, 1] {
        let frame = json!({ "type": "notification", "notification": {
            "id": id, "kind": "prime", "title": format!("n{id}"), "details": [], "timestamp_ms": id
        }});
        ws.send(Message::Text(frame.to_string())).await.unwrap();
    }
    wait_until(&mut client, "three notifications", |c| c.state().notifications.len() == 3).await;
    let ids: Vec<u64> = client.state().notifications.iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![3, 2, 1]);

    conn.shutdown().await;
}

#[tokio::test]
async fn dropping_the_connection_cancels_the_pending_reconnect() {
    let (listener, url) = listen().await;
    let conn = Connection::spawn(ConnectOptions::new(url));
    let client = conn.client();

    // accept the TCP connection but refuse the websocket handshake; a retry is now pending
    let (stream, _) = timeout(WAIT, listener.accept()).await.unwrap().unwrap();
    drop(stream);
    tokio::time::sleep(Duration::from_millis(300)).await;

    drop(conn);
    assert!(
        timeout(Duration::from_millis(2500), listener.accept()).await.is_err(),
        "no reconnect attempt may happen after disposal"
    );
    assert_eq!(client.connection_state(), ConnectionState::Disconnected);
}
