//! Endpoint resolution precedence and same-origin derivation.
use fleetwatch::config::{
    endpoint_from_origin, parse_endpoint, resolve_endpoint, DEFAULT_ORIGIN, ENV_ORIGIN, ENV_WS_URL,
};
use fleetwatch::error::ConfigError;

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn origin_scheme_maps_to_websocket_scheme() {
    assert_eq!(
        endpoint_from_origin("https://fleet.example.com").unwrap().as_str(),
        "wss://fleet.example.com/ws"
    );
    assert_eq!(
        endpoint_from_origin("http://10.0.0.5:7001/dashboard?x=1").unwrap().as_str(),
        "ws://10.0.0.5:7001/ws"
    );
    assert_eq!(
        endpoint_from_origin("http://[::1]:8080").unwrap().as_str(),
        "ws://[::1]:8080/ws"
    );
}

#[test]
fn explicit_beats_env_beats_origin() {
    let env = |k: &str| match k {
        ENV_WS_URL => Some("ws://from-env:1/ws".to_string()),
        ENV_ORIGIN => Some("https://origin-env".to_string()),
        _ => None,
    };
    assert_eq!(
        resolve_endpoint(Some("wss://cli:9/ws"), None, env).unwrap().as_str(),
        "wss://cli:9/ws"
    );
    assert_eq!(
        resolve_endpoint(None, Some("https://flag"), env).unwrap().as_str(),
        "ws://from-env:1/ws"
    );

    let origin_only = |k: &str| (k == ENV_ORIGIN).then(|| "https://origin-env".to_string());
    assert_eq!(
        resolve_endpoint(None, None, origin_only).unwrap().as_str(),
        "wss://origin-env/ws"
    );
    // the --origin flag wins over the origin env var
    assert_eq!(
        resolve_endpoint(None, Some("http://flag:3000"), origin_only).unwrap().as_str(),
        "ws://flag:3000/ws"
    );
}

#[test]
fn falls_back_to_default_origin() {
    let url = resolve_endpoint(None, None, no_env).unwrap();
    assert_eq!(url, endpoint_from_origin(DEFAULT_ORIGIN).unwrap());
    assert_eq!(url.path(), "/ws");
}

#[test]
fn rejects_non_websocket_endpoints() {
    assert!(matches!(
        parse_endpoint("http://host/ws"),
        Err(ConfigError::UnsupportedScheme(_))
    ));
    assert!(matches!(
        parse_endpoint("not a url"),
        Err(ConfigError::InvalidUrl { .. })
    ));
    assert!(resolve_endpoint(Some("ftp://x"), None, no_env).is_err());
}
