//! Entry point for the fleetwatch viewer. Parses args, resolves the endpoint and runs the UI.

mod app;
mod ui;

use anyhow::{anyhow, bail, Context};
use app::App;
use fleetwatch::config::{resolve_endpoint_from_env, ConnectOptions};
use fleetwatch::profiles::{
    load_profiles, save_decision, save_profiles, ProfileEntry, ProfileRequest, ProfilesFile,
    ResolveProfile, SaveDecision,
};
use fleetwatch::toasts::PresentedIds;
use fleetwatch::{Connection, FleetClient};
use std::env;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default)]
struct ParsedArgs {
    url: Option<String>,
    tls_ca: Option<String>,
    profile: Option<String>,
    origin: Option<String>,
    log_file: Option<String>,
    save: bool,
    headless: bool,
    dry_run: bool,
}

fn usage(prog: &str) -> String {
    format!(
        "Usage: {prog} [--tls-ca CERT_PEM|-t CERT_PEM] [--profile NAME|-P NAME] [--origin URL] [--save] [--headless] [--dry-run] [--log-file PATH] [ws://HOST:PORT/ws]"
    )
}

// "--flag=value" form; empty values are ignored
fn inline_value(arg: &str) -> Option<String> {
    arg.split_once('=')
        .map(|(_, v)| v.to_string())
        .filter(|v| !v.is_empty())
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<ParsedArgs, String> {
    let mut it = args.into_iter();
    let prog = it.next().unwrap_or_else(|| "fleetwatch".into());
    let mut parsed = ParsedArgs::default();

    while let Some(arg) = it.next() {
        match arg.as_str() {
            "-h" | "--help" => return Err(usage(&prog)),
            "--tls-ca" | "-t" => parsed.tls_ca = it.next(),
            "--profile" | "-P" => parsed.profile = it.next(),
            "--origin" => parsed.origin = it.next(),
            "--log-file" => parsed.log_file = it.next(),
            "--save" => parsed.save = true,
            "--headless" => parsed.headless = true,
            "--dry-run" => parsed.dry_run = true,
            _ if arg.starts_with("--tls-ca=") => parsed.tls_ca = inline_value(&arg),
            _ if arg.starts_with("--profile=") => parsed.profile = inline_value(&arg),
            _ if arg.starts_with("--origin=") => parsed.origin = inline_value(&arg),
            _ if arg.starts_with("--log-file=") => parsed.log_file = inline_value(&arg),
            _ if arg.starts_with('-') => {
                return Err(format!("Unknown flag {arg}. {}", usage(&prog)));
            }
            _ => {
                if parsed.url.is_some() {
                    return Err(format!("Unexpected argument. {}", usage(&prog)));
                }
                parsed.url = Some(arg);
            }
        }
    }
    Ok(parsed)
}

/// Logs go to `--log-file` when given, to stderr in headless mode, and nowhere
/// otherwise so they cannot tear the terminal UI.
fn init_tracing(headless: bool, log_file: Option<&str>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let installed = match (log_file, headless) {
        (Some(path), _) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {path}"))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).try_init()
        }
        (None, true) => builder.with_writer(std::io::stderr).try_init(),
        (None, false) => return Ok(()),
    };
    installed.map_err(|e| anyhow!("installing log subscriber: {e}"))
}

fn persist_profile(pf: &mut ProfilesFile, name: &str, entry: ProfileEntry, force: bool) {
    match save_decision(pf, name, &entry, force) {
        SaveDecision::Create | SaveDecision::Overwrite => {
            pf.profiles.insert(name.to_string(), entry);
            if let Err(e) = save_profiles(pf) {
                warn!(profile = name, error = %e, "could not save profiles");
            }
        }
        SaveDecision::KeepExisting => {
            eprintln!(
                "Profile '{name}' already exists with different settings; pass --save to overwrite."
            );
        }
        SaveDecision::Unchanged => {}
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let parsed = match parse_args(env::args()) {
        Ok(v) => v,
        Err(msg) => {
            eprintln!("{msg}");
            return Ok(());
        }
    };
    init_tracing(parsed.headless, parsed.log_file.as_deref())?;

    let mut profiles = load_profiles();
    let req = ProfileRequest {
        profile_name: parsed.profile.clone(),
        url: parsed.url.clone(),
        tls_ca: parsed.tls_ca.clone(),
    };
    let (explicit, tls_ca) = match req.resolve(&profiles) {
        ResolveProfile::Direct(u, t) | ResolveProfile::Loaded(u, t) => (Some(u), t),
        ResolveProfile::Missing(name) => {
            bail!("Profile '{name}' does not exist yet; pass a URL to create it.")
        }
        ResolveProfile::None => (None, parsed.tls_ca.clone()),
    };

    let url = resolve_endpoint_from_env(explicit.as_deref(), parsed.origin.as_deref())
        .context("resolving coordinator endpoint")?;

    // A profile named together with a URL is created (or updated with --save).
    if let (Some(name), Some(_)) = (parsed.profile.as_deref(), parsed.url.as_deref()) {
        let entry = ProfileEntry {
            url: url.to_string(),
            tls_ca: tls_ca.clone(),
        };
        persist_profile(&mut profiles, name, entry, parsed.save);
    }

    if parsed.dry_run {
        println!("{url}");
        return Ok(());
    }

    let connection = Connection::spawn(ConnectOptions::new(url).with_tls_ca(tls_ca));
    let res = if parsed.headless {
        run_headless(connection.client()).await
    } else {
        App::new(connection.client()).run().await
    };
    connection.shutdown().await;
    res
}

/// No terminal UI: log connection changes, fleet summaries and each new notification once.
async fn run_headless(mut client: FleetClient) -> anyhow::Result<()> {
    let mut presented = PresentedIds::new();
    let mut last_conn = client.connection_state();
    let mut last_summary = String::new();
    loop {
        tokio::select! {
            alive = client.changed() => if !alive { break },
            _ = tokio::signal::ctrl_c() => break,
        }

        let conn = client.connection_state();
        if conn != last_conn {
            info!(state = conn.label(), "connection");
            last_conn = conn;
        }

        let (hosts, fresh) = {
            let state = client.state();
            (
                state.snapshot.hosts(),
                presented.take_unpresented(&state.notifications),
            )
        };
        for n in fresh {
            info!(id = n.id, kind = %n.kind, details = ?n.details, "{}", n.title);
        }

        let summary = hosts
            .iter()
            .map(|h| {
                format!(
                    "{}{}: {} workers, {} cores, {} found",
                    if h.is_coordinator { "*" } else { "" },
                    h.hostname,
                    h.workers.len(),
                    h.total_cores,
                    h.total_found
                )
            })
            .collect::<Vec<_>>()
            .join("; ");
        if summary != last_summary {
            info!(hosts = hosts.len(), "{summary}");
            last_summary = summary;
        }
    }
    Ok(())
}
