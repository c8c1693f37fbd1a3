//! Terminal dashboard for the Ecoband backend.
//!
//! Polls the latest band reading and the caller's metric history, redrawing
//! the view whenever a cycle succeeds. `--find-band` sounds the buzzer once
//! and exits.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use url::Url;

use ecoband::dashboard::{BackendClient, DashboardView, LiveRefresh, Poller};

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// `dashboard` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "dashboard",
    about = "Live terminal dashboard for an Ecoband backend",
    version
)]
struct CliArgs {
    /// Backend base URL.
    #[arg(
        long = "backend-url",
        value_name = "url",
        env = "ECOBAND_BACKEND_URL",
        default_value = "http://localhost:3000"
    )]
    backend_url: Url,
    /// Bearer token, as printed by `mint-token`.
    #[arg(long, value_name = "jwt", env = "ECOBAND_TOKEN", hide_env_values = true)]
    token: String,
    /// Save each new band reading as a metric.
    #[arg(long)]
    record: bool,
    /// Sound the band's buzzer and exit.
    #[arg(long = "find-band")]
    find_band: bool,
    /// Seconds between refresh cycles.
    #[arg(
        long = "interval-secs",
        value_name = "secs",
        default_value_t = 5,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    interval_secs: u64,
    /// Per-request timeout in seconds.
    #[arg(
        long = "timeout-secs",
        value_name = "secs",
        default_value_t = 10,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args = CliArgs::parse();
    let client = BackendClient::new(
        args.backend_url,
        args.token,
        Duration::from_secs(args.timeout_secs),
    )
    .wrap_err("failed to build HTTP client")?;

    if args.find_band {
        let activation = client.find_band().await.wrap_err("buzzer request failed")?;
        println!(
            "Buzzer {} for {} seconds",
            activation.buzzer, activation.resets_after_seconds
        );
        return Ok(());
    }

    run(client, args.record, Duration::from_secs(args.interval_secs)).await
}

async fn run(client: BackendClient, record: bool, interval: Duration) -> Result<()> {
    let live = Arc::new(LiveRefresh::new(Arc::new(client), record));
    let mut views = live.subscribe();
    let mut poller = Poller::with_interval(live, interval);
    poller.start();
    info!(interval_secs = interval.as_secs(), record, "dashboard started");
    draw(&DashboardView::default())?;

    loop {
        tokio::select! {
            changed = views.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = views.borrow_and_update().clone();
                draw(&view)?;
            }
            signal = tokio::signal::ctrl_c() => {
                signal.wrap_err("failed to listen for ctrl-c")?;
                break;
            }
        }
    }

    poller.stop_and_wait().await;
    info!("dashboard stopped");
    Ok(())
}

fn draw(view: &DashboardView) -> Result<()> {
    let mut stdout = io::stdout().lock();
    write!(stdout, "{CLEAR_SCREEN}{view}").wrap_err("failed to draw dashboard")?;
    stdout.flush().wrap_err("failed to flush stdout")
}
