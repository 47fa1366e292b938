//! # axiom-xwayland - headless XWayland view replay
//!
//! Runs an event script through the XWayland view core against the
//! in-memory surface layer and reports what the core did.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};

use axiom_xwayland::headless::OutboundCall;
use axiom_xwayland::replay::{self, Script};
use axiom_xwayland::{HeadlessSurfaceLayer, Server, XwmConfig};

#[derive(Parser)]
#[command(name = "axiom-xwayland")]
#[command(about = "Replay XWayland surface events through the Axiom view core")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "~/.config/axiom/xwayland.toml")]
    config: String,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Record map/unmap transitions for every view
    #[arg(long)]
    record_transitions: bool,

    /// Event script to replay
    script: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.debug {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    info!("🚀 Starting Axiom XWayland view replay");
    info!("📄 Version: {}", axiom_xwayland::VERSION);

    let mut config = match XwmConfig::load(&cli.config) {
        Ok(config) => {
            info!("✅ Configuration loaded from: {}", cli.config);
            config
        }
        Err(e) => {
            error!("❌ Failed to load configuration: {:#}", e);
            info!("📝 Using default configuration");
            XwmConfig::default()
        }
    };
    if cli.record_transitions {
        config.debug.record_transitions = true;
    }

    let contents = tokio::fs::read_to_string(&cli.script)
        .await
        .with_context(|| format!("Failed to read event script: {}", cli.script.display()))?;
    let script = Script::from_toml(&contents)?;

    let mut server = Server::new(config, HeadlessSurfaceLayer::new());
    let summary = replay::replay(&mut server, &script)
        .with_context(|| format!("Replay of {} aborted", cli.script.display()))?;

    report(&server, summary.events);
    Ok(())
}

fn report(server: &Server<HeadlessSurfaceLayer>, events: usize) {
    let stats = server.stats();
    info!(
        "📊 {} events: {} views created, {} destroyed, {} live, {} unmanaged, {} configure acks, {} commits, {} dropped",
        events,
        stats.views_created,
        stats.views_destroyed,
        stats.live_views,
        stats.unmanaged_handoffs,
        stats.configure_acks,
        stats.commits,
        stats.dropped_events
    );

    for view in server.views() {
        let geometry = view.geometry();
        info!(
            "🪟 {} on {}: {:?}, {}x{} at ({}, {}), server-side decorations: {:?}",
            view.id(),
            view.surface(),
            view.state(),
            geometry.width,
            geometry.height,
            geometry.x,
            geometry.y,
            view.server_side_decorations()
        );
        if let Some(history) = view.history() {
            info!("   transitions: {:?}", history);
        }
    }

    for teardown in server.teardowns().unwrap_or_default() {
        info!(
            "🗑️ {}: released {} subscriptions{}",
            teardown.view,
            teardown.released.total(),
            if teardown.implicit_unmap {
                " (implicit unmap)"
            } else {
                ""
            }
        );
    }

    for call in server.surfaces().calls() {
        match call {
            OutboundCall::Ping(surface) => info!("➡️ ping {}", surface),
            OutboundCall::Configure(surface, g) => info!(
                "➡️ configure {} {}x{} at ({}, {})",
                surface, g.width, g.height, g.x, g.y
            ),
            OutboundCall::Close(surface) => info!("➡️ close {}", surface),
        }
    }
}
