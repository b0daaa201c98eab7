//! skilld - space fact skill host
//!
//! Main entry point for the daemon binary.

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use std::net::IpAddr;
use std::path::PathBuf;

use clap::Parser;
use skilld::{load_skill_config, Daemon, DaemonConfig};
use tracing::error;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "skilld", about = "Space fact voice skill host", version)]
struct Cli {
    /// Port to listen on
    #[arg(short, long, default_value = "7710")]
    port: u16,

    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    bind: IpAddr,

    /// Config file (default: ~/.config/skilld/config if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Expected application id; overrides config and environment
    #[arg(long)]
    application_id: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    // Initialize tracing.
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let skill = match load_skill_config(cli.config.as_deref(), cli.application_id.as_deref()) {
        Ok(skill) => skill,
        Err(e) => {
            error!("failed to load config: {}", e);
            std::process::exit(1);
        }
    };

    let config = DaemonConfig {
        bind: cli.bind,
        port: cli.port,
        skill,
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("failed to create tokio runtime");

    runtime.block_on(async {
        let daemon = Daemon::new(config);

        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            let mut sigterm =
                signal(SignalKind::terminate()).expect("failed to register SIGTERM handler");
            let mut sigint =
                signal(SignalKind::interrupt()).expect("failed to register SIGINT handler");

            tokio::select! {
                result = daemon.run() => {
                    if let Err(e) = result {
                        error!("daemon error: {}", e);
                        std::process::exit(1);
                    }
                }
                _ = sigint.recv() => {
                    tracing::info!("received SIGINT, shutting down");
                }
                _ = sigterm.recv() => {
                    tracing::info!("received SIGTERM, shutting down");
                }
            }
        }

        #[cfg(not(unix))]
        {
            tokio::select! {
                result = daemon.run() => {
                    if let Err(e) = result {
                        error!("daemon error: {}", e);
                        std::process::exit(1);
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("received SIGINT, shutting down");
                }
            }
        }
    });
}
