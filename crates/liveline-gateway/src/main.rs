//! Liveline — live-agent support gateway

use clap::{Parser, Subcommand};
use liveline_core::{default_roster, load_roster, BindMode, DeskConfig, GatewayConfig};
use liveline_gateway::start_gateway;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "liveline", about = "Liveline — live support agent gateway")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the gateway server
    Serve {
        #[arg(short, long, default_value = "5000")]
        port: u16,
        #[arg(short, long, default_value = "lan")]
        bind: String,
        /// Roster file (JSON array of agent specs); defaults to the stock roster
        #[arg(short, long)]
        roster: Option<PathBuf>,
        /// Stale-session maximum age, in seconds
        #[arg(long)]
        max_session_age: Option<u64>,
        /// Idle timeout, in seconds
        #[arg(long)]
        idle_timeout: Option<u64>,
    },
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve {
            port,
            bind,
            roster,
            max_session_age,
            idle_timeout,
        }) => {
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| "liveline=info,tower_http=info".into()),
                )
                .with(tracing_subscriber::fmt::layer())
                .init();

            let bind_mode = match bind.as_str() {
                "loopback" | "localhost" | "127.0.0.1" => BindMode::Loopback,
                _ => BindMode::Lan,
            };

            let roster = match roster {
                Some(path) => load_roster(&path)?,
                None => default_roster(),
            };

            let mut desk_config = DeskConfig::default();
            if let Some(age) = max_session_age {
                desk_config.max_session_age_secs = age;
            }
            if let Some(idle) = idle_timeout {
                desk_config.idle_timeout_secs = idle;
            }

            let gateway = GatewayConfig {
                port,
                bind: bind_mode,
            };
            start_gateway(gateway, desk_config, roster).await?;
        }

        Some(Commands::Version) | None => {
            println!("liveline v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
