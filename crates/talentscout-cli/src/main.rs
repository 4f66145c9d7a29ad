//! TalentScout CLI — entry point.
//!
//! # Commands
//!
//! - `talentscout serve [--host H] [--port P] [--logs]` — run the WebSocket gateway
//! - `talentscout chat [--url URL] [--client-id ID]` — talk to a running gateway
//! - `talentscout status` — show configuration and credential status

mod gateway;
mod helpers;
mod repl;
mod status;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;

use talentscout_core::config::{load_config, load_dotenv};

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// TalentScout — hiring-assistant chat gateway
#[derive(Parser)]
#[command(name = "talentscout", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the WebSocket gateway
    Serve {
        /// Bind host (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Bind port (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Chat with a running gateway from the terminal
    Chat {
        /// WebSocket base URL, without the client id (e.g. ws://127.0.0.1:8000/ws)
        #[arg(short, long)]
        url: Option<String>,

        /// Client id placed in the connection path
        #[arg(short, long, default_value = "cli")]
        client_id: String,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Show configuration and credential status
    Status,
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Before logging, so RUST_LOG may live in the file too.
    let dotenv = load_dotenv();

    match cli.command {
        Commands::Serve { host, port, logs } => {
            init_logging(logs, "info");
            log_dotenv(dotenv.as_deref());
            gateway::run(host, port).await
        }
        Commands::Chat {
            url,
            client_id,
            logs,
        } => {
            init_logging(logs, "warn");
            log_dotenv(dotenv.as_deref());
            let base = url.unwrap_or_else(|| helpers::local_ws_base(&load_config(None).gateway));
            repl::run(&helpers::chat_url(&base, &client_id)).await
        }
        Commands::Status => status::run(),
    }
}

fn log_dotenv(path: Option<&std::path::Path>) {
    if let Some(path) = path {
        debug!(path = %path.display(), "loaded environment file");
    }
}

/// Initialize tracing/logging.
///
/// `--logs` turns on debug output for the TalentScout crates; otherwise
/// `RUST_LOG` applies, falling back to `default_level`.
fn init_logging(verbose: bool, default_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("talentscout=debug,tower_http=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
