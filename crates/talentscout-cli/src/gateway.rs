//! `talentscout serve` — wire everything together and run the gateway.
//!
//! 1. Load config, apply command-line overrides
//! 2. Refuse to start without a provider credential
//! 3. Build provider → instruction builder → turn processor → connection manager
//! 4. Bind and serve until Ctrl+C

use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;
use tokio::net::TcpListener;
use tracing::{error, info};

use talentscout_agent::{InstructionBuilder, TurnProcessor};
use talentscout_channels::{serve, ConnectionManager};
use talentscout_core::config::{load_config, Config};
use talentscout_core::utils::expand_home;
use talentscout_core::SessionStore;
use talentscout_providers::{CompletionProvider, HttpProvider};

/// Run the gateway.
pub async fn run(host: Option<String>, port: Option<u16>) -> Result<()> {
    let config = prepare_config(load_config(None), host, port)?;
    let manager = build_manager(&config)?;

    let addr = config.gateway.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    println!();
    println!(
        "{}  v{}",
        "🎯 TalentScout gateway".cyan().bold(),
        env!("CARGO_PKG_VERSION").dimmed()
    );
    println!("  {:<10} ws://{}/ws/<client_id>", "Chat:".bold(), addr);
    println!("  {:<10} {}", "Model:".bold(), config.provider.model);
    println!("{}", "  Press Ctrl+C to stop.".dimmed());
    println!();

    serve(listener, manager).await
}

/// Apply command-line overrides and refuse a config without a credential.
fn prepare_config(mut config: Config, host: Option<String>, port: Option<u16>) -> Result<Config> {
    if let Some(host) = host {
        config.gateway.host = host;
    }
    if let Some(port) = port {
        config.gateway.port = port;
    }

    if let Err(e) = config.require_api_key() {
        error!(error = %e, "refusing to start gateway");
        return Err(e.into());
    }
    Ok(config)
}

/// Build the connection manager and everything behind it.
fn build_manager(config: &Config) -> Result<Arc<ConnectionManager>> {
    let provider = HttpProvider::new(&config.provider).context("failed to create provider")?;
    info!(
        provider = provider.display_name(),
        model = provider.model(),
        api_base = %config.provider.api_base,
        "provider ready"
    );

    let instructions = match &config.agent.prompt_template {
        Some(path) => {
            let path = expand_home(path);
            InstructionBuilder::from_path(&path)
                .with_context(|| format!("failed to load prompt template {}", path.display()))?
        }
        None => InstructionBuilder::new().context("built-in prompt template is invalid")?,
    };

    let processor = TurnProcessor::new(
        Arc::new(provider),
        instructions,
        config.provider.temperature,
    );

    Ok(Arc::new(ConnectionManager::new(
        SessionStore::new(),
        Arc::new(processor),
    )))
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
