//! `talentscout status` — show configuration and credential status.

use anyhow::Result;
use colored::Colorize;

use talentscout_core::config::{get_config_path, load_config, Config, CREDENTIAL_ENV_VAR};
use talentscout_core::utils::expand_home;

/// Run the status command.
pub fn run() -> Result<()> {
    let config_path = get_config_path();
    let config = load_config(None);

    println!();
    println!("{}", "🎯 TalentScout Status".cyan().bold());
    println!();

    // Config
    println!(
        "  {:<18} {} {}",
        "Config:".bold(),
        config_path.display(),
        if config_path.exists() {
            "✓".green().to_string()
        } else {
            "(not found, using defaults)".yellow().to_string()
        }
    );

    // Provider
    println!("  {:<18} {}", "API base:".bold(), config.provider.api_base);
    println!("  {:<18} {}", "Model:".bold(), config.provider.model);
    println!(
        "  {:<18} {} | {}",
        "Parameters:".bold(),
        format!("temp: {}", config.provider.temperature).dimmed(),
        format!("timeout: {}s", config.provider.timeout_secs).dimmed(),
    );
    println!("  {:<18} {}", "Credential:".bold(), credential_status(&config));

    // Prompt template
    println!("  {:<18} {}", "Prompt:".bold(), template_status(&config));

    // Gateway
    println!();
    println!(
        "  {:<18} ws://{}/ws/<client_id>",
        "Gateway:".bold(),
        config.gateway.bind_addr()
    );
    println!();

    Ok(())
}

fn credential_status(config: &Config) -> String {
    if config.provider.is_configured() {
        format!("{} (key set)", "✓".green())
    } else {
        format!(
            "{} set {} or provider.apiKey",
            "✗ missing:".red(),
            CREDENTIAL_ENV_VAR
        )
    }
}

fn template_status(config: &Config) -> String {
    match &config.agent.prompt_template {
        None => "built-in".dimmed().to_string(),
        Some(path) => {
            let resolved = expand_home(path);
            if resolved.exists() {
                format!("{} {}", resolved.display(), "✓".green())
            } else {
                format!("{} {}", resolved.display(), "(not found)".red())
            }
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
