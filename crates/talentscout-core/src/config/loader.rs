//! Config loader — reads `~/.talentscout/config.json` and merges env vars.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.talentscout/config.json`
//! 3. `GEMINI_API_KEY` for the provider credential (may come from a `.env`
//!    file, see [`super::dotenv`])
//! 4. Environment variables `TALENTSCOUT_<SECTION>__<FIELD>` (override everything above)

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::schema::{Config, CREDENTIAL_ENV_VAR};

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load configuration from the default path + env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    load_config_from_path(&config_path)
}

/// Load config from a specific file path.
fn load_config_from_path(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return apply_env_overrides(Config::default());
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return apply_env_overrides(Config::default());
        }
    };

    let config: Config = match serde_json::from_str(&content) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to parse config JSON: {}", e);
            return apply_env_overrides(Config::default());
        }
    };

    apply_env_overrides(config)
}

/// Save configuration to disk (pretty-printed JSON with camelCase keys).
pub fn save_config(config: &Config, path: Option<&Path>) -> std::io::Result<()> {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config).map_err(std::io::Error::other)?;

    std::fs::write(&config_path, json)?;
    debug!("Config saved to {}", config_path.display());
    Ok(())
}

/// Apply environment variable overrides on top of a loaded config.
///
/// Supported overrides:
/// - `GEMINI_API_KEY` → `provider.api_key`
/// - `TALENTSCOUT_PROVIDER__API_KEY` → `provider.api_key`
/// - `TALENTSCOUT_PROVIDER__API_BASE` → `provider.api_base`
/// - `TALENTSCOUT_PROVIDER__MODEL` → `provider.model`
/// - `TALENTSCOUT_PROVIDER__TEMPERATURE` → `provider.temperature`
/// - `TALENTSCOUT_PROVIDER__TIMEOUT_SECS` → `provider.timeout_secs`
/// - `TALENTSCOUT_GATEWAY__HOST` → `gateway.host`
/// - `TALENTSCOUT_GATEWAY__PORT` → `gateway.port`
/// - `TALENTSCOUT_AGENT__PROMPT_TEMPLATE` → `agent.prompt_template`
fn apply_env_overrides(mut config: Config) -> Config {
    if let Some(val) = non_empty_env(CREDENTIAL_ENV_VAR) {
        config.provider.api_key = val;
    }

    // Provider
    if let Some(val) = non_empty_env("TALENTSCOUT_PROVIDER__API_KEY") {
        config.provider.api_key = val;
    }
    if let Some(val) = non_empty_env("TALENTSCOUT_PROVIDER__API_BASE") {
        config.provider.api_base = val;
    }
    if let Some(val) = non_empty_env("TALENTSCOUT_PROVIDER__MODEL") {
        config.provider.model = val;
    }
    if let Some(val) = non_empty_env("TALENTSCOUT_PROVIDER__TEMPERATURE") {
        match val.parse::<f64>() {
            Ok(t) => config.provider.temperature = t,
            Err(_) => warn!(value = %val, "ignoring invalid TALENTSCOUT_PROVIDER__TEMPERATURE"),
        }
    }
    if let Some(val) = non_empty_env("TALENTSCOUT_PROVIDER__TIMEOUT_SECS") {
        match val.parse::<u64>() {
            Ok(n) => config.provider.timeout_secs = n,
            Err(_) => warn!(value = %val, "ignoring invalid TALENTSCOUT_PROVIDER__TIMEOUT_SECS"),
        }
    }

    // Gateway
    if let Some(val) = non_empty_env("TALENTSCOUT_GATEWAY__HOST") {
        config.gateway.host = val;
    }
    if let Some(val) = non_empty_env("TALENTSCOUT_GATEWAY__PORT") {
        match val.parse::<u16>() {
            Ok(p) => config.gateway.port = p,
            Err(_) => warn!(value = %val, "ignoring invalid TALENTSCOUT_GATEWAY__PORT"),
        }
    }

    // Agent
    if let Some(val) = non_empty_env("TALENTSCOUT_AGENT__PROMPT_TEMPLATE") {
        config.agent.prompt_template = Some(val);
    }

    config
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp_json(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_missing_file() {
        let config = load_config_from_path(Path::new("/nonexistent/path/config.json"));
        assert_eq!(config.provider.timeout_secs, 120);
    }

    #[test]
    fn test_load_valid_json() {
        let file = write_temp_json(
            r#"{
            "provider": {
                "apiBase": "http://localhost:9999/v1",
                "temperature": 0.2
            },
            "agent": { "promptTemplate": "~/intake.txt" }
        }"#,
        );

        let config = load_config_from_path(file.path());
        assert_eq!(config.provider.api_base, "http://localhost:9999/v1");
        assert_eq!(config.provider.temperature, 0.2);
        assert_eq!(config.agent.prompt_template.as_deref(), Some("~/intake.txt"));
        assert_eq!(config.gateway.host, "0.0.0.0");
    }

    #[test]
    fn test_load_invalid_json_returns_defaults() {
        let file = write_temp_json("not valid json {{{");
        let config = load_config_from_path(file.path());
        assert_eq!(config.provider.timeout_secs, 120);
    }

    #[test]
    fn test_load_empty_json() {
        let file = write_temp_json("{}");
        let config = load_config_from_path(file.path());
        assert_eq!(config.gateway.host, "0.0.0.0");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.provider.timeout_secs = 45;
        config.agent.prompt_template = Some("/srv/prompt.txt".to_string());

        save_config(&config, Some(&path)).unwrap();

        let reloaded = load_config_from_path(&path);
        assert_eq!(reloaded.provider.timeout_secs, 45);
        assert_eq!(reloaded.agent.prompt_template.as_deref(), Some("/srv/prompt.txt"));
    }

    #[test]
    fn test_saved_json_uses_camel_case() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        save_config(&Config::default(), Some(&path)).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let raw: serde_json::Value = serde_json::from_str(&content).unwrap();

        assert!(raw["provider"].get("timeoutSecs").is_some());
        assert!(raw["provider"].get("timeout_secs").is_none());
    }

    #[test]
    fn test_env_override_gateway_port() {
        std::env::set_var("TALENTSCOUT_GATEWAY__PORT", "9999");
        let config = apply_env_overrides(Config::default());
        assert_eq!(config.gateway.port, 9999);
        std::env::remove_var("TALENTSCOUT_GATEWAY__PORT");
    }

    #[test]
    fn test_env_override_model() {
        std::env::set_var("TALENTSCOUT_PROVIDER__MODEL", "gemini-2.5-pro");
        let config = apply_env_overrides(Config::default());
        assert_eq!(config.provider.model, "gemini-2.5-pro");
        std::env::remove_var("TALENTSCOUT_PROVIDER__MODEL");
    }

    #[test]
    fn test_env_override_invalid_timeout_ignored() {
        std::env::set_var("TALENTSCOUT_PROVIDER__TIMEOUT_SECS", "soon");
        let config = apply_env_overrides(Config::default());
        assert_eq!(config.provider.timeout_secs, 120);
        std::env::remove_var("TALENTSCOUT_PROVIDER__TIMEOUT_SECS");
    }

    #[test]
    fn test_specific_api_key_wins_over_credential_var() {
        std::env::set_var("TALENTSCOUT_PROVIDER__API_KEY", "specific-key");
        let config = apply_env_overrides(Config::default());
        assert_eq!(config.provider.api_key, "specific-key");
        std::env::remove_var("TALENTSCOUT_PROVIDER__API_KEY");
    }
}
