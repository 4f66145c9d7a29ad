//! Configuration system — schema, loading, `.env` files, and env var overrides.
//!
//! # Usage
//! ```no_run
//! use talentscout_core::config;
//!
//! let cfg = config::load_config(None);
//! println!("Model: {}", cfg.provider.model);
//! ```

pub mod dotenv;
pub mod loader;
pub mod schema;

pub use dotenv::{load_dotenv, DOTENV_FILE};
pub use loader::{get_config_path, load_config, save_config};
pub use schema::{AgentConfig, Config, GatewayConfig, ProviderConfig, CREDENTIAL_ENV_VAR};
