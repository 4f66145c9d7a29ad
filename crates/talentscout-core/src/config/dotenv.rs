//! `.env` support — `KEY=VALUE` lines merged into the process environment.
//!
//! Variables that are already set are never overwritten, so the real
//! environment always wins over the file.

use std::path::{Path, PathBuf};

/// File name looked up in the working directory and the data directory.
pub const DOTENV_FILE: &str = ".env";

/// Parse `.env` text into key/value pairs, in file order.
///
/// Blank lines and `#` comments are skipped, an optional `export ` prefix is
/// accepted, and one pair of matching surrounding quotes is stripped.
pub fn parse_dotenv(contents: &str) -> Vec<(String, String)> {
    contents
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                return None;
            }
            let line = line.strip_prefix("export ").unwrap_or(line);
            let (key, value) = line.split_once('=')?;
            let key = key.trim();
            if key.is_empty() {
                return None;
            }
            Some((key.to_string(), unquote(value.trim()).to_string()))
        })
        .collect()
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Load one `.env` file. Returns the keys that were actually set.
pub fn load_dotenv_file(path: &Path) -> std::io::Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)?;
    let mut applied = Vec::new();
    for (key, value) in parse_dotenv(&contents) {
        if std::env::var_os(&key).is_none() {
            std::env::set_var(&key, value);
            applied.push(key);
        }
    }
    Ok(applied)
}

/// Load the first `.env` found: working directory, then `~/.talentscout/`.
///
/// Returns the path that was loaded, if any. Runs before logging is set up,
/// so reporting is left to the caller.
pub fn load_dotenv() -> Option<PathBuf> {
    let candidates = [
        PathBuf::from(DOTENV_FILE),
        crate::utils::get_data_path().join(DOTENV_FILE),
    ];
    candidates
        .into_iter()
        .find(|path| load_dotenv_file(path).is_ok())
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
