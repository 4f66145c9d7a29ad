//! Shared CLI helpers — chat URL building, response printing, banner.

use colored::Colorize;

use talentscout_core::config::GatewayConfig;

/// WebSocket base URL for a gateway on this machine.
///
/// A wildcard bind address is not something a client can dial, so it is
/// swapped for loopback.
pub fn local_ws_base(gateway: &GatewayConfig) -> String {
    let host = match gateway.host.as_str() {
        "0.0.0.0" | "::" | "" => "127.0.0.1",
        other => other,
    };
    format!("ws://{}:{}/ws", host, gateway.port)
}

/// Full connection URL: `<base>/<client_id>`.
pub fn chat_url(base: &str, client_id: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), client_id)
}

/// Print an assistant message to stdout.
pub fn print_response(response: &str) {
    println!();
    println!("{}", "🎯 TalentScout".cyan().bold());
    if response.is_empty() {
        println!("{}", "(no response)".dimmed());
    } else {
        println!("{response}");
    }
    println!();
}

/// Print the banner shown when a chat starts.
pub fn print_banner(url: &str) {
    let version = env!("CARGO_PKG_VERSION");
    println!();
    println!(
        "{}  v{}",
        "🎯 TalentScout".cyan().bold(),
        version.dimmed()
    );
    println!("{}", format!("Connected to {url}").dimmed());
    println!(
        "{}",
        "Type your answers, or \"exit\" to end the conversation.".dimmed()
    );
}

/// Print a "thinking" placeholder while waiting for a reply.
pub fn print_thinking() {
    eprint!("{}", "⠿ thinking...".dimmed());
}

/// Clear the "thinking" placeholder.
pub fn clear_thinking() {
    eprint!("\r{}\r", " ".repeat(40));
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_base_replaces_wildcard_host() {
        let gateway = GatewayConfig::default();
        assert_eq!(local_ws_base(&gateway), "ws://127.0.0.1:8000/ws");
    }

    #[test]
    fn local_base_keeps_explicit_host() {
        let gateway = GatewayConfig {
            host: "10.0.0.5".into(),
            port: 9001,
        };
        assert_eq!(local_ws_base(&gateway), "ws://10.0.0.5:9001/ws");
    }

    #[test]
    fn chat_url_appends_client_id() {
        assert_eq!(
            chat_url("ws://127.0.0.1:8000/ws", "42"),
            "ws://127.0.0.1:8000/ws/42"
        );
        assert_eq!(
            chat_url("ws://127.0.0.1:8000/ws/", "cli"),
            "ws://127.0.0.1:8000/ws/cli"
        );
    }
}
