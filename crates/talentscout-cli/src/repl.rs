//! Terminal chat client for a running gateway.
//!
//! Uses `rustyline` for readline-style editing with persistent history.
//! Line editing blocks, so it runs on its own thread and hands finished
//! lines to the async side over a channel. The prompt only comes back
//! after the gateway has answered, so output and input never interleave.

use std::sync::mpsc as std_mpsc;

use anyhow::{Context, Result};
use futures_util::{SinkExt, StreamExt};
use rustyline::config::Configurer;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{DefaultEditor, Editor};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::debug;

use talentscout_channels::{EXIT_KEYWORDS, FAREWELL_MESSAGE};

use crate::helpers;

/// What the input thread produced.
enum Input {
    Line(String),
    /// Ctrl-C, Ctrl-D, or a terminal error.
    Quit,
}

/// Connect to `url` and run the chat until the gateway closes the connection.
pub async fn run(url: &str) -> Result<()> {
    let (ws, _) = connect_async(url)
        .await
        .with_context(|| format!("failed to connect to {url}"))?;
    let (mut sink, mut frames) = ws.split();
    helpers::print_banner(url);

    let (ready_tx, ready_rx) = std_mpsc::channel::<()>();
    let (line_tx, mut line_rx) = mpsc::channel::<Input>(1);
    std::thread::spawn(move || read_input(ready_rx, line_tx));

    let mut input_open = true;

    loop {
        tokio::select! {
            frame = frames.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    helpers::clear_thinking();
                    helpers::print_response(text.as_str());
                    if text.as_str() != FAREWELL_MESSAGE && input_open {
                        // Prompt for the next answer.
                        let _ = ready_tx.send(());
                    }
                }
                Some(Ok(Message::Close(_))) | None => {
                    helpers::clear_thinking();
                    debug!("gateway closed the connection");
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    helpers::clear_thinking();
                    return Err(e).context("connection to gateway failed");
                }
            },
            input = line_rx.recv(), if input_open => {
                let text = match input {
                    Some(Input::Line(line)) => line,
                    Some(Input::Quit) | None => {
                        input_open = false;
                        EXIT_KEYWORDS[0].to_string()
                    }
                };
                sink.send(Message::Text(text.into()))
                    .await
                    .context("failed to send message")?;
                helpers::print_thinking();
            }
        }
    }

    println!("Conversation ended.");
    Ok(())
}

/// Input thread: wait for the go-ahead, read one non-blank line, send it.
fn read_input(ready: std_mpsc::Receiver<()>, lines: mpsc::Sender<Input>) {
    let mut editor = match create_editor() {
        Ok(editor) => editor,
        Err(e) => {
            eprintln!("Input error: {e}");
            let _ = lines.blocking_send(Input::Quit);
            return;
        }
    };

    while ready.recv().is_ok() {
        let input = loop {
            match editor.readline("You: ") {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => {
                    let _ = editor.add_history_entry(line.as_str());
                    save_history(&mut editor);
                    break Input::Line(line);
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break Input::Quit,
                Err(e) => {
                    eprintln!("Input error: {e}");
                    break Input::Quit;
                }
            }
        };

        let quit = matches!(input, Input::Quit);
        if lines.blocking_send(input).is_err() || quit {
            break;
        }
    }
}

/// Create a rustyline editor with history.
fn create_editor() -> Result<Editor<(), DefaultHistory>> {
    let mut editor = DefaultEditor::new()?;
    editor.set_max_history_size(1000)?;

    let history_path = history_path();
    if history_path.exists() {
        let _ = editor.load_history(&history_path);
        debug!("loaded chat history from {}", history_path.display());
    }

    Ok(editor)
}

/// Save history to disk.
fn save_history(editor: &mut Editor<(), DefaultHistory>) {
    let path = history_path();
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    if let Err(e) = editor.save_history(&path) {
        debug!("failed to save history: {e}");
    }
}

/// Path to the history file.
fn history_path() -> std::path::PathBuf {
    talentscout_core::utils::get_data_path()
        .join("history")
        .join("chat_history")
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_path_under_data_dir() {
        let path = history_path();
        assert!(path.to_string_lossy().contains(".talentscout"));
        assert!(path.ends_with("history/chat_history"));
    }

    #[test]
    fn quit_sends_a_keyword_the_gateway_accepts() {
        assert!(talentscout_channels::is_exit_keyword(EXIT_KEYWORDS[0]));
    }
}
