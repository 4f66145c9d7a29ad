//! Transport trait — where outbound text goes.
//!
//! The connection manager only ever pushes text frames to a client; keeping
//! that behind a trait lets the lifecycle be driven by a real socket in the
//! server and by an in-memory recorder in tests.

use async_trait::async_trait;

/// The sending half of one client connection.
#[async_trait]
pub trait ChatTransport: Send {
    /// Deliver one text frame to the client.
    async fn send_text(&mut self, text: &str) -> anyhow::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Recorder {
        sent: Vec<String>,
    }

    #[async_trait]
    impl ChatTransport for Recorder {
        async fn send_text(&mut self, text: &str) -> anyhow::Result<()> {
            self.sent.push(text.to_string());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_transport_is_object_safe() {
        let mut recorder = Recorder { sent: Vec::new() };
        {
            let transport: &mut dyn ChatTransport = &mut recorder;
            transport.send_text("one").await.unwrap();
            transport.send_text("two").await.unwrap();
        }
        assert_eq!(recorder.sent, vec!["one", "two"]);
    }
}
