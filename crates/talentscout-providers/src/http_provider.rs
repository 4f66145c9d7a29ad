//! Streaming HTTP provider for OpenAI-compatible chat completion APIs.
//!
//! Sends `POST {api_base}/chat/completions` with `"stream": true` and decodes
//! the Server-Sent Events response into text fragments. The default base URL
//! is Gemini's OpenAI-compatible endpoint, but any compatible server works.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::{self, BoxStream, StreamExt};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use talentscout_core::config::ProviderConfig;
use talentscout_core::types::Turn;

use crate::error::ProviderError;
use crate::sse::SseDecoder;
use crate::traits::{CompletionProvider, CompletionRequest, TextStream};

/// Data payload that terminates an OpenAI-style event stream.
const DONE_MARKER: &str = "[DONE]";

// ─────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f64,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> From<&'a Turn> for WireMessage<'a> {
    fn from(turn: &'a Turn) -> Self {
        WireMessage {
            role: turn.role.as_str(),
            content: &turn.text,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: ChunkDelta,
}

#[derive(Debug, Default, Deserialize)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

// ─────────────────────────────────────────────
// HttpProvider
// ─────────────────────────────────────────────

/// Streaming client for any OpenAI-compatible HTTP API.
pub struct HttpProvider {
    /// HTTP client (shared, connection-pooled).
    client: reqwest::Client,
    /// API base URL (e.g. `"https://api.openai.com/v1"`).
    api_base: String,
    /// API key for Bearer authentication.
    api_key: String,
    /// Model sent with every request.
    model: String,
    /// Extra headers to send with each request.
    extra_headers: HeaderMap,
}

impl std::fmt::Debug for HttpProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpProvider")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .finish()
    }
}

impl HttpProvider {
    /// Build a provider from the configured credential, base URL, model and timeout.
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let mut extra_headers = HeaderMap::new();
        if let Some(ref headers) = config.extra_headers {
            for (key, value) in headers {
                if let (Ok(name), Ok(val)) = (
                    HeaderName::from_bytes(key.as_bytes()),
                    HeaderValue::from_str(value),
                ) {
                    extra_headers.insert(name, val);
                } else {
                    warn!("Invalid header: {}={}", key, value);
                }
            }
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProviderError::Build(e.to_string()))?;

        Ok(HttpProvider {
            client,
            api_base: config.api_base.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            extra_headers,
        })
    }

    /// Build the full chat completions URL.
    fn completions_url(&self) -> String {
        let base = self.api_base.trim_end_matches('/');
        format!("{}/chat/completions", base)
    }
}

#[async_trait]
impl CompletionProvider for HttpProvider {
    async fn stream_completion(
        &self,
        request: CompletionRequest,
    ) -> Result<TextStream, ProviderError> {
        let mut messages = Vec::with_capacity(request.turns.len() + 1);
        messages.push(WireMessage {
            role: "system",
            content: &request.instruction,
        });
        messages.extend(request.turns.iter().map(WireMessage::from));

        let body = ChatCompletionRequest {
            model: &self.model,
            messages,
            temperature: request.temperature,
            stream: true,
        };

        debug!(
            model = %self.model,
            turns = request.turns.len(),
            temperature = request.temperature,
            "Calling provider"
        );

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .headers(self.extra_headers.clone())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            error!(status = %status, body = %error_text, "Provider API error");
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: error_text,
            });
        }

        Ok(decode_event_stream(response.bytes_stream().boxed()))
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn display_name(&self) -> &str {
        "OpenAI-compatible"
    }
}

// ─────────────────────────────────────────────
// Stream decoding
// ─────────────────────────────────────────────

struct DecodeState {
    body: BoxStream<'static, reqwest::Result<Bytes>>,
    decoder: SseDecoder,
    pending: VecDeque<Result<String, ProviderError>>,
    finished: bool,
}

impl DecodeState {
    /// Queue the fragment (or failure) carried by one SSE data payload.
    /// Returns `false` once the stream should stop.
    fn push_event(&mut self, data: &str) -> bool {
        if data == DONE_MARKER {
            return false;
        }
        if data.trim().is_empty() {
            return true;
        }
        match serde_json::from_str::<ChatCompletionChunk>(data) {
            Ok(chunk) => {
                if let Some(err) = chunk.error {
                    self.pending.push_back(Err(ProviderError::Stream(err.to_string())));
                    return false;
                }
                for choice in chunk.choices {
                    if let Some(text) = choice.delta.content.filter(|t| !t.is_empty()) {
                        self.pending.push_back(Ok(text));
                    }
                }
                true
            }
            Err(e) => {
                self.pending
                    .push_back(Err(ProviderError::Malformed(format!("{e}: {data}"))));
                false
            }
        }
    }
}

/// Turn a raw SSE byte stream into text fragments.
fn decode_event_stream(body: BoxStream<'static, reqwest::Result<Bytes>>) -> TextStream {
    let state = DecodeState {
        body,
        decoder: SseDecoder::new(),
        pending: VecDeque::new(),
        finished: false,
    };

    Box::pin(stream::unfold(state, |mut st| async move {
        loop {
            if let Some(item) = st.pending.pop_front() {
                return Some((item, st));
            }
            if st.finished {
                return None;
            }
            match st.body.next().await {
                Some(Ok(chunk)) => {
                    for event in st.decoder.feed(&chunk) {
                        if !st.push_event(&event.data) {
                            st.finished = true;
                            break;
                        }
                    }
                }
                Some(Err(e)) => {
                    st.pending.push_back(Err(ProviderError::Request(e)));
                    st.finished = true;
                }
                None => {
                    if let Some(event) = st.decoder.finish() {
                        st.push_event(&event.data);
                    }
                    st.finished = true;
                }
            }
        }
    }))
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_config(api_key: &str, api_base: &str) -> ProviderConfig {
        ProviderConfig {
            api_key: api_key.to_string(),
            api_base: api_base.to_string(),
            ..ProviderConfig::default()
        }
    }

    fn make_request() -> CompletionRequest {
        CompletionRequest {
            instruction: "You are a hiring assistant.".to_string(),
            turns: vec![
                Turn::user("Hello"),
                Turn::assistant("Welcome!"),
                Turn::user("John Smith"),
            ],
            temperature: 0.7,
        }
    }

    fn sse_body(fragments: &[&str]) -> String {
        let mut body = String::new();
        for fragment in fragments {
            let chunk = serde_json::json!({
                "choices": [{ "index": 0, "delta": { "content": fragment } }]
            });
            body.push_str(&format!("data: {chunk}\n\n"));
        }
        body.push_str("data: [DONE]\n\n");
        body
    }

    fn sse_response(body: String) -> ResponseTemplate {
        ResponseTemplate::new(200)
            .insert_header("content-type", "text/event-stream")
            .set_body_string(body)
    }

    async fn collect(stream: TextStream) -> Vec<Result<String, ProviderError>> {
        stream.collect().await
    }

    // ── Unit tests ──

    #[test]
    fn test_completions_url_trailing_slash() {
        let provider = HttpProvider::new(&make_config("key", "https://api.openai.com/v1/")).unwrap();
        assert_eq!(
            provider.completions_url(),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_default_base_is_gemini_compat() {
        let provider = HttpProvider::new(&ProviderConfig::default()).unwrap();
        assert_eq!(
            provider.completions_url(),
            "https://generativelanguage.googleapis.com/v1beta/openai/chat/completions"
        );
        assert_eq!(provider.model(), "gemini-2.5-flash-lite");
    }

    #[test]
    fn test_extra_headers() {
        let mut config = make_config("key", "http://localhost");
        config.extra_headers = Some(
            [("X-App-Code".to_string(), "intake".to_string())]
                .into_iter()
                .collect(),
        );
        let provider = HttpProvider::new(&config).unwrap();
        assert!(provider.extra_headers.contains_key("x-app-code"));
    }

    // ── Integration tests with mock server ──

    #[tokio::test]
    async fn test_stream_fragments_in_order() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer test-key-123"))
            .respond_with(sse_response(sse_body(&["Thanks, ", "John! ", "What's your email?"])))
            .mount(&mock_server)
            .await;

        let provider = HttpProvider::new(&make_config("test-key-123", &mock_server.uri())).unwrap();
        let stream = provider.stream_completion(make_request()).await.unwrap();
        let fragments: Vec<String> = collect(stream)
            .await
            .into_iter()
            .map(|r| r.unwrap())
            .collect();

        assert_eq!(fragments, vec!["Thanks, ", "John! ", "What's your email?"]);
    }

    #[tokio::test]
    async fn test_sends_instruction_first_and_streaming_flag() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(serde_json::json!({
                "model": "gemini-2.5-flash-lite",
                "stream": true,
                "temperature": 0.7,
                "messages": [
                    { "role": "system", "content": "You are a hiring assistant." },
                    { "role": "user", "content": "Hello" },
                    { "role": "assistant", "content": "Welcome!" },
                    { "role": "user", "content": "John Smith" }
                ]
            })))
            .respond_with(sse_response(sse_body(&["ok"])))
            .mount(&mock_server)
            .await;

        let provider = HttpProvider::new(&make_config("key", &mock_server.uri())).unwrap();
        let stream = provider.stream_completion(make_request()).await.unwrap();
        let fragments = collect(stream).await;

        // If the body matcher fails, wiremock returns 404 and we'd get Err above
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].as_ref().unwrap(), "ok");
    }

    #[tokio::test]
    async fn test_api_error_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": { "message": "API key not valid" }
            })))
            .mount(&mock_server)
            .await;

        let provider = HttpProvider::new(&make_config("bad", &mock_server.uri())).unwrap();
        let err = provider.stream_completion(make_request()).await.err().unwrap();

        match err {
            ProviderError::Status { status, body } => {
                assert_eq!(status, 401);
                assert!(body.contains("API key not valid"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_network_error() {
        // Point to a port that's not listening
        let provider = HttpProvider::new(&make_config("key", "http://127.0.0.1:1")).unwrap();
        let err = provider.stream_completion(make_request()).await.err().unwrap();
        assert!(matches!(err, ProviderError::Request(_)));
    }

    #[tokio::test]
    async fn test_malformed_chunk_ends_stream_with_error() {
        let mock_server = MockServer::start().await;

        let body = format!(
            "data: {}\n\ndata: not-json\n\ndata: {}\n\n",
            serde_json::json!({"choices": [{"delta": {"content": "partial"}}]}),
            serde_json::json!({"choices": [{"delta": {"content": "never seen"}}]}),
        );
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(sse_response(body))
            .mount(&mock_server)
            .await;

        let provider = HttpProvider::new(&make_config("key", &mock_server.uri())).unwrap();
        let items = collect(provider.stream_completion(make_request()).await.unwrap()).await;

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_ref().unwrap(), "partial");
        assert!(matches!(items[1], Err(ProviderError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_error_event_mid_stream() {
        let mock_server = MockServer::start().await;

        let body = format!(
            "data: {}\n\n",
            serde_json::json!({"error": {"code": 503, "message": "overloaded"}})
        );
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(sse_response(body))
            .mount(&mock_server)
            .await;

        let provider = HttpProvider::new(&make_config("key", &mock_server.uri())).unwrap();
        let items = collect(provider.stream_completion(make_request()).await.unwrap()).await;

        assert_eq!(items.len(), 1);
        match &items[0] {
            Err(ProviderError::Stream(msg)) => assert!(msg.contains("overloaded")),
            other => panic!("unexpected item: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_deltas_and_role_only_chunks_skipped() {
        let mock_server = MockServer::start().await;

        let body = format!(
            "data: {}\n\ndata: {}\n\ndata: {}\n\ndata: [DONE]\n\n",
            serde_json::json!({"choices": [{"delta": {"role": "assistant"}}]}),
            serde_json::json!({"choices": [{"delta": {"content": ""}}]}),
            serde_json::json!({"choices": [{"delta": {"content": "Hi"}, "finish_reason": "stop"}]}),
        );
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(sse_response(body))
            .mount(&mock_server)
            .await;

        let provider = HttpProvider::new(&make_config("key", &mock_server.uri())).unwrap();
        let items = collect(provider.stream_completion(make_request()).await.unwrap()).await;

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].as_ref().unwrap(), "Hi");
    }

    #[tokio::test]
    async fn test_stream_without_done_marker_ends_at_body_end() {
        let mock_server = MockServer::start().await;

        let body = format!(
            "data: {}",
            serde_json::json!({"choices": [{"delta": {"content": "tail"}}]})
        );
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(sse_response(body))
            .mount(&mock_server)
            .await;

        let provider = HttpProvider::new(&make_config("key", &mock_server.uri())).unwrap();
        let items = collect(provider.stream_completion(make_request()).await.unwrap()).await;

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].as_ref().unwrap(), "tail");
    }
}
