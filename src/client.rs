use std::pin::Pin;
use std::time::Duration;

use futures::Stream;
use futures::stream::StreamExt;
use reqwest::header::HeaderValue;
use reqwest::{Client as ReqwestClient, Response, header};
use serde::Deserialize;
use url::Url;

use crate::error::{Error, Result};
use crate::ndjson::process_ndjson;
use crate::observability::{CLIENT_REBUILDS, CLIENT_REQUEST_ERRORS, CLIENT_REQUESTS};
use crate::types::ChatRequest;

const DEFAULT_BASE_URL: &str = "http://localhost:11434";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// A finite stream of incremental response text.
///
/// The stream terminates when generation completes and is not restartable;
/// a fresh request must be issued to regenerate. It may yield an error at
/// any point, including after chunks have already been produced.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// The provider seam the chat core depends on.
///
/// Implemented by [`Ollama`] for real use and by stubs in tests.
#[async_trait::async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Issue a chat completion request and stream back incremental text.
    async fn stream_chat(&self, request: ChatRequest) -> Result<ChunkStream>;
}

/// Client for an Ollama-compatible local completion runtime.
#[derive(Debug, Clone)]
pub struct Ollama {
    client: ReqwestClient,
    base_url: String,
    timeout: Duration,
}

impl Ollama {
    /// Create a new client against the default local endpoint.
    pub fn new() -> Result<Self> {
        Self::with_options(None, None)
    }

    /// Create a new client with custom settings.
    ///
    /// The base URL is validated eagerly; a malformed endpoint fails here
    /// rather than on the first request.
    pub fn with_options(base_url: Option<String>, timeout: Option<Duration>) -> Result<Self> {
        let base_url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url)?;

        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("Failed to build HTTP client: {e}"),
                    Some(Box::new(e)),
                )
            })?;

        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    /// Returns the endpoint this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Process API response errors and convert to our Error type
    async fn process_error_response(response: Response) -> Error {
        let status = response.status();
        let status_code = status.as_u16();

        // Try to parse error response body
        #[derive(Deserialize)]
        struct ErrorBody {
            error: Option<String>,
        }

        let error_body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Error::http_client(
                    format!("Failed to read error response: {e}"),
                    Some(Box::new(e)),
                );
            }
        };

        let error_message = serde_json::from_str::<ErrorBody>(&error_body)
            .ok()
            .and_then(|body| body.error)
            .unwrap_or_else(|| error_body.clone());

        // Map HTTP status code to appropriate error type
        match status_code {
            400 => Error::bad_request(error_message, None),
            404 => Error::not_found(error_message),
            408 => Error::timeout(error_message, None),
            500 => Error::internal_server(error_message),
            502..=504 => Error::service_unavailable(error_message, None),
            _ => Error::api(status_code, error_message),
        }
    }

    fn map_request_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::timeout(
                format!("Request timed out: {e}"),
                Some(self.timeout.as_secs_f64()),
            )
        } else if e.is_connect() {
            Error::connection(format!("Connection error: {e}"), Some(Box::new(e)))
        } else {
            Error::http_client(format!("Request failed: {e}"), Some(Box::new(e)))
        }
    }
}

#[async_trait::async_trait]
impl CompletionProvider for Ollama {
    /// Send a chat request and stream back incremental response text.
    ///
    /// Returns a stream of text chunks that can be processed incrementally.
    async fn stream_chat(&self, mut request: ChatRequest) -> Result<ChunkStream> {
        request.stream = true;

        let url = format!("{}/api/chat", self.base_url);
        CLIENT_REQUESTS.click();

        let response = self
            .client
            .post(&url)
            .header(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            )
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                CLIENT_REQUEST_ERRORS.click();
                self.map_request_error(e)
            })?;

        if !response.status().is_success() {
            CLIENT_REQUEST_ERRORS.click();
            return Err(Self::process_error_response(response).await);
        }

        // Get the byte stream from the response and parse NDJSON chunks
        let chunks = process_ndjson(response.bytes_stream());

        // Keep only the incremental text; the terminal chunk carries none
        let text = chunks.filter_map(|chunk| async move {
            match chunk {
                Ok(chunk) => chunk.message.map(|message| Ok(message.content)),
                Err(e) => Some(Err(e)),
            }
        });

        Ok(Box::pin(text))
    }
}

/// Cache key for a constructed client.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ClientKey {
    model: String,
    base_url: String,
    temperature_bits: u32,
}

/// Lazily-constructed client cache keyed by `(model, endpoint, temperature)`.
///
/// The client is rebuilt when any key component changes and reused
/// otherwise. This is a caching policy, not a resource pool: there is at
/// most one live client at a time.
#[derive(Debug, Default)]
pub struct ClientCache {
    cached: Option<(ClientKey, Ollama)>,
}

impl ClientCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self { cached: None }
    }

    /// Returns a client for the given parameters, rebuilding on change.
    pub fn get(&mut self, model: &str, base_url: &str, temperature: f32) -> Result<&Ollama> {
        let key = ClientKey {
            model: model.to_string(),
            base_url: base_url.to_string(),
            temperature_bits: temperature.to_bits(),
        };
        let stale = match &self.cached {
            Some((cached_key, _)) => *cached_key != key,
            None => true,
        };
        if stale {
            CLIENT_REBUILDS.click();
            let client = Ollama::with_options(Some(base_url.to_string()), None)?;
            self.cached = Some((key, client));
        }
        Ok(&self.cached.as_ref().expect("cache was just filled").1)
    }
}
