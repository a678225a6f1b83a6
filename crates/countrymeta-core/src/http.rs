//! Blocking HTTP transport over a shared async client.
//!
//! Uses async reqwest internally on a shared tokio runtime, but presents a
//! sync interface so plain worker threads can drive requests.

use std::sync::{LazyLock, OnceLock};
use std::time::Duration;

/// Connect timeout
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Transport-level settings shared by every request of a run.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Whole-request timeout (connect + body)
    pub read_timeout: Duration,
    /// How many times a failed relation request is resubmitted
    pub max_retries: u32,
    /// Fixed delay each worker waits before issuing a request
    pub request_delay: Duration,
    /// Sent as `User-Agent`; the OSM API rejects anonymous clients
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            read_timeout: Duration::from_secs(30),
            max_retries: 5,
            request_delay: Duration::from_millis(250),
            user_agent: concat!("countrymeta/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

static HTTP_CONFIG: OnceLock<HttpConfig> = OnceLock::new();

/// Install the process-wide HTTP settings. Only the first call wins.
pub fn set_http_config(config: HttpConfig) {
    if HTTP_CONFIG.set(config).is_err() {
        log::warn!("HTTP config already initialized, ignoring override");
    }
}

/// Current HTTP settings (defaults if never set).
pub fn http_config() -> &'static HttpConfig {
    HTTP_CONFIG.get_or_init(HttpConfig::default)
}

/// Error types for transport operations.
///
/// A non-2xx status is not an error here: it comes back as an
/// [`HttpResponse`] and is classified by the caller.
#[derive(Debug)]
pub enum HttpError {
    /// Connection refused/reset, DNS failure, body read aborted
    Connect(String),
    /// Request exceeded `read_timeout`
    Timeout,
    /// The request could never succeed (malformed URL, bad header)
    Invalid(String),
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connect(message) => write!(f, "connection error: {message}"),
            Self::Timeout => write!(f, "request timed out"),
            Self::Invalid(message) => write!(f, "invalid request: {message}"),
        }
    }
}

impl std::error::Error for HttpError {}

impl HttpError {
    /// Create transport error from reqwest error
    pub fn from_reqwest(e: &reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_builder() {
            Self::Invalid(e.to_string())
        } else {
            Self::Connect(e.to_string())
        }
    }

    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Invalid(_))
    }
}

/// Status code and raw body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Generic request/response client.
///
/// Shared by all fetch workers, hence `Sync`.
pub trait Transport: Send + Sync {
    fn get(&self, url: &str) -> Result<HttpResponse, HttpError>;

    fn post(&self, url: &str, body: &str) -> Result<HttpResponse, HttpError>;
}

/// Shared async HTTP client with connection pooling.
static SHARED_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    let config = http_config();
    reqwest::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(config.read_timeout)
        .user_agent(config.user_agent.clone())
        .pool_max_idle_per_host(8)
        .build()
        .expect("failed to build HTTP client")
});

/// Get shared HTTP client.
pub fn http_client() -> &'static reqwest::Client {
    &SHARED_CLIENT
}

/// Shared tokio runtime for HTTP operations.
pub static SHARED_RUNTIME: LazyLock<tokio::runtime::Runtime> = LazyLock::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .expect("failed to build tokio runtime")
});

/// Production [`Transport`] backed by the shared reqwest client.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReqwestTransport;

impl ReqwestTransport {
    fn execute(&self, request: reqwest::RequestBuilder) -> Result<HttpResponse, HttpError> {
        SHARED_RUNTIME.handle().block_on(async {
            let response = request
                .send()
                .await
                .map_err(|e| HttpError::from_reqwest(&e))?;
            let status = response.status().as_u16();
            let body = response
                .bytes()
                .await
                .map_err(|e| HttpError::from_reqwest(&e))?;
            Ok(HttpResponse {
                status,
                body: body.to_vec(),
            })
        })
    }
}

impl Transport for ReqwestTransport {
    fn get(&self, url: &str) -> Result<HttpResponse, HttpError> {
        self.execute(http_client().get(url))
    }

    fn post(&self, url: &str, body: &str) -> Result<HttpResponse, HttpError> {
        self.execute(http_client().post(url).body(body.to_string()))
    }
}
