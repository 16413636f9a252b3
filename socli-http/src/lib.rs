//! Minimal HTML-fetching HTTP client with safe logging and retries.
//!
//! - Request options: extra headers, user agent, query params
//! - Follows redirects and reports the *final* URL, which callers inspect for
//!   bot-defense redirects
//! - Retries transport failures and 5xx with exponential backoff; 4xx
//!   (including 429) is handed back to the caller as a [`FetchedPage`]
//! - Optional *raw* request/response logging via `SOCLI_HTTP_RAW=1`
//!
//! Example (no_run):
//! ```rust
//! # async fn demo() -> Result<(), socli_http::HttpError> {
//! let client = socli_http::HttpClient::new("https://stackoverflow.com")?;
//! let page = client
//!     .get_page("questions/11227809", socli_http::RequestOpts::default())
//!     .await?;
//! println!("{} -> {} bytes", page.url, page.body.len());
//! # Ok(()) }
//! ```
//!
//! Observability: structured `tracing` events are emitted for request start,
//! response headers, body snippets (truncated), retries and final errors.

pub mod identity;

use reqwest::header::{COOKIE, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, Method};
use std::borrow::Cow;
use std::env;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;

pub use identity::{IdentityError, RequestIdentity, UserAgentPool};
pub use reqwest::{StatusCode, Url, header};

// ==============================
// Raw logging toggles
// ==============================

const RAW_ENV: &str = "SOCLI_HTTP_RAW";
const RAW_MAX_BODY: usize = 64 * 1024;
const SNIPPET_MAX: usize = 500;

fn raw_enabled() -> bool {
    matches!(
        env::var(RAW_ENV).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

/// Render a best-effort curl command for repro/debug, with cookies redacted.
fn make_curl(method: &Method, url: &Url, headers: &HeaderMap) -> String {
    let mut parts = vec!["curl".to_string(), "-L".to_string(), format!("-X{method}")];
    for (name, value) in redact_headers(headers) {
        parts.push(format!("-H '{}: {}'", name, value.replace('\'', r"'\''")));
    }
    parts.push(format!("'{}'", url.as_str()));
    parts.join(" ")
}

fn redact_headers(h: &HeaderMap) -> Vec<(String, String)> {
    h.iter()
        .map(|(k, v)| {
            let key = k.as_str().to_string();
            let val = if *k == COOKIE || key.eq_ignore_ascii_case("set-cookie") {
                "<redacted>".to_string()
            } else {
                v.to_str().unwrap_or("").to_string()
            };
            (key, val)
        })
        .collect()
}

// ==============================
// Errors
// ==============================

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("request build failed: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("server returned error {status} for {url}, request_id={request_id}")]
    Server {
        status: StatusCode,
        url: String,
        request_id: String,
    },
}

// ==============================
// Request options & response
// ==============================

/// Per-request tuning knobs for the HTTP client.
///
/// ```
/// use socli_http::RequestOpts;
/// use std::borrow::Cow;
///
/// let opts = RequestOpts {
///     user_agent: Some("Mozilla/5.0"),
///     query: Some(vec![("q", Cow::Borrowed("rust lifetimes"))]),
///     ..Default::default()
/// };
///
/// assert!(opts.headers.is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestOpts<'a> {
    pub headers: Option<HeaderMap>,
    pub user_agent: Option<&'a str>,
    pub query: Option<Vec<(&'a str, Cow<'a, str>)>>,
}

/// A fetched HTML document.
#[derive(Clone, Debug)]
pub struct FetchedPage {
    /// URL after following redirects.
    pub url: Url,
    pub status: StatusCode,
    pub body: String,
}

// ==============================
// Client
// ==============================

#[derive(Clone)]
pub struct HttpClient {
    base: Url,
    inner: Client,
    pub default_timeout: Duration,
    pub max_retries: usize,
}

impl HttpClient {
    /// Construct a client anchored to a base URL. Relative paths passed to
    /// [`HttpClient::get_page`] are joined onto it; absolute URLs are used
    /// as-is.
    ///
    /// ```no_run
    /// use socli_http::{HttpClient, HttpError};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::new("https://stackoverflow.com")?;
    /// assert_eq!(client.default_timeout, Duration::from_secs(15));
    /// assert_eq!(client.max_retries, 2);
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn new(base: &str) -> Result<Self, HttpError> {
        let base = Url::parse(base).map_err(|e| HttpError::Url(e.to_string()))?;
        let inner = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .cookie_store(true)
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self {
            base,
            inner,
            default_timeout: Duration::from_secs(15),
            max_retries: 2,
        })
    }

    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.default_timeout = dur;
        self
    }

    pub fn with_retries(mut self, n: usize) -> Self {
        self.max_retries = n;
        self
    }

    /// Resolve a path against the base, passing absolute URLs through.
    pub fn resolve(&self, path: &str) -> Result<Url, HttpError> {
        match Url::parse(path) {
            Ok(abs) => Ok(abs),
            Err(_) => self
                .base
                .join(path)
                .map_err(|e| HttpError::Url(e.to_string())),
        }
    }

    /// GET an HTML page.
    ///
    /// Transport failures and 5xx responses are retried up to the retry
    /// budget. Every other status is returned to the caller together with
    /// the final URL.
    pub async fn get_page(&self, path: &str, opts: RequestOpts<'_>) -> Result<FetchedPage, HttpError> {
        let url = self.resolve(path)?;
        let max_retries = self.max_retries;
        let timeout = self.default_timeout;

        let mut headers = opts.headers.clone().unwrap_or_default();
        if let Some(ua) = opts.user_agent {
            let value = HeaderValue::from_str(ua)
                .map_err(|e| HttpError::Build(format!("invalid user agent: {e}")))?;
            headers.insert(USER_AGENT, value);
        }
        let pairs: Vec<(&str, &str)> = opts
            .query
            .as_ref()
            .map(|q| q.iter().map(|(k, v)| (*k, v.as_ref())).collect())
            .unwrap_or_default();

        let req_id = format!("r{}", uuid::Uuid::new_v4().simple());
        let mut attempt = 0usize;

        loop {
            let rb = self
                .inner
                .request(Method::GET, url.clone())
                .timeout(timeout)
                .headers(headers.clone())
                .query(&pairs);

            tracing::debug!(
                req_id=%req_id,
                attempt=attempt + 1,
                max_retries,
                host_path=%format!("{}{}", url.domain().unwrap_or("-"), url.path()),
                query=?pairs,
                timeout_ms=timeout.as_millis() as u64,
                "http.request.start"
            );

            if raw_enabled() {
                let curl = make_curl(&Method::GET, &url, &headers);
                tracing::debug!(target: "http.raw", %req_id, %curl, "request");
            }

            let t0 = std::time::Instant::now();
            let sent = match rb.send().await {
                Ok(resp) => {
                    let final_url = resp.url().clone();
                    let status = resp.status();
                    let resp_headers = resp.headers().clone();
                    resp.bytes()
                        .await
                        .map(|bytes| (final_url, status, resp_headers, bytes))
                }
                Err(err) => Err(err),
            };

            let (final_url, status, resp_headers, bytes) = match sent {
                Ok(parts) => parts,
                Err(err) => {
                    let message = err.to_string();
                    if attempt < max_retries {
                        attempt += 1;
                        let delay = backoff(attempt);
                        tracing::warn!(
                            req_id=%req_id,
                            attempt,
                            max_retries,
                            backoff_ms=delay.as_millis() as u64,
                            message=%message,
                            "http.retrying.network"
                        );
                        sleep(delay).await;
                        continue;
                    }
                    tracing::warn!(req_id=%req_id, attempt, message=%message, "http.network_error");
                    return Err(HttpError::Network(message));
                }
            };
            let dur_ms = t0.elapsed().as_millis() as u64;

            let x_request_id = resp_headers
                .get("x-request-id")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("-")
                .to_string();

            tracing::debug!(
                req_id=%req_id,
                %status,
                final_url=%final_url,
                redirected=final_url.host_str() != url.host_str() || final_url.path() != url.path(),
                duration_ms=dur_ms,
                body_len=bytes.len(),
                x_request_id=%x_request_id,
                "http.response.headers"
            );

            if raw_enabled() {
                let end = bytes.len().min(RAW_MAX_BODY);
                let text = String::from_utf8_lossy(&bytes[..end]);
                tracing::info!(
                    target: "http.raw",
                    %req_id,
                    %status,
                    duration_ms=dur_ms,
                    headers=?redact_headers(&resp_headers),
                    body=%text,
                    truncated=bytes.len() > RAW_MAX_BODY
                );
            }

            tracing::trace!(req_id=%req_id, body_snippet=%snip_body(&bytes), "http.response.body_snippet");

            if status.is_server_error() {
                if attempt < max_retries {
                    attempt += 1;
                    let delay = backoff(attempt);
                    tracing::warn!(
                        req_id=%req_id,
                        %status,
                        attempt,
                        max_retries,
                        backoff_ms=delay.as_millis() as u64,
                        "http.retrying.server"
                    );
                    sleep(delay).await;
                    continue;
                }
                tracing::warn!(req_id=%req_id, %status, x_request_id=%x_request_id, "http.error");
                return Err(HttpError::Server {
                    status,
                    url: final_url.to_string(),
                    request_id: x_request_id,
                });
            }

            let body = String::from_utf8(bytes.to_vec()).map_err(|e| {
                tracing::warn!(req_id=%req_id, error=%e, "http.response.decode_error");
                HttpError::Decode(e.to_string())
            })?;

            return Ok(FetchedPage {
                url: final_url,
                status,
                body,
            });
        }
    }
}

// ==============================
// Helpers
// ==============================

fn backoff(attempt: usize) -> Duration {
    let shift = attempt.saturating_sub(1).min(6) as u32;
    Duration::from_millis(200u64.saturating_mul(1 << shift))
}

fn snip_body(body: &[u8]) -> String {
    let mut snip = String::from_utf8_lossy(body).to_string();
    if snip.len() > SNIPPET_MAX {
        let mut cut = SNIPPET_MAX;
        while !snip.is_char_boundary(cut) {
            cut -= 1;
        }
        snip.truncate(cut);
        snip.push_str("...");
    }
    snip
}
