//! Blocking HTTP access to the release APIs.
//!
//! Everything above this module talks to the network through [`HttpClient`],
//! so resolvers can be exercised against mocked responses.

use crate::error::{McServerError, Result};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use std::io::Read;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_USER_AGENT: &str = concat!("mcserver/", env!("CARGO_PKG_VERSION"));

/// GET primitives used by resolvers and the downloader.
#[cfg_attr(test, mockall::automock)]
pub trait HttpClient: Send + Sync {
    /// Fetch `url` and parse the body as JSON.
    ///
    /// Fails with `FetchFailed` on a non-success status or transport error and
    /// with `InvalidJson` when the body does not parse.
    fn get_json(&self, url: &str) -> Result<serde_json::Value>;

    /// Open `url` for streaming; the body is read lazily by the caller.
    fn get_stream(&self, url: &str) -> Result<Box<dyn Read>>;
}

/// Fetch a JSON document and deserialize it into a typed view.
///
/// Shape mismatches are reported as `MalformedResponse` rather than a generic
/// JSON error so callers can tell upstream drift from a broken body.
pub fn fetch_json<T: DeserializeOwned>(client: &dyn HttpClient, url: &str) -> Result<T> {
    let value = client.get_json(url)?;
    serde_json::from_value(value).map_err(|e| McServerError::malformed(url, e))
}

/// Reject anything that is not an absolute http(s) URL with a host.
pub fn validate_url(url: &str) -> Result<()> {
    let invalid = || McServerError::InvalidUrl {
        url: url.to_string(),
    };

    let uri: ureq::http::Uri = url.parse().map_err(|_| invalid())?;
    match (uri.scheme_str(), uri.host()) {
        (Some("http" | "https"), Some(host)) if !host.is_empty() => Ok(()),
        _ => Err(invalid()),
    }
}

/// `ureq`-backed client.
///
/// Metadata calls are bounded end to end by the configured timeout. Artifact
/// streams only bound the connection and the response head, since jar bodies
/// can take much longer than a metadata call to arrive.
pub struct UreqClient {
    agent: ureq::Agent,
    timeout: Duration,
    user_agent: String,
}

impl Default for UreqClient {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT, DEFAULT_USER_AGENT)
    }
}

impl UreqClient {
    pub fn new(timeout: Duration, user_agent: impl Into<String>) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_connect(Some(timeout))
            .timeout_recv_response(Some(timeout))
            .build();

        Self {
            agent: ureq::Agent::new_with_config(config),
            timeout,
            user_agent: user_agent.into(),
        }
    }
}

impl HttpClient for UreqClient {
    fn get_json(&self, url: &str) -> Result<serde_json::Value> {
        debug!("GET {url}");
        let response = self
            .agent
            .get(url)
            .header("User-Agent", &self.user_agent)
            .config()
            .timeout_global(Some(self.timeout))
            .build()
            .call()
            .map_err(|e| map_ureq_error(url, &e))?;

        let body = response
            .into_body()
            .read_to_string()
            .map_err(|e| map_ureq_error(url, &e))?;

        serde_json::from_str(&body).map_err(|e| McServerError::InvalidJson {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }

    fn get_stream(&self, url: &str) -> Result<Box<dyn Read>> {
        debug!("GET {url} (stream)");
        let response = self
            .agent
            .get(url)
            .header("User-Agent", &self.user_agent)
            .call()
            .map_err(|e| map_ureq_error(url, &e))?;

        Ok(Box::new(response.into_body().into_reader()))
    }
}

fn map_ureq_error(url: &str, err: &ureq::Error) -> McServerError {
    match err {
        ureq::Error::StatusCode(code) => McServerError::FetchFailed {
            url: url.to_string(),
            status: Some(*code),
            reason: format!("HTTP status {code}"),
        },
        other => McServerError::FetchFailed {
            url: url.to_string(),
            status: None,
            reason: other.to_string(),
        },
    }
}

/// Bounded retry with linear backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            backoff: Duration::ZERO,
        }
    }

    /// `retries` extra attempts after the first one.
    pub fn with_retries(retries: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: retries.saturating_add(1),
            backoff,
        }
    }

    fn run<T>(&self, url: &str, mut op: impl FnMut() -> Result<T>) -> Result<T> {
        let mut attempt = 1;
        loop {
            match op() {
                Err(e) if e.is_transient() && attempt < self.max_attempts => {
                    warn!(
                        "Attempt {attempt}/{} for {url} failed: {e}; retrying",
                        self.max_attempts
                    );
                    std::thread::sleep(self.backoff * attempt);
                    attempt += 1;
                }
                result => return result,
            }
        }
    }
}

/// Wraps another client and retries transient failures.
pub struct RetryingClient<C> {
    inner: C,
    policy: RetryPolicy,
}

impl<C: HttpClient> RetryingClient<C> {
    pub fn new(inner: C, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

impl<C: HttpClient> HttpClient for RetryingClient<C> {
    fn get_json(&self, url: &str) -> Result<serde_json::Value> {
        self.policy.run(url, || self.inner.get_json(url))
    }

    fn get_stream(&self, url: &str) -> Result<Box<dyn Read>> {
        self.policy.run(url, || self.inner.get_stream(url))
    }
}
