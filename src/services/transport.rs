use crate::domain::constants::{ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use crate::domain::errors::TransportError;
use crate::domain::models::FetchResult;
use crate::services::clock::Clock;
use reqwest::header::{HeaderMap, HeaderValue};
use std::collections::BTreeMap;
use std::time::Duration;

/// Single GET with automatic redirect-following disabled.
pub trait Transport {
    fn get(&self, url: &str) -> Result<FetchResult, TransportError>;
}

pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(reqwest::header::ACCEPT, HeaderValue::from_static(ACCEPT));
        headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            HeaderValue::from_static(ACCEPT_LANGUAGE),
        );
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::none())
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<FetchResult, TransportError> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| TransportError::new(url, e.to_string()))?;

        let status_code = resp.status().as_u16();
        let final_url = resp.url().to_string();
        let mut headers: BTreeMap<String, String> = BTreeMap::new();
        for (name, value) in resp.headers() {
            let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
            headers
                .entry(name.as_str().to_ascii_lowercase())
                .and_modify(|existing| {
                    existing.push_str(", ");
                    existing.push_str(&value);
                })
                .or_insert(value);
        }
        // Falls back to UTF-8 when the server omits a charset.
        let body = resp
            .text()
            .map_err(|e| TransportError::new(url, format!("reading body: {e}")))?;

        Ok(FetchResult {
            url: url.to_string(),
            status_code,
            headers,
            body,
            final_url,
        })
    }
}

/// Fixed-attempt, fixed-delay retry for transport failures only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn run<T>(
        &self,
        clock: &dyn Clock,
        mut op: impl FnMut() -> Result<T, TransportError>,
    ) -> Result<T, TransportError> {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match op() {
                Ok(v) => return Ok(v),
                Err(e) if attempt < attempts => {
                    tracing::warn!(
                        attempt,
                        max = attempts,
                        error = %e,
                        "transport failure, retrying"
                    );
                    clock.sleep(self.delay);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Wraps any transport with a retry policy. HTTP responses of any status pass through untouched.
pub struct RetryingTransport<'a, T: Transport> {
    inner: T,
    policy: RetryPolicy,
    clock: &'a dyn Clock,
}

impl<'a, T: Transport> RetryingTransport<'a, T> {
    pub fn new(inner: T, policy: RetryPolicy, clock: &'a dyn Clock) -> Self {
        Self {
            inner,
            policy,
            clock,
        }
    }
}

impl<T: Transport> Transport for RetryingTransport<'_, T> {
    fn get(&self, url: &str) -> Result<FetchResult, TransportError> {
        self.policy.run(self.clock, || self.inner.get(url))
    }
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, url: &str) -> Result<FetchResult, TransportError> {
        (**self).get(url)
    }
}
