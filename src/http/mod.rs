//! # HTTP Module
//!
//! One [`HttpClient`] is built per process and handed to every service client
//! (Plex, TMDb, MDBList). It owns the retry policy and a [`Transport`], the
//! seam that performs a single round-trip. Production code uses
//! [`ReqwestTransport`]; tests substitute a scripted transport.
//!
//! ## Retry Policy
//!
//! Responses whose status is in [`RetryPolicy::retryable`] (500, 502, 503, 504
//! by default) and transport failures are retried until
//! [`RetryPolicy::max_attempts`] attempts have been made, sleeping
//! `backoff_base * 2^(n-1)` before retry `n`. Any 4xx response fails at once.
//!
//! ## Call Styles
//!
//! - [`HttpClient::fetch_json`] - every failure is an `Err`. Used where a failed
//!   call must abort the library run (Plex search, TMDb list updates).
//! - [`HttpClient::request_json`] - exhausted retries, transport errors and
//!   undecodable bodies are logged and reported as `Ok(None)`; only 4xx
//!   responses and invalid input are an `Err`. Used for rating lookups, where
//!   "no data" simply means "exclude".

mod transport;

use std::{fmt, str::FromStr, sync::Arc, time::Duration};

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use thiserror::Error;
use tokio::time::sleep;

use crate::warning;

pub use transport::{ReqwestTransport, Transport};

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("Invalid HTTP method '{0}'. Must be 'GET' or 'POST'.")]
    InvalidMethod(String),
    #[error("{url} responded with {status}: {body}")]
    Client { status: u16, url: String, body: String },
    #[error("{url} responded with {status}")]
    Server { status: u16, url: String },
    #[error("{url} still failing after {attempts} attempts (last status {status:?})")]
    RetriesExhausted {
        status: Option<u16>,
        attempts: u32,
        url: String,
    },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("cannot decode response from {url}: {message}")]
    Decode { url: String, message: String },
}

impl HttpError {
    pub fn status(&self) -> Option<u16> {
        match self {
            HttpError::Client { status, .. } | HttpError::Server { status, .. } => Some(*status),
            HttpError::RetriesExhausted { status, .. } => *status,
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl FromStr for Method {
    type Err = HttpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            _ => Err(HttpError::InvalidMethod(s.to_string())),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Form(Vec<(String, String)>),
    Json(Value),
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        HttpRequest {
            method,
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::Post, url)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    pub fn bearer(self, token: &str) -> Self {
        self.header("Authorization", format!("Bearer {}", token))
    }

    pub fn form(mut self, pairs: Vec<(String, String)>) -> Self {
        self.body = RequestBody::Form(pairs);
        self
    }

    pub fn json<T: Serialize>(mut self, payload: &T) -> Result<Self, HttpError> {
        let value = serde_json::to_value(payload).map_err(|e| HttpError::Decode {
            url: self.url.clone(),
            message: e.to_string(),
        })?;
        self.body = RequestBody::Json(value);
        Ok(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    fn decode<T: DeserializeOwned>(&self, url: &str) -> Result<T, HttpError> {
        let body = if self.body.trim().is_empty() {
            "null"
        } else {
            self.body.as_str()
        };
        serde_json::from_str(body).map_err(|e| HttpError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_base: Duration,
    pub retryable: Vec<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: 5,
            backoff_base: Duration::from_millis(100),
            retryable: vec![500, 502, 503, 504],
        }
    }
}

impl RetryPolicy {
    pub fn is_retryable(&self, status: u16) -> bool {
        self.retryable.contains(&status)
    }

    /// Delay before retry `retry` (1-based).
    pub fn delay_for(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(16);
        self.backoff_base.saturating_mul(1u32 << exponent)
    }
}

#[derive(Clone)]
pub struct HttpClient {
    transport: Arc<dyn Transport>,
    policy: RetryPolicy,
}

impl HttpClient {
    pub fn new() -> Result<Self, HttpError> {
        Ok(Self::with_transport(
            Arc::new(ReqwestTransport::new()?),
            RetryPolicy::default(),
        ))
    }

    pub fn with_transport(transport: Arc<dyn Transport>, policy: RetryPolicy) -> Self {
        HttpClient { transport, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, HttpError> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 0u32;

        loop {
            attempt += 1;

            match self.transport.execute(request).await {
                Ok(response) if response.is_success() => return Ok(response),
                Ok(response) if self.policy.is_retryable(response.status) => {
                    if attempt >= max_attempts {
                        return Err(HttpError::RetriesExhausted {
                            status: Some(response.status),
                            attempts: attempt,
                            url: request.url.clone(),
                        });
                    }
                }
                Ok(response) if (400..500).contains(&response.status) => {
                    return Err(HttpError::Client {
                        status: response.status,
                        url: request.url.clone(),
                        body: response.body,
                    });
                }
                Ok(response) => {
                    return Err(HttpError::Server {
                        status: response.status,
                        url: request.url.clone(),
                    });
                }
                Err(HttpError::Transport(message)) => {
                    if attempt >= max_attempts {
                        return Err(HttpError::Transport(message));
                    }
                }
                Err(err) => return Err(err),
            }

            sleep(self.policy.delay_for(attempt)).await;
        }
    }

    pub async fn fetch_json<T: DeserializeOwned>(
        &self,
        request: &HttpRequest,
    ) -> Result<T, HttpError> {
        self.send(request).await?.decode(&request.url)
    }

    pub async fn request_json(&self, request: &HttpRequest) -> Result<Option<Value>, HttpError> {
        match self.fetch_json::<Value>(request).await {
            Ok(value) => Ok(Some(value)),
            Err(err @ (HttpError::Client { .. } | HttpError::InvalidMethod(_))) => Err(err),
            Err(err) => {
                warning!("Request failed after multiple retries: {}", err);
                Ok(None)
            }
        }
    }
}
