//! HTTP client wrapper with retry logic.

use std::time::{Duration, Instant};

use reqwest::header::{ACCEPT, RETRY_AFTER, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::api_types::KaikoErrorResponse;
use super::config::{KaikoConfig, RetryConfig};
use super::error::KaikoError;
use crate::infrastructure::metrics::{UpstreamOperation, record_upstream_request};

/// `User-Agent` sent with every request.
pub const KAIKO_USER_AGENT: &str = "Kaiko Chainlink Adapter";

const API_KEY_HEADER: &str = "X-Api-Key";

/// HTTP client for the Kaiko API with retry logic.
#[derive(Debug, Clone)]
pub struct KaikoHttpClient {
    client: Client,
    api_key: String,
    retry_config: RetryConfig,
}

impl KaikoHttpClient {
    /// Create a new HTTP client from config.
    pub fn new(config: &KaikoConfig) -> Result<Self, KaikoError> {
        if config.api_key.trim().is_empty() {
            return Err(KaikoError::AuthenticationFailed);
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| KaikoError::Http(e.to_string()))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            retry_config: config.retry.clone(),
        })
    }

    /// GET `url` and decode a successful JSON body.
    ///
    /// Rate limits, timeouts, 5xx and transport failures are retried with
    /// exponential backoff. A `Retry-After` hint replaces the computed delay.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, KaikoError> {
        let mut schedule = RetrySchedule::new(&self.retry_config);

        loop {
            let started = Instant::now();
            let response = match self.send(url).await {
                Ok(resp) => resp,
                Err(e) => {
                    record_upstream_request(
                        UpstreamOperation::ExchangeRate,
                        None,
                        started.elapsed(),
                    );
                    schedule.wait(None, &e.to_string()).await?;
                    continue;
                }
            };

            let status = response.status();
            record_upstream_request(
                UpstreamOperation::ExchangeRate,
                Some(status.as_u16()),
                started.elapsed(),
            );

            if status.is_success() {
                let text = response
                    .text()
                    .await
                    .map_err(|e| KaikoError::Network(e.to_string()))?;
                return serde_json::from_str(&text)
                    .map_err(|e| KaikoError::JsonParse(e.to_string()));
            }

            let retry_after = retry_after(&response);
            let error_body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<KaikoErrorResponse>(&error_body)
                .ok()
                .and_then(|err| err.message)
                .unwrap_or(error_body);

            match Failure::of(status) {
                Failure::Throttled => {
                    if schedule.wait(retry_after, "rate limited").await.is_err() {
                        return Err(KaikoError::RateLimited {
                            retry_after_secs: retry_after.map_or(60, |d| d.as_secs()),
                        });
                    }
                }
                Failure::Transient => schedule.wait(None, &message).await?,
                Failure::Rejected => {
                    return Err(KaikoError::Api {
                        status: status.as_u16(),
                        message,
                    });
                }
                Failure::Unauthorized => return Err(KaikoError::AuthenticationFailed),
            }
        }
    }

    /// GET `url` and return whatever the provider answers.
    ///
    /// Only transport failures are retried; any HTTP status is a final answer.
    /// Bodies that are not JSON come back as a JSON string.
    pub async fn get_raw(&self, url: &str) -> Result<(u16, Value), KaikoError> {
        let mut schedule = RetrySchedule::new(&self.retry_config);

        loop {
            let started = Instant::now();
            match self.send(url).await {
                Ok(response) => {
                    let status = response.status().as_u16();
                    record_upstream_request(
                        UpstreamOperation::Forward,
                        Some(status),
                        started.elapsed(),
                    );
                    let text = response
                        .text()
                        .await
                        .map_err(|e| KaikoError::Network(e.to_string()))?;
                    return Ok((status, parse_body(text)));
                }
                Err(e) => {
                    record_upstream_request(UpstreamOperation::Forward, None, started.elapsed());
                    schedule.wait(None, &e.to_string()).await?;
                }
            }
        }
    }

    async fn send(&self, url: &str) -> Result<Response, reqwest::Error> {
        self.client
            .get(url)
            .header(API_KEY_HEADER, &self.api_key)
            .header(USER_AGENT, KAIKO_USER_AGENT)
            .header(ACCEPT, "application/json")
            .send()
            .await
    }
}

/// `Retry-After` in seconds. Kaiko does not send the HTTP-date form.
fn retry_after(response: &Response) -> Option<Duration> {
    response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

/// JSON body, or the raw text as a JSON string.
fn parse_body(text: String) -> Value {
    if text.is_empty() {
        return Value::Null;
    }
    serde_json::from_str(&text).unwrap_or(Value::String(text))
}

/// How a non-success answer from the exchange rate endpoint is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Failure {
    /// 429: wait, honouring `Retry-After`.
    Throttled,
    /// 408 or any 5xx: wait and try again.
    Transient,
    /// 401/403: the API key is wrong, retrying cannot help.
    Unauthorized,
    /// Anything else is Kaiko's final word on the request.
    Rejected,
}

impl Failure {
    fn of(status: StatusCode) -> Self {
        if status == StatusCode::TOO_MANY_REQUESTS {
            Self::Throttled
        } else if status == StatusCode::REQUEST_TIMEOUT || status.is_server_error() {
            Self::Transient
        } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            Self::Unauthorized
        } else {
            Self::Rejected
        }
    }
}

/// Attempts made for one request and the delay before the next one.
///
/// The first request counts as an attempt, so `max_attempts = 3` allows two
/// retries.
#[derive(Debug)]
struct RetrySchedule<'a> {
    config: &'a RetryConfig,
    attempts: u32,
    delay: Duration,
}

impl<'a> RetrySchedule<'a> {
    const fn new(config: &'a RetryConfig) -> Self {
        Self {
            config,
            attempts: 1,
            delay: config.initial_backoff,
        }
    }

    /// Delay before the next attempt, or `None` once the budget is spent.
    ///
    /// `hint` overrides the computed delay; both are capped at `max_backoff`.
    fn next_delay(&mut self, hint: Option<Duration>) -> Option<Duration> {
        if self.attempts >= self.config.max_attempts {
            return None;
        }
        self.attempts += 1;

        let delay = hint.unwrap_or(self.delay).min(self.config.max_backoff);
        self.delay = Duration::try_from_secs_f64(self.delay.as_secs_f64() * self.config.multiplier)
            .map_or(self.config.max_backoff, |next| next.min(self.config.max_backoff));
        Some(delay)
    }

    /// Sleep until the next attempt is due.
    async fn wait(&mut self, hint: Option<Duration>, reason: &str) -> Result<(), KaikoError> {
        let Some(delay) = self.next_delay(hint) else {
            return Err(KaikoError::MaxRetriesExceeded {
                attempts: self.attempts,
            });
        };
        tracing::warn!(
            reason,
            attempt = self.attempts,
            delay_ms = delay.as_millis(),
            "Kaiko request failed, retrying"
        );
        tokio::time::sleep(delay).await;
        Ok(())
    }
}
