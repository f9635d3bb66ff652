//! Transport-level retry with exponential backoff.
//!
//! Retries are a property of the HTTP transport configured once at build
//! time. The protocol operations never loop on their own; they see either
//! the first usable response or the last one after retries ran out.
//!
//! Only the idempotent accounts GET goes through here. The single-use claim
//! POST is sent once.

use std::future::Future;
use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the initial attempt. `0` disables retrying.
    pub max_retries: u32,
    /// Delay before the first retry; doubles for each subsequent one.
    pub base_delay: Duration,
    /// Upper bound on any single delay.
    pub max_delay: Duration,
    /// Apply random jitter to each delay.
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 1,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
            jitter: true,
        }
    }
}

impl RetryConfig {
    /// A policy that never retries.
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Exponential backoff with the given retry budget.
    pub fn exponential(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    fn to_backoff_builder(&self) -> ExponentialBuilder {
        let builder = ExponentialBuilder::default()
            .with_min_delay(self.base_delay)
            .with_max_delay(self.max_delay)
            .with_max_times(self.max_retries as usize);

        if self.jitter {
            builder.with_jitter()
        } else {
            builder
        }
    }
}

/// 408, 429 and every 5xx are worth another attempt.
pub fn is_retryable_status(status: u16) -> bool {
    status == 408 || status == 429 || (500..600).contains(&status)
}

fn is_retryable_transport(err: &reqwest::Error) -> bool {
    err.is_connect() || err.is_timeout() || err.is_request()
}

/// Outcome of one attempt that may deserve a retry.
enum Attempt {
    Transport(reqwest::Error),
    Status(reqwest::Response),
}

impl Attempt {
    fn is_retryable(&self) -> bool {
        match self {
            Attempt::Transport(e) => is_retryable_transport(e),
            Attempt::Status(_) => true,
        }
    }
}

/// Send a request, retrying transient failures per `config`.
///
/// `send` is invoked once per attempt and must build a fresh request each
/// time. A retryable status that persists is handed back as `Ok`, so the
/// caller maps it like any other response.
pub(crate) async fn send_with_retry<F, Fut>(
    config: &RetryConfig,
    mut send: F,
) -> Result<reqwest::Response, reqwest::Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<reqwest::Response, reqwest::Error>>,
{
    let attempt = || {
        let pending = send();
        async move {
            match pending.await {
                Ok(response) if is_retryable_status(response.status().as_u16()) => {
                    Err(Attempt::Status(response))
                }
                Ok(response) => Ok(response),
                Err(e) => Err(Attempt::Transport(e)),
            }
        }
    };

    let result = attempt
        .retry(config.to_backoff_builder())
        .when(Attempt::is_retryable)
        .notify(|attempt: &Attempt, delay: Duration| match attempt {
            Attempt::Transport(e) => {
                tracing::warn!(error = %e, ?delay, "Request failed, retrying");
            }
            Attempt::Status(response) => {
                tracing::warn!(status = %response.status(), ?delay, "Retryable status, retrying");
            }
        })
        .await;

    match result {
        Ok(response) => Ok(response),
        Err(Attempt::Status(response)) => Ok(response),
        Err(Attempt::Transport(e)) => Err(e),
    }
}
