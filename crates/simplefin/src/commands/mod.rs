//! CLI command handlers.

pub mod accounts;
pub mod claim;

use std::time::Duration;

use anyhow::{Context as _, Result, anyhow};
use simplefin_client::{AccessUrl, RetryConfig, SimplefinClient};

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Raw access URL from the flag or environment.
    pub access_url: Option<String>,
    /// Output as JSON for scripting.
    pub json_output: bool,
    /// Verbose output enabled.
    pub verbose: bool,
    /// Total request timeout.
    pub timeout: Duration,
    /// Transport retries.
    pub retries: u32,
}

impl Context {
    /// Build a client from the global flags.
    pub fn client(&self) -> Result<SimplefinClient> {
        let retry = if self.retries == 0 {
            RetryConfig::disabled()
        } else {
            RetryConfig::exponential(self.retries)
        };

        SimplefinClient::builder()
            .timeout(self.timeout)
            .retry(retry)
            .build()
            .context("Failed to build HTTP client")
    }

    /// Resolve the access URL, or the demo account when asked for it.
    pub fn resolve_access_url(&self, demo: bool) -> Result<AccessUrl> {
        if demo {
            return Ok(AccessUrl::demo());
        }

        let raw = self.access_url.as_deref().ok_or_else(|| {
            anyhow!("No access URL. Pass --access-url, set SIMPLEFIN_ACCESS_URL, or use --demo")
        })?;
        AccessUrl::parse(raw).context("Invalid access URL")
    }
}
