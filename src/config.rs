use std::time::Duration;

use crate::error::BreweryError;

pub const DEFAULT_BASE_URL: &str = "https://api.openbrewerydb.org/v1/breweries";
pub const DEFAULT_ACCEPT: &str = "application/json, text/html;q=0.9, */*;q=0.8";

pub const ENV_BASE_URL: &str = "BREWCLI_BASE_URL";
pub const ENV_USER_AGENT: &str = "BREWCLI_USER_AGENT";
pub const ENV_TIMEOUT_SECS: &str = "BREWCLI_TIMEOUT_SECS";

/// Connection settings for a [`BreweryClient`](crate::BreweryClient).
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the breweries endpoint.
    pub base_url: String,
    pub user_agent: String,
    pub accept: String,
    /// Per-request timeout. `None` leaves reqwest's default in place.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: format!("brewcli/{}", env!("CARGO_PKG_VERSION")),
            accept: DEFAULT_ACCEPT.to_string(),
            timeout: None,
        }
    }
}

impl ClientConfig {
    /// Defaults overlaid with `BREWCLI_BASE_URL`, `BREWCLI_USER_AGENT` and
    /// `BREWCLI_TIMEOUT_SECS` from the process environment.
    pub fn from_env() -> Result<Self, BreweryError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    // Split out so tests don't have to mutate the process environment.
    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, BreweryError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(base_url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            config.base_url = base_url;
        }
        if let Some(user_agent) = lookup(ENV_USER_AGENT).filter(|v| !v.trim().is_empty()) {
            config.user_agent = user_agent;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                BreweryError::invalid(
                    ENV_TIMEOUT_SECS,
                    format!("'{}' is not a whole number of seconds", raw),
                )
            })?;
            config.timeout = Some(Duration::from_secs(secs));
        }
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
