use std::time::Duration;

use log::*;
use mkt_common::{helpers::parse_env_var, Secret};

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct MarketplaceConfig {
    /// Base URL of the REST API, without a trailing slash
    pub api_url: String,
    /// The buyer's bearer token. Empty when the session is anonymous.
    pub access_token: Secret<String>,
    pub timeout: Duration,
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            access_token: Secret::default(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl MarketplaceConfig {
    pub fn new<S: Into<String>>(api_url: S, access_token: Secret<String>) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self { api_url, access_token, ..Default::default() }
    }

    pub fn new_from_env_or_default() -> Self {
        let api_url = std::env::var("MKT_API_URL").unwrap_or_else(|_| {
            warn!("🪛️ MKT_API_URL not set, using {DEFAULT_API_URL} as default");
            DEFAULT_API_URL.to_string()
        });
        let access_token = Secret::new(std::env::var("MKT_API_ACCESS_TOKEN").unwrap_or_else(|_| {
            warn!("🪛️ MKT_API_ACCESS_TOKEN not set. Requests will be sent without credentials");
            String::default()
        }));
        let timeout = match parse_env_var::<u64>("MKT_API_TIMEOUT_SECS") {
            Some(Ok(secs)) => Duration::from_secs(secs),
            Some(Err(raw)) => {
                warn!("🪛️ MKT_API_TIMEOUT_SECS is not a number of seconds ({raw}). Using {DEFAULT_TIMEOUT_SECS}s");
                Duration::from_secs(DEFAULT_TIMEOUT_SECS)
            },
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };
        let mut config = Self::new(api_url, access_token);
        config.timeout = timeout;
        config
    }

    pub fn has_credentials(&self) -> bool {
        !self.access_token.reveal().trim().is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn trailing_slashes_are_dropped() {
        let config = MarketplaceConfig::new("https://shop.example.vn/api/", Secret::new("t0k3n".to_string()));
        assert_eq!(config.api_url, "https://shop.example.vn/api");
        assert!(config.has_credentials());
        assert!(!MarketplaceConfig::default().has_credentials());
    }
}
