use anyhow::{Context, Result};
use std::time::Duration;

/// Production API base URL, used when no override is supplied
const DEFAULT_BASE_URL: &str = "https://api.medibook.health";

/// Client configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// API base URL, no trailing slash
    pub base_url: String,

    /// TCP connect timeout
    pub connect_timeout: Duration,

    /// Whole-request timeout
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl Config {
    /// Create a configuration for the given API base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(base_url.into()),
            ..Self::default()
        }
    }

    /// Load configuration from the environment with priority: ENV > defaults
    pub fn load() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let config = Config {
            base_url: std::env::var("MEDIBOOK_API_URL")
                .map(normalize_base_url)
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),

            connect_timeout: Duration::from_secs(
                std::env::var("MEDIBOOK_CONNECT_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(10),
            ),

            request_timeout: Duration::from_secs(
                std::env::var("MEDIBOOK_REQUEST_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            anyhow::bail!("MEDIBOOK_API_URL must start with http:// or https://");
        }

        reqwest::Url::parse(&self.base_url)
            .with_context(|| format!("Invalid API base URL: {}", self.base_url))?;

        Ok(())
    }

    /// Join a request path onto the base URL; `path` must start with `/`
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Strip trailing slashes so endpoint joining stays predictable
fn normalize_base_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("https://api.medibook.health/".to_string()),
            "https://api.medibook.health"
        );
        assert_eq!(
            normalize_base_url("https://api.medibook.health".to_string()),
            "https://api.medibook.health"
        );
    }

    #[test]
    fn test_endpoint_join() {
        let config = Config::new("https://staging.medibook.health/");
        assert_eq!(
            config.endpoint("/users/refresh-token"),
            "https://staging.medibook.health/users/refresh-token"
        );
    }

    #[test]
    fn test_validate_rejects_bad_scheme() {
        let config = Config::new("ftp://api.medibook.health");
        assert!(config.validate().is_err());

        let config = Config::new("api.medibook.health");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_default() {
        assert!(Config::default().validate().is_ok());
    }
}
