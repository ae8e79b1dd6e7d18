//! Configuration types.

use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Client configuration for the portal backend.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    /// Base URL every endpoint path is appended to (no trailing slash).
    pub api_base_url: String,
    /// Fixed client-side timeout. Requests exceeding it surface as timeouts.
    pub request_timeout: Duration,
    /// Bearer token sent with every request, if signed in ahead of time.
    pub auth_token: Option<SecretString>,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000/api".to_string(),
            request_timeout: Duration::from_secs(30),
            auth_token: None,
        }
    }
}

impl PortalConfig {
    /// Build the configuration from `PORTAL_*` environment variables,
    /// falling back to defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reads through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_base_url = match lookup("PORTAL_API_BASE_URL").filter(|s| !s.trim().is_empty()) {
            Some(url) => {
                let url = url.trim().trim_end_matches('/').to_string();
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    return Err(ConfigError::InvalidValue {
                        key: "PORTAL_API_BASE_URL".into(),
                        message: "must start with http:// or https://".into(),
                    });
                }
                url
            }
            None => defaults.api_base_url,
        };

        let request_timeout = match lookup("PORTAL_REQUEST_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                    key: "PORTAL_REQUEST_TIMEOUT_SECS".into(),
                    message: format!("expected a whole number of seconds, got {raw:?}"),
                })?;
                if secs == 0 {
                    return Err(ConfigError::InvalidValue {
                        key: "PORTAL_REQUEST_TIMEOUT_SECS".into(),
                        message: "must be greater than zero".into(),
                    });
                }
                Duration::from_secs(secs)
            }
            None => defaults.request_timeout,
        };

        let auth_token = lookup("PORTAL_AUTH_TOKEN")
            .filter(|s| !s.trim().is_empty())
            .map(SecretString::from);

        tracing::debug!(
            base_url = %api_base_url,
            timeout_secs = request_timeout.as_secs(),
            has_token = auth_token.is_some(),
            "Portal configuration loaded"
        );

        Ok(Self {
            api_base_url,
            request_timeout,
            auth_token,
        })
    }
}
