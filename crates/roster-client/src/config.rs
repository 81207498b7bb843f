//! Client configuration.
//!
//! The only external surface is the API base URL, resolved with precedence:
//! environment > explicit override > built-in default.

use anyhow::{Context, Result};

/// Environment variable overriding the API base URL.
pub const BASE_URL_ENV: &str = "ROSTER_API_URL";

/// Default base URL for a local development backend.
pub const DEFAULT_BASE_URL: &str = "http://localhost:4099/api";

/// Configuration for an [`ApiClient`](crate::ApiClient).
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL every request path is appended to; no trailing slash.
    pub base_url: String,
}

impl ApiConfig {
    /// Resolves the configuration from the environment.
    ///
    /// Base URL resolution order:
    /// 1. `ROSTER_API_URL` env var (if set and non-empty)
    /// 2. `override_base_url` parameter (if Some and non-empty)
    /// 3. Default: `http://localhost:4099/api`
    ///
    /// # Errors
    /// Returns an error if the winning value is not a well-formed URL.
    pub fn from_env(override_base_url: Option<&str>) -> Result<Self> {
        let env_value = std::env::var(BASE_URL_ENV).ok();
        let base_url = resolve_base_url(env_value.as_deref(), override_base_url)?;
        Ok(Self { base_url })
    }

    /// Builds a configuration from an explicit base URL, ignoring the
    /// environment. Intended for tests and embedded setups.
    ///
    /// # Errors
    /// Returns an error if `base_url` is not a well-formed URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        validate_url(&base_url)?;
        Ok(Self {
            base_url: normalize(&base_url),
        })
    }
}

/// Picks the base URL with precedence env > override > default.
fn resolve_base_url(env_value: Option<&str>, override_value: Option<&str>) -> Result<String> {
    if let Some(env_url) = env_value {
        let trimmed = env_url.trim();
        if !trimmed.is_empty() {
            validate_url(trimmed)?;
            return Ok(normalize(trimmed));
        }
    }

    if let Some(override_url) = override_value {
        let trimmed = override_url.trim();
        if !trimmed.is_empty() {
            validate_url(trimmed)?;
            return Ok(normalize(trimmed));
        }
    }

    Ok(DEFAULT_BASE_URL.to_string())
}

/// Validates that a URL is well-formed.
fn validate_url(base_url: &str) -> Result<()> {
    url::Url::parse(base_url).with_context(|| format!("Invalid API base URL: {base_url}"))?;
    Ok(())
}

/// Strips trailing slashes so request paths (which start with `/`) join cleanly.
fn normalize(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test: with nothing set, the built-in default wins.
    #[test]
    fn test_resolve_defaults_when_unset() {
        let resolved = resolve_base_url(None, None).unwrap();
        assert_eq!(resolved, DEFAULT_BASE_URL);
    }

    /// Test: the environment beats an explicit override.
    #[test]
    fn test_resolve_env_beats_override() {
        let resolved =
            resolve_base_url(Some("https://env.example.com/api"), Some("https://cfg.example.com"))
                .unwrap();
        assert_eq!(resolved, "https://env.example.com/api");
    }

    /// Test: an empty environment value falls through to the override.
    #[test]
    fn test_resolve_blank_env_falls_through() {
        let resolved = resolve_base_url(Some("   "), Some("https://cfg.example.com/api/")).unwrap();
        assert_eq!(resolved, "https://cfg.example.com/api");
    }

    /// Test: trailing slashes are trimmed so paths join without doubling.
    #[test]
    fn test_resolve_trims_trailing_slash() {
        let resolved = resolve_base_url(Some("http://10.0.0.5:4099/api/"), None).unwrap();
        assert_eq!(resolved, "http://10.0.0.5:4099/api");
    }

    /// Test: a malformed URL is rejected instead of silently kept.
    #[test]
    fn test_resolve_rejects_invalid_url() {
        let err = resolve_base_url(Some("not a url"), None).unwrap_err();
        assert!(err.to_string().contains("Invalid API base URL"));
    }

    /// Test: explicit construction bypasses the environment entirely.
    #[test]
    fn test_with_base_url() {
        let config = ApiConfig::with_base_url("http://127.0.0.1:8080/").unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:8080");
    }
}
