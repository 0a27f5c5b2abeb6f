// src/config.rs
use std::time::Duration;

use reqwest::Url;

use crate::error::ConfigError;

pub const DEFAULT_API_URL: &str = "/api";
pub const DEFAULT_ORIGIN: &str = "http://localhost:3000";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

const API_URL_VAR: &str = "CHATBOT_API_URL";
const ORIGIN_VAR: &str = "CHATBOT_ORIGIN";
const TIMEOUT_VAR: &str = "CHATBOT_TIMEOUT_SECS";
const HEALTH_TIMEOUT_VAR: &str = "CHATBOT_HEALTH_TIMEOUT_SECS";

/// Resolved once at startup; the transport never re-reads the environment.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub base_url: Url,
    pub request_timeout: Duration,
    pub health_timeout: Duration,
}

impl TransportConfig {
    /// Config for `base_url` with default timeouts. Relative paths resolve against
    /// [`DEFAULT_ORIGIN`].
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: resolve_base_url(base_url, DEFAULT_ORIGIN)?,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            health_timeout: DEFAULT_HEALTH_TIMEOUT,
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url =
            non_blank(lookup(API_URL_VAR)).unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let origin = non_blank(lookup(ORIGIN_VAR)).unwrap_or_else(|| DEFAULT_ORIGIN.to_string());

        Ok(Self {
            base_url: resolve_base_url(&api_url, &origin)?,
            request_timeout: parse_timeout(
                TIMEOUT_VAR,
                lookup(TIMEOUT_VAR),
                DEFAULT_REQUEST_TIMEOUT,
            )?,
            health_timeout: parse_timeout(
                HEALTH_TIMEOUT_VAR,
                lookup(HEALTH_TIMEOUT_VAR),
                DEFAULT_HEALTH_TIMEOUT,
            )?,
        })
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_health_timeout(mut self, timeout: Duration) -> Self {
        self.health_timeout = timeout;
        self
    }

    /// `<base>/<path>` with no doubled slashes.
    pub fn endpoint(&self, path: &str) -> Result<Url, ConfigError> {
        let raw = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl {
            url: raw,
            reason: e.to_string(),
        })
    }
}

// A relative base such as "/api" is joined onto the origin.
fn resolve_base_url(api_url: &str, origin: &str) -> Result<Url, ConfigError> {
    let invalid = |url: &str, reason: String| ConfigError::InvalidUrl {
        url: url.to_string(),
        reason,
    };

    let url = match Url::parse(api_url) {
        Ok(url) => url,
        Err(parse_err) => {
            let origin_url = Url::parse(origin).map_err(|e| invalid(origin, e.to_string()))?;
            origin_url
                .join(api_url)
                .map_err(|_| invalid(api_url, parse_err.to_string()))?
        }
    };
    check_scheme(url, api_url)
}

fn check_scheme(url: Url, raw: &str) -> Result<Url, ConfigError> {
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme `{other}`"),
        }),
    }
}

fn parse_timeout(
    key: &'static str,
    value: Option<String>,
    default: Duration,
) -> Result<Duration, ConfigError> {
    let Some(value) = non_blank(value) else {
        return Ok(default);
    };
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidTimeout { key, value }),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn defaults_resolve_api_path_against_origin() {
        let config = TransportConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.base_url.as_str(), "http://localhost:3000/api");
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
        assert_eq!(config.health_timeout, DEFAULT_HEALTH_TIMEOUT);
    }

    #[test]
    fn absolute_api_url_ignores_origin() {
        let config = TransportConfig::from_lookup(lookup_from(&[
            ("CHATBOT_API_URL", "http://127.0.0.1:5000"),
            ("CHATBOT_ORIGIN", "http://example.com"),
        ]))
        .unwrap();
        assert_eq!(config.endpoint("chat").unwrap().as_str(), "http://127.0.0.1:5000/chat");
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = TransportConfig::from_lookup(lookup_from(&[
            ("CHATBOT_API_URL", "   "),
            ("CHATBOT_TIMEOUT_SECS", ""),
        ]))
        .unwrap();
        assert_eq!(config.base_url.as_str(), "http://localhost:3000/api");
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
    }

    #[test]
    fn trailing_slashes_do_not_double_up() {
        let config = TransportConfig::new("http://localhost:5000/api///").unwrap();
        assert_eq!(
            config.endpoint("/health").unwrap().as_str(),
            "http://localhost:5000/api/health"
        );
    }

    #[test]
    fn custom_origin_for_relative_path() {
        let config = TransportConfig::from_lookup(lookup_from(&[
            ("CHATBOT_API_URL", "/backend"),
            ("CHATBOT_ORIGIN", "https://chat.example.org"),
        ]))
        .unwrap();
        assert_eq!(
            config.endpoint("chat").unwrap().as_str(),
            "https://chat.example.org/backend/chat"
        );
    }

    #[test]
    fn relative_path_with_url_in_query_stays_relative() {
        let config = TransportConfig::from_lookup(lookup_from(&[(
            "CHATBOT_API_URL",
            "/proxy?u=http://x",
        )]))
        .unwrap();
        assert_eq!(config.base_url.as_str(), "http://localhost:3000/proxy?u=http://x");
    }

    #[test]
    fn timeouts_are_parsed_in_seconds() {
        let config = TransportConfig::from_lookup(lookup_from(&[
            ("CHATBOT_TIMEOUT_SECS", "15"),
            ("CHATBOT_HEALTH_TIMEOUT_SECS", " 2 "),
        ]))
        .unwrap();
        assert_eq!(config.request_timeout, Duration::from_secs(15));
        assert_eq!(config.health_timeout, Duration::from_secs(2));
    }

    #[test]
    fn rejects_zero_or_garbage_timeouts() {
        for bad in ["0", "-3", "soon"] {
            let err = TransportConfig::from_lookup(lookup_from(&[("CHATBOT_TIMEOUT_SECS", bad)]))
                .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidTimeout { key: "CHATBOT_TIMEOUT_SECS", .. }));
        }
    }

    #[test]
    fn rejects_non_http_schemes_and_bad_origins() {
        assert!(matches!(
            TransportConfig::new("ftp://files.example.com"),
            Err(ConfigError::InvalidUrl { .. })
        ));
        assert!(matches!(
            TransportConfig::from_lookup(lookup_from(&[("CHATBOT_ORIGIN", "not a url")])),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }
}
