//! Exchange configuration parsed from environment variables.
//!
//! The base URL is keyed by runtime platform and resolved once at startup.
//! The resolved value is handed to the client; nothing here is global.

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

pub const DEFAULT_MOBILE_BASE_URL: &str = "http://192.168.21.120:8050";
pub const DEFAULT_BASE_URL: &str = "http://localhost:8050";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Errors produced while building exchange configuration or the client.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    ConfigParse(String),

    /// A base URL is not an absolute http(s) URL.
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Ios,
    Android,
    Default,
}

impl Platform {
    /// Platform of the running binary.
    #[must_use]
    pub fn current() -> Self {
        parse_platform(Some(std::env::consts::OS)).unwrap_or(Self::Default)
    }
}

/// Base URL per platform key, with a default fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformEndpoints {
    pub ios: Option<String>,
    pub android: Option<String>,
    pub default: String,
}

impl Default for PlatformEndpoints {
    fn default() -> Self {
        Self {
            ios: Some(DEFAULT_MOBILE_BASE_URL.to_string()),
            android: Some(DEFAULT_MOBILE_BASE_URL.to_string()),
            default: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl PlatformEndpoints {
    /// Pick the base URL for `platform`, falling back to `default`.
    #[must_use]
    pub fn resolve(&self, platform: Platform) -> &str {
        let keyed = match platform {
            Platform::Ios => self.ios.as_deref(),
            Platform::Android => self.android.as_deref(),
            Platform::Default => None,
        };
        keyed.unwrap_or(&self.default)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeConfig {
    /// Origin plus path prefix, without a trailing slash.
    pub base_url: String,
    pub timeouts: Timeouts,
}

impl ExchangeConfig {
    /// Build a config for an explicit base URL with default timeouts.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an absolute http(s) URL.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self { base_url: normalize_base_url(base_url)?, timeouts: Timeouts::default() })
    }

    /// Build typed exchange config from environment variables.
    ///
    /// Optional:
    /// - `SAYBOX_BASE_URL`: overrides platform selection entirely
    /// - `SAYBOX_PLATFORM`: `ios`, `android` or `default` (detected when absent)
    /// - `SAYBOX_IOS_BASE_URL`, `SAYBOX_ANDROID_BASE_URL`, `SAYBOX_DEFAULT_BASE_URL`
    /// - `SAYBOX_REQUEST_TIMEOUT_SECS`: default 30, must be positive
    /// - `SAYBOX_CONNECT_TIMEOUT_SECS`: default 10, must be positive
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown platform or a malformed base URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with_base_url(None)
    }

    /// Like [`ExchangeConfig::from_env`], but an explicit `base_url` wins over
    /// `SAYBOX_BASE_URL` and platform selection, which is then not consulted.
    ///
    /// # Errors
    ///
    /// Returns an error for a malformed base URL, or an unknown platform when
    /// no base URL is given.
    pub fn from_env_with_base_url(base_url: Option<&str>) -> Result<Self, ConfigError> {
        let raw_base_url = match base_url {
            Some(url) => url.to_string(),
            None => match std::env::var("SAYBOX_BASE_URL") {
                Ok(url) => url,
                Err(_) => {
                    let platform = match std::env::var("SAYBOX_PLATFORM") {
                        Ok(raw) => parse_platform(Some(raw.as_str()))?,
                        Err(_) => Platform::current(),
                    };
                    tracing::debug!(?platform, "selecting base URL by platform");
                    endpoints_from_env().resolve(platform).to_string()
                }
            },
        };

        let timeouts = Timeouts {
            request_secs: env_parse_secs("SAYBOX_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_secs("SAYBOX_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };

        tracing::debug!(base_url = %raw_base_url, "exchange config resolved");
        Ok(Self { base_url: normalize_base_url(&raw_base_url)?, timeouts })
    }

    /// `POST` target for submissions.
    #[must_use]
    pub fn submit_url(&self) -> String {
        format!("{}/api", self.base_url)
    }

    /// `GET` target for the comment list.
    #[must_use]
    pub fn comments_url(&self) -> String {
        format!("{}/api/comments", self.base_url)
    }
}

fn endpoints_from_env() -> PlatformEndpoints {
    let defaults = PlatformEndpoints::default();
    PlatformEndpoints {
        ios: std::env::var("SAYBOX_IOS_BASE_URL").ok().or(defaults.ios),
        android: std::env::var("SAYBOX_ANDROID_BASE_URL").ok().or(defaults.android),
        default: std::env::var("SAYBOX_DEFAULT_BASE_URL").unwrap_or(defaults.default),
    }
}

/// Positive whole seconds from `key`; zero would make every request time out.
fn env_parse_secs(key: &str, default: u64) -> u64 {
    match std::env::var(key).map(|v| v.parse::<u64>()) {
        Ok(Ok(secs)) if secs > 0 => secs,
        _ => default,
    }
}

fn parse_platform(raw: Option<&str>) -> Result<Platform, ConfigError> {
    match raw.unwrap_or("default") {
        "ios" => Ok(Platform::Ios),
        "android" => Ok(Platform::Android),
        "default" | "linux" | "macos" | "windows" => Ok(Platform::Default),
        other => Err(ConfigError::ConfigParse(format!("unknown SAYBOX_PLATFORM: {other}"))),
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = reqwest::Url::parse(trimmed)
        .map_err(|e| ConfigError::InvalidBaseUrl { url: raw.to_string(), reason: e.to_string() })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }
    Ok(trimmed.to_string())
}
