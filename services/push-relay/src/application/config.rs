use crate::domain::status::PushStatus;
use anyhow::Context as _;
use anyhow::Result;
use core::fmt;
use std::time::Duration;

/// Process-wide settings, read once at startup and never mutated afterwards.
#[derive(Clone)]
pub struct RelayConfig {
    port: u16,
    push_token: String,
    base_url: String,
    default_up_message: String,
    default_down_message: String,
    timeout: Duration,
}

impl RelayConfig {
    const PORT_ENV_VAR: &str = "PORT";
    const PUSH_TOKEN_ENV_VAR: &str = "KUMA_PUSH_TOKEN";
    const BASE_URL_ENV_VAR: &str = "KUMA_BASE_URL";
    const DEFAULT_UP_MESSAGE_ENV_VAR: &str = "DEFAULT_UP_MSG";
    const DEFAULT_DOWN_MESSAGE_ENV_VAR: &str = "DEFAULT_DOWN_MSG";
    const TIMEOUT_ENV_VAR: &str = "KUMA_TIMEOUT";

    const DEFAULT_PORT: u16 = 8080;
    const DEFAULT_BASE_URL: &str = "http://kuma.local/api/push/";
    const DEFAULT_UP_MESSAGE: &str = "watchtower_ok";
    const DEFAULT_DOWN_MESSAGE: &str = "watchtower_failed";
    const DEFAULT_TIMEOUT_SECS: f64 = 5.0;

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let push_token = lookup(Self::PUSH_TOKEN_ENV_VAR)
            .map(|token| token.trim().to_string())
            .unwrap_or_default();
        if push_token.is_empty() {
            anyhow::bail!("{} is required", Self::PUSH_TOKEN_ENV_VAR);
        }

        let port = match lookup(Self::PORT_ENV_VAR) {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .with_context(|| format!("Invalid {} value '{value}'", Self::PORT_ENV_VAR))?,
            None => Self::DEFAULT_PORT,
        };

        let base_url = Self::normalize_base_url(
            &lookup(Self::BASE_URL_ENV_VAR).unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_string()),
        );

        let timeout = match lookup(Self::TIMEOUT_ENV_VAR) {
            Some(value) => Self::parse_timeout(&value)
                .with_context(|| format!("Invalid {} value '{value}'", Self::TIMEOUT_ENV_VAR))?,
            None => Duration::from_secs_f64(Self::DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            port,
            push_token,
            base_url,
            default_up_message: lookup(Self::DEFAULT_UP_MESSAGE_ENV_VAR)
                .unwrap_or_else(|| Self::DEFAULT_UP_MESSAGE.to_string()),
            default_down_message: lookup(Self::DEFAULT_DOWN_MESSAGE_ENV_VAR)
                .unwrap_or_else(|| Self::DEFAULT_DOWN_MESSAGE.to_string()),
            timeout,
        })
    }

    // Exactly one trailing slash, so the token can be appended as-is
    fn normalize_base_url(base_url: &str) -> String {
        format!("{}/", base_url.trim_end_matches('/'))
    }

    fn parse_timeout(value: &str) -> Result<Duration> {
        let secs = value.trim().parse::<f64>()?;
        if secs <= 0.0 {
            anyhow::bail!("timeout must be greater than zero");
        }

        Ok(Duration::try_from_secs_f64(secs)?)
    }

    pub const fn port(&self) -> u16 {
        self.port
    }

    pub fn push_token(&self) -> &str {
        &self.push_token
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn default_message(&self, status: PushStatus) -> &str {
        match status {
            PushStatus::Up => &self.default_up_message,
            PushStatus::Down => &self.default_down_message,
        }
    }

    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayConfig")
            .field("port", &self.port)
            .field("push_token", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("default_up_message", &self.default_up_message)
            .field("default_down_message", &self.default_down_message)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
impl RelayConfig {
    pub fn for_tests(base_url: &str, timeout: &str) -> Self {
        Self::from_lookup(|key| match key {
            Self::PUSH_TOKEN_ENV_VAR => Some("abc123".to_string()),
            Self::BASE_URL_ENV_VAR => Some(base_url.to_string()),
            Self::TIMEOUT_ENV_VAR => Some(timeout.to_string()),
            _ => None,
        })
        .expect("Invalid test configuration")
    }
}
