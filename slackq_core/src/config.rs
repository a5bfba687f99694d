//! Process configuration, built once at startup and passed by reference.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_API_BASE: &str = "https://slack.com/api";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 10000;

/// How the MCP server talks to its host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transport {
    #[default]
    Stdio,
    Http,
}

impl FromStr for Transport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stdio" => Ok(Transport::Stdio),
            "http" | "streamable-http" => Ok(Transport::Http),
            other => Err(format!("expected 'stdio' or 'http', got '{}'", other)),
        }
    }
}

#[derive(Clone)]
pub struct SlackConfig {
    pub token: String,
    pub api_base: String,
    pub timeout: Duration,
    pub host: String,
    pub port: u16,
    pub transport: Transport,
}

impl fmt::Debug for SlackConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlackConfig")
            .field("token", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("timeout", &self.timeout)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("transport", &self.transport)
            .finish()
    }
}

impl SlackConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: DEFAULT_TIMEOUT,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            transport: Transport::default(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Reads `.env` (if present) and then the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        load_dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let token = get("SLACK_TOKEN").ok_or(ConfigError::Missing("SLACK_TOKEN"))?;
        let mut config = SlackConfig::new(token);

        if let Some(base) = get("SLACK_API_BASE") {
            config.api_base = parse_api_base(&base)?;
        }
        if let Some(secs) = get("SLACK_TIMEOUT_SECS") {
            let secs = secs.parse::<u64>().map_err(|e: std::num::ParseIntError| {
                ConfigError::Invalid {
                    key: "SLACK_TIMEOUT_SECS",
                    reason: e.to_string(),
                }
            })?;
            config.timeout = Duration::from_secs(secs.max(1));
        }
        if let Some(host) = get("HOST") {
            config.host = host;
        }
        if let Some(port) = get("PORT") {
            config.port = port.parse::<u16>().map_err(|e: std::num::ParseIntError| {
                ConfigError::Invalid {
                    key: "PORT",
                    reason: e.to_string(),
                }
            })?;
        }
        if let Some(transport) = get("MCP_TRANSPORT") {
            config.transport = transport
                .parse::<Transport>()
                .map_err(|reason| ConfigError::Invalid {
                    key: "MCP_TRANSPORT",
                    reason,
                })?;
        }

        Ok(config)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Checks that `raw` is an absolute http(s) URL and drops any trailing `/`.
pub fn parse_api_base(raw: &str) -> Result<String, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        key: "SLACK_API_BASE",
        reason,
    };
    let url = url::Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    Ok(raw.trim().trim_end_matches('/').to_string())
}

/// Loads `.env` from the working directory into the process environment.
/// Variables already set win; a missing file is not an error.
pub fn load_dotenv() {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "loaded .env");
    }
}
