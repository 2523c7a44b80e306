//! Client configuration: API key, target environment and transport settings

use crate::{NowPaymentsError, Result};
use regex::Regex;
use std::env;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use std::time::Duration;

/// Production API base
pub const PRODUCTION_URL: &str = "https://api.nowpayments.io";
/// Sandbox API base
pub const SANDBOX_URL: &str = "https://api-sandbox.nowpayments.io";
/// API version segment appended to every base
pub const API_VERSION_PATH: &str = "v1";
/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// User agent sent with every request
pub const DEFAULT_USER_AGENT: &str = concat!("nowpayments-rs/", env!("CARGO_PKG_VERSION"));

/// Environment variable holding the API key
pub const ENV_API_KEY: &str = "NOWPAYMENTS_API_KEY";
/// Environment variable selecting the sandbox (`1`/`true`/`yes`)
pub const ENV_SANDBOX: &str = "NOWPAYMENTS_SANDBOX";
/// Environment variable enabling debug mode (`1`/`true`/`yes`)
pub const ENV_DEBUG: &str = "NOWPAYMENTS_DEBUG";
/// Environment variable overriding the request timeout, in seconds
pub const ENV_TIMEOUT_SECS: &str = "NOWPAYMENTS_TIMEOUT_SECS";

static KEY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9]{7}-[A-Za-z0-9]{7}-[A-Za-z0-9]{7}-[A-Za-z0-9]{7}$")
        .expect("key pattern is a valid regex")
});

/// A NOWPayments API key, validated on construction
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Validate and wrap a key
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        if !KEY_PATTERN.is_match(&key) {
            return Err(NowPaymentsError::InvalidKeyFormat);
        }
        Ok(Self(key))
    }

    /// The raw key, as sent in the `x-api-key` header
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// First group only, for logs and debug output
    pub fn masked(&self) -> String {
        let head = self.0.split('-').next().unwrap_or_default();
        format!("{head}-*******-*******-*******")
    }
}

impl FromStr for ApiKey {
    type Err = NowPaymentsError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ApiKey").field(&self.masked()).finish()
    }
}

/// Which API deployment the client talks to
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Production,
    Sandbox,
    /// Any other host serving the same API, e.g. a local mock server
    Custom(String),
}

impl Environment {
    pub fn from_sandbox_flag(sandbox: bool) -> Self {
        if sandbox {
            Environment::Sandbox
        } else {
            Environment::Production
        }
    }

    /// Scheme and host, without the version segment
    pub fn base_url(&self) -> &str {
        match self {
            Environment::Production => PRODUCTION_URL,
            Environment::Sandbox => SANDBOX_URL,
            Environment::Custom(url) => url.trim_end_matches('/'),
        }
    }

    pub fn is_sandbox(&self) -> bool {
        matches!(self, Environment::Sandbox)
    }

    /// Join an endpoint path onto `{base}/v1/`
    pub fn resolve_url(&self, endpoint_path: &str) -> String {
        format!("{}/{}/{}", self.base_url(), API_VERSION_PATH, endpoint_path)
    }
}

/// Everything a client needs; read-only once the client is built
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Credentials sent as `x-api-key`
    pub api_key: ApiKey,
    /// Target deployment
    pub environment: Environment,
    /// Return resolved URLs instead of sending requests
    pub debug_mode: bool,
    /// Per-request timeout; `None` waits indefinitely
    pub timeout: Option<Duration>,
    /// `User-Agent` header value
    pub user_agent: String,
}

impl ClientConfig {
    /// Create a production config for the given key
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            api_key: ApiKey::new(api_key)?,
            environment: Environment::Production,
            debug_mode: false,
            timeout: Some(DEFAULT_TIMEOUT),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        })
    }

    /// Load from `NOWPAYMENTS_*` environment variables
    pub fn from_env() -> Result<Self> {
        let key = env::var(ENV_API_KEY)
            .map_err(|_| NowPaymentsError::config(format!("{ENV_API_KEY} must be set")))?;

        let mut config = Self::new(key)?
            .with_environment(Environment::from_sandbox_flag(env_flag(ENV_SANDBOX)?))
            .with_debug_mode(env_flag(ENV_DEBUG)?);

        if let Ok(raw) = env::var(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                NowPaymentsError::config(format!(
                    "{ENV_TIMEOUT_SECS} must be a whole number of seconds, got {raw:?}"
                ))
            })?;
            config = config.with_timeout(Duration::from_secs(secs));
        }

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if let Environment::Custom(url) = &self.environment {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(NowPaymentsError::config(
                    "Custom base URL must start with http:// or https://",
                ));
            }
        }

        if self.user_agent.trim().is_empty() {
            return Err(NowPaymentsError::config("User agent cannot be empty"));
        }

        if self.timeout == Some(Duration::ZERO) {
            return Err(NowPaymentsError::config("Timeout must be greater than zero"));
        }

        Ok(())
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_sandbox(self, sandbox: bool) -> Self {
        self.with_environment(Environment::from_sandbox_flag(sandbox))
    }

    pub fn with_debug_mode(mut self, debug_mode: bool) -> Self {
        self.debug_mode = debug_mode;
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Let requests run without a client-side deadline
    pub fn without_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

fn env_flag(name: &str) -> Result<bool> {
    let Ok(raw) = env::var(name) else {
        return Ok(false);
    };

    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "false" | "no" | "off" => Ok(false),
        "1" | "true" | "yes" | "on" => Ok(true),
        _ => Err(NowPaymentsError::config(format!(
            "{name} must be a boolean flag, got {raw:?}"
        ))),
    }
}
