//! Process-wide settings, read once from the environment at startup.

use std::path::PathBuf;

use crate::llm::config::{LlmSettings, ProviderKind};
use crate::llm::types::LlmError;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_ENVIRONMENT: &str = "development";
pub const DEFAULT_PROMPTS_DIR: &str = "prompts";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
    #[error(transparent)]
    Llm(#[from] LlmError),
}

impl crate::error::ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidValue { .. } => "E_CONFIG_INVALID",
            Self::Llm(e) => e.error_code(),
        }
    }
}

/// Log verbosity, mapped onto `tracing` levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`.
    #[must_use]
    pub fn as_filter(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(Self::Trace),
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warn),
            "error" | "critical" => Some(Self::Error),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub log_level: LogLevel,
    pub log_format: LogFormat,
    pub prompts_dir: PathBuf,
    pub default_provider: ProviderKind,
    pub llm: LlmSettings,
}

impl Settings {
    /// Read settings from the process environment.
    ///
    /// # Errors
    ///
    /// See [`Settings::from_lookup`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&|key: &str| std::env::var(key).ok())
    }

    /// Build settings from a key lookup.
    ///
    /// Optional (defaults in parentheses): `HOST` (`0.0.0.0`), `PORT` (8000),
    /// `ENVIRONMENT` (`development`), `LOG_LEVEL` (`WARNING`), `LOG_FORMAT`
    /// (`text`), `PROMPTS_DIR` (`prompts`), `DEFAULT_AI_PROVIDER` (`openai`),
    /// plus the provider variables read by [`LlmSettings::from_lookup`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for a malformed port, log level, log format,
    /// default provider or `OpenAI` API mode.
    pub fn from_lookup(get: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match get("PORT") {
            None => DEFAULT_PORT,
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue { key: "PORT", value: raw })?,
        };

        let log_level = match get("LOG_LEVEL") {
            None => LogLevel::Warn,
            Some(raw) => LogLevel::parse(&raw).ok_or(ConfigError::InvalidValue { key: "LOG_LEVEL", value: raw })?,
        };

        let log_format = match get("LOG_FORMAT").as_deref().map(str::trim) {
            None | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => return Err(ConfigError::InvalidValue { key: "LOG_FORMAT", value: other.to_string() }),
        };

        let default_provider = match get("DEFAULT_AI_PROVIDER") {
            None => ProviderKind::OpenAi,
            Some(raw) => raw.trim().parse()?,
        };

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            environment: get("ENVIRONMENT").unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string()),
            log_level,
            log_format,
            prompts_dir: get("PROMPTS_DIR").map_or_else(|| PathBuf::from(DEFAULT_PROMPTS_DIR), PathBuf::from),
            default_provider,
            llm: LlmSettings::from_lookup(get)?,
        })
    }

    /// `host:port` for the listener.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
