use std::env;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::types::{AppError, AppResult, LLMProvider};

pub const DEFAULT_MODEL: &str = "llama3-8b-8192";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LLMConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub cors_allowed_origins: Vec<String>,
    pub max_upload_bytes: usize,
}

#[derive(Clone, Deserialize)]
pub struct LLMConfig {
    pub provider: LLMProvider,
    pub api_key: String,
    pub model: String,
    pub api_base: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub concurrency: usize,
}

// Keep the credential out of startup logs.
impl std::fmt::Debug for LLMConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LLMConfig")
            .field("provider", &self.provider)
            .field("api_key", &"***")
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("concurrency", &self.concurrency)
            .finish()
    }
}

impl LLMConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("GROQ_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                AppError::Configuration("GROQ_API_KEY environment variable is not set.".to_string())
            })?;

        let provider = LLMProvider::parse(
            &lookup("LLM_PROVIDER").unwrap_or_else(|| "groq".to_string()),
        )?;

        let concurrency: usize = parse_var(&lookup, "CLASSIFY_CONCURRENCY", 1)?;
        if concurrency == 0 {
            return Err(AppError::Configuration(
                "CLASSIFY_CONCURRENCY must be at least 1".to_string(),
            ));
        }

        let request_timeout_secs = match lookup("LLM_REQUEST_TIMEOUT_SECS") {
            Some(raw) => Some(parse_value::<u64>("LLM_REQUEST_TIMEOUT_SECS", &raw)?),
            None => None,
        };

        Ok(Self {
            server: ServerConfig {
                port: parse_var(&lookup, "PORT", 5000)?,
                host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                cors_allowed_origins: lookup("ALLOWED_ORIGINS")
                    .unwrap_or_else(|| "*".to_string())
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
                max_upload_bytes: parse_var(&lookup, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            },
            llm: LLMConfig {
                provider,
                api_key,
                model: lookup("LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                api_base: lookup("LLM_API_BASE").filter(|s| !s.trim().is_empty()),
                request_timeout_secs,
                concurrency,
            },
        })
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> AppResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => parse_value(key, &raw),
        None => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> AppResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| AppError::Configuration(format!("Invalid value for {}: {}", key, e)))
}
