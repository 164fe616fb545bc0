//! Runtime configuration read from the environment

use crate::dst::ExtractionSettings;
use crate::llm::{LlmError, LlmService, LoggingService, OpenAIService};
use crate::retry::{RetryPolicy, DEFAULT_BASE_DELAY, DEFAULT_MAX_ATTEMPTS};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_MODEL: &str = "gpt-5-chat-latest";

/// Key sent when a gateway injects credentials on our behalf
const GATEWAY_API_KEY: &str = "implicit";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?} ({reason})")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
    #[error("OPENAI_API_KEY is not set and no LLM_GATEWAY is configured")]
    MissingApiKey,
    #[error("Failed to create LLM client: {0}")]
    Client(#[from] LlmError),
}

/// Configuration for the extraction model
#[derive(Debug, Clone, Default)]
pub struct LlmConfig {
    pub openai_api_key: Option<String>,
    /// Gateway base URL (e.g., `http://169.254.169.254/gateway/llm`)
    pub gateway: Option<String>,
    pub model: Option<String>,
}

impl LlmConfig {
    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub llm: LlmConfig,
    pub retry: RetryPolicy,
    pub extraction: ExtractionSettings,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let llm = LlmConfig {
            openai_api_key: var("OPENAI_API_KEY"),
            gateway: var("LLM_GATEWAY"),
            model: var("DST_MODEL"),
        };

        let max_attempts = parse_var(&var, "DST_MAX_ATTEMPTS")?.unwrap_or(DEFAULT_MAX_ATTEMPTS);
        if max_attempts == 0 {
            return Err(ConfigError::Invalid {
                name: "DST_MAX_ATTEMPTS",
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        let base_delay = parse_var::<u64>(&var, "DST_RETRY_BASE_MS")?
            .map_or(DEFAULT_BASE_DELAY, Duration::from_millis);

        let defaults = ExtractionSettings::default();
        let extraction = ExtractionSettings {
            temperature: parse_var(&var, "DST_TEMPERATURE")?.unwrap_or(defaults.temperature),
            max_tokens: parse_var(&var, "DST_MAX_TOKENS")?.unwrap_or(defaults.max_tokens),
        };

        Ok(Self {
            llm,
            retry: RetryPolicy::new(max_attempts, base_delay),
            extraction,
        })
    }

    /// Create the logged model client this configuration describes
    pub fn build_service(&self) -> Result<Arc<dyn LlmService>, ConfigError> {
        let api_key = match (&self.llm.gateway, &self.llm.openai_api_key) {
            (Some(_), _) => GATEWAY_API_KEY.to_string(),
            (None, Some(key)) => key.clone(),
            (None, None) => return Err(ConfigError::MissingApiKey),
        };

        let service = OpenAIService::new(api_key, self.llm.model(), self.llm.gateway.as_deref())?;
        tracing::info!(
            model = %self.llm.model(),
            gateway = self.llm.gateway.is_some(),
            "Configured extraction model"
        );
        Ok(Arc::new(LoggingService::new(Arc::new(service))))
    }
}

fn parse_var<T>(
    var: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    var(name)
        .map(|raw| {
            raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
                name,
                value: raw.clone(),
                reason: e.to_string(),
            })
        })
        .transpose()
}
