//! Process configuration
//!
//! All settings come from environment variables. Required settings are
//! validated together so a misconfigured deployment reports every missing
//! variable at once instead of failing one restart at a time.

use std::time::Duration;
use thiserror::Error;

const DEFAULT_DEPLOYMENT: &str = "gpt-4o";
const DEFAULT_API_VERSION: &str = "2024-02-01";
const DEFAULT_LLM_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variables: {}", .0.join(", "))]
    MissingVars(Vec<&'static str>),
    #[error("Invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Telegram transport settings
#[derive(Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
}

/// Azure `OpenAI` backend settings
#[derive(Clone)]
pub struct AzureConfig {
    pub endpoint: String,
    pub api_key: String,
    pub deployment: String,
    pub api_version: String,
    pub timeout: Duration,
}

#[derive(Clone)]
pub struct Config {
    pub telegram: TelegramConfig,
    pub azure: AzureConfig,
}

// Secrets stay out of logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("azure_endpoint", &self.azure.endpoint)
            .field("azure_deployment", &self.azure.deployment)
            .field("azure_api_version", &self.azure.api_version)
            .field("llm_timeout", &self.azure.timeout)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    ///
    /// Blank values are treated the same as unset ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let bot_token = get("BOT_TOKEN");
        let endpoint = get("AZURE_OPENAI_ENDPOINT");
        let api_key = get("AZURE_OPENAI_KEY");

        let mut missing = Vec::new();
        if bot_token.is_none() {
            missing.push("BOT_TOKEN");
        }
        if endpoint.is_none() {
            missing.push("AZURE_OPENAI_ENDPOINT");
        }
        if api_key.is_none() {
            missing.push("AZURE_OPENAI_KEY");
        }

        let (Some(bot_token), Some(endpoint), Some(api_key)) = (bot_token, endpoint, api_key)
        else {
            return Err(ConfigError::MissingVars(missing));
        };

        let timeout_secs = match get("LLM_TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(0) => {
                    return Err(ConfigError::Invalid {
                        var: "LLM_TIMEOUT_SECS",
                        reason: "must be greater than zero".to_string(),
                    })
                }
                Ok(secs) => secs,
                Err(e) => {
                    return Err(ConfigError::Invalid {
                        var: "LLM_TIMEOUT_SECS",
                        reason: e.to_string(),
                    })
                }
            },
            None => DEFAULT_LLM_TIMEOUT_SECS,
        };

        Ok(Self {
            telegram: TelegramConfig { bot_token },
            azure: AzureConfig {
                endpoint,
                api_key,
                deployment: get("AZURE_OPENAI_DEPLOYMENT")
                    .unwrap_or_else(|| DEFAULT_DEPLOYMENT.to_string()),
                api_version: get("AZURE_OPENAI_API_VERSION")
                    .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
                timeout: Duration::from_secs(timeout_secs),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    const REQUIRED: &[(&str, &str)] = &[
        ("BOT_TOKEN", "123:abc"),
        ("AZURE_OPENAI_ENDPOINT", "https://example.openai.azure.com/"),
        ("AZURE_OPENAI_KEY", "secret"),
    ];

    #[test]
    fn test_required_vars_with_defaults() {
        let config = Config::from_lookup(lookup(REQUIRED)).unwrap();
        assert_eq!(config.telegram.bot_token, "123:abc");
        assert_eq!(config.azure.endpoint, "https://example.openai.azure.com/");
        assert_eq!(config.azure.deployment, "gpt-4o");
        assert_eq!(config.azure.api_version, "2024-02-01");
        assert_eq!(config.azure.timeout, Duration::from_secs(120));
    }

    #[test]
    fn test_all_missing_reported_together() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingVars(vec![
                "BOT_TOKEN",
                "AZURE_OPENAI_ENDPOINT",
                "AZURE_OPENAI_KEY"
            ])
        );
        assert_eq!(
            err.to_string(),
            "Missing required environment variables: BOT_TOKEN, AZURE_OPENAI_ENDPOINT, AZURE_OPENAI_KEY"
        );
    }

    #[test]
    fn test_blank_value_counts_as_missing() {
        let err = Config::from_lookup(lookup(&[
            ("BOT_TOKEN", "   "),
            ("AZURE_OPENAI_ENDPOINT", "https://example.openai.azure.com/"),
            ("AZURE_OPENAI_KEY", "secret"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::MissingVars(vec!["BOT_TOKEN"]));
    }

    #[test]
    fn test_optional_overrides() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("AZURE_OPENAI_DEPLOYMENT", "gpt-4o-mini"));
        vars.push(("AZURE_OPENAI_API_VERSION", "2024-06-01"));
        vars.push(("LLM_TIMEOUT_SECS", "45"));
        let config = Config::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(config.azure.deployment, "gpt-4o-mini");
        assert_eq!(config.azure.api_version, "2024-06-01");
        assert_eq!(config.azure.timeout, Duration::from_secs(45));
    }

    #[test]
    fn test_invalid_timeout() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("LLM_TIMEOUT_SECS", "soon"));
        let err = Config::from_lookup(lookup(&vars)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "LLM_TIMEOUT_SECS", .. }));

        let mut vars = REQUIRED.to_vec();
        vars.push(("LLM_TIMEOUT_SECS", "0"));
        assert!(Config::from_lookup(lookup(&vars)).is_err());
    }

    #[test]
    fn test_debug_hides_secrets() {
        let config = Config::from_lookup(lookup(REQUIRED)).unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("secret"));
        assert!(!rendered.contains("123:abc"));
    }
}
