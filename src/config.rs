use crate::error::ConfigError;
use std::env;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";

const PRACTICUM_TOKEN: &str = "PRACTICUM_TOKEN";
const TELEGRAM_TOKEN: &str = "TELEGRAM_TOKEN";
const TELEGRAM_CHAT_ID: &str = "TELEGRAM_CHAT_ID";
const PRACTICUM_ENDPOINT: &str = "PRACTICUM_ENDPOINT";

#[derive(Debug, Clone)]
pub struct Config {
    pub practicum_token: String,
    pub telegram_token: String,
    pub telegram_chat_id: String,
    pub endpoint: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    ///
    /// Empty values count as missing. Every absent secret is reported at once.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str, missing: &mut Vec<&'static str>| {
            match lookup(key).filter(|value| !value.trim().is_empty()) {
                Some(value) => value,
                None => {
                    missing.push(key);
                    String::new()
                }
            }
        };

        let mut missing = Vec::new();
        let practicum_token = required(PRACTICUM_TOKEN, &mut missing);
        let telegram_token = required(TELEGRAM_TOKEN, &mut missing);
        let telegram_chat_id = required(TELEGRAM_CHAT_ID, &mut missing);

        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        Ok(Self {
            practicum_token,
            telegram_token,
            telegram_chat_id,
            endpoint: lookup(PRACTICUM_ENDPOINT)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
        })
    }
}

/// Timing knobs of the polling loop.
#[derive(Debug, Clone, Copy)]
pub struct PollSettings {
    pub interval: Duration,
    pub max_backoff: Duration,
    pub request_timeout: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            max_backoff: Duration::from_secs(600),
            request_timeout: Duration::from_secs(30),
        }
    }
}
