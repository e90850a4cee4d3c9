use std::env;
use std::path::PathBuf;

use secrecy::SecretString;
use teloxide::types::UserId;

use crate::error::ConfigError;

const BOT_TOKEN_ENV: &str = "BOT_TOKEN";
const OWNER_ID_ENV: &str = "OWNER_ID";
const REQUESTS_PATH_ENV: &str = "REQUESTS_PATH";
const DEFAULT_REQUESTS_PATH: &str = "requests.csv";

#[derive(Clone, Debug)]
pub struct Config {
    pub bot_token: SecretString,
    pub owner_id: UserId,
    pub requests_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bot_token = lookup(BOT_TOKEN_ENV)
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::Missing(BOT_TOKEN_ENV))?;

        let raw_owner = lookup(OWNER_ID_ENV)
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::Missing(OWNER_ID_ENV))?;
        let owner_id = raw_owner
            .trim()
            .parse::<u64>()
            .map(UserId)
            .map_err(|_| ConfigError::InvalidOwnerId(raw_owner.clone()))?;

        let requests_path = lookup(REQUESTS_PATH_ENV)
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_REQUESTS_PATH.to_string());

        Ok(Config {
            bot_token: SecretString::from(bot_token),
            owner_id,
            requests_path: PathBuf::from(requests_path),
        })
    }
}
