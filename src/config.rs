use crate::domain::Wad;
use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub admin_account: String,
    pub manager_accounts: Vec<String>,
    pub stake_asset: String,
    pub reward_asset: String,
    /// Starting value of a fresh round's reward index. Entitlement math is
    /// baseline-invariant (positions always join at the live index); the
    /// default of 1.0 WAD matches the original deployment's convention.
    pub reward_index_baseline: Wad,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = env_map
            .get("PORT")
            .map(|s| s.as_str())
            .unwrap_or("8080")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::InvalidValue("PORT".to_string(), "must be a valid u16".to_string())
            })?;

        let admin_account = env_map
            .get("ADMIN_ACCOUNT")
            .cloned()
            .ok_or_else(|| ConfigError::MissingEnv("ADMIN_ACCOUNT".to_string()))?;

        let manager_accounts = env_map
            .get("MANAGER_ACCOUNTS")
            .map(|s| {
                s.split(',')
                    .map(|m| m.trim().to_string())
                    .filter(|m| !m.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let stake_asset = env_map
            .get("STAKE_ASSET")
            .cloned()
            .ok_or_else(|| ConfigError::MissingEnv("STAKE_ASSET".to_string()))?;

        let reward_asset = env_map
            .get("REWARD_ASSET")
            .cloned()
            .ok_or_else(|| ConfigError::MissingEnv("REWARD_ASSET".to_string()))?;

        let reward_index_baseline = match env_map.get("REWARD_INDEX_BASELINE") {
            Some(raw) => Wad::from_str(raw).map_err(|_| {
                ConfigError::InvalidValue(
                    "REWARD_INDEX_BASELINE".to_string(),
                    "must be a non-negative integer in raw WAD units".to_string(),
                )
            })?,
            None => Wad::ONE,
        };

        Ok(Config {
            port,
            admin_account,
            manager_accounts,
            stake_asset,
            reward_asset,
            reward_index_baseline,
        })
    }
}
