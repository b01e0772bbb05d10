//! Bot configuration with defaults, TOML loading, and environment overrides.

use crate::errors::{BotError, BotResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Runtime configuration for the interaction core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotConfig {
    /// Balance a player account starts with on first reference.
    pub starting_balance: u64,
    /// Smallest accepted bet.
    pub min_bet: u64,
    /// Largest accepted bet.
    pub max_bet: u64,
    /// Seed for the game random source; `None` seeds from the OS.
    pub rng_seed: Option<u64>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            starting_balance: 100,
            min_bet: 1,
            max_bet: 1_000,
            rng_seed: None,
        }
    }
}

/// Configuration loader with TOML file and `WAGERBOT_*` env support.
pub struct ConfigLoader {
    config_path: Option<String>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self { config_path: None }
    }

    /// Set the configuration file path.
    pub fn with_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_string_lossy().to_string());
        self
    }

    /// Load from file (if set), apply env overrides, then validate.
    pub fn load(&self) -> BotResult<BotConfig> {
        let mut config = if let Some(ref path) = self.config_path {
            self.load_from_file(path)?
        } else {
            BotConfig::default()
        };

        self.apply_env_overrides(&mut config)?;
        validate(&config)?;
        Ok(config)
    }

    fn load_from_file(&self, path: &str) -> BotResult<BotConfig> {
        let content = std::fs::read_to_string(path).map_err(|e| BotError::InvalidField {
            field: "config_path",
            value: format!("{}: {}", path, e),
        })?;
        toml::from_str(&content).map_err(|e| BotError::InvalidField {
            field: "config_file",
            value: e.to_string(),
        })
    }

    fn apply_env_overrides(&self, config: &mut BotConfig) -> BotResult<()> {
        if let Ok(raw) = env::var("WAGERBOT_STARTING_BALANCE") {
            config.starting_balance = parse_env("WAGERBOT_STARTING_BALANCE", &raw)?;
        }
        if let Ok(raw) = env::var("WAGERBOT_MIN_BET") {
            config.min_bet = parse_env("WAGERBOT_MIN_BET", &raw)?;
        }
        if let Ok(raw) = env::var("WAGERBOT_MAX_BET") {
            config.max_bet = parse_env("WAGERBOT_MAX_BET", &raw)?;
        }
        if let Ok(raw) = env::var("WAGERBOT_RNG_SEED") {
            config.rng_seed = Some(parse_env("WAGERBOT_RNG_SEED", &raw)?);
        }
        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_env(field: &'static str, raw: &str) -> BotResult<u64> {
    raw.parse().map_err(|_| BotError::InvalidField {
        field,
        value: raw.to_string(),
    })
}

/// Validate a configuration's internal consistency.
pub fn validate(config: &BotConfig) -> BotResult<()> {
    if config.max_bet == 0 {
        return Err(BotError::InvalidField {
            field: "max_bet",
            value: "0".to_string(),
        });
    }
    if config.min_bet == 0 {
        return Err(BotError::InvalidField {
            field: "min_bet",
            value: "0".to_string(),
        });
    }
    if config.min_bet > config.max_bet {
        return Err(BotError::InvalidField {
            field: "min_bet",
            value: format!("{} > max_bet {}", config.min_bet, config.max_bet),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = BotConfig::default();
        assert!(validate(&config).is_ok());
        assert_eq!(config.starting_balance, 100);
        assert_eq!(config.min_bet, 1);
    }

    #[test]
    fn test_validation_rejects_inverted_limits() {
        let config = BotConfig {
            min_bet: 500,
            max_bet: 100,
            ..Default::default()
        };
        assert!(validate(&config).is_err());

        let config = BotConfig {
            max_bet: 0,
            min_bet: 0,
            ..Default::default()
        };
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = BotConfig {
            starting_balance: 250,
            min_bet: 5,
            max_bet: 200,
            rng_seed: Some(9),
        };
        let raw = toml::to_string(&config).unwrap();
        let parsed: BotConfig = toml::from_str(&raw).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_env_override_parse_failure() {
        // Env vars are process-global, so this touches a name no other test
        // uses and cleans up after itself.
        env::set_var("WAGERBOT_MAX_BET", "lots");
        let result = ConfigLoader::new().load();
        env::remove_var("WAGERBOT_MAX_BET");

        assert!(matches!(
            result,
            Err(BotError::InvalidField {
                field: "WAGERBOT_MAX_BET",
                ..
            })
        ));
    }
}
