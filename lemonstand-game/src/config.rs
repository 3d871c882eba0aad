//! Engine configuration: the opening state and persistence settings.
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

use crate::constants::{
    LEADERBOARD_CAPACITY, LEADERBOARD_KEY, LOG_CAPACITY, PRICE_MAX, PRICE_MIN, REPUTATION_MAX,
    REPUTATION_MIN,
};
use crate::ledger::EventLog;
use crate::state::{LOG_STAND_OPENED, SimulationState};
use crate::weather::Weather;

const fn default_day() -> u32 {
    2
}
const fn default_one_u32() -> u32 {
    1
}
const fn default_cash() -> f64 {
    14.55
}
const fn default_stock() -> u32 {
    26
}
const fn default_max_stock() -> u32 {
    50
}
const fn default_one_f64() -> f64 {
    1.0
}
const fn default_reputation() -> f64 {
    7.0
}
const fn default_log_capacity() -> usize {
    LOG_CAPACITY
}
fn default_leaderboard_key() -> String {
    LEADERBOARD_KEY.to_string()
}
const fn default_leaderboard_capacity() -> usize {
    LEADERBOARD_CAPACITY
}

/// Values a new game starts from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpeningConfig {
    #[serde(default = "default_day")]
    pub day: u32,
    #[serde(default = "default_one_u32")]
    pub level: u32,
    #[serde(default)]
    pub weather: Weather,
    #[serde(default = "default_cash")]
    pub cash: f64,
    #[serde(default = "default_stock")]
    pub stock: u32,
    #[serde(default = "default_max_stock")]
    pub max_stock: u32,
    #[serde(default = "default_one_f64")]
    pub price: f64,
    #[serde(default = "default_reputation")]
    pub reputation: f64,
    #[serde(default)]
    pub auto_buy: bool,
    #[serde(default = "default_one_u32")]
    pub stands: u32,
    #[serde(default = "default_one_f64")]
    pub pressure: f64,
}

impl Default for OpeningConfig {
    fn default() -> Self {
        Self {
            day: default_day(),
            level: 1,
            weather: Weather::default(),
            cash: default_cash(),
            stock: default_stock(),
            max_stock: default_max_stock(),
            price: 1.0,
            reputation: default_reputation(),
            auto_buy: false,
            stands: 1,
            pressure: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandConfig {
    #[serde(default)]
    pub opening: OpeningConfig,
    #[serde(default = "default_log_capacity")]
    pub log_capacity: usize,
    #[serde(default = "default_leaderboard_key")]
    pub leaderboard_key: String,
    #[serde(default = "default_leaderboard_capacity")]
    pub leaderboard_capacity: usize,
}

impl Default for StandConfig {
    fn default() -> Self {
        Self {
            opening: OpeningConfig::default(),
            log_capacity: LOG_CAPACITY,
            leaderboard_key: default_leaderboard_key(),
            leaderboard_capacity: LEADERBOARD_CAPACITY,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("opening price {0} outside [0.05, 5.00]")]
    PriceOutOfRange(f64),
    #[error("opening reputation {0} outside [0, 20]")]
    ReputationOutOfRange(f64),
    #[error("opening stock {stock} exceeds capacity {max_stock}")]
    StockOverCapacity { stock: u32, max_stock: u32 },
    #[error("opening pressure {0} is below 1")]
    PressureTooLow(f64),
    #[error("opening cash is not a finite number")]
    CashNotFinite,
    #[error("{0} must be at least 1")]
    Zero(&'static str),
    #[error("leaderboard key must not be empty")]
    EmptyLeaderboardKey,
}

impl StandConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a value is out of range.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns the first out-of-range value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let opening = &self.opening;
        if !(PRICE_MIN..=PRICE_MAX).contains(&opening.price) {
            return Err(ConfigError::PriceOutOfRange(opening.price));
        }
        if !(REPUTATION_MIN..=REPUTATION_MAX).contains(&opening.reputation) {
            return Err(ConfigError::ReputationOutOfRange(opening.reputation));
        }
        if opening.stock > opening.max_stock {
            return Err(ConfigError::StockOverCapacity {
                stock: opening.stock,
                max_stock: opening.max_stock,
            });
        }
        if opening.pressure.is_nan() || opening.pressure < 1.0 {
            return Err(ConfigError::PressureTooLow(opening.pressure));
        }
        if !opening.cash.is_finite() {
            return Err(ConfigError::CashNotFinite);
        }
        for (name, value) in [
            ("opening.day", opening.day),
            ("opening.level", opening.level),
            ("opening.stands", opening.stands),
        ] {
            if value == 0 {
                return Err(ConfigError::Zero(name));
            }
        }
        if self.log_capacity == 0 {
            return Err(ConfigError::Zero("log_capacity"));
        }
        if self.leaderboard_capacity == 0 {
            return Err(ConfigError::Zero("leaderboard_capacity"));
        }
        if self.leaderboard_key.trim().is_empty() {
            return Err(ConfigError::EmptyLeaderboardKey);
        }
        Ok(())
    }

    /// Fresh state for a new game.
    #[must_use]
    pub fn opening_state(&self, room_code: impl Into<String>) -> SimulationState {
        let opening = &self.opening;
        let mut logs = EventLog::with_capacity(self.log_capacity);
        logs.push(LOG_STAND_OPENED);
        SimulationState {
            day: opening.day,
            level: opening.level,
            weather: opening.weather,
            cash: opening.cash,
            stock: opening.stock,
            max_stock: opening.max_stock,
            price: opening.price,
            reputation: opening.reputation,
            auto_buy: opening.auto_buy,
            stands: opening.stands,
            ad_level: 0,
            sweetness: 0,
            pressure: opening.pressure,
            achievements: BTreeSet::new(),
            logs,
            room_code: room_code.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_opens_like_the_default_state() {
        let config = StandConfig::default();
        config.validate().unwrap();
        let state = config.opening_state(String::new());
        assert_eq!(state, SimulationState::default());
    }

    #[test]
    fn empty_json_takes_every_default() {
        let config = StandConfig::from_json("{}").unwrap();
        assert_eq!(config, StandConfig::default());
        let partial = StandConfig::from_json(r#"{"opening":{"cash":40.0}}"#).unwrap();
        assert!((partial.opening.cash - 40.0).abs() < 1e-12);
        assert_eq!(partial.opening.stock, 26);
        assert_eq!(partial.opening.level, 1);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let cases = [
            (r#"{"opening":{"price":9.0}}"#, "price"),
            (r#"{"opening":{"reputation":25.0}}"#, "reputation"),
            (r#"{"opening":{"stock":60}}"#, "stock"),
            (r#"{"opening":{"pressure":0.5}}"#, "pressure"),
            (r#"{"opening":{"stands":0}}"#, "stands"),
            (r#"{"log_capacity":0}"#, "log_capacity"),
            (r#"{"leaderboard_key":"  "}"#, "key"),
        ];
        for (json, label) in cases {
            assert!(StandConfig::from_json(json).is_err(), "{label} accepted");
        }
        assert!(matches!(
            StandConfig::from_json("{broken"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn log_capacity_flows_into_the_state() {
        let config = StandConfig::from_json(r#"{"log_capacity":3}"#).unwrap();
        let state = config.opening_state("LS-LEMON00");
        assert_eq!(state.logs.capacity(), 3);
        assert_eq!(state.room_code, "LS-LEMON00");
    }
}
