use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

use crate::constants::{MILESTONES, PRICE_MAX, PRICE_MIN, REPUTATION_MAX, REPUTATION_MIN};
use crate::ledger::EventLog;
use crate::weather::Weather;

pub const LOG_STAND_OPENED: &str = "🍋 Stand opened. Set a price, stock up, and run the day.";

/// Canonical mutable state for one play session.
///
/// Only the day cycle, economy, and ledger operations mutate it; a new game
/// replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    pub day: u32,
    pub level: u32,
    pub weather: Weather,
    pub cash: f64,
    pub stock: u32,
    pub max_stock: u32,
    pub price: f64,
    pub reputation: f64,
    pub auto_buy: bool,
    pub stands: u32,
    pub ad_level: u32,
    pub sweetness: u32,
    pub pressure: f64,
    #[serde(default)]
    pub achievements: BTreeSet<u32>,
    #[serde(default)]
    pub logs: EventLog,
    #[serde(default)]
    pub room_code: String,
}

impl Default for SimulationState {
    fn default() -> Self {
        let mut logs = EventLog::default();
        logs.push(LOG_STAND_OPENED);
        Self {
            day: 2,
            level: 1,
            weather: Weather::Rainy,
            cash: 14.55,
            stock: 26,
            max_stock: 50,
            price: 1.0,
            reputation: 7.0,
            auto_buy: false,
            stands: 1,
            ad_level: 0,
            sweetness: 0,
            pressure: 1.0,
            achievements: BTreeSet::new(),
            logs,
            room_code: String::new(),
        }
    }
}

/// A broken state invariant, reported by [`SimulationState::check_invariants`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvariantViolation {
    #[error("stock {stock} exceeds capacity {max_stock}")]
    StockOverCapacity { stock: u32, max_stock: u32 },
    #[error("price {0} outside [0.05, 5.00]")]
    PriceOutOfRange(f64),
    #[error("reputation {0} outside [0, 20]")]
    ReputationOutOfRange(f64),
    #[error("pressure {0} below 1")]
    PressureTooLow(f64),
    #[error("day {0} is before day 1")]
    DayZero(u32),
    #[error("level {0} is below 1")]
    LevelZero(u32),
    #[error("stand count {0} is below 1")]
    NoStands(u32),
    #[error("milestone {milestone} unlocked on day {day}")]
    UnreachedMilestone { milestone: u32, day: u32 },
    #[error("{0} is not a milestone")]
    UnknownMilestone(u32),
    #[error("cash is not a finite number")]
    CashNotFinite,
}

impl SimulationState {
    /// Set the retail price, clamped to the allowed band.
    ///
    /// Non-finite values are ignored and the previous price is kept.
    pub fn set_price(&mut self, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }
        self.price = value.clamp(PRICE_MIN, PRICE_MAX);
        true
    }

    /// Parse a price typed by the player. Unparseable text is ignored.
    pub fn set_price_input(&mut self, text: &str) -> bool {
        text.trim()
            .trim_start_matches('$')
            .parse::<f64>()
            .is_ok_and(|value| self.set_price(value))
    }

    pub const fn toggle_auto_buy(&mut self, enabled: bool) {
        self.auto_buy = enabled;
    }

    pub fn push_log(&mut self, line: impl Into<String>) {
        self.logs.push(line);
    }

    /// Free capacity left in the stockroom.
    #[must_use]
    pub const fn room(&self) -> u32 {
        self.max_stock.saturating_sub(self.stock)
    }

    /// Verify every state invariant.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        if self.stock > self.max_stock {
            return Err(InvariantViolation::StockOverCapacity {
                stock: self.stock,
                max_stock: self.max_stock,
            });
        }
        if !(PRICE_MIN..=PRICE_MAX).contains(&self.price) {
            return Err(InvariantViolation::PriceOutOfRange(self.price));
        }
        if !(REPUTATION_MIN..=REPUTATION_MAX).contains(&self.reputation) {
            return Err(InvariantViolation::ReputationOutOfRange(self.reputation));
        }
        if self.pressure.is_nan() || self.pressure < 1.0 {
            return Err(InvariantViolation::PressureTooLow(self.pressure));
        }
        if self.day == 0 {
            return Err(InvariantViolation::DayZero(self.day));
        }
        if self.level == 0 {
            return Err(InvariantViolation::LevelZero(self.level));
        }
        if self.stands == 0 {
            return Err(InvariantViolation::NoStands(self.stands));
        }
        if let Some(&milestone) = self.achievements.iter().find(|m| !MILESTONES.contains(m)) {
            return Err(InvariantViolation::UnknownMilestone(milestone));
        }
        if let Some(&milestone) = self.achievements.iter().find(|&&m| m > self.day) {
            return Err(InvariantViolation::UnreachedMilestone {
                milestone,
                day: self.day,
            });
        }
        if !self.cash.is_finite() {
            return Err(InvariantViolation::CashNotFinite);
        }
        Ok(())
    }
}
