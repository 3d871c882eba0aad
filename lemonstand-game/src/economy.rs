//! Permanent upgrades and manual restocking
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{
    AD_COST_BASE, AD_COST_STEP, STAND_COST_BASE, STAND_COST_STEP, STAND_STOCK_BONUS,
    STAND_UNLOCK_AFTER_DAY, SWEET_COST_BASE, SWEET_COST_STEP,
};
use crate::market::{RestockAvailability, format_money, restock_quote};
use crate::state::SimulationState;

/// Purchasable upgrades, each with a cost that climbs with the owned count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Upgrade {
    Stand,
    Sweetness,
    Advertising,
}

pub const UPGRADE_ORDER: [Upgrade; 3] = [Upgrade::Stand, Upgrade::Sweetness, Upgrade::Advertising];

impl Upgrade {
    #[must_use]
    pub fn cost(self, state: &SimulationState) -> f64 {
        match self {
            Self::Stand => STAND_COST_BASE + f64::from(state.stands) * STAND_COST_STEP,
            Self::Sweetness => SWEET_COST_BASE + f64::from(state.sweetness) * SWEET_COST_STEP,
            Self::Advertising => AD_COST_BASE + f64::from(state.ad_level) * AD_COST_STEP,
        }
    }

    #[must_use]
    pub const fn owned(self, state: &SimulationState) -> u32 {
        match self {
            Self::Stand => state.stands,
            Self::Sweetness => state.sweetness,
            Self::Advertising => state.ad_level,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Stand => "stand",
            Self::Sweetness => "sweeter recipe",
            Self::Advertising => "advertising",
        }
    }

    /// Check whether the upgrade can be bought right now.
    ///
    /// # Errors
    ///
    /// Returns the reason the purchase would be rejected.
    pub fn check(self, state: &SimulationState) -> Result<f64, PurchaseRejection> {
        if self == Self::Stand && state.day <= STAND_UNLOCK_AFTER_DAY {
            return Err(PurchaseRejection::TooEarly {
                unlocks_after_day: STAND_UNLOCK_AFTER_DAY,
            });
        }
        let cost = self.cost(state);
        if state.cash < cost {
            return Err(PurchaseRejection::InsufficientCash {
                cost,
                cash: state.cash,
            });
        }
        Ok(cost)
    }
}

impl fmt::Display for Upgrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Why a purchase was turned down. No state changes accompany a rejection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseRejection {
    TooEarly { unlocks_after_day: u32 },
    InsufficientCash { cost: f64, cash: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseOutcome {
    Purchased { upgrade: Upgrade, cost: f64 },
    Rejected(PurchaseRejection),
}

impl PurchaseOutcome {
    #[must_use]
    pub const fn is_purchased(&self) -> bool {
        matches!(self, Self::Purchased { .. })
    }
}

/// Buy one level of `upgrade`, or leave the state untouched.
pub fn purchase(state: &mut SimulationState, upgrade: Upgrade) -> PurchaseOutcome {
    let cost = match upgrade.check(state) {
        Ok(cost) => cost,
        Err(reason) => {
            log::debug!("{upgrade} purchase rejected: {reason:?}");
            return PurchaseOutcome::Rejected(reason);
        }
    };

    state.cash -= cost;
    match upgrade {
        Upgrade::Stand => {
            state.stands += 1;
            state.max_stock += STAND_STOCK_BONUS;
            state.push_log(format!(
                "🏪 Opened stand #{} for {}. Capacity now {}.",
                state.stands,
                format_money(cost),
                state.max_stock
            ));
        }
        Upgrade::Sweetness => {
            state.sweetness += 1;
            state.push_log(format!(
                "🍯 Sweeter recipe (level {}) for {}.",
                state.sweetness,
                format_money(cost)
            ));
        }
        Upgrade::Advertising => {
            state.ad_level += 1;
            state.push_log(format!(
                "📣 Advertising level {} for {}.",
                state.ad_level,
                format_money(cost)
            ));
        }
    }
    PurchaseOutcome::Purchased { upgrade, cost }
}

/// Priced upgrade option for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpgradeQuote {
    pub upgrade: Upgrade,
    pub owned: u32,
    pub cost: f64,
    pub blocked: Option<PurchaseRejection>,
}

#[must_use]
pub fn upgrade_quotes(state: &SimulationState) -> Vec<UpgradeQuote> {
    UPGRADE_ORDER
        .iter()
        .map(|&upgrade| UpgradeQuote {
            upgrade,
            owned: upgrade.owned(state),
            cost: upgrade.cost(state),
            blocked: upgrade.check(state).err(),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestockOutcome {
    Restocked { units: u32, cost: f64 },
    Rejected(RestockAvailability),
    Empty,
}

impl RestockOutcome {
    #[must_use]
    pub const fn is_restocked(&self) -> bool {
        matches!(self, Self::Restocked { .. })
    }
}

/// Buy `units` at the current market price, or leave the state untouched.
pub fn restock(state: &mut SimulationState, units: u32) -> RestockOutcome {
    if units == 0 {
        return RestockOutcome::Empty;
    }
    let quote = restock_quote(state, units);
    if !quote.is_available() {
        log::debug!("restock of {units} rejected: {:?}", quote.availability);
        return RestockOutcome::Rejected(quote.availability);
    }
    state.cash -= quote.cost;
    state.stock += units;
    state.push_log(format!(
        "📦 Restocked {units} units for {}.",
        format_money(quote.cost)
    ));
    RestockOutcome::Restocked {
        units,
        cost: quote.cost,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::field_reassign_with_default)]
    use super::*;
    use crate::market::market_price;

    #[test]
    fn costs_climb_with_owned_count() {
        let mut state = SimulationState::default();
        assert!((Upgrade::Stand.cost(&state) - 39.0).abs() < 1e-12);
        assert!((Upgrade::Sweetness.cost(&state) - 14.0).abs() < 1e-12);
        assert!((Upgrade::Advertising.cost(&state) - 18.0).abs() < 1e-12);
        state.stands = 3;
        state.sweetness = 2;
        state.ad_level = 4;
        assert!((Upgrade::Stand.cost(&state) - 69.0).abs() < 1e-12);
        assert!((Upgrade::Sweetness.cost(&state) - 34.0).abs() < 1e-12);
        assert!((Upgrade::Advertising.cost(&state) - 66.0).abs() < 1e-12);
    }

    #[test]
    fn stand_locked_through_day_three() {
        let mut state = SimulationState::default();
        state.day = 3;
        state.cash = 10_000.0;
        let before = state.clone();
        let outcome = purchase(&mut state, Upgrade::Stand);
        assert_eq!(
            outcome,
            PurchaseOutcome::Rejected(PurchaseRejection::TooEarly {
                unlocks_after_day: 3
            })
        );
        assert_eq!(state, before);
    }

    #[test]
    fn stand_purchase_raises_capacity() {
        let mut state = SimulationState::default();
        state.day = 4;
        state.cash = 100.0;
        let outcome = purchase(&mut state, Upgrade::Stand);
        assert!(outcome.is_purchased());
        assert_eq!(state.stands, 2);
        assert_eq!(state.max_stock, 70);
        assert!((state.cash - 61.0).abs() < 1e-9);
        assert!(state.logs.latest().is_some_and(|line| line.contains("stand #2")));
    }

    #[test]
    fn unaffordable_upgrades_change_nothing() {
        let mut state = SimulationState::default();
        state.cash = 13.99;
        let before = state.clone();
        for upgrade in [Upgrade::Sweetness, Upgrade::Advertising] {
            assert!(matches!(
                purchase(&mut state, upgrade),
                PurchaseOutcome::Rejected(PurchaseRejection::InsufficientCash { .. })
            ));
        }
        assert_eq!(state, before);
    }

    #[test]
    fn sweetness_and_ads_increment_counters() {
        let mut state = SimulationState::default();
        state.cash = 50.0;
        assert!(purchase(&mut state, Upgrade::Sweetness).is_purchased());
        assert!(purchase(&mut state, Upgrade::Advertising).is_purchased());
        assert_eq!((state.sweetness, state.ad_level), (1, 1));
        assert!((state.cash - 18.0).abs() < 1e-9);
        assert_eq!(state.max_stock, 50);
    }

    #[test]
    fn exact_cash_is_enough() {
        let mut state = SimulationState::default();
        state.cash = 14.0;
        assert!(purchase(&mut state, Upgrade::Sweetness).is_purchased());
        assert!(state.cash.abs() < 1e-12);
    }

    #[test]
    fn restock_succeeds_within_limits() {
        let mut state = SimulationState::default();
        state.day = 3;
        state.pressure = 1.06;
        let cost = 10.0 * market_price(&state);
        let outcome = restock(&mut state, 10);
        assert_eq!(outcome, RestockOutcome::Restocked { units: 10, cost });
        assert_eq!(state.stock, 36);
        assert!((state.cash - (14.55 - cost)).abs() < 1e-9);
        assert!((cost - 2.465).abs() < 0.01);
    }

    #[test]
    fn restock_rejects_overflow_and_poverty() {
        let mut state = SimulationState::default();
        let before = state.clone();
        assert_eq!(
            restock(&mut state, 25),
            RestockOutcome::Rejected(RestockAvailability::ExceedsCapacity)
        );
        state.cash = 0.5;
        let poor = state.clone();
        assert_eq!(
            restock(&mut state, 10),
            RestockOutcome::Rejected(RestockAvailability::InsufficientCash)
        );
        assert_eq!(state, poor);
        assert_eq!(restock(&mut state, 0), RestockOutcome::Empty);
        assert_eq!(before.stock, state.stock);
    }

    #[test]
    fn quotes_list_every_upgrade() {
        let state = SimulationState::default();
        let quotes = upgrade_quotes(&state);
        assert_eq!(quotes.len(), 3);
        assert!(matches!(
            quotes[0].blocked,
            Some(PurchaseRejection::TooEarly { .. })
        ));
        assert!(quotes[1].blocked.is_none());
        assert!(matches!(
            quotes[2].blocked,
            Some(PurchaseRejection::InsufficientCash { .. })
        ));
    }
}
