//! Wholesale pricing, retail advisories, and reputation feedback
use serde::{Deserialize, Serialize};

use crate::constants::{
    ADVISORY_LOW_MAX, ADVISORY_SOFT_MAX, ADVISORY_SWEET_MAX, MARKET_BASE_PRICE,
    MARKET_DAY_INFLATION, MARKET_PRESSURE_INFLATION, REP_NEUTRAL_DRIFT, REP_OVERPRICED_LOSS,
    REP_OVERPRICED_THRESHOLD, REP_SWEET_SPOT_GAIN, REP_SWEET_SPOT_HIGH, REP_SWEET_SPOT_LOW,
    REP_UNDERPRICED_LOSS, REP_UNDERPRICED_THRESHOLD, RESTOCK_PACKS,
};
use crate::state::SimulationState;

const SWEET_SPOT_HINT: &str = "Sweet spot: $0.30–$0.60";

/// Wholesale price per unit, inflated by session progress and pressure.
#[must_use]
pub fn market_price(state: &SimulationState) -> f64 {
    let days_open = f64::from(state.day) - 2.0;
    MARKET_BASE_PRICE
        * (1.0 + days_open * MARKET_DAY_INFLATION + state.pressure * MARKET_PRESSURE_INFLATION)
}

#[must_use]
pub fn pack_cost(units: u32, state: &SimulationState) -> f64 {
    f64::from(units) * market_price(state)
}

/// Advisory price bands shown next to the price input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceBand {
    /// Below $0.25.
    Low,
    /// $0.25 through $0.60.
    SweetSpot,
    /// Above $0.60 through $1.00.
    Soft,
    /// Above $1.00.
    Steep,
}

impl PriceBand {
    #[must_use]
    pub fn classify(price: f64) -> Self {
        if price < ADVISORY_LOW_MAX {
            Self::Low
        } else if price <= ADVISORY_SWEET_MAX {
            Self::SweetSpot
        } else if price <= ADVISORY_SOFT_MAX {
            Self::Soft
        } else {
            Self::Steep
        }
    }

    #[must_use]
    pub const fn advisory(self) -> &'static str {
        match self {
            Self::Low => "Very low. Customers love it, but margins are thin.",
            Self::SweetSpot => "Sweet spot. Strong demand expected.",
            Self::Soft => "A bit high. Demand is softening.",
            Self::Steep => "Too steep. Most customers will walk past.",
        }
    }
}

/// Advisory text for a retail price. Display only; gameplay never reads it.
#[must_use]
pub fn warning_text(price: f64) -> String {
    format!("{} {SWEET_SPOT_HINT}", PriceBand::classify(price).advisory())
}

/// Reputation change earned by one day of selling at `price`.
#[must_use]
pub fn reputation_delta(price: f64) -> f64 {
    if (REP_SWEET_SPOT_LOW..=REP_SWEET_SPOT_HIGH).contains(&price) {
        REP_SWEET_SPOT_GAIN
    } else if price > REP_OVERPRICED_THRESHOLD {
        REP_OVERPRICED_LOSS
    } else if price < REP_UNDERPRICED_THRESHOLD {
        REP_UNDERPRICED_LOSS
    } else {
        REP_NEUTRAL_DRIFT
    }
}

/// Why a restock button would be disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestockAvailability {
    Available,
    ExceedsCapacity,
    InsufficientCash,
}

/// Priced restock option for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestockQuote {
    pub units: u32,
    pub cost: f64,
    pub availability: RestockAvailability,
}

impl RestockQuote {
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.availability == RestockAvailability::Available
    }

    /// Tooltip text for the restock button.
    #[must_use]
    pub fn describe(&self) -> String {
        match self.availability {
            RestockAvailability::ExceedsCapacity => "Cannot exceed max stock".to_string(),
            RestockAvailability::InsufficientCash => "Not enough cash".to_string(),
            RestockAvailability::Available => {
                format!("Buy {} units for {}", self.units, format_money(self.cost))
            }
        }
    }
}

/// Capacity is checked before cash.
#[must_use]
pub fn restock_quote(state: &SimulationState, units: u32) -> RestockQuote {
    let cost = pack_cost(units, state);
    let availability = if state.stock.saturating_add(units) > state.max_stock {
        RestockAvailability::ExceedsCapacity
    } else if cost > state.cash {
        RestockAvailability::InsufficientCash
    } else {
        RestockAvailability::Available
    };
    RestockQuote {
        units,
        cost,
        availability,
    }
}

/// Quotes for each of the fixed restock packs.
#[must_use]
pub fn restock_quotes(state: &SimulationState) -> Vec<RestockQuote> {
    RESTOCK_PACKS
        .iter()
        .map(|&units| restock_quote(state, units))
        .collect()
}

#[must_use]
pub fn format_money(value: f64) -> String {
    if value < 0.0 {
        format!("-${:.2}", value.abs())
    } else {
        format!("${value:.2}")
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::field_reassign_with_default)]
    use super::*;

    #[test]
    fn opening_market_price_includes_base_pressure() {
        let state = SimulationState::default();
        let expected = 0.2275 * 1.06;
        assert!((market_price(&state) - expected).abs() < 1e-12);
        assert!((pack_cost(10, &state) - expected * 10.0).abs() < 1e-12);
    }

    #[test]
    fn market_price_rises_with_day_and_pressure() {
        let mut state = SimulationState::default();
        let opening = market_price(&state);
        state.day = 3;
        let later = market_price(&state);
        state.pressure = 1.06;
        let pressured = market_price(&state);
        assert!(later > opening);
        assert!(pressured > later);
        assert!((pressured - 0.2275 * 1.0836).abs() < 1e-9);
    }

    #[test]
    fn advisory_bands_follow_boundaries() {
        assert_eq!(PriceBand::classify(0.24), PriceBand::Low);
        assert_eq!(PriceBand::classify(0.25), PriceBand::SweetSpot);
        assert_eq!(PriceBand::classify(0.6), PriceBand::SweetSpot);
        assert_eq!(PriceBand::classify(0.61), PriceBand::Soft);
        assert_eq!(PriceBand::classify(1.0), PriceBand::Soft);
        assert_eq!(PriceBand::classify(1.01), PriceBand::Steep);
        assert!(warning_text(0.4).starts_with("Sweet spot."));
        assert!(warning_text(3.0).ends_with(SWEET_SPOT_HINT));
    }

    #[test]
    fn reputation_bands_follow_boundaries() {
        assert!((reputation_delta(0.3) - 0.35).abs() < 1e-12);
        assert!((reputation_delta(0.6) - 0.35).abs() < 1e-12);
        assert!((reputation_delta(1.01) + 0.55).abs() < 1e-12);
        assert!((reputation_delta(1.0) + 0.05).abs() < 1e-12);
        assert!((reputation_delta(0.19) + 0.2).abs() < 1e-12);
        assert!((reputation_delta(0.25) + 0.05).abs() < 1e-12);
    }

    #[test]
    fn restock_quotes_report_the_blocking_reason() {
        let state = SimulationState::default();
        let quotes = restock_quotes(&state);
        assert_eq!(quotes.len(), 4);
        assert!(quotes[0].is_available());
        // 26 on hand with room for 24, so the 25-pack already overflows.
        assert_eq!(quotes[1].availability, RestockAvailability::ExceedsCapacity);
        assert_eq!(quotes[2].availability, RestockAvailability::ExceedsCapacity);
        assert_eq!(quotes[2].describe(), "Cannot exceed max stock");

        let mut poor = SimulationState::default();
        poor.cash = 1.0;
        let quote = restock_quote(&poor, 10);
        assert_eq!(quote.availability, RestockAvailability::InsufficientCash);
        assert_eq!(quote.describe(), "Not enough cash");
    }

    #[test]
    fn money_formats_to_cents() {
        assert_eq!(format_money(14.55), "$14.55");
        assert_eq!(format_money(2.0), "$2.00");
        assert_eq!(format_money(-1.5), "-$1.50");
    }
}
