//! Read-only view of a session for renderers
use serde::Serialize;

use crate::economy::{UpgradeQuote, upgrade_quotes};
use crate::ledger::progress_percent;
use crate::market::{PriceBand, RestockQuote, market_price, restock_quotes, warning_text};
use crate::score::{Leaderboard, score_value};
use crate::state::SimulationState;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateSnapshot {
    #[serde(flatten)]
    pub state: SimulationState,
    pub market_price: f64,
    pub price_band: PriceBand,
    pub warning_text: String,
    pub score: i64,
    pub progress_percent: u32,
    pub weather_icon: &'static str,
    pub restock_quotes: Vec<RestockQuote>,
    pub upgrade_quotes: Vec<UpgradeQuote>,
    pub leaderboard: Leaderboard,
}

impl StateSnapshot {
    #[must_use]
    pub fn capture(state: &SimulationState, leaderboard: &Leaderboard) -> Self {
        Self {
            state: state.clone(),
            market_price: market_price(state),
            price_band: PriceBand::classify(state.price),
            warning_text: warning_text(state.price),
            score: score_value(state),
            progress_percent: progress_percent(state),
            weather_icon: state.weather.icon(),
            restock_quotes: restock_quotes(state),
            upgrade_quotes: upgrade_quotes(state),
            leaderboard: leaderboard.clone(),
        }
    }

    #[must_use]
    pub fn best_score(&self) -> Option<i64> {
        self.leaderboard.best().map(|entry| entry.score)
    }

    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be serialized.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opening_snapshot_carries_derived_values() {
        let state = SimulationState::default();
        let snapshot = StateSnapshot::capture(&state, &Leaderboard::new());
        assert_eq!(snapshot.score, 431);
        assert_eq!(snapshot.price_band, PriceBand::Soft);
        assert!(snapshot.warning_text.contains("Sweet spot: $0.30"));
        assert_eq!(snapshot.progress_percent, 8 + 17 + 12);
        assert_eq!(snapshot.restock_quotes.len(), 4);
        assert_eq!(snapshot.upgrade_quotes.len(), 3);
        assert!(snapshot.best_score().is_none());
    }

    #[test]
    fn json_flattens_state_fields() {
        let state = SimulationState::default();
        let json = StateSnapshot::capture(&state, &Leaderboard::new())
            .to_json()
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["day"], 2);
        assert_eq!(value["cash"], 14.55);
        assert_eq!(value["weather"], "Rainy");
        assert!(value["market_price"].is_f64());
        assert!(value["leaderboard"].is_array());
        assert!(value["logs"]["entries"].is_array());
    }
}
