//! Daily customer demand
use crate::constants::{
    AD_DEMAND_BOOST, DEMAND_CLOUDY, DEMAND_NOISE_OFFSET, DEMAND_NOISE_SPAN, DEMAND_RAINY,
    DEMAND_SUNNY, PRESSURE_DEMAND_FLOOR, PRESSURE_DEMAND_PENALTY, PRICE_ELASTICITY,
    PRICE_FACTOR_MAX, PRICE_FACTOR_MIN, REPUTATION_DEMAND_BOOST, STAND_DEMAND_BOOST,
    SWEETNESS_DEMAND_BOOST,
};
use crate::numbers::round_f64_to_u32;
use crate::rng::RandomSource;
use crate::state::SimulationState;
use crate::weather::Weather;

#[must_use]
pub const fn weather_base(weather: Weather) -> f64 {
    match weather {
        Weather::Sunny => DEMAND_SUNNY,
        Weather::Cloudy => DEMAND_CLOUDY,
        Weather::Rainy => DEMAND_RAINY,
    }
}

/// Independent multipliers applied on top of the weather base.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DemandFactors {
    pub weather: f64,
    pub stands: f64,
    pub ads: f64,
    pub sweetness: f64,
    pub reputation: f64,
    pub pressure: f64,
}

impl DemandFactors {
    #[must_use]
    pub fn for_state(state: &SimulationState) -> Self {
        let extra_stands = f64::from(state.stands.saturating_sub(1));
        Self {
            weather: weather_base(state.weather),
            stands: 1.0 + extra_stands * STAND_DEMAND_BOOST,
            ads: 1.0 + f64::from(state.ad_level) * AD_DEMAND_BOOST,
            sweetness: 1.0 + f64::from(state.sweetness) * SWEETNESS_DEMAND_BOOST,
            reputation: 1.0 + state.reputation * REPUTATION_DEMAND_BOOST,
            pressure: (1.0 - state.pressure * PRESSURE_DEMAND_PENALTY).max(PRESSURE_DEMAND_FLOOR),
        }
    }

    #[must_use]
    pub fn product(&self) -> f64 {
        self.weather * self.stands * self.ads * self.sweetness * self.reputation * self.pressure
    }
}

/// Expected customers before price elasticity and noise.
#[must_use]
pub fn base_demand(state: &SimulationState) -> f64 {
    DemandFactors::for_state(state).product()
}

/// Inverse-price elasticity, bounded so extreme prices cannot swing demand unboundedly.
#[must_use]
pub fn price_factor(price: f64) -> f64 {
    if price <= 0.0 || !price.is_finite() {
        return PRICE_FACTOR_MAX;
    }
    (PRICE_ELASTICITY / price).clamp(PRICE_FACTOR_MIN, PRICE_FACTOR_MAX)
}

/// Customers who show up today. Draws once from the demand stream.
pub fn demand_for_day<R: RandomSource + ?Sized>(state: &SimulationState, rng: &mut R) -> u32 {
    let noise = rng.demand_unit() * DEMAND_NOISE_SPAN - DEMAND_NOISE_OFFSET;
    round_f64_to_u32(base_demand(state) * price_factor(state.price) + noise)
}

/// Pluggable demand resolution for the day cycle.
pub trait DemandModel {
    fn demand_for_day(&mut self, state: &SimulationState, rng: &mut dyn RandomSource) -> u32;
}

/// Production demand model: weather, upgrades, reputation, price, and noise.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarketDemand;

impl DemandModel for MarketDemand {
    fn demand_for_day(&mut self, state: &SimulationState, rng: &mut dyn RandomSource) -> u32 {
        demand_for_day(state, rng)
    }
}

/// Demand pinned to a fixed customer count. Still consumes the demand draw
/// so weather rolls line up with the production model.
#[derive(Debug, Clone, Copy)]
pub struct FixedDemand(pub u32);

impl DemandModel for FixedDemand {
    fn demand_for_day(&mut self, _state: &SimulationState, rng: &mut dyn RandomSource) -> u32 {
        let _ = rng.demand_unit();
        self.0
    }
}
