//! The day-cycle engine: one atomic transition per simulated day.
use serde::{Deserialize, Serialize};

use crate::constants::{
    AUTO_BUY_BASE_UNITS, AUTO_BUY_UNITS_PER_STAND, LEVEL_INTERVAL_DAYS, LEVEL_STOCK_BONUS,
    PRESSURE_PER_DAY, REPUTATION_MAX, REPUTATION_MIN, SWEETNESS_REPUTATION_BONUS, WASTE_RATE,
};
use crate::demand::{DemandModel, MarketDemand};
use crate::ledger::{achievement_check, achievement_line};
use crate::market::{format_money, pack_cost, reputation_delta};
use crate::numbers::round_f64_to_u32;
use crate::rng::{RandomSource, RngBundle};
use crate::state::SimulationState;
use crate::weather::Weather;

/// Units bought by the automatic restock before the day opened.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AutoRestock {
    pub units: u32,
    pub cost: f64,
}

/// Everything that happened during one `run_day` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayOutcome {
    /// The day that was played (before the counter advanced).
    pub day_run: u32,
    pub auto_restock: Option<AutoRestock>,
    pub demand: u32,
    pub sold: u32,
    pub waste: u32,
    pub revenue: f64,
    pub reputation_change: f64,
    pub leveled_up: bool,
    pub unlocked: Vec<u32>,
    /// Out of cash and stock. The session keeps accepting days.
    pub collapsed: bool,
    pub next_weather: Weather,
    /// Log lines emitted during the day, oldest first.
    pub events: Vec<String>,
}

/// Runs days against a state using injected randomness and demand.
#[derive(Debug, Clone)]
pub struct DayCycle<R = RngBundle, D = MarketDemand> {
    rng: R,
    demand: D,
}

impl DayCycle<RngBundle, MarketDemand> {
    /// Production engine seeded from a user-visible seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(RngBundle::from_user_seed(seed), MarketDemand)
    }
}

impl<R: RandomSource, D: DemandModel> DayCycle<R, D> {
    pub const fn new(rng: R, demand: D) -> Self {
        Self { rng, demand }
    }

    #[must_use]
    pub const fn rng(&self) -> &R {
        &self.rng
    }

    /// Advance `state` by one day.
    ///
    /// The work happens on a copy that is committed only once every step has
    /// run, so callers never observe a partial day.
    pub fn run_day(&mut self, state: &mut SimulationState) -> DayOutcome {
        let mut next = state.clone();
        let mut events = Vec::new();
        let day_run = next.day;

        let auto_restock = auto_restock(&mut next, &mut events);

        let demand = self.demand.demand_for_day(&next, &mut self.rng);
        let sold = demand.min(next.stock);
        let leftover = next.stock - sold;
        let waste = round_f64_to_u32(f64::from(leftover) * WASTE_RATE).min(leftover);
        let revenue = f64::from(sold) * next.price;

        next.stock = next.stock.saturating_sub(sold).saturating_sub(waste);
        next.cash += revenue;

        let reputation_before = next.reputation;
        next.reputation = (next.reputation
            + reputation_delta(next.price)
            + f64::from(next.sweetness) * SWEETNESS_REPUTATION_BONUS)
            .clamp(REPUTATION_MIN, REPUTATION_MAX);

        emit(
            &mut next,
            &mut events,
            format!(
                "📅 Day {day_run}: sold {sold}/{demand} cups, wasted {waste}, earned {}.",
                format_money(revenue)
            ),
        );

        next.day += 1;
        next.pressure += PRESSURE_PER_DAY;

        let leveled_up = next.day % LEVEL_INTERVAL_DAYS == 0;
        if leveled_up {
            next.level += 1;
            next.max_stock += LEVEL_STOCK_BONUS;
            let line = format!(
                "⭐ Level {} reached! Capacity now {}.",
                next.level, next.max_stock
            );
            emit(&mut next, &mut events, line);
        }

        let unlocked = achievement_check(&mut next);
        events.extend(unlocked.iter().copied().map(achievement_line));

        let collapsed = next.cash <= 0.0 && next.stock == 0;
        if collapsed {
            emit(
                &mut next,
                &mut events,
                "💸 Business collapsed: no cash and no stock left.".to_string(),
            );
            log::info!("stand collapsed on day {}", next.day);
        }

        next.weather = Weather::roll(&mut self.rng);

        log::debug!(
            "day {day_run}: demand {demand} sold {sold} waste {waste} revenue {revenue:.2} cash {:.2} rep {:.2}",
            next.cash,
            next.reputation
        );

        let outcome = DayOutcome {
            day_run,
            auto_restock,
            demand,
            sold,
            waste,
            revenue,
            reputation_change: next.reputation - reputation_before,
            leveled_up,
            unlocked,
            collapsed,
            next_weather: next.weather,
            events,
        };
        *state = next;
        outcome
    }
}

fn emit(state: &mut SimulationState, events: &mut Vec<String>, line: String) {
    state.push_log(line.clone());
    events.push(line);
}

fn auto_restock(state: &mut SimulationState, events: &mut Vec<String>) -> Option<AutoRestock> {
    if !state.auto_buy {
        return None;
    }
    let room = state.room();
    if room == 0 {
        return None;
    }
    let units = room.min(AUTO_BUY_BASE_UNITS + state.stands * AUTO_BUY_UNITS_PER_STAND);
    let cost = pack_cost(units, state);
    if cost > state.cash {
        return None;
    }
    state.cash -= cost;
    state.stock += units;
    emit(
        state,
        events,
        format!("🤖 Auto-buy restocked {units} units for {}.", format_money(cost)),
    );
    Some(AutoRestock { units, cost })
}
