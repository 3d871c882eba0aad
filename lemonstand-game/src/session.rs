use crate::config::{ConfigError, StandConfig};
use crate::day_cycle::{DayCycle, DayOutcome};
use crate::demand::{DemandModel, MarketDemand};
use crate::economy::{PurchaseOutcome, RestockOutcome, Upgrade, purchase, restock};
use crate::rng::{RandomSource, RngBundle};
use crate::room::{next_room_seed, room_code_for_seed};
use crate::score::{Clock, KeyValueStore, Leaderboard, PersistenceError, ScoreBook, SystemClock};
use crate::snapshot::StateSnapshot;
use crate::state::SimulationState;

/// Command surface binding one simulation state to its engine, score book, and clock.
#[derive(Debug, Clone)]
pub struct StandSession<S, C = SystemClock, R = RngBundle, D = MarketDemand> {
    config: StandConfig,
    state: SimulationState,
    cycle: DayCycle<R, D>,
    scores: ScoreBook<S>,
    clock: C,
    room_seed: u64,
}

impl<S: KeyValueStore> StandSession<S> {
    /// Production session with the default config, seeded randomness, and the system clock.
    #[must_use]
    pub fn new(store: S, seed: u64) -> Self {
        let config = StandConfig::default();
        let scores = ScoreBook::with_key(
            store,
            config.leaderboard_key.clone(),
            config.leaderboard_capacity,
        );
        let state = config.opening_state(room_code_for_seed(seed));
        Self {
            config,
            state,
            cycle: DayCycle::seeded(seed),
            scores,
            clock: SystemClock,
            room_seed: seed,
        }
    }
}

impl<S, C, R, D> StandSession<S, C, R, D>
where
    S: KeyValueStore,
    C: Clock,
    R: RandomSource,
    D: DemandModel,
{
    /// Assemble a session from explicit parts.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` fails validation.
    pub fn with_parts(
        config: StandConfig,
        store: S,
        clock: C,
        cycle: DayCycle<R, D>,
        room_seed: u64,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let scores = ScoreBook::with_key(
            store,
            config.leaderboard_key.clone(),
            config.leaderboard_capacity,
        );
        let state = config.opening_state(room_code_for_seed(room_seed));
        Ok(Self {
            config,
            state,
            cycle,
            scores,
            clock,
            room_seed,
        })
    }

    #[must_use]
    pub const fn state(&self) -> &SimulationState {
        &self.state
    }

    #[must_use]
    pub const fn config(&self) -> &StandConfig {
        &self.config
    }

    #[must_use]
    pub const fn cycle(&self) -> &DayCycle<R, D> {
        &self.cycle
    }

    #[must_use]
    pub const fn scores(&self) -> &ScoreBook<S> {
        &self.scores
    }

    #[must_use]
    pub fn room_code(&self) -> &str {
        &self.state.room_code
    }

    pub fn set_price(&mut self, value: f64) -> bool {
        self.state.set_price(value)
    }

    pub fn set_price_input(&mut self, text: &str) -> bool {
        self.state.set_price_input(text)
    }

    pub fn restock(&mut self, units: u32) -> RestockOutcome {
        restock(&mut self.state, units)
    }

    pub const fn toggle_auto_buy(&mut self, enabled: bool) {
        self.state.toggle_auto_buy(enabled);
    }

    /// Play one day. A collapse records the score; a failed write is logged
    /// and the session carries on.
    pub fn run_day(&mut self) -> DayOutcome {
        let outcome = self.cycle.run_day(&mut self.state);
        if outcome.collapsed
            && let Err(err) = self.save_score()
        {
            log::warn!("could not record score after collapse: {err}");
        }
        outcome
    }

    pub fn buy_stand(&mut self) -> PurchaseOutcome {
        purchase(&mut self.state, Upgrade::Stand)
    }

    pub fn buy_sweet(&mut self) -> PurchaseOutcome {
        purchase(&mut self.state, Upgrade::Sweetness)
    }

    pub fn buy_ad(&mut self) -> PurchaseOutcome {
        purchase(&mut self.state, Upgrade::Advertising)
    }

    /// Replace the state with a fresh opening state in a new room.
    /// The leaderboard and the random streams carry over.
    pub fn new_game(&mut self) {
        self.room_seed = next_room_seed(self.room_seed);
        self.state = self
            .config
            .opening_state(room_code_for_seed(self.room_seed));
        log::info!("new game in room {}", self.state.room_code);
    }

    /// # Errors
    ///
    /// Returns an error if the leaderboard cannot be written.
    pub fn save_score(&mut self) -> Result<Leaderboard, PersistenceError> {
        self.scores.save_current_score(&self.state, &self.clock)
    }

    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn clear_scores(&mut self) -> Result<(), PersistenceError> {
        self.scores.clear()
    }

    #[must_use]
    pub fn leaderboard(&self) -> Leaderboard {
        self.scores.load()
    }

    #[must_use]
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot::capture(&self.state, &self.leaderboard())
    }
}
