use lemonstand_game::{KeyValueStore, StandSession, Upgrade};
use serde::Serialize;

use crate::logic::policy::{Command, Strategy};

/// Configuration for a simulation session.
#[derive(Debug, Clone, Copy)]
pub struct SimulationConfig {
    pub strategy: Strategy,
    pub seed: u64,
    pub days: u32,
}

impl SimulationConfig {
    #[must_use]
    pub const fn new(strategy: Strategy, seed: u64) -> Self {
        Self {
            strategy,
            seed,
            days: 60,
        }
    }

    #[must_use]
    pub const fn with_days(mut self, days: u32) -> Self {
        self.days = days;
        self
    }
}

/// Outcome of one scripted session.
#[derive(Debug, Clone, Serialize)]
pub struct RunRecord {
    pub strategy: Strategy,
    pub seed: u64,
    pub room_code: String,
    pub days_played: u32,
    pub final_day: u32,
    pub final_cash: f64,
    pub final_stands: u32,
    pub score: i64,
    pub achievements: Vec<u32>,
    pub collapse_days: Vec<u32>,
    pub commands_issued: usize,
    pub commands_rejected: usize,
    pub invariant_failures: Vec<String>,
    pub save_warnings: Vec<String>,
}

impl RunRecord {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.invariant_failures.is_empty()
    }
}

/// Deterministic seed for one iteration of a base seed.
#[must_use]
pub const fn iteration_seed(seed: u64, iteration: u64) -> u64 {
    seed.wrapping_add(iteration.wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

/// Play `config.days` days with the strategy's policy, checking invariants
/// after every command and every day.
pub fn run_session<S: KeyValueStore>(config: SimulationConfig, store: S) -> RunRecord {
    let mut session = StandSession::new(store, config.seed);
    let mut policy = config.strategy.create_policy(config.seed);
    let mut record = RunRecord {
        strategy: config.strategy,
        seed: config.seed,
        room_code: session.room_code().to_string(),
        days_played: 0,
        final_day: session.state().day,
        final_cash: session.state().cash,
        final_stands: session.state().stands,
        score: 0,
        achievements: Vec::new(),
        collapse_days: Vec::new(),
        commands_issued: 0,
        commands_rejected: 0,
        invariant_failures: Vec::new(),
        save_warnings: Vec::new(),
    };

    for _ in 0..config.days {
        let day = session.state().day;
        for command in policy.plan_day(session.state()) {
            record.commands_issued += 1;
            if !apply(&mut session, command) {
                record.commands_rejected += 1;
            }
            if let Err(err) = session.state().check_invariants() {
                record
                    .invariant_failures
                    .push(format!("day {day}: after {command}: {err}"));
            }
        }

        let outcome = session.run_day();
        record.days_played += 1;
        if outcome.collapsed {
            record.collapse_days.push(outcome.day_run);
        }
        if let Err(err) = session.state().check_invariants() {
            record
                .invariant_failures
                .push(format!("day {day}: after run_day: {err}"));
        }
        log::debug!(
            "[{} seed {}] {}",
            policy.name(),
            config.seed,
            outcome.events.join(" | ")
        );
    }

    match session.save_score() {
        Ok(board) => {
            let capacity = session.config().leaderboard_capacity;
            if board.len() > capacity || !board.is_sorted_descending() {
                record.invariant_failures.push(format!(
                    "leaderboard has {} entries or is out of order",
                    board.len()
                ));
            }
        }
        Err(err) => record.save_warnings.push(err.to_string()),
    }

    let state = session.state();
    record.final_day = state.day;
    record.final_cash = state.cash;
    record.final_stands = state.stands;
    record.score = session.snapshot().score;
    record.achievements = state.achievements.iter().copied().collect();
    record
}

/// Returns whether the command changed anything.
fn apply<S: KeyValueStore>(session: &mut StandSession<S>, command: Command) -> bool {
    match command {
        Command::SetPrice(price) => session.set_price(price),
        Command::Restock(units) => session.restock(units).is_restocked(),
        Command::ToggleAutoBuy(enabled) => {
            session.toggle_auto_buy(enabled);
            true
        }
        Command::Buy(Upgrade::Stand) => session.buy_stand().is_purchased(),
        Command::Buy(Upgrade::Sweetness) => session.buy_sweet().is_purchased(),
        Command::Buy(Upgrade::Advertising) => session.buy_ad().is_purchased(),
    }
}
