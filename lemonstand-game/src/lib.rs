//! Lemonstand Game Engine
//!
//! Platform-agnostic day-cycle simulation for a lemonade stand.
//! This crate provides all game mechanics without UI or platform-specific dependencies;
//! renderers consume a [`StateSnapshot`] after each command.

pub mod config;
pub mod constants;
pub mod day_cycle;
pub mod demand;
pub mod economy;
pub mod ledger;
pub mod market;
pub mod numbers;
pub mod rng;
pub mod room;
pub mod score;
pub mod session;
pub mod snapshot;
pub mod state;
pub mod weather;

// Re-export commonly used types
pub use config::{ConfigError, OpeningConfig, StandConfig};
pub use day_cycle::{AutoRestock, DayCycle, DayOutcome};
pub use demand::{DemandModel, FixedDemand, MarketDemand, base_demand, demand_for_day};
pub use economy::{
    PurchaseOutcome, PurchaseRejection, RestockOutcome, UPGRADE_ORDER, Upgrade, UpgradeQuote,
    purchase, restock, upgrade_quotes,
};
pub use ledger::{EventLog, achievement_check, achievement_line, progress_percent};
pub use market::{
    PriceBand, RestockAvailability, RestockQuote, format_money, market_price, pack_cost,
    reputation_delta, restock_quote, restock_quotes, warning_text,
};
pub use rng::{RandomSource, RngBundle, SequenceSource};
pub use room::{parse_room_code, room_code_for_seed};
pub use score::{
    Clock, FixedClock, HighscoreEntry, KeyValueStore, Leaderboard, MemoryStore, PersistenceError,
    ScoreBook, SystemClock, score_value,
};
pub use session::StandSession;
pub use snapshot::StateSnapshot;
pub use state::{InvariantViolation, SimulationState};
pub use weather::Weather;
