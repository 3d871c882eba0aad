//! Centralized balance and tuning constants for Lemonstand game logic.
//!
//! These values define the deterministic math for the core simulation.
//! Keeping them together ensures that game balance can only be adjusted via
//! code changes reviewed in version control, rather than through external
//! JSON assets.

// Price bounds -------------------------------------------------------------
pub const PRICE_MIN: f64 = 0.05;
pub const PRICE_MAX: f64 = 5.00;
pub const REPUTATION_MIN: f64 = 0.0;
pub const REPUTATION_MAX: f64 = 20.0;

// Market model -------------------------------------------------------------
pub const MARKET_BASE_PRICE: f64 = 0.2275;
pub const MARKET_DAY_INFLATION: f64 = 0.02;
pub const MARKET_PRESSURE_INFLATION: f64 = 0.06;
pub const RESTOCK_PACKS: [u32; 4] = [10, 25, 50, 100];

// Demand model -------------------------------------------------------------
pub const DEMAND_SUNNY: f64 = 28.0;
pub const DEMAND_CLOUDY: f64 = 19.0;
pub const DEMAND_RAINY: f64 = 11.0;
pub const STAND_DEMAND_BOOST: f64 = 0.42;
pub const AD_DEMAND_BOOST: f64 = 0.14;
pub const SWEETNESS_DEMAND_BOOST: f64 = 0.12;
pub const REPUTATION_DEMAND_BOOST: f64 = 0.018;
pub const PRESSURE_DEMAND_PENALTY: f64 = 0.09;
pub const PRESSURE_DEMAND_FLOOR: f64 = 0.34;
pub const PRICE_ELASTICITY: f64 = 0.72;
pub const PRICE_FACTOR_MIN: f64 = 0.12;
pub const PRICE_FACTOR_MAX: f64 = 2.0;
pub const DEMAND_NOISE_SPAN: f64 = 6.0;
pub const DEMAND_NOISE_OFFSET: f64 = 3.0;

// Day cycle ----------------------------------------------------------------
pub const AUTO_BUY_BASE_UNITS: u32 = 25;
pub const AUTO_BUY_UNITS_PER_STAND: u32 = 3;
pub const WASTE_RATE: f64 = 0.06;
pub const PRESSURE_PER_DAY: f64 = 0.06;
pub const LEVEL_INTERVAL_DAYS: u32 = 8;
pub const LEVEL_STOCK_BONUS: u32 = 5;
pub const SWEETNESS_REPUTATION_BONUS: f64 = 0.02;

// Reputation bands ----------------------------------------------------------
pub const REP_SWEET_SPOT_LOW: f64 = 0.3;
pub const REP_SWEET_SPOT_HIGH: f64 = 0.6;
pub const REP_SWEET_SPOT_GAIN: f64 = 0.35;
pub const REP_OVERPRICED_THRESHOLD: f64 = 1.0;
pub const REP_OVERPRICED_LOSS: f64 = -0.55;
pub const REP_UNDERPRICED_THRESHOLD: f64 = 0.2;
pub const REP_UNDERPRICED_LOSS: f64 = -0.2;
pub const REP_NEUTRAL_DRIFT: f64 = -0.05;

// Advisory bands -------------------------------------------------------------
pub const ADVISORY_LOW_MAX: f64 = 0.25;
pub const ADVISORY_SWEET_MAX: f64 = 0.6;
pub const ADVISORY_SOFT_MAX: f64 = 1.0;

// Upgrades -----------------------------------------------------------------
pub const STAND_COST_BASE: f64 = 24.0;
pub const STAND_COST_STEP: f64 = 15.0;
pub const STAND_UNLOCK_AFTER_DAY: u32 = 3;
pub const STAND_STOCK_BONUS: u32 = 20;
pub const SWEET_COST_BASE: f64 = 14.0;
pub const SWEET_COST_STEP: f64 = 10.0;
pub const AD_COST_BASE: f64 = 18.0;
pub const AD_COST_STEP: f64 = 12.0;

// Progress -----------------------------------------------------------------
pub const MILESTONES: [u32; 3] = [10, 50, 100];
pub const LOG_CAPACITY: usize = 80;
pub const PROGRESS_BASE: u32 = 8;
pub const PROGRESS_PER_LEVEL: u32 = 17;
pub const PROGRESS_PER_DAY: u32 = 6;

// Scoring ------------------------------------------------------------------
pub const SCORE_CASH_WEIGHT: f64 = 12.0;
pub const SCORE_DAY_WEIGHT: f64 = 25.0;
pub const SCORE_REPUTATION_WEIGHT: f64 = 18.0;
pub const SCORE_STAND_WEIGHT: f64 = 80.0;
pub const SCORE_AD_WEIGHT: f64 = 30.0;
pub const LEADERBOARD_CAPACITY: usize = 12;
pub const LEADERBOARD_KEY: &str = "lemonstand.highscores";
