pub mod policy;
pub mod reports;
pub mod seeds;
pub mod simulation;
pub mod tester;

pub use policy::{ALL_STRATEGIES, Strategy};
pub use seeds::{SeedInfo, resolve_seed_inputs};
pub use tester::*;
