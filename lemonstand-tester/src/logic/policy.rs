use std::fmt;

use lemonstand_game::constants::RESTOCK_PACKS;
use lemonstand_game::{SimulationState, UPGRADE_ORDER, Upgrade, restock_quotes};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

/// One command a policy issues against the session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    SetPrice(f64),
    Restock(u32),
    ToggleAutoBuy(bool),
    Buy(Upgrade),
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SetPrice(price) => write!(f, "set price {price:.2}"),
            Self::Restock(units) => write!(f, "restock {units}"),
            Self::ToggleAutoBuy(enabled) => write!(f, "auto-buy {enabled}"),
            Self::Buy(upgrade) => write!(f, "buy {upgrade}"),
        }
    }
}

/// Policy interface for automated play strategies.
pub trait StandPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Commands to issue before the next day runs.
    fn plan_day(&mut self, state: &SimulationState) -> Vec<Command>;
}

/// Built-in strategies for automated runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    SweetSpot,
    Premium,
    Bargain,
    Tycoon,
    RandomWalk,
}

pub const ALL_STRATEGIES: [Strategy; 5] = [
    Strategy::SweetSpot,
    Strategy::Premium,
    Strategy::Bargain,
    Strategy::Tycoon,
    Strategy::RandomWalk,
];

impl Strategy {
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::SweetSpot => "sweet-spot",
            Self::Premium => "premium",
            Self::Bargain => "bargain",
            Self::Tycoon => "tycoon",
            Self::RandomWalk => "random-walk",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SweetSpot => "Sweet Spot",
            Self::Premium => "Premium",
            Self::Bargain => "Bargain",
            Self::Tycoon => "Tycoon",
            Self::RandomWalk => "Random Walk",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::SweetSpot => "Prices at $0.45, restocks by hand, invests in recipe",
            Self::Premium => "Prices at $0.95 and leans on advertising",
            Self::Bargain => "Undercuts at $0.22 with auto-buy on",
            Self::Tycoon => "Opens stands as soon as they unlock, auto-buy on",
            Self::RandomWalk => "Issues random, often invalid, commands every day",
        }
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        ALL_STRATEGIES
            .into_iter()
            .find(|strategy| strategy.key().eq_ignore_ascii_case(key))
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn StandPolicy> {
        match self {
            Self::SweetSpot => Box::new(SweetSpotPolicy),
            Self::Premium => Box::new(PremiumPolicy),
            Self::Bargain => Box::new(BargainPolicy),
            Self::Tycoon => Box::new(TycoonPolicy),
            Self::RandomWalk => Box::new(RandomWalkPolicy::new(seed)),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

struct SweetSpotPolicy;
struct PremiumPolicy;
struct BargainPolicy;
struct TycoonPolicy;

struct RandomWalkPolicy {
    rng: ChaCha8Rng,
}

impl RandomWalkPolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

/// Largest fixed pack that fits and costs at most `budget_share` of cash.
fn best_pack(state: &SimulationState, budget_share: f64) -> Option<u32> {
    restock_quotes(state)
        .into_iter()
        .filter(|quote| quote.is_available() && quote.cost <= state.cash * budget_share)
        .map(|quote| quote.units)
        .max()
}

fn affordable_with_reserve(state: &SimulationState, upgrade: Upgrade, reserve: f64) -> bool {
    upgrade.check(state).is_ok() && state.cash - upgrade.cost(state) >= reserve
}

impl StandPolicy for SweetSpotPolicy {
    fn name(&self) -> &'static str {
        "Sweet Spot"
    }

    fn plan_day(&mut self, state: &SimulationState) -> Vec<Command> {
        let mut commands = vec![Command::SetPrice(0.45)];
        if affordable_with_reserve(state, Upgrade::Sweetness, 12.0) {
            commands.push(Command::Buy(Upgrade::Sweetness));
        }
        if state.stock < 20
            && let Some(units) = best_pack(state, 0.6)
        {
            commands.push(Command::Restock(units));
        }
        commands
    }
}

impl StandPolicy for PremiumPolicy {
    fn name(&self) -> &'static str {
        "Premium"
    }

    fn plan_day(&mut self, state: &SimulationState) -> Vec<Command> {
        let mut commands = vec![Command::SetPrice(0.95)];
        if affordable_with_reserve(state, Upgrade::Advertising, 8.0) {
            commands.push(Command::Buy(Upgrade::Advertising));
        }
        if state.stock < 15
            && let Some(units) = best_pack(state, 0.5)
        {
            commands.push(Command::Restock(units));
        }
        commands
    }
}

impl StandPolicy for BargainPolicy {
    fn name(&self) -> &'static str {
        "Bargain"
    }

    fn plan_day(&mut self, state: &SimulationState) -> Vec<Command> {
        let mut commands = vec![Command::SetPrice(0.22)];
        if !state.auto_buy {
            commands.push(Command::ToggleAutoBuy(true));
        }
        commands
    }
}

impl StandPolicy for TycoonPolicy {
    fn name(&self) -> &'static str {
        "Tycoon"
    }

    fn plan_day(&mut self, state: &SimulationState) -> Vec<Command> {
        let mut commands = vec![Command::SetPrice(0.55)];
        if !state.auto_buy {
            commands.push(Command::ToggleAutoBuy(true));
        }
        if affordable_with_reserve(state, Upgrade::Stand, 5.0) {
            commands.push(Command::Buy(Upgrade::Stand));
        } else if state.stands > 1 && affordable_with_reserve(state, Upgrade::Advertising, 20.0) {
            commands.push(Command::Buy(Upgrade::Advertising));
        }
        commands
    }
}

impl StandPolicy for RandomWalkPolicy {
    fn name(&self) -> &'static str {
        "Random Walk"
    }

    fn plan_day(&mut self, _state: &SimulationState) -> Vec<Command> {
        let count = self.rng.gen_range(1..=4);
        (0..count)
            .map(|_| match self.rng.gen_range(0..4) {
                0 => Command::SetPrice(self.rng.gen_range(-1.0..7.0)),
                1 => {
                    let units = if self.rng.gen_bool(0.7) {
                        RESTOCK_PACKS[self.rng.gen_range(0..RESTOCK_PACKS.len())]
                    } else {
                        self.rng.gen_range(0..150)
                    };
                    Command::Restock(units)
                }
                2 => Command::ToggleAutoBuy(self.rng.r#gen::<bool>()),
                _ => Command::Buy(UPGRADE_ORDER[self.rng.gen_range(0..UPGRADE_ORDER.len())]),
            })
            .collect()
    }
}
