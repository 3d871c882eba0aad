use colored::Colorize;
use lemonstand_game::KeyValueStore;
use serde::Serialize;
use std::time::{Duration, Instant};

use crate::logic::policy::Strategy;
use crate::logic::seeds::SeedInfo;
use crate::logic::simulation::{RunRecord, SimulationConfig, iteration_seed, run_session};

/// Aggregate of every iteration of one strategy on one seed.
#[derive(Debug, Clone, Serialize)]
pub struct StrategyResult {
    pub strategy: Strategy,
    pub seed: u64,
    pub room_code: String,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub failures: Vec<String>,
    pub mean_cash: f64,
    pub mean_score: f64,
    pub best_score: i64,
    pub collapse_runs: usize,
    pub mean_rejected_commands: f64,
    #[serde(with = "duration_serde")]
    pub average_duration: Duration,
}

impl StrategyResult {
    /// Folds run records into one result. `durations` pairs with `records`.
    #[must_use]
    pub fn from_records(
        seed: &SeedInfo,
        strategy: Strategy,
        records: &[RunRecord],
        durations: &[Duration],
    ) -> Self {
        let failures: Vec<String> = records
            .iter()
            .enumerate()
            .flat_map(|(index, record)| {
                record.invariant_failures.iter().map(move |failure| {
                    format!("iteration {} (seed {}): {failure}", index + 1, record.seed)
                })
            })
            .collect();
        let successful_iterations = records.iter().filter(|record| record.passed()).count();

        #[allow(clippy::cast_precision_loss)]
        let count = records.len().max(1) as f64;
        #[allow(clippy::cast_precision_loss)]
        let mean_score = records
            .iter()
            .map(|record| record.score as f64)
            .sum::<f64>()
            / count;
        #[allow(clippy::cast_precision_loss)]
        let mean_rejected_commands = records
            .iter()
            .map(|record| record.commands_rejected as f64)
            .sum::<f64>()
            / count;

        let average_duration = if durations.is_empty() {
            Duration::ZERO
        } else {
            durations.iter().sum::<Duration>() / u32::try_from(durations.len()).unwrap_or(1)
        };

        Self {
            strategy,
            seed: seed.seed,
            room_code: seed.display_code(),
            passed: failures.is_empty(),
            iterations_run: records.len(),
            successful_iterations,
            failures,
            mean_cash: records.iter().map(|record| record.final_cash).sum::<f64>() / count,
            mean_score,
            best_score: records.iter().map(|record| record.score).max().unwrap_or(0),
            collapse_runs: records
                .iter()
                .filter(|record| !record.collapse_days.is_empty())
                .count(),
            mean_rejected_commands,
            average_duration,
        }
    }
}

pub struct StrategyTester {
    days: u32,
    verbose: bool,
}

impl StrategyTester {
    pub const fn new(days: u32, verbose: bool) -> Self {
        Self { days, verbose }
    }

    /// Runs `iterations` sessions per seed. Every session saves into a clone
    /// of `store`, so shared stores accumulate one leaderboard.
    pub fn run_strategy<S: KeyValueStore + Clone>(
        &self,
        strategy: Strategy,
        seeds: &[SeedInfo],
        iterations: usize,
        store: &S,
    ) -> Vec<StrategyResult> {
        seeds
            .iter()
            .map(|seed| {
                if self.verbose {
                    println!(
                        "🧪 Testing strategy: {} (seed: {} {})",
                        strategy.label().bright_white(),
                        seed.seed,
                        seed.display_code()
                    );
                }
                self.run_seed(strategy, seed, iterations, store)
            })
            .collect()
    }

    fn run_seed<S: KeyValueStore + Clone>(
        &self,
        strategy: Strategy,
        seed: &SeedInfo,
        iterations: usize,
        store: &S,
    ) -> StrategyResult {
        let mut records = Vec::with_capacity(iterations);
        let mut durations = Vec::with_capacity(iterations);

        for i in 0..iterations {
            let start_time = Instant::now();
            let run_seed = iteration_seed(seed.seed, u64::try_from(i).unwrap_or(u64::MAX));
            let config = SimulationConfig::new(strategy, run_seed).with_days(self.days);
            let record = run_session(config, store.clone());
            let duration = start_time.elapsed();

            for warning in &record.save_warnings {
                log::warn!("[{} seed {run_seed}] score not saved: {warning}", strategy.key());
            }

            if self.verbose {
                if record.passed() {
                    println!(
                        "  ✅ Iteration {}/{} passed ({duration:?}) day:{} cash:{:.2} score:{}",
                        i + 1,
                        iterations,
                        record.final_day,
                        record.final_cash,
                        record.score
                    );
                } else {
                    println!(
                        "  ❌ Iteration {}/{} failed: {}",
                        i + 1,
                        iterations,
                        record.invariant_failures.join("; ").red()
                    );
                }
            }

            durations.push(duration);
            records.push(record);
        }

        StrategyResult::from_records(seed, strategy, &records, &durations)
    }
}

mod duration_serde {
    use serde::{Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_millis().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lemonstand_game::{MemoryStore, ScoreBook};

    #[test]
    fn runs_every_seed_and_iteration() {
        let tester = StrategyTester::new(6, false);
        let seeds = vec![SeedInfo::from_numeric(1), SeedInfo::from_numeric(2)];
        let store = MemoryStore::new();
        let results = tester.run_strategy(Strategy::SweetSpot, &seeds, 3, &store);
        assert_eq!(results.len(), 2);
        for result in &results {
            assert!(result.passed, "{:?}", result.failures);
            assert_eq!(result.iterations_run, 3);
            assert_eq!(result.successful_iterations, 3);
            assert!(result.best_score as f64 >= result.mean_score);
        }
        assert!(ScoreBook::new(store).load().len() >= 6);
    }

    #[test]
    fn failures_are_labelled_by_iteration() {
        let seed = SeedInfo::from_numeric(4);
        let mut record = run_session(
            SimulationConfig::new(Strategy::Bargain, 4).with_days(2),
            MemoryStore::new(),
        );
        record.invariant_failures.push("stock over capacity".to_string());
        let result = StrategyResult::from_records(&seed, Strategy::Bargain, &[record], &[]);
        assert!(!result.passed);
        assert_eq!(result.successful_iterations, 0);
        assert_eq!(
            result.failures,
            vec!["iteration 1 (seed 4): stock over capacity".to_string()]
        );
        assert_eq!(result.average_duration, Duration::ZERO);
    }

    #[test]
    fn duration_serializes_as_millis() {
        let result = StrategyResult::from_records(
            &SeedInfo::from_numeric(0),
            Strategy::Premium,
            &[],
            &[Duration::from_millis(30), Duration::from_millis(10)],
        );
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["average_duration"], 20);
        assert_eq!(json["strategy"], "premium");
        assert_eq!(json["room_code"], "LS-LEMON00");
    }
}
