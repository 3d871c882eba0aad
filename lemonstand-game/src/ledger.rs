//! Progress ledger: the rolling narrative log and day milestones.
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::constants::{
    LOG_CAPACITY, MILESTONES, PROGRESS_BASE, PROGRESS_PER_DAY, PROGRESS_PER_LEVEL,
};
use crate::state::SimulationState;

const fn default_capacity() -> usize {
    LOG_CAPACITY
}

/// Fixed-capacity log, newest entry first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredLog")]
pub struct EventLog {
    entries: VecDeque<String>,
    capacity: usize,
}

/// Persisted shape of [`EventLog`], normalized on the way in.
#[derive(Deserialize)]
struct StoredLog {
    #[serde(default)]
    entries: VecDeque<String>,
    #[serde(default = "default_capacity")]
    capacity: usize,
}

impl From<StoredLog> for EventLog {
    fn from(stored: StoredLog) -> Self {
        let mut log = Self::with_capacity(stored.capacity);
        log.entries = stored.entries;
        log.entries.truncate(log.capacity);
        log
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::with_capacity(LOG_CAPACITY)
    }
}

impl EventLog {
    /// A zero capacity is bumped to one so the latest line is always kept.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a line to the front, dropping the oldest once full.
    pub fn push(&mut self, line: impl Into<String>) {
        self.entries.push_front(line.into());
        self.entries.truncate(self.capacity);
    }

    #[must_use]
    pub fn latest(&self) -> Option<&str> {
        self.entries.front().map(String::as_str)
    }

    /// Iterate newest first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<String> {
        self.entries.iter().cloned().collect()
    }
}

/// Log line written when `milestone` unlocks.
#[must_use]
pub fn achievement_line(milestone: u32) -> String {
    format!("🏆 Achievement unlocked: {milestone} days in business!")
}

/// Unlock every milestone the current day has reached, once each.
///
/// Returns the milestones unlocked by this call, in ascending order.
pub fn achievement_check(state: &mut SimulationState) -> Vec<u32> {
    let mut unlocked = Vec::new();
    for milestone in MILESTONES {
        if state.day >= milestone && state.achievements.insert(milestone) {
            state.push_log(achievement_line(milestone));
            unlocked.push(milestone);
        }
    }
    unlocked
}

/// Level progress bar fill, `0..=100`.
#[must_use]
pub fn progress_percent(state: &SimulationState) -> u32 {
    let raw = PROGRESS_BASE
        .saturating_add(state.level.saturating_mul(PROGRESS_PER_LEVEL))
        .saturating_add((state.day % 8) * PROGRESS_PER_DAY);
    raw.min(100)
}
