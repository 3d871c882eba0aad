//! Session scoring and the persisted leaderboard
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::cell::RefCell;
use std::collections::HashMap;
use std::convert::Infallible;
use std::rc::Rc;
use thiserror::Error;

use crate::constants::{
    LEADERBOARD_CAPACITY, LEADERBOARD_KEY, SCORE_AD_WEIGHT, SCORE_CASH_WEIGHT, SCORE_DAY_WEIGHT,
    SCORE_REPUTATION_WEIGHT, SCORE_STAND_WEIGHT,
};
use crate::numbers::{round_cents, round_f64_to_i64};
use crate::state::SimulationState;

/// Score for the current session.
#[must_use]
pub fn score_value(state: &SimulationState) -> i64 {
    round_f64_to_i64(
        state.cash * SCORE_CASH_WEIGHT
            + f64::from(state.day) * SCORE_DAY_WEIGHT
            + state.reputation * SCORE_REPUTATION_WEIGHT
            + f64::from(state.stands) * SCORE_STAND_WEIGHT
            + f64::from(state.ad_level) * SCORE_AD_WEIGHT,
    )
}

fn serialize_cents<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(round_cents(*value))
}

/// One persisted leaderboard row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighscoreEntry {
    pub score: i64,
    pub day: u32,
    #[serde(serialize_with = "serialize_cents")]
    pub cash: f64,
    pub stands: u32,
    pub stamp: DateTime<Utc>,
}

impl HighscoreEntry {
    #[must_use]
    pub fn from_state(state: &SimulationState, stamp: DateTime<Utc>) -> Self {
        Self {
            score: score_value(state),
            day: state.day,
            cash: round_cents(state.cash),
            stands: state.stands,
            stamp,
        }
    }
}

/// Entries sorted by descending score, capped in length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Leaderboard {
    entries: Vec<HighscoreEntry>,
}

impl Default for Leaderboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Leaderboard {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Restore the ordering and length rules on arbitrary entries.
    #[must_use]
    pub fn from_entries(mut entries: Vec<HighscoreEntry>, capacity: usize) -> Self {
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(capacity);
        Self { entries }
    }

    /// Insert an entry. Ties keep earlier entries ahead.
    pub fn insert(&mut self, entry: HighscoreEntry, capacity: usize) {
        self.entries.push(entry);
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(capacity);
    }

    #[must_use]
    pub fn entries(&self) -> &[HighscoreEntry] {
        &self.entries
    }

    #[must_use]
    pub fn best(&self) -> Option<&HighscoreEntry> {
        self.entries.first()
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
    pub fn is_sorted_descending(&self) -> bool {
        self.entries.windows(2).all(|pair| pair[0].score >= pair[1].score)
    }
}

/// Trait for abstracting the key-value storage the leaderboard lives in.
/// Platform-specific implementations should provide this.
pub trait KeyValueStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read a value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error>;

    /// Remove a value. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), Self::Error>;
}

/// In-memory store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }
}

impl KeyValueStore for MemoryStore {
    type Error = Infallible;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        self.values.borrow_mut().remove(key);
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("leaderboard data is corrupt: {0}")]
    Corrupt(#[source] serde_json::Error),
    #[error("leaderboard could not be encoded: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("storage backend failed: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl PersistenceError {
    fn storage<E: std::error::Error + Send + Sync + 'static>(err: E) -> Self {
        Self::Storage(Box::new(err))
    }
}

/// Source of timestamps for new leaderboard entries.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// The leaderboard bound to a store, key, and capacity.
#[derive(Debug, Clone)]
pub struct ScoreBook<S> {
    store: S,
    key: String,
    capacity: usize,
}

impl<S: KeyValueStore> ScoreBook<S> {
    #[must_use]
    pub fn new(store: S) -> Self {
        Self::with_key(store, LEADERBOARD_KEY, LEADERBOARD_CAPACITY)
    }

    #[must_use]
    pub fn with_key(store: S, key: impl Into<String>, capacity: usize) -> Self {
        Self {
            store,
            key: key.into(),
            capacity: capacity.max(1),
        }
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the stored leaderboard, strictly.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Corrupt`] for malformed data and
    /// [`PersistenceError::Storage`] when the backend fails.
    pub fn try_load(&self) -> Result<Leaderboard, PersistenceError> {
        let Some(raw) = self.store.get(&self.key).map_err(PersistenceError::storage)? else {
            return Ok(Leaderboard::new());
        };
        let entries: Vec<HighscoreEntry> =
            serde_json::from_str(&raw).map_err(PersistenceError::Corrupt)?;
        Ok(Leaderboard::from_entries(entries, self.capacity))
    }

    /// Read the stored leaderboard. Missing or unreadable data yields an empty board.
    #[must_use]
    pub fn load(&self) -> Leaderboard {
        self.try_load().unwrap_or_else(|err| {
            log::warn!("discarding leaderboard under '{}': {err}", self.key);
            Leaderboard::new()
        })
    }

    /// Record the session's score and write the updated board back.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Encode`] if the board cannot be serialized
    /// and [`PersistenceError::Storage`] if it cannot be written.
    pub fn save_current_score(
        &self,
        state: &SimulationState,
        clock: &dyn Clock,
    ) -> Result<Leaderboard, PersistenceError> {
        let mut board = self.load();
        board.insert(HighscoreEntry::from_state(state, clock.now()), self.capacity);
        let json = serde_json::to_string(&board).map_err(PersistenceError::Encode)?;
        self.store
            .set(&self.key, &json)
            .map_err(PersistenceError::storage)?;
        log::debug!("saved score {} ({} entries)", score_value(state), board.len());
        Ok(board)
    }

    /// Delete every persisted entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    pub fn clear(&self) -> Result<(), PersistenceError> {
        self.store
            .remove(&self.key)
            .map_err(PersistenceError::storage)
    }
}
