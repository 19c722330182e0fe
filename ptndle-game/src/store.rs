//! Per-mode session persistence over a pluggable key-value backend.
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::clock::Clock;
use crate::constants::{LAST_PLAYED_KEY, MAX_GUESSES};
use crate::error::StoreError;
use crate::seed::{utc_date, utc_timestamp};
use crate::state::{DebugKey, DebugValue, GameMode, SessionRecord};

/// Minimal string key-value storage, e.g. browser `localStorage`.
pub trait KeyValueStore {
    /// Read a value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Whether `key` holds a value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn has(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.get(key)?.is_some())
    }
}

/// In-process backend. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Read the debug map of a record.
#[must_use]
pub fn get_debug_value(record: &SessionRecord, key: DebugKey) -> Option<DebugValue> {
    record.debug.get(key)
}

fn is_well_formed(record: &SessionRecord, mode: GameMode) -> bool {
    let guesses = record.guesses();
    let unique: HashSet<&str> = guesses.iter().map(String::as_str).collect();
    record.mode == mode
        && !record.data.seed.is_empty()
        && guesses.len() <= MAX_GUESSES
        && unique.len() == guesses.len()
}

/// Session records for both modes plus the last-played marker.
#[derive(Debug, Clone)]
pub struct GameStore<S, C> {
    backend: S,
    clock: C,
}

impl<S, C> GameStore<S, C>
where
    S: KeyValueStore,
    C: Clock,
{
    pub const fn new(backend: S, clock: C) -> Self {
        Self { backend, clock }
    }

    pub const fn backend(&self) -> &S {
        &self.backend
    }

    pub const fn clock(&self) -> &C {
        &self.clock
    }

    /// Today's UTC date, the daily seed.
    pub fn today(&self) -> String {
        utc_date(self.clock.now())
    }

    /// Stored record for `mode`, or a fresh one seeded with today's date.
    /// Fresh records are not written until the first save.
    pub fn load_game(&self, mode: GameMode) -> SessionRecord {
        let key = mode.storage_key();
        let raw = match self.backend.get(&key) {
            Ok(raw) => raw,
            Err(err) => {
                log::warn!("failed to read {key}: {err}");
                None
            }
        };
        let Some(raw) = raw else {
            return SessionRecord::fresh(mode, &self.today());
        };
        match serde_json::from_str::<SessionRecord>(&raw) {
            Ok(record) if is_well_formed(&record, mode) => record,
            Ok(_) => {
                log::warn!("discarding malformed {mode} record");
                SessionRecord::fresh(mode, &self.today())
            }
            Err(err) => {
                log::warn!("discarding unreadable {mode} record: {err}");
                SessionRecord::fresh(mode, &self.today())
            }
        }
    }

    /// Persist `record` under its mode, stamping the last-played time.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be serialized or written.
    pub fn save_game(&self, record: &mut SessionRecord) -> Result<(), StoreError> {
        record.dates.last_played = utc_timestamp(self.clock.now());
        let json = serde_json::to_string(record)?;
        self.backend.set(&record.mode.storage_key(), &json)
    }

    /// Most recently active mode; daily when nothing is recorded.
    pub fn get_last_played_game(&self) -> GameMode {
        match self.backend.get(LAST_PLAYED_KEY) {
            Ok(Some(raw)) => raw.parse().unwrap_or_default(),
            Ok(None) => GameMode::default(),
            Err(err) => {
                log::warn!("failed to read last played mode: {err}");
                GameMode::default()
            }
        }
    }

    /// Mark `mode` as the most recently active one.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write.
    pub fn switch_most_recent_game(&self, mode: GameMode) -> Result<(), StoreError> {
        self.backend.set(LAST_PLAYED_KEY, mode.as_str())
    }

    /// Record for `mode` pinned to today's date. A record from an earlier
    /// day loses its guess list but keeps its history.
    ///
    /// # Errors
    ///
    /// Returns an error if a new or rolled-over record cannot be saved.
    pub fn create_new_daily_game(&self, mode: GameMode) -> Result<SessionRecord, StoreError> {
        let today = self.today();
        let exists = self.backend.has(&mode.storage_key()).unwrap_or(false);
        let mut record = self.load_game(mode);
        if record.data.seed != today {
            log::info!(
                "rolling {mode} game over from {} to {today}",
                record.data.seed
            );
            let abandoned = record.data.seed.clone();
            let used = record.guesses().len();
            if mode == GameMode::Daily
                && used > 0
                && record.scores.record_daily(&abandoned, false, used)
            {
                log::info!("unfinished {mode} game on {abandoned} counted as a loss");
            }
            record.data.seed = today;
            record.data.guesses.clear();
            self.save_game(&mut record)?;
        } else if !exists {
            self.save_game(&mut record)?;
        }
        Ok(record)
    }

    /// Update the debug map and persist the record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be saved.
    pub fn set_debug_value(
        &self,
        record: &mut SessionRecord,
        value: DebugValue,
    ) -> Result<(), StoreError> {
        record.debug.set(value);
        self.save_game(record)
    }

    /// Count a finished puzzle into the record's scores once per seed.
    /// Returns whether anything changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated record cannot be saved.
    pub fn update_scores(
        &self,
        record: &mut SessionRecord,
        seed: &str,
        won: bool,
    ) -> Result<bool, StoreError> {
        let used = record.guesses().len();
        let changed = match record.mode {
            GameMode::Daily => record.scores.record_daily(seed, won, used),
            GameMode::Endless => record.scores.record(seed, won, used),
        };
        if !changed {
            return Ok(false);
        }
        log::info!("{} game on {seed} finished (won: {won}, guesses: {used})", record.mode);
        self.save_game(record)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::{Duration, TimeZone, Utc};

    fn store() -> GameStore<MemoryStore, FixedClock> {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap());
        GameStore::new(MemoryStore::new(), clock)
    }

    #[test]
    fn load_game_returns_fresh_record_without_writing() {
        let store = store();
        let record = store.load_game(GameMode::Daily);
        assert_eq!(record.data.seed, "2025-06-01");
        assert!(record.guesses().is_empty());
        assert!(record.history.is_empty());
        assert!(store.backend().is_empty());
    }

    #[test]
    fn save_then_load_round_trips_and_stamps_time() {
        let store = store();
        let mut record = store.load_game(GameMode::Endless);
        record.push_guess("Ayla");
        store.save_game(&mut record).unwrap();
        assert_eq!(record.dates.last_played, "2025-06-01T08:00:00.000Z");
        assert_eq!(store.load_game(GameMode::Endless), record);
        assert!(store.load_game(GameMode::Daily).guesses().is_empty());
    }

    #[test]
    fn corrupt_and_mismatched_records_are_treated_as_absent() {
        let store = store();
        let key = GameMode::Daily.storage_key();
        store.backend().set(&key, "{not json").unwrap();
        assert!(store.load_game(GameMode::Daily).guesses().is_empty());

        store.backend().set(&key, r#"{"unexpected": true}"#).unwrap();
        assert_eq!(store.load_game(GameMode::Daily).data.seed, "2025-06-01");

        let mut endless = SessionRecord::fresh(GameMode::Endless, "2025-05-01");
        endless.push_guess("Ayla");
        let json = serde_json::to_string(&endless).unwrap();
        store.backend().set(&key, &json).unwrap();
        let loaded = store.load_game(GameMode::Daily);
        assert_eq!(loaded.mode, GameMode::Daily);
        assert!(loaded.guesses().is_empty());

        let dupes = r#"{"mode":"daily","data":{"seed":"2025-06-01","guesses":["A","A"]}}"#;
        store.backend().set(&key, dupes).unwrap();
        assert!(store.load_game(GameMode::Daily).guesses().is_empty());
    }

    #[test]
    fn last_played_defaults_to_daily() {
        let store = store();
        assert_eq!(store.get_last_played_game(), GameMode::Daily);
        store.switch_most_recent_game(GameMode::Endless).unwrap();
        assert_eq!(store.get_last_played_game(), GameMode::Endless);
        store.backend().set(LAST_PLAYED_KEY, "weekly").unwrap();
        assert_eq!(store.get_last_played_game(), GameMode::Daily);
    }

    #[test]
    fn switching_mode_does_not_touch_records() {
        let store = store();
        let mut record = store.load_game(GameMode::Daily);
        record.push_guess("Ayla");
        store.save_game(&mut record).unwrap();
        store.switch_most_recent_game(GameMode::Endless).unwrap();
        assert_eq!(store.load_game(GameMode::Daily), record);
    }

    #[test]
    fn daily_rollover_clears_guesses_and_keeps_history() {
        let store = store();
        let mut record = store.create_new_daily_game(GameMode::Daily).unwrap();
        record.push_guess("Ayla");
        record.record_history("2025-06-01");
        store.save_game(&mut record).unwrap();

        let same_day = store.create_new_daily_game(GameMode::Daily).unwrap();
        assert_eq!(same_day.guesses(), ["Ayla".to_string()]);

        store.clock().advance(Duration::days(1));
        let next_day = store.create_new_daily_game(GameMode::Daily).unwrap();
        assert_eq!(next_day.data.seed, "2025-06-02");
        assert!(next_day.guesses().is_empty());
        assert_eq!(next_day.history["2025-06-01"], vec!["Ayla".to_string()]);
        assert_eq!(store.load_game(GameMode::Daily), next_day);
    }

    #[test]
    fn daily_rollover_scores_an_abandoned_game_as_a_loss() {
        let store = store();
        let mut record = store.create_new_daily_game(GameMode::Daily).unwrap();
        record.push_guess("Ayla");
        assert!(store.update_scores(&mut record, "2025-05-31", true).unwrap());
        record.push_guess("Bastian");
        store.save_game(&mut record).unwrap();

        store.clock().advance(Duration::days(1));
        let next_day = store.create_new_daily_game(GameMode::Daily).unwrap();
        assert_eq!(next_day.scores.played, 2);
        assert_eq!(next_day.scores.won, 1);
        assert_eq!(next_day.scores.current_streak, 0);
        assert_eq!(
            next_day.scores.last_scored_seed.as_deref(),
            Some("2025-06-01")
        );
        assert_eq!(store.load_game(GameMode::Daily), next_day);
    }

    #[test]
    fn daily_rollover_leaves_finished_and_untouched_games_alone() {
        let store = store();
        let mut record = store.create_new_daily_game(GameMode::Daily).unwrap();
        record.push_guess("Corvina");
        assert!(store.update_scores(&mut record, "2025-06-01", true).unwrap());

        store.clock().advance(Duration::days(1));
        let next_day = store.create_new_daily_game(GameMode::Daily).unwrap();
        assert_eq!(next_day.scores.played, 1);
        assert_eq!(next_day.scores.current_streak, 1);

        store.clock().advance(Duration::days(1));
        let skipped = store.create_new_daily_game(GameMode::Daily).unwrap();
        assert_eq!(skipped.scores.played, 1);
        assert_eq!(skipped.data.seed, "2025-06-03");
    }

    #[test]
    fn create_new_daily_game_persists_absent_record() {
        let store = store();
        store.create_new_daily_game(GameMode::Daily).unwrap();
        assert!(store.backend().has(&GameMode::Daily.storage_key()).unwrap());
    }

    #[test]
    fn debug_values_persist() {
        let store = store();
        let mut record = store.load_game(GameMode::Endless);
        assert_eq!(get_debug_value(&record, DebugKey::EndlessReset), None);
        store
            .set_debug_value(&mut record, DebugValue::DailyEndlessCount(4))
            .unwrap();
        let loaded = store.load_game(GameMode::Endless);
        assert_eq!(
            get_debug_value(&loaded, DebugKey::DailyEndlessCount),
            Some(DebugValue::DailyEndlessCount(4))
        );
    }

    #[test]
    fn update_scores_is_idempotent_per_seed() {
        let store = store();
        let mut record = store.load_game(GameMode::Daily);
        record.push_guess("Ayla");
        assert!(store.update_scores(&mut record, "2025-06-01", true).unwrap());
        assert!(!store.update_scores(&mut record, "2025-06-01", true).unwrap());
        let loaded = store.load_game(GameMode::Daily);
        assert_eq!(loaded.scores.played, 1);
        assert_eq!(loaded.scores.distribution[0], 1);
    }
}
