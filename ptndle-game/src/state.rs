use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::constants::{MAX_GUESSES, STORAGE_PREFIX};
use crate::seed::is_following_day;

/// Which puzzle stream a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    #[default]
    Daily,
    Endless,
}

impl GameMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Endless => "endless",
        }
    }

    #[must_use]
    pub const fn is_endless(self) -> bool {
        matches!(self, Self::Endless)
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Daily => Self::Endless,
            Self::Endless => Self::Daily,
        }
    }

    /// Storage key holding this mode's record.
    #[must_use]
    pub fn storage_key(self) -> String {
        format!("{STORAGE_PREFIX}.save.{}", self.as_str())
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Self::Daily),
            "endless" => Ok(Self::Endless),
            _ => Err(()),
        }
    }
}

/// Guess list, capped at [`MAX_GUESSES`].
pub type GuessList = SmallVec<[String; MAX_GUESSES]>;

#[must_use]
pub fn is_game_won<S: AsRef<str>>(guesses: &[S], target: &str) -> bool {
    guesses.iter().any(|guess| guess.as_ref() == target)
}

#[must_use]
pub fn is_game_over<S: AsRef<str>>(guesses: &[S], target: &str) -> bool {
    is_game_won(guesses, target) || guesses.len() >= MAX_GUESSES
}

#[must_use]
pub fn has_game_started<T>(guesses: &[T]) -> bool {
    !guesses.is_empty()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RecordData {
    pub seed: String,
    #[serde(default)]
    pub guesses: GuessList,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RecordDates {
    #[serde(default)]
    pub last_played: String,
}

/// Endless-mode bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DebugState {
    /// `Some(true)` while a freshly derived endless seed is pending
    #[serde(default)]
    pub endless_reset: Option<bool>,
    /// Endless resets on `daily_last_date`
    #[serde(default)]
    pub daily_endless_count: u32,
    /// Date the counter belongs to
    #[serde(default)]
    pub daily_last_date: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebugKey {
    EndlessReset,
    DailyEndlessCount,
    DailyLastDate,
}

impl DebugKey {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EndlessReset => "endless_reset",
            Self::DailyEndlessCount => "daily_endless_count",
            Self::DailyLastDate => "daily_last_date",
        }
    }
}

impl FromStr for DebugKey {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "endless_reset" => Ok(Self::EndlessReset),
            "daily_endless_count" => Ok(Self::DailyEndlessCount),
            "daily_last_date" => Ok(Self::DailyLastDate),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "key", content = "value", rename_all = "snake_case")]
pub enum DebugValue {
    EndlessReset(bool),
    DailyEndlessCount(u32),
    DailyLastDate(String),
}

impl DebugValue {
    #[must_use]
    pub const fn key(&self) -> DebugKey {
        match self {
            Self::EndlessReset(_) => DebugKey::EndlessReset,
            Self::DailyEndlessCount(_) => DebugKey::DailyEndlessCount,
            Self::DailyLastDate(_) => DebugKey::DailyLastDate,
        }
    }
}

impl fmt::Display for DebugValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EndlessReset(flag) => write!(f, "{flag}"),
            Self::DailyEndlessCount(count) => write!(f, "{count}"),
            Self::DailyLastDate(date) => f.write_str(date),
        }
    }
}

impl DebugState {
    /// Current value for `key`; the counter always has a value (0 baseline).
    #[must_use]
    pub fn get(&self, key: DebugKey) -> Option<DebugValue> {
        match key {
            DebugKey::EndlessReset => self.endless_reset.map(DebugValue::EndlessReset),
            DebugKey::DailyEndlessCount => {
                Some(DebugValue::DailyEndlessCount(self.daily_endless_count))
            }
            DebugKey::DailyLastDate => self.daily_last_date.clone().map(DebugValue::DailyLastDate),
        }
    }

    pub fn set(&mut self, value: DebugValue) {
        match value {
            DebugValue::EndlessReset(flag) => self.endless_reset = Some(flag),
            DebugValue::DailyEndlessCount(count) => self.daily_endless_count = count,
            DebugValue::DailyLastDate(date) => self.daily_last_date = Some(date),
        }
    }

    #[must_use]
    pub fn reset_pending(&self) -> bool {
        self.endless_reset == Some(true)
    }
}

/// Aggregate results for one mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Scores {
    #[serde(default)]
    pub played: u32,
    #[serde(default)]
    pub won: u32,
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub max_streak: u32,
    /// Wins by number of guesses used; index 0 is a first-guess win
    #[serde(default)]
    pub distribution: [u32; MAX_GUESSES],
    /// Last seed counted, so a finished puzzle is scored once
    #[serde(default)]
    pub last_scored_seed: Option<String>,
}

impl Scores {
    /// Count a finished puzzle. Returns `false` if `seed` was already counted.
    pub fn record(&mut self, seed: &str, won: bool, guesses_used: usize) -> bool {
        if self.last_scored_seed.as_deref() == Some(seed) {
            return false;
        }
        self.played = self.played.saturating_add(1);
        if won {
            self.won = self.won.saturating_add(1);
            self.current_streak = self.current_streak.saturating_add(1);
            self.max_streak = self.max_streak.max(self.current_streak);
            if let Some(slot) = guesses_used
                .checked_sub(1)
                .and_then(|idx| self.distribution.get_mut(idx))
            {
                *slot = slot.saturating_add(1);
            }
        } else {
            self.current_streak = 0;
        }
        self.last_scored_seed = Some(seed.to_string());
        true
    }

    /// Count a finished daily puzzle. The streak only carries over from the
    /// previous calendar day; any gap restarts it.
    pub fn record_daily(&mut self, date: &str, won: bool, guesses_used: usize) -> bool {
        if self.last_scored_seed.as_deref() == Some(date) {
            return false;
        }
        let consecutive = self
            .last_scored_seed
            .as_deref()
            .is_some_and(|last| is_following_day(last, date));
        if !consecutive {
            self.current_streak = 0;
        }
        self.record(date, won, guesses_used)
    }

    #[must_use]
    pub fn win_rate(&self) -> f64 {
        if self.played == 0 {
            return 0.0;
        }
        f64::from(self.won) / f64::from(self.played)
    }
}

/// Persisted state for one game mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub mode: GameMode,
    pub data: RecordData,
    /// Guess list per date (daily) or per seed (endless)
    #[serde(default)]
    pub history: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub dates: RecordDates,
    #[serde(default)]
    pub debug: DebugState,
    #[serde(default)]
    pub scores: Scores,
}

impl SessionRecord {
    #[must_use]
    pub fn fresh(mode: GameMode, today: &str) -> Self {
        Self {
            mode,
            data: RecordData {
                seed: today.to_string(),
                guesses: GuessList::new(),
            },
            history: BTreeMap::new(),
            dates: RecordDates::default(),
            debug: DebugState::default(),
            scores: Scores::default(),
        }
    }

    #[must_use]
    pub fn guesses(&self) -> &[String] {
        &self.data.guesses
    }

    #[must_use]
    pub fn has_guessed(&self, name: &str) -> bool {
        self.data.guesses.iter().any(|guess| guess == name)
    }

    /// Append a guess unless it is a duplicate or the budget is spent.
    pub fn push_guess(&mut self, name: &str) -> bool {
        if self.has_guessed(name) || self.data.guesses.len() >= MAX_GUESSES {
            return false;
        }
        self.data.guesses.push(name.to_string());
        true
    }

    /// Snapshot the current guess list under `key`.
    pub fn record_history(&mut self, key: &str) {
        self.history
            .insert(key.to_string(), self.data.guesses.to_vec());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn win_and_over_detection() {
        let guesses = ["Ayla", "Bastian"];
        assert!(is_game_won(&guesses, "Bastian"));
        assert!(!is_game_won(&guesses, "Corvina"));
        assert!(is_game_over(&guesses, "Ayla"));
        assert!(!is_game_over(&guesses, "Corvina"));

        let full = ["a", "b", "c", "d", "e", "f"];
        assert!(is_game_over(&full, "z"));
        assert!(!is_game_won(&full, "z"));
        assert!(!has_game_started::<&str>(&[]));
    }

    #[test]
    fn push_guess_rejects_duplicates_and_overflow() {
        let mut record = SessionRecord::fresh(GameMode::Daily, "2025-06-01");
        assert!(record.push_guess("Ayla"));
        assert!(!record.push_guess("Ayla"));
        assert_eq!(record.guesses().len(), 1);
        for name in ["b", "c", "d", "e", "f"] {
            assert!(record.push_guess(name));
        }
        assert!(!record.push_guess("g"));
        assert_eq!(record.guesses().len(), MAX_GUESSES);
    }

    #[test]
    fn scores_count_each_seed_once() {
        let mut scores = Scores::default();
        assert!(scores.record("2025-06-01", true, 3));
        assert!(!scores.record("2025-06-01", true, 3));
        assert!(scores.record("2025-06-02", true, 1));
        assert!(scores.record("2025-06-03", false, 6));
        assert_eq!(scores.played, 3);
        assert_eq!(scores.won, 2);
        assert_eq!(scores.current_streak, 0);
        assert_eq!(scores.max_streak, 2);
        assert_eq!(scores.distribution, [1, 0, 1, 0, 0, 0]);
        assert!((scores.win_rate() - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn daily_streak_carries_across_consecutive_days() {
        let mut scores = Scores::default();
        assert!(scores.record_daily("2025-06-30", true, 2));
        assert!(scores.record_daily("2025-07-01", true, 4));
        assert!(!scores.record_daily("2025-07-01", true, 4));
        assert_eq!(scores.current_streak, 2);
        assert_eq!(scores.max_streak, 2);
    }

    #[test]
    fn daily_streak_restarts_after_a_missed_day() {
        let mut scores = Scores::default();
        for date in ["2025-06-01", "2025-06-11", "2025-06-21"] {
            assert!(scores.record_daily(date, true, 1));
        }
        assert_eq!(scores.played, 3);
        assert_eq!(scores.won, 3);
        assert_eq!(scores.current_streak, 1);
        assert_eq!(scores.max_streak, 1);

        assert!(scores.record_daily("2025-06-22", true, 1));
        assert!(scores.record_daily("2025-06-23", false, 6));
        assert!(scores.record_daily("2025-06-24", true, 3));
        assert_eq!(scores.current_streak, 1);
        assert_eq!(scores.max_streak, 2);
    }

    #[test]
    fn debug_state_defaults_to_baseline() {
        let mut debug = DebugState::default();
        assert_eq!(debug.get(DebugKey::EndlessReset), None);
        assert_eq!(
            debug.get(DebugKey::DailyEndlessCount),
            Some(DebugValue::DailyEndlessCount(0))
        );
        assert!(!debug.reset_pending());
        debug.set(DebugValue::EndlessReset(true));
        assert!(debug.reset_pending());
        assert_eq!(
            "daily_last_date".parse::<DebugKey>(),
            Ok(DebugKey::DailyLastDate)
        );
    }

    #[test]
    fn record_json_layout() {
        let mut record = SessionRecord::fresh(GameMode::Endless, "2025-06-01");
        record.push_guess("Ayla");
        record.record_history("2025-06-01");
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["mode"], "endless");
        assert_eq!(value["data"]["seed"], "2025-06-01");
        assert_eq!(value["data"]["guesses"][0], "Ayla");
        assert_eq!(value["history"]["2025-06-01"][0], "Ayla");
        assert_eq!(value["debug"]["daily_endless_count"], 0);
    }

    #[test]
    fn mode_keys() {
        assert_eq!(GameMode::Daily.storage_key(), "ptndle.save.daily");
        assert_eq!(GameMode::Endless.toggled(), GameMode::Daily);
        assert_eq!("endless".parse::<GameMode>(), Ok(GameMode::Endless));
    }
}
