//! Game session controller.
//!
//! Owns the active mode and the derived view of its saved record. Every
//! mutation is written through the [`GameStore`] and followed by a full
//! [`GameSession::update_based_on_save`] pass, so hints are always scored
//! against the target of the current effective seed.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::catalog::{Catalog, Character};
use crate::clock::Clock;
use crate::error::SessionError;
use crate::evaluate::{GuessHint, replay_guesses};
use crate::seed::endless_seed;
use crate::share::{GameStatus, share_text};
use crate::state::{
    DebugValue, GameMode, SessionRecord, has_game_started, is_game_over, is_game_won,
};
use crate::store::{GameStore, KeyValueStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    NotLoaded,
    NotStarted,
    InProgress,
    Over,
}

/// Everything the presentation layer needs for the active mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    pub mode: GameMode,
    pub seed: String,
    pub target: Character,
    pub hints: Vec<GuessHint>,
    pub won: bool,
    pub over: bool,
    /// Catalog minus already-guessed characters
    pub remaining: Vec<Character>,
    /// Target art when over, last guess art while in progress
    pub image: Option<String>,
}

impl SessionView {
    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        if self.over {
            SessionPhase::Over
        } else if has_game_started(&self.hints) {
            SessionPhase::InProgress
        } else {
            SessionPhase::NotStarted
        }
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        GameStatus::from_view(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    GameOver,
    CoolingDown,
    Duplicate,
    OutOfGuesses,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum GuessOutcome {
    Accepted,
    Ignored(IgnoreReason),
}

pub struct GameSession<S, C> {
    catalog: Arc<Catalog>,
    store: GameStore<S, C>,
    view: Option<SessionView>,
    guess_disabled: bool,
}

impl<S, C> GameSession<S, C>
where
    S: KeyValueStore,
    C: Clock,
{
    pub fn new(catalog: Arc<Catalog>, store: GameStore<S, C>) -> Self {
        Self {
            catalog,
            store,
            view: None,
            guess_disabled: false,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub const fn store(&self) -> &GameStore<S, C> {
        &self.store
    }

    pub const fn view(&self) -> Option<&SessionView> {
        self.view.as_ref()
    }

    pub fn phase(&self) -> SessionPhase {
        self.view
            .as_ref()
            .map_or(SessionPhase::NotLoaded, SessionView::phase)
    }

    /// Active mode, falling back to the stored marker before the first load.
    pub fn mode(&self) -> GameMode {
        self.view
            .as_ref()
            .map_or_else(|| self.store.get_last_played_game(), |view| view.mode)
    }

    pub const fn is_guess_disabled(&self) -> bool {
        self.guess_disabled
    }

    /// Re-enable submissions once the post-guess cooldown has elapsed.
    pub fn release_cooldown(&mut self) {
        self.guess_disabled = false;
    }

    fn load_active(&self, mode: GameMode) -> Result<SessionRecord, SessionError> {
        match mode {
            GameMode::Daily => Ok(self.store.create_new_daily_game(mode)?),
            GameMode::Endless => Ok(self.store.load_game(mode)),
        }
    }

    /// First activation of endless mode queues a derived seed.
    fn create_endless_reset_value(&self, record: &mut SessionRecord) -> Result<(), SessionError> {
        if record.debug.endless_reset.is_none() {
            self.store
                .set_debug_value(record, DebugValue::EndlessReset(true))?;
        }
        Ok(())
    }

    fn effective_seed(&self, record: &mut SessionRecord) -> Result<String, SessionError> {
        if !record.mode.is_endless() || !record.debug.reset_pending() {
            return Ok(record.data.seed.clone());
        }
        let today = self.store.today();
        if record.debug.daily_last_date.as_deref() != Some(today.as_str()) {
            record.debug.daily_endless_count = 0;
            record.debug.daily_last_date = Some(today.clone());
        }
        let seed = endless_seed(&today, record.debug.daily_endless_count);
        log::info!("derived endless seed {seed}");
        record.data.seed.clone_from(&seed);
        record.debug.endless_reset = Some(false);
        self.store.save_game(record)?;
        Ok(seed)
    }

    /// Rebuild the view from the saved record of the last-played mode.
    ///
    /// # Errors
    ///
    /// Returns an error if a saved guess no longer exists in the catalog or
    /// the record cannot be persisted.
    pub fn update_based_on_save(&mut self) -> Result<&SessionView, SessionError> {
        let mode = self.store.get_last_played_game();
        let mut record = self.load_active(mode)?;
        if mode.is_endless() {
            self.create_endless_reset_value(&mut record)?;
        }
        let seed = self.effective_seed(&mut record)?;
        let target = self.catalog.seeded(&seed).clone();
        log::debug!("{mode} seed {seed} resolves to {}", target.name);

        let hints = replay_guesses(&self.catalog, record.guesses(), &seed)?;
        let won = is_game_won(record.guesses(), &target.name);
        let over = is_game_over(record.guesses(), &target.name);

        let image = if over {
            self.store.update_scores(&mut record, &seed, won)?;
            Some(target.image_full.clone())
        } else if let Some(last) = record.guesses().last() {
            Some(self.catalog.get(last)?.image_full.clone())
        } else {
            None
        };

        let remaining = self
            .catalog
            .without_guesses(record.guesses())
            .into_iter()
            .cloned()
            .collect();

        let view: &SessionView = self.view.insert(SessionView {
            mode,
            seed,
            target,
            hints,
            won,
            over,
            remaining,
            image,
        });
        Ok(view)
    }

    /// Submit a guess for the active mode.
    ///
    /// # Errors
    ///
    /// Returns an error if `name` is not in the catalog or the record cannot
    /// be persisted.
    pub fn submit_guess(&mut self, name: &str) -> Result<GuessOutcome, SessionError> {
        if self.guess_disabled {
            return Ok(GuessOutcome::Ignored(IgnoreReason::CoolingDown));
        }
        let today = self.store.today();
        let (mode, seed, over) = match self.view.as_ref() {
            Some(view) if !view.mode.is_endless() && view.seed != today => {
                log::debug!("daily view for {} is stale, reloading", view.seed);
                let view = self.update_based_on_save()?;
                (view.mode, view.seed.clone(), view.over)
            }
            Some(view) => (view.mode, view.seed.clone(), view.over),
            None => {
                let view = self.update_based_on_save()?;
                (view.mode, view.seed.clone(), view.over)
            }
        };
        if over {
            return Ok(GuessOutcome::Ignored(IgnoreReason::GameOver));
        }
        let character = self.catalog.get(name)?.name.clone();

        let mut record = self.load_active(mode)?;
        if record.has_guessed(&character) {
            return Ok(GuessOutcome::Ignored(IgnoreReason::Duplicate));
        }
        if !record.push_guess(&character) {
            return Ok(GuessOutcome::Ignored(IgnoreReason::OutOfGuesses));
        }
        let history_key = if mode.is_endless() { seed } else { today };
        record.record_history(&history_key);
        self.store.save_game(&mut record)?;
        log::info!("accepted {mode} guess {character}");

        self.update_based_on_save()?;
        self.guess_disabled = true;
        Ok(GuessOutcome::Accepted)
    }

    /// Switch to `mode` and reload.
    ///
    /// # Errors
    ///
    /// Returns an error if the mode marker cannot be written or the reload fails.
    pub fn set_mode(&mut self, mode: GameMode) -> Result<&SessionView, SessionError> {
        log::info!("switching to {mode} mode");
        self.store.switch_most_recent_game(mode)?;
        self.update_based_on_save()
    }

    /// Flip between daily and endless mode.
    ///
    /// # Errors
    ///
    /// See [`GameSession::set_mode`].
    pub fn toggle_endless_mode(&mut self) -> Result<&SessionView, SessionError> {
        let next = self.mode().toggled();
        self.set_mode(next)
    }

    /// Start a new endless puzzle. Does nothing outside endless mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the endless record cannot be saved or reloaded.
    pub fn reset_endless(&mut self) -> Result<bool, SessionError> {
        if !self.mode().is_endless() {
            return Ok(false);
        }
        let mut record = self.store.load_game(GameMode::Endless);
        record.debug.daily_endless_count = record.debug.daily_endless_count.saturating_add(1);
        record.debug.endless_reset = Some(true);
        record.data.guesses.clear();
        self.store.save_game(&mut record)?;
        log::info!(
            "endless reset, counter now {}",
            record.debug.daily_endless_count
        );
        self.update_based_on_save()?;
        Ok(true)
    }

    /// Emoji summary of the active puzzle, once loaded.
    pub fn share_text(&self) -> Option<String> {
        self.view.as_ref().map(share_text)
    }
}
