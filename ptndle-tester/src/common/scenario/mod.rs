use anyhow::{Context, Result, ensure};
use chrono::{DateTime, Days, NaiveDate, Utc};
use ptndle_game::{
    Catalog, FixedClock, GameSession, GameStore, GuessOutcome, MAX_GUESSES, MemoryStore,
    SessionView,
};
use serde::Serialize;
use std::rc::Rc;
use std::sync::Arc;

use crate::logic::{GuessPolicy, GuessStrategy};

pub mod catalog;

pub use catalog::{catalog_scenarios, find_catalog_scenario};

pub type TesterSession = GameSession<MemoryStore, Rc<FixedClock>>;

/// Inputs shared by every scenario in a run.
#[derive(Debug, Clone)]
pub struct ScenarioCtx {
    pub catalog: Arc<Catalog>,
    pub start: NaiveDate,
    pub days: u32,
    pub strategy: GuessStrategy,
    pub seed: u64,
    pub verbose: bool,
}

impl ScenarioCtx {
    /// Noon UTC on `day` days after the start date.
    #[must_use]
    pub fn instant(&self, day: u32) -> DateTime<Utc> {
        let date = self
            .start
            .checked_add_days(Days::new(u64::from(day)))
            .unwrap_or(self.start);
        date.and_hms_opt(12, 0, 0)
            .unwrap_or_default()
            .and_utc()
    }

    #[must_use]
    pub fn clock(&self) -> Rc<FixedClock> {
        Rc::new(FixedClock::new(self.instant(0)))
    }

    #[must_use]
    pub fn session(&self, backend: MemoryStore, clock: Rc<FixedClock>) -> TesterSession {
        GameSession::new(Arc::clone(&self.catalog), GameStore::new(backend, clock))
    }

    /// Policy seeded per scenario day so random runs stay reproducible.
    #[must_use]
    pub fn policy(&self, day: u32) -> Box<dyn GuessPolicy> {
        self.strategy
            .create_policy(self.seed.wrapping_add(u64::from(day)))
    }
}

/// Aggregated play statistics reported by a scenario.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScenarioOutcome {
    pub games_played: u32,
    pub games_won: u32,
    pub total_guesses: u32,
    pub notes: Vec<String>,
}

impl ScenarioOutcome {
    pub fn record_game(&mut self, view: &SessionView) {
        self.games_played += 1;
        if view.won {
            self.games_won += 1;
        }
        self.total_guesses += u32::try_from(view.hints.len()).unwrap_or(u32::MAX);
    }
}

pub type ScenarioFn = fn(&ScenarioCtx) -> Result<ScenarioOutcome>;

#[derive(Clone, Copy)]
pub struct LogicScenario {
    key: &'static str,
    description: &'static str,
    run: ScenarioFn,
}

impl LogicScenario {
    #[must_use]
    pub const fn new(key: &'static str, description: &'static str, run: ScenarioFn) -> Self {
        Self {
            key,
            description,
            run,
        }
    }

    #[must_use]
    pub const fn key(&self) -> &'static str {
        self.key
    }

    #[must_use]
    pub const fn description(&self) -> &'static str {
        self.description
    }

    /// # Errors
    /// Returns the first failed expectation of the scenario.
    pub fn run(&self, ctx: &ScenarioCtx) -> Result<ScenarioOutcome> {
        (self.run)(ctx)
    }
}

#[must_use]
pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    catalog_scenarios()
        .iter()
        .map(|scenario| (scenario.key(), scenario.description()))
        .collect()
}

#[must_use]
pub fn get_scenario(key: &str) -> Option<LogicScenario> {
    find_catalog_scenario(key)
}

/// Let `policy` guess until the active game is over.
///
/// # Errors
/// Returns an error if the policy runs dry, a guess is rejected, or the game
/// does not finish within the guess budget.
pub fn play_to_end(
    session: &mut TesterSession,
    policy: &mut dyn GuessPolicy,
) -> Result<SessionView> {
    for _ in 0..=MAX_GUESSES {
        if session.view().is_none() {
            session.update_based_on_save()?;
        }
        let view = session.view().cloned().context("session has no view")?;
        if view.over {
            return Ok(view);
        }
        let guess = policy
            .next_guess(session.catalog(), &view)
            .with_context(|| format!("{} policy found no candidate", policy.name()))?;
        let outcome = session.submit_guess(&guess)?;
        ensure!(
            outcome == GuessOutcome::Accepted,
            "guess {guess} was not accepted: {outcome:?}"
        );
        session.release_cooldown();
    }
    anyhow::bail!("game did not finish within {MAX_GUESSES} guesses")
}
