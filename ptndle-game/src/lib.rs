//! ptndle Game Engine
//!
//! Platform-agnostic core logic for the ptndle daily guessing game: seeded
//! target selection, attribute scoring, and per-mode session persistence.
//! This crate has no UI or platform-specific dependencies; storage and time
//! are injected through [`KeyValueStore`] and [`Clock`].

pub mod catalog;
pub mod clock;
pub mod constants;
pub mod error;
pub mod evaluate;
pub mod seed;
pub mod session;
pub mod share;
pub mod state;
pub mod store;
pub mod thresholds;

// Re-export commonly used types
pub use catalog::{Catalog, Character};
pub use clock::{Clock, FixedClock, SystemClock};
pub use constants::{ATTRIBUTE_KEYS, GUESS_COOLDOWN_MS, MAX_GUESSES};
pub use error::{CatalogError, SessionError, StoreError};
pub use evaluate::{
    AttributeHint, AttributeKey, Direction, GuessHint, Tier, evaluate_guess, replay_guesses,
};
pub use seed::{cyrb53, endless_seed, seeded_index, utc_date, utc_timestamp};
pub use session::{GameSession, GuessOutcome, IgnoreReason, SessionPhase, SessionView};
pub use share::{GameStatus, Headline, share_text};
pub use state::{
    DebugKey, DebugState, DebugValue, GameMode, Scores, SessionRecord, has_game_started,
    is_game_over, is_game_won,
};
pub use store::{GameStore, KeyValueStore, MemoryStore, get_debug_value};
pub use thresholds::{Band, Thresholds, calculate_thresholds};

use std::sync::Arc;

/// Trait for abstracting catalog loading.
/// Platform-specific implementations should provide this
pub trait DataLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the character catalog from the platform-specific source
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded or is invalid.
    fn load_catalog(&self) -> Result<Catalog, Self::Error>;
}

/// Build a session over a loaded catalog, backing store, and clock.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded.
pub fn create_session<L, S, C>(
    loader: &L,
    backend: S,
    clock: C,
) -> Result<GameSession<S, C>, L::Error>
where
    L: DataLoader,
    S: KeyValueStore,
    C: Clock,
{
    let catalog = loader.load_catalog()?;
    Ok(GameSession::new(
        Arc::new(catalog),
        GameStore::new(backend, clock),
    ))
}
