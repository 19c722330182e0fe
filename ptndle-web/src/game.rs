//! Web-specific game engine implementation
//!
//! This module provides the browser implementations of the ptndle-game
//! traits and re-exports the core game logic types.

use web_sys::Storage;

// Re-export all types from ptndle-game
pub use ptndle_game::*;

use crate::dom;

/// Character catalog bundled into the wasm binary.
pub const CHARACTERS_JSON: &str = include_str!("../static/assets/data/characters.json");

/// Web-specific data loader backed by the bundled static assets
#[derive(Debug, Clone, Copy, Default)]
pub struct WebDataLoader;

#[derive(Debug, thiserror::Error)]
pub enum WebDataError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

impl DataLoader for WebDataLoader {
    type Error = WebDataError;

    fn load_catalog(&self) -> Result<Catalog, Self::Error> {
        Ok(Catalog::from_json(CHARACTERS_JSON)?)
    }
}

/// `localStorage` backend for session records
#[derive(Debug, Clone)]
pub struct BrowserStorage {
    storage: Storage,
}

impl BrowserStorage {
    /// Open the window's `localStorage`.
    ///
    /// # Errors
    /// Returns an error if `localStorage` is unavailable, e.g. outside a browser or when disabled.
    pub fn open() -> Result<Self, StoreError> {
        dom::local_storage()
            .map(|storage| Self { storage })
            .map_err(|err| StoreError::Backend(dom::js_error_message(&err)))
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage
            .get_item(key)
            .map_err(|err| StoreError::Backend(dom::js_error_message(&err)))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage
            .set_item(key, value)
            .map_err(|err| StoreError::Backend(dom::js_error_message(&err)))
    }
}

/// Session type used by the browser front end
pub type WebSession = GameSession<BrowserStorage, SystemClock>;

/// Create a browser session over the bundled catalog and `localStorage`.
///
/// # Errors
/// Returns an error if storage is unavailable or the bundled catalog is invalid.
pub fn create_web_session() -> Result<WebSession, WebDataError> {
    let backend = BrowserStorage::open()?;
    create_session(&WebDataLoader, backend, SystemClock)
}
