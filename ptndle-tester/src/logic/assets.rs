use anyhow::{Context, Result};
use ptndle_game::Catalog;
use std::path::Path;

const BUNDLED_CHARACTERS: &str =
    include_str!("../../../ptndle-web/static/assets/data/characters.json");

/// Catalog shipped with the web build.
///
/// # Errors
/// Returns an error if the bundled asset fails validation.
pub fn bundled_catalog() -> Result<Catalog> {
    Catalog::from_json(BUNDLED_CHARACTERS).context("bundled character catalog is invalid")
}

/// Catalog from `path`, or the bundled one when no path is given.
///
/// # Errors
/// Returns an error if the file cannot be read or does not hold a valid catalog.
pub fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
    let Some(path) = path else {
        return bundled_catalog();
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog {}", path.display()))?;
    Catalog::from_json(&json).with_context(|| format!("invalid catalog {}", path.display()))
}
