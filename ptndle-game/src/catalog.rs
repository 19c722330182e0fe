//! Static character catalog.
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::CatalogError;
use crate::seed::seeded_index;

/// A guessable character with the attributes the evaluator compares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    /// Rarity-correlated code, higher is rarer
    pub code: u32,
    pub alignment: String,
    pub tendency: String,
    /// Height in centimeters
    pub height: u32,
    pub birthplace: String,
    #[serde(default)]
    pub image_full: String,
    #[serde(default)]
    pub image_icon: String,
}

/// Ordered, immutable list of characters loaded once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    characters: Vec<Character>,
}

impl Catalog {
    /// Build a catalog from pre-parsed characters.
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty or two characters share a name.
    pub fn from_characters(characters: Vec<Character>) -> Result<Self, CatalogError> {
        if characters.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut seen = HashSet::with_capacity(characters.len());
        for character in &characters {
            if !seen.insert(character.name.as_str()) {
                return Err(CatalogError::Duplicate {
                    name: character.name.clone(),
                });
            }
        }
        Ok(Self { characters })
    }

    /// Load the catalog from a JSON array of characters.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed or the catalog is invalid.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let characters: Vec<Character> = serde_json::from_str(json)?;
        Self::from_characters(characters)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.characters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Character> {
        self.characters.iter()
    }

    #[must_use]
    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    /// Look up a character by exact name.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] when no character has that name. Saved
    /// guesses that no longer resolve indicate catalog drift and must not be
    /// dropped silently.
    pub fn get(&self, name: &str) -> Result<&Character, CatalogError> {
        self.characters
            .iter()
            .find(|character| character.name == name)
            .ok_or_else(|| CatalogError::NotFound {
                name: name.to_string(),
            })
    }

    /// The target character for a seed string.
    #[must_use]
    pub fn seeded(&self, seed: &str) -> &Character {
        &self.characters[seeded_index(seed, self.characters.len())]
    }

    /// Resolve every name in order.
    ///
    /// # Errors
    ///
    /// Fails on the first name missing from the catalog.
    pub fn resolve_names<S: AsRef<str>>(
        &self,
        names: &[S],
    ) -> Result<Vec<&Character>, CatalogError> {
        names.iter().map(|name| self.get(name.as_ref())).collect()
    }

    /// Characters still selectable, in catalog order.
    #[must_use]
    pub fn without_guesses<S: AsRef<str>>(&self, guesses: &[S]) -> Vec<&Character> {
        self.characters
            .iter()
            .filter(|character| !guesses.iter().any(|g| g.as_ref() == character.name))
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::{Catalog, Character};

    pub fn character(name: &str, code: u32, alignment: &str, height: u32) -> Character {
        Character {
            name: name.to_string(),
            code,
            alignment: alignment.to_string(),
            tendency: "Assault".to_string(),
            height,
            birthplace: "Harbor City".to_string(),
            image_full: format!("/images/{}_full.png", name.to_lowercase()),
            image_icon: format!("/images/{}_icon.png", name.to_lowercase()),
        }
    }

    pub fn small_catalog() -> Catalog {
        Catalog::from_characters(vec![
            character("Ayla", 12, "Lawful", 165),
            character("Bastian", 47, "Chaotic", 182),
            character("Corvina", 88, "Neutral", 158),
            character("Dorian", 3, "Lawful", 171),
        ])
        .unwrap()
    }
}
