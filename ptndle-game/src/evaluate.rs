//! Per-attribute scoring of a guessed character against the target.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

use crate::catalog::{Catalog, Character};
use crate::error::CatalogError;
use crate::thresholds::{Band, Thresholds, calculate_thresholds};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeKey {
    Code,
    Alignment,
    Tendency,
    Height,
    Birthplace,
}

impl AttributeKey {
    pub const ALL: [Self; 5] = [
        Self::Code,
        Self::Alignment,
        Self::Tendency,
        Self::Height,
        Self::Birthplace,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::Alignment => "alignment",
            Self::Tendency => "tendency",
            Self::Height => "height",
            Self::Birthplace => "birthplace",
        }
    }
}

impl fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttributeKey {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "code" => Ok(Self::Code),
            "alignment" => Ok(Self::Alignment),
            "tendency" => Ok(Self::Tendency),
            "height" => Ok(Self::Height),
            "birthplace" => Ok(Self::Birthplace),
            _ => Err(()),
        }
    }
}

/// How close a guessed attribute is to the target's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Exact,
    /// Within the `high` band
    High,
    /// Within the `very_high` band
    VeryHigh,
    Miss,
}

/// Where the target's value lies relative to the guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Target value is greater than the guess
    Higher,
    /// Target value is smaller than the guess
    Lower,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeHint {
    pub key: AttributeKey,
    /// Guessed character's value, as displayed
    pub value: String,
    pub tier: Tier,
    /// Set for numeric attributes that are not exact
    pub direction: Option<Direction>,
}

impl AttributeHint {
    #[must_use]
    pub fn is_exact(&self) -> bool {
        self.tier == Tier::Exact
    }
}

/// Scored guess: one hint per attribute in [`AttributeKey::ALL`] order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessHint {
    pub name: String,
    pub image_icon: String,
    pub attributes: SmallVec<[AttributeHint; 5]>,
}

impl GuessHint {
    #[must_use]
    pub fn attribute(&self, key: AttributeKey) -> Option<&AttributeHint> {
        self.attributes.iter().find(|hint| hint.key == key)
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.attributes.iter().all(AttributeHint::is_exact)
    }
}

fn categorical(key: AttributeKey, guessed: &str, target: &str) -> AttributeHint {
    AttributeHint {
        key,
        value: guessed.to_string(),
        tier: if guessed == target {
            Tier::Exact
        } else {
            Tier::Miss
        },
        direction: None,
    }
}

fn numeric(key: AttributeKey, guessed: u32, target: u32, band: Band) -> AttributeHint {
    let difference = i64::from(guessed) - i64::from(target);
    let distance = f64::from(u32::try_from(difference.unsigned_abs()).unwrap_or(u32::MAX));
    let tier = if difference == 0 {
        Tier::Exact
    } else if distance <= band.high {
        Tier::High
    } else if distance <= band.very_high {
        Tier::VeryHigh
    } else {
        Tier::Miss
    };
    let direction = match difference.signum() {
        -1 => Some(Direction::Higher),
        1 => Some(Direction::Lower),
        _ => None,
    };
    AttributeHint {
        key,
        value: guessed.to_string(),
        tier,
        direction,
    }
}

/// Score `guessed` against `target` using bands precomputed from the target.
#[must_use]
pub fn evaluate_guess(
    guessed: &Character,
    target: &Character,
    thresholds: &Thresholds,
) -> GuessHint {
    let attributes = AttributeKey::ALL
        .iter()
        .map(|&key| match key {
            AttributeKey::Code => numeric(key, guessed.code, target.code, thresholds.code),
            AttributeKey::Height => {
                numeric(key, guessed.height, target.height, thresholds.height)
            }
            AttributeKey::Alignment => categorical(key, &guessed.alignment, &target.alignment),
            AttributeKey::Tendency => categorical(key, &guessed.tendency, &target.tendency),
            AttributeKey::Birthplace => categorical(key, &guessed.birthplace, &target.birthplace),
        })
        .collect();

    GuessHint {
        name: guessed.name.clone(),
        image_icon: guessed.image_icon.clone(),
        attributes,
    }
}

/// Replay saved guess names against the target for `seed`.
///
/// # Errors
///
/// Returns [`CatalogError::NotFound`] if any saved name is missing from the
/// catalog.
pub fn replay_guesses<S: AsRef<str>>(
    catalog: &Catalog,
    names: &[S],
    seed: &str,
) -> Result<Vec<GuessHint>, CatalogError> {
    let target = catalog.seeded(seed);
    let thresholds = calculate_thresholds(target);
    let guessed = catalog.resolve_names(names)?;
    Ok(guessed
        .into_iter()
        .map(|character| evaluate_guess(character, target, &thresholds))
        .collect())
}
