use std::fmt;

use clap::ValueEnum;
use ptndle_game::{Catalog, Character, SessionView, calculate_thresholds, evaluate_guess};
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

/// Policy interface for automated guessing.
pub trait GuessPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Pick the next character to guess, or `None` when nothing is left.
    fn next_guess(&mut self, catalog: &Catalog, view: &SessionView) -> Option<String>;
}

/// Built-in guessing strategies for automated runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GuessStrategy {
    /// Only guess characters consistent with every hint so far
    Narrowing,
    /// Uniformly random among unguessed characters
    Random,
    /// Catalog order, ignoring hints
    Sequential,
}

impl GuessStrategy {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Narrowing => "Narrowing",
            Self::Random => "Random",
            Self::Sequential => "Sequential",
        }
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn GuessPolicy> {
        match self {
            Self::Narrowing => Box::new(NarrowingPolicy),
            Self::Random => Box::new(RandomPolicy::new(seed)),
            Self::Sequential => Box::new(SequentialPolicy),
        }
    }
}

impl fmt::Display for GuessStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether `candidate`, taken as the target, would have produced every hint in `view`.
#[must_use]
pub fn is_consistent(catalog: &Catalog, view: &SessionView, candidate: &Character) -> bool {
    let thresholds = calculate_thresholds(candidate);
    view.hints.iter().all(|hint| {
        catalog
            .get(&hint.name)
            .is_ok_and(|guessed| evaluate_guess(guessed, candidate, &thresholds) == *hint)
    })
}

struct NarrowingPolicy;
struct SequentialPolicy;

struct RandomPolicy {
    rng: ChaCha20Rng,
}

impl RandomPolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

impl GuessPolicy for NarrowingPolicy {
    fn name(&self) -> &'static str {
        "Narrowing"
    }

    fn next_guess(&mut self, catalog: &Catalog, view: &SessionView) -> Option<String> {
        view.remaining
            .iter()
            .find(|candidate| is_consistent(catalog, view, candidate))
            .or_else(|| view.remaining.first())
            .map(|candidate| candidate.name.clone())
    }
}

impl GuessPolicy for RandomPolicy {
    fn name(&self) -> &'static str {
        "Random"
    }

    fn next_guess(&mut self, _catalog: &Catalog, view: &SessionView) -> Option<String> {
        view.remaining
            .choose(&mut self.rng)
            .map(|candidate| candidate.name.clone())
    }
}

impl GuessPolicy for SequentialPolicy {
    fn name(&self) -> &'static str {
        "Sequential"
    }

    fn next_guess(&mut self, _catalog: &Catalog, view: &SessionView) -> Option<String> {
        view.remaining.first().map(|candidate| candidate.name.clone())
    }
}
