//! Status line and shareable emoji summary for a loaded session.
use serde::{Deserialize, Serialize};

use crate::constants::{
    EMOJI_EXACT, EMOJI_HIGH, EMOJI_MISS, EMOJI_VERY_HIGH, MAX_GUESSES, SHARE_TITLE,
};
use crate::evaluate::{GuessHint, Tier};
use crate::session::SessionView;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Headline {
    NotStarted,
    InProgress,
    Won,
    Lost,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStatus {
    pub headline: Headline,
    pub guesses_used: usize,
    pub max_guesses: usize,
    /// Revealed once the game is over
    pub target_name: Option<String>,
}

impl GameStatus {
    #[must_use]
    pub fn from_view(view: &SessionView) -> Self {
        let headline = match (view.over, view.won, view.hints.is_empty()) {
            (true, true, _) => Headline::Won,
            (true, false, _) => Headline::Lost,
            (false, _, true) => Headline::NotStarted,
            (false, _, false) => Headline::InProgress,
        };
        Self {
            headline,
            guesses_used: view.hints.len(),
            max_guesses: MAX_GUESSES,
            target_name: view.over.then(|| view.target.name.clone()),
        }
    }

    /// `Guess 2/6.` style counter.
    #[must_use]
    pub fn counter(&self) -> String {
        format!("Guess {}/{}.", self.guesses_used, self.max_guesses)
    }

    #[must_use]
    pub fn message(&self) -> String {
        match (self.headline, self.target_name.as_deref()) {
            (Headline::Won, Some(name)) => format!(
                "Congratulations! You won! The character was {name}. You tried {}.",
                tries_phrase(self.guesses_used)
            ),
            (Headline::Lost, Some(name)) => format!(
                "Game Over! You lost! The character was {name}. You tried {}.",
                tries_phrase(self.guesses_used)
            ),
            (Headline::InProgress, _) => self.counter(),
            _ => "Try to find the daily character based on their characteristics.".to_string(),
        }
    }
}

#[must_use]
pub fn tries_phrase(count: usize) -> String {
    if count == 1 {
        "1 time".to_string()
    } else {
        format!("{count} times")
    }
}

const fn tier_emoji(tier: Tier) -> &'static str {
    match tier {
        Tier::Exact => EMOJI_EXACT,
        Tier::High => EMOJI_HIGH,
        Tier::VeryHigh => EMOJI_VERY_HIGH,
        Tier::Miss => EMOJI_MISS,
    }
}

#[must_use]
pub fn emoji_row(hint: &GuessHint) -> String {
    hint.attributes
        .iter()
        .map(|attribute| tier_emoji(attribute.tier))
        .collect()
}

/// Title line with the score (`X` for a loss) followed by one row per guess.
#[must_use]
pub fn share_text(view: &SessionView) -> String {
    let score = if view.over && !view.won {
        "X".to_string()
    } else {
        view.hints.len().to_string()
    };
    let mut lines = vec![format!("{SHARE_TITLE} {} {score}/{MAX_GUESSES}", view.seed)];
    lines.extend(view.hints.iter().map(emoji_row));
    lines.join("\n")
}
