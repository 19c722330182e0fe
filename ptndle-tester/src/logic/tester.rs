use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::common::scenario::{LogicScenario, ScenarioCtx};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub strategy: String,
    pub passed: bool,
    pub days: u32,
    pub games_played: u32,
    pub games_won: u32,
    pub total_guesses: u32,
    pub failures: Vec<String>,
    pub notes: Vec<String>,
    #[serde(with = "duration_serde")]
    pub duration: Duration,
}

impl ScenarioResult {
    #[must_use]
    pub fn win_rate(&self) -> f64 {
        if self.games_played == 0 {
            0.0
        } else {
            f64::from(self.games_won) / f64::from(self.games_played)
        }
    }

    #[must_use]
    pub fn average_guesses(&self) -> f64 {
        if self.games_played == 0 {
            0.0
        } else {
            f64::from(self.total_guesses) / f64::from(self.games_played)
        }
    }
}

pub struct LogicTester {
    verbose: bool,
}

impl LogicTester {
    pub const fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    pub fn run_scenario(&self, scenario: &LogicScenario, ctx: &ScenarioCtx) -> ScenarioResult {
        if self.verbose {
            println!(
                "🧪 Testing scenario: {} (strategy: {} seed: {})",
                scenario.key().bright_white(),
                ctx.strategy,
                ctx.seed
            );
        }

        let started = Instant::now();
        let outcome = scenario.run(ctx);
        let duration = started.elapsed();

        let mut result = ScenarioResult {
            scenario_name: scenario.key().to_string(),
            strategy: ctx.strategy.to_string(),
            passed: outcome.is_ok(),
            days: ctx.days,
            games_played: 0,
            games_won: 0,
            total_guesses: 0,
            failures: Vec::new(),
            notes: Vec::new(),
            duration,
        };
        match outcome {
            Ok(outcome) => {
                result.games_played = outcome.games_played;
                result.games_won = outcome.games_won;
                result.total_guesses = outcome.total_guesses;
                result.notes = outcome.notes;
            }
            Err(err) => {
                log::error!("scenario {} failed: {err:#}", scenario.key());
                result.failures.push(format!("{err:#}"));
            }
        }

        if self.verbose {
            let status = if result.passed {
                "✅".green()
            } else {
                "❌".red()
            };
            println!("{status} {} in {:?}", scenario.key(), result.duration);
        }
        result
    }
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_millis().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u128::deserialize(deserializer)?;
        Ok(Duration::from_millis(u64::try_from(millis).unwrap_or(0)))
    }
}
