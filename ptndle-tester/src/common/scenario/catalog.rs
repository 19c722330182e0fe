use anyhow::{Context, Result, ensure};
use chrono::Duration;
use ptndle_game::{
    Clock, GameMode, MemoryStore, endless_seed, replay_guesses, seeded_index, utc_date,
};
use std::collections::HashSet;

use super::{LogicScenario, ScenarioCtx, ScenarioOutcome, play_to_end};

pub fn catalog_scenarios() -> Vec<LogicScenario> {
    vec![
        LogicScenario::new(
            "daily-determinism",
            "Independent sessions agree on every daily target",
            daily_determinism,
        ),
        LogicScenario::new(
            "daily-rollover",
            "Play each day to the end, reloading and rolling over between days",
            daily_rollover,
        ),
        LogicScenario::new(
            "endless-epochs",
            "Successive endless resets derive fresh seeds and restart on a new day",
            endless_epochs,
        ),
        LogicScenario::new(
            "replay-consistency",
            "Reloaded and replayed hints match the live ones",
            replay_consistency,
        ),
        LogicScenario::new(
            "mode-isolation",
            "Daily and endless records never leak into each other",
            mode_isolation,
        ),
    ]
}

pub fn find_catalog_scenario(key: &str) -> Option<LogicScenario> {
    catalog_scenarios()
        .into_iter()
        .find(|scenario| scenario.key() == key)
}

fn daily_determinism(ctx: &ScenarioCtx) -> Result<ScenarioOutcome> {
    let mut outcome = ScenarioOutcome::default();
    let mut targets = HashSet::new();
    for day in 0..ctx.days {
        let date = utc_date(ctx.instant(day));
        let clock = ctx.clock();
        clock.set(ctx.instant(day));
        let mut first = ctx.session(MemoryStore::new(), clock.clone());
        let mut second = ctx.session(MemoryStore::new(), clock);
        let a = first.update_based_on_save()?.target.name.clone();
        let b = second.update_based_on_save()?.target.name.clone();
        ensure!(a == b, "{date}: sessions disagree ({a} vs {b})");

        let index = seeded_index(&date, ctx.catalog.len());
        let expected = &ctx.catalog.characters()[index].name;
        ensure!(
            *expected == a,
            "{date}: target {a} does not match seeded index {index}"
        );
        targets.insert(a);
    }
    outcome.notes.push(format!(
        "{} distinct targets over {} days",
        targets.len(),
        ctx.days
    ));
    Ok(outcome)
}

fn daily_rollover(ctx: &ScenarioCtx) -> Result<ScenarioOutcome> {
    let mut outcome = ScenarioOutcome::default();
    let backend = MemoryStore::new();
    let clock = ctx.clock();
    for day in 0..ctx.days {
        let date = utc_date(clock.now());
        let mut session = ctx.session(backend.clone(), clock.clone());
        let view = session.update_based_on_save()?;
        ensure!(view.seed == date, "{date}: loaded seed {}", view.seed);
        ensure!(view.hints.is_empty(), "{date}: guesses carried over");

        let mut policy = ctx.policy(day);
        let view = play_to_end(&mut session, policy.as_mut())?;
        if ctx.verbose {
            println!(
                "   {date}: {} in {} ({})",
                view.target.name,
                view.hints.len(),
                if view.won { "won" } else { "lost" }
            );
        }
        outcome.record_game(&view);
        clock.advance(Duration::days(1));
    }

    let record = ctx
        .session(backend, clock)
        .store()
        .load_game(GameMode::Daily);
    ensure!(
        record.history.len() == ctx.days as usize,
        "history holds {} days, expected {}",
        record.history.len(),
        ctx.days
    );
    ensure!(
        record.scores.played == ctx.days,
        "scores counted {} games, expected {}",
        record.scores.played,
        ctx.days
    );
    ensure!(
        record.scores.won == outcome.games_won,
        "scores counted {} wins, expected {}",
        record.scores.won,
        outcome.games_won
    );
    outcome.notes.push(format!(
        "streak {} (max {})",
        record.scores.current_streak, record.scores.max_streak
    ));
    Ok(outcome)
}

fn endless_epochs(ctx: &ScenarioCtx) -> Result<ScenarioOutcome> {
    let mut outcome = ScenarioOutcome::default();
    let clock = ctx.clock();
    let mut session = ctx.session(MemoryStore::new(), clock.clone());
    let view = session.set_mode(GameMode::Endless)?;
    let date = utc_date(clock.now());
    ensure!(
        view.seed == endless_seed(&date, 0),
        "first endless seed was {}",
        view.seed
    );

    let mut seeds = HashSet::new();
    for epoch in 0..ctx.days {
        let view = session.view().cloned().context("endless view missing")?;
        let expected = endless_seed(&date, epoch);
        ensure!(view.seed == expected, "epoch {epoch}: seed {}", view.seed);
        seeds.insert(view.seed);

        let mut policy = ctx.policy(epoch);
        let view = play_to_end(&mut session, policy.as_mut())?;
        outcome.record_game(&view);
        ensure!(session.reset_endless()?, "reset refused in endless mode");
    }
    ensure!(
        seeds.len() == ctx.days as usize,
        "only {} distinct endless seeds",
        seeds.len()
    );

    clock.advance(Duration::days(1));
    session.reset_endless()?;
    let next = utc_date(clock.now());
    let view = session.view().context("endless view missing")?;
    ensure!(
        view.seed == endless_seed(&next, 0),
        "counter did not restart on {next}: {}",
        view.seed
    );
    Ok(outcome)
}

fn replay_consistency(ctx: &ScenarioCtx) -> Result<ScenarioOutcome> {
    let mut outcome = ScenarioOutcome::default();
    let backend = MemoryStore::new();
    let clock = ctx.clock();
    for day in 0..ctx.days {
        let mut session = ctx.session(backend.clone(), clock.clone());
        let mut policy = ctx.policy(day);
        let live = play_to_end(&mut session, policy.as_mut())?;
        outcome.record_game(&live);

        let mut reloaded = ctx.session(backend.clone(), clock.clone());
        let view = reloaded.update_based_on_save()?;
        ensure!(*view == live, "{}: reloaded view differs", live.seed);

        let names: Vec<&str> = live.hints.iter().map(|hint| hint.name.as_str()).collect();
        let replayed = replay_guesses(&ctx.catalog, &names, &live.seed)?;
        ensure!(replayed == live.hints, "{}: replayed hints differ", live.seed);
        clock.advance(Duration::days(1));
    }
    Ok(outcome)
}

fn mode_isolation(ctx: &ScenarioCtx) -> Result<ScenarioOutcome> {
    let outcome = ScenarioOutcome::default();
    let backend = MemoryStore::new();
    let clock = ctx.clock();
    let mut session = ctx.session(backend.clone(), clock.clone());
    let daily = session.update_based_on_save()?.clone();
    let mut policy = ctx.policy(0);
    let first = policy
        .next_guess(&ctx.catalog, &daily)
        .context("no daily candidate")?;
    session.submit_guess(&first)?;
    session.release_cooldown();
    let daily_guesses = session.store().load_game(GameMode::Daily).data.guesses;

    let endless = session.set_mode(GameMode::Endless)?.clone();
    ensure!(endless.hints.is_empty(), "endless inherited daily guesses");
    ensure!(
        session.store().get_last_played_game() == GameMode::Endless,
        "last played marker not updated"
    );
    if let Some(guess) = policy.next_guess(&ctx.catalog, &endless) {
        session.submit_guess(&guess)?;
        session.release_cooldown();
    }

    let daily_again = session.set_mode(GameMode::Daily)?;
    ensure!(
        daily_again.hints.len() == daily_guesses.len(),
        "daily guesses changed while in endless mode"
    );

    let mut reopened = ctx.session(backend, clock);
    ensure!(
        reopened.update_based_on_save()?.mode == GameMode::Daily,
        "reopened session did not resume daily mode"
    );
    Ok(outcome)
}
