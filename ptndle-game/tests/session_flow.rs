use std::rc::Rc;
use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use ptndle_game::{
    Catalog, FixedClock, GameMode, GameSession, GameStore, GuessOutcome, KeyValueStore,
    MemoryStore, SessionPhase, calculate_thresholds, evaluate_guess, replay_guesses,
};

fn catalog() -> Arc<Catalog> {
    Arc::new(
        Catalog::from_json(include_str!(
            "../../ptndle-web/static/assets/data/characters.json"
        ))
        .unwrap(),
    )
}

fn session_at(
    backend: MemoryStore,
    clock: Rc<FixedClock>,
) -> GameSession<MemoryStore, Rc<FixedClock>> {
    GameSession::new(catalog(), GameStore::new(backend, clock))
}

fn june_first() -> Rc<FixedClock> {
    Rc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap(),
    ))
}

#[test]
fn bundled_catalog_targets_are_pinned() {
    let catalog = catalog();
    assert_eq!(catalog.len(), 16);
    assert_eq!(catalog.seeded("2025-06-01").name, "Greta");
    assert_eq!(catalog.seeded("2025-06-02").name, "Perpetua");
    assert_eq!(catalog.seeded("2025-06-01T00:00:00.000Z").name, "Kestrel");
    assert_eq!(catalog.seeded("2025-06-01T00:00:00.001Z").name, "Elowen");
}

#[test]
fn daily_rollover_resets_guesses_and_preserves_history() {
    let backend = MemoryStore::new();
    let clock = june_first();
    let mut session = session_at(backend.clone(), clock.clone());
    session.update_based_on_save().unwrap();
    session.submit_guess("Ayla").unwrap();
    session.release_cooldown();
    session.submit_guess("Fenn").unwrap();

    clock.advance(Duration::days(1));
    let mut next_day = session_at(backend, clock);
    let view = next_day.update_based_on_save().unwrap();
    assert_eq!(view.seed, "2025-06-02");
    assert_eq!(view.target.name, "Perpetua");
    assert!(view.hints.is_empty());
    assert_eq!(next_day.phase(), SessionPhase::NotStarted);

    let record = next_day.store().load_game(GameMode::Daily);
    assert_eq!(
        record.history["2025-06-01"],
        vec!["Ayla".to_string(), "Fenn".to_string()]
    );
}

#[test]
fn resume_is_idempotent() {
    let backend = MemoryStore::new();
    let clock = june_first();
    let mut first = session_at(backend.clone(), clock.clone());
    first.update_based_on_save().unwrap();
    first.submit_guess("Nyx").unwrap();
    let before = first.view().unwrap().clone();

    let mut second = session_at(backend.clone(), clock.clone());
    let after = second.update_based_on_save().unwrap().clone();
    assert_eq!(before, after);
    let again = second.update_based_on_save().unwrap().clone();
    assert_eq!(after, again);
}

#[test]
fn endless_epochs_yield_distinct_seeds() {
    let backend = MemoryStore::new();
    let clock = june_first();
    let mut session = session_at(backend.clone(), clock.clone());
    let view = session.set_mode(GameMode::Endless).unwrap();
    assert_eq!(view.seed, "2025-06-01T00:00:00.000Z");
    assert_eq!(view.target.name, "Kestrel");

    session.reset_endless().unwrap();
    let view = session.view().unwrap();
    assert_eq!(view.seed, "2025-06-01T00:00:00.001Z");
    assert_eq!(view.target.name, "Elowen");

    // a fresh process resumes the same endless puzzle
    let mut resumed = session_at(backend, clock);
    let view = resumed.update_based_on_save().unwrap();
    assert_eq!(view.mode, GameMode::Endless);
    assert_eq!(view.seed, "2025-06-01T00:00:00.001Z");
}

#[test]
fn endless_counter_restarts_on_a_new_day() {
    let backend = MemoryStore::new();
    let clock = june_first();
    let mut session = session_at(backend, clock.clone());
    session.set_mode(GameMode::Endless).unwrap();
    session.reset_endless().unwrap();
    session.reset_endless().unwrap();
    assert_eq!(session.view().unwrap().seed, "2025-06-01T00:00:00.002Z");

    clock.advance(Duration::days(1));
    // unfinished endless puzzles carry over until reset
    assert_eq!(
        session.update_based_on_save().unwrap().seed,
        "2025-06-01T00:00:00.002Z"
    );
    session.reset_endless().unwrap();
    assert_eq!(session.view().unwrap().seed, "2025-06-02T00:00:00.000Z");
    assert_eq!(session.view().unwrap().target.name, "Mireille");
}

#[test]
fn replay_reproduces_live_hints() {
    let catalog = catalog();
    let seed = "2025-06-01";
    let target = catalog.seeded(seed);
    let thresholds = calculate_thresholds(target);
    let live: Vec<_> = ["Hollis", "Orrin"]
        .iter()
        .map(|name| evaluate_guess(catalog.get(name).unwrap(), target, &thresholds))
        .collect();
    assert_eq!(replay_guesses(&catalog, &["Hollis", "Orrin"], seed).unwrap(), live);
}

#[test]
fn winning_daily_records_scores_once() {
    let backend = MemoryStore::new();
    let clock = june_first();
    let mut session = session_at(backend.clone(), clock.clone());
    session.update_based_on_save().unwrap();
    assert_eq!(session.submit_guess("Greta").unwrap(), GuessOutcome::Accepted);
    let view = session.view().unwrap();
    assert!(view.won);
    assert_eq!(
        session.share_text().unwrap(),
        "ptndle 2025-06-01 1/6\n🟩🟩🟩🟩🟩"
    );

    let mut reopened = session_at(backend.clone(), clock);
    reopened.update_based_on_save().unwrap();
    let record = reopened.store().load_game(GameMode::Daily);
    assert_eq!(record.scores.played, 1);
    assert_eq!(record.scores.won, 1);
    // daily is the default until a mode switch writes the marker
    assert!(!backend.has("ptndle.last_played").unwrap());
}

#[test]
fn daily_streak_restarts_after_skipped_days() {
    let backend = MemoryStore::new();
    let clock = june_first();
    for skip in [0, 10, 10] {
        clock.advance(Duration::days(skip));
        let mut session = session_at(backend.clone(), clock.clone());
        let target = session.update_based_on_save().unwrap().target.name.clone();
        assert_eq!(session.submit_guess(&target).unwrap(), GuessOutcome::Accepted);
        assert!(session.view().unwrap().won);
    }

    let record = session_at(backend, clock)
        .store()
        .load_game(GameMode::Daily);
    assert_eq!(record.scores.played, 3);
    assert_eq!(record.scores.won, 3);
    assert_eq!(record.scores.current_streak, 1);
    assert_eq!(record.scores.max_streak, 1);
    assert_eq!(record.scores.last_scored_seed.as_deref(), Some("2025-06-21"));
}

#[test]
fn daily_streak_carries_into_the_next_day() {
    let backend = MemoryStore::new();
    let clock = june_first();
    for skip in [0, 1] {
        clock.advance(Duration::days(skip));
        let mut session = session_at(backend.clone(), clock.clone());
        let target = session.update_based_on_save().unwrap().target.name.clone();
        session.submit_guess(&target).unwrap();
    }

    let record = session_at(backend, clock)
        .store()
        .load_game(GameMode::Daily);
    assert_eq!(record.scores.current_streak, 2);
    assert_eq!(record.scores.max_streak, 2);
}
