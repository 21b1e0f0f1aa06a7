use impulse_core::{
    DifficultyTier, GameType, PerformanceRecord, TrendLabel, UserPreferences, WorkoutComposer,
};

fn record(game: GameType, accuracy: f64, level: f64) -> PerformanceRecord {
    PerformanceRecord::new("u1", game, level, 500, accuracy, 60.0, 900.0, 0, TrendLabel::Steady)
}

fn sessions(game: GameType, accuracy: f64, level: f64, count: usize) -> Vec<PerformanceRecord> {
    (0..count).map(|_| record(game, accuracy, level)).collect()
}

#[test]
fn three_weakest_types_form_the_focus_set() {
    let composer = WorkoutComposer::default();
    let mut history = Vec::new();
    history.extend(sessions(GameType::Memory, 40.0, 2.0, 4));
    history.extend(sessions(GameType::Attention, 55.0, 3.0, 4));
    history.extend(sessions(GameType::Flexibility, 65.0, 3.0, 4));
    history.extend(sessions(GameType::ProblemSolving, 80.0, 4.0, 4));
    history.extend(sessions(GameType::Speed, 95.0, 6.0, 4));

    let plan = composer.compose(&UserPreferences::default(), &history, 15);
    assert_eq!(plan.game_types.len(), 3);
    assert!(plan.game_types.contains(&GameType::Memory));
    assert!(plan.game_types.contains(&GameType::Attention));
    assert!(plan.game_types.contains(&GameType::Flexibility));
}

#[test]
fn strong_favorite_joins_through_the_favorites_slot() {
    let composer = WorkoutComposer::default();
    let mut history = Vec::new();
    history.extend(sessions(GameType::Attention, 50.0, 2.0, 4));
    history.extend(sessions(GameType::Memory, 50.0, 2.0, 4));
    history.extend(sessions(GameType::Flexibility, 50.0, 2.0, 4));
    history.extend(sessions(GameType::Speed, 95.0, 6.0, 4));

    let prefs = UserPreferences {
        favorite_game_types: vec![GameType::Speed],
        preferred_difficulty: DifficultyTier::Hard,
        ..Default::default()
    };
    let plan = composer.compose(&prefs, &history, 20);

    // excluded from the weak-area set, included as a favorite
    assert_eq!(plan.game_types.len(), 4);
    assert_eq!(plan.game_types[3], GameType::Speed);
    assert_eq!(plan.difficulty_levels[&GameType::Speed], 3.0);
    assert!(plan.reasoning.contains("favorite"));
    assert_eq!(plan.duration_minutes, 20);
}

#[test]
fn never_more_than_four_games_even_with_many_favorites() {
    let composer = WorkoutComposer::default();
    let prefs = UserPreferences {
        favorite_game_types: GameType::ALL.to_vec(),
        ..Default::default()
    };
    let plan = composer.compose(&prefs, &[], 15);
    assert_eq!(plan.game_types.len(), 4);
    let mut unique = plan.game_types.clone();
    unique.sort_by_key(|g| g.as_str());
    unique.dedup();
    assert_eq!(unique.len(), 4);
}

#[test]
fn favorite_already_in_focus_set_is_not_duplicated() {
    let composer = WorkoutComposer::default();
    let history = sessions(GameType::Memory, 30.0, 2.0, 4);
    let prefs = UserPreferences {
        favorite_game_types: vec![GameType::Memory],
        ..Default::default()
    };
    let plan = composer.compose(&prefs, &history, 15);
    let memory_slots = plan.game_types.iter().filter(|g| **g == GameType::Memory).count();
    assert_eq!(memory_slots, 1);
    // focus-set difficulty wins over the favorite mapping: 30% accuracy
    // drops the level from 2 to 1
    assert_eq!(plan.difficulty_levels[&GameType::Memory], 1.0);
}

#[test]
fn focus_difficulty_tracks_recent_accuracy() {
    let composer = WorkoutComposer::default();
    let mut history = Vec::new();
    history.extend(sessions(GameType::Attention, 40.0, 3.0, 5));
    history.extend(sessions(GameType::ProblemSolving, 48.0, 4.0, 5));
    history.extend(sessions(GameType::Flexibility, 70.0, 5.0, 5));
    history.extend(sessions(GameType::Memory, 92.0, 6.0, 5));
    history.extend(sessions(GameType::Speed, 95.0, 7.0, 5));

    let plan = composer.compose(&UserPreferences::default(), &history, 15);
    assert_eq!(plan.game_types.len(), 3);
    // below 60% steps the level down, the 60-85 band holds it
    assert_eq!(plan.difficulty_levels[&GameType::Attention], 2.0);
    assert_eq!(plan.difficulty_levels[&GameType::ProblemSolving], 3.0);
    assert_eq!(plan.difficulty_levels[&GameType::Flexibility], 5.0);
}

#[test]
fn reasoning_names_weak_areas() {
    let composer = WorkoutComposer::default();
    let mut history = Vec::new();
    history.extend(sessions(GameType::Memory, 45.0, 2.0, 4));
    history.extend(sessions(GameType::Speed, 90.0, 5.0, 4));

    let plan = composer.compose(&UserPreferences::default(), &history, 15);
    assert!(plan.reasoning.contains("memory"));
    assert!(!plan.reasoning.contains("speed"));
}

#[test]
fn malformed_stored_favorites_degrade_to_defaults() {
    let composer = WorkoutComposer::default();
    let prefs = UserPreferences::from_json_lossy(r#"{"favoriteGameTypes": "oops"}"#);
    let plan = composer.compose(&prefs, &[], 15);
    assert_eq!(plan.game_types.len(), 3);
}
