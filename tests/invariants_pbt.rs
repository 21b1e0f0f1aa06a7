//! Property-Based Tests for the adaptive layer and trial engine
//!
//! Tests the following invariants:
//! - Difficulty recommendations always land in [1.0, 10.0]
//! - Recommendation confidence is one of the two published levels
//! - Composed workouts never exceed four games and map only in-range levels
//! - Correct-answer scores never increase with elapsed time
//! - A driven engine always completes with accuracy in [0, 100] and a
//!   non-negative session score

use proptest::prelude::*;
use proptest::test_runner::TestCaseError;

use impulse_core::config::ScoreParams;
use impulse_core::engine::score_response;
use impulse_core::{
    DifficultyAdapter, DifficultyTier, GameDefinition, GamePhase, GameType, PerformanceRecord,
    Response, TrendLabel, TrialEngine, UserPreferences, WorkoutComposer,
};

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_game_type() -> impl Strategy<Value = GameType> {
    prop_oneof![
        Just(GameType::Memory),
        Just(GameType::Attention),
        Just(GameType::ProblemSolving),
        Just(GameType::Flexibility),
        Just(GameType::Speed),
    ]
}

fn arb_tier() -> impl Strategy<Value = DifficultyTier> {
    prop_oneof![
        Just(DifficultyTier::Easy),
        Just(DifficultyTier::Medium),
        Just(DifficultyTier::Hard),
        Just(DifficultyTier::Expert),
        Just(DifficultyTier::Master),
    ]
}

fn arb_record() -> impl Strategy<Value = PerformanceRecord> {
    (
        arb_game_type(),
        1.0f64..=10.0f64,      // difficulty level
        -100i64..=1500i64,     // score
        0.0f64..=100.0f64,     // accuracy
        10.0f64..=600.0f64,    // time spent (s)
        100.0f64..=5000.0f64,  // avg reaction (ms)
        0u32..=20u32,          // mistakes
    )
        .prop_map(|(game, level, score, accuracy, time_spent, reaction, mistakes)| {
            PerformanceRecord::new(
                "pbt-user",
                game,
                level,
                score,
                accuracy,
                time_spent,
                reaction,
                mistakes,
                TrendLabel::Steady,
            )
        })
}

fn arb_history() -> impl Strategy<Value = Vec<PerformanceRecord>> {
    prop::collection::vec(arb_record(), 0..30).prop_map(|mut records| {
        for (i, record) in records.iter_mut().enumerate() {
            record.created_at = 1_000_000 + i as i64 * 60_000;
        }
        records
    })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn recommendation_stays_in_range(current in arb_record(), history in arb_history()) {
        let adapter = DifficultyAdapter::default();
        let recommendation = adapter.recommend(&current, &history);
        prop_assert!(recommendation.new_difficulty >= 1.0);
        prop_assert!(recommendation.new_difficulty <= 10.0);
        prop_assert!(!recommendation.reason.is_empty());
    }

    #[test]
    fn confidence_is_one_of_the_two_levels(current in arb_record(), history in arb_history()) {
        let adapter = DifficultyAdapter::default();
        let recommendation = adapter.recommend(&current, &history);
        prop_assert!(
            recommendation.confidence == 0.5 || recommendation.confidence == 0.8,
            "unexpected confidence {}",
            recommendation.confidence
        );
    }

    #[test]
    fn workout_plans_are_bounded(
        history in arb_history(),
        favorites in prop::collection::vec(arb_game_type(), 0..8),
        duration in 5u32..=60u32,
    ) {
        let composer = WorkoutComposer::default();
        let preferences = UserPreferences {
            favorite_game_types: favorites,
            ..Default::default()
        };
        let plan = composer.compose(&preferences, &history, duration);

        prop_assert!(plan.game_types.len() >= 3);
        prop_assert!(plan.game_types.len() <= 4);
        prop_assert_eq!(plan.duration_minutes, duration);

        let mut seen = plan.game_types.clone();
        seen.sort_by_key(|g| g.as_str());
        seen.dedup();
        prop_assert_eq!(seen.len(), plan.game_types.len(), "duplicate game in plan");

        for game in &plan.game_types {
            let level = plan.difficulty_levels[game];
            prop_assert!((1.0..=10.0).contains(&level), "level {} out of range", level);
        }
    }

    #[test]
    fn scoring_is_monotone_in_elapsed_time(
        base in 0i64..=200i64,
        bonus_factor in 0.0f64..=0.5f64,
        limit in 500i64..=20_000i64,
        a in 0i64..=20_000i64,
        b in 0i64..=20_000i64,
    ) {
        let params = ScoreParams { base, bonus_factor, penalty: 0 };
        let (fast, slow) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(
            score_response(&params, true, fast, limit)
                >= score_response(&params, true, slow, limit)
        );
    }

    #[test]
    fn driven_engine_completes_with_sane_result(
        game in arb_game_type(),
        level in 1u32..=10u32,
        tier in arb_tier(),
        seed in 0u64..=1_000u64,
        deltas in prop::collection::vec(50i64..=800i64, 1..200),
    ) {
        let definition = GameDefinition::for_game(game, level, tier);
        let mut engine = TrialEngine::with_seed(definition, seed);
        engine.start().map_err(|e| TestCaseError::fail(e.to_string()))?;

        let mut delta_cycle = deltas.iter().cycle();
        let mut answered = false;
        // alternate answering and letting trials time out; the loop bound
        // covers the longest possible session with the smallest delta
        for _ in 0..100_000 {
            if engine.phase() == GamePhase::Completed {
                break;
            }
            if engine.phase() == GamePhase::Playing && !answered {
                engine.submit_response(Some(Response::Choice(0)));
                answered = true;
            } else {
                answered = false;
            }
            if let Some(delta) = delta_cycle.next() {
                engine.tick(*delta);
            }
        }

        prop_assert_eq!(engine.phase(), GamePhase::Completed);
        let result = engine.result().ok_or_else(|| {
            TestCaseError::fail("completed engine carried no result")
        })?;
        prop_assert!((0.0..=100.0).contains(&result.accuracy));
        prop_assert!(result.score >= 0);
        prop_assert!(result.avg_reaction_time_ms >= 0.0);
    }
}
