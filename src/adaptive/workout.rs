use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::ComposerConfig;
use crate::types::{
    clamp_difficulty, GameType, PerformanceRecord, UserPreferences, WorkoutPlan,
};

/// Running aggregate for one game type. Means are maintained incrementally so
/// a long history never needs a second pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStats {
    pub games_played: u32,
    pub avg_accuracy: f64,
    pub avg_score: f64,
    pub best_score: i64,
    pub current_level: f64,
}

impl GameStats {
    pub fn observe(&mut self, record: &PerformanceRecord) {
        let n = self.games_played as f64;
        self.avg_accuracy = (self.avg_accuracy * n + record.accuracy) / (n + 1.0);
        self.avg_score = (self.avg_score * n + record.score as f64) / (n + 1.0);
        self.best_score = self.best_score.max(record.score);
        self.current_level = self.current_level.max(record.difficulty_level);
        self.games_played += 1;
    }

    pub fn collect(history: &[PerformanceRecord]) -> HashMap<GameType, GameStats> {
        let mut stats: HashMap<GameType, GameStats> = HashMap::new();
        for record in history.iter().filter(|r| r.is_well_formed()) {
            stats.entry(record.game_type).or_default().observe(record);
        }
        stats
    }
}

/// Builds a short multi-game plan emphasizing weak areas while respecting
/// stated preferences. Pure function of its inputs.
#[derive(Debug, Clone, Default)]
pub struct WorkoutComposer {
    config: ComposerConfig,
}

impl WorkoutComposer {
    pub fn new(config: ComposerConfig) -> Self {
        Self { config }
    }

    pub fn compose(
        &self,
        preferences: &UserPreferences,
        history: &[PerformanceRecord],
        target_duration_minutes: u32,
    ) -> WorkoutPlan {
        let stats = GameStats::collect(history);

        // rank all five types ascending by average accuracy; unplayed types
        // sit at the neutral midpoint
        let mut ranked: Vec<(GameType, f64)> = GameType::ALL
            .iter()
            .map(|game| {
                let accuracy = stats
                    .get(game)
                    .map(|s| s.avg_accuracy)
                    .unwrap_or(self.config.neutral_accuracy);
                (*game, accuracy)
            })
            .collect();
        ranked.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

        let mut selected: Vec<GameType> = Vec::new();
        let mut difficulty_levels: HashMap<GameType, f64> = HashMap::new();

        for (game, _) in ranked.iter().take(self.config.focus_count) {
            selected.push(*game);
            difficulty_levels.insert(*game, self.target_difficulty(*game, history));
        }

        // up to one declared favorite joins at a preference-derived level
        for favorite in &preferences.favorite_game_types {
            if selected.len() >= self.config.max_games {
                break;
            }
            if !selected.contains(favorite) {
                selected.push(*favorite);
                difficulty_levels.insert(
                    *favorite,
                    preferences.preferred_difficulty.favorite_start_level(),
                );
            }
        }

        let reasoning = self.reasoning(&stats, preferences);
        tracing::debug!(
            games = selected.len(),
            duration = target_duration_minutes,
            "workout composed"
        );

        WorkoutPlan {
            game_types: selected,
            difficulty_levels,
            duration_minutes: target_duration_minutes,
            reasoning,
        }
    }

    /// Derive a focus-set difficulty from the type's own recent sessions.
    /// No history means starting at the bottom.
    fn target_difficulty(&self, game: GameType, history: &[PerformanceRecord]) -> f64 {
        let mut recent: Vec<&PerformanceRecord> = history
            .iter()
            .filter(|r| r.game_type == game && r.is_well_formed())
            .collect();
        recent.sort_by_key(|r| r.created_at);
        let recent: Vec<&PerformanceRecord> = recent
            .into_iter()
            .rev()
            .take(self.config.recent_window)
            .collect();

        let Some(latest) = recent.first() else {
            return crate::types::MIN_DIFFICULTY;
        };
        let avg_accuracy =
            recent.iter().map(|r| r.accuracy).sum::<f64>() / recent.len() as f64;

        let current = latest.difficulty_level;
        if avg_accuracy > self.config.raise_accuracy {
            clamp_difficulty(current + 1.0)
        } else if avg_accuracy < self.config.lower_accuracy {
            clamp_difficulty(current - 1.0)
        } else {
            current
        }
    }

    fn reasoning(
        &self,
        stats: &HashMap<GameType, GameStats>,
        preferences: &UserPreferences,
    ) -> String {
        let mut weak_areas: Vec<&str> = stats
            .iter()
            .filter(|(_, s)| s.avg_accuracy < self.config.weak_accuracy)
            .map(|(game, _)| game.as_str())
            .collect();
        weak_areas.sort_unstable();

        let mut reasoning = String::from("This workout is tailored for you based on: ");
        if !weak_areas.is_empty() {
            reasoning.push_str(&format!(
                "Focusing on improving {} skills. ",
                weak_areas.join(", ")
            ));
        }
        if !preferences.favorite_game_types.is_empty() {
            reasoning.push_str("Including your favorite activities. ");
        }
        reasoning.push_str(
            "The difficulty levels are adjusted to challenge you optimally while ensuring progress.",
        );
        reasoning
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TrendLabel;

    fn record(game: GameType, accuracy: f64, level: f64, score: i64) -> PerformanceRecord {
        PerformanceRecord::new("u1", game, level, score, accuracy, 60.0, 900.0, 0, TrendLabel::Steady)
    }

    #[test]
    fn incremental_mean_matches_direct_mean() {
        let mut stats = GameStats::default();
        let values = [90.0, 50.0, 72.0, 61.0];
        for v in values {
            stats.observe(&record(GameType::Memory, v, 3.0, 100));
        }
        let direct = values.iter().sum::<f64>() / values.len() as f64;
        assert!((stats.avg_accuracy - direct).abs() < 1e-9);
        assert_eq!(stats.games_played, 4);
    }

    #[test]
    fn empty_history_builds_a_default_plan() {
        let composer = WorkoutComposer::default();
        let plan = composer.compose(&UserPreferences::default(), &[], 15);
        assert_eq!(plan.game_types.len(), 3);
        assert!(plan.difficulty_levels.values().all(|d| *d == 1.0));
        assert_eq!(plan.duration_minutes, 15);
    }

    #[test]
    fn unplayed_type_sits_at_neutral_rank() {
        let composer = WorkoutComposer::default();
        // speed excels, memory struggles, the rest unplayed (neutral 50)
        let mut history = Vec::new();
        for _ in 0..4 {
            history.push(record(GameType::Speed, 95.0, 5.0, 900));
            history.push(record(GameType::Memory, 30.0, 2.0, 100));
        }
        let plan = composer.compose(&UserPreferences::default(), &history, 15);
        assert!(plan.game_types.contains(&GameType::Memory));
        assert!(!plan.game_types.contains(&GameType::Speed));
    }

    #[test]
    fn high_accuracy_focus_type_steps_up() {
        let composer = WorkoutComposer::default();
        let history: Vec<_> = (0..5).map(|_| record(GameType::Memory, 92.0, 4.0, 800)).collect();
        let level = composer.target_difficulty(GameType::Memory, &history);
        assert_eq!(level, 5.0);
    }

    #[test]
    fn difficulty_step_is_clamped_at_both_ends() {
        let composer = WorkoutComposer::default();
        let high: Vec<_> = (0..5).map(|_| record(GameType::Memory, 99.0, 10.0, 800)).collect();
        assert_eq!(composer.target_difficulty(GameType::Memory, &high), 10.0);
        let low: Vec<_> = (0..5).map(|_| record(GameType::Memory, 10.0, 1.0, 10)).collect();
        assert_eq!(composer.target_difficulty(GameType::Memory, &low), 1.0);
    }
}
