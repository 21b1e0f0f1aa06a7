use crate::adaptive::trend::least_squares_slope;
use crate::config::AdapterConfig;
use crate::types::{clamp_difficulty, DifficultyRecommendation, PerformanceRecord};

pub const INSUFFICIENT_DATA_REASON: &str = "Insufficient data for adaptation";
const FALLBACK_CONFIDENCE: f64 = 0.5;
// the source heuristic does not vary confidence by branch
const DECISION_CONFIDENCE: f64 = 0.8;

/// Decides whether the player should face a higher, same, or lower difficulty
/// next time. Pure function of its inputs: history is only ever read.
#[derive(Debug, Clone, Default)]
pub struct DifficultyAdapter {
    config: AdapterConfig,
}

impl DifficultyAdapter {
    pub fn new(config: AdapterConfig) -> Self {
        Self { config }
    }

    pub fn recommend(
        &self,
        current: &PerformanceRecord,
        history: &[PerformanceRecord],
    ) -> DifficultyRecommendation {
        if !current.is_well_formed() {
            tracing::warn!(record_id = %current.id, "malformed current record, skipping adaptation");
            return self.fallback(clamp_difficulty(if current.difficulty_level.is_finite() {
                current.difficulty_level
            } else {
                crate::types::MIN_DIFFICULTY
            }));
        }

        // same game type only, most recent W entries, oldest -> newest
        let mut window: Vec<&PerformanceRecord> = history
            .iter()
            .filter(|r| r.game_type == current.game_type && r.is_well_formed())
            .collect();
        window.sort_by_key(|r| r.created_at);
        let window: Vec<&PerformanceRecord> = window
            .into_iter()
            .rev()
            .take(self.config.performance_window)
            .rev()
            .collect();

        if window.len() < self.config.min_history {
            return self.fallback(current.difficulty_level);
        }

        let n = window.len() as f64;
        let avg_accuracy = window.iter().map(|r| r.accuracy).sum::<f64>() / n;
        let avg_reaction_time = window.iter().map(|r| r.reaction_time_ms).sum::<f64>() / n;
        let accuracies: Vec<f64> = window.iter().map(|r| r.accuracy).collect();

        let is_improving = least_squares_slope(&accuracies) > self.config.improving_slope;
        let is_stable = (current.accuracy - avg_accuracy).abs() < self.config.stable_band;
        let is_declining = current.accuracy < avg_accuracy - self.config.decline_margin;

        // evaluated top-down, first match wins
        let (adjustment, reason) = if current.accuracy > self.config.excellent_accuracy
            && avg_reaction_time < self.config.fast_reaction_ms
            && is_improving
        {
            (1.0, "Excellent performance - increasing challenge")
        } else if current.accuracy > self.config.good_accuracy && is_stable {
            (0.5, "Good performance - slight increase")
        } else if current.accuracy < self.config.poor_accuracy || is_declining {
            (-1.0, "Performance declining - reducing difficulty")
        } else if current.accuracy < self.config.low_accuracy {
            (-0.5, "Low accuracy - slight decrease")
        } else {
            (0.0, "Performance stable - maintaining difficulty")
        };

        let new_difficulty = clamp_difficulty(current.difficulty_level + adjustment);
        tracing::debug!(
            game = current.game_type.as_str(),
            avg_accuracy,
            avg_reaction_time,
            adjustment,
            new_difficulty,
            "difficulty recommendation"
        );

        DifficultyRecommendation {
            new_difficulty,
            reason: reason.to_string(),
            confidence: DECISION_CONFIDENCE,
        }
    }

    fn fallback(&self, difficulty: f64) -> DifficultyRecommendation {
        DifficultyRecommendation {
            new_difficulty: difficulty,
            reason: INSUFFICIENT_DATA_REASON.to_string(),
            confidence: FALLBACK_CONFIDENCE,
        }
    }
}
