use serde::{Deserialize, Serialize};

use crate::types::{DifficultyTier, GameType};

/// Per-trial scoring constants. Applied uniformly:
/// `points = floor(base + max(limit - elapsed, 0) * bonus_factor)` when the
/// response is correct, `penalty` otherwise.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoreParams {
    pub base: i64,
    pub bonus_factor: f64,
    pub penalty: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MemoryParams {
    pub grid_side: u32,
    pub sequence_len: u32,
    pub memorize_ms: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AttentionParams {
    pub target_count: u32,
    pub distractor_count: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FlexibilityParams {
    pub switch_probability: f64,
}

/// Static description of one exercise instance, resolved from the game type,
/// the numeric difficulty level (1-10) and the named tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameDefinition {
    pub game_type: GameType,
    pub level: u32,
    pub tier: DifficultyTier,
    pub trial_count: u32,
    pub trial_time_ms: i64,
    pub feedback_ms: i64,
    pub score: ScoreParams,
    pub memory: Option<MemoryParams>,
    pub attention: Option<AttentionParams>,
    pub flexibility: Option<FlexibilityParams>,
}

impl GameDefinition {
    pub fn for_game(game_type: GameType, level: u32, tier: DifficultyTier) -> Self {
        let level = level.clamp(1, 10);
        match game_type {
            GameType::Memory => {
                let grid_side = (3 + level / 2).min(6);
                // a sequence can never ask for more cells than the grid holds
                let sequence_len = (3 + level + tier.sequence_bonus())
                    .min(12)
                    .min(grid_side * grid_side);
                let memorize_ms = (2000 - level as i64 * 100).max(1000);
                Self {
                    game_type,
                    level,
                    tier,
                    trial_count: 5,
                    // memorize window plus a fixed recall budget
                    trial_time_ms: memorize_ms + 10_000,
                    feedback_ms: 2000,
                    score: ScoreParams { base: 100, bonus_factor: 0.05, penalty: 0 },
                    memory: Some(MemoryParams { grid_side, sequence_len, memorize_ms }),
                    attention: None,
                    flexibility: None,
                }
            }
            GameType::Attention => {
                let round_ms = (5000 - level as i64 * 200).max(3000);
                Self {
                    game_type,
                    level,
                    tier,
                    trial_count: 8,
                    trial_time_ms: round_ms,
                    feedback_ms: 500,
                    score: ScoreParams { base: 50, bonus_factor: 0.1, penalty: -25 },
                    memory: None,
                    attention: Some(AttentionParams {
                        target_count: (2 + level).min(6),
                        distractor_count: (5 + level * 2).min(20),
                    }),
                    flexibility: None,
                }
            }
            GameType::ProblemSolving => {
                let base_ms = (30_000 - level as i64 * 2000).max(15_000);
                Self {
                    game_type,
                    level,
                    tier,
                    trial_count: 6,
                    trial_time_ms: (base_ms as f64 * tier.time_multiplier()) as i64,
                    feedback_ms: 3000,
                    score: ScoreParams { base: 100, bonus_factor: 0.01, penalty: 0 },
                    memory: None,
                    attention: None,
                    flexibility: None,
                }
            }
            GameType::Flexibility => {
                let base_ms = (5000 - level as i64 * 200).max(2500);
                let switch = ((0.3 + level as f64 * 0.1).min(0.8)
                    * tier.switch_multiplier())
                .min(1.0);
                Self {
                    game_type,
                    level,
                    tier,
                    trial_count: 15,
                    trial_time_ms: (base_ms as f64 * tier.time_multiplier()) as i64,
                    feedback_ms: 1500,
                    score: ScoreParams { base: 50, bonus_factor: 0.02, penalty: 0 },
                    memory: None,
                    attention: None,
                    flexibility: Some(FlexibilityParams { switch_probability: switch }),
                }
            }
            GameType::Speed => {
                let base_ms = (2000 - level as i64 * 150).max(800);
                Self {
                    game_type,
                    level,
                    tier,
                    trial_count: 20,
                    trial_time_ms: (base_ms as f64 * tier.speed_multiplier()) as i64,
                    feedback_ms: 1500,
                    score: ScoreParams { base: 100, bonus_factor: 0.1, penalty: 0 },
                    memory: None,
                    attention: None,
                    flexibility: None,
                }
            }
        }
    }

    /// Arithmetic/problem generators scale operand ranges with this.
    pub fn complexity(&self) -> f64 {
        self.level as f64 * self.tier.complexity_multiplier()
            + self.tier.complexity_bonus() as f64
    }
}

impl DifficultyTier {
    pub fn time_multiplier(&self) -> f64 {
        match self {
            Self::Easy => 1.2,
            Self::Medium => 1.0,
            Self::Hard => 0.8,
            Self::Expert => 0.6,
            Self::Master => 0.5,
        }
    }

    pub fn speed_multiplier(&self) -> f64 {
        match self {
            Self::Easy => 1.3,
            Self::Medium => 1.0,
            Self::Hard => 0.8,
            Self::Expert => 0.6,
            Self::Master => 0.5,
        }
    }

    pub fn switch_multiplier(&self) -> f64 {
        match self {
            Self::Easy => 0.8,
            Self::Medium => 1.0,
            Self::Hard => 1.2,
            Self::Expert => 1.4,
            Self::Master => 1.6,
        }
    }

    pub fn complexity_multiplier(&self) -> f64 {
        match self {
            Self::Easy => 0.7,
            Self::Medium => 1.0,
            Self::Hard => 1.3,
            Self::Expert => 1.6,
            Self::Master => 2.0,
        }
    }

    pub fn complexity_bonus(&self) -> u32 {
        match self {
            Self::Easy => 0,
            Self::Medium => 1,
            Self::Hard => 2,
            Self::Expert => 3,
            Self::Master => 4,
        }
    }

    pub fn sequence_bonus(&self) -> u32 {
        match self {
            Self::Easy | Self::Medium => 0,
            Self::Hard => 2,
            Self::Expert => 4,
            Self::Master => 6,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// Sliding window of recent same-type sessions considered for a trend.
    pub performance_window: usize,
    /// Below this many matching sessions the adapter refuses to extrapolate.
    pub min_history: usize,
    pub improving_slope: f64,
    pub stable_band: f64,
    pub decline_margin: f64,
    pub excellent_accuracy: f64,
    pub good_accuracy: f64,
    pub low_accuracy: f64,
    pub poor_accuracy: f64,
    pub fast_reaction_ms: f64,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            performance_window: 10,
            min_history: 3,
            improving_slope: 0.1,
            stable_band: 10.0,
            decline_margin: 15.0,
            excellent_accuracy: 85.0,
            good_accuracy: 80.0,
            low_accuracy: 70.0,
            poor_accuracy: 60.0,
            fast_reaction_ms: 1000.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComposerConfig {
    /// Accuracy assumed for game types that have never been played.
    pub neutral_accuracy: f64,
    /// Weak-area slots filled first.
    pub focus_count: usize,
    /// Hard cap on game types per workout, favorites included.
    pub max_games: usize,
    /// Per-type difficulty derives from this many most recent sessions.
    pub recent_window: usize,
    pub raise_accuracy: f64,
    pub lower_accuracy: f64,
    /// Types below this average accuracy are called out as weak areas.
    pub weak_accuracy: f64,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            neutral_accuracy: 50.0,
            focus_count: 3,
            max_games: 4,
            recent_window: 5,
            raise_accuracy: 85.0,
            lower_accuracy: 60.0,
            weak_accuracy: 70.0,
        }
    }
}
