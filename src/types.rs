use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameType {
    Memory,
    Attention,
    ProblemSolving,
    Flexibility,
    Speed,
}

impl GameType {
    pub const ALL: [GameType; 5] = [
        Self::Memory,
        Self::Attention,
        Self::ProblemSolving,
        Self::Flexibility,
        Self::Speed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Attention => "attention",
            Self::ProblemSolving => "problem_solving",
            Self::Flexibility => "flexibility",
            Self::Speed => "speed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "memory" => Some(Self::Memory),
            "attention" => Some(Self::Attention),
            "problem_solving" | "problem-solving" => Some(Self::ProblemSolving),
            "flexibility" => Some(Self::Flexibility),
            "speed" => Some(Self::Speed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum DifficultyTier {
    Easy,
    #[default]
    Medium,
    Hard,
    Expert,
    Master,
}

impl DifficultyTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
            Self::Expert => "expert",
            Self::Master => "master",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "easy" => Self::Easy,
            "hard" => Self::Hard,
            "expert" => Self::Expert,
            "master" => Self::Master,
            _ => Self::Medium,
        }
    }

    /// Starting numeric difficulty for a favorite game slotted into a
    /// workout. The preference UI only exposes easy/medium/hard; the richer
    /// tiers cap at the hard mapping.
    pub fn favorite_start_level(&self) -> f64 {
        match self {
            Self::Easy => 1.0,
            Self::Medium => 2.0,
            Self::Hard | Self::Expert | Self::Master => 3.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum TrendLabel {
    Improving,
    #[default]
    Steady,
    Declining,
}

impl TrendLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Improving => "improving",
            Self::Steady => "steady",
            Self::Declining => "declining",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum ReminderFrequency {
    #[default]
    Daily,
    EveryOtherDay,
    Weekly,
}

impl ReminderFrequency {
    pub fn interval_days(&self) -> i64 {
        match self {
            Self::Daily => 1,
            Self::EveryOtherDay => 2,
            Self::Weekly => 7,
        }
    }
}

/// Persisted summary of one completed game session. Write-once: the adaptive
/// layer only ever reads these.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceRecord {
    pub id: String,
    pub user_id: String,
    pub game_type: GameType,
    pub difficulty_level: f64,
    pub score: i64,
    pub accuracy: f64,
    pub time_spent_secs: f64,
    pub reaction_time_ms: f64,
    pub mistakes: u32,
    pub trend: TrendLabel,
    pub created_at: i64,
}

impl PerformanceRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_id: impl Into<String>,
        game_type: GameType,
        difficulty_level: f64,
        score: i64,
        accuracy: f64,
        time_spent_secs: f64,
        reaction_time_ms: f64,
        mistakes: u32,
        trend: TrendLabel,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            game_type,
            difficulty_level: difficulty_level.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY),
            score,
            accuracy: accuracy.clamp(0.0, 100.0),
            time_spent_secs,
            reaction_time_ms,
            mistakes,
            trend,
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Records with non-finite or out-of-range metrics are skipped by the
    /// adaptive layer rather than aborting a computation.
    pub fn is_well_formed(&self) -> bool {
        self.difficulty_level.is_finite()
            && (MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&self.difficulty_level)
            && self.accuracy.is_finite()
            && (0.0..=100.0).contains(&self.accuracy)
            && self.reaction_time_ms.is_finite()
            && self.reaction_time_ms >= 0.0
    }
}

pub const MIN_DIFFICULTY: f64 = 1.0;
pub const MAX_DIFFICULTY: f64 = 10.0;

pub fn clamp_difficulty(level: f64) -> f64 {
    level.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY)
}

/// Ephemeral output of the difficulty adapter. Computed fresh per request and
/// never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyRecommendation {
    pub new_difficulty: f64,
    pub reason: String,
    pub confidence: f64,
}

/// Ephemeral output of the workout composer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutPlan {
    pub game_types: Vec<GameType>,
    pub difficulty_levels: HashMap<GameType, f64>,
    pub duration_minutes: u32,
    pub reasoning: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    #[serde(default)]
    pub preferred_difficulty: DifficultyTier,
    #[serde(default = "default_workout_minutes")]
    pub workout_duration_minutes: u32,
    #[serde(default)]
    pub favorite_game_types: Vec<GameType>,
    #[serde(default)]
    pub reminder_frequency: ReminderFrequency,
}

fn default_workout_minutes() -> u32 {
    15
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            preferred_difficulty: DifficultyTier::Medium,
            workout_duration_minutes: 15,
            favorite_game_types: Vec::new(),
            reminder_frequency: ReminderFrequency::Daily,
        }
    }
}

impl UserPreferences {
    /// Lenient decoder for preference blobs coming out of a store. Unknown
    /// favorite entries are dropped and malformed documents degrade to the
    /// defaults; plan generation must never fail on bad stored data.
    pub fn from_json_lossy(raw: &str) -> Self {
        let Ok(value) = serde_json::from_str::<serde_json::Value>(raw) else {
            return Self::default();
        };
        let defaults = Self::default();

        let preferred_difficulty = value
            .get("preferredDifficulty")
            .and_then(|v| v.as_str())
            .map(DifficultyTier::parse)
            .unwrap_or(defaults.preferred_difficulty);
        let workout_duration_minutes = value
            .get("workoutDurationMinutes")
            .and_then(|v| v.as_u64())
            .map(|v| v as u32)
            .unwrap_or(defaults.workout_duration_minutes);
        let favorite_game_types = value
            .get("favoriteGameTypes")
            .and_then(|v| v.as_array())
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|e| e.as_str())
                    .filter_map(GameType::parse)
                    .collect()
            })
            .unwrap_or_default();
        let reminder_frequency = value
            .get("reminderFrequency")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or(defaults.reminder_frequency);

        Self {
            preferred_difficulty,
            workout_duration_minutes,
            favorite_game_types,
            reminder_frequency,
        }
    }
}

/// Terminal aggregate of one engine run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResult {
    pub score: i64,
    pub accuracy: f64,
    pub time_spent_ms: i64,
    pub avg_reaction_time_ms: f64,
    pub correct_count: u32,
    pub total_count: u32,
    pub mistakes: u32,
}
