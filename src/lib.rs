//! Core engine for the Impulse cognitive-training app: the timed
//! stimulus-response loop every game instantiates, and the adaptive layer
//! that recommends difficulties and composes multi-game workouts from
//! historical performance.

pub mod adaptive;
pub mod config;
pub mod engine;
pub mod error;
pub mod session;
pub mod store;
pub mod types;

pub use adaptive::{DifficultyAdapter, GameStats, WorkoutComposer};
pub use config::{AdapterConfig, ComposerConfig, GameDefinition};
pub use engine::{GamePhase, Response, Stimulus, Trial, TrialEngine, TrialOutcome};
pub use error::{GenerationError, StorageError};
pub use session::{SessionController, SessionSummary};
pub use store::{MemoryStore, PerformanceStore, PreferenceStore};
pub use types::{
    DifficultyRecommendation, DifficultyTier, GameType, PerformanceRecord, SessionResult,
    TrendLabel, UserPreferences, WorkoutPlan,
};
