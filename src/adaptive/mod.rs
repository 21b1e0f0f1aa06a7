pub mod difficulty;
pub mod reminder;
pub mod trend;
pub mod workout;

pub use difficulty::DifficultyAdapter;
pub use reminder::next_reminder_time;
pub use trend::{label_accuracy_trend, least_squares_slope};
pub use workout::{GameStats, WorkoutComposer};
