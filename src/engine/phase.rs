use serde::{Deserialize, Serialize};

/// Engine lifecycle. `Feedback` is an internal sub-state between trials;
/// `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum GamePhase {
    #[default]
    Instruction,
    Playing,
    Feedback,
    Completed,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Instruction => "instruction",
            Self::Playing => "playing",
            Self::Feedback => "feedback",
            Self::Completed => "completed",
        }
    }

    /// Responses are only scored mid-play. Anything else is a UI
    /// double-dispatch and gets ignored.
    pub fn accepts_response(&self) -> bool {
        matches!(self, Self::Playing)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_playing_accepts_responses() {
        assert!(GamePhase::Playing.accepts_response());
        assert!(!GamePhase::Instruction.accepts_response());
        assert!(!GamePhase::Feedback.accepts_response());
        assert!(!GamePhase::Completed.accepts_response());
    }
}
