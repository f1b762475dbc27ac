use super::Difficulty;

/// Fire-and-forget gameplay events. Nothing reads a response to these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsEvent {
    GuessSubmitted {
        correct: bool,
        mistakes: u8,
        one_away: bool,
    },
    GroupFound {
        index: usize,
        difficulty: Difficulty,
        mistakes: u8,
    },
    GameWon {
        mistakes: u8,
        groups: usize,
    },
    GameLost {
        mistakes: u8,
        groups_found: usize,
    },
    FilmsShuffled,
}
