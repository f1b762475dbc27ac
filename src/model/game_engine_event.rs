use chrono::NaiveDate;

use super::{AnalyticsEvent, FilmId};

/// What a finished session hands to the recent-content tracker and stats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedPuzzle {
    pub film_ids: Vec<FilmId>,
    pub connections: Vec<String>,
    pub won: bool,
    pub mistakes: u8,
    pub puzzle_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEngineEvent {
    Analytics(AnalyticsEvent),
    PuzzleCompleted(CompletedPuzzle),
}
