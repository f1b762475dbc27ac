use chrono::NaiveDate;

use super::{FilmId, Group, Puzzle};

#[derive(Debug, Clone)]
pub enum GameEngineCommand {
    SelectFilm(FilmId),
    DeselectAll,
    Submit,
    Shuffle,
    LoadPuzzle(Puzzle, Option<NaiveDate>),
    RestoreCompleted {
        groups: Vec<Group>,
        won: bool,
        mistakes: u8,
    },
    Reset,
}
