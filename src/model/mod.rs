mod analytics_event;
mod difficulty;
mod enriched_film;
mod film;
mod game_engine_command;
mod game_engine_event;
mod game_stats;
mod group;
mod guess;
mod potential_group;
mod puzzle;
pub mod session_state;

pub use analytics_event::AnalyticsEvent;
pub use difficulty::{Difficulty, GroupColor};
pub use enriched_film::{CastCredit, CrewCredit, EnrichedFilm, FilmCollection};
pub use film::{Film, FilmId};
pub use game_engine_command::GameEngineCommand;
pub use game_engine_event::{CompletedPuzzle, GameEngineEvent};
pub use game_stats::{GameHistoryEntry, UserStats};
pub use group::{Group, GROUP_SIZE};
pub use guess::Guess;
pub use potential_group::{ConnectionCategory, PotentialGroup};
pub use puzzle::{Puzzle, PuzzlePatch, SavedPuzzle, GROUP_COUNT};
pub use session_state::{
    GameStatus, GuessOutcome, SessionState, ALREADY_TRIED_MESSAGE, MAX_MISTAKES,
    MAX_SELECTIONS, ONE_AWAY_MESSAGE,
};
