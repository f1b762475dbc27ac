use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Film, FilmId, Group, Guess, GROUP_SIZE};

pub const MAX_MISTAKES: u8 = 4;
pub const MAX_SELECTIONS: usize = GROUP_SIZE;
pub const ONE_AWAY_MESSAGE: &str = "One away!";
pub const ALREADY_TRIED_MESSAGE: &str = "Already tried!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    #[default]
    Playing,
    Won,
    Lost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    /// Not playing, or the selection was not exactly four films.
    Ignored,
    AlreadyTried,
    Correct {
        /// Index of the matched group in the puzzle's group order.
        group_index: usize,
        game_won: bool,
    },
    Incorrect {
        one_away: bool,
        game_lost: bool,
    },
}

/// The live play session. Every transition is a method that leaves `self` untouched
/// and returns the next state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SessionState {
    /// Films still on the board.
    pub films: Vec<Film>,
    /// The answer key, in generation order.
    pub groups: Vec<Group>,
    pub selected_film_ids: Vec<FilmId>,
    /// Discovery order.
    pub found_groups: Vec<Group>,
    pub previous_guesses: Vec<Guess>,
    pub mistakes: u8,
    pub status: GameStatus,
    pub notification: Option<String>,
    pub is_shaking: bool,
    pub puzzle_date: Option<NaiveDate>,
}

impl SessionState {
    /// A fresh session. Films are installed in the order given; callers shuffle first.
    pub fn start(films: Vec<Film>, groups: Vec<Group>, puzzle_date: Option<NaiveDate>) -> Self {
        Self {
            films,
            groups,
            puzzle_date,
            ..Default::default()
        }
    }

    /// A terminal session for a puzzle that was already finished earlier. A loss always
    /// carries the full mistake count.
    pub fn restored(groups: Vec<Group>, won: bool, mistakes: u8) -> Self {
        Self {
            found_groups: groups.clone(),
            groups,
            mistakes: if won {
                mistakes.min(MAX_MISTAKES - 1)
            } else {
                MAX_MISTAKES
            },
            status: if won {
                GameStatus::Won
            } else {
                GameStatus::Lost
            },
            ..Default::default()
        }
    }

    pub fn is_playing(&self) -> bool {
        self.status == GameStatus::Playing
    }

    pub fn is_complete(&self) -> bool {
        !self.is_playing()
    }

    pub fn is_selected(&self, film_id: FilmId) -> bool {
        self.selected_film_ids.contains(&film_id)
    }

    pub fn mistakes_remaining(&self) -> u8 {
        MAX_MISTAKES - self.mistakes
    }

    pub fn with_film_toggled(&self, film_id: FilmId) -> SessionState {
        let mut next = self.clone();
        if !self.is_playing() {
            return next;
        }
        if let Some(pos) = next.selected_film_ids.iter().position(|id| *id == film_id) {
            next.selected_film_ids.remove(pos);
        } else if next.selected_film_ids.len() < MAX_SELECTIONS
            && next.films.iter().any(|f| f.id == film_id)
        {
            next.selected_film_ids.push(film_id);
        }
        next
    }

    pub fn with_selection_cleared(&self) -> SessionState {
        SessionState {
            selected_film_ids: Vec::new(),
            ..self.clone()
        }
    }

    pub fn with_films(&self, films: Vec<Film>) -> SessionState {
        SessionState {
            films,
            ..self.clone()
        }
    }

    pub fn with_notification(&self, notification: Option<String>) -> SessionState {
        SessionState {
            notification,
            ..self.clone()
        }
    }

    pub fn with_shaking(&self, is_shaking: bool) -> SessionState {
        SessionState {
            is_shaking,
            ..self.clone()
        }
    }

    /// Evaluates the current selection. A repeated guess short-circuits before the
    /// answer key is consulted, even if it would have been correct.
    pub fn submit_guess(&self) -> (SessionState, GuessOutcome) {
        let mut next = self.clone();
        if !self.is_playing() {
            return (next, GuessOutcome::Ignored);
        }
        let Some(guess) = Guess::from_selection(&self.selected_film_ids) else {
            return (next, GuessOutcome::Ignored);
        };

        if self.previous_guesses.contains(&guess) {
            next.notification = Some(ALREADY_TRIED_MESSAGE.to_string());
            return (next, GuessOutcome::AlreadyTried);
        }

        next.previous_guesses.push(guess);

        if let Some(group_index) = self.groups.iter().position(|g| guess.matches(g)) {
            let group = &self.groups[group_index];
            next.found_groups.push(group.clone());
            next.films.retain(|f| !group.contains(f.id));
            next.selected_film_ids.clear();
            let game_won = next.found_groups.len() == self.groups.len();
            if game_won {
                next.status = GameStatus::Won;
            }
            return (
                next,
                GuessOutcome::Correct {
                    group_index,
                    game_won,
                },
            );
        }

        let one_away = self
            .groups
            .iter()
            .any(|g| guess.overlap(g) == GROUP_SIZE - 1);
        if one_away {
            next.notification = Some(ONE_AWAY_MESSAGE.to_string());
        }

        next.mistakes += 1;
        next.is_shaking = true;
        let game_lost = next.mistakes >= MAX_MISTAKES;
        if game_lost {
            next.status = GameStatus::Lost;
            next.found_groups = self.groups.clone();
            next.films.clear();
            next.selected_film_ids.clear();
        }
        (next, GuessOutcome::Incorrect { one_away, game_lost })
    }

    /// Every film id and connection in the puzzle, for the recent-content tracker.
    pub fn puzzle_content(&self) -> (Vec<FilmId>, Vec<String>) {
        let film_ids = self
            .groups
            .iter()
            .flat_map(|g| g.films.iter().map(|f| f.id))
            .collect();
        let connections = self.groups.iter().map(|g| g.connection.clone()).collect();
        (film_ids, connections)
    }
}
