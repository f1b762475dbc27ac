use serde::{Deserialize, Serialize};

use super::{Difficulty, Film, FilmId, GroupColor};

pub const GROUP_SIZE: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub films: Vec<Film>,
    pub connection: String,
    pub difficulty: Difficulty,
    pub color: GroupColor,
}

impl Group {
    pub fn new(id: &str, films: Vec<Film>, connection: &str, difficulty: Difficulty) -> Self {
        Self {
            id: id.to_string(),
            films,
            connection: connection.to_string(),
            difficulty,
            color: difficulty.color(),
        }
    }

    /// Film ids in ascending order, the same canonical form a guess uses.
    pub fn sorted_film_ids(&self) -> Vec<FilmId> {
        let mut ids: Vec<FilmId> = self.films.iter().map(|f| f.id).collect();
        ids.sort_unstable();
        ids
    }

    pub fn contains(&self, film_id: FilmId) -> bool {
        self.films.iter().any(|f| f.id == film_id)
    }
}
