use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Difficulty, Film, Group, GROUP_SIZE};
use crate::error::{FilmectionsError, Result};

pub const GROUP_COUNT: usize = 4;

/// Four disjoint groups plus the shuffled union of their films.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Puzzle {
    pub groups: Vec<Group>,
    pub films: Vec<Film>,
}

impl Puzzle {
    /// Checks the shape every finished puzzle must have: four groups of four, one per
    /// tier, and sixteen distinct films that match the flat film list.
    pub fn validate(&self) -> Result<()> {
        if self.groups.len() != GROUP_COUNT {
            return Err(FilmectionsError::InvalidPuzzle(format!(
                "expected {} groups, found {}",
                GROUP_COUNT,
                self.groups.len()
            )));
        }
        let mut seen = HashSet::new();
        for group in &self.groups {
            if group.films.len() != GROUP_SIZE {
                return Err(FilmectionsError::InvalidPuzzle(format!(
                    "group {} has {} films",
                    group.id,
                    group.films.len()
                )));
            }
            for film in &group.films {
                if !seen.insert(film.id) {
                    return Err(FilmectionsError::InvalidPuzzle(format!(
                        "film {} appears in more than one group",
                        film.id
                    )));
                }
            }
        }
        let tiers: HashSet<Difficulty> = self.groups.iter().map(|g| g.difficulty).collect();
        if tiers.len() != GROUP_COUNT {
            return Err(FilmectionsError::InvalidPuzzle(
                "groups must cover every difficulty tier once".to_string(),
            ));
        }
        let flat: HashSet<_> = self.films.iter().map(|f| f.id).collect();
        if flat != seen || self.films.len() != seen.len() {
            return Err(FilmectionsError::InvalidPuzzle(
                "film list does not match the groups".to_string(),
            ));
        }
        Ok(())
    }
}

/// A puzzle as persisted by puzzle storage, keyed by the day it is played.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedPuzzle {
    pub id: String,
    pub date: NaiveDate,
    pub films: Vec<Film>,
    pub groups: Vec<Group>,
    pub created_at: i64,
}

impl SavedPuzzle {
    pub fn new(date: NaiveDate, puzzle: Puzzle) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            date,
            films: puzzle.films,
            groups: puzzle.groups,
            created_at: chrono::Utc::now().timestamp(),
        }
    }

    pub fn to_puzzle(&self) -> Puzzle {
        Puzzle {
            groups: self.groups.clone(),
            films: self.films.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PuzzlePatch {
    pub date: Option<NaiveDate>,
    pub films: Option<Vec<Film>>,
    pub groups: Option<Vec<Group>>,
}

impl PuzzlePatch {
    pub fn apply(self, puzzle: &mut SavedPuzzle) {
        if let Some(date) = self.date {
            puzzle.date = date;
        }
        if let Some(films) = self.films {
            puzzle.films = films;
        }
        if let Some(groups) = self.groups {
            puzzle.groups = groups;
        }
    }
}
