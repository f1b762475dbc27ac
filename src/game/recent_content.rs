use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use chrono::Utc;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::events::EventHandler;
use crate::model::{FilmId, GameEngineEvent};

const RECENT_CONTENT_FILE: &str = "recent_content.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentGame {
    pub film_ids: Vec<FilmId>,
    pub connections: Vec<String>,
    pub timestamp: i64,
}

/// Films and connections from the last few finished games. Generation avoids these.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecentContent {
    pub film_ids: HashSet<FilmId>,
    pub connections: HashSet<String>,
}

/// Remembers what recent games used. Backed by a JSON file when given a path; every
/// I/O failure is logged and otherwise ignored.
#[derive(Debug)]
pub struct RecentContentTracker {
    path: Option<PathBuf>,
    limit: usize,
    games: Vec<RecentGame>,
}

impl RecentContentTracker {
    pub fn in_memory(limit: usize) -> Self {
        Self {
            path: None,
            limit,
            games: Vec::new(),
        }
    }

    pub fn new(data_dir: PathBuf, limit: usize) -> Self {
        let path = data_dir.join(RECENT_CONTENT_FILE);
        let games = Self::load(&path);
        let mut tracker = Self {
            path: Some(path),
            limit,
            games,
        };
        tracker.games.truncate(limit);
        tracker
    }

    fn load(path: &PathBuf) -> Vec<RecentGame> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(_) => return Vec::new(),
        };
        match serde_json::from_str(&contents) {
            Ok(games) => games,
            Err(e) => {
                warn!(target: "recent_content", "Failed to load recent content: {}", e);
                Vec::new()
            }
        }
    }

    fn persist(&self) {
        let Some(path) = &self.path else {
            return;
        };
        let result = serde_json::to_string(&self.games)
            .map_err(std::io::Error::from)
            .and_then(|contents| {
                if let Some(dir) = path.parent() {
                    fs::create_dir_all(dir)?;
                }
                fs::write(path, contents)
            });
        if let Err(e) = result {
            warn!(target: "recent_content", "Failed to save recent content: {}", e);
        }
    }

    /// Newest game first.
    pub fn recent_games(&self) -> &[RecentGame] {
        &self.games
    }

    pub fn recent_content(&self) -> RecentContent {
        RecentContent {
            film_ids: self.recent_film_ids(),
            connections: self.recent_connections(),
        }
    }

    pub fn recent_film_ids(&self) -> HashSet<FilmId> {
        self.games
            .iter()
            .flat_map(|g| g.film_ids.iter().copied())
            .collect()
    }

    pub fn recent_connections(&self) -> HashSet<String> {
        self.games
            .iter()
            .flat_map(|g| g.connections.iter().cloned())
            .collect()
    }

    pub fn save_game(&mut self, film_ids: Vec<FilmId>, connections: Vec<String>) {
        debug!(
            target: "recent_content",
            "Remembering {} films and {} connections",
            film_ids.len(),
            connections.len()
        );
        self.games.insert(
            0,
            RecentGame {
                film_ids,
                connections,
                timestamp: Utc::now().timestamp_millis(),
            },
        );
        self.games.truncate(self.limit);
        self.persist();
    }
}

impl EventHandler<GameEngineEvent> for RecentContentTracker {
    fn handle_event(&mut self, event: &GameEngineEvent) {
        if let GameEngineEvent::PuzzleCompleted(completed) = event {
            self.save_game(completed.film_ids.clone(), completed.connections.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CompletedPuzzle;

    fn connections(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_keeps_only_the_most_recent_games() {
        let mut tracker = RecentContentTracker::in_memory(2);
        tracker.save_game(vec![1, 2], connections(&["A"]));
        tracker.save_game(vec![3, 4], connections(&["B"]));
        tracker.save_game(vec![5, 6], connections(&["C"]));

        assert_eq!(tracker.recent_games().len(), 2);
        assert_eq!(tracker.recent_games()[0].film_ids, vec![5, 6]);
        let content = tracker.recent_content();
        assert_eq!(content.film_ids, HashSet::from([3, 4, 5, 6]));
        assert_eq!(
            content.connections,
            HashSet::from(["B".to_string(), "C".to_string()])
        );
    }

    #[test]
    fn test_persists_between_instances() {
        let dir = tempfile::tempdir().unwrap();
        let mut tracker = RecentContentTracker::new(dir.path().to_path_buf(), 5);
        tracker.save_game(vec![10, 11], connections(&["Pixar films"]));

        let reloaded = RecentContentTracker::new(dir.path().to_path_buf(), 5);
        assert_eq!(reloaded.recent_film_ids(), HashSet::from([10, 11]));
    }

    #[test]
    fn test_corrupt_cache_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(RECENT_CONTENT_FILE), "not json").unwrap();
        let tracker = RecentContentTracker::new(dir.path().to_path_buf(), 5);
        assert!(tracker.recent_games().is_empty());
    }

    #[test]
    fn test_unwritable_cache_does_not_fail() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "").unwrap();
        let mut tracker = RecentContentTracker::new(blocker.join("sub"), 5);
        tracker.save_game(vec![1], connections(&["A"]));
        assert_eq!(tracker.recent_games().len(), 1);
    }

    #[test]
    fn test_completion_event_is_recorded() {
        let mut tracker = RecentContentTracker::in_memory(5);
        tracker.handle_event(&GameEngineEvent::PuzzleCompleted(CompletedPuzzle {
            film_ids: vec![1, 2, 3],
            connections: connections(&["Heist films"]),
            won: false,
            mistakes: 4,
            puzzle_date: None,
        }));
        assert!(tracker.recent_connections().contains("Heist films"));
    }
}
