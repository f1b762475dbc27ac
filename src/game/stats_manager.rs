use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use log::{info, warn};

use super::storage::{PuzzleIndex, PuzzleStorage, StatsStorage};
use crate::error::Result;
use crate::model::{GameHistoryEntry, PuzzlePatch, SavedPuzzle, UserStats};

/// Player stats kept in `stats.json` under the data directory.
#[derive(Debug)]
pub struct StatsManager {
    data_dir: PathBuf,
    stats: UserStats,
}

impl StatsManager {
    pub fn new(data_dir: PathBuf) -> Self {
        if !data_dir.exists() {
            let _ = fs::create_dir_all(&data_dir);
        }

        let mut manager = Self {
            data_dir,
            stats: UserStats::default(),
        };
        manager.load();
        manager
    }

    fn stats_path(&self) -> PathBuf {
        self.data_dir.join("stats.json")
    }

    fn load(&mut self) {
        if let Ok(contents) = fs::read_to_string(self.stats_path()) {
            match serde_json::from_str(&contents) {
                Ok(stats) => self.stats = stats,
                Err(e) => warn!(target: "stats", "Ignoring unreadable stats file: {}", e),
            }
        }
    }

    fn write(&self, stats: &UserStats) -> Result<()> {
        let contents = serde_json::to_string_pretty(stats)?;
        fs::write(self.stats_path(), contents)?;
        Ok(())
    }

    /// Stats only change once they are on disk.
    fn commit(&mut self, stats: UserStats) -> Result<()> {
        self.write(&stats)?;
        self.stats = stats;
        Ok(())
    }
}

impl StatsStorage for StatsManager {
    fn get_stats(&self) -> Result<UserStats> {
        Ok(self.stats.clone())
    }

    fn record_completion(&mut self, entry: GameHistoryEntry) -> Result<UserStats> {
        info!(
            target: "stats",
            "Recording {} on {} with {} mistakes",
            if entry.won { "win" } else { "loss" },
            entry.date,
            entry.mistakes
        );
        let mut next = self.stats.clone();
        if next.record(entry) {
            self.commit(next)?;
        }
        Ok(self.stats.clone())
    }

    fn reset_stats(&mut self) -> Result<()> {
        self.commit(UserStats::default())
    }
}

/// Scheduled puzzles kept in `puzzles.json` under the data directory. Every mutation
/// rewrites the whole file.
#[derive(Debug)]
pub struct JsonPuzzleStore {
    path: PathBuf,
    index: PuzzleIndex,
}

impl JsonPuzzleStore {
    pub fn new(data_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&data_dir)?;
        let path = data_dir.join("puzzles.json");
        let index = match fs::read_to_string(&path) {
            Ok(contents) => PuzzleIndex::from_puzzles(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => PuzzleIndex::default(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, index })
    }

    /// Writes `index` and only then makes it current.
    fn commit(&mut self, index: PuzzleIndex) -> Result<()> {
        let contents = serde_json::to_string_pretty(&index.list_puzzles())?;
        fs::write(&self.path, contents)?;
        self.index = index;
        Ok(())
    }
}

impl PuzzleStorage for JsonPuzzleStore {
    fn get_daily_puzzle(&self, date: NaiveDate) -> Result<Option<SavedPuzzle>> {
        Ok(self.index.get_daily_puzzle(date))
    }

    fn save_puzzle(&mut self, puzzle: SavedPuzzle) -> Result<()> {
        let mut next = self.index.clone();
        next.save_puzzle(puzzle);
        self.commit(next)
    }

    fn get_puzzle(&self, id: &str) -> Result<Option<SavedPuzzle>> {
        Ok(self.index.get_puzzle(id))
    }

    fn list_puzzles(&self) -> Result<Vec<SavedPuzzle>> {
        Ok(self.index.list_puzzles())
    }

    fn update_puzzle(&mut self, id: &str, patch: PuzzlePatch) -> Result<SavedPuzzle> {
        let mut next = self.index.clone();
        let updated = next.update_puzzle(id, patch)?;
        self.commit(next)?;
        Ok(updated)
    }

    fn delete_puzzle(&mut self, id: &str) -> Result<()> {
        let mut next = self.index.clone();
        next.delete_puzzle(id)?;
        self.commit(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Puzzle;

    fn entry(date: &str, won: bool) -> GameHistoryEntry {
        GameHistoryEntry {
            date: date.parse().unwrap(),
            won,
            mistakes: if won { 1 } else { 4 },
            completed_at: 1_736_900_000,
        }
    }

    #[test]
    fn test_stats_survive_reload() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = StatsManager::new(dir.path().to_path_buf());
        manager.record_completion(entry("2025-01-14", true)).unwrap();
        manager.record_completion(entry("2025-01-15", true)).unwrap();

        let reloaded = StatsManager::new(dir.path().to_path_buf());
        let stats = reloaded.get_stats().unwrap();
        assert_eq!(stats.games_played, 2);
        assert_eq!(stats.current_streak, 2);
        assert_eq!(stats.last_played_date, Some("2025-01-15".parse().unwrap()));
    }

    #[test]
    fn test_reset_clears_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = StatsManager::new(dir.path().to_path_buf());
        manager.record_completion(entry("2025-01-15", false)).unwrap();
        manager.reset_stats().unwrap();

        let reloaded = StatsManager::new(dir.path().to_path_buf());
        assert_eq!(reloaded.get_stats().unwrap(), UserStats::default());
    }

    #[test]
    fn test_puzzles_survive_reload() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonPuzzleStore::new(dir.path().to_path_buf()).unwrap();
        let puzzle = SavedPuzzle::new(
            "2025-01-15".parse().unwrap(),
            Puzzle {
                groups: vec![],
                films: vec![],
            },
        );
        store.save_puzzle(puzzle.clone()).unwrap();

        let mut reloaded = JsonPuzzleStore::new(dir.path().to_path_buf()).unwrap();
        assert_eq!(
            reloaded
                .get_daily_puzzle("2025-01-15".parse().unwrap())
                .unwrap(),
            Some(puzzle.clone())
        );
        reloaded.delete_puzzle(&puzzle.id).unwrap();
        let emptied = JsonPuzzleStore::new(dir.path().to_path_buf()).unwrap();
        assert!(emptied.list_puzzles().unwrap().is_empty());
    }

    #[test]
    fn test_failed_stats_write_keeps_completion_pending() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = StatsManager::new(dir.path().to_path_buf());
        let blocker = dir.path().join("stats.json");
        fs::create_dir(&blocker).unwrap();

        assert!(manager.record_completion(entry("2025-01-15", true)).is_err());
        assert_eq!(manager.get_stats().unwrap(), UserStats::default());

        fs::remove_dir(&blocker).unwrap();
        let stats = manager.record_completion(entry("2025-01-15", true)).unwrap();
        assert_eq!(stats.games_played, 1);
        assert!(blocker.is_file());

        let reloaded = StatsManager::new(dir.path().to_path_buf());
        assert_eq!(reloaded.get_stats().unwrap().games_played, 1);
    }

    #[test]
    fn test_failed_puzzle_write_leaves_store_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonPuzzleStore::new(dir.path().to_path_buf()).unwrap();
        let kept = SavedPuzzle::new(
            "2025-01-14".parse().unwrap(),
            Puzzle {
                groups: vec![],
                films: vec![],
            },
        );
        store.save_puzzle(kept.clone()).unwrap();

        let blocker = dir.path().join("puzzles.json");
        fs::remove_file(&blocker).unwrap();
        fs::create_dir(&blocker).unwrap();

        let added = SavedPuzzle::new(
            "2025-01-15".parse().unwrap(),
            Puzzle {
                groups: vec![],
                films: vec![],
            },
        );
        assert!(store.save_puzzle(added).is_err());
        assert!(store.delete_puzzle(&kept.id).is_err());
        assert_eq!(store.list_puzzles().unwrap(), vec![kept]);
    }
}
