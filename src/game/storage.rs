use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::error::{FilmectionsError, Result};
use crate::model::{GameHistoryEntry, PuzzlePatch, SavedPuzzle, UserStats};

/// Date-keyed puzzle persistence.
pub trait PuzzleStorage {
    fn get_daily_puzzle(&self, date: NaiveDate) -> Result<Option<SavedPuzzle>>;
    /// Replaces whatever was stored for the same date.
    fn save_puzzle(&mut self, puzzle: SavedPuzzle) -> Result<()>;
    fn get_puzzle(&self, id: &str) -> Result<Option<SavedPuzzle>>;
    /// Ascending by date.
    fn list_puzzles(&self) -> Result<Vec<SavedPuzzle>>;
    fn update_puzzle(&mut self, id: &str, patch: PuzzlePatch) -> Result<SavedPuzzle>;
    fn delete_puzzle(&mut self, id: &str) -> Result<()>;
}

pub trait StatsStorage {
    fn get_stats(&self) -> Result<UserStats>;
    fn record_completion(&mut self, entry: GameHistoryEntry) -> Result<UserStats>;
    fn reset_stats(&mut self) -> Result<()>;
}

/// Puzzles by date, shared by the in-memory and JSON file stores.
#[derive(Debug, Clone, Default)]
pub struct PuzzleIndex {
    by_date: BTreeMap<NaiveDate, SavedPuzzle>,
}

impl PuzzleIndex {
    pub fn from_puzzles(puzzles: Vec<SavedPuzzle>) -> Self {
        Self {
            by_date: puzzles.into_iter().map(|p| (p.date, p)).collect(),
        }
    }

    pub fn get_daily_puzzle(&self, date: NaiveDate) -> Option<SavedPuzzle> {
        self.by_date.get(&date).cloned()
    }

    pub fn save_puzzle(&mut self, puzzle: SavedPuzzle) {
        // an id moving to a new date leaves its old slot
        self.by_date.retain(|_, p| p.id != puzzle.id);
        self.by_date.insert(puzzle.date, puzzle);
    }

    pub fn get_puzzle(&self, id: &str) -> Option<SavedPuzzle> {
        self.by_date.values().find(|p| p.id == id).cloned()
    }

    pub fn list_puzzles(&self) -> Vec<SavedPuzzle> {
        self.by_date.values().cloned().collect()
    }

    pub fn update_puzzle(&mut self, id: &str, patch: PuzzlePatch) -> Result<SavedPuzzle> {
        let mut puzzle = self
            .get_puzzle(id)
            .ok_or_else(|| FilmectionsError::PuzzleNotFound(id.to_string()))?;
        patch.apply(&mut puzzle);
        self.save_puzzle(puzzle.clone());
        Ok(puzzle)
    }

    pub fn delete_puzzle(&mut self, id: &str) -> Result<()> {
        let before = self.by_date.len();
        self.by_date.retain(|_, p| p.id != id);
        if self.by_date.len() == before {
            return Err(FilmectionsError::PuzzleNotFound(id.to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryPuzzleStore {
    index: PuzzleIndex,
}

impl MemoryPuzzleStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PuzzleStorage for MemoryPuzzleStore {
    fn get_daily_puzzle(&self, date: NaiveDate) -> Result<Option<SavedPuzzle>> {
        Ok(self.index.get_daily_puzzle(date))
    }

    fn save_puzzle(&mut self, puzzle: SavedPuzzle) -> Result<()> {
        self.index.save_puzzle(puzzle);
        Ok(())
    }

    fn get_puzzle(&self, id: &str) -> Result<Option<SavedPuzzle>> {
        Ok(self.index.get_puzzle(id))
    }

    fn list_puzzles(&self) -> Result<Vec<SavedPuzzle>> {
        Ok(self.index.list_puzzles())
    }

    fn update_puzzle(&mut self, id: &str, patch: PuzzlePatch) -> Result<SavedPuzzle> {
        self.index.update_puzzle(id, patch)
    }

    fn delete_puzzle(&mut self, id: &str) -> Result<()> {
        self.index.delete_puzzle(id)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStatsStore {
    stats: UserStats,
}

impl MemoryStatsStore {
    pub fn new(stats: UserStats) -> Self {
        Self { stats }
    }
}

impl StatsStorage for MemoryStatsStore {
    fn get_stats(&self) -> Result<UserStats> {
        Ok(self.stats.clone())
    }

    fn record_completion(&mut self, entry: GameHistoryEntry) -> Result<UserStats> {
        self.stats.record(entry);
        Ok(self.stats.clone())
    }

    fn reset_stats(&mut self) -> Result<()> {
        self.stats = UserStats::default();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Puzzle;

    fn saved(date: &str) -> SavedPuzzle {
        SavedPuzzle::new(
            date.parse().unwrap(),
            Puzzle {
                groups: vec![],
                films: vec![],
            },
        )
    }

    #[test]
    fn test_save_and_lookup_by_date_and_id() {
        let mut store = MemoryPuzzleStore::new();
        let puzzle = saved("2025-01-16");
        store.save_puzzle(saved("2025-01-20")).unwrap();
        store.save_puzzle(puzzle.clone()).unwrap();

        assert_eq!(
            store.get_daily_puzzle("2025-01-16".parse().unwrap()).unwrap(),
            Some(puzzle.clone())
        );
        assert_eq!(store.get_puzzle(&puzzle.id).unwrap(), Some(puzzle));
        assert!(store
            .get_daily_puzzle("2025-01-17".parse().unwrap())
            .unwrap()
            .is_none());
        let dates: Vec<_> = store
            .list_puzzles()
            .unwrap()
            .iter()
            .map(|p| p.date.to_string())
            .collect();
        assert_eq!(dates, vec!["2025-01-16", "2025-01-20"]);
    }

    #[test]
    fn test_update_moves_puzzle_to_new_date() {
        let mut store = MemoryPuzzleStore::new();
        let puzzle = saved("2025-01-16");
        store.save_puzzle(puzzle.clone()).unwrap();

        let updated = store
            .update_puzzle(
                &puzzle.id,
                PuzzlePatch {
                    date: Some("2025-02-01".parse().unwrap()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.date.to_string(), "2025-02-01");
        assert!(store
            .get_daily_puzzle("2025-01-16".parse().unwrap())
            .unwrap()
            .is_none());
        assert_eq!(store.list_puzzles().unwrap().len(), 1);
    }

    #[test]
    fn test_missing_ids_are_errors() {
        let mut store = MemoryPuzzleStore::new();
        assert!(matches!(
            store.delete_puzzle("nope"),
            Err(FilmectionsError::PuzzleNotFound(_))
        ));
        assert!(store.update_puzzle("nope", PuzzlePatch::default()).is_err());
    }

    #[test]
    fn test_memory_stats_reset() {
        let mut store = MemoryStatsStore::default();
        store
            .record_completion(GameHistoryEntry {
                date: "2025-01-15".parse().unwrap(),
                won: true,
                mistakes: 1,
                completed_at: 0,
            })
            .unwrap();
        assert_eq!(store.get_stats().unwrap().games_won, 1);
        store.reset_stats().unwrap();
        assert_eq!(store.get_stats().unwrap(), UserStats::default());
    }
}
