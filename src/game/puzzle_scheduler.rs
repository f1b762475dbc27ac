use chrono::{Local, NaiveDate};
use log::{debug, info};

use super::storage::{PuzzleStorage, StatsStorage};
use crate::error::{FilmectionsError, Result};
use crate::model::{GameHistoryEntry, Puzzle, SavedPuzzle};

/// How far ahead `next_available_date` looks before giving up.
pub const SCHEDULE_LOOKAHEAD_DAYS: u32 = 365;

pub type Today = Box<dyn Fn() -> NaiveDate>;

/// One puzzle per calendar day, layered over puzzle and stats storage.
pub struct PuzzleScheduler<P: PuzzleStorage, S: StatsStorage> {
    puzzles: P,
    stats: S,
    today: Today,
}

impl<P: PuzzleStorage, S: StatsStorage> PuzzleScheduler<P, S> {
    pub fn new(puzzles: P, stats: S) -> Self {
        Self::with_today(puzzles, stats, Box::new(|| Local::now().date_naive()))
    }

    pub fn with_today(puzzles: P, stats: S, today: Today) -> Self {
        Self {
            puzzles,
            stats,
            today,
        }
    }

    pub fn today(&self) -> NaiveDate {
        (self.today)()
    }

    pub fn puzzles(&self) -> &P {
        &self.puzzles
    }

    pub fn puzzles_mut(&mut self) -> &mut P {
        &mut self.puzzles
    }

    pub fn stats(&self) -> &S {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut S {
        &mut self.stats
    }

    pub fn get_puzzle_for_date(&self, date: NaiveDate) -> Result<Option<SavedPuzzle>> {
        self.puzzles.get_daily_puzzle(date)
    }

    pub fn get_todays_puzzle(&self) -> Result<Option<SavedPuzzle>> {
        self.get_puzzle_for_date(self.today())
    }

    /// True when the latest-dated history entry is today.
    pub fn has_user_completed_today(&self) -> Result<bool> {
        Ok(self.todays_completion()?.is_some())
    }

    /// The latest-dated history entry, if it is today's. Only stats are read.
    pub fn todays_completion(&self) -> Result<Option<GameHistoryEntry>> {
        let stats = self.stats.get_stats()?;
        let today = self.today();
        Ok(stats
            .most_recent_entry()
            .filter(|entry| entry.date == today)
            .cloned())
    }

    /// First date from today onward without a stored puzzle.
    pub fn get_next_available_date(&self) -> Result<NaiveDate> {
        let mut date = self.today();
        for _ in 0..SCHEDULE_LOOKAHEAD_DAYS {
            if self.puzzles.get_daily_puzzle(date)?.is_none() {
                debug!(target: "puzzle_scheduler", "Next available date is {}", date);
                return Ok(date);
            }
            date = match date.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }
        Err(FilmectionsError::NoAvailableDate {
            days: SCHEDULE_LOOKAHEAD_DAYS,
        })
    }

    /// Stores the puzzle on the next free date.
    pub fn schedule_puzzle(&mut self, puzzle: Puzzle) -> Result<SavedPuzzle> {
        puzzle.validate()?;
        let date = self.get_next_available_date()?;
        let saved = SavedPuzzle::new(date, puzzle);
        self.puzzles.save_puzzle(saved.clone())?;
        info!(target: "puzzle_scheduler", "Scheduled puzzle {} for {}", saved.id, date);
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::storage::{MemoryPuzzleStore, MemoryStatsStore};
    use crate::model::{PuzzlePatch, UserStats};
    use std::cell::Cell;
    use std::rc::Rc;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn empty_puzzle(on: &str) -> SavedPuzzle {
        SavedPuzzle::new(
            date(on),
            Puzzle {
                groups: vec![],
                films: vec![],
            },
        )
    }

    fn history(entries: &[(&str, bool)]) -> MemoryStatsStore {
        MemoryStatsStore::new(UserStats {
            game_history: entries
                .iter()
                .map(|(d, won)| GameHistoryEntry {
                    date: date(d),
                    won: *won,
                    mistakes: if *won { 0 } else { 4 },
                    completed_at: 0,
                })
                .collect(),
            ..Default::default()
        })
    }

    fn scheduler(
        puzzles: MemoryPuzzleStore,
        stats: MemoryStatsStore,
    ) -> PuzzleScheduler<MemoryPuzzleStore, MemoryStatsStore> {
        PuzzleScheduler::with_today(puzzles, stats, Box::new(|| date("2025-01-15")))
    }

    /// Counts lookups and reports every date as taken.
    struct FullStore {
        lookups: Rc<Cell<u32>>,
    }

    impl PuzzleStorage for FullStore {
        fn get_daily_puzzle(&self, date: NaiveDate) -> Result<Option<SavedPuzzle>> {
            self.lookups.set(self.lookups.get() + 1);
            Ok(Some(empty_puzzle(&date.to_string())))
        }
        fn save_puzzle(&mut self, _: SavedPuzzle) -> Result<()> {
            Ok(())
        }
        fn get_puzzle(&self, _: &str) -> Result<Option<SavedPuzzle>> {
            Ok(None)
        }
        fn list_puzzles(&self) -> Result<Vec<SavedPuzzle>> {
            Ok(vec![])
        }
        fn update_puzzle(&mut self, id: &str, _: PuzzlePatch) -> Result<SavedPuzzle> {
            Err(FilmectionsError::PuzzleNotFound(id.to_string()))
        }
        fn delete_puzzle(&mut self, _: &str) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_todays_puzzle_is_a_date_lookup() {
        let mut puzzles = MemoryPuzzleStore::new();
        let today = empty_puzzle("2025-01-15");
        puzzles.save_puzzle(today.clone()).unwrap();
        let scheduler = scheduler(puzzles, MemoryStatsStore::default());

        assert_eq!(scheduler.get_todays_puzzle().unwrap(), Some(today));
        assert!(scheduler
            .get_puzzle_for_date(date("2025-01-20"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_completed_today_uses_latest_entry() {
        let s = scheduler(MemoryPuzzleStore::new(), MemoryStatsStore::default());
        assert!(!s.has_user_completed_today().unwrap());

        let s = scheduler(MemoryPuzzleStore::new(), history(&[("2025-01-14", true)]));
        assert!(!s.has_user_completed_today().unwrap());

        let s = scheduler(
            MemoryPuzzleStore::new(),
            history(&[
                ("2025-01-10", true),
                ("2025-01-12", false),
                ("2025-01-15", true),
            ]),
        );
        assert!(s.has_user_completed_today().unwrap());

        // out of order history still finds today
        let s = scheduler(
            MemoryPuzzleStore::new(),
            history(&[("2025-01-15", false), ("2025-01-11", true)]),
        );
        assert!(s.has_user_completed_today().unwrap());
    }

    #[test]
    fn test_todays_completion_reads_no_puzzles() {
        let lookups = Rc::new(Cell::new(0));
        let s = PuzzleScheduler::with_today(
            FullStore {
                lookups: lookups.clone(),
            },
            history(&[("2025-01-14", true), ("2025-01-15", false)]),
            Box::new(|| date("2025-01-15")),
        );
        let entry = s.todays_completion().unwrap().unwrap();
        assert_eq!(entry.date, date("2025-01-15"));
        assert!(!entry.won);
        assert_eq!(lookups.get(), 0);

        let s = scheduler(MemoryPuzzleStore::new(), history(&[("2025-01-14", true)]));
        assert_eq!(s.todays_completion().unwrap(), None);
    }

    #[test]
    fn test_next_available_date_is_today_when_free() {
        let s = scheduler(MemoryPuzzleStore::new(), MemoryStatsStore::default());
        assert_eq!(s.get_next_available_date().unwrap(), date("2025-01-15"));
    }

    #[test]
    fn test_next_available_date_skips_taken_days() {
        let mut puzzles = MemoryPuzzleStore::new();
        puzzles.save_puzzle(empty_puzzle("2025-01-15")).unwrap();
        puzzles.save_puzzle(empty_puzzle("2025-01-16")).unwrap();
        puzzles.save_puzzle(empty_puzzle("2025-01-18")).unwrap();
        let s = scheduler(puzzles, MemoryStatsStore::default());
        assert_eq!(s.get_next_available_date().unwrap(), date("2025-01-17"));
    }

    #[test]
    fn test_next_available_date_gives_up_after_a_year() {
        let lookups = Rc::new(Cell::new(0));
        let s = PuzzleScheduler::with_today(
            FullStore {
                lookups: lookups.clone(),
            },
            MemoryStatsStore::default(),
            Box::new(|| date("2025-01-15")),
        );
        let err = s.get_next_available_date().unwrap_err();
        assert_eq!(
            err.to_string(),
            "No available dates found within next 365 days"
        );
        assert_eq!(lookups.get(), SCHEDULE_LOOKAHEAD_DAYS);
    }

    #[test]
    fn test_schedule_puzzle_fills_next_free_day() {
        let mut puzzles = MemoryPuzzleStore::new();
        puzzles.save_puzzle(empty_puzzle("2025-01-15")).unwrap();
        let mut s = scheduler(puzzles, MemoryStatsStore::default());

        let puzzle = crate::game::PuzzleGenerator::new(
            Default::default(),
            Box::new(<rand::rngs::StdRng as rand::SeedableRng>::seed_from_u64(1)),
        )
        .generate_test_puzzle();
        let saved = s.schedule_puzzle(puzzle).unwrap();
        assert_eq!(saved.date, date("2025-01-16"));
        assert_eq!(
            s.get_puzzle_for_date(date("2025-01-16")).unwrap(),
            Some(saved)
        );

        let broken = Puzzle {
            groups: vec![],
            films: vec![],
        };
        assert!(matches!(
            s.schedule_puzzle(broken),
            Err(FilmectionsError::InvalidPuzzle(_))
        ));
    }
}
