use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct GameHistoryEntry {
    pub date: NaiveDate,
    pub won: bool,
    pub mistakes: u8,
    pub completed_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct UserStats {
    pub games_played: u32,
    pub games_won: u32,
    /// Percentage, rounded to the nearest whole number.
    pub win_rate: u32,
    pub current_streak: u32,
    pub max_streak: u32,
    pub last_played_date: Option<NaiveDate>,
    pub game_history: Vec<GameHistoryEntry>,
}

impl UserStats {
    /// Folds a finished game into the totals. A second result for an already
    /// recorded date is ignored and `false` is returned.
    pub fn record(&mut self, entry: GameHistoryEntry) -> bool {
        if self.entry_for(entry.date).is_some() {
            return false;
        }

        self.games_played += 1;
        if entry.won {
            self.games_won += 1;
            let continues = self
                .last_played_date
                .and_then(|last| last.succ_opt())
                .is_some_and(|next| next == entry.date);
            self.current_streak = if continues && self.current_streak > 0 {
                self.current_streak + 1
            } else {
                1
            };
        } else {
            self.current_streak = 0;
        }
        self.max_streak = self.max_streak.max(self.current_streak);
        self.win_rate =
            ((self.games_won as f64 / self.games_played as f64) * 100.0).round() as u32;
        self.last_played_date = Some(
            self.last_played_date
                .map_or(entry.date, |last| last.max(entry.date)),
        );
        self.game_history.push(entry);
        true
    }

    /// The entry with the latest date, regardless of where it sits in the history.
    pub fn most_recent_entry(&self) -> Option<&GameHistoryEntry> {
        self.game_history.iter().max_by_key(|e| e.date)
    }

    pub fn entry_for(&self, date: NaiveDate) -> Option<&GameHistoryEntry> {
        self.game_history.iter().find(|e| e.date == date)
    }
}
