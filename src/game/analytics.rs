use log::info;

use crate::events::EventHandler;
use crate::model::{AnalyticsEvent, GameEngineEvent};

/// Writes gameplay analytics to the log under the `analytics` target.
#[derive(Debug, Default)]
pub struct AnalyticsLogger {
    logged: usize,
}

impl AnalyticsLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn logged(&self) -> usize {
        self.logged
    }

    fn describe(event: &AnalyticsEvent) -> String {
        match event {
            AnalyticsEvent::GuessSubmitted {
                correct,
                mistakes,
                one_away,
            } => format!(
                "guess_submitted correct={} mistakes={} one_away={}",
                correct, mistakes, one_away
            ),
            AnalyticsEvent::GroupFound {
                index,
                difficulty,
                mistakes,
            } => format!(
                "group_found index={} difficulty={} mistakes={}",
                index,
                difficulty.to_string(),
                mistakes
            ),
            AnalyticsEvent::GameWon { mistakes, groups } => {
                format!("game_won mistakes={} groups={}", mistakes, groups)
            }
            AnalyticsEvent::GameLost {
                mistakes,
                groups_found,
            } => format!("game_lost mistakes={} groups_found={}", mistakes, groups_found),
            AnalyticsEvent::FilmsShuffled => "films_shuffled".to_string(),
        }
    }
}

impl EventHandler<GameEngineEvent> for AnalyticsLogger {
    fn handle_event(&mut self, event: &GameEngineEvent) {
        if let GameEngineEvent::Analytics(event) = event {
            self.logged += 1;
            info!(target: "analytics", "{}", Self::describe(event));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CompletedPuzzle, Difficulty};

    #[test]
    fn test_only_analytics_events_are_logged() {
        let mut logger = AnalyticsLogger::new();
        logger.handle_event(&GameEngineEvent::Analytics(AnalyticsEvent::FilmsShuffled));
        logger.handle_event(&GameEngineEvent::PuzzleCompleted(CompletedPuzzle {
            film_ids: vec![],
            connections: vec![],
            won: true,
            mistakes: 0,
            puzzle_date: None,
        }));
        assert_eq!(logger.logged(), 1);
    }

    #[test]
    fn test_descriptions_name_the_event() {
        let text = AnalyticsLogger::describe(&AnalyticsEvent::GroupFound {
            index: 2,
            difficulty: Difficulty::Hard,
            mistakes: 1,
        });
        assert!(text.starts_with("group_found index=2"));
        assert!(text.ends_with("mistakes=1"));
    }
}
