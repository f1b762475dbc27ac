use std::time::Instant;

use chrono::NaiveDate;
use log::{info, trace};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};

use super::settings::Settings;
use crate::events::EventEmitter;
use crate::model::{
    AnalyticsEvent, CompletedPuzzle, FilmId, GameEngineCommand, GameEngineEvent, GameStatus,
    Group, GuessOutcome, Puzzle, SessionState,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransientSignal {
    Notification,
    Shake,
}

/// A deferred clear of one transient signal. It only takes effect if nothing has set
/// the signal again since it was scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledClear {
    pub signal: TransientSignal,
    pub generation: u64,
    pub due: Instant,
}

/// Owns the live session. Transitions are computed by [`SessionState`]; the engine
/// swaps the result in, manages the transient signal timers and emits events.
pub struct GameEngine {
    state: SessionState,
    settings: Settings,
    rng: Box<dyn RngCore>,
    event_emitter: EventEmitter<GameEngineEvent>,
    notification_generation: u64,
    shake_generation: u64,
    pending_clears: Vec<ScheduledClear>,
}

impl GameEngine {
    pub fn new(
        event_emitter: EventEmitter<GameEngineEvent>,
        settings: Settings,
        rng: Box<dyn RngCore>,
    ) -> Self {
        Self {
            state: SessionState::default(),
            settings,
            rng,
            event_emitter,
            notification_generation: 0,
            shake_generation: 0,
            pending_clears: Vec::new(),
        }
    }

    pub fn from_env(event_emitter: EventEmitter<GameEngineEvent>, settings: Settings) -> Self {
        let seed = Settings::seed_from_env().unwrap_or_else(|| rand::rng().next_u64());
        Self::new(event_emitter, settings, Box::new(StdRng::seed_from_u64(seed)))
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn pending_clears(&self) -> &[ScheduledClear] {
        &self.pending_clears
    }

    pub fn handle_command(&mut self, command: GameEngineCommand) {
        trace!(target: "game_engine", "Handling command: {:?}", command);
        match command {
            GameEngineCommand::SelectFilm(film_id) => self.select_film(film_id),
            GameEngineCommand::DeselectAll => self.deselect_all(),
            GameEngineCommand::Submit => {
                self.submit_guess();
            }
            GameEngineCommand::Shuffle => self.shuffle_films(),
            GameEngineCommand::LoadPuzzle(puzzle, date) => self.initialize(puzzle, date),
            GameEngineCommand::RestoreCompleted {
                groups,
                won,
                mistakes,
            } => self.restore_completed(groups, won, mistakes),
            GameEngineCommand::Reset => self.reset(),
        }
    }

    pub fn select_film(&mut self, film_id: FilmId) {
        self.state = self.state.with_film_toggled(film_id);
    }

    pub fn deselect_all(&mut self) {
        self.state = self.state.with_selection_cleared();
    }

    pub fn submit_guess(&mut self) -> GuessOutcome {
        let (next, outcome) = self.state.submit_guess();
        let notified = matches!(
            outcome,
            GuessOutcome::AlreadyTried | GuessOutcome::Incorrect { one_away: true, .. }
        );
        self.state = next;
        trace!(target: "game_engine", "Guess outcome: {:?}", outcome);

        match outcome {
            GuessOutcome::Ignored => return outcome,
            GuessOutcome::AlreadyTried => {}
            GuessOutcome::Correct {
                group_index,
                game_won,
            } => {
                self.emit_analytics(AnalyticsEvent::GuessSubmitted {
                    correct: true,
                    mistakes: self.state.mistakes,
                    one_away: false,
                });
                self.emit_analytics(AnalyticsEvent::GroupFound {
                    index: self.state.found_groups.len() - 1,
                    difficulty: self.state.groups[group_index].difficulty,
                    mistakes: self.state.mistakes,
                });
                if game_won {
                    self.emit_analytics(AnalyticsEvent::GameWon {
                        mistakes: self.state.mistakes,
                        groups: self.state.found_groups.len(),
                    });
                    self.complete();
                }
            }
            GuessOutcome::Incorrect {
                one_away,
                game_lost,
            } => {
                self.schedule_clear(TransientSignal::Shake);
                self.emit_analytics(AnalyticsEvent::GuessSubmitted {
                    correct: false,
                    mistakes: self.state.mistakes,
                    one_away,
                });
                if game_lost {
                    self.emit_analytics(AnalyticsEvent::GameLost {
                        mistakes: self.state.mistakes,
                        groups_found: self.groups_found_before_loss(),
                    });
                    self.complete();
                }
            }
        }
        if notified {
            self.schedule_clear(TransientSignal::Notification);
        }
        outcome
    }

    /// Groups the player found themselves; a loss reveals the rest.
    fn groups_found_before_loss(&self) -> usize {
        let guessed = &self.state.previous_guesses;
        self.state
            .groups
            .iter()
            .filter(|g| guessed.iter().any(|guess| guess.matches(g)))
            .count()
    }

    pub fn shuffle_films(&mut self) {
        let mut films = self.state.films.clone();
        films.shuffle(&mut self.rng);
        self.state = self.state.with_films(films);
        self.emit_analytics(AnalyticsEvent::FilmsShuffled);
    }

    /// Starts a fresh session on the given puzzle.
    pub fn initialize(&mut self, puzzle: Puzzle, puzzle_date: Option<NaiveDate>) {
        let Puzzle { groups, mut films } = puzzle;
        films.shuffle(&mut self.rng);
        info!(
            target: "game_engine",
            "New session with {} films; date: {:?}",
            films.len(),
            puzzle_date
        );
        self.clear_timers();
        self.state = SessionState::start(films, groups, puzzle_date);
    }

    /// Shows an already finished puzzle. Nothing is emitted since the completion was
    /// handled when it happened.
    pub fn restore_completed(&mut self, groups: Vec<Group>, won: bool, mistakes: u8) {
        self.clear_timers();
        self.state = SessionState::restored(groups, won, mistakes);
    }

    pub fn reset(&mut self) {
        self.clear_timers();
        self.state = SessionState::default();
    }

    /// Applies every scheduled clear that is due at `now`.
    pub fn tick(&mut self, now: Instant) {
        let (due, pending): (Vec<_>, Vec<_>) = self
            .pending_clears
            .drain(..)
            .partition(|clear| clear.due <= now);
        self.pending_clears = pending;
        for clear in due {
            self.apply_clear(clear);
        }
    }

    /// Clears the signal if `clear` is still its latest schedule. Returns whether
    /// anything was cleared.
    pub fn apply_clear(&mut self, clear: ScheduledClear) -> bool {
        self.pending_clears.retain(|c| *c != clear);
        match clear.signal {
            TransientSignal::Notification if clear.generation == self.notification_generation => {
                self.state = self.state.with_notification(None);
                true
            }
            TransientSignal::Shake if clear.generation == self.shake_generation => {
                self.state = self.state.with_shaking(false);
                true
            }
            _ => {
                trace!(target: "game_engine", "Dropping stale clear {:?}", clear);
                false
            }
        }
    }

    fn schedule_clear(&mut self, signal: TransientSignal) {
        let (generation, delay) = match signal {
            TransientSignal::Notification => {
                self.notification_generation += 1;
                (
                    self.notification_generation,
                    self.settings.notification_duration(),
                )
            }
            TransientSignal::Shake => {
                self.shake_generation += 1;
                (self.shake_generation, self.settings.shake_duration())
            }
        };
        self.pending_clears.push(ScheduledClear {
            signal,
            generation,
            due: Instant::now() + delay,
        });
    }

    fn clear_timers(&mut self) {
        self.pending_clears.clear();
        self.notification_generation += 1;
        self.shake_generation += 1;
    }

    fn complete(&self) {
        let (film_ids, connections) = self.state.puzzle_content();
        info!(
            target: "game_engine",
            "Puzzle {} with {} mistakes",
            if self.state.status == GameStatus::Won { "won" } else { "lost" },
            self.state.mistakes
        );
        self.event_emitter
            .emit(&GameEngineEvent::PuzzleCompleted(CompletedPuzzle {
                film_ids,
                connections,
                won: self.state.status == GameStatus::Won,
                mistakes: self.state.mistakes,
                puzzle_date: self.state.puzzle_date,
            }));
    }

    fn emit_analytics(&self, event: AnalyticsEvent) {
        self.event_emitter.emit(&GameEngineEvent::Analytics(event));
    }
}
