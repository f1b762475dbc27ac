use std::cell::RefCell;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Instant;

use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use colored::{ColoredString, Colorize};
use log::{error, info};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use filmections::events::Channel;
use filmections::game::{
    AnalyticsLogger, CatalogSource, GameEngine, JsonPuzzleStore, PuzzleGenerator,
    PuzzleScheduler, PuzzleStorage, RecentContentTracker, Settings, StatsManager, StatsStorage,
};
use filmections::model::{
    CompletedPuzzle, GameEngineCommand, GameEngineEvent, GameHistoryEntry, GameStatus, Group,
    GroupColor, SavedPuzzle, SessionState, UserStats,
};
use filmections::{FilmectionsError, Result};

type Scheduler = PuzzleScheduler<JsonPuzzleStore, StatsManager>;

#[derive(Parser, Debug)]
#[command(
    name = "filmections",
    version,
    about = "Daily film connections puzzle: find four groups of four films"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play the puzzle for today (or --date)
    Play {
        /// Use the fixed test puzzle when none is stored for the day
        #[arg(long)]
        test: bool,

        /// Play as if today were this date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// JSON film catalog used to generate a missing puzzle
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// Generate a puzzle and schedule it on the next free date
    Generate {
        #[arg(long)]
        catalog: Option<PathBuf>,

        #[arg(long)]
        test: bool,
    },
    /// Print the next date without a scheduled puzzle
    NextDate,
    /// Print player stats
    Stats,
    /// Forget all player stats
    ResetStats,
}

fn init_logging() {
    env_logger::init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        error!(target: "main", "{}", e);
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load();
    let data_dir = Settings::data_dir();
    info!(target: "main", "Using data directory {:?}", data_dir);

    match cli.command {
        Command::Play {
            test,
            date,
            catalog,
        } => {
            let scheduler = open_scheduler(&data_dir, date)?;
            play(scheduler, settings, &data_dir, test, catalog.as_deref())
        }
        Command::Generate { catalog, test } => {
            let mut scheduler = open_scheduler(&data_dir, None)?;
            let tracker = RecentContentTracker::new(data_dir.clone(), settings.recent_games_limit);
            let puzzle = build_puzzle(&settings, &tracker, test, catalog.as_deref())?;
            let saved = scheduler.schedule_puzzle(puzzle)?;
            println!(
                "Scheduled puzzle {} for {}",
                saved.id.dimmed(),
                saved.date.to_string().bold()
            );
            Ok(())
        }
        Command::NextDate => {
            let scheduler = open_scheduler(&data_dir, None)?;
            println!("{}", scheduler.get_next_available_date()?);
            Ok(())
        }
        Command::Stats => {
            let scheduler = open_scheduler(&data_dir, None)?;
            print_stats(&scheduler.stats().get_stats()?);
            Ok(())
        }
        Command::ResetStats => {
            let mut scheduler = open_scheduler(&data_dir, None)?;
            scheduler.stats_mut().reset_stats()?;
            println!("Stats reset.");
            Ok(())
        }
    }
}

fn open_scheduler(data_dir: &Path, date: Option<NaiveDate>) -> Result<Scheduler> {
    let puzzles = JsonPuzzleStore::new(data_dir.to_path_buf())?;
    let stats = StatsManager::new(data_dir.to_path_buf());
    Ok(match date {
        Some(date) => PuzzleScheduler::with_today(puzzles, stats, Box::new(move || date)),
        None => PuzzleScheduler::new(puzzles, stats),
    })
}

fn seeded_rng() -> Box<dyn RngCore> {
    let seed = Settings::seed_from_env().unwrap_or_else(|| rand::rng().next_u64());
    Box::new(StdRng::seed_from_u64(seed))
}

fn build_puzzle(
    settings: &Settings,
    tracker: &RecentContentTracker,
    test: bool,
    catalog: Option<&Path>,
) -> Result<filmections::model::Puzzle> {
    let mut generator = PuzzleGenerator::from_env(settings.clone());
    if test || settings.test_mode {
        return Ok(generator.generate_test_puzzle());
    }
    let catalog = catalog.ok_or_else(|| {
        FilmectionsError::Metadata("a --catalog is required to generate puzzles".to_string())
    })?;
    let mut source = CatalogSource::from_path(catalog, seeded_rng())?;
    generator.generate(&mut source, tracker)
}

fn play(
    mut scheduler: Scheduler,
    settings: Settings,
    data_dir: &Path,
    test: bool,
    catalog: Option<&Path>,
) -> Result<()> {
    let today = scheduler.today();
    if let Some(entry) = scheduler.todays_completion()? {
        println!("{}", "You already finished today's puzzle.".bold());
        if let Some(saved) = scheduler.get_todays_puzzle()? {
            let (emitter, _observer) = Channel::<GameEngineEvent>::new();
            let mut engine = GameEngine::from_env(emitter, settings);
            engine.handle_command(GameEngineCommand::RestoreCompleted {
                groups: saved.groups,
                won: entry.won,
                mistakes: entry.mistakes,
            });
            render(engine.state());
        }
        print_stats(&scheduler.stats().get_stats()?);
        return Ok(());
    }

    let tracker = Rc::new(RefCell::new(RecentContentTracker::new(
        data_dir.to_path_buf(),
        settings.recent_games_limit,
    )));

    let saved = match scheduler.get_todays_puzzle()? {
        Some(saved) => saved,
        None => {
            let puzzle = build_puzzle(&settings, &tracker.borrow(), test, catalog)?;
            let saved = SavedPuzzle::new(today, puzzle);
            scheduler.puzzles_mut().save_puzzle(saved.clone())?;
            info!(target: "main", "Created puzzle {} for {}", saved.id, today);
            saved
        }
    };

    let (emitter, observer) = Channel::<GameEngineEvent>::new();
    observer.subscribe_handler(tracker.clone());
    observer.subscribe_handler(Rc::new(RefCell::new(AnalyticsLogger::new())));
    let completed: Rc<RefCell<Option<CompletedPuzzle>>> = Rc::new(RefCell::new(None));
    let sink = completed.clone();
    observer.subscribe(move |event| {
        if let GameEngineEvent::PuzzleCompleted(done) = event {
            *sink.borrow_mut() = Some(done.clone());
        }
    });

    let mut engine = GameEngine::from_env(emitter, settings);

    engine.handle_command(GameEngineCommand::LoadPuzzle(
        saved.to_puzzle(),
        Some(saved.date),
    ));
    if Settings::is_debug_mode() {
        print_answer_key(&saved.groups);
    }
    print_help();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        engine.tick(Instant::now());
        render(engine.state());
        if engine.state().is_complete() {
            break;
        }

        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            return Ok(());
        };
        match line?.trim() {
            "q" | "quit" => return Ok(()),
            "s" | "submit" => {
                engine.handle_command(GameEngineCommand::Submit);
            }
            "shuffle" => engine.handle_command(GameEngineCommand::Shuffle),
            "c" | "clear" => engine.handle_command(GameEngineCommand::DeselectAll),
            "h" | "help" => print_help(),
            input => toggle_positions(&mut engine, input),
        }
    }

    if let Some(done) = completed.borrow_mut().take() {
        let entry = GameHistoryEntry {
            date: done.puzzle_date.unwrap_or(today),
            won: done.won,
            mistakes: done.mistakes,
            completed_at: Utc::now().timestamp(),
        };
        let stats = scheduler.stats_mut().record_completion(entry)?;
        print_stats(&stats);
    }
    Ok(())
}

/// Board positions are 1-based; anything that is not a position is ignored.
fn toggle_positions(engine: &mut GameEngine, input: &str) {
    let ids: Vec<_> = input
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter_map(|word| word.parse::<usize>().ok())
        .filter_map(|pos| pos.checked_sub(1))
        .filter_map(|index| engine.state().films.get(index).map(|f| f.id))
        .collect();
    if ids.is_empty() {
        println!("{}", "Unknown command, type help".dimmed());
    }
    for id in ids {
        engine.handle_command(GameEngineCommand::SelectFilm(id));
    }
}

fn paint(text: &str, color: GroupColor) -> ColoredString {
    match color {
        GroupColor::Yellow => text.black().on_yellow(),
        GroupColor::Green => text.black().on_green(),
        GroupColor::Blue => text.white().on_blue(),
        GroupColor::Purple => text.white().on_magenta(),
    }
}

fn render(state: &SessionState) {
    println!();
    for group in &state.found_groups {
        let titles: Vec<&str> = group.films.iter().map(|f| f.title.as_str()).collect();
        let line = format!(" {}: {} ", group.connection.to_uppercase(), titles.join(", "));
        println!("{}", paint(&line, group.color));
    }

    for (index, film) in state.films.iter().enumerate() {
        let label = format!("{:>2}. {} ({})", index + 1, film.title, film.year);
        if state.is_selected(film.id) {
            println!("{}", label.reverse());
        } else {
            println!("{}", label);
        }
    }

    if let Some(notification) = &state.notification {
        println!("{}", notification.yellow().bold());
    }
    if state.is_shaking {
        println!("{}", "Not quite.".red());
    }

    match state.status {
        GameStatus::Playing => println!(
            "Mistakes remaining: {}",
            "●".repeat(state.mistakes_remaining() as usize)
        ),
        GameStatus::Won => println!("{}", "Solved!".green().bold()),
        GameStatus::Lost => println!("{}", "Out of guesses. Here are the answers.".red().bold()),
    }
}

fn print_help() {
    println!(
        "{}",
        "Type board numbers to toggle films (e.g. 1 5 9 13), then: submit, shuffle, clear, quit"
            .dimmed()
    );
}

fn print_answer_key(groups: &[Group]) {
    println!("{}", "Answer key:".dimmed());
    for group in groups {
        let titles: Vec<&str> = group.films.iter().map(|f| f.title.as_str()).collect();
        println!(
            "  {} {}",
            paint(&format!(" {} ", group.connection), group.color),
            titles.join(", ").dimmed()
        );
    }
}

fn print_stats(stats: &UserStats) {
    println!(
        "Played {}  Win % {}  Current streak {}  Max streak {}",
        stats.games_played.to_string().bold(),
        stats.win_rate.to_string().bold(),
        stats.current_streak.to_string().bold(),
        stats.max_streak.to_string().bold()
    );
}
