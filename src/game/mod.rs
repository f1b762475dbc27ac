pub mod analytics;
pub mod candidate_miner;
pub mod catalog_source;
pub mod difficulty_selector;
pub mod game_engine;
pub mod puzzle_generator;
pub mod puzzle_scheduler;
pub mod recent_content;
pub mod settings;
pub mod stats_manager;
pub mod storage;

pub use analytics::AnalyticsLogger;
pub use catalog_source::CatalogSource;
pub use game_engine::{GameEngine, ScheduledClear, TransientSignal};
pub use puzzle_generator::{MetadataSource, PuzzleGenerator};
pub use puzzle_scheduler::PuzzleScheduler;
pub use recent_content::RecentContentTracker;
pub use settings::Settings;
pub use stats_manager::{JsonPuzzleStore, StatsManager};
pub use storage::{MemoryPuzzleStore, MemoryStatsStore, PuzzleStorage, StatsStorage};
