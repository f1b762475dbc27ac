use thiserror::Error;

#[derive(Debug, Error)]
pub enum FilmectionsError {
    #[error("metadata source failed: {0}")]
    Metadata(String),

    #[error("storage failed: {0}")]
    Storage(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("No available dates found within next {days} days")]
    NoAvailableDate { days: u32 },

    #[error("puzzle generation gave up after {attempts} attempts")]
    GenerationExhausted { attempts: usize },

    #[error("puzzle not found: {0}")]
    PuzzleNotFound(String),

    #[error("invalid puzzle: {0}")]
    InvalidPuzzle(String),
}

pub type Result<T> = std::result::Result<T, FilmectionsError>;
