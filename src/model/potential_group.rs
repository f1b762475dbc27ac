use serde::{Deserialize, Serialize};

use super::{EnrichedFilm, FilmId};

/// Which kind of hidden connection a candidate group shares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionCategory {
    Director,
    Actor,
    Collection,
    Theme,
    Studio,
    Wordplay,
}

impl ConnectionCategory {
    pub fn name(&self) -> &'static str {
        match self {
            ConnectionCategory::Director => "director",
            ConnectionCategory::Actor => "actor",
            ConnectionCategory::Collection => "collection",
            ConnectionCategory::Theme => "theme",
            ConnectionCategory::Studio => "studio",
            ConnectionCategory::Wordplay => "wordplay",
        }
    }
}

/// An unconfirmed grouping found while mining a film pool.
///
/// `difficulty_score` is unbounded; higher means harder.
#[derive(Debug, Clone, PartialEq)]
pub struct PotentialGroup {
    pub films: Vec<EnrichedFilm>,
    pub connection: String,
    pub category: ConnectionCategory,
    pub difficulty_score: f64,
}

impl PotentialGroup {
    pub fn film_ids(&self) -> impl Iterator<Item = FilmId> + '_ {
        self.films.iter().map(|f| f.id)
    }
}
