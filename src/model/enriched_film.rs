use serde::{Deserialize, Serialize};

use super::{Film, FilmId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastCredit {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewCredit {
    pub id: u64,
    pub name: String,
    pub job: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilmCollection {
    pub id: u64,
    pub name: String,
}

/// A film plus everything the candidate miner looks at. Cast is in billing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedFilm {
    pub id: FilmId,
    pub title: String,
    pub year: i32,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub cast: Vec<CastCredit>,
    #[serde(default)]
    pub crew: Vec<CrewCredit>,
    #[serde(default)]
    pub collection: Option<FilmCollection>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub production_company_ids: Vec<u64>,
    #[serde(default)]
    pub vote_count: u64,
}

impl EnrichedFilm {
    pub fn to_film(&self) -> Film {
        Film {
            id: self.id,
            title: self.title.clone(),
            year: self.year,
            poster_path: self.poster_path.clone(),
        }
    }

    pub fn directors(&self) -> impl Iterator<Item = &CrewCredit> {
        self.crew.iter().filter(|c| c.job == "Director")
    }

    /// Top-billed cast only.
    pub fn lead_actors(&self, billing_depth: usize) -> impl Iterator<Item = &CastCredit> {
        self.cast.iter().take(billing_depth)
    }

    #[cfg(test)]
    pub fn bare(id: FilmId, title: &str) -> Self {
        Self {
            id,
            title: title.to_string(),
            year: 2000,
            poster_path: None,
            cast: vec![],
            crew: vec![],
            collection: None,
            keywords: vec![],
            overview: String::new(),
            production_company_ids: vec![],
            vote_count: 0,
        }
    }
}
