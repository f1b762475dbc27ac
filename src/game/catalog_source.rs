use std::collections::HashSet;
use std::fs;
use std::path::Path;

use log::debug;
use rand::seq::IndexedRandom;
use rand::RngCore;

use super::puzzle_generator::MetadataSource;
use crate::error::{FilmectionsError, Result};
use crate::model::EnrichedFilm;

/// Serves random pools from a JSON array of enriched films on disk.
pub struct CatalogSource {
    films: Vec<EnrichedFilm>,
    rng: Box<dyn RngCore>,
}

impl CatalogSource {
    pub fn new(films: Vec<EnrichedFilm>, rng: Box<dyn RngCore>) -> Self {
        let mut seen = HashSet::new();
        let films = films.into_iter().filter(|f| seen.insert(f.id)).collect();
        Self { films, rng }
    }

    pub fn from_path(path: &Path, rng: Box<dyn RngCore>) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            FilmectionsError::Metadata(format!("cannot read catalog {:?}: {}", path, e))
        })?;
        let films: Vec<EnrichedFilm> = serde_json::from_str(&contents)?;
        debug!(target: "catalog", "Loaded {} films from {:?}", films.len(), path);
        Ok(Self::new(films, rng))
    }

    pub fn len(&self) -> usize {
        self.films.len()
    }

    pub fn is_empty(&self) -> bool {
        self.films.is_empty()
    }
}

impl MetadataSource for CatalogSource {
    fn random_movie_pool(&mut self, count: usize) -> Result<Vec<EnrichedFilm>> {
        if self.films.is_empty() {
            return Err(FilmectionsError::Metadata("catalog is empty".to_string()));
        }
        Ok(self
            .films
            .choose_multiple(&mut self.rng, count)
            .cloned()
            .collect())
    }
}
