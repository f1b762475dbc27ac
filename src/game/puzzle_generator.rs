use log::{info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};

use super::candidate_miner::mine_all;
use super::difficulty_selector::{select_groups, SelectedGroup};
use super::recent_content::RecentContentTracker;
use super::settings::Settings;
use crate::error::{FilmectionsError, Result};
use crate::model::{Difficulty, EnrichedFilm, Film, Group, Puzzle, GROUP_COUNT};

/// Where candidate films come from.
pub trait MetadataSource {
    fn random_movie_pool(&mut self, count: usize) -> Result<Vec<EnrichedFilm>>;
}

pub struct PuzzleGenerator {
    settings: Settings,
    rng: Box<dyn RngCore>,
}

impl PuzzleGenerator {
    pub fn new(settings: Settings, rng: Box<dyn RngCore>) -> Self {
        Self { settings, rng }
    }

    /// Seeded from `SEED` when set, otherwise from the thread RNG.
    pub fn from_env(settings: Settings) -> Self {
        let seed = Settings::seed_from_env().unwrap_or_else(|| rand::rng().next_u64());
        Self::new(settings, Box::new(StdRng::seed_from_u64(seed)))
    }

    /// Mines fresh pools until four disjoint groups, one per tier, can be selected.
    ///
    /// A failed selection is retried with a new pool, up to the configured attempt
    /// limit. Metadata source errors are returned immediately.
    pub fn generate(
        &mut self,
        source: &mut dyn MetadataSource,
        recent: &RecentContentTracker,
    ) -> Result<Puzzle> {
        let attempts = self.settings.max_generation_attempts;
        for attempt in 1..=attempts {
            let selected = self.attempt(source, recent)?;
            if selected.len() == GROUP_COUNT {
                info!(
                    target: "puzzle_generator",
                    "Generated puzzle on attempt {}",
                    attempt
                );
                return Ok(self.finish(selected));
            }
            warn!(
                target: "puzzle_generator",
                "Only found {} groups, retrying puzzle generation (attempt {}/{})",
                selected.len(),
                attempt,
                attempts
            );
        }
        Err(FilmectionsError::GenerationExhausted { attempts })
    }

    fn attempt(
        &mut self,
        source: &mut dyn MetadataSource,
        recent: &RecentContentTracker,
    ) -> Result<Vec<SelectedGroup>> {
        let recent = recent.recent_content();
        let all_films = source.random_movie_pool(self.settings.pool_size)?;

        let fresh: Vec<EnrichedFilm> = all_films
            .iter()
            .filter(|f| !recent.film_ids.contains(&f.id))
            .cloned()
            .collect();
        let pool = if fresh.len() >= self.settings.min_pool_size {
            fresh
        } else {
            all_films
        };

        let candidates: Vec<_> = mine_all(&pool, &mut self.rng)
            .into_iter()
            .filter(|g| !recent.connections.contains(&g.connection))
            .collect();

        Ok(select_groups(candidates, &mut self.rng))
    }

    fn finish(&mut self, selected: Vec<SelectedGroup>) -> Puzzle {
        let groups: Vec<Group> = selected
            .into_iter()
            .enumerate()
            .map(|(index, SelectedGroup { group, difficulty })| {
                Group::new(
                    &format!("{}-{}", group.category.name(), index),
                    group.films.iter().map(EnrichedFilm::to_film).collect(),
                    &group.connection,
                    difficulty,
                )
            })
            .collect();
        self.shuffled(groups)
    }

    fn shuffled(&mut self, groups: Vec<Group>) -> Puzzle {
        let mut films: Vec<Film> = groups.iter().flat_map(|g| g.films.clone()).collect();
        films.shuffle(&mut self.rng);
        Puzzle { groups, films }
    }

    /// Four fixed placeholder groups, shuffled the same way a real puzzle is. Needs no
    /// metadata source.
    pub fn generate_test_puzzle(&mut self) -> Puzzle {
        let groups = Difficulty::all()
            .into_iter()
            .map(|difficulty| {
                let color = difficulty.color().name();
                let mut label = color.to_string();
                label[..1].make_ascii_uppercase();
                let base = difficulty.index() as u64 * 4;
                let films = (1..=4)
                    .map(|n| {
                        Film::new(
                            base + n,
                            &format!("{} Film {}", label, n),
                            2019 + n as i32,
                        )
                    })
                    .collect();
                let mut tier = difficulty.to_string();
                tier[..1].make_ascii_uppercase();
                Group::new(
                    &format!("test-{}", color),
                    films,
                    &format!("{} Group ({})", label, tier),
                    difficulty,
                )
            })
            .collect();
        self.shuffled(groups)
    }
}
