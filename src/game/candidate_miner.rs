use std::collections::{BTreeMap, HashSet};

use itertools::Itertools;
use log::{debug, trace};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::helpers::{title_words, Capitalize};
use crate::model::{ConnectionCategory, EnrichedFilm, PotentialGroup, GROUP_SIZE};

/// Vote-count based scores are subtracted from this so fewer votes means harder.
const VOTE_SCORE_CEILING: f64 = 10000.0;
/// Scales curated 1-4 difficulties into the vote-based score range.
const CURATED_SCORE_SCALE: f64 = 2000.0;
const LEAD_ACTOR_BILLING: usize = 5;
const MIN_WORD_LENGTH: usize = 5;
const MAX_WORDPLAY_FILMS: usize = 6;

const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "from", "as", "is", "was", "are", "been", "be", "part", "movie",
];

pub struct ThemeDefinition {
    pub keywords: &'static [&'static str],
    pub name: &'static str,
    pub difficulty: u8,
}

/// Checked in order; a film joins the first theme it matches.
pub const THEMES: &[ThemeDefinition] = &[
    ThemeDefinition {
        keywords: &["heist", "robbery", "steal"],
        name: "Heist films",
        difficulty: 2,
    },
    ThemeDefinition {
        keywords: &["time travel", "time machine"],
        name: "Time travel films",
        difficulty: 2,
    },
    ThemeDefinition {
        keywords: &["artificial intelligence", "robot", "ai"],
        name: "AI/Robot films",
        difficulty: 2,
    },
    ThemeDefinition {
        keywords: &["zombie", "undead"],
        name: "Zombie films",
        difficulty: 1,
    },
    ThemeDefinition {
        keywords: &["vampire"],
        name: "Vampire films",
        difficulty: 1,
    },
    ThemeDefinition {
        keywords: &["superhero", "marvel", "dc comics"],
        name: "Superhero films",
        difficulty: 1,
    },
    ThemeDefinition {
        keywords: &["space", "astronaut", "alien"],
        name: "Space films",
        difficulty: 2,
    },
    ThemeDefinition {
        keywords: &["world war", "vietnam war"],
        name: "War films",
        difficulty: 2,
    },
    ThemeDefinition {
        keywords: &["high school", "college"],
        name: "School/College films",
        difficulty: 3,
    },
    ThemeDefinition {
        keywords: &["hitman", "assassin"],
        name: "Assassin films",
        difficulty: 3,
    },
];

pub struct StudioDefinition {
    pub id: u64,
    pub label: &'static str,
    pub difficulty: u8,
}

pub const STUDIOS: &[StudioDefinition] = &[
    StudioDefinition {
        id: 3,
        label: "Pixar films",
        difficulty: 1,
    },
    StudioDefinition {
        id: 2,
        label: "Disney films",
        difficulty: 1,
    },
    StudioDefinition {
        id: 420,
        label: "Marvel films",
        difficulty: 1,
    },
    StudioDefinition {
        id: 9993,
        label: "DC films",
        difficulty: 2,
    },
    StudioDefinition {
        id: 33,
        label: "Universal films",
        difficulty: 2,
    },
    StudioDefinition {
        id: 1632,
        label: "Lionsgate films",
        difficulty: 3,
    },
    StudioDefinition {
        id: 25,
        label: "20th Century Fox films",
        difficulty: 2,
    },
    StudioDefinition {
        id: 4,
        label: "Paramount films",
        difficulty: 2,
    },
    StudioDefinition {
        id: 174,
        label: "Warner Bros. films",
        difficulty: 2,
    },
    StudioDefinition {
        id: 7505,
        label: "A24 films",
        difficulty: 4,
    },
];

/// Films sharing one connection while mining, keyed by whatever identifies it.
struct Bucket<'a> {
    label: String,
    films: Vec<&'a EnrichedFilm>,
}

impl<'a> Bucket<'a> {
    fn new(label: String) -> Self {
        Self {
            label,
            films: Vec::new(),
        }
    }
}

fn mean_vote_count(films: &[&EnrichedFilm]) -> f64 {
    if films.is_empty() {
        return 0.0;
    }
    films.iter().map(|f| f.vote_count as f64).sum::<f64>() / films.len() as f64
}

fn vote_score(films: &[&EnrichedFilm]) -> f64 {
    VOTE_SCORE_CEILING - mean_vote_count(films)
}

fn curated_score(difficulty: u8) -> f64 {
    difficulty as f64 * CURATED_SCORE_SCALE
}

/// Picks a uniformly random four-film subset of the bucket.
fn sample_group<R: Rng + ?Sized>(
    films: &[&EnrichedFilm],
    connection: String,
    category: ConnectionCategory,
    difficulty_score: f64,
    rng: &mut R,
) -> PotentialGroup {
    let mut shuffled: Vec<EnrichedFilm> = films.iter().map(|f| (*f).clone()).collect();
    shuffled.shuffle(rng);
    shuffled.truncate(GROUP_SIZE);
    PotentialGroup {
        films: shuffled,
        connection,
        category,
        difficulty_score,
    }
}

/// Turns every vote-scored bucket with enough films into a candidate.
fn vote_scored_groups<R: Rng + ?Sized>(
    buckets: BTreeMap<u64, Bucket<'_>>,
    category: ConnectionCategory,
    rng: &mut R,
) -> Vec<PotentialGroup> {
    buckets
        .into_values()
        .filter(|bucket| bucket.films.len() >= GROUP_SIZE)
        .map(|bucket| {
            let score = vote_score(&bucket.films);
            sample_group(&bucket.films, bucket.label, category, score, rng)
        })
        .collect()
}

pub fn mine_directors<R: Rng + ?Sized>(
    films: &[EnrichedFilm],
    rng: &mut R,
) -> Vec<PotentialGroup> {
    let mut buckets: BTreeMap<u64, Bucket> = BTreeMap::new();
    for film in films {
        for director in film.directors().unique_by(|d| d.id) {
            buckets
                .entry(director.id)
                .or_insert_with(|| Bucket::new(format!("Directed by {}", director.name)))
                .films
                .push(film);
        }
    }
    vote_scored_groups(buckets, ConnectionCategory::Director, rng)
}

pub fn mine_actors<R: Rng + ?Sized>(films: &[EnrichedFilm], rng: &mut R) -> Vec<PotentialGroup> {
    let mut buckets: BTreeMap<u64, Bucket> = BTreeMap::new();
    for film in films {
        for actor in film.lead_actors(LEAD_ACTOR_BILLING).unique_by(|a| a.id) {
            buckets
                .entry(actor.id)
                .or_insert_with(|| Bucket::new(format!("Starring {}", actor.name)))
                .films
                .push(film);
        }
    }
    vote_scored_groups(buckets, ConnectionCategory::Actor, rng)
}

pub fn mine_collections<R: Rng + ?Sized>(
    films: &[EnrichedFilm],
    rng: &mut R,
) -> Vec<PotentialGroup> {
    let mut buckets: BTreeMap<u64, Bucket> = BTreeMap::new();
    for film in films {
        if let Some(collection) = &film.collection {
            buckets
                .entry(collection.id)
                .or_insert_with(|| Bucket::new(collection.name.clone()))
                .films
                .push(film);
        }
    }
    vote_scored_groups(buckets, ConnectionCategory::Collection, rng)
}

fn matching_theme(film: &EnrichedFilm) -> Option<usize> {
    let overview = film.overview.to_lowercase();
    let title = film.title.to_lowercase();
    let keywords: Vec<String> = film.keywords.iter().map(|k| k.to_lowercase()).collect();

    THEMES.iter().position(|theme| {
        theme.keywords.iter().any(|needle| {
            overview.contains(needle)
                || title.contains(needle)
                || keywords.iter().any(|k| k.contains(needle))
        })
    })
}

pub fn mine_themes<R: Rng + ?Sized>(films: &[EnrichedFilm], rng: &mut R) -> Vec<PotentialGroup> {
    let mut by_theme: BTreeMap<usize, Vec<&EnrichedFilm>> = BTreeMap::new();
    for film in films {
        if let Some(index) = matching_theme(film) {
            trace!(target: "candidate_miner", "{} -> {}", film.title, THEMES[index].name);
            by_theme.entry(index).or_default().push(film);
        }
    }

    by_theme
        .into_iter()
        .filter(|(_, films)| films.len() >= GROUP_SIZE)
        .map(|(index, films)| {
            let theme = &THEMES[index];
            sample_group(
                &films,
                theme.name.to_string(),
                ConnectionCategory::Theme,
                curated_score(theme.difficulty),
                rng,
            )
        })
        .collect()
}

pub fn mine_studios<R: Rng + ?Sized>(films: &[EnrichedFilm], rng: &mut R) -> Vec<PotentialGroup> {
    let mut by_studio: BTreeMap<usize, Vec<&EnrichedFilm>> = BTreeMap::new();
    for film in films {
        // the film's own company order decides which known studio it counts for
        let studio = film
            .production_company_ids
            .iter()
            .find_map(|id| STUDIOS.iter().position(|s| s.id == *id));
        if let Some(index) = studio {
            by_studio.entry(index).or_default().push(film);
        }
    }

    by_studio
        .into_iter()
        .filter(|(_, films)| films.len() >= GROUP_SIZE)
        .map(|(index, films)| {
            let studio = &STUDIOS[index];
            sample_group(
                &films,
                studio.label.to_string(),
                ConnectionCategory::Studio,
                curated_score(studio.difficulty),
                rng,
            )
        })
        .collect()
}

/// Longer and rarer shared words are harder to spot.
pub fn wordplay_difficulty(word: &str, film_count: usize) -> u8 {
    if word.len() >= 8 && film_count == GROUP_SIZE {
        4
    } else if word.len() >= 7 || film_count == GROUP_SIZE {
        3
    } else {
        2
    }
}

pub fn mine_wordplay<R: Rng + ?Sized>(
    films: &[EnrichedFilm],
    rng: &mut R,
) -> Vec<PotentialGroup> {
    let stop_words: HashSet<&str> = STOP_WORDS.iter().copied().collect();
    let mut by_word: BTreeMap<String, Vec<&EnrichedFilm>> = BTreeMap::new();
    for film in films {
        let words = title_words(&film.title)
            .into_iter()
            .filter(|w| w.len() >= MIN_WORD_LENGTH && !stop_words.contains(w.as_str()))
            .unique();
        for word in words {
            by_word.entry(word).or_default().push(film);
        }
    }

    by_word
        .into_iter()
        .filter(|(_, films)| (GROUP_SIZE..=MAX_WORDPLAY_FILMS).contains(&films.len()))
        .map(|(word, films)| {
            let difficulty = wordplay_difficulty(&word, films.len());
            sample_group(
                &films,
                format!("\"{}\" in the title", word.capitalize()),
                ConnectionCategory::Wordplay,
                curated_score(difficulty),
                rng,
            )
        })
        .collect()
}

/// Runs every category over the pool. Categories are independent; the same film can
/// show up in candidates from several of them.
pub fn mine_all<R: Rng + ?Sized>(films: &[EnrichedFilm], rng: &mut R) -> Vec<PotentialGroup> {
    let directors = mine_directors(films, rng);
    let actors = mine_actors(films, rng);
    let collections = mine_collections(films, rng);
    let themes = mine_themes(films, rng);
    let studios = mine_studios(films, rng);
    let wordplay = mine_wordplay(films, rng);
    debug!(
        target: "candidate_miner",
        "Mined {} films: {} director, {} actor, {} collection, {} theme, {} studio, {} wordplay",
        films.len(),
        directors.len(),
        actors.len(),
        collections.len(),
        themes.len(),
        studios.len(),
        wordplay.len()
    );

    [directors, actors, collections, themes, studios, wordplay].concat()
}
