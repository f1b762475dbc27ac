use std::collections::HashSet;

use log::{debug, trace};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::model::{Difficulty, FilmId, PotentialGroup, GROUP_COUNT};

#[derive(Debug, Clone, PartialEq)]
pub struct SelectedGroup {
    pub group: PotentialGroup,
    pub difficulty: Difficulty,
}

/// Quartile of a rank among `total` candidates sorted easiest first.
pub fn quartile(rank: usize, total: usize) -> usize {
    (rank * GROUP_COUNT / total).min(GROUP_COUNT - 1)
}

/// Ranks every candidate globally, splits the ranking into four tiers and picks one
/// candidate per tier, easiest tier first, such that no film is used twice.
///
/// Returns fewer than four groups when some tier has no candidate left that avoids
/// the films already claimed; callers treat that as a failed attempt.
pub fn select_groups<R: Rng + ?Sized>(
    mut candidates: Vec<PotentialGroup>,
    rng: &mut R,
) -> Vec<SelectedGroup> {
    if candidates.len() < GROUP_COUNT {
        debug!(
            target: "difficulty_selector",
            "Only {} candidates, not enough for a puzzle",
            candidates.len()
        );
        return Vec::new();
    }

    candidates.sort_by(|a, b| a.difficulty_score.total_cmp(&b.difficulty_score));

    let total = candidates.len();
    let mut tiers: Vec<Vec<PotentialGroup>> = vec![Vec::new(); GROUP_COUNT];
    for (rank, candidate) in candidates.into_iter().enumerate() {
        tiers[quartile(rank, total)].push(candidate);
    }
    for tier in tiers.iter_mut() {
        tier.shuffle(rng);
    }

    let mut claimed: HashSet<FilmId> = HashSet::new();
    let mut selected = Vec::with_capacity(GROUP_COUNT);
    for (index, tier) in tiers.into_iter().enumerate() {
        let difficulty = Difficulty::from_index(index);
        let Some(group) = tier
            .into_iter()
            .find(|g| g.film_ids().all(|id| !claimed.contains(&id)))
        else {
            debug!(
                target: "difficulty_selector",
                "No disjoint {:?} candidate after {} picks",
                difficulty,
                selected.len()
            );
            return selected;
        };
        trace!(
            target: "difficulty_selector",
            "{:?}: {} ({})",
            difficulty,
            group.connection,
            group.difficulty_score
        );
        claimed.extend(group.film_ids());
        selected.push(SelectedGroup { group, difficulty });
    }
    selected
}
