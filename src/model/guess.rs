use serde::{Deserialize, Serialize};

use super::{FilmId, Group, GROUP_SIZE};

/// A submitted guess in canonical (ascending id) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Guess([FilmId; GROUP_SIZE]);

impl Guess {
    /// Returns `None` unless exactly four ids are given.
    pub fn from_selection(selection: &[FilmId]) -> Option<Guess> {
        let mut ids: [FilmId; GROUP_SIZE] = selection.try_into().ok()?;
        ids.sort_unstable();
        Some(Guess(ids))
    }

    pub fn ids(&self) -> &[FilmId] {
        &self.0
    }

    pub fn matches(&self, group: &Group) -> bool {
        group.sorted_film_ids() == self.0
    }

    pub fn overlap(&self, group: &Group) -> usize {
        self.0.iter().filter(|id| group.contains(**id)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Difficulty, Film};

    fn group(ids: [FilmId; 4]) -> Group {
        Group::new(
            "g",
            ids.iter().map(|id| Film::new(*id, "x", 2000)).collect(),
            "conn",
            Difficulty::Easy,
        )
    }

    #[test]
    fn test_guess_is_canonicalized() {
        let guess = Guess::from_selection(&[9, 2, 7, 4]).unwrap();
        assert_eq!(guess.ids(), &[2, 4, 7, 9]);
        assert_eq!(guess, Guess::from_selection(&[4, 7, 9, 2]).unwrap());
    }

    #[test]
    fn test_guess_requires_exactly_four() {
        assert!(Guess::from_selection(&[1, 2, 3]).is_none());
        assert!(Guess::from_selection(&[1, 2, 3, 4, 5]).is_none());
    }

    #[test]
    fn test_match_and_overlap() {
        let g = group([10, 3, 7, 1]);
        let exact = Guess::from_selection(&[1, 3, 7, 10]).unwrap();
        let near = Guess::from_selection(&[1, 3, 7, 11]).unwrap();
        assert!(exact.matches(&g));
        assert!(!near.matches(&g));
        assert_eq!(near.overlap(&g), 3);
    }
}
