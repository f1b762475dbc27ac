use serde::{Deserialize, Serialize};

/// Difficulty tier of a finished group, easiest first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Hardest,
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Easy
    }
}

impl Difficulty {
    pub fn all() -> Vec<Difficulty> {
        vec![
            Difficulty::Easy,
            Difficulty::Medium,
            Difficulty::Hard,
            Difficulty::Hardest,
        ]
    }

    pub fn index(&self) -> usize {
        match self {
            Difficulty::Easy => 0,
            Difficulty::Medium => 1,
            Difficulty::Hard => 2,
            Difficulty::Hardest => 3,
        }
    }

    /// Out-of-range indexes clamp to the hardest tier.
    pub fn from_index(index: usize) -> Difficulty {
        match index {
            0 => Difficulty::Easy,
            1 => Difficulty::Medium,
            2 => Difficulty::Hard,
            _ => Difficulty::Hardest,
        }
    }

    pub fn color(&self) -> GroupColor {
        match self {
            Difficulty::Easy => GroupColor::Yellow,
            Difficulty::Medium => GroupColor::Green,
            Difficulty::Hard => GroupColor::Blue,
            Difficulty::Hardest => GroupColor::Purple,
        }
    }

    pub fn to_string(&self) -> String {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Hardest => "hardest",
        }
        .to_string()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum GroupColor {
    Yellow,
    Green,
    Blue,
    Purple,
}

impl GroupColor {
    pub fn name(&self) -> &'static str {
        match self {
            GroupColor::Yellow => "yellow",
            GroupColor::Green => "green",
            GroupColor::Blue => "blue",
            GroupColor::Purple => "purple",
        }
    }
}
