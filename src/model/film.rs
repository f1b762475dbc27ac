use serde::{Deserialize, Serialize};

pub type FilmId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Film {
    pub id: FilmId,
    pub title: String,
    pub year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
}

impl Film {
    pub fn new(id: FilmId, title: &str, year: i32) -> Self {
        Self {
            id,
            title: title.to_string(),
            year,
            poster_path: None,
        }
    }
}
