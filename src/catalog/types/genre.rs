use crate::catalog::service::GenreListResponse;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A catalog genre
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

/// Genre list in the order the remote returned it
#[derive(Debug, Clone, Default)]
pub struct GenreTable {
    genres: Vec<Genre>,
}

impl GenreTable {
    pub fn new(genres: impl IntoIterator<Item = Genre>) -> Self {
        Self {
            genres: genres.into_iter().collect(),
        }
    }

    /// Entries missing an id or a name are dropped
    pub(crate) fn from_response(response: GenreListResponse) -> Self {
        let genres = response.genres.unwrap_or_default().into_iter().filter_map(|g| {
            Some(Genre {
                id: g.id?,
                name: g.name?,
            })
        });

        Self::new(genres)
    }

    #[must_use]
    pub fn name(&self, id: i64) -> Option<&str> {
        self.genres
            .iter()
            .find(|g| g.id == id)
            .map(|g| g.name.as_str())
    }

    /// Names of the genres whose id is in `ids`, in table order.
    /// Unknown ids are ignored and repeated ids yield one name.
    #[must_use]
    pub fn names_for(&self, ids: &[i64]) -> Vec<String> {
        let ids: HashSet<i64> = ids.iter().copied().collect();

        self.genres
            .iter()
            .filter(|g| ids.contains(&g.id))
            .map(|g| g.name.clone())
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.genres.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.genres.is_empty()
    }
}
