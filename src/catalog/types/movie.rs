use super::GenreTable;
use crate::catalog::service::MovieRecord;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

const RELEASE_DATE_FORMAT: &str = "%Y-%m-%d";

/// A movie as known to the client.
///
/// List endpoints and the detail endpoint expose different subsets of these
/// fields, so every field is optional and a record gains fields as more
/// endpoints are consulted. See [`Movie::merge`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub tagline: Option<String>,
    /// Genre names
    pub genres: Option<Vec<String>>,
    /// Spoken language names
    pub languages: Option<Vec<String>>,
    pub description: Option<String>,
    pub original_title: Option<String>,
    /// ISO 639-1 code
    pub original_language: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub runtime_minutes: Option<u32>,
    pub budget: Option<i64>,
    pub revenue: Option<i64>,
    pub popularity: Option<f64>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<u32>,
    pub status: Option<String>,
    /// Relative poster image path
    pub poster_path: Option<String>,
    /// Relative backdrop image path
    pub backdrop_path: Option<String>,
    pub website: Option<String>,
    pub is_adult: Option<bool>,
}

impl Movie {
    /// Build a movie from a wire record, resolving genres through `genres`.
    ///
    /// Inline genre names win over genre ids. Ids resolve in genre table order;
    /// ids missing from the table are skipped.
    pub(crate) fn from_record(record: MovieRecord, genres: &GenreTable) -> Self {
        let genre_names = match (record.genres, record.genre_ids) {
            (Some(inline), _) => Some(inline.into_iter().filter_map(|g| g.name).collect()),
            (None, Some(ids)) => Some(genres.names_for(&ids)),
            (None, None) => None,
        };

        let languages = record
            .spoken_languages
            .map(|langs| langs.into_iter().filter_map(|l| l.name).collect());

        let release_date = record
            .release_date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, RELEASE_DATE_FORMAT).ok());

        Self {
            id: record.id,
            title: record.title,
            tagline: record.tagline,
            genres: genre_names,
            languages,
            description: record.overview,
            original_title: record.original_title,
            original_language: record.original_language,
            release_date,
            runtime_minutes: record.runtime,
            budget: record.budget,
            revenue: record.revenue,
            popularity: record.popularity,
            vote_average: record.vote_average,
            vote_count: record.vote_count,
            status: record.status,
            poster_path: record.poster_path,
            backdrop_path: record.backdrop_path,
            website: record.homepage,
            is_adult: record.adult,
        }
    }

    /// Patch `existing` with `incoming`, field by field.
    ///
    /// A field present in `incoming` replaces the existing value; an absent one
    /// keeps it. Nothing already known is ever erased.
    #[must_use]
    pub fn merge(existing: Self, incoming: Self) -> Self {
        Self {
            id: incoming.id.or(existing.id),
            title: incoming.title.or(existing.title),
            tagline: incoming.tagline.or(existing.tagline),
            genres: incoming.genres.or(existing.genres),
            languages: incoming.languages.or(existing.languages),
            description: incoming.description.or(existing.description),
            original_title: incoming.original_title.or(existing.original_title),
            original_language: incoming.original_language.or(existing.original_language),
            release_date: incoming.release_date.or(existing.release_date),
            runtime_minutes: incoming.runtime_minutes.or(existing.runtime_minutes),
            budget: incoming.budget.or(existing.budget),
            revenue: incoming.revenue.or(existing.revenue),
            popularity: incoming.popularity.or(existing.popularity),
            vote_average: incoming.vote_average.or(existing.vote_average),
            vote_count: incoming.vote_count.or(existing.vote_count),
            status: incoming.status.or(existing.status),
            poster_path: incoming.poster_path.or(existing.poster_path),
            backdrop_path: incoming.backdrop_path.or(existing.backdrop_path),
            website: incoming.website.or(existing.website),
            is_adult: incoming.is_adult.or(existing.is_adult),
        }
    }

    /// Popularity used for ordering; unknown counts as zero
    #[must_use]
    pub fn popularity_or_zero(&self) -> f64 {
        self.popularity.unwrap_or(0.0)
    }

    #[must_use]
    pub fn release_year(&self) -> Option<i32> {
        self.release_date.map(|d| d.year())
    }
}
