use crate::catalog::{ImagesRepository, Movie, MoviesRepository};
use serde::Serialize;
use std::sync::Arc;

/// Screen showing a single movie
pub trait MovieDetailsView: Send + Sync {
    /// Open the movie's website
    fn present_website(&self, url: &str);
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieDetailsViewData {
    pub backdrop_path: Option<String>,
    pub poster_path: Option<String>,
    pub title: Option<String>,
    pub tagline: Option<String>,
    pub genres: Vec<String>,
    pub popularity: Option<f64>,
    pub release_year: Option<i32>,
    pub runtime_minutes: Option<u32>,
    pub description: Option<String>,
    pub revenue: Option<i64>,
    pub languages: Vec<String>,
    pub website: Option<String>,
}

impl From<Movie> for MovieDetailsViewData {
    fn from(movie: Movie) -> Self {
        let release_year = movie.release_year();

        Self {
            backdrop_path: movie.backdrop_path,
            poster_path: movie.poster_path,
            title: movie.title,
            tagline: movie.tagline,
            genres: movie.genres.unwrap_or_default(),
            popularity: movie.popularity,
            release_year,
            runtime_minutes: movie.runtime_minutes,
            description: movie.description,
            revenue: movie.revenue,
            languages: movie.languages.unwrap_or_default(),
            website: movie.website,
        }
    }
}

/// Presents the movie at a list position
#[derive(Clone)]
pub struct MovieDetailsPresenter {
    view: Arc<dyn MovieDetailsView>,
    movies: MoviesRepository,
    images: ImagesRepository,
}

impl MovieDetailsPresenter {
    pub fn new(
        view: Arc<dyn MovieDetailsView>,
        movies: MoviesRepository,
        images: ImagesRepository,
    ) -> Self {
        Self {
            view,
            movies,
            images,
        }
    }

    pub fn movie_title(&self, index: usize) -> Option<String> {
        self.movies.movie(index)?.title
    }

    pub async fn movie_poster(&self, index: usize, width: u32) -> Option<Vec<u8>> {
        let movie = self.movies.movie(index)?;
        self.images
            .load_poster_image(movie.poster_path.as_deref(), width)
            .await
    }

    pub async fn movie_backdrop(&self, index: usize, width: u32) -> Option<Vec<u8>> {
        let movie = self.movies.movie(index)?;
        self.images
            .load_backdrop_image(movie.backdrop_path.as_deref(), width)
            .await
    }

    /// Load the full record of the movie at `index`
    pub async fn movie_details(&self, index: usize) -> Option<MovieDetailsViewData> {
        let id = self.movies.movie(index)?.id?;
        let movie = self.movies.load_movie_details(id).await?;
        Some(MovieDetailsViewData::from(movie))
    }

    pub fn did_tap_website(&self, index: usize) {
        if let Some(website) = self.movies.movie(index).and_then(|m| m.website) {
            self.view.present_website(&website);
        }
    }
}
