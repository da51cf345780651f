use crate::catalog::{ImagesRepository, Movie, MoviesEvent, MoviesRepository};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Screen showing the movie list
pub trait MovieListView: Send + Sync {
    fn reload_data(&self, scroll_to_top: bool);
    fn show_error_message(&self);
    fn show_loading_view(&self);
    fn hide_loading_view(&self);
}

/// One row of the movie list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieCellViewData {
    pub poster_path: Option<String>,
    pub title: Option<String>,
    pub genres: Vec<String>,
    pub popularity: Option<f64>,
    pub release_year: Option<i32>,
}

impl From<Movie> for MovieCellViewData {
    fn from(movie: Movie) -> Self {
        let release_year = movie.release_year();

        Self {
            poster_path: movie.poster_path,
            title: movie.title,
            genres: movie.genres.unwrap_or_default(),
            popularity: movie.popularity,
            release_year,
        }
    }
}

#[derive(Clone)]
pub struct MovieListPresenter {
    view: Arc<dyn MovieListView>,
    movies: MoviesRepository,
    images: ImagesRepository,
}

impl MovieListPresenter {
    pub fn new(
        view: Arc<dyn MovieListView>,
        movies: MoviesRepository,
        images: ImagesRepository,
    ) -> Self {
        Self {
            view,
            movies,
            images,
        }
    }

    pub fn number_of_movies(&self) -> usize {
        self.movies.number_of_movies()
    }

    /// Load the image configuration, then the first page
    pub async fn view_did_load(&self) {
        self.view.show_loading_view();
        self.images.load_configuration().await;
        self.movies.load_movies().await;
    }

    pub fn view_did_start_refreshing(&self) {
        self.movies.refresh_movies();
    }

    pub async fn search_text_did_change(&self, text: &str) {
        self.movies.search_for_movies(text).await;
    }

    pub fn movie(&self, index: usize) -> Option<MovieCellViewData> {
        self.movies.movie(index).map(MovieCellViewData::from)
    }

    pub async fn load_movie_poster(&self, path: Option<&str>, width: u32) -> Option<Vec<u8>> {
        self.images.load_poster_image(path, width).await
    }

    /// React to a repository notification
    pub fn handle_event(&self, event: &MoviesEvent) {
        self.view.hide_loading_view();

        match event {
            MoviesEvent::Reloaded => self.view.reload_data(true),
            MoviesEvent::Updated => self.view.reload_data(false),
            MoviesEvent::Failed { message } => {
                debug!("Movie list failed to load: {}", message);
                if self.movies.number_of_movies() == 0 {
                    self.view.show_error_message();
                }
            }
        }
    }

    /// Feed `events` into [`Self::handle_event`] until `cancel` is cancelled.
    ///
    /// The presenter holds the repository and so keeps the channel open; the
    /// token is the way to stop a spawned listener.
    pub async fn listen(
        &self,
        mut events: broadcast::Receiver<MoviesEvent>,
        cancel: CancellationToken,
    ) {
        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    info!("Movie list listener cancelled");
                    break;
                }
                received = events.recv() => match received {
                    Ok(event) => self.handle_event(&event),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("Movie list missed {} events, reloading", skipped);
                        self.view.reload_data(false);
                    }
                    Err(RecvError::Closed) => break,
                },
            }
        }
    }
}
