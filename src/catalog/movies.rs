use crate::catalog::{
    Result,
    dispatch::Dispatcher,
    service::{ContentRoute, ContentService, GenreListResponse, MovieRecord, PageResponse, decode},
    types::{GenreTable, Movie},
};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// How close to the end of the loaded list a read has to be to prefetch the next page
const PREFETCH_DISTANCE: usize = 10;
const EVENT_CAPACITY: usize = 64;

/// Change notifications emitted by [`MoviesRepository`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoviesEvent {
    /// The first page of a fresh list arrived
    Reloaded,
    /// A further page was appended
    Updated,
    /// A page request failed
    Failed { message: String },
}

#[derive(Debug, Default)]
struct State {
    movies: Vec<Movie>,
    genres: Option<GenreTable>,
    last_loaded_page: u32,
    total_results: u32,
    /// Unknown until the first page answers
    total_pages: Option<u32>,
    /// Bumped on every reset; responses from an older generation are dropped
    generation: u64,
    is_loading_genres: bool,
    is_loading_movies: bool,
    /// At most one load waits on the dispatcher
    scheduled_load: Option<ScheduledLoad>,
    /// Empty means the popular list
    current_query: String,
    pending_query: Option<String>,
}

impl State {
    fn reset_results(&mut self) {
        self.movies.clear();
        self.last_loaded_page = 0;
        self.total_results = 0;
        self.total_pages = None;
        self.generation += 1;
    }

    /// Insert `movie`, merging into an existing entry with the same id
    fn upsert(&mut self, movie: Movie) {
        let existing = movie
            .id
            .and_then(|id| self.movies.iter().position(|m| m.id == Some(id)));

        match existing {
            Some(index) => {
                let current = std::mem::take(&mut self.movies[index]);
                self.movies[index] = Movie::merge(current, movie);
            }
            None => self.movies.push(movie),
        }
    }

    fn sort_by_popularity(&mut self) {
        self.movies
            .sort_by(|a, b| b.popularity_or_zero().total_cmp(&a.popularity_or_zero()));
    }
}

#[derive(Debug, Clone, Copy)]
enum ScheduledLoad {
    /// Append the next page
    NextPage,
    /// Repopulate after a reset, unless that generation already has a page
    Refill { generation: u64 },
}

/// A page request that has been admitted
#[derive(Debug)]
struct PageTicket {
    page: u32,
    query: String,
    generation: u64,
}

enum PageStart {
    NeedsGenres,
    Skip,
    Fetch(PageTicket),
}

enum PageOutcome {
    Settled,
    Stale,
}

struct Inner {
    service: Arc<dyn ContentService>,
    dispatcher: Arc<dyn Dispatcher>,
    events: broadcast::Sender<MoviesEvent>,
    state: Mutex<State>,
}

/// Page-based movie list, optionally filtered by a search query.
///
/// The repository is the single writer of the loaded list and the pagination
/// counters. Loads are single-flight: a call made while a load is in flight
/// returns without doing anything, except that the most recent search query is
/// remembered and applied once the in-flight load settles.
///
/// Cloning is cheap and every clone shares the same state.
#[derive(Clone)]
pub struct MoviesRepository {
    inner: Arc<Inner>,
}

impl MoviesRepository {
    pub fn new(service: Arc<dyn ContentService>, dispatcher: Arc<dyn Dispatcher>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Self {
            inner: Arc::new(Inner {
                service,
                dispatcher,
                events,
                state: Mutex::new(State::default()),
            }),
        }
    }

    /// Receive change notifications. Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> broadcast::Receiver<MoviesEvent> {
        self.inner.events.subscribe()
    }

    pub fn number_of_movies(&self) -> usize {
        self.inner.state.lock().movies.len()
    }

    /// Total number of results the remote reports for the current list
    pub fn total_results(&self) -> u32 {
        self.inner.state.lock().total_results
    }

    /// The active search query; empty when showing popular movies
    pub fn current_query(&self) -> String {
        self.inner.state.lock().current_query.clone()
    }

    pub fn is_loading(&self) -> bool {
        let state = self.inner.state.lock();
        state.is_loading_genres || state.is_loading_movies
    }

    /// Snapshot of the loaded list, most popular first
    pub fn movies(&self) -> Vec<Movie> {
        self.inner.state.lock().movies.clone()
    }

    /// Movie at `index`, or `None` when out of range.
    ///
    /// Reading within [`PREFETCH_DISTANCE`] of the end of the loaded list while
    /// more results remain schedules the next page.
    pub fn movie(&self, index: usize) -> Option<Movie> {
        let (movie, prefetch) = {
            let state = self.inner.state.lock();
            let near_end = index.saturating_add(PREFETCH_DISTANCE) > state.movies.len();
            let more_remain = index < state.total_results as usize;
            (state.movies.get(index).cloned(), near_end && more_remain)
        };

        if prefetch {
            debug!("Prefetching next page at index {}", index);
            self.schedule_load(ScheduledLoad::NextPage);
        }

        movie
    }

    /// Load the next page of the current list.
    ///
    /// Loads the genre table first when it is missing. Emits
    /// [`MoviesEvent::Reloaded`] for page 1, [`MoviesEvent::Updated`] for later
    /// pages and [`MoviesEvent::Failed`] on error, then applies a pending search
    /// if one arrived meanwhile.
    pub async fn load_movies(&self) {
        loop {
            self.load_next_page().await;

            if !self.apply_pending_search() {
                break;
            }
        }
    }

    /// Drop everything loaded so far and start again from page 1.
    ///
    /// The list is empty as soon as this returns; the reload runs on the
    /// dispatcher. The active search query is kept.
    pub fn refresh_movies(&self) {
        let generation = {
            let mut state = self.inner.state.lock();
            info!("Refreshing movies (query: {:?})", state.current_query);
            state.genres = None;
            state.reset_results();
            state.generation
        };

        self.schedule_load(ScheduledLoad::Refill { generation });
    }

    /// Switch the list to `query`; an empty query shows popular movies.
    ///
    /// While a load is in flight the query is parked and applied when that load
    /// settles. A query equal to the active one is ignored. Comparison is exact:
    /// no trimming or case folding.
    pub async fn search_for_movies(&self, query: impl Into<String>) {
        self.inner.state.lock().pending_query = Some(query.into());

        if self.apply_pending_search() {
            self.load_movies().await;
        }
    }

    /// Fetch the detail record for `id` and merge it into the cached one.
    ///
    /// Fields the detail payload lacks keep their cached values. If the request
    /// fails the cached record is returned as is. Returns `None` when no record
    /// with this id can be produced.
    pub async fn load_movie_details(&self, id: i64) -> Option<Movie> {
        let record = self
            .inner
            .service
            .request_route(ContentRoute::Movie { id })
            .await
            .and_then(decode::<MovieRecord>);

        let record = match record {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Failed to load details of movie {}: {}", id, e);
                None
            }
        };

        self.merge_details(id, record)
    }

    fn merge_details(&self, id: i64, record: Option<MovieRecord>) -> Option<Movie> {
        let mut state = self.inner.state.lock();

        let incoming = record.map(|record| {
            let genres = state.genres.clone().unwrap_or_default();
            Movie::from_record(record, &genres)
        });

        let index = state.movies.iter().position(|m| m.id == Some(id));
        let existing = index
            .map(|i| state.movies[i].clone())
            .unwrap_or_default();

        let merged = match incoming {
            Some(incoming) => Movie::merge(existing, incoming),
            None => existing,
        };

        if merged.id != Some(id) {
            debug!("Movie {} not found", id);
            return None;
        }

        if let Some(index) = index {
            state.movies[index] = merged.clone();
            state.sort_by_popularity();
        }

        Some(merged)
    }

    fn schedule_load(&self, load: ScheduledLoad) {
        {
            let mut state = self.inner.state.lock();
            let pending = state.scheduled_load.is_some();

            // A refill replaces whatever is waiting; a next-page request never does
            if !pending || matches!(load, ScheduledLoad::Refill { .. }) {
                state.scheduled_load = Some(load);
            }
            if pending {
                return;
            }
        }

        let repository = self.clone();
        self.inner.dispatcher.dispatch(Box::pin(async move {
            repository.run_scheduled_load().await;
        }));
    }

    async fn run_scheduled_load(&self) {
        let proceed = {
            let mut state = self.inner.state.lock();
            match state.scheduled_load.take() {
                Some(ScheduledLoad::NextPage) => true,
                Some(ScheduledLoad::Refill { generation }) => {
                    state.generation == generation && state.last_loaded_page == 0
                }
                None => false,
            }
        };

        if proceed {
            self.load_movies().await;
        } else {
            debug!("Scheduled load skipped, list already repopulated");
        }
    }

    async fn load_next_page(&self) {
        loop {
            let ticket = match self.begin_page_load() {
                PageStart::NeedsGenres => {
                    if self.load_genres().await {
                        continue;
                    }
                    return;
                }
                PageStart::Skip => return,
                PageStart::Fetch(ticket) => ticket,
            };

            let response = self.fetch_page(&ticket).await;

            match self.complete_page_load(&ticket, response) {
                PageOutcome::Settled => return,
                PageOutcome::Stale => continue,
            }
        }
    }

    fn begin_page_load(&self) -> PageStart {
        let mut state = self.inner.state.lock();

        if state.genres.is_none() {
            return PageStart::NeedsGenres;
        }

        let page = state.last_loaded_page + 1;
        if state.total_pages.is_some_and(|total| page > total) {
            debug!("All {} pages loaded", state.last_loaded_page);
            return PageStart::Skip;
        }

        if state.is_loading_movies {
            return PageStart::Skip;
        }
        state.is_loading_movies = true;

        PageStart::Fetch(PageTicket {
            page,
            query: state.current_query.clone(),
            generation: state.generation,
        })
    }

    async fn fetch_page(&self, ticket: &PageTicket) -> Result<PageResponse> {
        let service = &self.inner.service;

        let response = if ticket.query.is_empty() {
            service
                .request_page(ContentRoute::PopularMovies, ticket.page)
                .await
        } else {
            service
                .request(
                    ContentRoute::SearchMovies,
                    Some(ticket.query.as_str()),
                    Some(ticket.page),
                )
                .await
        };

        response.and_then(decode::<PageResponse>)
    }

    fn complete_page_load(
        &self,
        ticket: &PageTicket,
        response: Result<PageResponse>,
    ) -> PageOutcome {
        let mut state = self.inner.state.lock();
        state.is_loading_movies = false;

        if ticket.generation != state.generation {
            debug!(
                "Discarding stale page {} (query: {:?})",
                ticket.page, ticket.query
            );
            return PageOutcome::Stale;
        }

        let event = match response {
            Ok(page) => {
                state.last_loaded_page = page.page.unwrap_or(ticket.page);
                if let Some(total) = page.total_results {
                    state.total_results = total;
                }
                if let Some(total) = page.total_pages {
                    state.total_pages = Some(total);
                }

                let genres = state.genres.clone().unwrap_or_default();
                for value in page.results.unwrap_or_default() {
                    match decode::<MovieRecord>(value) {
                        Ok(record) => state.upsert(Movie::from_record(record, &genres)),
                        Err(e) => warn!("Skipping malformed movie entry: {}", e),
                    }
                }
                state.sort_by_popularity();

                debug!(
                    "Loaded page {} of {:?} ({} movies, query: {:?})",
                    state.last_loaded_page,
                    state.total_pages,
                    state.movies.len(),
                    ticket.query
                );

                if ticket.page > 1 {
                    MoviesEvent::Updated
                } else {
                    MoviesEvent::Reloaded
                }
            }
            Err(e) => {
                if ticket.query.is_empty() {
                    warn!("Failed to load popular movies, page {}: {}", ticket.page, e);
                } else {
                    warn!(
                        "Failed to load movies for query {:?}, page {}: {}",
                        ticket.query, ticket.page, e
                    );
                }
                MoviesEvent::Failed {
                    message: e.to_string(),
                }
            }
        };

        // No subscribers is fine
        let _ = self.inner.events.send(event);

        PageOutcome::Settled
    }

    /// Returns `false` when another genre load is already in flight
    async fn load_genres(&self) -> bool {
        {
            let mut state = self.inner.state.lock();
            if state.is_loading_genres {
                return false;
            }
            state.is_loading_genres = true;
        }

        let response = self
            .inner
            .service
            .request_route(ContentRoute::MovieGenres)
            .await
            .and_then(decode::<GenreListResponse>);

        let table = match response {
            Ok(response) => GenreTable::from_response(response),
            Err(e) => {
                warn!("Failed to load genres: {}", e);
                GenreTable::default()
            }
        };
        debug!("Loaded {} genres", table.len());

        let mut state = self.inner.state.lock();
        state.is_loading_genres = false;
        state.genres = Some(table);
        true
    }

    /// Apply the parked search query if nothing is loading.
    /// Returns `true` when the list was reset for a new query.
    fn apply_pending_search(&self) -> bool {
        let mut state = self.inner.state.lock();

        if state.is_loading_genres || state.is_loading_movies {
            return false;
        }
        let Some(query) = state.pending_query.take() else {
            return false;
        };
        if query == state.current_query {
            return false;
        }

        info!("Searching movies for {:?}", query);
        state.current_query = query;
        state.reset_results();
        true
    }
}

impl std::fmt::Debug for MoviesRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("MoviesRepository")
            .field("movies", &state.movies.len())
            .field("last_loaded_page", &state.last_loaded_page)
            .field("total_pages", &state.total_pages)
            .field("current_query", &state.current_query)
            .finish()
    }
}
