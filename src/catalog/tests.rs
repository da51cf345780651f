//! Catalog unit tests

#[cfg(test)]
mod route_tests {
    use crate::catalog::ContentRoute;

    #[test]
    fn test_route_paths() {
        assert_eq!(ContentRoute::Configuration.path(), "/configuration");
        assert_eq!(ContentRoute::PopularMovies.path(), "/movie/popular");
        assert_eq!(ContentRoute::SearchMovies.path(), "/search/movie");
        assert_eq!(ContentRoute::MovieGenres.path(), "/genre/movie/list");
        assert_eq!(ContentRoute::Movie { id: 299536 }.path(), "/movie/299536");
        assert_eq!(ContentRoute::Movie { id: -1 }.to_string(), "/movie/-1");
    }
}

#[cfg(test)]
mod service_tests {
    use crate::catalog::{CatalogError, ContentRoute, ContentService, HttpContentService, ServiceConfig};

    fn unreachable_service() -> HttpContentService {
        // Nothing listens here; page validation must fail before any connection attempt
        HttpContentService::new(&ServiceConfig::new("http://127.0.0.1:9", "key")).unwrap()
    }

    #[tokio::test]
    async fn test_page_zero_is_rejected() {
        let service = unreachable_service();
        let result = service.request_page(ContentRoute::PopularMovies, 0).await;

        assert!(matches!(result, Err(CatalogError::InvalidPage(0))));
    }

    #[tokio::test]
    async fn test_page_above_limit_is_rejected() {
        let service = unreachable_service();
        let result = service
            .request(ContentRoute::SearchMovies, Some("test"), Some(1001))
            .await;

        assert!(matches!(result, Err(CatalogError::InvalidPage(1001))));
    }

    #[test]
    fn test_service_config_default() {
        let config = ServiceConfig::default();

        assert_eq!(config.base_url, "https://api.themoviedb.org/3");
        assert!(config.api_key.is_empty());
        assert_eq!(config.timeout.as_secs(), 30);
    }
}

#[cfg(test)]
mod movie_tests {
    use crate::catalog::service::{MovieRecord, decode};
    use crate::catalog::{Genre, GenreTable, Movie};
    use chrono::NaiveDate;
    use serde_json::json;

    fn genres() -> GenreTable {
        GenreTable::new([
            Genre { id: 28, name: "Action".to_string() },
            Genre { id: 12, name: "Adventure".to_string() },
            Genre { id: 878, name: "Science Fiction".to_string() },
        ])
    }

    fn movie(value: serde_json::Value) -> Movie {
        let record: MovieRecord = decode(value).unwrap();
        Movie::from_record(record, &genres())
    }

    #[test]
    fn test_genre_ids_resolve_in_table_order() {
        let movie = movie(json!({ "id": 1, "genre_ids": [878, 999, 28] }));

        assert_eq!(
            movie.genres,
            Some(vec!["Action".to_string(), "Science Fiction".to_string()])
        );
    }

    #[test]
    fn test_repeated_genre_id_yields_one_name() {
        let movie = movie(json!({ "id": 1, "genre_ids": [12, 12, 28] }));

        assert_eq!(
            movie.genres,
            Some(vec!["Action".to_string(), "Adventure".to_string()])
        );
    }

    #[test]
    fn test_genre_table_lookup() {
        let table = genres();

        assert_eq!(table.name(878), Some("Science Fiction"));
        assert!(table.name(999).is_none());
        assert_eq!(table.len(), 3);
        assert!(GenreTable::default().is_empty());
    }

    #[test]
    fn test_inline_genres_win_over_ids() {
        let movie = movie(json!({
            "id": 1,
            "genre_ids": [28],
            "genres": [{ "id": 18, "name": "Drama" }]
        }));

        assert_eq!(movie.genres, Some(vec!["Drama".to_string()]));
    }

    #[test]
    fn test_missing_genres_stay_unknown() {
        let movie = movie(json!({ "id": 1, "title": "Untitled" }));
        assert!(movie.genres.is_none());
    }

    #[test]
    fn test_release_date_parsing() {
        let movie = movie(json!({ "id": 1, "release_date": "2018-04-25" }));
        assert_eq!(movie.release_date, NaiveDate::from_ymd_opt(2018, 4, 25));
        assert_eq!(movie.release_year(), Some(2018));

        let movie = self::movie(json!({ "id": 1, "release_date": "soon" }));
        assert!(movie.release_date.is_none());
    }

    #[test]
    fn test_wrong_typed_field_degrades_to_none() {
        let movie = movie(json!({
            "id": 7,
            "title": "Typed",
            "runtime": "long",
            "popularity": 12,
            "spoken_languages": [{ "name": "English" }, { "iso_639_1": "fr" }]
        }));

        assert_eq!(movie.id, Some(7));
        assert_eq!(movie.title.as_deref(), Some("Typed"));
        assert!(movie.runtime_minutes.is_none());
        assert_eq!(movie.popularity, Some(12.0));
        assert_eq!(movie.languages, Some(vec!["English".to_string()]));
    }

    #[test]
    fn test_merge_keeps_known_fields() {
        let existing = Movie {
            id: Some(1),
            title: Some("Listed".to_string()),
            poster_path: Some("/poster.jpg".to_string()),
            popularity: Some(42.5),
            ..Default::default()
        };
        let incoming = Movie {
            id: Some(1),
            runtime_minutes: Some(149),
            revenue: Some(2_045_186_856),
            ..Default::default()
        };

        let merged = Movie::merge(existing, incoming);

        assert_eq!(merged.title.as_deref(), Some("Listed"));
        assert_eq!(merged.poster_path.as_deref(), Some("/poster.jpg"));
        assert_eq!(merged.popularity, Some(42.5));
        assert_eq!(merged.runtime_minutes, Some(149));
        assert_eq!(merged.revenue, Some(2_045_186_856));
    }

    #[test]
    fn test_merge_prefers_incoming_values() {
        let existing = Movie {
            title: Some("Old".to_string()),
            popularity: Some(1.0),
            ..Default::default()
        };
        let incoming = Movie {
            title: Some("New".to_string()),
            ..Default::default()
        };

        let merged = Movie::merge(existing, incoming);

        assert_eq!(merged.title.as_deref(), Some("New"));
        assert_eq!(merged.popularity, Some(1.0));
    }

    #[test]
    fn test_popularity_or_zero() {
        assert_eq!(Movie::default().popularity_or_zero(), 0.0);
    }
}

#[cfg(test)]
mod configuration_tests {
    use crate::catalog::service::{ConfigurationResponse, decode};
    use crate::catalog::{Configuration, ORIGINAL_BUCKET};
    use serde_json::json;

    fn sizes(buckets: &[&str]) -> Vec<String> {
        buckets.iter().map(|b| (*b).to_string()).collect()
    }

    #[test]
    fn test_select_smallest_wider_bucket() {
        let poster = sizes(&["w92", "w154", "w185", "w342", "w500", "w780", "original"]);

        assert_eq!(Configuration::select_bucket(&poster, 50), "w92");
        assert_eq!(Configuration::select_bucket(&poster, 200), "w342");
        assert_eq!(Configuration::select_bucket(&poster, 500), "w780");
    }

    #[test]
    fn test_select_bucket_is_strictly_greater() {
        let poster = sizes(&["w92", "w154"]);
        assert_eq!(Configuration::select_bucket(&poster, 92), "w154");
    }

    #[test]
    fn test_select_bucket_falls_back_to_original() {
        let backdrop = sizes(&["w300", "w780", "w1280", "original"]);

        assert_eq!(Configuration::select_bucket(&backdrop, 2000), ORIGINAL_BUCKET);
        assert_eq!(Configuration::select_bucket(&[], 10), ORIGINAL_BUCKET);
    }

    #[test]
    fn test_select_bucket_ignores_order() {
        let unordered = sizes(&["w500", "w185", "w342"]);
        assert_eq!(Configuration::select_bucket(&unordered, 190), "w342");
    }

    #[test]
    fn test_configuration_from_response() {
        let response: ConfigurationResponse = decode(json!({
            "images": {
                "base_url": "http://image.tmdb.org/t/p/",
                "secure_base_url": "https://image.tmdb.org/t/p/",
                "backdrop_sizes": ["w300", "original"],
                "poster_sizes": ["w92", "original"]
            }
        }))
        .unwrap();

        let configuration = Configuration::from_response(response);

        assert!(configuration.is_usable());
        assert_eq!(
            configuration.image_url("w92", "/poster.jpg").as_deref(),
            Some("https://image.tmdb.org/t/p/w92/poster.jpg")
        );
        assert_eq!(configuration.poster_sizes, Some(sizes(&["w92", "original"])));
    }

    #[test]
    fn test_configuration_without_images_is_unusable() {
        let response: ConfigurationResponse = decode(json!({ "change_keys": [] })).unwrap();
        let configuration = Configuration::from_response(response);

        assert!(!configuration.is_usable());
        assert!(configuration.image_url("w92", "/poster.jpg").is_none());
    }
}

#[cfg(test)]
mod cache_tests {
    use crate::catalog::{ImageCache, ImageCacheConfig};
    use std::time::Duration;

    #[tokio::test]
    async fn test_image_cache_roundtrip() {
        let cache = ImageCache::new();

        assert!(cache.get("https://img/w92/a.jpg").await.is_none());
        cache.insert("https://img/w92/a.jpg", vec![1, 2, 3]).await;
        assert_eq!(cache.get("https://img/w92/a.jpg").await, Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_image_cache_config_default() {
        let config = ImageCacheConfig::default();

        assert_eq!(config.max_entries, 200);
        assert_eq!(config.ttl, Duration::from_secs(3600));
    }
}

#[cfg(test)]
mod repository_tests {
    use crate::catalog::{
        CatalogError, ContentRoute, ContentService, Dispatcher, MoviesEvent, MoviesRepository,
        Result,
    };
    use async_trait::async_trait;
    use futures::future::BoxFuture;
    use parking_lot::Mutex;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tokio::sync::Semaphore;

    type Call = (ContentRoute, Option<String>, Option<u32>);

    /// In-memory catalog: two popular pages of three movies each
    #[derive(Default)]
    struct StubContentService {
        calls: Mutex<Vec<Call>>,
        fail_genres: bool,
        /// When set, every page request waits for a permit
        page_gate: Option<Arc<Semaphore>>,
    }

    impl StubContentService {
        fn page_calls(&self) -> usize {
            self.calls
                .lock()
                .iter()
                .filter(|(route, _, _)| *route == ContentRoute::PopularMovies)
                .count()
        }

        fn page(page: u32) -> Value {
            let results = match page {
                1 => json!([
                    { "id": 1, "title": "One", "popularity": 10.0, "genre_ids": [28] },
                    { "id": 2, "title": "Two", "popularity": 30.0 },
                    { "id": 3, "title": "Three" }
                ]),
                _ => json!([
                    { "id": 4, "title": "Four", "popularity": 20.0 },
                    { "id": 2, "vote_count": 99 },
                    "not a movie"
                ]),
            };

            json!({ "page": page, "total_pages": 2, "total_results": 6, "results": results })
        }
    }

    #[async_trait]
    impl ContentService for StubContentService {
        async fn request(
            &self,
            route: ContentRoute,
            query: Option<&str>,
            page: Option<u32>,
        ) -> Result<Value> {
            self.calls
                .lock()
                .push((route, query.map(str::to_string), page));

            match route {
                ContentRoute::MovieGenres if self.fail_genres => Err(CatalogError::Api {
                    status: 500,
                    message: "boom".to_string(),
                }),
                ContentRoute::MovieGenres => {
                    Ok(json!({ "genres": [{ "id": 28, "name": "Action" }] }))
                }
                ContentRoute::PopularMovies => {
                    if let Some(gate) = &self.page_gate {
                        gate.acquire().await.unwrap().forget();
                    } else {
                        tokio::task::yield_now().await;
                    }
                    Ok(Self::page(page.unwrap_or(1)))
                }
                _ => Err(CatalogError::Api {
                    status: 404,
                    message: route.to_string(),
                }),
            }
        }
    }

    #[derive(Default)]
    struct QueueDispatcher {
        tasks: Mutex<Vec<BoxFuture<'static, ()>>>,
    }

    impl QueueDispatcher {
        async fn run_all(&self) {
            loop {
                let tasks = std::mem::take(&mut *self.tasks.lock());
                if tasks.is_empty() {
                    break;
                }
                for task in tasks {
                    task.await;
                }
            }
        }
    }

    impl Dispatcher for QueueDispatcher {
        fn dispatch(&self, task: BoxFuture<'static, ()>) {
            self.tasks.lock().push(task);
        }
    }

    fn repository(service: StubContentService) -> (MoviesRepository, Arc<StubContentService>) {
        let (repository, service, _) = queued_repository(service);
        (repository, service)
    }

    fn queued_repository(
        service: StubContentService,
    ) -> (MoviesRepository, Arc<StubContentService>, Arc<QueueDispatcher>) {
        let service = Arc::new(service);
        let dispatcher = Arc::new(QueueDispatcher::default());
        let repository = MoviesRepository::new(service.clone(), dispatcher.clone());
        (repository, service, dispatcher)
    }

    #[tokio::test]
    async fn test_page_is_sorted_by_popularity() {
        let (repository, _) = repository(StubContentService::default());

        repository.load_movies().await;

        let titles: Vec<_> = repository
            .movies()
            .into_iter()
            .map(|m| m.title.unwrap())
            .collect();
        assert_eq!(titles, ["Two", "One", "Three"]);
        assert_eq!(
            repository.movie(1).unwrap().genres,
            Some(vec!["Action".to_string()])
        );
    }

    #[tokio::test]
    async fn test_pages_are_deduplicated_by_id() {
        let (repository, _) = repository(StubContentService::default());

        repository.load_movies().await;
        repository.load_movies().await;

        assert_eq!(repository.number_of_movies(), 4);
        let two = repository.movie(0).unwrap();
        assert_eq!(two.id, Some(2));
        assert_eq!(two.title.as_deref(), Some("Two"));
        assert_eq!(two.vote_count, Some(99));
        assert_eq!(repository.movie(1).unwrap().id, Some(4));
    }

    #[tokio::test]
    async fn test_concurrent_loads_collapse() {
        let (repository, service) = repository(StubContentService::default());

        tokio::join!(repository.load_movies(), repository.load_movies());

        assert_eq!(service.page_calls(), 1);
        assert_eq!(repository.number_of_movies(), 3);
    }

    #[tokio::test]
    async fn test_no_request_past_last_page() {
        let (repository, service) = repository(StubContentService::default());

        for _ in 0..3 {
            repository.load_movies().await;
        }

        assert_eq!(service.page_calls(), 2);
    }

    #[tokio::test]
    async fn test_genre_failure_still_loads_movies() {
        let (repository, _) = repository(StubContentService {
            fail_genres: true,
            ..Default::default()
        });

        repository.load_movies().await;

        assert_eq!(repository.number_of_movies(), 3);
        assert_eq!(repository.movie(1).unwrap().genres, Some(Vec::new()));
    }

    #[tokio::test]
    async fn test_same_query_is_not_reloaded() {
        let (repository, service) = repository(StubContentService::default());

        repository.search_for_movies("").await;

        assert!(service.calls.lock().is_empty());
        assert_eq!(repository.current_query(), "");
    }

    #[tokio::test]
    async fn test_refresh_during_load_repopulates_first_page_only() {
        let gate = Arc::new(Semaphore::new(0));
        let (repository, service, dispatcher) = queued_repository(StubContentService {
            page_gate: Some(gate.clone()),
            ..Default::default()
        });
        let mut events = repository.subscribe();

        let load = repository.load_movies();
        tokio::pin!(load);
        tokio::select! {
            biased;
            () = &mut load => panic!("load finished without a permit"),
            () = tokio::task::yield_now() => {}
        }
        assert!(repository.is_loading());

        repository.refresh_movies();
        assert_eq!(repository.number_of_movies(), 0);

        gate.add_permits(3);
        load.await;
        dispatcher.run_all().await;

        assert_eq!(service.page_calls(), 2);
        assert_eq!(repository.number_of_movies(), 3);
        assert_eq!(events.try_recv().unwrap(), MoviesEvent::Reloaded);
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_refresh_reload_runs_when_nothing_refilled() {
        let (repository, service, dispatcher) = queued_repository(StubContentService::default());
        repository.load_movies().await;
        repository.load_movies().await;
        let mut events = repository.subscribe();

        repository.refresh_movies();
        repository.refresh_movies();
        dispatcher.run_all().await;

        assert_eq!(service.page_calls(), 3);
        assert_eq!(repository.number_of_movies(), 3);
        assert_eq!(events.try_recv().unwrap(), MoviesEvent::Reloaded);
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_refresh_supersedes_pending_prefetch() {
        let (repository, service, dispatcher) = queued_repository(StubContentService::default());
        repository.load_movies().await;

        assert!(repository.movie(2).is_some());
        repository.refresh_movies();
        dispatcher.run_all().await;

        assert_eq!(service.page_calls(), 2);
        assert_eq!(repository.number_of_movies(), 3);
    }
}
