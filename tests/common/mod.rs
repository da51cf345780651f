#![allow(dead_code)]

use futures::future::BoxFuture;
use parking_lot::Mutex;
use popular_movies::catalog::{
    Dispatcher, HttpContentService, HttpImageService, ImageCache, ImagesRepository,
    MoviesRepository, ServiceConfig,
};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockBuilder, MockServer, ResponseTemplate, Times};

pub const API_KEY: &str = "test-key";
pub const AVENGERS_ID: i64 = 299536;
pub const AVENGERS_POSTER: &str = "/7WsyChQLEftFiDOVTGkv3hFpyyt.jpg";
pub const AVENGERS_BACKDROP: &str = "/bOGkgRGdhrBYJSLpXaxhXVstddV.jpg";

pub fn fixture(name: &str) -> Value {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    let text = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("missing fixture {}: {e}", path.display()));
    serde_json::from_str(&text).unwrap()
}

/// GET `endpoint` carrying the test API key
pub fn api_get(endpoint: &str) -> MockBuilder {
    Mock::given(method("GET"))
        .and(path(endpoint))
        .and(query_param("api_key", API_KEY))
}

pub fn json_response(name: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(fixture(name))
}

/// Configuration fixture pointing image URLs at the mock server
pub fn configuration(server: &MockServer) -> Value {
    let mut configuration = fixture("configuration.json");
    configuration["images"]["secure_base_url"] = Value::String(format!("{}/t/p/", server.uri()));
    configuration
}

pub async fn mount_configuration(server: &MockServer) {
    api_get("/configuration")
        .respond_with(ResponseTemplate::new(200).set_body_json(configuration(server)))
        .mount(server)
        .await;
}

pub async fn mount_genres(server: &MockServer) {
    api_get("/genre/movie/list")
        .respond_with(json_response("genre_movie_list.json"))
        .mount(server)
        .await;
}

/// Mount popular page `page`, expected to be requested `times` times
pub async fn mount_popular_page(server: &MockServer, page: u32, times: impl Into<Times>) {
    api_get("/movie/popular")
        .and(query_param("page", page.to_string()))
        .respond_with(json_response(&format!("movie_popular_page_{page}.json")))
        .expect(times)
        .named(format!("popular page {page}"))
        .mount(server)
        .await;
}

pub async fn mount_search_page(
    server: &MockServer,
    query: &str,
    page: u32,
    times: impl Into<Times>,
) {
    api_get("/search/movie")
        .and(query_param("query", query))
        .and(query_param("page", page.to_string()))
        .respond_with(json_response(&format!(
            "search_movie_query_{query}_page_{page}.json"
        )))
        .expect(times)
        .named(format!("search {query:?} page {page}"))
        .mount(server)
        .await;
}

pub async fn mount_movie_details(server: &MockServer) {
    api_get(&format!("/movie/{AVENGERS_ID}"))
        .respond_with(json_response("movie_299536.json"))
        .mount(server)
        .await;
    api_get("/movie/-1")
        .respond_with(ResponseTemplate::new(404).set_body_json(fixture("movie_invalid.json")))
        .mount(server)
        .await;
}

/// Number of requests the server has seen for `endpoint`
pub async fn request_count(server: &MockServer, endpoint: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.url.path() == endpoint)
        .count()
}

pub fn service_config(server: &MockServer) -> ServiceConfig {
    ServiceConfig::new(server.uri(), API_KEY).with_timeout(Duration::from_secs(5))
}

/// Dispatcher that queues work until the test runs it
#[derive(Default)]
pub struct ManualDispatcher {
    tasks: Mutex<Vec<BoxFuture<'static, ()>>>,
}

impl ManualDispatcher {
    pub fn pending(&self) -> usize {
        self.tasks.lock().len()
    }

    /// Run queued work, including anything it queues in turn
    pub async fn run_all(&self) {
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

impl Dispatcher for ManualDispatcher {
    fn dispatch(&self, task: BoxFuture<'static, ()>) {
        self.tasks.lock().push(task);
    }
}

pub struct TestCatalog {
    pub movies: MoviesRepository,
    pub images: ImagesRepository,
    pub dispatcher: Arc<ManualDispatcher>,
}

/// Repositories talking to `server`, with a pixel density of 2
pub fn catalog(server: &MockServer) -> TestCatalog {
    let config = service_config(server);
    let content = Arc::new(HttpContentService::new(&config).unwrap());
    let dispatcher = Arc::new(ManualDispatcher::default());

    TestCatalog {
        movies: MoviesRepository::new(content.clone(), dispatcher.clone()),
        images: ImagesRepository::new(
            content,
            Arc::new(HttpImageService::new(config.timeout).unwrap()),
            ImageCache::new(),
            2.0,
        ),
        dispatcher,
    }
}
