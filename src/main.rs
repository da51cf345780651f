use anyhow::{Context, Result};
use popular_movies::{MoviesEvent, Settings, create_repositories};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "popular_movies=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::load().context("Failed to load settings")?;
    if settings.api.api_key.is_empty() {
        warn!("No API key configured; set POPULAR_MOVIES__API__API_KEY");
    }

    let (movies, images) = create_repositories(&settings)?;
    let mut events = movies.subscribe();

    images.load_configuration().await;

    let query = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if query.is_empty() {
        info!("Loading popular movies");
        movies.load_movies().await;
    } else {
        info!("Searching for {:?}", query);
        movies.search_for_movies(query).await;
    }

    if let Ok(MoviesEvent::Failed { message }) = events.try_recv() {
        anyhow::bail!("Failed to load movies: {message}");
    }

    for (rank, movie) in movies.movies().iter().enumerate() {
        let year = movie
            .release_year()
            .map(|y| y.to_string())
            .unwrap_or_default();
        let poster = images
            .poster_url(movie.poster_path.as_deref(), 92)
            .unwrap_or_default();

        println!(
            "{:>3}. {:<50} {:>4} {:>9.3}  {}",
            rank + 1,
            movie.title.as_deref().unwrap_or("(untitled)"),
            year,
            movie.popularity_or_zero(),
            poster
        );
    }

    println!(
        "{} of {} movies",
        movies.number_of_movies(),
        movies.total_results()
    );

    Ok(())
}
