mod configuration;
mod genre;
mod movie;

pub use configuration::{Configuration, ORIGINAL_BUCKET};
pub use genre::{Genre, GenreTable};
pub use movie::Movie;
