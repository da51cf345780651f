//! Presenters translating repository state into view-ready data.
//!
//! Views are traits so any front end (or a test double) can sit behind them.

mod movie_details;
mod movie_list;

pub use movie_details::{MovieDetailsPresenter, MovieDetailsView, MovieDetailsViewData};
pub use movie_list::{MovieCellViewData, MovieListPresenter, MovieListView};
