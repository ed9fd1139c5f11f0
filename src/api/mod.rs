//! API clients for external services
//!
//! - TMDB: show and season metadata for the episode browser

pub mod tmdb;

pub use tmdb::{TmdbClient, TmdbError};
