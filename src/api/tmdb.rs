//! TMDB (The Movie Database) API client
//!
//! Provides the show and season metadata behind the episode browser.
//! API docs: https://developer.themoviedb.org/docs

use anyhow::Result;
use log::{debug, warn};
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::models::{Episode, Season, SeasonSummary, Show};

/// Default TMDB API root
pub const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Keys at least this long are v4 read access tokens
const BEARER_TOKEN_MIN_LEN: usize = 64;

/// TMDB API error types
#[derive(Error, Debug)]
pub enum TmdbError {
    #[error("Resource not found (404)")]
    NotFound,

    #[error("Rate limited (429), retries exhausted")]
    RateLimited,

    #[error("Server error: {0}")]
    ServerError(u16),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
}

/// TMDB API client
///
/// Cheap to clone: the underlying `reqwest::Client` shares its pool.
#[derive(Debug, Clone)]
pub struct TmdbClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
    max_retries: u32,
}

impl TmdbClient {
    /// Create a client against an API root, normally [`TMDB_BASE_URL`]
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            max_retries: 3,
        }
    }

    /// Make an authenticated GET request with retry logic for rate limits
    async fn get<T: for<'de> Deserialize<'de>>(&self, endpoint: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, endpoint);
        let mut retries = 0;

        loop {
            debug!("GET {}", url);
            let mut request = self
                .client
                .get(&url)
                .header("Accept", "application/json");
            // v4 read tokens go in the header, v3 keys in the query string
            request = if self.api_key.len() >= BEARER_TOKEN_MIN_LEN {
                request.header("Authorization", format!("Bearer {}", self.api_key))
            } else {
                request.query(&[("api_key", self.api_key.as_str())])
            };
            let response = request.send().await.map_err(TmdbError::from)?;

            match response.status() {
                StatusCode::OK => {
                    let body = response.text().await.map_err(TmdbError::from)?;
                    let parsed: T = serde_json::from_str(&body).map_err(|e| {
                        TmdbError::InvalidResponse(format!("JSON parse error: {}", e))
                    })?;
                    return Ok(parsed);
                }
                StatusCode::NOT_FOUND => {
                    return Err(TmdbError::NotFound.into());
                }
                StatusCode::TOO_MANY_REQUESTS => {
                    retries += 1;
                    if retries >= self.max_retries {
                        return Err(TmdbError::RateLimited.into());
                    }

                    // Retry-After wins over exponential backoff
                    let wait_secs = response
                        .headers()
                        .get("Retry-After")
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(2u64.pow(retries));

                    warn!("TMDB rate limited, retrying in {}s", wait_secs);
                    tokio::time::sleep(Duration::from_secs(wait_secs)).await;
                    continue;
                }
                status => {
                    return Err(TmdbError::ServerError(status.as_u16()).into());
                }
            }
        }
    }

    /// Get a TV show with its season summaries
    pub async fn tv_show(&self, id: u64) -> Result<Show> {
        let endpoint = format!("/tv/{}", id);
        let response: ShowResponse = self.get(&endpoint).await?;
        Ok(response.into_show())
    }

    /// Get a full season with its episodes
    pub async fn tv_season(&self, id: u64, season_number: u32) -> Result<Season> {
        let endpoint = format!("/tv/{}/season/{}", id, season_number);
        let response: SeasonResponse = self.get(&endpoint).await?;
        Ok(response.into_season(id, season_number))
    }
}

// =============================================================================
// Response Structures (internal deserialization)
// =============================================================================

#[derive(Debug, Deserialize)]
struct ShowResponse {
    id: u64,
    name: Option<String>,
    #[serde(default)]
    seasons: Vec<SeasonRaw>,
}

impl ShowResponse {
    fn into_show(self) -> Show {
        Show {
            id: self.id,
            name: self.name.unwrap_or_default(),
            seasons: self.seasons.into_iter().map(|s| s.into_summary()).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SeasonRaw {
    id: u64,
    season_number: Option<u32>,
    name: Option<String>,
    episode_count: Option<u32>,
}

impl SeasonRaw {
    fn into_summary(self) -> SeasonSummary {
        SeasonSummary {
            id: self.id,
            season_number: self.season_number,
            name: self.name,
            episode_count: self.episode_count.unwrap_or(0),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SeasonResponse {
    id: u64,
    season_number: Option<u32>,
    name: Option<String>,
    #[serde(default)]
    episodes: Vec<EpisodeRaw>,
}

impl SeasonResponse {
    fn into_season(self, show_id: u64, requested: u32) -> Season {
        Season {
            id: self.id,
            season_number: self.season_number.unwrap_or(requested),
            name: self.name,
            episodes: self
                .episodes
                .into_iter()
                .map(|e| e.into_episode(show_id))
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct EpisodeRaw {
    id: u64,
    // Season endpoint includes show_id; fall back to the requested show
    show_id: Option<u64>,
    episode_number: u32,
    name: Option<String>,
    overview: Option<String>,
    still_path: Option<String>,
    vote_average: Option<f32>,
    runtime: Option<u32>,
}

impl EpisodeRaw {
    fn into_episode(self, show_id: u64) -> Episode {
        Episode {
            id: self.id,
            show_id: self.show_id.unwrap_or(show_id),
            episode_number: self.episode_number,
            name: self.name.unwrap_or_default(),
            overview: self.overview.unwrap_or_default(),
            still_path: self.still_path,
            vote_average: self.vote_average.unwrap_or(0.0),
            runtime: self.runtime,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_response_keeps_all_seasons() {
        let json = r#"{
            "id": 42,
            "name": "Frieren",
            "seasons": [
                {"id": 1, "season_number": 0, "name": "Specials", "episode_count": 2},
                {"id": 2, "season_number": 1, "name": "Season 1", "episode_count": 28},
                {"id": 3, "season_number": null, "name": "Broken"}
            ]
        }"#;
        let show = serde_json::from_str::<ShowResponse>(json).unwrap().into_show();
        assert_eq!(show.seasons.len(), 3);
        assert_eq!(show.seasons[1].number(), Some(1));
        assert_eq!(show.seasons[2].episode_count, 0);
    }

    #[test]
    fn test_episode_show_id_fallback() {
        let json = r#"{"id": 7, "episode_number": 3, "name": "Three"}"#;
        let ep = serde_json::from_str::<EpisodeRaw>(json).unwrap().into_episode(42);
        assert_eq!(ep.show_id, 42);
        assert_eq!(ep.vote_average, 0.0);
        assert!(ep.runtime.is_none());
    }

    #[test]
    fn test_season_number_fallback() {
        let json = r#"{"id": 9, "episodes": []}"#;
        let season = serde_json::from_str::<SeasonResponse>(json)
            .unwrap()
            .into_season(42, 3);
        assert_eq!(season.season_number, 3);
        assert!(season.episodes.is_empty());
    }
}
