//! CLI Command Handlers
//!
//! Implements the scripting commands on top of the same building blocks
//! the panel uses. Each handler takes CLI args and Output, returns ExitCode.

use serde::Serialize;

use crate::api::TmdbClient;
use crate::cli::{EpisodeUrlCmd, EpisodesCmd, ExitCode, Output, SourcesCmd};
use crate::config::Config;
use crate::embed::{load_seasons, parse_show_id, source_options, EpisodeUrls};
use crate::error::EmbedError;
use crate::models::{Episode, Season, SourceOption};

// =============================================================================
// Sources Command
// =============================================================================

/// Source table entry with the URL the panel would actually load
#[derive(Debug, Serialize)]
pub struct SourceRow {
    #[serde(flatten)]
    pub option: SourceOption,
    /// URL after falling back to the given embed
    pub effective_url: String,
}

pub fn source_rows(url: &str, movie_id: Option<&str>) -> Vec<SourceRow> {
    source_options(url, movie_id)
        .into_iter()
        .map(|option| SourceRow {
            effective_url: option.url_or(url).to_string(),
            option,
        })
        .collect()
}

pub fn sources_cmd(cmd: SourcesCmd, output: &Output) -> ExitCode {
    let rows = source_rows(&cmd.url, cmd.movie_id.as_deref());
    if let Err(e) = output.print(&rows) {
        return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
    }
    ExitCode::Success
}

// =============================================================================
// Episodes Command
// =============================================================================

#[derive(Debug, Serialize)]
pub struct EpisodeRow {
    #[serde(flatten)]
    pub episode: Episode,
    pub embed_url: String,
    /// Full TMDB image URL for the episode still
    pub still_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SeasonRow {
    pub season_number: u32,
    pub name: Option<String>,
    pub episodes: Vec<EpisodeRow>,
}

pub fn season_rows(seasons: Vec<Season>, urls: &EpisodeUrls) -> Vec<SeasonRow> {
    seasons
        .into_iter()
        .map(|s| SeasonRow {
            season_number: s.season_number,
            name: s.name,
            episodes: s
                .episodes
                .into_iter()
                .map(|episode| EpisodeRow {
                    embed_url: urls.for_episode(&episode),
                    still_url: episode.still_url(),
                    episode,
                })
                .collect(),
        })
        .collect()
}

pub async fn episodes_cmd(cmd: EpisodesCmd, config: &Config, output: &Output) -> ExitCode {
    let show_id = match parse_show_id(&cmd.show_id) {
        Ok(id) => id,
        Err(e) => return output.error(e.to_string(), ExitCode::InvalidArgs),
    };
    let api_key = match config.tmdb_api_key() {
        Ok(key) => key,
        Err(e) => return output.error(e.to_string(), ExitCode::InvalidArgs),
    };
    let client = TmdbClient::with_base_url(api_key, &config.tmdb_base_url);

    output.info(format!("Fetching seasons for show {}...", show_id));

    let mut seasons = match load_seasons(&client, show_id).await {
        Ok(seasons) => seasons,
        Err(e) => return output.error(e.to_string(), exit_code_for(&e)),
    };

    if let Some(number) = cmd.season {
        seasons.retain(|s| s.season_number == number);
        if seasons.is_empty() {
            return output.error(format!("Season {} not found", number), ExitCode::NotFound);
        }
    }

    let rows = season_rows(seasons, &EpisodeUrls::new(&config.embed_host));
    if let Err(e) = output.print(&rows) {
        return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
    }
    ExitCode::Success
}

/// Map a fetch failure to an exit code; a missing show is NotFound
fn exit_code_for(err: &EmbedError) -> ExitCode {
    match err {
        EmbedError::NotFound(_) => ExitCode::NotFound,
        EmbedError::FetchFailed(_) => ExitCode::NetworkError,
        EmbedError::InvalidShowId(_) | EmbedError::InvalidSelection { .. } => ExitCode::InvalidArgs,
        EmbedError::EmbedLoadTimeout { .. } => ExitCode::NetworkError,
    }
}

// =============================================================================
// Episode URL Command
// =============================================================================

pub fn episode_url_cmd(cmd: EpisodeUrlCmd, config: &Config, output: &Output) -> ExitCode {
    let show_id = match parse_show_id(&cmd.show_id) {
        Ok(id) => id,
        Err(e) => return output.error(e.to_string(), ExitCode::InvalidArgs),
    };
    let urls = EpisodeUrls::new(&config.embed_host);
    let url = match cmd.episode {
        Some(n) => urls.episode(show_id, n),
        None => urls.default_episode(show_id),
    };

    if output.json {
        if let Err(e) = output.print(serde_json::json!({ "url": url })) {
            return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
        }
    } else {
        output.line(&url);
    }
    ExitCode::Success
}
