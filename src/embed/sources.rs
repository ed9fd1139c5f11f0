//! Embed source table and URL builders
//!
//! Every URL the panel can point the player at is built here, so the
//! formats stay in one place and can be checked without rendering.

use crate::models::{Episode, SourceKind, SourceOption};

/// Default host of the VidSrc embed service
pub const DEFAULT_EMBED_HOST: &str = "https://vidsrc.cc";

const VIDROCK_BASE: &str = "https://vidrock.xyz/v/";
const VIDZEE_BASE: &str = "https://vidzee.pro/v/";

/// Resolve the URL of one source.
///
/// Returns `None` when the URL cannot be derived: API2 needs a `/v2/`
/// segment in the given URL, the third-party hosts need a movie id.
pub fn resolve(kind: SourceKind, url: &str, movie_id: Option<&str>) -> Option<String> {
    match kind {
        SourceKind::VidSrcApi1 => Some(url.to_string()),
        SourceKind::VidSrcApi2 => url
            .contains("/v2/")
            .then(|| url.replacen("/v2/", "/v1/", 1)),
        SourceKind::VidRock => movie_id.map(|id| format!("{}{}", VIDROCK_BASE, id)),
        SourceKind::Vidzee => movie_id.map(|id| format!("{}{}", VIDZEE_BASE, id)),
    }
}

/// Build the full source table for an embed URL
pub fn source_options(url: &str, movie_id: Option<&str>) -> Vec<SourceOption> {
    SourceKind::ALL
        .into_iter()
        .map(|kind| SourceOption {
            kind,
            name: kind.display_name().to_string(),
            url: resolve(kind, url, movie_id),
        })
        .collect()
}

/// Builds per-episode embed URLs against a configurable host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeUrls {
    host: String,
}

impl Default for EpisodeUrls {
    fn default() -> Self {
        Self::new(DEFAULT_EMBED_HOST)
    }
}

impl EpisodeUrls {
    pub fn new(host: impl Into<String>) -> Self {
        let host = host.into();
        Self {
            host: host.trim_end_matches('/').to_string(),
        }
    }

    /// Show-level default: first episode, autoplay off
    pub fn default_episode(&self, show_id: u64) -> String {
        format!(
            "{}/v2/embed/anime/tmdb{}/1/sub?autoPlay=false",
            self.host, show_id
        )
    }

    /// Explicitly chosen episode
    pub fn episode(&self, show_id: u64, episode_number: u32) -> String {
        format!(
            "{}/v2/embed/anime/tmdb{}/{}/sub",
            self.host, show_id, episode_number
        )
    }

    pub fn for_episode(&self, episode: &Episode) -> String {
        self.episode(episode.show_id, episode.episode_number)
    }
}
