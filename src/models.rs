//! Data structures and types for EmbedTUI
//!
//! Contains the shared models used across the application organized by domain:
//! - **Metadata**: TMDB shows, seasons and episodes
//! - **Embeds**: media type and embed source options

use serde::{Deserialize, Serialize};
use std::fmt;

/// Base URL for TMDB still images
pub const TMDB_IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w500";

// =============================================================================
// Media Type
// =============================================================================

/// Media type of the content behind an embed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    #[default]
    Movie,
    #[serde(alias = "series")]
    Tv,
    Anime,
}

impl MediaType {
    /// Whether this content has seasons and episodes to browse
    pub fn is_episodic(&self) -> bool {
        matches!(self, MediaType::Tv | MediaType::Anime)
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaType::Movie => write!(f, "Movie"),
            MediaType::Tv => write!(f, "TV Show"),
            MediaType::Anime => write!(f, "Anime"),
        }
    }
}

// =============================================================================
// Metadata Models (TMDB)
// =============================================================================

/// Season entry as listed on a show record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonSummary {
    pub id: u64,
    /// Missing or zero means the entry is not a browsable season
    pub season_number: Option<u32>,
    pub name: Option<String>,
    pub episode_count: u32,
}

impl SeasonSummary {
    /// A season is browsable only when it carries a non-zero number
    pub fn number(&self) -> Option<u32> {
        self.season_number.filter(|n| *n > 0)
    }
}

/// Show record with its season summaries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Show {
    pub id: u64,
    pub name: String,
    pub seasons: Vec<SeasonSummary>,
}

/// Full season with its ordered episode list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Season {
    pub id: u64,
    pub season_number: u32,
    pub name: Option<String>,
    pub episodes: Vec<Episode>,
}

impl Season {
    /// Label used by the season selector
    pub fn label(&self) -> String {
        format!("Season {}", self.season_number)
    }
}

/// Episode of a season
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub id: u64,
    pub show_id: u64,
    pub episode_number: u32,
    pub name: String,
    pub overview: String,
    pub still_path: Option<String>,
    pub vote_average: f32,
    /// Runtime in minutes
    pub runtime: Option<u32>,
}

impl Episode {
    /// Full URL of the episode still on the image CDN
    pub fn still_url(&self) -> Option<String> {
        self.still_path
            .as_ref()
            .map(|p| format!("{}{}", TMDB_IMAGE_BASE, p))
    }

    /// Card heading, e.g. "EP 5: The Title"
    pub fn heading(&self) -> String {
        format!("EP {}: {}", self.episode_number, self.name)
    }

    /// Rating with one decimal, e.g. "⭐ 8.4"
    pub fn rating_str(&self) -> String {
        format!("⭐ {:.1}", self.vote_average)
    }

    /// Runtime badge, e.g. "⏱ 24m"
    pub fn runtime_str(&self) -> String {
        match self.runtime {
            Some(m) => format!("⏱ {}m", m),
            None => "⏱ --".to_string(),
        }
    }
}

// =============================================================================
// Embed Sources
// =============================================================================

/// Identifier of an embed source in the source table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    VidSrcApi1,
    VidSrcApi2,
    VidRock,
    Vidzee,
}

impl SourceKind {
    /// All sources in display order
    pub const ALL: [SourceKind; 4] = [
        SourceKind::VidSrcApi1,
        SourceKind::VidSrcApi2,
        SourceKind::VidRock,
        SourceKind::Vidzee,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            SourceKind::VidSrcApi1 => "VidSrc (API1)",
            SourceKind::VidSrcApi2 => "VidSrc (API2)",
            SourceKind::VidRock => "VidRock",
            SourceKind::Vidzee => "Vidzee",
        }
    }
}

impl Default for SourceKind {
    fn default() -> Self {
        SourceKind::VidSrcApi1
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A resolved entry of the source table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceOption {
    pub kind: SourceKind,
    pub name: String,
    /// `None` when the URL cannot be derived from the inputs
    pub url: Option<String>,
}

impl SourceOption {
    /// URL to load, falling back to the given embed URL
    pub fn url_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.url.as_deref().unwrap_or(fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episode() -> Episode {
        Episode {
            id: 1,
            show_id: 42,
            episode_number: 5,
            name: "Pilot".into(),
            overview: String::new(),
            still_path: Some("/abc.jpg".into()),
            vote_average: 8.44,
            runtime: Some(24),
        }
    }

    #[test]
    fn test_media_type_episodic() {
        assert!(MediaType::Anime.is_episodic());
        assert!(MediaType::Tv.is_episodic());
        assert!(!MediaType::Movie.is_episodic());
    }

    #[test]
    fn test_media_type_serde() {
        let mt: MediaType = serde_json::from_str("\"series\"").unwrap();
        assert_eq!(mt, MediaType::Tv);
        let mt: MediaType = serde_json::from_str("\"anime\"").unwrap();
        assert_eq!(mt, MediaType::Anime);
    }

    #[test]
    fn test_season_summary_number_truthiness() {
        let mut s = SeasonSummary {
            id: 1,
            season_number: Some(0),
            name: None,
            episode_count: 3,
        };
        assert_eq!(s.number(), None);
        s.season_number = None;
        assert_eq!(s.number(), None);
        s.season_number = Some(2);
        assert_eq!(s.number(), Some(2));
    }

    #[test]
    fn test_episode_display_helpers() {
        let ep = episode();
        assert_eq!(ep.heading(), "EP 5: Pilot");
        assert_eq!(ep.rating_str(), "⭐ 8.4");
        assert_eq!(ep.runtime_str(), "⏱ 24m");
        assert_eq!(
            ep.still_url().as_deref(),
            Some("https://image.tmdb.org/t/p/w500/abc.jpg")
        );
    }

    #[test]
    fn test_source_kind_names() {
        assert_eq!(SourceKind::VidRock.to_string(), "VidRock");
        assert_eq!(SourceKind::default(), SourceKind::VidSrcApi1);
    }
}
