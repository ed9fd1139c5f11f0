//! Error taxonomy for the embed panel
//!
//! None of these are fatal: the panel turns each one into a visible
//! status line with a retry affordance.

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmbedError {
    /// Season or episode metadata could not be fetched or parsed
    #[error("Failed to fetch episodes: {0}")]
    FetchFailed(String),

    /// TMDB answered 404 for the show or one of its seasons
    #[error("Failed to fetch episodes: {0} not found")]
    NotFound(String),

    /// The embed never reported a completed load within the bound
    #[error("Embed did not load within {}s: {url}", .timeout.as_secs())]
    EmbedLoadTimeout { url: String, timeout: Duration },

    /// Season index outside the loaded season list
    #[error("Season index {index} out of range ({len} seasons)")]
    InvalidSelection { index: usize, len: usize },

    /// Show identifier could not be turned into a numeric TMDB id
    #[error("Invalid show id: {0}")]
    InvalidShowId(String),
}

impl EmbedError {
    /// Whether the panel offers a retry for this error
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            EmbedError::FetchFailed(_)
                | EmbedError::NotFound(_)
                | EmbedError::EmbedLoadTimeout { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let e = EmbedError::EmbedLoadTimeout {
            url: "https://x/v2/embed".into(),
            timeout: Duration::from_secs(30),
        };
        assert_eq!(e.to_string(), "Embed did not load within 30s: https://x/v2/embed");

        let e = EmbedError::InvalidSelection { index: 4, len: 2 };
        assert_eq!(e.to_string(), "Season index 4 out of range (2 seasons)");

        let e = EmbedError::NotFound("show 7".into());
        assert_eq!(e.to_string(), "Failed to fetch episodes: show 7 not found");
    }

    #[test]
    fn test_retryable() {
        assert!(EmbedError::FetchFailed("boom".into()).is_retryable());
        assert!(EmbedError::NotFound("show 7".into()).is_retryable());
        assert!(!EmbedError::InvalidShowId("x".into()).is_retryable());
        assert!(!EmbedError::InvalidSelection { index: 1, len: 0 }.is_retryable());
    }
}
