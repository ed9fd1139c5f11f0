//! Episode browser
//!
//! Loads every season of a show up front so switching seasons never
//! hits the network, then tracks which season is on screen.

use futures::future::try_join_all;
use log::{info, warn};

use crate::api::{TmdbClient, TmdbError};
use crate::error::EmbedError;
use crate::models::{Episode, Season};

/// Prefix carried by show identifiers handed to the panel
pub const SHOW_ID_PREFIX: &str = "t-";

/// Turn a show identifier such as `"t-42"` into a TMDB id
pub fn parse_show_id(identifier: &str) -> Result<u64, EmbedError> {
    let trimmed = identifier.trim();
    let digits = trimmed.strip_prefix(SHOW_ID_PREFIX).unwrap_or(trimmed);
    digits
        .parse::<u64>()
        .map_err(|_| EmbedError::InvalidShowId(identifier.to_string()))
}

/// Fetch a show and all of its numbered seasons.
///
/// Seasons without a season number (or numbered 0) are skipped. The
/// remaining seasons are requested concurrently and returned in the
/// order the show lists them; any single failure fails the whole load.
pub async fn load_seasons(client: &TmdbClient, show_id: u64) -> Result<Vec<Season>, EmbedError> {
    let show = client
        .tv_show(show_id)
        .await
        .map_err(|e| fetch_error(e, format!("show {}", show_id)))?;

    let numbers: Vec<u32> = show.seasons.iter().filter_map(|s| s.number()).collect();
    info!(
        "show {} has {} numbered seasons ({} listed)",
        show_id,
        numbers.len(),
        show.seasons.len()
    );

    let requests = numbers.iter().map(|&n| async move {
        client
            .tv_season(show_id, n)
            .await
            .map_err(|e| fetch_error(e, format!("show {} season {}", show_id, n)))
    });
    try_join_all(requests).await
}

/// Keep a TMDB 404 distinguishable from transport and server failures
fn fetch_error(err: anyhow::Error, what: String) -> EmbedError {
    match err.downcast_ref::<TmdbError>() {
        Some(TmdbError::NotFound) => EmbedError::NotFound(what),
        _ => EmbedError::FetchFailed(err.to_string()),
    }
}

/// Episode browser state
#[derive(Debug, Clone, Default, PartialEq)]
pub enum BrowserState {
    /// Not activated (non-episodic content)
    #[default]
    Idle,
    Loading,
    Loaded {
        seasons: Vec<Season>,
        selected: usize,
    },
    Error(EmbedError),
}

#[derive(Debug, Clone, Default)]
pub struct EpisodeBrowser {
    show_id: Option<u64>,
    state: BrowserState,
}

impl EpisodeBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show_id(&self) -> Option<u64> {
        self.show_id
    }

    pub fn state(&self) -> &BrowserState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == BrowserState::Loading
    }

    pub fn error(&self) -> Option<&EmbedError> {
        match &self.state {
            BrowserState::Error(e) => Some(e),
            _ => None,
        }
    }

    /// Enter `Loading` for the given show
    pub fn begin(&mut self, show_id: u64) {
        self.show_id = Some(show_id);
        self.state = BrowserState::Loading;
    }

    /// Apply a finished load. Selection starts at the first season.
    pub fn finish(&mut self, result: Result<Vec<Season>, EmbedError>) {
        self.state = match result {
            Ok(seasons) => BrowserState::Loaded {
                seasons,
                selected: 0,
            },
            Err(e) => {
                warn!("episode browser load failed: {}", e);
                BrowserState::Error(e)
            }
        };
    }

    /// Re-enter `Loading` after a failure. Returns the show to refetch.
    pub fn retry(&mut self) -> Option<u64> {
        if !matches!(self.state, BrowserState::Error(_)) {
            return None;
        }
        let show_id = self.show_id?;
        self.state = BrowserState::Loading;
        Some(show_id)
    }

    /// Loaded seasons, empty until the load finishes
    pub fn seasons(&self) -> &[Season] {
        match &self.state {
            BrowserState::Loaded { seasons, .. } => seasons,
            _ => &[],
        }
    }

    pub fn selected_season(&self) -> usize {
        match &self.state {
            BrowserState::Loaded { selected, .. } => *selected,
            _ => 0,
        }
    }

    pub fn current_season(&self) -> Option<&Season> {
        self.seasons().get(self.selected_season())
    }

    /// Episodes of the selected season
    pub fn episodes(&self) -> &[Episode] {
        self.current_season()
            .map(|s| s.episodes.as_slice())
            .unwrap_or(&[])
    }

    /// Select a season by index.
    ///
    /// Out-of-range indexes are clamped to the last season; the error is
    /// still returned so the caller can log it.
    pub fn select_season(&mut self, index: usize) -> Result<usize, EmbedError> {
        let BrowserState::Loaded { seasons, selected } = &mut self.state else {
            return Err(EmbedError::InvalidSelection { index, len: 0 });
        };
        let len = seasons.len();
        if len == 0 {
            return Err(EmbedError::InvalidSelection { index, len });
        }
        if index >= len {
            *selected = len - 1;
            return Err(EmbedError::InvalidSelection { index, len });
        }
        *selected = index;
        Ok(index)
    }

    /// Step the season selection by `delta`, saturating at both ends
    pub fn step_season(&mut self, delta: isize) {
        let len = self.seasons().len();
        if len == 0 {
            return;
        }
        let next = self
            .selected_season()
            .saturating_add_signed(delta)
            .min(len - 1);
        let _ = self.select_season(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn season(number: u32, episodes: u32) -> Season {
        Season {
            id: number as u64 * 100,
            season_number: number,
            name: None,
            episodes: (1..=episodes)
                .map(|n| Episode {
                    id: n as u64,
                    show_id: 42,
                    episode_number: n,
                    name: format!("Episode {}", n),
                    overview: String::new(),
                    still_path: None,
                    vote_average: 7.0,
                    runtime: Some(24),
                })
                .collect(),
        }
    }

    fn loaded() -> EpisodeBrowser {
        let mut browser = EpisodeBrowser::new();
        browser.begin(42);
        browser.finish(Ok(vec![season(1, 3), season(2, 5)]));
        browser
    }

    #[test]
    fn test_parse_show_id() {
        assert_eq!(parse_show_id("t-42"), Ok(42));
        assert_eq!(parse_show_id("42"), Ok(42));
        assert_eq!(
            parse_show_id("t-abc"),
            Err(EmbedError::InvalidShowId("t-abc".into()))
        );
        assert!(parse_show_id("").is_err());
    }

    #[test]
    fn test_lifecycle() {
        let mut browser = EpisodeBrowser::new();
        assert_eq!(browser.state(), &BrowserState::Idle);

        browser.begin(42);
        assert!(browser.is_loading());
        assert!(browser.episodes().is_empty());

        browser.finish(Ok(vec![season(1, 3)]));
        assert_eq!(browser.selected_season(), 0);
        assert_eq!(browser.episodes().len(), 3);
    }

    #[test]
    fn test_select_season_no_fetch() {
        let mut browser = loaded();
        assert_eq!(browser.select_season(1), Ok(1));
        assert_eq!(browser.episodes().len(), 5);
    }

    #[test]
    fn test_select_season_clamped() {
        let mut browser = loaded();
        let err = browser.select_season(9).unwrap_err();
        assert_eq!(err, EmbedError::InvalidSelection { index: 9, len: 2 });
        assert_eq!(browser.selected_season(), 1);
    }

    #[test]
    fn test_step_season_saturates() {
        let mut browser = loaded();
        browser.step_season(-1);
        assert_eq!(browser.selected_season(), 0);
        browser.step_season(5);
        assert_eq!(browser.selected_season(), 1);
    }

    #[test]
    fn test_error_and_retry() {
        let mut browser = EpisodeBrowser::new();
        browser.begin(7);
        assert_eq!(browser.retry(), None);

        browser.finish(Err(EmbedError::FetchFailed("timeout".into())));
        assert!(browser.error().is_some());

        assert_eq!(browser.retry(), Some(7));
        assert!(browser.is_loading());
    }
}
