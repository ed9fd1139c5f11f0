//! Player shell
//!
//! Holds the current embed URL and whether it has finished loading.
//! Every URL assignment bumps a generation; load events carry the
//! generation they were issued for so late events for an old URL are
//! dropped.

use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::error::EmbedError;

/// Default bound on how long an embed may take to load
pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Load phase of the current embed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedPhase {
    /// Nothing assigned yet
    Blank,
    /// URL assigned, waiting for the load event
    Loading { since: Instant },
    /// Load event received
    Ready,
    /// Load event never came within the bound
    TimedOut,
}

#[derive(Debug, Clone)]
pub struct PlayerShell {
    url: Option<String>,
    phase: EmbedPhase,
    generation: u64,
    load_timeout: Duration,
}

impl Default for PlayerShell {
    fn default() -> Self {
        Self::new(DEFAULT_LOAD_TIMEOUT)
    }
}

impl PlayerShell {
    pub fn new(load_timeout: Duration) -> Self {
        Self {
            url: None,
            phase: EmbedPhase::Blank,
            generation: 0,
            load_timeout,
        }
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn phase(&self) -> EmbedPhase {
        self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn load_timeout(&self) -> Duration {
        self.load_timeout
    }

    /// Point the player at a new URL and re-arm the loading overlay.
    /// Returns the generation the matching load event must carry.
    pub fn set_url(&mut self, url: impl Into<String>, now: Instant) -> u64 {
        let url = url.into();
        self.generation += 1;
        debug!("embed #{} -> {}", self.generation, url);
        self.url = Some(url);
        self.phase = EmbedPhase::Loading { since: now };
        self.generation
    }

    /// Apply a load event. Returns false for stale generations.
    pub fn mark_loaded(&mut self, generation: u64) -> bool {
        if generation != self.generation || self.url.is_none() {
            debug!(
                "ignoring load event #{} (current #{})",
                generation, self.generation
            );
            return false;
        }
        self.phase = EmbedPhase::Ready;
        true
    }

    /// Move a stalled load into `TimedOut`.
    ///
    /// Returns the error only on the transition, so callers can report it once.
    pub fn check_timeout(&mut self, now: Instant) -> Option<EmbedError> {
        let EmbedPhase::Loading { since } = self.phase else {
            return None;
        };
        if now.saturating_duration_since(since) < self.load_timeout {
            return None;
        }
        self.phase = EmbedPhase::TimedOut;
        let url = self.url.clone().unwrap_or_default();
        warn!("embed load timed out: {}", url);
        Some(EmbedError::EmbedLoadTimeout {
            url,
            timeout: self.load_timeout,
        })
    }

    /// Reload the current URL. Returns the URL and its new generation.
    pub fn retry(&mut self, now: Instant) -> Option<(String, u64)> {
        let url = self.url.clone()?;
        let generation = self.set_url(url.clone(), now);
        Some((url, generation))
    }

    /// The loading overlay shows from assignment until the load event
    pub fn overlay_visible(&self) -> bool {
        matches!(self.phase, EmbedPhase::Loading { .. })
    }

    /// Opacity of the embed: hidden until it has loaded
    pub fn opacity(&self) -> f32 {
        if self.phase == EmbedPhase::Ready {
            1.0
        } else {
            0.0
        }
    }

    /// Short status label for the status bar
    pub fn status_label(&self) -> &'static str {
        match self.phase {
            EmbedPhase::Blank => "No embed",
            EmbedPhase::Loading { .. } => "Loading",
            EmbedPhase::Ready => "Ready",
            EmbedPhase::TimedOut => "Timed out",
        }
    }
}
