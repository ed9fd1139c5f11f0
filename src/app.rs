//! App state and core application logic
//!
//! The embed panel component: props in, view state, keyboard handling.
//! Async work is never run here. Operations return an [`Action`] for the
//! event loop to execute, and its results come back as [`AppEvent`]s.

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::{debug, info, warn};

use crate::embed::player::DEFAULT_LOAD_TIMEOUT;
use crate::embed::sources::DEFAULT_EMBED_HOST;
use crate::embed::{
    parse_show_id, source_options, EmbedPhase, EpisodeBrowser, EpisodeUrls, PlayerShell,
};
use crate::error::EmbedError;
use crate::models::*;

// =============================================================================
// Props, Actions and Events
// =============================================================================

/// Inputs the host hands to the panel
#[derive(Debug, Clone, Default)]
pub struct EmbedProps {
    /// Embed URL handed to the panel
    pub url: String,
    /// Movie or show identifier, e.g. `"99"` or `"t-42"`
    pub movie_id: Option<String>,
    pub media_type: MediaType,
}

impl EmbedProps {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn movie_id(mut self, id: impl Into<String>) -> Self {
        self.movie_id = Some(id.into());
        self
    }

    pub fn media_type(mut self, media_type: MediaType) -> Self {
        self.media_type = media_type;
        self
    }
}

/// Panel tunables, usually from the config file
#[derive(Debug, Clone)]
pub struct PanelSettings {
    pub load_timeout: Duration,
    pub embed_host: String,
    /// Open each embed in the system browser once it has loaded
    pub open_on_load: bool,
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            load_timeout: DEFAULT_LOAD_TIMEOUT,
            embed_host: DEFAULT_EMBED_HOST.to_string(),
            open_on_load: false,
        }
    }
}

/// Side effect requested by the panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Load an embed and report back with `EmbedLoaded { generation }`
    LoadEmbed { url: String, generation: u64 },
    /// Fetch all seasons and report back with `SeasonsLoaded { generation, .. }`
    FetchSeasons { show_id: u64, generation: u64 },
    /// Open a URL in the system browser
    OpenExternal(String),
    /// Leave the panel
    Back,
}

/// Result of async work, delivered to the panel
#[derive(Debug, Clone)]
pub enum AppEvent {
    EmbedLoaded {
        generation: u64,
    },
    SeasonsLoaded {
        generation: u64,
        result: Result<Vec<Season>, EmbedError>,
    },
    /// Informational message for the status bar
    Notice(String),
}

// =============================================================================
// Panels
// =============================================================================

/// Which overlay panel is open; at most one at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Panel {
    #[default]
    None,
    Episodes,
    Sources,
}

// =============================================================================
// Selection State (per-panel)
// =============================================================================

/// Cursor state for list panels
#[derive(Debug, Clone, Default)]
pub struct ListState {
    /// Currently selected index
    pub selected: usize,
    /// Total number of items
    pub len: usize,
}

impl ListState {
    pub fn new(len: usize) -> Self {
        Self { selected: 0, len }
    }

    pub fn up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn down(&mut self) {
        if self.len > 0 && self.selected < self.len - 1 {
            self.selected += 1;
        }
    }

    pub fn reset(&mut self, len: usize) {
        *self = Self::new(len);
    }
}

// =============================================================================
// Main Application State
// =============================================================================

#[derive(Debug)]
pub struct App {
    pub props: EmbedProps,
    /// Whether the event loop keeps running
    pub running: bool,
    /// Status bar message (errors and notices)
    pub status: Option<String>,

    pub panel: Panel,
    pub sources: Vec<SourceOption>,
    pub selected_source: SourceKind,
    pub source_list: ListState,
    pub episode_list: ListState,

    pub player: PlayerShell,
    pub browser: EpisodeBrowser,

    urls: EpisodeUrls,
    open_on_load: bool,
    fetch_generation: u64,
    mounted: bool,
}

impl App {
    pub fn new(props: EmbedProps) -> Self {
        Self::with_settings(props, PanelSettings::default())
    }

    pub fn with_settings(props: EmbedProps, settings: PanelSettings) -> Self {
        let sources = source_options(&props.url, props.movie_id.as_deref());
        let source_count = sources.len();
        Self {
            props,
            running: true,
            status: None,
            panel: Panel::None,
            sources,
            selected_source: SourceKind::default(),
            source_list: ListState::new(source_count),
            episode_list: ListState::default(),
            player: PlayerShell::new(settings.load_timeout),
            browser: EpisodeBrowser::new(),
            urls: EpisodeUrls::new(settings.embed_host),
            open_on_load: settings.open_on_load,
            fetch_generation: 0,
            mounted: false,
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Current navigation target of the player
    pub fn embed_url(&self) -> Option<&str> {
        self.player.url()
    }

    pub fn show_episodes(&self) -> bool {
        self.panel == Panel::Episodes
    }

    pub fn show_sources(&self) -> bool {
        self.panel == Panel::Sources
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Start the panel.
    ///
    /// Non-episodic content loads the given URL straight away. Episodic
    /// content fetches its seasons first; without a show id nothing loads.
    pub fn mount(&mut self) -> Option<Action> {
        self.mounted = true;
        info!(
            "mount: {} {} (id {:?})",
            self.props.media_type, self.props.url, self.props.movie_id
        );

        if !self.props.media_type.is_episodic() {
            let url = self.props.url.clone();
            return Some(self.load_embed(url));
        }

        let identifier = self.props.movie_id.clone()?;
        match parse_show_id(&identifier) {
            Ok(show_id) => Some(self.begin_fetch(show_id)),
            Err(e) => {
                self.set_error(&e);
                self.browser.finish(Err(e));
                None
            }
        }
    }

    /// Stop the panel. Results of in-flight work are discarded from now on.
    pub fn unmount(&mut self) {
        debug!("unmount");
        self.mounted = false;
        self.fetch_generation += 1;
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Leave the panel via the host navigation
    pub fn go_back(&mut self) -> Option<Action> {
        Some(Action::Back)
    }

    fn begin_fetch(&mut self, show_id: u64) -> Action {
        self.fetch_generation += 1;
        self.browser.begin(show_id);
        Action::FetchSeasons {
            show_id,
            generation: self.fetch_generation,
        }
    }

    fn load_embed(&mut self, url: String) -> Action {
        let generation = self.player.set_url(url.clone(), Instant::now());
        Action::LoadEmbed { url, generation }
    }

    fn set_error(&mut self, err: &EmbedError) {
        let hint = if err.is_retryable() { " [r] retry" } else { "" };
        self.status = Some(format!("{}{}", err, hint));
    }

    // -------------------------------------------------------------------------
    // Async results
    // -------------------------------------------------------------------------

    /// Apply the result of async work
    pub fn handle_event(&mut self, event: AppEvent) -> Option<Action> {
        if !self.mounted {
            debug!("discarding event after unmount: {:?}", event);
            return None;
        }

        match event {
            AppEvent::EmbedLoaded { generation } => {
                if !self.player.mark_loaded(generation) {
                    return None;
                }
                self.status = None;
                if self.open_on_load {
                    return self.player.url().map(|u| Action::OpenExternal(u.to_string()));
                }
                None
            }
            AppEvent::SeasonsLoaded { generation, result } => {
                if generation != self.fetch_generation {
                    debug!(
                        "discarding season load #{} (current #{})",
                        generation, self.fetch_generation
                    );
                    return None;
                }
                if let Err(e) = &result {
                    self.set_error(e);
                }
                self.browser.finish(result);
                self.episode_list.reset(self.browser.episodes().len());

                let show_id = self.browser.show_id()?;
                if self.browser.seasons().is_empty() {
                    return None;
                }
                let url = self.urls.default_episode(show_id);
                Some(self.load_embed(url))
            }
            AppEvent::Notice(msg) => {
                self.status = Some(msg);
                None
            }
        }
    }

    /// Periodic update; moves a stalled embed into the timed-out state
    pub fn tick(&mut self, now: Instant) {
        if let Some(err) = self.player.check_timeout(now) {
            self.set_error(&err);
        }
    }

    // -------------------------------------------------------------------------
    // User operations
    // -------------------------------------------------------------------------

    /// Toggle the episode panel; always closes the source panel
    pub fn toggle_episodes(&mut self) {
        self.panel = if self.panel == Panel::Episodes {
            Panel::None
        } else {
            Panel::Episodes
        };
    }

    /// Toggle the source panel; always closes the episode panel
    pub fn toggle_sources(&mut self) {
        self.panel = if self.panel == Panel::Sources {
            Panel::None
        } else {
            Panel::Sources
        };
    }

    /// Switch to a source by table index
    pub fn select_source(&mut self, index: usize) -> Option<Action> {
        let option = self.sources.get(index)?;
        let kind = option.kind;
        let url = option.url_or(&self.props.url).to_string();
        info!("source -> {} ({})", kind, url);

        self.selected_source = kind;
        self.source_list.selected = index;
        Some(self.load_embed(url))
    }

    /// Show another season's episodes; no fetch
    pub fn select_season(&mut self, index: usize) {
        if let Err(e) = self.browser.select_season(index) {
            warn!("{}", e);
        }
        self.episode_list.reset(self.browser.episodes().len());
    }

    /// Play an episode of the selected season
    pub fn select_episode(&mut self, index: usize) -> Option<Action> {
        let episode = self.browser.episodes().get(index)?;
        let url = self.urls.for_episode(episode);
        info!("episode -> {}", episode.heading());

        self.episode_list.selected = index;
        Some(self.load_embed(url))
    }

    /// Retry whatever failed: the season fetch first, then a stalled embed
    pub fn retry(&mut self) -> Option<Action> {
        if let Some(show_id) = self.browser.retry() {
            self.status = None;
            return Some(self.begin_fetch(show_id));
        }
        if self.player.phase() == EmbedPhase::TimedOut {
            let (url, generation) = self.player.retry(Instant::now())?;
            self.status = None;
            return Some(Action::LoadEmbed { url, generation });
        }
        None
    }

    /// Open the active embed in the system browser
    pub fn open_external(&self) -> Option<Action> {
        self.player.url().map(|u| Action::OpenExternal(u.to_string()))
    }

    // -------------------------------------------------------------------------
    // Keyboard Event Handling
    // -------------------------------------------------------------------------

    /// Handle a key press, returning any side effect to run
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return None;
        }

        match key.code {
            KeyCode::Char('q') => {
                self.quit();
                None
            }
            KeyCode::Esc if self.panel != Panel::None => {
                self.panel = Panel::None;
                None
            }
            KeyCode::Esc | KeyCode::Char('b') | KeyCode::Backspace => self.go_back(),
            KeyCode::Char('e') => {
                self.toggle_episodes();
                None
            }
            KeyCode::Char('s') => {
                self.toggle_sources();
                None
            }
            KeyCode::Char('r') => self.retry(),
            KeyCode::Char('o') => self.open_external(),
            _ => match self.panel {
                Panel::Episodes => self.handle_episodes_key(key),
                Panel::Sources => self.handle_sources_key(key),
                Panel::None => None,
            },
        }
    }

    fn handle_episodes_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.episode_list.up();
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.episode_list.down();
                None
            }
            KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('[') => {
                self.browser.step_season(-1);
                self.episode_list.reset(self.browser.episodes().len());
                None
            }
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(']') => {
                self.browser.step_season(1);
                self.episode_list.reset(self.browser.episodes().len());
                None
            }
            KeyCode::Enter => self.select_episode(self.episode_list.selected),
            _ => None,
        }
    }

    fn handle_sources_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.source_list.up();
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.source_list.down();
                None
            }
            KeyCode::Enter => self.select_source(self.source_list.selected),
            KeyCode::Char(c @ '1'..='9') => {
                let idx = (c as usize) - ('1' as usize);
                self.select_source(idx)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_list_state_navigation() {
        let mut list = ListState::new(3);
        list.up();
        assert_eq!(list.selected, 0);
        list.down();
        list.down();
        list.down();
        assert_eq!(list.selected, 2);
        list.reset(1);
        assert_eq!(list.selected, 0);
        list.down();
        assert_eq!(list.selected, 0);
    }

    #[test]
    fn test_mount_movie_loads_url() {
        let mut app = App::new(EmbedProps::new("https://x/v2/embed/movie/1"));
        let action = app.mount();
        assert_eq!(
            action,
            Some(Action::LoadEmbed {
                url: "https://x/v2/embed/movie/1".into(),
                generation: 1
            })
        );
        assert!(app.player.overlay_visible());
    }

    #[test]
    fn test_mount_episodic_without_id_does_nothing() {
        let mut app = App::new(EmbedProps::new("u").media_type(MediaType::Anime));
        assert_eq!(app.mount(), None);
        assert!(app.embed_url().is_none());
    }

    #[test]
    fn test_mount_episodic_invalid_id() {
        let mut app = App::new(
            EmbedProps::new("u")
                .media_type(MediaType::Anime)
                .movie_id("t-x"),
        );
        assert_eq!(app.mount(), None);
        assert!(app.browser.error().is_some());
        assert!(app.status.is_some());
    }

    #[test]
    fn test_number_keys_ignored_without_sources_panel() {
        let mut app = App::new(EmbedProps::new("u"));
        assert_eq!(app.handle_key(key(KeyCode::Char('2'))), None);
        assert_eq!(app.selected_source, SourceKind::VidSrcApi1);
    }
}
