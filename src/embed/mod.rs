//! Embed player panel building blocks
//!
//! - sources: source table and embed URL builders
//! - player: player shell load state
//! - browser: season/episode browser
//! - probe: load detection and opening embeds externally

pub mod browser;
pub mod player;
pub mod probe;
pub mod sources;

pub use browser::{load_seasons, parse_show_id, BrowserState, EpisodeBrowser};
pub use player::{EmbedPhase, PlayerShell};
pub use probe::{open_in_browser, EmbedProbe};
pub use sources::{source_options, EpisodeUrls};
