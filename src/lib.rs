//! EmbedTUI - Cyberpunk TUI for third-party video embeds
//!
//! A neon-soaked terminal panel for video embeds: switch embed sources,
//! browse seasons and episodes, and open the active embed in a browser.
//!
//! # Modules
//!
//! - `models` - Shows, seasons, episodes, media types and embed sources
//! - `api` - TMDB metadata client
//! - `embed` - Source table, player shell, episode browser, embed probing
//! - `app` - The panel component: view state and key handling
//! - `ui` - TUI rendering
//! - `cli` / `commands` - Command line interface
//! - `config` - Config file and API key lookup

pub mod api;
pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod embed;
pub mod error;
pub mod models;
pub mod ui;

// Re-export commonly used types
pub use models::{Episode, MediaType, Season, SeasonSummary, Show, SourceKind, SourceOption};

pub use api::TmdbClient;
pub use app::{Action, App, AppEvent, EmbedProps, Panel};
pub use error::EmbedError;
