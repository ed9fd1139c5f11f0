//! CLI - Command Line Interface for EmbedTUI
//!
//! `watch` opens the interactive panel. Every other subcommand is
//! scriptable and prints JSON-parseable output.
//!
//! # Examples
//!
//! ```bash
//! # Open the panel for a movie embed
//! embedtui watch https://vidsrc.cc/v2/embed/movie/99 --movie-id 99
//!
//! # Browse an anime's episodes
//! embedtui watch https://vidsrc.cc/v2/embed/tv/42 --movie-id t-42 -t anime
//!
//! # Scripting
//! embedtui sources https://vidsrc.cc/v2/embed/movie/99 --movie-id 99 --json
//! embedtui episodes t-42
//! embedtui episode-url 42 5
//! ```

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::app::EmbedProps;
use crate::models::MediaType;

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    /// General error
    Error = 1,
    InvalidArgs = 2,
    NetworkError = 3,
    /// Show, season or episode not found
    NotFound = 4,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// EmbedTUI - Cyberpunk TUI for third-party video embeds
#[derive(Parser, Debug)]
#[command(
    name = "embedtui",
    version,
    author = "Gorka & Hermes",
    about = "Cyberpunk TUI for browsing and switching video embeds",
    long_about = "A neon-soaked terminal panel for video embeds: switch between \
                  embed sources, browse seasons and episodes, and open the \
                  active embed in your browser.",
    after_help = "EXAMPLES:\n\
                  embedtui watch <URL> --movie-id 99          Movie embed\n\
                  embedtui watch <URL> --movie-id t-42 -t anime   Episode browser\n\
                  embedtui sources <URL> --movie-id 99 --json  Source table\n\
                  embedtui episode-url 42 5                   Episode embed URL"
)]
pub struct Cli {
    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Check if running in CLI mode (anything but the interactive panel)
    pub fn is_cli_mode(&self) -> bool {
        !matches!(self.command, Command::Watch(_))
    }

    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }

    /// Log level for the verbosity count; warnings are always shown
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Open the interactive embed panel
    #[command(visible_alias = "w")]
    Watch(WatchCmd),

    /// Print the embed source table for a URL
    #[command(visible_alias = "src")]
    Sources(SourcesCmd),

    /// Fetch all seasons of a show with their episode embed URLs
    #[command(visible_alias = "ep")]
    Episodes(EpisodesCmd),

    /// Print the embed URL of one episode
    EpisodeUrl(EpisodeUrlCmd),
}

/// Media type accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MediaTypeArg {
    Movie,
    #[value(alias = "series")]
    Tv,
    Anime,
}

impl From<MediaTypeArg> for MediaType {
    fn from(arg: MediaTypeArg) -> Self {
        match arg {
            MediaTypeArg::Movie => MediaType::Movie,
            MediaTypeArg::Tv => MediaType::Tv,
            MediaTypeArg::Anime => MediaType::Anime,
        }
    }
}

// =============================================================================
// Watch Command
// =============================================================================

/// Open the panel for an embed URL
#[derive(Args, Debug)]
pub struct WatchCmd {
    /// Embed URL to start from
    #[arg(required = true)]
    pub url: String,

    /// Movie or show id (show ids may carry a "t-" prefix)
    #[arg(long, short = 'm')]
    pub movie_id: Option<String>,

    /// Media type; tv and anime enable the episode browser
    #[arg(long, short = 't', value_enum)]
    pub media_type: Option<MediaTypeArg>,

    /// Treat embeds as loaded immediately instead of probing them
    #[arg(long)]
    pub no_probe: bool,

    /// Open each loaded embed in the system browser
    #[arg(long, short = 'o')]
    pub open: bool,
}

impl WatchCmd {
    pub fn props(&self) -> EmbedProps {
        EmbedProps {
            url: self.url.clone(),
            movie_id: self.movie_id.clone(),
            media_type: self.media_type.map(MediaType::from).unwrap_or_default(),
        }
    }
}

// =============================================================================
// Scripting Commands
// =============================================================================

/// Print the source table
#[derive(Args, Debug)]
pub struct SourcesCmd {
    /// Embed URL to start from
    #[arg(required = true)]
    pub url: String,

    /// Movie id used by the third-party sources
    #[arg(long, short = 'm')]
    pub movie_id: Option<String>,
}

/// Fetch seasons and episodes
#[derive(Args, Debug)]
pub struct EpisodesCmd {
    /// Show id, e.g. 42 or t-42
    #[arg(required = true)]
    pub show_id: String,

    /// Only print this season number
    #[arg(long, short = 's')]
    pub season: Option<u32>,
}

/// Build one episode URL
#[derive(Args, Debug)]
pub struct EpisodeUrlCmd {
    /// Show id, e.g. 42 or t-42
    #[arg(required = true)]
    pub show_id: String,

    /// Episode number; omit for the show default (episode 1, autoplay off)
    pub episode: Option<u32>,
}

// =============================================================================
// JSON Output Types
// =============================================================================

/// Generic JSON output wrapper with status
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            exit_code: 0,
        }
    }
}

impl JsonOutput<()> {
    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
            exit_code: code.into(),
        }
    }
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Output handler for consistent formatting
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print success data
    pub fn print<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(&JsonOutput::success(data))?);
        } else {
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        Ok(())
    }

    /// Print a bare line (plain-text results such as a single URL)
    pub fn line(&self, text: &str) {
        println!("{}", text);
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonOutput::<()>::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print info message (suppressed in quiet and JSON mode)
    pub fn info(&self, msg: impl std::fmt::Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
