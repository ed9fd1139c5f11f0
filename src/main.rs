//! EmbedTUI - Cyberpunk TUI for third-party video embeds
//!
//! # Usage
//!
//! ```bash
//! # Interactive panel
//! embedtui watch https://vidsrc.cc/v2/embed/movie/99 --movie-id 99
//! embedtui watch https://vidsrc.cc/v2/embed/tv/42 --movie-id t-42 -t anime
//!
//! # CLI mode (for automation)
//! embedtui sources https://vidsrc.cc/v2/embed/movie/99 -m 99 --json
//! embedtui episodes t-42
//! ```

use std::fs::OpenOptions;
use std::io::{stdout, Stdout};
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{debug, info, warn, LevelFilter};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinSet;

use embedtui::api::TmdbClient;
use embedtui::app::{Action, App, AppEvent};
use embedtui::cli::{Cli, Command, ExitCode, Output, WatchCmd};
use embedtui::commands;
use embedtui::config::Config;
use embedtui::embed::{load_seasons, open_in_browser, EmbedProbe};
use embedtui::error::EmbedError;
use embedtui::ui;

/// Terminal type alias for convenience
type Tui = Terminal<CrosstermBackend<Stdout>>;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(&cli);
    let level = cli.log_level();
    let tui_mode = !cli.is_cli_mode();

    init_logging(level, tui_mode);

    let config = match Config::resolve(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            let code = output.error(format!("{:#}", e), ExitCode::InvalidArgs);
            std::process::exit(code.into());
        }
    };

    match cli.command {
        Command::Watch(cmd) => run_tui(cmd, config).await,
        command => {
            let exit_code = run_cli(command, &config, &output).await;
            std::process::exit(exit_code.into());
        }
    }
}

/// Log to stderr in CLI mode; to a file in TUI mode so the screen stays clean
fn init_logging(level: LevelFilter, tui_mode: bool) {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level)
        .parse_default_env()
        .format_target(false);

    if tui_mode {
        let file = dirs::cache_dir()
            .map(|d| d.join("embedtui"))
            .and_then(|dir| {
                std::fs::create_dir_all(&dir).ok()?;
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(dir.join("embedtui.log"))
                    .ok()
            });
        match file {
            Some(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            None => {
                builder.filter_level(LevelFilter::Off);
            }
        }
    }

    builder.init();
}

/// Run CLI command and return exit code
async fn run_cli(command: Command, config: &Config, output: &Output) -> ExitCode {
    match command {
        Command::Sources(cmd) => commands::sources_cmd(cmd, output),
        Command::Episodes(cmd) => commands::episodes_cmd(cmd, config, output).await,
        Command::EpisodeUrl(cmd) => commands::episode_url_cmd(cmd, config, output),
        // Handled by run_tui
        Command::Watch(_) => ExitCode::Success,
    }
}

// =============================================================================
// TUI Mode
// =============================================================================

/// Initialize the terminal for TUI mode
fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state
fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Executes panel actions as background tasks scoped to the panel's lifetime
struct Effects {
    client: Option<TmdbClient>,
    missing_key: Option<String>,
    probe: EmbedProbe,
    probe_embeds: bool,
    tx: UnboundedSender<AppEvent>,
    tasks: JoinSet<()>,
}

impl Effects {
    fn new(config: &Config, probe_embeds: bool, tx: UnboundedSender<AppEvent>) -> Self {
        let (client, missing_key) = match config.tmdb_api_key() {
            Ok(key) => (
                Some(TmdbClient::with_base_url(key, &config.tmdb_base_url)),
                None,
            ),
            Err(e) => (None, Some(e.to_string())),
        };
        Self {
            client,
            missing_key,
            probe: EmbedProbe::new(config.load_timeout()),
            probe_embeds,
            tx,
            tasks: JoinSet::new(),
        }
    }

    fn run(&mut self, action: Action, app: &mut App) {
        debug!("action: {:?}", action);
        match action {
            Action::LoadEmbed { url, generation } => {
                if !self.probe_embeds {
                    let _ = self.tx.send(AppEvent::EmbedLoaded { generation });
                    return;
                }
                let probe = self.probe.clone();
                let tx = self.tx.clone();
                self.tasks.spawn(async move {
                    match probe.probe(&url).await {
                        Ok(_) => {
                            let _ = tx.send(AppEvent::EmbedLoaded { generation });
                        }
                        // No load event; the panel reports the timeout
                        Err(e) => warn!("{}", e),
                    }
                });
            }
            Action::FetchSeasons {
                show_id,
                generation,
            } => {
                let Some(client) = self.client.clone() else {
                    let msg = self.missing_key.clone().unwrap_or_default();
                    let _ = self.tx.send(AppEvent::SeasonsLoaded {
                        generation,
                        result: Err(EmbedError::FetchFailed(msg)),
                    });
                    return;
                };
                let tx = self.tx.clone();
                self.tasks.spawn(async move {
                    let result = load_seasons(&client, show_id).await;
                    let _ = tx.send(AppEvent::SeasonsLoaded { generation, result });
                });
            }
            Action::OpenExternal(url) => {
                let tx = self.tx.clone();
                self.tasks.spawn(async move {
                    if let Err(e) = open_in_browser(&url).await {
                        let _ = tx.send(AppEvent::Notice(e.to_string()));
                    }
                });
            }
            Action::Back => app.quit(),
        }
    }

    /// Drop finished task handles
    fn reap(&mut self) {
        while let Some(result) = self.tasks.try_join_next() {
            if let Err(e) = result {
                if !e.is_cancelled() {
                    warn!("background task failed: {}", e);
                }
            }
        }
    }

    /// Cancel everything still in flight
    fn shutdown(&mut self) {
        self.tasks.abort_all();
    }
}

/// Run interactive TUI
async fn run_tui(cmd: WatchCmd, config: Config) -> Result<()> {
    let mut settings = config.panel_settings();
    settings.open_on_load |= cmd.open;
    let probe_embeds = config.probe_embeds && !cmd.no_probe;

    let (tx, rx) = mpsc::unbounded_channel();
    let mut effects = Effects::new(&config, probe_embeds, tx);
    let mut app = App::with_settings(cmd.props(), settings);

    let mut terminal = init_terminal()?;

    let result = run_event_loop(&mut terminal, &mut app, &mut effects, rx).await;

    // Late results are discarded by the panel and the tasks are aborted
    app.unmount();
    effects.shutdown();

    // Always restore terminal, even on error
    restore_terminal(&mut terminal)?;

    result
}

/// Main event loop - handles input, applies async results, renders UI
async fn run_event_loop(
    terminal: &mut Tui,
    app: &mut App,
    effects: &mut Effects,
    mut rx: UnboundedReceiver<AppEvent>,
) -> Result<()> {
    const TICK_RATE: Duration = Duration::from_millis(100);

    info!("panel started");
    if let Some(action) = app.mount() {
        effects.run(action, app);
    }

    while app.running {
        terminal.draw(|frame| ui::render(frame, app))?;

        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (ignore releases on Windows)
                if key.kind == KeyEventKind::Press {
                    if let Some(action) = app.handle_key(key) {
                        effects.run(action, app);
                    }
                }
            }
        }

        while let Ok(event) = rx.try_recv() {
            if let Some(action) = app.handle_event(event) {
                effects.run(action, app);
            }
        }

        app.tick(Instant::now());
        effects.reap();
    }

    info!("panel closed");
    Ok(())
}
