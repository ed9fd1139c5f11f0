//! Rendering tests for the embed panel
//!
//! Renders `App` into a `TestBackend` and checks the visible text.
//!
//! ## Test Cases
//! - test_loading_overlay: overlay while the embed loads, gone once ready
//! - test_episode_panel_*: loading, error and loaded views
//! - test_source_panel: all four sources listed
//! - test_layout_sizes: renders at 80x24 (min) and 200x50 (large)

use embedtui::app::{Action, App, AppEvent, EmbedProps};
use embedtui::error::EmbedError;
use embedtui::models::{Episode, MediaType, Season};
use embedtui::ui;
use ratatui::{backend::TestBackend, Terminal};

fn draw(app: &App, width: u16, height: u16) -> String {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(|frame| ui::render(frame, app)).unwrap();

    let buffer = terminal.backend().buffer();
    let mut text = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            text.push_str(buffer[(x, y)].symbol());
        }
        text.push('\n');
    }
    text
}

fn anime_app() -> (App, u64) {
    let mut app = App::new(
        EmbedProps::new("https://x/v2/embed/tv/42")
            .movie_id("t-42")
            .media_type(MediaType::Anime),
    );
    let Some(Action::FetchSeasons { generation, .. }) = app.mount() else {
        panic!("expected a season fetch");
    };
    (app, generation)
}

fn season(number: u32) -> Season {
    Season {
        id: number as u64,
        season_number: number,
        name: Some(format!("Season {}", number)),
        episodes: vec![Episode {
            id: 1,
            show_id: 42,
            episode_number: 1,
            name: "The Journey's End".into(),
            overview: "The party returns home.".into(),
            still_path: None,
            vote_average: 8.6,
            runtime: Some(24),
        }],
    }
}

#[test]
fn test_loading_overlay() {
    let mut app = App::new(EmbedProps::new("https://x/v2/embed/foo").movie_id("99"));
    let Some(Action::LoadEmbed { generation, .. }) = app.mount() else {
        panic!("expected LoadEmbed");
    };

    let screen = draw(&app, 100, 30);
    assert!(screen.contains("LOADING"));
    assert!(screen.contains("PLAYER"));
    assert!(screen.contains("Episodes [e]"));
    assert!(screen.contains("Sources [s]"));
    assert!(screen.contains("Back"));

    app.handle_event(AppEvent::EmbedLoaded { generation });
    let screen = draw(&app, 100, 30);
    assert!(!screen.contains("LOADING"));
    assert!(screen.contains("https://x/v2/embed/foo"));
    assert!(screen.contains("open in browser"));
}

#[test]
fn test_episode_panel_loading() {
    let (mut app, _) = anime_app();
    app.toggle_episodes();
    let screen = draw(&app, 100, 30);
    assert!(screen.contains("EPISODES"));
    assert!(screen.contains("Loading seasons"));
}

#[test]
fn test_episode_panel_error() {
    let (mut app, generation) = anime_app();
    app.handle_event(AppEvent::SeasonsLoaded {
        generation,
        result: Err(EmbedError::FetchFailed("connection refused".into())),
    });
    app.toggle_episodes();

    let screen = draw(&app, 100, 30);
    assert!(screen.contains("connection refused"));
    assert!(screen.contains("retry"));
}

#[test]
fn test_episode_panel_loaded() {
    let (mut app, generation) = anime_app();
    app.handle_event(AppEvent::SeasonsLoaded {
        generation,
        result: Ok(vec![season(1), season(2)]),
    });
    app.toggle_episodes();

    let screen = draw(&app, 100, 30);
    assert!(screen.contains("Season 1"));
    assert!(screen.contains("(1/2)"));
    assert!(screen.contains("EP 1: The Journey's End"));
    assert!(screen.contains("24m"));
}

#[test]
fn test_source_panel() {
    let mut app = App::new(EmbedProps::new("https://x/v2/embed/foo").movie_id("99"));
    app.mount();
    app.toggle_sources();

    let screen = draw(&app, 100, 30);
    assert!(screen.contains("SOURCES"));
    for name in ["VidSrc (API1)", "VidSrc (API2)", "VidRock", "Vidzee"] {
        assert!(screen.contains(name), "missing source {}", name);
    }
    assert!(!screen.contains("EPISODES"));
}

#[test]
fn test_status_bar_shows_errors() {
    let (mut app, generation) = anime_app();
    app.handle_event(AppEvent::SeasonsLoaded {
        generation,
        result: Err(EmbedError::FetchFailed("timeout".into())),
    });
    let screen = draw(&app, 100, 30);
    assert!(screen.contains("[r] retry"));
}

#[test]
fn test_layout_sizes() {
    let (mut app, generation) = anime_app();
    app.handle_event(AppEvent::SeasonsLoaded {
        generation,
        result: Ok(vec![season(1)]),
    });
    app.toggle_episodes();

    // Neither size may panic
    draw(&app, 80, 24);
    draw(&app, 200, 50);
}
