//! Embed panel view
//!
//! Header with back hint and the two panel toggles, the player area with
//! its loading overlay, the episode and source panels drawn over the
//! player, and a status bar.

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, Paragraph, Wrap},
};

use crate::app::{App, Panel};
use crate::embed::{BrowserState, EmbedPhase};
use crate::models::Episode;
use crate::ui::Theme;

/// Rows taken by one episode card
const EPISODE_CARD_HEIGHT: u16 = 3;

/// Render the whole panel
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    frame.render_widget(Block::default().style(Theme::text()), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(5),    // Player + panels
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_header(frame, app, chunks[0]);
    render_player(frame, app, chunks[1]);

    match app.panel {
        Panel::Episodes => render_episodes(frame, app, panel_area(chunks[1])),
        Panel::Sources => render_sources(frame, app, panel_area(chunks[1])),
        Panel::None => {}
    }

    render_status_bar(frame, app, chunks[2]);
}

/// Panels hang from the top of the player and cover at most 75% of it
fn panel_area(body: Rect) -> Rect {
    let height = (body.height * 3 / 4).max(5).min(body.height);
    Rect {
        x: body.x + 1,
        y: body.y,
        width: body.width.saturating_sub(2),
        height,
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Theme::border());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(34)])
        .split(inner);

    let back = Line::from(vec![
        Span::styled(" ← ", Theme::title()),
        Span::styled("Back ", Theme::list_item()),
        Span::styled("[b]", Theme::keybind()),
    ]);
    frame.render_widget(Paragraph::new(back), cols[0]);

    let buttons = Line::from(vec![
        Span::styled(" Episodes [e] ", Theme::button(app.show_episodes())),
        Span::raw("  "),
        Span::styled(" Sources [s] ", Theme::button(app.show_sources())),
    ])
    .alignment(Alignment::Right);
    frame.render_widget(Paragraph::new(buttons), cols[1]);
}

fn render_player(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(Span::styled(" ▶ PLAYER ", Theme::title()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if app.player.opacity() > 0.0 {
            Theme::border_focused()
        } else {
            Theme::border()
        });
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = Vec::new();
    match app.player.phase() {
        EmbedPhase::Ready => {
            lines.push(Line::from(vec![
                Span::styled("● ", Theme::success()),
                Span::styled(app.embed_url().unwrap_or_default(), Theme::list_item()),
            ]));
            lines.push(Line::from(vec![
                Span::styled("Source: ", Theme::dimmed()),
                Span::styled(app.selected_source.display_name(), Theme::list_item()),
                Span::styled("   Type: ", Theme::dimmed()),
                Span::styled(app.props.media_type.to_string(), Theme::list_item()),
            ]));
            lines.push(Line::default());
            lines.push(Line::from(vec![
                Span::styled("[o] ", Theme::keybind()),
                Span::styled("open in browser", Theme::keybind_desc()),
            ]));
        }
        EmbedPhase::TimedOut => {
            lines.push(Line::styled("Embed did not load", Theme::error()));
            lines.push(Line::styled(
                app.embed_url().unwrap_or_default().to_string(),
                Theme::dimmed(),
            ));
            lines.push(Line::default());
            lines.push(Line::from(vec![
                Span::styled("[r] ", Theme::keybind()),
                Span::styled("retry   ", Theme::keybind_desc()),
                Span::styled("[s] ", Theme::keybind()),
                Span::styled("switch source", Theme::keybind_desc()),
            ]));
        }
        EmbedPhase::Blank => {
            let msg = match app.browser.state() {
                BrowserState::Loading => "Fetching episodes...",
                BrowserState::Error(_) => "Episodes unavailable",
                _ => "No embed selected",
            };
            lines.push(Line::styled(msg, Theme::dimmed()));
        }
        // Covered by the overlay
        EmbedPhase::Loading { .. } => {}
    }
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);

    if app.player.overlay_visible() {
        render_loading_overlay(frame, inner);
    }
}

fn render_loading_overlay(frame: &mut Frame, area: Rect) {
    let height = 3u16.min(area.height);
    let overlay = Rect {
        x: area.x,
        y: area.y + area.height.saturating_sub(height) / 2,
        width: area.width,
        height,
    };
    frame.render_widget(Clear, overlay);
    let text = vec![
        Line::styled("◢◤ LOADING ◢◤", Theme::loading()),
        Line::styled("waiting for the embed to respond", Theme::dimmed()),
    ];
    frame.render_widget(
        Paragraph::new(text).alignment(Alignment::Center),
        overlay,
    );
}

fn panel_block(title: &str) -> Block<'_> {
    Block::default()
        .title(Span::styled(title, Theme::title()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border_focused())
        .style(Style::default().bg(Theme::PANEL))
}

fn render_episodes(frame: &mut Frame, app: &App, area: Rect) {
    frame.render_widget(Clear, area);
    let block = panel_block(" EPISODES ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match app.browser.state() {
        BrowserState::Idle => {
            frame.render_widget(
                Paragraph::new(Line::styled("No episodes for this title", Theme::dimmed())),
                inner,
            );
        }
        BrowserState::Loading => {
            frame.render_widget(
                Paragraph::new(Line::styled("Loading seasons...", Theme::loading())),
                inner,
            );
        }
        BrowserState::Error(err) => {
            let mut lines = vec![Line::styled(err.to_string(), Theme::error())];
            if err.is_retryable() {
                lines.push(Line::from(vec![
                    Span::styled("[r] ", Theme::keybind()),
                    Span::styled("retry", Theme::keybind_desc()),
                ]));
            }
            frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
        }
        BrowserState::Loaded { seasons, selected } => {
            if seasons.is_empty() {
                frame.render_widget(
                    Paragraph::new(Line::styled("No seasons available", Theme::dimmed())),
                    inner,
                );
                return;
            }

            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(2), Constraint::Min(1)])
                .split(inner);

            let label = seasons
                .get(*selected)
                .map(|s| s.label())
                .unwrap_or_default();
            let selector = Line::from(vec![
                Span::styled("◀ ", Theme::keybind()),
                Span::styled(label, Theme::title()),
                Span::styled(" ▶", Theme::keybind()),
                Span::styled(
                    format!("   ({}/{})  [h/l] season", selected + 1, seasons.len()),
                    Theme::dimmed(),
                ),
            ]);
            frame.render_widget(Paragraph::new(selector), chunks[0]);

            render_episode_cards(frame, app, chunks[1]);
        }
    }
}

fn render_episode_cards(frame: &mut Frame, app: &App, area: Rect) {
    let episodes = app.browser.episodes();
    let visible = (area.height / EPISODE_CARD_HEIGHT).max(1) as usize;
    let selected = app.episode_list.selected;
    let start = if selected >= visible {
        selected + 1 - visible
    } else {
        0
    };

    let items: Vec<ListItem> = episodes
        .iter()
        .enumerate()
        .skip(start)
        .take(visible)
        .map(|(i, ep)| episode_card(ep, i == selected, area.width))
        .collect();

    frame.render_widget(List::new(items), area);
}

fn episode_card(ep: &Episode, selected: bool, width: u16) -> ListItem<'static> {
    let heading_style = if selected {
        Theme::list_item_selected()
    } else {
        Theme::list_item().add_modifier(Modifier::BOLD)
    };
    let overview = truncate(&ep.overview, width.saturating_sub(4) as usize);

    ListItem::new(vec![
        Line::styled(format!(" {}", ep.heading()), heading_style),
        Line::styled(format!("   {}", overview), Theme::dimmed()),
        Line::from(vec![
            Span::styled(format!("   {}", ep.rating_str()), Theme::rating()),
            Span::raw("   "),
            Span::styled(ep.runtime_str(), Theme::runtime()),
        ]),
    ])
}

fn render_sources(frame: &mut Frame, app: &App, area: Rect) {
    frame.render_widget(Clear, area);
    let block = panel_block(" SOURCES ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = app.sources.len().div_ceil(2).max(1);
    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(3); rows])
        .split(inner);

    for (i, source) in app.sources.iter().enumerate() {
        let Some(row) = row_areas.get(i / 2) else {
            break;
        };
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(*row);

        let active = source.kind == app.selected_source;
        let focused = i == app.source_list.selected;
        let card = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if focused {
                Theme::border_focused()
            } else {
                Theme::border()
            })
            .style(Theme::source_card(active));

        let label = Line::from(vec![
            Span::styled(format!("[{}] ", i + 1), Theme::keybind()),
            Span::raw(source.name.clone()),
        ])
        .alignment(Alignment::Center);

        frame.render_widget(Paragraph::new(label).block(card), cols[i % 2]);
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let line = match &app.status {
        Some(msg) => Line::styled(format!(" {}", msg), Theme::warning()),
        None => {
            let mut spans = vec![Span::styled(
                format!(" {} ", app.player.status_label()),
                Theme::title(),
            )];
            for (key, desc) in [
                ("e", "episodes"),
                ("s", "sources"),
                ("o", "open"),
                ("r", "retry"),
                ("q", "quit"),
            ] {
                spans.push(Span::styled(format!(" {} ", key), Theme::keybind()));
                spans.push(Span::styled(desc, Theme::keybind_desc()));
            }
            Line::from(spans)
        }
    };
    frame.render_widget(Paragraph::new(line).style(Theme::status_bar()), area);
}

/// Cut text to `max` characters, ending with an ellipsis when shortened
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept)
}
