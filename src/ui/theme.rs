//! Cyberpunk neon theme for EmbedTUI
//!
//! Color palette and style helpers for the panel.

use ratatui::style::{Color, Modifier, Style};

/// Cyberpunk neon color palette
pub struct Theme;

impl Theme {
    // ═══════════════════════════════════════════════════════════════════════
    // CORE PALETTE
    // ═══════════════════════════════════════════════════════════════════════

    /// Background: #0a0a0f (deep black-blue)
    pub const BACKGROUND: Color = Color::Rgb(0x0a, 0x0a, 0x0f);

    /// Primary: #00fff2 (cyan neon)
    pub const PRIMARY: Color = Color::Rgb(0x00, 0xff, 0xf2);

    /// Secondary: #ff00ff (magenta)
    pub const SECONDARY: Color = Color::Rgb(0xff, 0x00, 0xff);

    /// Accent: #ffff00 (yellow)
    pub const ACCENT: Color = Color::Rgb(0xff, 0xff, 0x00);

    /// Active source: #2563eb (blue)
    pub const ACTIVE: Color = Color::Rgb(0x25, 0x63, 0xeb);

    /// Text: #e0e0e0 (soft white)
    pub const TEXT: Color = Color::Rgb(0xe0, 0xe0, 0xe0);

    /// Dim: #808090 (muted, readable on the panel background)
    pub const DIM: Color = Color::Rgb(0x80, 0x80, 0x90);

    pub const SUCCESS: Color = Color::Rgb(0x00, 0xff, 0x00);
    pub const WARNING: Color = Color::Rgb(0xff, 0xaa, 0x00);
    pub const ERROR: Color = Color::Rgb(0xff, 0x00, 0x40);

    /// Panel background (the translucent black overlay)
    pub const PANEL: Color = Color::Rgb(0x14, 0x14, 0x1e);

    /// Border color (dim cyan)
    pub const BORDER: Color = Color::Rgb(0x00, 0x80, 0x78);

    // ═══════════════════════════════════════════════════════════════════════
    // STYLE HELPERS
    // ═══════════════════════════════════════════════════════════════════════

    pub fn text() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND)
    }

    pub fn title() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn dimmed() -> Style {
        Style::default().fg(Self::DIM)
    }

    pub fn error() -> Style {
        Style::default()
            .fg(Self::ERROR)
            .add_modifier(Modifier::BOLD)
    }

    pub fn success() -> Style {
        Style::default()
            .fg(Self::SUCCESS)
            .add_modifier(Modifier::BOLD)
    }

    pub fn warning() -> Style {
        Style::default()
            .fg(Self::WARNING)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    /// Focused border (glowing effect)
    pub fn border_focused() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Header toggle button, open or closed
    pub fn button(open: bool) -> Style {
        if open {
            Style::default()
                .fg(Self::BACKGROUND)
                .bg(Self::PRIMARY)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .fg(Self::TEXT)
                .bg(Self::PANEL)
                .add_modifier(Modifier::BOLD)
        }
    }

    /// Source card; the active source is filled blue
    pub fn source_card(active: bool) -> Style {
        if active {
            Style::default()
                .fg(Color::White)
                .bg(Self::ACTIVE)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Self::TEXT).bg(Self::PANEL)
        }
    }

    pub fn list_item() -> Style {
        Style::default().fg(Self::TEXT)
    }

    /// Cursor row in a list panel
    pub fn list_item_selected() -> Style {
        Style::default()
            .fg(Self::BACKGROUND)
            .bg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn keybind() -> Style {
        Style::default().fg(Self::ACCENT)
    }

    pub fn keybind_desc() -> Style {
        Style::default().fg(Self::DIM)
    }

    pub fn status_bar() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::PANEL)
    }

    /// Loading overlay text
    pub fn loading() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn rating() -> Style {
        Style::default().fg(Self::ACCENT)
    }

    pub fn runtime() -> Style {
        Style::default().fg(Self::SECONDARY)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// COLOR UTILITIES
// ═══════════════════════════════════════════════════════════════════════════

/// Relative luminance, https://www.w3.org/TR/WCAG20/#relativeluminancedef
pub fn relative_luminance(r: u8, g: u8, b: u8) -> f64 {
    fn channel(c: u8) -> f64 {
        let c = c as f64 / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }

    0.2126 * channel(r) + 0.7152 * channel(g) + 0.0722 * channel(b)
}

/// Contrast ratio between two colors, from 1 (same) to 21 (black/white)
pub fn contrast_ratio(fg: (u8, u8, u8), bg: (u8, u8, u8)) -> f64 {
    let l1 = relative_luminance(fg.0, fg.1, fg.2);
    let l2 = relative_luminance(bg.0, bg.1, bg.2);
    let (lighter, darker) = if l1 > l2 { (l1, l2) } else { (l2, l1) };
    (lighter + 0.05) / (darker + 0.05)
}

/// Extract RGB tuple from ratatui Color (only works for Rgb variant)
pub fn color_to_rgb(color: Color) -> Option<(u8, u8, u8)> {
    match color {
        Color::Rgb(r, g, b) => Some((r, g, b)),
        _ => None,
    }
}
