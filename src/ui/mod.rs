//! Terminal UI components
//!
//! Built with ratatui for a cyberpunk neon aesthetic.
//! Keyboard-first navigation throughout.

pub mod panel;
pub mod theme;

pub use panel::render;
pub use theme::Theme;
