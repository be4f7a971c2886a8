//! Optional terminal colouring.

use colored::{Color, Colorize};

/// Colours text only when enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// A palette that never emits escape codes.
    pub fn plain() -> Self {
        Self::new(false)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn paint(&self, text: &str, color: Color) -> String {
        if self.enabled {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    pub fn add(&self, text: &str) -> String {
        self.paint(text, Color::Green)
    }

    pub fn update(&self, text: &str) -> String {
        self.paint(text, Color::Blue)
    }

    pub fn delete(&self, text: &str) -> String {
        self.paint(text, Color::Red)
    }

    pub fn complete(&self, text: &str) -> String {
        self.paint(text, Color::Magenta)
    }

    /// Bold red, for the top-level error line.
    pub fn error(&self, text: &str) -> String {
        if self.enabled {
            text.red().bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn faint(&self, text: &str) -> String {
        if self.enabled {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }
}
