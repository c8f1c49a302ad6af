//! Dashboard themes
//!
//! Three palettes, chosen through [`ThemeKind`] and handed to widgets
//! explicitly. There is no global "current theme".

use std::fmt;
use std::str::FromStr;

use ratatui::style::{Color, Modifier, Style};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ThemeError {
    #[error("Unknown theme: {0}. Use green/amber/cyber")]
    Unknown(String),
}

/// The selectable themes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeKind {
    #[default]
    Green,
    Amber,
    Cyberpunk,
}

impl ThemeKind {
    pub const ALL: [ThemeKind; 3] = [ThemeKind::Green, ThemeKind::Amber, ThemeKind::Cyberpunk];

    /// Next theme in display order (wraps)
    pub fn cycle(self) -> Self {
        match self {
            ThemeKind::Green => ThemeKind::Amber,
            ThemeKind::Amber => ThemeKind::Cyberpunk,
            ThemeKind::Cyberpunk => ThemeKind::Green,
        }
    }

    /// Canonical name, as written to the config file
    pub fn name(self) -> &'static str {
        self.theme().name
    }

    /// Palette for this theme
    pub fn theme(self) -> Theme {
        match self {
            ThemeKind::Green => CRT_GREEN,
            ThemeKind::Amber => CRT_AMBER,
            ThemeKind::Cyberpunk => CYBERPUNK,
        }
    }
}

impl FromStr for ThemeKind {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "green" | "phosphor" | "phosphor-green" => Ok(ThemeKind::Green),
            "amber" | "orange" => Ok(ThemeKind::Amber),
            "cyber" | "cyberpunk" | "neon" => Ok(ThemeKind::Cyberpunk),
            _ => Err(ThemeError::Unknown(s.trim().to_string())),
        }
    }
}

impl fmt::Display for ThemeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Theme palette for the UI
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: &'static str,
    /// Primary foreground color (text, dial face)
    pub fg: Color,
    /// Dimmed foreground (scale labels, borders)
    pub fg_dim: Color,
    /// Background color
    pub bg: Color,
    /// Highlight color (titles, mode badge)
    pub highlight: Color,
    /// Accent color (normal zone of the dial)
    pub accent: Color,
    /// Warning color (hot zone, -6 to 0 dB)
    pub warning: Color,
    /// Error/danger color (red zone above 0 dB)
    pub danger: Color,
    /// Needle color
    pub needle: Color,
    /// Peak-hold tick color
    pub peak: Color,
}

impl Theme {
    /// Level where the dial turns from normal to hot
    pub const HOT_DB: f32 = -6.0;

    /// Get style for normal text
    pub fn normal(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    /// Get style for dimmed text
    pub fn dim(&self) -> Style {
        Style::default().fg(self.fg_dim).bg(self.bg)
    }

    /// Get style for highlighted/selected items
    pub fn highlight(&self) -> Style {
        Style::default()
            .fg(self.bg)
            .bg(self.highlight)
            .add_modifier(Modifier::BOLD)
    }

    /// Get style for borders
    pub fn border(&self) -> Style {
        Style::default().fg(self.fg_dim)
    }

    /// Get title style
    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.highlight)
            .add_modifier(Modifier::BOLD)
    }

    /// Dial zone color for a level
    pub fn zone_style(&self, db: f32) -> Style {
        let color = if db > 0.0 {
            self.danger
        } else if db > Self::HOT_DB {
            self.warning
        } else {
            self.accent
        };
        Style::default().fg(color)
    }

    pub fn needle_style(&self) -> Style {
        Style::default().fg(self.needle).add_modifier(Modifier::BOLD)
    }

    pub fn peak_style(&self) -> Style {
        Style::default().fg(self.peak)
    }
}

/// Classic green phosphor CRT theme
pub const CRT_GREEN: Theme = Theme {
    name: "green",
    fg: Color::Rgb(51, 255, 51),          // #33ff33 - classic phosphor
    fg_dim: Color::Rgb(25, 128, 25),      // dimmed phosphor
    bg: Color::Rgb(0, 10, 0),             // near black with green tint
    highlight: Color::Rgb(180, 255, 180), // bright green
    accent: Color::Rgb(100, 255, 100),    // medium green
    warning: Color::Rgb(255, 255, 100),   // yellow-green
    danger: Color::Rgb(255, 100, 100),    // red warning
    needle: Color::Rgb(220, 255, 220),    // near white
    peak: Color::Rgb(150, 255, 100),      // yellow-green
};

/// Amber CRT theme (1980s monochrome)
pub const CRT_AMBER: Theme = Theme {
    name: "amber",
    fg: Color::Rgb(255, 176, 0),          // #ffb000 - amber
    fg_dim: Color::Rgb(128, 88, 0),       // dimmed amber
    bg: Color::Rgb(10, 5, 0),             // near black with amber tint
    highlight: Color::Rgb(255, 220, 128), // bright amber
    accent: Color::Rgb(255, 200, 64),     // medium amber
    warning: Color::Rgb(255, 255, 100),   // yellow
    danger: Color::Rgb(255, 100, 100),    // red warning
    needle: Color::Rgb(255, 240, 200),    // pale amber
    peak: Color::Rgb(255, 180, 50),       // orange-amber
};

/// Cyberpunk neon theme
pub const CYBERPUNK: Theme = Theme {
    name: "cyberpunk",
    fg: Color::Rgb(0, 255, 255),        // cyan
    fg_dim: Color::Rgb(0, 128, 128),    // dim cyan
    bg: Color::Rgb(5, 0, 10),           // dark purple-black
    highlight: Color::Rgb(255, 0, 255), // magenta
    accent: Color::Rgb(0, 255, 128),    // neon green
    warning: Color::Rgb(255, 255, 0),   // yellow
    danger: Color::Rgb(255, 50, 50),    // red
    needle: Color::Rgb(255, 100, 255),  // pink
    peak: Color::Rgb(100, 255, 255),    // light cyan
};

impl Default for Theme {
    fn default() -> Self {
        ThemeKind::default().theme()
    }
}
