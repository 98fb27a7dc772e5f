use std::sync::OnceLock;

use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeName {
    #[default]
    Slate,
    TokyoNight,
}

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    // Base colors
    pub bg: Color,
    pub bg_highlight: Color,
    pub fg: Color,
    pub fg_dim: Color,

    // UI elements
    pub border: Color,
    pub border_focused: Color,
    pub selection_bg: Color,

    // Accents
    pub accent: Color,
    pub accent_alt: Color,
    pub particle: Color,

    // Semantic colors
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub title: Color,
}

impl Theme {
    pub const fn slate() -> Self {
        Self {
            // Base
            bg: Color::Rgb(15, 23, 42),           // #0f172a
            bg_highlight: Color::Rgb(30, 41, 59), // #1e293b
            fg: Color::Rgb(226, 232, 240),        // #e2e8f0
            fg_dim: Color::Rgb(100, 116, 139),    // #64748b

            // UI elements
            border: Color::Rgb(51, 65, 85),            // #334155
            border_focused: Color::Rgb(34, 211, 238),  // #22d3ee
            selection_bg: Color::Rgb(30, 41, 59),      // #1e293b

            // Accents
            accent: Color::Rgb(34, 211, 238),      // #22d3ee
            accent_alt: Color::Rgb(192, 132, 252), // #c084fc
            particle: Color::Rgb(56, 189, 248),    // #38bdf8

            // Semantic
            success: Color::Rgb(74, 222, 128), // #4ade80
            warning: Color::Rgb(250, 204, 21), // #facc15
            error: Color::Rgb(248, 113, 113),  // #f87171
            title: Color::Rgb(103, 232, 249),  // #67e8f9
        }
    }

    pub const fn tokyo_night() -> Self {
        Self {
            // Base
            bg: Color::Rgb(26, 27, 38),           // #1a1b26
            bg_highlight: Color::Rgb(41, 46, 66), // #292e42
            fg: Color::Rgb(192, 202, 245),        // #c0caf5
            fg_dim: Color::Rgb(86, 95, 137),      // #565f89

            // UI elements
            border: Color::Rgb(61, 89, 161),           // #3d59a1
            border_focused: Color::Rgb(187, 154, 247), // #bb9af7
            selection_bg: Color::Rgb(41, 46, 66),      // #292e42

            // Accents
            accent: Color::Rgb(125, 207, 255),     // #7dcfff
            accent_alt: Color::Rgb(255, 158, 100), // #ff9e64
            particle: Color::Rgb(122, 162, 247),   // #7aa2f7

            // Semantic
            success: Color::Rgb(158, 206, 106), // #9ece6a
            warning: Color::Rgb(224, 175, 104), // #e0af68
            error: Color::Rgb(247, 118, 142),   // #f7768e
            title: Color::Rgb(122, 162, 247),   // #7aa2f7
        }
    }

    pub const fn from_name(name: ThemeName) -> Self {
        match name {
            ThemeName::Slate => Self::slate(),
            ThemeName::TokyoNight => Self::tokyo_night(),
        }
    }

    // Computed styles
    pub fn border_style(&self, focused: bool) -> Style {
        Style::new().fg(if focused {
            self.border_focused
        } else {
            self.border
        })
    }

    pub fn selection_style(&self) -> Style {
        Style::new()
            .bg(self.selection_bg)
            .fg(self.fg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn title_style(&self) -> Style {
        Style::new().fg(self.title).add_modifier(Modifier::BOLD)
    }

    pub fn label_style(&self) -> Style {
        Style::new().fg(self.fg_dim)
    }

    pub fn value_style(&self) -> Style {
        Style::new().fg(self.fg)
    }

    pub fn header_style(&self) -> Style {
        Style::new().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub fn tag_style(&self) -> Style {
        Style::new().fg(self.accent_alt)
    }

    pub fn slider_color(&self, playing: bool) -> Color {
        if playing { self.success } else { self.warning }
    }
}

static THEME: OnceLock<Theme> = OnceLock::new();

/// Picks the palette for the process. Later calls are ignored.
pub fn init_theme(name: ThemeName) {
    let _ = THEME.set(Theme::from_name(name));
}

pub fn get_theme() -> &'static Theme {
    THEME.get_or_init(Theme::slate)
}
