//! TUI color palettes.
//!
//! A [`Theme`] is picked once at startup from the `theme` preference:
//! `dark`, `light`, or `auto` (a guess based on the terminal environment).

use ratatui::style::Color;

use crate::config::ThemeChoice;
use crate::duplicates::Badge;

/// A collection of colors used for TUI components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub primary: Color,
    pub secondary: Color,
    pub danger: Color,
    pub success: Color,
    pub dim: Color,
    pub normal: Color,
    pub inverted_fg: Color,
    pub badge_hash: Color,
    pub badge_seq: Color,
    pub badge_ver: Color,
    pub badge_match: Color,
}

impl Theme {
    /// High-contrast dark theme (default).
    ///
    /// Palette:
    /// - Primary: Cyan (headers, borders)
    /// - Secondary: Yellow (cursor, prompts)
    /// - Danger: Red (selected items, errors)
    /// - Success: Green (reports)
    /// - Dim: DarkGray (secondary text)
    /// - Normal: White (main text)
    #[must_use]
    pub fn dark() -> Self {
        Self {
            primary: Color::Cyan,
            secondary: Color::Yellow,
            danger: Color::Red,
            success: Color::Green,
            dim: Color::DarkGray,
            normal: Color::White,
            inverted_fg: Color::Black,
            badge_hash: Color::LightRed,
            badge_seq: Color::LightMagenta,
            badge_ver: Color::LightGreen,
            badge_match: Color::LightBlue,
        }
    }

    /// High-contrast light theme.
    #[must_use]
    pub fn light() -> Self {
        Self {
            primary: Color::Blue,
            secondary: Color::Magenta,
            danger: Color::Red,
            success: Color::Green,
            dim: Color::Gray,
            normal: Color::Black,
            inverted_fg: Color::White,
            badge_hash: Color::Red,
            badge_seq: Color::Magenta,
            badge_ver: Color::Green,
            badge_match: Color::Blue,
        }
    }

    /// Detect terminal theme or return dark theme as default.
    #[must_use]
    pub fn auto() -> Self {
        if is_light_terminal() {
            Self::light()
        } else {
            Self::dark()
        }
    }

    /// Palette for a preference value.
    #[must_use]
    pub fn from_choice(choice: ThemeChoice) -> Self {
        match choice {
            ThemeChoice::Auto => Self::auto(),
            ThemeChoice::Dark => Self::dark(),
            ThemeChoice::Light => Self::light(),
        }
    }

    /// Check if this is a light theme.
    #[must_use]
    pub fn is_light(&self) -> bool {
        self.normal == Color::Black
    }

    /// Color of a group badge.
    #[must_use]
    pub fn badge_color(&self, badge: Badge) -> Color {
        match badge {
            Badge::Hash => self.badge_hash,
            Badge::Seq => self.badge_seq,
            Badge::Ver => self.badge_ver,
            Badge::Match => self.badge_match,
        }
    }
}

/// Guess a light background from `COLORFGBG` ("fg;bg", set by rxvt, xterm
/// and konsole).
fn is_light_terminal() -> bool {
    std::env::var("COLORFGBG")
        .ok()
        .as_deref()
        .and_then(background_index)
        .is_some_and(|bg| bg >= 7 && bg != 8)
}

fn background_index(colorfgbg: &str) -> Option<u32> {
    colorfgbg.rsplit(';').next()?.parse().ok()
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
