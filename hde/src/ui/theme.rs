//! Colors for the different parts of the terminal output.
//!
//! Styling only ever applies to stderr; the result table on stdout is plain
//! text so it can be piped into other tools.

use std::collections::HashMap;

use owo_colors::AnsiColors;

/// Type alias for the theme map, providing a consistent type definition.
pub type ThemeMap = HashMap<ThemeEntry, ThemeStyle>;

/// The logical parts of the output that can be styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThemeEntry {
    /// Table headers and section titles.
    Header,
    Success,
    Info,
    Warn,
    Error,
    /// A defined aggregate score.
    Score,
    /// An undefined aggregate score.
    Undefined,
}

/// Foreground color of one `ThemeEntry`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThemeStyle {
    pub fg: Option<AnsiColors>,
}

impl ThemeStyle {
    fn fg(color: AnsiColors) -> Self {
        ThemeStyle { fg: Some(color) }
    }

    /// The built-in theme.
    pub fn default_theme_map() -> ThemeMap {
        HashMap::from([
            (ThemeEntry::Header, ThemeStyle::fg(AnsiColors::Blue)),
            (ThemeEntry::Success, ThemeStyle::fg(AnsiColors::Green)),
            (ThemeEntry::Info, ThemeStyle::fg(AnsiColors::Cyan)),
            (ThemeEntry::Warn, ThemeStyle::fg(AnsiColors::Yellow)),
            (ThemeEntry::Error, ThemeStyle::fg(AnsiColors::Red)),
            (ThemeEntry::Score, ThemeStyle::fg(AnsiColors::BrightGreen)),
            (ThemeEntry::Undefined, ThemeStyle::fg(AnsiColors::BrightBlack)),
        ])
    }
}

/// Looks up the foreground color for `entry`, if the theme defines one.
pub fn get_styled_color(theme: &ThemeMap, entry: ThemeEntry) -> Option<AnsiColors> {
    theme.get(&entry).and_then(|style| style.fg)
}
