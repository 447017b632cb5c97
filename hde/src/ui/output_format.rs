//! Status messages on stderr, colored when the stream is a terminal.

use std::io::{self, Write};

use owo_colors::OwoColorize;

use crate::ui::theme::{get_styled_color, ThemeEntry, ThemeMap};

/// Renders `text` in the color of `entry`, or plain when color is off.
pub fn styled(text: &str, entry: ThemeEntry, theme: &ThemeMap, supports_color: bool) -> String {
    match get_styled_color(theme, entry) {
        Some(color) if supports_color => text.color(color).to_string(),
        _ => text.to_string(),
    }
}

fn print_tagged<W: Write>(
    writer: &mut W,
    tag: &str,
    message: &str,
    entry: ThemeEntry,
    theme: &ThemeMap,
    supports_color: bool,
) -> io::Result<()> {
    writeln!(writer, "{} {}", styled(tag, entry, theme, supports_color), message)
}

pub fn print_info_message<W: Write>(
    writer: &mut W,
    message: &str,
    theme: &ThemeMap,
    supports_color: bool,
) -> io::Result<()> {
    print_tagged(writer, "[hde]", message, ThemeEntry::Info, theme, supports_color)
}

pub fn print_warn_message<W: Write>(
    writer: &mut W,
    message: &str,
    theme: &ThemeMap,
    supports_color: bool,
) -> io::Result<()> {
    print_tagged(writer, "[hde] WARN", message, ThemeEntry::Warn, theme, supports_color)
}

pub fn print_error_message<W: Write>(
    writer: &mut W,
    message: &str,
    theme: &ThemeMap,
    supports_color: bool,
) -> io::Result<()> {
    print_tagged(writer, "[hde] ERROR", message, ThemeEntry::Error, theme, supports_color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::theme::ThemeStyle;

    #[test]
    fn test_plain_output_has_no_escape_codes() -> io::Result<()> {
        let theme = ThemeStyle::default_theme_map();
        let mut out = Vec::new();
        print_warn_message(&mut out, "welsh: no corpus", &theme, false)?;
        assert_eq!(String::from_utf8_lossy(&out), "[hde] WARN welsh: no corpus\n");
        Ok(())
    }

    #[test]
    fn test_colored_output_wraps_tag() -> io::Result<()> {
        let theme = ThemeStyle::default_theme_map();
        let mut out = Vec::new();
        print_error_message(&mut out, "boom", &theme, true)?;
        let text = String::from_utf8_lossy(&out).into_owned();
        assert!(text.contains('\u{1b}'));
        assert!(text.ends_with(" boom\n"));
        Ok(())
    }
}
