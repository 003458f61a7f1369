//! Named color identifiers and terminal painting.

use colored::{Color, Colorize};

/// Color of rendered custom field values.
pub const FIELD_COLOR: Color = Color::White;

/// Resolve a color identifier such as `red`, `grey` or `bright_blue`.
pub fn color_by_name(name: &str) -> Option<Color> {
    let normalized = name.trim().to_ascii_lowercase().replace(['_', '-'], " ");
    let color = match normalized.as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" | "purple" => Color::Magenta,
        "cyan" => Color::Cyan,
        "white" => Color::White,
        "grey" | "gray" | "bright black" => Color::BrightBlack,
        "bright red" => Color::BrightRed,
        "bright green" => Color::BrightGreen,
        "bright yellow" => Color::BrightYellow,
        "bright blue" => Color::BrightBlue,
        "bright magenta" | "bright purple" => Color::BrightMagenta,
        "bright cyan" => Color::BrightCyan,
        "bright white" => Color::BrightWhite,
        _ => return None,
    };
    Some(color)
}

/// Resolve `name`, falling back to `default` when it is missing or unknown.
pub fn resolve(name: Option<&str>, default: Color) -> Color {
    let Some(name) = name else {
        return default;
    };
    color_by_name(name).unwrap_or_else(|| {
        tracing::warn!(requested = name, fallback = ?default, "unknown color identifier");
        default
    })
}

pub fn paint(text: &str, color: Color) -> String {
    text.color(color).to_string()
}

/// The three configurable colors of the console formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorScheme {
    pub message: Color,
    pub stack: Color,
    pub label: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            message: Color::Red,
            stack: Color::Cyan,
            label: Color::BrightBlack,
        }
    }
}
