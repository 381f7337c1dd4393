use std::sync::OnceLock;

use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

static THEME: OnceLock<Theme> = OnceLock::new();

/// Install the theme described by the config. Only the first call has effect.
pub fn init(config: &ThemeConfig) {
    let _ = THEME.set(config.to_theme());
}

/// Get the active theme, falling back to the default palette.
pub fn current() -> &'static Theme {
    THEME.get_or_init(Theme::default)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: String,
    pub today: Style,
    pub selected: Style,
    pub header: Style,
    pub dim: Style,
    pub border: Style,
    pub status: Style,
    pub highlight: Style,
    pub event: Style,
    pub accent: Style,
    pub error: Style,
}

impl Default for Theme {
    fn default() -> Self {
        palette(Palette {
            name: "default",
            text: Color::White,
            today: Color::Yellow,
            selected: Color::Cyan,
            dim: Color::DarkGray,
            border: Color::Gray,
            bar: Color::DarkGray,
            event: Color::Green,
            error: Color::LightRed,
        })
    }
}

impl Theme {
    /// Built-in preset by name; unknown names give the default.
    pub fn preset(name: &str) -> Self {
        match name {
            "dracula" => palette(Palette {
                name: "dracula",
                text: Color::Rgb(248, 248, 242),
                today: Color::Rgb(189, 147, 249),
                selected: Color::Rgb(139, 233, 253),
                dim: Color::Rgb(98, 114, 164),
                border: Color::Rgb(68, 71, 90),
                bar: Color::Rgb(68, 71, 90),
                event: Color::Rgb(80, 250, 123),
                error: Color::Rgb(255, 85, 85),
            }),
            "gruvbox" => palette(Palette {
                name: "gruvbox",
                text: Color::Rgb(235, 219, 178),
                today: Color::Rgb(250, 189, 47),
                selected: Color::Rgb(131, 165, 152),
                dim: Color::Rgb(146, 131, 116),
                border: Color::Rgb(102, 92, 84),
                bar: Color::Rgb(80, 73, 69),
                event: Color::Rgb(184, 187, 38),
                error: Color::Rgb(251, 73, 52),
            }),
            "nord" => palette(Palette {
                name: "nord",
                text: Color::Rgb(229, 233, 240),
                today: Color::Rgb(235, 203, 139),
                selected: Color::Rgb(136, 192, 208),
                dim: Color::Rgb(76, 86, 106),
                border: Color::Rgb(67, 76, 94),
                bar: Color::Rgb(67, 76, 94),
                event: Color::Rgb(163, 190, 140),
                error: Color::Rgb(191, 97, 106),
            }),
            _ => Self::default(),
        }
    }
}

struct Palette {
    name: &'static str,
    text: Color,
    today: Color,
    selected: Color,
    dim: Color,
    border: Color,
    bar: Color,
    event: Color,
    error: Color,
}

fn palette(p: Palette) -> Theme {
    Theme {
        name: p.name.to_string(),
        today: Style::default().fg(Color::Black).bg(p.today),
        selected: Style::default().fg(Color::Black).bg(p.selected),
        header: Style::default().fg(p.text).add_modifier(Modifier::BOLD),
        dim: Style::default().fg(p.dim),
        border: Style::default().fg(p.border),
        status: Style::default().fg(p.text).bg(p.bar),
        highlight: Style::default().bg(p.bar).add_modifier(Modifier::BOLD),
        event: Style::default().fg(Color::Black).bg(p.event),
        accent: Style::default().fg(p.event).add_modifier(Modifier::BOLD),
        error: Style::default().fg(p.error),
    }
}

/// `[theme]` table of the config file: a preset plus per-color overrides.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub preset: Option<String>,
    pub today_bg: Option<String>,
    pub selected_bg: Option<String>,
    pub header_fg: Option<String>,
    pub dim_fg: Option<String>,
    pub border_fg: Option<String>,
    pub status_fg: Option<String>,
    pub status_bg: Option<String>,
    pub highlight_bg: Option<String>,
    pub event_bg: Option<String>,
    pub error_fg: Option<String>,
}

impl ThemeConfig {
    pub fn to_theme(&self) -> Theme {
        let mut theme = self
            .preset
            .as_deref()
            .map(Theme::preset)
            .unwrap_or_default();

        let color = |value: &Option<String>| value.as_deref().and_then(parse_color);

        if let Some(c) = color(&self.today_bg) {
            theme.today = theme.today.bg(c);
        }
        if let Some(c) = color(&self.selected_bg) {
            theme.selected = theme.selected.bg(c);
        }
        if let Some(c) = color(&self.header_fg) {
            theme.header = theme.header.fg(c);
        }
        if let Some(c) = color(&self.dim_fg) {
            theme.dim = theme.dim.fg(c);
        }
        if let Some(c) = color(&self.border_fg) {
            theme.border = theme.border.fg(c);
        }
        if let Some(c) = color(&self.status_fg) {
            theme.status = theme.status.fg(c);
        }
        if let Some(c) = color(&self.status_bg) {
            theme.status = theme.status.bg(c);
        }
        if let Some(c) = color(&self.highlight_bg) {
            theme.highlight = theme.highlight.bg(c);
        }
        if let Some(c) = color(&self.event_bg) {
            theme.event = theme.event.bg(c);
            theme.accent = theme.accent.fg(c);
        }
        if let Some(c) = color(&self.error_fg) {
            theme.error = theme.error.fg(c);
        }

        theme
    }
}

/// Parse "#rrggbb" or a basic terminal color name.
fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        return Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?));
    }

    let named = match s.to_ascii_lowercase().replace(['-', '_'], "").as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "white" => Color::White,
        "gray" | "grey" => Color::Gray,
        "darkgray" | "darkgrey" => Color::DarkGray,
        "lightred" => Color::LightRed,
        "lightgreen" => Color::LightGreen,
        "lightyellow" => Color::LightYellow,
        "lightblue" => Color::LightBlue,
        "lightmagenta" => Color::LightMagenta,
        "lightcyan" => Color::LightCyan,
        _ => return None,
    };
    Some(named)
}
