use std::sync::OnceLock;

use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

use crate::calendar::Category;

static THEME: OnceLock<Theme> = OnceLock::new();

/// Install the theme described by the config. Only the first call wins.
pub fn init(config: &ThemeConfig) {
    let _ = THEME.set(config.to_theme());
}

/// Get the active theme (default until `init` is called).
pub fn current() -> &'static Theme {
    THEME.get_or_init(Theme::default)
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub today: Style,
    pub selected: Style,
    pub header: Style,
    pub dim: Style,
    pub border: Style,
    pub status: Style,
    pub highlight: Style,
    pub work: Style,
    pub personal: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            today: Style::default().fg(Color::Black).bg(Color::Yellow),
            selected: Style::default().fg(Color::Black).bg(Color::Cyan),
            header: Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            dim: Style::default().fg(Color::DarkGray),
            border: Style::default().fg(Color::Gray),
            status: Style::default().fg(Color::White).bg(Color::DarkGray),
            highlight: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            work: Style::default().fg(Color::Magenta),
            personal: Style::default().fg(Color::Green),
        }
    }
}

impl Theme {
    /// Get a built-in preset by name.
    pub fn preset(name: &str) -> Self {
        match name {
            "nord" => Self::nord(),
            _ => Self::default(),
        }
    }

    pub fn category(&self, category: Category) -> Style {
        match category {
            Category::Work => self.work,
            Category::Personal => self.personal,
        }
    }

    fn nord() -> Self {
        Self {
            name: "nord".to_string(),
            today: Style::default().fg(Color::Black).bg(Color::Rgb(235, 203, 139)), // yellow
            selected: Style::default().fg(Color::Black).bg(Color::Rgb(136, 192, 208)), // frost
            header: Style::default().fg(Color::Rgb(229, 233, 240)).add_modifier(Modifier::BOLD),
            dim: Style::default().fg(Color::Rgb(76, 86, 106)),
            border: Style::default().fg(Color::Rgb(67, 76, 94)),
            status: Style::default()
                .fg(Color::Rgb(229, 233, 240))
                .bg(Color::Rgb(67, 76, 94)),
            highlight: Style::default()
                .bg(Color::Rgb(67, 76, 94))
                .add_modifier(Modifier::BOLD),
            work: Style::default().fg(Color::Rgb(180, 142, 173)), // aurora purple
            personal: Style::default().fg(Color::Rgb(163, 190, 140)), // aurora green
        }
    }
}

// ── TOML config types ──

/// `theme` and `[theme_colors]` from the config file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    #[serde(rename = "theme")]
    pub preset: Option<String>,
    #[serde(rename = "theme_colors")]
    pub colors: ThemeColors,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ThemeColors {
    pub today_fg: Option<String>,
    pub today_bg: Option<String>,
    pub selected_fg: Option<String>,
    pub selected_bg: Option<String>,
    pub header_fg: Option<String>,
    pub dim_fg: Option<String>,
    pub border_fg: Option<String>,
    pub status_fg: Option<String>,
    pub status_bg: Option<String>,
    pub highlight_bg: Option<String>,
    pub work: Option<String>,
    pub personal: Option<String>,
}

impl ThemeConfig {
    pub fn to_theme(&self) -> Theme {
        // Start from preset or default
        let mut theme = self
            .preset
            .as_deref()
            .map(Theme::preset)
            .unwrap_or_default();
        let c = &self.colors;

        let color = |value: &Option<String>| value.as_deref().and_then(parse_color);

        if let Some(fg) = color(&c.today_fg) {
            theme.today = theme.today.fg(fg);
        }
        if let Some(bg) = color(&c.today_bg) {
            theme.today = theme.today.bg(bg);
        }
        if let Some(fg) = color(&c.selected_fg) {
            theme.selected = theme.selected.fg(fg);
        }
        if let Some(bg) = color(&c.selected_bg) {
            theme.selected = theme.selected.bg(bg);
        }
        if let Some(fg) = color(&c.header_fg) {
            theme.header = theme.header.fg(fg);
        }
        if let Some(fg) = color(&c.dim_fg) {
            theme.dim = theme.dim.fg(fg);
        }
        if let Some(fg) = color(&c.border_fg) {
            theme.border = theme.border.fg(fg);
        }
        if let Some(fg) = color(&c.status_fg) {
            theme.status = theme.status.fg(fg);
        }
        if let Some(bg) = color(&c.status_bg) {
            theme.status = theme.status.bg(bg);
        }
        if let Some(bg) = color(&c.highlight_bg) {
            theme.highlight = theme.highlight.bg(bg);
        }
        if let Some(fg) = color(&c.work) {
            theme.work = theme.work.fg(fg);
        }
        if let Some(fg) = color(&c.personal) {
            theme.personal = theme.personal.fg(fg);
        }

        theme
    }
}

/// Parse a color string: hex "#rrggbb", or named colors.
fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        return Some(Color::Rgb(r, g, b));
    }
    match s.to_lowercase().as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "white" => Some(Color::White),
        "gray" | "grey" => Some(Color::Gray),
        "darkgray" | "darkgrey" => Some(Color::DarkGray),
        "lightred" => Some(Color::LightRed),
        "lightgreen" => Some(Color::LightGreen),
        "lightblue" => Some(Color::LightBlue),
        "lightmagenta" => Some(Color::LightMagenta),
        _ => None,
    }
}
