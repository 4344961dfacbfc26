use ratatui::style::{Color, Modifier, Style};

use crate::config::ThemeConfig;

/// Resolved terminal colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub primary: Color,
    pub background: Color,
    pub paper: Color,
    pub text: Color,
    pub muted: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme::from_config(&ThemeConfig::default())
    }
}

impl Theme {
    /// Unparseable entries fall back to plain terminal colors.
    pub fn from_config(config: &ThemeConfig) -> Self {
        Self {
            primary: parse_hex_color(&config.primary).unwrap_or(Color::Cyan),
            background: parse_hex_color(&config.background).unwrap_or(Color::Reset),
            paper: parse_hex_color(&config.paper).unwrap_or(Color::Reset),
            text: parse_hex_color(&config.text).unwrap_or(Color::White),
            muted: parse_hex_color(&config.muted).unwrap_or(Color::Gray),
        }
    }

    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn secondary(&self) -> Style {
        Style::default().fg(self.muted)
    }
}

/// Parse `#rrggbb`, `rrggbb` or the three-digit short form into an RGB color.
pub fn parse_hex_color(value: &str) -> Option<Color> {
    let hex = value.trim().trim_start_matches('#');
    if !hex.is_ascii() {
        return None;
    }

    let expanded: String = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 => hex.to_string(),
        _ => return None,
    };

    let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

/// Label color from the API, or the muted color when GitHub sent garbage.
pub fn label_color(theme: &Theme, color: &str) -> Color {
    parse_hex_color(color).unwrap_or(theme.muted)
}
