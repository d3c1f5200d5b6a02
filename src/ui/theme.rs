use std::fs;

use ratatui::style::Color;
use rust_embed::Embed;
use serde::{Deserialize, Serialize};

pub const DEFAULT_THEME: &str = "qalam-dark";

#[derive(Embed)]
#[folder = "assets/themes/"]
struct ThemeAssets;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

/// Hex colors keyed by what they paint. Every field is required so a user
/// theme cannot silently inherit half a palette.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ThemeColors {
    pub bg: String,
    pub fg: String,
    pub exact: String,
    pub close: String,
    pub wrong: String,
    pub wrong_bg: String,
    pub pending: String,
    pub cursor_bg: String,
    pub cursor_fg: String,
    pub key_hint: String,
    pub accent: String,
    pub border: String,
    pub header_bg: String,
    pub header_fg: String,
    pub progress_done: String,
    pub progress_left: String,
    pub mistake: String,
    pub caution: String,
    pub success: String,
}

impl Theme {
    /// User themes in the config directory shadow the bundled ones.
    pub fn load(name: &str) -> Option<Self> {
        let filename = format!("{name}.toml");

        if let Some(config_dir) = dirs::config_dir() {
            let user_theme_path = config_dir.join("khatt").join("themes").join(&filename);
            if let Ok(content) = fs::read_to_string(&user_theme_path) {
                if let Ok(theme) = toml::from_str::<Theme>(&content) {
                    return Some(theme);
                }
            }
        }

        let file = ThemeAssets::get(&filename)?;
        let content = std::str::from_utf8(file.data.as_ref()).ok()?;
        toml::from_str::<Theme>(content).ok()
    }

    pub fn available_themes() -> Vec<String> {
        ThemeAssets::iter()
            .filter_map(|f| f.strip_suffix(".toml").map(|n| n.to_string()))
            .collect()
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::load(DEFAULT_THEME).unwrap_or_else(|| Self {
            name: "default".to_string(),
            colors: ThemeColors::default(),
        })
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        let c = |hex: &str| hex.to_string();
        Self {
            bg: c("#1b1d23"),
            fg: c("#d8dee9"),
            exact: c("#8fbf7f"),
            close: c("#e5c07b"),
            wrong: c("#e06c75"),
            wrong_bg: c("#3b2529"),
            pending: c("#5c6370"),
            cursor_bg: c("#d8dee9"),
            cursor_fg: c("#1b1d23"),
            key_hint: c("#e5c07b"),
            accent: c("#61afef"),
            border: c("#3e4451"),
            header_bg: c("#282c34"),
            header_fg: c("#d8dee9"),
            progress_done: c("#61afef"),
            progress_left: c("#282c34"),
            mistake: c("#e06c75"),
            caution: c("#e5c07b"),
            success: c("#8fbf7f"),
        }
    }
}

macro_rules! color_accessors {
    ($($field:ident),* $(,)?) => {
        $(
            pub fn $field(&self) -> Color {
                Self::parse_color(&self.$field)
            }
        )*
    };
}

impl ThemeColors {
    /// `#rrggbb` or `rrggbb`; anything else renders white.
    pub fn parse_color(hex: &str) -> Color {
        let hex = hex.trim_start_matches('#');
        match (hex.len(), u32::from_str_radix(hex, 16)) {
            (6, Ok(rgb)) => Color::from_u32(rgb),
            _ => Color::White,
        }
    }

    color_accessors!(
        bg, fg, exact, close, wrong, wrong_bg, pending, cursor_bg, cursor_fg, key_hint, accent,
        border, header_bg, header_fg, progress_done, progress_left, mistake, caution, success,
    );
}

/// Letter-accuracy color: hue 0 is red, 120 is green, at fixed saturation
/// and lightness.
pub fn hue_color(hue: f64) -> Color {
    let h = hue.clamp(0.0, 360.0) / 60.0;
    let (s, l) = (0.7, 0.45);
    let c = (1.0 - (2.0 * l - 1.0_f64).abs()) * s;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let m = l - c / 2.0;
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let channel = |v: f64| ((v + m) * 255.0).round() as u8;
    Color::Rgb(channel(r), channel(g), channel(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color() {
        assert_eq!(ThemeColors::parse_color("#ff8000"), Color::Rgb(255, 128, 0));
        assert_eq!(ThemeColors::parse_color("nope"), Color::White);
    }

    #[test]
    fn test_bundled_themes_parse() {
        let names = Theme::available_themes();
        assert!(names.contains(&DEFAULT_THEME.to_string()));
        for name in names {
            let file = ThemeAssets::get(&format!("{name}.toml")).unwrap();
            let content = std::str::from_utf8(file.data.as_ref()).unwrap();
            assert!(toml::from_str::<Theme>(content).is_ok(), "theme {name}");
        }
    }

    #[test]
    fn test_hue_endpoints() {
        let Color::Rgb(r, g, _) = hue_color(0.0) else {
            panic!("expected rgb");
        };
        assert!(r > g);
        let Color::Rgb(r, g, _) = hue_color(120.0) else {
            panic!("expected rgb");
        };
        assert!(g > r);
    }
}
