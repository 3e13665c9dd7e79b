use ratatui::style::Color;
use rust_embed::Embed;
use serde::{Deserialize, Serialize};

#[derive(Embed)]
#[folder = "assets/themes/"]
struct ThemeAssets;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ThemeColors {
    pub bg: String,
    pub fg: String,
    pub panel: String,
    pub border: String,
    pub border_focused: String,
    pub text_dim: String,
    pub accent: String,
    pub accent_dim: String,
    pub header_bg: String,
    pub header_fg: String,
    pub bar_filled: String,
    pub bar_empty: String,
    pub success: String,
    pub warning: String,
    pub error: String,
    pub highlight: String,
}

impl Theme {
    pub fn load(name: &str) -> Option<Self> {
        let filename = format!("{name}.toml");
        let file = ThemeAssets::get(&filename)?;
        let content = std::str::from_utf8(file.data.as_ref()).ok()?;
        toml::from_str::<Theme>(content).ok()
    }

    pub fn light() -> Self {
        Self::load("light").unwrap_or_else(|| Self {
            name: "light".to_string(),
            colors: ThemeColors::default(),
        })
    }

    pub fn dark() -> Self {
        Self::load("dark").unwrap_or_else(|| Self {
            name: "dark".to_string(),
            colors: ThemeColors::default(),
        })
    }
}

/// Both bundled themes, loaded once.
pub struct Themes {
    pub light: Theme,
    pub dark: Theme,
}

impl Themes {
    pub fn load() -> Self {
        Self {
            light: Theme::light(),
            dark: Theme::dark(),
        }
    }

    pub fn pick(&self, dark_mode: bool) -> &Theme {
        if dark_mode { &self.dark } else { &self.light }
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            bg: "#f8f9fa".to_string(),
            fg: "#212529".to_string(),
            panel: "#ffffff".to_string(),
            border: "#dee2e6".to_string(),
            border_focused: "#4c6ef5".to_string(),
            text_dim: "#6c757d".to_string(),
            accent: "#4c6ef5".to_string(),
            accent_dim: "#dbe4ff".to_string(),
            header_bg: "#e9ecef".to_string(),
            header_fg: "#212529".to_string(),
            bar_filled: "#4c6ef5".to_string(),
            bar_empty: "#e9ecef".to_string(),
            success: "#2f9e44".to_string(),
            warning: "#f08c00".to_string(),
            error: "#e03131".to_string(),
            highlight: "#fab005".to_string(),
        }
    }
}

impl ThemeColors {
    pub fn parse_color(hex: &str) -> Color {
        let hex = hex.trim_start_matches('#');
        if hex.len() == 6 && hex.is_ascii()
            && let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            )
        {
            return Color::Rgb(r, g, b);
        }
        Color::Reset
    }

    pub fn bg(&self) -> Color { Self::parse_color(&self.bg) }
    pub fn fg(&self) -> Color { Self::parse_color(&self.fg) }
    pub fn panel(&self) -> Color { Self::parse_color(&self.panel) }
    pub fn border(&self) -> Color { Self::parse_color(&self.border) }
    pub fn border_focused(&self) -> Color { Self::parse_color(&self.border_focused) }
    pub fn text_dim(&self) -> Color { Self::parse_color(&self.text_dim) }
    pub fn accent(&self) -> Color { Self::parse_color(&self.accent) }
    pub fn accent_dim(&self) -> Color { Self::parse_color(&self.accent_dim) }
    pub fn header_bg(&self) -> Color { Self::parse_color(&self.header_bg) }
    pub fn header_fg(&self) -> Color { Self::parse_color(&self.header_fg) }
    pub fn bar_filled(&self) -> Color { Self::parse_color(&self.bar_filled) }
    pub fn bar_empty(&self) -> Color { Self::parse_color(&self.bar_empty) }
    pub fn success(&self) -> Color { Self::parse_color(&self.success) }
    pub fn warning(&self) -> Color { Self::parse_color(&self.warning) }
    pub fn error(&self) -> Color { Self::parse_color(&self.error) }
    pub fn highlight(&self) -> Color { Self::parse_color(&self.highlight) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_themes_load() {
        let themes = Themes::load();
        assert_eq!(themes.pick(false).name, "light");
        assert_eq!(themes.pick(true).name, "dark");
        assert!(Theme::load("light").is_some());
        assert!(Theme::load("solarized").is_none());
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(ThemeColors::parse_color("#ff8000"), Color::Rgb(255, 128, 0));
        assert_eq!(ThemeColors::parse_color("nope"), Color::Reset);
        assert_eq!(ThemeColors::parse_color("#12345"), Color::Reset);
    }
}
