use std::collections::HashMap;

use ratatui::style::Color;

use crate::model::config::UiConfig;

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub edge: Color,
    pub red: Color,
    pub selection_bg: Color,
    pub selection_border: Color,
    /// Named node colors (`metadata.color` may also be a `#RRGGBB` literal)
    pub node_colors: HashMap<String, Color>,
}

impl Default for Theme {
    fn default() -> Self {
        let mut node_colors = HashMap::new();
        node_colors.insert("red".into(), Color::Rgb(0xFF, 0x44, 0x44));
        node_colors.insert("yellow".into(), Color::Rgb(0xFF, 0xD7, 0x00));
        node_colors.insert("green".into(), Color::Rgb(0x44, 0xFF, 0x88));
        node_colors.insert("cyan".into(), Color::Rgb(0x44, 0xDD, 0xFF));
        node_colors.insert("blue".into(), Color::Rgb(0x44, 0x88, 0xFF));
        node_colors.insert("purple".into(), Color::Rgb(0xCC, 0x66, 0xFF));

        Theme {
            background: Color::Rgb(0x0C, 0x00, 0x1B),
            text: Color::Rgb(0xB0, 0xAA, 0xFF),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0xFB, 0x41, 0x96),
            dim: Color::Rgb(0x7D, 0x78, 0xBF),
            edge: Color::Rgb(0x5A, 0x55, 0x80),
            red: Color::Rgb(0xFF, 0x44, 0x44),
            selection_bg: Color::Rgb(0x3D, 0x14, 0x38),
            selection_border: Color::Rgb(0xFB, 0x41, 0x96),
            node_colors,
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
    let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
    let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

impl Theme {
    /// Create a theme from the map's UI config, falling back to defaults
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();

        for (key, value) in &ui.colors {
            if let Some(color) = parse_hex_color(value) {
                match key.as_str() {
                    "background" => theme.background = color,
                    "text" => theme.text = color,
                    "text_bright" => theme.text_bright = color,
                    "highlight" => theme.highlight = color,
                    "dim" => theme.dim = color,
                    "edge" => theme.edge = color,
                    "red" => theme.red = color,
                    "selection_bg" => theme.selection_bg = color,
                    "selection_border" => theme.selection_border = color,
                    _ => tracing::debug!(key, "unknown theme color"),
                }
            }
        }

        for (name, value) in &ui.node_colors {
            if let Some(color) = parse_hex_color(value) {
                theme.node_colors.insert(name.clone(), color);
            }
        }

        theme
    }

    /// Resolve a node's color: a configured name, else a hex literal
    pub fn node_color(&self, color: &str) -> Option<Color> {
        self.node_colors
            .get(color)
            .copied()
            .or_else(|| parse_hex_color(color))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(
            parse_hex_color("#FF4444"),
            Some(Color::Rgb(0xFF, 0x44, 0x44))
        );
        assert_eq!(parse_hex_color("FF4444"), None); // missing #
        assert_eq!(parse_hex_color("#FF44"), None); // too short
        assert_eq!(parse_hex_color("#ZZZZZZ"), None); // invalid hex
        assert_eq!(parse_hex_color("#éé12"), None);
    }

    #[test]
    fn test_from_config_overrides() {
        let mut ui = UiConfig::default();
        ui.colors.insert("background".into(), "#000000".into());
        ui.node_colors.insert("brand".into(), "#112233".into());

        let theme = Theme::from_config(&ui);
        assert_eq!(theme.background, Color::Rgb(0, 0, 0));
        assert_eq!(theme.node_color("brand"), Some(Color::Rgb(0x11, 0x22, 0x33)));
        // Unchanged defaults still present
        assert_eq!(theme.text, Color::Rgb(0xB0, 0xAA, 0xFF));
        assert_eq!(theme.node_color("red"), Some(Color::Rgb(0xFF, 0x44, 0x44)));
    }

    #[test]
    fn test_node_color_fallbacks() {
        let theme = Theme::default();
        assert_eq!(theme.node_color("#010203"), Some(Color::Rgb(1, 2, 3)));
        assert_eq!(theme.node_color("mauve"), None);
    }
}
