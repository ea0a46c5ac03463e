//! Theme colors, with optional overrides from the `[theme]` config table

use ratatui::style::Color;

use crate::config::ThemeConfig;

/// Theme colors for the UI
#[derive(Debug, Clone)]
pub struct Theme {
    pub accent: Color,      // Active borders, key hints, input cursor
    pub success: Color,     // Success toasts
    pub danger: Color,      // Error toasts, delete confirmation
    pub warning: Color,     // Edit-mode marker
    pub text: Color,        // Primary text
    pub text_dim: Color,    // Secondary text
    pub bg_selected: Color, // Selected row background
    pub inactive: Color,    // Inactive borders
    pub header: Color,      // Table headers
}

impl Default for Theme {
    fn default() -> Self {
        // Catppuccin-inspired
        Self {
            accent: Color::Rgb(250, 179, 135),
            success: Color::Rgb(166, 218, 149),
            danger: Color::Rgb(243, 139, 168),
            warning: Color::Rgb(249, 226, 175),
            text: Color::Rgb(205, 214, 244),
            text_dim: Color::Rgb(147, 153, 178),
            bg_selected: Color::Rgb(69, 71, 90),
            inactive: Color::Rgb(88, 91, 112),
            header: Color::Rgb(137, 180, 250),
        }
    }
}

impl Theme {
    /// Defaults with any valid overrides applied. Invalid colors are skipped.
    pub fn from_config(overrides: &ThemeConfig) -> Self {
        let mut theme = Self::default();

        let slots: [(&Option<String>, &mut Color); 6] = [
            (&overrides.accent, &mut theme.accent),
            (&overrides.success, &mut theme.success),
            (&overrides.danger, &mut theme.danger),
            (&overrides.text, &mut theme.text),
            (&overrides.text_dim, &mut theme.text_dim),
            (&overrides.bg_selected, &mut theme.bg_selected),
        ];

        for (value, slot) in slots {
            let Some(value) = value else { continue };
            match Self::parse_hex_color(value) {
                Some(color) => *slot = color,
                None => tracing::warn!("Ignoring invalid theme color: {}", value),
            }
        }

        theme
    }

    /// Parse a hex color string (#RRGGBB or #RGB)
    fn parse_hex_color(s: &str) -> Option<Color> {
        let s = s.trim().trim_start_matches('#');
        // from_str_radix would also take a leading sign
        if !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }

        if s.len() == 6 {
            let r = u8::from_str_radix(&s[0..2], 16).ok()?;
            let g = u8::from_str_radix(&s[2..4], 16).ok()?;
            let b = u8::from_str_radix(&s[4..6], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        } else if s.len() == 3 {
            let r = u8::from_str_radix(&s[0..1], 16).ok()? * 17;
            let g = u8::from_str_radix(&s[1..2], 16).ok()? * 17;
            let b = u8::from_str_radix(&s[2..3], 16).ok()? * 17;
            Some(Color::Rgb(r, g, b))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(Theme::parse_hex_color("#FFC107"), Some(Color::Rgb(255, 193, 7)));
        assert_eq!(Theme::parse_hex_color("fff"), Some(Color::Rgb(255, 255, 255)));
        assert_eq!(Theme::parse_hex_color("#12345"), None);
        assert_eq!(Theme::parse_hex_color("#zzzzzz"), None);
    }

    #[test]
    fn test_parse_hex_color_rejects_signs() {
        assert_eq!(Theme::parse_hex_color("#+f+f+f"), None);
        assert_eq!(Theme::parse_hex_color("+ff"), None);
        assert_eq!(Theme::parse_hex_color("#-10000"), None);
    }

    #[test]
    fn test_overrides_applied() {
        let overrides = ThemeConfig {
            accent: Some("#000000".to_string()),
            danger: Some("not a color".to_string()),
            ..ThemeConfig::default()
        };

        let theme = Theme::from_config(&overrides);

        assert_eq!(theme.accent, Color::Rgb(0, 0, 0));
        assert_eq!(theme.danger, Theme::default().danger);
    }
}
