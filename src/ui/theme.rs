use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct Theme {
    pub header_accent_bg: Color,
    pub header_accent_fg: Color,
    pub statusbar_bg: Color,
    pub overlay_border: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub pill_key_bg: Color,
    pub pill_key_fg: Color,
    pub pill_desc_fg: Color,
    pub surface_bg: Color,
    pub gauge_unfilled: Color,
    /// Low, mid, high load.
    pub load_colors: [Color; 3],
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            header_accent_bg: Color::Green,
            header_accent_fg: Color::Black,
            statusbar_bg: Color::DarkGray,
            overlay_border: Color::DarkGray,
            text_primary: Color::White,
            text_secondary: Color::Gray,
            pill_key_bg: Color::Yellow,
            pill_key_fg: Color::Black,
            pill_desc_fg: Color::White,
            surface_bg: Color::DarkGray,
            gauge_unfilled: Color::DarkGray,
            load_colors: [
                Color::Rgb(16, 185, 129),
                Color::Rgb(249, 115, 22),
                Color::Rgb(239, 68, 68),
            ],
        }
    }
}

impl Theme {
    pub fn load_color(&self, percent: u8) -> Color {
        match percent {
            0..=59 => self.load_colors[0],
            60..=84 => self.load_colors[1],
            _ => self.load_colors[2],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_color_bands() {
        let theme = Theme::default();
        assert_eq!(theme.load_color(0), theme.load_colors[0]);
        assert_eq!(theme.load_color(60), theme.load_colors[1]);
        assert_eq!(theme.load_color(85), theme.load_colors[2]);
        assert_eq!(theme.load_color(100), theme.load_colors[2]);
    }
}
