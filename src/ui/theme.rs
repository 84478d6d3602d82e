use ratatui::style::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeName {
    Dark,
    Light,
}

impl ThemeName {
    pub fn from_config_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "light" => ThemeName::Light,
            _ => ThemeName::Dark,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: ThemeName,
    pub surface_bg: Color,
    pub text: Color,
    pub muted: Color,
    pub border: Color,
    pub accent: Color,
    pub column_header_fg: Color,
    pub selected_bg: Color,
    pub selected_fg: Color,
    pub not_available: Color,
    pub statusbar_bg: Color,
    pub status_ok: Color,
    pub status_err: Color,
    pub pill_key_fg: Color,
    pub pill_key_bg: Color,
    pub pill_desc_fg: Color,
    pub overlay_border: Color,
}

impl Theme {
    pub fn from_config(name: &str) -> Self {
        match ThemeName::from_config_str(name) {
            ThemeName::Dark => Self::dark(),
            ThemeName::Light => Self::light(),
        }
    }

    pub fn dark() -> Self {
        Theme {
            name: ThemeName::Dark,
            surface_bg: Color::Rgb(30, 30, 46),
            text: Color::Rgb(205, 214, 244),
            muted: Color::Rgb(127, 132, 156),
            border: Color::Rgb(88, 91, 112),
            accent: Color::Rgb(203, 166, 247),
            column_header_fg: Color::Rgb(137, 180, 250),
            selected_bg: Color::Rgb(69, 71, 90),
            selected_fg: Color::Rgb(245, 224, 220),
            not_available: Color::Rgb(108, 112, 134),
            statusbar_bg: Color::Rgb(24, 24, 37),
            status_ok: Color::Rgb(166, 227, 161),
            status_err: Color::Rgb(243, 139, 168),
            pill_key_fg: Color::Rgb(17, 17, 27),
            pill_key_bg: Color::Rgb(137, 180, 250),
            pill_desc_fg: Color::Rgb(186, 194, 222),
            overlay_border: Color::Rgb(203, 166, 247),
        }
    }

    pub fn light() -> Self {
        Theme {
            name: ThemeName::Light,
            surface_bg: Color::Rgb(239, 241, 245),
            text: Color::Rgb(76, 79, 105),
            muted: Color::Rgb(140, 143, 161),
            border: Color::Rgb(172, 176, 190),
            accent: Color::Rgb(136, 57, 239),
            column_header_fg: Color::Rgb(30, 102, 245),
            selected_bg: Color::Rgb(204, 208, 218),
            selected_fg: Color::Rgb(76, 79, 105),
            not_available: Color::Rgb(156, 160, 176),
            statusbar_bg: Color::Rgb(230, 233, 239),
            status_ok: Color::Rgb(64, 160, 43),
            status_err: Color::Rgb(210, 15, 57),
            pill_key_fg: Color::Rgb(239, 241, 245),
            pill_key_bg: Color::Rgb(30, 102, 245),
            pill_desc_fg: Color::Rgb(92, 95, 119),
            overlay_border: Color::Rgb(136, 57, 239),
        }
    }
}
