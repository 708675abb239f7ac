use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ThemeMode {
    Dark,
    Light,
}

impl ThemeMode {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Accent {
    Blue,
    Green,
    Mauve,
    Peach,
}

impl Accent {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Mauve => "mauve",
            Self::Peach => "peach",
        }
    }

    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "blue" => Some(Self::Blue),
            "green" => Some(Self::Green),
            "mauve" => Some(Self::Mauve),
            "peach" => Some(Self::Peach),
            _ => None,
        }
    }

    pub(crate) fn all() -> &'static [Accent] {
        &[Self::Blue, Self::Green, Self::Mauve, Self::Peach]
    }
}

/// Resolved colors for the active theme mode and accent. Built once when the
/// theme changes; every render reads from here instead of ambient constants.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Palette {
    pub header_bg: Color,
    pub accent: Color,
    pub green: Color,
    pub red: Color,
    pub yellow: Color,
    pub surface: Color,
    pub text: Color,
    pub text_dim: Color,
    pub overlay: Color,
    pub command_bg: Color,
}

impl Palette {
    pub(crate) fn new(mode: ThemeMode, accent: Accent) -> Self {
        match mode {
            ThemeMode::Dark => Self {
                header_bg: Color::Rgb(30, 30, 46),
                accent: match accent {
                    Accent::Blue => Color::Rgb(137, 180, 250),
                    Accent::Green => Color::Rgb(166, 227, 161),
                    Accent::Mauve => Color::Rgb(203, 166, 247),
                    Accent::Peach => Color::Rgb(250, 179, 135),
                },
                green: Color::Rgb(166, 227, 161),
                red: Color::Rgb(243, 139, 168),
                yellow: Color::Rgb(249, 226, 175),
                surface: Color::Rgb(49, 50, 68),
                text: Color::Rgb(205, 214, 244),
                text_dim: Color::Rgb(127, 132, 156),
                overlay: Color::Rgb(69, 71, 90),
                command_bg: Color::Rgb(24, 24, 37),
            },
            ThemeMode::Light => Self {
                header_bg: Color::Rgb(220, 224, 232),
                accent: match accent {
                    Accent::Blue => Color::Rgb(30, 102, 245),
                    Accent::Green => Color::Rgb(64, 160, 43),
                    Accent::Mauve => Color::Rgb(136, 57, 239),
                    Accent::Peach => Color::Rgb(254, 100, 11),
                },
                green: Color::Rgb(64, 160, 43),
                red: Color::Rgb(210, 15, 57),
                yellow: Color::Rgb(223, 142, 29),
                surface: Color::Rgb(204, 208, 218),
                text: Color::Rgb(76, 79, 105),
                text_dim: Color::Rgb(140, 143, 161),
                overlay: Color::Rgb(156, 160, 176),
                command_bg: Color::Rgb(230, 233, 239),
            },
        }
    }

    pub(crate) fn header_style(&self) -> Style {
        Style::default()
            .fg(self.text)
            .bg(self.header_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub(crate) fn selected_style(&self) -> Style {
        Style::default().fg(self.header_bg).bg(self.accent)
    }

    pub(crate) fn normal_style(&self) -> Style {
        Style::default().fg(self.text)
    }

    pub(crate) fn dim_style(&self) -> Style {
        Style::default().fg(self.text_dim)
    }

    pub(crate) fn income_style(&self) -> Style {
        Style::default().fg(self.green)
    }

    pub(crate) fn expense_style(&self) -> Style {
        Style::default().fg(self.red)
    }

    pub(crate) fn alt_row_style(&self) -> Style {
        Style::default().fg(self.text).bg(self.surface)
    }

    pub(crate) fn command_bar_style(&self) -> Style {
        Style::default().fg(self.text).bg(self.command_bg)
    }

    pub(crate) fn status_bar_style(&self) -> Style {
        Style::default().fg(self.text_dim).bg(self.surface)
    }
}
