use crate::config::AppConfig;

pub const THEME_ENV: &str = "TRIPCHAT_THEME";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

/// Resolve the starting theme once at startup. The environment stands in for
/// the system color-scheme preference; after this the theme is a pure
/// in-memory toggle with no persistence.
pub fn detect_theme(config: &AppConfig) -> Theme {
    if let Ok(value) = std::env::var(THEME_ENV) {
        if let Some(theme) = Theme::parse(&value) {
            return theme;
        }
    }

    config
        .theme
        .as_deref()
        .and_then(Theme::parse)
        .unwrap_or(Theme::Dark)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_known_names() {
        assert_eq!(Theme::parse("light"), Some(Theme::Light));
        assert_eq!(Theme::parse(" DARK "), Some(Theme::Dark));
        assert_eq!(Theme::parse("sepia"), None);
    }

    #[test]
    fn toggle_flips_between_the_two() {
        assert_eq!(Theme::Light.toggle(), Theme::Dark);
        assert_eq!(Theme::Dark.toggle(), Theme::Light);
        assert_eq!(Theme::Dark.toggle().toggle(), Theme::Dark);
    }
}
