//! Theme palette and theme-bound color resolution.

use peniko::Color;

/// The active UI theme. Supplied by the host, never mutated by the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Toggle between light and dark.
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Get the color palette for this theme.
    pub fn colors(self) -> ThemeColors {
        match self {
            Theme::Light => ThemeColors {
                background: Color::from_rgba8(0xff, 0xff, 0xff, 0xff),
                grid: Color::from_rgba8(0xe6, 0xe6, 0xe6, 0xff),
                ink: Color::from_rgba8(0x22, 0x22, 0x22, 0xff),
            },
            Theme::Dark => ThemeColors {
                background: Color::from_rgba8(0x0f, 0x11, 0x15, 0xff),
                grid: Color::from_rgba8(0x2a, 0x2f, 0x3a, 0xff),
                ink: Color::from_rgba8(0xe6, 0xe6, 0xe6, 0xff),
            },
        }
    }
}

/// Resolved colors for one theme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemeColors {
    /// Canvas background fill.
    pub background: Color,
    /// Grid line color.
    pub grid: Color,
    /// Default ink color for theme-bound strokes and text.
    pub ink: Color,
}

/// A color that is either fixed at creation time or re-resolved from the
/// active theme every frame.
///
/// Theme-bound entities retroactively recolor when the theme changes,
/// without rewriting any stored data.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InkColor {
    /// Follow the active theme's ink color.
    #[default]
    ThemeBound,
    /// An explicit color chosen by the user.
    Fixed(Color),
}

impl InkColor {
    /// Resolve against the active theme palette.
    pub fn resolve(self, colors: &ThemeColors) -> Color {
        match self {
            InkColor::ThemeBound => colors.ink,
            InkColor::Fixed(c) => c,
        }
    }
}

impl From<Option<Color>> for InkColor {
    fn from(color: Option<Color>) -> Self {
        match color {
            Some(c) => InkColor::Fixed(c),
            None => InkColor::ThemeBound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_toggle() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
    }

    #[test]
    fn test_theme_bound_follows_theme() {
        let ink = InkColor::ThemeBound;
        assert_eq!(ink.resolve(&Theme::Light.colors()), Theme::Light.colors().ink);
        assert_eq!(ink.resolve(&Theme::Dark.colors()), Theme::Dark.colors().ink);
        assert_ne!(
            ink.resolve(&Theme::Light.colors()),
            ink.resolve(&Theme::Dark.colors())
        );
    }

    #[test]
    fn test_fixed_color_ignores_theme() {
        let red = Color::from_rgba8(0xff, 0x00, 0x00, 0xff);
        let ink = InkColor::Fixed(red);
        assert_eq!(ink.resolve(&Theme::Light.colors()), red);
        assert_eq!(ink.resolve(&Theme::Dark.colors()), red);
    }
}
