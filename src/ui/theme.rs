use log::*;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Theme color palette defining all colors used in the application.
///
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    // Primary colors
    pub primary: ColorSpec,
    pub accent: ColorSpec,
    pub banner: ColorSpec,

    // Text colors
    pub text: ColorSpec,
    pub text_muted: ColorSpec,

    // Status colors
    pub success: ColorSpec,
    pub warning: ColorSpec,
    pub error: ColorSpec,

    // UI element colors
    pub border_active: ColorSpec,
    pub border_normal: ColorSpec,
    pub highlight_fg: ColorSpec,
}

/// Color specification that can be serialized/deserialized.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorSpec {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ColorSpec {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        ColorSpec { r, g, b }
    }

    pub fn to_color(&self) -> Color {
        Color::Rgb(self.r, self.g, self.b)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::spotify_dark()
    }
}

impl Theme {
    /// Green on charcoal, like the desktop client.
    ///
    pub fn spotify_dark() -> Self {
        Theme {
            name: "spotify-dark".to_string(),
            primary: ColorSpec::rgb(30, 215, 96), // Spotify green
            accent: ColorSpec::rgb(80, 155, 245),
            banner: ColorSpec::rgb(30, 215, 96),
            text: ColorSpec::rgb(255, 255, 255),
            text_muted: ColorSpec::rgb(167, 167, 167),
            success: ColorSpec::rgb(30, 215, 96),
            warning: ColorSpec::rgb(255, 164, 43),
            error: ColorSpec::rgb(233, 20, 41),
            border_active: ColorSpec::rgb(30, 215, 96),
            border_normal: ColorSpec::rgb(83, 83, 83),
            highlight_fg: ColorSpec::rgb(30, 215, 96),
        }
    }

    /// Darker green on light terminals.
    ///
    pub fn spotify_light() -> Self {
        Theme {
            name: "spotify-light".to_string(),
            primary: ColorSpec::rgb(17, 130, 59),
            accent: ColorSpec::rgb(39, 85, 196),
            banner: ColorSpec::rgb(17, 130, 59),
            text: ColorSpec::rgb(25, 20, 20),
            text_muted: ColorSpec::rgb(106, 106, 106),
            success: ColorSpec::rgb(17, 130, 59),
            warning: ColorSpec::rgb(176, 96, 0),
            error: ColorSpec::rgb(190, 20, 35),
            border_active: ColorSpec::rgb(17, 130, 59),
            border_normal: ColorSpec::rgb(179, 179, 179),
            highlight_fg: ColorSpec::rgb(17, 130, 59),
        }
    }

    /// Get theme by name.
    ///
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "spotify-dark" => Some(Self::spotify_dark()),
            "spotify-light" => Some(Self::spotify_light()),
            _ => None,
        }
    }

    /// Get theme by name, falling back to the default for unknown names.
    ///
    pub fn by_name(name: &str) -> Self {
        Self::from_name(name).unwrap_or_else(|| {
            warn!(
                "Unknown theme '{}'; available: {}. Using default.",
                name,
                Self::available_themes().join(", ")
            );
            Self::default()
        })
    }

    /// Get list of available theme names.
    ///
    pub fn available_themes() -> Vec<String> {
        vec!["spotify-dark".to_string(), "spotify-light".to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_theme_resolves() {
        for name in Theme::available_themes() {
            assert_eq!(Theme::from_name(&name).map(|t| t.name), Some(name));
        }
    }

    #[test]
    fn unknown_theme_falls_back_to_default() {
        assert_eq!(Theme::by_name("rose-pine"), Theme::default());
        assert_eq!(Theme::by_name("spotify-light").name, "spotify-light");
    }
}
