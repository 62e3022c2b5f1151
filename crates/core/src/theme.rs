//! Named color themes for the page effects.
//!
//! Both themes share the same accent colors; switching theme only swaps the
//! page background the layers are composited over.

use serde::{Deserialize, Serialize};

use crate::color::Srgb;
use crate::error::EngineError;

/// All built-in theme names.
const THEME_NAMES: &[&str] = &["dark", "light"];

/// Colors used by the particle field and wave background.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    /// Primary accent: particle discs, glow, connection lines, wave ends.
    pub accent: Srgb,
    /// Secondary accent: middle stop of the wave gradient.
    pub secondary: Srgb,
    /// Near-white color of each particle's luminous core.
    pub core: Srgb,
    /// Page background behind every layer.
    pub background: Srgb,
}

impl Theme {
    /// Dark page theme (the default).
    pub fn dark() -> Self {
        Self {
            accent: Srgb::from_rgb8(0x00, 0xd4, 0xff),
            secondary: Srgb::from_rgb8(0xb9, 0x67, 0xdb),
            core: Srgb::from_rgb8(0xff, 0xff, 0xff),
            background: Srgb::from_rgb8(0x0a, 0x0a, 0x0f),
        }
    }

    /// Light page theme.
    pub fn light() -> Self {
        Self {
            background: Srgb::from_rgb8(0xff, 0xff, 0xff),
            ..Self::dark()
        }
    }

    /// Looks up a theme by name.
    ///
    /// Returns `EngineError::UnknownTheme` if the name is not recognized.
    pub fn from_name(name: &str) -> Result<Self, EngineError> {
        match name {
            "dark" => Ok(Self::dark()),
            "light" => Ok(Self::light()),
            _ => Err(EngineError::UnknownTheme(name.to_string())),
        }
    }

    /// Returns the theme the page toggle switches to.
    pub fn toggled(&self) -> Self {
        if *self == Self::dark() {
            Self::light()
        } else {
            Self::dark()
        }
    }

    /// Name of a built-in theme; custom palettes report the theme whose
    /// background they share, falling back to `"dark"`.
    pub fn name(&self) -> &'static str {
        if self.background == Self::light().background {
            "light"
        } else {
            "dark"
        }
    }

    /// Returns a slice of all built-in theme names.
    pub fn list_names() -> &'static [&'static str] {
        THEME_NAMES
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_dark() {
        assert_eq!(Theme::default(), Theme::dark());
    }

    #[test]
    fn dark_accents_match_page_palette() {
        let t = Theme::dark();
        assert_eq!(t.accent.to_hex(), "#00d4ff");
        assert_eq!(t.secondary.to_hex(), "#b967db");
        assert_eq!(t.background.to_hex(), "#0a0a0f");
    }

    #[test]
    fn light_shares_accents_with_dark() {
        let (d, l) = (Theme::dark(), Theme::light());
        assert_eq!(d.accent, l.accent);
        assert_eq!(d.secondary, l.secondary);
        assert_eq!(d.core, l.core);
        assert_ne!(d.background, l.background);
    }

    #[test]
    fn from_name_resolves_every_listed_name() {
        for name in Theme::list_names() {
            assert!(Theme::from_name(name).is_ok(), "theme {name} not resolvable");
        }
    }

    #[test]
    fn from_name_unknown_returns_error() {
        assert!(matches!(
            Theme::from_name("solarized"),
            Err(EngineError::UnknownTheme(_))
        ));
    }

    #[test]
    fn name_round_trips_through_from_name() {
        for name in Theme::list_names() {
            assert_eq!(Theme::from_name(name).unwrap().name(), *name);
        }
    }

    #[test]
    fn toggled_flips_between_dark_and_light() {
        assert_eq!(Theme::dark().toggled(), Theme::light());
        assert_eq!(Theme::light().toggled(), Theme::dark());
    }

    #[test]
    fn serde_round_trip() {
        let json = serde_json::to_string(&Theme::light()).unwrap();
        let back: Theme = serde_json::from_str(&json).unwrap();
        assert_eq!(back.background.to_hex(), "#ffffff");
        assert_eq!(back.accent.to_hex(), "#00d4ff");
    }
}
