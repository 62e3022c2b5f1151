//! Color types shared by every drawing backend.
//!
//! [`Srgb`] is an opaque color with components in [0, 1], serialized as a hex
//! string. [`Rgba`] adds straight (non-premultiplied) alpha and is what the
//! effects hand to a [`DrawSurface`](crate::draw::DrawSurface).

use crate::error::EngineError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// sRGB color with components in [0, 1].
///
/// Serializes as a hex string `"#rrggbb"`. The hex round-trip quantizes to
/// 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Srgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// sRGB color with straight alpha, all components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Srgb {
    /// Builds a color from 8-bit channels.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
        }
    }

    /// Parses a hex color string like "#00d4ff" or "00d4ff" (case insensitive).
    ///
    /// Returns `EngineError::InvalidColor` if the input is not a 6-digit hex color.
    pub fn from_hex(hex: &str) -> Result<Srgb, EngineError> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(EngineError::InvalidColor(format!(
                "expected 6 hex digits, got '{hex}'"
            )));
        }
        let channel = |range: std::ops::Range<usize>, name: &str| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|e| EngineError::InvalidColor(format!("invalid {name} component: {e}")))
        };
        Ok(Srgb::from_rgb8(
            channel(0..2, "red")?,
            channel(2..4, "green")?,
            channel(4..6, "blue")?,
        ))
    }

    /// Converts the color to a hex string like `"#rrggbb"`.
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Quantizes to 8-bit channels with clamping and rounding.
    pub fn to_rgb8(self) -> [u8; 3] {
        [to_byte(self.r), to_byte(self.g), to_byte(self.b)]
    }

    /// Attaches an alpha value.
    pub fn with_alpha(self, a: f64) -> Rgba {
        Rgba {
            r: self.r,
            g: self.g,
            b: self.b,
            a,
        }
    }
}

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Rgba = Rgba {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    /// Returns the opaque part of the color.
    pub fn rgb(self) -> Srgb {
        Srgb {
            r: self.r,
            g: self.g,
            b: self.b,
        }
    }

    /// Returns the color with alpha clamped to [0, 1]. NaN alpha becomes 0.
    pub fn clamped(self) -> Rgba {
        let a = if self.a.is_nan() {
            0.0
        } else {
            self.a.clamp(0.0, 1.0)
        };
        Rgba { a, ..self }
    }

    /// Component-wise linear interpolation, `t` clamped to [0, 1].
    pub fn lerp(self, other: Rgba, t: f64) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        Rgba {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }

    /// CSS `rgba()` string as accepted by the 2D canvas API.
    ///
    /// Alpha is clamped so backends never see out-of-range values.
    pub fn to_css(self) -> String {
        let c = self.clamped();
        let [r, g, b] = c.rgb().to_rgb8();
        format!("rgba({r}, {g}, {b}, {})", c.a)
    }
}

fn to_byte(c: f64) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl Serialize for Srgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Srgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Srgb::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
