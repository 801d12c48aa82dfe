//! RGBA color representation.
//!
//! Colors are represented using normalized f32 components in the range 0.0 to
//! 1.0. Display sinks convert them to whatever their backend understands.
//!
//! # Supported Formats
//!
//! - Hex strings: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`
//! - RGB u8 values: `(0-255, 0-255, 0-255)`
//! - A handful of named colors (see [`Color::from_name`])
//!
//! # Examples
//!
//! ```
//! use tessel_core::color::Color;
//!
//! let red = Color::from_hex("#FF0000").unwrap();
//! let green = Color::from_rgb_u8(0, 255, 0);
//! assert_eq!(red, Color::RED);
//! assert_eq!(green.to_hex(), "#00FF00");
//! ```

use crate::error::ColorParseError;
use std::fmt;

/// An RGBA color with normalized f32 components in the range 0.0 to 1.0.
#[derive(Clone, Copy, PartialEq)]
pub struct Color {
    /// Red component (0.0 - 1.0).
    pub r: f32,
    /// Green component (0.0 - 1.0).
    pub g: f32,
    /// Blue component (0.0 - 1.0).
    pub b: f32,
    /// Alpha component (0.0 = transparent, 1.0 = opaque).
    pub a: f32,
}

impl Default for Color {
    fn default() -> Self {
        Self::TRANSPARENT
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 1.0 {
            write!(f, "Color::rgb({:.3}, {:.3}, {:.3})", self.r, self.g, self.b)
        } else {
            write!(
                f,
                "Color::rgba({:.3}, {:.3}, {:.3}, {:.3})",
                self.r, self.g, self.b, self.a
            )
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

// ============================================================================
// Common color constants
// ============================================================================

impl Color {
    /// Fully transparent color (alpha = 0).
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);

    /// Opaque black (#000000).
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);

    /// Opaque white (#FFFFFF).
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);

    /// Opaque red (#FF0000).
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);

    /// Opaque green (#00FF00).
    pub const GREEN: Self = Self::rgb(0.0, 1.0, 0.0);

    /// Opaque blue (#0000FF).
    pub const BLUE: Self = Self::rgb(0.0, 0.0, 1.0);

    /// Opaque yellow (#FFFF00).
    pub const YELLOW: Self = Self::rgb(1.0, 1.0, 0.0);

    /// Opaque cyan (#00FFFF).
    pub const CYAN: Self = Self::rgb(0.0, 1.0, 1.0);

    /// Opaque magenta (#FF00FF).
    pub const MAGENTA: Self = Self::rgb(1.0, 0.0, 1.0);

    /// Medium gray (#808080).
    pub const GRAY: Self = Self::rgb(0.5, 0.5, 0.5);

    /// Dark gray (#404040).
    pub const DARK_GRAY: Self = Self::rgb(0.25, 0.25, 0.25);
}

// ============================================================================
// Constructors
// ============================================================================

impl Color {
    /// Creates a new color from normalized RGBA components.
    #[inline]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a new opaque color from normalized RGB components.
    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Creates a new color from u8 RGBA components (0-255).
    #[inline]
    pub fn from_rgba_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    /// Creates a new opaque color from u8 RGB components (0-255).
    #[inline]
    pub fn from_rgb_u8(r: u8, g: u8, b: u8) -> Self {
        Self::from_rgba_u8(r, g, b, 255)
    }
}

// ============================================================================
// Parsing and formatting
// ============================================================================

impl Color {
    /// Parses a color from a hex string.
    ///
    /// Supports `#RGB`, `#RGBA`, `#RRGGBB` and `#RRGGBBAA`. The `#` prefix is
    /// optional.
    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);

        if hex.is_empty() {
            return Err(ColorParseError::EmptyInput);
        }
        if !hex.is_ascii() {
            return Err(ColorParseError::InvalidHexChar);
        }

        let expanded: String = match hex.len() {
            3 | 4 => hex.chars().flat_map(|c| [c, c]).collect(),
            6 | 8 => hex.to_string(),
            len => return Err(ColorParseError::InvalidLength(len)),
        };

        let parse_component = |s: &str| -> Result<u8, ColorParseError> {
            u8::from_str_radix(s, 16).map_err(|_| ColorParseError::InvalidHexChar)
        };

        let r = parse_component(&expanded[0..2])?;
        let g = parse_component(&expanded[2..4])?;
        let b = parse_component(&expanded[4..6])?;
        let a = if expanded.len() == 8 {
            parse_component(&expanded[6..8])?
        } else {
            255
        };

        Ok(Self::from_rgba_u8(r, g, b, a))
    }

    /// Parses a color from a name, `"transparent"`, or a hex string.
    pub fn parse(input: &str) -> Result<Self, ColorParseError> {
        let trimmed = input.trim();
        if trimmed.eq_ignore_ascii_case("transparent") {
            return Ok(Self::TRANSPARENT);
        }
        if let Some(color) = Self::from_name(trimmed) {
            return Ok(color);
        }
        Self::from_hex(trimmed)
    }

    /// Returns a color for the given name, or `None` if not found.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "black" => Some(Self::BLACK),
            "white" => Some(Self::WHITE),
            "red" => Some(Self::RED),
            "green" | "lime" => Some(Self::GREEN),
            "blue" => Some(Self::BLUE),
            "yellow" => Some(Self::YELLOW),
            "cyan" | "aqua" => Some(Self::CYAN),
            "magenta" | "fuchsia" => Some(Self::MAGENTA),
            "gray" | "grey" => Some(Self::GRAY),
            "darkgray" | "darkgrey" => Some(Self::DARK_GRAY),
            _ => None,
        }
    }

    /// Converts the color to a hex string.
    ///
    /// Returns `#RRGGBB` for opaque colors or `#RRGGBBAA` for colors with alpha.
    pub fn to_hex(&self) -> String {
        let (r, g, b, a) = self.to_rgba_u8();
        if a == 255 {
            format!("#{:02X}{:02X}{:02X}", r, g, b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", r, g, b, a)
        }
    }
}

// ============================================================================
// Component access
// ============================================================================

impl Color {
    /// Returns the color components as u8 values (0-255).
    #[inline]
    pub fn to_rgba_u8(&self) -> (u8, u8, u8, u8) {
        (
            (self.r.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.g.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.b.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.a.clamp(0.0, 1.0) * 255.0).round() as u8,
        )
    }

    /// Returns the RGB components as u8 values (0-255).
    #[inline]
    pub fn to_rgb_u8(&self) -> (u8, u8, u8) {
        let (r, g, b, _) = self.to_rgba_u8();
        (r, g, b)
    }

    /// Returns whether the color is fully transparent (alpha ≈ 0).
    #[inline]
    pub fn is_transparent(&self) -> bool {
        self.a < 0.001
    }
}
