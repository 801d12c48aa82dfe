//! Display cell representation.
//!
//! A [`Glyph`] is the unit written to a display sink: one character with its
//! foreground and background colors.

use crate::Color;

/// A single display cell.
///
/// The default value, [`Glyph::EMPTY`], means "nothing drawn": a NUL
/// character on transparent colors. Surfaces reallocated by a rect change
/// hold empty glyphs until something is written.
///
/// # Examples
///
/// ```
/// use tessel_core::{Color, Glyph};
///
/// let glyph = Glyph::new('@', Color::YELLOW, Color::BLACK).with_fg(Color::RED);
/// assert_eq!(glyph.character, '@');
/// assert_eq!(glyph.fg, Color::RED);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glyph {
    /// The character displayed in this cell.
    pub character: char,
    /// Foreground (text) color.
    pub fg: Color,
    /// Background color.
    pub bg: Color,
}

impl Default for Glyph {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Glyph {
    /// The "nothing drawn" glyph.
    pub const EMPTY: Self = Self {
        character: '\0',
        fg: Color::TRANSPARENT,
        bg: Color::TRANSPARENT,
    };

    /// Creates a glyph from a character and both colors.
    #[inline]
    pub const fn new(character: char, fg: Color, bg: Color) -> Self {
        Self { character, fg, bg }
    }

    /// Creates a blank (space) glyph, white on the given background.
    #[inline]
    pub const fn blank(bg: Color) -> Self {
        Self {
            character: ' ',
            fg: Color::WHITE,
            bg,
        }
    }

    /// Sets the character.
    #[inline]
    pub const fn with_char(self, character: char) -> Self {
        Self { character, ..self }
    }

    /// Sets the foreground color.
    #[inline]
    pub const fn with_fg(self, fg: Color) -> Self {
        Self { fg, ..self }
    }

    /// Sets the background color.
    #[inline]
    pub const fn with_bg(self, bg: Color) -> Self {
        Self { bg, ..self }
    }

    /// Returns true if this is the "nothing drawn" glyph.
    #[inline]
    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyph_default_is_empty() {
        let glyph = Glyph::default();
        assert!(glyph.is_empty());
        assert_eq!(glyph.character, '\0');
        assert!(glyph.bg.is_transparent());
    }

    #[test]
    fn test_glyph_builder() {
        let glyph = Glyph::EMPTY
            .with_char('x')
            .with_fg(Color::GREEN)
            .with_bg(Color::BLUE);
        assert_eq!(glyph, Glyph::new('x', Color::GREEN, Color::BLUE));
        assert!(!glyph.is_empty());
    }

    #[test]
    fn test_glyph_blank() {
        let glyph = Glyph::blank(Color::BLACK);
        assert_eq!(glyph.character, ' ');
        assert_eq!(glyph.fg, Color::WHITE);
        assert_eq!(glyph.bg, Color::BLACK);
    }
}
