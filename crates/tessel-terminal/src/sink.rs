//! Crossterm display sink.

use std::io::Write;

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    queue,
    style::{Color as CrosstermColor, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use tessel_compositor::{DirtySet, DisplaySink};
use tessel_core::{Color, Error, Glyph, Result};
use tracing::trace;
use unicode_width::UnicodeWidthChar;

/// A [`DisplaySink`] that draws into a terminal through crossterm.
///
/// Writes are staged by [`set`](DisplaySink::set) and sent by
/// [`present`](Self::present). The sink remembers what the terminal shows and
/// skips cells whose glyph did not change, so repeated full repaints of the
/// same content produce no output.
pub struct CrosstermSink<W: Write> {
    writer: W,
    width: u16,
    height: u16,
    /// Glyphs staged since the last present.
    back: Vec<Glyph>,
    staged: DirtySet,
    /// What the terminal currently shows; `None` until first written.
    front: Vec<Option<Glyph>>,
}

impl<W: Write> std::fmt::Debug for CrosstermSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrosstermSink")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("staged", &self.staged.len())
            .finish_non_exhaustive()
    }
}

impl<W: Write> CrosstermSink<W> {
    /// Creates a sink for a `width` x `height` area at the terminal origin.
    pub fn new(writer: W, width: u16, height: u16) -> Self {
        let len = width as usize * height as usize;
        Self {
            writer,
            width,
            height,
            back: vec![Glyph::EMPTY; len],
            staged: DirtySet::with_len(len),
            front: vec![None; len],
        }
    }

    /// Returns the sink dimensions.
    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Number of cells waiting for [`present`](Self::present).
    pub fn staged_len(&self) -> usize {
        self.staged.len()
    }

    /// Returns a reference to the underlying writer.
    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Returns a mutable reference to the underlying writer.
    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    /// Consumes the sink, returning the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Forgets what the terminal shows, so every staged cell is written.
    pub fn invalidate(&mut self) {
        self.front.fill(None);
    }

    /// Hides the cursor and clears the screen.
    pub fn setup(&mut self) -> Result<()> {
        queue!(self.writer, Hide, ResetColor, Clear(ClearType::All)).map_err(Error::Io)?;
        self.invalidate();
        self.writer.flush().map_err(Error::Io)
    }

    /// Resets colors and shows the cursor again.
    pub fn teardown(&mut self) -> Result<()> {
        queue!(self.writer, ResetColor, Show).map_err(Error::Io)?;
        self.writer.flush().map_err(Error::Io)
    }

    /// Sends every staged change to the terminal and flushes the writer.
    ///
    /// Returns the number of cells actually written.
    pub fn present(&mut self) -> Result<usize> {
        let mut cursor: Option<(u16, u16)> = None;
        let mut current_fg: Option<Color> = None;
        let mut current_bg: Option<Color> = None;
        let mut written = 0;

        let width = self.width as usize;
        for index in self.staged.drain() {
            let glyph = self.back[index];
            if self.front[index] == Some(glyph) {
                continue;
            }
            let (x, y) = ((index % width) as u16, (index / width) as u16);

            if cursor != Some((x, y)) {
                queue!(self.writer, MoveTo(x, y)).map_err(Error::Io)?;
            }
            if current_fg != Some(glyph.fg) {
                queue!(self.writer, SetForegroundColor(to_crossterm_color(glyph.fg)))
                    .map_err(Error::Io)?;
                current_fg = Some(glyph.fg);
            }
            if current_bg != Some(glyph.bg) {
                queue!(self.writer, SetBackgroundColor(to_crossterm_color(glyph.bg)))
                    .map_err(Error::Io)?;
                current_bg = Some(glyph.bg);
            }
            let ch = printable(glyph.character);
            queue!(self.writer, Print(ch)).map_err(Error::Io)?;

            self.front[index] = Some(glyph);
            // Wide chars move the terminal cursor by two columns
            let advance = ch.width().unwrap_or(0) as u16;
            cursor = x
                .checked_add(advance)
                .filter(|&next| next < self.width)
                .map(|next| (next, y));
            written += 1;
        }

        if written > 0 {
            queue!(self.writer, ResetColor).map_err(Error::Io)?;
        }
        self.writer.flush().map_err(Error::Io)?;

        trace!(written, "presented");
        Ok(written)
    }
}

impl<W: Write> DisplaySink for CrosstermSink<W> {
    fn set(&mut self, x: u16, y: u16, glyph: Glyph) {
        if x < self.width && y < self.height {
            let index = y as usize * self.width as usize + x as usize;
            self.back[index] = glyph;
            self.staged.mark(index);
        }
    }
}

/// Converts a color to crossterm's color type.
///
/// Transparent colors map to the terminal default.
#[inline]
fn to_crossterm_color(color: Color) -> CrosstermColor {
    if color.is_transparent() {
        return CrosstermColor::Reset;
    }
    let (r, g, b) = color.to_rgb_u8();
    CrosstermColor::Rgb { r, g, b }
}

/// Empty and control characters print as a space.
#[inline]
fn printable(ch: char) -> char {
    if ch.is_control() { ' ' } else { ch }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn output(sink: &mut CrosstermSink<Vec<u8>>) -> String {
        String::from_utf8(std::mem::take(sink.writer_mut())).unwrap()
    }

    #[test]
    fn test_color_conversion() {
        assert_eq!(to_crossterm_color(Color::TRANSPARENT), CrosstermColor::Reset);
        assert_eq!(
            to_crossterm_color(Color::from_rgb_u8(1, 2, 3)),
            CrosstermColor::Rgb { r: 1, g: 2, b: 3 }
        );
    }

    #[test]
    fn test_present_writes_staged_cells() {
        let mut sink = CrosstermSink::new(Vec::new(), 4, 2);
        sink.set(1, 1, Glyph::new('a', Color::WHITE, Color::BLACK));
        sink.set(2, 1, Glyph::new('b', Color::WHITE, Color::BLACK));
        assert_eq!(sink.staged_len(), 2);

        assert_eq!(sink.present().unwrap(), 2);
        let out = output(&mut sink);
        assert!(out.contains('a'));
        assert!(out.contains('b'));
        // One cursor move: 'b' follows 'a' on the same row
        assert_eq!(out.matches("\x1b[2;2H").count(), 1);
        assert!(!out.contains("\x1b[2;3H"));
        assert_eq!(sink.staged_len(), 0);
    }

    #[test]
    fn test_wide_char_forces_cursor_move() {
        let mut sink = CrosstermSink::new(Vec::new(), 4, 1);
        sink.set(0, 0, Glyph::new('中', Color::WHITE, Color::BLACK));
        sink.set(1, 0, Glyph::new('a', Color::WHITE, Color::BLACK));
        sink.set(2, 0, Glyph::new('b', Color::WHITE, Color::BLACK));
        sink.present().unwrap();

        let out = output(&mut sink);
        assert!(out.contains("\x1b[1;2Ha"));
        // 'b' follows a narrow char, so no move is needed
        assert!(out.contains("ab"));
        assert!(!out.contains("\x1b[1;3H"));
    }

    #[test]
    fn test_unchanged_cells_are_skipped() {
        let mut sink = CrosstermSink::new(Vec::new(), 2, 1);
        let glyph = Glyph::new('x', Color::RED, Color::BLACK);
        sink.set(0, 0, glyph);
        sink.present().unwrap();
        output(&mut sink);

        sink.set(0, 0, glyph);
        assert_eq!(sink.present().unwrap(), 0);
        assert_eq!(output(&mut sink), "");

        sink.invalidate();
        sink.set(0, 0, glyph);
        assert_eq!(sink.present().unwrap(), 1);
    }

    #[test]
    fn test_empty_glyph_prints_space() {
        let mut sink = CrosstermSink::new(Vec::new(), 1, 1);
        sink.set(0, 0, Glyph::EMPTY);
        sink.present().unwrap();
        let out = output(&mut sink);
        assert!(out.contains(' '));
        assert!(!out.contains('\0'));
    }

    #[test]
    fn test_out_of_bounds_set_is_ignored() {
        let mut sink = CrosstermSink::new(Vec::new(), 2, 2);
        sink.set(2, 0, Glyph::EMPTY);
        sink.set(0, 2, Glyph::EMPTY);
        assert_eq!(sink.staged_len(), 0);
    }
}
