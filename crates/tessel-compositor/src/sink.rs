//! Display sinks.
//!
//! A [`DisplaySink`] receives the committed glyph writes produced by
//! [`Compositor::flush`](crate::Compositor::flush). Two in-memory sinks are
//! provided here; the terminal backend lives in `tessel-terminal`.

use tessel_core::{Glyph, Rect};

/// Consumer of committed glyph writes.
///
/// `set` may be called up to `width * height` times per flush, in any order.
/// Implementations only update a displayable buffer; presenting it is a
/// separate step owned by the sink.
pub trait DisplaySink {
    /// Records the glyph now visible at (x, y).
    fn set(&mut self, x: u16, y: u16, glyph: Glyph);
}

impl<S: DisplaySink + ?Sized> DisplaySink for &mut S {
    #[inline]
    fn set(&mut self, x: u16, y: u16, glyph: Glyph) {
        (**self).set(x, y, glyph);
    }
}

impl<S: DisplaySink + ?Sized> DisplaySink for Box<S> {
    #[inline]
    fn set(&mut self, x: u16, y: u16, glyph: Glyph) {
        (**self).set(x, y, glyph);
    }
}

/// A 2D grid of glyphs holding the last value written to each cell.
///
/// Cells are stored in row-major order and start out as [`Glyph::EMPTY`].
///
/// # Examples
///
/// ```
/// use tessel_compositor::{DisplaySink, GridSink};
/// use tessel_core::{Color, Glyph};
///
/// let mut grid = GridSink::new(4, 2);
/// grid.set(1, 1, Glyph::new('x', Color::WHITE, Color::BLACK));
/// assert_eq!(grid.get(1, 1).unwrap().character, 'x');
/// assert_eq!(grid.row_text(1).unwrap(), " x  ");
/// ```
#[derive(Clone, Debug)]
pub struct GridSink {
    cells: Vec<Glyph>,
    width: u16,
    height: u16,
}

impl GridSink {
    /// Creates a grid with the specified dimensions.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            cells: vec![Glyph::EMPTY; width as usize * height as usize],
            width,
            height,
        }
    }

    /// Returns the grid width.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Returns the grid height.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Returns a rectangle covering the entire grid.
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Gets the glyph at (x, y), or `None` if out of bounds.
    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<&Glyph> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// Returns a slice of the underlying glyph storage.
    #[inline]
    pub fn cells(&self) -> &[Glyph] {
        &self.cells
    }

    /// Returns the glyphs of one row.
    pub fn row(&self, y: u16) -> Option<&[Glyph]> {
        if y < self.height {
            let start = y as usize * self.width as usize;
            Some(&self.cells[start..start + self.width as usize])
        } else {
            None
        }
    }

    /// Returns the characters of one row as a string.
    ///
    /// Empty glyphs read as spaces.
    pub fn row_text(&self, y: u16) -> Option<String> {
        self.row(y).map(|row| {
            row.iter()
                .map(|g| if g.is_empty() { ' ' } else { g.character })
                .collect()
        })
    }
}

impl DisplaySink for GridSink {
    fn set(&mut self, x: u16, y: u16, glyph: Glyph) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = glyph;
        }
    }
}

/// A single committed write.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellWrite {
    /// X coordinate (column) of the write.
    pub x: u16,
    /// Y coordinate (row) of the write.
    pub y: u16,
    /// The glyph written.
    pub glyph: Glyph,
}

impl CellWrite {
    /// Creates a new write record.
    #[inline]
    pub const fn new(x: u16, y: u16, glyph: Glyph) -> Self {
        Self { x, y, glyph }
    }
}

/// A sink that records every write it receives, in call order.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    writes: Vec<CellWrite>,
}

impl RecordingSink {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all recorded writes.
    #[inline]
    pub fn writes(&self) -> &[CellWrite] {
        &self.writes
    }

    /// Returns the number of recorded writes.
    #[inline]
    pub fn len(&self) -> usize {
        self.writes.len()
    }

    /// Returns true if nothing was recorded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Returns how many times (x, y) was written.
    pub fn count_at(&self, x: u16, y: u16) -> usize {
        self.writes.iter().filter(|w| w.x == x && w.y == y).count()
    }

    /// Returns the most recent glyph written to (x, y).
    pub fn last_at(&self, x: u16, y: u16) -> Option<Glyph> {
        self.writes
            .iter()
            .rev()
            .find(|w| w.x == x && w.y == y)
            .map(|w| w.glyph)
    }

    /// Removes and returns all recorded writes.
    pub fn take(&mut self) -> Vec<CellWrite> {
        std::mem::take(&mut self.writes)
    }

    /// Forgets all recorded writes.
    pub fn clear(&mut self) {
        self.writes.clear();
    }
}

impl DisplaySink for RecordingSink {
    fn set(&mut self, x: u16, y: u16, glyph: Glyph) {
        self.writes.push(CellWrite::new(x, y, glyph));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessel_core::Color;

    #[test]
    fn test_grid_sink_bounds() {
        let mut grid = GridSink::new(3, 2);
        grid.set(5, 5, Glyph::blank(Color::BLACK));
        assert!(grid.cells().iter().all(Glyph::is_empty));
        assert!(grid.get(3, 0).is_none());
        assert!(grid.row(2).is_none());
        assert_eq!(grid.bounds(), Rect::new(0, 0, 3, 2));
    }

    #[test]
    fn test_grid_sink_row_text() {
        let mut grid = GridSink::new(3, 1);
        grid.set(0, 0, Glyph::new('a', Color::WHITE, Color::BLACK));
        grid.set(2, 0, Glyph::new('c', Color::WHITE, Color::BLACK));
        assert_eq!(grid.row_text(0).as_deref(), Some("a c"));
    }

    #[test]
    fn test_recording_sink() {
        let mut rec = RecordingSink::new();
        let a = Glyph::new('a', Color::WHITE, Color::BLACK);
        let b = a.with_char('b');
        rec.set(1, 1, a);
        rec.set(1, 1, b);
        rec.set(0, 0, a);

        assert_eq!(rec.len(), 3);
        assert_eq!(rec.count_at(1, 1), 2);
        assert_eq!(rec.last_at(1, 1), Some(b));
        assert_eq!(rec.last_at(2, 2), None);

        let taken = rec.take();
        assert_eq!(taken[2], CellWrite::new(0, 0, a));
        assert!(rec.is_empty());
    }

    #[test]
    fn test_sink_through_mut_ref() {
        fn write_one(mut sink: impl DisplaySink) {
            sink.set(0, 0, Glyph::blank(Color::BLACK));
        }
        let mut rec = RecordingSink::new();
        write_one(&mut rec);
        assert_eq!(rec.len(), 1);
    }
}
