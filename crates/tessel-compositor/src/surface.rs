//! Surfaces: rectangular glyph buffers arranged in an attachment tree.
//!
//! Surface storage is owned by the [`Compositor`](crate::Compositor) and
//! addressed by [`SurfaceId`]. Reading goes through [`Surface`]; writing goes
//! through [`SurfaceMut`], a short-lived view that reports every changed cell
//! back to the compositor's dirty set.

use std::ops::Deref;

use smallvec::SmallVec;
use tessel_core::{Color, Glyph, Point, Rect};

use crate::dirty::DirtySet;

slotmap::new_key_type! {
    /// Handle to a surface registered with a [`Compositor`](crate::Compositor).
    ///
    /// Ids are generational: an id of a destroyed surface never aliases a
    /// surface created later in the same compositor.
    pub struct SurfaceId;
}

/// Callback invoked after a surface's rect is replaced.
pub type RectObserver = Box<dyn FnMut(SurfaceId, Rect) + Send>;

/// Dimensions of the output grid and its flat index mapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Grid {
    pub(crate) width: u16,
    pub(crate) height: u16,
}

impl Grid {
    #[inline]
    pub(crate) fn len(self) -> usize {
        self.width as usize * self.height as usize
    }

    #[inline]
    pub(crate) fn bounds(self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    #[inline]
    pub(crate) fn pack(self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    #[inline]
    pub(crate) fn unpack(self, index: usize) -> (u16, u16) {
        let width = self.width as usize;
        ((index % width) as u16, (index / width) as u16)
    }

    /// Packs signed screen coordinates, or `None` outside the grid.
    #[inline]
    pub(crate) fn pack_signed(self, x: i32, y: i32) -> Option<usize> {
        let x = u16::try_from(x).ok().filter(|&x| x < self.width)?;
        let y = u16::try_from(y).ok().filter(|&y| y < self.height)?;
        Some(self.pack(x, y))
    }
}

/// Allocates a buffer of `rect.area()` copies of `glyph`.
pub(crate) fn allocate(rect: Rect, glyph: Glyph) -> Vec<Glyph> {
    vec![glyph; rect.area() as usize]
}

/// A registered surface.
#[derive(Debug)]
pub struct Surface {
    pub(crate) rect: Rect,
    pub(crate) buffer: Vec<Glyph>,
    pub(crate) parent: Option<SurfaceId>,
    pub(crate) children: SmallVec<[SurfaceId; 4]>,
    pub(crate) generation: u32,
    pub(crate) creation_index: u64,
    pub(crate) absolute: Rect,
    pub(crate) background: Color,
}

impl Surface {
    pub(crate) fn root(width: u16, height: u16, background: Color) -> Self {
        let rect = Rect::new(0, 0, width, height);
        Self {
            rect,
            buffer: allocate(rect, Glyph::blank(background)),
            parent: None,
            children: SmallVec::new(),
            generation: 0,
            creation_index: 0,
            absolute: rect,
            background,
        }
    }

    /// Local rectangle: buffer size, and placement relative to the parent.
    #[inline]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Screen-space placement computed by the last resolve.
    #[inline]
    pub fn absolute_rect(&self) -> Rect {
        self.absolute
    }

    /// Depth in the attachment tree; the root is 0.
    #[inline]
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Attach order within the compositor; the root is 0.
    #[inline]
    pub fn creation_index(&self) -> u64 {
        self.creation_index
    }

    /// The parent surface, `None` for the root.
    #[inline]
    pub fn parent(&self) -> Option<SurfaceId> {
        self.parent
    }

    /// Returns true if this is the root surface.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Surfaces attached directly to this one, in attach order.
    #[inline]
    pub fn children(&self) -> &[SurfaceId] {
        &self.children
    }

    /// Background color used by [`SurfaceMut::clear`].
    #[inline]
    pub fn background(&self) -> Color {
        self.background
    }

    /// Row-major local buffer.
    #[inline]
    pub fn glyphs(&self) -> &[Glyph] {
        &self.buffer
    }

    #[inline]
    fn local_index(&self, x: i32, y: i32) -> Option<usize> {
        let x = u16::try_from(x).ok().filter(|&x| x < self.rect.width)?;
        let y = u16::try_from(y).ok().filter(|&y| y < self.rect.height)?;
        Some(y as usize * self.rect.width as usize + x as usize)
    }

    /// Returns the glyph at local (x, y), or `None` out of bounds.
    #[inline]
    pub fn glyph(&self, x: i32, y: i32) -> Option<Glyph> {
        self.local_index(x, y).map(|i| self.buffer[i])
    }

    /// Returns the glyph this surface shows at screen (sx, sy).
    ///
    /// Returns [`Glyph::EMPTY`] when the point lies outside the surface.
    pub fn glyph_at_screen(&self, sx: i32, sy: i32) -> Glyph {
        let origin = self.absolute.position();
        sx.checked_sub(origin.x)
            .zip(sy.checked_sub(origin.y))
            .and_then(|(x, y)| self.glyph(x, y))
            .unwrap_or(Glyph::EMPTY)
    }
}

/// A surface that has not been attached to any tree yet.
///
/// Attaching consumes the value, so a surface can never be attached twice.
///
/// ```
/// use tessel_compositor::{Compositor, DetachedSurface};
/// use tessel_core::{Color, Rect};
///
/// let mut compositor = Compositor::new(20, 10).unwrap();
/// let panel = DetachedSurface::new(Rect::new(1, 1, 5, 3)).with_background(Color::BLUE);
/// let id = compositor.attach(panel, compositor.root()).unwrap();
/// assert_eq!(compositor.surface(id).unwrap().background(), Color::BLUE);
/// ```
#[derive(Debug)]
pub struct DetachedSurface {
    rect: Rect,
    background: Color,
}

impl DetachedSurface {
    /// Creates a detached surface with a transparent background.
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            background: Color::TRANSPARENT,
        }
    }

    /// Sets the background color the surface is cleared with.
    #[must_use]
    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    /// Returns the local rectangle.
    #[inline]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Builds the node stored in the arena. The buffer starts cleared.
    pub(crate) fn into_node(
        self,
        parent: SurfaceId,
        parent_absolute: Rect,
        generation: u32,
        creation_index: u64,
    ) -> Surface {
        let origin = parent_absolute.position() + self.rect.position();
        Surface {
            rect: self.rect,
            buffer: allocate(self.rect, Glyph::blank(self.background)),
            parent: Some(parent),
            children: SmallVec::new(),
            generation,
            creation_index,
            absolute: self.rect.with_position(origin),
            background: self.background,
        }
    }
}

/// Mutable view of one surface.
///
/// Every successful write marks the matching screen cell dirty. Coordinates
/// are local to the surface; writes outside it are ignored.
pub struct SurfaceMut<'a> {
    id: SurfaceId,
    node: &'a mut Surface,
    dirty: &'a mut DirtySet,
    grid: Grid,
    topology_dirty: &'a mut bool,
    observers: &'a mut [RectObserver],
}

impl Deref for SurfaceMut<'_> {
    type Target = Surface;

    fn deref(&self) -> &Surface {
        self.node
    }
}

impl std::fmt::Debug for SurfaceMut<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurfaceMut")
            .field("id", &self.id)
            .field("rect", &self.node.rect)
            .field("absolute", &self.node.absolute)
            .finish_non_exhaustive()
    }
}

impl<'a> SurfaceMut<'a> {
    pub(crate) fn new(
        id: SurfaceId,
        node: &'a mut Surface,
        dirty: &'a mut DirtySet,
        grid: Grid,
        topology_dirty: &'a mut bool,
        observers: &'a mut [RectObserver],
    ) -> Self {
        Self {
            id,
            node,
            dirty,
            grid,
            topology_dirty,
            observers,
        }
    }

    /// The id of the surface being edited.
    #[inline]
    pub fn id(&self) -> SurfaceId {
        self.id
    }

    #[inline]
    fn mark(&mut self, x: i32, y: i32) {
        let origin = self.node.absolute.position();
        let (Some(gx), Some(gy)) = (origin.x.checked_add(x), origin.y.checked_add(y)) else {
            return;
        };
        if let Some(index) = self.grid.pack_signed(gx, gy) {
            self.dirty.mark(index);
        }
    }

    fn update(&mut self, x: i32, y: i32, f: impl FnOnce(&mut Glyph)) {
        if let Some(i) = self.node.local_index(x, y) {
            f(&mut self.node.buffer[i]);
            self.mark(x, y);
        }
    }

    /// Writes `text` left to right starting at (x, y), one cell per char.
    ///
    /// Stops at the first cell outside the surface.
    fn write_run(&mut self, x: i32, y: i32, text: &str, f: impl Fn(&mut Glyph, char)) {
        let mut cx = x;
        for ch in text.chars() {
            let Some(i) = self.node.local_index(cx, y) else {
                return;
            };
            f(&mut self.node.buffer[i], ch);
            self.mark(cx, y);
            cx = match cx.checked_add(1) {
                Some(next) => next,
                None => return,
            };
        }
    }

    /// Prints text, keeping each cell's colors.
    pub fn print(&mut self, x: i32, y: i32, text: &str) {
        self.write_run(x, y, text, |g, ch| g.character = ch);
    }

    /// Prints text with a foreground color, keeping each cell's background.
    pub fn print_fg(&mut self, x: i32, y: i32, text: &str, fg: Color) {
        self.write_run(x, y, text, |g, ch| {
            g.character = ch;
            g.fg = fg;
        });
    }

    /// Prints text with both colors.
    pub fn print_colored(&mut self, x: i32, y: i32, text: &str, fg: Color, bg: Color) {
        self.write_run(x, y, text, |g, ch| *g = Glyph::new(ch, fg, bg));
    }

    /// Replaces the character at (x, y).
    pub fn set_glyph(&mut self, x: i32, y: i32, ch: char) {
        self.update(x, y, |g| g.character = ch);
    }

    /// Replaces the character and both colors at (x, y).
    pub fn set_cell(&mut self, x: i32, y: i32, ch: char, fg: Color, bg: Color) {
        self.update(x, y, |g| *g = Glyph::new(ch, fg, bg));
    }

    /// Replaces the foreground color at (x, y).
    pub fn set_fore_color(&mut self, x: i32, y: i32, fg: Color) {
        self.update(x, y, |g| g.fg = fg);
    }

    /// Replaces the background color at (x, y).
    pub fn set_back_color(&mut self, x: i32, y: i32, bg: Color) {
        self.update(x, y, |g| g.bg = bg);
    }

    /// Overwrites the whole buffer with one glyph.
    pub fn fill_glyph(&mut self, glyph: Glyph) {
        self.node.buffer.fill(glyph);
        if let Some(visible) = self.node.absolute.intersection(self.grid.bounds()) {
            for point in visible.points() {
                // Inside the grid, so both coordinates fit in u16.
                self.dirty
                    .mark(self.grid.pack(point.x as u16, point.y as u16));
            }
        }
    }

    /// Overwrites the whole buffer with `ch` in the given colors.
    pub fn fill(&mut self, ch: char, fg: Color, bg: Color) {
        self.fill_glyph(Glyph::new(ch, fg, bg));
    }

    /// Fills with spaces, white on the surface's background.
    pub fn clear(&mut self) {
        self.fill_glyph(Glyph::blank(self.node.background));
    }

    /// Changes the background used by later [`clear`](Self::clear) calls.
    pub fn set_background(&mut self, background: Color) {
        self.node.background = background;
    }

    /// Replaces the local rectangle.
    ///
    /// The buffer is reallocated with empty glyphs, so prior content is lost.
    /// Rect observers are notified and placement is recomputed on the next
    /// flush.
    pub fn set_rect(&mut self, rect: Rect) {
        let old = self.node.rect;
        self.node.rect = rect;
        self.node.buffer = allocate(rect, Glyph::EMPTY);

        let parent_origin: Point = self.node.absolute.position() - old.position();
        self.node.absolute = rect.with_position(parent_origin + rect.position());
        *self.topology_dirty = true;

        for observer in self.observers.iter_mut() {
            observer(self.id, rect);
        }
    }
}
