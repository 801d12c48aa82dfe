//! The compositor: surface registry, ownership resolution and flushing.

use std::fmt;

use slotmap::SlotMap;
use tessel_core::{Color, Error, Glyph, Rect, Result, Size};
use tracing::{debug, trace};

use crate::dirty::DirtySet;
use crate::sink::DisplaySink;
use crate::surface::{DetachedSurface, Grid, RectObserver, Surface, SurfaceId, SurfaceMut};

/// What a call to [`Compositor::flush`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FlushStats {
    /// Whether placement and ownership were recomputed first.
    pub resolved: bool,
    /// Whether every cell was emitted.
    pub full_repaint: bool,
    /// Number of `DisplaySink::set` calls made.
    pub cells_emitted: usize,
}

/// Flattens a tree of overlapping surfaces into one grid of cells.
///
/// Every cell has exactly one owner. Deeper surfaces win over shallower ones,
/// and among surfaces of the same depth the one attached last wins. The root
/// surface covers the whole grid and owns whatever no other surface covers.
///
/// Writes made through [`SurfaceMut`] are tracked per cell, so a
/// [`flush`](Self::flush) only re-emits the cells that changed. Attaching,
/// destroying or resizing a surface invalidates ownership; the next flush
/// recomputes it and repaints everything.
///
/// # Examples
///
/// ```
/// use tessel_compositor::{Compositor, GridSink};
/// use tessel_core::{Color, Rect};
///
/// let mut compositor = Compositor::new(10, 4).unwrap();
/// let label = compositor.create(compositor.root(), Rect::new(2, 1, 5, 1)).unwrap();
/// compositor
///     .surface_mut(label)
///     .unwrap()
///     .print_fg(0, 0, "hello", Color::YELLOW);
///
/// let mut grid = GridSink::new(10, 4);
/// compositor.flush(&mut grid);
/// assert_eq!(grid.row_text(1).unwrap(), "  hello   ");
/// ```
pub struct Compositor {
    grid: Grid,
    surfaces: SlotMap<SurfaceId, Surface>,
    root: SurfaceId,
    /// Surfaces sorted by (generation, creation index) at the last resolve.
    order: Vec<SurfaceId>,
    /// Per cell, a slot in `order`. Slot 0 is the root.
    cell_owner: Vec<u32>,
    dirty: DirtySet,
    full_repaint: bool,
    topology_dirty: bool,
    next_creation_index: u64,
    observers: Vec<RectObserver>,
}

impl fmt::Debug for Compositor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Compositor")
            .field("width", &self.grid.width)
            .field("height", &self.grid.height)
            .field("surfaces", &self.surfaces.len())
            .field("dirty", &self.dirty.len())
            .field("full_repaint", &self.full_repaint)
            .field("topology_dirty", &self.topology_dirty)
            .finish_non_exhaustive()
    }
}

impl Compositor {
    /// Creates a compositor whose root surface covers `width` x `height`
    /// cells, cleared on a transparent background.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if either dimension is zero.
    pub fn new(width: u16, height: u16) -> Result<Self> {
        Self::with_background(width, height, Color::TRANSPARENT)
    }

    /// Creates a compositor whose root surface is cleared on `background`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if either dimension is zero.
    pub fn with_background(width: u16, height: u16, background: Color) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions(format!(
                "compositor must be at least 1x1, got {width}x{height}"
            )));
        }

        let grid = Grid { width, height };
        let mut surfaces = SlotMap::with_key();
        let root = surfaces.insert(Surface::root(width, height, background));

        Ok(Self {
            grid,
            surfaces,
            root,
            order: vec![root],
            cell_owner: vec![0; grid.len()],
            dirty: DirtySet::with_len(grid.len()),
            full_repaint: true,
            topology_dirty: true,
            next_creation_index: 1,
            observers: Vec::new(),
        })
    }

    /// The root surface.
    #[inline]
    pub fn root(&self) -> SurfaceId {
        self.root
    }

    /// Output grid dimensions.
    #[inline]
    pub fn size(&self) -> Size {
        Size::new(self.grid.width, self.grid.height)
    }

    /// Output grid width.
    #[inline]
    pub fn width(&self) -> u16 {
        self.grid.width
    }

    /// Output grid height.
    #[inline]
    pub fn height(&self) -> u16 {
        self.grid.height
    }

    /// Number of live surfaces, root included.
    #[inline]
    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    /// Returns true if `id` names a live surface of this compositor.
    #[inline]
    pub fn contains(&self, id: SurfaceId) -> bool {
        self.surfaces.contains_key(id)
    }

    /// Returns true if the next flush will recompute ownership.
    #[inline]
    pub fn is_topology_dirty(&self) -> bool {
        self.topology_dirty
    }

    /// Returns true if the next flush will emit every cell.
    #[inline]
    pub fn needs_full_repaint(&self) -> bool {
        self.full_repaint || self.topology_dirty
    }

    /// Number of cells waiting to be re-emitted.
    #[inline]
    pub fn dirty_len(&self) -> usize {
        self.dirty.len()
    }

    /// Creates a surface attached to `parent`.
    ///
    /// The new surface is cleared (spaces on a transparent background).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAttachment`] if `parent` is not a live surface
    /// of this compositor.
    pub fn create(&mut self, parent: SurfaceId, rect: Rect) -> Result<SurfaceId> {
        self.attach(DetachedSurface::new(rect), parent)
    }

    /// Attaches a detached surface to `parent` and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAttachment`] if `parent` is not a live surface
    /// of this compositor.
    pub fn attach(&mut self, surface: DetachedSurface, parent: SurfaceId) -> Result<SurfaceId> {
        let Some(parent_node) = self.surfaces.get(parent) else {
            return Err(Error::InvalidAttachment(format!(
                "parent {parent:?} is not a live surface"
            )));
        };

        let creation_index = self.next_creation_index;
        self.next_creation_index += 1;

        let node = surface.into_node(
            parent,
            parent_node.absolute,
            parent_node.generation + 1,
            creation_index,
        );
        let rect = node.rect;
        let id = self.surfaces.insert(node);
        if let Some(parent_node) = self.surfaces.get_mut(parent) {
            parent_node.children.push(id);
        }
        self.topology_dirty = true;

        debug!(?id, ?parent, creation_index, ?rect, "attached surface");
        Ok(id)
    }

    /// Destroys a surface together with everything attached below it.
    ///
    /// Returns the number of surfaces removed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDetachment`] for the root and
    /// [`Error::SurfaceNotFound`] for an id that is not live.
    pub fn destroy(&mut self, id: SurfaceId) -> Result<usize> {
        if id == self.root {
            return Err(Error::InvalidDetachment(
                "the root surface cannot be destroyed".to_string(),
            ));
        }
        let Some(parent) = self.surfaces.get(id).and_then(Surface::parent) else {
            return Err(Error::SurfaceNotFound(format!("{id:?}")));
        };

        if let Some(parent_node) = self.surfaces.get_mut(parent) {
            parent_node.children.retain(|child| *child != id);
        }

        let mut removed = 0;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.surfaces.remove(current) {
                stack.extend(node.children);
                removed += 1;
            }
        }
        self.topology_dirty = true;

        debug!(?id, removed, "destroyed surface");
        Ok(removed)
    }

    /// Returns a surface for reading.
    #[inline]
    pub fn surface(&self, id: SurfaceId) -> Option<&Surface> {
        self.surfaces.get(id)
    }

    /// Returns a view for editing a surface.
    pub fn surface_mut(&mut self, id: SurfaceId) -> Option<SurfaceMut<'_>> {
        let node = self.surfaces.get_mut(id)?;
        Some(SurfaceMut::new(
            id,
            node,
            &mut self.dirty,
            self.grid,
            &mut self.topology_dirty,
            &mut self.observers,
        ))
    }

    /// Registers a callback fired whenever a surface's rect is replaced.
    pub fn on_rect_updated(&mut self, observer: impl FnMut(SurfaceId, Rect) + Send + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Marks one cell for re-emission. Out-of-range indices are ignored.
    #[inline]
    pub fn mark_cell_dirty(&mut self, index: usize) {
        self.dirty.mark(index);
    }

    /// Requests that the next flush emit every cell.
    #[inline]
    pub fn mark_all_dirty(&mut self) {
        self.full_repaint = true;
    }

    /// Flat index of grid cell (x, y).
    #[inline]
    pub fn pack_index(&self, x: u16, y: u16) -> usize {
        self.grid.pack(x, y)
    }

    /// Grid cell of a flat index; inverse of [`pack_index`](Self::pack_index).
    #[inline]
    pub fn unpack_index(&self, index: usize) -> (u16, u16) {
        self.grid.unpack(index)
    }

    /// The surface owning cell (x, y) as of the last resolve.
    pub fn owner_at(&self, x: u16, y: u16) -> Option<SurfaceId> {
        if x >= self.grid.width || y >= self.grid.height {
            return None;
        }
        let slot = self.cell_owner[self.grid.pack(x, y)];
        self.order
            .get(slot as usize)
            .copied()
            .filter(|id| self.surfaces.contains_key(*id))
    }

    /// The glyph currently composited at (x, y), as a flush would emit it.
    pub fn visible_glyph(&self, x: u16, y: u16) -> Option<Glyph> {
        if x >= self.grid.width || y >= self.grid.height {
            return None;
        }
        Some(visible_glyph(
            self.grid,
            &self.surfaces,
            &self.order,
            &self.cell_owner,
            self.grid.pack(x, y),
        ))
    }

    /// Recomputes generations, screen placement and cell ownership.
    ///
    /// Called by [`flush`](Self::flush) when the topology changed. Always
    /// schedules a full repaint.
    pub fn resolve(&mut self) {
        // A parent is always attached before its children, so creation order
        // visits every parent first.
        let mut order: Vec<(u64, SurfaceId)> = self
            .surfaces
            .iter()
            .map(|(id, node)| (node.creation_index, id))
            .collect();
        order.sort_unstable_by_key(|&(index, _)| index);

        for &(_, id) in &order {
            let parent = self.surfaces.get(id).and_then(Surface::parent);
            let generation = parent
                .and_then(|p| self.surfaces.get(p))
                .map_or(0, |p| p.generation + 1);
            if let Some(node) = self.surfaces.get_mut(id) {
                node.generation = generation;
            }
        }

        let mut order: Vec<(u32, u64, SurfaceId)> = order
            .into_iter()
            .filter_map(|(index, id)| self.surfaces.get(id).map(|n| (n.generation, index, id)))
            .collect();
        order.sort_unstable_by_key(|&(generation, index, _)| (generation, index));

        for &(_, _, id) in &order {
            let parent_origin = self
                .surfaces
                .get(id)
                .and_then(Surface::parent)
                .and_then(|p| self.surfaces.get(p))
                .map(|p| p.absolute.position());
            if let Some(node) = self.surfaces.get_mut(id) {
                node.absolute = match parent_origin {
                    Some(origin) => node.rect.with_position(origin + node.rect.position()),
                    None => node.rect,
                };
            }
        }

        self.order.clear();
        self.order.extend(order.iter().map(|&(_, _, id)| id));

        self.cell_owner.fill(0);
        let bounds = self.grid.bounds();
        let mut covered = 0usize;
        for (slot, id) in self.order.iter().enumerate().skip(1) {
            let Some(visible) = self
                .surfaces
                .get(*id)
                .and_then(|node| node.absolute.intersection(bounds))
            else {
                continue;
            };
            let width = visible.width as usize;
            for y in visible.rows() {
                let start = self.grid.pack(visible.x as u16, y as u16);
                self.cell_owner[start..start + width].fill(slot as u32);
            }
            covered += visible.area() as usize;
        }

        self.full_repaint = true;
        self.topology_dirty = false;

        debug!(surfaces = self.order.len(), covered, "resolved surface topology");
    }

    /// Emits changed cells to `sink`.
    ///
    /// Resolves first if the topology changed. Emits every cell in row-major
    /// order when a full repaint is pending, otherwise only the dirty cells in
    /// the order they were marked. Either way the dirty set is empty
    /// afterwards.
    pub fn flush<S: DisplaySink + ?Sized>(&mut self, sink: &mut S) -> FlushStats {
        let resolved = self.topology_dirty;
        if resolved {
            self.resolve();
        }

        let Self {
            grid,
            surfaces,
            order,
            cell_owner,
            dirty,
            full_repaint,
            ..
        } = self;
        let grid = *grid;

        let stats = if *full_repaint {
            for index in 0..grid.len() {
                let (x, y) = grid.unpack(index);
                sink.set(x, y, visible_glyph(grid, surfaces, order, cell_owner, index));
            }
            dirty.clear();
            *full_repaint = false;
            FlushStats {
                resolved,
                full_repaint: true,
                cells_emitted: grid.len(),
            }
        } else {
            let mut cells_emitted = 0;
            for index in dirty.drain() {
                let (x, y) = grid.unpack(index);
                sink.set(x, y, visible_glyph(grid, surfaces, order, cell_owner, index));
                cells_emitted += 1;
            }
            FlushStats {
                resolved,
                full_repaint: false,
                cells_emitted,
            }
        };

        trace!(
            resolved = stats.resolved,
            full_repaint = stats.full_repaint,
            cells = stats.cells_emitted,
            "flushed"
        );
        stats
    }
}

/// Looks up the owner of a cell and asks it for the glyph there.
fn visible_glyph(
    grid: Grid,
    surfaces: &SlotMap<SurfaceId, Surface>,
    order: &[SurfaceId],
    cell_owner: &[u32],
    index: usize,
) -> Glyph {
    let (x, y) = grid.unpack(index);
    cell_owner
        .get(index)
        .and_then(|&slot| order.get(slot as usize))
        .and_then(|&id| surfaces.get(id))
        .map_or(Glyph::EMPTY, |node| {
            node.glyph_at_screen(i32::from(x), i32::from(y))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::RecordingSink;
    use pretty_assertions::assert_eq;

    fn assert_send<T: Send>() {}

    #[test]
    fn test_compositor_is_send() {
        assert_send::<Compositor>();
    }

    #[test]
    fn test_new_rejects_zero_size() {
        assert!(matches!(
            Compositor::new(0, 5),
            Err(Error::InvalidDimensions(_))
        ));
        assert!(matches!(
            Compositor::new(5, 0),
            Err(Error::InvalidDimensions(_))
        ));
    }

    #[test]
    fn test_new_root() {
        let compositor = Compositor::new(4, 3).unwrap();
        let root = compositor.surface(compositor.root()).unwrap();
        assert!(root.is_root());
        assert_eq!(root.generation(), 0);
        assert_eq!(root.creation_index(), 0);
        assert_eq!(root.rect(), Rect::new(0, 0, 4, 3));
        assert_eq!(compositor.surface_count(), 1);
        assert!(compositor.needs_full_repaint());
    }

    #[test]
    fn test_first_flush_is_full() {
        let mut compositor = Compositor::new(4, 3).unwrap();
        let mut sink = RecordingSink::new();
        let stats = compositor.flush(&mut sink);
        assert_eq!(
            stats,
            FlushStats {
                resolved: true,
                full_repaint: true,
                cells_emitted: 12,
            }
        );

        // Row-major order
        let coords: Vec<(u16, u16)> = sink.writes().iter().map(|w| (w.x, w.y)).collect();
        assert_eq!(&coords[..5], &[(0, 0), (1, 0), (2, 0), (3, 0), (0, 1)]);

        let stats = compositor.flush(&mut sink);
        assert_eq!(stats, FlushStats::default());
    }

    #[test]
    fn test_attach_assigns_increasing_creation_index() {
        let mut compositor = Compositor::new(10, 10).unwrap();
        let root = compositor.root();
        let a = compositor.create(root, Rect::new(0, 0, 2, 2)).unwrap();
        let b = compositor.create(a, Rect::new(0, 0, 1, 1)).unwrap();

        let a_node = compositor.surface(a).unwrap();
        let b_node = compositor.surface(b).unwrap();
        assert!(a_node.creation_index() < b_node.creation_index());
        assert_eq!(a_node.parent(), Some(root));
        assert_eq!(b_node.parent(), Some(a));
        assert_eq!(b_node.generation(), 2);
        assert_eq!(compositor.surface(root).unwrap().children(), &[a]);
        assert!(compositor.is_topology_dirty());
    }

    #[test]
    fn test_attach_to_dead_parent_fails() {
        let mut compositor = Compositor::new(10, 10).unwrap();
        let a = compositor
            .create(compositor.root(), Rect::new(0, 0, 2, 2))
            .unwrap();
        compositor.destroy(a).unwrap();

        let result = compositor.create(a, Rect::new(0, 0, 1, 1));
        assert!(matches!(result, Err(Error::InvalidAttachment(_))));
    }

    #[test]
    fn test_destroy_root_fails() {
        let mut compositor = Compositor::new(3, 3).unwrap();
        let root = compositor.root();
        assert!(matches!(
            compositor.destroy(root),
            Err(Error::InvalidDetachment(_))
        ));
    }

    #[test]
    fn test_destroy_twice_fails() {
        let mut compositor = Compositor::new(3, 3).unwrap();
        let a = compositor
            .create(compositor.root(), Rect::new(0, 0, 1, 1))
            .unwrap();
        assert_eq!(compositor.destroy(a).unwrap(), 1);
        assert!(matches!(
            compositor.destroy(a),
            Err(Error::SurfaceNotFound(_))
        ));
        assert!(compositor.surface_mut(a).is_none());
    }

    #[test]
    fn test_destroy_takes_descendants() {
        let mut compositor = Compositor::new(10, 10).unwrap();
        let root = compositor.root();
        let a = compositor.create(root, Rect::new(0, 0, 5, 5)).unwrap();
        let b = compositor.create(a, Rect::new(1, 1, 2, 2)).unwrap();
        let c = compositor.create(b, Rect::new(0, 0, 1, 1)).unwrap();
        let d = compositor.create(root, Rect::new(6, 6, 2, 2)).unwrap();

        assert_eq!(compositor.destroy(a).unwrap(), 3);
        assert!(!compositor.contains(b));
        assert!(!compositor.contains(c));
        assert!(compositor.contains(d));
        assert_eq!(compositor.surface(root).unwrap().children(), &[d]);
    }

    #[test]
    fn test_resolve_places_nested_surfaces() {
        let mut compositor = Compositor::new(20, 20).unwrap();
        let a = compositor
            .create(compositor.root(), Rect::new(2, 3, 10, 10))
            .unwrap();
        let b = compositor.create(a, Rect::new(1, 1, 4, 4)).unwrap();
        compositor.resolve();

        assert_eq!(
            compositor.surface(b).unwrap().absolute_rect(),
            Rect::new(3, 4, 4, 4)
        );
        assert_eq!(compositor.owner_at(3, 4), Some(b));
        assert_eq!(compositor.owner_at(2, 3), Some(a));
        assert_eq!(compositor.owner_at(0, 0), Some(compositor.root()));
        assert_eq!(compositor.owner_at(20, 0), None);
    }

    #[test]
    fn test_resolve_clips_offscreen_surfaces() {
        let mut compositor = Compositor::new(5, 5).unwrap();
        let a = compositor
            .create(compositor.root(), Rect::new(3, -2, 10, 4))
            .unwrap();
        let hidden = compositor
            .create(compositor.root(), Rect::new(-10, -10, 3, 3))
            .unwrap();
        compositor.resolve();

        assert_eq!(compositor.owner_at(4, 0), Some(a));
        assert_eq!(compositor.owner_at(3, 1), Some(a));
        assert_eq!(compositor.owner_at(3, 2), Some(compositor.root()));
        assert!((0..5).all(|y| (0..5).all(|x| compositor.owner_at(x, y) != Some(hidden))));
    }

    #[test]
    fn test_mark_cell_dirty_dedups() {
        let mut compositor = Compositor::new(4, 4).unwrap();
        let mut sink = RecordingSink::new();
        compositor.flush(&mut sink);
        sink.clear();

        let index = compositor.pack_index(1, 2);
        compositor.mark_cell_dirty(index);
        compositor.mark_cell_dirty(index);
        compositor.mark_cell_dirty(999);
        assert_eq!(compositor.dirty_len(), 1);

        let stats = compositor.flush(&mut sink);
        assert_eq!(stats.cells_emitted, 1);
        assert_eq!(sink.count_at(1, 2), 1);
        assert_eq!(compositor.dirty_len(), 0);
    }

    #[test]
    fn test_mark_all_dirty() {
        let mut compositor = Compositor::new(3, 2).unwrap();
        let mut sink = RecordingSink::new();
        compositor.flush(&mut sink);

        compositor.mark_all_dirty();
        let stats = compositor.flush(&mut sink);
        assert!(stats.full_repaint);
        assert!(!stats.resolved);
        assert_eq!(stats.cells_emitted, 6);
    }

    #[test]
    fn test_set_rect_notifies_and_dirties_topology() {
        use std::sync::{Arc, Mutex};

        let mut compositor = Compositor::new(10, 10).unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);
        compositor.on_rect_updated(move |id, rect| log.lock().unwrap().push((id, rect)));

        let a = compositor
            .create(compositor.root(), Rect::new(1, 1, 2, 2))
            .unwrap();
        compositor.flush(&mut RecordingSink::new());
        assert!(!compositor.is_topology_dirty());

        let new_rect = Rect::new(4, 4, 3, 1);
        compositor.surface_mut(a).unwrap().set_rect(new_rect);

        assert!(compositor.is_topology_dirty());
        assert_eq!(*seen.lock().unwrap(), vec![(a, new_rect)]);
        let surface = compositor.surface(a).unwrap();
        assert_eq!(surface.glyphs().len(), 3);
        assert!(surface.glyphs().iter().all(Glyph::is_empty));
    }

    #[test]
    fn test_visible_glyph() {
        let mut compositor = Compositor::with_background(4, 4, Color::BLACK).unwrap();
        let a = compositor
            .create(compositor.root(), Rect::new(1, 1, 2, 2))
            .unwrap();
        compositor
            .surface_mut(a)
            .unwrap()
            .set_cell(0, 0, 'q', Color::RED, Color::BLUE);
        compositor.resolve();

        assert_eq!(
            compositor.visible_glyph(1, 1),
            Some(Glyph::new('q', Color::RED, Color::BLUE))
        );
        assert_eq!(
            compositor.visible_glyph(0, 0),
            Some(Glyph::blank(Color::BLACK))
        );
        assert_eq!(compositor.visible_glyph(4, 0), None);
    }
}
