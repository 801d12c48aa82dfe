//! Tessel: a layered glyph-surface compositor.
//!
//! Tessel flattens a tree of overlapping character buffers into one grid of
//! display cells and re-emits only the cells that changed:
//! - Deeper surfaces win over shallower ones, later siblings over earlier ones
//! - Writes are tracked per cell and deduplicated
//! - Attaching, destroying or moving a surface triggers one full repaint
//!
//! # Example
//!
//! ```
//! use tessel::prelude::*;
//!
//! let mut compositor = Compositor::with_background(10, 10, Color::BLACK).unwrap();
//! let panel = compositor.create(compositor.root(), Rect::new(2, 2, 3, 3)).unwrap();
//! compositor
//!     .surface_mut(panel)
//!     .unwrap()
//!     .fill('#', Color::WHITE, Color::BLACK);
//!
//! let mut grid = GridSink::new(10, 10);
//! compositor.flush(&mut grid);
//! assert_eq!(grid.row_text(2).unwrap(), "  ###     ");
//! ```

pub use tessel_compositor as compositor;
pub use tessel_core as core;
pub use tessel_terminal as terminal;

pub mod prelude {
    //! Commonly used types.
    pub use tessel_compositor::{
        Compositor, DetachedSurface, DisplaySink, FlushStats, GridSink, RecordingSink, SurfaceId,
        SurfaceMut,
    };
    pub use tessel_core::{Color, Error, Glyph, Point, Rect, Result, Size};
    pub use tessel_terminal::{Console, ConsoleConfig, CrosstermSink};
}
