//! Layered glyph-surface compositor for `Tessel`.
//!
//! A [`Compositor`] owns a tree of rectangular glyph buffers ([`Surface`]s)
//! and flattens them into one grid of cells. Each cell is owned by exactly one
//! surface: deeper surfaces win, and among siblings the one attached last
//! wins. Writes are tracked per cell so that [`Compositor::flush`] only sends
//! changed cells to a [`DisplaySink`].
//!
//! - [`compositor`]: registration, ownership resolution and flushing
//! - [`surface`]: surface storage and the [`SurfaceMut`] editing view
//! - [`dirty`]: the deduplicating dirty-cell set
//! - [`sink`]: the [`DisplaySink`] trait and in-memory sinks
//!
//! # Examples
//!
//! ```
//! use tessel_compositor::{Compositor, RecordingSink};
//! use tessel_core::{Color, Rect};
//!
//! let mut compositor = Compositor::with_background(10, 10, Color::BLACK).unwrap();
//! let root = compositor.root();
//! let panel = compositor.create(root, Rect::new(2, 2, 3, 3)).unwrap();
//! compositor
//!     .surface_mut(panel)
//!     .unwrap()
//!     .fill('#', Color::WHITE, Color::BLACK);
//!
//! let mut sink = RecordingSink::new();
//! let stats = compositor.flush(&mut sink);
//! assert!(stats.full_repaint);
//! assert_eq!(sink.writes().iter().filter(|w| w.glyph.character == '#').count(), 9);
//!
//! // Later writes only re-emit what changed
//! sink.clear();
//! compositor.surface_mut(panel).unwrap().set_glyph(1, 1, '@');
//! assert_eq!(compositor.flush(&mut sink).cells_emitted, 1);
//! assert_eq!(sink.last_at(3, 3).unwrap().character, '@');
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod compositor;
pub mod dirty;
pub mod sink;
pub mod surface;

pub use compositor::{Compositor, FlushStats};
pub use dirty::DirtySet;
pub use sink::{CellWrite, DisplaySink, GridSink, RecordingSink};
pub use surface::{DetachedSurface, RectObserver, Surface, SurfaceId, SurfaceMut};
