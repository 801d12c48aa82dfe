//! Core types for `Tessel`.
//!
//! This crate provides the building blocks shared by the compositor and the
//! terminal sink:
//!
//! - [`geometry`]: 2D geometry primitives (Point, Size, Rect)
//! - [`color`]: RGBA color representation with hex parsing
//! - [`glyph`]: The display cell written to a sink
//! - [`error`]: Error types for the workspace
//!
//! # Examples
//!
//! ```
//! use tessel_core::{Color, Glyph, Point, Rect};
//!
//! let rect = Rect::new(2, 2, 3, 3);
//! assert_eq!(rect.area(), 9);
//! assert!(rect.contains_point(Point::new(4, 4)));
//!
//! let glyph = Glyph::new('#', Color::WHITE, Color::BLACK);
//! assert!(!glyph.is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::float_cmp)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::doc_markdown)]

pub mod color;
pub mod error;
pub mod geometry;
pub mod glyph;

// Re-export commonly used types at the crate root for convenience
pub use color::Color;
pub use error::{ColorParseError, Error, Result};
pub use geometry::{Point, Rect, Size};
pub use glyph::Glyph;
