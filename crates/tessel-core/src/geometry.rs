//! Geometry types for surface placement.
//!
//! This module provides the geometry primitives used throughout Tessel:
//! - [`Point`]: A 2D point with signed coordinates
//! - [`Size`]: A 2D size with unsigned dimensions
//! - [`Rect`]: A rectangle combining position and size
//!
//! All coordinates are measured in character cells.

use std::ops::{Add, AddAssign, Sub, SubAssign};

/// A 2D point with signed integer coordinates.
///
/// Points can have negative coordinates, which happens when a surface is
/// placed partly above or left of its parent.
///
/// # Examples
///
/// ```
/// use tessel_core::geometry::Point;
///
/// let p1 = Point::new(10, 20);
/// let p2 = Point::new(5, 5);
///
/// assert_eq!(p1 + p2, Point::new(15, 25));
/// assert_eq!(p1 - p2, Point::new(5, 15));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    /// The x coordinate (column position).
    pub x: i32,
    /// The y coordinate (row position).
    pub y: i32,
}

impl Point {
    /// The origin point (0, 0).
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Creates a new point at the given coordinates.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the point offset by the given amounts.
    #[inline]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// Returns whether this point has non-negative coordinates.
    #[inline]
    pub const fn is_non_negative(self) -> bool {
        self.x >= 0 && self.y >= 0
    }
}

impl Add for Point {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        self.offset(rhs.x, rhs.y)
    }
}

impl AddAssign for Point {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Point {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x.saturating_sub(rhs.x),
            y: self.y.saturating_sub(rhs.y),
        }
    }
}

impl SubAssign for Point {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl From<(i32, i32)> for Point {
    #[inline]
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl From<Point> for (i32, i32) {
    #[inline]
    fn from(point: Point) -> Self {
        (point.x, point.y)
    }
}

/// A 2D size with unsigned dimensions.
///
/// Width counts columns and height counts rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    /// The width (number of columns).
    pub width: u16,
    /// The height (number of rows).
    pub height: u16,
}

impl Size {
    /// A zero-sized size.
    pub const ZERO: Self = Self {
        width: 0,
        height: 0,
    };

    /// Creates a new size with the given dimensions.
    #[inline]
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Returns the number of cells covered (width * height).
    #[inline]
    pub const fn area(self) -> u32 {
        self.width as u32 * self.height as u32
    }

    /// Returns whether either dimension is zero.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl From<(u16, u16)> for Size {
    #[inline]
    fn from((width, height): (u16, u16)) -> Self {
        Self::new(width, height)
    }
}

impl From<Size> for (u16, u16) {
    #[inline]
    fn from(size: Size) -> Self {
        (size.width, size.height)
    }
}

/// A rectangle defined by its position and size.
///
/// The rectangle is defined by an origin point (top-left corner) and a size.
/// The position can be negative for relative positioning.
///
/// ```text
/// (0,0) ──────► x
///   │
///   │
///   ▼
///   y
/// ```
///
/// # Examples
///
/// ```
/// use tessel_core::geometry::{Point, Rect};
///
/// let rect = Rect::new(10, 20, 80, 24);
/// assert_eq!(rect.right(), 90);
/// assert_eq!(rect.bottom(), 44);
/// assert!(rect.contains_point(Point::new(50, 30)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// The x coordinate of the left edge.
    pub x: i32,
    /// The y coordinate of the top edge.
    pub y: i32,
    /// The width of the rectangle.
    pub width: u16,
    /// The height of the rectangle.
    pub height: u16,
}

impl Rect {
    /// A zero-sized rectangle at the origin.
    pub const ZERO: Self = Self {
        x: 0,
        y: 0,
        width: 0,
        height: 0,
    };

    /// Creates a new rectangle at the given position with the given size.
    #[inline]
    pub const fn new(x: i32, y: i32, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle at the origin with the given size.
    #[inline]
    pub const fn from_size(size: Size) -> Self {
        Self {
            x: 0,
            y: 0,
            width: size.width,
            height: size.height,
        }
    }

    /// Returns the position (top-left corner) of the rectangle.
    #[inline]
    pub const fn position(self) -> Point {
        Point {
            x: self.x,
            y: self.y,
        }
    }

    /// Returns the size of the rectangle.
    #[inline]
    pub const fn size(self) -> Size {
        Size {
            width: self.width,
            height: self.height,
        }
    }

    /// Returns the x coordinate of the left edge.
    #[inline]
    pub const fn left(self) -> i32 {
        self.x
    }

    /// Returns the y coordinate of the top edge.
    #[inline]
    pub const fn top(self) -> i32 {
        self.y
    }

    /// Returns the x coordinate of the right edge (exclusive).
    #[inline]
    pub const fn right(self) -> i32 {
        self.x.saturating_add(self.width as i32)
    }

    /// Returns the y coordinate of the bottom edge (exclusive).
    #[inline]
    pub const fn bottom(self) -> i32 {
        self.y.saturating_add(self.height as i32)
    }

    /// Returns the number of cells covered by the rectangle.
    #[inline]
    pub const fn area(self) -> u32 {
        self.width as u32 * self.height as u32
    }

    /// Returns whether the rectangle has zero area.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns whether the rectangle contains the given point.
    #[inline]
    pub const fn contains_point(self, point: Point) -> bool {
        self.contains_xy(point.x, point.y)
    }

    /// Returns whether the rectangle contains the point at (x, y).
    #[inline]
    pub const fn contains_xy(self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Returns whether this rectangle intersects with another rectangle.
    #[inline]
    pub const fn intersects(self, other: Self) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Returns the intersection of this rectangle with another.
    ///
    /// Returns `None` if the rectangles do not intersect.
    #[inline]
    pub fn intersection(self, other: Self) -> Option<Self> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if x < right && y < bottom {
            Some(Self {
                x,
                y,
                width: (right - x) as u16,
                height: (bottom - y) as u16,
            })
        } else {
            None
        }
    }

    /// Returns the rectangle moved by the given offset.
    #[inline]
    pub const fn translate(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
            width: self.width,
            height: self.height,
        }
    }

    /// Returns the rectangle moved to the given position.
    #[inline]
    pub const fn with_position(self, position: Point) -> Self {
        Self {
            x: position.x,
            y: position.y,
            width: self.width,
            height: self.height,
        }
    }

    /// Returns the rectangle with the given size.
    #[inline]
    pub const fn with_size(self, size: Size) -> Self {
        Self {
            x: self.x,
            y: self.y,
            width: size.width,
            height: size.height,
        }
    }

    /// Returns an iterator over all covered points in row-major order.
    ///
    /// `Rect` is `Copy`, so the sequence can be restarted by calling this
    /// again.
    #[inline]
    pub fn points(self) -> impl Iterator<Item = Point> {
        let x_start = self.x;
        let x_end = self.right();

        (self.y..self.bottom()).flat_map(move |y| (x_start..x_end).map(move |x| Point::new(x, y)))
    }

    /// Returns an iterator over the row indices in the rectangle.
    #[inline]
    pub fn rows(self) -> impl Iterator<Item = i32> {
        self.y..self.bottom()
    }
}

impl From<(i32, i32, u16, u16)> for Rect {
    #[inline]
    fn from((x, y, width, height): (i32, i32, u16, u16)) -> Self {
        Self::new(x, y, width, height)
    }
}

impl From<Size> for Rect {
    #[inline]
    fn from(size: Size) -> Self {
        Self::from_size(size)
    }
}
