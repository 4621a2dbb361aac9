//! # Geometry Primitives
//!
//! Axis-aligned integer rectangles, grid cells, and float points used
//! throughout dungeon generation and pathfinding.
//!
//! All rectangles are half-open: a `Rect` at `(x, y)` with size `(w, h)`
//! covers `[x, x+w) × [y, y+h)`. Two rectangles that merely touch along an
//! edge do not intersect.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle with integer coordinates.
///
/// # Examples
///
/// ```
/// use delve::Rect;
///
/// let a = Rect::new(0, 0, 10, 10);
/// let b = Rect::new(5, 5, 10, 10);
/// assert!(a.intersects(&b));
/// assert_eq!(a.intersection(&b), Some(Rect::new(5, 5, 5, 5)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// Creates a new rectangle from its bottom-left corner and size.
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn x_min(&self) -> i32 {
        self.x
    }

    pub fn x_max(&self) -> i32 {
        self.x + self.width
    }

    pub fn y_min(&self) -> i32 {
        self.y
    }

    pub fn y_max(&self) -> i32 {
        self.y + self.height
    }

    /// The area in cells.
    pub fn area(&self) -> i32 {
        self.width * self.height
    }

    /// The center of the rectangle, truncated to cell coordinates.
    pub fn center(&self) -> GridCell {
        GridCell::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Checks whether a cell lies inside the rectangle.
    pub fn contains(&self, cell: GridCell) -> bool {
        cell.x >= self.x_min()
            && cell.x < self.x_max()
            && cell.y >= self.y_min()
            && cell.y < self.y_max()
    }

    /// Checks whether two rectangles overlap.
    ///
    /// Strict half-open semantics: a shared edge or corner with zero-width
    /// overlap is not an intersection.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x_min() < other.x_max()
            && other.x_min() < self.x_max()
            && self.y_min() < other.y_max()
            && other.y_min() < self.y_max()
    }

    /// Computes the overlapping rectangle, or `None` when the two do not
    /// intersect.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !self.intersects(other) {
            return None;
        }

        let x = self.x_min().max(other.x_min());
        let y = self.y_min().max(other.y_min());
        Some(Rect::new(
            x,
            y,
            self.x_max().min(other.x_max()) - x,
            self.y_max().min(other.y_max()) - y,
        ))
    }
}

/// A single cell on the dungeon grid.
///
/// Cheap to copy and hashable, so it doubles as a graph node key for the
/// navigation graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCell {
    pub x: i32,
    pub y: i32,
}

impl GridCell {
    /// Creates a new grid cell.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The midpoint of the cell in continuous coordinates.
    pub fn center(&self) -> Point {
        Point::new(self.x as f64 + 0.5, self.y as f64 + 0.5)
    }

    /// Euclidean distance between the centers of two cells.
    pub fn distance(&self, other: GridCell) -> f64 {
        self.center().distance(other.center())
    }
}

/// A point in continuous dungeon space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}
