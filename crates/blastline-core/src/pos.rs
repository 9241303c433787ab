//! Grid positions, sub-cell points, and the four cardinal sides.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

/// Integer `(x, y)` grid coordinate.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Position {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl Position {
    /// Create a position from its components.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighbouring position one step towards `side`.
    pub fn step(self, side: Side2D) -> Self {
        self + side.offset()
    }

    /// Squared euclidean distance to `other`.
    pub fn distance_sq(self, other: Position) -> i64 {
        let dx = i64::from(self.x) - i64::from(other.x);
        let dy = i64::from(self.y) - i64::from(other.y);
        dx * dx + dy * dy
    }

    /// Manhattan (L1) distance to `other`.
    pub fn manhattan(self, other: Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// Floating-point sub-cell coordinate, used for ray and path endpoints.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PointF {
    /// Horizontal component.
    pub x: f64,
    /// Vertical component.
    pub y: f64,
}

impl PointF {
    /// Create a point from its components.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Centre of the given cell (`+0.5` on both axes).
    pub fn center_of(pos: Position) -> Self {
        Self::new(f64::from(pos.x) + 0.5, f64::from(pos.y) + 0.5)
    }

    /// The cell containing this point (floor on both axes).
    pub fn cell(self) -> Position {
        Position::new(self.x.floor() as i32, self.y.floor() as i32)
    }

    /// Translate by `(dx, dy)`.
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: PointF) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Equal by value, or within `epsilon` on both axes.
    ///
    /// Floating offsets accumulate rounding error along a ray, so exact
    /// comparison of endpoints is rarely what callers want.
    pub fn approx_eq(self, other: PointF, epsilon: f64) -> bool {
        self == other || ((self.x - other.x).abs() < epsilon && (self.y - other.y).abs() < epsilon)
    }
}

/// One of the four orthogonal neighbours of a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side2D {
    /// `(0, -1)`
    North,
    /// `(0, 1)`
    South,
    /// `(-1, 0)`
    West,
    /// `(1, 0)`
    East,
}

impl Side2D {
    /// All sides in expansion order: north, south, west, east.
    pub const ALL: [Side2D; 4] = [Side2D::North, Side2D::South, Side2D::West, Side2D::East];

    /// Unit offset for this side.
    pub const fn offset(self) -> Position {
        match self {
            Side2D::North => Position::new(0, -1),
            Side2D::South => Position::new(0, 1),
            Side2D::West => Position::new(-1, 0),
            Side2D::East => Position::new(1, 0),
        }
    }
}
