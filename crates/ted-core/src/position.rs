//! Point, movement delta, and range types.
//!
//! All coordinates are **0-indexed**. `y` is the line, `x` is the rune index
//! within that line: the number of code points before the position, not a
//! byte offset and not a visible column. Conversion to visible columns lives
//! in [`geometry`](crate::geometry); conversion to bytes in
//! [`rune`](crate::rune).
//!
//! Display layers (status line, messages) convert to 1-indexed for the user.
//! That conversion never belongs here.

use std::fmt;

// ---------------------------------------------------------------------------
// Point
// ---------------------------------------------------------------------------

/// A position in a buffer: rune `x` on line `y`.
///
/// # Ordering
///
/// Points are ordered lexicographically by `(y, x)`, so `Point::new(5, 0)`
/// comes before `Point::new(0, 1)`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl Point {
    /// The origin: line 0, rune 0.
    pub const ZERO: Self = Self { x: 0, y: 0 };

    #[inline]
    #[must_use]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// True when both coordinates are zero.
    #[inline]
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.x == 0 && self.y == 0
    }
}

impl Ord for Point {
    #[inline]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.y.cmp(&other.y).then(self.x.cmp(&other.x))
    }
}

impl PartialOrd for Point {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pt({},{})", self.x, self.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 1-indexed `line:col`, the way status lines show it.
        write!(f, "{}:{}", self.y + 1, self.x + 1)
    }
}

// ---------------------------------------------------------------------------
// Delta
// ---------------------------------------------------------------------------

/// A signed movement: `x` runes horizontally, `y` lines vertically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Delta {
    pub x: isize,
    pub y: isize,
}

impl Delta {
    #[inline]
    #[must_use]
    pub const fn new(x: isize, y: isize) -> Self {
        Self { x, y }
    }

    pub const LEFT: Self = Self::new(-1, 0);
    pub const RIGHT: Self = Self::new(1, 0);
    pub const UP: Self = Self::new(0, -1);
    pub const DOWN: Self = Self::new(0, 1);
}

// ---------------------------------------------------------------------------
// Range
// ---------------------------------------------------------------------------

/// An ordered pair of points, `start <= end`.
///
/// Built per call to address a deletion or a length query; never stored.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
    pub start: Point,
    pub end: Point,
}

impl Range {
    /// Create a range. Panics in debug if `start > end`.
    #[inline]
    #[must_use]
    pub fn new(start: Point, end: Point) -> Self {
        debug_assert!(start <= end, "Range::new requires start <= end");
        Self { start, end }
    }

    /// Create a range from two arbitrary points, swapping if needed.
    #[inline]
    #[must_use]
    pub fn ordered(a: Point, b: Point) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// True when the range spans nothing.
    #[inline]
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// True when start and end are on the same line.
    #[inline]
    #[must_use]
    pub const fn is_single_line(self) -> bool {
        self.start.y == self.end.y
    }

    /// Number of lines touched. An empty range still sits on one line.
    #[inline]
    #[must_use]
    pub const fn line_span(self) -> usize {
        self.end.y - self.start.y + 1
    }

    /// True when `point` falls in `[start, end)`.
    #[inline]
    #[must_use]
    pub fn contains(self, point: Point) -> bool {
        point >= self.start && point < self.end
    }
}

impl fmt::Debug for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Range({:?} .. {:?})", self.start, self.end)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
