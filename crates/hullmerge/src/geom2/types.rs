//! Basic 2D types: identity-carrying points, segments and rectangles.
//!
//! - `Point`: coordinates plus a `VertexId`. Equality is identity, never
//!   coordinates, so the merge can tell "this vertex" from "a vertex at the
//!   same place".
//! - `VertexArena`: hands out fresh ids.
//! - `Segment`: a pair of points tagged with the region that owns it.
//! - `Rect`: closed axis-aligned rectangle.

use nalgebra::Vector2;

/// Plain coordinate vector used by all predicates.
pub type Vec2 = Vector2<f64>;

/// Stable per-vertex identity key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub u32);

/// Opaque identity of a convex region. Assigned by the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(pub u32);

/// Immutable point with identity.
#[derive(Clone, Copy, Debug)]
pub struct Point {
    pub id: VertexId,
    pub pos: Vec2,
}

impl Point {
    #[inline]
    pub fn new(id: VertexId, x: f64, y: f64) -> Self {
        Self {
            id,
            pos: Vec2::new(x, y),
        }
    }
    #[inline]
    pub fn x(&self) -> f64 {
        self.pos.x
    }
    #[inline]
    pub fn y(&self) -> f64 {
        self.pos.y
    }
    /// Bottom-leftmost order: minimal x, ties broken by minimal y.
    #[inline]
    pub fn is_lower_left_of(&self, other: &Point) -> bool {
        lex_less(self.pos, other.pos)
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl Eq for Point {}

impl std::hash::Hash for Point {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Lexicographic (x, then y) order. Doubles as a symbolic shear for
/// vertical segments in the trapezoidal map.
#[inline]
pub fn lex_less(a: Vec2, b: Vec2) -> bool {
    a.x < b.x || (a.x == b.x && a.y < b.y)
}

/// Allocator of vertex identities.
#[derive(Clone, Debug, Default)]
pub struct VertexArena {
    next: u32,
}

impl VertexArena {
    pub fn new() -> Self {
        Self::default()
    }
    /// New point with a fresh id.
    pub fn point(&mut self, x: f64, y: f64) -> Point {
        let id = VertexId(self.next);
        self.next += 1;
        Point::new(id, x, y)
    }
    /// Fresh points for a list of coordinates, in order.
    pub fn points(&mut self, coords: &[(f64, f64)]) -> Vec<Point> {
        coords.iter().map(|&(x, y)| self.point(x, y)).collect()
    }
    /// Number of ids handed out so far.
    pub fn len(&self) -> usize {
        self.next as usize
    }
    pub fn is_empty(&self) -> bool {
        self.next == 0
    }
}

/// Boundary segment owned by a region.
#[derive(Clone, Copy, Debug)]
pub struct Segment {
    pub a: Point,
    pub b: Point,
    pub owner: RegionId,
}

impl Segment {
    #[inline]
    pub fn new(a: Point, b: Point, owner: RegionId) -> Self {
        Self { a, b, owner }
    }
    /// Same endpoints by identity, in either direction.
    #[inline]
    pub fn same_endpoints(&self, p: &Point, q: &Point) -> bool {
        (self.a == *p && self.b == *q) || (self.a == *q && self.b == *p)
    }
}

/// Closed axis-aligned rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min: Vec2::new(min_x.min(max_x), min_y.min(max_y)),
            max: Vec2::new(min_x.max(max_x), min_y.max(max_y)),
        }
    }
    /// Smallest rectangle containing all `pts`; `None` for an empty slice.
    pub fn bounding(pts: impl IntoIterator<Item = Vec2>) -> Option<Self> {
        let mut it = pts.into_iter();
        let first = it.next()?;
        let (mut lo, mut hi) = (first, first);
        for p in it {
            lo = Vec2::new(lo.x.min(p.x), lo.y.min(p.y));
            hi = Vec2::new(hi.x.max(p.x), hi.y.max(p.y));
        }
        Some(Self { min: lo, max: hi })
    }
    /// Grow by `margin` on every side.
    pub fn inflate(&self, margin: f64) -> Self {
        Self {
            min: self.min - Vec2::new(margin, margin),
            max: self.max + Vec2::new(margin, margin),
        }
    }
    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }
    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
    /// Strict containment (no contact with the boundary).
    #[inline]
    pub fn contains_strict(&self, p: Vec2) -> bool {
        p.x > self.min.x && p.x < self.max.x && p.y > self.min.y && p.y < self.max.y
    }
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }
    /// Corners in counter-clockwise order starting at `min`.
    pub fn corners(&self) -> [Vec2; 4] {
        [
            self.min,
            Vec2::new(self.max.x, self.min.y),
            self.max,
            Vec2::new(self.min.x, self.max.y),
        ]
    }
}
