
use glam::DVec2;
use itertools::Itertools;

// Strict counterclockwise orientation test. Collinear triples land on the
// "false" side, so all predicates built on top of this treat grazing contact
// as a miss.
fn ccw(a: DVec2, b: DVec2, c: DVec2) -> bool {
    (c.y - a.y) * (b.x - a.x) > (b.y - a.y) * (c.x - a.x)
}

/// Returns true iff the open segments `ab` and `cd` properly straddle each
/// other. Touching endpoints and collinear overlap do not count.
pub fn segments_intersect(a: DVec2, b: DVec2, c: DVec2, d: DVec2) -> bool {
    ccw(a, c, d) != ccw(b, c, d) && ccw(a, b, c) != ccw(a, b, d)
}

/// Even-odd ray cast of `point` against the cyclic edge list of `polygon`.
///
/// An edge counts only when its crossing lies strictly to the right of the
/// point, so a point sitting exactly on a right-hand vertical edge classifies
/// as outside. Other boundary cases may fall either way, but the answer is
/// deterministic for a given input.
pub fn point_in_convex_polygon(point: DVec2, polygon: &[DVec2]) -> bool {
    let mut inside = false;

    for (a, b) in polygon.iter().copied().circular_tuple_windows::<(_, _)>() {
        if point.y > a.y.min(b.y) && point.y <= a.y.max(b.y) && a.y != b.y {
            let crossing = (point.y - a.y) * (b.x - a.x) / (b.y - a.y) + a.x;

            if point.x < crossing {
                inside = !inside;
            }
        }
    }

    inside
}

/// A segment hits a convex polygon iff one of its endpoints lies inside or it
/// properly crosses some polygon edge.
pub fn segment_hits_convex(p1: DVec2, p2: DVec2, polygon: &[DVec2]) -> bool {
    if point_in_convex_polygon(p1, polygon) || point_in_convex_polygon(p2, polygon) {
        return true;
    }

    polygon
        .iter()
        .copied()
        .circular_tuple_windows::<(_, _)>()
        .any(|(a, b)| segments_intersect(p1, p2, a, b))
}

/// Inclusive axis-aligned bounding box.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb {
    pub min: DVec2,
    pub max: DVec2,
}

impl Aabb {
    /// Smallest box containing every point of the iterator. An empty iterator
    /// yields the degenerate box at the origin.
    pub fn from_points(points: impl IntoIterator<Item = DVec2>) -> Self {
        points
            .into_iter()
            .fold(None, |bounds: Option<Aabb>, p| {
                Some(match bounds {
                    None => Aabb { min: p, max: p },
                    Some(b) => Aabb {
                        min: b.min.min(p),
                        max: b.max.max(p),
                    },
                })
            })
            .unwrap_or(Aabb {
                min: DVec2::ZERO,
                max: DVec2::ZERO,
            })
    }

    pub fn from_segment(p1: DVec2, p2: DVec2) -> Self {
        Self {
            min: p1.min(p2),
            max: p1.max(p2),
        }
    }

    /// Interval-overlap test on both axes. Boxes sharing only a boundary still
    /// overlap; the bounds are inclusive.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        !(self.max.x < other.min.x
            || self.min.x > other.max.x
            || self.max.y < other.min.y
            || self.min.y > other.max.y)
    }

    pub fn contains(&self, other: &Aabb) -> bool {
        self.min.x <= other.min.x
            && self.min.y <= other.min.y
            && self.max.x >= other.max.x
            && self.max.y >= other.max.y
    }

    pub fn contains_point(&self, point: DVec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }
}
