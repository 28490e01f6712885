//! Spatial index over drawn segments for the overlap filter.
//!
//! The filter repeatedly asks "is any already-accepted segment within
//! distance r of this sample point?". An R*-tree over the accepted
//! segments answers that with a broad-phase envelope walk and an exact
//! point-to-segment distance as the narrow phase.

use plotpath_core::Point;
use rstar::{PointDistance, RTree, RTreeObject, AABB};

/// One drawn line segment stored in the index.
#[derive(Debug, Clone, Copy)]
struct IndexedSegment {
    a: [f64; 2],
    b: [f64; 2],
}

impl IndexedSegment {
    /// Squared distance from `p` to this segment.
    fn distance_sq(&self, p: [f64; 2]) -> f64 {
        let dx = self.b[0] - self.a[0];
        let dy = self.b[1] - self.a[1];
        let len_sq = dx * dx + dy * dy;
        if len_sq < 1e-24 {
            // degenerate (zero-length) segment
            let ex = p[0] - self.a[0];
            let ey = p[1] - self.a[1];
            return ex * ex + ey * ey;
        }
        let t = (((p[0] - self.a[0]) * dx + (p[1] - self.a[1]) * dy) / len_sq).clamp(0.0, 1.0);
        let ex = p[0] - (self.a[0] + t * dx);
        let ey = p[1] - (self.a[1] + t * dy);
        ex * ex + ey * ey
    }
}

impl RTreeObject for IndexedSegment {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(
            [self.a[0].min(self.b[0]), self.a[1].min(self.b[1])],
            [self.a[0].max(self.b[0]), self.a[1].max(self.b[1])],
        )
    }
}

impl PointDistance for IndexedSegment {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        self.distance_sq(*point)
    }
}

/// Accumulating index of accepted ink.
#[derive(Debug, Default)]
pub struct SegmentIndex {
    tree: RTree<IndexedSegment>,
}

impl SegmentIndex {
    /// Creates a new empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of indexed segments.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Returns true if nothing has been inserted.
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Inserts every consecutive segment of a polyline.
    pub fn insert_polyline(&mut self, points: &[Point]) {
        for w in points.windows(2) {
            self.tree.insert(IndexedSegment {
                a: [w[0].x, w[0].y],
                b: [w[1].x, w[1].y],
            });
        }
    }

    /// Returns true if any indexed segment lies within `radius` of `p`.
    pub fn any_within(&self, p: Point, radius: f64) -> bool {
        self.tree
            .locate_within_distance([p.x, p.y], radius * radius)
            .next()
            .is_some()
    }
}
