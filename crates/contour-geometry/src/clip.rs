//! Exact clipping of contour lines to block regions.
//!
//! Clipping rule: exact-intersection truncation. Every portion of a line
//! inside the region rectangle is kept, split at the boundary; portions
//! outside are discarded. Segments are clipped with Liang–Barsky and
//! contiguous clipped runs are stitched back into polylines.

use blocks_common::BoundingBox;
use tracing::debug;

use crate::index::SpatialIndex;
use crate::partition::BlockRegion;
use crate::store::{ContourSet, Point, Polyline};

/// Point-matching tolerance when stitching clipped segments.
const EPSILON: f64 = 1e-9;

/// The contour subset intersecting one block region, truncated to it.
#[derive(Debug, Clone)]
pub struct ClippedGeometry {
    /// Region ordinal this geometry belongs to.
    pub region: usize,
    pub lines: Vec<Polyline>,
}

impl ClippedGeometry {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Clip the contour set to one region, using the index as prefilter.
///
/// A region with no intersecting geometry yields an empty (valid) result.
///
/// Region rectangles are closed, so with a zero gap a line lying exactly on
/// a shared block boundary is kept by both adjacent regions and stroked
/// twice. Any positive gap separates the rectangles and the case vanishes.
pub fn clip_to_region(
    set: &ContourSet,
    index: &SpatialIndex,
    region: &BlockRegion,
) -> ClippedGeometry {
    let mut lines = Vec::new();

    for handle in index.query(&region.bounds) {
        // The prefilter over-approximates; the exact test happens inside
        // clip_polyline, which emits nothing for a true miss.
        lines.extend(clip_polyline(&set.lines()[handle], &region.bounds));
    }

    debug!(
        region = region.index,
        lines = lines.len(),
        "clipped region"
    );

    ClippedGeometry {
        region: region.index,
        lines,
    }
}

/// Clip the contour set to every region.
pub fn clip_all(
    set: &ContourSet,
    index: &SpatialIndex,
    regions: &[BlockRegion],
) -> Vec<ClippedGeometry> {
    regions
        .iter()
        .map(|region| clip_to_region(set, index, region))
        .collect()
}

/// Truncate a polyline to a rectangle, splitting at the boundary.
pub fn clip_polyline(line: &Polyline, rect: &BoundingBox) -> Vec<Polyline> {
    let mut pieces: Vec<Polyline> = Vec::new();
    let mut current: Vec<Point> = Vec::new();

    for window in line.points.windows(2) {
        let clipped = clip_segment(window[0], window[1], rect);

        match clipped {
            Some((start, end)) if !points_equal(start, end) => {
                if let Some(&last) = current.last() {
                    if points_equal(last, start) {
                        current.push(end);
                        continue;
                    }
                    // Line left the rectangle and came back: split here
                    pieces.push(Polyline::new(std::mem::take(&mut current)));
                }
                current.push(start);
                current.push(end);
            }
            _ => {
                // Segment fully outside (or grazing a corner): break the run
                if current.len() >= 2 {
                    pieces.push(Polyline::new(std::mem::take(&mut current)));
                } else {
                    current.clear();
                }
            }
        }
    }

    if current.len() >= 2 {
        pieces.push(Polyline::new(current));
    }

    pieces
}

/// Liang–Barsky clip of one segment against a rectangle.
///
/// Returns the in-rectangle portion, or `None` when the segment misses it.
/// Endpoints already inside are passed through bit-exact so fully interior
/// geometry survives clipping unchanged.
fn clip_segment(p0: Point, p1: Point, rect: &BoundingBox) -> Option<(Point, Point)> {
    let dx = p1.x - p0.x;
    let dy = p1.y - p0.y;

    let mut t0: f64 = 0.0;
    let mut t1: f64 = 1.0;

    let checks = [
        (-dx, p0.x - rect.min_x), // left
        (dx, rect.max_x - p0.x),  // right
        (-dy, p0.y - rect.min_y), // bottom
        (dy, rect.max_y - p0.y),  // top
    ];

    for (p, q) in checks {
        if p == 0.0 {
            if q < 0.0 {
                return None; // parallel and outside
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                t0 = t0.max(r);
            } else {
                if r < t0 {
                    return None;
                }
                t1 = t1.min(r);
            }
        }
    }

    if t0 > t1 {
        return None;
    }

    let start = if t0 == 0.0 {
        p0
    } else {
        Point::new(p0.x + t0 * dx, p0.y + t0 * dy)
    };
    let end = if t1 == 1.0 {
        p1
    } else {
        Point::new(p0.x + t1 * dx, p0.y + t1 * dy)
    };

    Some((start, end))
}

fn points_equal(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() <= EPSILON && (a.y - b.y).abs() <= EPSILON
}
