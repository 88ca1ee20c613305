//! R-tree spatial index over contour line bounding boxes.
//!
//! The index answers "which lines might intersect this rectangle" without a
//! full scan: a one-time O(N log N) bulk load, then O(log N + k) queries.
//! Results are a superset of the true intersection set (bbox overlap only);
//! callers filter with an exact geometric test.

use blocks_common::BoundingBox;
use rstar::{RTree, RTreeObject, AABB};
use tracing::debug;

use crate::store::ContourSet;

/// A contour handle with its bounding box, stored in the R-tree.
#[derive(Debug, Clone, Copy)]
struct IndexedLine {
    /// Index into the contour set's line slice.
    handle: usize,
    bbox: BoundingBox,
}

impl RTreeObject for IndexedLine {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(
            [self.bbox.min_x, self.bbox.min_y],
            [self.bbox.max_x, self.bbox.max_y],
        )
    }
}

/// Read-only spatial index over a contour set.
pub struct SpatialIndex {
    tree: RTree<IndexedLine>,
}

impl SpatialIndex {
    /// Bulk-load the index from a contour set.
    pub fn build(set: &ContourSet) -> Self {
        let entries: Vec<IndexedLine> = set
            .lines()
            .iter()
            .enumerate()
            .filter_map(|(handle, line)| {
                line.bounds().map(|bbox| IndexedLine { handle, bbox })
            })
            .collect();

        debug!(entries = entries.len(), "built spatial index");

        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// All handles whose bounding box intersects `rect`.
    ///
    /// No false negatives; false positives are expected and must be filtered
    /// by an exact intersection test. Sorted by handle so downstream work is
    /// deterministic.
    pub fn query(&self, rect: &BoundingBox) -> Vec<usize> {
        let envelope = AABB::from_corners([rect.min_x, rect.min_y], [rect.max_x, rect.max_y]);
        let mut handles: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|entry| entry.handle)
            .collect();
        handles.sort_unstable();
        handles
    }

    /// Number of indexed lines.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}
