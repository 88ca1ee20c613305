//! Contour geometry: loading, spatial indexing, partitioning, and clipping.
//!
//! The pipeline is `GeometryStore` -> `SpatialIndex` -> `partition_blocks`
//! -> `clip_to_region`. Everything after construction is read-only, so one
//! store and index can serve many palette renders of the same mountain.

pub mod clip;
pub mod index;
pub mod loader;
pub mod partition;
pub mod store;

pub use clip::{clip_all, clip_polyline, clip_to_region, ClippedGeometry};
pub use index::SpatialIndex;
pub use partition::{partition_blocks, BlockRegion, BLOCK_COUNT};
pub use store::{ContourSet, GeometryStore, Point, Polyline};
