//! Image rendering for three-block contour designs.
//!
//! Takes the per-region clipped geometry, strokes it onto a single canvas
//! with one palette color per panel, overlays the optional mountain label,
//! and encodes the result as a PNG.

pub mod design;
pub mod png;
pub mod text;

pub use design::{render_design, render_to_file};
