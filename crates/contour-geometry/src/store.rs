//! Contour set storage and validation.

use std::path::Path;

use blocks_common::{BoundingBox, DesignError, DesignResult};
use tracing::{debug, warn};

use crate::loader;

/// A point in planar world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A contour line: an open or closed sequence of points.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pub points: Vec<Point>,
}

impl Polyline {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Build from (x, y) pairs.
    pub fn from_coords(coords: &[(f64, f64)]) -> Self {
        Self {
            points: coords.iter().map(|&(x, y)| Point::new(x, y)).collect(),
        }
    }

    /// Total length along the line.
    pub fn length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| {
                let dx = w[1].x - w[0].x;
                let dy = w[1].y - w[0].y;
                (dx * dx + dy * dy).sqrt()
            })
            .sum()
    }

    /// Bounding box, `None` when empty.
    pub fn bounds(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(self.points.iter().map(|p| (p.x, p.y)))
    }

    /// Fewer than two points, or zero total length.
    pub fn is_degenerate(&self) -> bool {
        self.points.len() < 2 || self.length() == 0.0
    }
}

/// An immutable, validated collection of contour lines with its extent.
#[derive(Debug, Clone)]
pub struct ContourSet {
    lines: Vec<Polyline>,
    extent: BoundingBox,
}

impl ContourSet {
    /// Build a contour set, dropping degenerate lines.
    ///
    /// Fails with `InvalidInput` when nothing usable remains, and with
    /// `InvalidBounds` when the combined extent is non-finite.
    pub fn new(lines: Vec<Polyline>) -> DesignResult<Self> {
        let total = lines.len();
        let lines: Vec<Polyline> = lines.into_iter().filter(|l| !l.is_degenerate()).collect();

        if lines.is_empty() {
            return Err(DesignError::InvalidInput(format!(
                "no usable contour lines ({} supplied, all empty or degenerate)",
                total
            )));
        }

        let extent = BoundingBox::from_points(
            lines
                .iter()
                .flat_map(|l| l.points.iter().map(|p| (p.x, p.y))),
        )
        .expect("non-empty line set has an extent");

        if !extent.is_finite() {
            return Err(DesignError::InvalidBounds(format!(
                "contour extent is not finite: {:?}",
                extent
            )));
        }

        debug!(
            lines = lines.len(),
            dropped = total - lines.len(),
            width = extent.width(),
            height = extent.height(),
            "contour set loaded"
        );

        Ok(Self { lines, extent })
    }

    pub fn lines(&self) -> &[Polyline] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn extent(&self) -> BoundingBox {
        self.extent
    }
}

/// Loaded contour geometry plus an optional border, with the design extent.
///
/// When a border is present its bounding box defines the extent the blocks
/// are laid out in; otherwise the contour extent is used.
#[derive(Debug, Clone)]
pub struct GeometryStore {
    contours: ContourSet,
    border: Option<Polyline>,
    extent: BoundingBox,
}

impl GeometryStore {
    /// Assemble a store from already-loaded geometry.
    pub fn new(contours: ContourSet, border: Option<Polyline>) -> DesignResult<Self> {
        let extent = match border.as_ref().and_then(|b| b.bounds()) {
            Some(bounds) => bounds,
            None => contours.extent(),
        };

        if !extent.is_finite() || extent.is_degenerate() {
            return Err(DesignError::InvalidBounds(format!(
                "invalid design bounds: width={}, height={}",
                extent.width(),
                extent.height()
            )));
        }

        Ok(Self {
            contours,
            border,
            extent,
        })
    }

    /// Open contour geometry from a GeoJSON file, with an optional border.
    ///
    /// A missing contour source is an error; a missing or unreadable border
    /// is ignored with a warning, matching the forgiving border handling of
    /// the batch directory convention.
    pub fn open(
        contour_path: impl AsRef<Path>,
        border_path: Option<&Path>,
    ) -> DesignResult<Self> {
        let contour_path = contour_path.as_ref();
        if !contour_path.exists() {
            return Err(DesignError::MissingFile(contour_path.to_path_buf()));
        }

        let lines = loader::load_polylines(contour_path)?;
        let contours = ContourSet::new(lines)?;

        let border = match border_path {
            Some(path) if path.exists() => match loader::load_border(path) {
                Ok(Some(ring)) => Some(ring),
                Ok(None) => {
                    warn!(path = %path.display(), "border file has no usable geometry, ignoring");
                    None
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to read border, ignoring");
                    None
                }
            },
            Some(path) => {
                warn!(path = %path.display(), "border file not found, ignoring");
                None
            }
            None => None,
        };

        Self::new(contours, border)
    }

    pub fn contours(&self) -> &ContourSet {
        &self.contours
    }

    pub fn border(&self) -> Option<&Polyline> {
        self.border.as_ref()
    }

    pub fn extent(&self) -> BoundingBox {
        self.extent
    }

    pub fn width(&self) -> f64 {
        self.extent.width()
    }

    pub fn height(&self) -> f64 {
        self.extent.height()
    }
}
