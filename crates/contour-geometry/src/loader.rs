//! GeoJSON polyline loading.
//!
//! Reads the subset of GeoJSON the batch convention produces: feature
//! collections of `LineString` / `MultiLineString` contours and `Polygon`
//! borders. Coordinates are taken as-is in a planar coordinate system.

use std::path::Path;

use blocks_common::{DesignError, DesignResult};
use serde_json::Value;

use crate::store::{Point, Polyline};

/// Load every line geometry from a GeoJSON file.
///
/// Polygon rings are included as closed polylines so a contour source that
/// stores closed loops as polygons still renders.
pub fn load_polylines(path: &Path) -> DesignResult<Vec<Polyline>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        DesignError::InvalidInput(format!("failed to read {}: {}", path.display(), e))
    })?;
    let root: Value = serde_json::from_str(&content).map_err(|e| {
        DesignError::InvalidInput(format!("failed to parse {}: {}", path.display(), e))
    })?;

    let mut lines = Vec::new();
    collect_lines(&root, &mut lines)?;

    if lines.is_empty() {
        return Err(DesignError::InvalidInput(format!(
            "no line geometry in {}",
            path.display()
        )));
    }

    Ok(lines)
}

/// Load a border ring from a GeoJSON file: the longest ring or line found.
///
/// Returns `Ok(None)` when the file parses but holds no usable geometry;
/// callers treat that (and any error) as "no border".
pub fn load_border(path: &Path) -> DesignResult<Option<Polyline>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        DesignError::InvalidInput(format!("failed to read {}: {}", path.display(), e))
    })?;
    let root: Value = serde_json::from_str(&content).map_err(|e| {
        DesignError::InvalidInput(format!("failed to parse {}: {}", path.display(), e))
    })?;

    let mut lines = Vec::new();
    collect_lines(&root, &mut lines)?;

    Ok(lines
        .into_iter()
        .filter(|l| !l.is_degenerate())
        .max_by(|a, b| {
            a.length()
                .partial_cmp(&b.length())
                .unwrap_or(std::cmp::Ordering::Equal)
        }))
}

/// Recursively walk a GeoJSON value and collect line geometries.
fn collect_lines(value: &Value, out: &mut Vec<Polyline>) -> DesignResult<()> {
    let Some(kind) = value.get("type").and_then(Value::as_str) else {
        return Err(DesignError::InvalidInput(
            "GeoJSON object missing \"type\"".into(),
        ));
    };

    match kind {
        "FeatureCollection" => {
            for feature in value
                .get("features")
                .and_then(Value::as_array)
                .into_iter()
                .flatten()
            {
                collect_lines(feature, out)?;
            }
        }
        "Feature" => {
            if let Some(geometry) = value.get("geometry").filter(|g| !g.is_null()) {
                collect_lines(geometry, out)?;
            }
        }
        "GeometryCollection" => {
            for geometry in value
                .get("geometries")
                .and_then(Value::as_array)
                .into_iter()
                .flatten()
            {
                collect_lines(geometry, out)?;
            }
        }
        "LineString" => {
            if let Some(line) = parse_position_array(value.get("coordinates")) {
                out.push(line);
            }
        }
        "MultiLineString" | "Polygon" => {
            for part in value
                .get("coordinates")
                .and_then(Value::as_array)
                .into_iter()
                .flatten()
            {
                if let Some(line) = parse_position_array(Some(part)) {
                    out.push(line);
                }
            }
        }
        "MultiPolygon" => {
            for polygon in value
                .get("coordinates")
                .and_then(Value::as_array)
                .into_iter()
                .flatten()
            {
                for ring in polygon.as_array().into_iter().flatten() {
                    if let Some(line) = parse_position_array(Some(ring)) {
                        out.push(line);
                    }
                }
            }
        }
        // Points carry no linework; skip rather than fail so mixed
        // collections load.
        "Point" | "MultiPoint" => {}
        other => {
            return Err(DesignError::InvalidInput(format!(
                "unsupported GeoJSON type: {}",
                other
            )));
        }
    }

    Ok(())
}

/// Parse an array of `[x, y, ...]` positions into a polyline.
fn parse_position_array(value: Option<&Value>) -> Option<Polyline> {
    let positions = value?.as_array()?;
    let mut points = Vec::with_capacity(positions.len());
    for position in positions {
        let coords = position.as_array()?;
        let x = coords.first()?.as_f64()?;
        let y = coords.get(1)?.as_f64()?;
        points.push(Point::new(x, y));
    }
    Some(Polyline::new(points))
}
