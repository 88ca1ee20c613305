//! Canvas composition for a three-block design.
//!
//! The clipped geometry arrives in world coordinates. This module fits the
//! extent onto the pixel canvas (preserving aspect ratio, with padding and
//! an optional bottom margin for the label), strokes each region's lines in
//! its palette color, overlays the label, and encodes the PNG.

use std::fs;
use std::path::Path;

use blocks_common::{Background, BoundingBox, DesignError, DesignResult, Palette, RenderOptions};
use contour_geometry::ClippedGeometry;
use tiny_skia::{LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

use crate::{png, text};

/// Canvas padding in inches on every side.
const PAD_INCHES: f64 = 0.1;

/// Extra world-space margin below the extent when a label is drawn, as a
/// fraction of the extent height.
const LABEL_MARGIN: f64 = 0.06;

/// Label offset below the extent floor, as a fraction of the extent height.
const LABEL_OFFSET: f64 = 0.02;

/// Render one design to PNG bytes.
///
/// `clipped` carries the per-region geometry; each region is stroked with
/// the matching palette color. `label` is drawn bottom-right when present
/// and `opts.show_text` is set.
pub fn render_design(
    extent: &BoundingBox,
    clipped: &[ClippedGeometry],
    palette: &Palette,
    label: Option<&str>,
    opts: &RenderOptions,
) -> DesignResult<Vec<u8>> {
    opts.validate()?;
    if !extent.is_finite() || extent.is_degenerate() {
        return Err(DesignError::InvalidBounds(format!(
            "extent is not renderable: ({}, {}) - ({}, {})",
            extent.min_x, extent.min_y, extent.max_x, extent.max_y
        )));
    }

    let (canvas_w, canvas_h) = opts.canvas_size();
    let mut pixmap = Pixmap::new(canvas_w, canvas_h).ok_or_else(|| {
        DesignError::Render(format!("cannot allocate {}x{} canvas", canvas_w, canvas_h))
    })?;

    match opts.background()? {
        Background::Transparent => {}
        Background::Solid(c) => {
            pixmap.fill(tiny_skia::Color::from_rgba8(c.r, c.g, c.b, c.a));
        }
    }

    let draw_label = opts.show_text && label.map_or(false, |l| !l.is_empty());
    let mapping = WorldToPixel::fit(extent, canvas_w, canvas_h, opts, draw_label);

    stroke_regions(&mut pixmap, clipped, palette, &mapping, opts)?;

    if draw_label {
        let label = label.unwrap_or_default();
        let size_px = opts.points_to_pixels(opts.text_size.resolve(opts.figsize));
        let color = blocks_common::Color::parse(&opts.text_color)?;
        let (x, y) = mapping.to_pixel(
            extent.max_x,
            extent.min_y - LABEL_OFFSET * extent.height(),
        );
        text::draw_label(
            &mut pixmap,
            label,
            x,
            y,
            size_px,
            color,
            opts.font_data.as_deref().map(|d| d.as_slice()),
        )?;
    }

    tracing::debug!(
        width = canvas_w,
        height = canvas_h,
        palette = %palette.name,
        "design rendered, encoding PNG"
    );

    // tiny-skia stores premultiplied alpha; PNG wants straight
    let mut rgba = Vec::with_capacity(canvas_w as usize * canvas_h as usize * 4);
    for px in pixmap.pixels() {
        let c = px.demultiply();
        rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }

    png::encode_auto(&rgba, canvas_w as usize, canvas_h as usize)
}

/// Render a design and write it to `path`.
///
/// The PNG is encoded fully in memory first and written with a single call,
/// so a failed render never leaves a partial file behind. Parent directories
/// are created as needed.
pub fn render_to_file(
    path: &Path,
    extent: &BoundingBox,
    clipped: &[ClippedGeometry],
    palette: &Palette,
    label: Option<&str>,
    opts: &RenderOptions,
) -> DesignResult<()> {
    let bytes = render_design(extent, clipped, palette, label, opts)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, &bytes)?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "design written");
    Ok(())
}

fn stroke_regions(
    pixmap: &mut Pixmap,
    clipped: &[ClippedGeometry],
    palette: &Palette,
    mapping: &WorldToPixel,
    opts: &RenderOptions,
) -> DesignResult<()> {
    let mut stroke = Stroke {
        width: opts.points_to_pixels(opts.line_width).max(0.1),
        ..Stroke::default()
    };
    stroke.line_cap = LineCap::Round;
    stroke.line_join = LineJoin::Round;

    for region_clip in clipped {
        if region_clip.is_empty() {
            continue;
        }
        let color = palette.colors.get(region_clip.region).ok_or_else(|| {
            DesignError::Render(format!(
                "no palette color for region {}",
                region_clip.region
            ))
        })?;

        let mut paint = Paint::default();
        paint.set_color_rgba8(color.r, color.g, color.b, color.a);
        paint.anti_alias = true;

        let mut pb = PathBuilder::new();
        for line in &region_clip.lines {
            let mut points = line.points.iter();
            if let Some(first) = points.next() {
                let (x, y) = mapping.to_pixel(first.x, first.y);
                pb.move_to(x, y);
                for p in points {
                    let (x, y) = mapping.to_pixel(p.x, p.y);
                    pb.line_to(x, y);
                }
            }
        }

        if let Some(path) = pb.finish() {
            pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }
    }

    Ok(())
}

/// Affine world-to-pixel mapping with a y flip (world y grows up, pixel y
/// grows down).
struct WorldToPixel {
    scale: f64,
    win_min_x: f64,
    win_max_y: f64,
    offset_x: f64,
    offset_y: f64,
}

impl WorldToPixel {
    fn fit(
        extent: &BoundingBox,
        canvas_w: u32,
        canvas_h: u32,
        opts: &RenderOptions,
        with_label_margin: bool,
    ) -> Self {
        // World window: the extent, plus room under it for the label
        let win_min_y = if with_label_margin {
            extent.min_y - LABEL_MARGIN * extent.height()
        } else {
            extent.min_y
        };
        let win_w = extent.width();
        let win_h = extent.max_y - win_min_y;

        let pad = PAD_INCHES * opts.dpi as f64;
        let avail_w = (canvas_w as f64 - 2.0 * pad).max(1.0);
        let avail_h = (canvas_h as f64 - 2.0 * pad).max(1.0);

        let scale = (avail_w / win_w).min(avail_h / win_h);

        // Center the window in the available area
        let offset_x = (canvas_w as f64 - win_w * scale) / 2.0;
        let offset_y = (canvas_h as f64 - win_h * scale) / 2.0;

        Self {
            scale,
            win_min_x: extent.min_x,
            win_max_y: extent.max_y,
            offset_x,
            offset_y,
        }
    }

    fn to_pixel(&self, x: f64, y: f64) -> (f32, f32) {
        let px = self.offset_x + (x - self.win_min_x) * self.scale;
        let py = self.offset_y + (self.win_max_y - y) * self.scale;
        (px as f32, py as f32)
    }
}
