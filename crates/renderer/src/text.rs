//! Label text rendering.
//!
//! Two paths: a caller-supplied TrueType face rendered with `rusttype`, or
//! a built-in stroked vector font when no font bytes are provided. The
//! built-in glyphs are simple line-segment skeletons, which suits the
//! stylized look of the designs and keeps the core free of font assets.

use blocks_common::{Color, DesignError, DesignResult};
use rusttype::{point, Font, Scale};
use tiny_skia::{LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

/// Glyph box width as a fraction of the em size.
const GLYPH_WIDTH: f32 = 0.6;
/// Horizontal spacing between glyph boxes, em fraction.
const GLYPH_SPACING: f32 = 0.15;
/// Stroke width of vector glyphs, em fraction.
const GLYPH_STROKE: f32 = 0.08;

/// Draw `text` right-aligned at `right_x`, with the top of the line at
/// `top_y`. `size` is the em height in pixels.
pub fn draw_label(
    pixmap: &mut Pixmap,
    text: &str,
    right_x: f32,
    top_y: f32,
    size: f32,
    color: Color,
    font_data: Option<&[u8]>,
) -> DesignResult<()> {
    if text.is_empty() {
        return Ok(());
    }

    match font_data {
        Some(data) => draw_truetype(pixmap, text, right_x, top_y, size, color, data),
        None => {
            draw_vector(pixmap, text, right_x, top_y, size, color);
            Ok(())
        }
    }
}

/// Width of `text` in pixels when drawn with the built-in vector font.
pub fn vector_text_width(text: &str, size: f32) -> f32 {
    let n = text.chars().count() as f32;
    if n == 0.0 {
        return 0.0;
    }
    (n * (GLYPH_WIDTH + GLYPH_SPACING) - GLYPH_SPACING) * size
}

// ============================================================================
// TrueType path
// ============================================================================

fn draw_truetype(
    pixmap: &mut Pixmap,
    text: &str,
    right_x: f32,
    top_y: f32,
    size: f32,
    color: Color,
    data: &[u8],
) -> DesignResult<()> {
    let font = Font::try_from_bytes(data)
        .ok_or_else(|| DesignError::Render("invalid TrueType font data".into()))?;

    let scale = Scale::uniform(size);
    let v_metrics = font.v_metrics(scale);

    // Measure, then lay out so the right edge lands on right_x
    let width: f32 = {
        let glyphs: Vec<_> = font.layout(text, scale, point(0.0, 0.0)).collect();
        glyphs
            .last()
            .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0)
    };

    let origin = point(right_x - width, top_y + v_metrics.ascent);
    let (pm_width, pm_height) = (pixmap.width() as i32, pixmap.height() as i32);

    for glyph in font.layout(text, scale, origin) {
        if let Some(bb) = glyph.pixel_bounding_box() {
            let data = pixmap.data_mut();
            glyph.draw(|gx, gy, coverage| {
                let x = bb.min.x + gx as i32;
                let y = bb.min.y + gy as i32;
                if x >= 0 && x < pm_width && y >= 0 && y < pm_height {
                    let idx = (y as usize * pm_width as usize + x as usize) * 4;
                    blend_pixel(&mut data[idx..idx + 4], color, coverage);
                }
            });
        }
    }

    Ok(())
}

/// Source-over blend of a straight-alpha color into a premultiplied pixel.
fn blend_pixel(dst: &mut [u8], color: Color, coverage: f32) {
    let alpha = (color.a as f32 / 255.0) * coverage.clamp(0.0, 1.0);
    if alpha <= 0.0 {
        return;
    }
    let inv = 1.0 - alpha;

    let sr = color.r as f32 / 255.0 * alpha;
    let sg = color.g as f32 / 255.0 * alpha;
    let sb = color.b as f32 / 255.0 * alpha;

    dst[0] = ((sr + dst[0] as f32 / 255.0 * inv) * 255.0).round() as u8;
    dst[1] = ((sg + dst[1] as f32 / 255.0 * inv) * 255.0).round() as u8;
    dst[2] = ((sb + dst[2] as f32 / 255.0 * inv) * 255.0).round() as u8;
    dst[3] = ((alpha + dst[3] as f32 / 255.0 * inv) * 255.0).round() as u8;
}

// ============================================================================
// Built-in vector font
// ============================================================================

fn draw_vector(pixmap: &mut Pixmap, text: &str, right_x: f32, top_y: f32, size: f32, color: Color) {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;

    let mut stroke = Stroke {
        width: size * GLYPH_STROKE,
        ..Stroke::default()
    };
    stroke.line_cap = LineCap::Round;
    stroke.line_join = LineJoin::Round;

    let start_x = right_x - vector_text_width(text, size);
    let advance = (GLYPH_WIDTH + GLYPH_SPACING) * size;

    for (i, ch) in text.chars().enumerate() {
        let origin_x = start_x + i as f32 * advance;
        let segments = glyph_segments(ch);

        let mut pb = PathBuilder::new();
        for ((x1, y1), (x2, y2)) in segments {
            pb.move_to(origin_x + x1 * size, top_y + y1 * size);
            pb.line_to(origin_x + x2 * size, top_y + y2 * size);
        }
        if let Some(path) = pb.finish() {
            pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }
    }
}

type Seg = ((f32, f32), (f32, f32));

/// Line segments for one glyph, in em coordinates: x in 0..0.6, y in 0..1
/// with y growing downward. Unknown characters render as nothing.
fn glyph_segments(ch: char) -> &'static [Seg] {
    // Shared landmarks
    const L: f32 = 0.0; // left
    const R: f32 = 0.6; // right
    const C: f32 = 0.3; // center
    const T: f32 = 0.0; // top
    const M: f32 = 0.5; // middle
    const B: f32 = 1.0; // bottom

    match ch.to_ascii_uppercase() {
        'A' => &[((L, T), (R, T)), ((L, T), (L, B)), ((R, T), (R, B)), ((L, M), (R, M))],
        'B' | '8' => &[
            ((L, T), (R, T)),
            ((L, B), (R, B)),
            ((L, M), (R, M)),
            ((L, T), (L, B)),
            ((R, T), (R, B)),
        ],
        'C' => &[((L, T), (R, T)), ((L, T), (L, B)), ((L, B), (R, B))],
        'D' | 'O' => &[((L, T), (R, T)), ((R, T), (R, B)), ((L, B), (R, B)), ((L, T), (L, B))],
        'E' => &[((L, T), (R, T)), ((L, M), (R, M)), ((L, B), (R, B)), ((L, T), (L, B))],
        'F' => &[((L, T), (R, T)), ((L, M), (R, M)), ((L, T), (L, B))],
        'G' => &[
            ((R, T), (L, T)),
            ((L, T), (L, B)),
            ((L, B), (R, B)),
            ((R, B), (R, M)),
            ((C, M), (R, M)),
        ],
        'H' => &[((L, T), (L, B)), ((R, T), (R, B)), ((L, M), (R, M))],
        'I' => &[((C, T), (C, B)), ((L, T), (R, T)), ((L, B), (R, B))],
        'J' => &[((R, T), (R, B)), ((L, B), (R, B)), ((L, 0.75), (L, B))],
        'K' => &[((L, T), (L, B)), ((L, M), (R, T)), ((L, M), (R, B))],
        'L' => &[((L, T), (L, B)), ((L, B), (R, B))],
        'M' => &[((L, T), (L, B)), ((R, T), (R, B)), ((L, T), (C, M)), ((C, M), (R, T))],
        'N' => &[((L, T), (L, B)), ((R, T), (R, B)), ((L, T), (R, B))],
        'P' => &[((L, T), (L, B)), ((L, T), (R, T)), ((R, T), (R, M)), ((L, M), (R, M))],
        'Q' => &[
            ((L, T), (R, T)),
            ((R, T), (R, B)),
            ((L, B), (R, B)),
            ((L, T), (L, B)),
            ((0.35, 0.65), (R, B)),
        ],
        'R' => &[
            ((L, T), (L, B)),
            ((L, T), (R, T)),
            ((R, T), (R, M)),
            ((L, M), (R, M)),
            ((0.2, M), (R, B)),
        ],
        'S' | '5' => &[
            ((R, T), (L, T)),
            ((L, T), (L, M)),
            ((L, M), (R, M)),
            ((R, M), (R, B)),
            ((R, B), (L, B)),
        ],
        'T' => &[((L, T), (R, T)), ((C, T), (C, B))],
        'U' => &[((L, T), (L, B)), ((L, B), (R, B)), ((R, T), (R, B))],
        'V' => &[((L, T), (C, B)), ((C, B), (R, T))],
        'W' => &[((L, T), (L, B)), ((R, T), (R, B)), ((L, B), (C, M)), ((C, M), (R, B))],
        'X' => &[((L, T), (R, B)), ((R, T), (L, B))],
        'Y' => &[((L, T), (C, M)), ((R, T), (C, M)), ((C, M), (C, B))],
        'Z' => &[((L, T), (R, T)), ((R, T), (L, B)), ((L, B), (R, B))],
        '0' => &[
            ((L, T), (R, T)),
            ((R, T), (R, B)),
            ((L, B), (R, B)),
            ((L, T), (L, B)),
            ((0.45, 0.25), (0.15, 0.75)),
        ],
        '1' => &[((C, T), (C, B)), ((0.12, 0.18), (C, T)), ((0.1, B), (0.5, B))],
        '2' => &[
            ((L, T), (R, T)),
            ((R, T), (R, M)),
            ((L, M), (R, M)),
            ((L, M), (L, B)),
            ((L, B), (R, B)),
        ],
        '3' => &[((L, T), (R, T)), ((L, M), (R, M)), ((L, B), (R, B)), ((R, T), (R, B))],
        '4' => &[((L, T), (L, M)), ((L, M), (R, M)), ((R, T), (R, B))],
        '6' => &[
            ((R, T), (L, T)),
            ((L, T), (L, B)),
            ((L, M), (R, M)),
            ((R, M), (R, B)),
            ((L, B), (R, B)),
        ],
        '7' => &[((L, T), (R, T)), ((R, T), (0.2, B))],
        '9' => &[
            ((L, T), (R, T)),
            ((L, T), (L, M)),
            ((L, M), (R, M)),
            ((R, T), (R, B)),
            ((L, B), (R, B)),
        ],
        '-' => &[((L, M), (R, M))],
        '.' => &[((C, 0.92), (C, B))],
        '\'' => &[((C, T), (0.25, 0.25))],
        _ => &[],
    }
}
