//! End-to-end render tests: build geometry, render, decode the PNG back.

use blocks_common::{BoundingBox, Palette, RenderOptions, TextSize};
use contour_geometry::{clip_all, partition_blocks, ContourSet, Polyline, SpatialIndex};
use renderer::{render_design, render_to_file};

fn small_opts() -> RenderOptions {
    RenderOptions {
        dpi: 100,
        figsize: (4.0, 2.0),
        line_width: 3.0,
        show_text: false,
        ..Default::default()
    }
}

/// One line per third of a (0,0)-(100,50) extent, clipped with a 5% gap.
fn three_panel_scene() -> (BoundingBox, Vec<contour_geometry::ClippedGeometry>) {
    let set = ContourSet::new(vec![
        Polyline::from_coords(&[(2.0, 10.0), (28.0, 40.0)]),
        Polyline::from_coords(&[(37.0, 10.0), (63.0, 40.0)]),
        Polyline::from_coords(&[(72.0, 10.0), (98.0, 40.0)]),
    ])
    .unwrap();
    let extent = BoundingBox::new(0.0, 0.0, 100.0, 50.0);
    let regions = partition_blocks(&extent, 0.05).unwrap();
    let index = SpatialIndex::build(&set);
    let clipped = clip_all(&set, &index, &regions);
    (extent, clipped)
}

fn decode(png: &[u8]) -> image::RgbaImage {
    image::load_from_memory(png).expect("valid PNG").to_rgba8()
}

// ============================================================================
// render_design
// ============================================================================

#[test]
fn test_canvas_dimensions_match_options() {
    let (extent, clipped) = three_panel_scene();
    let palette = Palette::custom("test", &["#111111", "#222222", "#333333"]).unwrap();
    let png = render_design(&extent, &clipped, &palette, None, &small_opts()).unwrap();

    let img = decode(&png);
    assert_eq!((img.width(), img.height()), small_opts().canvas_size());
}

#[test]
fn test_each_panel_strokes_its_palette_color() {
    let (extent, clipped) = three_panel_scene();
    let palette = Palette::custom("test", &["#111111", "#222222", "#333333"]).unwrap();
    let png = render_design(&extent, &clipped, &palette, None, &small_opts()).unwrap();

    let img = decode(&png);
    for want in [[0x11u8; 3], [0x22u8; 3], [0x33u8; 3]] {
        let found = img
            .pixels()
            .any(|p| p.0[0] == want[0] && p.0[1] == want[1] && p.0[2] == want[2] && p.0[3] == 255);
        assert!(found, "color {:02x?} missing from output", want);
    }
}

#[test]
fn test_render_is_byte_identical() {
    let (extent, clipped) = three_panel_scene();
    let palette = Palette::custom("test", &["#1B2951", "#2C3E50", "#34495E"]).unwrap();
    let mut opts = small_opts();
    opts.show_text = true;
    opts.text_size = TextSize::Fixed(14.0);

    let a = render_design(&extent, &clipped, &palette, Some("EVEREST"), &opts).unwrap();
    let b = render_design(&extent, &clipped, &palette, Some("EVEREST"), &opts).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_empty_geometry_renders_background_only() {
    let extent = BoundingBox::new(0.0, 0.0, 100.0, 50.0);
    let palette = Palette::custom("test", &["#111111", "#222222", "#333333"]).unwrap();
    let mut opts = small_opts();
    opts.background_color = "#102030".to_string();

    let png = render_design(&extent, &[], &palette, None, &opts).unwrap();
    let img = decode(&png);
    assert!(img
        .pixels()
        .all(|p| p.0 == [0x10, 0x20, 0x30, 255]));
}

#[test]
fn test_transparent_background_stays_transparent() {
    let (extent, clipped) = three_panel_scene();
    let palette = Palette::custom("test", &["#111111", "#222222", "#333333"]).unwrap();
    let png = render_design(&extent, &clipped, &palette, None, &small_opts()).unwrap();

    let img = decode(&png);
    // Padding corners are untouched
    assert_eq!(img.get_pixel(0, 0).0[3], 0);
    assert_eq!(img.get_pixel(img.width() - 1, 0).0[3], 0);
}

#[test]
fn test_label_marks_pixels() {
    let (extent, clipped) = three_panel_scene();
    let palette = Palette::custom("test", &["#111111", "#222222", "#333333"]).unwrap();
    let mut opts = small_opts();
    opts.show_text = true;
    opts.background_color = "black".to_string();
    opts.text_color = "white".to_string();

    let with_label =
        render_design(&extent, &clipped, &palette, Some("K2"), &opts).unwrap();
    let without = render_design(&extent, &clipped, &palette, None, &opts).unwrap();
    assert_ne!(with_label, without);

    // White label pixels over the black background
    let img = decode(&with_label);
    assert!(img.pixels().any(|p| p.0 == [255, 255, 255, 255]));
}

// ============================================================================
// render_to_file
// ============================================================================

#[test]
fn test_write_creates_parent_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested/out/design.png");

    let (extent, clipped) = three_panel_scene();
    let palette = Palette::custom("test", &["#111111", "#222222", "#333333"]).unwrap();
    render_to_file(&path, &extent, &clipped, &palette, None, &small_opts()).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    decode(&bytes); // must be a well-formed PNG
}

#[test]
fn test_failed_render_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.png");

    let degenerate = BoundingBox::new(0.0, 0.0, 0.0, 10.0);
    let palette = Palette::custom("test", &["#111111", "#222222", "#333333"]).unwrap();
    let result = render_to_file(&path, &degenerate, &[], &palette, None, &small_opts());

    assert!(result.is_err());
    assert!(!path.exists());
}
