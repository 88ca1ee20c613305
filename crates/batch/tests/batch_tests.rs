//! Batch runs against real files on disk.

use std::fs;
use std::path::Path;

use batch::{create_design, run_batch, BatchOutcome, DesignInput};
use blocks_common::{Palette, PaletteCatalog, RenderOptions};

/// A small but real contour file: three diagonal lines across (0,0)-(100,50).
fn write_contours(path: &Path) {
    let geojson = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {}, "geometry":
                {"type": "LineString", "coordinates": [[0, 0], [100, 50]]}},
            {"type": "Feature", "properties": {}, "geometry":
                {"type": "LineString", "coordinates": [[0, 25], [100, 25]]}},
            {"type": "Feature", "properties": {}, "geometry":
                {"type": "LineString", "coordinates": [[0, 50], [100, 0]]}}
        ]
    }"#;
    fs::write(path, geojson).unwrap();
}

fn fast_opts() -> RenderOptions {
    RenderOptions {
        dpi: 72,
        figsize: (2.0, 1.0),
        ..Default::default()
    }
}

fn test_palettes() -> Vec<Palette> {
    vec![
        PaletteCatalog::get("black").unwrap(),
        PaletteCatalog::get("ocean").unwrap(),
    ]
}

#[test]
fn test_one_failure_does_not_stop_the_batch() {
    let dir = tempfile::tempdir().unwrap();
    let contours = dir.path().join("aoraki.geojson");
    write_contours(&contours);

    let inputs = vec![
        DesignInput::new("Aoraki", &contours),
        DesignInput::new("Phantom Peak", dir.path().join("nowhere.geojson")),
        DesignInput::new("Aoraki Twin", &contours),
    ];
    let out = dir.path().join("out");

    let report = run_batch(&inputs, &test_palettes(), &out, &fast_opts(), |_, _| {}).unwrap();

    // Every requested pair is accounted for
    assert_eq!(report.total(), 6);
    assert_eq!(report.successes().count(), 4);
    assert_eq!(report.failures().count(), 2);

    for failure in report.failures() {
        assert_eq!(failure.mountain, "Phantom Peak");
        match &failure.outcome {
            BatchOutcome::Failure { kind, .. } => assert_eq!(*kind, "missing_file"),
            BatchOutcome::Success { .. } => unreachable!(),
        }
    }

    // The failed mountain left no partial files behind
    let names: Vec<String> = fs::read_dir(&out)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names.len(), 4);
    assert!(names.iter().all(|n| !n.contains("Phantom")));
}

#[test]
fn test_output_naming_and_content() {
    let dir = tempfile::tempdir().unwrap();
    let contours = dir.path().join("c.geojson");
    write_contours(&contours);

    let inputs = vec![DesignInput::new("Mont Blanc", &contours)];
    let out = dir.path().join("designs");
    let palettes = vec![PaletteCatalog::get("sage").unwrap()];

    let report = run_batch(&inputs, &palettes, &out, &fast_opts(), |_, _| {}).unwrap();
    assert!(report.all_succeeded());

    let path = out.join("Mont_Blanc_sage.png");
    assert!(path.exists());
    image::load_from_memory(&fs::read(&path).unwrap()).expect("valid PNG");
}

#[test]
fn test_name_suffix_appended_before_extension() {
    let dir = tempfile::tempdir().unwrap();
    let contours = dir.path().join("c.geojson");
    write_contours(&contours);

    let mut opts = fast_opts();
    opts.name_suffix = "_v2".to_string();

    let inputs = vec![DesignInput::new("Mont Blanc", &contours)];
    let palettes = vec![PaletteCatalog::get("clay").unwrap()];
    let out = dir.path().join("out");

    let report = run_batch(&inputs, &palettes, &out, &opts, |_, _| {}).unwrap();
    assert!(report.all_succeeded());
    assert!(out.join("Mont_Blanc_clay_v2.png").exists());
}

#[test]
fn test_empty_palette_list_means_full_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let contours = dir.path().join("c.geojson");
    write_contours(&contours);

    let inputs = vec![DesignInput::new("Hill", &contours)];
    let report = run_batch(&inputs, &[], dir.path(), &fast_opts(), |_, _| {}).unwrap();

    assert_eq!(report.total(), PaletteCatalog::all().len());
    assert!(report.all_succeeded());
}

#[test]
fn test_progress_callback_counts_every_pair() {
    let dir = tempfile::tempdir().unwrap();
    let contours = dir.path().join("c.geojson");
    write_contours(&contours);

    let inputs = vec![
        DesignInput::new("A", &contours),
        DesignInput::new("B", dir.path().join("missing.geojson")),
    ];

    let mut calls = Vec::new();
    run_batch(&inputs, &test_palettes(), dir.path(), &fast_opts(), |done, total| {
        calls.push((done, total));
    })
    .unwrap();

    // Called once per pair, monotonically, including for the failed mountain
    assert_eq!(calls.len(), 4);
    assert_eq!(calls.last(), Some(&(4, 4)));
    assert!(calls.windows(2).all(|w| w[0].0 + 1 == w[1].0));
}

#[test]
fn test_invalid_config_fails_up_front() {
    let dir = tempfile::tempdir().unwrap();
    let mut opts = fast_opts();
    opts.gap_percent = 0.7;

    let result = run_batch(&[], &[], dir.path(), &opts, |_, _| {});
    assert!(result.is_err());
}

#[test]
fn test_create_design_single_pair() {
    let dir = tempfile::tempdir().unwrap();
    let contours = dir.path().join("c.geojson");
    write_contours(&contours);

    let input = DesignInput::new("Denali", &contours);
    let palette = PaletteCatalog::get("indigo").unwrap();
    let out = dir.path().join("denali.png");

    create_design(&input, &palette, &out, &fast_opts()).unwrap();
    image::load_from_memory(&fs::read(&out).unwrap()).expect("valid PNG");
}

#[test]
fn test_border_defines_extent() {
    let dir = tempfile::tempdir().unwrap();
    let contours = dir.path().join("c.geojson");
    write_contours(&contours);

    let border = dir.path().join("border.geojson");
    fs::write(
        &border,
        r#"{"type": "Polygon", "coordinates":
            [[[-10, -10], [110, -10], [110, 60], [-10, 60], [-10, -10]]]}"#,
    )
    .unwrap();

    let input = DesignInput::new("Bordered", &contours).with_border(&border);
    let report = run_batch(
        &[input],
        &test_palettes(),
        dir.path(),
        &fast_opts(),
        |_, _| {},
    )
    .unwrap();
    assert!(report.all_succeeded());
}
