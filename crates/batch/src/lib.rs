//! Batch orchestration: render every (mountain, palette) pair.
//!
//! Geometry is loaded, indexed, and clipped once per mountain and reused
//! across all its palette renders. Failures are contained to the pair that
//! failed; the batch always runs to completion and reports one outcome per
//! requested pair.

use std::path::{Path, PathBuf};

use blocks_common::{DesignResult, Palette, PaletteCatalog, RenderOptions};
use contour_geometry::{clip_all, partition_blocks, ClippedGeometry, GeometryStore, SpatialIndex};
use tracing::{error, info};

/// One mountain to render: a display name and its geometry sources.
#[derive(Debug, Clone)]
pub struct DesignInput {
    /// Display name, used for the label and the output file name.
    pub name: String,
    pub contour_path: PathBuf,
    pub border_path: Option<PathBuf>,
}

impl DesignInput {
    pub fn new(name: impl Into<String>, contour_path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            contour_path: contour_path.into(),
            border_path: None,
        }
    }

    pub fn with_border(mut self, border_path: impl Into<PathBuf>) -> Self {
        self.border_path = Some(border_path.into());
        self
    }
}

/// Result of one (mountain, palette) pair.
#[derive(Debug, Clone)]
pub enum BatchOutcome {
    Success { path: PathBuf },
    Failure { kind: &'static str, message: String },
}

/// One entry in the batch report.
#[derive(Debug, Clone)]
pub struct BatchResult {
    pub mountain: String,
    pub palette: String,
    pub outcome: BatchOutcome,
}

impl BatchResult {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, BatchOutcome::Success { .. })
    }
}

/// Complete batch report: one result per requested pair, in request order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub results: Vec<BatchResult>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn successes(&self) -> impl Iterator<Item = &BatchResult> {
        self.results.iter().filter(|r| r.is_success())
    }

    pub fn failures(&self) -> impl Iterator<Item = &BatchResult> {
        self.results.iter().filter(|r| !r.is_success())
    }

    pub fn all_succeeded(&self) -> bool {
        self.results.iter().all(|r| r.is_success())
    }
}

/// Render every (mountain, palette) pair into `output_dir`.
///
/// An empty `palettes` slice means the full catalog. `progress` is called
/// after each pair with (done, total). Configuration problems fail the whole
/// batch up front; per-mountain and per-render problems become `Failure`
/// entries and the rest of the batch proceeds.
pub fn run_batch(
    inputs: &[DesignInput],
    palettes: &[Palette],
    output_dir: &Path,
    opts: &RenderOptions,
    mut progress: impl FnMut(usize, usize),
) -> DesignResult<BatchReport> {
    opts.validate()?;

    let catalog;
    let palettes = if palettes.is_empty() {
        catalog = PaletteCatalog::all();
        &catalog[..]
    } else {
        palettes
    };

    let total = inputs.len() * palettes.len();
    let mut report = BatchReport::default();
    let mut done = 0usize;

    info!(
        mountains = inputs.len(),
        palettes = palettes.len(),
        total,
        output = %output_dir.display(),
        "batch started"
    );

    for input in inputs {
        match prepare_geometry(input, opts) {
            Ok(scene) => {
                for palette in palettes {
                    let outcome = render_pair(input, &scene, palette, output_dir, opts);
                    if let BatchOutcome::Failure { kind, message } = &outcome {
                        error!(
                            mountain = %input.name,
                            palette = %palette.name,
                            kind,
                            message,
                            "design failed"
                        );
                    }
                    report.results.push(BatchResult {
                        mountain: input.name.clone(),
                        palette: palette.name.clone(),
                        outcome,
                    });
                    done += 1;
                    progress(done, total);
                }
            }
            Err(e) => {
                // The mountain itself is unusable: every requested palette
                // for it gets a failure entry, keeping the report complete.
                error!(mountain = %input.name, kind = e.kind(), error = %e, "mountain skipped");
                for palette in palettes {
                    report.results.push(BatchResult {
                        mountain: input.name.clone(),
                        palette: palette.name.clone(),
                        outcome: BatchOutcome::Failure {
                            kind: e.kind(),
                            message: e.to_string(),
                        },
                    });
                    done += 1;
                    progress(done, total);
                }
            }
        }
    }

    info!(
        succeeded = report.successes().count(),
        failed = report.failures().count(),
        "batch finished"
    );

    Ok(report)
}

/// Render a single mountain with a single palette to `output_path`.
pub fn create_design(
    input: &DesignInput,
    palette: &Palette,
    output_path: &Path,
    opts: &RenderOptions,
) -> DesignResult<()> {
    opts.validate()?;
    let scene = prepare_geometry(input, opts)?;
    renderer::render_to_file(
        output_path,
        &scene.extent,
        &scene.clipped,
        palette,
        Some(&input.name),
        opts,
    )
}

/// Output file name for a pair: `{sanitized mountain}_{palette}{suffix}.png`.
pub fn output_file_name(mountain: &str, palette: &str, suffix: &str) -> String {
    format!("{}_{}{}.png", sanitize(mountain), palette, sanitize(suffix))
}

/// Replace path-hostile characters in a display name.
fn sanitize(name: &str) -> String {
    name.replace([' ', '/'], "_")
}

/// Geometry prepared once per mountain and shared across palettes.
struct Scene {
    extent: blocks_common::BoundingBox,
    clipped: Vec<ClippedGeometry>,
}

fn prepare_geometry(input: &DesignInput, opts: &RenderOptions) -> DesignResult<Scene> {
    let store = GeometryStore::open(&input.contour_path, input.border_path.as_deref())?;
    let extent = store.extent();
    let regions = partition_blocks(&extent, opts.gap_percent)?;
    let index = SpatialIndex::build(store.contours());
    let clipped = clip_all(store.contours(), &index, &regions);
    Ok(Scene { extent, clipped })
}

fn render_pair(
    input: &DesignInput,
    scene: &Scene,
    palette: &Palette,
    output_dir: &Path,
    opts: &RenderOptions,
) -> BatchOutcome {
    let path = output_dir.join(output_file_name(
        &input.name,
        &palette.name,
        &opts.name_suffix,
    ));
    match renderer::render_to_file(
        &path,
        &scene.extent,
        &scene.clipped,
        palette,
        Some(&input.name),
        opts,
    ) {
        Ok(()) => BatchOutcome::Success { path },
        Err(e) => BatchOutcome::Failure {
            kind: e.kind(),
            message: e.to_string(),
        },
    }
}
