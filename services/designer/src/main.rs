//! Design generator CLI.
//!
//! Single mode renders one contour file; batch mode walks a directory of
//! mountain subdirectories and renders every (mountain, palette) pair.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use batch::{run_batch, BatchOutcome, DesignInput};
use blocks_common::{Palette, PaletteCatalog, RenderOptions};
use clap::Parser;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(name = "designer")]
#[command(about = "Three-block contour design generator")]
struct Args {
    /// Contour GeoJSON file (single mode)
    #[arg(long)]
    contours: Option<PathBuf>,

    /// Optional border GeoJSON file (single mode)
    #[arg(long)]
    border: Option<PathBuf>,

    /// Display name for the label; defaults to the contour file stem
    #[arg(long)]
    name: Option<String>,

    /// Output directory (single mode)
    #[arg(short, long, default_value = "designs")]
    output: PathBuf,

    /// Batch root: every subdirectory is one mountain
    #[arg(long)]
    batch: Option<PathBuf>,

    /// Output directory for batch mode
    #[arg(long, default_value = "designs")]
    batch_output: PathBuf,

    /// Palette name; repeat for several. Empty means the full catalog in
    /// batch mode and "black" in single mode
    #[arg(short, long)]
    palette: Vec<String>,

    /// List available palettes and exit
    #[arg(long)]
    list_palettes: bool,

    /// Skip the name label
    #[arg(long)]
    no_text: bool,

    /// Rendering options as a JSON file
    #[arg(long)]
    config: Option<PathBuf>,

    /// TrueType font file for the label
    #[arg(long)]
    font: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if args.list_palettes {
        for name in PaletteCatalog::names() {
            println!("{}", name);
        }
        return Ok(());
    }

    let opts = build_options(&args)?;
    let palettes = resolve_palettes(&args.palette)?;

    let inputs = match (&args.batch, &args.contours) {
        (Some(root), None) => discover_batch(root)?,
        (None, Some(contours)) => {
            let name = match &args.name {
                Some(n) => n.clone(),
                None => display_name_from_path(contours),
            };
            let mut input = DesignInput::new(name, contours);
            if let Some(border) = &args.border {
                input = input.with_border(border);
            }
            vec![input]
        }
        (Some(_), Some(_)) => bail!("--batch and --contours are mutually exclusive"),
        (None, None) => bail!("one of --contours or --batch is required"),
    };

    // Palette precedence: --palette flags, then a config-file `colors`
    // choice, then the single-mode default (batch defaults to the catalog)
    let palettes = if palettes.is_empty() {
        match opts.palette()? {
            Some(palette) => vec![palette],
            None if args.batch.is_none() => vec![PaletteCatalog::default_palette()],
            None => palettes,
        }
    } else {
        palettes
    };

    let total_pairs = inputs.len()
        * if palettes.is_empty() {
            PaletteCatalog::all().len()
        } else {
            palettes.len()
        };
    let output_dir = if args.batch.is_some() {
        &args.batch_output
    } else {
        &args.output
    };
    info!(designs = total_pairs, output = %output_dir.display(), "starting");

    let report = run_batch(&inputs, &palettes, output_dir, &opts, |done, total| {
        info!(done, total, "progress");
    })?;

    for failure in report.failures() {
        if let BatchOutcome::Failure { kind, message } = &failure.outcome {
            warn!(
                mountain = %failure.mountain,
                palette = %failure.palette,
                kind,
                message,
                "design failed"
            );
        }
    }

    println!(
        "{} of {} designs rendered to {}",
        report.successes().count(),
        report.total(),
        output_dir.display()
    );
    if !report.all_succeeded() {
        std::process::exit(1);
    }
    Ok(())
}

fn build_options(args: &Args) -> Result<RenderOptions> {
    let mut opts = match &args.config {
        Some(path) => RenderOptions::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => RenderOptions::default(),
    };
    if args.no_text {
        opts.show_text = false;
    }
    if let Some(font_path) = &args.font {
        let bytes = fs::read(font_path)
            .with_context(|| format!("reading font {}", font_path.display()))?;
        opts.font_data = Some(Arc::new(bytes));
    }
    Ok(opts)
}

fn resolve_palettes(names: &[String]) -> Result<Vec<Palette>> {
    names
        .iter()
        .map(|n| PaletteCatalog::get(n).map_err(Into::into))
        .collect()
}

/// Directory name to label: underscores to spaces, words capitalized.
fn display_name_from_dir(dir: &Path) -> String {
    let raw = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    raw.split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn display_name_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().replace('_', " "))
        .unwrap_or_else(|| "design".to_string())
}

/// Walk the batch root: each immediate subdirectory is one mountain. Inside,
/// a file named like `*contour*.geojson` (or any geojson as fallback) holds
/// the contours, and `*border*` the optional border.
fn discover_batch(root: &Path) -> Result<Vec<DesignInput>> {
    if !root.is_dir() {
        bail!("batch root {} is not a directory", root.display());
    }

    let mut inputs = Vec::new();
    let mut dirs: Vec<PathBuf> = fs::read_dir(root)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    dirs.sort();

    for dir in dirs {
        let mut geojson_files: Vec<PathBuf> = WalkDir::new(&dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .map(|e| e.into_path())
            .filter(|p| {
                matches!(
                    p.extension().and_then(|e| e.to_str()),
                    Some("geojson") | Some("json")
                )
            })
            .collect();
        geojson_files.sort();

        let is_border = |p: &Path| {
            p.file_name()
                .map_or(false, |n| n.to_string_lossy().contains("border"))
        };
        let contours = geojson_files
            .iter()
            .find(|p| {
                p.file_name()
                    .map_or(false, |n| n.to_string_lossy().contains("contour"))
            })
            .or_else(|| geojson_files.iter().find(|p| !is_border(p)))
            .cloned();
        let border = geojson_files.iter().find(|p| is_border(p)).cloned();

        match contours {
            Some(contours) => {
                let mut input = DesignInput::new(display_name_from_dir(&dir), contours);
                if let Some(border) = border {
                    input = input.with_border(border);
                }
                inputs.push(input);
            }
            None => {
                warn!(dir = %dir.display(), "no contour file found, skipping");
            }
        }
    }

    if inputs.is_empty() {
        bail!("no mountain directories found under {}", root.display());
    }

    info!(mountains = inputs.len(), "batch discovered");
    Ok(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_from_dir() {
        assert_eq!(display_name_from_dir(Path::new("/x/mont_blanc")), "Mont Blanc");
        assert_eq!(display_name_from_dir(Path::new("/x/k2")), "K2");
        assert_eq!(display_name_from_dir(Path::new("/x/ben__nevis")), "Ben Nevis");
    }

    #[test]
    fn test_display_name_from_path() {
        assert_eq!(
            display_name_from_path(Path::new("/d/aoraki_cook.geojson")),
            "aoraki cook"
        );
    }

    #[test]
    fn test_output_name_roundtrip() {
        // The batch file naming stays stable for discovered names
        assert_eq!(
            batch::output_file_name(&display_name_from_dir(Path::new("mont_blanc")), "ocean", ""),
            "Mont_Blanc_ocean.png"
        );
    }
}
