//! Rendering configuration surface.
//!
//! All knobs a caller can turn are gathered here and validated up front, so
//! the geometry and rendering stages only ever see checked values. Nothing is
//! read from process-global state; repeated renders with different options
//! cannot interfere with each other.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::path::Path;
use std::sync::Arc;

use crate::color::Color;
use crate::error::{DesignError, DesignResult};
use crate::palette::{Palette, PaletteCatalog};

/// Label size: fixed point size, or derived from the figure dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextSize {
    /// Scale with the figure size, clamped to a readable range.
    Adaptive,
    /// Fixed size in points.
    Fixed(f32),
}

impl TextSize {
    /// Resolve to a point size for the given figure size (inches).
    pub fn resolve(&self, figsize: (f64, f64)) -> f32 {
        match *self {
            TextSize::Fixed(pts) => pts,
            TextSize::Adaptive => {
                let base = figsize.0.min(figsize.1) as f32 * 3.0;
                base.clamp(12.0, 48.0)
            }
        }
    }
}

impl Serialize for TextSize {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            TextSize::Adaptive => serializer.serialize_str("adaptive"),
            TextSize::Fixed(pts) => serializer.serialize_f32(pts),
        }
    }
}

impl<'de> Deserialize<'de> for TextSize {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(f32),
            Keyword(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Number(pts) => Ok(TextSize::Fixed(pts)),
            Repr::Keyword(s) if s.eq_ignore_ascii_case("adaptive") => Ok(TextSize::Adaptive),
            Repr::Keyword(s) => Err(D::Error::custom(format!(
                "text_size must be a number or \"adaptive\", got \"{}\"",
                s
            ))),
        }
    }
}

/// Canvas background: fully transparent, or a solid fill.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Background {
    Transparent,
    Solid(Color),
}

/// Palette selection in a config file: a catalog name, or three explicit
/// color specifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PaletteChoice {
    Name(String),
    Colors(Vec<String>),
}

/// Rendering configuration for one design request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Fraction of the total width reserved for each inter-panel gap.
    pub gap_percent: f64,

    /// Output resolution in dots per inch.
    pub dpi: u32,

    /// Figure size in inches (width, height).
    pub figsize: (f64, f64),

    /// Contour stroke width in points.
    pub line_width: f32,

    /// Background color spec: hex, named, or "transparent".
    pub background_color: String,

    /// Label size in points, or "adaptive".
    pub text_size: TextSize,

    /// Label color spec.
    pub text_color: String,

    /// Whether to draw the mountain name label.
    pub show_text: bool,

    /// Palette to render with: a catalog name or three colors. `None` leaves
    /// the choice to the caller.
    pub colors: Option<PaletteChoice>,

    /// Appended to batch output names, between the palette and `.png`.
    pub name_suffix: String,

    /// Optional TrueType font bytes for the label. When absent the built-in
    /// stroked vector font is used. Font file loading is the caller's job.
    #[serde(skip)]
    pub font_data: Option<Arc<Vec<u8>>>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            gap_percent: 0.005,
            dpi: 300,
            figsize: (12.0, 12.0),
            line_width: 0.8,
            background_color: "transparent".to_string(),
            text_size: TextSize::Adaptive,
            text_color: "white".to_string(),
            show_text: true,
            colors: None,
            name_suffix: String::new(),
            font_data: None,
        }
    }
}

impl RenderOptions {
    /// Load options from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> DesignResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| DesignError::InvalidConfig(format!("cannot read config: {}", e)))?;
        Self::from_json(&content)
    }

    /// Parse options from a JSON string.
    pub fn from_json(json: &str) -> DesignResult<Self> {
        let opts: RenderOptions = serde_json::from_str(json)
            .map_err(|e| DesignError::InvalidConfig(format!("cannot parse config: {}", e)))?;
        opts.validate()?;
        Ok(opts)
    }

    /// Check every field is in range. Called before any rendering work.
    pub fn validate(&self) -> DesignResult<()> {
        if !self.gap_percent.is_finite() || !(0.0..0.5).contains(&self.gap_percent) {
            return Err(DesignError::InvalidConfig(format!(
                "gap_percent must be in [0, 0.5), got {}",
                self.gap_percent
            )));
        }
        if self.dpi == 0 {
            return Err(DesignError::InvalidConfig("dpi must be positive".into()));
        }
        let (w, h) = self.figsize;
        if !(w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0) {
            return Err(DesignError::InvalidConfig(format!(
                "figsize must be positive, got ({}, {})",
                w, h
            )));
        }
        if !(self.line_width.is_finite() && self.line_width > 0.0) {
            return Err(DesignError::InvalidConfig(format!(
                "line_width must be positive, got {}",
                self.line_width
            )));
        }
        if let TextSize::Fixed(pts) = self.text_size {
            if !(pts.is_finite() && pts > 0.0) {
                return Err(DesignError::InvalidConfig(format!(
                    "text_size must be positive, got {}",
                    pts
                )));
            }
        }
        self.background()?;
        Color::parse(&self.text_color)
            .map_err(|e| DesignError::InvalidConfig(format!("text_color: {}", e)))?;
        self.palette()?;
        Ok(())
    }

    /// Resolve the `colors` option, if set.
    ///
    /// A catalog name goes through the registry; an explicit list must hold
    /// exactly three well-formed colors.
    pub fn palette(&self) -> DesignResult<Option<Palette>> {
        match &self.colors {
            None => Ok(None),
            Some(PaletteChoice::Name(name)) => PaletteCatalog::get(name).map(Some),
            Some(PaletteChoice::Colors(specs)) => {
                let specs: Vec<&str> = specs.iter().map(String::as_str).collect();
                Palette::custom("custom", &specs).map(Some)
            }
        }
    }

    /// Resolve the background color spec.
    pub fn background(&self) -> DesignResult<Background> {
        let color = Color::parse(&self.background_color)
            .map_err(|e| DesignError::InvalidConfig(format!("background_color: {}", e)))?;
        if color == Color::TRANSPARENT {
            Ok(Background::Transparent)
        } else {
            Ok(Background::Solid(color))
        }
    }

    /// Output canvas size in pixels.
    pub fn canvas_size(&self) -> (u32, u32) {
        let w = (self.figsize.0 * self.dpi as f64).round().max(1.0) as u32;
        let h = (self.figsize.1 * self.dpi as f64).round().max(1.0) as u32;
        (w, h)
    }

    /// Convert a size in points to pixels at the configured dpi.
    pub fn points_to_pixels(&self, points: f32) -> f32 {
        points * self.dpi as f32 / 72.0
    }
}
