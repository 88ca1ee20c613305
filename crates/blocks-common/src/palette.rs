//! Named three-color palette catalog.
//!
//! Every design uses exactly three colors, assigned positionally to the
//! three panels. The catalog groups schemes conceptually but lookups are by
//! flat name. Iteration order is the declaration order below, so batch runs
//! are deterministic.

use crate::color::Color;
use crate::error::{DesignError, DesignResult};

/// Conceptual grouping of catalog palettes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteGroup {
    /// Monochrome ramps, well suited to screen printing.
    Monochrome,
    /// Muted earth tones.
    Earth,
    /// Simplified tetradic complementary schemes.
    Tetradic,
    /// Single-hue gradients.
    Gradient,
}

/// Exactly three colors, one per panel, matched by position.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub name: String,
    pub colors: [Color; 3],
}

impl Palette {
    /// Build a caller-supplied palette from color specifications.
    ///
    /// Anything other than exactly three well-formed colors is rejected.
    pub fn custom(name: &str, specs: &[&str]) -> DesignResult<Self> {
        if specs.len() != 3 {
            return Err(DesignError::InvalidPalette(format!(
                "exactly 3 colors required, got {}",
                specs.len()
            )));
        }
        let mut colors = [Color::BLACK; 3];
        for (slot, spec) in colors.iter_mut().zip(specs) {
            *slot = Color::parse(spec)?;
        }
        Ok(Self {
            name: name.to_string(),
            colors,
        })
    }
}

/// Catalog entry: name, group, three hex colors.
type CatalogEntry = (&'static str, PaletteGroup, [&'static str; 3]);

const CATALOG: &[CatalogEntry] = &[
    // Monochrome
    ("black", PaletteGroup::Monochrome, ["#1A1A1A", "#333333", "#4D4D4D"]),
    ("charcoal", PaletteGroup::Monochrome, ["#2C2C2C", "#404040", "#545454"]),
    ("white", PaletteGroup::Monochrome, ["#F5F5F5", "#E8E8E8", "#DBDBDB"]),
    ("navy", PaletteGroup::Monochrome, ["#1B2951", "#2C3E50", "#34495E"]),
    // Earth tones
    ("desert", PaletteGroup::Earth, ["#8B7355", "#A0926B", "#B5A482"]),
    ("clay", PaletteGroup::Earth, ["#B85450", "#C67368", "#D49280"]),
    ("sage", PaletteGroup::Earth, ["#87A96B", "#9BB284", "#AFBC9C"]),
    ("stone", PaletteGroup::Earth, ["#7A7A7A", "#8C8C8C", "#9E9E9E"]),
    // Tetradic
    ("autumn", PaletteGroup::Tetradic, ["#D2691E", "#8B4513", "#A0522D"]),
    ("forest", PaletteGroup::Tetradic, ["#228B22", "#2F4F2F", "#556B2F"]),
    ("ocean", PaletteGroup::Tetradic, ["#4682B4", "#5F9EA0", "#708090"]),
    ("burgundy", PaletteGroup::Tetradic, ["#800020", "#9B2335", "#B6364A"]),
    // Single-hue gradients
    ("indigo", PaletteGroup::Gradient, ["#2E3192", "#4B5F9B", "#688DA4"]),
    ("rust", PaletteGroup::Gradient, ["#B7410E", "#C95A2A", "#DB7346"]),
    ("pine", PaletteGroup::Gradient, ["#01796F", "#2D8B83", "#599D97"]),
    ("plum", PaletteGroup::Gradient, ["#5D4037", "#6D4C41", "#795548"]),
];

/// The static palette registry.
pub struct PaletteCatalog;

impl PaletteCatalog {
    /// Look up a palette by name.
    pub fn get(name: &str) -> DesignResult<Palette> {
        CATALOG
            .iter()
            .find(|(entry_name, _, _)| *entry_name == name)
            .map(|entry| Self::materialize(entry))
            .ok_or_else(|| DesignError::UnknownPalette(name.to_string()))
    }

    /// All palettes, in catalog order.
    pub fn all() -> Vec<Palette> {
        CATALOG.iter().map(Self::materialize).collect()
    }

    /// All palette names, in catalog order.
    pub fn names() -> Vec<&'static str> {
        CATALOG.iter().map(|(name, _, _)| *name).collect()
    }

    /// Group of a named palette, if registered.
    pub fn group(name: &str) -> Option<PaletteGroup> {
        CATALOG
            .iter()
            .find(|(entry_name, _, _)| *entry_name == name)
            .map(|(_, group, _)| *group)
    }

    /// The fallback palette when none is requested.
    pub fn default_palette() -> Palette {
        Self::get("black").expect("default palette is registered")
    }

    fn materialize((name, _, hex): &CatalogEntry) -> Palette {
        let colors = [
            Color::from_hex(hex[0]).expect("catalog colors are valid hex"),
            Color::from_hex(hex[1]).expect("catalog colors are valid hex"),
            Color::from_hex(hex[2]).expect("catalog colors are valid hex"),
        ];
        Palette {
            name: name.to_string(),
            colors,
        }
    }
}
