//! Tests for the palette catalog and custom palette validation.

use blocks_common::color::Color;
use blocks_common::error::DesignError;
use blocks_common::palette::{Palette, PaletteCatalog, PaletteGroup};

// ============================================================================
// Catalog lookups
// ============================================================================

#[test]
fn test_every_catalog_name_resolves() {
    for name in PaletteCatalog::names() {
        let palette = PaletteCatalog::get(name).unwrap();
        assert_eq!(palette.name, name);
    }
}

#[test]
fn test_catalog_order_is_stable() {
    let first: Vec<String> = PaletteCatalog::all().into_iter().map(|p| p.name).collect();
    let second: Vec<String> = PaletteCatalog::all().into_iter().map(|p| p.name).collect();
    assert_eq!(first, second);
    assert_eq!(first[0], "black");
}

#[test]
fn test_unknown_palette() {
    let err = PaletteCatalog::get("vaporwave").unwrap_err();
    assert!(matches!(err, DesignError::UnknownPalette(_)));
    assert_eq!(err.kind(), "unknown_palette");
}

#[test]
fn test_default_palette() {
    let palette = PaletteCatalog::default_palette();
    assert_eq!(palette.name, "black");
    assert_eq!(palette.colors[0], Color::from_hex("#1A1A1A").unwrap());
}

#[test]
fn test_groups_cover_catalog() {
    let mut mono = 0;
    let mut earth = 0;
    for name in PaletteCatalog::names() {
        match PaletteCatalog::group(name).unwrap() {
            PaletteGroup::Monochrome => mono += 1,
            PaletteGroup::Earth => earth += 1,
            _ => {}
        }
    }
    assert_eq!(mono, 4);
    assert_eq!(earth, 4);
}

// ============================================================================
// Custom palettes
// ============================================================================

#[test]
fn test_custom_palette_ok() {
    let palette = Palette::custom("test", &["#111111", "#222222", "#333333"]).unwrap();
    assert_eq!(palette.colors[2], Color::from_hex("#333333").unwrap());
}

#[test]
fn test_custom_palette_wrong_arity() {
    for specs in [vec![], vec!["#111111"], vec!["#111111", "#222222"]] {
        let err = Palette::custom("test", &specs).unwrap_err();
        assert!(matches!(err, DesignError::InvalidPalette(_)));
    }
    let four = ["#111111", "#222222", "#333333", "#444444"];
    assert!(Palette::custom("test", &four).is_err());
}

#[test]
fn test_custom_palette_bad_color() {
    let err = Palette::custom("test", &["#111111", "notacolor", "#333333"]).unwrap_err();
    assert!(matches!(err, DesignError::InvalidPalette(_)));
}

#[test]
fn test_custom_palette_named_colors() {
    let palette = Palette::custom("test", &["black", "white", "navy"]).unwrap();
    assert_eq!(palette.colors[1], Color::WHITE);
}
