//! Common types and utilities shared across all topo-blocks crates.

pub mod bbox;
pub mod color;
pub mod config;
pub mod error;
pub mod palette;

pub use bbox::BoundingBox;
pub use color::Color;
pub use config::{Background, PaletteChoice, RenderOptions, TextSize};
pub use error::{DesignError, DesignResult};
pub use palette::{Palette, PaletteCatalog, PaletteGroup};
