//! sdfont core - build pipeline for SDF/MSDF font atlases.
//!
//! Fonts go through an external rasterizer, their pages are merged into one
//! atlas (or paginated per family), glyph coordinates are remapped, and the
//! glyph documents get bias-corrected and carry the font's typographic
//! metrics.

pub mod charset;
pub mod config;
pub mod family;
pub mod introspect;
pub mod io;
pub mod metrics;
pub mod overrides;
pub mod parallel;
pub mod pipeline;
pub mod raster;
pub mod single;

pub use config::{GeneratorConfig, LayoutChoice, Mode, Resources};
pub use family::{FontFamilyDescriptor, StyleEntry, StyleSource, aggregate_family, group_by_family};
pub use introspect::{FontInspector, ReadFontsInspector};
pub use metrics::{correct_bias, shift_for_padding};
pub use parallel::BatchResult;
pub use pipeline::{PipelineContext, clean, generate, generate_families, generate_individual};
pub use raster::{MsdfBmfont, RasterOptions, RasterOutput, Rasterizer};
pub use single::{FontOutput, generate_font};
