//! Typed glyph metadata documents for distance-field font atlases.

mod document;
mod error;
mod types;

pub use document::{
    CommonBlock, DistanceField, GlyphDocument, GlyphRecord, InfoBlock, Kerning, StyleIndex,
};
pub use error::{DocError, Result};
pub use types::{FieldType, FontMetrics};
