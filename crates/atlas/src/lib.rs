//! Merging multi-page distance-field output into a single atlas.
//!
//! The three steps are independent and deterministic:
//!
//! 1. [`plan`] decides the canvas size and where each page goes,
//! 2. [`compose`] draws the pages onto that canvas,
//! 3. [`remap_document`] moves every glyph rectangle onto the merged page.

mod compose;
mod error;
mod plan;
mod remap;

pub use compose::{RasterPage, compose, page_sizes};
pub use error::{AtlasError, Result};
pub use plan::{GUTTER, LayoutPlan, LayoutStrategy, PageSize, Placement, plan, plan_with};
pub use remap::{RemapReport, remap_document, remap_glyphs};

/// Merge `pages` into one image and rewrite `doc` to reference it.
///
/// Returns the merged image and the remap report. The document's page list
/// becomes the single entry `page_name`.
pub fn merge_pages(
    pages: Vec<RasterPage>,
    doc: &mut sdfont_glyph_doc::GlyphDocument,
    strategy: LayoutStrategy,
    page_name: &str,
) -> Result<(image::RgbaImage, RemapReport)> {
    let plan = plan_with(&page_sizes(&pages), strategy);
    let image = compose(pages, &plan)?;
    let report = remap_document(doc, &plan, page_name);
    Ok((image, report))
}
