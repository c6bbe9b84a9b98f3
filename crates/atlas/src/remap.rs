//! Rewriting glyph rectangles after pages have been merged.

use log::warn;
use sdfont_glyph_doc::{GlyphDocument, GlyphRecord};

use crate::LayoutPlan;

/// Outcome of a remap pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemapReport {
    pub remapped: usize,
    /// Glyph ids whose page had no placement; they were moved to page 0 as-is.
    pub unplaced: Vec<u32>,
}

impl RemapReport {
    pub fn is_clean(&self) -> bool {
        self.unplaced.is_empty()
    }
}

/// Translate each glyph by its page's placement and move it to `target_page`.
///
/// A glyph whose page has no placement keeps its coordinates and is forced
/// onto `target_page`; it is logged and listed in the report.
pub fn remap_glyphs(
    glyphs: &mut [GlyphRecord],
    plan: &LayoutPlan,
    target_page: u32,
) -> RemapReport {
    let mut report = RemapReport::default();
    for glyph in glyphs {
        match plan.placement(glyph.page as usize) {
            Some(placement) => {
                glyph.x += placement.x;
                glyph.y += placement.y;
                report.remapped += 1;
            }
            None => {
                warn!(
                    "glyph {} references page {} which has no placement; leaving coordinates as-is",
                    glyph.id, glyph.page
                );
                report.unplaced.push(glyph.id);
            }
        }
        glyph.page = target_page;
    }
    report
}

/// Remap a whole document onto a single merged page named `page_name`.
pub fn remap_document(doc: &mut GlyphDocument, plan: &LayoutPlan, page_name: &str) -> RemapReport {
    let report = remap_glyphs(&mut doc.chars, plan, 0);
    doc.set_pages(vec![page_name.to_string()], plan.width, plan.height);
    if !report.is_clean() {
        warn!(
            "{}: {} glyph(s) could not be placed on the merged atlas",
            doc.info.face,
            report.unplaced.len()
        );
    }
    report
}
