//! Drawing raster pages onto a planned canvas.

use image::{RgbaImage, imageops};
use log::debug;

use crate::{AtlasError, LayoutPlan, PageSize, Result};

/// One bitmap page produced by the rasterizer.
#[derive(Debug, Clone)]
pub struct RasterPage {
    /// Position of this page in the rasterizer's output, starting at 0.
    pub index: usize,
    pub image: RgbaImage,
}

impl RasterPage {
    pub fn new(index: usize, image: RgbaImage) -> Self {
        Self { index, image }
    }

    pub fn size(&self) -> PageSize {
        PageSize::new(self.image.width(), self.image.height())
    }
}

/// Page sizes in page-index order, ready for planning.
pub fn page_sizes(pages: &[RasterPage]) -> Vec<PageSize> {
    let mut sorted: Vec<&RasterPage> = pages.iter().collect();
    sorted.sort_by_key(|page| page.index);
    sorted.into_iter().map(RasterPage::size).collect()
}

/// Copy every page, unscaled, to its planned offset on a transparent canvas.
///
/// Pixels are replaced rather than blended so alpha is carried over as-is.
pub fn compose(pages: Vec<RasterPage>, plan: &LayoutPlan) -> Result<RgbaImage> {
    let mut slots: Vec<Option<RasterPage>> = (0..plan.len()).map(|_| None).collect();
    for page in pages {
        match slots.get_mut(page.index) {
            Some(slot) => *slot = Some(page),
            None => return Err(AtlasError::UnplacedPage(page.index)),
        }
    }

    let mut canvas = RgbaImage::new(plan.width, plan.height);
    for (index, (slot, placement)) in slots.into_iter().zip(&plan.placements).enumerate() {
        let page = slot.ok_or(AtlasError::MissingPage(index))?;
        let actual = page.size();
        if actual != placement.size() {
            return Err(AtlasError::DimensionMismatch {
                index,
                expected_width: placement.width,
                expected_height: placement.height,
                actual_width: actual.width,
                actual_height: actual.height,
            });
        }
        debug!(
            "page {index}: {}x{} at ({}, {})",
            actual.width, actual.height, placement.x, placement.y
        );
        let (x, y) = (i64::from(placement.x), i64::from(placement.y));
        imageops::replace(&mut canvas, &page.image, x, y);
    }

    Ok(canvas)
}
