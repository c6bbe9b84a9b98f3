//! Canvas layout for merging several raster pages into one atlas.

use std::{fmt, str::FromStr};

use crate::{AtlasError, Result};

/// Pixels left empty between adjacent pages so samplers don't bleed across.
pub const GUTTER: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageSize {
    pub width: u32,
    pub height: u32,
}

impl PageSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    const fn area(self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Where one input page lands on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placement {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Placement {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub const fn size(&self) -> PageSize {
        PageSize::new(self.width, self.height)
    }

    pub const fn right(&self) -> u32 {
        self.x + self.width
    }

    pub const fn bottom(&self) -> u32 {
        self.y + self.height
    }

    fn overlaps(&self, other: &Placement) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Canvas dimensions plus one placement per input page, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutPlan {
    pub width: u32,
    pub height: u32,
    pub placements: Vec<Placement>,
}

impl LayoutPlan {
    pub fn placement(&self, page: usize) -> Option<&Placement> {
        self.placements.get(page)
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// True for a single page placed at the origin of a canvas its own size.
    #[cfg(test)]
    pub(crate) fn is_identity(&self) -> bool {
        matches!(
            self.placements.as_slice(),
            [only] if only.x == 0
                && only.y == 0
                && only.width == self.width
                && only.height == self.height
        )
    }

    /// Verify that every placement fits the canvas and no two overlap.
    pub fn check(&self) -> Result<()> {
        for (index, placement) in self.placements.iter().enumerate() {
            if placement.right() > self.width || placement.bottom() > self.height {
                return Err(AtlasError::OutOfBounds {
                    index,
                    width: self.width,
                    height: self.height,
                });
            }
            for (other, earlier) in self.placements[..index].iter().enumerate() {
                if placement.overlaps(earlier) {
                    return Err(AtlasError::Overlap { index, other });
                }
            }
        }
        Ok(())
    }
}

/// How multiple pages are arranged on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutStrategy {
    /// Side by side, left to right.
    #[default]
    Horizontal,
    /// Stacked, top to bottom.
    Vertical,
    /// Row-major grid with `ceil(sqrt(n))` columns.
    Grid,
}

impl LayoutStrategy {
    pub const ALL: [LayoutStrategy; 3] =
        [LayoutStrategy::Horizontal, LayoutStrategy::Vertical, LayoutStrategy::Grid];

    /// Pick the strategy giving the smallest canvas; horizontal wins ties.
    pub fn auto(pages: &[PageSize]) -> Self {
        Self::ALL
            .into_iter()
            .min_by_key(|strategy| {
                let plan = plan_with(pages, *strategy);
                PageSize::new(plan.width, plan.height).area()
            })
            .unwrap_or_default()
    }
}

impl fmt::Display for LayoutStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LayoutStrategy::Horizontal => "horizontal",
            LayoutStrategy::Vertical => "vertical",
            LayoutStrategy::Grid => "grid",
        })
    }
}

impl FromStr for LayoutStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "horizontal" => Ok(LayoutStrategy::Horizontal),
            "vertical" => Ok(LayoutStrategy::Vertical),
            "grid" => Ok(LayoutStrategy::Grid),
            other => Err(format!("unknown layout strategy '{other}'")),
        }
    }
}

/// Plan a horizontal strip of `pages` separated by [`GUTTER`].
pub fn plan(pages: &[PageSize]) -> LayoutPlan {
    plan_with(pages, LayoutStrategy::Horizontal)
}

/// Plan `pages` with an explicit strategy.
///
/// A single page always yields the identity plan. Pages are only translated,
/// never scaled, so every placement has its page's exact size.
pub fn plan_with(pages: &[PageSize], strategy: LayoutStrategy) -> LayoutPlan {
    match pages {
        [] => LayoutPlan { width: 0, height: 0, placements: Vec::new() },
        [only] => LayoutPlan {
            width: only.width,
            height: only.height,
            placements: vec![Placement::new(0, 0, only.width, only.height)],
        },
        _ => match strategy {
            LayoutStrategy::Horizontal => strip(pages, true),
            LayoutStrategy::Vertical => strip(pages, false),
            LayoutStrategy::Grid => grid(pages),
        },
    }
}

fn strip(pages: &[PageSize], horizontal: bool) -> LayoutPlan {
    let mut cursor = 0;
    let mut placements = Vec::with_capacity(pages.len());
    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            cursor += GUTTER;
        }
        if horizontal {
            placements.push(Placement::new(cursor, 0, page.width, page.height));
            cursor += page.width;
        } else {
            placements.push(Placement::new(0, cursor, page.width, page.height));
            cursor += page.height;
        }
    }

    if horizontal {
        let height = pages.iter().map(|p| p.height).max().unwrap_or(0);
        LayoutPlan { width: cursor, height, placements }
    } else {
        let width = pages.iter().map(|p| p.width).max().unwrap_or(0);
        LayoutPlan { width, height: cursor, placements }
    }
}

fn grid(pages: &[PageSize]) -> LayoutPlan {
    let columns = (pages.len() as f64).sqrt().ceil() as usize;
    let rows = pages.len().div_ceil(columns);

    let mut column_widths = vec![0u32; columns];
    let mut row_heights = vec![0u32; rows];
    for (i, page) in pages.iter().enumerate() {
        let (row, column) = (i / columns, i % columns);
        column_widths[column] = column_widths[column].max(page.width);
        row_heights[row] = row_heights[row].max(page.height);
    }

    let offsets = |sizes: &[u32]| -> Vec<u32> {
        let mut acc = 0;
        sizes
            .iter()
            .map(|size| {
                let start = acc;
                acc += size + GUTTER;
                start
            })
            .collect()
    };
    let xs = offsets(&column_widths);
    let ys = offsets(&row_heights);

    let placements = pages
        .iter()
        .enumerate()
        .map(|(i, page)| Placement::new(xs[i % columns], ys[i / columns], page.width, page.height))
        .collect();

    let span = |sizes: &[u32]| sizes.iter().sum::<u32>() + GUTTER * (sizes.len() as u32 - 1);
    LayoutPlan { width: span(&column_widths), height: span(&row_heights), placements }
}
