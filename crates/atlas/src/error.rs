use std::result;

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AtlasError {
    #[error(
        "page {index} is {actual_width}x{actual_height}, \
         plan expects {expected_width}x{expected_height}"
    )]
    DimensionMismatch {
        index: usize,
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    #[error("plan has a placement for page {0} but no such page was supplied")]
    MissingPage(usize),

    #[error("page {0} has no placement in the plan")]
    UnplacedPage(usize),

    #[error("placement {index} overlaps placement {other}")]
    Overlap { index: usize, other: usize },

    #[error("placement {index} exceeds the {width}x{height} canvas")]
    OutOfBounds { index: usize, width: u32, height: u32 },
}

pub type Result<T> = result::Result<T, AtlasError>;
