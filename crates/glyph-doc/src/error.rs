use std::result;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocError {
    #[error("failed to parse glyph document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("page count mismatch: common.pages is {declared}, page list has {listed} entries")]
    PageCountMismatch { declared: u32, listed: usize },

    #[error("unknown field type '{0}' (expected msdf or ssdf)")]
    UnknownFieldType(String),
}

pub type Result<T> = result::Result<T, DocError>;
