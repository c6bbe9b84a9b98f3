//! Small value types shared by documents and the pipeline.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::DocError;

/// Distance-field generation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Multi-channel signed distance field.
    Msdf,
    /// Single-channel signed distance field.
    #[serde(alias = "sdf")]
    Ssdf,
}

impl FieldType {
    pub const ALL: [FieldType; 2] = [FieldType::Msdf, FieldType::Ssdf];

    pub const fn as_str(self) -> &'static str {
        match self {
            FieldType::Msdf => "msdf",
            FieldType::Ssdf => "ssdf",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = DocError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "msdf" => Ok(FieldType::Msdf),
            "ssdf" | "sdf" => Ok(FieldType::Ssdf),
            _ => Err(DocError::UnknownFieldType(s.to_string())),
        }
    }
}

/// Vertical typographic metrics of a font, in font units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontMetrics {
    pub ascender: i32,
    pub descender: i32,
    pub line_gap: i32,
    pub units_per_em: u32,
}

impl FontMetrics {
    pub const fn new(ascender: i32, descender: i32, line_gap: i32, units_per_em: u32) -> Self {
        Self { ascender, descender, line_gap, units_per_em }
    }
}
