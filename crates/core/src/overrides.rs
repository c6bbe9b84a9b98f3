//! Per-font rasterization overrides.

use std::{collections::HashMap, path::Path};

use anyhow::Result;
use serde::Deserialize;
use sdfont_glyph_doc::FieldType;

use crate::{
    config::{DEFAULT_DISTANCE_RANGE, DEFAULT_FONT_SIZE, Mode},
    io::read_json,
};

/// Overrides for one field type of one font or family.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldOverride {
    pub font_size: Option<u32>,
    pub distance_range: Option<u32>,
    pub texture_size: Option<[u32; 2]>,
    pub texture_width: Option<u32>,
    pub texture_height: Option<u32>,
}

/// Resolved rasterization settings for one job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterSettings {
    pub font_size: u32,
    pub distance_range: u32,
    pub texture_size: [u32; 2],
}

impl RasterSettings {
    pub const fn defaults(mode: Mode) -> Self {
        Self {
            font_size: DEFAULT_FONT_SIZE,
            distance_range: DEFAULT_DISTANCE_RANGE,
            texture_size: mode.default_texture_size(),
        }
    }
}

/// `{ "<font base or family>": { "<field type>": FieldOverride } }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Overrides(HashMap<String, HashMap<String, FieldOverride>>);

impl Overrides {
    pub fn load(path: &Path) -> Result<Self> {
        read_json(path)
    }

    /// Load `path` if given, otherwise no overrides.
    pub fn load_optional(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    fn entry(&self, key: &str, field: FieldType) -> Option<&FieldOverride> {
        let fields = self.0.get(key)?;
        fields.get(field.as_str()).or_else(|| match field {
            FieldType::Ssdf => fields.get("sdf"),
            FieldType::Msdf => None,
        })
    }

    /// Settings for a font, looked up by base name first, then family name.
    ///
    /// Keys missing from the matching entry fall back to the defaults.
    pub fn settings(
        &self,
        base_name: &str,
        family: Option<&str>,
        field: FieldType,
        mode: Mode,
    ) -> RasterSettings {
        let defaults = RasterSettings::defaults(mode);
        let Some(entry) = self
            .entry(base_name, field)
            .or_else(|| family.and_then(|family| self.entry(family, field)))
        else {
            return defaults;
        };

        let texture_size = entry.texture_size.unwrap_or([
            entry.texture_width.unwrap_or(defaults.texture_size[0]),
            entry.texture_height.unwrap_or(defaults.texture_size[1]),
        ]);

        RasterSettings {
            font_size: entry.font_size.unwrap_or(defaults.font_size),
            distance_range: entry.distance_range.unwrap_or(defaults.distance_range),
            texture_size,
        }
    }
}
