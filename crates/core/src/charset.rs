//! Charset configuration and the static preset table.

use std::{collections::HashSet, path::Path};

use anyhow::Result;
use log::{info, warn};
use serde::Deserialize;

use crate::io::read_json;

/// Contents of a charset config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CharsetConfig {
    pub charset: String,
    pub presets: Vec<String>,
}

/// Named code point ranges that can be appended to a charset.
const PRESETS: &[(&str, &[(u32, u32)])] = &[
    ("digits", &[(0x30, 0x39)]),
    ("ascii", &[(0x20, 0x7E)]),
    ("latin1", &[(0xA0, 0xFF)]),
    ("latin-extended-a", &[(0x100, 0x17F)]),
    ("latin-extended-b", &[(0x180, 0x24F)]),
    ("greek", &[(0x386, 0x386), (0x388, 0x38A), (0x38C, 0x38C), (0x38E, 0x3A1), (0x3A3, 0x3CE)]),
    ("cyrillic", &[(0x400, 0x45F)]),
    ("punctuation", &[(0x2010, 0x2027), (0x2030, 0x205E)]),
    ("currency", &[(0x20A0, 0x20C0)]),
    ("arrows", &[(0x2190, 0x21FF)]),
    ("box-drawing", &[(0x2500, 0x257F)]),
];

/// Characters for a preset key, or `None` if the key is unknown.
pub fn preset(key: &str) -> Option<String> {
    PRESETS.iter().find(|(name, _)| *name == key).map(|(_, ranges)| {
        ranges
            .iter()
            .flat_map(|&(start, end)| (start..=end).filter_map(char::from_u32))
            .collect()
    })
}

/// Names of every known preset.
pub fn preset_names() -> impl Iterator<Item = &'static str> {
    PRESETS.iter().map(|(name, _)| *name)
}

impl CharsetConfig {
    pub fn load(path: &Path) -> Result<Self> {
        read_json(path)
    }

    /// The charset with every resolvable preset appended.
    ///
    /// Unknown presets are skipped with a warning. Duplicates are dropped,
    /// keeping the first occurrence.
    pub fn resolve(&self) -> String {
        let mut seen = HashSet::new();
        let mut out = String::new();
        let mut push_all = |text: &str| {
            for ch in text.chars() {
                if seen.insert(ch) {
                    out.push(ch);
                }
            }
        };

        push_all(&self.charset);
        for key in &self.presets {
            match preset(key) {
                Some(chars) => push_all(&chars),
                None => warn!(
                    "Unknown charset preset '{key}' (known: {})",
                    preset_names().collect::<Vec<_>>().join(", ")
                ),
            }
        }
        out
    }
}

/// Load and resolve a charset file; `None` means the rasterizer's default.
pub fn resolve_charset(path: Option<&Path>) -> Result<Option<String>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let charset = CharsetConfig::load(path)?.resolve();
    info!("Charset: {} characters from {}", charset.chars().count(), path.display());
    Ok((!charset.is_empty()).then_some(charset))
}
