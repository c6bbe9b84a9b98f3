//! Font introspection seam and family/style naming.

use std::path::Path;

use anyhow::Result;
use log::warn;
use sdfont_font_info::inspect_file;

pub use sdfont_font_info::FontInfo;

use crate::io::base_name;

/// Family name used when neither the font nor its file name yields one.
pub const UNKNOWN_FAMILY: &str = "Unknown";

/// Style name used when neither the font nor its file name yields one.
pub const DEFAULT_STYLE: &str = "Regular";

/// Reads names and metrics out of a font file.
pub trait FontInspector: Sync {
    fn inspect(&self, font: &Path) -> Result<FontInfo>;
}

/// Inspector backed by `read-fonts`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadFontsInspector;

impl FontInspector for ReadFontsInspector {
    fn inspect(&self, font: &Path) -> Result<FontInfo> {
        inspect_file(font)
    }
}

/// Family and style label for a font file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontIdentity {
    pub family: String,
    pub style: String,
}

/// Identify a font, falling back to its file name when introspection fails.
///
/// `Ubuntu-BoldItalic.ttf` falls back to family `Ubuntu`, style `BoldItalic`.
pub fn identify(inspector: &dyn FontInspector, font: &Path) -> FontIdentity {
    let info = match inspector.inspect(font) {
        Ok(info) => info,
        Err(e) => {
            warn!("{}: {e:#}; using file name for family/style", font.display());
            FontInfo::default()
        }
    };
    let (file_family, file_style) = split_file_name(&base_name(font));
    FontIdentity {
        family: info.family.unwrap_or(file_family),
        style: info.style.unwrap_or(file_style),
    }
}

fn split_file_name(stem: &str) -> (String, String) {
    let mut parts = stem.splitn(2, ['-', '_']);
    let family = parts.next().map(str::trim).filter(|s| !s.is_empty()).unwrap_or(UNKNOWN_FAMILY);
    let style = parts.next().map(str::trim).filter(|s| !s.is_empty()).unwrap_or(DEFAULT_STYLE);
    (family.to_string(), style.to_string())
}
