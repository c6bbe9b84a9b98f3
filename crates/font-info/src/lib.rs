//! Font introspection: family/style names and vertical metrics.

use std::{fs::read, path::Path};

use anyhow::{Context, Result};
use read_fonts::{FontRef, TableProvider, tables::name::Name};
use sdfont_glyph_doc::FontMetrics;

/// Name table IDs.
const NAME_ID_FAMILY: u16 = 1;
const NAME_ID_SUBFAMILY: u16 = 2;
const NAME_ID_FULL_NAME: u16 = 4;
const NAME_ID_TYPOGRAPHIC_FAMILY: u16 = 16;
const NAME_ID_TYPOGRAPHIC_SUBFAMILY: u16 = 17;

const PLATFORM_UNICODE: u16 = 0;
const PLATFORM_WINDOWS: u16 = 3;
const LANGUAGE_EN_US: u16 = 0x409;

/// What a font file says about itself.
///
/// Every field is optional: a font missing a table still yields the rest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontInfo {
    pub family: Option<String>,
    pub style: Option<String>,
    pub full_name: Option<String>,
    pub metrics: Option<FontMetrics>,
}

/// Inspect raw font data.
pub fn inspect(data: &[u8]) -> Result<FontInfo> {
    let font = FontRef::new(data).context("Failed to parse font")?;
    let names = font.name().ok();
    let lookup = |ids: &[u16]| names.as_ref().and_then(|name| first_name(name, ids));

    Ok(FontInfo {
        family: lookup(&[NAME_ID_TYPOGRAPHIC_FAMILY, NAME_ID_FAMILY]),
        style: lookup(&[NAME_ID_TYPOGRAPHIC_SUBFAMILY, NAME_ID_SUBFAMILY]),
        full_name: lookup(&[NAME_ID_FULL_NAME]),
        metrics: vertical_metrics(&font),
    })
}

/// Inspect a font file on disk.
pub fn inspect_file(path: &Path) -> Result<FontInfo> {
    let data = read(path).with_context(|| format!("Failed to read font: {}", path.display()))?;
    inspect(&data).with_context(|| format!("Failed to inspect font: {}", path.display()))
}

/// First non-empty string among `ids`, in order of preference.
fn first_name(name: &Name, ids: &[u16]) -> Option<String> {
    ids.iter().find_map(|&id| name_string(name, id))
}

/// Prefer Windows English, then Unicode platform, then whatever decodes.
fn name_string(name: &Name, id: u16) -> Option<String> {
    let mut candidates: Vec<(u8, String)> = name
        .name_record()
        .iter()
        .filter(|record| record.name_id().to_u16() == id)
        .filter_map(|record| {
            let text: String = record.string(name.string_data()).ok()?.chars().collect();
            let text = text.trim().to_string();
            if text.is_empty() {
                return None;
            }
            let rank = match (record.platform_id(), record.language_id()) {
                (PLATFORM_WINDOWS, LANGUAGE_EN_US) => 0,
                (PLATFORM_UNICODE, _) => 1,
                (PLATFORM_WINDOWS, _) => 2,
                _ => 3,
            };
            Some((rank, text))
        })
        .collect();
    candidates.sort_by_key(|(rank, _)| *rank);
    candidates.into_iter().next().map(|(_, text)| text)
}

/// Typographic ascender/descender/line gap from OS/2, or hhea if OS/2 is absent.
fn vertical_metrics(font: &FontRef) -> Option<FontMetrics> {
    let units_per_em = u32::from(font.head().ok()?.units_per_em());

    if let Ok(os2) = font.os2() {
        return Some(FontMetrics::new(
            i32::from(os2.s_typo_ascender()),
            i32::from(os2.s_typo_descender()),
            i32::from(os2.s_typo_line_gap()),
            units_per_em,
        ));
    }

    let hhea = font.hhea().ok()?;
    Some(FontMetrics::new(
        i32::from(hhea.ascender().to_i16()),
        i32::from(hhea.descender().to_i16()),
        i32::from(hhea.line_gap().to_i16()),
        units_per_em,
    ))
}
