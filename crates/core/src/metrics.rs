//! Post-processing of generated glyph documents: rasterizer bias correction
//! and typographic metrics.

use std::path::{Path, PathBuf};

use anyhow::Result;
use log::{info, warn};
use sdfont_glyph_doc::{FontMetrics, GlyphDocument, GlyphRecord, StyleIndex};

use crate::{
    family::{StyleEntry, family_stem},
    introspect::FontInspector,
    io::write_json,
};

fn shift_glyphs(glyphs: &mut [GlyphRecord], pad: u32) {
    let shift = 2.0 * f64::from(pad);
    for glyph in glyphs {
        glyph.yoffset -= shift;
    }
}

fn shift_style(style: &mut StyleIndex, pad: u32) {
    if let Some(common) = &mut style.common {
        common.base -= f64::from(pad);
    }
    shift_glyphs(&mut style.chars, pad);
}

/// Undo the padding bias the rasterizer bakes into `base` and `yoffset`.
///
/// Every glyph table, per-style ones included, is shifted by the same `pad`.
/// Not guarded: applying this twice shifts the document twice. Use
/// [`correct_bias`] unless the caller tracks application itself.
pub fn shift_for_padding(doc: &mut GlyphDocument, pad: u32) {
    doc.common.base -= f64::from(pad);
    shift_glyphs(&mut doc.chars, pad);
    for style in &mut doc.styles {
        shift_style(style, pad);
    }
}

/// Apply the padding correction once, marking the document as corrected.
///
/// The top-level table uses the document's distance range; each style uses
/// its own when it recorded one. Returns `false` when the document was
/// already corrected or carries no distance range, leaving it untouched.
pub fn correct_bias(doc: &mut GlyphDocument) -> bool {
    if doc.bias_corrected {
        return false;
    }
    let Some(pad) = doc.pad() else {
        warn!("{}: no distanceField block, skipping bias correction", doc.info.face);
        return false;
    };
    doc.common.base -= f64::from(pad);
    shift_glyphs(&mut doc.chars, pad);
    for style in &mut doc.styles {
        let style_pad = style.pad().unwrap_or(pad);
        shift_style(style, style_pad);
    }
    doc.bias_corrected = true;
    true
}

/// Write a standalone metrics file `<dir>/<name>.json`.
pub fn write_metrics_file(dir: &Path, name: &str, metrics: &FontMetrics) -> Result<PathBuf> {
    let path = dir.join(format!("{name}.json"));
    write_json(&path, metrics)?;
    info!("Metrics: {}", path.display());
    Ok(path)
}

/// Correct bias and attach metrics for a single font.
///
/// Returns the metrics file path, or `None` if the font's metrics could not
/// be read (the document is still bias-corrected).
pub fn adjust_single(
    doc: &mut GlyphDocument,
    inspector: &dyn FontInspector,
    font: &Path,
    metrics_dir: &Path,
    name: &str,
) -> Result<Option<PathBuf>> {
    correct_bias(doc);

    let metrics = match inspector.inspect(font) {
        Ok(info) => info.metrics,
        Err(e) => {
            warn!("{}: {e:#}", font.display());
            None
        }
    };
    let Some(metrics) = metrics else {
        warn!("{}: no typographic metrics, skipping metrics embedding", font.display());
        return Ok(None);
    };

    doc.lightning_metrics = Some(metrics);
    write_metrics_file(metrics_dir, name, &metrics).map(Some)
}

/// How a family's metrics are persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation {
    /// Every readable style agrees.
    Shared(FontMetrics),
    /// Styles disagree; one entry per readable style, in style order.
    PerStyle(Vec<(String, FontMetrics)>),
}

/// Decide between one shared metrics set and per-style sets.
///
/// Styles whose metrics could not be read are left out. Returns `None` when
/// no style has metrics.
pub fn reconcile(styles: &[(String, Option<FontMetrics>)]) -> Option<Reconciliation> {
    let readable: Vec<(String, FontMetrics)> = styles
        .iter()
        .filter_map(|(label, metrics)| metrics.map(|m| (label.clone(), m)))
        .collect();
    let (_, first) = readable.first()?;
    if readable.iter().all(|(_, m)| m == first) {
        Some(Reconciliation::Shared(*first))
    } else {
        Some(Reconciliation::PerStyle(readable))
    }
}

/// Correct bias, embed the reference style's metrics, and write metrics
/// files for a family document.
///
/// The reference is the first style. Files are named after the family
/// without spaces. Returns the metrics files written.
pub fn adjust_family(
    doc: &mut GlyphDocument,
    inspector: &dyn FontInspector,
    family: &str,
    styles: &[StyleEntry],
    metrics_dir: &Path,
) -> Result<Vec<PathBuf>> {
    correct_bias(doc);

    let per_style: Vec<(String, Option<FontMetrics>)> = styles
        .iter()
        .map(|style| {
            let metrics = match inspector.inspect(&style.font_path) {
                Ok(info) => info.metrics,
                Err(e) => {
                    warn!("{}: {e:#}", style.font_path.display());
                    None
                }
            };
            if metrics.is_none() {
                warn!("{family} {}: no typographic metrics", style.label);
            }
            (style.label.clone(), metrics)
        })
        .collect();

    match per_style.first().and_then(|(_, metrics)| *metrics) {
        Some(reference) => doc.lightning_metrics = Some(reference),
        None => warn!("{family}: reference style has no metrics, skipping metrics embedding"),
    }

    let stem = family_stem(family);
    let mut written = Vec::new();
    match reconcile(&per_style) {
        Some(Reconciliation::Shared(metrics)) => {
            written.push(write_metrics_file(metrics_dir, &stem, &metrics)?);
        }
        Some(Reconciliation::PerStyle(entries)) => {
            info!("{family}: styles disagree on metrics, writing one file per style");
            for (label, metrics) in entries {
                let name = format!("{stem}-{}", label.replace(' ', ""));
                written.push(write_metrics_file(metrics_dir, &name, &metrics)?);
            }
        }
        None => warn!("{family}: no style has readable metrics"),
    }
    Ok(written)
}
