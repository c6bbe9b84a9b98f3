//! Family atlases: every style of a type family in one paginated atlas.
//!
//! Each style is rasterized on its own (possibly onto several pages). Once
//! every style has finished, the pages get contiguous family-wide numbers,
//! are renamed into family page files, and a single glyph document indexes
//! which pages belong to which style. Page 0 is always the Regular style
//! when the family has one.

use std::{
    cmp::Ordering,
    collections::BTreeMap,
    fs::rename,
    path::PathBuf,
};

use anyhow::{Context, Result};
use log::{error, info, warn};
use sdfont_glyph_doc::{FieldType, GlyphDocument, GlyphRecord, StyleIndex};

use crate::{
    config::{GeneratorConfig, Resources},
    introspect::{FontInspector, identify},
    io::{base_name, read_document, remove_files, save_png, write_document},
    metrics::adjust_family,
    parallel::run_tasks,
    raster::{RasterOptions, Rasterizer},
};

/// One font file of a family, before rasterization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleSource {
    pub label: String,
    pub font_path: PathBuf,
}

/// A style's slot in the family atlas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleEntry {
    pub label: String,
    pub font_path: PathBuf,
    pub start_page: u32,
    pub page_count: u32,
}

impl StyleEntry {
    pub fn page_range(&self) -> String {
        page_range_label(self.start_page, self.page_count)
    }
}

/// Everything written for one family and field type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontFamilyDescriptor {
    pub family: String,
    pub field_type: FieldType,
    pub styles: Vec<StyleEntry>,
    pub document_path: PathBuf,
    pub page_paths: Vec<PathBuf>,
    pub metrics_paths: Vec<PathBuf>,
}

/// Regular first (case-insensitive), everything else alphabetical.
pub fn style_order(a: &str, b: &str) -> Ordering {
    let regular = |s: &str| s.eq_ignore_ascii_case("regular");
    match (regular(a), regular(b)) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b)),
    }
}

pub fn order_styles(styles: &mut [StyleSource]) {
    styles.sort_by(|a, b| style_order(&a.label, &b.label));
}

/// Group font files by family, with each family's styles already ordered.
pub fn group_by_family(
    fonts: &[PathBuf],
    inspector: &dyn FontInspector,
) -> BTreeMap<String, Vec<StyleSource>> {
    let mut families: BTreeMap<String, Vec<StyleSource>> = BTreeMap::new();
    for font in fonts {
        let identity = identify(inspector, font);
        families
            .entry(identity.family)
            .or_default()
            .push(StyleSource { label: identity.style, font_path: font.clone() });
    }
    for styles in families.values_mut() {
        order_styles(styles);
    }
    families
}

/// Contiguous `(start, count)` page ranges for styles with the given page counts.
pub fn assign_page_ranges(page_counts: &[usize]) -> Vec<(u32, u32)> {
    let mut next = 0u32;
    page_counts
        .iter()
        .map(|&count| {
            let start = next;
            next += count as u32;
            (start, count as u32)
        })
        .collect()
}

/// `"3"` for one page starting at 3, `"3-5"` for three.
pub fn page_range_label(start: u32, count: u32) -> String {
    if count <= 1 {
        start.to_string()
    } else {
        format!("{start}-{}", start + count - 1)
    }
}

/// File stem for family outputs: the family name without spaces.
pub fn family_stem(family: &str) -> String {
    family.replace(' ', "")
}

/// Rasterizer output parked on disk until every style of the family is done.
#[derive(Debug)]
struct StagedStyle {
    source: StyleSource,
    document_path: PathBuf,
    page_paths: Vec<PathBuf>,
}

fn stage_style(
    config: &GeneratorConfig,
    resources: &Resources,
    rasterizer: &dyn Rasterizer,
    family: &str,
    slot: usize,
    source: StyleSource,
    field_type: FieldType,
) -> Result<StagedStyle> {
    let name = base_name(&source.font_path);
    let settings = resources.overrides.settings(&name, Some(family), field_type, config.mode);
    let options = RasterOptions::new(config, field_type, settings, resources.charset.clone());

    let output = rasterizer.rasterize(&source.font_path, &options).with_context(|| {
        format!("Failed to rasterize {family} {} ({field_type})", source.label)
    })?;

    // The slot keeps stems unique when two files resolve to the same style.
    let stem = format!(
        "{}-{}.{slot}.{field_type}",
        family_stem(family),
        source.label.replace(' ', "")
    );
    let staging = config.staging_dir();
    let document_path = staging.join(format!("{stem}.json"));

    let mut pages = output.pages;
    pages.sort_by_key(|page| page.index);
    let mut style = StagedStyle { source, document_path, page_paths: Vec::new() };
    let written = pages.iter().try_for_each(|page| -> Result<()> {
        let path = staging.join(format!("{stem}.{}.png", page.index));
        save_png(&path, &page.image)?;
        style.page_paths.push(path);
        Ok(())
    });
    if let Err(e) = written.and_then(|()| write_document(&style.document_path, &output.document))
    {
        if let Err(cleanup) = discard(std::slice::from_ref(&style)) {
            warn!("{family} {}: {cleanup:#}", style.source.label);
        }
        return Err(e);
    }

    info!("{family} {}: {} page(s) staged", style.source.label, style.page_paths.len());
    Ok(style)
}

fn discard(staged: &[StagedStyle]) -> Result<usize> {
    remove_files(staged.iter().flat_map(|s| s.page_paths.iter().chain([&s.document_path])))
}

fn rebase(glyphs: &[GlyphRecord], start_page: u32) -> Vec<GlyphRecord> {
    glyphs
        .iter()
        .cloned()
        .map(|mut glyph| {
            glyph.page += start_page;
            glyph
        })
        .collect()
}

/// Build the family atlas for one field type.
///
/// Returns `Ok(None)` when the family has no styles or the template
/// document (style 0) cannot be read. A failing style rasterization is an
/// error for the whole family. Staged files never outlive the call, and
/// family pages are only left behind together with their document.
pub fn aggregate_family(
    config: &GeneratorConfig,
    resources: &Resources,
    rasterizer: &dyn Rasterizer,
    inspector: &dyn FontInspector,
    family: &str,
    styles: &[StyleSource],
    field_type: FieldType,
) -> Result<Option<FontFamilyDescriptor>> {
    if styles.is_empty() {
        warn!("{family}: no styles found, skipping");
        return Ok(None);
    }

    let tasks: Vec<(usize, StyleSource)> = styles.iter().cloned().enumerate().collect();
    let outcomes = run_tasks(config.jobs, tasks, |(slot, source)| {
        stage_style(config, resources, rasterizer, family, slot, source, field_type)
    })?;
    let mut staged = Vec::with_capacity(outcomes.len());
    let mut failure = None;
    for outcome in outcomes {
        match outcome {
            Ok(style) => staged.push(style),
            Err(e) if failure.is_none() => failure = Some(e),
            Err(e) => error!("{e:#}"),
        }
    }
    if let Some(e) = failure {
        if let Err(cleanup) = discard(&staged) {
            warn!("{family}: {cleanup:#}");
        }
        return Err(e);
    }

    let mut published = Vec::new();
    let outcome = publish(config, inspector, family, field_type, &staged, &mut published);
    if let Err(e) = discard(&staged) {
        warn!("{family}: {e:#}");
    }
    match outcome {
        Ok(Some(descriptor)) => Ok(Some(descriptor)),
        other => {
            if let Err(e) = remove_files(&published) {
                warn!("{family}: {e:#}");
            }
            other
        }
    }
}

/// Move staged pages into place and write the family document.
///
/// Every family page moved into the destination is pushed to `published`
/// so the caller can take it back if this does not finish.
fn publish(
    config: &GeneratorConfig,
    inspector: &dyn FontInspector,
    family: &str,
    field_type: FieldType,
    staged: &[StagedStyle],
    published: &mut Vec<PathBuf>,
) -> Result<Option<FontFamilyDescriptor>> {
    let Some(first) = staged.first() else {
        return Ok(None);
    };
    let template = match read_document(&first.document_path) {
        Ok(doc) => doc,
        Err(e) => {
            error!("{family} ({field_type}): cannot read template document: {e:#}");
            return Ok(None);
        }
    };
    let style_docs: Vec<Option<GlyphDocument>> = staged
        .iter()
        .enumerate()
        .map(|(slot, style)| {
            if slot == 0 {
                return Some(template.clone());
            }
            read_document(&style.document_path)
                .inspect_err(|e| {
                    warn!("{family} {}: {e:#}; style index will have no glyphs", style.source.label)
                })
                .ok()
        })
        .collect();

    let page_counts: Vec<usize> = staged.iter().map(|s| s.page_paths.len()).collect();
    let entries: Vec<StyleEntry> = staged
        .iter()
        .zip(assign_page_ranges(&page_counts))
        .map(|(style, (start_page, page_count))| StyleEntry {
            label: style.source.label.clone(),
            font_path: style.source.font_path.clone(),
            start_page,
            page_count,
        })
        .collect();

    let stem = format!("{}.{field_type}", family_stem(family));
    let mut page_names = Vec::new();
    for (style, entry) in staged.iter().zip(&entries) {
        for (offset, staged_page) in style.page_paths.iter().enumerate() {
            let name = format!("{stem}.{}.png", entry.start_page as usize + offset);
            let path = config.dest_dir.join(&name);
            rename(staged_page, &path).with_context(|| {
                format!("Failed to move {} to {}", staged_page.display(), path.display())
            })?;
            page_names.push(name);
            published.push(path);
        }
    }

    let mut doc = build_family_document(family, template, style_docs, &entries, page_names);
    let metrics_paths =
        adjust_family(&mut doc, inspector, family, &entries, &config.metrics_dir())?;

    let document_path = config.dest_dir.join(format!("{stem}.json"));
    write_document(&document_path, &doc)?;

    println!(
        "  {family} ({field_type}): {} style(s), {} page(s) -> {}",
        entries.len(),
        published.len(),
        document_path.display()
    );

    Ok(Some(FontFamilyDescriptor {
        family: family.to_string(),
        field_type,
        styles: entries,
        document_path,
        page_paths: published.clone(),
        metrics_paths,
    }))
}

/// Relabel style 0's document into the family document with a `styles` index.
///
/// Each style keeps its own glyph table, kernings, common block and distance
/// field, rebased onto its family page range.
fn build_family_document(
    family: &str,
    mut template: GlyphDocument,
    style_docs: Vec<Option<GlyphDocument>>,
    entries: &[StyleEntry],
    page_names: Vec<String>,
) -> GlyphDocument {
    template.styles = style_docs
        .into_iter()
        .zip(entries)
        .map(|(style_doc, entry)| {
            let (common, distance_field, chars, kernings) = match style_doc {
                Some(d) => (
                    Some(d.common),
                    d.distance_field,
                    rebase(&d.chars, entry.start_page),
                    d.kernings,
                ),
                None => (None, None, Vec::new(), Vec::new()),
            };
            StyleIndex {
                style: entry.label.clone(),
                start_page: entry.start_page,
                page_count: entry.page_count,
                page_range: entry.page_range(),
                common,
                distance_field,
                chars,
                kernings,
            }
        })
        .collect();

    let (width, height) = (template.common.scale_w, template.common.scale_h);
    template.info.face = family.to_string();
    template.chars = rebase(&template.chars, entries.first().map_or(0, |e| e.start_page));
    template.set_pages(page_names, width, height);
    template
}

/// Outcome of [`aggregate_family`] for each family and field type.
pub fn aggregate_families(
    config: &GeneratorConfig,
    resources: &Resources,
    rasterizer: &dyn Rasterizer,
    inspector: &dyn FontInspector,
    families: &BTreeMap<String, Vec<StyleSource>>,
    field_type: FieldType,
) -> Vec<(String, Result<Option<FontFamilyDescriptor>>)> {
    families
        .iter()
        .map(|(family, styles)| {
            let labels: Vec<&str> = styles.iter().map(|s| s.label.as_str()).collect();
            info!("{family} ({field_type}): {}", labels.join(", "));
            let outcome = aggregate_family(
                config, resources, rasterizer, inspector, family, styles, field_type,
            );
            (family.clone(), outcome)
        })
        .collect()
}
