//! One font in, one merged atlas plus glyph document out.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{error, info, warn};
use sdfont_atlas::{RemapReport, merge_pages, page_sizes};
use sdfont_glyph_doc::FieldType;

use crate::{
    config::{GeneratorConfig, Resources},
    introspect::FontInspector,
    io::{base_name, save_png, write_document},
    metrics::adjust_single,
    raster::{RasterOptions, Rasterizer},
};

/// Files produced for one font and field type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontOutput {
    pub name: String,
    pub field_type: FieldType,
    /// `None` when the rasterizer produced no pages.
    pub image_path: Option<PathBuf>,
    pub document_path: PathBuf,
    pub metrics_path: Option<PathBuf>,
    pub remap: RemapReport,
}

/// Output stem for a font and field type, e.g. `Ubuntu-Regular.msdf`.
pub fn output_stem(name: &str, field_type: FieldType) -> String {
    format!("{name}.{field_type}")
}

/// Generate the merged atlas, glyph document and metrics file for one font.
///
/// A missing source font is a configuration error: it is logged and yields
/// `Ok(None)`. Rasterization and I/O failures are returned as errors.
pub fn generate_font(
    config: &GeneratorConfig,
    resources: &Resources,
    rasterizer: &dyn Rasterizer,
    inspector: &dyn FontInspector,
    font: &Path,
    field_type: FieldType,
) -> Result<Option<FontOutput>> {
    if !font.is_file() {
        error!("Source font not found: {}", font.display());
        return Ok(None);
    }

    let name = base_name(font);
    let family = inspector.inspect(font).ok().and_then(|info| info.family);
    let settings = resources.overrides.settings(&name, family.as_deref(), field_type, config.mode);
    let options = RasterOptions::new(config, field_type, settings, resources.charset.clone());

    let output = rasterizer
        .rasterize(font, &options)
        .with_context(|| format!("Failed to rasterize {name} ({field_type})"))?;
    let mut doc = output.document;

    let orphans = doc.orphan_glyphs().count();
    if orphans > 0 {
        warn!("{name}: {orphans} glyph(s) reference pages the rasterizer did not produce");
    }

    let stem = output_stem(&name, field_type);
    let image_name = format!("{stem}.png");
    let (image_path, remap) = if output.pages.is_empty() {
        warn!("{name} ({field_type}): rasterizer produced no pages, writing metadata only");
        (None, RemapReport::default())
    } else {
        let page_count = output.pages.len();
        let strategy = config.layout.resolve(&page_sizes(&output.pages));
        let (image, remap) = merge_pages(output.pages, &mut doc, strategy, &image_name)
            .with_context(|| format!("Failed to compose atlas for {name} ({field_type})"))?;
        let path = config.dest_dir.join(&image_name);
        save_png(&path, &image)?;
        info!(
            "{name} ({field_type}): {page_count} page(s) -> {}x{} {strategy}",
            image.width(),
            image.height()
        );
        (Some(path), remap)
    };

    let metrics_path = adjust_single(&mut doc, inspector, font, &config.metrics_dir(), &name)?;

    let document_path = config.dest_dir.join(format!("{stem}.json"));
    write_document(&document_path, &doc)?;

    Ok(Some(FontOutput { name, field_type, image_path, document_path, metrics_path, remap }))
}

#[cfg(test)]
mod tests {
    use sdfont_glyph_doc::FontMetrics;

    use super::*;
    use crate::{
        config::Mode,
        introspect::fake::TableInspector,
        io::{load_png, read_document},
        raster::fake::FakeRasterizer,
    };

    const UBUNTU: FontMetrics = FontMetrics::new(1900, -500, 100, 2048);

    fn setup() -> (tempfile::TempDir, GeneratorConfig, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        std::fs::create_dir_all(&src).unwrap();
        let font = src.join("Ubuntu-Regular.ttf");
        std::fs::write(&font, b"font").unwrap();
        let config = GeneratorConfig::new(&src, dir.path().join("out"), Mode::Individual);
        (dir, config, font)
    }

    #[test]
    fn test_two_pages_merged() {
        let (_dir, config, font) = setup();
        let rasterizer = FakeRasterizer::default().pages(&font, 2);
        let inspector = TableInspector::default().with(&font, "Ubuntu", "Regular", Some(UBUNTU));

        let resources = Resources::default();
        let out =
            generate_font(&config, &resources, &rasterizer, &inspector, &font, FieldType::Msdf)
                .unwrap()
                .unwrap();

        assert_eq!(out.name, "Ubuntu-Regular");
        assert!(out.remap.is_clean());
        let image = load_png(out.image_path.as_ref().unwrap()).unwrap();
        assert_eq!(image.dimensions(), (514, 256));

        let doc = read_document(&out.document_path).unwrap();
        assert_eq!(doc.pages, vec!["Ubuntu-Regular.msdf.png".to_string()]);
        assert_eq!((doc.common.scale_w, doc.common.scale_h, doc.common.pages), (514, 256, 1));
        // Glyph from page 1 shifted past page 0 and the gutter.
        assert_eq!((doc.chars[1].x, doc.chars[1].y, doc.chars[1].page), (268, 10, 0));
        // Bias corrected once: base 40 -> 38, yoffset 10 -> 6.
        assert_eq!(doc.common.base, 38.0);
        assert_eq!(doc.chars[0].yoffset, 6.0);
        assert_eq!(doc.lightning_metrics, Some(UBUNTU));
        assert_eq!(out.metrics_path, Some(config.metrics_dir().join("Ubuntu-Regular.json")));
    }

    #[test]
    fn test_missing_font_is_none() {
        let (_dir, config, font) = setup();
        let missing = font.with_file_name("Nope.ttf");
        let result = generate_font(
            &config,
            &Resources::default(),
            &FakeRasterizer::default(),
            &TableInspector::default(),
            &missing,
            FieldType::Msdf,
        )
        .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_rasterizer_failure_propagates() {
        let (_dir, config, font) = setup();
        let rasterizer = FakeRasterizer::default().failing(&font);
        let result = generate_font(
            &config,
            &Resources::default(),
            &rasterizer,
            &TableInspector::default(),
            &font,
            FieldType::Ssdf,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_pages_writes_metadata_only() {
        let (_dir, config, font) = setup();
        let rasterizer = FakeRasterizer::default().pages(&font, 0);
        let out = generate_font(
            &config,
            &Resources::default(),
            &rasterizer,
            &TableInspector::default(),
            &font,
            FieldType::Ssdf,
        )
        .unwrap()
        .unwrap();
        assert_eq!(out.image_path, None);
        assert_eq!(out.metrics_path, None);
        assert!(out.document_path.ends_with("Ubuntu-Regular.ssdf.json"));
        assert!(out.document_path.exists());
    }

    #[test]
    fn test_overrides_reach_rasterizer() {
        let (_dir, config, font) = setup();
        let overrides = serde_json::from_str(
            r#"{"Ubuntu": {"msdf": {"textureSize": [128, 128], "distanceRange": 8}}}"#,
        )
        .unwrap();
        let resources = Resources { charset: None, overrides };
        let rasterizer = FakeRasterizer::default();
        let inspector = TableInspector::default().with(&font, "Ubuntu", "Regular", None);

        let out =
            generate_font(&config, &resources, &rasterizer, &inspector, &font, FieldType::Msdf)
                .unwrap()
                .unwrap();
        let doc = read_document(&out.document_path).unwrap();
        assert_eq!(doc.common.scale_w, 128);
        // distanceRange 8 -> pad 4.
        assert_eq!(doc.common.base, 36.0);
    }
}
