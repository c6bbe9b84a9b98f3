mod common;

use common::{PAGE_SIZE, StubRasterizer, page_colour, write_fonts};
use sdfont_core::{
    GeneratorConfig, LayoutChoice, Mode, ReadFontsInspector, generate_individual,
    io::{load_png, read_document, read_json},
};
use sdfont_atlas::LayoutStrategy;
use sdfont_glyph_doc::{FieldType, FontMetrics};

fn setup(fonts: &[(&str, &str, &str, u16)]) -> (tempfile::TempDir, GeneratorConfig) {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("fonts");
    write_fonts(&src, fonts);
    let config = GeneratorConfig::new(&src, dir.path().join("out"), Mode::Individual);
    (dir, config)
}

#[test]
fn test_two_pages_become_one_atlas() {
    let (_dir, mut config) = setup(&[("Ubuntu-Regular", "Ubuntu", "Regular", 2048)]);
    config.field_types = vec![FieldType::Msdf];
    let rasterizer = StubRasterizer::default().pages("Ubuntu-Regular", 2);

    let result = generate_individual(&config, &rasterizer, &ReadFontsInspector).unwrap();
    assert_eq!(result.succeeded, 1);
    assert!(result.all_succeeded());

    let atlas = load_png(&config.dest_dir.join("Ubuntu-Regular.msdf.png")).unwrap();
    assert_eq!(atlas.dimensions(), (2 * PAGE_SIZE + 2, PAGE_SIZE));
    assert_eq!(*atlas.get_pixel(10, 10), page_colour(0));
    assert_eq!(*atlas.get_pixel(PAGE_SIZE + 2 + 10, 10), page_colour(1));
    // Gutter stays transparent.
    assert_eq!(atlas.get_pixel(PAGE_SIZE, 10).0[3], 0);

    let doc = read_document(&config.dest_dir.join("Ubuntu-Regular.msdf.json")).unwrap();
    assert_eq!(doc.pages, vec!["Ubuntu-Regular.msdf.png".to_string()]);
    assert_eq!((doc.common.scale_w, doc.common.scale_h), (514, 256));
    assert!(doc.chars.iter().all(|g| g.page == 0));
    assert_eq!((doc.chars[0].x, doc.chars[0].y), (5, 5));
    assert_eq!((doc.chars[1].x, doc.chars[1].y), (263, 5));
    // Unknown rasterizer keys survive the round trip.
    assert_eq!(doc.common.extra.get("packed"), Some(&serde_json::json!(0)));

    // distanceRange 4: base 40 -> 38, yoffset 12 -> 8.
    assert_eq!(doc.common.base, 38.0);
    assert!(doc.chars.iter().all(|g| g.yoffset == 8.0));
    let metrics = FontMetrics::new(1900, -500, 100, 2048);
    assert_eq!(doc.lightning_metrics, Some(metrics));
    let file: FontMetrics = read_json(&config.metrics_dir().join("Ubuntu-Regular.json")).unwrap();
    assert_eq!(file, metrics);
}

#[test]
fn test_single_page_is_left_in_place() {
    let (_dir, mut config) = setup(&[("Mono-Regular", "Mono", "Regular", 1000)]);
    config.field_types = vec![FieldType::Ssdf];

    generate_individual(&config, &StubRasterizer::default(), &ReadFontsInspector).unwrap();

    let atlas = load_png(&config.dest_dir.join("Mono-Regular.ssdf.png")).unwrap();
    assert_eq!(atlas.dimensions(), (PAGE_SIZE, PAGE_SIZE));
    let doc = read_document(&config.dest_dir.join("Mono-Regular.ssdf.json")).unwrap();
    assert_eq!((doc.chars[0].x, doc.chars[0].y, doc.chars[0].page), (5, 5, 0));
    assert_eq!(doc.lightning_metrics.map(|m| m.units_per_em), Some(1000));
}

#[test]
fn test_glyphs_stay_inside_canvas_for_every_layout() {
    for layout in [
        LayoutChoice::Fixed(LayoutStrategy::Horizontal),
        LayoutChoice::Fixed(LayoutStrategy::Vertical),
        LayoutChoice::Fixed(LayoutStrategy::Grid),
        LayoutChoice::Auto,
    ] {
        let (_dir, mut config) = setup(&[("Ubuntu-Regular", "Ubuntu", "Regular", 2048)]);
        config.field_types = vec![FieldType::Msdf];
        config.layout = layout;
        let rasterizer = StubRasterizer::default().pages("Ubuntu-Regular", 5);

        generate_individual(&config, &rasterizer, &ReadFontsInspector).unwrap();

        let doc = read_document(&config.dest_dir.join("Ubuntu-Regular.msdf.json")).unwrap();
        let atlas = load_png(&config.dest_dir.join("Ubuntu-Regular.msdf.png")).unwrap();
        assert_eq!(atlas.dimensions(), (doc.common.scale_w, doc.common.scale_h));
        for glyph in &doc.chars {
            assert!(glyph.right() <= doc.common.scale_w, "{layout:?}: {glyph:?}");
            assert!(glyph.bottom() <= doc.common.scale_h, "{layout:?}: {glyph:?}");
            // Each glyph still sits on its own page's pixels.
            let source = glyph.id - 0x41;
            assert_eq!(*atlas.get_pixel(glyph.x, glyph.y), page_colour(source as usize));
        }
    }
}

#[test]
fn test_broken_font_does_not_stop_siblings() {
    let (_dir, mut config) = setup(&[
        ("Alpha-Regular", "Alpha", "Regular", 1000),
        ("Beta-Regular", "Beta", "Regular", 1000),
        ("Gamma-Regular", "Gamma", "Regular", 1000),
    ]);
    config.jobs = 3;
    let rasterizer = StubRasterizer::default().broken("Beta-Regular");

    let result = generate_individual(&config, &rasterizer, &ReadFontsInspector).unwrap();
    assert_eq!((result.succeeded, result.failed), (4, 2));
    assert!(result.ok_or_bail("generate").is_err());
    for name in ["Alpha-Regular", "Gamma-Regular"] {
        for field in ["msdf", "ssdf"] {
            assert!(config.dest_dir.join(format!("{name}.{field}.json")).exists());
        }
    }
    assert!(!config.dest_dir.join("Beta-Regular.msdf.json").exists());
}

#[test]
fn test_charset_and_overrides_from_source_dir() {
    let (_dir, mut config) = setup(&[("Ubuntu-Regular", "Ubuntu", "Regular", 2048)]);
    config.field_types = vec![FieldType::Msdf];
    std::fs::write(
        config.source_dir.join("font-overrides.json"),
        r#"{"Ubuntu-Regular": {"msdf": {"distanceRange": 8}}}"#,
    )
    .unwrap();

    generate_individual(&config, &StubRasterizer::default(), &ReadFontsInspector).unwrap();

    let doc = read_document(&config.dest_dir.join("Ubuntu-Regular.msdf.json")).unwrap();
    assert_eq!(doc.distance_field.map(|d| d.distance_range), Some(8));
    // pad 4: base 40 -> 36.
    assert_eq!(doc.common.base, 36.0);
}
