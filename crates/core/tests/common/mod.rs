//! Shared fixtures: in-memory fonts and a deterministic rasterizer.

#![allow(dead_code)]

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use anyhow::{Result, bail};
use font_types::{FWord, Fixed, LongDateTime, NameId, Tag, UfWord};
use image::{Rgba, RgbaImage};
use sdfont_atlas::RasterPage;
use sdfont_core::{RasterOptions, RasterOutput, Rasterizer, io::base_name};
use sdfont_glyph_doc::{GlyphDocument, GlyphRecord};
use write_fonts::{
    FontBuilder,
    tables::{
        head::{Flags, Head, MacStyle},
        hhea::Hhea,
        name::{Name, NameRecord},
        os2::{Os2, SelectionFlags},
    },
};

pub const PAGE_SIZE: u32 = 256;

/// Colour of raw page `index`, so composed atlases can be checked pixel-wise.
pub fn page_colour(index: usize) -> Rgba<u8> {
    Rgba([index as u8 * 50, 0, 255 - index as u8 * 50, 255])
}

/// Rasterizer returning `PAGE_SIZE` pages with one 30x40 glyph per page at (5, 5).
#[derive(Default)]
pub struct StubRasterizer {
    pub page_counts: HashMap<String, usize>,
    pub broken: Vec<String>,
}

impl StubRasterizer {
    pub fn pages(mut self, stem: &str, count: usize) -> Self {
        self.page_counts.insert(stem.to_string(), count);
        self
    }

    pub fn broken(mut self, stem: &str) -> Self {
        self.broken.push(stem.to_string());
        self
    }
}

impl Rasterizer for StubRasterizer {
    fn rasterize(&self, font: &Path, options: &RasterOptions) -> Result<RasterOutput> {
        let stem = base_name(font);
        if self.broken.contains(&stem) {
            bail!("rasterizer exited with status 1 for {stem}");
        }
        let count = self.page_counts.get(&stem).copied().unwrap_or(1);
        let pages = (0..count)
            .map(|i| {
                RasterPage::new(i, RgbaImage::from_pixel(PAGE_SIZE, PAGE_SIZE, page_colour(i)))
            })
            .collect();

        let chars: Vec<GlyphRecord> = (0..count as u32)
            .map(|page| {
                let mut glyph = GlyphRecord::new(0x41 + page, page, 5, 5, 30, 40);
                glyph.yoffset = 12.0;
                glyph.xadvance = 24.0;
                glyph
            })
            .collect();
        let json = serde_json::json!({
            "pages": (0..count).map(|i| format!("{stem}.{i}.png")).collect::<Vec<_>>(),
            "chars": chars,
            "info": {"face": stem, "size": options.font_size, "charset": ["A", "B"]},
            "common": {"lineHeight": 50, "base": 40, "scaleW": PAGE_SIZE, "scaleH": PAGE_SIZE,
                       "pages": count, "packed": 0},
            "distanceField": {
                "fieldType": options.field_type,
                "distanceRange": options.distance_range
            },
            "kernings": []
        });
        Ok(RasterOutput { pages, document: GlyphDocument::from_json(&json.to_string())? })
    }
}

fn head(units_per_em: u16) -> Head {
    Head {
        font_revision: Fixed::from_f64(1.0),
        checksum_adjustment: 0,
        magic_number: 0x5F0F3CF5,
        flags: Flags::empty(),
        units_per_em,
        created: LongDateTime::new(0),
        modified: LongDateTime::new(0),
        x_min: 0,
        y_min: -200,
        x_max: 1000,
        y_max: 900,
        mac_style: MacStyle::empty(),
        lowest_rec_ppem: 8,
        font_direction_hint: 2,
        index_to_loc_format: 0,
    }
}

fn hhea() -> Hhea {
    Hhea {
        ascender: FWord::new(800),
        descender: FWord::new(-250),
        line_gap: FWord::new(50),
        advance_width_max: UfWord::new(1000),
        min_left_side_bearing: FWord::new(0),
        min_right_side_bearing: FWord::new(0),
        x_max_extent: FWord::new(1000),
        caret_slope_rise: 1,
        caret_slope_run: 0,
        caret_offset: 0,
        number_of_h_metrics: 1,
    }
}

fn os2() -> Os2 {
    Os2 {
        x_avg_char_width: 500,
        us_weight_class: 400,
        us_width_class: 5,
        fs_type: 0,
        y_subscript_x_size: 650,
        y_subscript_y_size: 600,
        y_subscript_x_offset: 0,
        y_subscript_y_offset: 75,
        y_superscript_x_size: 650,
        y_superscript_y_size: 600,
        y_superscript_x_offset: 0,
        y_superscript_y_offset: 350,
        y_strikeout_size: 50,
        y_strikeout_position: 300,
        s_family_class: 0,
        panose_10: [0; 10],
        ul_unicode_range_1: 0,
        ul_unicode_range_2: 0,
        ul_unicode_range_3: 0,
        ul_unicode_range_4: 0,
        ach_vend_id: Tag::new(b"NONE"),
        fs_selection: SelectionFlags::REGULAR,
        us_first_char_index: 0x20,
        us_last_char_index: 0x7E,
        s_typo_ascender: 1900,
        s_typo_descender: -500,
        s_typo_line_gap: 100,
        us_win_ascent: 900,
        us_win_descent: 200,
        ul_code_page_range_1: Some(0),
        ul_code_page_range_2: Some(0),
        sx_height: Some(500),
        s_cap_height: Some(700),
        us_default_char: Some(0),
        us_break_char: Some(0x20),
        us_max_context: Some(0),
        us_lower_optical_point_size: None,
        us_upper_optical_point_size: None,
    }
}

/// A minimal font naming `family`/`style` with typo metrics 1900/-500/100.
pub fn font(family: &str, style: &str, units_per_em: u16) -> Vec<u8> {
    let record = |id: u16, text: String| {
        NameRecord::new(3, 1, 0x409, NameId::new(id), text.into())
    };
    let mut builder = FontBuilder::new();
    builder.add_table(&head(units_per_em)).unwrap();
    builder.add_table(&hhea()).unwrap();
    builder.add_table(&os2()).unwrap();
    builder
        .add_table(&Name::new(vec![
            record(1, family.to_string()),
            record(2, style.to_string()),
            record(4, format!("{family} {style}")),
        ]))
        .unwrap();
    builder.build()
}

/// Write fonts into `dir` as `<file stem>.ttf`.
pub fn write_fonts(dir: &Path, fonts: &[(&str, &str, &str, u16)]) -> Vec<PathBuf> {
    std::fs::create_dir_all(dir).unwrap();
    fonts
        .iter()
        .map(|(stem, family, style, upem)| {
            let path = dir.join(format!("{stem}.ttf"));
            std::fs::write(&path, font(family, style, *upem)).unwrap();
            path
        })
        .collect()
}
