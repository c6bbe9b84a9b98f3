//! The JSON glyph table written next to every atlas image.
//!
//! The layout follows the msdf-bmfont JSON flavour of the BMFont format:
//! a page list, a `chars` glyph table, `info`/`common` blocks and kernings.
//! The pipeline extends it with `lightningMetrics`, a `styles` index for
//! family atlases, and a `biasCorrected` marker.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{DocError, FieldType, FontMetrics, Result};

/// One character's placement and rendering offsets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlyphRecord {
    pub id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
    #[serde(rename = "char", default)]
    pub ch: String,
    pub width: u32,
    pub height: u32,
    pub xoffset: f64,
    pub yoffset: f64,
    pub xadvance: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chnl: Option<u32>,
    pub x: u32,
    pub y: u32,
    pub page: u32,
}

impl GlyphRecord {
    /// A glyph at `(x, y)` on `page` with zero rendering offsets.
    pub fn new(id: u32, page: u32, x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            id,
            index: None,
            ch: char::from_u32(id).map(String::from).unwrap_or_default(),
            width,
            height,
            xoffset: 0.0,
            yoffset: 0.0,
            xadvance: 0.0,
            chnl: None,
            x,
            y,
            page,
        }
    }

    /// Right edge of the pixel rectangle (exclusive).
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Bottom edge of the pixel rectangle (exclusive).
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kerning {
    pub first: u32,
    pub second: u32,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfoBlock {
    pub face: String,
    pub size: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonBlock {
    pub line_height: f64,
    pub base: f64,
    pub scale_w: u32,
    pub scale_h: u32,
    pub pages: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistanceField {
    pub field_type: FieldType,
    pub distance_range: u32,
}

/// Page range occupied by one style inside a family atlas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleIndex {
    pub style: String,
    pub start_page: u32,
    pub page_count: u32,
    /// `"start"` for a single page, `"start-end"` otherwise.
    pub page_range: String,
    /// The style's own common block, with its page count and canvas size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub common: Option<CommonBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_field: Option<DistanceField>,
    #[serde(default)]
    pub chars: Vec<GlyphRecord>,
    #[serde(default)]
    pub kernings: Vec<Kerning>,
}

impl StyleIndex {
    /// Half the style's own distance range, when it recorded one.
    pub fn pad(&self) -> Option<u32> {
        self.distance_field.map(|field| field.distance_range >> 1)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlyphDocument {
    pub pages: Vec<String>,
    pub chars: Vec<GlyphRecord>,
    pub info: InfoBlock,
    pub common: CommonBlock,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_field: Option<DistanceField>,
    #[serde(default)]
    pub kernings: Vec<Kerning>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lightning_metrics: Option<FontMetrics>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub styles: Vec<StyleIndex>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub bias_corrected: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl GlyphDocument {
    /// Parse and validate a document.
    pub fn from_json(text: &str) -> Result<Self> {
        let doc: Self = serde_json::from_str(text)?;
        doc.validate()?;
        Ok(doc)
    }

    /// Parse and validate a document from raw bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let doc: Self = serde_json::from_slice(bytes)?;
        doc.validate()?;
        Ok(doc)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the document-level invariants.
    ///
    /// Glyphs pointing at missing pages are not rejected here; see
    /// [`GlyphDocument::orphan_glyphs`].
    pub fn validate(&self) -> Result<()> {
        if self.common.pages as usize != self.pages.len() {
            return Err(DocError::PageCountMismatch {
                declared: self.common.pages,
                listed: self.pages.len(),
            });
        }
        Ok(())
    }

    /// Glyphs whose page index has no entry in the page list.
    pub fn orphan_glyphs(&self) -> impl Iterator<Item = &GlyphRecord> {
        let page_count = self.pages.len();
        self.chars.iter().filter(move |glyph| glyph.page as usize >= page_count)
    }

    /// Half the distance range, the bias the rasterizer bakes into offsets.
    pub fn pad(&self) -> Option<u32> {
        self.distance_field.map(|field| field.distance_range >> 1)
    }

    /// Replace the page list and canvas size.
    pub fn set_pages(&mut self, pages: Vec<String>, width: u32, height: u32) {
        self.common.pages = pages.len() as u32;
        self.common.scale_w = width;
        self.common.scale_h = height;
        self.pages = pages;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "pages": ["Ubuntu-Regular.0.png", "Ubuntu-Regular.1.png"],
        "chars": [
            {"id": 65, "index": 36, "char": "A", "width": 30, "height": 34,
             "xoffset": -1, "yoffset": 10, "xadvance": 27, "chnl": 15,
             "x": 10, "y": 10, "page": 1}
        ],
        "info": {"face": "Ubuntu-Regular", "size": 42, "bold": 0, "padding": [2, 2, 2, 2]},
        "common": {"lineHeight": 48, "base": 40, "scaleW": 256, "scaleH": 256,
                   "pages": 2, "packed": 0},
        "distanceField": {"fieldType": "msdf", "distanceRange": 4},
        "kernings": [{"first": 65, "second": 86, "amount": -2}]
    }"#;

    #[test]
    fn test_parse_sample() {
        let doc = GlyphDocument::from_json(SAMPLE).unwrap();
        assert_eq!(doc.pages.len(), 2);
        assert_eq!(doc.chars[0].ch, "A");
        assert_eq!(doc.chars[0].page, 1);
        assert_eq!(doc.common.base, 40.0);
        assert_eq!(doc.pad(), Some(2));
        assert_eq!(doc.kernings.len(), 1);
        assert!(!doc.bias_corrected);
        assert!(doc.lightning_metrics.is_none());
    }

    #[test]
    fn test_unknown_keys_survive() {
        let doc = GlyphDocument::from_json(SAMPLE).unwrap();
        let json: Value = serde_json::from_str(&doc.to_json_pretty().unwrap()).unwrap();
        assert_eq!(json["info"]["padding"], serde_json::json!([2, 2, 2, 2]));
        assert_eq!(json["common"]["packed"], 0);
        assert!(json.get("styles").is_none());
        assert!(json.get("biasCorrected").is_none());
    }

    #[test]
    fn test_page_count_mismatch_rejected() {
        let broken = SAMPLE.replace(r#""pages": 2"#, r#""pages": 3"#);
        let err = GlyphDocument::from_json(&broken).unwrap_err();
        assert!(matches!(err, DocError::PageCountMismatch { declared: 3, listed: 2 }));
    }

    #[test]
    fn test_orphan_glyphs() {
        let mut doc = GlyphDocument::from_json(SAMPLE).unwrap();
        assert_eq!(doc.orphan_glyphs().count(), 0);
        doc.chars[0].page = 5;
        assert_eq!(doc.orphan_glyphs().count(), 1);
    }

    #[test]
    fn test_set_pages() {
        let mut doc = GlyphDocument::from_json(SAMPLE).unwrap();
        doc.set_pages(vec!["atlas.png".to_string()], 514, 256);
        assert_eq!(doc.common.pages, 1);
        assert_eq!(doc.common.scale_w, 514);
        assert_eq!(doc.common.scale_h, 256);
        assert!(doc.validate().is_ok());
    }

    #[test]
    fn test_style_index_keeps_own_blocks() {
        let json = r#"{"style": "Bold", "startPage": 1, "pageCount": 2, "pageRange": "1-2",
            "common": {"lineHeight": 60, "base": 50, "scaleW": 1024, "scaleH": 1024, "pages": 2},
            "distanceField": {"fieldType": "msdf", "distanceRange": 8}}"#;
        let style: StyleIndex = serde_json::from_str(json).unwrap();
        assert_eq!(style.pad(), Some(4));
        assert_eq!(style.common.as_ref().map(|c| c.base), Some(50.0));
        assert!(style.chars.is_empty());

        let bare: StyleIndex = serde_json::from_str(
            r#"{"style": "Regular", "startPage": 0, "pageCount": 1, "pageRange": "0"}"#,
        )
        .unwrap();
        assert_eq!(bare.pad(), None);
        let out = serde_json::to_value(&bare).unwrap();
        assert!(out.get("common").is_none());
        assert!(out.get("distanceField").is_none());
    }
}
