//! The rasterizer seam: font file in, raw pages plus glyph table out.

use std::{
    ffi::OsString,
    fs::{create_dir_all, remove_dir_all, write},
    path::{Path, PathBuf},
    process::Command,
};

use anyhow::{Context, Result, bail};
use log::{debug, info};
use sdfont_atlas::RasterPage;
use sdfont_glyph_doc::{DistanceField, FieldType, GlyphDocument};

use crate::{
    config::GeneratorConfig,
    io::{base_name, glob_files, load_png, read_document},
    overrides::RasterSettings,
};

/// Options for one rasterization job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterOptions {
    pub field_type: FieldType,
    pub round_decimal: u32,
    pub smart_size: bool,
    pub pot: bool,
    pub font_size: u32,
    pub distance_range: u32,
    pub texture_size: Option<[u32; 2]>,
    pub charset: Option<String>,
}

impl RasterOptions {
    pub fn new(
        config: &GeneratorConfig,
        field_type: FieldType,
        settings: RasterSettings,
        charset: Option<String>,
    ) -> Self {
        Self {
            field_type,
            round_decimal: config.round_decimal,
            smart_size: config.smart_size,
            pot: config.pot,
            font_size: settings.font_size,
            distance_range: settings.distance_range,
            texture_size: Some(settings.texture_size),
            charset,
        }
    }
}

/// Raw rasterizer output: pages ordered 0..N-1 and their glyph table.
#[derive(Debug, Clone)]
pub struct RasterOutput {
    pub pages: Vec<RasterPage>,
    pub document: GlyphDocument,
}

/// Turns a font file into distance-field pages and a glyph table.
pub trait Rasterizer: Sync {
    fn rasterize(&self, font: &Path, options: &RasterOptions) -> Result<RasterOutput>;
}

/// Runs the external `msdf-bmfont` command.
///
/// Each job gets its own working directory under `work_dir`, which is removed
/// once the pages and document have been loaded.
#[derive(Debug, Clone)]
pub struct MsdfBmfont {
    pub program: PathBuf,
    pub work_dir: PathBuf,
}

impl MsdfBmfont {
    pub const DEFAULT_PROGRAM: &'static str = "msdf-bmfont";

    pub fn new(program: impl Into<PathBuf>, work_dir: impl Into<PathBuf>) -> Self {
        Self { program: program.into(), work_dir: work_dir.into() }
    }

    fn args(
        &self,
        font: &Path,
        options: &RasterOptions,
        out: &Path,
        charset_file: Option<&Path>,
    ) -> Vec<OsString> {
        let field = match options.field_type {
            FieldType::Msdf => "msdf",
            FieldType::Ssdf => "sdf",
        };
        let mut args: Vec<OsString> = vec![
            "-f".into(),
            "json".into(),
            "-o".into(),
            out.into(),
            "-t".into(),
            field.into(),
            "-s".into(),
            options.font_size.to_string().into(),
            "-r".into(),
            options.distance_range.to_string().into(),
            "-d".into(),
            options.round_decimal.to_string().into(),
        ];
        if let Some([width, height]) = options.texture_size {
            args.push("-m".into());
            args.push(format!("{width},{height}").into());
        }
        if options.smart_size {
            args.push("--smart-size".into());
        }
        if options.pot {
            args.push("--pot".into());
        }
        if let Some(file) = charset_file {
            args.push("-i".into());
            args.push(file.into());
        }
        args.push(font.into());
        args
    }

    fn load_output(dir: &Path, options: &RasterOptions) -> Result<RasterOutput> {
        let json = glob_files(dir, "*.json")?
            .into_iter()
            .next()
            .with_context(|| format!("Rasterizer wrote no JSON document in {}", dir.display()))?;
        let mut document = read_document(&json)?;
        document.distance_field.get_or_insert(DistanceField {
            field_type: options.field_type,
            distance_range: options.distance_range,
        });

        let pages = document
            .pages
            .iter()
            .enumerate()
            .map(|(index, name)| Ok(RasterPage::new(index, load_png(&dir.join(name))?)))
            .collect::<Result<Vec<_>>>()?;

        Ok(RasterOutput { pages, document })
    }
}

impl Rasterizer for MsdfBmfont {
    fn rasterize(&self, font: &Path, options: &RasterOptions) -> Result<RasterOutput> {
        let stem = base_name(font);
        let dir = self.work_dir.join(format!("{stem}.{}", options.field_type));
        create_dir_all(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;

        let charset_file = match &options.charset {
            Some(charset) => {
                let path = dir.join("charset.txt");
                write(&path, charset)?;
                Some(path)
            }
            None => None,
        };

        let args = self.args(font, options, &dir.join(&stem), charset_file.as_deref());
        debug!("{} {:?}", self.program.display(), args);
        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .with_context(|| format!("Failed to run {}", self.program.display()))?;
        if !output.status.success() {
            let _ = remove_dir_all(&dir);
            bail!(
                "{} failed for {} ({}): {}",
                self.program.display(),
                font.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        let result = Self::load_output(&dir, options);
        remove_dir_all(&dir).with_context(|| format!("Failed to remove {}", dir.display()))?;
        let output = result?;
        info!("Rasterized {} ({}): {} page(s)", stem, options.field_type, output.pages.len());
        Ok(output)
    }
}
