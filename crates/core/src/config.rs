//! Generator configuration and defaults.

use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::Result;
use sdfont_atlas::{LayoutStrategy, PageSize};
use sdfont_glyph_doc::FieldType;

use crate::{charset::resolve_charset, overrides::Overrides};

/// Default glyph size in pixels.
pub const DEFAULT_FONT_SIZE: u32 = 42;

/// Default distance range in pixels.
pub const DEFAULT_DISTANCE_RANGE: u32 = 4;

/// Default texture size when each font is merged into one atlas.
pub const INDIVIDUAL_TEXTURE_SIZE: [u32; 2] = [512, 512];

/// Default texture size when a family is paginated across several pages.
pub const FAMILY_TEXTURE_SIZE: [u32; 2] = [2048, 2048];

/// Subdirectory of the destination holding the standalone metrics files.
pub const METRICS_DIR: &str = "metrics";

/// Default charset config file name, looked up in the source directory.
pub const CHARSET_CONFIG_FILENAME: &str = "charset.config.json";

/// Default per-font overrides file name, looked up in the source directory.
pub const OVERRIDES_FILENAME: &str = "font-overrides.json";

/// Font file extensions picked up from the source directory.
pub const FONT_EXTENSIONS: &[&str] = &["ttf", "otf"];

/// Whether fonts are processed one by one or grouped into families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// One merged atlas per font file.
    #[default]
    Individual,
    /// One paginated atlas per type family.
    Family,
}

impl Mode {
    pub const fn default_texture_size(self) -> [u32; 2] {
        match self {
            Mode::Individual => INDIVIDUAL_TEXTURE_SIZE,
            Mode::Family => FAMILY_TEXTURE_SIZE,
        }
    }
}

/// Everything a generation run needs, passed explicitly to each operation.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub source_dir: PathBuf,
    pub dest_dir: PathBuf,
    pub charset_path: Option<PathBuf>,
    pub overrides_path: Option<PathBuf>,
    pub field_types: Vec<FieldType>,
    pub mode: Mode,
    /// Worker count for independent jobs; 1 runs them in order on this thread.
    pub jobs: usize,
    pub layout: LayoutChoice,
    pub round_decimal: u32,
    pub smart_size: bool,
    pub pot: bool,
}

/// Layout strategy for merging pages, or `Auto` to pick per font.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutChoice {
    Fixed(LayoutStrategy),
    Auto,
}

impl Default for LayoutChoice {
    fn default() -> Self {
        LayoutChoice::Fixed(LayoutStrategy::Horizontal)
    }
}

impl LayoutChoice {
    pub fn resolve(self, pages: &[PageSize]) -> LayoutStrategy {
        match self {
            LayoutChoice::Fixed(strategy) => strategy,
            LayoutChoice::Auto => LayoutStrategy::auto(pages),
        }
    }
}

impl fmt::Display for LayoutChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutChoice::Fixed(strategy) => fmt::Display::fmt(strategy, f),
            LayoutChoice::Auto => f.write_str("auto"),
        }
    }
}

impl FromStr for LayoutChoice {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "auto" => Ok(LayoutChoice::Auto),
            other => other.parse().map(LayoutChoice::Fixed),
        }
    }
}

/// Charset and overrides, loaded once per run and shared by every job.
#[derive(Debug, Clone, Default)]
pub struct Resources {
    pub charset: Option<String>,
    pub overrides: Overrides,
}

impl Resources {
    pub fn load(config: &GeneratorConfig) -> Result<Self> {
        Ok(Self {
            charset: resolve_charset(config.charset_file().as_deref())?,
            overrides: Overrides::load_optional(config.overrides_file().as_deref())?,
        })
    }
}

impl GeneratorConfig {
    pub fn new(source_dir: impl Into<PathBuf>, dest_dir: impl Into<PathBuf>, mode: Mode) -> Self {
        Self {
            source_dir: source_dir.into(),
            dest_dir: dest_dir.into(),
            charset_path: None,
            overrides_path: None,
            field_types: FieldType::ALL.to_vec(),
            mode,
            jobs: 1,
            layout: LayoutChoice::default(),
            round_decimal: 6,
            smart_size: true,
            pot: true,
        }
    }

    /// Charset config path, falling back to the conventional file in the source dir.
    pub fn charset_file(&self) -> Option<PathBuf> {
        self.charset_path.clone().or_else(|| existing(&self.source_dir, CHARSET_CONFIG_FILENAME))
    }

    /// Overrides path, falling back to the conventional file in the source dir.
    pub fn overrides_file(&self) -> Option<PathBuf> {
        self.overrides_path.clone().or_else(|| existing(&self.source_dir, OVERRIDES_FILENAME))
    }

    pub fn metrics_dir(&self) -> PathBuf {
        self.dest_dir.join(METRICS_DIR)
    }

    /// Scratch space for files that must not outlive a run.
    pub fn staging_dir(&self) -> PathBuf {
        self.dest_dir.join(".staging")
    }
}

fn existing(dir: &Path, name: &str) -> Option<PathBuf> {
    let path = dir.join(name);
    path.is_file().then_some(path)
}
