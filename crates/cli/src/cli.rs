//! CLI definitions and command dispatch.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::info;
use sdfont_core::{
    BatchResult, GeneratorConfig, LayoutChoice, Mode, MsdfBmfont, ReadFontsInspector, clean,
    generate,
};
use sdfont_glyph_doc::FieldType;

#[derive(Parser)]
#[command(name = "sdfont")]
#[command(about = "Generate SDF/MSDF font atlases and glyph metadata")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, clap::Args)]
pub struct GenerateArgs {
    /// Directory containing the source .ttf/.otf fonts
    #[arg(long, default_value = "fonts")]
    pub src: PathBuf,
    /// Output directory for atlases, documents and metrics
    #[arg(long, default_value = "dist")]
    pub dest: PathBuf,
    /// Field types to generate (msdf, ssdf); all when omitted
    #[arg(long = "field-type")]
    pub field_types: Vec<FieldType>,
    /// Charset config (defaults to charset.config.json in --src)
    #[arg(long)]
    pub charset: Option<PathBuf>,
    /// Per-font overrides (defaults to font-overrides.json in --src)
    #[arg(long)]
    pub overrides: Option<PathBuf>,
    #[arg(short, long, default_value_t = 1)]
    pub jobs: usize,
    /// Rasterizer program
    #[arg(long, default_value = MsdfBmfont::DEFAULT_PROGRAM)]
    pub rasterizer: PathBuf,
    /// Page layout: horizontal, vertical, grid or auto
    #[arg(long, default_value_t = LayoutChoice::default())]
    pub layout: LayoutChoice,
}

impl GenerateArgs {
    pub fn config(&self, mode: Mode) -> GeneratorConfig {
        let mut config = GeneratorConfig::new(&self.src, &self.dest, mode);
        if !self.field_types.is_empty() {
            config.field_types = self.field_types.clone();
        }
        config.charset_path = self.charset.clone();
        config.overrides_path = self.overrides.clone();
        config.jobs = self.jobs.max(1);
        config.layout = self.layout;
        config
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// One merged atlas per font
    Generate {
        #[command(flatten)]
        args: GenerateArgs,
    },
    /// One paginated atlas per type family
    Family {
        #[command(flatten)]
        args: GenerateArgs,
    },
    /// Remove the output directory
    Clean {
        #[arg(long, default_value = "dist")]
        dest: PathBuf,
    },
}

fn run_generate(args: &GenerateArgs, mode: Mode) -> Result<BatchResult> {
    let config = args.config(mode);
    let rasterizer = MsdfBmfont::new(&args.rasterizer, config.staging_dir().join("raster"));
    let result = generate(&config, &rasterizer, &ReadFontsInspector)?;
    println!(
        "\nDone: {} succeeded, {} failed, {} skipped",
        result.succeeded, result.failed, result.skipped
    );
    Ok(result)
}

impl Commands {
    pub fn run(self) -> Result<()> {
        match self {
            Commands::Generate { args } => {
                run_generate(&args, Mode::Individual)?.ok_or_bail("generate")?;
            }
            Commands::Family { args } => {
                run_generate(&args, Mode::Family)?.ok_or_bail("family")?;
            }
            Commands::Clean { dest } => {
                if clean(&dest)? {
                    info!("Cleaned {}", dest.display());
                }
            }
        }
        Ok(())
    }
}
