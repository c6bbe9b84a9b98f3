//! Pipeline entry points: every font (or family) in the source directory,
//! for every configured field type.

pub mod clean;

use std::{fs::create_dir_all, time::Instant};

use anyhow::{Context, Result, bail};
use log::warn;

use crate::{
    config::{GeneratorConfig, Mode, Resources},
    family::{aggregate_families, group_by_family},
    introspect::FontInspector,
    io::font_files,
    parallel::{BatchResult, run_batch},
    raster::Rasterizer,
    single::generate_font,
};

pub use clean::clean;

/// Shared state for one pipeline run.
pub struct PipelineContext<'a> {
    pub config: &'a GeneratorConfig,
    pub rasterizer: &'a dyn Rasterizer,
    pub inspector: &'a dyn FontInspector,
    pub resources: Resources,
}

impl<'a> PipelineContext<'a> {
    /// Check the source directory and load charset and overrides.
    pub fn new(
        config: &'a GeneratorConfig,
        rasterizer: &'a dyn Rasterizer,
        inspector: &'a dyn FontInspector,
    ) -> Result<Self> {
        if !config.source_dir.is_dir() {
            bail!("Source directory not found: {}", config.source_dir.display());
        }
        create_dir_all(&config.dest_dir)
            .with_context(|| format!("Failed to create {}", config.dest_dir.display()))?;
        let resources = Resources::load(config)?;
        Ok(Self { config, rasterizer, inspector, resources })
    }
}

/// Run a named pipeline step with timing.
fn run_step<T>(
    name: &str,
    step_num: usize,
    total: usize,
    f: impl FnOnce() -> Result<T>,
) -> Result<T> {
    println!("\n[{step_num}/{total}] {name}");
    let start = Instant::now();
    let value = f()?;
    println!("  ✓ {name} ({:.2}s)", start.elapsed().as_secs_f64());
    Ok(value)
}

fn add(total: &mut BatchResult, step: BatchResult) {
    total.succeeded += step.succeeded;
    total.failed += step.failed;
    total.skipped += step.skipped;
}

/// One merged atlas per font file and field type.
pub fn generate_individual(
    config: &GeneratorConfig,
    rasterizer: &dyn Rasterizer,
    inspector: &dyn FontInspector,
) -> Result<BatchResult> {
    let ctx = PipelineContext::new(config, rasterizer, inspector)?;
    let fonts = font_files(&config.source_dir)?;
    if fonts.is_empty() {
        warn!("No fonts found in {}", config.source_dir.display());
    }

    let total = config.field_types.len();
    let mut result = BatchResult::default();
    for (i, &field_type) in config.field_types.iter().enumerate() {
        let step = run_step(&format!("{field_type} atlases"), i + 1, total, || {
            println!("  {} font(s)", fonts.len());
            run_batch(&format!("{field_type} atlases"), config.jobs, fonts.clone(), |font| {
                generate_font(
                    ctx.config,
                    &ctx.resources,
                    ctx.rasterizer,
                    ctx.inspector,
                    &font,
                    field_type,
                )
            })
        })?;
        add(&mut result, step);
    }
    Ok(result)
}

/// One paginated atlas per type family and field type.
pub fn generate_families(
    config: &GeneratorConfig,
    rasterizer: &dyn Rasterizer,
    inspector: &dyn FontInspector,
) -> Result<BatchResult> {
    let ctx = PipelineContext::new(config, rasterizer, inspector)?;
    let fonts = font_files(&config.source_dir)?;
    let families = group_by_family(&fonts, inspector);
    if families.is_empty() {
        warn!("No fonts found in {}", config.source_dir.display());
    }

    let total = config.field_types.len();
    let mut result = BatchResult::default();
    for (i, &field_type) in config.field_types.iter().enumerate() {
        run_step(&format!("{field_type} family atlases"), i + 1, total, || {
            println!("  {} family(ies)", families.len());
            let outcomes = aggregate_families(
                ctx.config,
                &ctx.resources,
                ctx.rasterizer,
                ctx.inspector,
                &families,
                field_type,
            );
            for (_, outcome) in outcomes {
                result.record(&outcome);
            }
            Ok(())
        })?;
    }
    Ok(result)
}

/// Dispatch on the configured mode.
pub fn generate(
    config: &GeneratorConfig,
    rasterizer: &dyn Rasterizer,
    inspector: &dyn FontInspector,
) -> Result<BatchResult> {
    match config.mode {
        Mode::Individual => generate_individual(config, rasterizer, inspector),
        Mode::Family => generate_families(config, rasterizer, inspector),
    }
}
