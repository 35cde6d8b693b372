//! Render settings from a TOML file plus command-line overrides.

use std::path::Path;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use hybrid_rt_raytrace::SplitStrategy;
use hybrid_rt_render::RenderSettings;

/// BVH split strategy as a CLI value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// Surface area heuristic
    Sah,
    /// Median split on the longest axis
    Median,
    /// One leaf holding every triangle
    Flat,
}

impl From<StrategyArg> for SplitStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Sah => SplitStrategy::Sah,
            StrategyArg::Median => SplitStrategy::Median,
            StrategyArg::Flat => SplitStrategy::Flat,
        }
    }
}

/// Flags that take precedence over the config file.
#[derive(Debug, Clone, Default, Args)]
pub struct Overrides {
    /// Image width in pixels
    #[arg(long)]
    pub width: Option<u32>,
    /// Image height in pixels
    #[arg(long)]
    pub height: Option<u32>,
    /// BVH split strategy
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,
    /// Maximum triangles per BVH leaf
    #[arg(long)]
    pub max_leaf_size: Option<usize>,
    /// Render on the calling thread only
    #[arg(long)]
    pub sequential: bool,
}

impl Overrides {
    /// Write every flag that was given into `settings`.
    pub fn apply(&self, settings: &mut RenderSettings) {
        if let Some(width) = self.width {
            settings.width = width;
        }
        if let Some(height) = self.height {
            settings.height = height;
        }
        if let Some(strategy) = self.strategy {
            settings.bvh.strategy = strategy.into();
        }
        if let Some(max_leaf_size) = self.max_leaf_size {
            settings.bvh.max_leaf_size = max_leaf_size;
        }
        if self.sequential {
            settings.parallel = false;
        }
    }
}

/// Parse render settings from TOML. Missing keys take their defaults.
pub fn parse_settings(text: &str) -> Result<RenderSettings> {
    toml::from_str(text).context("invalid render settings")
}

/// Load settings from `path`, or defaults when no file is given.
pub fn load_settings(path: Option<&Path>) -> Result<RenderSettings> {
    let Some(path) = path else {
        return Ok(RenderSettings::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let settings = parse_settings(&text).with_context(|| format!("in {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded render settings");
    Ok(settings)
}
