use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tdenoise_core::pipeline::{DenoiseConfig, DenoiseParams};

/// Denoising options shared by `preview` and `export`.
///
/// Values given on the command line override those read from `--config`.
#[derive(Args)]
pub struct ParamArgs {
    /// Config file (TOML), see `tdenoise config`
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Frames taken on each side of the target [default: 3]
    #[arg(short, long)]
    pub radius: Option<usize>,

    /// Spatial median kernel size, 0 or 1 to disable [default: 0]
    #[arg(long)]
    pub spatial: Option<usize>,

    /// Average neighbors without motion compensation
    #[arg(long)]
    pub no_align: bool,

    /// Motion estimation window in pixels [default: 15]
    #[arg(long)]
    pub window_size: Option<usize>,

    /// Pyramid levels for motion estimation [default: 3]
    #[arg(long)]
    pub levels: Option<usize>,

    /// Refinement passes per pyramid level [default: 3]
    #[arg(long)]
    pub iterations: Option<usize>,
}

impl ParamArgs {
    pub fn resolve(&self) -> Result<DenoiseConfig> {
        let mut config = match self.config {
            Some(ref path) => load_config(path)?,
            None => DenoiseConfig::default(),
        };

        let params: &mut DenoiseParams = &mut config.params;
        if let Some(radius) = self.radius {
            params.radius = radius;
        }
        if let Some(spatial) = self.spatial {
            params.spatial_kernel = spatial;
        }
        if self.no_align {
            params.alignment.enabled = false;
        }
        if let Some(window_size) = self.window_size {
            params.alignment.flow.window_size = window_size;
        }
        if let Some(levels) = self.levels {
            params.alignment.flow.levels = levels;
        }
        if let Some(iterations) = self.iterations {
            params.alignment.flow.iterations = iterations;
        }
        Ok(config)
    }
}

fn load_config(path: &Path) -> Result<DenoiseConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    toml::from_str(&contents).with_context(|| format!("Invalid config {}", path.display()))
}
