use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_FLOW_ITERATIONS, DEFAULT_FLOW_WINDOW_SIZE, DEFAULT_PYRAMID_LEVELS, DEFAULT_RADIUS,
    MIN_FLOW_WINDOW_SIZE,
};

/// Tuning handed to the motion estimator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowParams {
    /// Averaging window in pixels.
    pub window_size: usize,
    /// Pyramid levels, full resolution included.
    pub levels: usize,
    /// Refinement passes per level.
    pub iterations: usize,
}

impl Default for FlowParams {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_FLOW_WINDOW_SIZE,
            levels: DEFAULT_PYRAMID_LEVELS,
            iterations: DEFAULT_FLOW_ITERATIONS,
        }
    }
}

impl FlowParams {
    /// Force an odd window of at least `MIN_FLOW_WINDOW_SIZE` and at least
    /// one level and one iteration.
    pub fn normalized(&self) -> Self {
        Self {
            window_size: (self.window_size | 1).max(MIN_FLOW_WINDOW_SIZE),
            levels: self.levels.max(1),
            iterations: self.iterations.max(1),
        }
    }
}

impl fmt::Display for FlowParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "window {}, {} levels, {} iterations",
            self.window_size, self.levels, self.iterations
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentConfig {
    /// When false, neighbors are averaged without motion compensation.
    pub enabled: bool,
    pub flow: FlowParams,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            flow: FlowParams::default(),
        }
    }
}

impl fmt::Display for AlignmentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.enabled {
            write!(f, "on ({})", self.flow)
        } else {
            write!(f, "off")
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DenoiseParams {
    /// Frames taken on each side of the target.
    pub radius: usize,
    /// Spatial median kernel; 0 or 1 disables the post-filter.
    pub spatial_kernel: usize,
    pub alignment: AlignmentConfig,
}

impl Default for DenoiseParams {
    fn default() -> Self {
        Self {
            radius: DEFAULT_RADIUS,
            spatial_kernel: 0,
            alignment: AlignmentConfig::default(),
        }
    }
}

impl DenoiseParams {
    /// Frames in a full, unclipped window: `2 * radius + 1`, saturating.
    pub fn window_len(&self) -> usize {
        self.radius.saturating_mul(2).saturating_add(1)
    }
}

/// Contents of a `--config` TOML file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DenoiseConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    #[serde(default)]
    pub params: DenoiseParams,
}
