/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Number of channels in a color frame (R, G, B).
pub const COLOR_CHANNEL_COUNT: usize = 3;

/// ITU-R BT.601 luminance coefficient for the red channel.
pub const LUMINANCE_R: f32 = 0.299;

/// ITU-R BT.601 luminance coefficient for the green channel.
pub const LUMINANCE_G: f32 = 0.587;

/// ITU-R BT.601 luminance coefficient for the blue channel.
pub const LUMINANCE_B: f32 = 0.114;

/// Default temporal radius (frames on each side of the target).
pub const DEFAULT_RADIUS: usize = 3;

/// Default flow averaging window, in pixels.
pub const DEFAULT_FLOW_WINDOW_SIZE: usize = 15;

/// Smallest flow window accepted by the estimator.
pub const MIN_FLOW_WINDOW_SIZE: usize = 5;

/// Default number of Gaussian pyramid levels for coarse-to-fine motion estimation.
pub const DEFAULT_PYRAMID_LEVELS: usize = 3;

/// Default number of refinement passes per pyramid level.
pub const DEFAULT_FLOW_ITERATIONS: usize = 3;

/// Gaussian blur sigma used between pyramid levels.
pub const PYRAMID_BLUR_SIGMA: f32 = 1.0;

/// Pyramid levels stop being built once either side drops below this size.
pub const MIN_PYRAMID_SIDE: usize = 16;

/// Suffix appended to the input stem when naming exported frames.
pub const OUTPUT_SUFFIX: &str = "_denoised";

/// Extension used when the input container cannot be written back.
pub const FALLBACK_EXTENSION: &str = "tiff";

/// Extension used when the input has none.
pub const DEFAULT_EXTENSION: &str = "png";
