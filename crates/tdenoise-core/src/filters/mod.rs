pub mod gaussian_blur;
pub mod median;

pub use gaussian_blur::gaussian_blur_array;
pub use median::{apply_spatial_median, effective_kernel_size};
