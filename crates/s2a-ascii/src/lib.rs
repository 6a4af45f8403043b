/// Tone quantization engine for sprite2ascii.
///
/// Classifies canvas pixels into tone buckets and renders them as characters.
pub mod convert;
pub mod format;
pub mod quantize;
pub mod render;

pub use convert::{convert_file, convert_image};
pub use format::OutputFormat;
pub use quantize::{Thresholds, quantize};
pub use render::render;
