/// Configuration, types, and shared structures for sprite2ascii.
///
/// This crate contains the pixel buffer, tone grids, palettes and the
/// conversion configuration shared across the sprite2ascii workspace.

pub mod config;
pub mod error;
pub mod grid;
pub mod palette;
pub mod pixels;

pub use config::{ConvertConfig, GeometryConfig, ThresholdMode, ToneConfig};
pub use error::CoreError;
pub use grid::{ToneCell, ToneGrid, ToneMap};
pub use pixels::PixelBuffer;
