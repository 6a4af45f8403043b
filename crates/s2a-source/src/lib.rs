/// Sprite loading and geometric normalization for sprite2ascii.
///
/// Decodes images into [`s2a_core::PixelBuffer`]s and brings them onto the
/// fixed-size square canvas the quantizer expects.

pub mod folder;
pub mod image;
pub mod normalize;
pub mod resize;
pub mod rotate;

pub use normalize::normalize;
