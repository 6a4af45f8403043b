use anyhow::{Context, Result};
use fast_image_resize::images::Image;
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use s2a_core::pixels::PixelBuffer;

/// Redimensionne `src` en `width × height` (Lanczos3, alpha prémultiplié).
///
/// Premultiplying keeps anti-aliased edges from bleeding toward transparent
/// black. A same-size request returns an exact copy.
///
/// # Errors
/// Returns an error if `fast_image_resize` rejects the buffers or fails.
///
/// # Example
/// ```
/// use s2a_core::pixels::PixelBuffer;
/// use s2a_source::resize::resize_lanczos;
/// let src = PixelBuffer::new(100, 40);
/// let dst = resize_lanczos(&src, 50, 20).unwrap();
/// assert_eq!((dst.width, dst.height), (50, 20));
/// ```
pub fn resize_lanczos(src: &PixelBuffer, width: u32, height: u32) -> Result<PixelBuffer> {
    if src.width == width && src.height == height {
        return Ok(src.clone());
    }

    // fast_image_resize borrows the source mutably
    let mut src_bytes = src.data.clone();
    let src_image = Image::from_slice_u8(src.width, src.height, &mut src_bytes, PixelType::U8x4)
        .context("Dimensions source invalides")?;

    let mut dst = PixelBuffer::new(width, height);
    let mut dst_image = Image::from_slice_u8(width, height, &mut dst.data, PixelType::U8x4)
        .context("Dimensions cible invalides")?;

    let options = ResizeOptions::new()
        .resize_alg(ResizeAlg::Convolution(FilterType::Lanczos3))
        .use_alpha(true);
    Resizer::new()
        .resize(&src_image, &mut dst_image, Some(&options))
        .with_context(|| {
            format!(
                "Échec du redimensionnement {}×{} → {width}×{height}",
                src.width, src.height
            )
        })?;

    Ok(dst)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_size_is_verbatim() {
        let mut src = PixelBuffer::new(3, 3);
        src.set_pixel(1, 1, [1, 2, 3, 4]);
        let dst = resize_lanczos(&src, 3, 3).unwrap();
        assert_eq!(dst, src);
    }

    #[test]
    fn solid_color_survives_downscale() {
        let src = PixelBuffer::filled(40, 40, [200, 100, 50, 255]);
        let dst = resize_lanczos(&src, 10, 10).unwrap();
        for px in dst.data.chunks_exact(4) {
            for (got, want) in px.iter().zip([200u8, 100, 50, 255]) {
                assert!(got.abs_diff(want) <= 1, "{px:?}");
            }
        }
    }

    #[test]
    fn transparent_stays_transparent() {
        let src = PixelBuffer::new(16, 16);
        let dst = resize_lanczos(&src, 7, 5).unwrap();
        assert!(dst.data.iter().all(|&b| b == 0));
    }

    #[test]
    fn upscale_fills_target() {
        let src = PixelBuffer::filled(3, 2, [10, 20, 30, 255]);
        let dst = resize_lanczos(&src, 12, 8).unwrap();
        assert_eq!(dst.data.len(), 12 * 8 * 4);
        assert!(dst.data.chunks_exact(4).all(|px| px[3] >= 254));
    }
}
