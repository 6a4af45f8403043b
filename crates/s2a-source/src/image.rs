use std::path::Path;

use anyhow::{Context, Result};
use s2a_core::error::CoreError;
use s2a_core::pixels::PixelBuffer;

/// Extensions image reconnues.
pub const IMAGE_EXTS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "webp"];

/// True if the path has an extension the decoder handles.
///
/// # Example
/// ```
/// use s2a_source::image::is_supported;
/// use std::path::Path;
/// assert!(is_supported(Path::new("shark.WEBP")));
/// assert!(!is_supported(Path::new("notes.txt")));
/// ```
#[must_use]
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| IMAGE_EXTS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Charge une image depuis le disque et la convertit en RGBA8.
///
/// # Errors
/// Returns [`CoreError::UnsupportedFormat`] if the extension is not in
/// [`IMAGE_EXTS`], or an error if the file cannot be read or decoded.
///
/// # Example
/// ```no_run
/// use s2a_source::image::load_image;
/// use std::path::Path;
/// let sprite = load_image(Path::new("assets/references/shark.webp")).unwrap();
/// ```
pub fn load_image(path: &Path) -> Result<PixelBuffer> {
    if !is_supported(path) {
        return Err(CoreError::UnsupportedFormat {
            path: path.display().to_string(),
        }
        .into());
    }
    let img =
        image::open(path).with_context(|| format!("Impossible de charger {}", path.display()))?;
    let buffer = into_pixels(img)?;
    log::debug!(
        "{} décodée : {}×{}",
        path.display(),
        buffer.width,
        buffer.height
    );
    Ok(buffer)
}

fn into_pixels(img: image::DynamicImage) -> Result<PixelBuffer> {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(PixelBuffer::from_raw(width, height, rgba.into_raw())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_png_roundtrips_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sprite.png");
        let mut img = image::RgbaImage::new(3, 2);
        img.put_pixel(2, 1, image::Rgba([10, 20, 30, 200]));
        img.save(&path).unwrap();

        let pb = load_image(&path).unwrap();
        assert_eq!((pb.width, pb.height), (3, 2));
        assert_eq!(pb.pixel(2, 1), (10, 20, 30, 200));
        assert_eq!(pb.alpha(0, 0), 0);
    }

    #[test]
    fn load_missing_file_errors() {
        assert!(load_image(Path::new("/nonexistent/sprite.png")).is_err());
    }

    #[test]
    fn load_garbage_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"definitely not an image").unwrap();
        assert!(load_image(&path).is_err());
    }

    #[test]
    fn load_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"hello").unwrap();
        let err = load_image(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CoreError>(),
            Some(CoreError::UnsupportedFormat { .. })
        ));
    }
}
