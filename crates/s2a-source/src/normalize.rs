use anyhow::Result;
use s2a_core::config::GeometryConfig;
use s2a_core::error::CoreError;
use s2a_core::pixels::PixelBuffer;

use crate::resize::resize_lanczos;
use crate::rotate::rotate;

/// Tight box around the pixels at or above the alpha cutoff, inclusive.
///
/// # Example
/// ```
/// use s2a_core::pixels::PixelBuffer;
/// use s2a_source::normalize::{content_bounds, ContentBounds};
///
/// let mut pb = PixelBuffer::new(8, 8);
/// pb.set_pixel(2, 3, [0, 0, 0, 255]);
/// pb.set_pixel(5, 4, [0, 0, 0, 255]);
/// assert_eq!(
///     content_bounds(&pb, 32),
///     Some(ContentBounds { min_x: 2, min_y: 3, max_x: 5, max_y: 4 })
/// );
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContentBounds {
    /// Leftmost column.
    pub min_x: u32,
    /// Topmost row.
    pub min_y: u32,
    /// Rightmost column.
    pub max_x: u32,
    /// Bottom row.
    pub max_y: u32,
}

impl ContentBounds {
    /// Grow by `padding` on every side, clamped to a `width × height` image.
    #[must_use]
    pub fn padded(self, padding: u32, width: u32, height: u32) -> Self {
        Self {
            min_x: self.min_x.saturating_sub(padding),
            min_y: self.min_y.saturating_sub(padding),
            max_x: self
                .max_x
                .saturating_add(padding)
                .min(width.saturating_sub(1)),
            max_y: self
                .max_y
                .saturating_add(padding)
                .min(height.saturating_sub(1)),
        }
    }

    /// Width of the box in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    /// Height of the box in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.max_y - self.min_y + 1
    }
}

/// Scan every pixel for alpha ≥ `alpha_cutoff`. `None` if nothing qualifies.
#[must_use]
pub fn content_bounds(image: &PixelBuffer, alpha_cutoff: u8) -> Option<ContentBounds> {
    let mut bounds: Option<ContentBounds> = None;
    for y in 0..image.height {
        for x in 0..image.width {
            if image.alpha(x, y) < alpha_cutoff {
                continue;
            }
            bounds = Some(match bounds {
                None => ContentBounds {
                    min_x: x,
                    min_y: y,
                    max_x: x,
                    max_y: y,
                },
                Some(b) => ContentBounds {
                    min_x: b.min_x.min(x),
                    min_y: b.min_y,
                    max_x: b.max_x.max(x),
                    max_y: y,
                },
            });
        }
    }
    bounds
}

/// Crop to the padded content box. Images without content are returned as is.
#[must_use]
pub fn crop_to_content(image: &PixelBuffer, alpha_cutoff: u8, padding: u32) -> PixelBuffer {
    let Some(bounds) = content_bounds(image, alpha_cutoff) else {
        log::warn!(
            "Aucun pixel au-dessus du seuil alpha {alpha_cutoff} : recadrage ignoré ({}×{})",
            image.width,
            image.height
        );
        return image.clone();
    };
    let b = bounds.padded(padding, image.width, image.height);
    log::debug!(
        "Recadrage sur ({}, {}) {}×{}",
        b.min_x,
        b.min_y,
        b.width(),
        b.height()
    );
    image.crop(b.min_x, b.min_y, b.width(), b.height())
}

/// Largest size fitting a square `inner × inner` area with the stretched aspect.
///
/// Aspect is `(width · h_stretch) / height`. Wider-than-square content is
/// width-constrained, the rest height-constrained. Never returns a zero side.
///
/// # Example
/// ```
/// use s2a_source::normalize::fit_size;
/// assert_eq!(fit_size(20, 10, 1.0, 44), (44, 22));
/// assert_eq!(fit_size(10, 20, 1.0, 44), (22, 44));
/// assert_eq!(fit_size(10, 10, 1.5, 44), (44, 29));
/// ```
#[must_use]
pub fn fit_size(width: u32, height: u32, h_stretch: f64, inner: u32) -> (u32, u32) {
    let aspect = f64::from(width) * h_stretch / f64::from(height.max(1));
    let inner_f = f64::from(inner);
    let (new_w, new_h) = if aspect > 1.0 {
        (inner, (inner_f / aspect) as u32)
    } else {
        ((inner_f * aspect) as u32, inner)
    };
    (new_w.clamp(1, inner.max(1)), new_h.clamp(1, inner.max(1)))
}

/// Bring `image` onto a transparent `output_size²` canvas.
///
/// Rotation (expanding), optional crop to content, aspect-preserving Lanczos
/// resize into the area inside the margin, then centered paste.
///
/// # Errors
/// Returns an error if `geometry` is invalid, the image is empty, or the
/// resize fails.
///
/// # Example
/// ```
/// use s2a_core::config::GeometryConfig;
/// use s2a_core::pixels::PixelBuffer;
/// use s2a_source::normalize;
///
/// let sprite = PixelBuffer::filled(30, 10, [255, 255, 255, 255]);
/// let canvas = normalize(&sprite, &GeometryConfig::default(), 32).unwrap();
/// assert_eq!((canvas.width, canvas.height), (48, 48));
/// ```
pub fn normalize(
    image: &PixelBuffer,
    geometry: &GeometryConfig,
    alpha_cutoff: u8,
) -> Result<PixelBuffer> {
    geometry.validate()?;
    if image.width == 0 || image.height == 0 {
        return Err(CoreError::InvalidDimensions {
            width: image.width,
            height: image.height,
        }
        .into());
    }

    let rotated = rotate(image, geometry.rotation_degrees);

    let cropped = if geometry.auto_crop {
        crop_to_content(&rotated, alpha_cutoff, geometry.crop_padding)
    } else {
        rotated
    };

    let inner = geometry.inner_size();
    let (new_w, new_h) = fit_size(cropped.width, cropped.height, geometry.h_stretch, inner);
    log::debug!(
        "{}×{} → {new_w}×{new_h} (stretch {}, marge {})",
        cropped.width,
        cropped.height,
        geometry.h_stretch,
        geometry.margin
    );

    let resized = resize_lanczos(&cropped, new_w, new_h)?;

    let size = geometry.output_size;
    let mut canvas = PixelBuffer::new(size, size);
    canvas.paste(&resized, (size - new_w) / 2, (size - new_h) / 2);
    Ok(canvas)
}
