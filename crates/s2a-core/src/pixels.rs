use crate::error::CoreError;

/// Buffer de pixels RGBA8, row-major, 4 bytes par pixel.
///
/// Used both for decoded sprites and for the fixed-size output canvas.
///
/// # Example
/// ```
/// use s2a_core::pixels::PixelBuffer;
/// let pb = PixelBuffer::new(10, 10);
/// assert_eq!(pb.data.len(), 400);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    /// Pixels RGBA, row-major, 4 bytes par pixel.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PixelBuffer {
    /// Crée un buffer entièrement transparent aux dimensions données.
    ///
    /// # Example
    /// ```
    /// use s2a_core::pixels::PixelBuffer;
    /// let pb = PixelBuffer::new(4, 2);
    /// assert_eq!(pb.pixel(3, 1), (0, 0, 0, 0));
    /// ```
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![0u8; width as usize * height as usize * 4],
            width,
            height,
        }
    }

    /// Wrap raw RGBA bytes, checking that the length matches the dimensions.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidDimensions`] if `data.len() != width * height * 4`.
    ///
    /// # Example
    /// ```
    /// use s2a_core::pixels::PixelBuffer;
    /// assert!(PixelBuffer::from_raw(1, 1, vec![1, 2, 3, 4]).is_ok());
    /// assert!(PixelBuffer::from_raw(2, 1, vec![1, 2, 3, 4]).is_err());
    /// ```
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self, CoreError> {
        if data.len() != width as usize * height as usize * 4 {
            return Err(CoreError::InvalidDimensions { width, height });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Build a buffer where every pixel has the same RGBA value.
    #[must_use]
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let data = rgba
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 4)
            .collect();
        Self {
            data,
            width,
            height,
        }
    }

    #[inline(always)]
    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Accès au pixel (x, y) → (r, g, b, a).
    ///
    /// # Example
    /// ```
    /// use s2a_core::pixels::PixelBuffer;
    /// let pb = PixelBuffer::filled(2, 2, [10, 20, 30, 40]);
    /// assert_eq!(pb.pixel(1, 1), (10, 20, 30, 40));
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> (u8, u8, u8, u8) {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let idx = self.index(x, y);
        if idx + 3 >= self.data.len() {
            return (0, 0, 0, 0);
        }
        (
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        )
    }

    /// Écrit le pixel (x, y).
    #[inline(always)]
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let idx = self.index(x, y);
        self.data[idx..idx + 4].copy_from_slice(&rgba);
    }

    /// Alpha channel of pixel (x, y).
    #[inline(always)]
    #[must_use]
    pub fn alpha(&self, x: u32, y: u32) -> u8 {
        self.pixel(x, y).3
    }

    /// Luminance BT.709 de chaque pixel, row-major. `None` sous `alpha_cutoff`.
    ///
    /// # Example
    /// ```
    /// use s2a_core::pixels::PixelBuffer;
    /// let mut pb = PixelBuffer::filled(2, 1, [255, 255, 255, 255]);
    /// pb.set_pixel(1, 0, [255, 255, 255, 10]);
    /// assert_eq!(pb.lumas(32).collect::<Vec<_>>(), vec![Some(255), None]);
    /// ```
    pub fn lumas(&self, alpha_cutoff: u8) -> impl Iterator<Item = Option<u8>> + '_ {
        self.data
            .chunks_exact(4)
            .map(move |px| (px[3] >= alpha_cutoff).then(|| luma_from_rgb(px[0], px[1], px[2])))
    }

    /// Copy the `width × height` region starting at (`x`, `y`) into a new buffer.
    ///
    /// The region is clipped to the buffer bounds.
    ///
    /// # Example
    /// ```
    /// use s2a_core::pixels::PixelBuffer;
    /// let pb = PixelBuffer::new(8, 8);
    /// let sub = pb.crop(2, 2, 4, 3);
    /// assert_eq!((sub.width, sub.height), (4, 3));
    /// ```
    #[must_use]
    pub fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> Self {
        let x = x.min(self.width);
        let y = y.min(self.height);
        let width = width.min(self.width - x);
        let height = height.min(self.height - y);

        let mut out = Self::new(width, height);
        let row_bytes = width as usize * 4;
        for row in 0..height {
            let src = self.index(x, y + row);
            let dst = row as usize * row_bytes;
            out.data[dst..dst + row_bytes].copy_from_slice(&self.data[src..src + row_bytes]);
        }
        out
    }

    /// Paste `src` with its top-left corner at (`x`, `y`), replacing the
    /// destination pixels. Parts falling outside the buffer are dropped.
    pub fn paste(&mut self, src: &PixelBuffer, x: u32, y: u32) {
        if x >= self.width || y >= self.height {
            return;
        }
        let cols = src.width.min(self.width - x);
        let rows = src.height.min(self.height - y);
        let row_bytes = cols as usize * 4;
        for row in 0..rows {
            let s = src.index(0, row);
            let d = self.index(x, y + row);
            self.data[d..d + row_bytes].copy_from_slice(&src.data[s..s + row_bytes]);
        }
    }
}

/// Rec. 709 luma with integer weights, truncated: `(2126R + 7152G + 722B) / 10000`.
///
/// # Example
/// ```
/// use s2a_core::pixels::luma_from_rgb;
/// assert_eq!(luma_from_rgb(0, 0, 0), 0);
/// assert_eq!(luma_from_rgb(255, 255, 255), 255);
/// assert_eq!(luma_from_rgb(0, 255, 0), 182);
/// ```
#[inline(always)]
#[must_use]
pub fn luma_from_rgb(r: u8, g: u8, b: u8) -> u8 {
    ((u32::from(r) * 2126 + u32::from(g) * 7152 + u32::from(b) * 722) / 10000) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crop_copies_region() {
        let mut pb = PixelBuffer::new(4, 4);
        pb.set_pixel(2, 1, [9, 8, 7, 6]);
        let sub = pb.crop(1, 1, 2, 2);
        assert_eq!(sub.pixel(1, 0), (9, 8, 7, 6));
        assert_eq!(sub.pixel(0, 0), (0, 0, 0, 0));
    }

    #[test]
    fn crop_clips_to_bounds() {
        let pb = PixelBuffer::new(4, 4);
        let sub = pb.crop(3, 3, 10, 10);
        assert_eq!((sub.width, sub.height), (1, 1));
    }

    #[test]
    fn paste_places_at_offset() {
        let mut canvas = PixelBuffer::new(5, 5);
        let src = PixelBuffer::filled(2, 2, [255, 255, 255, 255]);
        canvas.paste(&src, 3, 3);
        assert_eq!(canvas.alpha(3, 3), 255);
        assert_eq!(canvas.alpha(4, 4), 255);
        assert_eq!(canvas.alpha(2, 2), 0);
    }

    #[test]
    fn paste_drops_overflow() {
        let mut canvas = PixelBuffer::new(3, 3);
        let src = PixelBuffer::filled(4, 4, [1, 1, 1, 255]);
        canvas.paste(&src, 2, 2);
        assert_eq!(canvas.alpha(2, 2), 255);
        assert_eq!(canvas.alpha(1, 1), 0);
    }

    #[test]
    fn lumas_skip_faint_pixels() {
        let mut pb = PixelBuffer::filled(3, 1, [0, 255, 0, 255]);
        pb.set_pixel(1, 0, [0, 255, 0, 31]);
        pb.set_pixel(2, 0, [0, 255, 0, 32]);
        let got: Vec<_> = pb.lumas(32).collect();
        assert_eq!(got, vec![Some(182), None, Some(182)]);
    }

    #[test]
    fn luma_truncates() {
        // 0.2126 * 100 + 0.7152 * 100 + 0.0722 * 100 = 100.0
        assert_eq!(luma_from_rgb(100, 100, 100), 100);
        // 0.2126 * 255 = 54.213
        assert_eq!(luma_from_rgb(255, 0, 0), 54);
    }
}
