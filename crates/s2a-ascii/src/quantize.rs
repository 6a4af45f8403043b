//! Quantification de luma en N tons.
//!
//! Two passes over the canvas: the first builds a 256-bin luma histogram of
//! the opaque pixels, the second classifies every pixel once the thresholds
//! are known. Adaptive thresholds depend on the whole distribution, so they
//! cannot be computed per pixel.

use s2a_core::config::{ThresholdMode, ToneConfig};
use s2a_core::error::CoreError;
use s2a_core::grid::{ToneCell, ToneMap};
use s2a_core::pixels::PixelBuffer;

/// Histogram of luma values over pixels with alpha ≥ cutoff.
///
/// # Example
/// ```
/// use s2a_core::pixels::PixelBuffer;
/// use s2a_ascii::quantize::LumaHistogram;
///
/// let canvas = PixelBuffer::filled(4, 4, [255, 255, 255, 255]);
/// let hist = LumaHistogram::from_canvas(&canvas, 32);
/// assert_eq!(hist.count(), 16);
/// assert_eq!(hist.nth(0), Some(255));
/// ```
#[derive(Clone, Debug)]
pub struct LumaHistogram {
    bins: [u32; 256],
    count: usize,
}

impl LumaHistogram {
    /// Collect the lumas of every pixel at or above `alpha_cutoff`.
    #[must_use]
    pub fn from_canvas(canvas: &PixelBuffer, alpha_cutoff: u8) -> Self {
        Self::from_lumas(canvas.lumas(alpha_cutoff).flatten())
    }

    /// Build from raw luma samples.
    #[must_use]
    pub fn from_lumas(lumas: impl IntoIterator<Item = u8>) -> Self {
        let mut hist = Self {
            bins: [0; 256],
            count: 0,
        };
        for l in lumas {
            hist.push(l);
        }
        hist
    }

    #[inline(always)]
    fn push(&mut self, luma: u8) {
        self.bins[luma as usize] += 1;
        self.count += 1;
    }

    /// Number of samples.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// True if no pixel passed the alpha cutoff.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Value at position `rank` of the sorted samples, `None` past the end.
    #[must_use]
    pub fn nth(&self, rank: usize) -> Option<u8> {
        let mut seen = 0usize;
        for (luma, &n) in self.bins.iter().enumerate() {
            seen += n as usize;
            if rank < seen {
                return Some(luma as u8);
            }
        }
        None
    }

    /// Nearest-rank quantile `num/den`: index `floor(num/den · (count − 1))`.
    #[must_use]
    pub fn quantile(&self, num: usize, den: usize) -> Option<u8> {
        if self.count == 0 || den == 0 {
            return None;
        }
        self.nth(num * (self.count - 1) / den)
    }
}

/// N−1 ascending luma cut points for N tone buckets.
///
/// # Example
/// ```
/// use s2a_ascii::quantize::Thresholds;
/// let t = Thresholds::even(4);
/// assert_eq!(t.as_slice(), &[64, 128, 192]);
/// assert_eq!(t.classify(63), 0);
/// assert_eq!(t.classify(64), 1);
/// assert_eq!(t.classify(255), 3);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Thresholds(Vec<u8>);

impl Thresholds {
    /// Evenly spaced cut points `256·i/N` for `i = 1..N`.
    #[must_use]
    pub fn even(tones: usize) -> Self {
        let tones = tones.max(1);
        Self((1..tones).map(|i| (256 * i / tones) as u8).collect())
    }

    /// Quantile cut points over `hist`, spread by the spacing guard.
    ///
    /// Falls back to [`Thresholds::even`] when `hist` is empty.
    ///
    /// # Example
    /// ```
    /// use s2a_ascii::quantize::{LumaHistogram, Thresholds};
    /// // Flat sprite: every quantile lands on 100
    /// let hist = LumaHistogram::from_lumas(vec![100; 50]);
    /// let t = Thresholds::adaptive(&hist, 4, 16);
    /// assert_eq!(t.as_slice(), &[100, 116, 132]);
    /// ```
    #[must_use]
    pub fn adaptive(hist: &LumaHistogram, tones: usize, min_spacing: u8) -> Self {
        let mut cuts: Vec<u8> = if hist.is_empty() {
            Self::even(tones).0
        } else {
            (1..tones)
                .filter_map(|i| hist.quantile(i, tones))
                .collect()
        };
        spread(&mut cuts, min_spacing);
        Self(cuts)
    }

    /// Thresholds for `tone` given the sprite's histogram.
    #[must_use]
    pub fn for_config(hist: &LumaHistogram, tone: &ToneConfig) -> Self {
        match tone.mode {
            ThresholdMode::Adaptive => Self::adaptive(hist, tone.tones, tone.min_spacing),
            ThresholdMode::Fixed => match tone.fixed_thresholds {
                Some(ref cuts) => Self(cuts.clone()),
                None => Self::even(tone.tones),
            },
        }
    }

    /// Cut points, ascending.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Index of the first cut point strictly above `luma`, or N−1.
    ///
    /// A luma equal to a cut point lands in the bucket above it.
    #[inline(always)]
    #[must_use]
    pub fn classify(&self, luma: u8) -> u8 {
        self.0.partition_point(|&t| t <= luma) as u8
    }

    /// 256-entry luma → tone lookup table.
    #[must_use]
    pub fn lut(&self) -> [u8; 256] {
        let mut lut = [0u8; 256];
        for (luma, slot) in lut.iter_mut().enumerate() {
            *slot = self.classify(luma as u8);
        }
        lut
    }
}

/// Left to right, lift any cut point not above its predecessor to
/// `min(255, prev + min_spacing)`.
fn spread(cuts: &mut [u8], min_spacing: u8) {
    for i in 1..cuts.len() {
        if cuts[i] <= cuts[i - 1] {
            cuts[i] = cuts[i - 1].saturating_add(min_spacing);
        }
    }
}

/// Classify every canvas pixel into a tone bucket or transparent.
///
/// # Errors
/// Returns a [`CoreError`] if `tone` is invalid.
///
/// # Example
/// ```
/// use s2a_core::config::ToneConfig;
/// use s2a_core::grid::ToneCell;
/// use s2a_core::pixels::PixelBuffer;
/// use s2a_ascii::quantize;
///
/// let mut canvas = PixelBuffer::filled(2, 1, [0, 0, 0, 255]);
/// canvas.set_pixel(1, 0, [255, 255, 255, 0]);
/// let map = quantize(&canvas, &ToneConfig::with_tones(2).unwrap()).unwrap();
/// assert_eq!(map.get(1, 0), ToneCell::Transparent);
/// ```
pub fn quantize(canvas: &PixelBuffer, tone: &ToneConfig) -> Result<ToneMap, CoreError> {
    tone.validate()?;

    let hist = LumaHistogram::from_canvas(canvas, tone.alpha_cutoff);
    let thresholds = Thresholds::for_config(&hist, tone);
    log::debug!(
        "{} pixels opaques, seuils {:?} ({:?})",
        hist.count(),
        thresholds.as_slice(),
        tone.mode
    );
    let lut = thresholds.lut();

    let mut map = ToneMap::new(canvas.width, canvas.height, tone.tones);
    for (cell, luma) in map.cells.iter_mut().zip(canvas.lumas(tone.alpha_cutoff)) {
        *cell = luma.map_or(ToneCell::Transparent, |l| ToneCell::Tone(lut[l as usize]));
    }
    Ok(map)
}
