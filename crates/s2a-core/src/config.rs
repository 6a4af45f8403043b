use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::palette::{self, validate_palette};

/// Comment les seuils de luma sont dérivés.
///
/// # Example
/// ```
/// use s2a_core::config::ThresholdMode;
/// assert_eq!(ThresholdMode::default(), ThresholdMode::Adaptive);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdMode {
    /// Quantiles of the sprite's own luma distribution.
    #[default]
    Adaptive,
    /// Explicit list, or evenly spaced cut points.
    Fixed,
}

/// Quantization settings: tone count, palette, alpha cutoff, thresholds.
///
/// # Example
/// ```
/// use s2a_core::config::ToneConfig;
/// let tone = ToneConfig::default();
/// assert_eq!(tone.tones, 4);
/// assert_eq!(tone.palette, "#@oO");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ToneConfig {
    /// Nombre de tons N, dans [2, 6].
    pub tones: usize,
    /// N caractères, du plus sombre au plus clair.
    pub palette: String,
    /// Pixels with alpha strictly below this render as `.`.
    pub alpha_cutoff: u8,
    /// Adaptive or fixed thresholds.
    pub mode: ThresholdMode,
    /// Explicit N−1 ascending thresholds for fixed mode.
    pub fixed_thresholds: Option<Vec<u8>>,
    /// Minimum gap the adaptive guard restores between collapsed thresholds.
    pub min_spacing: u8,
}

impl Default for ToneConfig {
    fn default() -> Self {
        Self {
            tones: 4,
            palette: palette::PALETTE_4.to_string(),
            alpha_cutoff: 32,
            mode: ThresholdMode::Adaptive,
            fixed_thresholds: None,
            min_spacing: 16,
        }
    }
}

impl ToneConfig {
    /// Config for `tones` buckets with the matching built-in palette.
    ///
    /// # Errors
    /// Returns [`CoreError::ToneCount`] if `tones` is outside `[2, 6]`.
    ///
    /// # Example
    /// ```
    /// use s2a_core::config::ToneConfig;
    /// let tone = ToneConfig::with_tones(2).unwrap();
    /// assert_eq!(tone.palette, "#O");
    /// ```
    pub fn with_tones(tones: usize) -> Result<Self, CoreError> {
        Ok(Self {
            tones,
            palette: palette::palette_for(tones)?.into_iter().collect(),
            ..Self::default()
        })
    }

    /// Palette as a character vector.
    #[must_use]
    pub fn palette_chars(&self) -> Vec<char> {
        self.palette.chars().collect()
    }

    /// Check palette length, tone range and threshold list.
    ///
    /// # Errors
    /// Returns the first [`CoreError`] found.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_palette(&self.palette_chars(), self.tones)?;
        if self.min_spacing == 0 {
            return Err(CoreError::Config("min_spacing doit être ≥ 1".into()));
        }
        if let Some(ref t) = self.fixed_thresholds {
            if t.len() != self.tones - 1 {
                return Err(CoreError::Config(format!(
                    "{} seuils fixes pour {} tons (attendu {})",
                    t.len(),
                    self.tones,
                    self.tones - 1
                )));
            }
            if t.windows(2).any(|w| w[1] <= w[0]) {
                return Err(CoreError::Config(format!(
                    "seuils fixes non strictement croissants : {t:?}"
                )));
            }
        }
        Ok(())
    }
}

/// Geometry settings for the normalizer.
///
/// # Example
/// ```
/// use s2a_core::config::GeometryConfig;
/// let geo = GeometryConfig::default();
/// assert_eq!(geo.output_size, 48);
/// assert_eq!(geo.inner_size(), 44);
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct GeometryConfig {
    /// Côté du canvas carré de sortie, en pixels.
    pub output_size: u32,
    /// Transparent border kept around the sprite, in pixels.
    pub margin: u32,
    /// Horizontal stretch factor (1.0 = none, 1.5 = 50% wider).
    pub h_stretch: f64,
    /// Counter-clockwise rotation in degrees.
    pub rotation_degrees: f32,
    /// Padding added around the content bounding box before resizing.
    pub crop_padding: u32,
    /// Crop to content before resizing.
    pub auto_crop: bool,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            output_size: 48,
            margin: 2,
            h_stretch: 1.0,
            rotation_degrees: 0.0,
            crop_padding: 2,
            auto_crop: true,
        }
    }
}

impl GeometryConfig {
    /// Side of the square area left inside the margin.
    ///
    /// Saturates at zero; [`GeometryConfig::validate`] rejects that case.
    #[must_use]
    pub fn inner_size(&self) -> u32 {
        self.output_size.saturating_sub(self.margin.saturating_mul(2))
    }

    /// Check size, margin, stretch and rotation.
    ///
    /// # Errors
    /// Returns [`CoreError::Config`] or [`CoreError::InvalidDimensions`].
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.output_size == 0 {
            return Err(CoreError::InvalidDimensions {
                width: 0,
                height: 0,
            });
        }
        if !self.h_stretch.is_finite() || self.h_stretch <= 0.0 {
            return Err(CoreError::Config(format!(
                "h_stretch doit être > 0 (reçu {})",
                self.h_stretch
            )));
        }
        if !self.rotation_degrees.is_finite() {
            return Err(CoreError::Config("rotation non finie".into()));
        }
        if self.inner_size() == 0 {
            return Err(CoreError::Config(format!(
                "marge {} trop grande pour une sortie de {}",
                self.margin, self.output_size
            )));
        }
        Ok(())
    }
}

/// Complete conversion configuration, built once per run.
///
/// # Example
/// ```
/// use s2a_core::config::ConvertConfig;
/// let config = ConvertConfig::default();
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct ConvertConfig {
    /// Quantization settings.
    pub tone: ToneConfig,
    /// Normalizer settings.
    pub geometry: GeometryConfig,
}

impl ConvertConfig {
    /// Validate both sections.
    ///
    /// # Errors
    /// Returns the first [`CoreError`] found.
    pub fn validate(&self) -> Result<(), CoreError> {
        self.tone.validate()?;
        self.geometry.validate()
    }
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize)]
struct ConfigFile {
    tone: Option<ToneSection>,
    geometry: Option<GeometrySection>,
}

/// Tone section of the TOML config, all fields optional for partial override.
#[derive(Deserialize)]
struct ToneSection {
    tones: Option<usize>,
    palette: Option<String>,
    alpha_cutoff: Option<u8>,
    mode: Option<ThresholdMode>,
    fixed_thresholds: Option<Vec<u8>>,
    min_spacing: Option<u8>,
}

/// Geometry section of the TOML config, all fields optional.
#[derive(Deserialize)]
struct GeometrySection {
    output_size: Option<u32>,
    margin: Option<u32>,
    h_stretch: Option<f64>,
    rotation_degrees: Option<f32>,
    crop_padding: Option<u32>,
    auto_crop: Option<bool>,
}

/// Parse TOML text and merge it over the defaults.
///
/// Setting `tones` without `palette` picks the built-in palette for that count.
///
/// # Errors
/// Returns an error if the text is not valid TOML or the merged config is invalid.
///
/// # Example
/// ```
/// use s2a_core::config::parse_config;
/// let config = parse_config("[tone]\ntones = 2\n").unwrap();
/// assert_eq!(config.tone.palette, "#O");
/// assert_eq!(config.geometry.output_size, 48);
/// ```
pub fn parse_config(content: &str) -> Result<ConvertConfig> {
    let file: ConfigFile = toml::from_str(content).context("Erreur de parsing TOML")?;
    let mut config = ConvertConfig::default();

    if let Some(t) = file.tone {
        if let Some(v) = t.tones {
            config.tone.tones = v;
            if t.palette.is_none() {
                config.tone.palette = palette::palette_for(v)?.into_iter().collect();
            }
        }
        if let Some(v) = t.palette {
            config.tone.palette = v;
        }
        if let Some(v) = t.alpha_cutoff {
            config.tone.alpha_cutoff = v;
        }
        if let Some(v) = t.mode {
            config.tone.mode = v;
        }
        if let Some(v) = t.fixed_thresholds {
            config.tone.fixed_thresholds = Some(v);
        }
        if let Some(v) = t.min_spacing {
            config.tone.min_spacing = v;
        }
    }

    if let Some(g) = file.geometry {
        if let Some(v) = g.output_size {
            config.geometry.output_size = v;
        }
        if let Some(v) = g.margin {
            config.geometry.margin = v;
        }
        if let Some(v) = g.h_stretch {
            config.geometry.h_stretch = v;
        }
        if let Some(v) = g.rotation_degrees {
            config.geometry.rotation_degrees = v;
        }
        if let Some(v) = g.crop_padding {
            config.geometry.crop_padding = v;
        }
        if let Some(v) = g.auto_crop {
            config.geometry.auto_crop = v;
        }
    }

    config.validate()?;
    Ok(config)
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read, parsed, or validated.
///
/// # Example
/// ```no_run
/// use s2a_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("sprite2ascii.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<ConvertConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    let config = parse_config(&content)
        .with_context(|| format!("Config invalide dans {}", path.display()))?;
    log::info!("Config chargée depuis {}", path.display());
    Ok(config)
}
