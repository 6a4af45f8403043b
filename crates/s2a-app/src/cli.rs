use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use s2a_ascii::OutputFormat;
use s2a_core::config::{ConvertConfig, ThresholdMode};
use s2a_core::palette::palette_for;

/// sprite2ascii — converts sprites into retro tone grids.
///
/// Without FILES, every image in --input-dir is converted into --output-dir.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Images à convertir (PNG, JPEG, BMP, GIF, WebP).
    pub files: Vec<PathBuf>,

    /// Horizontal stretch factor (1.0 = normal, 1.5 = 50% wider).
    #[arg(short = 's', long)]
    pub stretch: Option<f64>,

    /// Counter-clockwise rotation in degrees.
    #[arg(short = 'r', long, allow_negative_numbers = true)]
    pub rotate: Option<f32>,

    /// Transparent margin around the sprite, in pixels.
    #[arg(short = 'm', long)]
    pub margin: Option<u32>,

    /// Side of the square output grid.
    #[arg(long)]
    pub size: Option<u32>,

    /// Nombre de tons (2 à 6).
    #[arg(long)]
    pub tones: Option<usize>,

    /// Tone characters, darkest first. Length must match --tones.
    #[arg(long)]
    pub palette: Option<String>,

    /// Use fixed thresholds instead of adaptive quantiles.
    #[arg(long, default_value_t = false)]
    pub fixed: bool,

    /// Explicit fixed thresholds, comma separated (implies --fixed).
    #[arg(long, value_delimiter = ',')]
    pub thresholds: Option<Vec<u8>>,

    /// Pixels with alpha below this render as '.'.
    #[arg(long)]
    pub alpha_cutoff: Option<u8>,

    /// Padding kept around the content box when cropping.
    #[arg(long)]
    pub crop_padding: Option<u32>,

    /// Disable cropping to content.
    #[arg(long, default_value_t = false)]
    pub no_crop: bool,

    /// Output format: text, typescript, json.
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Dossier source du mode batch.
    #[arg(long, default_value = "assets/references")]
    pub input_dir: PathBuf,

    /// Dossier de sortie du mode batch.
    #[arg(long, default_value = "output_ascii")]
    pub output_dir: PathBuf,

    /// Walk --input-dir recursively.
    #[arg(long, default_value_t = false)]
    pub recursive: bool,

    /// Fichier de configuration TOML.
    #[arg(short, long, default_value = "sprite2ascii.toml")]
    pub config: PathBuf,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    /// Apply command-line overrides on top of the loaded configuration.
    ///
    /// `--tones` without `--palette` switches to the built-in palette for that
    /// count.
    ///
    /// # Errors
    /// Returns an error if `--tones` is out of range.
    pub fn apply_overrides(&self, config: &mut ConvertConfig) -> Result<()> {
        let geo = &mut config.geometry;
        if let Some(v) = self.stretch {
            geo.h_stretch = v;
        }
        if let Some(v) = self.rotate {
            geo.rotation_degrees = v;
        }
        if let Some(v) = self.margin {
            geo.margin = v;
        }
        if let Some(v) = self.size {
            geo.output_size = v;
        }
        if let Some(v) = self.crop_padding {
            geo.crop_padding = v;
        }
        if self.no_crop {
            geo.auto_crop = false;
        }

        let tone = &mut config.tone;
        if let Some(n) = self.tones {
            tone.tones = n;
            if self.palette.is_none() {
                tone.palette = palette_for(n)?.into_iter().collect();
            }
        }
        if let Some(ref p) = self.palette {
            tone.palette.clone_from(p);
        }
        if let Some(v) = self.alpha_cutoff {
            tone.alpha_cutoff = v;
        }
        if self.fixed {
            tone.mode = ThresholdMode::Fixed;
        }
        if let Some(ref t) = self.thresholds {
            tone.mode = ThresholdMode::Fixed;
            tone.fixed_thresholds = Some(t.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_flags_accept_attached_values() {
        let cli = Cli::parse_from(["sprite2ascii", "-s1.5", "--rotate=-30", "-m3", "a.webp"]);
        assert_eq!(cli.stretch, Some(1.5));
        assert_eq!(cli.rotate, Some(-30.0));
        assert_eq!(cli.margin, Some(3));
        assert_eq!(cli.files, vec![PathBuf::from("a.webp")]);
    }

    #[test]
    fn tones_pick_matching_palette() {
        let cli = Cli::parse_from(["sprite2ascii", "--tones", "2"]);
        let mut config = ConvertConfig::default();
        cli.apply_overrides(&mut config).unwrap();
        assert_eq!(config.tone.palette, "#O");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn thresholds_imply_fixed() {
        let cli = Cli::parse_from(["sprite2ascii", "--thresholds", "50,100,150"]);
        let mut config = ConvertConfig::default();
        cli.apply_overrides(&mut config).unwrap();
        assert_eq!(config.tone.mode, ThresholdMode::Fixed);
        assert_eq!(config.tone.fixed_thresholds, Some(vec![50, 100, 150]));
    }

    #[test]
    fn out_of_range_tones_error() {
        let cli = Cli::parse_from(["sprite2ascii", "--tones", "9"]);
        let mut config = ConvertConfig::default();
        assert!(cli.apply_overrides(&mut config).is_err());
    }

    #[test]
    fn format_parses() {
        let cli = Cli::parse_from(["sprite2ascii", "--format", "json"]);
        assert_eq!(cli.format, Some(OutputFormat::Json));
    }
}
