//! Conversion de bout en bout : image décodée → grille de caractères.

use std::path::Path;

use anyhow::{Context, Result};
use s2a_core::config::ConvertConfig;
use s2a_core::grid::ToneGrid;
use s2a_core::pixels::PixelBuffer;
use s2a_source::image::load_image;
use s2a_source::normalize;

use crate::quantize::quantize;
use crate::render::render;

/// Normalize → quantize → render, for one decoded sprite.
///
/// # Errors
/// Returns an error if `config` is invalid or resizing fails.
///
/// # Example
/// ```
/// use s2a_core::config::ConvertConfig;
/// use s2a_core::pixels::PixelBuffer;
/// use s2a_ascii::convert_image;
///
/// let sprite = PixelBuffer::filled(12, 6, [40, 40, 40, 255]);
/// let grid = convert_image(&sprite, &ConvertConfig::default()).unwrap();
/// assert_eq!((grid.width, grid.height), (48, 48));
/// ```
pub fn convert_image(image: &PixelBuffer, config: &ConvertConfig) -> Result<ToneGrid> {
    config.validate()?;
    let canvas = normalize(image, &config.geometry, config.tone.alpha_cutoff)?;
    let map = quantize(&canvas, &config.tone)?;
    Ok(render(&map, &config.tone.palette_chars())?)
}

/// Load `path` and convert it.
///
/// # Errors
/// Returns an error if the file cannot be decoded or the conversion fails.
pub fn convert_file(path: &Path, config: &ConvertConfig) -> Result<ToneGrid> {
    let image = load_image(path)?;
    convert_image(&image, config).with_context(|| format!("Conversion de {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use s2a_core::config::{GeometryConfig, ThresholdMode, ToneConfig};

    fn identity_geometry(size: u32) -> GeometryConfig {
        GeometryConfig {
            output_size: size,
            margin: 0,
            h_stretch: 1.0,
            rotation_degrees: 0.0,
            crop_padding: 2,
            auto_crop: true,
        }
    }

    fn quadrant_sprite() -> PixelBuffer {
        let mut img = PixelBuffer::filled(4, 4, [255, 255, 255, 255]);
        for y in 0..2 {
            for x in 0..2 {
                img.set_pixel(x, y, [0, 0, 0, 255]);
            }
        }
        img
    }

    #[test]
    fn quadrant_example_fixed() {
        let config = ConvertConfig {
            tone: ToneConfig {
                mode: ThresholdMode::Fixed,
                ..ToneConfig::with_tones(2).unwrap()
            },
            geometry: identity_geometry(4),
        };
        let grid = convert_image(&quadrant_sprite(), &config).unwrap();
        assert_eq!(grid.to_text(), "##OO\n##OO\nOOOO\nOOOO");
    }

    #[test]
    fn quadrant_example_adaptive() {
        let config = ConvertConfig {
            tone: ToneConfig::with_tones(2).unwrap(),
            geometry: identity_geometry(4),
        };
        let grid = convert_image(&quadrant_sprite(), &config).unwrap();
        assert_eq!(grid.rows(), vec!["##OO", "##OO", "OOOO", "OOOO"]);
    }

    #[test]
    fn output_is_size_by_size() {
        let mut sprite = PixelBuffer::new(37, 21);
        for x in 5..30 {
            sprite.set_pixel(x, 10, [(x * 8) as u8, 90, 40, 255]);
        }
        for size in [8, 32, 48] {
            let config = ConvertConfig {
                geometry: GeometryConfig {
                    output_size: size,
                    ..GeometryConfig::default()
                },
                ..ConvertConfig::default()
            };
            let text = convert_image(&sprite, &config).unwrap().to_text();
            let lines: Vec<_> = text.lines().collect();
            assert_eq!(lines.len(), size as usize);
            assert!(lines.iter().all(|l| l.chars().count() == size as usize));
        }
    }

    #[test]
    fn empty_sprite_is_all_dots() {
        let sprite = PixelBuffer::new(20, 20);
        let grid = convert_image(&sprite, &ConvertConfig::default()).unwrap();
        assert_eq!(grid.width, 48);
        assert!(grid.cells.iter().all(|&c| c == '.'));
    }

    #[test]
    fn faint_pixels_always_render_transparent() {
        let mut sprite = PixelBuffer::filled(6, 6, [0, 0, 0, 255]);
        sprite.set_pixel(2, 2, [255, 255, 255, 10]);
        sprite.set_pixel(3, 4, [0, 0, 0, 31]);
        let config = ConvertConfig {
            geometry: identity_geometry(6),
            ..ConvertConfig::default()
        };
        let grid = convert_image(&sprite, &config).unwrap();
        assert_eq!(grid.get(2, 2), '.');
        assert_eq!(grid.get(3, 4), '.');
        assert_ne!(grid.get(0, 0), '.');
    }

    #[test]
    fn invalid_config_fails_before_processing() {
        let config = ConvertConfig {
            tone: ToneConfig {
                palette: "#O".into(),
                ..ToneConfig::default()
            },
            ..ConvertConfig::default()
        };
        assert!(convert_image(&quadrant_sprite(), &config).is_err());
    }

    #[test]
    fn convert_file_reports_missing_input() {
        let missing = Path::new("/nonexistent/shark.webp");
        assert!(convert_file(missing, &ConvertConfig::default()).is_err());
    }

    #[test]
    fn convert_file_decodes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dot.png");
        image::RgbaImage::from_pixel(8, 8, image::Rgba([0, 0, 0, 255]))
            .save(&path)
            .unwrap();
        let config = ConvertConfig {
            geometry: GeometryConfig {
                output_size: 8,
                margin: 1,
                ..GeometryConfig::default()
            },
            ..ConvertConfig::default()
        };
        let grid = convert_file(&path, &config).unwrap();
        assert_eq!(grid.rows()[0], "........");
        // Flat sprite: every quantile is 0, so luma 0 sits on the first cut point
        assert_eq!(grid.get(4, 4), '@');
    }
}
