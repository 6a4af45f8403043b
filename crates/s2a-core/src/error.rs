use thiserror::Error;

/// Errors originating from the core module.
///
/// Every variant is raised before any pixel is touched: a conversion either
/// fails up front or runs to completion.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CoreError {
    /// Invalid configuration value or structure.
    #[error("Configuration invalide : {0}")]
    Config(String),

    /// Tone count outside the supported [2, 6] range.
    #[error("Nombre de tons invalide : {0} (attendu 2..=6)")]
    ToneCount(usize),

    /// Palette length does not match the tone count.
    #[error("Palette de {found} caractères pour {expected} tons")]
    PaletteMismatch {
        /// Number of tones configured.
        expected: usize,
        /// Number of characters supplied.
        found: usize,
    },

    /// Tone index not covered by the tone count of its map.
    #[error("Indice de ton {index} hors limites ({tones} tons)")]
    ToneOutOfRange {
        /// Offending index.
        index: u8,
        /// Number of tones in the map.
        tones: usize,
    },

    /// Invalid width/height dimensions.
    #[error("Dimensions invalides : {width}×{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// Referenced file does not exist.
    #[error("Fichier introuvable : {path}")]
    FileNotFound {
        /// Path that was not found.
        path: String,
    },

    /// File extension is not a decodable image format.
    #[error("Format non supporté : {path}")]
    UnsupportedFormat {
        /// Path with the unsupported extension.
        path: String,
    },
}
