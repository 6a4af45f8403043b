use crate::error::CoreError;

/// Fewest tones a palette may hold.
pub const MIN_TONES: usize = 2;
/// Most tones a palette may hold.
pub const MAX_TONES: usize = 6;

/// 2 tons — silhouette.
pub const PALETTE_2: &str = "#O";

/// 3 tons.
pub const PALETTE_3: &str = "#oO";

/// 4 tons — DMG classique (noir, foncé, clair, blanc).
pub const PALETTE_4: &str = "#@oO";

/// Rampe sombre→clair utilisée pour générer les autres palettes.
pub const TONE_RAMP: &str = "#@%&8Oo*+=-:";

/// Return the dark→light tone characters for `tones` buckets.
///
/// 2, 3 and 4 tones come from the built-in table; other counts in range are
/// sampled evenly from [`TONE_RAMP`].
///
/// # Errors
/// Returns [`CoreError::ToneCount`] if `tones` is outside `[2, 6]`.
///
/// # Example
/// ```
/// use s2a_core::palette::palette_for;
/// assert_eq!(palette_for(4).unwrap(), vec!['#', '@', 'o', 'O']);
/// assert_eq!(palette_for(6).unwrap().len(), 6);
/// assert!(palette_for(7).is_err());
/// ```
pub fn palette_for(tones: usize) -> Result<Vec<char>, CoreError> {
    if !(MIN_TONES..=MAX_TONES).contains(&tones) {
        return Err(CoreError::ToneCount(tones));
    }
    let chars = match tones {
        2 => PALETTE_2.chars().collect(),
        3 => PALETTE_3.chars().collect(),
        4 => PALETTE_4.chars().collect(),
        n => {
            let ramp: Vec<char> = TONE_RAMP.chars().collect();
            let last = ramp.len() - 1;
            (0..n).map(|i| ramp[i * last / (n - 1)]).collect()
        }
    };
    Ok(chars)
}

/// Check that `palette` can render `tones` buckets.
///
/// # Errors
/// Returns [`CoreError::ToneCount`] for an out-of-range tone count,
/// [`CoreError::PaletteMismatch`] when the lengths differ, and
/// [`CoreError::Config`] when the palette reuses the transparent `.` or
/// repeats a character.
pub fn validate_palette(palette: &[char], tones: usize) -> Result<(), CoreError> {
    if !(MIN_TONES..=MAX_TONES).contains(&tones) {
        return Err(CoreError::ToneCount(tones));
    }
    if palette.len() != tones {
        return Err(CoreError::PaletteMismatch {
            expected: tones,
            found: palette.len(),
        });
    }
    if palette.contains(&crate::grid::TRANSPARENT_CHAR) {
        return Err(CoreError::Config(
            "la palette ne peut pas contenir '.' (réservé à la transparence)".into(),
        ));
    }
    for (i, ch) in palette.iter().enumerate() {
        if palette[..i].contains(ch) {
            return Err(CoreError::Config(format!(
                "caractère '{ch}' répété dans la palette"
            )));
        }
    }
    Ok(())
}
