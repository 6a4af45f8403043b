use s2a_core::error::CoreError;
use s2a_core::grid::{TRANSPARENT_CHAR, ToneCell, ToneGrid, ToneMap};

/// Map tone indices to palette characters; transparent cells become `.`.
///
/// # Errors
/// Returns [`CoreError::PaletteMismatch`] if `palette` does not hold exactly
/// one character per tone of `map`, [`CoreError::ToneOutOfRange`] if a cell
/// points past the last tone.
///
/// # Example
/// ```
/// use s2a_core::grid::{ToneCell, ToneMap};
/// use s2a_ascii::render;
///
/// let mut map = ToneMap::new(3, 1, 2);
/// map.set(0, 0, ToneCell::Tone(0));
/// map.set(1, 0, ToneCell::Tone(1));
/// let grid = render(&map, &['#', 'O']).unwrap();
/// assert_eq!(grid.to_text(), "#O.");
/// ```
pub fn render(map: &ToneMap, palette: &[char]) -> Result<ToneGrid, CoreError> {
    if palette.len() != map.tones {
        return Err(CoreError::PaletteMismatch {
            expected: map.tones,
            found: palette.len(),
        });
    }

    let mut grid = ToneGrid::new(map.width, map.height);
    for (ch, cell) in grid.cells.iter_mut().zip(&map.cells) {
        *ch = match *cell {
            ToneCell::Transparent => TRANSPARENT_CHAR,
            ToneCell::Tone(i) => *palette.get(i as usize).ok_or(CoreError::ToneOutOfRange {
                index: i,
                tones: map.tones,
            })?,
        };
    }
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_wrong_palette_length() {
        let map = ToneMap::new(2, 2, 4);
        assert_eq!(
            render(&map, &['#', 'O']),
            Err(CoreError::PaletteMismatch {
                expected: 4,
                found: 2
            })
        );
    }

    #[test]
    fn index_past_last_tone_is_an_error() {
        let mut map = ToneMap::new(2, 1, 2);
        map.set(0, 0, ToneCell::Tone(1));
        map.set(1, 0, ToneCell::Tone(2));
        assert_eq!(
            render(&map, &['#', 'O']),
            Err(CoreError::ToneOutOfRange { index: 2, tones: 2 })
        );
    }

    #[test]
    fn rows_are_top_to_bottom() {
        let mut map = ToneMap::new(2, 3, 4);
        map.set(0, 0, ToneCell::Tone(3));
        map.set(1, 2, ToneCell::Tone(0));
        let grid = render(&map, &['#', '@', 'o', 'O']).unwrap();
        assert_eq!(grid.rows(), vec!["O.", "..", ".#"]);
    }

    #[test]
    fn all_transparent_is_all_dots() {
        let map = ToneMap::new(5, 5, 3);
        let grid = render(&map, &['#', 'o', 'O']).unwrap();
        assert!(grid.cells.iter().all(|&c| c == '.'));
        assert_eq!(grid.to_text().lines().count(), 5);
    }
}
