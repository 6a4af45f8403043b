/// Character emitted for pixels under the alpha cutoff.
pub const TRANSPARENT_CHAR: char = '.';

/// Result of classifying one canvas pixel.
///
/// # Example
/// ```
/// use s2a_core::grid::ToneCell;
/// assert_eq!(ToneCell::default(), ToneCell::Transparent);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ToneCell {
    /// Alpha below the cutoff.
    #[default]
    Transparent,
    /// Tone bucket index, 0 = darkest.
    Tone(u8),
}

/// Grille d'indices de ton produite par le quantizer.
///
/// # Example
/// ```
/// use s2a_core::grid::{ToneCell, ToneMap};
/// let mut map = ToneMap::new(4, 4, 2);
/// map.set(1, 2, ToneCell::Tone(1));
/// assert_eq!(map.get(1, 2), ToneCell::Tone(1));
/// assert_eq!(map.get(0, 0), ToneCell::Transparent);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToneMap {
    /// Flat array of cells, row-major.
    pub cells: Vec<ToneCell>,
    /// Width in cells.
    pub width: u32,
    /// Height in cells.
    pub height: u32,
    /// Number of tone buckets the indices were drawn from.
    pub tones: usize,
}

impl ToneMap {
    /// Crée une grille entièrement transparente.
    #[must_use]
    pub fn new(width: u32, height: u32, tones: usize) -> Self {
        Self {
            cells: vec![ToneCell::Transparent; width as usize * height as usize],
            width,
            height,
            tones,
        }
    }

    /// Set a cell at position (x, y).
    #[inline(always)]
    pub fn set(&mut self, x: u32, y: u32, cell: ToneCell) {
        self.cells[y as usize * self.width as usize + x as usize] = cell;
    }

    /// Get the cell at position (x, y).
    #[inline(always)]
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> ToneCell {
        self.cells[y as usize * self.width as usize + x as usize]
    }
}

/// Grille de caractères finale, une cellule par pixel du canvas.
///
/// # Example
/// ```
/// use s2a_core::grid::ToneGrid;
/// let grid = ToneGrid::from_rows(&["#O", "O#"]).unwrap();
/// assert_eq!(grid.to_text(), "#O\nO#");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToneGrid {
    /// Flat array of characters, row-major.
    pub cells: Vec<char>,
    /// Width in characters.
    pub width: u32,
    /// Height in characters.
    pub height: u32,
}

impl ToneGrid {
    /// Crée une grille remplie de [`TRANSPARENT_CHAR`].
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            cells: vec![TRANSPARENT_CHAR; width as usize * height as usize],
            width,
            height,
        }
    }

    /// Build a grid from text rows. Returns `None` if rows have unequal widths.
    #[must_use]
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Option<Self> {
        let width = rows.first().map_or(0, |r| r.as_ref().chars().count());
        let mut cells = Vec::with_capacity(width * rows.len());
        for row in rows {
            let before = cells.len();
            cells.extend(row.as_ref().chars());
            if cells.len() - before != width {
                return None;
            }
        }
        Some(Self {
            cells,
            width: width as u32,
            height: rows.len() as u32,
        })
    }

    /// Set a character at position (x, y).
    #[inline(always)]
    pub fn set(&mut self, x: u32, y: u32, ch: char) {
        self.cells[y as usize * self.width as usize + x as usize] = ch;
    }

    /// Get the character at position (x, y).
    #[inline(always)]
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> char {
        self.cells[y as usize * self.width as usize + x as usize]
    }

    /// Rows as owned strings, top to bottom.
    #[must_use]
    pub fn rows(&self) -> Vec<String> {
        self.cells
            .chunks(self.width.max(1) as usize)
            .map(|row| row.iter().collect())
            .collect()
    }

    /// Text block: one line per row, `\n` between rows, no trailing newline.
    #[must_use]
    pub fn to_text(&self) -> String {
        self.rows().join("\n")
    }
}
