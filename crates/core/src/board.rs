//! Board module - manages the game grid
//!
//! The board is a `width x height` grid where each cell is empty or holds one
//! colored blob. Cells live in a flat row-major vector sized once at creation.
//! Coordinates: (x, y) where x grows left to right and y grows top to bottom;
//! row 0 is the spawn row.

use std::fmt;

use crate::types::{Cell, Color, GameConfig};

/// The game grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: u8,
    height: u8,
    /// Flat array of cells, row-major order (y * width + x)
    cells: Vec<Cell>,
}

impl Board {
    /// Create a new empty board
    pub fn new(width: u8, height: u8) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::Empty; width as usize * height as usize],
        }
    }

    /// Create an empty board sized by `config`
    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.width, config.height)
    }

    /// Build a board from text rows, top row first.
    ///
    /// `.` is empty and `R G B Y P` are colors. All rows must have the same
    /// length; any other character or a ragged row yields `None`.
    ///
    /// ```
    /// use puyo_sim_core::Board;
    /// use puyo_sim_core::types::{Cell, Color};
    ///
    /// let board = Board::from_rows(&["..", "RG"]).unwrap();
    /// assert_eq!(board.get(1, 1), Some(Cell::Colored(Color::Green)));
    /// ```
    pub fn from_rows(rows: &[&str]) -> Option<Self> {
        let height = u8::try_from(rows.len()).ok()?;
        let width = u8::try_from(rows.first()?.chars().count()).ok()?;
        let mut board = Self::new(width, height);

        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != width as usize {
                return None;
            }
            for (x, ch) in row.chars().enumerate() {
                let cell = match ch {
                    '.' => Cell::Empty,
                    other => Cell::Colored(Color::from_char(other)?),
                };
                board.cells[y * width as usize + x] = cell;
            }
        }

        Some(board)
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(&self, x: i16, y: i16) -> Option<usize> {
        if !self.is_in_bounds(x, y) {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// Check if (x, y) lies on the grid
    pub fn is_in_bounds(&self, x: i16, y: i16) -> bool {
        x >= 0 && x < self.width as i16 && y >= 0 && y < self.height as i16
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i16, y: i16) -> Option<Cell> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Check if position is occupied (within bounds and colored)
    pub fn is_occupied(&self, x: i16, y: i16) -> bool {
        matches!(self.get(x, y), Some(Cell::Colored(_)))
    }

    /// Place a colored blob at (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i16, y: i16, color: Color) -> bool {
        self.put(x, y, Cell::Colored(color))
    }

    /// Empty the cell at (x, y)
    /// Returns false if out of bounds
    pub fn clear_cell(&mut self, x: i16, y: i16) -> bool {
        self.put(x, y, Cell::Empty)
    }

    fn put(&mut self, x: i16, y: i16, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Set every cell to empty
    pub fn reset(&mut self) {
        self.cells.fill(Cell::Empty);
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// One row of cells, left to right
    pub fn row(&self, y: usize) -> Option<&[Cell]> {
        if y >= self.height as usize {
            return None;
        }
        let start = y * self.width as usize;
        Some(&self.cells[start..start + self.width as usize])
    }

    /// Number of colored cells
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_colored()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Cell::is_empty)
    }

    /// True when no colored cell sits directly above an empty one
    pub fn is_settled(&self) -> bool {
        let width = self.width as usize;
        (1..self.height as usize).all(|y| {
            (0..width).all(|x| {
                let above = self.cells[(y - 1) * width + x];
                let here = self.cells[y * width + x];
                !(above.is_colored() && here.is_empty())
            })
        })
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::from_config(&GameConfig::default())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.width.max(1) as usize) {
            for cell in row {
                write!(f, "{}", cell.as_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_index_calculation() {
        let board = Board::new(6, 12);
        assert_eq!(board.index(0, 0), Some(0));
        assert_eq!(board.index(5, 0), Some(5));
        assert_eq!(board.index(0, 1), Some(6));
        assert_eq!(board.index(5, 11), Some(71));
        assert_eq!(board.index(-1, 0), None);
        assert_eq!(board.index(6, 0), None);
        assert_eq!(board.index(0, 12), None);
    }

    #[test]
    fn test_board_flat_array() {
        let mut board = Board::new(6, 12);

        board.set(0, 0, Color::Red);
        board.set(3, 10, Color::Blue);

        assert_eq!(board.get(0, 0), Some(Cell::Colored(Color::Red)));
        assert_eq!(board.get(3, 10), Some(Cell::Colored(Color::Blue)));

        assert_eq!(board.cells[0], Cell::Colored(Color::Red));
        assert_eq!(board.cells[10 * 6 + 3], Cell::Colored(Color::Blue));
    }

    #[test]
    fn test_display_matches_from_rows() {
        let rows = ["...", ".R.", "GBY"];
        let board = Board::from_rows(&rows).unwrap();
        assert_eq!(board.to_string(), "...\n.R.\nGBY\n");
    }

    #[test]
    fn test_from_rows_rejects_bad_input() {
        assert!(Board::from_rows(&[]).is_none());
        assert!(Board::from_rows(&["..", "..."]).is_none());
        assert!(Board::from_rows(&[".X"]).is_none());
    }

    #[test]
    fn test_is_settled() {
        let floating = Board::from_rows(&["R.", "..", ".G"]).unwrap();
        assert!(!floating.is_settled());

        let packed = Board::from_rows(&["..", "R.", "RG"]).unwrap();
        assert!(packed.is_settled());
    }
}
