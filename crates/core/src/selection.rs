use serde::{Deserialize, Serialize};

/// A rectangular range of cells, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub start_row: usize,
    pub start_col: usize,
    pub end_row: usize,
    pub end_col: usize,
}

impl Range {
    /// Create a new range, automatically normalizing so start <= end.
    pub fn new(r1: usize, c1: usize, r2: usize, c2: usize) -> Self {
        Self {
            start_row: r1.min(r2),
            start_col: c1.min(c2),
            end_row: r1.max(r2),
            end_col: c1.max(c2),
        }
    }

    /// Create a single-cell range.
    pub fn single(row: usize, col: usize) -> Self {
        Self {
            start_row: row,
            start_col: col,
            end_row: row,
            end_col: col,
        }
    }

    /// Check if this range contains a cell.
    pub fn contains(&self, row: usize, col: usize) -> bool {
        row >= self.start_row && row <= self.end_row &&
        col >= self.start_col && col <= self.end_col
    }

    /// Check if this is a single cell.
    pub fn is_single(&self) -> bool {
        self.start_row == self.end_row && self.start_col == self.end_col
    }

    pub fn row_span(&self) -> usize {
        self.end_row - self.start_row + 1
    }

    pub fn col_span(&self) -> usize {
        self.end_col - self.start_col + 1
    }

    /// Number of cells in this range.
    pub fn cell_count(&self) -> usize {
        self.row_span() * self.col_span()
    }

    /// Iterate over all cells in this range (row-major order).
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> {
        let start_row = self.start_row;
        let end_row = self.end_row;
        let start_col = self.start_col;
        let end_col = self.end_col;

        (start_row..=end_row).flat_map(move |r| {
            (start_col..=end_col).map(move |c| (r, c))
        })
    }
}

/// The selection model: one active cell, optionally extended to a range.
///
/// The anchor is the cell the extension started from; extending always
/// produces a normalized range regardless of which corner was clicked first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    active: (usize, usize),
    anchor: (usize, usize),
    range: Option<Range>,
}

impl Selection {
    /// Create a new selection with a single cell.
    pub fn new(row: usize, col: usize) -> Self {
        Self {
            active: (row, col),
            anchor: (row, col),
            range: None,
        }
    }

    /// The active cell.
    pub fn active(&self) -> (usize, usize) {
        self.active
    }

    /// The anchor cell (for extending selections).
    pub fn anchor(&self) -> (usize, usize) {
        self.anchor
    }

    /// The extended range, if any.
    pub fn range(&self) -> Option<Range> {
        self.range
    }

    /// The selection as a range: the extension if present, else the
    /// active cell as a single-cell range.
    pub fn effective_range(&self) -> Range {
        self.range
            .unwrap_or_else(|| Range::single(self.active.0, self.active.1))
    }

    /// Check if a cell is selected.
    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.effective_range().contains(row, col)
    }

    /// Set selection to a single cell (plain click), clearing any range.
    pub fn select_cell(&mut self, row: usize, col: usize) {
        self.active = (row, col);
        self.anchor = (row, col);
        self.range = None;
    }

    /// Extend from the anchor to the given cell (shift+click).
    pub fn extend_to(&mut self, row: usize, col: usize) {
        let (anchor_row, anchor_col) = self.anchor;
        self.range = Some(Range::new(anchor_row, anchor_col, row, col));
    }

    /// Move the active cell by delta, clamped to the grid bounds,
    /// collapsing any range extension.
    pub fn move_by(&mut self, d_row: isize, d_col: isize, rows: usize, cols: usize) {
        let (row, col) = self.active;
        let last_row = rows.saturating_sub(1) as isize;
        let last_col = cols.saturating_sub(1) as isize;
        let new_row = (row as isize + d_row).clamp(0, last_row) as usize;
        let new_col = (col as isize + d_col).clamp(0, last_col) as usize;
        self.select_cell(new_row, new_col);
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_single() {
        let r = Range::single(5, 3);
        assert!(r.contains(5, 3));
        assert!(!r.contains(5, 4));
        assert!(r.is_single());
        assert_eq!(r.cell_count(), 1);
    }

    #[test]
    fn test_range_normalizes() {
        let r = Range::new(5, 5, 1, 1);
        assert_eq!(r.start_row, 1);
        assert_eq!(r.start_col, 1);
        assert_eq!(r.end_row, 5);
        assert_eq!(r.end_col, 5);
    }

    #[test]
    fn test_range_normalizes_mixed_corners() {
        // Bottom-left to top-right still yields start <= end on both axes
        let r = Range::new(7, 1, 2, 4);
        assert_eq!((r.start_row, r.end_row), (2, 7));
        assert_eq!((r.start_col, r.end_col), (1, 4));
    }

    #[test]
    fn test_range_cells_row_major() {
        let r = Range::new(1, 1, 2, 2);
        let cells: Vec<_> = r.cells().collect();
        assert_eq!(cells, vec![(1, 1), (1, 2), (2, 1), (2, 2)]);
    }

    #[test]
    fn test_selection_extend() {
        let mut sel = Selection::new(2, 2);
        sel.extend_to(4, 5);

        assert_eq!(sel.anchor(), (2, 2));
        assert!(sel.contains(2, 2));
        assert!(sel.contains(3, 3));
        assert!(sel.contains(4, 5));
        assert!(!sel.contains(1, 1));
    }

    #[test]
    fn test_selection_extend_backwards_normalizes() {
        let mut sel = Selection::new(4, 5);
        sel.extend_to(1, 2);

        let range = sel.range().unwrap();
        assert!(range.start_row <= range.end_row);
        assert!(range.start_col <= range.end_col);
        assert_eq!((range.start_row, range.start_col), (1, 2));
        assert_eq!((range.end_row, range.end_col), (4, 5));
    }

    #[test]
    fn test_move_clamps_to_bounds() {
        let mut sel = Selection::new(0, 0);
        sel.move_by(-1, -1, 10, 10);
        assert_eq!(sel.active(), (0, 0));

        sel.move_by(100, 100, 10, 10);
        assert_eq!(sel.active(), (9, 9));
    }

    #[test]
    fn test_move_collapses_range() {
        let mut sel = Selection::new(2, 2);
        sel.extend_to(5, 5);
        assert!(sel.range().is_some());

        sel.move_by(1, 0, 10, 10);
        assert!(sel.range().is_none());
        assert_eq!(sel.active(), (3, 2));
    }
}
