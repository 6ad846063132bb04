use std::collections::HashMap;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::cell::{Cell, CellPatch};

/// A rectangular merged region, inclusive on both ends.
///
/// The cell at `start` is the origin and the only one holding content;
/// every other coordinate inside the rectangle is covered and renders as
/// part of the origin's span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeRegion {
    pub start: (usize, usize),
    pub end: (usize, usize),
}

impl MergeRegion {
    /// Create a region, normalizing so start <= end on both axes.
    pub fn new(r1: usize, c1: usize, r2: usize, c2: usize) -> Self {
        Self {
            start: (r1.min(r2), c1.min(c2)),
            end: (r1.max(r2), c1.max(c2)),
        }
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        row >= self.start.0 && row <= self.end.0 && col >= self.start.1 && col <= self.end.1
    }

    pub fn is_origin(&self, row: usize, col: usize) -> bool {
        (row, col) == self.start
    }

    pub fn row_span(&self) -> usize {
        self.end.0 - self.start.0 + 1
    }

    pub fn col_span(&self) -> usize {
        self.end.1 - self.start.1 + 1
    }

    pub fn is_single_cell(&self) -> bool {
        self.start == self.end
    }

    fn intersects(&self, other: &MergeRegion) -> bool {
        self.start.0 <= other.end.0
            && self.end.0 >= other.start.0
            && self.start.1 <= other.end.1
            && self.end.1 >= other.start.1
    }
}

/// The template grid: a sparse cell store plus merged regions, row/column
/// sizing, and field-to-address mappings.
///
/// `rows`/`cols` are soft bounds owned by the grid; writes outside them are
/// rejected as no-ops. Structural mutation grows and shrinks the bounds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    cells: FxHashMap<(usize, usize), Cell>,
    pub rows: usize,
    pub cols: usize,
    pub merges: Vec<MergeRegion>,
    pub row_heights: FxHashMap<usize, f64>,
    pub col_widths: FxHashMap<usize, f64>,
    /// Logical field key -> display address ("patientName" -> "M9").
    /// Opaque to the engine; consumed by the external form-filling process.
    pub field_mappings: HashMap<String, String>,
}

impl Sheet {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            cells: FxHashMap::default(),
            rows: rows.max(1),
            cols: cols.max(1),
            merges: Vec::new(),
            row_heights: FxHashMap::default(),
            col_widths: FxHashMap::default(),
            field_mappings: HashMap::new(),
        }
    }

    pub fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }

    // =========================================================================
    // Cell store
    // =========================================================================

    pub fn get_cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.cells.get(&(row, col))
    }

    /// Clone-getter: returns a default empty cell when not stored.
    pub fn cell_or_default(&self, row: usize, col: usize) -> Cell {
        self.cells.get(&(row, col)).cloned().unwrap_or_default()
    }

    /// The cell's text value, empty when the cell is absent.
    pub fn value(&self, row: usize, col: usize) -> String {
        self.cells
            .get(&(row, col))
            .map(|c| c.value.clone())
            .unwrap_or_default()
    }

    /// Set the cell's text value. Out-of-bounds writes are no-ops.
    pub fn set_value(&mut self, row: usize, col: usize, value: &str) {
        if !self.in_bounds(row, col) {
            return;
        }
        if value.is_empty() {
            self.clear_value(row, col);
            return;
        }
        let cell = self.cells.entry((row, col)).or_insert_with(Cell::new);
        cell.value = value.to_string();
    }

    /// Merge a partial update into the cell, creating it if absent.
    /// Sub-records (font, alignment) merge key-by-key.
    /// Out-of-bounds writes are no-ops.
    pub fn update_cell(&mut self, row: usize, col: usize, patch: &CellPatch) {
        if !self.in_bounds(row, col) {
            return;
        }
        let cell = self.cells.entry((row, col)).or_insert_with(Cell::new);
        cell.apply(patch);
        self.prune(row, col);
    }

    /// Replace the cell wholesale. An empty cell removes the entry.
    pub fn put_cell(&mut self, row: usize, col: usize, cell: Cell) {
        if !self.in_bounds(row, col) {
            return;
        }
        if cell.is_empty() {
            self.cells.remove(&(row, col));
        } else {
            self.cells.insert((row, col), cell);
        }
    }

    /// Clear the cell's text value only. Styles and image survive;
    /// clearing content and clearing formatting are distinct operations.
    pub fn clear_value(&mut self, row: usize, col: usize) {
        if let Some(cell) = self.cells.get_mut(&(row, col)) {
            cell.value.clear();
        }
        self.prune(row, col);
    }

    /// Reset the cell's font/fill/alignment to defaults. The value and
    /// image survive.
    pub fn clear_formatting(&mut self, row: usize, col: usize) {
        if let Some(cell) = self.cells.get_mut(&(row, col)) {
            cell.font = Default::default();
            cell.fill = Default::default();
            cell.alignment = Default::default();
        }
        self.prune(row, col);
    }

    /// Remove the map entry if the cell has become fully empty.
    fn prune(&mut self, row: usize, col: usize) {
        if self.cells.get(&(row, col)).is_some_and(|c| c.is_empty()) {
            self.cells.remove(&(row, col));
        }
    }

    /// Iterate over all populated cells.
    pub fn cells_iter(&self) -> impl Iterator<Item = (&(usize, usize), &Cell)> {
        self.cells.iter()
    }

    pub fn populated_count(&self) -> usize {
        self.cells.len()
    }

    // =========================================================================
    // Merge registry
    // =========================================================================

    /// The merge region containing a coordinate, if any. Regions never
    /// overlap, so the first hit is the only one.
    pub fn merge_at(&self, row: usize, col: usize) -> Option<&MergeRegion> {
        self.merges.iter().find(|m| m.contains(row, col))
    }

    /// True when the coordinate is inside a merge but not its origin.
    /// Covered cells hold no independent content and are never the target
    /// of direct edits.
    pub fn is_covered(&self, row: usize, col: usize) -> bool {
        self.merge_at(row, col)
            .is_some_and(|m| !m.is_origin(row, col))
    }

    /// Resolve a coordinate to the origin of its merge region, or itself
    /// when unmerged.
    pub fn merge_origin(&self, row: usize, col: usize) -> (usize, usize) {
        self.merge_at(row, col).map(|m| m.start).unwrap_or((row, col))
    }

    /// Register a merge region. Single-cell regions and regions that
    /// overlap an existing one are rejected.
    pub fn add_merge(&mut self, region: MergeRegion) -> Result<(), String> {
        if region.is_single_cell() {
            return Err("Select a range of cells to merge".to_string());
        }
        if !self.in_bounds(region.end.0, region.end.1) {
            return Err("Merge range extends outside the grid".to_string());
        }
        if self.merges.iter().any(|m| m.intersects(&region)) {
            return Err("Range overlaps existing merged cells. Unmerge first.".to_string());
        }
        self.merges.push(region);
        Ok(())
    }

    /// Remove the merge region whose origin is the given coordinate.
    pub fn remove_merge(&mut self, origin: (usize, usize)) -> bool {
        let before = self.merges.len();
        self.merges.retain(|m| m.start != origin);
        self.merges.len() != before
    }

    // =========================================================================
    // Structure mutation
    // =========================================================================

    /// Insert rows at the given position, shifting cells, merges, and row
    /// heights down and growing the row bound.
    ///
    /// All new positions are computed from the pre-mutation snapshot before
    /// anything is written back, so no cell is ever shifted twice.
    pub fn insert_rows(&mut self, at_row: usize, count: usize) {
        if count == 0 {
            return;
        }
        self.rows += count;

        let shifted: Vec<_> = self
            .cells
            .iter()
            .filter(|((r, _), _)| *r >= at_row)
            .map(|(&pos, cell)| (pos, cell.clone()))
            .collect();
        for (pos, _) in &shifted {
            self.cells.remove(pos);
        }
        for ((r, c), cell) in shifted {
            self.cells.insert((r + count, c), cell);
        }

        for merge in &mut self.merges {
            if merge.start.0 >= at_row {
                merge.start.0 += count;
                merge.end.0 += count;
            } else if merge.end.0 >= at_row {
                // Insertion inside the region: it grows
                merge.end.0 += count;
            }
        }

        shift_axis_sizes_on_insert(&mut self.row_heights, at_row, count);
    }

    /// Delete rows at the given position. Cells in the deleted rows are
    /// dropped; everything below shifts up; the row bound shrinks
    /// (floored at 1).
    pub fn delete_rows(&mut self, at_row: usize, count: usize) {
        if count == 0 || at_row >= self.rows {
            return;
        }
        let count = count.min(self.rows - at_row);
        self.rows = (self.rows - count).max(1);

        self.cells.retain(|(r, _), _| *r < at_row || *r >= at_row + count);
        let shifted: Vec<_> = self
            .cells
            .iter()
            .filter(|((r, _), _)| *r >= at_row + count)
            .map(|(&pos, cell)| (pos, cell.clone()))
            .collect();
        for (pos, _) in &shifted {
            self.cells.remove(pos);
        }
        for ((r, c), cell) in shifted {
            self.cells.insert((r - count, c), cell);
        }

        self.merges = self
            .merges
            .iter()
            .filter_map(|m| remap_region_on_delete(m, at_row, count, Axis::Row))
            .collect();

        shift_axis_sizes_on_delete(&mut self.row_heights, at_row, count);
    }

    /// Insert columns at the given position, shifting cells, merges, and
    /// column widths right and growing the column bound.
    pub fn insert_cols(&mut self, at_col: usize, count: usize) {
        if count == 0 {
            return;
        }
        self.cols += count;

        let shifted: Vec<_> = self
            .cells
            .iter()
            .filter(|((_, c), _)| *c >= at_col)
            .map(|(&pos, cell)| (pos, cell.clone()))
            .collect();
        for (pos, _) in &shifted {
            self.cells.remove(pos);
        }
        for ((r, c), cell) in shifted {
            self.cells.insert((r, c + count), cell);
        }

        for merge in &mut self.merges {
            if merge.start.1 >= at_col {
                merge.start.1 += count;
                merge.end.1 += count;
            } else if merge.end.1 >= at_col {
                merge.end.1 += count;
            }
        }

        shift_axis_sizes_on_insert(&mut self.col_widths, at_col, count);
    }

    /// Delete columns at the given position. Cells in the deleted columns
    /// are dropped; everything to the right shifts left; the column bound
    /// shrinks (floored at 1).
    pub fn delete_cols(&mut self, at_col: usize, count: usize) {
        if count == 0 || at_col >= self.cols {
            return;
        }
        let count = count.min(self.cols - at_col);
        self.cols = (self.cols - count).max(1);

        self.cells.retain(|(_, c), _| *c < at_col || *c >= at_col + count);
        let shifted: Vec<_> = self
            .cells
            .iter()
            .filter(|((_, c), _)| *c >= at_col + count)
            .map(|(&pos, cell)| (pos, cell.clone()))
            .collect();
        for (pos, _) in &shifted {
            self.cells.remove(pos);
        }
        for ((r, c), cell) in shifted {
            self.cells.insert((r, c - count), cell);
        }

        self.merges = self
            .merges
            .iter()
            .filter_map(|m| remap_region_on_delete(m, at_col, count, Axis::Col))
            .collect();

        shift_axis_sizes_on_delete(&mut self.col_widths, at_col, count);
    }
}

#[derive(Clone, Copy)]
enum Axis {
    Row,
    Col,
}

/// Remap a merge region across a deletion of `count` indices starting at
/// `at` on the given axis. Returns `None` when the region disappears
/// (fully deleted, or reduced to a single cell).
fn remap_region_on_delete(
    region: &MergeRegion,
    at: usize,
    count: usize,
    axis: Axis,
) -> Option<MergeRegion> {
    let (start, end) = match axis {
        Axis::Row => (region.start.0, region.end.0),
        Axis::Col => (region.start.1, region.end.1),
    };

    // Fully inside the deleted span
    if start >= at && end < at + count {
        return None;
    }

    let map_start = if start < at {
        start
    } else if start < at + count {
        at
    } else {
        start - count
    };
    // `end` inside the deleted span clamps to the last surviving index
    // before the cut; `at == 0` with end inside can't happen here because
    // the fully-inside case above would have caught it.
    let map_end = if end < at {
        end
    } else if end < at + count {
        at - 1
    } else {
        end - count
    };

    let mut remapped = *region;
    match axis {
        Axis::Row => {
            remapped.start.0 = map_start;
            remapped.end.0 = map_end;
        }
        Axis::Col => {
            remapped.start.1 = map_start;
            remapped.end.1 = map_end;
        }
    }

    if remapped.is_single_cell() {
        None
    } else {
        Some(remapped)
    }
}

fn shift_axis_sizes_on_insert(sizes: &mut FxHashMap<usize, f64>, at: usize, count: usize) {
    let to_shift: Vec<_> = sizes
        .iter()
        .filter(|(i, _)| **i >= at)
        .map(|(&i, &s)| (i, s))
        .collect();
    for (i, _) in &to_shift {
        sizes.remove(i);
    }
    for (i, s) in to_shift {
        sizes.insert(i + count, s);
    }
}

fn shift_axis_sizes_on_delete(sizes: &mut FxHashMap<usize, f64>, at: usize, count: usize) {
    sizes.retain(|i, _| *i < at || *i >= at + count);
    let to_shift: Vec<_> = sizes
        .iter()
        .filter(|(i, _)| **i >= at + count)
        .map(|(&i, &s)| (i, s))
        .collect();
    for (i, _) in &to_shift {
        sizes.remove(i);
    }
    for (i, s) in to_shift {
        sizes.insert(i - count, s);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::{CellPatch, FontPatch};

    #[test]
    fn test_sparse_storage() {
        let mut sheet = Sheet::new(10, 10);
        assert_eq!(sheet.populated_count(), 0);

        sheet.set_value(0, 0, "Hello");
        assert_eq!(sheet.populated_count(), 1);
        assert_eq!(sheet.value(0, 0), "Hello");
        assert_eq!(sheet.value(5, 5), "");
    }

    #[test]
    fn test_out_of_bounds_write_rejected() {
        let mut sheet = Sheet::new(10, 10);
        sheet.set_value(10, 0, "x");
        sheet.set_value(0, 10, "y");
        sheet.update_cell(99, 99, &CellPatch {
            value: Some("z".into()),
            ..Default::default()
        });
        assert_eq!(sheet.populated_count(), 0);
    }

    #[test]
    fn test_clear_value_keeps_style() {
        let mut sheet = Sheet::new(10, 10);
        sheet.set_value(1, 1, "text");
        sheet.update_cell(1, 1, &CellPatch {
            font: Some(FontPatch { bold: Some(true), ..Default::default() }),
            ..Default::default()
        });

        sheet.clear_value(1, 1);

        let cell = sheet.get_cell(1, 1).expect("styled cell stays stored");
        assert!(cell.value.is_empty());
        assert!(cell.font.bold);
    }

    #[test]
    fn test_clear_formatting_keeps_value() {
        let mut sheet = Sheet::new(10, 10);
        sheet.set_value(1, 1, "text");
        sheet.update_cell(1, 1, &CellPatch {
            font: Some(FontPatch { bold: Some(true), ..Default::default() }),
            ..Default::default()
        });

        sheet.clear_formatting(1, 1);

        let cell = sheet.get_cell(1, 1).unwrap();
        assert_eq!(cell.value, "text");
        assert!(!cell.font.bold);
    }

    #[test]
    fn test_clearing_both_prunes_entry() {
        let mut sheet = Sheet::new(10, 10);
        sheet.set_value(1, 1, "text");
        sheet.clear_value(1, 1);
        assert!(sheet.get_cell(1, 1).is_none());
    }

    #[test]
    fn test_merge_lookup_and_origin() {
        let mut sheet = Sheet::new(10, 10);
        sheet.add_merge(MergeRegion::new(0, 0, 1, 1)).unwrap();

        assert!(sheet.merge_at(0, 0).is_some());
        assert!(sheet.merge_at(1, 1).is_some());
        assert!(sheet.merge_at(2, 2).is_none());

        assert!(!sheet.is_covered(0, 0));
        assert!(sheet.is_covered(0, 1));
        assert!(sheet.is_covered(1, 1));
        assert_eq!(sheet.merge_origin(1, 1), (0, 0));
        assert_eq!(sheet.merge_origin(5, 5), (5, 5));
    }

    #[test]
    fn test_merge_rejects_overlap() {
        let mut sheet = Sheet::new(10, 10);
        sheet.add_merge(MergeRegion::new(0, 0, 2, 2)).unwrap();

        assert!(sheet.add_merge(MergeRegion::new(2, 2, 4, 4)).is_err());
        assert!(sheet.add_merge(MergeRegion::new(1, 1, 1, 3)).is_err());
        assert_eq!(sheet.merges.len(), 1);

        // Disjoint region is fine
        sheet.add_merge(MergeRegion::new(3, 3, 4, 4)).unwrap();
        assert_eq!(sheet.merges.len(), 2);
    }

    #[test]
    fn test_merge_rejects_single_cell() {
        let mut sheet = Sheet::new(10, 10);
        assert!(sheet.add_merge(MergeRegion::new(0, 0, 0, 0)).is_err());
    }

    #[test]
    fn test_merge_rejects_out_of_bounds() {
        let mut sheet = Sheet::new(5, 5);
        assert!(sheet.add_merge(MergeRegion::new(3, 3, 6, 4)).is_err());
    }

    #[test]
    fn test_remove_merge() {
        let mut sheet = Sheet::new(10, 10);
        sheet.add_merge(MergeRegion::new(0, 0, 1, 1)).unwrap();
        assert!(sheet.remove_merge((0, 0)));
        assert!(!sheet.remove_merge((0, 0)));
        assert!(sheet.merge_at(0, 0).is_none());
    }

    #[test]
    fn test_insert_rows_shifts_cells() {
        let mut sheet = Sheet::new(10, 10);
        sheet.set_value(0, 0, "above");
        sheet.set_value(2, 0, "below");

        sheet.insert_rows(1, 2);

        assert_eq!(sheet.rows, 12);
        assert_eq!(sheet.value(0, 0), "above");
        assert_eq!(sheet.value(2, 0), "");
        assert_eq!(sheet.value(4, 0), "below");
    }

    #[test]
    fn test_delete_rows_drops_and_shifts() {
        let mut sheet = Sheet::new(10, 10);
        sheet.set_value(0, 0, "keep");
        sheet.set_value(1, 0, "gone");
        sheet.set_value(3, 0, "shifts");

        sheet.delete_rows(1, 2);

        assert_eq!(sheet.rows, 8);
        assert_eq!(sheet.value(0, 0), "keep");
        assert_eq!(sheet.value(1, 0), "shifts");
        assert_eq!(sheet.populated_count(), 2);
    }

    #[test]
    fn test_insert_then_delete_rows_roundtrip() {
        let mut sheet = Sheet::new(10, 10);
        sheet.set_value(0, 0, "a");
        sheet.set_value(4, 3, "b");
        sheet.set_value(9, 9, "c");
        sheet.add_merge(MergeRegion::new(4, 0, 5, 1)).unwrap();
        sheet.row_heights.insert(4, 32.0);

        let before = sheet.clone();
        sheet.insert_rows(3, 2);
        sheet.delete_rows(3, 2);

        assert_eq!(sheet, before);
    }

    #[test]
    fn test_insert_cols_recomputes_positions() {
        let mut sheet = Sheet::new(10, 10);
        sheet.set_value(0, 0, "a");
        sheet.set_value(0, 1, "b");
        sheet.col_widths.insert(1, 120.0);

        sheet.insert_cols(1, 1);

        assert_eq!(sheet.cols, 11);
        assert_eq!(sheet.value(0, 0), "a");
        assert_eq!(sheet.value(0, 2), "b");
        assert_eq!(sheet.col_widths.get(&2), Some(&120.0));
        assert!(!sheet.col_widths.contains_key(&1));
    }

    #[test]
    fn test_insert_rows_shifts_merge_below() {
        let mut sheet = Sheet::new(10, 10);
        sheet.add_merge(MergeRegion::new(3, 0, 4, 1)).unwrap();

        sheet.insert_rows(0, 1);

        let merge = sheet.merges[0];
        assert_eq!(merge.start, (4, 0));
        assert_eq!(merge.end, (5, 1));
    }

    #[test]
    fn test_insert_rows_inside_merge_grows_it() {
        let mut sheet = Sheet::new(10, 10);
        sheet.add_merge(MergeRegion::new(2, 0, 4, 1)).unwrap();

        sheet.insert_rows(3, 2);

        let merge = sheet.merges[0];
        assert_eq!(merge.start, (2, 0));
        assert_eq!(merge.end, (6, 1));
    }

    #[test]
    fn test_delete_rows_shrinks_merge() {
        let mut sheet = Sheet::new(10, 10);
        sheet.add_merge(MergeRegion::new(2, 0, 5, 1)).unwrap();

        sheet.delete_rows(3, 2);

        let merge = sheet.merges[0];
        assert_eq!(merge.start, (2, 0));
        assert_eq!(merge.end, (3, 1));
    }

    #[test]
    fn test_delete_rows_drops_contained_merge() {
        let mut sheet = Sheet::new(10, 10);
        sheet.add_merge(MergeRegion::new(3, 0, 4, 1)).unwrap();

        sheet.delete_rows(2, 4);

        assert!(sheet.merges.is_empty());
    }

    #[test]
    fn test_delete_rows_drops_merge_reduced_to_single_cell() {
        let mut sheet = Sheet::new(10, 10);
        // Two rows tall, one column wide; deleting one row leaves 1x1
        sheet.add_merge(MergeRegion::new(2, 0, 3, 0)).unwrap();

        sheet.delete_rows(3, 1);

        assert!(sheet.merges.is_empty());
    }

    #[test]
    fn test_delete_all_rows_floors_at_one() {
        let mut sheet = Sheet::new(3, 3);
        sheet.set_value(0, 0, "x");
        sheet.delete_rows(0, 3);
        assert_eq!(sheet.rows, 1);
        assert_eq!(sheet.populated_count(), 0);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_insert_then_delete_rows_restores(
                at in 0usize..10,
                count in 1usize..4,
                cells in proptest::collection::vec(
                    ((0usize..12, 0usize..12), "[a-z]{1,6}"),
                    0..20,
                ),
            ) {
                let mut sheet = Sheet::new(12, 12);
                for ((r, c), v) in &cells {
                    sheet.set_value(*r, *c, v);
                }
                let before = sheet.clone();

                sheet.insert_rows(at, count);
                sheet.delete_rows(at, count);

                prop_assert_eq!(sheet, before);
            }
        }
    }

    #[test]
    fn test_field_mappings_untouched_by_structure_mutation() {
        let mut sheet = Sheet::new(10, 10);
        sheet
            .field_mappings
            .insert("patientName".into(), "B2".into());

        sheet.insert_rows(0, 1);

        assert_eq!(sheet.field_mappings.get("patientName").map(String::as_str), Some("B2"));
    }
}
