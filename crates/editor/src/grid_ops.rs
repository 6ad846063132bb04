//! Grid structural operations.
//!
//! Row/column insert and delete, with selection adjustment. The cell,
//! merge, and sizing shifts live in the engine; this layer keeps the
//! selection pointing at the cell the user was on.

use crate::editor::TemplateEditor;

impl TemplateEditor {
    /// Insert rows above the given position.
    pub fn insert_rows(&mut self, at_row: usize, count: usize) {
        if self.mode.is_editing() {
            self.commit_pending_edit();
        }
        if at_row > self.sheet.rows || count == 0 {
            return;
        }
        self.sheet.insert_rows(at_row, count);

        // Keep the selection on the same cell it was on
        let (row, col) = self.selection.active();
        if row >= at_row {
            self.selection.select_cell(row + count, col);
        }
        self.is_modified = true;
    }

    /// Delete rows starting at the given position.
    pub fn delete_rows(&mut self, at_row: usize, count: usize) {
        if self.mode.is_editing() {
            self.commit_pending_edit();
        }
        if at_row >= self.sheet.rows || count == 0 {
            return;
        }
        self.sheet.delete_rows(at_row, count);

        let (row, col) = self.selection.active();
        let new_row = if row >= at_row + count {
            row - count
        } else if row >= at_row {
            at_row.min(self.sheet.rows - 1)
        } else {
            row
        };
        self.selection.select_cell(new_row, col.min(self.sheet.cols - 1));
        self.is_modified = true;
    }

    /// Insert columns left of the given position.
    pub fn insert_cols(&mut self, at_col: usize, count: usize) {
        if self.mode.is_editing() {
            self.commit_pending_edit();
        }
        if at_col > self.sheet.cols || count == 0 {
            return;
        }
        self.sheet.insert_cols(at_col, count);

        let (row, col) = self.selection.active();
        if col >= at_col {
            self.selection.select_cell(row, col + count);
        }
        self.is_modified = true;
    }

    /// Delete columns starting at the given position.
    pub fn delete_cols(&mut self, at_col: usize, count: usize) {
        if self.mode.is_editing() {
            self.commit_pending_edit();
        }
        if at_col >= self.sheet.cols || count == 0 {
            return;
        }
        self.sheet.delete_cols(at_col, count);

        let (row, col) = self.selection.active();
        let new_col = if col >= at_col + count {
            col - count
        } else if col >= at_col {
            at_col.min(self.sheet.cols - 1)
        } else {
            col
        };
        self.selection.select_cell(row.min(self.sheet.rows - 1), new_col);
        self.is_modified = true;
    }
}

#[cfg(test)]
mod tests {
    use formgrid_engine::sheet::{MergeRegion, Sheet};

    use crate::command::EditorCommand;
    use crate::editor::TemplateEditor;

    #[test]
    fn test_insert_rows_keeps_selection_on_cell() {
        let mut ed = TemplateEditor::new(Sheet::new(10, 10));
        ed.apply(EditorCommand::Click { row: 5, col: 2 });
        ed.apply(EditorCommand::InsertRows { at: 3, count: 2 });

        assert_eq!(ed.selection.active(), (7, 2));
        assert_eq!(ed.sheet.rows, 12);
    }

    #[test]
    fn test_delete_rows_moves_selection_up() {
        let mut ed = TemplateEditor::new(Sheet::new(10, 10));
        ed.apply(EditorCommand::Click { row: 5, col: 2 });
        ed.apply(EditorCommand::DeleteRows { at: 0, count: 2 });

        assert_eq!(ed.selection.active(), (3, 2));
        assert_eq!(ed.sheet.rows, 8);
    }

    #[test]
    fn test_delete_rows_containing_selection() {
        let mut ed = TemplateEditor::new(Sheet::new(10, 10));
        ed.apply(EditorCommand::Click { row: 4, col: 0 });
        ed.apply(EditorCommand::DeleteRows { at: 3, count: 3 });

        assert_eq!(ed.selection.active(), (3, 0));
    }

    #[test]
    fn test_structural_edit_commits_pending_edit() {
        let mut ed = TemplateEditor::new(Sheet::new(10, 10));
        ed.apply(EditorCommand::TypeChar('v'));
        ed.apply(EditorCommand::InsertRows { at: 0, count: 1 });

        // The buffer landed at the pre-insert coordinate, then shifted down
        assert_eq!(ed.sheet.value(1, 0), "v");
    }

    #[test]
    fn test_end_to_end_insert_shifts_value_and_merge() {
        // From an empty 10x10 grid: write at A1, merge A1:B2, insert a row
        // at the top. The value must land on A2 and the merge must span
        // rows 2-3 (0-based rows 1-2).
        let mut ed = TemplateEditor::new(Sheet::new(10, 10));
        ed.apply(EditorCommand::Click { row: 0, col: 0 });
        ed.apply(EditorCommand::TypeChar('H'));
        ed.apply(EditorCommand::EditInput("Hello".into()));
        ed.apply(EditorCommand::ConfirmEdit);

        ed.apply(EditorCommand::Click { row: 0, col: 0 });
        ed.apply(EditorCommand::ShiftClick { row: 1, col: 1 });
        ed.apply(EditorCommand::MergeSelection);

        ed.apply(EditorCommand::InsertRows { at: 0, count: 1 });

        assert_eq!(ed.sheet.value(1, 0), "Hello");
        assert_eq!(
            ed.sheet.merges[0],
            MergeRegion::new(1, 0, 2, 1)
        );
        assert_eq!(formgrid_engine::address::cell_address(1, 0), "A2");
    }

    #[test]
    fn test_insert_delete_cols_roundtrip_via_commands() {
        let mut ed = TemplateEditor::new(Sheet::new(10, 10));
        ed.sheet.set_value(0, 5, "x");
        let before = ed.sheet.clone();

        ed.apply(EditorCommand::InsertCols { at: 2, count: 3 });
        ed.apply(EditorCommand::DeleteCols { at: 2, count: 3 });

        assert_eq!(ed.sheet, before);
    }
}
