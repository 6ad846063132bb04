//! The template editor controller.
//!
//! All transient editing state (the grid, the selection, the edit session,
//! the clipboard) lives in one explicit struct driven by `EditorCommand`
//! values. One command runs to completion synchronously; there is no
//! background mutation.

use formgrid_core::Selection;
use formgrid_engine::sheet::{MergeRegion, Sheet};
use formgrid_engine::style::StylePatch;

use crate::clipboard::ClipboardCell;
use crate::command::EditorCommand;
use crate::mode::Mode;

/// Editing state for one template session.
///
/// Constructed around a `Sheet` loaded through `formgrid-io`; flushed back
/// through the same path on save.
#[derive(Debug, Clone, Default)]
pub struct TemplateEditor {
    pub sheet: Sheet,
    pub selection: Selection,
    pub mode: Mode,
    /// Uncommitted edit buffer; meaningful only in `Mode::Edit`.
    pub edit_value: String,
    /// The coordinate the open edit session belongs to.
    pub(crate) edit_pos: (usize, usize),
    pub clipboard: Option<ClipboardCell>,
    pub status_message: Option<String>,
    pub is_modified: bool,
}

impl TemplateEditor {
    pub fn new(sheet: Sheet) -> Self {
        Self {
            sheet,
            ..Default::default()
        }
    }

    /// Apply one input command to the editor state.
    pub fn apply(&mut self, command: EditorCommand) {
        self.status_message = None;
        match command {
            EditorCommand::Move { d_row, d_col } => self.move_selection(d_row, d_col),
            EditorCommand::Click { row, col } => self.click(row, col),
            EditorCommand::ShiftClick { row, col } => self.shift_click(row, col),
            EditorCommand::StartEdit => self.start_edit(),
            EditorCommand::TypeChar(ch) => self.type_char(ch),
            EditorCommand::EditInput(text) => self.edit_input(text),
            EditorCommand::Backspace => self.backspace(),
            EditorCommand::ConfirmEdit => self.confirm_edit(),
            EditorCommand::ConfirmEditTab { reverse } => self.confirm_edit_tab(reverse),
            EditorCommand::CancelEdit => self.cancel_edit(),
            EditorCommand::DeleteKey => self.delete_key(),
            EditorCommand::ClearFormatting => self.clear_formatting(),
            EditorCommand::ApplyStyle(patch) => self.apply_style(patch),
            EditorCommand::MergeSelection => self.merge_selection(),
            EditorCommand::UnmergeSelection => self.unmerge_selection(),
            EditorCommand::InsertRows { at, count } => self.insert_rows(at, count),
            EditorCommand::DeleteRows { at, count } => self.delete_rows(at, count),
            EditorCommand::InsertCols { at, count } => self.insert_cols(at, count),
            EditorCommand::DeleteCols { at, count } => self.delete_cols(at, count),
            EditorCommand::Copy => self.copy(),
            EditorCommand::Cut => self.cut(),
            EditorCommand::Paste => self.paste(),
            EditorCommand::DragMove { source, target } => self.drag_move(source, target),
        }
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    pub fn move_selection(&mut self, d_row: isize, d_col: isize) {
        if self.mode.is_editing() {
            return;
        }
        self.selection
            .move_by(d_row, d_col, self.sheet.rows, self.sheet.cols);
    }

    /// Plain click. A pending edit commits first (focus loss); a click on a
    /// covered cell selects the merge origin.
    pub fn click(&mut self, row: usize, col: usize) {
        if self.mode.is_editing() {
            self.commit_pending_edit();
        }
        if !self.sheet.in_bounds(row, col) {
            return;
        }
        let (row, col) = self.sheet.merge_origin(row, col);
        self.selection.select_cell(row, col);
    }

    /// Modifier-click: extend a normalized range from the anchor.
    pub fn shift_click(&mut self, row: usize, col: usize) {
        if self.mode.is_editing() {
            self.commit_pending_edit();
        }
        if !self.sheet.in_bounds(row, col) {
            return;
        }
        self.selection.extend_to(row, col);
    }

    // =========================================================================
    // Edit session
    // =========================================================================

    /// Open an edit session on the active cell, buffer initialized from the
    /// cell's current value. Covered cells redirect to their merge origin.
    pub fn start_edit(&mut self) {
        if self.mode.is_editing() {
            return;
        }
        let (row, col) = self.selection.active();
        let (row, col) = self.sheet.merge_origin(row, col);
        self.selection.select_cell(row, col);

        self.edit_pos = (row, col);
        self.edit_value = self.sheet.value(row, col);
        self.mode = Mode::Edit;
    }

    /// Overwrite-on-type: open an edit session whose buffer is just the
    /// typed character.
    pub fn type_char(&mut self, ch: char) {
        if self.mode.is_editing() {
            self.edit_value.push(ch);
            return;
        }
        let (row, col) = self.selection.active();
        let (row, col) = self.sheet.merge_origin(row, col);
        self.selection.select_cell(row, col);

        self.edit_pos = (row, col);
        self.edit_value = ch.to_string();
        self.mode = Mode::Edit;
    }

    pub fn edit_input(&mut self, text: String) {
        if !self.mode.is_editing() {
            return;
        }
        self.edit_value = text;
    }

    pub fn backspace(&mut self) {
        if !self.mode.is_editing() {
            return;
        }
        self.edit_value.pop();
    }

    /// Commit the buffer without moving the selection. Safe to call when no
    /// session is open. Also the hook called before save/export so pending
    /// edits are never lost.
    pub fn commit_pending_edit(&mut self) {
        if !self.mode.is_editing() {
            return;
        }
        let (row, col) = self.edit_pos;
        self.sheet.set_value(row, col, &self.edit_value);
        self.edit_value.clear();
        self.mode = Mode::Navigation;
        self.is_modified = true;
    }

    /// Enter: commit and move one row down.
    pub fn confirm_edit(&mut self) {
        if !self.mode.is_editing() {
            return;
        }
        self.commit_pending_edit();
        self.move_selection(1, 0);
    }

    /// Tab: commit and move one column right (left when reversed).
    pub fn confirm_edit_tab(&mut self, reverse: bool) {
        if !self.mode.is_editing() {
            return;
        }
        self.commit_pending_edit();
        self.move_selection(0, if reverse { -1 } else { 1 });
    }

    /// Escape: discard the buffer; the cell and selection are unchanged.
    pub fn cancel_edit(&mut self) {
        if !self.mode.is_editing() {
            return;
        }
        self.edit_value.clear();
        self.mode = Mode::Navigation;
    }

    // =========================================================================
    // Cell content
    // =========================================================================

    /// Delete key in navigation mode: clear the active cell's value only.
    pub fn delete_key(&mut self) {
        if self.mode.is_editing() {
            return;
        }
        let (row, col) = self.selection.active();
        let (row, col) = self.sheet.merge_origin(row, col);
        self.sheet.clear_value(row, col);
        self.is_modified = true;
    }

    /// Clear the active cell's formatting, keeping its value.
    pub fn clear_formatting(&mut self) {
        if self.mode.is_editing() {
            return;
        }
        let (row, col) = self.selection.active();
        let (row, col) = self.sheet.merge_origin(row, col);
        self.sheet.clear_formatting(row, col);
        self.is_modified = true;
    }

    pub fn apply_style(&mut self, patch: StylePatch) {
        if self.mode.is_editing() {
            return;
        }
        let (row, col) = self.selection.active();
        let (row, col) = self.sheet.merge_origin(row, col);
        self.sheet.apply_style(row, col, patch);
        self.is_modified = true;
    }

    // =========================================================================
    // Merge / Unmerge
    // =========================================================================

    /// Merge the selected range. Requires a multi-cell selection; on
    /// success the selection snaps to the new origin.
    pub fn merge_selection(&mut self) {
        if self.mode.is_editing() {
            return;
        }
        let range = self.selection.effective_range();
        if range.is_single() {
            self.status_message = Some("Select a range of cells to merge".to_string());
            return;
        }
        let region = MergeRegion::new(
            range.start_row,
            range.start_col,
            range.end_row,
            range.end_col,
        );
        match self.sheet.add_merge(region) {
            Ok(()) => {
                self.selection.select_cell(region.start.0, region.start.1);
                self.is_modified = true;
            }
            Err(msg) => self.status_message = Some(msg),
        }
    }

    /// Remove the merge region containing the active cell, if any.
    pub fn unmerge_selection(&mut self) {
        if self.mode.is_editing() {
            return;
        }
        let (row, col) = self.selection.active();
        let origin = self.sheet.merge_origin(row, col);
        if self.sheet.remove_merge(origin) {
            self.is_modified = true;
        } else {
            self.status_message = Some("No merged cells in selection".to_string());
        }
    }
}
