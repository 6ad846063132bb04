//! Clipboard operations.
//!
//! Single-cell copy/cut/paste and drag-relocate. The clipboard slot holds a
//! value snapshot of the cell, never a reference, so later edits to the
//! source do not change what paste produces.

use formgrid_engine::cell::Cell;

use crate::editor::TemplateEditor;

/// Snapshot of one copied or cut cell.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipboardCell {
    pub cell: Cell,
    /// True when the snapshot came from a cut.
    pub cut: bool,
}

impl TemplateEditor {
    /// Copy the active cell's full content (value + style + image) into the
    /// clipboard slot. The source is unchanged.
    pub fn copy(&mut self) {
        if self.mode.is_editing() {
            self.commit_pending_edit();
        }
        let (row, col) = self.selection.active();
        let (row, col) = self.sheet.merge_origin(row, col);
        self.clipboard = Some(ClipboardCell {
            cell: self.sheet.cell_or_default(row, col),
            cut: false,
        });
    }

    /// Copy, then clear the source cell's value. Style stays on the source;
    /// only the value is treated as moved.
    pub fn cut(&mut self) {
        if self.mode.is_editing() {
            self.commit_pending_edit();
        }
        let (row, col) = self.selection.active();
        let (row, col) = self.sheet.merge_origin(row, col);
        self.clipboard = Some(ClipboardCell {
            cell: self.sheet.cell_or_default(row, col),
            cut: true,
        });
        self.sheet.clear_value(row, col);
        self.is_modified = true;
    }

    /// Write the clipboard snapshot onto the active cell, overwriting it.
    /// The slot is not consumed, so repeated pastes are allowed.
    pub fn paste(&mut self) {
        if self.mode.is_editing() {
            self.commit_pending_edit();
        }
        let Some(slot) = self.clipboard.clone() else {
            self.status_message = Some("Clipboard is empty".to_string());
            return;
        };
        let (row, col) = self.selection.active();
        let (row, col) = self.sheet.merge_origin(row, col);
        self.sheet.put_cell(row, col, slot.cell);
        self.is_modified = true;
    }

    /// Drag-relocate: paste the source's content at the target, then clear
    /// the source's value. Only permitted when the source has a non-empty
    /// value; there is no point dragging an empty cell.
    pub fn drag_move(&mut self, source: (usize, usize), target: (usize, usize)) {
        if self.mode.is_editing() {
            self.commit_pending_edit();
        }
        if source == target {
            return;
        }
        let source = self.sheet.merge_origin(source.0, source.1);
        let target = self.sheet.merge_origin(target.0, target.1);
        if !self.sheet.in_bounds(target.0, target.1) {
            return;
        }

        let content = self.sheet.cell_or_default(source.0, source.1);
        if content.value.is_empty() {
            self.status_message = Some("Nothing to move".to_string());
            return;
        }

        self.sheet.put_cell(target.0, target.1, content);
        self.sheet.clear_value(source.0, source.1);
        self.selection.select_cell(target.0, target.1);
        self.is_modified = true;
    }
}
