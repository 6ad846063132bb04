//! Editor commands.
//!
//! Every user interaction reaches the editor as one of these commands, so
//! the full state machine is exercised without any rendering layer or
//! pointer-event plumbing.

use formgrid_engine::style::StylePatch;

/// A single input event, already translated from keyboard/pointer terms.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorCommand {
    /// Arrow keys: move the active cell by one step, clamped to the grid.
    Move { d_row: isize, d_col: isize },
    /// Plain click: select a single cell.
    Click { row: usize, col: usize },
    /// Modifier-click: extend to a normalized range from the anchor.
    ShiftClick { row: usize, col: usize },
    /// Enter/F2/double-click: open an edit session on the active cell.
    StartEdit,
    /// A printable character in navigation mode: open an edit session with
    /// the buffer replaced by that character (overwrite-on-type).
    TypeChar(char),
    /// Replace the edit buffer (IME / text field sync).
    EditInput(String),
    /// Remove the last character from the edit buffer.
    Backspace,
    /// Enter while editing: commit, then move down.
    ConfirmEdit,
    /// Tab while editing: commit, then move right (left when reversed).
    ConfirmEditTab { reverse: bool },
    /// Escape: discard the buffer, keep the selection.
    CancelEdit,
    /// Delete/Backspace in navigation mode: clear the active cell's value.
    DeleteKey,
    /// Clear formatting of the active cell, keeping its value.
    ClearFormatting,
    /// Toolbar formatting action on the active cell.
    ApplyStyle(StylePatch),
    /// Merge the selected range.
    MergeSelection,
    /// Remove the merge containing the active cell.
    UnmergeSelection,
    InsertRows { at: usize, count: usize },
    DeleteRows { at: usize, count: usize },
    InsertCols { at: usize, count: usize },
    DeleteCols { at: usize, count: usize },
    Copy,
    Cut,
    Paste,
    /// Drag-relocate one cell's content onto another.
    DragMove { source: (usize, usize), target: (usize, usize) },
}
