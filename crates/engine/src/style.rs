//! Style patching.
//!
//! Toolbar-style formatting actions applied to one cell at a time.
//! Boolean kinds toggle, value kinds set; everything merges into the
//! cell's existing sub-records field-by-field.

use super::cell::{AlignmentPatch, CellPatch, FillPatch, FontPatch, HorizontalAlign, VerticalAlign};
use super::sheet::Sheet;

/// A single formatting action.
#[derive(Debug, Clone, PartialEq)]
pub enum StylePatch {
    /// Toggle bold
    Bold,
    /// Toggle italic
    Italic,
    /// Toggle wrap-text
    WrapText,
    FontSize(f64),
    FontColor(String),
    FillColor(String),
    HorizontalAlign(HorizontalAlign),
    VerticalAlign(VerticalAlign),
}

impl Sheet {
    /// Apply a formatting action to a cell. Out-of-bounds coordinates are
    /// no-ops; toggles read the current state of the (possibly absent) cell.
    pub fn apply_style(&mut self, row: usize, col: usize, patch: StylePatch) {
        if !self.in_bounds(row, col) {
            return;
        }

        let current = self.cell_or_default(row, col);
        let cell_patch = match patch {
            StylePatch::Bold => CellPatch {
                font: Some(FontPatch {
                    bold: Some(!current.font.bold),
                    ..Default::default()
                }),
                ..Default::default()
            },
            StylePatch::Italic => CellPatch {
                font: Some(FontPatch {
                    italic: Some(!current.font.italic),
                    ..Default::default()
                }),
                ..Default::default()
            },
            StylePatch::WrapText => CellPatch {
                alignment: Some(AlignmentPatch {
                    wrap_text: Some(!current.alignment.wrap_text),
                    ..Default::default()
                }),
                ..Default::default()
            },
            StylePatch::FontSize(size) => CellPatch {
                font: Some(FontPatch {
                    size: Some(size),
                    ..Default::default()
                }),
                ..Default::default()
            },
            StylePatch::FontColor(color) => CellPatch {
                font: Some(FontPatch {
                    color: Some(color),
                    ..Default::default()
                }),
                ..Default::default()
            },
            StylePatch::FillColor(color) => CellPatch {
                fill: Some(FillPatch { color: Some(color) }),
                ..Default::default()
            },
            StylePatch::HorizontalAlign(align) => CellPatch {
                alignment: Some(AlignmentPatch {
                    horizontal: Some(align),
                    ..Default::default()
                }),
                ..Default::default()
            },
            StylePatch::VerticalAlign(align) => CellPatch {
                alignment: Some(AlignmentPatch {
                    vertical: Some(align),
                    ..Default::default()
                }),
                ..Default::default()
            },
        };

        self.update_cell(row, col, &cell_patch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bold_toggles() {
        let mut sheet = Sheet::new(10, 10);

        sheet.apply_style(0, 0, StylePatch::Bold);
        assert!(sheet.get_cell(0, 0).unwrap().font.bold);

        sheet.apply_style(0, 0, StylePatch::Bold);
        // Toggling back leaves a fully default cell, which is pruned
        assert!(sheet.get_cell(0, 0).is_none());
    }

    #[test]
    fn test_style_merges_into_existing_font() {
        let mut sheet = Sheet::new(10, 10);
        sheet.apply_style(0, 0, StylePatch::FontColor("FF0000".into()));
        sheet.apply_style(0, 0, StylePatch::Bold);
        sheet.apply_style(0, 0, StylePatch::FontSize(14.0));

        let font = &sheet.get_cell(0, 0).unwrap().font;
        assert_eq!(font.color.as_deref(), Some("FF0000"));
        assert!(font.bold);
        assert_eq!(font.size, Some(14.0));
    }

    #[test]
    fn test_fill_does_not_touch_font() {
        let mut sheet = Sheet::new(10, 10);
        sheet.apply_style(2, 2, StylePatch::Bold);
        sheet.apply_style(2, 2, StylePatch::FillColor("FFFF00".into()));

        let cell = sheet.get_cell(2, 2).unwrap();
        assert!(cell.font.bold);
        assert_eq!(cell.fill.color.as_deref(), Some("FFFF00"));
    }

    #[test]
    fn test_alignment_axes_independent() {
        let mut sheet = Sheet::new(10, 10);
        sheet.apply_style(0, 0, StylePatch::VerticalAlign(VerticalAlign::Top));
        sheet.apply_style(0, 0, StylePatch::HorizontalAlign(HorizontalAlign::Center));

        let alignment = sheet.get_cell(0, 0).unwrap().alignment;
        assert_eq!(alignment.vertical, Some(VerticalAlign::Top));
        assert_eq!(alignment.horizontal, Some(HorizontalAlign::Center));
    }

    #[test]
    fn test_style_out_of_bounds_noop() {
        let mut sheet = Sheet::new(5, 5);
        sheet.apply_style(5, 0, StylePatch::Bold);
        assert_eq!(sheet.populated_count(), 0);
    }

    #[test]
    fn test_style_preserves_value() {
        let mut sheet = Sheet::new(10, 10);
        sheet.set_value(1, 1, "Header");
        sheet.apply_style(1, 1, StylePatch::Bold);

        let cell = sheet.get_cell(1, 1).unwrap();
        assert_eq!(cell.value, "Header");
        assert!(cell.font.bold);
    }
}
