//! Conversion between the in-memory grid and the persisted template schema.
//!
//! The wire format is 1-based and sparse; the engine is 0-based. This module
//! is the only place the two meet. A malformed payload fails the load as a
//! whole; no partially-initialized grid is ever returned.

use std::collections::BTreeMap;
use std::path::Path;

use formgrid_engine::address::{cell_address, column_index, column_letters};
use formgrid_engine::cell::{
    Cell, CellAlignment, CellImage, FillStyle, FontStyle, HorizontalAlign, VerticalAlign,
};
use formgrid_engine::sheet::{MergeRegion, Sheet};
use formgrid_protocol::{AlignmentDef, CellEntry, FillDef, FontDef, MergeEntry, TemplateDoc};

/// Serialize the grid to the persisted template schema.
///
/// Output is sparse: only cells with a non-empty value, a non-default
/// style, or an image are emitted, ordered by row then column.
pub fn to_template(sheet: &Sheet) -> TemplateDoc {
    let mut entries: Vec<(&(usize, usize), &Cell)> = sheet.cells_iter().collect();
    entries.sort_by_key(|(&pos, _)| pos);

    let cells = entries
        .into_iter()
        .map(|(&(row, col), cell)| CellEntry {
            row: row as u32 + 1,
            col: col as u32 + 1,
            col_letter: column_letters(col),
            address: cell_address(row, col),
            value: cell.value.clone(),
            font: font_to_wire(&cell.font),
            fill: fill_to_wire(&cell.fill),
            alignment: alignment_to_wire(&cell.alignment),
            image: cell.image.as_ref().map(|i| i.data.clone()),
            image_width: cell.image.as_ref().map(|i| i.width),
            image_height: cell.image.as_ref().map(|i| i.height),
        })
        .collect();

    let merged_cells = sheet
        .merges
        .iter()
        .map(|m| MergeEntry {
            range: format!(
                "{}:{}",
                cell_address(m.start.0, m.start.1),
                cell_address(m.end.0, m.end.1)
            ),
            min_row: m.start.0 as u32 + 1,
            max_row: m.end.0 as u32 + 1,
            min_col: m.start.1 as u32 + 1,
            max_col: m.end.1 as u32 + 1,
        })
        .collect();

    let mut row_heights = BTreeMap::new();
    for (&row, &height) in &sheet.row_heights {
        row_heights.insert((row + 1).to_string(), height);
    }

    let mut column_widths = BTreeMap::new();
    for (&col, &width) in &sheet.col_widths {
        column_widths.insert(column_letters(col), width);
    }

    TemplateDoc {
        max_row: sheet.rows as u32,
        max_column: sheet.cols as u32,
        cells,
        merged_cells,
        row_heights,
        column_widths,
        data_mappings: sheet.field_mappings.iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
    }
}

/// Rebuild a grid from a persisted template.
///
/// Cell entries outside the declared bounds are skipped (the deployed
/// editor tolerates them); structurally malformed payloads fail the load.
/// Overlapping merge entries in legacy payloads are dropped with a warning
/// rather than failing the whole template.
pub fn from_template(doc: &TemplateDoc) -> Result<Sheet, String> {
    if doc.max_row == 0 || doc.max_column == 0 {
        return Err("template bounds must be at least 1x1".to_string());
    }

    let mut sheet = Sheet::new(doc.max_row as usize, doc.max_column as usize);

    for entry in &doc.cells {
        if entry.row == 0 || entry.col == 0 {
            return Err(format!(
                "cell entry has invalid coordinates ({}, {})",
                entry.row, entry.col
            ));
        }
        let row = entry.row as usize - 1;
        let col = entry.col as usize - 1;
        if !sheet.in_bounds(row, col) {
            log::warn!(
                "skipping cell {} outside template bounds",
                cell_address(row, col)
            );
            continue;
        }

        let cell = Cell {
            value: entry.value.clone(),
            font: font_from_wire(entry.font.as_ref()),
            fill: fill_from_wire(entry.fill.as_ref()),
            alignment: alignment_from_wire(entry.alignment.as_ref()),
            image: image_from_wire(entry),
        };
        sheet.put_cell(row, col, cell);
    }

    for entry in &doc.merged_cells {
        if entry.min_row == 0
            || entry.min_col == 0
            || entry.min_row > entry.max_row
            || entry.min_col > entry.max_col
        {
            return Err(format!("malformed merge entry '{}'", entry.range));
        }
        let region = MergeRegion::new(
            entry.min_row as usize - 1,
            entry.min_col as usize - 1,
            entry.max_row as usize - 1,
            entry.max_col as usize - 1,
        );
        if region.is_single_cell() {
            continue;
        }
        if let Err(msg) = sheet.add_merge(region) {
            log::warn!("dropping stored merge {}: {}", entry.range, msg);
        }
    }

    for (key, &height) in &doc.row_heights {
        let row: usize = key
            .parse()
            .map_err(|_| format!("malformed row height key '{}'", key))?;
        if row == 0 {
            return Err("row height key must be 1-based".to_string());
        }
        sheet.row_heights.insert(row - 1, height);
    }

    for (letters, &width) in &doc.column_widths {
        let col = column_index(letters)
            .ok_or_else(|| format!("malformed column width key '{}'", letters))?;
        sheet.col_widths.insert(col, width);
    }

    for (key, address) in &doc.data_mappings {
        sheet.field_mappings.insert(key.clone(), address.clone());
    }

    Ok(sheet)
}

/// Read a template file (JSON) from disk.
pub fn load_template(path: &Path) -> Result<TemplateDoc, String> {
    let contents = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    serde_json::from_str(&contents).map_err(|e| e.to_string())
}

/// Write a template file (pretty JSON) to disk.
pub fn save_template(path: &Path, doc: &TemplateDoc) -> Result<(), String> {
    let contents = serde_json::to_string_pretty(doc).map_err(|e| e.to_string())?;
    std::fs::write(path, contents).map_err(|e| e.to_string())
}

fn font_to_wire(font: &FontStyle) -> Option<FontDef> {
    if font.is_default() {
        return None;
    }
    Some(FontDef {
        name: font.name.clone(),
        size: font.size,
        bold: font.bold,
        italic: font.italic,
        color: font.color.clone(),
    })
}

fn font_from_wire(font: Option<&FontDef>) -> FontStyle {
    match font {
        Some(f) => FontStyle {
            name: f.name.clone(),
            size: f.size,
            bold: f.bold,
            italic: f.italic,
            color: f.color.clone(),
        },
        None => FontStyle::default(),
    }
}

fn fill_to_wire(fill: &FillStyle) -> Option<FillDef> {
    if fill.is_default() {
        return None;
    }
    Some(FillDef {
        color: fill.color.clone(),
    })
}

fn fill_from_wire(fill: Option<&FillDef>) -> FillStyle {
    FillStyle {
        color: fill.and_then(|f| f.color.clone()),
    }
}

fn alignment_to_wire(alignment: &CellAlignment) -> Option<AlignmentDef> {
    if alignment.is_default() {
        return None;
    }
    Some(AlignmentDef {
        horizontal: alignment.horizontal.map(|h| {
            match h {
                HorizontalAlign::Left => "left",
                HorizontalAlign::Center => "center",
                HorizontalAlign::Right => "right",
            }
            .to_string()
        }),
        vertical: alignment.vertical.map(|v| {
            match v {
                VerticalAlign::Top => "top",
                VerticalAlign::Center => "center",
                VerticalAlign::Bottom => "bottom",
            }
            .to_string()
        }),
        wrap_text: alignment.wrap_text,
    })
}

fn alignment_from_wire(alignment: Option<&AlignmentDef>) -> CellAlignment {
    let Some(a) = alignment else {
        return CellAlignment::default();
    };
    // Unknown axis values (legacy "justify" etc.) fall back to the
    // renderer default rather than failing the load.
    CellAlignment {
        horizontal: a.horizontal.as_deref().and_then(|h| match h {
            "left" => Some(HorizontalAlign::Left),
            "center" => Some(HorizontalAlign::Center),
            "right" => Some(HorizontalAlign::Right),
            _ => None,
        }),
        vertical: a.vertical.as_deref().and_then(|v| match v {
            "top" => Some(VerticalAlign::Top),
            "center" => Some(VerticalAlign::Center),
            "bottom" => Some(VerticalAlign::Bottom),
            _ => None,
        }),
        wrap_text: a.wrap_text,
    }
}

fn image_from_wire(entry: &CellEntry) -> Option<CellImage> {
    entry.image.as_ref().map(|data| CellImage {
        data: data.clone(),
        width: entry.image_width.unwrap_or(0.0),
        height: entry.image_height.unwrap_or(0.0),
    })
}
