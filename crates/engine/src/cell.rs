use serde::{Deserialize, Serialize};

/// Horizontal text alignment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlign {
    Left,
    Center,
    Right,
}

/// Vertical text alignment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    Top,
    Center,
    Bottom,
}

/// Font attributes. Unset options inherit the template default.
///
/// Colors are hex strings as stored in the template format (RGB or ARGB,
/// e.g. "FF0000" or "FFFF0000"); the engine treats them as opaque.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FontStyle {
    pub name: Option<String>,
    pub size: Option<f64>,
    pub bold: bool,
    pub italic: bool,
    pub color: Option<String>,
}

impl FontStyle {
    pub fn is_default(&self) -> bool {
        self.name.is_none()
            && self.size.is_none()
            && !self.bold
            && !self.italic
            && self.color.is_none()
    }
}

/// Background fill. `None` color means no fill.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FillStyle {
    pub color: Option<String>,
}

impl FillStyle {
    pub fn is_default(&self) -> bool {
        self.color.is_none()
    }
}

/// Cell text alignment. Unset axes inherit the renderer default.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CellAlignment {
    pub horizontal: Option<HorizontalAlign>,
    pub vertical: Option<VerticalAlign>,
    pub wrap_text: bool,
}

impl CellAlignment {
    pub fn is_default(&self) -> bool {
        self.horizontal.is_none() && self.vertical.is_none() && !self.wrap_text
    }
}

/// An image embedded in a cell: raw bytes plus display size in pixels.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CellImage {
    pub data: Vec<u8>,
    pub width: f64,
    pub height: f64,
}

/// One cell of the template grid.
///
/// A cell with no populated fields is equivalent to absent and is not
/// stored; `Sheet` prunes entries that become empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Cell {
    pub value: String,
    pub font: FontStyle,
    pub fill: FillStyle,
    pub alignment: CellAlignment,
    pub image: Option<CellImage>,
}

impl Cell {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the cell carries no content worth storing.
    pub fn is_empty(&self) -> bool {
        self.value.is_empty() && !self.has_style() && self.image.is_none()
    }

    /// True when any style attribute differs from the default.
    pub fn has_style(&self) -> bool {
        !self.font.is_default() || !self.fill.is_default() || !self.alignment.is_default()
    }

    pub fn apply(&mut self, patch: &CellPatch) {
        if let Some(value) = &patch.value {
            self.value = value.clone();
        }
        if let Some(font) = &patch.font {
            font.apply_to(&mut self.font);
        }
        if let Some(fill) = &patch.fill {
            if let Some(color) = &fill.color {
                self.fill.color = Some(color.clone());
            }
        }
        if let Some(alignment) = &patch.alignment {
            alignment.apply_to(&mut self.alignment);
        }
        if let Some(image) = &patch.image {
            self.image = Some(image.clone());
        }
    }
}

/// Partial font update. `None` fields leave the current value untouched,
/// so setting `bold` never erases a previously set `color`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FontPatch {
    pub name: Option<String>,
    pub size: Option<f64>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub color: Option<String>,
}

impl FontPatch {
    fn apply_to(&self, font: &mut FontStyle) {
        if let Some(name) = &self.name {
            font.name = Some(name.clone());
        }
        if let Some(size) = self.size {
            font.size = Some(size);
        }
        if let Some(bold) = self.bold {
            font.bold = bold;
        }
        if let Some(italic) = self.italic {
            font.italic = italic;
        }
        if let Some(color) = &self.color {
            font.color = Some(color.clone());
        }
    }
}

/// Partial fill update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FillPatch {
    pub color: Option<String>,
}

/// Partial alignment update.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AlignmentPatch {
    pub horizontal: Option<HorizontalAlign>,
    pub vertical: Option<VerticalAlign>,
    pub wrap_text: Option<bool>,
}

impl AlignmentPatch {
    fn apply_to(&self, alignment: &mut CellAlignment) {
        if let Some(horizontal) = self.horizontal {
            alignment.horizontal = Some(horizontal);
        }
        if let Some(vertical) = self.vertical {
            alignment.vertical = Some(vertical);
        }
        if let Some(wrap_text) = self.wrap_text {
            alignment.wrap_text = wrap_text;
        }
    }
}

/// Partial cell update: every field is optional, sub-records merge
/// key-by-key rather than being replaced wholesale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellPatch {
    pub value: Option<String>,
    pub font: Option<FontPatch>,
    pub fill: Option<FillPatch>,
    pub alignment: Option<AlignmentPatch>,
    pub image: Option<CellImage>,
}
