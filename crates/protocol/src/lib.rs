//! FormGrid Template Schema — v1 Frozen Wire Format
//!
//! This crate defines the canonical persisted representation of a form
//! template, exchanged as JSON with the template-storage service and
//! written by `fgrid` to template files on disk.
//!
//! # Schema Version
//!
//! This is **schema v1** — the wire format is frozen. Templates written by
//! older deployments must keep loading; changes require:
//! 1. Version bump in TEMPLATE_SCHEMA_VERSION
//! 2. Backward compatibility handling in `formgrid-io`
//!
//! All coordinates on the wire are **1-based** and inclusive, matching the
//! storage service. The engine's 0-based coordinates are converted at the
//! `formgrid-io` boundary.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Current template schema version. Increment for breaking changes.
pub const TEMPLATE_SCHEMA_VERSION: u32 = 1;

/// A complete persisted template.
///
/// `max_row`/`max_column` are required; every other section defaults to
/// empty so sparse payloads stay sparse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateDoc {
    pub max_row: u32,
    pub max_column: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cells: Vec<CellEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub merged_cells: Vec<MergeEntry>,
    /// 1-based row number (as a string key) -> height in pixels.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub row_heights: BTreeMap<String, f64>,
    /// Column letters -> width in pixels.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub column_widths: BTreeMap<String, f64>,
    /// Logical field key -> cell address ("patientName" -> "M9").
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub data_mappings: BTreeMap<String, String>,
}

/// One populated cell. Only cells with a value, a non-default style, or an
/// image are persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellEntry {
    /// 1-based row
    pub row: u32,
    /// 1-based column
    pub col: u32,
    /// Redundant with `col` ("C"); kept for consumers that key by letters.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub col_letter: String,
    /// Redundant with `row`/`col` ("C5"); kept for consumers that key by address.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub address: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<FontDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<FillDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<AlignmentDef>,
    /// Base64-encoded image payload.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "base64_opt")]
    pub image: Option<Vec<u8>>,
    #[serde(
        default,
        rename = "imageWidth",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_width: Option<f64>,
    #[serde(
        default,
        rename = "imageHeight",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_height: Option<f64>,
}

/// Font attributes for one cell. Absent fields inherit defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FontDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub italic: bool,
    /// RGB or ARGB hex string ("FF0000" / "FFFF0000").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Background fill for one cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FillDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Text alignment for one cell. Axis values are lowercase on the wire
/// ("left" / "center" / "right", "top" / "center" / "bottom").
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlignmentDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizontal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertical: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub wrap_text: bool,
}

/// One merged region, 1-based inclusive on both axes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeEntry {
    /// Display form ("A1:B2"); redundant with the bounds.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub range: String,
    pub min_row: u32,
    pub max_row: u32,
    pub min_col: u32,
    pub max_col: u32,
}

/// Template metadata returned by the storage service's list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateSummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_default: bool,
}

/// Base64 (de)serialization for optional binary payloads.
mod base64_opt {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(data: &Option<Vec<u8>>, ser: S) -> Result<S::Ok, S::Error> {
        match data {
            Some(bytes) => ser.serialize_str(&STANDARD.encode(bytes)),
            None => ser.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Option<Vec<u8>>, D::Error> {
        let encoded: Option<String> = Option::deserialize(de)?;
        match encoded {
            Some(s) => STANDARD
                .decode(s.as_bytes())
                .map(Some)
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_doc_parses() {
        let json = r#"{"max_row": 100, "max_column": 30}"#;
        let doc: TemplateDoc = serde_json::from_str(json).unwrap();
        assert_eq!(doc.max_row, 100);
        assert_eq!(doc.max_column, 30);
        assert!(doc.cells.is_empty());
        assert!(doc.merged_cells.is_empty());
        assert!(doc.data_mappings.is_empty());
    }

    #[test]
    fn test_missing_bounds_rejected() {
        let json = r#"{"cells": []}"#;
        assert!(serde_json::from_str::<TemplateDoc>(json).is_err());
    }

    #[test]
    fn test_stored_payload_parses() {
        // Shape produced by existing deployments of the storage service
        let json = r#"{
            "max_row": 50,
            "max_column": 26,
            "cells": [
                {
                    "row": 9,
                    "col": 4,
                    "col_letter": "D",
                    "address": "D9",
                    "value": "Protocol No",
                    "font": {"name": "Arial", "size": 10, "bold": true, "color": "FF1F2937"},
                    "fill": {"color": "FFE5E7EB"},
                    "alignment": {"horizontal": "center", "vertical": "center", "wrap_text": true}
                }
            ],
            "merged_cells": [
                {"range": "A1:C2", "min_row": 1, "max_row": 2, "min_col": 1, "max_col": 3}
            ],
            "row_heights": {"9": 28.5},
            "column_widths": {"D": 14.0},
            "data_mappings": {"healmedyProtocol": "D9"}
        }"#;

        let doc: TemplateDoc = serde_json::from_str(json).unwrap();
        let cell = &doc.cells[0];
        assert_eq!(cell.address, "D9");
        assert!(cell.font.as_ref().unwrap().bold);
        assert!(!cell.font.as_ref().unwrap().italic);
        assert_eq!(cell.alignment.as_ref().unwrap().horizontal.as_deref(), Some("center"));
        assert_eq!(doc.merged_cells[0].max_col, 3);
        assert_eq!(doc.row_heights.get("9"), Some(&28.5));
        assert_eq!(doc.data_mappings.get("healmedyProtocol").map(String::as_str), Some("D9"));
    }

    #[test]
    fn test_image_roundtrips_as_base64() {
        let entry = CellEntry {
            row: 1,
            col: 1,
            col_letter: "A".into(),
            address: "A1".into(),
            value: String::new(),
            font: None,
            fill: None,
            alignment: None,
            image: Some(vec![0x89, 0x50, 0x4E, 0x47]),
            image_width: Some(120.0),
            image_height: Some(48.0),
        };

        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"image\":\"iVBORw==\""));
        assert!(json.contains("\"imageWidth\":120.0"));

        let parsed: CellEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, entry);
    }

    #[test]
    fn test_sparse_serialization_omits_defaults() {
        let doc = TemplateDoc {
            max_row: 10,
            max_column: 10,
            cells: vec![CellEntry {
                row: 1,
                col: 1,
                col_letter: String::new(),
                address: String::new(),
                value: "x".into(),
                font: None,
                fill: None,
                alignment: None,
                image: None,
                image_width: None,
                image_height: None,
            }],
            merged_cells: Vec::new(),
            row_heights: BTreeMap::new(),
            column_widths: BTreeMap::new(),
            data_mappings: BTreeMap::new(),
        };

        let json = serde_json::to_string(&doc).unwrap();
        assert!(!json.contains("merged_cells"));
        assert!(!json.contains("font"));
        assert!(!json.contains("image"));
    }
}
