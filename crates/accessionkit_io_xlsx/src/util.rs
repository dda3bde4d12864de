//! Stateless helper utilities used by the XLSX writer kernel.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

use crate::conf::{
    N_LEN_EXCEL_CELL_TEXT_MAX, N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX,
    N_WIDTH_EXCEL_COLUMN_MAX, TUP_EXCEL_ILLEGAL,
};
use crate::spec::{EnumCellValue, SpecColumn};

////////////////////////////////////////////////////////////////////////////////
// #region CellValueConversion

/// Convert one JSON field value into a cell value.
///
/// Strings stay text and numbers stay numeric; no coercion between the two.
/// Empty strings and `null` become blank cells. Nested values are written as
/// their compact JSON text.
pub fn convert_json_to_cell_value(value: Option<&Value>) -> EnumCellValue {
    match value {
        None | Some(Value::Null) => EnumCellValue::None,
        Some(Value::String(s)) if s.is_empty() => EnumCellValue::None,
        Some(Value::String(s)) => EnumCellValue::String(s.clone()),
        Some(Value::Number(n)) => match n.as_f64() {
            Some(val) if val.is_finite() => EnumCellValue::Number(val),
            _ => EnumCellValue::String(n.to_string()),
        },
        Some(Value::Bool(val)) => EnumCellValue::Boolean(*val),
        Some(other) => EnumCellValue::String(other.to_string()),
    }
}

/// Cut text to the Excel cell limit; returns `true` when truncated.
pub fn truncate_cell_text(text: &mut String) -> bool {
    if text.len() <= N_LEN_EXCEL_CELL_TEXT_MAX {
        return false;
    }
    match text.char_indices().nth(N_LEN_EXCEL_CELL_TEXT_MAX) {
        Some((n_idx_byte, _)) => {
            text.truncate(n_idx_byte);
            true
        }
        None => false,
    }
}

/// Convert a pixel row height to points (96 dpi).
pub fn convert_pixels_to_points(height_px: f64) -> f64 {
    height_px * 0.75
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ColumnValidation

/// Validate that `columns` has no duplicated names.
pub fn validate_unique_columns(columns: &[String]) -> Result<(), String> {
    if columns.len() == columns.iter().collect::<BTreeSet<_>>().len() {
        return Ok(());
    }

    let mut dict_pos: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (n_idx, c_name) in columns.iter().enumerate() {
        dict_pos.entry(c_name).or_default().push(n_idx);
    }

    let c_msg = dict_pos
        .iter()
        .filter_map(|(c_name, l_pos)| {
            if l_pos.len() > 1 {
                Some(format!(
                    "{c_name:?} x{} at indices {:?}",
                    l_pos.len(),
                    l_pos
                ))
            } else {
                None
            }
        })
        .collect::<Vec<_>>()
        .join("; ");

    Err(format!("Duplicate column names detected: {c_msg}"))
}

/// Validate column widths against Excel limits.
pub fn validate_column_widths(columns: &[SpecColumn]) -> Result<(), String> {
    for (n_idx, column) in columns.iter().enumerate() {
        if !column.width.is_finite()
            || column.width < 0.0
            || column.width > N_WIDTH_EXCEL_COLUMN_MAX
        {
            return Err(format!(
                "Column {n_idx} ({:?}) width {} outside 0..={N_WIDTH_EXCEL_COLUMN_MAX}.",
                column.name, column.width
            ));
        }
    }
    Ok(())
}

/// Validate that one sheet of `height_total` rows by `width_total` columns fits Excel.
pub fn validate_sheet_shape(height_total: usize, width_total: usize) -> Result<(), String> {
    if width_total == 0 {
        return Err("At least one column is required.".to_string());
    }
    if width_total > N_NCOLS_EXCEL_MAX {
        return Err(format!(
            "Too many columns: {width_total} exceeds Excel limit {N_NCOLS_EXCEL_MAX}."
        ));
    }
    if height_total > N_NROWS_EXCEL_MAX {
        return Err(format!(
            "Too many rows: {height_total} exceeds Excel limit {N_NROWS_EXCEL_MAX}."
        ));
    }
    Ok(())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SheetNormalization

/// Replace invalid chars and trim to valid Excel sheet name.
pub fn sanitize_sheet_name(name: &str, replace_to: &str) -> String {
    let mut c_name = name.to_string();
    for c_illegal in TUP_EXCEL_ILLEGAL {
        c_name = c_name.replace(c_illegal, replace_to);
    }
    c_name = c_name.trim().trim_matches('\'').to_string();
    if c_name.is_empty() {
        c_name = "Sheet".to_string();
    }

    c_name.chars().take(N_LEN_EXCEL_SHEET_NAME_MAX).collect()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
