//! XLSX constants and default preset factories.

use crate::spec::SpecCellFormat;

/// Excel worksheet maximum row count.
pub const N_NROWS_EXCEL_MAX: usize = 1_048_576;
/// Excel worksheet maximum column count.
pub const N_NCOLS_EXCEL_MAX: usize = 16_384;
/// Excel sheet name maximum length.
pub const N_LEN_EXCEL_SHEET_NAME_MAX: usize = 31;
/// Excel maximum characters in one text cell.
pub const N_LEN_EXCEL_CELL_TEXT_MAX: usize = 32_767;
/// Excel maximum column width in character units.
pub const N_WIDTH_EXCEL_COLUMN_MAX: f64 = 255.0;
/// Characters not allowed in sheet names.
pub const TUP_EXCEL_ILLEGAL: [&str; 7] = ["*", ":", "?", "/", "\\", "[", "]"];

/// Canonical format preset keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumFmtKey {
    /// Header row cell format.
    Header,
    /// Body cell format.
    Data,
}

/// Build one default format preset used by [`crate::writer::XlsxWriter`].
pub fn derive_default_xlsx_format(key: EnumFmtKey) -> SpecCellFormat {
    let cfg_base_fmt_spec = SpecCellFormat {
        font_name: Some("Calibri".to_string()),
        font_size: Some(11),
        valign_center: Some(true),
        ..Default::default()
    };

    match key {
        EnumFmtKey::Header => cfg_base_fmt_spec.with_(SpecCellFormat {
            bold: Some(true),
            ..Default::default()
        }),
        EnumFmtKey::Data => cfg_base_fmt_spec,
    }
}
