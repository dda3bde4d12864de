//! `accessionkit_io_xlsx` v1:
//! Record-oriented XLSX writer kernel.
//!
//! Modules:
//! - `conf`   : Excel limits and default presets
//! - `spec`   : formats, columns, options, reports
//! - `util`   : pure helper functions
//! - `writer` : workbook writer
pub mod conf;
pub mod spec;
pub mod util;
pub mod writer;

pub use conf::{
    EnumFmtKey, N_LEN_EXCEL_CELL_TEXT_MAX, N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX,
    N_NROWS_EXCEL_MAX, TUP_EXCEL_ILLEGAL, derive_default_xlsx_format,
};
pub use spec::{EnumCellValue, SpecCellFormat, SpecColumn, SpecXlsxReport, SpecXlsxWriteOptions};
pub use util::{convert_json_to_cell_value, convert_pixels_to_points, sanitize_sheet_name};
pub use writer::XlsxWriter;
