//! Catalog schema and export defaults.

use accessionkit_io_xlsx::SpecColumn;

/// Fixed export schema: `(header, width)` in output order.
///
/// Header text is matched verbatim against record fields, trailing spaces
/// included; `VOLUME` and `VOLUME ` are two distinct columns.
pub const TUP_CATALOG_COLUMNS: [(&str, f64); 17] = [
    ("ACCESSION", 7.0),
    ("DATE ", 17.28515625),
    ("NAME", 37.0),
    ("TITLE", 45.28515625),
    ("EDITION ", 7.28),
    ("VOLUME", 7.28515625),
    ("PUBLISHER & PUBLICATION PLACE ", 33.85546875),
    ("YEAR ", 9.0),
    ("PAGES ", 9.0),
    ("VOLUME ", 9.0),
    ("SOURCE ", 18.140625),
    ("COST ", 9.0),
    ("DEPT", 14.0),
    ("REMARK", 22.0),
    ("CHALLAN NO.", 13.0),
    ("CHALLAN DATE ", 17.140625),
    ("PLACE", 15.0),
];

/// Worksheet name of the export.
pub const C_SHEET_NAME_DEFAULT: &str = "Sheet1";
/// Download file name of the export.
pub const C_EXPORT_FILE_NAME_DEFAULT: &str = "output.xlsx";
/// Data-row height in pixels.
pub const N_ROW_HEIGHT_PX_DEFAULT: f64 = 28.8;
/// Default join key for keyed merges.
pub const C_MERGE_KEY_DEFAULT: &str = "ACCESSION";
/// Record count above which projection runs on the rayon pool.
pub const N_RECORDS_PARALLEL_MIN: usize = 2_048;
/// MIME type of the export.
pub const C_XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Build the export schema as writer columns.
pub fn derive_catalog_columns() -> Vec<SpecColumn> {
    TUP_CATALOG_COLUMNS
        .iter()
        .map(|(c_name, width)| SpecColumn::new(*c_name, *width))
        .collect()
}
