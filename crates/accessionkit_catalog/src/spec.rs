//! Catalog options, artifacts and errors.

use accessionkit_io_fs::StoreError;
use accessionkit_io_xlsx::SpecXlsxReport;
use thiserror::Error;

use crate::conf::{
    C_EXPORT_FILE_NAME_DEFAULT, C_MERGE_KEY_DEFAULT, C_SHEET_NAME_DEFAULT, C_XLSX_CONTENT_TYPE,
    N_ROW_HEIGHT_PX_DEFAULT,
};

////////////////////////////////////////////////////////////////////////////////
// #region MergeOptions

/// How secondary records are associated with primary records.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EnumJoinMode {
    /// Pair records by array index.
    #[default]
    Positional,
    /// Pair records by the string form of a shared field.
    ///
    /// Strings are trimmed; numbers compare by value when integral
    /// (`3`, `3.0` and `"3"` match) but numeric-looking strings are not
    /// normalised (`"3.0"` does not match `3`). The primary record keeps its
    /// own key value.
    Keyed {
        /// Join field name.
        key: String,
    },
}

impl EnumJoinMode {
    /// Keyed join on the default accession field.
    pub fn keyed_default() -> Self {
        Self::Keyed {
            key: C_MERGE_KEY_DEFAULT.to_string(),
        }
    }
}

/// Policy when positional inputs differ in length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumAlignmentRule {
    /// Merge anyway and record a warning.
    #[default]
    Lenient,
    /// Fail with [`CatalogError::Alignment`].
    Strict,
}

/// Input options for [`crate::merge::merge`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecMergeOptions {
    /// Join strategy.
    pub mode: EnumJoinMode,
    /// Length mismatch policy (positional mode only).
    pub rule_alignment: EnumAlignmentRule,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ExportOptions

/// Input options for [`crate::export::render_workbook`].
#[derive(Debug, Clone, PartialEq)]
pub struct SpecExportOptions {
    /// Worksheet name.
    pub sheet_name: String,
    /// Suggested download file name.
    pub file_name: String,
    /// Data-row height in pixels.
    pub row_height_px: f64,
    /// Freeze the header row.
    pub if_freeze_header: bool,
}

impl Default for SpecExportOptions {
    fn default() -> Self {
        Self {
            sheet_name: C_SHEET_NAME_DEFAULT.to_string(),
            file_name: C_EXPORT_FILE_NAME_DEFAULT.to_string(),
            row_height_px: N_ROW_HEIGHT_PX_DEFAULT,
            if_freeze_header: false,
        }
    }
}

/// Rendered workbook plus delivery metadata.
#[derive(Debug, Clone)]
pub struct SpecExportArtifact {
    /// Suggested download file name.
    pub file_name: String,
    /// MIME type.
    pub content_type: &'static str,
    /// XLSX bytes.
    pub bytes: Vec<u8>,
    /// Writer report for the single sheet.
    pub report: SpecXlsxReport,
}

impl SpecExportArtifact {
    pub(crate) fn new(file_name: &str, bytes: Vec<u8>, report: SpecXlsxReport) -> Self {
        Self {
            file_name: file_name.to_string(),
            content_type: C_XLSX_CONTENT_TYPE,
            bytes,
            report,
        }
    }

    /// `Content-Disposition` header value.
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename={}", self.file_name)
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Catalog-level failures.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Underlying document store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Positional merge inputs differ in length under strict alignment.
    #[error("Dataset length mismatch: primary has {primary} records, secondary has {secondary}")]
    Alignment {
        /// Primary record count.
        primary: usize,
        /// Secondary record count.
        secondary: usize,
    },

    /// Replacement payload has the wrong shape.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// Workbook rendering or saving failed.
    #[error("Export failed: {0}")]
    Export(String),
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
