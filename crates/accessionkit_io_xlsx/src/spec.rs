//! Shared XLSX specification models.

////////////////////////////////////////////////////////////////////////////////
// #region CellFormatSpecification

/// Cell format specification.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SpecCellFormat {
    /// Font family name.
    pub font_name: Option<String>,
    /// Font size in points.
    pub font_size: Option<i64>,
    /// Bold style.
    pub bold: Option<bool>,
    /// Center text vertically within the row.
    pub valign_center: Option<bool>,
}

impl SpecCellFormat {
    /// Return a new format by overlaying `patch` onto `self`.
    pub fn with_(&self, patch: SpecCellFormat) -> SpecCellFormat {
        SpecCellFormat {
            font_name: patch.font_name.or_else(|| self.font_name.clone()),
            font_size: patch.font_size.or(self.font_size),
            bold: patch.bold.or(self.bold),
            valign_center: patch.valign_center.or(self.valign_center),
        }
    }
}

/// Normalized cell value during conversion/write pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumCellValue {
    /// Missing/blank value.
    None,
    /// Text value.
    String(String),
    /// Numeric value.
    Number(f64),
    /// Boolean value.
    Boolean(bool),
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ColumnSpecification

/// One output column: header text plus display width in character units.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecColumn {
    /// Header text and record field name.
    pub name: String,
    /// Column width in Excel character units.
    pub width: f64,
}

impl SpecColumn {
    /// Build a column from name and width.
    pub fn new(name: impl Into<String>, width: f64) -> Self {
        Self {
            name: name.into(),
            width,
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region WriteOptions

/// Writer-wide options controlling layout defaults.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecXlsxWriteOptions {
    /// Height (points) applied to every data row; `None` keeps Excel default.
    pub row_height_data: Option<f64>,
    /// Freeze the header row.
    pub if_freeze_header: bool,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ReportSpecification

/// Sheet write report.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecXlsxReport {
    /// Sanitised sheet name as written.
    pub sheet_name: String,
    /// Rows written, header included.
    pub n_rows_written: usize,
    /// Columns written.
    pub n_cols_written: usize,
    /// Widths applied, in column order.
    pub widths: Vec<f64>,
    /// Non-fatal warnings.
    pub warnings: Vec<String>,
}

impl SpecXlsxReport {
    /// Add a warning message.
    pub fn warn(&mut self, msg: impl AsRef<str>) {
        self.warnings.push(msg.as_ref().to_string());
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
