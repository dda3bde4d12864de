//! XLSX writer kernel that converts JSON records into workbook output.

use rust_xlsxwriter::{Format, FormatAlign, Workbook, Worksheet, XlsxError};
use serde_json::{Map, Value};

use crate::conf::{EnumFmtKey, derive_default_xlsx_format};
use crate::spec::{EnumCellValue, SpecCellFormat, SpecColumn, SpecXlsxReport, SpecXlsxWriteOptions};
use crate::util::{
    convert_json_to_cell_value, sanitize_sheet_name, truncate_cell_text, validate_column_widths,
    validate_sheet_shape, validate_unique_columns,
};

/// Stateful single-sheet workbook writer.
///
/// The sheet is buffered in memory; [`Self::close`] renders the workbook bytes.
pub struct XlsxWriter {
    workbook: Workbook,
    fmt_header: SpecCellFormat,
    fmt_data: SpecCellFormat,
    write_options: SpecXlsxWriteOptions,
    report: Option<SpecXlsxReport>,
    v_buffer_closed: Option<Vec<u8>>,
}

impl XlsxWriter {
    /// Create writer with explicit header/data formats and options.
    pub fn new(
        fmt_header: SpecCellFormat,
        fmt_data: SpecCellFormat,
        write_options: SpecXlsxWriteOptions,
    ) -> Self {
        Self {
            workbook: Workbook::new(),
            fmt_header,
            fmt_data,
            write_options,
            report: None,
            v_buffer_closed: None,
        }
    }

    /// Create writer with default format presets.
    pub fn with_options(write_options: SpecXlsxWriteOptions) -> Self {
        Self::new(
            derive_default_xlsx_format(EnumFmtKey::Header),
            derive_default_xlsx_format(EnumFmtKey::Data),
            write_options,
        )
    }

    /// Report of the written sheet, if any.
    pub fn report(&self) -> Option<&SpecXlsxReport> {
        self.report.as_ref()
    }

    /// Render the workbook into an in-memory XLSX buffer. Idempotent.
    pub fn close(&mut self) -> Result<Vec<u8>, String> {
        if let Some(v_buffer) = &self.v_buffer_closed {
            return Ok(v_buffer.clone());
        }
        if self.report.is_none() {
            return Err("Cannot close a workbook without a sheet.".to_string());
        }
        let v_buffer = self
            .workbook
            .save_to_buffer()
            .map_err(derive_xlsx_error_text)?;
        self.v_buffer_closed = Some(v_buffer.clone());
        Ok(v_buffer)
    }

    /// Write the sheet: a header row of column names, then one row per record.
    ///
    /// Each record is read by column name; absent fields become blank cells.
    /// A workbook holds exactly one sheet.
    pub fn write_sheet_from_records(
        &mut self,
        records: &[Map<String, Value>],
        columns: &[SpecColumn],
        sheet_name: &str,
    ) -> Result<(), String> {
        if self.v_buffer_closed.is_some() {
            return Err("Cannot write after close().".to_string());
        }
        if self.report.is_some() {
            return Err("Workbook already holds a sheet.".to_string());
        }

        let l_colnames: Vec<String> = columns.iter().map(|col| col.name.clone()).collect();
        validate_unique_columns(&l_colnames)?;
        validate_column_widths(columns)?;
        validate_sheet_shape(records.len() + 1, columns.len())?;

        let fmt_header = derive_rust_xlsx_format(&self.fmt_header);
        let fmt_data = derive_rust_xlsx_format(&self.fmt_data);

        let mut report = SpecXlsxReport {
            sheet_name: sanitize_sheet_name(sheet_name, "_"),
            ..Default::default()
        };

        let worksheet = self.workbook.add_worksheet();
        worksheet
            .set_name(&report.sheet_name)
            .map_err(derive_xlsx_error_text)?;

        write_header(worksheet, &l_colnames, &fmt_header)?;

        for (n_idx_record, record) in records.iter().enumerate() {
            let n_idx_row = n_idx_record + 1;
            for (n_idx_col, c_colname) in l_colnames.iter().enumerate() {
                let mut value = convert_json_to_cell_value(record.get(c_colname));
                if let EnumCellValue::String(text) = &mut value
                    && truncate_cell_text(text)
                {
                    report.warn(format!(
                        "Row {n_idx_row}, column {c_colname:?}: text truncated to Excel cell limit."
                    ));
                }
                write_cell_with_format(worksheet, n_idx_row, n_idx_col, &value, &fmt_data)?;
            }

            if let Some(height) = self.write_options.row_height_data {
                worksheet
                    .set_row_height(cast_row_num(n_idx_row)?, height)
                    .map_err(derive_xlsx_error_text)?;
            }
        }

        for (n_idx_col, column) in columns.iter().enumerate() {
            worksheet
                .set_column_width(cast_col_num(n_idx_col)?, column.width)
                .map_err(derive_xlsx_error_text)?;
        }

        if self.write_options.if_freeze_header {
            worksheet
                .set_freeze_panes(1, 0)
                .map_err(derive_xlsx_error_text)?;
        }

        report.n_rows_written = records.len() + 1;
        report.n_cols_written = columns.len();
        report.widths = columns.iter().map(|col| col.width).collect();
        self.report = Some(report);
        Ok(())
    }
}

fn write_header(
    worksheet: &mut Worksheet,
    l_colnames: &[String],
    fmt_header: &Format,
) -> Result<(), String> {
    for (col_idx, cell_value) in l_colnames.iter().enumerate() {
        if cell_value.is_empty() {
            worksheet
                .write_blank(0, cast_col_num(col_idx)?, fmt_header)
                .map_err(derive_xlsx_error_text)?;
        } else {
            worksheet
                .write_string_with_format(0, cast_col_num(col_idx)?, cell_value, fmt_header)
                .map_err(derive_xlsx_error_text)?;
        }
    }
    Ok(())
}

fn write_cell_with_format(
    worksheet: &mut Worksheet,
    row_idx: usize,
    col_idx: usize,
    value: &EnumCellValue,
    format: &Format,
) -> Result<(), String> {
    let n_row = cast_row_num(row_idx)?;
    let n_col = cast_col_num(col_idx)?;
    match value {
        EnumCellValue::None => {
            worksheet
                .write_blank(n_row, n_col, format)
                .map_err(derive_xlsx_error_text)?;
        }
        EnumCellValue::String(val) => {
            worksheet
                .write_string_with_format(n_row, n_col, val, format)
                .map_err(derive_xlsx_error_text)?;
        }
        EnumCellValue::Number(val) => {
            worksheet
                .write_number_with_format(n_row, n_col, *val, format)
                .map_err(derive_xlsx_error_text)?;
        }
        EnumCellValue::Boolean(val) => {
            worksheet
                .write_boolean_with_format(n_row, n_col, *val, format)
                .map_err(derive_xlsx_error_text)?;
        }
    }
    Ok(())
}

fn derive_rust_xlsx_format(spec: &SpecCellFormat) -> Format {
    let mut format = Format::new();

    if let Some(val) = &spec.font_name {
        format = format.set_font_name(val.clone());
    }
    if let Some(val) = spec.font_size {
        format = format.set_font_size(val as f64);
    }
    if spec.bold.unwrap_or(false) {
        format = format.set_bold();
    }
    if spec.valign_center.unwrap_or(false) {
        format = format.set_align(FormatAlign::VerticalCenter);
    }

    format
}

fn cast_row_num(value: usize) -> Result<u32, String> {
    u32::try_from(value).map_err(|_| format!("row index overflow: {value}"))
}

fn cast_col_num(value: usize) -> Result<u16, String> {
    u16::try_from(value).map_err(|_| format!("column index overflow: {value}"))
}

fn derive_xlsx_error_text(err: XlsxError) -> String {
    format!("xlsx write error: {err}")
}
