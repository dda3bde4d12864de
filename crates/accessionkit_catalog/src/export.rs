//! Render projected records as the single-sheet catalog workbook.

use std::path::Path;

use accessionkit_io_fs::{Record, SpecWriteReport, write_bytes_atomic};
use accessionkit_io_xlsx::{
    SpecColumn, SpecXlsxWriteOptions, XlsxWriter, convert_pixels_to_points,
};
use tracing::{debug, info, warn};

use crate::spec::{CatalogError, SpecExportArtifact, SpecExportOptions};

/// Render `records` into XLSX bytes (buffer mode).
pub fn render_workbook(
    records: &[Record],
    columns: &[SpecColumn],
    spec_export_options: &SpecExportOptions,
) -> Result<SpecExportArtifact, CatalogError> {
    let mut writer = XlsxWriter::with_options(SpecXlsxWriteOptions {
        row_height_data: Some(convert_pixels_to_points(spec_export_options.row_height_px)),
        if_freeze_header: spec_export_options.if_freeze_header,
        ..Default::default()
    });
    writer
        .write_sheet_from_records(records, columns, &spec_export_options.sheet_name)
        .map_err(CatalogError::Export)?;
    let v_bytes = writer.close().map_err(CatalogError::Export)?;

    let report = writer
        .report()
        .cloned()
        .ok_or_else(|| CatalogError::Export("Writer produced no sheet report.".to_string()))?;
    for c_warning in &report.warnings {
        warn!(warning = %c_warning, "export warning");
    }
    debug!(
        sheet = %report.sheet_name,
        rows = report.n_rows_written,
        cols = report.n_cols_written,
        bytes = v_bytes.len(),
        "workbook rendered"
    );

    Ok(SpecExportArtifact::new(
        &spec_export_options.file_name,
        v_bytes,
        report,
    ))
}

/// Render `records` and commit the workbook to `path_file` (file mode).
///
/// The file is written via temp file + rename, so a failed export never
/// leaves a partial workbook behind.
pub fn save_workbook(
    records: &[Record],
    columns: &[SpecColumn],
    spec_export_options: &SpecExportOptions,
    path_file: &Path,
) -> Result<SpecWriteReport, CatalogError> {
    let artifact = render_workbook(records, columns, spec_export_options)?;
    let report = write_bytes_atomic(path_file, &artifact.bytes, false)
        .map_err(|e| CatalogError::Export(e.to_string()))?;
    info!(
        path = %report.path.display(),
        bytes = report.bytes_written,
        "workbook saved"
    );
    Ok(report)
}
