//! Catalog operations exposed to the HTTP layer.

use std::path::Path;

use accessionkit_io_fs::{Dataset, DatasetStore, Record, SpecWriteReport};
use accessionkit_io_xlsx::SpecColumn;
use serde_json::Value;
use tracing::info;

use crate::conf::derive_catalog_columns;
use crate::export::{render_workbook, save_workbook};
use crate::merge::merge;
use crate::project::project;
use crate::spec::{CatalogError, SpecExportArtifact, SpecExportOptions, SpecMergeOptions};
use crate::validate::validate_payload;

/// Stateless orchestration over the dataset store.
///
/// Every call re-reads the documents; nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct CatalogService {
    store: DatasetStore,
    spec_merge_options: SpecMergeOptions,
    spec_export_options: SpecExportOptions,
    columns: Vec<SpecColumn>,
}

impl CatalogService {
    /// Create a service exporting the fixed catalog schema.
    pub fn new(
        store: DatasetStore,
        spec_merge_options: SpecMergeOptions,
        spec_export_options: SpecExportOptions,
    ) -> Self {
        Self {
            store,
            spec_merge_options,
            spec_export_options,
            columns: derive_catalog_columns(),
        }
    }

    /// Primary dataset exactly as stored.
    pub fn read_primary(&self) -> Result<Dataset, CatalogError> {
        Ok(self.store.read_primary()?)
    }

    /// Merged and projected records, one per primary record.
    pub fn read_merged_view(&self) -> Result<Vec<Record>, CatalogError> {
        let primary = self.store.read_primary()?;
        let secondary = self.store.read_secondary()?;
        let outcome = merge(&primary, &secondary, &self.spec_merge_options)?;
        Ok(project(&outcome.records, &self.columns))
    }

    /// Render the merged view as XLSX bytes.
    pub fn export_to_buffer(&self) -> Result<SpecExportArtifact, CatalogError> {
        let records = self.read_merged_view()?;
        let artifact = render_workbook(&records, &self.columns, &self.spec_export_options)?;
        info!(
            records = records.len(),
            bytes = artifact.bytes.len(),
            "catalog exported"
        );
        Ok(artifact)
    }

    /// Render the merged view and commit it to `path_file`.
    pub fn export_to_file(&self, path_file: &Path) -> Result<SpecWriteReport, CatalogError> {
        let records = self.read_merged_view()?;
        save_workbook(
            &records,
            &self.columns,
            &self.spec_export_options,
            path_file,
        )
    }

    /// Validate `payload` and replace the primary dataset with it.
    ///
    /// Storage is left untouched when validation fails.
    pub fn replace_primary(&self, payload: Value) -> Result<SpecWriteReport, CatalogError> {
        let dataset = validate_payload(payload)?;
        Ok(self.store.replace_primary(&dataset)?)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use accessionkit_io_fs::{SpecStoreOptions, StoreError};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::spec::EnumAlignmentRule;

    fn make_service(dir: &Path, spec_merge_options: SpecMergeOptions) -> CatalogService {
        let store = DatasetStore::new(SpecStoreOptions::from_dir(dir, "data.json", "data2.json"));
        CatalogService::new(store, spec_merge_options, SpecExportOptions::default())
    }

    fn write_json(path: &Path, value: &Value) {
        fs::write(path, serde_json::to_vec(value).expect("encode")).expect("write fixture");
    }

    #[test]
    fn replace_then_read_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let service = make_service(dir.path(), SpecMergeOptions::default());
        let payload = json!([
            {"ACCESSION": "1", "NAME": "Alice", "YEAR ": 1999},
            {"ACCESSION": "2", "TITLE": "Rust"}
        ]);

        service.replace_primary(payload.clone()).expect("replace");
        let dataset = service.read_primary().expect("read");
        assert_eq!(Value::Array(dataset.into_iter().map(Value::Object).collect()), payload);
    }

    #[test]
    fn invalid_payload_leaves_storage_untouched() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path_primary = dir.path().join("data.json");
        write_json(&path_primary, &json!([{"ACCESSION": "1"}]));
        let v_before = fs::read(&path_primary).expect("read");

        let service = make_service(dir.path(), SpecMergeOptions::default());
        let err = service
            .replace_primary(json!({"not": "an array"}))
            .expect_err("must fail");
        assert!(matches!(err, CatalogError::InvalidPayload(_)));
        assert_eq!(fs::read(&path_primary).expect("read"), v_before);
    }

    #[test]
    fn merged_view_follows_primary_length() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_json(
            &dir.path().join("data.json"),
            &json!([{"ACCESSION": "1", "NAME": "Alice"}, {"ACCESSION": "2", "NAME": "Bob"}]),
        );
        write_json(&dir.path().join("data2.json"), &json!([{"COST ": "10"}]));

        let service = make_service(dir.path(), SpecMergeOptions::default());
        let records = service.read_merged_view().expect("merged view");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["COST "], json!("10"));
        assert_eq!(records[1]["COST "], json!(""));
        assert_eq!(records[1]["NAME"], json!("Bob"));
        assert_eq!(records[0].len(), 17);
    }

    #[test]
    fn strict_alignment_surfaces_as_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_json(&dir.path().join("data.json"), &json!([{"ACCESSION": "1"}]));
        write_json(&dir.path().join("data2.json"), &json!([]));

        let service = make_service(
            dir.path(),
            SpecMergeOptions {
                rule_alignment: EnumAlignmentRule::Strict,
                ..Default::default()
            },
        );
        assert!(matches!(
            service.read_merged_view(),
            Err(CatalogError::Alignment { .. })
        ));
    }

    #[test]
    fn missing_secondary_is_a_store_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_json(&dir.path().join("data.json"), &json!([]));

        let service = make_service(dir.path(), SpecMergeOptions::default());
        assert!(matches!(
            service.export_to_buffer(),
            Err(CatalogError::Store(StoreError::NotFound(_)))
        ));
    }

    #[test]
    fn export_to_buffer_and_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_json(
            &dir.path().join("data.json"),
            &json!([{"ACCESSION": "1", "NAME": "Alice"}]),
        );
        write_json(&dir.path().join("data2.json"), &json!([{"COST ": "10"}]));
        let service = make_service(dir.path(), SpecMergeOptions::default());

        let artifact = service.export_to_buffer().expect("buffer");
        assert_eq!(artifact.report.n_rows_written, 2);
        assert!(artifact.bytes.starts_with(b"PK"));

        let path_file = dir.path().join("export.xlsx");
        let report = service.export_to_file(&path_file).expect("file");
        assert!(path_file.is_file());
        assert!(report.bytes_written > 0);
    }
}
