//! Two-document JSON dataset store.

use tracing::{debug, info};

use crate::spec::{Dataset, EnumDocumentKind, SpecStoreOptions, SpecWriteReport, StoreError};
use crate::util::{read_dataset, serialize_dataset, write_bytes_atomic};

/// Full-read / full-replace access to the primary and secondary documents.
///
/// The store holds no in-memory state besides its paths; every call hits the
/// filesystem. Writers are not serialised against each other: concurrent
/// replaces race and the last rename wins, while readers always observe a
/// complete document.
#[derive(Debug, Clone)]
pub struct DatasetStore {
    spec_store_options: SpecStoreOptions,
}

impl DatasetStore {
    /// Create a store bound to the given document paths.
    pub fn new(spec_store_options: SpecStoreOptions) -> Self {
        Self { spec_store_options }
    }

    /// Read the primary document.
    pub fn read_primary(&self) -> Result<Dataset, StoreError> {
        self.read(EnumDocumentKind::Primary)
    }

    /// Read the secondary document.
    pub fn read_secondary(&self) -> Result<Dataset, StoreError> {
        self.read(EnumDocumentKind::Secondary)
    }

    /// Read one document.
    pub fn read(&self, kind: EnumDocumentKind) -> Result<Dataset, StoreError> {
        let path_file = self.spec_store_options.path_for(kind);
        let dataset = read_dataset(path_file)?;
        debug!(
            document = kind.label(),
            path = %path_file.display(),
            records = dataset.len(),
            "dataset read"
        );
        Ok(dataset)
    }

    /// Replace the primary document wholesale.
    pub fn replace_primary(&self, dataset: &Dataset) -> Result<SpecWriteReport, StoreError> {
        let path_file = self.spec_store_options.path_for(EnumDocumentKind::Primary);
        let v_bytes = serialize_dataset(dataset, self.spec_store_options.indent_width).map_err(
            |e| StoreError::Write {
                path: path_file.to_path_buf(),
                message: e.to_string(),
            },
        )?;

        let report = write_bytes_atomic(
            path_file,
            &v_bytes,
            self.spec_store_options.if_keep_metadata,
        )?;
        info!(
            document = EnumDocumentKind::Primary.label(),
            path = %report.path.display(),
            records = dataset.len(),
            bytes = report.bytes_written,
            replaced = report.if_replaced_existing,
            "dataset replaced"
        );
        Ok(report)
    }
}
