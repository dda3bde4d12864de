//! Dataset store models, options and top-level error types.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////
// #region DataModel

/// One flat catalog record: field name to scalar JSON value.
pub type Record = Map<String, Value>;

/// Ordered sequence of records persisted as one JSON array document.
pub type Dataset = Vec<Record>;

/// Which of the two persisted documents an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumDocumentKind {
    /// Editable catalog fields.
    Primary,
    /// Supplementary fields (cost, remarks, ...).
    Secondary,
}

impl EnumDocumentKind {
    /// Short lowercase label used in logs.
    pub fn label(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region StructsAndErrors

/// Input options for [`crate::store::DatasetStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecStoreOptions {
    /// Primary document path.
    pub path_file_primary: PathBuf,
    /// Secondary document path.
    pub path_file_secondary: PathBuf,
    /// Indentation width used when serialising replaced documents.
    pub indent_width: usize,
    /// Carry permissions/xattrs of the replaced document over to the new one.
    pub if_keep_metadata: bool,
}

impl SpecStoreOptions {
    /// Build options rooted at `dir_data` with the given file names.
    pub fn from_dir(dir_data: impl AsRef<Path>, name_primary: &str, name_secondary: &str) -> Self {
        let path_dir_data = dir_data.as_ref();
        Self {
            path_file_primary: path_dir_data.join(name_primary),
            path_file_secondary: path_dir_data.join(name_secondary),
            ..Self::default()
        }
    }

    /// Resolve the document path for `kind`.
    pub fn path_for(&self, kind: EnumDocumentKind) -> &Path {
        match kind {
            EnumDocumentKind::Primary => &self.path_file_primary,
            EnumDocumentKind::Secondary => &self.path_file_secondary,
        }
    }
}

impl Default for SpecStoreOptions {
    fn default() -> Self {
        Self {
            path_file_primary: PathBuf::from("public/data.json"),
            path_file_secondary: PathBuf::from("public/data2.json"),
            indent_width: 2,
            if_keep_metadata: true,
        }
    }
}

/// Outcome of one atomic document write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecWriteReport {
    /// Final document path.
    pub path: PathBuf,
    /// Number of bytes committed.
    pub bytes_written: u64,
    /// Whether a previous document was replaced.
    pub if_replaced_existing: bool,
}

/// Store failures surfaced to callers.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Document does not exist.
    #[error("Document not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Document exists but could not be read.
    #[error("Failed to read {}: {message}", path.display())]
    Read {
        /// Document path.
        path: PathBuf,
        /// Underlying IO error text.
        message: String,
    },

    /// Document is not a JSON array of objects.
    #[error("Failed to parse {}: {message}", path.display())]
    Parse {
        /// Document path.
        path: PathBuf,
        /// Parser error text.
        message: String,
    },

    /// Serialising or committing a document failed.
    #[error("Failed to write {}: {message}", path.display())]
    Write {
        /// Target path.
        path: PathBuf,
        /// Underlying IO error text.
        message: String,
    },
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
