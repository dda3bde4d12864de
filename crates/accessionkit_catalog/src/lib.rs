//! `accessionkit_catalog` v1:
//! Merge, projection and export of library accession records.
//!
//! Modules:
//! - `conf`     : export schema and defaults
//! - `spec`     : options, artifacts, errors
//! - `merge`    : primary/secondary join
//! - `project`  : schema projection
//! - `export`   : workbook rendering
//! - `validate` : payload and name checks
//! - `report`   : merge diagnostics
//! - `service`  : operations used by the server
pub mod conf;
pub mod export;
pub mod merge;
pub mod project;
pub mod report;
pub mod service;
pub mod spec;
pub mod validate;

pub use conf::{TUP_CATALOG_COLUMNS, derive_catalog_columns};
pub use export::{render_workbook, save_workbook};
pub use merge::{SpecMergeOutcome, merge};
pub use project::{project, project_record};
pub use report::ReportMerge;
pub use service::CatalogService;
pub use spec::{
    CatalogError, EnumAlignmentRule, EnumJoinMode, SpecExportArtifact, SpecExportOptions,
    SpecMergeOptions,
};
pub use validate::{validate_export_file_name, validate_payload};
