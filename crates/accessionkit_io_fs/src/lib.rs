//! `accessionkit_io_fs` v1:
//! JSON dataset document store.
//!
//! Modules:
//! - `store` : primary/secondary document access
//! - `spec`  : data model, options, errors
//! - `util`  : decoding and atomic write helpers

pub mod spec;
pub mod store;
pub mod util;

pub use spec::{
    Dataset, EnumDocumentKind, Record, SpecStoreOptions, SpecWriteReport, StoreError,
};
pub use store::DatasetStore;
pub use util::{derive_dataset_from_value, derive_json_kind, read_dataset, write_bytes_atomic};
