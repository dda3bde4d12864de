//! Shape checks for replacement payloads and export names.

use std::sync::OnceLock;

use accessionkit_io_fs::{Dataset, derive_dataset_from_value, derive_json_kind};
use regex::Regex;
use serde_json::Value;

use crate::spec::CatalogError;

const C_PATTERN_EXPORT_FILE_NAME: &str = r"^[A-Za-z0-9][A-Za-z0-9._ -]{0,200}\.xlsx$";

static REGEX_EXPORT_FILE_NAME: OnceLock<Result<Regex, String>> = OnceLock::new();

/// Compiled file-name pattern, built once per process.
fn derive_export_file_name_regex() -> Result<&'static Regex, String> {
    REGEX_EXPORT_FILE_NAME
        .get_or_init(|| {
            Regex::new(C_PATTERN_EXPORT_FILE_NAME)
                .map_err(|e| format!("Invalid file name pattern: {e}"))
        })
        .as_ref()
        .map_err(Clone::clone)
}

/// Validate a replacement payload and convert it into a dataset.
///
/// The payload must be an array of objects whose values are all scalars
/// (string, number, boolean or null).
pub fn validate_payload(payload: Value) -> Result<Dataset, CatalogError> {
    let dataset = derive_dataset_from_value(payload).map_err(CatalogError::InvalidPayload)?;
    for (n_idx, record) in dataset.iter().enumerate() {
        for (c_field, value) in record {
            if matches!(value, Value::Array(_) | Value::Object(_)) {
                return Err(CatalogError::InvalidPayload(format!(
                    "Element {n_idx}, field {c_field:?} is {}, expected a scalar.",
                    derive_json_kind(value)
                )));
            }
        }
    }
    Ok(dataset)
}

/// Validate a download file name (plain `.xlsx` name, no path separators).
pub fn validate_export_file_name(file_name: &str) -> Result<(), String> {
    let regex = derive_export_file_name_regex()?;
    if regex.is_match(file_name) {
        Ok(())
    } else {
        Err(format!(
            "Export file name {file_name:?} must be a plain name ending in .xlsx."
        ))
    }
}
