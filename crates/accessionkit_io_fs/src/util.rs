use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::spec::{Dataset, SpecWriteReport, StoreError};

////////////////////////////////////////////////////////////////////////////////
// #region DocumentDecoding

/// Read and decode one JSON array document.
pub fn read_dataset(path_file: &Path) -> Result<Dataset, StoreError> {
    let v_bytes = match fs::read(path_file) {
        Ok(v) => v,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(StoreError::NotFound(path_file.to_path_buf()));
        }
        Err(e) => {
            return Err(StoreError::Read {
                path: path_file.to_path_buf(),
                message: e.to_string(),
            });
        }
    };

    let v_bytes_doc = v_bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(&v_bytes[..]);
    let value: Value = serde_json::from_slice(v_bytes_doc).map_err(|e| StoreError::Parse {
        path: path_file.to_path_buf(),
        message: e.to_string(),
    })?;

    derive_dataset_from_value(value).map_err(|message| StoreError::Parse {
        path: path_file.to_path_buf(),
        message,
    })
}

/// Convert a decoded JSON value into a dataset.
///
/// Accepts only a top-level array whose elements are all objects.
pub fn derive_dataset_from_value(value: Value) -> Result<Dataset, String> {
    let Value::Array(l_values) = value else {
        return Err(format!(
            "Expected a JSON array at top level, found {}.",
            derive_json_kind(&value)
        ));
    };

    let mut l_records = Vec::with_capacity(l_values.len());
    for (n_idx, value_item) in l_values.into_iter().enumerate() {
        match value_item {
            Value::Object(record) => l_records.push(record),
            other => {
                return Err(format!(
                    "Element {n_idx} is {}, expected an object.",
                    derive_json_kind(&other)
                ));
            }
        }
    }
    Ok(l_records)
}

/// Human-readable JSON kind name.
pub fn derive_json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Serialise a dataset as pretty JSON with `indent_width` spaces.
pub(crate) fn serialize_dataset(
    dataset: &Dataset,
    indent_width: usize,
) -> Result<Vec<u8>, serde_json::Error> {
    let v_indent = vec![b' '; indent_width];
    let mut v_buf = Vec::new();
    let mut serializer =
        Serializer::with_formatter(&mut v_buf, PrettyFormatter::with_indent(&v_indent));
    dataset.serialize(&mut serializer)?;
    Ok(v_buf)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region AtomicWrite

/// Write `v_bytes` to `path_file_dst` via temp file + rename.
///
/// The temp file lives in the destination directory so the final rename never
/// crosses filesystems. On any failure the temp file is dropped (and removed)
/// and the previous document, if any, is left untouched.
pub fn write_bytes_atomic(
    path_file_dst: &Path,
    v_bytes: &[u8],
    if_keep_metadata: bool,
) -> Result<SpecWriteReport, StoreError> {
    let derive_write_error = |message: String| StoreError::Write {
        path: path_file_dst.to_path_buf(),
        message,
    };

    let path_dir_parent = derive_parent_dir(path_file_dst);
    fs::create_dir_all(&path_dir_parent)
        .map_err(|e| derive_write_error(format!("Failed to create parent directory: {e}")))?;

    let meta_existing = match fs::metadata(path_file_dst) {
        Ok(meta) => Some(meta),
        Err(e) if e.kind() == io::ErrorKind::NotFound => None,
        Err(e) => return Err(derive_write_error(format!("Failed to inspect target: {e}"))),
    };
    if let Some(meta) = &meta_existing
        && meta.is_dir()
    {
        return Err(derive_write_error(
            "Destination is a directory, expected a file.".to_string(),
        ));
    }

    let mut file_tmp = tempfile::Builder::new()
        .prefix(".accessionkit-")
        .suffix(".tmp")
        .tempfile_in(&path_dir_parent)
        .map_err(|e| derive_write_error(format!("Failed to create temp file: {e}")))?;

    file_tmp
        .write_all(v_bytes)
        .and_then(|_| file_tmp.as_file().sync_all())
        .map_err(|e| derive_write_error(e.to_string()))?;

    match &meta_existing {
        Some(meta) if if_keep_metadata => {
            apply_metadata(path_file_dst, file_tmp.path(), meta)
                .map_err(|e| derive_write_error(format!("Failed to carry metadata: {e}")))?;
        }
        _ => {
            apply_default_permissions(file_tmp.path())
                .map_err(|e| derive_write_error(format!("Failed to set permissions: {e}")))?;
        }
    }

    file_tmp
        .persist(path_file_dst)
        .map_err(|e| derive_write_error(format!("Failed to commit: {}", e.error)))?;

    Ok(SpecWriteReport {
        path: path_file_dst.to_path_buf(),
        bytes_written: v_bytes.len() as u64,
        if_replaced_existing: meta_existing.is_some(),
    })
}

fn derive_parent_dir(path_file: &Path) -> PathBuf {
    match path_file.parent() {
        Some(path_parent) if !path_parent.as_os_str().is_empty() => path_parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn apply_metadata(
    path_file_src: &Path,
    path_file_tmp: &Path,
    meta_src: &fs::Metadata,
) -> Result<(), io::Error> {
    fs::set_permissions(path_file_tmp, meta_src.permissions())?;
    #[cfg(target_os = "linux")]
    {
        copy_xattrs_linux(path_file_src, path_file_tmp);
    }
    #[cfg(not(target_os = "linux"))]
    {
        let _ = path_file_src;
    }
    Ok(())
}

// Temp files are created 0600; a fresh document should be world-readable.
fn apply_default_permissions(path_file_tmp: &Path) -> Result<(), io::Error> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path_file_tmp, fs::Permissions::from_mode(0o644))?;
    }
    #[cfg(not(unix))]
    {
        let _ = path_file_tmp;
    }
    Ok(())
}

#[cfg(target_os = "linux")]
fn copy_xattrs_linux(path_file_src: &Path, path_file_dst: &Path) {
    let iter_xattr_names = match xattr::list(path_file_src) {
        Ok(v) => v,
        Err(_) => return,
    };

    for name in iter_xattr_names {
        let Some(raw_value) = xattr::get(path_file_src, &name).ok().flatten() else {
            continue;
        };
        let _ = xattr::set(path_file_dst, &name, &raw_value);
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
