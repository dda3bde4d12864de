//! Combine primary and secondary datasets into merged records.

use std::collections::{BTreeSet, HashMap};

use accessionkit_io_fs::{Dataset, Record};
use serde_json::Value;
use tracing::{debug, warn};

use crate::report::ReportMerge;
use crate::spec::{CatalogError, EnumAlignmentRule, EnumJoinMode, SpecMergeOptions};

/// Largest magnitude below which every integral `f64` is exact (2^53).
const N_F64_EXACT_INT_MAX: f64 = 9_007_199_254_740_992.0;

/// Merged records plus the diagnostics gathered while building them.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecMergeOutcome {
    /// One merged record per primary record, in primary order.
    pub records: Dataset,
    /// Counters and warnings.
    pub report: ReportMerge,
}

/// Overlay secondary fields onto primary records.
///
/// The output always has exactly one record per primary record. Secondary
/// fields overwrite primary fields of the same name; new fields are appended
/// after the primary ones.
pub fn merge(
    primary: &[Record],
    secondary: &[Record],
    spec_merge_options: &SpecMergeOptions,
) -> Result<SpecMergeOutcome, CatalogError> {
    let mut report = ReportMerge::new(primary.len(), secondary.len());

    let records = match &spec_merge_options.mode {
        EnumJoinMode::Positional => merge_positional(
            primary,
            secondary,
            spec_merge_options.rule_alignment,
            &mut report,
        )?,
        EnumJoinMode::Keyed { key } => merge_keyed(primary, secondary, key, &mut report),
    };

    for c_warning in &report.warnings {
        warn!(warning = %c_warning, "merge warning");
    }
    debug!(
        primary = report.cnt_primary,
        secondary = report.cnt_secondary,
        overlaid = report.cnt_overlaid,
        "datasets merged"
    );

    Ok(SpecMergeOutcome { records, report })
}

fn merge_positional(
    primary: &[Record],
    secondary: &[Record],
    rule_alignment: EnumAlignmentRule,
    report: &mut ReportMerge,
) -> Result<Dataset, CatalogError> {
    if primary.len() != secondary.len() {
        if rule_alignment == EnumAlignmentRule::Strict {
            return Err(CatalogError::Alignment {
                primary: primary.len(),
                secondary: secondary.len(),
            });
        }
        report.add_warning(format!(
            "Dataset length mismatch: primary has {} records, secondary has {}.",
            primary.len(),
            secondary.len()
        ));
    }

    let records = primary
        .iter()
        .enumerate()
        .map(|(n_idx, record)| overlay_record(record, secondary.get(n_idx), None))
        .collect();
    report.cnt_overlaid = usize::min(primary.len(), secondary.len());
    Ok(records)
}

fn merge_keyed(
    primary: &[Record],
    secondary: &[Record],
    key: &str,
    report: &mut ReportMerge,
) -> Dataset {
    let mut dict_secondary: HashMap<String, usize> = HashMap::with_capacity(secondary.len());
    let mut l_keys_secondary: Vec<String> = Vec::with_capacity(secondary.len());
    for (n_idx, record) in secondary.iter().enumerate() {
        let Some(c_key) = derive_join_key(record, key) else {
            report.add_warning(format!(
                "Secondary record {n_idx} has no usable {key:?} value; ignored."
            ));
            continue;
        };
        if dict_secondary.contains_key(&c_key) {
            report.add_warning(format!(
                "Secondary record {n_idx} repeats {key:?} = {c_key:?}; first occurrence kept."
            ));
            continue;
        }
        dict_secondary.insert(c_key.clone(), n_idx);
        l_keys_secondary.push(c_key);
    }

    let mut set_keys_matched: BTreeSet<&str> = BTreeSet::new();
    let mut records = Vec::with_capacity(primary.len());
    for (n_idx, record) in primary.iter().enumerate() {
        let Some(c_key) = derive_join_key(record, key) else {
            report.add_warning(format!(
                "Primary record {n_idx} has no usable {key:?} value; left unmerged."
            ));
            records.push(record.clone());
            continue;
        };
        match dict_secondary.get_key_value(&c_key) {
            Some((c_key_stored, n_idx_secondary)) => {
                set_keys_matched.insert(c_key_stored.as_str());
                records.push(overlay_record(
                    record,
                    secondary.get(*n_idx_secondary),
                    Some(key),
                ));
                report.cnt_overlaid += 1;
            }
            None => records.push(record.clone()),
        }
    }

    for c_key in &l_keys_secondary {
        if !set_keys_matched.contains(c_key.as_str()) {
            report.add_warning(format!(
                "Secondary record with {key:?} = {c_key:?} matches no primary record."
            ));
        }
    }

    records
}

/// Canonical join key: trimmed text, or the JSON text of numbers/booleans.
///
/// Integral floats collapse to their integer text (`3.0` keys as `"3"`).
/// Strings are never parsed, so `"3.0"` and `"007"` only match themselves.
fn derive_join_key(record: &Record, key: &str) -> Option<String> {
    let c_key = match record.get(key)? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => derive_number_key(n),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    if c_key.is_empty() { None } else { Some(c_key) }
}

fn derive_number_key(n: &serde_json::Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(val) if val.fract() == 0.0 && val.abs() < N_F64_EXACT_INT_MAX => {
            format!("{}", val as i64)
        }
        _ => n.to_string(),
    }
}

/// Overlay `secondary` onto a copy of `primary`, leaving `c_field_keep` as stored.
fn overlay_record(
    primary: &Record,
    secondary: Option<&Record>,
    c_field_keep: Option<&str>,
) -> Record {
    let mut record = primary.clone();
    if let Some(secondary) = secondary {
        for (c_field, value) in secondary {
            if c_field_keep == Some(c_field.as_str()) {
                continue;
            }
            record.insert(c_field.clone(), value.clone());
        }
    }
    record
}
