//! Reshape merged records onto the export schema.

use accessionkit_io_fs::Record;
use accessionkit_io_xlsx::SpecColumn;
use rayon::prelude::*;
use serde_json::Value;

use crate::conf::N_RECORDS_PARALLEL_MIN;

/// Project every record onto `columns`.
///
/// Each output record carries exactly the column names, in column order.
/// Missing and `null` fields become `""`; all other values are kept as-is.
/// Inputs of [`N_RECORDS_PARALLEL_MIN`] records or more are projected on the
/// rayon pool; output order always follows input order.
pub fn project(records: &[Record], columns: &[SpecColumn]) -> Vec<Record> {
    if records.len() >= N_RECORDS_PARALLEL_MIN {
        records
            .par_iter()
            .map(|record| project_record(record, columns))
            .collect()
    } else {
        records
            .iter()
            .map(|record| project_record(record, columns))
            .collect()
    }
}

/// Project one record onto `columns`.
pub fn project_record(record: &Record, columns: &[SpecColumn]) -> Record {
    let mut record_out = Record::with_capacity(columns.len());
    for column in columns {
        let value = match record.get(&column.name) {
            None | Some(Value::Null) => Value::String(String::new()),
            Some(value) => value.clone(),
        };
        record_out.insert(column.name.clone(), value);
    }
    record_out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::conf::derive_catalog_columns;

    fn make_record(value: Value) -> Record {
        value.as_object().expect("object").clone()
    }

    #[test]
    fn projected_keys_equal_schema_in_order() {
        let columns = derive_catalog_columns();
        let record = make_record(json!({"PLACE": "x", "EXTRA": 1, "ACCESSION": "7"}));

        let record_out = project_record(&record, &columns);
        let l_keys: Vec<&str> = record_out.keys().map(String::as_str).collect();
        let l_expected: Vec<&str> = columns.iter().map(|col| col.name.as_str()).collect();
        assert_eq!(l_keys, l_expected);
        assert!(record_out.get("EXTRA").is_none());
    }

    #[test]
    fn missing_and_null_fields_become_empty_strings() {
        let columns = vec![
            SpecColumn::new("ACCESSION", 7.0),
            SpecColumn::new("NAME", 37.0),
            SpecColumn::new("COST ", 9.0),
        ];
        let record = make_record(json!({"ACCESSION": "1", "NAME": null}));

        assert_eq!(
            project_record(&record, &columns),
            make_record(json!({"ACCESSION": "1", "NAME": "", "COST ": ""}))
        );
    }

    #[test]
    fn zero_and_false_are_kept() {
        let columns = vec![SpecColumn::new("COST ", 9.0), SpecColumn::new("REMARK", 22.0)];
        let record = make_record(json!({"COST ": 0, "REMARK": false}));

        assert_eq!(
            project_record(&record, &columns),
            make_record(json!({"COST ": 0, "REMARK": false}))
        );
    }

    #[test]
    fn merged_scenario_projects_onto_catalog_schema() {
        let columns = derive_catalog_columns();
        let record = make_record(json!({"ACCESSION": "1", "NAME": "Alice", "COST ": "10"}));

        let record_out = project_record(&record, &columns);
        for (c_name, value) in &record_out {
            let expected = match c_name.as_str() {
                "ACCESSION" => json!("1"),
                "NAME" => json!("Alice"),
                "COST " => json!("10"),
                _ => json!(""),
            };
            assert_eq!(value, &expected, "column {c_name:?}");
        }
    }

    #[test]
    fn parallel_projection_preserves_order() {
        let columns = vec![SpecColumn::new("ACCESSION", 7.0)];
        let records: Vec<Record> = (0..N_RECORDS_PARALLEL_MIN + 10)
            .map(|n| make_record(json!({ "ACCESSION": n.to_string() })))
            .collect();

        let l_out = project(&records, &columns);
        assert_eq!(l_out.len(), records.len());
        for (n_idx, record) in l_out.iter().enumerate() {
            assert_eq!(record["ACCESSION"], json!(n_idx.to_string()));
        }
    }
}
