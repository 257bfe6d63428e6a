use std::path::Path;

use anyhow::{Context, Result};

use crate::db::types::ResultSet;

/// Writes a header row plus one record per row; returns the row count.
pub fn write_result_set(path: &Path, result_set: &ResultSet) -> Result<usize> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
    let headers = result_set
        .columns
        .iter()
        .map(|col| col.name.as_str())
        .collect::<Vec<_>>();
    writer.write_record(headers)?;
    for row in &result_set.rows {
        writer.write_record(row.iter().map(|value| value.as_csv()))?;
    }
    writer.flush()?;
    Ok(result_set.rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::types::{Column, Value};
    use std::fs;

    #[test]
    fn writes_header_and_rows() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("pf.csv");
        let result_set = ResultSet {
            columns: vec![
                Column {
                    name: "Name".to_string(),
                },
                Column {
                    name: "NumberOfPartitions".to_string(),
                },
            ],
            rows: vec![vec![Value::Text("pf01".to_string()), Value::Int(1200)]],
        };

        let written = write_result_set(&path, &result_set).expect("write csv");
        assert_eq!(written, 1);
        let content = fs::read_to_string(&path).expect("read csv");
        assert_eq!(content, "Name,NumberOfPartitions\npf01,1200\n");
    }
}
