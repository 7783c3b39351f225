use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{Result, ScenarioError};
use crate::models::{InputRecord, LoadedInput};

/// Column holding the conversation content
pub const INPUT_COLUMN: &str = "input";
/// Optional column holding the source identifier
pub const ID_COLUMN: &str = "id";

/// Load conversation records from a CSV file
pub fn load_input_records(path: &Path) -> Result<LoadedInput> {
    if !path.exists() {
        return Err(ScenarioError::configuration(format!(
            "Input file not found at {:?}",
            path
        )));
    }

    let file = File::open(path)?;
    read_input_records(file)
}

/// Parse CSV content into input records.
///
/// The header row must contain an `input` column. Rows with the wrong number
/// of fields or undecodable content are skipped with a warning.
pub fn read_input_records<R: Read>(source: R) -> Result<LoadedInput> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(source);

    let headers = reader.headers()?.clone();
    let input_index = headers
        .iter()
        .position(|h| h == INPUT_COLUMN)
        .ok_or_else(|| ScenarioError::Schema {
            column: INPUT_COLUMN.to_string(),
        })?;
    let id_index = headers.iter().position(|h| h == ID_COLUMN);

    debug!(
        "CSV header has {} columns (input at {}, id at {:?})",
        headers.len(),
        input_index,
        id_index
    );

    let mut loaded = LoadedInput {
        has_id_column: id_index.is_some(),
        ..Default::default()
    };

    for result in reader.records() {
        let row = match result {
            Ok(row) => row,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or_default();
                skip_row(&mut loaded, line, e.to_string());
                continue;
            }
        };

        let line = row.position().map(|p| p.line()).unwrap_or_default();

        if row.len() != headers.len() {
            skip_row(
                &mut loaded,
                line,
                format!("expected {} fields, found {}", headers.len(), row.len()),
            );
            continue;
        }

        let conversation = row.get(input_index).unwrap_or_default();
        let source_id = id_index
            .and_then(|i| row.get(i))
            .filter(|id| !id.is_empty())
            .map(str::to_string);

        loaded
            .records
            .push(InputRecord::new(line, source_id, conversation));
    }

    Ok(loaded)
}

fn skip_row(loaded: &mut LoadedInput, line: u64, message: String) {
    let err = ScenarioError::RowParse { line, message };
    warn!("Skipping row: {}", err);
    loaded.skipped_rows += 1;
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_read_records_with_ids() {
        let csv = "id,input\n1,hello there\n2,\"{\"\"messages\"\": []}\"\n";

        let loaded = read_input_records(csv.as_bytes()).unwrap();

        assert!(loaded.has_id_column);
        assert_eq!(loaded.skipped_rows, 0);
        assert_eq!(loaded.records.len(), 2);
        assert_eq!(loaded.records[0].source_id.as_deref(), Some("1"));
        assert_eq!(loaded.records[0].conversation, "hello there");
        assert_eq!(loaded.records[0].line, 2);
        assert_eq!(loaded.records[1].conversation, r#"{"messages": []}"#);
    }

    #[test]
    fn test_id_column_is_optional() {
        let csv = "input,channel\nhi,web\nbye,app\n";

        let loaded = read_input_records(csv.as_bytes()).unwrap();

        assert!(!loaded.has_id_column);
        assert_eq!(loaded.records.len(), 2);
        assert!(loaded.records.iter().all(|r| r.source_id.is_none()));
        assert_eq!(loaded.records[1].conversation, "bye");
    }

    #[test]
    fn test_empty_id_cell_is_none() {
        let csv = "id,input\n,hello\n";

        let loaded = read_input_records(csv.as_bytes()).unwrap();

        assert_eq!(loaded.records.len(), 1);
        assert!(loaded.records[0].source_id.is_none());
    }

    #[test]
    fn test_missing_input_column() {
        let csv = "id,conversation\n1,hello\n";

        let err = read_input_records(csv.as_bytes()).unwrap_err();

        assert!(matches!(err, ScenarioError::Schema { ref column } if column == "input"));
    }

    #[test]
    fn test_empty_file_is_schema_error() {
        let err = read_input_records("".as_bytes()).unwrap_err();
        assert!(matches!(err, ScenarioError::Schema { .. }));
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let csv = "id,input\n1,first\n2,second,extra\n3\n4,fourth\n";

        let loaded = read_input_records(csv.as_bytes()).unwrap();

        assert_eq!(loaded.skipped_rows, 2);
        let ids: Vec<&str> = loaded
            .records
            .iter()
            .filter_map(|r| r.source_id.as_deref())
            .collect();
        assert_eq!(ids, vec!["1", "4"]);
        assert_eq!(loaded.records[1].line, 5);
    }

    #[test]
    fn test_invalid_utf8_row_is_skipped() {
        let mut bytes = b"id,input\n1,ok\n2,".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe]);
        bytes.extend_from_slice(b"\n3,fine\n");

        let loaded = read_input_records(bytes.as_slice()).unwrap();

        assert_eq!(loaded.skipped_rows, 1);
        assert_eq!(loaded.records.len(), 2);
        assert_eq!(loaded.records[1].conversation, "fine");
    }

    #[test]
    fn test_multiline_quoted_field() {
        let csv = "id,input\n7,\"line one\nline two\"\n8,next\n";

        let loaded = read_input_records(csv.as_bytes()).unwrap();

        assert_eq!(loaded.records.len(), 2);
        assert_eq!(loaded.records[0].conversation, "line one\nline two");
        assert_eq!(loaded.records[1].line, 4);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "input\nxin chào\n").unwrap();

        let loaded = load_input_records(file.path()).unwrap();

        assert_eq!(loaded.records.len(), 1);
        assert_eq!(loaded.records[0].conversation, "xin chào");
    }

    #[test]
    fn test_missing_file_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_input_records(&dir.path().join("missing.csv")).unwrap_err();
        assert!(matches!(err, ScenarioError::Configuration { .. }));
    }
}
