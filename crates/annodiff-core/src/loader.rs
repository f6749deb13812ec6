//! JSONL record loader
//!
//! One JSON object per non-empty line. The first bad line aborts the load;
//! there is no partial result.

use crate::errors::{io_error, AnnoError, AnnodiffError, Result};
use crate::model::{Record, RecordMetadata};
use serde_json::Value;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Parse every non-empty line of `reader` into a [`Record`]
///
/// `source_name` only labels errors.
///
/// # Errors
///
/// - `Parse`: a line is not UTF-8, not valid JSON, not an object, or a
///   nested subject/PII does not match the expected shape
/// - `MissingField`: `metadata.data_id`, `text` or `subjects` is absent or
///   has the wrong type
/// - `Io`: the reader failed
pub fn load_records<R: BufRead>(mut reader: R, source_name: &str) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    let mut buf = Vec::new();
    let mut line_no = 0;

    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|e| io_error("read_source", e))?;
        if read == 0 {
            break;
        }
        line_no += 1;

        let line = std::str::from_utf8(&buf).map_err(|_| AnnodiffError::MalformedLine {
            source_name: source_name.to_string(),
            line: line_no,
            reason: "invalid UTF-8".to_string(),
        })?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        records.push(parse_line(trimmed, source_name, line_no)?);
    }

    tracing::debug!(
        source = source_name,
        record_count = records.len(),
        "records loaded"
    );
    Ok(records)
}

/// Open `path` and load its records, labelling errors with the file name
pub fn load_records_from_path(path: &Path) -> Result<Vec<Record>> {
    let file = File::open(path).map_err(|e| io_error("open_source", e))?;
    load_records(BufReader::new(file), &display_name(path))
}

/// The base name of `path`, as recorded in report metadata
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn parse_line(line: &str, source_name: &str, line_no: usize) -> Result<Record> {
    let malformed = |reason: String| AnnodiffError::MalformedLine {
        source_name: source_name.to_string(),
        line: line_no,
        reason,
    };
    let missing = |field: &str| AnnodiffError::MissingField {
        source_name: source_name.to_string(),
        line: line_no,
        field: field.to_string(),
    };

    let raw: Value =
        serde_json::from_str(line).map_err(|e| malformed(format!("invalid JSON: {}", e)))?;

    let obj = raw
        .as_object()
        .ok_or_else(|| malformed("line must be a JSON object".to_string()))?;

    let data_id = obj
        .get("metadata")
        .and_then(Value::as_object)
        .and_then(|m| {
            RecordMetadata::ID_KEYS
                .iter()
                .find_map(|k| m.get(*k).and_then(Value::as_str))
        })
        .map(str::to_owned)
        .ok_or_else(|| AnnoError::from(missing("metadata.data_id")))?;

    // From here on the record is identifiable
    let with_id = |err: AnnodiffError| AnnoError::from(err).with_record_id(data_id.as_str());

    if !obj.get("text").is_some_and(Value::is_string) {
        return Err(with_id(missing("text")));
    }
    if !obj.get("subjects").is_some_and(Value::is_array) {
        return Err(with_id(missing("subjects")));
    }

    serde_json::from_value(raw)
        .map_err(|e| with_id(malformed(format!("invalid record: {}", e))))
}
