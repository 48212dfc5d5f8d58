use crate::records::LogRecord;
use anyhow::{Context, Result};
use std::path::Path;

/// Reads an NDJSON dump of logbook records, one JSON object per line.
/// Blank lines are skipped. Records are returned in file order; the caller
/// is responsible for the dump being timestamp-sorted.
pub fn read_records(path: &Path) -> Result<Vec<LogRecord>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("read records file {}", path.display()))?;
    let mut records = Vec::new();
    for (idx, line) in raw.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record: LogRecord = serde_json::from_str(line)
            .with_context(|| format!("parse record at {}:{}", path.display(), idx + 1))?;
        records.push(record);
    }
    Ok(records)
}
