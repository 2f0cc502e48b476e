//! JSONL loading into an in-memory dataset

use super::{Field, TypingEvent};
use log::{debug, info};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that abort loading.
///
/// Malformed lines never produce an error; they are counted and skipped.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to open log file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to read log file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// All records loaded for one run.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    events: Vec<TypingEvent>,
    columns: BTreeSet<String>,
    skipped_lines: usize,
    sources: Vec<PathBuf>,
}

impl Dataset {
    /// Build a dataset directly from events (columns derived from the values).
    pub fn from_events(events: Vec<TypingEvent>) -> Self {
        let columns = ALL_FIELDS
            .iter()
            .filter(|f| events.iter().any(|e| e.has(**f)))
            .map(|f| f.key().to_string())
            .collect();
        Self {
            events,
            columns,
            ..Default::default()
        }
    }

    pub fn events(&self) -> &[TypingEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Union of every key seen across the loaded lines.
    pub fn columns(&self) -> &BTreeSet<String> {
        &self.columns
    }

    /// True when at least one record has a non-null value for `field`.
    pub fn has(&self, field: Field) -> bool {
        self.events.iter().any(|e| e.has(field))
    }

    /// True when some line carried the `field` key, even if only as null.
    pub fn has_column(&self, field: Field) -> bool {
        self.columns.contains(field.key())
    }

    /// Lines discarded as malformed.
    pub fn skipped_lines(&self) -> usize {
        self.skipped_lines
    }

    /// Files this dataset was loaded from.
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    fn absorb_line(&mut self, bytes: &[u8]) {
        match parse_line(bytes) {
            Some((keys, event)) => {
                self.columns.extend(keys);
                self.events.push(event);
            }
            None => self.skipped_lines += 1,
        }
    }

    fn merge(&mut self, other: Dataset) {
        self.events.extend(other.events);
        self.columns.extend(other.columns);
        self.skipped_lines += other.skipped_lines;
        self.sources.extend(other.sources);
    }
}

const ALL_FIELDS: &[Field] = &[
    Field::SessionId,
    Field::Timestamp,
    Field::ActivationKeyName,
    Field::SourceKeyName,
    Field::TargetKeyName,
    Field::PreviousKey,
    Field::ElapsedMs,
    Field::TimeSinceLastKey,
    Field::MarkedAsMistake,
    Field::RolloverDetected,
    Field::EventType,
    Field::ProcessName,
    Field::TrainingMode,
];

/// Parse one line into its raw keys and typed record.
///
/// Only lines that are not a JSON object are rejected; fields of the wrong
/// type are dropped from the record instead.
fn parse_line(bytes: &[u8]) -> Option<(Vec<String>, TypingEvent)> {
    let text = std::str::from_utf8(bytes).ok()?;
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let map: Map<String, Value> = serde_json::from_str(text).ok()?;
    let keys = map.keys().cloned().collect();
    let event = serde_json::from_value(Value::Object(map)).ok()?;
    Some((keys, event))
}

/// Load records from any buffered reader, one JSON object per line.
pub fn load_reader<R: BufRead>(mut reader: R) -> io::Result<Dataset> {
    let mut dataset = Dataset::default();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        dataset.absorb_line(&buf);
    }
    Ok(dataset)
}

/// Load a single JSONL log file.
pub fn load_jsonl(path: &Path) -> Result<Dataset, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut dataset = load_reader(BufReader::new(file)).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    dataset.sources.push(path.to_path_buf());

    info!("Loaded {} records from {}", dataset.len(), path.display());
    if dataset.skipped_lines > 0 {
        debug!(
            "Skipped {} malformed lines in {}",
            dataset.skipped_lines,
            path.display()
        );
    }
    Ok(dataset)
}

/// Load several log files into one dataset, in the given order.
pub fn load_files(paths: &[PathBuf]) -> Result<Dataset, LoadError> {
    let mut dataset = Dataset::default();
    for path in paths {
        dataset.merge(load_jsonl(path)?);
    }
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn load_str(s: &str) -> Dataset {
        load_reader(Cursor::new(s.as_bytes())).unwrap()
    }

    #[test]
    fn loads_valid_lines() {
        let data = load_str(
            "{\"SourceKeyName\":\"A\",\"ElapsedMs\":10}\n{\"SourceKeyName\":\"B\",\"ElapsedMs\":20}\n",
        );
        assert_eq!(data.len(), 2);
        assert_eq!(data.skipped_lines(), 0);
    }

    #[test]
    fn skips_malformed_lines() {
        let data = load_str(
            "{\"SourceKeyName\":\"A\"}\nnot json\n\n[1,2]\n{\"SourceKeyName\":\"B\"",
        );
        assert_eq!(data.len(), 1);
        assert_eq!(data.skipped_lines(), 4);
    }

    #[test]
    fn every_json_object_line_becomes_a_row() {
        let data = load_str(concat!(
            "{\"SourceKeyName\":\"A\",\"ElapsedMs\":10}\n",
            "{\"SourceKeyName\":\"B\",\"ElapsedMs\":\"12\"}\n",
            "{\"SourceKeyName\":\"C\",\"MarkedAsMistake\":0}\n",
            "{\"SourceKeyName\":\"D\",\"Timestamp\":\"later\"}\n",
        ));
        assert_eq!(data.len(), 4);
        assert_eq!(data.skipped_lines(), 0);

        let elapsed: Vec<Option<f64>> = data.events().iter().map(|e| e.elapsed_ms).collect();
        assert_eq!(elapsed, vec![Some(10.0), None, None, None]);
        assert!(!data.has(Field::MarkedAsMistake));
        assert!(data.has_column(Field::MarkedAsMistake));
        assert!(!data.has(Field::Timestamp));
    }

    #[test]
    fn skips_invalid_utf8_line() {
        let mut bytes = b"{\"SourceKeyName\":\"A\"}\n".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe, b'\n']);
        bytes.extend_from_slice(b"{\"SourceKeyName\":\"B\"}\n");
        let data = load_reader(Cursor::new(bytes)).unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data.skipped_lines(), 1);
    }

    #[test]
    fn handles_missing_trailing_newline_and_crlf() {
        let data = load_str("{\"SourceKeyName\":\"A\"}\r\n{\"SourceKeyName\":\"B\"}");
        assert_eq!(data.len(), 2);
    }

    #[test]
    fn columns_are_union_of_keys() {
        let data = load_str("{\"SourceKeyName\":\"A\"}\n{\"MarkedAsMistake\":false,\"Extra\":1}\n");
        let cols: Vec<&str> = data.columns().iter().map(String::as_str).collect();
        assert_eq!(cols, vec!["Extra", "MarkedAsMistake", "SourceKeyName"]);
    }

    #[test]
    fn null_only_column_is_not_present() {
        let data = load_str("{\"SourceKeyName\":\"A\",\"MarkedAsMistake\":null}\n");
        assert!(data.columns().contains("MarkedAsMistake"));
        assert!(data.has_column(Field::MarkedAsMistake));
        assert!(!data.has(Field::MarkedAsMistake));
    }

    #[test]
    fn empty_input_is_empty_dataset() {
        let data = load_str("");
        assert!(data.is_empty());
    }

    #[test]
    fn missing_file_is_open_error() {
        let err = load_jsonl(Path::new("/nonexistent/typing-log.jsonl")).unwrap_err();
        assert!(matches!(err, LoadError::Open { .. }));
        assert!(err.to_string().contains("typing-log.jsonl"));
    }

    #[test]
    fn from_events_derives_columns() {
        let data = Dataset::from_events(vec![TypingEvent {
            elapsed_ms: Some(1.0),
            ..Default::default()
        }]);
        assert!(data.columns().contains("ElapsedMs"));
        assert!(data.has(Field::ElapsedMs));
        assert!(!data.has(Field::Timestamp));
    }
}
