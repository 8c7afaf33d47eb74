//! Output persistence for generated documents.
//!
//! Supports writing documents to disk and JSON dumps of extracted stations.

use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::{PipelineError, Result};
use crate::station::StationRecord;

/// Destination for finished documents.
pub trait DocumentSink {
    fn write(&self, path: &Path, contents: &str) -> Result<()>;
}

/// Writes each document to its path, creating missing parent directories.
///
/// Writes are not transactional: a failure leaves files written earlier in
/// the same run in place.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileSink;

impl DocumentSink for FileSink {
    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| PipelineError::io(parent, e))?;
        }
        debug!(path = %path.display(), bytes = contents.len(), "Writing document");
        fs::write(path, contents).map_err(|e| PipelineError::io(path, e))
    }
}

/// Renders stations as a pretty-printed JSON array.
pub fn stations_json(records: &[StationRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Prints stations as pretty-printed JSON on stdout.
pub fn print_json(records: &[StationRecord]) -> Result<()> {
    println!("{}", stations_json(records)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_sink_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data/nested/stations.kml");

        FileSink.write(&path, "<kml/>").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "<kml/>");
    }

    #[test]
    fn test_file_sink_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stations.kml");

        FileSink.write(&path, "first").unwrap();
        FileSink.write(&path, "second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn test_file_sink_reports_path_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be overwritten as a file.
        let result = FileSink.write(dir.path(), "<kml/>");

        match result {
            Err(PipelineError::Io { path, .. }) => assert_eq!(path, dir.path()),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_stations_json() {
        let records = vec![
            StationRecord::new()
                .with_field("id", "1")
                .with_field("nbBikes", "5"),
        ];

        let json = stations_json(&records).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["id"], "1");
        assert_eq!(value[0]["nbBikes"], "5");
    }
}
