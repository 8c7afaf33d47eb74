//! Pipeline configuration.
//!
//! Stored as a JSON object on disk; every key is optional and falls back to
//! the built-in London Cycle Hire setup:
//! ```json
//! {
//!   "source_url": "https://tfl.gov.uk/tfl/syndication/feeds/cycle-hire/livecyclehireupdates.xml",
//!   "targets": [
//!     { "name": "Bikes", "path": "data/bikes.kml", "fields": ["id", "nbBikes"] }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::{PipelineError, Result};
use crate::station::{FIELD_LAT, FIELD_LONG, KNOWN_FIELDS};

pub const DEFAULT_SOURCE_URL: &str =
    "https://tfl.gov.uk/tfl/syndication/feeds/cycle-hire/livecyclehireupdates.xml";
pub const DEFAULT_STATION_SELECTOR: &str = "station";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// One output document: its title, where it goes, and which fields it exposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSpec {
    pub name: String,
    pub path: PathBuf,
    /// Written as `ExtendedData` entries in this order.
    #[serde(default)]
    pub fields: Vec<String>,
}

impl TargetSpec {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, fields: &[&str]) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub source_url: String,
    /// Tag name of the per-station element in the feed.
    pub station_selector: String,
    /// Fields every station element must carry.
    pub fields: Vec<String>,
    pub timeout_secs: u64,
    pub targets: Vec<TargetSpec>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            station_selector: DEFAULT_STATION_SELECTOR.to_string(),
            fields: KNOWN_FIELDS.iter().map(|f| f.to_string()).collect(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            targets: vec![
                TargetSpec::new(
                    "London Cycle Hire Stations",
                    "data/stations.kml",
                    &KNOWN_FIELDS,
                ),
                TargetSpec::new(
                    "London Cycle Hire Availability",
                    "data/availability.kml",
                    &["id", "nbBikes", "nbEmptyDocks", "nbDocks"],
                ),
                TargetSpec::new("London Cycle Hire Locations", "data/locations.kml", &[]),
            ],
        }
    }
}

impl PipelineConfig {
    /// Loads and validates the config from a JSON file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;
        let config: PipelineConfig =
            serde_json::from_str(&content).map_err(|source| PipelineError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every target can be rendered from the extracted fields.
    pub fn validate(&self) -> Result<()> {
        if self.station_selector.is_empty() {
            return Err(PipelineError::Config("station_selector is empty".into()));
        }
        if self.fields.is_empty() {
            return Err(PipelineError::Config("no fields configured".into()));
        }
        if self.targets.is_empty() {
            return Err(PipelineError::Config("no targets configured".into()));
        }

        let known: HashSet<&str> = self.fields.iter().map(String::as_str).collect();
        for coordinate in [FIELD_LAT, FIELD_LONG] {
            if !known.contains(coordinate) {
                return Err(PipelineError::Config(format!(
                    "fields must include '{coordinate}' to place stations"
                )));
            }
        }
        let mut paths = HashSet::new();

        for target in &self.targets {
            if target.path.as_os_str().is_empty() {
                return Err(PipelineError::Config(format!(
                    "target '{}' has an empty path",
                    target.name
                )));
            }
            if !paths.insert(target.path.as_path()) {
                return Err(PipelineError::Config(format!(
                    "more than one target writes to {}",
                    target.path.display()
                )));
            }

            let mut seen = HashSet::new();
            for field in &target.fields {
                if !known.contains(field.as_str()) {
                    return Err(PipelineError::Config(format!(
                        "target '{}' uses unknown field '{field}'",
                        target.name
                    )));
                }
                if !seen.insert(field.as_str()) {
                    return Err(PipelineError::Config(format!(
                        "target '{}' lists field '{field}' twice",
                        target.name
                    )));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = PipelineConfig::default();
        config.validate().unwrap();
        assert_eq!(config.fields.len(), 13);
        assert_eq!(config.targets.len(), 3);
        assert!(config.targets[2].fields.is_empty());
    }

    #[test]
    fn test_load_partial_file_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"targets": [{{"name": "Bikes", "path": "out/bikes.kml", "fields": ["id", "nbBikes"]}}]}}"#
        )
        .unwrap();

        let config = PipelineConfig::load(file.path()).unwrap();

        assert_eq!(config.source_url, DEFAULT_SOURCE_URL);
        assert_eq!(config.station_selector, "station");
        assert_eq!(config.targets.len(), 1);
        assert_eq!(config.targets[0].fields, vec!["id", "nbBikes"]);
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let result = PipelineConfig::load(file.path());
        assert!(matches!(result, Err(PipelineError::ConfigParse { .. })));
    }

    #[test]
    fn test_load_missing_file() {
        let result = PipelineConfig::load("/nonexistent/cycle_hire_kml.json");
        assert!(matches!(result, Err(PipelineError::Io { .. })));
    }

    #[test]
    fn test_validate_rejects_unknown_field() {
        let mut config = PipelineConfig::default();
        config.targets = vec![TargetSpec::new("Bad", "bad.kml", &["id", "colour"])];

        assert!(matches!(config.validate(), Err(PipelineError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_duplicate_field() {
        let mut config = PipelineConfig::default();
        config.targets = vec![TargetSpec::new("Bad", "bad.kml", &["id", "id"])];

        assert!(matches!(config.validate(), Err(PipelineError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_shared_path() {
        let mut config = PipelineConfig::default();
        config.targets = vec![
            TargetSpec::new("One", "same.kml", &[]),
            TargetSpec::new("Two", "same.kml", &["id"]),
        ];

        assert!(matches!(config.validate(), Err(PipelineError::Config(_))));
    }

    #[test]
    fn test_validate_requires_coordinate_fields() {
        let mut config = PipelineConfig::default();
        config.fields.retain(|f| f != "long");
        assert!(matches!(config.validate(), Err(PipelineError::Config(_))));

        let mut config = PipelineConfig::default();
        config.fields = vec!["id".to_string(), "long".to_string()];
        config.targets = vec![TargetSpec::new("Ids", "ids.kml", &["id"])];
        assert!(matches!(config.validate(), Err(PipelineError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_no_targets() {
        let mut config = PipelineConfig::default();
        config.targets.clear();

        assert!(matches!(config.validate(), Err(PipelineError::Config(_))));
    }
}
