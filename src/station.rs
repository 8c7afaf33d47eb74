use serde::ser::{Serialize, SerializeMap, Serializer};

pub const FIELD_NAME: &str = "name";
pub const FIELD_LAT: &str = "lat";
pub const FIELD_LONG: &str = "long";

/// Field names published for every station in the live cycle hire feed.
pub const KNOWN_FIELDS: [&str; 13] = [
    "id",
    "name",
    "terminalName",
    "lat",
    "long",
    "installed",
    "locked",
    "installDate",
    "removalDate",
    "temporary",
    "nbBikes",
    "nbEmptyDocks",
    "nbDocks",
];

/// One station as extracted from the feed.
///
/// Values are the raw element text, never converted, so the source
/// formatting of coordinates and counts survives into the output unchanged.
/// Fields keep the order they were extracted in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StationRecord {
    fields: Vec<(String, String)>,
}

impl StationRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `field` with `value`, replacing any earlier value for it.
    pub fn with_field(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        let field = field.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some(entry) => entry.1 = value,
            None => self.fields.push((field, value)),
        }
        self
    }

    /// Raw value of `field`, including empty strings.
    pub fn raw(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value.as_str())
    }

    /// Value of `field` if present and non-empty.
    pub fn value(&self, field: &str) -> Option<&str> {
        self.raw(field).filter(|value| !value.is_empty())
    }

    pub fn lat(&self) -> Option<&str> {
        self.value(FIELD_LAT)
    }

    pub fn long(&self) -> Option<&str> {
        self.value(FIELD_LONG)
    }

    pub fn name(&self) -> Option<&str> {
        self.value(FIELD_NAME)
    }

    /// A station can only be placed on a map when both coordinates are set.
    pub fn is_mappable(&self) -> bool {
        self.lat().is_some() && self.long().is_some()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for StationRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (field, value) in &self.fields {
            map.serialize_entry(field, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_skips_empty_strings() {
        let record = StationRecord::new()
            .with_field("id", "1")
            .with_field("removalDate", "");

        assert_eq!(record.raw("removalDate"), Some(""));
        assert_eq!(record.value("removalDate"), None);
        assert_eq!(record.value("id"), Some("1"));
        assert_eq!(record.value("nbBikes"), None);
    }

    #[test]
    fn test_is_mappable_requires_both_coordinates() {
        let both = StationRecord::new()
            .with_field(FIELD_LAT, "51.5")
            .with_field(FIELD_LONG, "-0.12");
        let no_long = StationRecord::new()
            .with_field(FIELD_LAT, "51.5")
            .with_field(FIELD_LONG, "");
        let no_lat = StationRecord::new().with_field(FIELD_LONG, "-0.12");

        assert!(both.is_mappable());
        assert!(!no_long.is_mappable());
        assert!(!no_lat.is_mappable());
    }

    #[test]
    fn test_with_field_replaces_existing_value() {
        let record = StationRecord::new()
            .with_field("nbBikes", "3")
            .with_field("nbBikes", "4");

        assert_eq!(record.len(), 1);
        assert_eq!(record.value("nbBikes"), Some("4"));
    }

    #[test]
    fn test_serializes_in_field_order() {
        let record = StationRecord::new()
            .with_field("name", "Station A")
            .with_field("id", "1");

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"name":"Station A","id":"1"}"#);
    }
}
