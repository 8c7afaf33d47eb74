//! XML parser for the cycle hire station feed.

use roxmltree::{Document, Node, ParsingOptions};
use tracing::debug;

use crate::error::{PipelineError, Result};
use crate::station::StationRecord;

/// Extracts one [`StationRecord`] per `selector` element, in feed order.
///
/// Tag names are compared on their local part, ignoring ASCII case. For each
/// of `fields`, the value is the text of the *first* matching element below
/// the station in document order; any later duplicates are ignored. Every
/// returned record has exactly `fields` as keys, possibly with empty values.
///
/// # Errors
///
/// Returns [`PipelineError::MissingField`] as soon as a station has no
/// element for one of `fields`; no partial record set is returned. Fails with
/// [`PipelineError::Encoding`] or [`PipelineError::Xml`] if the payload is not
/// a UTF-8 XML document.
pub fn extract_stations(
    bytes: &[u8],
    selector: &str,
    fields: &[String],
) -> Result<Vec<StationRecord>> {
    let text = std::str::from_utf8(bytes)?;
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(text, options)?;

    let mut records = Vec::new();
    for (index, station) in doc
        .descendants()
        .filter(|n| is_tag(n, selector))
        .enumerate()
    {
        let mut record = StationRecord::new();
        for field in fields {
            let element = station
                .descendants()
                .skip(1)
                .find(|n| is_tag(n, field))
                .ok_or_else(|| PipelineError::MissingField {
                    field: field.clone(),
                    index,
                })?;
            record = record.with_field(field.as_str(), text_content(element));
        }
        records.push(record);
    }

    debug!(stations = records.len(), "Feed extracted");
    Ok(records)
}

fn is_tag(node: &Node, name: &str) -> bool {
    node.is_element() && node.tag_name().name().eq_ignore_ascii_case(name)
}

fn text_content(node: Node) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}
