use crate::kml::document::Element;
use crate::station::{FIELD_NAME, StationRecord};

/// KML coordinate string for a record: longitude first, then latitude.
///
/// Both values are copied verbatim. `None` when either is missing or empty.
pub fn coordinates(record: &StationRecord) -> Option<String> {
    let lat = record.lat()?;
    let long = record.long()?;
    Some(format!("{long},{lat}"))
}

/// Renders `record` as a `Placemark`, or `None` if it cannot be mapped.
///
/// The placemark holds a `Point`, then the station `name` when there is one,
/// then an `ExtendedData` block built from `fields` in order. `name` is never
/// repeated inside `ExtendedData`, and fields with no value get no `Data`
/// entry. An empty `fields` slice produces no `ExtendedData` at all.
pub fn project(record: &StationRecord, fields: &[String]) -> Option<Element> {
    let coordinates = coordinates(record)?;

    let point = Element::new("Point").with_child(Element::text_node("coordinates", coordinates));
    let mut placemark = Element::new("Placemark").with_child(point);

    if let Some(name) = record.name() {
        placemark = placemark.with_child(Element::text_node("name", name));
    }

    if !fields.is_empty() {
        placemark = placemark.with_child(extended_data(record, fields));
    }

    Some(placemark)
}

fn extended_data(record: &StationRecord, fields: &[String]) -> Element {
    fields
        .iter()
        .filter(|field| field.as_str() != FIELD_NAME)
        .filter_map(|field| {
            record.value(field).map(|value| {
                Element::new("Data")
                    .with_attribute("name", field.as_str())
                    .with_child(Element::text_node("value", value))
            })
        })
        .fold(Element::new("ExtendedData"), Element::with_child)
}
