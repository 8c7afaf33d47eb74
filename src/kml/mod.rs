//! KML 2.2 output.
//!
//! [`KmlDocument`] holds the document shell and its placemarks;
//! [`project`] turns one station into a placemark for a given field subset.

pub mod document;
pub mod placemark;

pub use document::{Element, KML_NAMESPACE, KmlDocument};
pub use placemark::{coordinates, project};
