use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::Result;

pub const KML_NAMESPACE: &str = "http://www.opengis.net/kml/2.2";

/// An XML element value, composed bottom-up.
///
/// Builder methods consume `self` and return the extended element, so a
/// finished subtree is never mutated after it has been attached to a parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<Element>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    /// Shorthand for an element holding only `text`.
    pub fn text_node(tag: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(tag).with_text(text)
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// First direct child with the given tag.
    pub fn child(&self, tag: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.tag == tag)
    }

    fn write_to(&self, writer: &mut Writer<Vec<u8>>) -> Result<()> {
        let mut start = BytesStart::new(self.tag.as_str());
        for (name, value) in &self.attributes {
            start.push_attribute((name.as_str(), value.as_str()));
        }

        if self.text.is_none() && self.children.is_empty() {
            writer.write_event(Event::Empty(start))?;
            return Ok(());
        }

        writer.write_event(Event::Start(start))?;
        if let Some(text) = &self.text {
            writer.write_event(Event::Text(BytesText::new(text)))?;
        }
        for child in &self.children {
            child.write_to(writer)?;
        }
        writer.write_event(Event::End(BytesEnd::new(self.tag.as_str())))?;
        Ok(())
    }
}

/// A KML 2.2 document: `kml` root, one `Document` container, placemarks.
///
/// Placemarks can only be appended; one document is built per target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KmlDocument {
    title: Option<String>,
    placemarks: Vec<Element>,
}

impl KmlDocument {
    /// Creates an empty document. An empty `title` adds no `name` node.
    pub fn new(title: &str) -> Self {
        Self {
            title: (!title.is_empty()).then(|| title.to_string()),
            placemarks: Vec::new(),
        }
    }

    pub fn append_placemark(&mut self, placemark: Element) {
        self.placemarks.push(placemark);
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn placemarks(&self) -> &[Element] {
        &self.placemarks
    }

    /// Assembles the full element tree.
    pub fn to_element(&self) -> Element {
        let mut container = Element::new("Document");
        if let Some(title) = &self.title {
            container = container.with_child(Element::text_node("name", title.as_str()));
        }
        for placemark in &self.placemarks {
            container = container.with_child(placemark.clone());
        }

        Element::new("kml")
            .with_attribute("xmlns", KML_NAMESPACE)
            .with_child(container)
    }

    /// Pretty-prints the document, XML declaration included.
    pub fn serialize(&self) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        self.to_element().write_to(&mut writer)?;

        let mut bytes = writer.into_inner();
        bytes.push(b'\n');
        Ok(String::from_utf8(bytes)?)
    }
}
