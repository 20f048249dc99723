//! Attribute-tree documents
//!
//! [`XmlMetadata`] reads an XML document once and keeps every element in the
//! Topologic namespace, in document order, with its attributes. Namespace
//! declarations are not counted as attributes. Elements can appear anywhere
//! in the document; vector documents keep them inside `<metadata>`.
//!
//! A document that fails to parse, or that never declares the Topologic
//! namespace, is invalid: it holds no elements and every query on it comes
//! back empty.

use std::fmt;

use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;
use topologic_core::TOPOLOGIC_NAMESPACE;

/// Why a document is invalid
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentError {
    /// The text is not well-formed XML
    Parse(String),
    /// The Topologic namespace is never declared
    MissingNamespace,
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentError::Parse(e) => write!(f, "Failed to parse document: {}", e),
            DocumentError::MissingNamespace => {
                write!(f, "Document does not declare the namespace {}", TOPOLOGIC_NAMESPACE)
            }
        }
    }
}

impl std::error::Error for DocumentError {}

impl From<quick_xml::Error> for DocumentError {
    fn from(e: quick_xml::Error) -> Self {
        DocumentError::Parse(e.to_string())
    }
}

/// A Topologic element and its attributes
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
}

impl Element {
    /// Local name, e.g. `"camera"`
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of attributes, namespace declarations excluded
    #[inline]
    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    /// Unescaped value of an attribute
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// A parsed metadata document
#[derive(Debug, Clone)]
pub struct XmlMetadata {
    elements: Vec<Element>,
    error: Option<DocumentError>,
}

fn is_namespace_binding(key: &[u8]) -> bool {
    key == b"xmlns" || key.starts_with(b"xmlns:")
}

/// Collect Topologic elements; the flag reports whether the namespace was declared
fn scan(text: &str) -> Result<(Vec<Element>, bool), quick_xml::Error> {
    let mut reader = NsReader::from_str(text);
    let mut buf = Vec::new();
    let mut elements = Vec::new();
    let mut declared = false;

    loop {
        match reader.read_resolved_event_into(&mut buf)? {
            (ResolveResult::Bound(Namespace(ns)), Event::Start(e) | Event::Empty(e))
                if ns == TOPOLOGIC_NAMESPACE.as_bytes() =>
            {
                let mut attributes = Vec::new();
                for attr in e.attributes() {
                    let attr = attr?;
                    if is_namespace_binding(attr.key.as_ref()) {
                        declared |= attr.value.as_ref() == TOPOLOGIC_NAMESPACE.as_bytes();
                        continue;
                    }
                    let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).to_string();
                    let value = attr.unescape_value()?.to_string();
                    attributes.push((key, value));
                }
                elements.push(Element {
                    name: String::from_utf8_lossy(e.local_name().as_ref()).to_string(),
                    attributes,
                });
            }
            (_, Event::Start(e) | Event::Empty(e)) => {
                for attr in e.attributes() {
                    let attr = attr?;
                    if is_namespace_binding(attr.key.as_ref()) {
                        declared |= attr.value.as_ref() == TOPOLOGIC_NAMESPACE.as_bytes();
                    }
                }
            }
            (_, Event::Eof) => break,
            _ => {}
        }
        buf.clear();
    }

    Ok((elements, declared))
}

impl XmlMetadata {
    /// Parse a document
    ///
    /// Never fails: a broken document is returned marked invalid.
    pub fn parse(text: &str) -> Self {
        match scan(text) {
            Ok((elements, true)) => {
                log::debug!("parsed document with {} topologic elements", elements.len());
                Self { elements, error: None }
            }
            Ok((_, false)) => Self::invalid(DocumentError::MissingNamespace),
            Err(e) => Self::invalid(e.into()),
        }
    }

    fn invalid(error: DocumentError) -> Self {
        log::warn!("{}", error);
        Self {
            elements: Vec::new(),
            error: Some(error),
        }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }

    /// Why the document is invalid, if it is
    pub fn error(&self) -> Option<&DocumentError> {
        self.error.as_ref()
    }

    /// Every Topologic element, in document order
    pub fn all(&self) -> &[Element] {
        &self.elements
    }

    /// Elements with a given local name, in document order
    pub fn elements<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.elements.iter().filter(move |e| e.name == name)
    }

    /// Value of `attribute` on the first `element` that has it
    pub fn evaluate(&self, element: &str, attribute: &str) -> Option<&str> {
        self.elements
            .iter()
            .filter(|e| e.name == element)
            .find_map(|e| e.attribute(attribute))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "<?xml version='1.0'?>\
        <svg xmlns='http://www.w3.org/2000/svg'>\
        <metadata xmlns:t='http://ef.gy/2012/topologic'>\
        <t:camera radius='3' theta-1='1' theta-2='1'/>\
        <t:camera mode='polar'/>\
        <t:options radius='2' id-prefix='a&amp;b'/>\
        <t:options radius='5'/>\
        </metadata>\
        <title>not metadata</title>\
        </svg>";

    #[test]
    fn test_collects_namespaced_elements() {
        let doc = XmlMetadata::parse(DOC);
        assert!(doc.is_valid());
        assert_eq!(doc.all().len(), 4);
        assert_eq!(doc.elements("camera").count(), 2);
        assert_eq!(doc.elements("title").count(), 0);
    }

    #[test]
    fn test_attributes() {
        let doc = XmlMetadata::parse(DOC);
        let camera = doc.elements("camera").next().expect("camera");
        assert_eq!(camera.attribute_count(), 3);
        assert_eq!(camera.attribute("theta-2"), Some("1"));
        assert_eq!(camera.attribute("theta-3"), None);
    }

    #[test]
    fn test_evaluate_takes_first_match() {
        let doc = XmlMetadata::parse(DOC);
        assert_eq!(doc.evaluate("options", "radius"), Some("2"));
        assert_eq!(doc.evaluate("options", "id-prefix"), Some("a&b"));
        assert_eq!(doc.evaluate("camera", "mode"), Some("polar"));
        assert_eq!(doc.evaluate("flame", "coefficients"), None);
    }

    #[test]
    fn test_evaluate_outlives_query() {
        let doc = XmlMetadata::parse(DOC);
        let value = {
            let element = format!("op{}", "tions");
            doc.evaluate(&element, "radius")
        };
        assert_eq!(value, Some("2"));
    }

    #[test]
    fn test_missing_namespace() {
        let doc = XmlMetadata::parse("<svg><camera radius='3'/></svg>");
        assert!(!doc.is_valid());
        assert_eq!(doc.error(), Some(&DocumentError::MissingNamespace));
        assert!(doc.all().is_empty());
    }

    #[test]
    fn test_malformed_document() {
        let doc = XmlMetadata::parse("<svg xmlns:t='http://ef.gy/2012/topologic'><t:camera></svg>");
        assert!(!doc.is_valid());
        assert!(matches!(doc.error(), Some(DocumentError::Parse(_))));
        assert_eq!(doc.evaluate("camera", "radius"), None);
    }

    #[test]
    fn test_other_prefix_same_namespace() {
        let doc = XmlMetadata::parse("<topologic:flame xmlns:topologic='http://ef.gy/2012/topologic' coefficients='4'/>");
        assert!(doc.is_valid());
        let flame = doc.elements("flame").next().expect("flame");
        assert_eq!(flame.attribute_count(), 1);
        assert_eq!(flame.attribute("coefficients"), Some("4"));
    }
}
