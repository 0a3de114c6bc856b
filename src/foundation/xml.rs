use std::{fs, path::Path, str::FromStr};

use quick_xml::{
    Reader, Writer,
    events::{BytesEnd, BytesStart, Event},
};

use crate::foundation::error::{CueError, CueResult};

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Minimal owned XML element tree used for cue state snapshots.
///
/// Only element names, attributes and nested elements are kept. Text nodes,
/// comments and processing instructions are dropped on parse; cue state never
/// carries them.
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlElement>,
}

impl XmlElement {
    /// Create an element without attributes or children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Element tag name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw attribute value, if present.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Attributes in document order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Set (or replace) an attribute value.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key, value)),
        }
        self
    }

    /// Builder-style [`XmlElement::set_attribute`].
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(key, value);
        self
    }

    /// Parse an optional attribute into `T`.
    pub fn parse_attribute<T>(&self, key: &str) -> CueResult<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let Some(raw) = self.attribute(key) else {
            return Ok(None);
        };
        raw.trim().parse::<T>().map(Some).map_err(|e| {
            CueError::xml(format!(
                "attribute '{key}' on <{}> has invalid value '{raw}': {e}",
                self.name
            ))
        })
    }

    /// Parse a mandatory attribute into `T`.
    pub fn required_attribute<T>(&self, key: &str) -> CueResult<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.parse_attribute(key)?.ok_or_else(|| {
            CueError::xml(format!("<{}> is missing attribute '{key}'", self.name))
        })
    }

    /// Nested elements in document order.
    pub fn children(&self) -> &[XmlElement] {
        &self.children
    }

    /// Nested elements with the given tag name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// First nested element with the given tag name.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Append a nested element and return a handle to it.
    pub fn add_child(&mut self, child: XmlElement) -> &mut XmlElement {
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    /// Parse a document and return its root element.
    pub fn from_xml_str(text: &str) -> CueResult<Self> {
        let mut reader = Reader::from_str(text);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            let event = reader.read_event().map_err(|e| {
                CueError::xml(format!(
                    "XML parse error at byte {}: {e}",
                    reader.buffer_position()
                ))
            })?;
            match event {
                Event::Start(start) => stack.push(element_from_start(&start)?),
                Event::Empty(start) => {
                    let el = element_from_start(&start)?;
                    attach(&mut stack, &mut root, el)?;
                }
                Event::End(_) => {
                    let el = stack
                        .pop()
                        .ok_or_else(|| CueError::xml("unbalanced closing tag"))?;
                    attach(&mut stack, &mut root, el)?;
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(CueError::xml(format!("element <{}> is not closed", open.name)));
        }
        root.ok_or_else(|| CueError::xml("document has no root element"))
    }

    /// Read and parse a document from disk.
    pub fn from_path(path: impl AsRef<Path>) -> CueResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| CueError::xml(format!("read '{}': {e}", path.display())))?;
        Self::from_xml_str(&text)
    }

    /// Serialize this element (and its subtree) as indented XML.
    pub fn to_xml_string(&self) -> CueResult<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        self.write_into(&mut writer)?;
        String::from_utf8(writer.into_inner())
            .map_err(|e| CueError::xml(format!("serialized XML is not utf-8: {e}")))
    }

    fn write_into(&self, writer: &mut Writer<Vec<u8>>) -> CueResult<()> {
        let mut start = BytesStart::new(self.name.as_str());
        for (k, v) in &self.attributes {
            start.push_attribute((k.as_str(), v.as_str()));
        }
        if self.children.is_empty() {
            writer.write_event(Event::Empty(start)).map_err(write_err)?;
            return Ok(());
        }
        writer.write_event(Event::Start(start)).map_err(write_err)?;
        for child in &self.children {
            child.write_into(writer)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new(self.name.as_str())))
            .map_err(write_err)?;
        Ok(())
    }
}

fn element_from_start(start: &BytesStart<'_>) -> CueResult<XmlElement> {
    let name = std::str::from_utf8(start.name().as_ref())
        .map_err(|e| CueError::xml(format!("element name is not utf-8: {e}")))?
        .to_owned();
    let mut el = XmlElement::new(name);
    for attr in start.attributes() {
        let attr = attr
            .map_err(|e| CueError::xml(format!("malformed attribute on <{}>: {e}", el.name)))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| CueError::xml(format!("attribute name is not utf-8: {e}")))?
            .to_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| CueError::xml(format!("attribute '{key}' cannot be unescaped: {e}")))?
            .into_owned();
        el.attributes.push((key, value));
    }
    Ok(el)
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    el: XmlElement,
) -> CueResult<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(el);
        return Ok(());
    }
    if root.is_some() {
        return Err(CueError::xml("document has more than one root element"));
    }
    *root = Some(el);
    Ok(())
}

fn write_err(e: impl std::fmt::Display) -> CueError {
    CueError::xml(format!("XML write error: {e}"))
}

/// Format a double so that parsing the text yields the identical value.
pub fn format_f64(value: f64) -> String {
    // `Display` for f64 emits the shortest representation that round-trips.
    format!("{value}")
}

/// Comma-join values with [`format_f64`].
pub fn format_f64_list(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| format_f64(*v))
        .collect::<Vec<_>>()
        .join(",")
}

/// Parse a comma-separated list of doubles. An empty string is an empty list.
pub fn parse_f64_list(text: &str) -> CueResult<Vec<f64>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }
    text.split(',')
        .map(|part| {
            let part = part.trim();
            part.parse::<f64>()
                .map_err(|e| CueError::xml(format!("invalid number '{part}': {e}")))
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/xml.rs"]
mod tests;
