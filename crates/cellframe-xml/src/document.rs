//! Owned XML document tree
//!
//! The tree is built once from quick-xml events and owns all of its strings,
//! so it can outlive the input buffer and be shared behind a
//! [`DocumentHandle`](crate::DocumentHandle).

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::reader::Reader;
use quick_xml::writer::Writer;

use crate::error::{XmlError, XmlResult};

/// A node in the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

/// An element with its attributes (in document order) and children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlNode>,
}

impl XmlElement {
    /// Create an element without attributes or children
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Qualified name as written (`x:c`, `row`, ...)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name without namespace prefix
    pub fn local_name(&self) -> &str {
        local_part(&self.name)
    }

    /// Attributes in document order
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Attribute value by qualified name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing an existing one in place
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == name) {
            Some((_, v)) => *v = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Remove an attribute, returning its value
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        let idx = self.attributes.iter().position(|(k, _)| k == name)?;
        Some(self.attributes.remove(idx).1)
    }

    /// Child nodes
    pub fn children(&self) -> &[XmlNode] {
        &self.children
    }

    /// Child elements only
    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(e) => Some(e),
            XmlNode::Text(_) => None,
        })
    }

    /// Append a child element
    pub fn append_child(&mut self, child: XmlElement) {
        self.children.push(XmlNode::Element(child));
    }

    /// Append text, merging with a trailing text node
    pub fn append_text(&mut self, text: &str) {
        if let Some(XmlNode::Text(last)) = self.children.last_mut() {
            last.push_str(text);
        } else {
            self.children.push(XmlNode::Text(text.to_string()));
        }
    }

    /// Drop whitespace-only text between child elements
    fn drop_blank_text(&mut self) {
        if self.child_elements().next().is_some() {
            self.children
                .retain(|node| !matches!(node, XmlNode::Text(t) if t.trim().is_empty()));
        }
    }

    /// First descendant (excluding self) with the given local name
    pub fn find(&self, local_name: &str) -> Option<&XmlElement> {
        for child in self.child_elements() {
            if child.local_name() == local_name {
                return Some(child);
            }
            if let Some(found) = child.find(local_name) {
                return Some(found);
            }
        }
        None
    }

    /// All descendants with the given local name, in document order
    pub fn descendants<'a>(&'a self, local_name: &str) -> Vec<&'a XmlElement> {
        let mut out = Vec::new();
        self.collect_descendants(local_name, &mut out);
        out
    }

    fn collect_descendants<'a>(&'a self, local_name: &str, out: &mut Vec<&'a XmlElement>) {
        for child in self.child_elements() {
            if child.local_name() == local_name {
                out.push(child);
            }
            child.collect_descendants(local_name, out);
        }
    }

    /// Concatenated text of all descendant text nodes
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                XmlNode::Text(t) => out.push_str(t),
                XmlNode::Element(e) => e.collect_text(out),
            }
        }
    }

    /// Number of elements in this subtree, including self
    pub fn element_count(&self) -> usize {
        1 + self
            .child_elements()
            .map(XmlElement::element_count)
            .sum::<usize>()
    }

    /// Serialize this element and its subtree
    pub fn to_xml_string(&self) -> XmlResult<String> {
        let mut writer = Writer::new(Vec::new());
        self.write_to(&mut writer)?;
        Ok(String::from_utf8(writer.into_inner())?)
    }

    fn write_to(&self, writer: &mut Writer<Vec<u8>>) -> XmlResult<()> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if self.children.is_empty() {
            writer.write_event(Event::Empty(start))?;
            return Ok(());
        }

        writer.write_event(Event::Start(start))?;
        for child in &self.children {
            match child {
                XmlNode::Element(e) => e.write_to(writer)?,
                XmlNode::Text(t) => writer.write_event(Event::Text(BytesText::new(t)))?,
            }
        }
        writer.write_event(Event::End(BytesEnd::new(self.name.as_str())))?;
        Ok(())
    }
}

/// A parsed XML document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    root: XmlElement,
    declaration: bool,
}

impl XmlDocument {
    /// Wrap an element as a document root
    pub fn new(root: XmlElement) -> Self {
        Self {
            root,
            declaration: true,
        }
    }

    /// Parse a complete document.
    ///
    /// Fails on anything that is not a single well-formed root element:
    /// unbalanced or mismatched tags, bad attributes or entities, text
    /// outside the root, or an empty input.
    pub fn parse(bytes: &[u8]) -> XmlResult<Self> {
        let mut reader = Reader::from_reader(bytes);
        let mut buf = Vec::new();
        let mut builder = TreeBuilder::new();
        let mut root: Option<XmlElement> = None;
        let mut declaration = false;

        loop {
            let event = match reader.read_event_into(&mut buf) {
                Ok(event) => event,
                Err(e) => return Err(XmlError::parse(reader.buffer_position(), e)),
            };
            let position = reader.buffer_position();

            match event {
                Event::Decl(_) => declaration = true,
                Event::Start(ref e) | Event::Empty(ref e) if builder.is_idle() && root.is_some() => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    return Err(XmlError::parse(
                        position,
                        format!("second root element <{name}>"),
                    ));
                }
                Event::Start(e) => builder.start(&e, position)?,
                Event::Empty(e) => {
                    if let Some(done) = builder.empty(&e, position)? {
                        root = Some(done);
                    }
                }
                Event::End(e) => {
                    if let Some(done) = builder.end(e.name().as_ref(), position)? {
                        root = Some(done);
                    }
                }
                Event::Text(e) => {
                    let text = e.unescape().map_err(|err| XmlError::parse(position, err))?;
                    builder.text(&text, position)?;
                }
                Event::CData(e) => {
                    let text = String::from_utf8(e.into_inner().into_owned())
                        .map_err(|err| XmlError::parse(position, err))?;
                    builder.cdata(&text, position)?;
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        builder.finish(reader.buffer_position())?;
        let root = root.ok_or_else(|| XmlError::parse(reader.buffer_position(), "no root element"))?;
        log::debug!(
            "parsed xml document <{}> with {} elements",
            root.name(),
            root.element_count()
        );

        Ok(Self { root, declaration })
    }

    /// Root element
    pub fn root(&self) -> &XmlElement {
        &self.root
    }

    /// Mutable root element
    pub fn root_mut(&mut self) -> &mut XmlElement {
        &mut self.root
    }

    /// First element (root included) with the given local name
    pub fn find(&self, local_name: &str) -> Option<&XmlElement> {
        if self.root.local_name() == local_name {
            return Some(&self.root);
        }
        self.root.find(local_name)
    }

    /// All elements (root included) with the given local name
    pub fn descendants<'a>(&'a self, local_name: &str) -> Vec<&'a XmlElement> {
        let mut out = Vec::new();
        if self.root.local_name() == local_name {
            out.push(&self.root);
        }
        self.root.collect_descendants(local_name, &mut out);
        out
    }

    /// Total number of elements
    pub fn element_count(&self) -> usize {
        self.root.element_count()
    }

    /// Serialize the document, with an XML declaration if the input had one
    pub fn to_xml_string(&self) -> XmlResult<String> {
        let mut writer = Writer::new(Vec::new());
        if self.declaration {
            writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        }
        self.root.write_to(&mut writer)?;
        Ok(String::from_utf8(writer.into_inner())?)
    }
}

/// Strip a namespace prefix from a qualified name
pub(crate) fn local_part(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, local)| local)
}

/// Collect a start tag's attributes as owned, unescaped pairs
pub(crate) fn collect_attributes(
    e: &BytesStart<'_>,
    position: usize,
) -> XmlResult<Vec<(String, String)>> {
    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| XmlError::parse(position, err))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|err| XmlError::parse(position, err))?
            .to_string();
        let value = attr
            .unescape_value()
            .map_err(|err| XmlError::parse(position, err))?
            .into_owned();
        attributes.push((key, value));
    }
    Ok(attributes)
}

/// Incremental tree construction from start/end/text events.
///
/// Used for whole documents and for sub-trees captured while streaming.
/// Whitespace-only text between child elements is dropped unless
/// `xml:space="preserve"` is in scope; text-only content is always kept.
#[derive(Debug, Default)]
pub(crate) struct TreeBuilder {
    stack: Vec<(XmlElement, bool)>,
    preserve: bool,
}

impl TreeBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Builder for a sub-tree whose ancestors set `xml:space` to `preserve`
    pub(crate) fn inheriting(preserve: bool) -> Self {
        Self {
            stack: Vec::new(),
            preserve,
        }
    }

    /// No element is open
    pub(crate) fn is_idle(&self) -> bool {
        self.stack.is_empty()
    }

    fn element(e: &BytesStart<'_>, position: usize) -> XmlResult<XmlElement> {
        let name = std::str::from_utf8(e.name().as_ref())
            .map_err(|err| XmlError::parse(position, err))?
            .to_string();
        Ok(XmlElement {
            name,
            attributes: collect_attributes(e, position)?,
            children: Vec::new(),
        })
    }

    pub(crate) fn start(&mut self, e: &BytesStart<'_>, position: usize) -> XmlResult<()> {
        let element = Self::element(e, position)?;
        let inherited = self
            .stack
            .last()
            .map_or(self.preserve, |(_, preserve)| *preserve);
        let preserve = match element.attribute("xml:space") {
            Some(space) => space == "preserve",
            None => inherited,
        };
        self.stack.push((element, preserve));
        Ok(())
    }

    /// Returns the element when it is a top-level one
    pub(crate) fn empty(
        &mut self,
        e: &BytesStart<'_>,
        position: usize,
    ) -> XmlResult<Option<XmlElement>> {
        let element = Self::element(e, position)?;
        Ok(self.attach(element))
    }

    /// Close the innermost element; returns it when it is a top-level one
    pub(crate) fn end(&mut self, name: &[u8], position: usize) -> XmlResult<Option<XmlElement>> {
        let (mut element, preserve) = self.stack.pop().ok_or_else(|| {
            XmlError::parse(
                position,
                format!("unexpected </{}>", String::from_utf8_lossy(name)),
            )
        })?;
        if element.name.as_bytes() != name {
            return Err(XmlError::parse(
                position,
                format!(
                    "expected </{}>, found </{}>",
                    element.name,
                    String::from_utf8_lossy(name)
                ),
            ));
        }
        if !preserve {
            element.drop_blank_text();
        }
        Ok(self.attach(element))
    }

    pub(crate) fn text(&mut self, text: &str, position: usize) -> XmlResult<()> {
        match self.stack.last_mut() {
            Some((element, _)) => {
                element.append_text(text);
                Ok(())
            }
            None if text.trim().is_empty() => Ok(()),
            None => Err(XmlError::parse(position, "text outside the root element")),
        }
    }

    pub(crate) fn cdata(&mut self, text: &str, position: usize) -> XmlResult<()> {
        match self.stack.last_mut() {
            Some((element, _)) => {
                element.append_text(text);
                Ok(())
            }
            None => Err(XmlError::parse(position, "CDATA outside the root element")),
        }
    }

    /// Fail if any element is still open
    pub(crate) fn finish(&self, position: usize) -> XmlResult<()> {
        match self.stack.last() {
            Some((element, _)) => Err(XmlError::parse(
                position,
                format!("unclosed element <{}>", element.name),
            )),
            None => Ok(()),
        }
    }

    fn attach(&mut self, element: XmlElement) -> Option<XmlElement> {
        match self.stack.last_mut() {
            Some((parent, _)) => {
                parent.append_child(element);
                None
            }
            None => Some(element),
        }
    }
}
