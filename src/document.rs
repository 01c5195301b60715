//! The in-memory settings document: a tree of named elements carrying text.
//!
//! Only the parts of XML a settings file needs are modelled. Attributes,
//! comments, processing instructions and doctypes are skipped on read and
//! never written. Raw whitespace between child elements is layout, not
//! content, so it is dropped when an element has children; whitespace that
//! belongs to such an element's text is written as character references.
//! Text of a leaf element is kept verbatim.

// used for reading documents
use quick_xml::events::Event;
use quick_xml::Reader;
// used when writing text content
use quick_xml::escape::escape;
use thiserror::Error;

// used when writing documents
use std::fmt::Write;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("XML syntax error at byte {position}: {source}")]
    Syntax { position: u64, source: quick_xml::Error },
    #[error("Document has more than one root element ('{0}')")]
    MultipleRoots(String),
    #[error("Text found outside of the root element")]
    StrayText,
    #[error("Element '{0}' is never closed")]
    Unclosed(String),
    #[error("Document has no root element")]
    NoRoot,
}

/// Name of the indexed child at position `index`: `_0`, `_1`, ...
pub fn index_name(index: usize) -> String {
    format!("_{index}")
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    name: String,
    text: Option<String>,
    children: Vec<Element>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), text: None, children: Vec::new() }
    }
    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        let mut element = Self::new(name);
        element.set_text(text);
        element
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    /// Text content, `None` when the element has no text or only empty text.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
    /// Empty text is stored as no text at all.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.text = if text.is_empty() { None } else { Some(text) };
    }
    pub fn clear_text(&mut self) {
        self.text = None;
    }
    pub fn children(&self) -> &[Element] {
        &self.children
    }
    /// First direct child with the given name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }
    pub fn child_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.children.iter_mut().find(|c| c.name == name)
    }
    /// First direct child with the given name, appended if there is none.
    pub fn child_or_insert(&mut self, name: &str) -> &mut Element {
        let position = match self.children.iter().position(|c| c.name == name) {
            Some(position) => position,
            None => {
                self.children.push(Element::new(name));
                self.children.len() - 1
            }
        };
        &mut self.children[position]
    }
    pub fn push_child(&mut self, child: Element) -> &mut Element {
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }
    pub fn clear_children(&mut self) {
        self.children.clear();
    }
    /// The indexed child `_index`.
    pub fn indexed(&self, index: usize) -> Option<&Element> {
        self.children.iter().find(|c| has_index(&c.name, index))
    }
    /// Indexed children `_0, _1, ...` up to the first gap.
    ///
    /// Children written in index order are visited in a single pass; any
    /// other order falls back to a lookup per index.
    pub fn indexed_children(&self) -> impl Iterator<Item = &Element> + '_ {
        let mut cursor = 0;
        let mut in_order = true;
        (0..).map_while(move |i| {
            if in_order {
                if let Some(child) = self.children.get(cursor).filter(|c| has_index(&c.name, i)) {
                    cursor += 1;
                    return Some(child);
                }
                in_order = false;
            }
            self.indexed(i)
        })
    }
}

/// Whether `name` is exactly `_index`, without leading zeros or signs.
fn has_index(name: &str, index: usize) -> bool {
    let Some(digits) = name.strip_prefix('_') else {
        return false;
    };
    !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit())
        && (digits == "0" || !digits.starts_with('0'))
        && digits.parse::<usize>() == Ok(index)
}

// ------------- Reading -------------

/// A text segment, flagged when its raw form is nothing but whitespace.
struct Segment {
    text: String,
    layout: bool,
}

struct Pending {
    element: Element,
    segments: Vec<Segment>,
}

impl Pending {
    fn open(name: String) -> Self {
        Self { element: Element::new(name), segments: Vec::new() }
    }
    // raw whitespace next to children is indentation; escaped whitespace is content
    fn close(mut self) -> Element {
        let has_children = !self.element.children.is_empty();
        let text: String = self
            .segments
            .into_iter()
            .filter(|s| !has_children || !s.layout)
            .map(|s| s.text)
            .collect();
        self.element.set_text(text);
        self.element
    }
}

fn element_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}

/// Parses a whole document and returns its root element.
pub fn parse(xml: &str) -> Result<Element, DocumentError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut stack: Vec<Pending> = Vec::new();
    let mut root: Option<Element> = None;

    // attach a finished element to its parent, or make it the root
    let mut finish = |stack: &mut Vec<Pending>, element: Element| -> Result<(), DocumentError> {
        match stack.last_mut() {
            Some(parent) => {
                parent.element.children.push(element);
                Ok(())
            }
            None if root.is_some() => Err(DocumentError::MultipleRoots(element.name)),
            None => {
                root = Some(element);
                Ok(())
            }
        }
    };

    loop {
        let event = reader.read_event().map_err(|source| DocumentError::Syntax {
            position: reader.buffer_position() as u64,
            source,
        })?;
        match event {
            Event::Start(start) => {
                stack.push(Pending::open(element_name(start.name().as_ref())));
            }
            Event::Empty(start) => {
                finish(&mut stack, Element::new(element_name(start.name().as_ref())))?;
            }
            Event::End(_) => {
                if let Some(pending) = stack.pop() {
                    finish(&mut stack, pending.close())?;
                }
            }
            Event::Text(raw) => {
                let layout = raw.iter().all(u8::is_ascii_whitespace);
                let text = raw.unescape().map_err(|source| DocumentError::Syntax {
                    position: reader.buffer_position() as u64,
                    source,
                })?;
                match stack.last_mut() {
                    Some(pending) => pending.segments.push(Segment { text: text.into_owned(), layout }),
                    None if layout => {}
                    None => return Err(DocumentError::StrayText),
                }
            }
            Event::CData(data) => match stack.last_mut() {
                Some(pending) => pending.segments.push(Segment {
                    text: String::from_utf8_lossy(&data).into_owned(),
                    layout: false,
                }),
                None => return Err(DocumentError::StrayText),
            },
            Event::Eof => break,
            // comments, declarations, processing instructions, doctypes
            _ => {}
        }
    }

    if let Some(open) = stack.pop() {
        return Err(DocumentError::Unclosed(open.element.name));
    }
    root.ok_or(DocumentError::NoRoot)
}

// ------------- Writing -------------

/// Renders `root` as a document. Elements without text are laid out one per
/// line with `indent` spaces per level; elements with text are written on a
/// single line so their content survives unchanged.
///
/// Whitespace in the text of an element that also has children is written
/// as character references, so it cannot be mistaken for indentation.
/// Control characters other than tab, newline and carriage return have no
/// XML 1.0 representation; they are written as they are and only this
/// module's reader is guaranteed to read them back.
pub fn to_xml(root: &Element, indent: usize, declaration: bool) -> String {
    let mut out = String::new();
    if declaration {
        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    }
    write_block(&mut out, root, indent, 0);
    out
}

fn write_block(out: &mut String, element: &Element, indent: usize, depth: usize) {
    let pad = " ".repeat(indent * depth);
    if element.text.is_some() || element.children.is_empty() {
        out.push_str(&pad);
        write_inline(out, element);
        out.push('\n');
        return;
    }
    let _ = writeln!(out, "{pad}<{}>", element.name);
    for child in &element.children {
        write_block(out, child, indent, depth + 1);
    }
    let _ = writeln!(out, "{pad}</{}>", element.name);
}

fn write_inline(out: &mut String, element: &Element) {
    if element.text.is_none() && element.children.is_empty() {
        let _ = write!(out, "<{}/>", element.name);
        return;
    }
    let _ = write!(out, "<{}>", element.name);
    if let Some(text) = &element.text {
        let escaped = escape(text.as_str());
        if element.children.is_empty() {
            out.push_str(&escaped);
        } else {
            write_whitespace_refs(out, &escaped);
        }
    }
    for child in &element.children {
        write_inline(out, child);
    }
    let _ = write!(out, "</{}>", element.name);
}

fn write_whitespace_refs(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            ' ' => out.push_str("&#x20;"),
            '\t' => out.push_str("&#x9;"),
            '\n' => out.push_str("&#xA;"),
            '\r' => out.push_str("&#xD;"),
            other => out.push(other),
        }
    }
}
