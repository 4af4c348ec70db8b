use std::collections::BTreeMap;

use quick_xml::events::{BytesStart, Event};
use thiserror::Error;

/// Key under which CDATA text is stored on a node.
pub const CDATA_KEY: &str = "#cdata";
/// Key under which plain text is stored when the element also has attributes or children.
pub const TEXT_KEY: &str = "_";

/// Shape-tolerant value read out of an export document.
///
/// Repeated child elements are always collected into a `List`, so a single
/// `<title>` becomes a one-element list. Leaf text without attributes is a
/// `Text`; anything richer is a `Node` keyed by child/attribute name.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    List(Vec<FieldValue>),
    Node(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    /// Look up a key on a node, unwrapping a one-element list wrapper first.
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        match self {
            FieldValue::Node(map) => map.get(key),
            FieldValue::List(items) => items.first().and_then(|v| v.get(key)),
            FieldValue::Text(_) => None,
        }
    }

    /// All values stored under `key`, in document order.
    pub fn children(&self, key: &str) -> &[FieldValue] {
        match self.get(key) {
            Some(FieldValue::List(items)) => items,
            Some(other) => std::slice::from_ref(other),
            None => &[],
        }
    }
}

#[derive(Debug, Error)]
pub enum MalformedDocument {
    #[error("invalid XML: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("unexpected end of document: <{0}> is never closed")]
    Unclosed(String),
    #[error("document has no root element")]
    NoRoot,
}

struct Frame {
    name: String,
    attrs: Vec<(String, String)>,
    text: String,
    saw_cdata: bool,
    children: Vec<(String, FieldValue)>,
}

impl Frame {
    fn open(e: &BytesStart) -> Result<Self, MalformedDocument> {
        let mut attrs = Vec::new();
        for attr in e.attributes() {
            let attr = attr.map_err(quick_xml::Error::from)?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            attrs.push((key, attr.unescape_value()?.into_owned()));
        }
        Ok(Frame {
            name: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
            attrs,
            text: String::new(),
            saw_cdata: false,
            children: Vec::new(),
        })
    }

    fn close(self) -> (String, FieldValue) {
        let Frame { name, attrs, text, saw_cdata, children } = self;

        if attrs.is_empty() && children.is_empty() {
            let value = if saw_cdata {
                let mut map = BTreeMap::new();
                map.insert(CDATA_KEY.to_string(), FieldValue::Text(text));
                FieldValue::Node(map)
            } else {
                FieldValue::Text(text)
            };
            return (name, value);
        }

        let mut map: BTreeMap<String, FieldValue> = BTreeMap::new();
        for (key, value) in attrs {
            map.insert(key, FieldValue::List(vec![FieldValue::Text(value)]));
        }
        for (key, value) in children {
            match map.entry(key).or_insert_with(|| FieldValue::List(Vec::new())) {
                FieldValue::List(items) => items.push(value),
                slot => *slot = FieldValue::List(vec![value]),
            }
        }
        // Whitespace between child elements is layout, not content.
        if saw_cdata {
            map.insert(CDATA_KEY.to_string(), FieldValue::Text(text));
        } else if !text.trim().is_empty() {
            map.insert(TEXT_KEY.to_string(), FieldValue::Text(text));
        }
        (name, FieldValue::Node(map))
    }
}

/// Parse XML text into the name and `FieldValue` tree of the document element.
///
/// The root element itself is not wrapped: for `<rss><channel>..</channel></rss>`
/// the result is the `rss` node, so `root.get("channel")` finds the channel.
pub fn parse_tree(xml: &str) -> Result<(String, FieldValue), MalformedDocument> {
    let mut reader = quick_xml::Reader::from_str(xml);
    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<(String, FieldValue)> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => stack.push(Frame::open(&e)?),
            Event::Empty(e) => {
                let (name, value) = Frame::open(&e)?.close();
                attach(&mut stack, &mut root, name, value);
            }
            Event::End(_) => {
                if let Some(frame) = stack.pop() {
                    let (name, value) = frame.close();
                    attach(&mut stack, &mut root, name, value);
                }
            }
            Event::Text(e) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&e.unescape()?);
                }
            }
            Event::CData(e) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                    frame.saw_cdata = true;
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.pop() {
        return Err(MalformedDocument::Unclosed(open.name));
    }
    root.ok_or(MalformedDocument::NoRoot)
}

fn attach(
    stack: &mut [Frame],
    root: &mut Option<(String, FieldValue)>,
    name: String,
    value: FieldValue,
) {
    match stack.last_mut() {
        Some(parent) => parent.children.push((name, value)),
        None => {
            if root.is_none() {
                *root = Some((name, value));
            }
        }
    }
}
