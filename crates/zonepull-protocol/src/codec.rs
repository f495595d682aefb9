//! Bidirectional codec between [`Value`] trees and XML element trees.
//!
//! The encoding follows the OpenXML conventions: scalars become text
//! nodes, maps become named child elements, and ordered sequences are
//! wrapped as `<array><item>..</item></array>`. A map holding any
//! non-negative-integer key is rendered as an `array` of those entries
//! in index order and its named entries are dropped; downstream
//! consumers depend on that exact wire shape, so it is reproduced here
//! rather than fixed.

use std::collections::BTreeMap;

use crate::error::{ProtocolError, ProtocolResult};
use crate::value::Value;
use crate::xml::{Element, Node, parse_document, serialize_document};

/// Wrapper element marking an ordered sequence.
pub const ARRAY_TAG: &str = "array";

/// Per-entry element inside an [`ARRAY_TAG`] wrapper.
pub const ITEM_TAG: &str = "item";

/// Wire codec configuration.
///
/// Holds the charset name declared on serialized documents,
/// per-instance rather than global so concurrent callers can differ.
#[derive(Debug, Clone)]
pub struct Codec {
    encoding: String,
}

impl Default for Codec {
    fn default() -> Self {
        Self {
            encoding: "UTF-8".to_owned(),
        }
    }
}

impl Codec {
    /// Creates a codec declaring UTF-8.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a codec declaring the given charset.
    pub fn with_encoding(encoding: impl Into<String>) -> Self {
        Self {
            encoding: encoding.into(),
        }
    }

    /// Returns the declared charset name.
    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    /// Parses wire text into an element tree.
    pub fn parse(&self, xml: &str) -> ProtocolResult<Element> {
        parse_document(xml)
    }

    /// Serializes an element tree to wire text.
    pub fn serialize(&self, root: &Element) -> String {
        serialize_document(root, &self.encoding)
    }
}

/// Encodes a value as children of `parent`.
///
/// Null contributes nothing, text becomes a text node (escaped on
/// serialization), sequences become `array`/`item` wrappers, and maps
/// become named children unless the integer-key rule kicks in.
pub fn encode_value(value: &Value, parent: &mut Element) {
    match value {
        Value::Null => {}
        Value::Text(text) => parent.push_text(text.clone()),
        Value::List(items) => parent.push_element(encode_items(items)),
        Value::Map(entries) => {
            let mut indexed: Vec<(usize, &Value)> = entries
                .iter()
                .filter_map(|(key, entry)| key.parse::<usize>().ok().map(|index| (index, entry)))
                .collect();
            if indexed.is_empty() {
                for (key, entry) in entries {
                    let mut child = Element::new(key.clone());
                    encode_value(entry, &mut child);
                    parent.push_element(child);
                }
            } else {
                // Any integer-indexed entry forces the array rendering;
                // named siblings are not emitted.
                indexed.sort_by_key(|(index, _)| *index);
                let mut array = Element::new(ARRAY_TAG);
                for (_, entry) in indexed {
                    let mut item = Element::new(ITEM_TAG);
                    encode_value(entry, &mut item);
                    array.push_element(item);
                }
                parent.push_element(array);
            }
        }
    }
}

fn encode_items(items: &[Value]) -> Element {
    let mut array = Element::new(ARRAY_TAG);
    for entry in items {
        let mut item = Element::new(ITEM_TAG);
        encode_value(entry, &mut item);
        array.push_element(item);
    }
    array
}

/// Decodes an element's children into a value.
///
/// Children are visited in document order: a text child overwrites
/// everything accumulated so far, an `array` child returns immediately
/// (further siblings are ignored), and any other element is decoded
/// recursively under its name, later duplicates overwriting earlier
/// ones. An element with no children decodes to null.
pub fn decode_element(element: &Element) -> ProtocolResult<Value> {
    let mut text: Option<String> = None;
    let mut entries: BTreeMap<String, Value> = BTreeMap::new();

    for child in &element.children {
        match child {
            Node::Text(content) => {
                entries.clear();
                text = Some(content.clone());
            }
            Node::Element(nested) if nested.name == ARRAY_TAG => {
                return decode_array(nested);
            }
            Node::Element(nested) => {
                // An element after a text child restarts the map.
                text = None;
                entries.insert(nested.name.clone(), decode_element(nested)?);
            }
        }
    }

    if let Some(content) = text {
        if content.is_empty() {
            Ok(Value::Null)
        } else {
            Ok(Value::Text(content))
        }
    } else if entries.is_empty() {
        Ok(Value::Null)
    } else {
        Ok(Value::Map(entries))
    }
}

fn decode_array(element: &Element) -> ProtocolResult<Value> {
    let mut items = Vec::new();
    for child in &element.children {
        match child {
            Node::Element(item) if item.name == ITEM_TAG => items.push(decode_element(item)?),
            Node::Element(other) => {
                return Err(ProtocolError::malformed(format!(
                    "array contains <{}>, expected <{}>",
                    other.name, ITEM_TAG
                )));
            }
            Node::Text(_) => {
                return Err(ProtocolError::malformed(format!(
                    "array contains text, expected <{ITEM_TAG}> children"
                )));
            }
        }
    }
    Ok(Value::List(items))
}

/// Parses wire text and decodes its root element in one step.
pub fn decode_document(xml: &str) -> ProtocolResult<Value> {
    decode_element(&parse_document(xml)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_under_root(value: &Value) -> String {
        let mut root = Element::new("data");
        encode_value(value, &mut root);
        serialize_document(&root, "UTF-8")
    }

    fn round_trip(value: &Value) -> Value {
        decode_document(&encode_under_root(value)).unwrap()
    }

    #[test]
    fn round_trip_pure_map() {
        let value = Value::map()
            .with("domain", Value::map().with("name", "example").with("extension", "com"))
            .with("limit", Value::int(100));
        assert_eq!(round_trip(&value), value);
    }

    #[test]
    fn round_trip_pure_sequence() {
        let value = Value::list([
            Value::text("a"),
            Value::map().with("name", "ns1").with("ip", "192.0.2.1"),
            Value::list([Value::text("nested")]),
        ]);
        assert_eq!(round_trip(&value), value);
    }

    #[test]
    fn sequence_wire_shape() {
        let value = Value::list([Value::text("a"), Value::text("b"), Value::text("c")]);
        let xml = encode_under_root(&value);
        assert!(xml.contains("<array><item>a</item><item>b</item><item>c</item></array>"));
        assert_eq!(round_trip(&value), value);
    }

    #[test]
    fn later_duplicate_sibling_wins() {
        let value = decode_document("<r><x>1</x><x>2</x></r>").unwrap();
        assert_eq!(value.get("x").and_then(Value::as_text), Some("2"));
    }

    #[test]
    fn integer_keys_force_array_and_drop_named_entries() {
        let value = Value::map().with("0", "x").with("1", "y").with("foo", "z");
        let xml = encode_under_root(&value);
        assert!(xml.contains("<array><item>x</item><item>y</item></array>"));
        assert!(!xml.contains("foo"));
        assert_eq!(
            decode_document(&xml).unwrap(),
            Value::list([Value::text("x"), Value::text("y")])
        );
    }

    #[test]
    fn integer_keys_emit_in_numeric_order() {
        let value = Value::map().with("10", "last").with("2", "mid").with("0", "first");
        let xml = encode_under_root(&value);
        assert!(xml.contains("<item>first</item><item>mid</item><item>last</item>"));
    }

    #[test]
    fn non_item_array_child_is_malformed() {
        let err = decode_document("<r><array><entry>x</entry></array></r>").unwrap_err();
        assert!(matches!(err, ProtocolError::MalformedWireFormat(_)));
    }

    #[test]
    fn text_inside_array_is_malformed() {
        let err = decode_document("<r><array>stray</array></r>").unwrap_err();
        assert!(matches!(err, ProtocolError::MalformedWireFormat(_)));
    }

    #[test]
    fn array_short_circuits_remaining_siblings() {
        let value =
            decode_document("<r><array><item>x</item></array><extra>ignored</extra></r>").unwrap();
        assert_eq!(value, Value::list([Value::text("x")]));
    }

    #[test]
    fn empty_array_decodes_to_empty_sequence() {
        assert_eq!(decode_document("<r><array/></r>").unwrap(), Value::list([]));
    }

    #[test]
    fn empty_element_decodes_to_null() {
        assert_eq!(decode_document("<r/>").unwrap(), Value::Null);
        assert_eq!(decode_document("<r></r>").unwrap(), Value::Null);
    }

    #[test]
    fn text_child_overwrites_accumulated_map() {
        let value = decode_document("<r><a>1</a>late text</r>").unwrap();
        assert_eq!(value, Value::text("late text"));
    }

    #[test]
    fn element_after_text_restarts_the_map() {
        let value = decode_document("<r>early text<a>1</a></r>").unwrap();
        assert_eq!(value, Value::map().with("a", "1"));
    }

    #[test]
    fn scalar_text_is_escaped_on_encode() {
        let value = Value::map().with("note", "a<b&c");
        let xml = encode_under_root(&value);
        assert!(xml.contains("<note>a&lt;b&amp;c</note>"));
        assert_eq!(round_trip(&value), value);
    }

    #[test]
    fn null_encodes_to_an_empty_element() {
        let value = Value::map().with("empty", Value::Null);
        let xml = encode_under_root(&value);
        assert!(xml.contains("<empty/>"));
    }
}
