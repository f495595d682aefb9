//! The reply envelope: fault code, description, result value and
//! warnings.

use tracing::warn;

use crate::codec::{Codec, decode_element, encode_value};
use crate::error::{ProtocolError, ProtocolResult};
use crate::filter::TreeFilter;
use crate::value::Value;
use crate::xml::Element;
use crate::{ENVELOPE_TAG, MAINTENANCE_FAULT_CODE};

const REPLY_TAG: &str = "reply";

/// A reply envelope.
///
/// Usually built by parsing wire text received from the transport; the
/// field setters cover the reverse (server) direction. A non-zero
/// fault code is a normal business result, not an error; callers
/// branch on [`Reply::fault_code`] themselves.
pub struct Reply {
    fault_code: i64,
    fault_string: String,
    value: Value,
    warnings: Vec<Value>,
    maintenance: Option<bool>,
    raw: Option<String>,
    filters: Vec<Box<dyn TreeFilter>>,
}

impl std::fmt::Debug for Reply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reply")
            .field("fault_code", &self.fault_code)
            .field("fault_string", &self.fault_string)
            .field("value", &self.value)
            .field("warnings", &self.warnings)
            .field("maintenance", &self.maintenance)
            .field("raw", &self.raw)
            .field("filters", &self.filters.len())
            .finish()
    }
}

impl Default for Reply {
    fn default() -> Self {
        Self {
            fault_code: 0,
            fault_string: String::new(),
            // The result value is a map even before any data is set.
            value: Value::map(),
            warnings: Vec::new(),
            maintenance: None,
            raw: None,
            filters: Vec::new(),
        }
    }
}

impl Reply {
    /// Creates an empty success reply.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses reply wire text.
    ///
    /// A blank decoded body, or a fault code equal to
    /// [`MAINTENANCE_FAULT_CODE`], yields
    /// [`ProtocolError::ServiceUnavailable`] instead of a reply.
    pub fn parse(xml: &str) -> ProtocolResult<Self> {
        let root = crate::xml::parse_document(xml.trim())?;
        let decoded = decode_element(&root)?;

        let blank = match &decoded {
            Value::Null => true,
            Value::Text(text) => text.trim().is_empty(),
            _ => false,
        };
        let code = decoded
            .get(REPLY_TAG)
            .and_then(|reply| reply.get("code"))
            .and_then(Value::as_int);
        if blank || code == Some(MAINTENANCE_FAULT_CODE) {
            warn!("service unavailable: blank reply or maintenance fault code");
            return Err(ProtocolError::ServiceUnavailable);
        }

        let reply = decoded
            .get(REPLY_TAG)
            .ok_or_else(|| ProtocolError::envelope("missing <reply> entry"))?;

        let value = match reply.get("data") {
            None | Some(Value::Null) => Value::map(),
            Some(data) => data.clone(),
        };
        let warnings = match reply.get("warnings") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::List(items)) => items.clone(),
            Some(other) => vec![other.clone()],
        };
        let maintenance = reply
            .get("maintenance")
            .map(|flag| flag.as_bool().unwrap_or(false));

        Ok(Self {
            fault_code: code.unwrap_or(0),
            fault_string: reply
                .get("desc")
                .and_then(Value::as_text)
                .unwrap_or_default()
                .to_owned(),
            value,
            warnings,
            maintenance,
            raw: Some(xml.to_owned()),
            filters: Vec::new(),
        })
    }

    /// Returns the fault code; 0 means success.
    pub fn fault_code(&self) -> i64 {
        self.fault_code
    }

    /// Returns true when the fault code is 0.
    pub fn is_success(&self) -> bool {
        self.fault_code == 0
    }

    /// Returns the fault description.
    pub fn fault_string(&self) -> &str {
        &self.fault_string
    }

    /// Returns the result value. Absent data reads as an empty map,
    /// never null.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Returns the warnings.
    pub fn warnings(&self) -> &[Value] {
        &self.warnings
    }

    /// Returns the maintenance flag, when the reply carried one.
    pub fn maintenance(&self) -> Option<bool> {
        self.maintenance
    }

    /// Returns the wire text, if parsed from or already rendered.
    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    /// Sets the fault code.
    pub fn set_fault_code(&mut self, code: i64) {
        self.fault_code = code;
    }

    /// Sets the fault description.
    pub fn set_fault_string(&mut self, description: impl Into<String>) {
        self.fault_string = description.into();
    }

    /// Sets the result value; null is normalized to an empty map.
    pub fn set_value(&mut self, value: impl Into<Value>) {
        let value = value.into();
        self.value = if value.is_null() { Value::map() } else { value };
    }

    /// Sets the warnings.
    pub fn set_warnings(&mut self, warnings: Vec<Value>) {
        self.warnings = warnings;
    }

    /// Registers a post-build filter hook; hooks run in registration
    /// order against the built tree before serialization.
    pub fn add_filter(&mut self, filter: Box<dyn TreeFilter>) {
        self.filters.push(filter);
    }

    /// Renders the reply to wire text, caching the result like
    /// [`Request::render`](crate::Request::render).
    pub fn render(&mut self, codec: &Codec) -> ProtocolResult<&str> {
        if self.raw.is_none() {
            let mut reply = Element::new(REPLY_TAG);
            reply.push_element(Element::with_text("code", self.fault_code.to_string()));
            reply.push_element(Element::with_text("desc", &self.fault_string));
            let mut data = Element::new("data");
            encode_value(&self.value, &mut data);
            reply.push_element(data);
            if !self.warnings.is_empty() {
                let mut warnings = Element::new("warnings");
                encode_value(&Value::List(self.warnings.clone()), &mut warnings);
                reply.push_element(warnings);
            }

            let mut root = Element::new(ENVELOPE_TAG);
            root.push_element(reply);
            for filter in &self.filters {
                filter.apply(&mut root)?;
            }
            self.raw = Some(codec.serialize(&root));
        }
        Ok(self.raw.as_deref().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply_xml(body: &str) -> String {
        format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?><openXML><reply>{body}</reply></openXML>")
    }

    #[test]
    fn parses_a_success_reply() {
        let xml = reply_xml(
            "<code>0</code><desc>ok</desc><data><total>2</total>\
             <results><array><item>a</item><item>b</item></array></results></data>",
        );
        let reply = Reply::parse(&xml).unwrap();
        assert!(reply.is_success());
        assert_eq!(reply.fault_string(), "ok");
        assert_eq!(reply.value().get("total").and_then(Value::as_int), Some(2));
        assert_eq!(
            reply.value().get("results").and_then(Value::as_list).map(<[Value]>::len),
            Some(2)
        );
        assert!(reply.warnings().is_empty());
        assert_eq!(reply.maintenance(), None);
    }

    #[test]
    fn business_fault_is_a_normal_reply() {
        let xml = reply_xml("<code>320</code><desc>domain not found</desc><data/>");
        let reply = Reply::parse(&xml).unwrap();
        assert!(!reply.is_success());
        assert_eq!(reply.fault_code(), 320);
        assert_eq!(reply.fault_string(), "domain not found");
    }

    #[test]
    fn maintenance_fault_code_is_service_unavailable() {
        let xml = reply_xml("<code>4005</code><desc>maintenance</desc><data/>");
        let err = Reply::parse(&xml).unwrap_err();
        assert!(matches!(err, ProtocolError::ServiceUnavailable));
    }

    #[test]
    fn blank_reply_body_is_service_unavailable() {
        let err = Reply::parse("<openXML></openXML>").unwrap_err();
        assert!(matches!(err, ProtocolError::ServiceUnavailable));

        let err = Reply::parse("  <openXML> </openXML>  ").unwrap_err();
        assert!(matches!(err, ProtocolError::ServiceUnavailable));
    }

    #[test]
    fn absent_data_reads_as_empty_map() {
        let xml = reply_xml("<code>0</code><desc>ok</desc>");
        let reply = Reply::parse(&xml).unwrap();
        assert_eq!(reply.value(), &Value::map());
    }

    #[test]
    fn unparseable_code_coerces_to_zero() {
        let xml = reply_xml("<code>n/a</code><desc>odd</desc><data/>");
        let reply = Reply::parse(&xml).unwrap();
        assert_eq!(reply.fault_code(), 0);
    }

    #[test]
    fn warnings_decode_as_a_sequence() {
        let xml = reply_xml(
            "<code>0</code><desc>ok</desc><data/>\
             <warnings><array><item>slow</item><item>deprecated</item></array></warnings>",
        );
        let reply = Reply::parse(&xml).unwrap();
        assert_eq!(reply.warnings().len(), 2);
        assert_eq!(reply.warnings()[0].as_text(), Some("slow"));
    }

    #[test]
    fn maintenance_flag_is_surfaced() {
        let xml = reply_xml("<code>0</code><desc>ok</desc><data/><maintenance>1</maintenance>");
        assert_eq!(Reply::parse(&xml).unwrap().maintenance(), Some(true));

        let xml = reply_xml("<code>0</code><desc>ok</desc><data/><maintenance>0</maintenance>");
        assert_eq!(Reply::parse(&xml).unwrap().maintenance(), Some(false));
    }

    #[test]
    fn render_emits_the_reply_envelope() {
        let codec = Codec::new();
        let mut reply = Reply::new();
        reply.set_fault_code(0);
        reply.set_fault_string("ok");
        reply.set_value(Value::map().with("total", Value::int(1)));
        reply.set_warnings(vec![Value::text("slow")]);
        let xml = reply.render(&codec).unwrap();

        assert!(xml.contains("<openXML><reply>"));
        assert!(xml.contains("<code>0</code><desc>ok</desc>"));
        assert!(xml.contains("<data><total>1</total></data>"));
        assert!(xml.contains("<warnings><array><item>slow</item></array></warnings>"));
    }

    #[test]
    fn render_parse_round_trip() {
        let codec = Codec::new();
        let mut reply = Reply::new();
        reply.set_fault_code(7);
        reply.set_fault_string("partial");
        reply.set_value(Value::map().with("left", Value::int(3)));
        let xml = reply.render(&codec).unwrap().to_owned();

        let parsed = Reply::parse(&xml).unwrap();
        assert_eq!(parsed.fault_code(), 7);
        assert_eq!(parsed.fault_string(), "partial");
        assert_eq!(parsed.value().get("left").and_then(Value::as_int), Some(3));
    }

    #[test]
    fn post_build_filters_run_before_serialization() {
        let codec = Codec::new();
        let mut reply = Reply::new();
        reply.set_fault_string("ok");
        reply.add_filter(Box::new(|tree: &mut Element| -> ProtocolResult<()> {
            if let Some(reply) = tree.child_mut("reply") {
                reply.push_element(Element::with_text("audited", "yes"));
            }
            Ok(())
        }));
        let xml = reply.render(&codec).unwrap();
        assert!(xml.contains("<audited>yes</audited>"));
    }

    #[test]
    fn render_cache_is_idempotent() {
        let codec = Codec::new();
        let mut reply = Reply::new();
        reply.set_fault_string("ok");
        let first = reply.render(&codec).unwrap().to_owned();
        reply.set_fault_code(99);
        assert_eq!(reply.render(&codec).unwrap(), first);
    }
}
