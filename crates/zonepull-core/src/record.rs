//! Typed views over decoded reply payloads.
//!
//! The API returns generic value trees; these types pull out the
//! fields the export tooling needs. Numeric fields are coerced
//! leniently: unparseable text reads as the type's zero.

use thiserror::Error;
use zonepull_protocol::Value;

/// Errors raised while building typed views.
#[derive(Debug, Error)]
pub enum RecordError {
    /// A record entry is missing a required text field.
    #[error("record field missing or not text: {0}")]
    MissingField(&'static str),
}

/// One DNS record from a `searchZoneRecordDnsRequest` result entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsRecord {
    /// Fully qualified record name as returned by the API.
    pub name: String,
    /// Record type, e.g. `A`, `MX`, `SOA`.
    pub rtype: String,
    /// Time to live in seconds.
    pub ttl: u32,
    /// Priority, set for MX and SRV records.
    pub prio: Option<u32>,
    /// Record data in the API's textual form.
    pub value: String,
}

impl DnsRecord {
    /// Builds a record from one decoded result entry.
    pub fn from_value(value: &Value) -> Result<Self, RecordError> {
        let text = |field: &'static str| {
            value
                .get(field)
                .and_then(Value::as_text)
                .map(str::to_owned)
                .ok_or(RecordError::MissingField(field))
        };
        Ok(Self {
            name: text("name")?,
            rtype: text("type")?,
            ttl: value.get("ttl").and_then(Value::as_int).unwrap_or(0) as u32,
            prio: value
                .get("prio")
                .and_then(Value::as_int)
                .map(|prio| prio as u32),
            value: text("value")?,
        })
    }
}

/// Domain metadata from a `retrieveDomainRequest` reply.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DomainInfo {
    /// Nameserver group the domain is attached to.
    pub nsgroup_id: Option<i64>,
    /// Raw nameserver entries, kept as returned for the side outputs.
    pub name_servers: Vec<Value>,
    /// Whether DNSSEC is enabled.
    pub dnssec_enabled: bool,
    /// DNSSEC mode, when reported.
    pub dnssec_mode: Option<String>,
    /// Raw DNSSEC key entries.
    pub dnssec_keys: Vec<Value>,
}

impl DomainInfo {
    /// Builds domain metadata from a decoded reply value. Every field
    /// is optional on the wire, so this never fails.
    pub fn from_value(value: &Value) -> Self {
        Self {
            nsgroup_id: value.get("nsgroupId").and_then(Value::as_int),
            name_servers: value
                .get("nameServers")
                .and_then(Value::as_list)
                .map(<[Value]>::to_vec)
                .unwrap_or_default(),
            dnssec_enabled: value
                .get("isDnssecEnabled")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            dnssec_mode: value
                .get("dnssec")
                .and_then(Value::as_text)
                .map(str::to_owned),
            dnssec_keys: value
                .get("dnssecKeys")
                .and_then(Value::as_list)
                .map(<[Value]>::to_vec)
                .unwrap_or_default(),
        }
    }
}
