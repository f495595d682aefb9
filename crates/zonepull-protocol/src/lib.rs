//! Wire protocol for the OpenXML registrar API.
//!
//! This crate implements the client-side protocol layer: a generic
//! [`Value`] model (scalars, ordered sequences, key-ordered maps), a
//! bidirectional codec between that model and the XML wire encoding,
//! and the [`Request`]/[`Reply`] envelopes built on top of it.
//!
//! # Wire format
//!
//! Requests carry a `credentials` element followed by an element named
//! after the command:
//!
//! ```text
//! <openXML>
//!   <credentials>
//!     <username>..</username><password>..</password><hash>..</hash>
//!   </credentials>
//!   <searchDomainRequest>
//!     <offset>0</offset><limit>100</limit>
//!   </searchDomainRequest>
//! </openXML>
//! ```
//!
//! Replies wrap a fault code, a description and the result data:
//!
//! ```text
//! <openXML>
//!   <reply>
//!     <code>0</code><desc>ok</desc>
//!     <data>..</data>
//!   </reply>
//! </openXML>
//! ```
//!
//! Ordered sequences are encoded as `<array><item>..</item></array>`.
//!
//! # Example
//!
//! ```rust
//! use zonepull_protocol::{Codec, Credentials, Request, Value};
//!
//! let codec = Codec::new();
//! let mut request = Request::new("checkDomainRequest")
//!     .with_credentials(Credentials::new("user", "secret"))
//!     .with_args(Value::map().with("domain", "example.com"));
//! let xml = request.render(&codec).unwrap();
//! assert!(xml.contains("<checkDomainRequest>"));
//! ```

mod codec;
mod error;
mod filter;
mod reply;
mod request;
mod value;
mod xml;

pub use codec::{ARRAY_TAG, Codec, ITEM_TAG, decode_document, decode_element, encode_value};
pub use error::{ProtocolError, ProtocolResult};
pub use filter::TreeFilter;
pub use reply::Reply;
pub use request::{Credentials, Request};
pub use value::Value;
pub use xml::{Element, Node, parse_document, serialize_document};

/// Root element name of both request and reply documents.
pub const ENVELOPE_TAG: &str = "openXML";

/// Fault code meaning the API is down for maintenance; surfaced as
/// [`ProtocolError::ServiceUnavailable`] rather than a normal reply.
pub const MAINTENANCE_FAULT_CODE: i64 = 4005;
