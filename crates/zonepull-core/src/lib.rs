//! Domain types shared by the zonepull tools: typed views over decoded
//! reply payloads, DNS zone-file rendering and tracing setup.

pub mod json;
pub mod record;
pub mod tracing;
pub mod zone;

pub use json::value_to_json;
pub use record::{DnsRecord, DomainInfo, RecordError};
pub use zone::{ZoneError, email_to_rname, records_to_zone, zone_value};
