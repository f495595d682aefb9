//! DNS zone-file rendering from API record sets.
//!
//! Produces BIND-style zone text: an `$ORIGIN`/`$TTL` header followed
//! by column-aligned record lines. Names inside the zone are written
//! relative to the origin, external names absolute with a trailing
//! dot.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use tracing::debug;

use crate::record::DnsRecord;

/// Floor for the default TTL when the record set carries lower values.
pub const MIN_DEFAULT_TTL: u32 = 60;

/// Names that qualify as external domains (at least two labels).
static EXTERNAL_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.\-]+\.\w+$").expect("invalid external name regex"));

/// Characters not allowed in an SOA RNAME.
static RNAME_STRANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9\-.]+").expect("invalid rname regex"));

/// Runs of dots, collapsed after the character replacement.
static RNAME_DOTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.+").expect("invalid dot-run regex"));

/// Errors raised while rendering zone text.
#[derive(Debug, Error)]
pub enum ZoneError {
    /// A record name or target fits neither the zone nor an external
    /// domain shape.
    #[error("invalid record value for zone '{zone}': '{value}'")]
    InvalidValue { zone: String, value: String },

    /// An SOA record value with fewer than the mname/rname fields.
    #[error("SOA record value is malformed: '{0}'")]
    MalformedSoa(String),

    /// An SRV record value without weight, port and target fields.
    #[error("SRV record value is malformed: '{0}'")]
    MalformedSrv(String),
}

/// Renders a record set as zone-file text.
///
/// The default TTL is the largest TTL in the set (at least
/// [`MIN_DEFAULT_TTL`]); record lines carry an explicit TTL only when
/// they deviate from it.
pub fn records_to_zone(zone: &str, records: &[DnsRecord]) -> Result<String, ZoneError> {
    let default_ttl = records
        .iter()
        .map(|record| record.ttl)
        .fold(MIN_DEFAULT_TTL, u32::max);

    let mut lines: Vec<(String, Option<u32>, &str, String)> = Vec::new();
    for record in records {
        let name = zone_value(zone, &record.name)?;
        let ttl = (record.ttl != default_ttl).then_some(record.ttl);
        let rdata = render_rdata(zone, record)?;
        lines.push((name, ttl, record.rtype.as_str(), rdata));
    }

    let name_width = lines.iter().map(|(name, ..)| name.len()).max().unwrap_or(0);
    let ttl_width = lines
        .iter()
        .filter_map(|(_, ttl, ..)| ttl.map(|t| t.to_string().len()))
        .max()
        .unwrap_or(0);
    let type_width = lines
        .iter()
        .map(|(_, _, rtype, _)| rtype.len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    out.push_str(&format!("$ORIGIN {zone}.\n"));
    out.push_str(&format!("$TTL {default_ttl}\n"));
    for (name, ttl, rtype, rdata) in &lines {
        let line = if ttl_width > 0 {
            let ttl = ttl.map(|t| t.to_string()).unwrap_or_default();
            format!("{name:<name_width$} {ttl:>ttl_width$} IN {rtype:<type_width$} {rdata}")
        } else {
            format!("{name:<name_width$} IN {rtype:<type_width$} {rdata}")
        };
        out.push_str(line.trim_end());
        out.push('\n');
    }

    debug!(zone, records = records.len(), "rendered zone file");
    Ok(out)
}

fn render_rdata(zone: &str, record: &DnsRecord) -> Result<String, ZoneError> {
    match record.rtype.as_str() {
        "MX" => Ok(format!(
            "{} {}",
            record.prio.unwrap_or(0),
            zone_value(zone, &record.value)?
        )),
        "CNAME" | "NS" | "PTR" | "DNAME" => zone_value(zone, &record.value),
        "SRV" => {
            // The API keeps the priority in `prio` and packs
            // "weight port target" into the value.
            let parts: Vec<&str> = record.value.split_whitespace().collect();
            let [weight, port, target] = parts.as_slice() else {
                return Err(ZoneError::MalformedSrv(record.value.clone()));
            };
            Ok(format!(
                "{} {weight} {port} {}",
                record.prio.unwrap_or(0),
                zone_value(zone, target)?
            ))
        }
        "SOA" => {
            let mut parts = record.value.split_whitespace();
            let (Some(mname), Some(rname)) = (parts.next(), parts.next()) else {
                return Err(ZoneError::MalformedSoa(record.value.clone()));
            };
            let mut rdata = format!("{} {}", zone_value(zone, mname)?, email_to_rname(rname));
            for field in parts {
                rdata.push(' ');
                rdata.push_str(field);
            }
            Ok(rdata)
        }
        _ => Ok(record.value.clone()),
    }
}

/// Converts a fully qualified API name into its zone-file spelling.
///
/// The apex is spelled out absolute rather than `@` (some consumers
/// reject `@` as a CNAME target), in-zone names become relative
/// labels, and external domains stay absolute with a trailing dot.
pub fn zone_value(zone: &str, value: &str) -> Result<String, ZoneError> {
    if value == zone {
        return Ok(format!("{zone}."));
    }
    if let Some(prefix) = subdomain_prefix(zone, value) {
        return Ok(prefix.to_owned());
    }
    if EXTERNAL_NAME.is_match(value) {
        return Ok(format!("{value}."));
    }
    Err(ZoneError::InvalidValue {
        zone: zone.to_owned(),
        value: value.to_owned(),
    })
}

fn subdomain_prefix<'a>(zone: &str, value: &'a str) -> Option<&'a str> {
    let prefix = value.strip_suffix(zone)?.strip_suffix('.')?;
    let valid = !prefix.is_empty()
        && prefix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '*'));
    valid.then_some(prefix)
}

/// Normalizes an email address into an SOA RNAME: characters outside
/// `[a-z0-9-.]` become dots, dot runs collapse, and the result gets a
/// trailing dot.
pub fn email_to_rname(email: &str) -> String {
    let rname = RNAME_STRANGE.replace_all(email, ".");
    let rname = RNAME_DOTS.replace_all(&rname, ".");
    format!("{}.", rname.trim_matches('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, rtype: &str, ttl: u32, prio: Option<u32>, value: &str) -> DnsRecord {
        DnsRecord {
            name: name.to_owned(),
            rtype: rtype.to_owned(),
            ttl,
            prio,
            value: value.to_owned(),
        }
    }

    fn line_with<'a>(zone_text: &'a str, needle: &str) -> Vec<&'a str> {
        zone_text
            .lines()
            .find(|line| line.contains(needle))
            .unwrap_or_else(|| panic!("no line containing {needle:?}"))
            .split_whitespace()
            .collect()
    }

    #[test]
    fn apex_is_spelled_absolute() {
        assert_eq!(zone_value("example.com", "example.com").unwrap(), "example.com.");
    }

    #[test]
    fn in_zone_names_become_relative() {
        assert_eq!(zone_value("example.com", "www.example.com").unwrap(), "www");
        assert_eq!(zone_value("example.com", "a.b.example.com").unwrap(), "a.b");
        assert_eq!(zone_value("example.com", "*.example.com").unwrap(), "*");
    }

    #[test]
    fn external_names_stay_absolute() {
        assert_eq!(
            zone_value("example.com", "ns1.example.net").unwrap(),
            "ns1.example.net."
        );
        // A name merely ending in the zone text is not a subdomain.
        assert_eq!(
            zone_value("example.com", "notexample.com").unwrap(),
            "notexample.com."
        );
    }

    #[test]
    fn garbage_value_is_an_error() {
        assert!(matches!(
            zone_value("example.com", "not a name"),
            Err(ZoneError::InvalidValue { .. })
        ));
    }

    #[test]
    fn rname_from_email() {
        assert_eq!(email_to_rname("hostmaster@example.com"), "hostmaster.example.com.");
        assert_eq!(email_to_rname("john.doe@example.com"), "john.doe.example.com.");
        assert_eq!(email_to_rname("a+b@ex.org"), "a.b.ex.org.");
        assert_eq!(email_to_rname(".weird@@ex.org."), "weird.ex.org.");
    }

    #[test]
    fn default_ttl_is_the_maximum() {
        let records = [
            record("example.com", "A", 3600, None, "192.0.2.10"),
            record("www.example.com", "A", 600, None, "192.0.2.20"),
        ];
        let text = records_to_zone("example.com", &records).unwrap();

        assert!(text.starts_with("$ORIGIN example.com.\n$TTL 3600\n"));
        // The record matching the default carries no TTL column value.
        assert_eq!(
            line_with(&text, "192.0.2.10"),
            vec!["example.com.", "IN", "A", "192.0.2.10"]
        );
        assert_eq!(
            line_with(&text, "192.0.2.20"),
            vec!["www", "600", "IN", "A", "192.0.2.20"]
        );
    }

    #[test]
    fn default_ttl_has_a_floor() {
        let records = [record("example.com", "A", 30, None, "192.0.2.10")];
        let text = records_to_zone("example.com", &records).unwrap();
        assert!(text.contains("$TTL 60\n"));
    }

    #[test]
    fn mx_line_carries_preference_and_relative_target() {
        let records = [record(
            "example.com",
            "MX",
            3600,
            Some(10),
            "mail.example.com",
        )];
        let text = records_to_zone("example.com", &records).unwrap();
        assert_eq!(
            line_with(&text, "MX"),
            vec!["example.com.", "IN", "MX", "10", "mail"]
        );
    }

    #[test]
    fn srv_line_splits_the_packed_value() {
        let records = [record(
            "_sip._tcp.example.com",
            "SRV",
            3600,
            Some(10),
            "20 5060 sip.example.com",
        )];
        let text = records_to_zone("example.com", &records).unwrap();
        assert_eq!(
            line_with(&text, "SRV"),
            vec!["_sip._tcp", "IN", "SRV", "10", "20", "5060", "sip"]
        );
    }

    #[test]
    fn malformed_srv_value_is_an_error() {
        let records = [record("example.com", "SRV", 3600, Some(10), "20 5060")];
        assert!(matches!(
            records_to_zone("example.com", &records),
            Err(ZoneError::MalformedSrv(_))
        ));
    }

    #[test]
    fn soa_rewrites_mname_and_rname() {
        let records = [record(
            "example.com",
            "SOA",
            3600,
            None,
            "ns1.example.com hostmaster@example.com 2024010101 3600 600 86400 60",
        )];
        let text = records_to_zone("example.com", &records).unwrap();
        assert_eq!(
            line_with(&text, "SOA"),
            vec![
                "example.com.",
                "IN",
                "SOA",
                "ns1",
                "hostmaster.example.com.",
                "2024010101",
                "3600",
                "600",
                "86400",
                "60"
            ]
        );
    }

    #[test]
    fn cname_target_is_qualified() {
        let records = [
            record("alias.example.com", "CNAME", 3600, None, "cdn.provider.net"),
            record("self.example.com", "CNAME", 3600, None, "example.com"),
        ];
        let text = records_to_zone("example.com", &records).unwrap();
        assert_eq!(
            line_with(&text, "cdn"),
            vec!["alias", "IN", "CNAME", "cdn.provider.net."]
        );
        assert_eq!(
            line_with(&text, "self"),
            vec!["self", "IN", "CNAME", "example.com."]
        );
    }

    #[test]
    fn unknown_types_pass_the_value_through() {
        let records = [record(
            "example.com",
            "TXT",
            3600,
            None,
            "\"v=spf1 -all\"",
        )];
        let text = records_to_zone("example.com", &records).unwrap();
        assert!(text.contains("\"v=spf1 -all\""));
    }

    #[test]
    fn empty_record_set_renders_only_the_header() {
        let text = records_to_zone("example.com", &[]).unwrap();
        assert_eq!(text, "$ORIGIN example.com.\n$TTL 60\n");
    }
}
