//! Typed operations against the registrar API.
//!
//! These wrap [`ApiClient::call`] with the commands the export tooling
//! issues, including the offset/limit pagination loops over the list
//! endpoints. Page payload extraction lives in standalone helpers over
//! [`Value`] so the shapes stay testable without a server.

use tracing::{debug, info, warn};
use zonepull_core::{DnsRecord, DomainInfo};
use zonepull_protocol::{Credentials, Reply, Request, Value};

use crate::client::ApiClient;
use crate::error::{ClientError, ClientResult};

/// Fault code meaning the domain is not in the account; listed domains
/// that answer with it are skipped rather than failing the run.
pub const FAULT_UNKNOWN_DOMAIN: i64 = 320;

/// Page size cap imposed by the list endpoints.
pub const MAX_PAGE_SIZE: u64 = 100;

/// Offset window for the pagination loops.
#[derive(Debug, Clone, Copy)]
pub struct PageWindow {
    /// First offset requested.
    pub start: u64,
    /// Offset bound; listing stops once reached.
    pub stop: u64,
}

impl Default for PageWindow {
    fn default() -> Self {
        Self {
            start: 0,
            stop: 999_999_999,
        }
    }
}

impl PageWindow {
    fn page_size(&self) -> u64 {
        MAX_PAGE_SIZE.min(self.stop)
    }
}

/// Typed access to the zone-related API commands.
pub struct ZoneApi<'a> {
    client: &'a ApiClient,
    credentials: Credentials,
}

impl<'a> ZoneApi<'a> {
    /// Creates a session over the given client and credentials.
    pub fn new(client: &'a ApiClient, credentials: Credentials) -> Self {
        Self {
            client,
            credentials,
        }
    }

    fn execute(&self, command: &str, args: Value) -> ClientResult<Reply> {
        let mut request = Request::new(command)
            .with_credentials(self.credentials.clone())
            .with_args(args);
        self.client.call(&mut request)
    }

    fn execute_checked(&self, command: &str, args: Value) -> ClientResult<Value> {
        let reply = self.execute(command, args)?;
        if !reply.is_success() {
            return Err(ClientError::Fault {
                code: reply.fault_code(),
                message: reply.fault_string().to_owned(),
            });
        }
        Ok(reply.value().clone())
    }

    /// Lists all domain names in the account, paginating with
    /// `searchDomainRequest`.
    pub fn search_domains(&self, window: PageWindow) -> ClientResult<Vec<String>> {
        let mut domains: Vec<String> = Vec::new();
        let mut total: Option<u64> = None;
        let mut offset = window.start;
        let limit = window.page_size();

        while total.map_or(true, |t| offset < t) && offset < window.stop {
            info!(offset, limit, "requesting domain list page");
            let args = Value::map()
                .with("offset", offset)
                .with("limit", limit)
                .with("orderBy", "domainName");
            let value = self.execute_checked("searchDomainRequest", args)?;
            let (names, page_total) = domain_page(&value)?;
            for name in names {
                if domains.contains(&name) {
                    warn!(domain = %name, "duplicate domain in API listing");
                } else {
                    domains.push(name);
                }
            }
            total = Some(page_total);
            offset += limit;
        }

        info!(
            received = domains.len(),
            total = total.unwrap_or(0),
            "domain listing complete"
        );
        Ok(domains)
    }

    /// Lists active zone names, paginating with `searchZoneDnsRequest`.
    /// With a non-empty `filter`, zones outside it are skipped.
    pub fn search_zones(&self, filter: &[String], window: PageWindow) -> ClientResult<Vec<String>> {
        let mut zones: Vec<String> = Vec::new();
        let mut total: Option<u64> = None;
        let mut offset = window.start;
        let limit = window.page_size();

        while total.map_or(true, |t| offset < t) && offset < window.stop {
            info!(offset, limit, "requesting zone list page");
            let args = Value::map()
                .with("offset", offset)
                .with("limit", limit)
                .with("orderBy", "name");
            let value = self.execute_checked("searchZoneDnsRequest", args)?;
            let (entries, page_total) = zone_page(&value)?;
            for (name, active) in entries {
                if !active {
                    info!(zone = %name, "skipping inactive zone");
                    continue;
                }
                if !filter.is_empty() && !filter.contains(&name) {
                    info!(zone = %name, "skipping filtered-out zone");
                    continue;
                }
                if zones.contains(&name) {
                    warn!(zone = %name, "duplicate zone in API listing");
                } else {
                    zones.push(name);
                }
            }
            total = Some(page_total);
            offset += limit;
        }

        info!(
            received = zones.len(),
            total = total.unwrap_or(0),
            "zone listing complete"
        );
        Ok(zones)
    }

    /// Fetches the DNS records of one zone.
    pub fn zone_records(&self, zone: &str) -> ClientResult<Vec<DnsRecord>> {
        debug!(zone, "requesting DNS records");
        let args = Value::map().with("name", zone).with("orderBy", "name");
        let value = self.execute_checked("searchZoneRecordDnsRequest", args)?;
        let results = value
            .get("results")
            .and_then(Value::as_list)
            .ok_or_else(|| ClientError::UnexpectedReply("missing results".to_owned()))?;
        results
            .iter()
            .map(|entry| DnsRecord::from_value(entry).map_err(ClientError::from))
            .collect()
    }

    /// Fetches metadata for one domain. Returns `None` when the API
    /// answers with [`FAULT_UNKNOWN_DOMAIN`].
    pub fn domain_info(&self, domain: &str) -> ClientResult<Option<DomainInfo>> {
        debug!(domain, "requesting domain info");
        let (name, extension) = split_domain(domain)?;
        let args = Value::map().with(
            "domain",
            Value::map().with("name", name).with("extension", extension),
        );
        let reply = self.execute("retrieveDomainRequest", args)?;

        if reply.fault_code() == FAULT_UNKNOWN_DOMAIN {
            warn!(domain, fault = %reply.fault_string(), "skipping unknown domain");
            return Ok(None);
        }
        if !reply.is_success() {
            return Err(ClientError::Fault {
                code: reply.fault_code(),
                message: reply.fault_string().to_owned(),
            });
        }
        Ok(Some(DomainInfo::from_value(reply.value())))
    }
}

/// Splits `example.co.uk` into `("example", "co.uk")`.
fn split_domain(domain: &str) -> ClientResult<(&str, &str)> {
    domain
        .split_once('.')
        .filter(|(name, extension)| !name.is_empty() && !extension.is_empty())
        .ok_or_else(|| ClientError::InvalidDomain(domain.to_owned()))
}

/// Extracts `name.extension` strings and the listing total from a
/// `searchDomainRequest` page.
fn domain_page(value: &Value) -> ClientResult<(Vec<String>, u64)> {
    let (results, total) = results_and_total(value)?;
    let mut names = Vec::new();
    for result in results {
        let domain = result
            .get("domain")
            .ok_or_else(|| ClientError::UnexpectedReply("result entry without domain".to_owned()))?;
        let name = domain
            .get("name")
            .and_then(Value::as_text)
            .ok_or_else(|| ClientError::UnexpectedReply("domain without name".to_owned()))?;
        let extension = domain
            .get("extension")
            .and_then(Value::as_text)
            .ok_or_else(|| ClientError::UnexpectedReply("domain without extension".to_owned()))?;
        names.push(format!("{name}.{extension}"));
    }
    Ok((names, total))
}

/// Extracts `(name, active)` pairs and the listing total from a
/// `searchZoneDnsRequest` page.
fn zone_page(value: &Value) -> ClientResult<(Vec<(String, bool)>, u64)> {
    let (results, total) = results_and_total(value)?;
    let mut entries = Vec::new();
    for result in results {
        let name = result
            .get("name")
            .and_then(Value::as_text)
            .ok_or_else(|| ClientError::UnexpectedReply("zone entry without name".to_owned()))?;
        let active = result
            .get("active")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        entries.push((name.to_owned(), active));
    }
    Ok((entries, total))
}

fn results_and_total(value: &Value) -> ClientResult<(&[Value], u64)> {
    let results = value
        .get("results")
        .and_then(Value::as_list)
        .ok_or_else(|| ClientError::UnexpectedReply("missing results".to_owned()))?;
    let total = value
        .get("total")
        .and_then(Value::as_int)
        .ok_or_else(|| ClientError::UnexpectedReply("missing total".to_owned()))? as u64;
    Ok((results, total))
}
