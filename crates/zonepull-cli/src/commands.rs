//! Subcommand implementations.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::{info, warn};
use zonepull_client::{ApiClient, ZoneApi};
use zonepull_core::{DomainInfo, records_to_zone, value_to_json};

use crate::config::Config;
use crate::error::CliResult;

/// Exports every zone in the account.
///
/// Merges the optional `domainlist.txt` input with the API domain
/// listing, then per domain: unknown domains are skipped, DNSSEC data
/// is collected, internally hosted domains get a zone file written
/// under `zones/`, externally hosted ones land in
/// `custom_nameservers.json`.
pub fn export(config: &Config, skip_existing: bool) -> CliResult<()> {
    let client = ApiClient::new(config.api_config()?)?;
    let api = ZoneApi::new(&client, config.credentials());

    let mut domains = read_domain_list(&config.export.input_path.join("domainlist.txt"))?;
    domains.extend(api.search_domains(config.page_window())?);
    domains.sort();
    domains.dedup();

    let output = &config.export.output_path;
    let zones_dir = output.join("zones");
    fs::create_dir_all(&zones_dir)?;

    let mut custom_nameservers: BTreeMap<String, serde_json::Value> = BTreeMap::new();
    let mut dnssec: BTreeMap<String, serde_json::Value> = BTreeMap::new();
    let mut written = 0usize;

    for domain in &domains {
        let target = zones_dir.join(format!("{domain}."));
        if skip_existing && target.exists() {
            continue;
        }

        let Some(info) = api.domain_info(domain)? else {
            continue;
        };

        if info.dnssec_enabled {
            dnssec.insert(format!("{domain}."), dnssec_entry(&info));
        }

        if info.nsgroup_id == Some(config.export.internal_nsgroup_id) {
            let records = api.zone_records(domain)?;
            if records.is_empty() {
                warn!(domain, "received no records from the API");
                continue;
            }
            fs::write(&target, records_to_zone(domain, &records)?)?;
            written += 1;
        } else {
            if info.name_servers.is_empty() {
                warn!(domain, "received no nameservers from the API");
            }
            custom_nameservers.insert(
                domain.clone(),
                serde_json::Value::Array(info.name_servers.iter().map(value_to_json).collect()),
            );
        }
    }
    info!(processed = domains.len(), written, "zone export complete");

    let custom_file = output.join("custom_nameservers.json");
    fs::write(&custom_file, serde_json::to_string_pretty(&custom_nameservers)?)?;
    info!(
        count = custom_nameservers.len(),
        path = %custom_file.display(),
        "written custom nameservers"
    );

    let dnssec_file = output.join("dnssec.json");
    fs::write(&dnssec_file, serde_json::to_string_pretty(&dnssec)?)?;
    info!(count = dnssec.len(), path = %dnssec_file.display(), "written DNSSEC data");

    Ok(())
}

/// Prints the account's domain names.
pub fn domains(config: &Config) -> CliResult<()> {
    let client = ApiClient::new(config.api_config()?)?;
    let api = ZoneApi::new(&client, config.credentials());
    for domain in api.search_domains(config.page_window())? {
        println!("{domain}");
    }
    Ok(())
}

/// Prints the account's active zone names.
pub fn zones(config: &Config) -> CliResult<()> {
    let client = ApiClient::new(config.api_config()?)?;
    let api = ZoneApi::new(&client, config.credentials());
    for zone in api.search_zones(&[], config.page_window())? {
        println!("{zone}");
    }
    Ok(())
}

/// Prints one zone's records as zone-file text.
pub fn records(config: &Config, zone: &str) -> CliResult<()> {
    let client = ApiClient::new(config.api_config()?)?;
    let api = ZoneApi::new(&client, config.credentials());
    let records = api.zone_records(zone)?;
    print!("{}", records_to_zone(zone, &records)?);
    Ok(())
}

fn dnssec_entry(info: &DomainInfo) -> serde_json::Value {
    let mut entry = serde_json::Map::new();
    if let Some(mode) = &info.dnssec_mode {
        entry.insert("mode".to_owned(), serde_json::Value::String(mode.clone()));
    }
    if !info.dnssec_keys.is_empty() {
        entry.insert(
            "keys".to_owned(),
            serde_json::Value::Array(info.dnssec_keys.iter().map(value_to_json).collect()),
        );
    }
    serde_json::Value::Object(entry)
}

/// Reads the optional domain list file, one domain per line; a missing
/// file is an empty list.
fn read_domain_list(path: &Path) -> CliResult<Vec<String>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(path)?;
    let list: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect();
    info!(count = list.len(), path = %path.display(), "read domain list file");
    Ok(list)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zonepull_protocol::Value;

    #[test]
    fn missing_domain_list_is_empty() {
        assert!(read_domain_list(Path::new("/nonexistent/domainlist.txt"))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn domain_list_skips_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("domainlist.txt");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "example.com\n\n  example.net  \n").unwrap();

        let list = read_domain_list(&path).unwrap();
        assert_eq!(list, vec!["example.com", "example.net"]);
    }

    #[test]
    fn dnssec_entry_shape() {
        let info = DomainInfo {
            dnssec_enabled: true,
            dnssec_mode: Some("signed".to_owned()),
            dnssec_keys: vec![Value::map().with("alg", "13")],
            ..DomainInfo::default()
        };
        let entry = dnssec_entry(&info);
        assert_eq!(entry["mode"], "signed");
        assert_eq!(entry["keys"][0]["alg"], "13");
    }

    #[test]
    fn dnssec_entry_without_keys_has_no_keys_field() {
        let info = DomainInfo {
            dnssec_enabled: true,
            dnssec_mode: Some("unsigned".to_owned()),
            ..DomainInfo::default()
        };
        let entry = dnssec_entry(&info);
        assert!(entry.get("keys").is_none());
    }
}
