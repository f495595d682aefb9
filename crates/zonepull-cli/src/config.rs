//! zonepull configuration.
//!
//! All settings live in a single `config.toml`, by default at
//! `~/.config/zonepull/config.toml`:
//!
//! ```toml
//! [api]
//! url = "https://api.example-registrar.net/request"
//! username = "account"
//! password = "secret"
//!
//! [export]
//! output_path = "/var/lib/zonepull"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use zonepull_client::{ApiConfig, PageWindow};
use zonepull_protocol::Credentials;

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The configured API URL is invalid.
    #[error("invalid api url: {0}")]
    Url(#[from] url::ParseError),
}

/// The zonepull configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API endpoint and credentials.
    pub api: ApiSettings,

    /// Export workflow settings.
    pub export: ExportSettings,
}

/// API endpoint and credential settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Endpoint URL the requests are POSTed to.
    pub url: String,

    /// Account name.
    pub username: String,

    /// Account password.
    pub password: String,

    /// Request timeout in milliseconds.
    pub timeout_ms: u64,

    /// Whether to verify TLS certificates.
    pub verify_tls: bool,

    /// Log the raw request and reply wire text.
    pub debug: bool,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            url: String::new(),
            username: String::new(),
            password: String::new(),
            timeout_ms: ApiConfig::DEFAULT_TIMEOUT_MS,
            verify_tls: true,
            debug: false,
        }
    }
}

/// Export workflow settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Directory holding the optional `domainlist.txt` input.
    pub input_path: PathBuf,

    /// Directory receiving `zones/` and the JSON side files.
    pub output_path: PathBuf,

    /// Keep zone files that already exist instead of refetching.
    pub skip_existing: bool,

    /// Nameserver group id marking domains hosted on the registrar's
    /// own nameservers.
    pub internal_nsgroup_id: i64,

    /// First listing offset.
    pub start: u64,

    /// Listing offset bound.
    pub stop: u64,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("input"),
            output_path: PathBuf::from("output"),
            skip_existing: false,
            internal_nsgroup_id: 1,
            start: 0,
            stop: 999_999_999,
        }
    }
}

impl Config {
    /// Loads configuration from `path`, or from the default path when
    /// none is given. A missing default file yields the defaults; an
    /// explicitly named file must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from(path),
            None => {
                let path = Self::default_path();
                if path.exists() {
                    Self::load_from(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("zonepull")
            .join("config.toml")
    }

    /// Builds the transport configuration from the api section.
    pub fn api_config(&self) -> Result<ApiConfig, ConfigError> {
        let mut config = ApiConfig::new(&self.api.url)?.with_timeout_ms(self.api.timeout_ms);
        if !self.api.verify_tls {
            config = config.with_insecure_tls();
        }
        if self.api.debug {
            config = config.with_debug();
        }
        Ok(config)
    }

    /// Builds request credentials from the api section.
    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.api.username, &self.api.password)
    }

    /// Returns the listing window from the export section.
    pub fn page_window(&self) -> PageWindow {
        PageWindow {
            start: self.export.start,
            stop: self.export.stop,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_without_a_file() {
        let config = Config::default();
        assert_eq!(config.api.timeout_ms, 60_000);
        assert!(config.api.verify_tls);
        assert_eq!(config.export.internal_nsgroup_id, 1);
        assert_eq!(config.export.output_path, PathBuf::from("output"));
    }

    #[test]
    fn loads_a_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[api]\nurl = \"https://api.example.net/request\"\nusername = \"acct\"\n\
             password = \"secret\"\ntimeout_ms = 5000\nverify_tls = false\n\n\
             [export]\noutput_path = \"/tmp/zones-out\"\nskip_existing = true\nstop = 500"
        )
        .unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.api.username, "acct");
        assert_eq!(config.api.timeout_ms, 5000);
        assert!(!config.api.verify_tls);
        assert!(config.export.skip_existing);
        assert_eq!(config.export.stop, 500);
        // Unset fields keep their defaults.
        assert_eq!(config.export.internal_nsgroup_id, 1);

        let api = config.api_config().unwrap();
        assert!(!api.verify_tls);
        assert_eq!(config.credentials().username, "acct");
        assert_eq!(config.page_window().stop, 500);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = Config::load(Some(Path::new("/nonexistent/zonepull.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[api\nurl=").unwrap();
        let err = Config::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
