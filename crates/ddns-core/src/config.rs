//! Run configuration for the DDNS updater
//!
//! The configuration is a small JSON document:
//!
//! ```json
//! {
//!   "FQDN": ["home.example.com", "vpn.example.co.uk"],
//!   "APIToken": "<cloudflare api token>"
//! }
//! ```
//!
//! snake_case keys (`fqdns`, `api_token`) and lowercase keys (`fqdn`,
//! `apitoken`) are accepted as well.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Directory name under the user's config home
pub const APP_NAME: &str = "ddns-update";

/// Config file name inside [`APP_NAME`]
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Configuration for a single run
///
/// Loaded once before reconciliation and never mutated afterwards.
/// Order of `fqdns` is the processing order; duplicates are kept.
#[derive(Clone, Deserialize)]
pub struct RunConfig {
    /// Fully-qualified domain names whose A records are managed
    #[serde(rename = "FQDN", alias = "fqdns", alias = "fqdn")]
    pub fqdns: Vec<String>,

    /// DNS provider API token
    /// ⚠️ NEVER log this value
    #[serde(rename = "APIToken", alias = "api_token", alias = "apitoken")]
    pub api_token: String,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunConfig")
            .field("fqdns", &self.fqdns)
            .field("api_token", &"<REDACTED>")
            .finish()
    }
}

impl RunConfig {
    /// Create a configuration in code
    pub fn new(fqdns: Vec<String>, api_token: impl Into<String>) -> Self {
        Self {
            fqdns,
            api_token: api_token.into(),
        }
    }

    /// Parse a configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, crate::Error> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file
    ///
    /// Any failure here is fatal for the run: the caller must not start
    /// reconciliation without a fully populated configuration. Read failures
    /// come back as [`Error::Io`](crate::Error::Io), everything else as
    /// [`Error::Config`](crate::Error::Config).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, crate::Error> {
        let path = path.as_ref();
        tracing::debug!("Loading configuration from {}", path.display());

        let contents = std::fs::read_to_string(path)?;

        Self::from_json(&contents)
            .map_err(|e| crate::Error::config(format!("{}: {}", path.display(), e)))
    }

    /// Validate the configuration
    ///
    /// Questionable entries only produce warnings. A blank FQDN fails on its
    /// own during reconciliation without affecting the others, and an empty
    /// list is a run with nothing to do. The API token is not checked here;
    /// a bad token surfaces as a client construction failure.
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.fqdns.is_empty() {
            tracing::warn!("No FQDNs configured, nothing to update");
        }

        for (pos, fqdn) in self.fqdns.iter().enumerate() {
            if fqdn.trim().is_empty() {
                tracing::warn!("FQDN at position {} is empty", pos);
            }
        }

        Ok(())
    }
}

/// Default config file location: `<config dir>/ddns-update/config.json`
///
/// Returns `None` when the platform has no notion of a config directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_NAME).join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_documented_key_names() {
        let config = RunConfig::from_json(
            r#"{"FQDN": ["a.example.com", "b.example.com"], "APIToken": "tok"}"#,
        )
        .unwrap();

        assert_eq!(config.fqdns, vec!["a.example.com", "b.example.com"]);
        assert_eq!(config.api_token, "tok");
    }

    #[test]
    fn parses_snake_case_aliases() {
        let config =
            RunConfig::from_json(r#"{"fqdns": ["a.example.com"], "api_token": "tok"}"#).unwrap();
        assert_eq!(config.fqdns, vec!["a.example.com"]);
    }

    #[test]
    fn keeps_order_and_duplicates() {
        let config = RunConfig::from_json(
            r#"{"FQDN": ["b.example.com", "a.example.com", "b.example.com"], "APIToken": "t"}"#,
        )
        .unwrap();
        assert_eq!(
            config.fqdns,
            vec!["b.example.com", "a.example.com", "b.example.com"]
        );
    }

    #[test]
    fn parses_lowercase_keys() {
        let config =
            RunConfig::from_json(r#"{"fqdn": ["a.example.com"], "apitoken": "tok"}"#).unwrap();
        assert_eq!(config.fqdns, vec!["a.example.com"]);
        assert_eq!(config.api_token, "tok");
    }

    #[test]
    fn missing_token_is_rejected() {
        let result = RunConfig::from_json(r#"{"FQDN": ["a.example.com"]}"#);
        assert!(matches!(result, Err(crate::Error::Json(_))));
    }

    #[test]
    fn empty_fqdn_list_is_accepted() {
        let config = RunConfig::from_json(r#"{"FQDN": [], "APIToken": "tok"}"#).unwrap();
        assert!(config.fqdns.is_empty());
    }

    #[test]
    fn blank_fqdn_is_kept_alongside_valid_ones() {
        let config = RunConfig::from_json(
            r#"{"FQDN": ["a.example.com", "", "b.example.com"], "APIToken": "t"}"#,
        )
        .unwrap();
        assert_eq!(config.fqdns, vec!["a.example.com", "", "b.example.com"]);
    }

    #[test]
    fn empty_token_passes_validation() {
        let config = RunConfig::from_json(r#"{"FQDN": ["a.example.com"], "APIToken": ""}"#);
        assert!(config.is_ok());
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"FQDN": ["home.example.com"], "APIToken": "tok"}}"#).unwrap();

        let config = RunConfig::load(file.path()).unwrap();
        assert_eq!(config.fqdns, vec!["home.example.com"]);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = RunConfig::load(dir.path().join("nope.json"));
        assert!(matches!(result, Err(crate::Error::Io(_))));
    }

    #[test]
    fn load_malformed_file_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let result = RunConfig::load(file.path());
        assert!(matches!(result, Err(crate::Error::Config(_))));
    }

    #[test]
    fn debug_redacts_token() {
        let config = RunConfig::new(vec!["a.example.com".to_string()], "secret_token_12345");
        let debug_str = format!("{:?}", config);
        assert!(!debug_str.contains("secret_token_12345"));
        assert!(debug_str.contains("a.example.com"));
    }

    #[test]
    fn default_path_ends_with_app_dir() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with("ddns-update/config.json"));
        }
    }
}
