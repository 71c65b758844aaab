use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

use client_logging::{client_info, client_warn};
use rag_client_core::{EndpointConfig, RequestContract};
use serde::Deserialize;

pub(crate) const CONFIG_FILENAME: &str = "rag_client.ron";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
enum ContractOverride {
    Structured,
    Simple,
}

/// Optional settings read from `rag_client.ron`; anything left out keeps its default.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigOverrides {
    primary: Option<String>,
    fallback: Option<String>,
    disable_fallback: bool,
    page_origin: Option<String>,
    probe_timeout_ms: Option<u64>,
    diagnostic_timeout_ms: Option<u64>,
    query_timeout_ms: Option<u64>,
    probe_interval_secs: Option<u64>,
    contract: Option<ContractOverride>,
}

impl ConfigOverrides {
    fn apply(self, mut config: EndpointConfig) -> EndpointConfig {
        if let Some(primary) = self.primary {
            config.primary = primary;
        }
        if self.disable_fallback {
            config.fallback = None;
        } else if let Some(fallback) = self.fallback {
            config.fallback = Some(fallback);
        }
        if self.page_origin.is_some() {
            config.page_origin = self.page_origin;
        }
        if let Some(ms) = self.probe_timeout_ms {
            config.probe_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = self.diagnostic_timeout_ms {
            config.diagnostic_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = self.query_timeout_ms {
            config.query_timeout = Duration::from_millis(ms);
        }
        if let Some(secs) = self.probe_interval_secs {
            config.probe_interval = Duration::from_secs(secs.max(1));
        }
        if let Some(contract) = self.contract {
            config.contract = match contract {
                ContractOverride::Structured => RequestContract::Structured,
                ContractOverride::Simple => RequestContract::Simple,
            };
        }
        config
    }
}

fn parse_config(text: &str) -> Result<EndpointConfig, String> {
    let overrides: ConfigOverrides = ron::from_str(text).map_err(|err| err.to_string())?;
    let config = overrides.apply(EndpointConfig::default());
    config.validate().map_err(|err| err.to_string())?;
    Ok(config)
}

/// Reads endpoint settings from `path`. A missing file means defaults; an
/// unreadable or invalid one is reported and also falls back to defaults.
pub(crate) fn load_endpoint_config(path: &Path) -> EndpointConfig {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            client_info!("No {:?}; using default endpoints", path);
            return EndpointConfig::default();
        }
        Err(err) => {
            client_warn!("Could not read {:?}: {}; using defaults", path, err);
            return EndpointConfig::default();
        }
    };

    match parse_config(&text) {
        Ok(config) => {
            client_info!(
                "Loaded endpoint config from {:?}: primary={} fallback={:?}",
                path,
                config.primary,
                config.fallback
            );
            config
        }
        Err(reason) => {
            client_warn!("Ignoring {:?}: {}", path, reason);
            EndpointConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn empty_overrides_keep_defaults() {
        assert_eq!(parse_config("()").unwrap(), EndpointConfig::default());
    }

    #[test]
    fn overrides_replace_only_named_fields() {
        let config = parse_config(
            r#"(
                primary: Some("http://localhost:8000"),
                disable_fallback: true,
                query_timeout_ms: Some(12000),
                contract: Some(Simple),
            )"#,
        )
        .unwrap();

        assert_eq!(config.primary, "http://localhost:8000");
        assert_eq!(config.fallback, None);
        assert_eq!(config.query_timeout, Duration::from_secs(12));
        assert_eq!(config.probe_timeout, EndpointConfig::default().probe_timeout);
        assert_eq!(config.contract, RequestContract::Simple);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(parse_config(r#"(primary: Some("ftp://files.example.com"))"#).is_err());
        assert!(parse_config("(probe_timeout_ms: Some(60000))").is_err());
        assert!(parse_config("(primary: 7)").is_err());
    }

    #[test]
    fn missing_or_broken_file_falls_back_to_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        assert_eq!(load_endpoint_config(&path), EndpointConfig::default());

        fs::write(&path, "(primary: ").unwrap();
        assert_eq!(load_endpoint_config(&path), EndpointConfig::default());

        fs::write(&path, r#"(fallback: Some("https://10.0.0.5:8443"))"#).unwrap();
        assert_eq!(
            load_endpoint_config(&path).fallback.as_deref(),
            Some("https://10.0.0.5:8443")
        );
    }
}
