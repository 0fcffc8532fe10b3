// src/config.rs

use anyhow::{Context, Result};
use std::env;
use tracing::{info, warn};
use url::Url;

use crate::sheets::fetch::DEFAULT_SHEETS_API_BASE;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_API_BASE: &str = "http://localhost:5000";
pub const DEFAULT_DASHBOARD_URL: &str = "http://localhost:8080";

/// Process configuration read from the environment.
///
/// The spreadsheet id and service account stay optional: the server still
/// starts without them and each request reports what is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub spreadsheet_id: Option<String>,
    pub service_account: Option<String>,
    pub sheets_api_base: Url,
    pub api_base: Url,
    pub dashboard_url: Url,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes `std::env::var`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |keys: &[&str]| {
            keys.iter()
                .find_map(|&k| lookup(k))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port = match get(&["PORT"]) {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!(port = %raw, "invalid PORT, using default");
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        let config = Self {
            port,
            spreadsheet_id: get(&["GOOGLE_SHEETS_ID", "NEXT_PUBLIC_GOOGLE_SHEETS_ID"]),
            service_account: get(&["GOOGLE_SERVICE_ACCOUNT"]),
            sheets_api_base: parse_base(
                get(&["SHEETS_API_BASE"]).as_deref(),
                DEFAULT_SHEETS_API_BASE,
            )?,
            api_base: parse_base(
                get(&["API_BASE", "NEXT_PUBLIC_API_BASE"]).as_deref(),
                DEFAULT_API_BASE,
            )?,
            dashboard_url: parse_base(get(&["DASHBOARD_URL"]).as_deref(), DEFAULT_DASHBOARD_URL)?,
        };

        if config.spreadsheet_id.is_none() {
            warn!("GOOGLE_SHEETS_ID not set; summary endpoints will report a config error");
        }
        if config.service_account.is_none() {
            warn!("GOOGLE_SERVICE_ACCOUNT not set; summary endpoints will report a config error");
        }
        info!(port = config.port, api_base = %config.api_base, "loaded config");
        Ok(config)
    }
}

/// Parse a base URL, forcing a trailing slash so `join` appends instead of
/// replacing the last segment.
pub fn parse_base(raw: Option<&str>, default: &str) -> Result<Url> {
    let raw = raw.unwrap_or(default);
    let with_slash = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{}/", raw)
    };
    Url::parse(&with_slash).with_context(|| format!("parsing base URL {}", raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() -> Result<()> {
        let c = config(&[])?;
        assert_eq!(c.port, DEFAULT_PORT);
        assert!(c.spreadsheet_id.is_none());
        assert!(c.service_account.is_none());
        assert_eq!(c.api_base.as_str(), "http://localhost:5000/");
        assert_eq!(c.sheets_api_base.as_str(), DEFAULT_SHEETS_API_BASE);
        Ok(())
    }

    #[test]
    fn legacy_names_are_fallbacks() -> Result<()> {
        let c = config(&[
            ("NEXT_PUBLIC_GOOGLE_SHEETS_ID", "legacy"),
            ("NEXT_PUBLIC_API_BASE", "https://api.example.org/v1"),
        ])?;
        assert_eq!(c.spreadsheet_id.as_deref(), Some("legacy"));
        assert_eq!(
            c.api_base.join("createMember")?.as_str(),
            "https://api.example.org/v1/createMember"
        );

        let c = config(&[
            ("GOOGLE_SHEETS_ID", "primary"),
            ("NEXT_PUBLIC_GOOGLE_SHEETS_ID", "legacy"),
        ])?;
        assert_eq!(c.spreadsheet_id.as_deref(), Some("primary"));
        Ok(())
    }

    #[test]
    fn blank_values_count_as_missing() -> Result<()> {
        let c = config(&[("GOOGLE_SHEETS_ID", "  "), ("PORT", "not-a-port")])?;
        assert!(c.spreadsheet_id.is_none());
        assert_eq!(c.port, DEFAULT_PORT);
        Ok(())
    }

    #[test]
    fn bad_base_url_is_an_error() {
        assert!(config(&[("API_BASE", "not a url")]).is_err());
    }
}
