#![forbid(unsafe_code)]

//! Store connection settings from the environment.

use thiserror::Error;

pub const URL_VAR: &str = "BLOOM_SUPABASE_URL";
pub const ANON_KEY_VAR: &str = "BLOOM_SUPABASE_ANON_KEY";
pub const TABLE_VAR: &str = "BLOOM_FLOWERS_TABLE";
pub const DEFAULT_TABLE: &str = "flowers";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {key}")]
    Missing { key: &'static str },

    #[error("invalid store URL in {key}: {value}")]
    InvalidUrl { key: &'static str, value: String },
}

/// Where the flower table lives and how to authenticate.
#[derive(Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub url: String,
    pub anon_key: String,
    pub table: String,
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("url", &self.url)
            .field("anon_key", &"<redacted>")
            .field("table", &self.table)
            .finish()
    }
}

impl StoreConfig {
    /// Read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::Missing { key })
        };

        let url = required(URL_VAR)?;
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(ConfigError::InvalidUrl {
                key: URL_VAR,
                value: url,
            });
        }
        let url = url.trim_end_matches('/').to_string();
        let anon_key = required(ANON_KEY_VAR)?;
        let table = lookup(TABLE_VAR)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_TABLE.to_string());

        Ok(Self {
            url,
            anon_key,
            table,
        })
    }

    /// PostgREST endpoint for the flower table.
    #[must_use]
    pub fn table_endpoint(&self) -> String {
        format!("{}/rest/v1/{}", self.url, self.table)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: BTreeMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn reads_required_values_and_defaults_table() {
        let config = StoreConfig::from_lookup(lookup(&[
            (URL_VAR, "https://garden.supabase.co/"),
            (ANON_KEY_VAR, "anon"),
        ]))
        .unwrap();
        assert_eq!(config.url, "https://garden.supabase.co");
        assert_eq!(config.anon_key, "anon");
        assert_eq!(config.table, "flowers");
        assert_eq!(
            config.table_endpoint(),
            "https://garden.supabase.co/rest/v1/flowers"
        );
    }

    #[test]
    fn table_override_is_honored() {
        let config = StoreConfig::from_lookup(lookup(&[
            (URL_VAR, "http://127.0.0.1:54321"),
            (ANON_KEY_VAR, "anon"),
            (TABLE_VAR, "flowers_staging"),
        ]))
        .unwrap();
        assert_eq!(config.table, "flowers_staging");
    }

    #[test]
    fn missing_url_is_reported() {
        let err = StoreConfig::from_lookup(lookup(&[(ANON_KEY_VAR, "anon")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing { key: URL_VAR });
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let err = StoreConfig::from_lookup(lookup(&[
            (URL_VAR, "https://garden.supabase.co"),
            (ANON_KEY_VAR, "   "),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Missing { key: ANON_KEY_VAR });
    }

    #[test]
    fn url_without_scheme_is_invalid() {
        let err = StoreConfig::from_lookup(lookup(&[
            (URL_VAR, "garden.supabase.co"),
            (ANON_KEY_VAR, "anon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));
    }

    #[test]
    fn debug_output_redacts_key() {
        let config = StoreConfig {
            url: "https://x".into(),
            anon_key: "secret-key".into(),
            table: "flowers".into(),
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret-key"));
    }
}
