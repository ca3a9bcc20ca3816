use std::collections::BTreeSet;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
///
/// Built once at startup and handed to component constructors; nothing below
/// `main` reads the environment.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Keywords that must never appear in a tailored resume (case-insensitive).
    pub banned_claims: BTreeSet<String>,
    /// Redact emails/phone numbers during the parse stage.
    pub enable_pii_redaction: bool,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup (the process environment in
    /// production, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let banned_raw = lookup("BANNED_CLAIMS").unwrap_or_else(|| "[]".to_string());
        let banned: Vec<String> = serde_json::from_str(&banned_raw)
            .context("BANNED_CLAIMS must be a JSON array of strings")?;

        Ok(Config {
            banned_claims: banned
                .into_iter()
                .map(|claim| claim.trim().to_string())
                .filter(|claim| !claim.is_empty())
                .collect(),
            enable_pii_redaction: lookup("ENABLE_PII_REDACTION")
                .map(|v| v.trim().eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert!(config.banned_claims.is_empty());
        assert!(!config.enable_pii_redaction);
        assert_eq!(config.rust_log, "info");
    }

    #[test]
    fn test_banned_claims_parsed_from_json() {
        let config =
            Config::from_lookup(lookup_from(&[("BANNED_CLAIMS", r#"["wizard", " ", "guru"]"#)]))
                .unwrap();
        assert_eq!(config.banned_claims.len(), 2);
        assert!(config.banned_claims.contains("wizard"));
        assert!(config.banned_claims.contains("guru"));
    }

    #[test]
    fn test_malformed_banned_claims_is_error() {
        let result = Config::from_lookup(lookup_from(&[("BANNED_CLAIMS", "wizard")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_pii_flag_case_insensitive() {
        let config =
            Config::from_lookup(lookup_from(&[("ENABLE_PII_REDACTION", "TRUE")])).unwrap();
        assert!(config.enable_pii_redaction);
        let config =
            Config::from_lookup(lookup_from(&[("ENABLE_PII_REDACTION", "yes")])).unwrap();
        assert!(!config.enable_pii_redaction);
    }
}
