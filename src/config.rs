use std::path::PathBuf;

use crate::common::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    pub storage_dir: PathBuf,
    pub storage_url_prefix: String,
    pub admin_emails: Vec<String>,
    pub session_ttl_hours: i64,
    pub secure_cookies: bool,
}

impl AppConfig {
    pub const DEFAULT_BIND_ADDR: &'static str = "0.0.0.0:8080";
    pub const DEFAULT_STORAGE_DIR: &'static str = "./storage";
    pub const DEFAULT_STORAGE_URL_PREFIX: &'static str = "/storage";
    pub const DEFAULT_SESSION_TTL_HOURS: i64 = 24 * 7;

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes `std::env::var`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let session_ttl_hours = match get("SESSION_TTL_HOURS") {
            Some(v) => match v.parse::<i64>() {
                Ok(h) if h > 0 => h,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "SESSION_TTL_HOURS",
                        value: v,
                    });
                }
            },
            None => Self::DEFAULT_SESSION_TTL_HOURS,
        };

        let secure_cookies = match get("SECURE_COOKIES") {
            Some(v) => parse_bool(&v).ok_or(ConfigError::Invalid {
                name: "SECURE_COOKIES",
                value: v,
            })?,
            None => true,
        };

        let admin_emails = get("ADMIN_EMAILS")
            .map(|v| {
                v.split(',')
                    .map(|e| e.trim().to_lowercase())
                    .filter(|e| !e.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            database_url,
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| Self::DEFAULT_BIND_ADDR.to_string()),
            storage_dir: get("STORAGE_DIR")
                .unwrap_or_else(|| Self::DEFAULT_STORAGE_DIR.to_string())
                .into(),
            storage_url_prefix: get("STORAGE_URL_PREFIX")
                .unwrap_or_else(|| Self::DEFAULT_STORAGE_URL_PREFIX.to_string()),
            admin_emails,
            session_ttl_hours,
            secure_cookies,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply() {
        let cfg = AppConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://localhost/yh")])).unwrap();
        assert_eq!(cfg.bind_addr, "0.0.0.0:8080");
        assert_eq!(cfg.storage_dir, PathBuf::from("./storage"));
        assert_eq!(cfg.storage_url_prefix, "/storage");
        assert!(cfg.admin_emails.is_empty());
        assert_eq!(cfg.session_ttl_hours, 168);
        assert!(cfg.secure_cookies);
    }

    #[test]
    fn database_url_is_required() {
        assert_eq!(
            AppConfig::from_lookup(lookup(&[])),
            Err(ConfigError::Missing("DATABASE_URL"))
        );
        assert_eq!(
            AppConfig::from_lookup(lookup(&[("DATABASE_URL", "   ")])),
            Err(ConfigError::Missing("DATABASE_URL"))
        );
    }

    #[test]
    fn admin_emails_are_split_and_normalised() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://x"),
            ("ADMIN_EMAILS", " Pastor@Example.com, ,youth@example.com"),
        ]))
        .unwrap();
        assert_eq!(cfg.admin_emails, vec!["pastor@example.com", "youth@example.com"]);
    }

    #[test]
    fn invalid_values_are_reported() {
        let err = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://x"),
            ("SESSION_TTL_HOURS", "-3"),
        ]))
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                name: "SESSION_TTL_HOURS",
                value: "-3".into()
            }
        );

        let err = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://x"),
            ("SECURE_COOKIES", "maybe"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "SECURE_COOKIES", .. }));
    }

    #[test]
    fn secure_cookies_can_be_disabled_for_local_http() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://x"),
            ("SECURE_COOKIES", "false"),
        ]))
        .unwrap();
        assert!(!cfg.secure_cookies);
    }
}
