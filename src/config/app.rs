//! Runtime configuration read from the environment (after `.env` is loaded).

use crate::error::ConfigError;
use std::str::FromStr;

pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/cat_registry";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_DB_SCHEMA: &str = "public";
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 1024 * 1024;
pub const DEFAULT_IMAGE_API_URL: &str = "https://en.wikipedia.org/api/rest_v1";
pub const DEFAULT_PASSWORD_HASH_ROUNDS: u32 = 50_000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    pub max_connections: u32,
    /// PostgreSQL schema holding the application tables.
    pub db_schema: String,
    pub body_limit_bytes: usize,
    /// Wikipedia REST root used to find species images.
    pub image_api_url: String,
    pub password_hash_rounds: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            database_url: DEFAULT_DATABASE_URL.into(),
            bind_addr: DEFAULT_BIND_ADDR.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            db_schema: DEFAULT_DB_SCHEMA.into(),
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
            image_api_url: DEFAULT_IMAGE_API_URL.into(),
            password_hash_rounds: DEFAULT_PASSWORD_HASH_ROUNDS,
        }
    }
}

impl AppConfig {
    /// Read `DATABASE_URL`, `BIND_ADDR`, `DB_MAX_CONNECTIONS`, `DB_SCHEMA`, `BODY_LIMIT_BYTES`,
    /// `IMAGE_API_URL`, `PASSWORD_HASH_ROUNDS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env` with an injectable lookup; unset keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = AppConfig::default();
        let db_schema = lookup("DB_SCHEMA").unwrap_or(defaults.db_schema);
        if !is_plain_identifier(&db_schema) {
            return Err(ConfigError::InvalidSchema(db_schema));
        }
        Ok(AppConfig {
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            max_connections: parse_or("DB_MAX_CONNECTIONS", lookup("DB_MAX_CONNECTIONS"), defaults.max_connections)?,
            db_schema,
            body_limit_bytes: parse_or("BODY_LIMIT_BYTES", lookup("BODY_LIMIT_BYTES"), defaults.body_limit_bytes)?,
            image_api_url: lookup("IMAGE_API_URL").unwrap_or(defaults.image_api_url),
            password_hash_rounds: parse_or(
                "PASSWORD_HASH_ROUNDS",
                lookup("PASSWORD_HASH_ROUNDS"),
                defaults.password_hash_rounds,
            )?,
        })
    }
}

fn parse_or<T: FromStr>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(s) => s
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value: s }),
    }
}

fn is_plain_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k: &str| map.get(k).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn overrides_are_parsed() {
        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://db/cats"),
            ("DB_MAX_CONNECTIONS", " 12 "),
            ("DB_SCHEMA", "sssf"),
            ("BODY_LIMIT_BYTES", "2048"),
            ("PASSWORD_HASH_ROUNDS", "1000"),
        ]))
        .unwrap();
        assert_eq!(cfg.database_url, "postgres://db/cats");
        assert_eq!(cfg.max_connections, 12);
        assert_eq!(cfg.db_schema, "sssf");
        assert_eq!(cfg.body_limit_bytes, 2048);
        assert_eq!(cfg.password_hash_rounds, 1000);
        assert_eq!(cfg.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(cfg.image_api_url, DEFAULT_IMAGE_API_URL);
    }

    #[test]
    fn bad_number_is_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[("DB_MAX_CONNECTIONS", "many")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "DB_MAX_CONNECTIONS", .. }));
    }

    #[test]
    fn schema_must_be_plain_identifier() {
        let err = AppConfig::from_lookup(lookup_from(&[("DB_SCHEMA", "public; drop")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSchema(_)));
    }
}
