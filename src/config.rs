use std::time::Duration;

pub const DEFAULT_VERSION: &str = "1.0";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DB_HOST: &str = "localhost";
pub const DEFAULT_DB_PORT: u16 = 5432;
pub const DEFAULT_DB_NAME: &str = "demo";
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_DB_ACQUIRE_TIMEOUT_SECS: u64 = 5;

/// Where and how to reach one database server.
///
/// Shared by the HTTP service and the report tools. There is no default
/// user or password: both must be supplied explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionParams {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
}

impl ConnectionParams {
    /// `host:port/database`, safe to log.
    pub fn describe(&self) -> String {
        format!("{}:{}/{}", self.host, self.port, self.database)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Shown on the landing page.
    pub version: String,
    pub host: String,
    pub port: u16,
    pub database: ConnectionParams,
    pub db_max_connections: u32,
    pub db_acquire_timeout: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self::from_lookup(|key| std::env::var(key).ok())?;

        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Database: {}", config.database.describe());
        tracing::debug!("Server bind: {}", config.bind_addr());

        Ok(config)
    }

    /// Builds the configuration from any key/value source, validating every field.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let required = |key: &str| {
            lookup(key)
                .ok_or_else(|| anyhow::anyhow!("{} environment variable required", key))
                .and_then(|value| {
                    if value.trim().is_empty() {
                        anyhow::bail!("{} cannot be empty", key);
                    }
                    Ok(value)
                })
        };

        let port = |key: &str, default: u16| -> anyhow::Result<u16> {
            match optional(key) {
                Some(raw) => raw.trim().parse::<u16>().ok().filter(|p| *p != 0).ok_or_else(|| {
                    anyhow::anyhow!("{} must be a valid number between 1-65535", key)
                }),
                None => Ok(default),
            }
        };

        let db_max_connections = match optional("DB_MAX_CONNECTIONS") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| anyhow::anyhow!("DB_MAX_CONNECTIONS must be a positive number"))?,
            None => DEFAULT_DB_MAX_CONNECTIONS,
        };

        let db_acquire_timeout_secs = match optional("DB_ACQUIRE_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                anyhow::anyhow!("DB_ACQUIRE_TIMEOUT_SECS must be a number of seconds")
            })?,
            None => DEFAULT_DB_ACQUIRE_TIMEOUT_SECS,
        };

        Ok(Self {
            version: optional("VERSION").unwrap_or_else(|| DEFAULT_VERSION.to_string()),
            host: optional("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: port("PORT", DEFAULT_PORT)?,
            database: ConnectionParams {
                host: optional("DB_HOST").unwrap_or_else(|| DEFAULT_DB_HOST.to_string()),
                port: port("DB_PORT", DEFAULT_DB_PORT)?,
                database: optional("DB_NAME").unwrap_or_else(|| DEFAULT_DB_NAME.to_string()),
                user: required("DB_USER")?,
                password: required("DB_PASSWORD")?,
            },
            db_max_connections,
            db_acquire_timeout: Duration::from_secs(db_acquire_timeout_secs),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
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
    fn test_defaults_with_credentials() {
        let config =
            Config::from_lookup(lookup(&[("DB_USER", "app"), ("DB_PASSWORD", "s3cret")])).unwrap();

        assert_eq!(config.version, "1.0");
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
        assert_eq!(config.database.host, "localhost");
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.database.database, "demo");
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.db_acquire_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("VERSION", "2.3"),
            ("PORT", "9000"),
            ("DB_HOST", "db.internal"),
            ("DB_PORT", "30432"),
            ("DB_NAME", "shop"),
            ("DB_USER", "app"),
            ("DB_PASSWORD", "s3cret"),
            ("DB_MAX_CONNECTIONS", "12"),
        ]))
        .unwrap();

        assert_eq!(config.version, "2.3");
        assert_eq!(config.port, 9000);
        assert_eq!(config.database.describe(), "db.internal:30432/shop");
        assert_eq!(config.db_max_connections, 12);
    }

    #[test]
    fn test_missing_password_fails() {
        let err = Config::from_lookup(lookup(&[("DB_USER", "app")])).unwrap_err();
        assert!(err.to_string().contains("DB_PASSWORD"));
    }

    #[test]
    fn test_blank_user_fails() {
        let err =
            Config::from_lookup(lookup(&[("DB_USER", "  "), ("DB_PASSWORD", "x")])).unwrap_err();
        assert!(err.to_string().contains("DB_USER cannot be empty"));
    }

    #[test]
    fn test_invalid_port_fails() {
        let err = Config::from_lookup(lookup(&[
            ("DB_USER", "app"),
            ("DB_PASSWORD", "x"),
            ("DB_PORT", "not-a-port"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("DB_PORT"));

        assert!(Config::from_lookup(lookup(&[
            ("DB_USER", "app"),
            ("DB_PASSWORD", "x"),
            ("PORT", "0"),
        ]))
        .is_err());
    }

    #[test]
    fn test_zero_pool_size_fails() {
        assert!(Config::from_lookup(lookup(&[
            ("DB_USER", "app"),
            ("DB_PASSWORD", "x"),
            ("DB_MAX_CONNECTIONS", "0"),
        ]))
        .is_err());
    }
}
