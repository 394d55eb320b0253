//! Application settings loaded via OrthoConfig.
//!
//! Values layer CLI flags over `USERBOOK_*` environment variables and an
//! optional configuration file. Every field is optional; accessors supply
//! the defaults.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::outbound::persistence::{
    DEFAULT_CONNECTION_TIMEOUT, DEFAULT_MAX_SIZE, DEFAULT_MIN_IDLE, PoolConfig,
};

/// Address the server binds when none is configured.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

/// Errors raised while interpreting loaded settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The bind address is not a valid socket address.
    #[error("invalid bind address {value:?}: {source}")]
    BindAddr {
        /// Configured value.
        value: String,
        /// Parse failure.
        #[source]
        source: std::net::AddrParseError,
    },
}

/// Server and database settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "USERBOOK")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL; the in-memory store is used when unset.
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Idle database connections kept open.
    pub pool_min_idle: Option<u32>,
    /// Seconds to wait for a pooled connection.
    pub pool_timeout_secs: Option<u64>,
    /// Skip applying embedded migrations at startup.
    #[ortho_config(default = false)]
    pub skip_migrations: bool,
}

impl AppSettings {
    /// Parse the configured bind address, falling back to [`DEFAULT_BIND_ADDR`].
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::BindAddr`] when the value is not a socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    /// Configured database URL, ignoring blank values.
    #[must_use]
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Pool configuration, present only when a database URL is configured.
    #[must_use]
    pub fn pool_config(&self) -> Option<PoolConfig> {
        let timeout = self
            .pool_timeout_secs
            .map_or(DEFAULT_CONNECTION_TIMEOUT, Duration::from_secs);
        self.database_url().map(|url| {
            PoolConfig::new(url)
                .with_max_size(self.pool_max_size.unwrap_or(DEFAULT_MAX_SIZE))
                .with_min_idle(Some(self.pool_min_idle.unwrap_or(DEFAULT_MIN_IDLE)))
                .with_connection_timeout(timeout)
        })
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing and defaults.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 6] = [
        "USERBOOK_BIND_ADDR",
        "USERBOOK_DATABASE_URL",
        "USERBOOK_POOL_MAX_SIZE",
        "USERBOOK_POOL_MIN_IDLE",
        "USERBOOK_POOL_TIMEOUT_SECS",
        "USERBOOK_SKIP_MIGRATIONS",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("userbook")]).expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_nothing_is_set() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("default address"),
            DEFAULT_BIND_ADDR.parse::<SocketAddr>().expect("valid default")
        );
        assert!(settings.database_url().is_none());
        assert!(settings.pool_config().is_none());
        assert!(!settings.skip_migrations);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("USERBOOK_BIND_ADDR", Some("0.0.0.0:9000".to_owned())),
            (
                "USERBOOK_DATABASE_URL",
                Some("postgres://localhost/userbook".to_owned()),
            ),
            ("USERBOOK_POOL_MAX_SIZE", Some("4".to_owned())),
            ("USERBOOK_POOL_MIN_IDLE", Some("1".to_owned())),
            ("USERBOOK_POOL_TIMEOUT_SECS", Some("5".to_owned())),
            ("USERBOOK_SKIP_MIGRATIONS", Some("true".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("valid address"),
            "0.0.0.0:9000".parse::<SocketAddr>().expect("valid")
        );
        assert!(settings.skip_migrations);

        let pool = settings.pool_config().expect("pool configured");
        assert_eq!(pool.database_url(), "postgres://localhost/userbook");
        assert_eq!(pool.max_size(), 4);
        assert_eq!(pool.min_idle(), Some(1));
        assert_eq!(pool.connection_timeout(), Duration::from_secs(5));
    }

    #[rstest]
    fn blank_database_url_means_in_memory() {
        let _guard = lock_env([("USERBOOK_DATABASE_URL", Some("   ".to_owned()))]);

        let settings = load_from_empty_args();
        assert!(settings.database_url().is_none());
        assert!(settings.pool_config().is_none());
    }

    #[rstest]
    fn malformed_bind_address_is_reported() {
        let _guard = lock_env([("USERBOOK_BIND_ADDR", Some("not-an-address".to_owned()))]);

        let settings = load_from_empty_args();
        let err = settings.bind_addr().expect_err("invalid address");
        assert!(err.to_string().contains("not-an-address"));
    }
}
