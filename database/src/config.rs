use std::fmt;

use url::Url;

use crate::{Dialect, StoreError};

pub const DEFAULT_POOL_SIZE: u32 = 15;
pub const DEFAULT_STATEMENT_CACHE_CAPACITY: usize = 250;

const STATEMENT_CACHE_PARAM: &str = "statement-cache-capacity";

/// Connection settings for a [`crate::PlayerRecordStore`].
///
/// `url` may be a JDBC-style URL (`jdbc:mysql://host:3306/db`); the `jdbc:`
/// prefix is dropped. Credentials are applied to MySQL URLs only, SQLite has
/// no notion of them.
#[derive(Clone)]
pub struct StoreConfig {
    pub url: String,
    pub username: String,
    pub password: String,
    pub pool_size: u32,
    pub statement_cache_capacity: usize,
}

impl StoreConfig {
    pub fn new(
        url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            username: username.into(),
            password: password.into(),
            pool_size: DEFAULT_POOL_SIZE,
            statement_cache_capacity: DEFAULT_STATEMENT_CACHE_CAPACITY,
        }
    }

    pub fn with_pool_size(mut self, pool_size: u32) -> Self {
        self.pool_size = pool_size;
        self
    }

    /// Works out the dialect and the URL handed to the sqlx driver.
    pub fn resolve(&self) -> Result<(Dialect, String), StoreError> {
        let raw = self.url.strip_prefix("jdbc:").unwrap_or(&self.url);
        let (scheme, _) = raw
            .split_once(':')
            .ok_or_else(|| StoreError::InvalidUrl(format!("missing scheme in `{raw}`")))?;
        let dialect = Dialect::from_scheme(scheme)?;

        match dialect {
            Dialect::Sqlite => Ok((dialect, raw.to_string())),
            Dialect::MySql => self.resolve_mysql(raw).map(|url| (dialect, url)),
        }
    }

    fn resolve_mysql(&self, raw: &str) -> Result<String, StoreError> {
        let mut url = Url::parse(raw).map_err(|e| StoreError::InvalidUrl(e.to_string()))?;

        if url.scheme() != "mysql" {
            url.set_scheme("mysql")
                .map_err(|_| StoreError::InvalidUrl(format!("cannot rewrite scheme of `{raw}`")))?;
        }

        if !self.username.is_empty() {
            url.set_username(&self.username)
                .map_err(|_| StoreError::InvalidUrl("URL cannot carry a username".to_string()))?;
        }
        if !self.password.is_empty() {
            url.set_password(Some(&self.password))
                .map_err(|_| StoreError::InvalidUrl("URL cannot carry a password".to_string()))?;
        }

        if !url.query_pairs().any(|(key, _)| key == STATEMENT_CACHE_PARAM) {
            url.query_pairs_mut().append_pair(
                STATEMENT_CACHE_PARAM,
                &self.statement_cache_capacity.to_string(),
            );
        }

        Ok(url.into())
    }

    /// True for SQLite URLs naming a private in-memory database, which only
    /// lives as long as the single connection that opened it.
    pub(crate) fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("pool_size", &self.pool_size)
            .field("statement_cache_capacity", &self.statement_cache_capacity)
            .finish()
    }
}
