//! Pooled access to the `player_data` table.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use sqlx::any::{AnyPoolOptions, AnyRow};
use sqlx::pool::PoolConnection;
use sqlx::{Any, AnyPool, Row};
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use crate::models::DEFAULT_RANK;
use crate::{Dialect, PlayerData, PlayerRecord, StoreConfig, StoreError};

/// Returned by [`PlayerRecordStore::get_balance`] when no balance could be read.
pub const MISSING_BALANCE: f64 = -1.0;

/// Returned by [`PlayerRecordStore::get_last_updated`] when no timestamp could be read.
pub const MISSING_TIMESTAMP: i64 = 0;

/// Data-access handle for player records.
///
/// Cloning is cheap and every clone shares one connection pool. Each operation
/// checks out a single connection, runs one statement and hands the connection
/// back when the guard drops, on success and on error alike.
///
/// The plain methods (`get_balance`, `set_balance`, ...) never fail: errors are
/// logged and turned into [`MISSING_BALANCE`], [`MISSING_TIMESTAMP`], `None` or
/// a silent no-op. The `try_` variants report the [`StoreError`] instead.
#[derive(Debug, Clone)]
pub struct PlayerRecordStore {
    pool: AnyPool,
    dialect: Dialect,
    closed: Arc<AtomicBool>,
}

impl PlayerRecordStore {
    /// Opens the pool and creates the `player_data` table if it is missing.
    ///
    /// Fails when the URL names a driver that is not compiled in or the
    /// server cannot be reached. A failed table creation is only logged.
    #[instrument(skip_all, fields(pool_size = config.pool_size))]
    pub async fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        let (dialect, url) = config.resolve()?;
        sqlx::any::install_default_drivers();

        let mut options = AnyPoolOptions::new().max_connections(config.pool_size);
        if dialect == Dialect::Sqlite && config.is_in_memory() {
            debug!("In-memory SQLite database, pinning the pool to one connection");
            options = options
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        let pool = options
            .connect(&url)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        info!(?dialect, "Connected to player database");

        let store = Self {
            pool,
            dialect,
            closed: Arc::new(AtomicBool::new(false)),
        };
        if let Err(e) = store.ensure_schema().await {
            error!(error = %e, "Error creating player_data table");
        }

        Ok(store)
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }

    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    async fn acquire(&self) -> Result<PoolConnection<Any>, StoreError> {
        self.pool.acquire().await.map_err(StoreError::query)
    }

    /// Runs the idempotent `CREATE TABLE IF NOT EXISTS`.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        let mut conn = self.acquire().await?;
        sqlx::query(self.dialect.create_table())
            .execute(&mut *conn)
            .await
            .map_err(|e| StoreError::Schema(e.to_string()))?;
        Ok(())
    }

    #[instrument(skip(self), level = "debug")]
    pub async fn try_get_balance(&self, uuid: Uuid) -> Result<Option<f64>, StoreError> {
        let mut conn = self.acquire().await?;
        let row = sqlx::query(self.dialect.select_balance())
            .bind(uuid.to_string())
            .fetch_optional(&mut *conn)
            .await
            .map_err(StoreError::query)?;

        row.map(|r| r.try_get::<f64, _>("balance"))
            .transpose()
            .map_err(StoreError::query)
    }

    /// Last write time of the record in Unix seconds.
    #[instrument(skip(self), level = "debug")]
    pub async fn try_get_last_updated(&self, uuid: Uuid) -> Result<Option<i64>, StoreError> {
        let mut conn = self.acquire().await?;
        let row = sqlx::query(self.dialect.select_last_updated())
            .bind(uuid.to_string())
            .fetch_optional(&mut *conn)
            .await
            .map_err(StoreError::query)?;

        row.map(|r| r.try_get::<Option<i64>, _>("last_updated"))
            .transpose()
            .map(Option::flatten)
            .map_err(StoreError::query)
    }

    /// Writes the balance alone, creating the record if needed.
    #[instrument(skip(self), level = "debug")]
    pub async fn try_set_balance(&self, uuid: Uuid, balance: f64) -> Result<(), StoreError> {
        let mut conn = self.acquire().await?;
        sqlx::query(self.dialect.upsert_balance())
            .bind(uuid.to_string())
            .bind(balance)
            .bind(balance)
            .execute(&mut *conn)
            .await
            .map_err(StoreError::query)?;
        Ok(())
    }

    /// Writes every mutable column. An existing record is overwritten as a
    /// whole, nothing is merged.
    #[instrument(skip(self, data), fields(username = %data.username), level = "debug")]
    pub async fn try_update_player_data(
        &self,
        uuid: Uuid,
        data: &PlayerData,
    ) -> Result<(), StoreError> {
        data.validate()?;

        let mut conn = self.acquire().await?;
        sqlx::query(self.dialect.upsert_player())
            .bind(uuid.to_string())
            .bind(data.username.as_str())
            .bind(data.userid.as_deref())
            .bind(data.rank.as_str())
            .bind(data.balance)
            .bind(data.other_data.as_deref())
            .bind(data.username.as_str())
            .bind(data.userid.as_deref())
            .bind(data.rank.as_str())
            .bind(data.balance)
            .bind(data.other_data.as_deref())
            .execute(&mut *conn)
            .await
            .map_err(StoreError::query)?;
        Ok(())
    }

    #[instrument(skip(self), level = "debug")]
    pub async fn try_get_player_data(
        &self,
        uuid: Uuid,
    ) -> Result<Option<PlayerRecord>, StoreError> {
        let mut conn = self.acquire().await?;
        let row = sqlx::query(self.dialect.select_player())
            .bind(uuid.to_string())
            .fetch_optional(&mut *conn)
            .await
            .map_err(StoreError::query)?;

        row.map(|r| record_from_row(uuid, &r))
            .transpose()
            .map_err(StoreError::query)
    }

    /// Balance of the player, or [`MISSING_BALANCE`] if absent or unreadable.
    pub async fn get_balance(&self, uuid: Uuid) -> f64 {
        match self.try_get_balance(uuid).await {
            Ok(balance) => balance.unwrap_or(MISSING_BALANCE),
            Err(e) => {
                error!(%uuid, error = %e, "Error fetching balance");
                MISSING_BALANCE
            }
        }
    }

    /// Last write time in Unix seconds, or [`MISSING_TIMESTAMP`].
    pub async fn get_last_updated(&self, uuid: Uuid) -> i64 {
        match self.try_get_last_updated(uuid).await {
            Ok(seconds) => seconds.unwrap_or(MISSING_TIMESTAMP),
            Err(e) => {
                error!(%uuid, error = %e, "Error fetching last updated time");
                MISSING_TIMESTAMP
            }
        }
    }

    pub async fn set_balance(&self, uuid: Uuid, balance: f64) {
        if let Err(e) = self.try_set_balance(uuid, balance).await {
            error!(%uuid, error = %e, "Error setting balance");
        }
    }

    pub async fn update_player_data(&self, uuid: Uuid, data: &PlayerData) {
        if let Err(e) = self.try_update_player_data(uuid, data).await {
            error!(%uuid, error = %e, "Error updating player data");
        }
    }

    pub async fn get_player_data(&self, uuid: Uuid) -> Option<PlayerRecord> {
        match self.try_get_player_data(uuid).await {
            Ok(record) => record,
            Err(e) => {
                error!(%uuid, error = %e, "Error fetching player data");
                None
            }
        }
    }

    /// Closes the pool. Later calls, from this handle or any clone, do nothing.
    pub async fn disconnect(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        self.pool.close().await;
        info!("Disconnected from player database");
    }
}

fn record_from_row(uuid: Uuid, row: &AnyRow) -> Result<PlayerRecord, sqlx::Error> {
    let rank: Option<String> = row.try_get("rank")?;
    let last_updated: Option<i64> = row.try_get("last_updated")?;

    Ok(PlayerRecord {
        uuid,
        username: row.try_get("username")?,
        userid: row.try_get("userid")?,
        rank: rank.unwrap_or_else(|| DEFAULT_RANK.to_string()),
        balance: row.try_get("balance")?,
        other_data: text_column(row, "other_data")?,
        last_updated: last_updated.and_then(|secs| chrono::DateTime::from_timestamp(secs, 0)),
    })
}

// MySQL reports TEXT columns as blobs, so accept either representation.
fn text_column(row: &AnyRow, column: &str) -> Result<Option<String>, sqlx::Error> {
    match row.try_get::<Option<String>, _>(column) {
        Ok(text) => Ok(text),
        Err(text_err) => {
            let bytes: Option<Vec<u8>> = row.try_get(column)?;
            bytes
                .map(|b| text_from_bytes(column, b, &text_err))
                .transpose()
        }
    }
}

/// Bytes must be valid UTF-8; nothing is replaced or dropped.
fn text_from_bytes(
    column: &str,
    bytes: Vec<u8>,
    text_err: &sqlx::Error,
) -> Result<String, sqlx::Error> {
    String::from_utf8(bytes).map_err(|utf8_err| {
        sqlx::Error::Decode(
            format!(
                "column `{column}` is not text ({text_err}) and its bytes are not UTF-8 ({utf8_err})"
            )
            .into(),
        )
    })
}
