//! Persistence of per-player account records (balance, rank, identifiers,
//! free-form metadata) behind a pooled MySQL or SQLite connection.
//!
//! Every operation is an `async fn` that finishes its single statement before
//! returning and spawns nothing. Synchronous hosts call them through
//! `tokio::runtime::Runtime::block_on`.

pub mod access;
pub mod config;
pub mod dialect;
pub mod error;
pub mod models;
pub mod store;

#[cfg(test)]
mod tests;

pub use access::PlayerDataAccess;
pub use config::StoreConfig;
pub use dialect::Dialect;
pub use error::StoreError;
pub use models::{PlayerData, PlayerRecord, DEFAULT_RANK};
pub use store::{PlayerRecordStore, MISSING_BALANCE, MISSING_TIMESTAMP};

// NoopStore for servers running without persistence
pub struct NoopStore;

#[async_trait::async_trait]
impl access::PlayerDataAccess for NoopStore {
    async fn get_balance(&self, _uuid: uuid::Uuid) -> f64 {
        MISSING_BALANCE
    }

    async fn get_last_updated(&self, _uuid: uuid::Uuid) -> i64 {
        MISSING_TIMESTAMP
    }

    async fn set_balance(&self, _uuid: uuid::Uuid, _balance: f64) {}

    async fn update_player_data(&self, _uuid: uuid::Uuid, _data: &models::PlayerData) {}

    async fn get_player_data(&self, _uuid: uuid::Uuid) -> Option<models::PlayerRecord> {
        None
    }

    async fn disconnect(&self) {}
}
