use async_trait::async_trait;
use uuid::Uuid;

use crate::{PlayerData, PlayerRecord, PlayerRecordStore};

/// The operations a game server needs from its player persistence layer.
#[async_trait]
pub trait PlayerDataAccess: Send + Sync {
    async fn get_balance(&self, uuid: Uuid) -> f64;
    async fn get_last_updated(&self, uuid: Uuid) -> i64;
    async fn set_balance(&self, uuid: Uuid, balance: f64);
    async fn update_player_data(&self, uuid: Uuid, data: &PlayerData);
    async fn get_player_data(&self, uuid: Uuid) -> Option<PlayerRecord>;
    async fn disconnect(&self);
}

#[async_trait]
impl PlayerDataAccess for PlayerRecordStore {
    async fn get_balance(&self, uuid: Uuid) -> f64 {
        PlayerRecordStore::get_balance(self, uuid).await
    }

    async fn get_last_updated(&self, uuid: Uuid) -> i64 {
        PlayerRecordStore::get_last_updated(self, uuid).await
    }

    async fn set_balance(&self, uuid: Uuid, balance: f64) {
        PlayerRecordStore::set_balance(self, uuid, balance).await
    }

    async fn update_player_data(&self, uuid: Uuid, data: &PlayerData) {
        PlayerRecordStore::update_player_data(self, uuid, data).await
    }

    async fn get_player_data(&self, uuid: Uuid) -> Option<PlayerRecord> {
        PlayerRecordStore::get_player_data(self, uuid).await
    }

    async fn disconnect(&self) {
        PlayerRecordStore::disconnect(self).await
    }
}
