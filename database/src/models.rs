use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::StoreError;

/// Rank assigned by the schema when none is written.
pub const DEFAULT_RANK: &str = "default";

pub const USERNAME_MAX_CHARS: usize = 16;
pub const USERID_MAX_CHARS: usize = 36;
pub const RANK_MAX_CHARS: usize = 50;

/// A row of `player_data` as read back from the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub uuid: Uuid,
    pub username: String,
    pub userid: Option<String>,
    pub rank: String,
    pub balance: f64,
    pub other_data: Option<String>,
    pub last_updated: Option<chrono::DateTime<chrono::Utc>>,
}

impl PlayerRecord {
    /// The mutable columns of this record, ready to be written back.
    pub fn data(&self) -> PlayerData {
        PlayerData {
            username: self.username.clone(),
            userid: self.userid.clone(),
            rank: self.rank.clone(),
            balance: self.balance,
            other_data: self.other_data.clone(),
        }
    }
}

/// Every mutable column of a player, written as a whole by a full upsert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerData {
    pub username: String,
    pub userid: Option<String>,
    pub rank: String,
    pub balance: f64,
    pub other_data: Option<String>,
}

impl PlayerData {
    pub fn new(username: impl Into<String>, balance: f64) -> Self {
        Self {
            username: username.into(),
            userid: None,
            rank: DEFAULT_RANK.to_string(),
            balance,
            other_data: None,
        }
    }

    pub fn with_userid(mut self, userid: impl Into<String>) -> Self {
        self.userid = Some(userid.into());
        self
    }

    pub fn with_rank(mut self, rank: impl Into<String>) -> Self {
        self.rank = rank.into();
        self
    }

    pub fn with_other_data(mut self, other_data: impl Into<String>) -> Self {
        self.other_data = Some(other_data.into());
        self
    }

    /// Checks the VARCHAR limits of the schema. Lengths are counted in
    /// characters, as the database does, not bytes.
    pub fn validate(&self) -> Result<(), StoreError> {
        check_len("username", &self.username, USERNAME_MAX_CHARS)?;
        if let Some(userid) = &self.userid {
            check_len("userid", userid, USERID_MAX_CHARS)?;
        }
        check_len("rank", &self.rank, RANK_MAX_CHARS)
    }
}

fn check_len(field: &'static str, value: &str, max: usize) -> Result<(), StoreError> {
    let len = value.chars().count();
    if len > max {
        return Err(StoreError::FieldTooLong { field, max, len });
    }
    Ok(())
}
