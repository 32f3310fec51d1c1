use std::path::PathBuf;

use clap::Subcommand;
use player_database::{
    PlayerData, PlayerRecordStore, StoreError, DEFAULT_RANK, MISSING_BALANCE, MISSING_TIMESTAMP,
};
use thiserror::Error;
use uuid::Uuid;

/// Printed by `show` for a player with no record.
pub const NOT_FOUND: &str = "not found";

#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Cannot read config file {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the player_data table if it is missing
    Init,
    /// Print a player's balance
    Balance { uuid: Uuid },
    /// Overwrite a player's balance, creating the player if needed
    SetBalance {
        uuid: Uuid,
        #[arg(allow_negative_numbers = true)]
        amount: f64,
    },
    /// Print when a player was last written, in Unix seconds
    LastUpdated { uuid: Uuid },
    /// Print a player's record as JSON
    Show { uuid: Uuid },
    /// Write every column of a player's record
    Update {
        uuid: Uuid,
        #[arg(long)]
        username: String,
        #[arg(long)]
        userid: Option<String>,
        #[arg(long, default_value = DEFAULT_RANK)]
        rank: String,
        #[arg(long, allow_negative_numbers = true)]
        balance: f64,
        #[arg(long)]
        other_data: Option<String>,
    },
}

/// Executes one command and returns the text to print.
pub async fn run(store: &PlayerRecordStore, command: Command) -> Result<String, ConsoleError> {
    log::debug!("running {command:?}");
    let output = match command {
        Command::Init => {
            store.ensure_schema().await?;
            "player_data table ready".to_string()
        }
        Command::Balance { uuid } => store
            .try_get_balance(uuid)
            .await?
            .unwrap_or(MISSING_BALANCE)
            .to_string(),
        Command::SetBalance { uuid, amount } => {
            store.try_set_balance(uuid, amount).await?;
            format!("balance of {uuid} set to {amount}")
        }
        Command::LastUpdated { uuid } => store
            .try_get_last_updated(uuid)
            .await?
            .unwrap_or(MISSING_TIMESTAMP)
            .to_string(),
        Command::Show { uuid } => match store.try_get_player_data(uuid).await? {
            Some(record) => serde_json::to_string_pretty(&record)?,
            None => NOT_FOUND.to_string(),
        },
        Command::Update {
            uuid,
            username,
            userid,
            rank,
            balance,
            other_data,
        } => {
            let data = PlayerData {
                username,
                userid,
                rank,
                balance,
                other_data,
            };
            store.try_update_player_data(uuid, &data).await?;
            format!("player {uuid} updated")
        }
    };
    Ok(output)
}
