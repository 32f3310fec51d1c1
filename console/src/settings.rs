use std::path::Path;

use clap::Args;
use player_database::StoreConfig;
use serde::Deserialize;

use crate::ConsoleError;

pub const DEFAULT_URL: &str = "sqlite://players.db?mode=rwc";

pub const URL_ENV: &str = "PLAYER_DB_URL";
pub const USERNAME_ENV: &str = "PLAYER_DB_USERNAME";
pub const PASSWORD_ENV: &str = "PLAYER_DB_PASSWORD";

/// Connection flags shared by every subcommand.
#[derive(Args, Debug, Default, Clone)]
pub struct ConnectionArgs {
    /// Connection URL, e.g. jdbc:mysql://localhost:3306/game
    #[arg(long, global = true)]
    pub url: Option<String>,

    #[arg(long, global = true)]
    pub username: Option<String>,

    #[arg(long, global = true)]
    pub password: Option<String>,

    /// YAML file with url/username/password/pool_size keys
    #[arg(long, global = true)]
    pub config: Option<std::path::PathBuf>,
}

/// Contents of the optional YAML config file.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct FileSettings {
    pub url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub pool_size: Option<u32>,
}

impl FileSettings {
    pub fn load(path: &Path) -> Result<Self, ConsoleError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConsoleError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&text).map_err(|source| ConsoleError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl ConnectionArgs {
    /// Each value comes from the first source that has it: command line,
    /// environment, config file, built-in default.
    pub fn from_cli_or_env_or_yaml(&self) -> Result<StoreConfig, ConsoleError> {
        let file = match &self.config {
            Some(path) => FileSettings::load(path)?,
            None => FileSettings::default(),
        };
        Ok(self.resolve_with(|key| std::env::var(key).ok(), file))
    }

    pub fn resolve_with(
        &self,
        env: impl Fn(&str) -> Option<String>,
        file: FileSettings,
    ) -> StoreConfig {
        let pick = |cli: &Option<String>, key: &str, yaml: Option<String>| {
            cli.clone().or_else(|| env(key)).or(yaml)
        };

        let url = pick(&self.url, URL_ENV, file.url).unwrap_or_else(|| DEFAULT_URL.to_string());
        let username = pick(&self.username, USERNAME_ENV, file.username).unwrap_or_default();
        let password = pick(&self.password, PASSWORD_ENV, file.password).unwrap_or_default();

        let config = StoreConfig::new(url, username, password);
        match file.pool_size {
            Some(size) => config.with_pool_size(size),
            None => config,
        }
    }
}
