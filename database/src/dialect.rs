use crate::StoreError;

/// SQL flavor spoken by the connected server.
///
/// Both flavors bind parameters in the same positional order, so the store
/// issues identical `bind` chains regardless of the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    MySql,
    Sqlite,
}

const MYSQL_CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS player_data (\
uuid VARCHAR(36) PRIMARY KEY, \
username VARCHAR(16) NOT NULL, \
userid VARCHAR(36) UNIQUE, \
rank VARCHAR(50) DEFAULT 'default', \
balance DOUBLE NOT NULL DEFAULT 0.0, \
other_data TEXT, \
last_updated TIMESTAMP DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP)";

// SQLite has no ON UPDATE clause; every upsert sets last_updated itself.
const SQLITE_CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS player_data (\
uuid VARCHAR(36) PRIMARY KEY, \
username VARCHAR(16) NOT NULL, \
userid VARCHAR(36) UNIQUE, \
rank VARCHAR(50) DEFAULT 'default', \
balance DOUBLE NOT NULL DEFAULT 0.0, \
other_data TEXT, \
last_updated TIMESTAMP DEFAULT CURRENT_TIMESTAMP)";

const SELECT_BALANCE: &str = "SELECT balance FROM player_data WHERE uuid = ?";

const MYSQL_SELECT_LAST_UPDATED: &str =
    "SELECT CAST(UNIX_TIMESTAMP(last_updated) AS SIGNED) AS last_updated FROM player_data WHERE uuid = ?";
const SQLITE_SELECT_LAST_UPDATED: &str =
    "SELECT CAST(strftime('%s', last_updated) AS INTEGER) AS last_updated FROM player_data WHERE uuid = ?";

const MYSQL_SELECT_PLAYER: &str = "SELECT username, userid, rank, balance, other_data, \
CAST(UNIX_TIMESTAMP(last_updated) AS SIGNED) AS last_updated FROM player_data WHERE uuid = ?";
const SQLITE_SELECT_PLAYER: &str = "SELECT username, userid, rank, balance, other_data, \
CAST(strftime('%s', last_updated) AS INTEGER) AS last_updated FROM player_data WHERE uuid = ?";

// A fresh row gets an empty username, matching what MySQL stores for an
// omitted NOT NULL VARCHAR.
const MYSQL_UPSERT_BALANCE: &str = "INSERT INTO player_data (uuid, username, balance) VALUES (?, '', ?) \
ON DUPLICATE KEY UPDATE balance = ?, last_updated = CURRENT_TIMESTAMP";
const SQLITE_UPSERT_BALANCE: &str = "INSERT INTO player_data (uuid, username, balance) VALUES (?, '', ?) \
ON CONFLICT(uuid) DO UPDATE SET balance = ?, last_updated = CURRENT_TIMESTAMP";

const MYSQL_UPSERT_PLAYER: &str = "INSERT INTO player_data (uuid, username, userid, rank, balance, other_data) \
VALUES (?, ?, ?, ?, ?, ?) \
ON DUPLICATE KEY UPDATE \
username = ?, userid = ?, rank = ?, balance = ?, other_data = ?, last_updated = CURRENT_TIMESTAMP";
const SQLITE_UPSERT_PLAYER: &str = "INSERT INTO player_data (uuid, username, userid, rank, balance, other_data) \
VALUES (?, ?, ?, ?, ?, ?) \
ON CONFLICT(uuid) DO UPDATE SET \
username = ?, userid = ?, rank = ?, balance = ?, other_data = ?, last_updated = CURRENT_TIMESTAMP";

impl Dialect {
    /// Picks the dialect for a connection URL scheme.
    pub fn from_scheme(scheme: &str) -> Result<Self, StoreError> {
        match scheme.to_ascii_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(Dialect::MySql),
            "sqlite" => Ok(Dialect::Sqlite),
            _ => Err(StoreError::UnsupportedDriver(scheme.to_string())),
        }
    }

    pub fn create_table(self) -> &'static str {
        match self {
            Dialect::MySql => MYSQL_CREATE_TABLE,
            Dialect::Sqlite => SQLITE_CREATE_TABLE,
        }
    }

    pub fn select_balance(self) -> &'static str {
        SELECT_BALANCE
    }

    pub fn select_last_updated(self) -> &'static str {
        match self {
            Dialect::MySql => MYSQL_SELECT_LAST_UPDATED,
            Dialect::Sqlite => SQLITE_SELECT_LAST_UPDATED,
        }
    }

    pub fn select_player(self) -> &'static str {
        match self {
            Dialect::MySql => MYSQL_SELECT_PLAYER,
            Dialect::Sqlite => SQLITE_SELECT_PLAYER,
        }
    }

    /// Binds: uuid, balance, balance.
    pub fn upsert_balance(self) -> &'static str {
        match self {
            Dialect::MySql => MYSQL_UPSERT_BALANCE,
            Dialect::Sqlite => SQLITE_UPSERT_BALANCE,
        }
    }

    /// Binds: uuid, then the five mutable columns twice.
    pub fn upsert_player(self) -> &'static str {
        match self {
            Dialect::MySql => MYSQL_UPSERT_PLAYER,
            Dialect::Sqlite => SQLITE_UPSERT_PLAYER,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_scheme() {
        assert_eq!(Dialect::from_scheme("mysql").unwrap(), Dialect::MySql);
        assert_eq!(Dialect::from_scheme("MariaDB").unwrap(), Dialect::MySql);
        assert_eq!(Dialect::from_scheme("sqlite").unwrap(), Dialect::Sqlite);
        assert!(matches!(
            Dialect::from_scheme("postgres"),
            Err(StoreError::UnsupportedDriver(s)) if s == "postgres"
        ));
    }

    #[test]
    fn test_mysql_schema_text() {
        assert_eq!(
            Dialect::MySql.create_table(),
            "CREATE TABLE IF NOT EXISTS player_data (uuid VARCHAR(36) PRIMARY KEY, \
             username VARCHAR(16) NOT NULL, userid VARCHAR(36) UNIQUE, \
             rank VARCHAR(50) DEFAULT 'default', balance DOUBLE NOT NULL DEFAULT 0.0, \
             other_data TEXT, \
             last_updated TIMESTAMP DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP)"
        );
    }

    #[test]
    fn test_sqlite_schema_drops_on_update_only() {
        let mysql = Dialect::MySql.create_table();
        let sqlite = Dialect::Sqlite.create_table();

        assert!(!sqlite.contains("ON UPDATE"));
        assert_eq!(mysql.replace(" ON UPDATE CURRENT_TIMESTAMP", ""), sqlite);
    }

    #[test]
    fn test_upserts_share_placeholder_count() {
        for dialect in [Dialect::MySql, Dialect::Sqlite] {
            assert_eq!(dialect.upsert_balance().matches('?').count(), 3);
            assert_eq!(dialect.upsert_player().matches('?').count(), 11);
            assert_eq!(dialect.select_player().matches('?').count(), 1);
        }
    }
}
