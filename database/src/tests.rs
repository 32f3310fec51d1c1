#[cfg(test)]
mod store_tests {
    use crate::*;
    use tempfile::TempDir;
    use uuid::Uuid;

    pub async fn setup_test_store() -> (TempDir, PlayerRecordStore) {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let url = format!(
            "sqlite://{}?mode=rwc",
            dir.path().join("players.db").display()
        );
        let store = PlayerRecordStore::connect(&StoreConfig::new(url, "", ""))
            .await
            .expect("Failed to open test store");

        (dir, store)
    }

    async fn count_rows(store: &PlayerRecordStore, uuid: Uuid) -> i64 {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM player_data WHERE uuid = ?")
            .bind(uuid.to_string())
            .fetch_one(store.pool())
            .await
            .expect("Failed to count rows");
        sqlx::Row::get(&row, "n")
    }

    #[tokio::test]
    async fn test_connect_creates_table() {
        let (_dir, store) = setup_test_store().await;

        assert_eq!(store.dialect(), Dialect::Sqlite);

        let row = sqlx::query(
            "SELECT COUNT(*) AS n FROM sqlite_master WHERE type = 'table' AND name = 'player_data'",
        )
        .fetch_one(store.pool())
        .await
        .expect("Failed to inspect schema");
        let tables: i64 = sqlx::Row::get(&row, "n");
        assert_eq!(tables, 1);
    }

    #[tokio::test]
    async fn test_ensure_schema_twice_keeps_rows() {
        let (_dir, store) = setup_test_store().await;
        let player = Uuid::new_v4();
        store.set_balance(player, 7.0).await;

        store.ensure_schema().await.expect("First create failed");
        store.ensure_schema().await.expect("Second create failed");

        assert_eq!(store.get_balance(player).await, 7.0);
        assert_eq!(count_rows(&store, player).await, 1);
    }

    #[tokio::test]
    async fn test_set_balance_then_update_leaves_one_row() {
        let (_dir, store) = setup_test_store().await;
        let player = Uuid::new_v4();

        store.set_balance(player, 5.0).await;
        store
            .update_player_data(player, &PlayerData::new("Alice", 10.0))
            .await;

        assert_eq!(count_rows(&store, player).await, 1);
        assert_eq!(store.get_balance(player).await, 10.0);
    }

    #[tokio::test]
    async fn test_set_balance_on_new_player_uses_column_defaults() {
        let (_dir, store) = setup_test_store().await;
        let player = Uuid::new_v4();

        store.set_balance(player, 1.25).await;

        let record = store
            .get_player_data(player)
            .await
            .expect("Record should exist after set_balance");
        assert_eq!(record.username, "");
        assert_eq!(record.userid, None);
        assert_eq!(record.rank, DEFAULT_RANK);
        assert_eq!(record.balance, 1.25);
        assert_eq!(record.other_data, None);
        assert!(record.last_updated.is_some());
    }

    #[tokio::test]
    async fn test_set_balance_keeps_other_columns() {
        let (_dir, store) = setup_test_store().await;
        let player = Uuid::new_v4();
        let data = PlayerData::new("Bob", 3.0)
            .with_userid("bob-id")
            .with_rank("vip")
            .with_other_data("{\"home\":\"spawn\"}");

        store.update_player_data(player, &data).await;
        store.set_balance(player, 99.0).await;

        let record = store.get_player_data(player).await.expect("Missing record");
        assert_eq!(record.balance, 99.0);
        assert_eq!(record.data(), PlayerData { balance: 99.0, ..data });
    }

    #[tokio::test]
    async fn test_negative_balance_is_indistinguishable_from_missing() {
        let (_dir, store) = setup_test_store().await;
        let player = Uuid::new_v4();

        store.set_balance(player, -1.0).await;

        assert_eq!(store.get_balance(player).await, MISSING_BALANCE);
        assert_eq!(
            store.try_get_balance(player).await.expect("Query failed"),
            Some(-1.0)
        );
        assert_eq!(
            store
                .try_get_balance(Uuid::new_v4())
                .await
                .expect("Query failed"),
            None
        );
    }

    #[tokio::test]
    async fn test_duplicate_userid_is_rejected() {
        let (_dir, store) = setup_test_store().await;
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();

        store
            .try_update_player_data(first, &PlayerData::new("First", 0.0).with_userid("shared"))
            .await
            .expect("First write failed");

        let result = store
            .try_update_player_data(second, &PlayerData::new("Second", 0.0).with_userid("shared"))
            .await;
        assert!(matches!(result, Err(StoreError::Query(_))));

        // The sentinel variant swallows the same failure.
        store
            .update_player_data(second, &PlayerData::new("Second", 0.0).with_userid("shared"))
            .await;
        assert_eq!(store.get_player_data(second).await, None);
        assert_eq!(count_rows(&store, first).await, 1);
    }

    #[tokio::test]
    async fn test_long_username_is_not_written() {
        let (_dir, store) = setup_test_store().await;
        let player = Uuid::new_v4();
        let data = PlayerData::new("this_name_is_far_too_long", 1.0);

        let result = store.try_update_player_data(player, &data).await;
        assert!(matches!(
            result,
            Err(StoreError::FieldTooLong { field: "username", .. })
        ));

        store.update_player_data(player, &data).await;
        assert_eq!(count_rows(&store, player).await, 0);
    }

    #[tokio::test]
    async fn test_disconnect_is_idempotent() {
        let (_dir, store) = setup_test_store().await;
        let player = Uuid::new_v4();
        store.set_balance(player, 12.0).await;

        store.disconnect().await;
        assert!(store.is_closed());
        store.disconnect().await;
        store.clone().disconnect().await;

        assert_eq!(store.get_balance(player).await, MISSING_BALANCE);
        assert_eq!(store.get_last_updated(player).await, MISSING_TIMESTAMP);
        assert_eq!(store.get_player_data(player).await, None);
        assert!(matches!(
            store.try_get_balance(player).await,
            Err(StoreError::Closed)
        ));
    }

    #[tokio::test]
    async fn test_in_memory_database_is_shared_across_calls() {
        let store = PlayerRecordStore::connect(&StoreConfig::new("sqlite::memory:", "", ""))
            .await
            .expect("Failed to open in-memory store");
        let player = Uuid::new_v4();

        store.set_balance(player, 8.5).await;
        store.set_balance(Uuid::new_v4(), 1.0).await;

        assert_eq!(store.get_balance(player).await, 8.5);
    }

    #[tokio::test]
    async fn test_concurrent_writers_through_clones() {
        let (_dir, store) = setup_test_store().await;
        let players: Vec<Uuid> = (0..10).map(|_| Uuid::new_v4()).collect();

        let mut tasks = Vec::new();
        for (i, player) in players.iter().copied().enumerate() {
            let store = store.clone();
            tasks.push(tokio::spawn(async move {
                store.set_balance(player, i as f64).await;
            }));
        }
        for task in tasks {
            task.await.expect("Writer task panicked");
        }

        for (i, player) in players.iter().enumerate() {
            assert_eq!(store.get_balance(*player).await, i as f64);
        }
    }
}
