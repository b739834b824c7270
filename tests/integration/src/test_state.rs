//! Save/fetch round trips against a running endpoint.

#[cfg(test)]
mod tests {
    use cloudstate_core::{FileOwnerScopeStore, StateError, StateMap, StoreConfig};

    use crate::{cleanup_table, create_state_table, state_client, test_config};

    #[tokio::test]
    #[ignore = "requires a running DynamoDB-compatible endpoint"]
    async fn test_should_save_and_fetch_ranked_state() {
        let table = create_state_table("rank").await;
        let client = state_client(test_config(&table, "level-1"));

        let mut state = StateMap::new();
        state.insert(client.item_key("bob").unwrap(), "95");
        state.insert(client.item_key("alice").unwrap(), "120");
        state.insert(client.item_key("carol").unwrap(), "70");
        client.save_state(&state).await.unwrap();

        let fetched = client.fetch_state().await.unwrap();
        let rows: Vec<_> = fetched
            .iter()
            .map(|(k, v)| format!("{}={v}", k.flat_key()))
            .collect();
        assert_eq!(rows, vec!["alice=120", "bob=95", "carol=70"]);

        cleanup_table(&table).await;
    }

    #[tokio::test]
    #[ignore = "requires a running DynamoDB-compatible endpoint"]
    async fn test_should_fetch_empty_state_for_missing_item() {
        let table = create_state_table("empty").await;
        let client = state_client(test_config(&table, "never-written"));

        assert!(client.fetch_state().await.unwrap().is_empty());

        cleanup_table(&table).await;
    }

    #[tokio::test]
    #[ignore = "requires a running DynamoDB-compatible endpoint"]
    async fn test_should_overwrite_previous_state() {
        let table = create_state_table("overwrite").await;
        let client = state_client(test_config(&table, "level-1"));

        let mut first = StateMap::new();
        first.insert(client.item_key("alice").unwrap(), "1");
        client.save_state(&first).await.unwrap();

        let mut second = StateMap::new();
        second.insert(client.item_key("bob").unwrap(), "2");
        client.save_state(&second).await.unwrap();

        let fetched = client.fetch_state().await.unwrap();
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched.get(&client.item_key("bob").unwrap()), Some("2"));

        cleanup_table(&table).await;
    }

    #[tokio::test]
    #[ignore = "requires a running DynamoDB-compatible endpoint"]
    async fn test_should_round_trip_namespaced_keys() {
        let table = create_state_table("scope").await;
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig {
            namespaced: true,
            data_dir: dir.path().to_path_buf(),
            ..test_config(&table, "level-1")
        };
        let store = FileOwnerScopeStore::new(config.owner_scope_path());
        let client = state_client(config).resolve_owner_scope(&store).unwrap();
        let scope = client.owner_scope().unwrap().to_owned();

        let mut state = StateMap::new();
        state.insert(client.item_key("alice").unwrap(), "5");
        client.save_state(&state).await.unwrap();

        let fetched = client.fetch_state().await.unwrap();
        let (key, value) = fetched.iter().next().unwrap();
        assert_eq!(key.owner_scope(), scope);
        assert_eq!(key.local_key(), "alice");
        assert_eq!(value, "5");

        cleanup_table(&table).await;
    }

    #[tokio::test]
    #[ignore = "requires a running DynamoDB-compatible endpoint"]
    async fn test_should_merge_without_dropping_entries_past_max_items() {
        let table = create_state_table("merge").await;
        let config = StoreConfig {
            max_items: 2,
            ..test_config(&table, "level-1")
        };
        let client = state_client(config);

        let mut stored = StateMap::new();
        for (key, value) in [("a", "5"), ("b", "4"), ("c", "3"), ("d", "2")] {
            stored.insert(client.item_key(key).unwrap(), value);
        }
        client.save_state(&stored).await.unwrap();

        let mut updates = StateMap::new();
        updates.insert(client.item_key("e").unwrap(), "1");
        assert_eq!(client.merge_state(updates).await.unwrap().len(), 5);

        let fetched = client.fetch_state().await.unwrap();
        let keys: Vec<_> = fetched.keys().map(|k| k.flat_key()).collect();
        assert_eq!(keys, vec!["a", "b"]);

        cleanup_table(&table).await;
    }

    #[tokio::test]
    #[ignore = "requires a running DynamoDB-compatible endpoint"]
    async fn test_should_report_missing_table() {
        let client = state_client(test_config("test-does-not-exist", "level-1"));

        let err = client.fetch_state().await.unwrap_err();
        match err {
            StateError::Transport { status, code, .. } => {
                assert_eq!(status.as_u16(), 400);
                assert_eq!(code.as_deref(), Some("ResourceNotFoundException"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
