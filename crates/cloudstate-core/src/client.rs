//! High-level save/fetch client.

use chrono::Utc;
use cloudstate_auth::Credentials;
use cloudstate_model::{ItemKey, OWNER_SCOPE_LEN};
use tracing::{debug, info, warn};

use crate::codec::{encode_state, parse_state, rank_state};
use crate::config::StoreConfig;
use crate::error::{StateError, StateResult};
use crate::payload::{extract_data_field, service_failure};
use crate::request::{RequestBuilder, RequestEnvelope};
use crate::scope::{OwnerScopeStore, resolve_owner_scope};
use crate::state::StateMap;
use crate::transport::{Transport, TransportResponse};

/// Saves and fetches the whole state table as one remote item.
///
/// Every call issues exactly one request. Later saves overwrite earlier ones
/// unconditionally.
#[derive(Debug)]
pub struct StateClient<T> {
    config: StoreConfig,
    builder: RequestBuilder,
    transport: T,
    owner_scope: Option<String>,
}

impl<T: Transport> StateClient<T> {
    /// Create a client. Configuration problems surface here, before any
    /// request is built.
    pub fn new(config: StoreConfig, credentials: Credentials, transport: T) -> StateResult<Self> {
        let builder = RequestBuilder::new(&config, credentials)?;
        info!(
            table = %config.table_name,
            item_key = %config.item_key,
            host = %builder.host(),
            "State client initialized"
        );
        Ok(Self {
            config,
            builder,
            transport,
            owner_scope: None,
        })
    }

    /// Use `scope` as this installation's owner scope. The scope must be
    /// exactly [`OWNER_SCOPE_LEN`] characters.
    pub fn with_owner_scope(mut self, scope: impl Into<String>) -> StateResult<Self> {
        let scope = scope.into();
        check_owner_scope(&scope)?;
        self.owner_scope = Some(scope);
        Ok(self)
    }

    /// Load the owner scope from `store`, generating and saving one if absent.
    pub fn resolve_owner_scope(mut self, store: &dyn OwnerScopeStore) -> StateResult<Self> {
        self.owner_scope = Some(resolve_owner_scope(store, Utc::now())?);
        Ok(self)
    }

    /// The owner scope, if one is set.
    #[must_use]
    pub fn owner_scope(&self) -> Option<&str> {
        self.owner_scope.as_deref()
    }

    /// Client configuration.
    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Key for `local_key`, scoped to this installation when namespacing is
    /// on. Namespaced mode without an owner scope is a configuration error.
    pub fn item_key(&self, local_key: impl Into<String>) -> StateResult<ItemKey> {
        if !self.config.namespaced {
            return Ok(ItemKey::unscoped(local_key));
        }
        let scope = self.owner_scope.as_deref().ok_or_else(|| {
            StateError::Configuration("namespaced keys need an owner scope".to_owned())
        })?;
        Ok(ItemKey::new(scope, local_key))
    }

    /// Replace the remote item with `state`.
    ///
    /// In namespaced mode every key must carry a full-length owner scope, or
    /// it would be split differently when read back.
    pub async fn save_state(&self, state: &StateMap) -> StateResult<()> {
        if self.config.namespaced {
            if self.owner_scope.is_none() {
                return Err(StateError::Configuration(
                    "namespaced keys need an owner scope".to_owned(),
                ));
            }
            for key in state.keys() {
                check_owner_scope(key.owner_scope())?;
            }
        }

        let data = encode_state(state);
        let envelope = self
            .builder
            .build_put_item(&self.config.item_key, &data, Utc::now())?;

        self.send(&envelope).await?;
        info!(entries = state.len(), bytes = data.len(), "Saved state");
        Ok(())
    }

    /// Fetch the remote item and decode it. A missing item yields an empty
    /// map.
    pub async fn fetch_state(&self) -> StateResult<StateMap> {
        let state = self.read_stored(self.config.max_items).await?;
        info!(entries = state.len(), "Fetched state");

        if self.config.rank_numeric_values {
            Ok(rank_state(&state))
        } else {
            Ok(state)
        }
    }

    /// Apply `updates` on top of the stored table and save the result.
    ///
    /// The stored table is read in full and in stored order, ignoring
    /// `max_items` and ranking, so no existing entry is dropped. Returns the
    /// table that was written.
    pub async fn merge_state(&self, updates: StateMap) -> StateResult<StateMap> {
        let mut state = self.read_stored(usize::MAX).await?;
        let stored = state.len();
        state.extend(updates);
        debug!(stored, merged = state.len(), "Merged state");

        self.save_state(&state).await?;
        Ok(state)
    }

    async fn read_stored(&self, max_items: usize) -> StateResult<StateMap> {
        let envelope = self
            .builder
            .build_get_item(&self.config.item_key, Utc::now())?;
        let response = self.send(&envelope).await?;

        let Some(data) = extract_data_field(&response.body_text())? else {
            debug!(item_key = %self.config.item_key, "No stored state");
            return Ok(StateMap::new());
        };

        Ok(parse_state(&data, self.config.namespaced, max_items))
    }

    async fn send(&self, envelope: &RequestEnvelope) -> StateResult<TransportResponse> {
        let operation = envelope.operation();
        let response = self.transport.send(envelope).await.map_err(|e| {
            warn!(%operation, error = %e, "Request failed to complete");
            StateError::from(e)
        })?;

        if !response.is_success() {
            let err = service_failure(response.status, &response.body_text());
            warn!(%operation, status = %response.status, error = %err, "Store rejected request");
            return Err(err);
        }

        debug!(%operation, status = %response.status, "Request succeeded");
        Ok(response)
    }
}

fn check_owner_scope(scope: &str) -> StateResult<()> {
    if scope.chars().count() == OWNER_SCOPE_LEN {
        Ok(())
    } else {
        Err(StateError::Configuration(format!(
            "owner scope {scope:?} is not {OWNER_SCOPE_LEN} characters"
        )))
    }
}
