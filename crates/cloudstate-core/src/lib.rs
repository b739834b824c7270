//! Signed single-item state persistence for CloudState.
//!
//! A state table (key to value) is kept as one DynamoDB item. Saving replaces
//! the item with `PutItem`; fetching reads it with `GetItem`. Requests are
//! signed with AWS Signature Version 4 and handed to a [`Transport`], so the
//! core stays free of any HTTP client.
//!
//! ```no_run
//! # async fn run<T: cloudstate_core::Transport>(transport: T) -> cloudstate_core::StateResult<()> {
//! use cloudstate_auth::Credentials;
//! use cloudstate_core::{StateClient, StateMap, StoreConfig};
//!
//! let credentials = Credentials::new("AKID", "secret")?;
//! let client = StateClient::new(StoreConfig::default(), credentials, transport)?;
//!
//! let mut state = StateMap::new();
//! state.insert(client.item_key("alice")?, "120");
//! client.save_state(&state).await?;
//!
//! let fetched = client.fetch_state().await?;
//! assert_eq!(fetched.get(&client.item_key("alice")?), Some("120"));
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod payload;
pub mod request;
pub mod scope;
pub mod state;
pub mod transport;

pub use client::StateClient;
pub use cloudstate_model::ItemKey;
pub use config::StoreConfig;
pub use error::{StateError, StateResult};
pub use request::{RequestBuilder, RequestEnvelope};
pub use scope::{FileOwnerScopeStore, MemoryOwnerScopeStore, OwnerScopeStore};
pub use state::StateMap;
pub use transport::{Transport, TransportError, TransportResponse};
