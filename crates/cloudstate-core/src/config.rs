//! Store configuration.
//!
//! All configuration is driven by environment variables, with defaults that
//! target the public DynamoDB endpoint in `us-east-1`.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use cloudstate_model::operations::{DEFAULT_API_VERSION, DEFAULT_TARGET_PREFIX};
use serde::{Deserialize, Serialize};

use crate::error::{StateError, StateResult};
use crate::payload::DATA_ATTRIBUTE;

/// Configuration for the remote state item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    /// Table holding the state item.
    pub table_name: String,
    /// Partition key value addressing the state item.
    pub item_key: String,
    /// Name of the table's string partition key attribute.
    pub partition_attribute: String,
    /// AWS region.
    pub region: String,
    /// Signing service name and endpoint host prefix.
    pub service: String,
    /// Domain the endpoint host is formed under.
    pub domain: String,
    /// DynamoDB JSON API version used in `X-Amz-Target`.
    pub api_version: String,
    /// Service prefix used in `X-Amz-Target`.
    pub target_prefix: String,
    /// Explicit endpoint (e.g. `http://localhost:4566`) overriding the
    /// `https://{service}.{region}.{domain}/` template.
    pub endpoint_url: Option<String>,
    /// Maximum number of entries parsed from a fetched table.
    pub max_items: usize,
    /// Whether keys are namespaced by the installation's owner scope.
    pub namespaced: bool,
    /// Whether fetched tables are ordered by descending numeric value.
    pub rank_numeric_values: bool,
    /// Directory for locally persisted data (the owner scope).
    pub data_dir: PathBuf,
    /// Per-request timeout applied by the HTTP transport, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            table_name: "games_state".to_owned(),
            item_key: "default".to_owned(),
            partition_attribute: "game_id".to_owned(),
            region: "us-east-1".to_owned(),
            service: "dynamodb".to_owned(),
            domain: "amazonaws.com".to_owned(),
            api_version: DEFAULT_API_VERSION.to_owned(),
            target_prefix: DEFAULT_TARGET_PREFIX.to_owned(),
            endpoint_url: None,
            max_items: usize::MAX,
            namespaced: false,
            rank_numeric_values: true,
            data_dir: PathBuf::from(".cloudstate"),
            request_timeout_secs: 30,
        }
    }
}

impl StoreConfig {
    /// Create configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = env::var("CLOUDSTATE_TABLE") {
            config.table_name = v;
        }
        if let Ok(v) = env::var("CLOUDSTATE_ITEM_KEY") {
            config.item_key = v;
        }
        if let Ok(v) = env::var("CLOUDSTATE_PARTITION_ATTRIBUTE") {
            config.partition_attribute = v;
        }
        if let Ok(v) = env::var("DEFAULT_REGION").or_else(|_| env::var("AWS_REGION")) {
            config.region = v;
        }
        if let Ok(v) = env::var("CLOUDSTATE_SERVICE") {
            config.service = v;
        }
        if let Ok(v) = env::var("CLOUDSTATE_DOMAIN") {
            config.domain = v;
        }
        if let Ok(v) = env::var("CLOUDSTATE_API_VERSION") {
            config.api_version = v;
        }
        if let Ok(v) = env::var("CLOUDSTATE_ENDPOINT_URL") {
            config.endpoint_url = Some(v);
        }
        if let Some(v) = env_parse("CLOUDSTATE_MAX_ITEMS") {
            config.max_items = v;
        }
        config.namespaced = env_bool("CLOUDSTATE_NAMESPACED", config.namespaced);
        config.rank_numeric_values = env_bool("CLOUDSTATE_RANK", config.rank_numeric_values);
        if let Ok(v) = env::var("CLOUDSTATE_DATA_DIR") {
            config.data_dir = PathBuf::from(v);
        }
        if let Some(v) = env_parse("CLOUDSTATE_TIMEOUT_SECS") {
            config.request_timeout_secs = v;
        }

        config
    }

    /// Check that every value needed to address and sign a request is set.
    pub fn validate(&self) -> StateResult<()> {
        for (name, value) in [
            ("table name", &self.table_name),
            ("item key", &self.item_key),
            ("partition attribute", &self.partition_attribute),
            ("region", &self.region),
            ("service", &self.service),
            ("api version", &self.api_version),
            ("target prefix", &self.target_prefix),
        ] {
            if value.trim().is_empty() {
                return Err(StateError::Configuration(format!("{name} must not be empty")));
            }
        }

        if self.partition_attribute == DATA_ATTRIBUTE {
            return Err(StateError::Configuration(format!(
                "partition attribute must not be {DATA_ATTRIBUTE}"
            )));
        }

        self.endpoint().map(|_| ())
    }

    /// The endpoint every request is posted to.
    ///
    /// Requests are always signed for the root path, so an override must not
    /// carry a path or query.
    pub fn endpoint(&self) -> StateResult<http::Uri> {
        let raw = self.endpoint_url.clone().unwrap_or_else(|| {
            format!("https://{}.{}.{}/", self.service, self.region, self.domain)
        });

        let uri: http::Uri = raw
            .parse()
            .map_err(|e| StateError::Configuration(format!("invalid endpoint {raw}: {e}")))?;

        if uri.scheme().is_none() || uri.authority().is_none() {
            return Err(StateError::Configuration(format!(
                "endpoint {raw} must include a scheme and host"
            )));
        }
        if !matches!(uri.path(), "" | "/") || uri.query().is_some() {
            return Err(StateError::Configuration(format!(
                "endpoint {raw} must not include a path or query"
            )));
        }

        Ok(uri)
    }

    /// The per-request timeout.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Where the owner scope is persisted.
    #[must_use]
    pub fn owner_scope_path(&self) -> PathBuf {
        self.data_dir.join("owner_scope.json")
    }
}

fn env_bool(key: &str, default: bool) -> bool {
    env::var(key).map_or(default, |v| {
        matches!(v.as_str(), "1" | "true" | "yes" | "TRUE" | "YES")
    })
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
