use std::sync::Arc;
use tokio::sync::RwLock;

use crate::clients::fx::FxRateCache;
use crate::clients::oauth::SessionIdentityClient;
use crate::config::Config;
use crate::db::Store;
use crate::services::documents::DocumentStore;
use crate::services::ledger::LedgerService;

/// Build a shared HTTP client with reasonable defaults for API calls.
/// Reused across all outbound collaborators to enable connection pooling
/// and avoid socket exhaustion.
fn build_shared_http_client(timeout_seconds: u64) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_seconds))
        .user_agent("VoltFund/1.0")
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub ledger: LedgerService,

    pub fx: Arc<FxRateCache>,

    pub oauth: SessionIdentityClient,

    pub documents: DocumentStore,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        config.validate()?;

        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let http_client = build_shared_http_client(config.fx.request_timeout_seconds)?;

        let fx = Arc::new(FxRateCache::new(&config.fx, http_client.clone()));
        let oauth = SessionIdentityClient::new(http_client, config.auth.oauth_session_url.clone());
        let documents = DocumentStore::new(config.uploads.path.clone());
        let ledger = LedgerService::new(store.conn.clone());

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            store,
            ledger,
            fx,
            oauth,
            documents,
        })
    }
}
