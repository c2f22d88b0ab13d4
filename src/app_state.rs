use std::sync::Arc;

use crate::{
    config::Config,
    session::{CredentialVerifier, FixedCredentials, SessionRegistry},
    store::ContentStore,
};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ContentStore>,
    pub sessions: Arc<SessionRegistry>,
    pub verifier: Arc<dyn CredentialVerifier>,
    pub config: Config,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = ContentStore::connect(&config.database.url).await?;

        Ok(Self {
            store: Arc::new(store),
            sessions: Arc::new(SessionRegistry::new()),
            verifier: Arc::new(FixedCredentials::from(&config.admin)),
            config,
        })
    }

    /// State wired to an in-memory store, for tests.
    pub async fn in_memory(config: Config) -> anyhow::Result<Self> {
        let store = ContentStore::in_memory().await?;

        Ok(Self {
            store: Arc::new(store),
            sessions: Arc::new(SessionRegistry::new()),
            verifier: Arc::new(FixedCredentials::from(&config.admin)),
            config,
        })
    }
}
