use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::config::AdminConfig;
use crate::error::{AppError, AppResult};

/// Decides whether a username/password pair grants admin rights. The shipped
/// implementation is a fixed pair; swapping in a real backend only requires
/// another implementor.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn verify(&self, username: &str, password: &str) -> bool;
}

/// Exact match against one configured credential pair.
pub struct FixedCredentials {
    username: String,
    password: String,
}

impl FixedCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl From<&AdminConfig> for FixedCredentials {
    fn from(admin: &AdminConfig) -> Self {
        Self::new(admin.username.clone(), admin.password.clone())
    }
}

#[async_trait]
impl CredentialVerifier for FixedCredentials {
    async fn verify(&self, username: &str, password: &str) -> bool {
        username == self.username && password == self.password
    }
}

/// Per-visit admin flag. Starts false; login is the only transition to true,
/// logout the only one back.
#[derive(Debug, Clone, Default)]
pub struct Session {
    is_admin: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    /// Sets the admin flag if the verifier accepts the pair. A mismatch
    /// leaves the session unchanged and reports `Unauthorized`.
    pub async fn login(
        &mut self,
        verifier: &dyn CredentialVerifier,
        username: &str,
        password: &str,
    ) -> AppResult<()> {
        if verifier.verify(username, password).await {
            self.is_admin = true;
            Ok(())
        } else {
            Err(AppError::Unauthorized(
                "invalid username or password".to_string(),
            ))
        }
    }

    pub fn logout(&mut self) {
        self.is_admin = false;
    }
}

/// In-memory sessions keyed by opaque token. Nothing here survives a restart;
/// a session exists only between a successful login and the matching logout.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<Uuid, Session>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs the login transition on a fresh session and, on success, stores
    /// it under a newly minted token.
    pub async fn login(
        &self,
        verifier: &dyn CredentialVerifier,
        username: &str,
        password: &str,
    ) -> AppResult<Uuid> {
        let mut session = Session::new();
        session.login(verifier, username, password).await?;

        let token = Uuid::new_v4();
        self.sessions.lock().await.insert(token, session);
        Ok(token)
    }

    /// Unconditional: an unknown token is already logged out.
    pub async fn logout(&self, token: Uuid) {
        self.sessions.lock().await.remove(&token);
    }

    pub async fn is_admin(&self, token: Uuid) -> bool {
        self.sessions
            .lock()
            .await
            .get(&token)
            .map(Session::is_admin)
            .unwrap_or(false)
    }
}
