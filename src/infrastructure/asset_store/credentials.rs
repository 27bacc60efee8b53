use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt;
use tokio::sync::RwLock;

/// Supplies the bearer token attached to listing media API requests
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Current access token, or `None` to send the request unauthenticated
    async fn access_token(&self) -> Option<String>;
}

/// Sends every request without an `Authorization` header
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCredentials;

#[async_trait]
impl CredentialProvider for NoCredentials {
    async fn access_token(&self) -> Option<String> {
        None
    }
}

/// A fixed token, e.g. from configuration
#[derive(Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StaticToken([REDACTED])")
    }
}

#[async_trait]
impl CredentialProvider for StaticToken {
    async fn access_token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

struct CachedToken {
    access_token: String,
    expires_at: Option<DateTime<Utc>>,
}

/// A token the embedding session replaces on sign-in and clears on sign-out
#[derive(Default)]
pub struct SharedToken {
    token: RwLock<Option<CachedToken>>,
}

impl SharedToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set(&self, access_token: impl Into<String>, expires_at: Option<DateTime<Utc>>) {
        let mut token = self.token.write().await;
        *token = Some(CachedToken { access_token: access_token.into(), expires_at });
    }

    pub async fn clear(&self) {
        self.token.write().await.take();
    }
}

#[async_trait]
impl CredentialProvider for SharedToken {
    async fn access_token(&self) -> Option<String> {
        let token = self.token.read().await;
        let cached = token.as_ref()?;
        match cached.expires_at {
            Some(expires_at) if Utc::now() >= expires_at => None,
            _ => Some(cached.access_token.clone()),
        }
    }
}
