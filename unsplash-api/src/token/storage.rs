//! Durable mirror of the session's access token.

use std::sync::Arc;

use secrecy::ExposeSecret;
use tracing::debug;

use super::AccessToken;
use crate::error::Error;
use crate::store::KeyValueStore;

const TOKEN_KEY: &str = "token";
const TOKEN_TYPE_KEY: &str = "token_type";
const SCOPE_KEY: &str = "scope";

/// Persists one access token under a namespace derived from the application id.
///
/// The token is written as three separate entries (`token`, `token_type`,
/// `scope`). A token is only considered present when all three are found.
#[derive(Clone)]
pub struct TokenStore {
    store: Arc<dyn KeyValueStore>,
    namespace: String,
}

impl TokenStore {
    /// Create a token store.
    ///
    /// # Arguments
    ///
    /// * `store` - Backing key-value capability
    /// * `namespace` - The application id the token belongs to
    pub fn new(store: Arc<dyn KeyValueStore>, namespace: impl Into<String>) -> Self {
        Self {
            store,
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub async fn save(&self, token: &AccessToken) -> Result<(), Error> {
        debug!("Persisting access token for namespace {}", self.namespace);
        self.store
            .set(&self.namespace, TOKEN_KEY, token.token.expose_secret())
            .await?;
        self.store
            .set(&self.namespace, TOKEN_TYPE_KEY, &token.token_type)
            .await?;
        self.store
            .set(&self.namespace, SCOPE_KEY, &token.granted_scope)
            .await?;
        Ok(())
    }

    pub async fn load(&self) -> Result<Option<AccessToken>, Error> {
        let token = self.store.get(&self.namespace, TOKEN_KEY).await?;
        let token_type = self.store.get(&self.namespace, TOKEN_TYPE_KEY).await?;
        let scope = self.store.get(&self.namespace, SCOPE_KEY).await?;

        match (token, token_type, scope) {
            (Some(token), Some(token_type), Some(scope)) => {
                Ok(Some(AccessToken::new(token, token_type, scope)))
            }
            _ => Ok(None),
        }
    }

    pub async fn remove(&self) -> Result<(), Error> {
        debug!("Removing access token for namespace {}", self.namespace);
        for key in [TOKEN_KEY, TOKEN_TYPE_KEY, SCOPE_KEY] {
            self.store.remove(&self.namespace, key).await?;
        }
        Ok(())
    }
}
