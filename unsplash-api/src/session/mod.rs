//! The session: composition root for credentials, token, rate limit and cursor.
//!
//! A [`Session`] is `Send + Sync` and meant to be shared (`Arc<Session>`) by any
//! number of concurrent tasks. Its mutable fields are last-writer-wins and the
//! lock guarding them is never held across an `.await`.

mod auth;
mod engine;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, info, warn};

use crate::credentials::Credentials;
use crate::endpoints::{Collections, CurrentUser, Photos, Search, Users};
use crate::error::Error;
use crate::http::{HttpClient, HttpClientBuilder};
use crate::pagination::PaginationCursor;
use crate::rate_limit::RateLimitState;
use crate::scope::Scope;
use crate::store::{KeyValueStore, MemoryStore};
use crate::token::{AccessToken, TokenStore};
use crate::urls::ApiUrls;

#[derive(Debug, Default)]
struct SessionState {
    credentials: Option<Credentials>,
    token: Option<AccessToken>,
    rate_limit: RateLimitState,
    cursor: Option<PaginationCursor>,
}

/// Authenticated-request lifecycle for one application.
pub struct Session {
    client: HttpClient,
    urls: ApiUrls,
    store: Arc<dyn KeyValueStore>,
    state: Mutex<SessionState>,
    // Held for the whole duration of an authorization flow.
    flow_guard: AsyncMutex<()>,
}

/// Builder for [`Session`].
#[derive(Default)]
pub struct SessionBuilder {
    client: Option<HttpClient>,
    urls: ApiUrls,
    store: Option<Arc<dyn KeyValueStore>>,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(mut self, client: HttpClient) -> Self {
        self.client = Some(client);
        self
    }

    pub fn with_urls(mut self, urls: ApiUrls) -> Self {
        self.urls = urls;
        self
    }

    pub fn with_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Build the session. Without an explicit client a default one is built;
    /// without a store tokens live in memory only.
    pub fn build(self) -> Result<Session, Error> {
        let client = match self.client {
            Some(client) => client,
            None => HttpClientBuilder::new().build()?,
        };
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryStore::new()) as Arc<dyn KeyValueStore>);

        Ok(Session {
            client,
            urls: self.urls,
            store,
            state: Mutex::new(SessionState::default()),
            flow_guard: AsyncMutex::new(()),
        })
    }
}

impl Session {
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn urls(&self) -> &ApiUrls {
        &self.urls
    }

    /// Install credentials and seed the token from storage.
    ///
    /// No network access. Tokens stored under other application ids are left
    /// untouched. A storage failure is logged and treated as "no token".
    pub async fn configure(&self, credentials: Credentials) {
        let tokens = TokenStore::new(self.store.clone(), credentials.application_id());
        let token = match tokens.load().await {
            Ok(token) => token,
            Err(e) => {
                warn!("Failed to load stored access token: {}", e);
                None
            }
        };

        info!(
            "Configured application {} (stored token: {})",
            credentials.application_id(),
            token.is_some()
        );

        let mut state = self.state();
        state.credentials = Some(credentials);
        state.token = token;
    }

    pub fn credentials(&self) -> Option<Credentials> {
        self.state().credentials.clone()
    }

    /// Configured scopes, `[Basic]` before `configure`.
    pub fn scopes(&self) -> Vec<Scope> {
        self.state()
            .credentials
            .as_ref()
            .map(|credentials| credentials.scopes().to_vec())
            .unwrap_or_else(|| vec![Scope::Basic])
    }

    /// True when a token exists that was granted every configured scope.
    pub fn is_authenticated(&self) -> bool {
        let state = self.state();
        match &state.credentials {
            Some(credentials) => credentials.guard().is_authenticated(state.token.as_ref()),
            None => false,
        }
    }

    pub fn access_token(&self) -> Option<AccessToken> {
        self.state().token.clone()
    }

    pub fn rate_limit(&self) -> RateLimitState {
        self.state().rate_limit
    }

    /// Cursor produced by the last response that carried a `Link` header.
    pub fn pagination(&self) -> Option<PaginationCursor> {
        self.state().cursor.clone()
    }

    /// Forget the token, both in memory and in storage.
    pub async fn sign_out(&self) -> Result<(), Error> {
        let application_id = {
            let mut state = self.state();
            state.token = None;
            state
                .credentials
                .as_ref()
                .map(|credentials| credentials.application_id().to_string())
        };

        if let Some(application_id) = application_id {
            debug!("Signing out application {}", application_id);
            TokenStore::new(self.store.clone(), application_id)
                .remove()
                .await?;
        }
        Ok(())
    }

    pub(crate) async fn store_token(&self, token: AccessToken) -> Result<(), Error> {
        let application_id = {
            let mut state = self.state();
            state.token = Some(token.clone());
            state
                .credentials
                .as_ref()
                .map(|credentials| credentials.application_id().to_string())
        };

        match application_id {
            Some(application_id) => TokenStore::new(self.store.clone(), application_id)
                .save(&token)
                .await,
            None => Ok(()),
        }
    }

    pub fn photos(&self) -> Photos<'_> {
        Photos::new(self)
    }

    pub fn collections(&self) -> Collections<'_> {
        Collections::new(self)
    }

    pub fn users(&self) -> Users<'_> {
        Users::new(self)
    }

    pub fn current_user(&self) -> CurrentUser<'_> {
        CurrentUser::new(self)
    }

    pub fn search(&self) -> Search<'_> {
        Search::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn stored_token() -> AccessToken {
        AccessToken::new(
            "stored".to_string(),
            "bearer".to_string(),
            "public read_user".to_string(),
        )
    }

    #[tokio::test]
    async fn test_defaults_before_configure() {
        let session = Session::builder().build().unwrap();
        assert_eq!(session.scopes(), vec![Scope::Basic]);
        assert!(!session.is_authenticated());
        assert!(session.pagination().is_none());
        assert_eq!(session.rate_limit(), RateLimitState::default());
    }

    #[tokio::test]
    async fn test_configure_seeds_token_from_store() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        TokenStore::new(store.clone(), "app-id")
            .save(&stored_token())
            .await
            .unwrap();

        let session = Session::builder().with_store(store).build().unwrap();
        session
            .configure(Credentials::new("app-id", None, [Scope::ReadUser]))
            .await;

        assert!(session.is_authenticated());
        assert_eq!(
            session.access_token().unwrap().token.expose_secret(),
            "stored"
        );
    }

    #[tokio::test]
    async fn test_reconfigure_switches_namespace() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        TokenStore::new(store.clone(), "first")
            .save(&stored_token())
            .await
            .unwrap();

        let session = Session::builder().with_store(store.clone()).build().unwrap();
        session.configure(Credentials::new("first", None, [])).await;
        assert!(session.access_token().is_some());

        session.configure(Credentials::new("second", None, [])).await;
        assert!(session.access_token().is_none());

        // The other application's entries stay in storage.
        assert!(TokenStore::new(store, "first").load().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_not_authenticated_when_scope_missing_from_grant() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        TokenStore::new(store.clone(), "app-id")
            .save(&stored_token())
            .await
            .unwrap();

        let session = Session::builder().with_store(store).build().unwrap();
        session
            .configure(Credentials::new("app-id", None, [Scope::WriteCollections]))
            .await;

        assert!(session.access_token().is_some());
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_sign_out_clears_memory_and_store() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let tokens = TokenStore::new(store.clone(), "app-id");
        tokens.save(&stored_token()).await.unwrap();

        let session = Session::builder().with_store(store).build().unwrap();
        session
            .configure(Credentials::new("app-id", None, [Scope::ReadUser]))
            .await;
        session.sign_out().await.unwrap();

        assert!(!session.is_authenticated());
        assert!(session.access_token().is_none());
        assert!(tokens.load().await.unwrap().is_none());
    }
}
