use reqwest::Method;
use secrecy::ExposeSecret;
use tracing::{info, warn};
use url::Url;

use super::Session;
use crate::credentials::Credentials;
use crate::error::{oauth_error, Error, ErrorKind, HttpErrorKind, OAuthErrorKind};
use crate::oauth::{AuthorizationFlow, ConsentEvent, ConsentUi, Navigation};
use crate::request::{RequestDescriptor, Target};
use crate::token::AccessToken;

impl Session {
    /// Obtain an access token through the consent UI.
    ///
    /// Returns immediately when the session is already authenticated. Only one
    /// flow may run per session; a second concurrent call fails with
    /// `OAuth(InProgress)`. The consent UI is dismissed once the flow ends.
    pub async fn authenticate(&self, consent: &dyn ConsentUi) -> Result<(), Error> {
        if self.is_authenticated() {
            return Ok(());
        }

        let _running = self
            .flow_guard
            .try_lock()
            .map_err(|_| Error::from(ErrorKind::OAuth(OAuthErrorKind::InProgress)))?;

        let credentials = self
            .credentials()
            .filter(|credentials| !credentials.application_id().is_empty())
            .ok_or_else(|| {
                oauth_error(
                    OAuthErrorKind::AuthorizationFailed,
                    "credentials are not configured",
                )
            })?;

        let mut flow = AuthorizationFlow::new(&credentials, &self.urls);
        let result = self.run_flow(&mut flow, &credentials, consent).await;
        consent.dismiss().await;

        match &result {
            Ok(()) => info!("Authenticated application {}", credentials.application_id()),
            Err(e) => warn!("Authentication ended in {:?}: {}", flow.state(), e),
        }
        result
    }

    async fn run_flow(
        &self,
        flow: &mut AuthorizationFlow,
        credentials: &Credentials,
        consent: &dyn ConsentUi,
    ) -> Result<(), Error> {
        let request = flow.present();
        if let Err(e) = consent.open(&request).await {
            flow.fail();
            return Err(e);
        }
        flow.loading();

        let code = loop {
            match consent.next_event().await {
                ConsentEvent::Cancelled => return Err(flow.cancel()),
                ConsentEvent::Navigated(url) => match flow.navigate(&url)? {
                    Navigation::Follow => continue,
                    Navigation::Intercept(code) => break code,
                },
            }
        };

        match self
            .exchange_code(credentials, flow.redirect_uri(), &code)
            .await
        {
            Ok(()) => {
                flow.complete();
                Ok(())
            }
            Err(e) => {
                flow.fail();
                Err(e)
            }
        }
    }

    /// Trade an authorization code for an access token and keep it.
    ///
    /// The token is set on the session first, then persisted; a persistence
    /// failure is returned to the caller.
    pub async fn exchange_code(
        &self,
        credentials: &Credentials,
        redirect_uri: &str,
        code: &str,
    ) -> Result<(), Error> {
        let secret = credentials
            .secret()
            .ok_or(ErrorKind::CredentialsMissing)?;
        let token_url = Url::parse(&self.urls.token_url()).map_err(|e| Error {
            source: Some(Box::new(e)),
            error_kind: ErrorKind::Http(HttpErrorKind::InvalidUrl),
        })?;

        let descriptor = RequestDescriptor::new(Method::POST, Target::Url(token_url))
            .form()
            .with_secret()
            .without_headers()
            .param("grant_type", "authorization_code")
            .param("client_id", credentials.application_id())
            .param("client_secret", secret.expose_secret())
            .param("redirect_uri", redirect_uri)
            .param("code", code);

        let token: AccessToken = self.request(descriptor).await?;
        self.store_token(token).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mockito::{Matcher, Server};
    use secrecy::ExposeSecret;

    use crate::credentials::Credentials;
    use crate::error::{ErrorKind, OAuthErrorKind};
    use crate::oauth::ChannelConsent;
    use crate::scope::Scope;
    use crate::session::Session;
    use crate::store::{KeyValueStore, MemoryStore};
    use crate::token::{AccessToken, TokenStore};
    use crate::urls::ApiUrls;

    const TOKEN_BODY: &str = r#"{
        "access_token": "fresh-token",
        "token_type": "bearer",
        "scope": "public write_collections",
        "created_at": 1436544465
    }"#;

    async fn session_for(server: &Server, store: Arc<dyn KeyValueStore>) -> Session {
        let urls = ApiUrls::new(server.url(), format!("{}/oauth", server.url()));
        let session = Session::builder()
            .with_urls(urls)
            .with_store(store)
            .build()
            .unwrap();
        session
            .configure(Credentials::new(
                "app-id",
                Some("app-secret".to_string()),
                [Scope::WriteCollections],
            ))
            .await;
        session
    }

    #[tokio::test]
    async fn test_authenticate_exchanges_code_and_persists_token() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/oauth/token")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("grant_type".into(), "authorization_code".into()),
                Matcher::UrlEncoded("client_id".into(), "app-id".into()),
                Matcher::UrlEncoded("client_secret".into(), "app-secret".into()),
                Matcher::UrlEncoded("redirect_uri".into(), "unsplash-app-id://token".into()),
                Matcher::UrlEncoded("code".into(), "auth-code".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(TOKEN_BODY)
            .create_async()
            .await;

        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let session = session_for(&server, store.clone()).await;
        assert!(!session.is_authenticated());

        let (consent, handle) = ChannelConsent::new();
        handle.navigate("https://unsplash.com/login");
        handle.navigate("unsplash-app-id://token?code=auth-code");

        session.authenticate(&consent).await.unwrap();

        assert!(session.is_authenticated());
        assert!(handle.is_dismissed());
        let presented = handle.presented().unwrap();
        assert!(presented.url.starts_with(&format!("{}/oauth/authorize?", server.url())));
        assert_eq!(presented.callback_prefix, "unsplash-app-id://token");

        let stored = TokenStore::new(store, "app-id").load().await.unwrap().unwrap();
        assert_eq!(stored.token.expose_secret(), "fresh-token");
        assert_eq!(stored.granted_scope, "public write_collections");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_authenticate_is_noop_when_already_authenticated() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/oauth/token")
            .expect(0)
            .create_async()
            .await;

        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        TokenStore::new(store.clone(), "app-id")
            .save(&AccessToken::new(
                "stored".into(),
                "bearer".into(),
                "public write_collections".into(),
            ))
            .await
            .unwrap();
        let session = session_for(&server, store).await;

        let (consent, handle) = ChannelConsent::new();
        session.authenticate(&consent).await.unwrap();

        assert!(handle.presented().is_none());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_cancel_ends_flow_without_token() {
        let server = Server::new_async().await;
        let session = session_for(&server, Arc::new(MemoryStore::new())).await;

        let (consent, handle) = ChannelConsent::new();
        handle.navigate("https://unsplash.com/login");
        handle.cancel();

        let err = session.authenticate(&consent).await.unwrap_err();
        assert_eq!(err.error_kind, ErrorKind::OAuth(OAuthErrorKind::Cancelled));
        assert_eq!(err.to_string(), "User has cancelled authentication process.");
        assert!(handle.is_dismissed());
        assert!(session.access_token().is_none());
    }

    #[tokio::test]
    async fn test_redirect_without_code_fails() {
        let server = Server::new_async().await;
        let session = session_for(&server, Arc::new(MemoryStore::new())).await;

        let (consent, handle) = ChannelConsent::new();
        handle.navigate("unsplash-app-id://token?error=access_denied");

        let err = session.authenticate(&consent).await.unwrap_err();
        assert_eq!(
            err.error_kind,
            ErrorKind::OAuth(OAuthErrorKind::AuthorizationFailed)
        );
    }

    #[tokio::test]
    async fn test_rejected_exchange_propagates_description() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/oauth/token")
            .with_status(401)
            .with_body(
                r#"{"error": "invalid_grant", "error_description": "The provided authorization grant is invalid"}"#,
            )
            .create_async()
            .await;

        let session = session_for(&server, Arc::new(MemoryStore::new())).await;
        let (consent, handle) = ChannelConsent::new();
        handle.navigate("unsplash-app-id://token?code=stale");

        let err = session.authenticate(&consent).await.unwrap_err();
        assert_eq!(
            err.error_kind,
            ErrorKind::Request("The provided authorization grant is invalid".to_string())
        );
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_concurrent_authenticate_rejected() {
        let server = Server::new_async().await;
        let session = Arc::new(session_for(&server, Arc::new(MemoryStore::new())).await);

        let (first_consent, first_handle) = ChannelConsent::new();
        let running = {
            let session = session.clone();
            tokio::spawn(async move { session.authenticate(&first_consent).await })
        };

        // Wait until the first flow has opened its consent UI.
        while first_handle.presented().is_none() {
            tokio::task::yield_now().await;
        }

        let (second_consent, _second_handle) = ChannelConsent::new();
        let err = session.authenticate(&second_consent).await.unwrap_err();
        assert_eq!(err.error_kind, ErrorKind::OAuth(OAuthErrorKind::InProgress));

        first_handle.cancel();
        let first = running.await.unwrap().unwrap_err();
        assert_eq!(first.error_kind, ErrorKind::OAuth(OAuthErrorKind::Cancelled));
    }

    #[tokio::test]
    async fn test_authenticate_without_application_id_fails() {
        let server = Server::new_async().await;
        let session = Session::builder()
            .with_urls(ApiUrls::new(server.url(), server.url()))
            .build()
            .unwrap();

        let (consent, handle) = ChannelConsent::new();
        let err = session.authenticate(&consent).await.unwrap_err();
        assert_eq!(
            err.error_kind,
            ErrorKind::OAuth(OAuthErrorKind::AuthorizationFailed)
        );
        assert!(handle.presented().is_none());
    }
}
