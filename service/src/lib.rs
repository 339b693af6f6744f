use config::Config;
use log::info;
use std::sync::Arc;
use unsplash_api::http::HttpClientBuilder;
use unsplash_api::{Error, FileStore, KeyValueStore, Session};

pub mod config;
pub mod logging;

/// Builds a session from the configuration and loads any persisted token.
///
/// Tokens live in a [`FileStore`] at the configured path, encrypted when a key is
/// configured. Without an application id the session is returned unconfigured.
pub async fn init_session(config: &Config) -> Result<Session, Error> {
    info!(
        "Session config: api_base={}, token_store={}, encrypted={}, timeout={}s",
        config.api_urls().api_base,
        config.token_store_path().display(),
        config.token_encryption_key().is_some(),
        config.request_timeout_secs,
    );

    let store: Arc<dyn KeyValueStore> = match config.token_encryption_key() {
        Some(key) => Arc::new(FileStore::encrypted(config.token_store_path(), key)?),
        None => Arc::new(FileStore::new(config.token_store_path())),
    };
    let client = HttpClientBuilder::new()
        .with_timeout(config.request_timeout())
        .build()?;

    let session = Session::builder()
        .with_client(client)
        .with_urls(config.api_urls())
        .with_store(store)
        .build()?;

    if let Some(credentials) = config.credentials() {
        session.configure(credentials).await;
    }

    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use unsplash_api::error::{ErrorKind, StorageErrorKind};

    #[tokio::test]
    async fn test_init_session_configures_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::parse_from(["unsplasher", "--application-id", "app-id"])
            .set_token_store_path(dir.path().join("tokens.json"));

        let session = init_session(&config).await.unwrap();

        let credentials = session.credentials().unwrap();
        assert_eq!(credentials.application_id(), "app-id");
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_init_session_without_application_id_is_unconfigured() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::parse_from(["unsplasher"])
            .set_token_store_path(dir.path().join("tokens.json"));

        let session = init_session(&config).await.unwrap();
        assert!(session.credentials().is_none());
    }

    #[tokio::test]
    async fn test_init_session_rejects_bad_encryption_key() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::parse_from(["unsplasher", "--token-encryption-key", "not-hex"])
            .set_token_store_path(dir.path().join("tokens.json"));

        let err = init_session(&config).await.err().unwrap();
        assert_eq!(
            err.error_kind,
            ErrorKind::Storage(StorageErrorKind::EncryptionFailed)
        );
    }
}
