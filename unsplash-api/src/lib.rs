//! # unsplash-api
//!
//! Client-side session engine for the Unsplash REST API:
//! - OAuth 2.0 authorization-code flow driven through a consent UI capability
//! - Access token persistence over a namespaced key-value store
//! - Scope checks before privileged calls
//! - Generic typed requests with rate-limit tracking
//! - Cursor pagination from `Link` response headers
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use unsplash_api::{Credentials, FileStore, Scope, Session};
//!
//! let session = Session::builder()
//!     .with_store(Arc::new(FileStore::new("tokens.json")))
//!     .build()?;
//! session
//!     .configure(Credentials::new("access-key", Some(secret), [Scope::ReadUser]))
//!     .await;
//! session.authenticate(&consent).await?;
//! let me = session.current_user().profile().await?;
//! ```

pub mod credentials;
pub mod endpoints;
pub mod error;
pub mod http;
pub mod models;
pub mod oauth;
pub mod pagination;
pub mod rate_limit;
pub mod request;
pub mod scope;
pub mod session;
pub mod store;
pub mod token;
pub mod urls;

// Re-export commonly used types
pub use credentials::Credentials;
pub use endpoints::Pageable;
pub use error::{Error, ErrorKind};
pub use pagination::{Direction, Page, PaginationCursor};
pub use request::RequestDescriptor;
pub use scope::Scope;
pub use session::{Session, SessionBuilder};
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use token::AccessToken;
pub use urls::ApiUrls;
