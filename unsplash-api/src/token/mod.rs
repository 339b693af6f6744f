//! Access tokens and their persistence.

mod storage;
mod tokens;

pub use storage::TokenStore;
pub use tokens::AccessToken;
