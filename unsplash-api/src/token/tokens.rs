//! Access token type.

use secrecy::SecretString;
use serde::Deserialize;

use crate::scope::Scope;

/// Access token returned by the token endpoint.
///
/// `granted_scope` is the space-delimited scope string exactly as the server
/// returned it. The token response also carries `refresh_token` and `created_at`;
/// both are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessToken {
    /// Bearer value sent in the `Authorization` header.
    #[serde(rename = "access_token")]
    pub token: SecretString,
    /// Token type (usually "bearer").
    pub token_type: String,
    /// Granted scopes.
    #[serde(rename = "scope", default)]
    pub granted_scope: String,
}

impl AccessToken {
    pub fn new(token: String, token_type: String, granted_scope: String) -> Self {
        Self {
            token: SecretString::from(token),
            token_type,
            granted_scope,
        }
    }

    /// Whether the granted-scope string mentions `scope`.
    pub fn grants(&self, scope: Scope) -> bool {
        self.granted_scope.contains(scope.as_str())
    }
}
