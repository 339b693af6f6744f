//! Permission scopes and the client-side scope guard.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, ErrorKind};
use crate::token::AccessToken;

/// Permission scopes a user can grant to the application.
///
/// To write data on behalf of a user or to access their private data, additional
/// scopes must be requested on top of [`Scope::Basic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// Read public data.
    #[serde(rename = "public")]
    Basic,
    /// Access the user's private data.
    ReadUser,
    /// Update the user's profile.
    WriteUser,
    /// Read private data from the user's photos.
    ReadPhotos,
    /// Update photos on the user's behalf.
    WritePhotos,
    /// Like or unlike a photo on the user's behalf.
    WriteLikes,
    /// Follow or unfollow a user on the user's behalf.
    WriteFollowers,
    /// View the user's private collections.
    ReadCollections,
    /// Create and update the user's collections.
    WriteCollections,
}

impl Scope {
    /// Get the raw scope name used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Basic => "public",
            Scope::ReadUser => "read_user",
            Scope::WriteUser => "write_user",
            Scope::ReadPhotos => "read_photos",
            Scope::WritePhotos => "write_photos",
            Scope::WriteLikes => "write_likes",
            Scope::WriteFollowers => "write_followers",
            Scope::ReadCollections => "read_collections",
            Scope::WriteCollections => "write_collections",
        }
    }

    /// Every scope, in declaration order.
    pub fn all() -> [Scope; 9] {
        [
            Scope::Basic,
            Scope::ReadUser,
            Scope::WriteUser,
            Scope::ReadPhotos,
            Scope::WritePhotos,
            Scope::WriteLikes,
            Scope::WriteFollowers,
            Scope::ReadCollections,
            Scope::WriteCollections,
        ]
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct ScopeParseError(pub String);

impl fmt::Display for ScopeParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unknown permission scope: {}", self.0)
    }
}

impl std::error::Error for ScopeParseError {}

impl FromStr for Scope {
    type Err = ScopeParseError;

    fn from_str(value: &str) -> Result<Scope, Self::Err> {
        let normalized = value.trim().to_lowercase();
        if normalized == "basic" {
            return Ok(Scope::Basic);
        }
        Scope::all()
            .into_iter()
            .find(|scope| scope.as_str() == normalized)
            .ok_or_else(|| ScopeParseError(value.to_string()))
    }
}

/// Pure predicates over a configured scope set.
#[derive(Debug, Clone, Copy)]
pub struct ScopeGuard<'a> {
    scopes: &'a [Scope],
}

impl<'a> ScopeGuard<'a> {
    pub fn new(scopes: &'a [Scope]) -> Self {
        Self { scopes }
    }

    /// True when a token exists and its granted-scope string mentions every
    /// configured scope.
    ///
    /// The check is substring containment against the space-delimited string the
    /// server returned, not set equality.
    pub fn is_authenticated(&self, token: Option<&AccessToken>) -> bool {
        match token {
            Some(token) => self
                .scopes
                .iter()
                .all(|scope| token.granted_scope.contains(scope.as_str())),
            None => false,
        }
    }

    /// Fails with `ScopeRequired` unless `scope` is part of the configured set.
    ///
    /// Independent of what the current token actually carries.
    pub fn require(&self, scope: Scope) -> Result<(), Error> {
        if self.scopes.contains(&scope) {
            Ok(())
        } else {
            Err(ErrorKind::ScopeRequired(scope).into())
        }
    }
}
