//! Application credentials and requested scopes.

use secrecy::SecretString;

use crate::scope::{Scope, ScopeGuard};

/// Application identifier, shared secret and the requested permission scopes.
///
/// The scope list always contains [`Scope::Basic`]; it is inserted at the front
/// when the caller leaves it out. Duplicates are collapsed, keeping the first one.
#[derive(Debug, Clone)]
pub struct Credentials {
    application_id: String,
    secret: Option<SecretString>,
    scopes: Vec<Scope>,
}

impl Credentials {
    /// Create credentials for an application.
    ///
    /// # Arguments
    ///
    /// * `application_id` - The application's access key
    /// * `secret` - The application's secret key, needed to exchange authorization codes
    /// * `scopes` - Permission scopes to request from the user
    pub fn new(
        application_id: impl Into<String>,
        secret: Option<String>,
        scopes: impl IntoIterator<Item = Scope>,
    ) -> Self {
        let mut requested: Vec<Scope> = Vec::new();
        for scope in scopes {
            if !requested.contains(&scope) {
                requested.push(scope);
            }
        }
        if !requested.contains(&Scope::Basic) {
            requested.insert(0, Scope::Basic);
        }

        Self {
            application_id: application_id.into(),
            secret: secret.map(SecretString::from),
            scopes: requested,
        }
    }

    pub fn application_id(&self) -> &str {
        &self.application_id
    }

    pub fn secret(&self) -> Option<&SecretString> {
        self.secret.as_ref()
    }

    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    pub fn guard(&self) -> ScopeGuard<'_> {
        ScopeGuard::new(&self.scopes)
    }

    /// Redirect URI the consent page sends the user back to, e.g.
    /// `unsplash-<application id>://token`.
    pub fn redirect_uri(&self, callback_scheme: &str) -> String {
        format!("{}-{}://token", callback_scheme, self.application_id)
    }

    /// Scope list in the `+`-joined form the authorize endpoint expects.
    pub fn scope_param(&self) -> String {
        self.scopes
            .iter()
            .map(Scope::as_str)
            .collect::<Vec<_>>()
            .join("+")
    }
}
