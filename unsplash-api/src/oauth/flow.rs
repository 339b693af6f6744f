//! Authorization-code state machine.
//!
//! ```text
//! Idle -> Presenting -> AwaitingRedirect -> Exchanging -> Authenticated
//!                                                      \-> Failed
//! any non-terminal state -> Cancelled
//! ```

use tracing::debug;
use url::form_urlencoded;

use crate::credentials::Credentials;
use crate::error::{oauth_error, Error, OAuthErrorKind};
use crate::urls::ApiUrls;

/// Where the flow currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    Presenting,
    AwaitingRedirect,
    Exchanging,
    Authenticated,
    Failed,
    Cancelled,
}

impl FlowState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            FlowState::Authenticated | FlowState::Failed | FlowState::Cancelled
        )
    }
}

/// What the consent UI is asked to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationRequest {
    /// Consent page URL to load.
    pub url: String,
    /// Navigations starting with this prefix must be intercepted, not loaded.
    pub callback_prefix: String,
}

/// Decision for one navigation of the consent UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Not the redirect; let the UI load it.
    Follow,
    /// The redirect, carrying the authorization code.
    Intercept(String),
}

/// One run of the authorization-code flow.
#[derive(Debug, Clone)]
pub struct AuthorizationFlow {
    request: AuthorizationRequest,
    redirect_uri: String,
    state: FlowState,
}

impl AuthorizationFlow {
    pub fn new(credentials: &Credentials, urls: &ApiUrls) -> Self {
        let redirect_uri = credentials.redirect_uri(&urls.callback_scheme);
        let url = format!(
            "{}?client_id={}&response_type=code&redirect_uri={}&scope={}",
            urls.authorize_url(),
            urlencoding::encode(credentials.application_id()),
            urlencoding::encode(&redirect_uri),
            credentials.scope_param(),
        );

        Self {
            request: AuthorizationRequest {
                url,
                callback_prefix: redirect_uri.clone(),
            },
            redirect_uri,
            state: FlowState::Idle,
        }
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    pub fn request(&self) -> &AuthorizationRequest {
        &self.request
    }

    /// `Idle -> Presenting`. Returns what the consent UI must show.
    pub fn present(&mut self) -> AuthorizationRequest {
        if self.state == FlowState::Idle {
            self.state = FlowState::Presenting;
        }
        self.request.clone()
    }

    /// `Presenting -> AwaitingRedirect`, once the UI starts loading.
    pub fn loading(&mut self) {
        if self.state == FlowState::Presenting {
            self.state = FlowState::AwaitingRedirect;
        }
    }

    /// Inspect a navigation of the consent UI.
    ///
    /// A navigation starting with the callback prefix moves the flow to
    /// `Exchanging` when it carries a `code` query parameter, and to `Failed`
    /// otherwise. Anything else keeps the flow in `AwaitingRedirect`.
    pub fn navigate(&mut self, url: &str) -> Result<Navigation, Error> {
        self.loading();

        if self.state != FlowState::AwaitingRedirect {
            return Ok(Navigation::Follow);
        }

        if !url.starts_with(&self.request.callback_prefix) {
            return Ok(Navigation::Follow);
        }

        debug!("Intercepted authorization redirect");
        match extract_code(url) {
            Some(code) => {
                self.state = FlowState::Exchanging;
                Ok(Navigation::Intercept(code))
            }
            None => {
                self.state = FlowState::Failed;
                Err(oauth_error(
                    OAuthErrorKind::AuthorizationFailed,
                    "redirect did not carry an authorization code",
                ))
            }
        }
    }

    /// Move to `Cancelled` from any non-terminal state.
    pub fn cancel(&mut self) -> Error {
        if !self.state.is_terminal() {
            self.state = FlowState::Cancelled;
        }
        oauth_error(OAuthErrorKind::Cancelled, "consent dismissed by the user")
    }

    /// `Exchanging -> Authenticated`.
    pub fn complete(&mut self) {
        if self.state == FlowState::Exchanging {
            self.state = FlowState::Authenticated;
        }
    }

    /// Move to `Failed` unless already terminal.
    pub fn fail(&mut self) {
        if !self.state.is_terminal() {
            self.state = FlowState::Failed;
        }
    }
}

fn extract_code(url: &str) -> Option<String> {
    let (_, query) = url.split_once('?')?;
    let query = query.split('#').next().unwrap_or_default();
    form_urlencoded::parse(query.as_bytes())
        .find(|(name, _)| name == "code")
        .map(|(_, value)| value.into_owned())
        .filter(|code| !code.is_empty())
}
