//! Base URLs for the API and the OAuth endpoints.

use url::Url;

use crate::error::{Error, ErrorKind, HttpErrorKind};
use crate::request::Target;

pub const DEFAULT_API_BASE: &str = "https://api.unsplash.com";
pub const DEFAULT_OAUTH_BASE: &str = "https://unsplash.com/oauth";
pub const DEFAULT_CALLBACK_SCHEME: &str = "unsplash";

/// Where requests are sent, injectable so tests can point at a local server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiUrls {
    pub api_base: String,
    pub oauth_base: String,
    /// Scheme prefix of the redirect URI, `<scheme>-<application id>://token`.
    pub callback_scheme: String,
}

impl Default for ApiUrls {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            oauth_base: DEFAULT_OAUTH_BASE.to_string(),
            callback_scheme: DEFAULT_CALLBACK_SCHEME.to_string(),
        }
    }
}

impl ApiUrls {
    pub fn new(api_base: impl Into<String>, oauth_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            oauth_base: oauth_base.into(),
            ..Self::default()
        }
    }

    pub fn with_callback_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.callback_scheme = scheme.into();
        self
    }

    pub fn authorize_url(&self) -> String {
        format!("{}/authorize", self.oauth_base.trim_end_matches('/'))
    }

    pub fn token_url(&self) -> String {
        format!("{}/token", self.oauth_base.trim_end_matches('/'))
    }

    /// Absolute URL for a request target. Paths are joined onto the API base.
    pub fn resolve(&self, target: &Target) -> Result<Url, Error> {
        match target {
            Target::Url(url) => Ok(url.clone()),
            Target::Path(path) => {
                let joined = format!(
                    "{}/{}",
                    self.api_base.trim_end_matches('/'),
                    path.trim_start_matches('/')
                );
                Url::parse(&joined).map_err(|e| Error {
                    source: Some(Box::new(e)),
                    error_kind: ErrorKind::Http(HttpErrorKind::InvalidUrl),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoints() {
        let urls = ApiUrls::default();
        assert_eq!(urls.authorize_url(), "https://unsplash.com/oauth/authorize");
        assert_eq!(urls.token_url(), "https://unsplash.com/oauth/token");
        assert_eq!(urls.callback_scheme, "unsplash");
    }

    #[test]
    fn test_resolve_joins_paths() {
        let urls = ApiUrls::new("http://127.0.0.1:1234/", "http://127.0.0.1:1234/oauth");
        let url = urls.resolve(&Target::Path("/photos/abc".to_string())).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:1234/photos/abc");
    }

    #[test]
    fn test_resolve_keeps_absolute_urls() {
        let absolute = Url::parse("https://api.unsplash.com/photos?page=4").unwrap();
        let url = ApiUrls::default()
            .resolve(&Target::Url(absolute.clone()))
            .unwrap();
        assert_eq!(url, absolute);
    }

    #[test]
    fn test_resolve_rejects_invalid_base() {
        let urls = ApiUrls::new("not a base", "also not");
        let err = urls.resolve(&Target::Path("photos".to_string())).unwrap_err();
        assert_eq!(err.error_kind, ErrorKind::Http(HttpErrorKind::InvalidUrl));
    }
}
