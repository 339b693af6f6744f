//! Request descriptors, request headers and response body decoding.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crate::credentials::Credentials;
use crate::error::{Error, ErrorKind, HttpErrorKind};
use crate::scope::Scope;
use crate::token::AccessToken;

const ACCEPT_VERSION: &str = "accept-version";
const API_VERSION: &str = "v1";

/// What a request is sent to.
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    /// Path relative to the API base, e.g. `/photos`.
    Path(String),
    /// Absolute URL, used when following pagination links.
    Url(Url),
}

/// How parameters travel with the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// URL query string, for every method.
    Query,
    /// `application/x-www-form-urlencoded` body.
    Form,
}

/// Everything needed to dispatch one API call.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub method: Method,
    pub target: Target,
    pub params: Vec<(String, String)>,
    pub encoding: Encoding,
    /// Send the bearer token when one is available.
    pub requires_auth: bool,
    /// Fail with `CredentialsMissing` unless the client secret is configured.
    pub requires_secret: bool,
    /// Attach the API headers (authorization, version, content type).
    pub send_headers: bool,
    /// Scope that must be configured before the call is attempted.
    pub required_scope: Option<Scope>,
}

impl RequestDescriptor {
    pub fn new(method: Method, target: Target) -> Self {
        Self {
            method,
            target,
            params: Vec::new(),
            encoding: Encoding::Query,
            requires_auth: true,
            requires_secret: false,
            send_headers: true,
            required_scope: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, Target::Path(path.into()))
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, Target::Path(path.into()))
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, Target::Path(path.into()))
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, Target::Path(path.into()))
    }

    /// GET an absolute URL.
    pub fn url(url: Url) -> Self {
        Self::new(Method::GET, Target::Url(url))
    }

    pub fn param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((name.into(), value.to_string()));
        self
    }

    pub fn param_opt<V: ToString>(self, name: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.param(name, value),
            None => self,
        }
    }

    pub fn scope(mut self, scope: Scope) -> Self {
        self.required_scope = Some(scope);
        self
    }

    pub fn form(mut self) -> Self {
        self.encoding = Encoding::Form;
        self
    }

    pub fn with_secret(mut self) -> Self {
        self.requires_secret = true;
        self
    }

    pub fn without_headers(mut self) -> Self {
        self.send_headers = false;
        self.requires_auth = false;
        self
    }

    pub fn unauthenticated(mut self) -> Self {
        self.requires_auth = false;
        self
    }
}

/// Structured error body returned by the API.
///
/// The OAuth endpoints answer `{error, error_description}`; the REST API answers
/// `{errors: [...]}`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ResponseError {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl ResponseError {
    /// Most specific message available, if any.
    pub fn description(&self) -> Option<String> {
        if let Some(description) = &self.error_description {
            return Some(description.clone());
        }
        if let Some(error) = &self.error {
            return Some(error.clone());
        }
        if !self.errors.is_empty() {
            return Some(self.errors.join(", "));
        }
        None
    }

    pub fn parse(body: &[u8]) -> Option<Self> {
        serde_json::from_slice::<ResponseError>(body).ok()
    }
}

/// Decode a successful response body.
///
/// A `204 No Content` decodes as if the body were `{"code": 204}`.
pub fn decode_body<T: DeserializeOwned>(status: StatusCode, body: &[u8]) -> Result<T, Error> {
    let decoded = if status == StatusCode::NO_CONTENT {
        serde_json::from_value(serde_json::json!({ "code": status.as_u16() }))
    } else {
        serde_json::from_slice(body)
    };

    decoded.map_err(|e| Error {
        source: Some(Box::new(e)),
        error_kind: ErrorKind::Decode,
    })
}

/// Headers for an API call.
///
/// Uses the bearer token when the call wants authentication and a token exists,
/// otherwise identifies the application with `Client-ID`.
pub fn build_headers(
    descriptor: &RequestDescriptor,
    credentials: &Credentials,
    token: Option<&AccessToken>,
) -> Result<HeaderMap, Error> {
    let mut headers = HeaderMap::new();
    if !descriptor.send_headers {
        return Ok(headers);
    }

    let authorization = match token {
        Some(token) if descriptor.requires_auth => {
            format!("Bearer {}", token.token.expose_secret())
        }
        _ => format!("Client-ID {}", credentials.application_id()),
    };
    let mut auth_value = HeaderValue::from_str(&authorization).map_err(|e| Error {
        source: Some(Box::new(e)),
        error_kind: ErrorKind::Http(HttpErrorKind::BuilderFailed),
    })?;
    auth_value.set_sensitive(true);

    headers.insert(AUTHORIZATION, auth_value);
    headers.insert(ACCEPT_VERSION, HeaderValue::from_static(API_VERSION));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    Ok(headers)
}
