use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use super::Session;
use crate::error::{request_error, Error, ErrorKind};
use crate::pagination::{Direction, Page, PaginationCursor};
use crate::request::{build_headers, decode_body, Encoding, RequestDescriptor, ResponseError};
use crate::scope::{Scope, ScopeGuard};

const DEFAULT_SCOPES: &[Scope] = &[Scope::Basic];

impl Session {
    /// Dispatch a request and decode the response body as `T`.
    pub async fn request<T: DeserializeOwned>(
        &self,
        descriptor: RequestDescriptor,
    ) -> Result<T, Error> {
        self.request_page(descriptor).await.map(|page| page.value)
    }

    /// Like [`Session::request`], also returning the cursor this very response
    /// produced. The session-wide cursor is updated as well.
    pub async fn request_page<T: DeserializeOwned>(
        &self,
        descriptor: RequestDescriptor,
    ) -> Result<Page<T>, Error> {
        let (url, headers) = self.prepare(&descriptor)?;

        debug!("Dispatching {} {}", descriptor.method, url.path());
        let mut builder = self
            .client
            .request(descriptor.method.clone(), url)
            .headers(headers);
        builder = match descriptor.encoding {
            Encoding::Query if descriptor.params.is_empty() => builder,
            Encoding::Query => builder.query(&descriptor.params),
            Encoding::Form => builder.form(&descriptor.params),
        };

        let response = builder.send().await.map_err(|e| {
            warn!("Request failed before a response arrived: {}", e);
            Error::from(e)
        })?;

        let status = response.status();
        let cursor = self.apply_headers(response.headers());
        let status_error = response.error_for_status_ref().err().map(|e| e.to_string());
        let body = response.bytes().await?;

        if status.is_success() {
            let value = decode_body(status, &body)?;
            return Ok(Page { value, cursor });
        }

        let description = ResponseError::parse(&body).and_then(|error| error.description());
        warn!("Request returned {}: {:?}", status, description);
        Err(request_error(
            description
                .or(status_error)
                .unwrap_or_else(|| status.to_string()),
        ))
    }

    /// Local preconditions, then the target URL and headers.
    ///
    /// Runs the scope check, the credentials check and the rate-limit check in
    /// that order. None of them touches the network.
    fn prepare(&self, descriptor: &RequestDescriptor) -> Result<(Url, HeaderMap), Error> {
        let state = self.state();

        if let Some(scope) = descriptor.required_scope {
            let configured = state
                .credentials
                .as_ref()
                .map(|credentials| credentials.scopes())
                .unwrap_or(DEFAULT_SCOPES);
            ScopeGuard::new(configured).require(scope)?;
        }

        let credentials = state
            .credentials
            .as_ref()
            .filter(|credentials| !credentials.application_id().is_empty())
            .ok_or(ErrorKind::CredentialsMissing)?;
        if descriptor.requires_secret && credentials.secret().is_none() {
            return Err(ErrorKind::CredentialsMissing.into());
        }

        state.rate_limit.check()?;

        let headers = build_headers(descriptor, credentials, state.token.as_ref())?;
        let url = self.urls.resolve(&descriptor.target)?;
        Ok((url, headers))
    }

    /// Record the rate limit and pagination headers of a response.
    ///
    /// Returns the fresh cursor when the response carried a `Link` header.
    fn apply_headers(&self, headers: &HeaderMap<HeaderValue>) -> Option<PaginationCursor> {
        let cursor = PaginationCursor::from_headers(headers);

        let mut state = self.state();
        if state.rate_limit.update_from_headers(headers) {
            debug!(
                "Rate limit {:?}, remaining {:?}",
                state.rate_limit.limit, state.rate_limit.remaining
            );
        }
        if let Some(cursor) = &cursor {
            state.cursor = Some(cursor.clone());
        }
        cursor
    }

    /// Re-read a page from a caller-held cursor.
    pub async fn follow<T: DeserializeOwned>(
        &self,
        cursor: &PaginationCursor,
        direction: Direction,
    ) -> Result<Page<T>, Error> {
        let url = cursor
            .url(direction)
            .cloned()
            .ok_or_else(|| no_page(direction))?;
        self.request_page(RequestDescriptor::url(url)).await
    }

    /// Page from the session's last cursor.
    pub async fn page<T: DeserializeOwned>(&self, direction: Direction) -> Result<T, Error> {
        let url = self
            .pagination()
            .and_then(|cursor| cursor.url(direction).cloned())
            .ok_or_else(|| no_page(direction))?;
        self.request(RequestDescriptor::url(url)).await
    }

    pub async fn first<T: DeserializeOwned>(&self) -> Result<T, Error> {
        self.page(Direction::First).await
    }

    pub async fn last<T: DeserializeOwned>(&self) -> Result<T, Error> {
        self.page(Direction::Last).await
    }

    pub async fn next<T: DeserializeOwned>(&self) -> Result<T, Error> {
        self.page(Direction::Next).await
    }

    pub async fn prev<T: DeserializeOwned>(&self) -> Result<T, Error> {
        self.page(Direction::Prev).await
    }
}

fn no_page(direction: Direction) -> Error {
    ErrorKind::NoPaginationAvailable(format!("No {} page available.", direction.label())).into()
}
