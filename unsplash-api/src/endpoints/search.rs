use serde::de::DeserializeOwned;

use super::{Orientation, PageParams};
use crate::error::Error;
use crate::models::{Collection, Photo, SearchResults, User};
use crate::pagination::Direction;
use crate::request::RequestDescriptor;
use crate::session::Session;

const SEARCH: &str = "/search";

/// Search endpoints.
///
/// Results of the three searches have different payload types, so paging is
/// typed per call with [`Search::page`].
#[derive(Clone, Copy)]
pub struct Search<'a> {
    session: &'a Session,
}

impl<'a> Search<'a> {
    pub(crate) fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Search photos, optionally restricted to collections and an orientation.
    pub async fn photos(
        &self,
        query: &str,
        params: PageParams,
        collections: &[String],
        orientation: Option<Orientation>,
    ) -> Result<SearchResults<Photo>, Error> {
        let mut descriptor = search(format!("{}/photos", SEARCH), query, params);
        if !collections.is_empty() {
            descriptor = descriptor.param("collections", collections.join(","));
        }
        self.session
            .request(descriptor.param_opt("orientation", orientation))
            .await
    }

    pub async fn collections(
        &self,
        query: &str,
        params: PageParams,
    ) -> Result<SearchResults<Collection>, Error> {
        self.session
            .request(search(format!("{}/collections", SEARCH), query, params))
            .await
    }

    pub async fn users(
        &self,
        query: &str,
        params: PageParams,
    ) -> Result<SearchResults<User>, Error> {
        self.session
            .request(search(format!("{}/users", SEARCH), query, params))
            .await
    }

    /// Another page of the last search, e.g. `search.page::<Photo>(Direction::Next)`.
    pub async fn page<T: DeserializeOwned>(
        &self,
        direction: Direction,
    ) -> Result<SearchResults<T>, Error> {
        self.session.page(direction).await
    }

    pub async fn first<T: DeserializeOwned>(&self) -> Result<SearchResults<T>, Error> {
        self.page(Direction::First).await
    }

    pub async fn last<T: DeserializeOwned>(&self) -> Result<SearchResults<T>, Error> {
        self.page(Direction::Last).await
    }

    pub async fn next<T: DeserializeOwned>(&self) -> Result<SearchResults<T>, Error> {
        self.page(Direction::Next).await
    }

    pub async fn prev<T: DeserializeOwned>(&self) -> Result<SearchResults<T>, Error> {
        self.page(Direction::Prev).await
    }
}

fn search(path: String, query: &str, params: PageParams) -> RequestDescriptor {
    params.apply(RequestDescriptor::get(path).param("query", query))
}
