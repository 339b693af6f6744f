//! Thin endpoint groups on top of the session.
//!
//! Each group borrows the [`Session`], validates its parameters and declares the
//! scope it needs. Nothing is dispatched when validation or the scope check fails.

mod collections;
mod current_user;
mod photos;
mod search;
mod users;

use std::borrow::Cow;
use std::fmt;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::error::{parameter_error, Error, ParameterErrorKind};
use crate::pagination::Direction;
use crate::request::RequestDescriptor;
use crate::session::Session;

pub use collections::Collections;
pub use current_user::CurrentUser;
pub use photos::{PhotoUpdate, Photos, RandomPhotoQuery};
pub use search::Search;
pub use users::{UserCollections, UserPhotos, Users};

const MIN_AMOUNT: u32 = 1;
const MAX_AMOUNT: u32 = 30;

/// Paging parameters shared by every list endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl PageParams {
    pub fn new(page: Option<u32>, per_page: Option<u32>) -> Self {
        Self { page, per_page }
    }

    pub(crate) fn apply(&self, descriptor: RequestDescriptor) -> RequestDescriptor {
        descriptor
            .param_opt("page", self.page)
            .param_opt("per_page", self.per_page)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderBy {
    Latest,
    Oldest,
    Popular,
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            OrderBy::Latest => "latest",
            OrderBy::Oldest => "oldest",
            OrderBy::Popular => "popular",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Landscape,
    Portrait,
    Squarish,
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Orientation::Landscape => "landscape",
            Orientation::Portrait => "portrait",
            Orientation::Squarish => "squarish",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatisticsResolution {
    Days,
}

impl fmt::Display for StatisticsResolution {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("days")
    }
}

/// Which collection listing to read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CollectionListKind {
    #[default]
    Any,
    Featured,
    Curated,
}

/// Percent-encode a caller-supplied id so it stays a single path segment.
pub(crate) fn segment(value: &str) -> Cow<'_, str> {
    urlencoding::encode(value)
}

pub(crate) fn validate_count(count: u32) -> Result<u32, Error> {
    if (MIN_AMOUNT..=MAX_AMOUNT).contains(&count) {
        Ok(count)
    } else {
        Err(parameter_error(ParameterErrorKind::WrongCount))
    }
}

pub(crate) fn validate_quantity(quantity: u32) -> Result<u32, Error> {
    if (MIN_AMOUNT..=MAX_AMOUNT).contains(&quantity) {
        Ok(quantity)
    } else {
        Err(parameter_error(ParameterErrorKind::WrongQuantity))
    }
}

/// Navigation over the pages of a list endpoint, typed to its payload.
///
/// Pages are read from the session's last cursor, so they follow whichever
/// paginated call completed most recently.
#[async_trait]
pub trait Pageable: Sync {
    type Item: DeserializeOwned + Send;

    fn session(&self) -> &Session;

    async fn page(&self, direction: Direction) -> Result<Self::Item, Error> {
        self.session().page::<Self::Item>(direction).await
    }

    async fn first(&self) -> Result<Self::Item, Error> {
        self.page(Direction::First).await
    }

    async fn last(&self) -> Result<Self::Item, Error> {
        self.page(Direction::Last).await
    }

    async fn next(&self) -> Result<Self::Item, Error> {
        self.page(Direction::Next).await
    }

    async fn prev(&self) -> Result<Self::Item, Error> {
        self.page(Direction::Prev).await
    }
}
