use super::{CollectionListKind, PageParams, Pageable};
use crate::error::Error;
use crate::models::{Collection, CollectionPhotoUpdate, Photo, StatusCode};
use crate::request::RequestDescriptor;
use crate::scope::Scope;
use crate::session::Session;

const COLLECTIONS: &str = "/collections";

/// Collection endpoints. Writes need [`Scope::WriteCollections`].
#[derive(Clone, Copy)]
pub struct Collections<'a> {
    session: &'a Session,
}

impl<'a> Collections<'a> {
    pub(crate) fn new(session: &'a Session) -> Self {
        Self { session }
    }

    pub async fn list(
        &self,
        kind: CollectionListKind,
        params: PageParams,
    ) -> Result<Vec<Collection>, Error> {
        let path = match kind {
            CollectionListKind::Any => COLLECTIONS.to_string(),
            CollectionListKind::Featured => format!("{}/featured", COLLECTIONS),
            CollectionListKind::Curated => format!("{}/curated", COLLECTIONS),
        };
        self.session
            .request(params.apply(RequestDescriptor::get(path)))
            .await
    }

    pub async fn get(&self, id: u64, curated: bool) -> Result<Collection, Error> {
        self.session
            .request(RequestDescriptor::get(collection_path(id, curated)))
            .await
    }

    pub async fn photos(
        &self,
        id: u64,
        curated: bool,
        params: PageParams,
    ) -> Result<Vec<Photo>, Error> {
        let path = format!("{}/photos", collection_path(id, curated));
        self.session
            .request(params.apply(RequestDescriptor::get(path)))
            .await
    }

    pub async fn related(&self, id: u64) -> Result<Vec<Collection>, Error> {
        self.session
            .request(RequestDescriptor::get(format!("{}/{}/related", COLLECTIONS, id)))
            .await
    }

    pub async fn create(
        &self,
        title: &str,
        description: Option<&str>,
        private: Option<bool>,
    ) -> Result<Collection, Error> {
        let descriptor = RequestDescriptor::post(COLLECTIONS)
            .scope(Scope::WriteCollections)
            .param("title", title)
            .param_opt("description", description)
            .param_opt("private", private);
        self.session.request(descriptor).await
    }

    /// Save the title, description and privacy flag of `collection`.
    pub async fn update(&self, collection: &Collection) -> Result<Collection, Error> {
        let descriptor = RequestDescriptor::put(format!("{}/{}", COLLECTIONS, collection.id))
            .scope(Scope::WriteCollections)
            .param("title", &collection.title)
            .param_opt("description", collection.description.as_deref())
            .param_opt("private", collection.is_private);
        self.session.request(descriptor).await
    }

    /// Delete a collection. The API answers `204 No Content`.
    pub async fn delete(&self, id: u64) -> Result<StatusCode, Error> {
        let descriptor = RequestDescriptor::delete(format!("{}/{}", COLLECTIONS, id))
            .scope(Scope::WriteCollections);
        self.session.request(descriptor).await
    }

    pub async fn add_photo(
        &self,
        photo_id: &str,
        collection_id: u64,
    ) -> Result<CollectionPhotoUpdate, Error> {
        let descriptor = RequestDescriptor::post(format!("{}/{}/add", COLLECTIONS, collection_id))
            .scope(Scope::WriteCollections)
            .param("photo_id", photo_id);
        self.session.request(descriptor).await
    }

    pub async fn remove_photo(
        &self,
        photo_id: &str,
        collection_id: u64,
    ) -> Result<CollectionPhotoUpdate, Error> {
        let descriptor =
            RequestDescriptor::delete(format!("{}/{}/remove", COLLECTIONS, collection_id))
                .scope(Scope::WriteCollections)
                .param("photo_id", photo_id);
        self.session.request(descriptor).await
    }
}

impl Pageable for Collections<'_> {
    type Item = Vec<Collection>;

    fn session(&self) -> &Session {
        self.session
    }
}

fn collection_path(id: u64, curated: bool) -> String {
    if curated {
        format!("{}/curated/{}", COLLECTIONS, id)
    } else {
        format!("{}/{}", COLLECTIONS, id)
    }
}
