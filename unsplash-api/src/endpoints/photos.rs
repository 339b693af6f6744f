use super::{
    segment, validate_count, validate_quantity, OrderBy, Orientation, PageParams, Pageable,
    StatisticsResolution,
};
use crate::error::Error;
use crate::models::{DownloadLink, Exif, Like, Location, Photo, Statistics};
use crate::request::RequestDescriptor;
use crate::scope::Scope;
use crate::session::Session;

const PHOTOS: &str = "/photos";

/// Filters for the random photo endpoints.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RandomPhotoQuery {
    pub collections: Vec<u64>,
    pub featured: Option<bool>,
    pub username: Option<String>,
    /// Ignored when `collections` is not empty; the API rejects both together.
    pub query: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub orientation: Option<Orientation>,
}

impl RandomPhotoQuery {
    fn apply(&self, mut descriptor: RequestDescriptor) -> RequestDescriptor {
        if !self.collections.is_empty() {
            let ids = self
                .collections
                .iter()
                .map(u64::to_string)
                .collect::<Vec<_>>()
                .join(",");
            descriptor = descriptor.param("collections", ids);
        } else {
            descriptor = descriptor.param_opt("query", self.query.as_deref());
        }
        descriptor
            .param_opt("featured", self.featured)
            .param_opt("username", self.username.as_deref())
            .param_opt("w", self.width)
            .param_opt("h", self.height)
            .param_opt("orientation", self.orientation)
    }
}

/// Editable photo metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhotoUpdate {
    pub location: Option<Location>,
    pub exif: Option<Exif>,
}

impl PhotoUpdate {
    fn apply(&self, mut descriptor: RequestDescriptor) -> RequestDescriptor {
        if let Some(location) = &self.location {
            let position = location.position;
            descriptor = descriptor
                .param_opt("location[latitude]", position.map(|p| p.latitude))
                .param_opt("location[longitude]", position.map(|p| p.longitude))
                .param_opt("location[name]", location.name.as_deref())
                .param_opt("location[city]", location.city.as_deref())
                .param_opt("location[country]", location.country.as_deref())
                .param_opt("location[confidential]", location.confidential);
        }
        if let Some(exif) = &self.exif {
            descriptor = descriptor
                .param_opt("exif[make]", exif.make.as_deref())
                .param_opt("exif[model]", exif.model.as_deref())
                .param_opt("exif[exposure_time]", exif.exposure_time.as_deref())
                .param_opt("exif[aperture_value]", exif.aperture.as_deref())
                .param_opt("exif[focal_length]", exif.focal_length.as_deref())
                .param_opt("exif[iso_speed_ratings]", exif.iso);
        }
        descriptor
    }
}

/// Photo endpoints.
#[derive(Clone, Copy)]
pub struct Photos<'a> {
    session: &'a Session,
}

impl<'a> Photos<'a> {
    pub(crate) fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// List photos, or curated photos when `curated` is set.
    pub async fn list(
        &self,
        params: PageParams,
        order_by: Option<OrderBy>,
        curated: bool,
    ) -> Result<Vec<Photo>, Error> {
        let path = if curated {
            format!("{}/curated", PHOTOS)
        } else {
            PHOTOS.to_string()
        };
        let descriptor = params
            .apply(RequestDescriptor::get(path))
            .param_opt("order_by", order_by);
        self.session.request(descriptor).await
    }

    /// Get one photo. `rect` is only sent when it is four comma-separated integers.
    pub async fn get(
        &self,
        id: &str,
        width: Option<u32>,
        height: Option<u32>,
        rect: Option<&str>,
    ) -> Result<Photo, Error> {
        let descriptor = RequestDescriptor::get(photo_path(id))
            .param_opt("w", width)
            .param_opt("h", height)
            .param_opt("rect", rect.filter(|rect| is_valid_rect(rect)));
        self.session.request(descriptor).await
    }

    /// `count` random photos, `count` in `[1, 30]`.
    pub async fn random(&self, query: &RandomPhotoQuery, count: u32) -> Result<Vec<Photo>, Error> {
        let count = validate_count(count)?;
        let descriptor = query
            .apply(RequestDescriptor::get(format!("{}/random", PHOTOS)))
            .param("count", count);
        self.session.request(descriptor).await
    }

    pub async fn random_one(&self, query: &RandomPhotoQuery) -> Result<Photo, Error> {
        let descriptor = query.apply(RequestDescriptor::get(format!("{}/random", PHOTOS)));
        self.session.request(descriptor).await
    }

    pub async fn download_link(&self, id: &str) -> Result<DownloadLink, Error> {
        self.session
            .request(RequestDescriptor::get(format!("{}/download", photo_path(id))))
            .await
    }

    /// Download, view and like statistics, `quantity` in `[1, 30]`.
    pub async fn statistics(
        &self,
        id: &str,
        resolution: Option<StatisticsResolution>,
        quantity: u32,
    ) -> Result<Statistics, Error> {
        let quantity = validate_quantity(quantity)?;
        let descriptor = RequestDescriptor::get(format!("{}/statistics", photo_path(id)))
            .param_opt("resolution", resolution)
            .param("quantity", quantity);
        self.session.request(descriptor).await
    }

    pub async fn update(&self, id: &str, update: &PhotoUpdate) -> Result<Photo, Error> {
        let descriptor =
            update.apply(RequestDescriptor::put(photo_path(id)).scope(Scope::WritePhotos));
        self.session.request(descriptor).await
    }

    pub async fn like(&self, id: &str) -> Result<Like, Error> {
        let descriptor =
            RequestDescriptor::post(format!("{}/like", photo_path(id))).scope(Scope::WriteLikes);
        self.session.request(descriptor).await
    }

    pub async fn unlike(&self, id: &str) -> Result<Like, Error> {
        let descriptor =
            RequestDescriptor::delete(format!("{}/like", photo_path(id))).scope(Scope::WriteLikes);
        self.session.request(descriptor).await
    }
}

fn photo_path(id: &str) -> String {
    format!("{}/{}", PHOTOS, segment(id))
}

impl Pageable for Photos<'_> {
    type Item = Vec<Photo>;

    fn session(&self) -> &Session {
        self.session
    }
}

fn is_valid_rect(rect: &str) -> bool {
    let parts: Vec<&str> = rect.split(',').collect();
    parts.len() == 4 && parts.iter().all(|part| part.trim().parse::<u32>().is_ok())
}

#[cfg(test)]
mod tests {
    use mockito::{Matcher, Server};

    use super::*;
    use crate::credentials::Credentials;
    use crate::error::{ErrorKind, ParameterErrorKind};
    use crate::models::Position;
    use crate::urls::ApiUrls;

    async fn session_for(server: &Server, scopes: Vec<Scope>) -> Session {
        let session = Session::builder()
            .with_urls(ApiUrls::new(server.url(), server.url()))
            .build()
            .unwrap();
        session.configure(Credentials::new("app-id", None, scopes)).await;
        session
    }

    #[test]
    fn test_rect_validation() {
        assert!(is_valid_rect("0,0,100,200"));
        assert!(!is_valid_rect("0,0,100"));
        assert!(!is_valid_rect("0,0,100,abc"));
    }

    #[tokio::test]
    async fn test_photo_id_is_kept_in_one_path_segment() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/photos/a%2Fb%3Fc/download")
            .with_status(200)
            .with_body(r#"{"url": "https://images.unsplash.com/photo-1"}"#)
            .create_async()
            .await;

        let session = session_for(&server, vec![]).await;
        let link = session.photos().download_link("a/b?c").await.unwrap();

        assert_eq!(link.url.as_deref(), Some("https://images.unsplash.com/photo-1"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_random_with_bad_count_dispatches_nothing() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", Matcher::Regex("^/photos/random".to_string()))
            .expect(0)
            .create_async()
            .await;

        let session = session_for(&server, vec![]).await;
        let photos = session.photos();

        for count in [0, 31] {
            let err = photos
                .random(&RandomPhotoQuery::default(), count)
                .await
                .unwrap_err();
            assert_eq!(
                err.error_kind,
                ErrorKind::Parameter(ParameterErrorKind::WrongCount)
            );
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_statistics_with_bad_quantity_dispatches_nothing() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/photos/abc/statistics")
            .match_query(Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let session = session_for(&server, vec![]).await;
        let err = session
            .photos()
            .statistics("abc", None, 0)
            .await
            .unwrap_err();
        assert_eq!(
            err.error_kind,
            ErrorKind::Parameter(ParameterErrorKind::WrongQuantity)
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_random_prefers_collections_over_query() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/photos/random")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("collections".into(), "1,2".into()),
                Matcher::UrlEncoded("count".into(), "2".into()),
                Matcher::UrlEncoded("orientation".into(), "portrait".into()),
            ]))
            .with_status(200)
            .with_body(r#"[{"id": "a"}, {"id": "b"}]"#)
            .create_async()
            .await;

        let session = session_for(&server, vec![]).await;
        let query = RandomPhotoQuery {
            collections: vec![1, 2],
            query: Some("ignored".to_string()),
            orientation: Some(Orientation::Portrait),
            ..RandomPhotoQuery::default()
        };
        let photos = session.photos().random(&query, 2).await.unwrap();

        assert_eq!(photos.len(), 2);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_like_requires_write_likes() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/photos/abc/like")
            .expect(0)
            .create_async()
            .await;

        let session = session_for(&server, vec![Scope::ReadUser]).await;
        let err = session.photos().like("abc").await.unwrap_err();

        assert_eq!(err.error_kind, ErrorKind::ScopeRequired(Scope::WriteLikes));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_update_sends_nested_params() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PUT", "/photos/abc")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("location[city]".into(), "Vigo".into()),
                Matcher::UrlEncoded("location[latitude]".into(), "42.24".into()),
                Matcher::UrlEncoded("exif[iso_speed_ratings]".into(), "100".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"id": "abc"}"#)
            .create_async()
            .await;

        let session = session_for(&server, vec![Scope::WritePhotos]).await;
        let update = PhotoUpdate {
            location: Some(Location {
                city: Some("Vigo".to_string()),
                position: Some(Position {
                    latitude: 42.24,
                    longitude: -8.72,
                }),
                ..Location::default()
            }),
            exif: Some(Exif {
                iso: Some(100),
                ..Exif::default()
            }),
        };

        let photo = session.photos().update("abc", &update).await.unwrap();
        assert_eq!(photo.id, "abc");
        mock.assert_async().await;
    }
}
