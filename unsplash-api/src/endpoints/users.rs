use super::{segment, validate_quantity, OrderBy, PageParams, Pageable, StatisticsResolution};
use crate::error::Error;
use crate::models::{Collection, DownloadLink, Photo, Statistics, User};
use crate::request::RequestDescriptor;
use crate::session::Session;

const USERS: &str = "/users";

/// Public user profiles.
#[derive(Clone, Copy)]
pub struct Users<'a> {
    session: &'a Session,
}

impl<'a> Users<'a> {
    pub(crate) fn new(session: &'a Session) -> Self {
        Self { session }
    }

    pub async fn get(
        &self,
        username: &str,
        width: Option<u32>,
        height: Option<u32>,
    ) -> Result<User, Error> {
        let descriptor = RequestDescriptor::get(user_path(username))
            .param_opt("w", width)
            .param_opt("h", height);
        self.session.request(descriptor).await
    }

    pub async fn portfolio(&self, username: &str) -> Result<DownloadLink, Error> {
        self.session
            .request(RequestDescriptor::get(format!("{}/portfolio", user_path(username))))
            .await
    }

    pub async fn statistics(
        &self,
        username: &str,
        resolution: Option<StatisticsResolution>,
        quantity: u32,
    ) -> Result<Statistics, Error> {
        let quantity = validate_quantity(quantity)?;
        let descriptor = RequestDescriptor::get(format!("{}/statistics", user_path(username)))
            .param_opt("resolution", resolution)
            .param("quantity", quantity);
        self.session.request(descriptor).await
    }

    pub fn photos(&self) -> UserPhotos<'a> {
        UserPhotos {
            session: self.session,
        }
    }

    pub fn collections(&self) -> UserCollections<'a> {
        UserCollections {
            session: self.session,
        }
    }
}

fn user_path(username: &str) -> String {
    format!("{}/{}", USERS, segment(username))
}

/// Photos uploaded or liked by a user.
#[derive(Clone, Copy)]
pub struct UserPhotos<'a> {
    session: &'a Session,
}

impl UserPhotos<'_> {
    /// Photos uploaded by `username`. `quantity` must be in `[1, 30]`; it sizes
    /// the statistics returned when `stats` is set.
    pub async fn by(
        &self,
        username: &str,
        params: PageParams,
        order_by: Option<OrderBy>,
        stats: bool,
        resolution: Option<StatisticsResolution>,
        quantity: u32,
    ) -> Result<Vec<Photo>, Error> {
        let quantity = validate_quantity(quantity)?;
        let descriptor = params
            .apply(RequestDescriptor::get(format!("{}/photos", user_path(username))))
            .param_opt("order_by", order_by)
            .param("stats", stats)
            .param_opt("resolution", resolution)
            .param("quantity", quantity);
        self.session.request(descriptor).await
    }

    pub async fn liked(
        &self,
        username: &str,
        params: PageParams,
        order_by: Option<OrderBy>,
    ) -> Result<Vec<Photo>, Error> {
        let descriptor = params
            .apply(RequestDescriptor::get(format!("{}/likes", user_path(username))))
            .param_opt("order_by", order_by);
        self.session.request(descriptor).await
    }
}

impl Pageable for UserPhotos<'_> {
    type Item = Vec<Photo>;

    fn session(&self) -> &Session {
        self.session
    }
}

/// Collections created by a user.
#[derive(Clone, Copy)]
pub struct UserCollections<'a> {
    session: &'a Session,
}

impl UserCollections<'_> {
    pub async fn by(&self, username: &str, params: PageParams) -> Result<Vec<Collection>, Error> {
        let descriptor =
            params.apply(RequestDescriptor::get(format!("{}/collections", user_path(username))));
        self.session.request(descriptor).await
    }
}

impl Pageable for UserCollections<'_> {
    type Item = Vec<Collection>;

    fn session(&self) -> &Session {
        self.session
    }
}

#[cfg(test)]
mod tests {
    use mockito::{Matcher, Server};

    use super::*;
    use crate::credentials::Credentials;
    use crate::error::{ErrorKind, ParameterErrorKind};
    use crate::urls::ApiUrls;

    async fn session_for(server: &Server) -> Session {
        let session = Session::builder()
            .with_urls(ApiUrls::new(server.url(), server.url()))
            .build()
            .unwrap();
        session.configure(Credentials::new("app-id", None, [])).await;
        session
    }

    #[tokio::test]
    async fn test_profile_sends_dimensions() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/users/exampleuser")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("w".into(), "64".into()),
                Matcher::UrlEncoded("h".into(), "64".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"id": "u1", "username": "exampleuser", "total_photos": 12}"#)
            .create_async()
            .await;

        let session = session_for(&server).await;
        let user = session
            .users()
            .get("exampleuser", Some(64), Some(64))
            .await
            .unwrap();

        assert_eq!(user.total_photos, Some(12));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_user_photos_with_bad_quantity_dispatches_nothing() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/users/exampleuser/photos")
            .match_query(Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let session = session_for(&server).await;
        let err = session
            .users()
            .photos()
            .by("exampleuser", PageParams::default(), None, true, None, 45)
            .await
            .unwrap_err();

        assert_eq!(
            err.error_kind,
            ErrorKind::Parameter(ParameterErrorKind::WrongQuantity)
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_portfolio_link() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/users/exampleuser/portfolio")
            .with_status(200)
            .with_body(r#"{"url": "https://example.com"}"#)
            .create_async()
            .await;

        let session = session_for(&server).await;
        let link = session.users().portfolio("exampleuser").await.unwrap();
        assert_eq!(link.url.as_deref(), Some("https://example.com"));
    }
}
