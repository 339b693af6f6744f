use crate::error::Error;
use crate::models::{User, UserUpdate};
use crate::request::RequestDescriptor;
use crate::scope::Scope;
use crate::session::Session;

const ME: &str = "/me";

/// The authenticated user's own profile.
#[derive(Clone, Copy)]
pub struct CurrentUser<'a> {
    session: &'a Session,
}

impl<'a> CurrentUser<'a> {
    pub(crate) fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Needs [`Scope::ReadUser`].
    pub async fn profile(&self) -> Result<User, Error> {
        self.session
            .request(RequestDescriptor::get(ME).scope(Scope::ReadUser))
            .await
    }

    /// Needs [`Scope::WriteUser`]. Only the fields that are set are sent.
    pub async fn update(&self, update: &UserUpdate) -> Result<User, Error> {
        let descriptor = RequestDescriptor::put(ME)
            .scope(Scope::WriteUser)
            .param_opt("username", update.username.as_deref())
            .param_opt("first_name", update.first_name.as_deref())
            .param_opt("last_name", update.last_name.as_deref())
            .param_opt("email", update.email.as_deref())
            .param_opt("url", update.portfolio_url.as_deref())
            .param_opt("location", update.location.as_deref())
            .param_opt("bio", update.bio.as_deref())
            .param_opt("instagram_username", update.instagram_username.as_deref());
        self.session.request(descriptor).await
    }
}

#[cfg(test)]
mod tests {
    use mockito::{Matcher, Server};

    use super::*;
    use crate::credentials::Credentials;
    use crate::error::ErrorKind;
    use crate::urls::ApiUrls;

    async fn session_for(server: &Server, scopes: Vec<Scope>) -> Session {
        let session = Session::builder()
            .with_urls(ApiUrls::new(server.url(), server.url()))
            .build()
            .unwrap();
        session.configure(Credentials::new("app-id", None, scopes)).await;
        session
    }

    #[tokio::test]
    async fn test_profile_requires_read_user() {
        let mut server = Server::new_async().await;
        let mock = server.mock("GET", "/me").expect(0).create_async().await;

        let session = session_for(&server, vec![]).await;
        let err = session.current_user().profile().await.unwrap_err();

        assert_eq!(err.error_kind, ErrorKind::ScopeRequired(Scope::ReadUser));
        assert_eq!(err.to_string(), "This request requires read_user scope.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_update_sends_only_set_fields() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PUT", "/me")
            .match_query(Matcher::Exact("bio=Photographer".to_string()))
            .with_status(200)
            .with_body(r#"{"id": "u1", "username": "exampleuser", "bio": "Photographer"}"#)
            .create_async()
            .await;

        let session = session_for(&server, vec![Scope::WriteUser]).await;
        let update = UserUpdate {
            bio: Some("Photographer".to_string()),
            ..UserUpdate::default()
        };
        let user = session.current_user().update(&update).await.unwrap();

        assert_eq!(user.bio.as_deref(), Some("Photographer"));
        mock.assert_async().await;
    }
}
