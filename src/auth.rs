//! App-only authentication for SharePoint Online, through the Azure access control service.
//!
//! The flow goes in two steps:
//!
//! 1. an anonymous request to `{site}/_vti_bin/client.svc` is answered with a `401` whose
//!    `WWW-Authenticate` header carries the `realm` of the tenant,
//! 2. the client id and secret are exchanged for an access token with a `client_credentials`
//!    grant on `{token_service}/{realm}/tokens/OAuth/2`.

use crate::credentials::Credentials;
use crate::error::Error;
use crate::session::{AuthProvider, Session};
use reqwest::header::{AUTHORIZATION, WWW_AUTHENTICATE};
use std::borrow::Cow;

/// The public access control service
pub const ACS_TOKEN_SERVICE: &str = "https://accounts.accesscontrol.windows.net";
/// The principal of SharePoint Online, used to build the requested resource
pub const SHAREPOINT_PRINCIPAL: &str = "00000003-0000-0ff1-ce00-000000000000";

#[derive(Debug, serde::Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, serde::Deserialize)]
struct TokenError {
    #[serde(default)]
    error: String,
    #[serde(default)]
    error_description: String,
}

/// Extracts the `realm` from a `WWW-Authenticate: Bearer realm="...",client_id="..."` header.
fn parse_realm(header: &str) -> Option<&str> {
    let start = header.find("realm=\"")? + "realm=\"".len();
    let rest = &header[start..];
    let end = rest.find('"')?;
    Some(&rest[..end]).filter(|realm| !realm.is_empty())
}

/// Exchanges app-only credentials for a SharePoint access token
///
/// ```rust,no_run
/// use sharepoint_files::auth::AcsAuthProvider;
/// use sharepoint_files::session::AuthProvider;
/// use sharepoint_files::Credentials;
///
/// # async fn example() -> Result<(), sharepoint_files::Error> {
/// let credentials = Credentials::new("https://contoso.sharepoint.com/sites/team", "id", "secret");
/// let session = AcsAuthProvider::new(reqwest::Client::new())
///     .authenticate(&credentials)
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct AcsAuthProvider {
    inner: reqwest::Client,
    token_service: Cow<'static, str>,
}

impl AcsAuthProvider {
    pub fn new(inner: reqwest::Client) -> Self {
        Self {
            inner,
            token_service: Cow::Borrowed(ACS_TOKEN_SERVICE),
        }
    }

    /// Sets the url of the token service, mostly for sovereign clouds.
    pub fn set_token_service(&mut self, value: impl Into<Cow<'static, str>>) {
        self.token_service = value.into();
    }

    pub fn with_token_service(mut self, value: impl Into<Cow<'static, str>>) -> Self {
        self.set_token_service(value);
        self
    }

    #[tracing::instrument(skip(self))]
    async fn discover_realm(&self, endpoint: &str) -> Result<String, Error> {
        let res = self
            .inner
            .get(format!("{endpoint}/_vti_bin/client.svc"))
            .header(AUTHORIZATION, "Bearer")
            .send()
            .await?;
        tracing::debug!("responded with status {:?}", res.status());
        res.headers()
            .get(WWW_AUTHENTICATE)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_realm)
            .map(String::from)
            .ok_or_else(|| Error::Authentication(format!("no realm advertised by {endpoint}")))
    }

    #[tracing::instrument(skip(self, credentials))]
    async fn request_token(&self, credentials: &Credentials, realm: &str) -> Result<String, Error> {
        let host = reqwest::Url::parse(credentials.endpoint())
            .ok()
            .and_then(|url| url.host_str().map(String::from))
            .ok_or_else(|| {
                Error::Authentication(format!("invalid endpoint {}", credentials.endpoint()))
            })?;
        let client_id = format!("{}@{realm}", credentials.client_id());
        let resource = format!("{SHAREPOINT_PRINCIPAL}/{host}@{realm}");
        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", client_id.as_str()),
            ("client_secret", credentials.client_secret()),
            ("resource", resource.as_str()),
        ];
        let res = self
            .inner
            .post(format!("{}/{realm}/tokens/OAuth/2", self.token_service))
            .form(&params)
            .send()
            .await?;
        let status = res.status();
        tracing::debug!("responded with status {status:?}");
        let body = res.bytes().await?;
        if !status.is_success() {
            let message = serde_json::from_slice::<TokenError>(&body)
                .map(|err| format!("{}: {}", err.error, err.error_description))
                .unwrap_or_else(|_| String::from_utf8_lossy(&body).into_owned());
            return Err(Error::Authentication(message));
        }
        let token: TokenResponse = serde_json::from_slice(&body)?;
        Ok(token.access_token)
    }
}

#[async_trait::async_trait]
impl AuthProvider for AcsAuthProvider {
    async fn authenticate(&self, credentials: &Credentials) -> crate::Result<Session> {
        let realm = self.discover_realm(credentials.endpoint()).await?;
        let token = self.request_token(credentials, &realm).await?;
        Ok(Session::new(credentials.endpoint(), token))
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_realm, AcsAuthProvider};
    use crate::session::AuthProvider;
    use crate::{Credentials, Error};
    use mockito::Matcher;

    const REALM: &str = "7ac8d6b5-2f8c-4c4f-9b52-6d3ac9c6e7aa";

    #[test]
    fn should_parse_realm() {
        let header = format!(
            r#"Bearer realm="{REALM}",client_id="00000003-0000-0ff1-ce00-000000000000",trusted_issuers="00000001-0000-0000-c000-000000000000@*""#
        );
        assert_eq!(parse_realm(&header), Some(REALM));
        assert_eq!(parse_realm("Bearer realm=\"\""), None);
        assert_eq!(parse_realm("NTLM"), None);
    }

    async fn mock_challenge(server: &mut mockito::ServerGuard) -> mockito::Mock {
        server
            .mock("GET", "/_vti_bin/client.svc")
            .match_header("authorization", "Bearer")
            .with_status(401)
            .with_header(
                "www-authenticate",
                &format!(r#"Bearer realm="{REALM}",client_id="00000003-0000-0ff1-ce00-000000000000""#),
            )
            .create_async()
            .await
    }

    #[tokio::test]
    async fn success() {
        crate::tests::init();
        let mut server = mockito::Server::new_async().await;
        let challenge = mock_challenge(&mut server).await;
        let token = server
            .mock("POST", format!("/{REALM}/tokens/OAuth/2").as_str())
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("grant_type".into(), "client_credentials".into()),
                Matcher::UrlEncoded("client_id".into(), format!("client-id@{REALM}")),
                Matcher::UrlEncoded("client_secret".into(), "client-secret".into()),
                Matcher::UrlEncoded(
                    "resource".into(),
                    format!("00000003-0000-0ff1-ce00-000000000000/127.0.0.1@{REALM}"),
                ),
            ]))
            .with_status(200)
            .with_body(r#"{"token_type": "Bearer", "access_token": "access-token", "expires_in": "3599"}"#)
            .create_async()
            .await;
        let credentials = Credentials::new(server.url(), "client-id", "client-secret");
        let session = AcsAuthProvider::new(reqwest::Client::new())
            .with_token_service(server.url())
            .authenticate(&credentials)
            .await
            .unwrap();
        assert_eq!(session.access_token(), "access-token");
        assert_eq!(session.site_url(), server.url());
        challenge.assert_async().await;
        token.assert_async().await;
    }

    #[tokio::test]
    async fn invalid_secret() {
        crate::tests::init();
        let mut server = mockito::Server::new_async().await;
        let challenge = mock_challenge(&mut server).await;
        let token = server
            .mock("POST", format!("/{REALM}/tokens/OAuth/2").as_str())
            .with_status(401)
            .with_body(r#"{"error": "invalid_client", "error_description": "AADSTS7000215: Invalid client secret provided."}"#)
            .create_async()
            .await;
        let credentials = Credentials::new(server.url(), "client-id", "wrong");
        let err = AcsAuthProvider::new(reqwest::Client::new())
            .with_token_service(server.url())
            .authenticate(&credentials)
            .await
            .unwrap_err();
        match err {
            Error::Authentication(message) => assert!(message.starts_with("invalid_client")),
            other => panic!("unexpected error {other:?}"),
        }
        challenge.assert_async().await;
        token.assert_async().await;
    }

    #[tokio::test]
    async fn no_realm() {
        crate::tests::init();
        let mut server = mockito::Server::new_async().await;
        let challenge = server
            .mock("GET", "/_vti_bin/client.svc")
            .with_status(200)
            .create_async()
            .await;
        let credentials = Credentials::new(server.url(), "client-id", "client-secret");
        let err = AcsAuthProvider::new(reqwest::Client::new())
            .authenticate(&credentials)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Authentication(_)));
        challenge.assert_async().await;
    }
}
