use crate::auth::AcsAuthProvider;
use crate::transport::http::HttpTransport;
use std::borrow::Cow;
use std::time::Duration;

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    let value = std::env::var(name).ok()?;
    match value.parse::<T>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            tracing::warn!("ignoring invalid value {value:?} for {name}");
            None
        }
    }
}

/// Builder for constructing a [`Client`](crate::Client) connected to a SharePoint site.
///
/// This allows specifying the credentials, the request timeout, the number of retries
/// and optionally customizing the inner `reqwest::ClientBuilder`.
#[derive(Debug, Default)]
pub struct ClientBuilder {
    client_builder: Option<reqwest::ClientBuilder>,
    credentials: Option<crate::Credentials>,
    max_retries: Option<u32>,
    timeout: Option<Duration>,
    token_service: Option<Cow<'static, str>>,
}

impl ClientBuilder {
    /// Creates a builder pre-configured using environment variables.
    ///
    /// - Uses `SHAREPOINT_ENDPOINT`, `SHAREPOINT_CLIENT_ID` and `SHAREPOINT_CLIENT_SECRET` for credentials.
    /// - Uses `SHAREPOINT_TIMEOUT`, in milliseconds, for the request timeout.
    /// - Uses `SHAREPOINT_MAX_RETRIES` for the number of retries.
    ///
    /// Invalid numbers are ignored.
    pub fn from_env() -> Self {
        Self {
            client_builder: None,
            credentials: crate::Credentials::from_env(),
            max_retries: parse_env("SHAREPOINT_MAX_RETRIES"),
            timeout: parse_env("SHAREPOINT_TIMEOUT").map(Duration::from_millis),
            token_service: None,
        }
    }
}

impl ClientBuilder {
    /// Sets a custom `reqwest::ClientBuilder`.
    pub fn set_client_builder(&mut self, client_builder: reqwest::ClientBuilder) {
        self.client_builder = Some(client_builder);
    }

    /// Sets a custom `reqwest::ClientBuilder` and returns the modified builder.
    pub fn with_client_builder(mut self, client_builder: reqwest::ClientBuilder) -> Self {
        self.set_client_builder(client_builder);
        self
    }

    /// Sets the credentials for authentication.
    pub fn set_credentials(&mut self, credentials: crate::Credentials) {
        self.credentials = Some(credentials);
    }

    /// Sets the credentials and returns the modified builder.
    pub fn with_credentials(mut self, credentials: crate::Credentials) -> Self {
        self.set_credentials(credentials);
        self
    }

    /// Sets the timeout applied to every request.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = Some(timeout);
    }

    /// Sets the timeout and returns the modified builder.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.set_timeout(timeout);
        self
    }

    /// Sets how many times a throttled or failed request is retried.
    pub fn set_max_retries(&mut self, max_retries: u32) {
        self.max_retries = Some(max_retries);
    }

    /// Sets the number of retries and returns the modified builder.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.set_max_retries(max_retries);
        self
    }

    /// Sets the url of the token service used for authentication.
    pub fn set_token_service(&mut self, token_service: impl Into<Cow<'static, str>>) {
        self.token_service = Some(token_service.into());
    }

    /// Sets the url of the token service and returns the modified builder.
    pub fn with_token_service(mut self, token_service: impl Into<Cow<'static, str>>) -> Self {
        self.set_token_service(token_service);
        self
    }

    /// Builds the [`Client`](crate::Client) and authenticates it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCredentials`](crate::Error::MissingCredentials) if no credentials were set.
    /// Returns [`Error::HttpClient`](crate::Error::HttpClient) if the HTTP client could not be built.
    /// Returns [`Error::Authentication`](crate::Error::Authentication) if the credentials are rejected.
    pub async fn build(self) -> crate::Result<crate::Client> {
        let credentials = self.credentials.ok_or(crate::Error::MissingCredentials)?;
        let mut builder = self
            .client_builder
            .unwrap_or_default()
            .user_agent(crate::USER_AGENT);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let inner = builder.build().map_err(crate::Error::HttpClient)?;
        let mut auth = AcsAuthProvider::new(inner.clone());
        if let Some(token_service) = self.token_service {
            auth.set_token_service(token_service);
        }
        let transport = HttpTransport::new(inner).with_max_retries(self.max_retries.unwrap_or(0));
        crate::Client::connect(&auth, credentials, transport).await
    }
}

#[cfg(test)]
mod tests {
    use super::ClientBuilder;
    use crate::transport::Transport;
    use crate::{Credentials, Error};
    use std::time::Duration;

    #[tokio::test]
    async fn should_require_credentials() {
        let err = ClientBuilder::default().build().await.unwrap_err();
        assert!(matches!(err, Error::MissingCredentials));
    }

    #[tokio::test]
    async fn should_authenticate_and_configure_transport() {
        crate::tests::init();
        let mut server = mockito::Server::new_async().await;
        let challenge = server
            .mock("GET", "/_vti_bin/client.svc")
            .with_status(401)
            .with_header("www-authenticate", r#"Bearer realm="tenant",client_id="x""#)
            .create_async()
            .await;
        let token = server
            .mock("POST", "/tenant/tokens/OAuth/2")
            .with_status(200)
            .with_body(r#"{"access_token": "access-token"}"#)
            .create_async()
            .await;
        let web = server
            .mock("GET", "/_api/web")
            .match_query(mockito::Matcher::Any)
            .match_header("authorization", "Bearer access-token")
            .with_status(200)
            .with_body(r#"{"Title": "Team Site"}"#)
            .create_async()
            .await;
        let client = ClientBuilder::default()
            .with_credentials(Credentials::new(server.url(), "id", "secret"))
            .with_token_service(server.url())
            .with_max_retries(2)
            .build()
            .await
            .unwrap();
        assert_eq!(client.transport().max_retries(), 2);
        let site = client.transport().site_info(client.session()).await.unwrap();
        assert_eq!(site.title, "Team Site");
        challenge.assert_async().await;
        token.assert_async().await;
        web.assert_async().await;
    }

    #[tokio::test]
    async fn should_time_out_on_silent_server() {
        crate::tests::init();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        // accepts connections and never answers
        let silent = tokio::spawn(async move {
            let mut sockets = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                sockets.push(socket);
            }
        });
        let err = ClientBuilder::default()
            .with_credentials(Credentials::new(&url, "id", "secret"))
            .with_token_service(url)
            .with_timeout(Duration::from_millis(100))
            .build()
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Connectivity(inner) if inner.is_timeout()));
        silent.abort();
    }
}
