use crate::entry::SiteInfo;
use crate::transport::Transport;

impl<T: Transport> crate::Client<T> {
    /// Fetches the metadata of the site the client is connected to.
    pub async fn site_info(&self) -> crate::Result<SiteInfo> {
        self.transport.site_info(&self.session).await
    }

    /// Checks that the site can be reached with the current session.
    ///
    /// # Returns
    ///
    /// The title of the site.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Connectivity`] when the site cannot be reached or answers with a
    /// server error, and [`crate::Error::Authentication`] when the session is refused.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # async fn example(client: &sharepoint_files::Client) -> Result<(), sharepoint_files::Error> {
    /// let title = client.test_connection().await?;
    /// println!("Web site title: {title}");
    /// # Ok(())
    /// # }
    /// ```
    #[tracing::instrument(skip(self))]
    pub async fn test_connection(&self) -> crate::Result<String> {
        let site = self.site_info().await?;
        tracing::info!("connected to {:?}", site.title);
        Ok(site.title)
    }
}

#[cfg(test)]
mod tests {
    use crate::session::Session;
    use crate::transport::http::HttpTransport;
    use crate::transport::memory::MemoryTransport;
    use crate::{Client, Credentials, Error};

    fn http_client(url: String) -> Client<HttpTransport> {
        crate::tests::init();
        let credentials = Credentials::new(&url, "id", "secret");
        Client::with_session(
            Session::new(url, "access-token"),
            credentials,
            HttpTransport::new(reqwest::Client::new()),
        )
    }

    #[tokio::test]
    async fn should_return_site_title() {
        let client = crate::tests::memory_client(MemoryTransport::new("Team Site"));
        assert_eq!(client.test_connection().await.unwrap(), "Team Site");
    }

    #[tokio::test]
    async fn should_fail_when_site_unavailable() {
        let mut server = mockito::Server::new_async().await;
        let m = server
            .mock("GET", "/_api/web")
            .match_query(mockito::Matcher::Any)
            .with_status(503)
            .create_async()
            .await;
        let err = http_client(server.url())
            .test_connection()
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Connectivity(inner) if inner.status() == Some(503)));
        m.assert_async().await;
    }

    #[tokio::test]
    async fn should_fail_when_token_refused() {
        let mut server = mockito::Server::new_async().await;
        let m = server
            .mock("GET", "/_api/web")
            .match_query(mockito::Matcher::Any)
            .with_status(401)
            .create_async()
            .await;
        let err = http_client(server.url())
            .test_connection()
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Authentication(_)));
        m.assert_async().await;
    }
}
