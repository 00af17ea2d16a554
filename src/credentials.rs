//! The app-only credentials used to authenticate against a SharePoint site.

/// An endpoint and the client id and secret of an app registered on it
///
/// The secret is never shown by the `Debug` implementation.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    endpoint: String,
    client_id: String,
    client_secret: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("endpoint", &self.endpoint)
            .field("client_id", &self.client_id)
            .field("client_secret", &"********")
            .finish()
    }
}

impl Credentials {
    /// Creates credentials for the site at `endpoint`.
    ///
    /// Any trailing `/` is removed from the endpoint.
    pub fn new(
        endpoint: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        let mut endpoint = endpoint.into();
        while endpoint.ends_with('/') {
            endpoint.pop();
        }
        Self {
            endpoint,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Creates credentials based on the environment variables
    ///
    /// `SHAREPOINT_ENDPOINT`, `SHAREPOINT_CLIENT_ID` and `SHAREPOINT_CLIENT_SECRET` should all be set,
    /// otherwise `None` is returned.
    ///
    /// ```rust
    /// use sharepoint_files::Credentials;
    ///
    /// match Credentials::from_env() {
    ///     Some(creds) => println!("connecting to {}", creds.endpoint()),
    ///     None => eprintln!("no credentials provided"),
    /// }
    /// ```
    pub fn from_env() -> Option<Self> {
        match (
            std::env::var("SHAREPOINT_ENDPOINT"),
            std::env::var("SHAREPOINT_CLIENT_ID"),
            std::env::var("SHAREPOINT_CLIENT_SECRET"),
        ) {
            (Ok(endpoint), Ok(client_id), Ok(client_secret)) => {
                Some(Self::new(endpoint, client_id, client_secret))
            }
            _ => None,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }
}
