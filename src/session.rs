//! The authenticated context shared by every request of a client

use crate::credentials::Credentials;

/// An authenticated context for a site
///
/// A session is created once by an [`AuthProvider`] and then only borrowed.
/// There is no refresh: once the token expires, the requests fail with
/// [`Error::Authentication`](crate::Error::Authentication).
#[derive(Clone)]
pub struct Session {
    site_url: String,
    access_token: String,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("site_url", &self.site_url)
            .finish_non_exhaustive()
    }
}

impl Session {
    pub fn new(site_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        let mut site_url = site_url.into();
        while site_url.ends_with('/') {
            site_url.pop();
        }
        Self {
            site_url,
            access_token: access_token.into(),
        }
    }

    /// The absolute url of the site, without trailing slash
    pub fn site_url(&self) -> &str {
        &self.site_url
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }
}

/// Something able to exchange credentials for a [`Session`]
#[async_trait::async_trait]
pub trait AuthProvider: Send + Sync {
    /// # Errors
    ///
    /// Returns [`Error::Authentication`](crate::Error::Authentication) when the credentials are rejected.
    async fn authenticate(&self, credentials: &Credentials) -> crate::Result<Session>;
}
