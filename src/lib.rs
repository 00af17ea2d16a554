//! # sharepoint-files
//!
//! A small client for the file operations of a SharePoint Online document library:
//! listing a folder, uploading, downloading, deleting, copying, moving and reading files.
//!
//! The [`Client`] authenticates once through an [`AuthProvider`](crate::session::AuthProvider)
//! and then sends every request through a [`Transport`](crate::transport::Transport),
//! passing its [`Session`](crate::session::Session) explicitly. The default transport talks to
//! the SharePoint REST API; an in-memory one is provided for tests.
//!
//! ```rust,no_run
//! # async fn example() -> Result<(), sharepoint_files::Error> {
//! let client = sharepoint_files::ClientBuilder::from_env().build().await?;
//! println!("connected to {}", client.test_connection().await?);
//! let path = client
//!     .upload_file("report.csv", "/sites/team/Shared Documents/")
//!     .await?;
//! client.download_file(&path, "/tmp").await?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod builder;
pub mod config;
pub mod credentials;
pub mod entry;
pub mod error;
pub mod file;
pub mod folder;
pub mod path;
pub mod session;
pub mod site;
pub mod transport;

pub use builder::ClientBuilder;
pub use credentials::Credentials;
pub use error::{ConnectivityError, Error, Result};
pub use path::UploadTarget;

use session::{AuthProvider, Session};
use transport::http::HttpTransport;
use transport::Transport;

/// The default user agent for the http client
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Client for the file operations of a SharePoint site
///
/// A client owns the [`Credentials`] it was created from and exactly one [`Session`].
/// None of the file operations modify them: when the session stops being accepted,
/// a new client has to be created.
#[derive(Debug)]
pub struct Client<T = HttpTransport> {
    credentials: Credentials,
    session: Session,
    transport: T,
}

impl<T: Transport> Client<T> {
    /// Authenticates with the given provider and creates a client using the resulting session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Authentication`] when the provider rejects the credentials,
    /// or [`Error::Connectivity`] when it cannot be reached.
    #[tracing::instrument(skip_all, fields(endpoint = %credentials.endpoint()))]
    pub async fn connect<A>(auth: &A, credentials: Credentials, transport: T) -> Result<Self>
    where
        A: AuthProvider + ?Sized,
    {
        let session = auth.authenticate(&credentials).await?;
        tracing::debug!("authenticated against {}", session.site_url());
        Ok(Self::with_session(session, credentials, transport))
    }

    /// Creates a client from a session that has already been obtained.
    pub fn with_session(session: Session, credentials: Credentials, transport: T) -> Self {
        Self {
            credentials,
            session,
            transport,
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use crate::session::Session;
    use crate::transport::memory::MemoryTransport;
    use crate::{Client, Credentials};

    pub fn init() {
        let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    }

    pub fn memory_client(transport: MemoryTransport) -> Client<MemoryTransport> {
        init();
        let credentials = Credentials::new("https://contoso.sharepoint.com/sites/team", "id", "secret");
        let session = Session::new(credentials.endpoint(), "memory-token");
        Client::with_session(session, credentials, transport)
    }
}
