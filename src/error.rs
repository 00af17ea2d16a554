//! The errors returned by the client, the transports and the authentication providers

use std::path::PathBuf;

/// All the possible errors returned by the client
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The credentials or the access token have been rejected
    #[error("authentication failed: {0}")]
    Authentication(String),
    /// The remote store could not be reached
    #[error("unable to reach the remote store")]
    Connectivity(#[from] ConnectivityError),
    /// The path doesn't resolve to a file or a folder
    #[error("no such file or folder: {0}")]
    NotFound(String),
    /// Reading or writing a local file failed
    #[error("unable to access local file {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The remote store refused to write or delete an object
    #[error("remote store rejected the transfer of {path} with status {status}: {message}")]
    Transfer {
        path: String,
        status: u16,
        message: String,
    },
    /// The file has been copied to its destination but the source could not be deleted.
    ///
    /// Both `source` and `destination` exist after this error.
    #[error("{source_path} was copied to {destination} but could not be deleted")]
    PartialMove {
        source_path: String,
        destination: String,
        #[source]
        cause: Box<Error>,
    },
    /// Unexpected answer to a read, with the status code and the message from the response
    #[error("unexpected response from the remote store ({0}): {1}")]
    Protocol(u16, String),
    /// Unable to parse a JSON response
    #[error("unable to decode response")]
    SerdeJson(#[from] serde_json::Error),
    /// No credentials were provided to the builder
    #[error("no credentials provided")]
    MissingCredentials,
    /// The underlying http client could not be built
    #[error("unable to build reqwest client")]
    HttpClient(#[source] reqwest::Error),
}

/// Why the remote store could not be reached
#[derive(Debug, thiserror::Error)]
pub enum ConnectivityError {
    /// The request could not be sent or the response could not be received
    #[error(transparent)]
    Request(#[from] reqwest::Error),
    /// The store answered with a server error, or kept throttling once the retries were spent
    #[error("remote store unavailable with status {status}: {message}")]
    Unavailable { status: u16, message: String },
}

impl ConnectivityError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Request(err) if err.is_timeout())
    }

    pub fn is_connect(&self) -> bool {
        matches!(self, Self::Request(err) if err.is_connect())
    }

    /// The status of the response, when the store answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Request(err) => err.status().map(|status| status.as_u16()),
            Self::Unavailable { status, .. } => Some(*status),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Connectivity(ConnectivityError::Request(err))
    }
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result type alias for the client operations
pub type Result<T> = std::result::Result<T, Error>;
