//! The operations a remote store has to provide to back a [`Client`](crate::Client)

pub mod http;
pub mod memory;

use crate::entry::{FileRecord, FolderListing, FolderRecord, SiteInfo};
use crate::session::Session;
use bytes::Bytes;
use tokio::io::AsyncWrite;

/// A remote document store addressed by server relative paths
///
/// Every call receives the session it should authenticate with. Implementations are
/// expected to return [`Error::NotFound`](crate::Error::NotFound) when a path doesn't
/// resolve and [`Error::Transfer`](crate::Error::Transfer) when a write is refused.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Fetches the metadata of the site root.
    async fn site_info(&self, session: &Session) -> crate::Result<SiteInfo>;

    async fn get_folder(&self, session: &Session, path: &str) -> crate::Result<FolderRecord>;

    /// Fetches a folder with its direct files and sub-folders, without going deeper.
    async fn list_folder(&self, session: &Session, path: &str) -> crate::Result<FolderListing>;

    async fn get_file(&self, session: &Session, path: &str) -> crate::Result<FileRecord>;

    /// Creates or replaces the file `name` in `folder`.
    async fn upload(
        &self,
        session: &Session,
        folder: &str,
        name: &str,
        content: Bytes,
    ) -> crate::Result<FileRecord>;

    /// Writes the content of a file to `writer`, returning the number of bytes written.
    async fn download(
        &self,
        session: &Session,
        path: &str,
        writer: &mut (dyn AsyncWrite + Unpin + Send),
    ) -> crate::Result<u64>;

    async fn delete(&self, session: &Session, path: &str) -> crate::Result<()>;

    /// Loads the whole content of a file in memory.
    async fn read(&self, session: &Session, path: &str) -> crate::Result<Bytes>;
}
