pub mod copy;
pub mod delete;
pub mod download;
pub mod movefile;
pub mod read;
pub mod upload;

use crate::entry::FileRecord;
use crate::transport::Transport;

impl<T: Transport> crate::Client<T> {
    /// Fetches the properties of a file.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] if the file doesn't exist.
    pub async fn get_file(&self, path: &str) -> crate::Result<FileRecord> {
        self.transport.get_file(&self.session, path).await
    }
}

/// The server relative url of an uploaded file, falling back on the requested path
/// when the server doesn't report one.
pub(crate) fn uploaded_path(record: &FileRecord, folder: &str) -> String {
    record
        .server_relative_url()
        .map(String::from)
        .unwrap_or_else(|| crate::path::join(folder, &record.name))
}
