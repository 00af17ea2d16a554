//! Resources needed to upload a local file

use crate::error::Error;
use crate::path::UploadTarget;
use crate::transport::Transport;
use std::path::Path;

impl<T: Transport> crate::Client<T> {
    /// Uploads a local file.
    ///
    /// The whole file is loaded in memory before being sent.
    /// An existing remote file with the same name is replaced.
    ///
    /// # Arguments
    ///
    /// * `local` - Path of the local file.
    /// * `target` - Where to store it, see [`UploadTarget`]. A plain string is an
    ///   [`UploadTarget::Inferred`]: the file keeps its local name, and a trailing spreadsheet
    ///   name in the path is dropped.
    ///
    /// # Returns
    ///
    /// The server relative path of the uploaded file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the local file cannot be read, [`Error::NotFound`] if the
    /// destination folder doesn't exist and [`Error::Transfer`] if the server refuses the file.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # async fn example(client: &sharepoint_files::Client) -> Result<(), sharepoint_files::Error> {
    /// use sharepoint_files::UploadTarget;
    ///
    /// // stored as /sites/team/Docs/report.csv
    /// client.upload_file("local/report.csv", "/sites/team/Docs/").await?;
    /// // stored as /sites/team/Docs/data.xlsx
    /// client.upload_file("local/data.xlsx", "/sites/team/Docs/ignored.xlsx").await?;
    /// // stored as /sites/team/Docs/renamed.xlsx
    /// client
    ///     .upload_file("local/data.xlsx", UploadTarget::file("/sites/team/Docs/renamed.xlsx"))
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    #[tracing::instrument(skip_all, fields(local = %local.as_ref().display()))]
    pub async fn upload_file<'a>(
        &self,
        local: impl AsRef<Path>,
        target: impl Into<UploadTarget<'a>>,
    ) -> crate::Result<String> {
        let local = local.as_ref();
        let local_name = local
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                Error::io(
                    local,
                    std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a file name"),
                )
            })?;
        let content = tokio::fs::read(local)
            .await
            .map_err(|err| Error::io(local, err))?;
        let target = target.into();
        let (folder, name) = target.resolve(local_name);
        let record = self
            .transport
            .upload(&self.session, folder, name, content.into())
            .await?;
        let path = super::uploaded_path(&record, folder);
        tracing::info!("file uploaded to {path}");
        Ok(path)
    }
}
