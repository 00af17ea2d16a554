use crate::path::base_name;
use crate::transport::Transport;

impl<T: Transport> crate::Client<T> {
    /// Copies a file into another folder, keeping its name.
    ///
    /// The copy is done by reading the whole source in memory and uploading it again,
    /// so it is not atomic: a concurrent change of the source or of the destination is not
    /// detected. An existing file with the same name in the destination is replaced.
    ///
    /// # Arguments
    ///
    /// * `source` - The server relative path of the file to copy.
    /// * `to_folder` - The server relative path of the destination folder.
    ///
    /// # Returns
    ///
    /// The server relative path of the new file.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] if the source or the destination folder don't exist,
    /// and [`crate::Error::Transfer`] if the server refuses the new file.
    #[tracing::instrument(skip(self))]
    pub async fn copy_file(&self, source: &str, to_folder: &str) -> crate::Result<String> {
        self.transport.get_folder(&self.session, to_folder).await?;
        let content = self.transport.read(&self.session, source).await?;
        let record = self
            .transport
            .upload(&self.session, to_folder, base_name(source), content)
            .await?;
        let path = super::uploaded_path(&record, to_folder);
        tracing::info!("file copied to {path}");
        Ok(path)
    }
}
