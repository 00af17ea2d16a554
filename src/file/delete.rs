use crate::transport::Transport;

impl<T: Transport> crate::Client<T> {
    /// Deletes a file.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] if the file doesn't exist and
    /// [`crate::Error::Transfer`] if the server refuses to delete it.
    #[tracing::instrument(skip(self))]
    pub async fn delete_file(&self, path: &str) -> crate::Result<()> {
        self.transport.delete(&self.session, path).await?;
        tracing::info!("file deleted");
        Ok(())
    }
}
