use crate::transport::Transport;
use bytes::Bytes;

impl<T: Transport> crate::Client<T> {
    /// Loads the whole content of a file in memory, without touching the local disk.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] if the file doesn't exist.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # async fn example(client: &sharepoint_files::Client) -> Result<(), sharepoint_files::Error> {
    /// let content = client.read_file_in_memory("/sites/team/Docs/notes.txt").await?;
    /// println!("{}", String::from_utf8_lossy(&content));
    /// # Ok(())
    /// # }
    /// ```
    #[tracing::instrument(skip(self))]
    pub async fn read_file_in_memory(&self, path: &str) -> crate::Result<Bytes> {
        let content = self.transport.read(&self.session, path).await?;
        tracing::debug!("read {} bytes", content.len());
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use crate::transport::memory::MemoryTransport;

    #[tokio::test]
    async fn success() {
        let client = crate::tests::memory_client(
            MemoryTransport::default().with_file("/site/Docs/a.bin", vec![0u8, 159, 146, 150]),
        );
        let content = client.read_file_in_memory("/site/Docs/a.bin").await.unwrap();
        assert_eq!(content.as_ref(), &[0u8, 159, 146, 150]);
    }

    #[tokio::test]
    async fn missing() {
        let client = crate::tests::memory_client(MemoryTransport::default());
        let err = client.read_file_in_memory("/site/a.bin").await.unwrap_err();
        assert!(err.is_not_found());
    }
}
