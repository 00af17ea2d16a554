use crate::error::Error;
use crate::path::parent;
use crate::transport::Transport;

impl<T: Transport> crate::Client<T> {
    /// Moves a file into another folder, by copying it and deleting the source.
    ///
    /// Moving a file into the folder it is already in only checks that it exists.
    ///
    /// # Returns
    ///
    /// The server relative path of the moved file.
    ///
    /// # Errors
    ///
    /// Returns the error of [`copy_file`](crate::Client::copy_file) if the copy fails, in which
    /// case nothing changed. If the copy succeeds but the source cannot be deleted, returns
    /// [`Error::PartialMove`]: both files exist and the caller has to decide which one to keep.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # async fn example(client: &sharepoint_files::Client) -> Result<(), sharepoint_files::Error> {
    /// use sharepoint_files::Error;
    ///
    /// match client.move_file("/sites/team/Docs/a.txt", "/sites/team/Archive").await {
    ///     Ok(path) => println!("moved to {path}"),
    ///     Err(Error::PartialMove { destination, .. }) => {
    ///         client.delete_file(&destination).await?;
    ///     }
    ///     Err(err) => return Err(err),
    /// }
    /// # Ok(())
    /// # }
    /// ```
    #[tracing::instrument(skip(self))]
    pub async fn move_file(&self, source: &str, to_folder: &str) -> crate::Result<String> {
        let folder = match to_folder.trim_end_matches('/') {
            "" => "/",
            folder => folder,
        };
        // server relative urls are case insensitive
        if parent(source).eq_ignore_ascii_case(folder) {
            self.get_file(source).await?;
            tracing::debug!("{source} is already in {to_folder}");
            return Ok(source.to_string());
        }
        let destination = self.copy_file(source, to_folder).await?;
        if let Err(cause) = self.transport.delete(&self.session, source).await {
            tracing::error!("{source} copied to {destination} but not deleted: {cause}");
            return Err(Error::PartialMove {
                source_path: source.to_string(),
                destination,
                cause: Box::new(cause),
            });
        }
        tracing::info!("file moved to {destination}");
        Ok(destination)
    }
}
