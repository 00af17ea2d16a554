//! Listing and inspecting folders

use crate::entry::{FolderListing, FolderRecord, Properties};
use crate::transport::Transport;
use std::collections::BTreeMap;

impl<T: Transport> crate::Client<T> {
    pub async fn get_folder(&self, path: &str) -> crate::Result<FolderRecord> {
        self.transport.get_folder(&self.session, path).await
    }

    /// Fetches a folder with its files and sub-folders.
    ///
    /// Only the direct children are returned: sub-folders are not expanded.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] if the folder doesn't exist.
    #[tracing::instrument(skip(self))]
    pub async fn list_folder(&self, path: &str) -> crate::Result<FolderListing> {
        self.transport.list_folder(&self.session, path).await
    }

    /// Lists the files directly in a folder.
    ///
    /// # Arguments
    ///
    /// * `path` - The server relative path of the folder.
    ///
    /// # Returns
    ///
    /// A map with the file names as keys and all the properties of each file as values.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] if the folder doesn't exist.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # async fn example(client: &sharepoint_files::Client) -> Result<(), sharepoint_files::Error> {
    /// let files = client.list_files("/sites/team/Shared Documents").await?;
    /// for (name, properties) in files {
    ///     println!("{name}: {:?}", properties.get("Length"));
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn list_files(&self, path: &str) -> crate::Result<BTreeMap<String, Properties>> {
        let listing = self.list_folder(path).await?;
        tracing::debug!(
            "found {} files and {} folders in {path}",
            listing.files.len(),
            listing.folders.len()
        );
        Ok(listing
            .files
            .into_iter()
            .map(|file| (file.name, file.properties))
            .collect())
    }
}
