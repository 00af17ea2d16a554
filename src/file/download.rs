use crate::error::Error;
use crate::path::base_name;
use crate::transport::Transport;
use std::path::{Path, PathBuf};

impl<T: Transport> crate::Client<T> {
    /// Downloads a file into a local directory, under the last segment of `remote`.
    ///
    /// The file is checked before anything is created locally, and a partially written
    /// file is removed when the transfer fails.
    ///
    /// # Returns
    ///
    /// The path of the written file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the remote file doesn't exist and [`Error::Io`] if the
    /// local file cannot be written.
    #[tracing::instrument(skip_all, fields(remote = %remote))]
    pub async fn download_file(
        &self,
        remote: &str,
        local_dir: impl AsRef<Path>,
    ) -> crate::Result<PathBuf> {
        let name = match base_name(remote) {
            "" | "." | ".." => return Err(Error::NotFound(remote.to_string())),
            name => name,
        };
        self.get_file(remote).await?;
        let target = local_dir.as_ref().join(name);
        let mut writer = tokio::fs::File::create(&target)
            .await
            .map_err(|err| Error::io(&target, err))?;
        match self
            .transport
            .download(&self.session, remote, &mut writer)
            .await
        {
            Ok(size) => {
                tracing::info!("downloaded {size} bytes into {}", target.display());
                Ok(target)
            }
            Err(err) => {
                drop(writer);
                if let Err(cleanup) = tokio::fs::remove_file(&target).await {
                    tracing::warn!("unable to remove {}: {cleanup}", target.display());
                }
                Err(match err {
                    Error::Io { source, .. } => Error::io(&target, source),
                    other => other,
                })
            }
        }
    }
}
