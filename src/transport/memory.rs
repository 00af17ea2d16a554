//! An in-memory store, useful to test code using a [`Client`](crate::Client) without a server

use super::Transport;
use crate::credentials::Credentials;
use crate::entry::{FileRecord, FolderListing, FolderRecord, Properties, SiteInfo};
use crate::error::Error;
use crate::path::{base_name, join};
use crate::session::{AuthProvider, Session};
use bytes::Bytes;
use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard};
use tokio::io::{AsyncWrite, AsyncWriteExt};

fn normalize(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

fn is_direct_child(parent: &str, path: &str) -> bool {
    crate::path::parent(path) == parent
}

#[derive(Debug, Clone)]
struct StoredFile {
    content: Bytes,
    modified: String,
}

#[derive(Debug, Default)]
struct State {
    folders: BTreeSet<String>,
    files: BTreeMap<String, StoredFile>,
    read_only: BTreeSet<String>,
}

impl State {
    fn file_record(&self, path: &str) -> Option<FileRecord> {
        let stored = self.files.get(path)?;
        let mut properties = Properties::new();
        properties.insert("Name".into(), Value::from(base_name(path)));
        properties.insert("ServerRelativeUrl".into(), Value::from(path));
        properties.insert(
            "Length".into(),
            Value::from(stored.content.len().to_string()),
        );
        properties.insert(
            "TimeLastModified".into(),
            Value::from(stored.modified.as_str()),
        );
        FileRecord::from_properties(properties)
    }

    fn folder_record(&self, path: &str) -> Option<FolderRecord> {
        if !self.folders.contains(path) {
            return None;
        }
        let item_count = self
            .files
            .keys()
            .chain(self.folders.iter())
            .filter(|child| child.as_str() != path && is_direct_child(path, child))
            .count() as u64;
        Some(FolderRecord {
            name: base_name(path).to_string(),
            server_relative_url: path.to_string(),
            item_count,
        })
    }

    fn ensure_writable(&self, path: &str) -> Result<(), Error> {
        if self.read_only.contains(path) {
            Err(Error::Transfer {
                path: path.to_string(),
                status: 403,
                message: "Access denied.".into(),
            })
        } else {
            Ok(())
        }
    }
}

/// A [`Transport`] keeping folders and files in memory
///
/// Folders have to be created with [`MemoryTransport::with_folder`] before files can be
/// uploaded in them, like on a real document library.
///
/// ```
/// use sharepoint_files::transport::memory::MemoryTransport;
///
/// let transport = MemoryTransport::new("Team Site")
///     .with_folder("/sites/team/Docs")
///     .with_file("/sites/team/Docs/notes.txt", "hello");
/// assert!(transport.contains_file("/sites/team/Docs/notes.txt"));
/// ```
#[derive(Debug)]
pub struct MemoryTransport {
    title: String,
    state: Mutex<State>,
}

impl Default for MemoryTransport {
    fn default() -> Self {
        Self::new("Memory")
    }
}

impl MemoryTransport {
    pub fn new(title: impl Into<String>) -> Self {
        let mut state = State::default();
        state.folders.insert("/".to_string());
        Self {
            title: title.into(),
            state: Mutex::new(state),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        // the state is never left inconsistent by a panicking holder
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Creates a folder and all its missing parents.
    pub fn add_folder(&self, path: &str) {
        let mut state = self.state();
        let mut current = normalize(path);
        while current != "/" && !current.is_empty() {
            let next = crate::path::parent(&current).to_string();
            state.folders.insert(current);
            current = next;
        }
    }

    pub fn with_folder(self, path: &str) -> Self {
        self.add_folder(path);
        self
    }

    /// Stores a file, creating its parent folders.
    pub fn add_file(&self, path: &str, content: impl Into<Bytes>) {
        let path = normalize(path);
        self.add_folder(crate::path::parent(&path));
        self.state().files.insert(
            path,
            StoredFile {
                content: content.into(),
                modified: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            },
        );
    }

    pub fn with_file(self, path: &str, content: impl Into<Bytes>) -> Self {
        self.add_file(path, content);
        self
    }

    /// Makes every upload to and every deletion of `path` fail with a
    /// [`Error::Transfer`](crate::Error::Transfer).
    pub fn deny_writes(&self, path: &str) {
        self.state().read_only.insert(normalize(path));
    }

    pub fn contains_file(&self, path: &str) -> bool {
        self.state().files.contains_key(&normalize(path))
    }

    pub fn file_content(&self, path: &str) -> Option<Bytes> {
        self.state()
            .files
            .get(&normalize(path))
            .map(|file| file.content.clone())
    }

    pub fn file_count(&self) -> usize {
        self.state().files.len()
    }

    fn content(&self, path: &str) -> Result<Bytes, Error> {
        self.file_content(path)
            .ok_or_else(|| Error::NotFound(path.to_string()))
    }
}

#[async_trait::async_trait]
impl Transport for MemoryTransport {
    async fn site_info(&self, session: &Session) -> crate::Result<SiteInfo> {
        Ok(SiteInfo {
            title: self.title.clone(),
            url: session.site_url().to_string(),
        })
    }

    async fn get_folder(&self, _session: &Session, path: &str) -> crate::Result<FolderRecord> {
        self.state()
            .folder_record(&normalize(path))
            .ok_or_else(|| Error::NotFound(path.to_string()))
    }

    async fn list_folder(&self, _session: &Session, path: &str) -> crate::Result<FolderListing> {
        let state = self.state();
        let key = normalize(path);
        let folder = state
            .folder_record(&key)
            .ok_or_else(|| Error::NotFound(path.to_string()))?;
        let files = state
            .files
            .keys()
            .filter(|child| is_direct_child(&key, child))
            .filter_map(|child| state.file_record(child))
            .collect();
        let folders = state
            .folders
            .iter()
            .filter(|child| child.as_str() != key && is_direct_child(&key, child))
            .filter_map(|child| state.folder_record(child))
            .collect();
        Ok(FolderListing {
            folder,
            files,
            folders,
        })
    }

    async fn get_file(&self, _session: &Session, path: &str) -> crate::Result<FileRecord> {
        self.state()
            .file_record(&normalize(path))
            .ok_or_else(|| Error::NotFound(path.to_string()))
    }

    async fn upload(
        &self,
        _session: &Session,
        folder: &str,
        name: &str,
        content: Bytes,
    ) -> crate::Result<FileRecord> {
        let mut state = self.state();
        let folder_key = normalize(folder);
        if !state.folders.contains(&folder_key) {
            return Err(Error::NotFound(folder.to_string()));
        }
        let path = join(&folder_key, name);
        state.ensure_writable(&path)?;
        state.files.insert(
            path.clone(),
            StoredFile {
                content,
                modified: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            },
        );
        state
            .file_record(&path)
            .ok_or(Error::NotFound(path))
    }

    async fn download(
        &self,
        _session: &Session,
        path: &str,
        writer: &mut (dyn AsyncWrite + Unpin + Send),
    ) -> crate::Result<u64> {
        let content = self.content(path)?;
        writer
            .write_all(&content)
            .await
            .map_err(|err| Error::io(path, err))?;
        writer.flush().await.map_err(|err| Error::io(path, err))?;
        Ok(content.len() as u64)
    }

    async fn delete(&self, _session: &Session, path: &str) -> crate::Result<()> {
        let mut state = self.state();
        let key = normalize(path);
        if !state.files.contains_key(&key) {
            return Err(Error::NotFound(path.to_string()));
        }
        state.ensure_writable(&key)?;
        state.files.remove(&key);
        Ok(())
    }

    async fn read(&self, _session: &Session, path: &str) -> crate::Result<Bytes> {
        self.content(path)
    }
}

/// An [`AuthProvider`] accepting a single client id and secret
#[derive(Debug, Clone)]
pub struct MemoryAuthProvider {
    client_id: String,
    client_secret: String,
}

impl MemoryAuthProvider {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

#[async_trait::async_trait]
impl AuthProvider for MemoryAuthProvider {
    async fn authenticate(&self, credentials: &Credentials) -> crate::Result<Session> {
        if credentials.client_id() == self.client_id
            && credentials.client_secret() == self.client_secret
        {
            Ok(Session::new(
                credentials.endpoint(),
                format!("memory-{}", self.client_id),
            ))
        } else {
            Err(Error::Authentication(format!(
                "invalid client secret for {}",
                credentials.client_id()
            )))
        }
    }
}
