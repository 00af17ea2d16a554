//! Helpers for server relative paths
//!
//! Paths are plain strings separated by `/`. No validation is done: the server is the
//! only judge of whether a path exists.

use std::borrow::Cow;

/// Extensions that make [`UploadTarget::Inferred`] treat the last segment as a file name.
pub const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls"];

/// Returns the last segment of a path, ignoring trailing slashes.
///
/// ```rust
/// use sharepoint_files::path::base_name;
///
/// assert_eq!(base_name("/sites/team/Docs/notes.txt"), "notes.txt");
/// assert_eq!(base_name("/sites/team/Docs/"), "Docs");
/// ```
pub fn base_name(path: &str) -> &str {
    let path = path.trim_end_matches('/');
    path.rsplit('/').next().unwrap_or(path)
}

/// Returns everything before the last segment of a path, ignoring trailing slashes.
///
/// ```rust
/// use sharepoint_files::path::parent;
///
/// assert_eq!(parent("/sites/team/Docs/notes.txt"), "/sites/team/Docs");
/// assert_eq!(parent("notes.txt"), "");
/// ```
pub fn parent(path: &str) -> &str {
    let path = path.trim_end_matches('/');
    match path.rfind('/') {
        Some(0) => "/",
        Some(index) => &path[..index],
        None => "",
    }
}

/// Appends a name to a folder path, with exactly one `/` between them.
pub fn join(folder: &str, name: &str) -> String {
    format!(
        "{}/{}",
        folder.trim_end_matches('/'),
        name.trim_start_matches('/')
    )
}

fn has_spreadsheet_extension(segment: &str) -> bool {
    segment
        .rsplit_once('.')
        .map(|(stem, ext)| {
            !stem.is_empty()
                && SPREADSHEET_EXTENSIONS
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

/// Where an uploaded file should be stored
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UploadTarget<'a> {
    /// Store the file in this folder, under the local file name.
    Folder(Cow<'a, str>),
    /// Store the file at exactly this path.
    File(Cow<'a, str>),
    /// Store the file under the local file name, in the folder designated by the path.
    ///
    /// When the last segment of the path looks like a spreadsheet name (see
    /// [`SPREADSHEET_EXTENSIONS`]), it is dropped and the rest is used as the folder:
    /// the given name is ignored.
    Inferred(Cow<'a, str>),
}

impl<'a> UploadTarget<'a> {
    #[inline]
    pub fn folder(value: impl Into<Cow<'a, str>>) -> Self {
        Self::Folder(value.into())
    }

    #[inline]
    pub fn file(value: impl Into<Cow<'a, str>>) -> Self {
        Self::File(value.into())
    }

    /// Returns the folder and the name under which a local file named `local_name` is stored.
    pub fn resolve<'b>(&'b self, local_name: &'b str) -> (&'b str, &'b str) {
        match self {
            Self::Folder(folder) => (folder.as_ref(), local_name),
            Self::File(path) => (parent(path), base_name(path)),
            Self::Inferred(path) if has_spreadsheet_extension(base_name(path)) => {
                (parent(path), local_name)
            }
            Self::Inferred(path) => (path.as_ref(), local_name),
        }
    }
}

impl<'a> From<&'a str> for UploadTarget<'a> {
    fn from(value: &'a str) -> Self {
        Self::Inferred(Cow::Borrowed(value))
    }
}

impl<'a> From<&'a String> for UploadTarget<'a> {
    fn from(value: &'a String) -> Self {
        Self::Inferred(Cow::Borrowed(value.as_str()))
    }
}

impl From<String> for UploadTarget<'_> {
    fn from(value: String) -> Self {
        Self::Inferred(Cow::Owned(value))
    }
}
