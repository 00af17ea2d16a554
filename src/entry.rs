//! The metadata returned by the remote store for files, folders and sites

use chrono::{DateTime, Utc};
use serde_json::Value;

/// The properties of an object, as reported by the server
pub type Properties = serde_json::Map<String, Value>;

/// A file with every property the server returned for it, including `Name`
#[derive(Clone, Debug, PartialEq)]
pub struct FileRecord {
    pub name: String,
    pub properties: Properties,
}

impl FileRecord {
    /// Builds a record out of the properties of a file.
    ///
    /// Returns `None` when the properties don't contain a `Name`.
    pub fn from_properties(properties: Properties) -> Option<Self> {
        let name = properties.get("Name")?.as_str()?.to_string();
        Some(Self { name, properties })
    }

    pub fn server_relative_url(&self) -> Option<&str> {
        self.properties
            .get("ServerRelativeUrl")
            .and_then(Value::as_str)
    }

    /// The size of the file in bytes.
    ///
    /// SharePoint reports `Length` as a string, some proxies as a number: both are accepted.
    pub fn size(&self) -> Option<u64> {
        match self.properties.get("Length")? {
            Value::String(value) => value.parse().ok(),
            Value::Number(value) => value.as_u64(),
            _ => None,
        }
    }

    pub fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.properties
            .get("TimeLastModified")
            .and_then(Value::as_str)
            .and_then(|value| DateTime::parse_from_rfc3339(value).ok())
            .map(|value| value.with_timezone(&Utc))
    }
}

impl<'de> serde::Deserialize<'de> for FileRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let properties = Properties::deserialize(deserializer)?;
        Self::from_properties(properties).ok_or_else(|| serde::de::Error::missing_field("Name"))
    }
}

impl serde::Serialize for FileRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.properties.serialize(serializer)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct FolderRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "ServerRelativeUrl")]
    pub server_relative_url: String,
    #[serde(rename = "ItemCount", default)]
    pub item_count: u64,
}

/// A folder with its direct children
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct FolderListing {
    #[serde(flatten)]
    pub folder: FolderRecord,
    #[serde(rename = "Files", default)]
    pub files: Vec<FileRecord>,
    #[serde(rename = "Folders", default)]
    pub folders: Vec<FolderRecord>,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct SiteInfo {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Url", default)]
    pub url: String,
}
