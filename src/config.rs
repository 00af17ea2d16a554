//! Configuration file describing how to connect to a site.
//!
//! ```json
//! {
//!   "endpoint": "https://contoso.sharepoint.com/sites/team",
//!   "client_id": "00000000-0000-0000-0000-000000000000",
//!   "client_secret": "...",
//!   "timeout_ms": 30000,
//!   "max_retries": 3
//! }
//! ```

use crate::builder::ClientBuilder;
use crate::credentials::Credentials;
use crate::error::Error;
use std::path::Path;
use std::time::Duration;

#[derive(serde::Deserialize)]
pub struct Config {
    pub endpoint: String,
    pub client_id: String,
    pub client_secret: String,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    #[serde(default)]
    pub max_retries: Option<u32>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("endpoint", &self.endpoint)
            .field("client_id", &self.client_id)
            .field("client_secret", &"********")
            .field("timeout_ms", &self.timeout_ms)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl Config {
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let reader = std::fs::File::open(path).map_err(|err| Error::io(path, err))?;
        let result = serde_json::from_reader(std::io::BufReader::new(reader))?;
        Ok(result)
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.endpoint, &self.client_id, &self.client_secret)
    }

    pub fn into_builder(self) -> ClientBuilder {
        let mut builder = ClientBuilder::default().with_credentials(self.credentials());
        if let Some(timeout) = self.timeout_ms.map(Duration::from_millis) {
            builder.set_timeout(timeout);
        }
        if let Some(max_retries) = self.max_retries {
            builder.set_max_retries(max_retries);
        }
        builder
    }
}

#[cfg(test)]
mod tests {
    use super::Config;

    #[test]
    fn should_read_file() {
        let dir = temp_dir::TempDir::new().unwrap();
        let path = dir.child("config.json");
        std::fs::write(
            &path,
            r#"{"endpoint": "https://contoso.sharepoint.com/sites/team/", "client_id": "id", "client_secret": "secret", "max_retries": 2}"#,
        )
        .unwrap();
        let config = Config::from_path(&path).unwrap();
        assert_eq!(config.max_retries, Some(2));
        assert_eq!(config.timeout_ms, None);
        assert_eq!(
            config.credentials().endpoint(),
            "https://contoso.sharepoint.com/sites/team"
        );
    }

    #[test]
    fn should_fail_on_missing_file() {
        let dir = temp_dir::TempDir::new().unwrap();
        let err = Config::from_path(&dir.child("missing.json")).unwrap_err();
        assert!(matches!(err, crate::Error::Io { .. }));
    }

    #[test]
    fn should_hide_secret() {
        let config: Config = serde_json::from_str(
            r#"{"endpoint": "https://contoso.sharepoint.com/sites/team", "client_id": "id", "client_secret": "very-secret"}"#,
        )
        .unwrap();
        let output = format!("{config:?}");
        assert!(output.contains("client_id: \"id\""));
        assert!(!output.contains("very-secret"));
    }
}
