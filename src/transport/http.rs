//! The transport implementing the [SharePoint REST API](https://learn.microsoft.com/en-us/sharepoint/dev/sp-add-ins/working-with-folders-and-files-with-rest)

use super::Transport;
use crate::entry::{FileRecord, FolderListing, FolderRecord, SiteInfo};
use crate::error::{ConnectivityError, Error};
use crate::session::Session;
use bytes::Bytes;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::header::{ACCEPT, CONTENT_TYPE, IF_MATCH};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use std::time::Duration;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Asks the server for plain JSON objects, without the odata annotations
pub const ODATA_JSON: &str = "application/json;odata=nometadata";
/// The delay before the first retry, doubled on every following attempt
pub const DEFAULT_BACKOFF: Duration = Duration::from_millis(500);

const LITERAL: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'?');

/// Formats a path as the content of a quoted odata string literal.
fn literal(value: &str) -> String {
    utf8_percent_encode(&value.replace('\'', "''"), LITERAL).to_string()
}

fn folder_url(session: &Session, path: &str) -> String {
    format!(
        "{}/_api/web/GetFolderByServerRelativeUrl('{}')",
        session.site_url(),
        literal(path)
    )
}

fn file_url(session: &Session, path: &str) -> String {
    format!(
        "{}/_api/web/GetFileByServerRelativeUrl('{}')",
        session.site_url(),
        literal(path)
    )
}

/// Statuses meaning the store is not able to answer, rather than refusing the request
fn is_unavailable(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

fn is_retryable(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    )
}

/// Whether a failing request was reading or writing, to choose the error it maps to
#[derive(Clone, Copy, Debug)]
enum Access {
    Read,
    Write,
}

#[derive(Debug, Default, serde::Deserialize)]
struct ErrorBody {
    #[serde(rename = "odata.error")]
    error: Option<ODataError>,
}

#[derive(Debug, serde::Deserialize)]
struct ODataError {
    #[serde(default)]
    code: String,
    message: ODataMessage,
}

#[derive(Debug, serde::Deserialize)]
struct ODataMessage {
    value: String,
}

async fn check_response(res: Response, path: &str, access: Access) -> Result<Response, Error> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let body = res.text().await.unwrap_or_default();
    let parsed = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|body| body.error);
    let file_not_found = parsed
        .as_ref()
        .map(|err| err.code.contains("FileNotFoundException"))
        .unwrap_or(false);
    let message = match parsed {
        Some(err) => err.message.value,
        None if !body.trim().is_empty() => body.trim().to_string(),
        None => status.canonical_reason().unwrap_or_default().to_string(),
    };
    tracing::debug!("{path} failed with status {status:?}: {message}");
    Err(match (status, access) {
        (StatusCode::UNAUTHORIZED, _) => Error::Authentication(message),
        (StatusCode::NOT_FOUND, _) => Error::NotFound(path.to_string()),
        _ if file_not_found => Error::NotFound(path.to_string()),
        (status, Access::Read) if is_unavailable(status) => {
            Error::Connectivity(ConnectivityError::Unavailable {
                status: status.as_u16(),
                message,
            })
        }
        (_, Access::Read) => Error::Protocol(status.as_u16(), message),
        (_, Access::Write) => Error::Transfer {
            path: path.to_string(),
            status: status.as_u16(),
            message,
        },
    })
}

async fn read_json<T: serde::de::DeserializeOwned>(res: Response) -> Result<T, Error> {
    let body = res.bytes().await?;
    serde_json::from_slice(&body).map_err(Error::from)
}

/// Transport for SharePoint Online sites
///
/// ```
/// use sharepoint_files::transport::http::HttpTransport;
/// use std::time::Duration;
///
/// let inner = reqwest::Client::builder()
///     .timeout(Duration::from_secs(30))
///     .build()
///     .unwrap();
/// let _transport = HttpTransport::new(inner).with_max_retries(3);
/// ```
#[derive(Clone, Debug)]
pub struct HttpTransport {
    inner: reqwest::Client,
    max_retries: u32,
    backoff: Duration,
}

impl HttpTransport {
    /// Creates a transport that doesn't retry failed requests.
    pub fn new(inner: reqwest::Client) -> Self {
        Self {
            inner,
            max_retries: 0,
            backoff: DEFAULT_BACKOFF,
        }
    }

    /// Sets how many times a request is sent again after a connection error or
    /// a `429`, `503` or `504` response.
    pub fn set_max_retries(&mut self, value: u32) {
        self.max_retries = value;
    }

    pub fn with_max_retries(mut self, value: u32) -> Self {
        self.set_max_retries(value);
        self
    }

    pub fn set_backoff(&mut self, value: Duration) {
        self.backoff = value;
    }

    pub fn with_backoff(mut self, value: Duration) -> Self {
        self.set_backoff(value);
        self
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    #[tracing::instrument(name = "send", skip(self, session, build))]
    async fn send<F>(
        &self,
        session: &Session,
        method: Method,
        url: &str,
        build: F,
    ) -> Result<Response, Error>
    where
        F: Fn(RequestBuilder) -> RequestBuilder + Send,
    {
        let mut attempt = 0;
        loop {
            let req = self
                .inner
                .request(method.clone(), url)
                .bearer_auth(session.access_token())
                .header(ACCEPT, ODATA_JSON);
            match build(req).send().await {
                Ok(res) if is_retryable(res.status()) && attempt < self.max_retries => {
                    tracing::warn!(
                        "responded with status {:?}, retry {}/{}",
                        res.status(),
                        attempt + 1,
                        self.max_retries
                    );
                }
                Ok(res) => {
                    tracing::debug!("responded with status {:?}", res.status());
                    return Ok(res);
                }
                Err(err) if (err.is_connect() || err.is_timeout()) && attempt < self.max_retries => {
                    tracing::warn!(
                        "request failed: {err}, retry {}/{}",
                        attempt + 1,
                        self.max_retries
                    );
                }
                Err(err) => return Err(Error::from(err)),
            }
            let delay = self.backoff.saturating_mul(2u32.saturating_pow(attempt));
            attempt += 1;
            tokio::time::sleep(delay).await;
        }
    }

    async fn get(
        &self,
        session: &Session,
        url: &str,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Response, Error> {
        let res = self
            .send(session, Method::GET, url, |req| req.query(query))
            .await?;
        check_response(res, path, Access::Read).await
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn site_info(&self, session: &Session) -> crate::Result<SiteInfo> {
        let url = format!("{}/_api/web", session.site_url());
        let res = self
            .get(session, &url, "/", &[("$select", "Title,Url")])
            .await?;
        read_json(res).await
    }

    async fn get_folder(&self, session: &Session, path: &str) -> crate::Result<FolderRecord> {
        let res = self
            .get(session, &folder_url(session, path), path, &[])
            .await?;
        read_json(res).await
    }

    async fn list_folder(&self, session: &Session, path: &str) -> crate::Result<FolderListing> {
        let res = self
            .get(
                session,
                &folder_url(session, path),
                path,
                &[("$expand", "Files,Folders")],
            )
            .await?;
        read_json(res).await
    }

    async fn get_file(&self, session: &Session, path: &str) -> crate::Result<FileRecord> {
        let res = self.get(session, &file_url(session, path), path, &[]).await?;
        read_json(res).await
    }

    async fn upload(
        &self,
        session: &Session,
        folder: &str,
        name: &str,
        content: Bytes,
    ) -> crate::Result<FileRecord> {
        let url = format!(
            "{}/Files/add(url='{}',overwrite=true)",
            folder_url(session, folder),
            literal(name)
        );
        let res = self
            .send(session, Method::POST, &url, |req| {
                req.header(CONTENT_TYPE, "application/octet-stream")
                    .body(content.clone())
            })
            .await?;
        let res = check_response(res, &crate::path::join(folder, name), Access::Write).await?;
        read_json(res).await
    }

    async fn download(
        &self,
        session: &Session,
        path: &str,
        writer: &mut (dyn AsyncWrite + Unpin + Send),
    ) -> crate::Result<u64> {
        let url = format!("{}/$value", file_url(session, path));
        let mut res = self.get(session, &url, path, &[]).await?;
        let mut size = 0;
        while let Some(chunk) = res.chunk().await? {
            writer
                .write_all(chunk.as_ref())
                .await
                .map_err(|err| Error::io(path, err))?;
            size += chunk.len() as u64;
        }
        writer.flush().await.map_err(|err| Error::io(path, err))?;
        Ok(size)
    }

    async fn delete(&self, session: &Session, path: &str) -> crate::Result<()> {
        let res = self
            .send(session, Method::POST, &file_url(session, path), |req| {
                req.header("X-HTTP-Method", "DELETE").header(IF_MATCH, "*")
            })
            .await?;
        check_response(res, path, Access::Write).await?;
        Ok(())
    }

    async fn read(&self, session: &Session, path: &str) -> crate::Result<Bytes> {
        let url = format!("{}/$value", file_url(session, path));
        let res = self.get(session, &url, path, &[]).await?;
        Ok(res.bytes().await?)
    }
}
