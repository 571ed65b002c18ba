//! GoPro cloud media API HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use futures::StreamExt;
use reqwest::{header, Client, Method, RequestBuilder, Response, StatusCode};
use url::Url;

use crate::api::auth::Credential;
use crate::api::types::{MediaItem, SearchResponse, ServerError};
use crate::error::{Error, Result};

/// Default API base URL.
pub const API_BASE: &str = "https://api.gopro.com";

/// Browser identity sent with every request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Fields requested for every search page.
pub const SEARCH_FIELDS: &str = "id,created_at,content_title,filename,file_extension,file_size";

/// Timeout for metadata requests (search, validation, HEAD probe).
const METADATA_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for the initiating request of a streamed archive download.
const STREAM_OPEN_TIMEOUT: Duration = Duration::from_secs(30);

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

const VALIDATE_PATH: &str = "/media/user";
const SEARCH_PATH: &str = "/media/search";
const ARCHIVE_PATH: &str = "/media/x/zip/source";

/// Archive body as a stream of byte chunks.
pub type ByteStream = BoxStream<'static, Result<Bytes>>;

/// One page of search results.
#[derive(Debug, Clone)]
pub struct SearchPage {
    pub page: u32,
    pub items: Vec<MediaItem>,
    pub total_pages: u32,
}

/// Result of a metadata-only archive probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveProbe {
    pub status: u16,
    pub content_length: Option<u64>,
}

impl ArchiveProbe {
    /// Size the server would send, if the probe succeeded and declared one.
    pub fn expected_size(&self) -> Option<u64> {
        if self.status == StatusCode::OK.as_u16() {
            self.content_length
        } else {
            None
        }
    }
}

/// Response to an archive GET.
pub enum ArchiveResponse {
    /// Server accepted the request and is streaming the zip.
    Stream {
        content_length: Option<u64>,
        body: ByteStream,
    },
    /// Server refused the request.
    Rejected { status: u16, body: ServerError },
}

/// Source of catalog pages and archives.
///
/// Implementations issue exactly one request per call; retrying is left to
/// the caller.
#[async_trait]
pub trait MediaSource: Send + Sync {
    /// Fetch one page of the media library.
    async fn search(&self, page: u32, per_page: u32) -> Result<SearchPage>;

    /// Probe the archive for the given ids without transferring the body.
    async fn probe_archive(&self, ids: &[String]) -> Result<ArchiveProbe>;

    /// Start streaming the archive for the given ids.
    async fn open_archive(&self, ids: &[String]) -> Result<ArchiveResponse>;
}

/// Authenticated API client.
pub struct MediaApi {
    client: Client,
    base_url: Url,
    credential: Credential,
}

impl MediaApi {
    /// Create a new API client.
    pub fn new(credential: Credential, base_url: &str, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .default_headers(credential.default_headers()?)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| Error::Api(format!("Failed to create HTTP client: {}", e)))?;

        let base_url = Url::parse(base_url)?;

        Ok(Self {
            client,
            base_url,
            credential,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.endpoint(path)?;
        tracing::debug!("{} {}", method, url);
        Ok(self.client.request(method, url))
    }

    fn archive_request(&self, method: Method, ids: &[String]) -> Result<RequestBuilder> {
        let joined = ids.join(",");
        Ok(self.request(method, ARCHIVE_PATH)?.query(&[
            ("ids", joined.as_str()),
            ("access_token", self.credential.auth_token()),
        ]))
    }

    /// Check that the credential is accepted by the API.
    pub async fn validate(&self) -> Result<()> {
        let response = self
            .request(Method::GET, VALIDATE_PATH)?
            .timeout(METADATA_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Validation response status: {}", status);

        if status != StatusCode::OK {
            let body = read_error_body(response).await;
            return Err(Error::Authentication {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}

#[async_trait]
impl MediaSource for MediaApi {
    async fn search(&self, page: u32, per_page: u32) -> Result<SearchPage> {
        let response = self
            .request(Method::GET, SEARCH_PATH)?
            .query(&[
                ("per_page", per_page.to_string()),
                ("page", page.to_string()),
                ("fields", SEARCH_FIELDS.to_string()),
            ])
            .timeout(METADATA_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Search page {} response status: {}", page, status);

        if status != StatusCode::OK {
            let body = read_error_body(response).await;
            return Err(Error::Enumeration {
                page,
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        let parsed: SearchResponse = serde_json::from_str(&text).map_err(|e| {
            Error::Api(format!(
                "Failed to parse search page {}: {} - Response: {}",
                page,
                e,
                text.chars().take(500).collect::<String>()
            ))
        })?;

        Ok(SearchPage {
            page,
            items: parsed.embedded.media,
            total_pages: parsed.pages.total_pages,
        })
    }

    async fn probe_archive(&self, ids: &[String]) -> Result<ArchiveProbe> {
        let response = self
            .archive_request(Method::HEAD, ids)?
            .timeout(METADATA_TIMEOUT)
            .send()
            .await?;

        let probe = ArchiveProbe {
            status: response.status().as_u16(),
            content_length: header_content_length(&response),
        };
        tracing::debug!("Archive probe: {:?}", probe);

        Ok(probe)
    }

    async fn open_archive(&self, ids: &[String]) -> Result<ArchiveResponse> {
        let send = self.archive_request(Method::GET, ids)?.send();
        let response = tokio::time::timeout(STREAM_OPEN_TIMEOUT, send)
            .await
            .map_err(|_| {
                Error::Timeout(format!(
                    "archive request not answered within {}s",
                    STREAM_OPEN_TIMEOUT.as_secs()
                ))
            })??;

        let status = response.status();
        tracing::debug!("Archive response status: {}", status);

        if status != StatusCode::OK {
            let body = read_error_body(response).await;
            return Ok(ArchiveResponse::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let content_length = header_content_length(&response);
        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(Error::from))
            .boxed();

        Ok(ArchiveResponse::Stream {
            content_length,
            body,
        })
    }
}

/// Read `Content-Length` straight from the headers.
///
/// `Response::content_length` reflects the body, which is empty for HEAD.
fn header_content_length(response: &Response) -> Option<u64> {
    response
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

async fn read_error_body(response: Response) -> ServerError {
    let text = response.text().await.unwrap_or_default();
    ServerError::from_body(&text)
}
