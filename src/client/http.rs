//! HTTP implementation of the backend traits.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::{AttachmentSource, Fetched, ImageSource};
use crate::config::ServerConfig;
use crate::error::{AttachError, Result};
use crate::model::attachment::{AttachmentId, AttachmentRecord};
use crate::model::image::{ImagePage, ImageQuery};
use crate::model::ordering::Ordering;

/// Client for the mail-archive backend API.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: Url,
}

impl HttpClient {
    /// Create a client for `base_url` (e.g. `http://localhost:8000/api`).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| AttachError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(AttachError::InvalidUrl(base_url.to_string()));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AttachError::transport(base_url.as_str(), e))?;
        Ok(Self { client, base_url })
    }

    /// Create a client from the `[server]` config section.
    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    /// The base URL every endpoint is resolved against.
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Append path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AttachError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// URL of the single-record endpoint for `ordering` at `offset`.
    pub fn record_url(&self, ordering: Ordering, offset: u64) -> Result<Url> {
        let url = match ordering {
            Ordering::Random => self.endpoint(&["attachments", "random"])?,
            Ordering::IdAscending => {
                let mut url = self.endpoint(&["attachments", "by-id"])?;
                url.query_pairs_mut()
                    .append_pair("offset", &offset.to_string());
                url
            }
            Ordering::SizeAscending | Ordering::SizeDescending => {
                let mut url = self.endpoint(&["attachments", "by-size"])?;
                url.query_pairs_mut()
                    .append_pair("order", ordering.size_order().unwrap_or("asc"))
                    .append_pair("offset", &offset.to_string());
                url
            }
        };
        Ok(url)
    }

    /// URL of the raw content of an attachment.
    pub fn content_url(&self, id: &AttachmentId, preview: bool) -> Result<Url> {
        let mut url = self.endpoint(&["attachments", &id.to_string()])?;
        if preview {
            url.query_pairs_mut().append_pair("preview", "true");
        }
        Ok(url)
    }

    /// URL of one page of the image listing.
    pub fn images_url(&self, query: &ImageQuery, page: u32) -> Result<Url> {
        let mut url = self.endpoint(&["attachments", "images"])?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("page", &page.to_string())
                .append_pair("page_size", &query.page_size.to_string())
                .append_pair("order", query.order.as_str())
                .append_pair("direction", query.direction.as_str());
            if query.all_types {
                pairs.append_pair("all_types", "true");
            }
        }
        Ok(url)
    }

    /// Download the raw bytes of an attachment (or its preview rendition).
    pub async fn fetch_content(&self, id: &AttachmentId, preview: bool) -> Result<Vec<u8>> {
        self.download(id, preview).await.map(|d| d.bytes)
    }

    /// Download an attachment together with what the response headers say
    /// about its name and type.
    pub async fn download(&self, id: &AttachmentId, preview: bool) -> Result<Download> {
        let url = self.content_url(id, preview)?;
        debug!(%url, "Fetching attachment content");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| AttachError::transport(url.as_str(), e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(AttachError::Http {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let (filename, content_type) = describe_body(response.headers());
        let bytes = response
            .bytes()
            .await
            .map_err(|e| AttachError::transport(url.as_str(), e))?;
        Ok(Download {
            bytes: bytes.to_vec(),
            filename,
            content_type,
        })
    }
}

/// Raw attachment content as served by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub bytes: Vec<u8>,
    /// `filename` parameter of `Content-Disposition`, if any.
    pub filename: Option<String>,
    /// `Content-Type` without parameters.
    pub content_type: Option<String>,
}

fn describe_body(headers: &HeaderMap) -> (Option<String>, Option<String>) {
    let filename = headers
        .get(CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .and_then(disposition_filename);
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|v| v.trim().to_ascii_lowercase())
        .filter(|v| !v.is_empty());
    (filename, content_type)
}

/// Extract the `filename` parameter of a `Content-Disposition` value.
/// Quoted and bare values are accepted; `filename*` is not decoded.
pub(crate) fn disposition_filename(value: &str) -> Option<String> {
    value.split(';').skip(1).find_map(|param| {
        let (key, val) = param.split_once('=')?;
        if !key.trim().eq_ignore_ascii_case("filename") {
            return None;
        }
        let name = val.trim().trim_matches('"').trim();
        (!name.is_empty()).then(|| name.to_string())
    })
}

#[async_trait]
impl AttachmentSource for HttpClient {
    async fn fetch(&self, ordering: Ordering, offset: u64) -> Result<Fetched> {
        let url = self.record_url(ordering, offset)?;
        debug!(%url, %ordering, offset, "Fetching attachment");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| AttachError::transport(url.as_str(), e))?;

        let status = response.status();
        if !status.is_success() {
            if status.is_server_error() {
                warn!(%url, status = status.as_u16(), "Backend error, treating as not found");
            } else if status != StatusCode::NOT_FOUND {
                debug!(%url, status = status.as_u16(), "Non-OK response, treating as not found");
            }
            return Ok(Fetched::Missing);
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| AttachError::transport(url.as_str(), e))?;
        if body.iter().all(u8::is_ascii_whitespace) {
            debug!(%url, "Empty response body");
            return Ok(Fetched::Missing);
        }

        let payload: Value = match serde_json::from_slice(&body) {
            Ok(v) => v,
            Err(e) => {
                warn!(%url, error = %e, "Unparseable attachment payload");
                return Ok(Fetched::Missing);
            }
        };

        match AttachmentRecord::from_payload(payload) {
            Some(record) => Ok(Fetched::Record(record)),
            None => {
                warn!(%url, "Attachment payload without a usable attachment_id");
                Ok(Fetched::Missing)
            }
        }
    }

    async fn delete(&self, id: &AttachmentId) -> Result<()> {
        let url = self.content_url(id, false)?;
        debug!(%url, "Deleting attachment");
        let response = self
            .client
            .delete(url.clone())
            .send()
            .await
            .map_err(|e| AttachError::transport(url.as_str(), e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(AttachError::DeleteFailed {
                id: id.clone(),
                status: status.as_u16(),
            });
        }
        info!(%id, "Deleted attachment");
        Ok(())
    }
}

#[async_trait]
impl ImageSource for HttpClient {
    async fn image_page(&self, query: &ImageQuery, page: u32) -> Result<ImagePage> {
        let url = self.images_url(query, page)?;
        debug!(%url, "Fetching image page");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| AttachError::transport(url.as_str(), e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(AttachError::Http {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        response
            .json::<ImagePage>()
            .await
            .map_err(|e| AttachError::Decode {
                url: url.to_string(),
                reason: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::image::{ImageOrder, SortDirection};

    fn client(base: &str) -> HttpClient {
        HttpClient::new(base, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_record_urls() {
        let c = client("http://localhost:8000/api");
        assert_eq!(
            c.record_url(Ordering::Random, 9).unwrap().as_str(),
            "http://localhost:8000/api/attachments/random"
        );
        assert_eq!(
            c.record_url(Ordering::IdAscending, 3).unwrap().as_str(),
            "http://localhost:8000/api/attachments/by-id?offset=3"
        );
        assert_eq!(
            c.record_url(Ordering::SizeDescending, 0).unwrap().as_str(),
            "http://localhost:8000/api/attachments/by-size?order=desc&offset=0"
        );
    }

    #[test]
    fn test_trailing_slash_base() {
        let c = client("http://localhost:8000/api/");
        assert_eq!(
            c.content_url(&AttachmentId::Int(5), true).unwrap().as_str(),
            "http://localhost:8000/api/attachments/5?preview=true"
        );
    }

    #[test]
    fn test_images_url() {
        let c = client("http://host");
        let query = ImageQuery {
            page_size: 24,
            order: ImageOrder::Size,
            direction: SortDirection::Asc,
            all_types: true,
        };
        assert_eq!(
            c.images_url(&query, 2).unwrap().as_str(),
            "http://host/attachments/images?page=2&page_size=24&order=size&direction=asc&all_types=true"
        );
        let plain = ImageQuery::default();
        assert!(!c.images_url(&plain, 1).unwrap().as_str().contains("all_types"));
    }

    #[test]
    fn test_disposition_filename() {
        assert_eq!(
            disposition_filename("attachment; filename=\"beach.jpg\"").as_deref(),
            Some("beach.jpg")
        );
        assert_eq!(
            disposition_filename("inline; FileName=report.pdf; size=10").as_deref(),
            Some("report.pdf")
        );
        assert_eq!(disposition_filename("attachment"), None);
        assert_eq!(disposition_filename("attachment; filename=\"\""), None);
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(HttpClient::new("not a url", Duration::from_secs(1)).is_err());
        assert!(HttpClient::new("mailto:a@b.c", Duration::from_secs(1)).is_err());
    }
}
