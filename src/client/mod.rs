//! Backend access: the traits the cursor and the grid are written against,
//! and the reqwest-based implementation.

pub mod http;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::attachment::{AttachmentId, AttachmentRecord};
use crate::model::image::{ImagePage, ImageQuery};
use crate::model::ordering::Ordering;

pub use http::{Download, HttpClient};

/// Outcome of a single record fetch that reached the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched {
    Record(AttachmentRecord),
    /// Not-found, non-OK status, empty body, or a payload without an id.
    Missing,
}

/// A server-side collection of attachments the cursor can walk.
#[async_trait]
pub trait AttachmentSource: Send + Sync {
    /// Fetch one record at `offset` under `ordering`.
    ///
    /// `offset` is ignored for [`Ordering::Random`]. Only transport failures
    /// are returned as `Err`; everything the backend answers is mapped to a
    /// [`Fetched`] value.
    async fn fetch(&self, ordering: Ordering, offset: u64) -> Result<Fetched>;

    /// Delete a record permanently.
    async fn delete(&self, id: &AttachmentId) -> Result<()>;
}

/// A server-side paged listing of images.
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Fetch the 1-based `page` of the listing described by `query`.
    async fn image_page(&self, query: &ImageQuery, page: u32) -> Result<ImagePage>;
}
