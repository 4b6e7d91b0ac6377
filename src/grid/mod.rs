//! Paged image listing.
//!
//! Unlike the [`cursor`](crate::cursor), the grid never filters on the
//! client and never wraps: it asks the backend for a whole page and shows
//! it. Paging is clamped to `[1, total_pages]`.

use tracing::debug;

use crate::client::ImageSource;
use crate::error::Result;
use crate::model::attachment::AttachmentRecord;
use crate::model::image::{ImageOrder, ImagePage, ImageQuery, SortDirection};

/// State of the image grid.
#[derive(Debug, Clone)]
pub struct ImageGrid {
    query: ImageQuery,
    page: u32,
    total_pages: u32,
    images: Vec<AttachmentRecord>,
    loaded: bool,
}

impl ImageGrid {
    pub fn new(query: ImageQuery) -> Self {
        Self {
            query,
            page: 1,
            total_pages: 1,
            images: Vec::new(),
            loaded: false,
        }
    }

    pub fn query(&self) -> &ImageQuery {
        &self.query
    }

    /// Current 1-based page.
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn images(&self) -> &[AttachmentRecord] {
        &self.images
    }

    /// Whether a page has been applied since the last query change.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Page number `next_page` would load, if any.
    pub fn next_page_number(&self) -> Option<u32> {
        (self.page < self.total_pages).then(|| self.page + 1)
    }

    /// Page number `previous_page` would load, if any.
    pub fn previous_page_number(&self) -> Option<u32> {
        (self.page > 1).then(|| self.page - 1)
    }

    /// Change the sort key. Restarts at page 1.
    pub fn set_order(&mut self, order: ImageOrder) {
        self.query.order = order;
        self.restart();
    }

    /// Change the sort direction. Restarts at page 1.
    pub fn set_direction(&mut self, direction: SortDirection) {
        self.query.direction = direction;
        self.restart();
    }

    /// Toggle inclusion of non-image attachments. Restarts at page 1.
    pub fn set_all_types(&mut self, all_types: bool) {
        self.query.all_types = all_types;
        self.restart();
    }

    /// Take a page served by the backend as the new state.
    pub fn apply(&mut self, page: ImagePage) {
        self.total_pages = page.total_pages.max(1);
        self.page = page.page.clamp(1, self.total_pages);
        self.images = page.images;
        self.loaded = true;
        debug!(
            page = self.page,
            total_pages = self.total_pages,
            images = self.images.len(),
            "Applied image page"
        );
    }

    /// Load the current page.
    pub async fn load<S>(&mut self, source: &S) -> Result<()>
    where
        S: ImageSource + ?Sized,
    {
        self.goto(source, self.page).await
    }

    /// Load a specific page, clamped to `[1, total_pages]` once the page
    /// count is known.
    pub async fn goto<S>(&mut self, source: &S, page: u32) -> Result<()>
    where
        S: ImageSource + ?Sized,
    {
        let page = if self.loaded {
            page.clamp(1, self.total_pages)
        } else {
            page.max(1)
        };
        let served = source.image_page(&self.query, page).await?;
        self.apply(served);
        Ok(())
    }

    /// Load the next page. Returns `false` (and fetches nothing) on the
    /// last page.
    pub async fn next_page<S>(&mut self, source: &S) -> Result<bool>
    where
        S: ImageSource + ?Sized,
    {
        match self.next_page_number() {
            Some(page) => self.goto(source, page).await.map(|()| true),
            None => Ok(false),
        }
    }

    /// Load the previous page. Returns `false` (and fetches nothing) on the
    /// first page.
    pub async fn previous_page<S>(&mut self, source: &S) -> Result<bool>
    where
        S: ImageSource + ?Sized,
    {
        match self.previous_page_number() {
            Some(page) => self.goto(source, page).await.map(|()| true),
            None => Ok(false),
        }
    }

    fn restart(&mut self) {
        self.page = 1;
        self.total_pages = 1;
        self.images.clear();
        self.loaded = false;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::model::attachment::AttachmentId;

    /// Serves `total` pages of `per_page` images and records every request.
    struct PagedSource {
        total: u32,
        per_page: u32,
        requests: Mutex<Vec<(ImageQuery, u32)>>,
    }

    impl PagedSource {
        fn new(total: u32, per_page: u32) -> Self {
            Self {
                total,
                per_page,
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requested_pages(&self) -> Vec<u32> {
            self.requests.lock().unwrap().iter().map(|(_, p)| *p).collect()
        }
    }

    #[async_trait]
    impl ImageSource for PagedSource {
        async fn image_page(&self, query: &ImageQuery, page: u32) -> Result<ImagePage> {
            self.requests.lock().unwrap().push((query.clone(), page));
            let images = (0..self.per_page)
                .map(|i| AttachmentRecord {
                    attachment_id: AttachmentId::Int((page * 100 + i) as i64),
                    content_type: "image/jpeg".to_string(),
                    size: 1,
                    filename: None,
                    metadata: Default::default(),
                })
                .collect();
            Ok(ImagePage {
                page,
                total_pages: self.total,
                images,
            })
        }
    }

    #[tokio::test]
    async fn test_load_takes_total_pages_from_backend() {
        let source = PagedSource::new(3, 2);
        let mut grid = ImageGrid::new(ImageQuery::default());
        assert!(!grid.is_loaded());
        grid.load(&source).await.unwrap();
        assert!(grid.is_loaded());
        assert_eq!(grid.page(), 1);
        assert_eq!(grid.total_pages(), 3);
        assert_eq!(grid.images().len(), 2);
    }

    #[tokio::test]
    async fn test_paging_is_clamped() {
        let source = PagedSource::new(3, 1);
        let mut grid = ImageGrid::new(ImageQuery::default());
        grid.load(&source).await.unwrap();

        assert!(!grid.previous_page(&source).await.unwrap());
        assert!(grid.next_page(&source).await.unwrap());
        assert!(grid.next_page(&source).await.unwrap());
        assert_eq!(grid.page(), 3);
        assert!(!grid.next_page(&source).await.unwrap());
        assert_eq!(grid.page(), 3);
        assert!(grid.previous_page(&source).await.unwrap());
        assert_eq!(grid.page(), 2);

        // No fetch happened at either bound; no wrap-around either.
        assert_eq!(source.requested_pages(), vec![1, 2, 3, 2]);
    }

    #[tokio::test]
    async fn test_query_change_restarts_at_page_one() {
        let source = PagedSource::new(5, 1);
        let mut grid = ImageGrid::new(ImageQuery::default());
        grid.load(&source).await.unwrap();
        grid.next_page(&source).await.unwrap();
        assert_eq!(grid.page(), 2);

        grid.set_all_types(true);
        assert_eq!(grid.page(), 1);
        assert!(!grid.is_loaded());
        grid.load(&source).await.unwrap();

        grid.set_order(ImageOrder::Size);
        grid.set_direction(SortDirection::Asc);
        grid.load(&source).await.unwrap();

        let requests = source.requests.lock().unwrap().clone();
        let (last_query, last_page) = requests.last().unwrap();
        assert_eq!(*last_page, 1);
        assert!(last_query.all_types);
        assert_eq!(last_query.order, ImageOrder::Size);
        assert_eq!(last_query.direction, SortDirection::Asc);
    }

    #[tokio::test]
    async fn test_goto_before_first_load_trusts_backend() {
        let source = PagedSource::new(6, 1);
        let mut grid = ImageGrid::new(ImageQuery::default());
        grid.goto(&source, 4).await.unwrap();
        assert_eq!(grid.page(), 4);
        grid.goto(&source, 40).await.unwrap();
        assert_eq!(grid.page(), 6);
        assert_eq!(source.requested_pages(), vec![4, 6]);
    }

    #[test]
    fn test_apply_clamps_bad_backend_values() {
        let mut grid = ImageGrid::new(ImageQuery::default());
        grid.apply(ImagePage {
            page: 0,
            total_pages: 0,
            images: Vec::new(),
        });
        assert_eq!(grid.page(), 1);
        assert_eq!(grid.total_pages(), 1);
        assert_eq!(grid.next_page_number(), None);
        assert_eq!(grid.previous_page_number(), None);

        grid.apply(ImagePage {
            page: 9,
            total_pages: 4,
            images: Vec::new(),
        });
        assert_eq!(grid.page(), 4);
        assert_eq!(grid.previous_page_number(), Some(3));
    }
}
