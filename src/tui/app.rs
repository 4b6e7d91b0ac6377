//! Global application state for the TUI (the "Model" in Elm architecture).
//!
//! Network work runs on a tokio runtime. While a request is in flight the
//! cursor (or grid) it mutates is moved into the task, `in_flight` is set,
//! and every navigation key is ignored until the task hands it back.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tokio::runtime::Handle;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::client::HttpClient;
use crate::config::{self, Config};
use crate::cursor::{
    AttachmentCursor, CursorLimits, Direction, Filters, NotFoundReason, Resolution,
};
use crate::error::AttachError;
use crate::export::attachment::save_content;
use crate::grid::ImageGrid;
use crate::i18n;
use crate::model::attachment::AttachmentRecord;
use crate::model::image::ImageQuery;
use crate::model::ordering::Ordering;
use crate::store::content::ContentStore;

/// Which screen is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Viewer,
    Grid,
}

/// What the cursor task was asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorAction {
    Resolve(Direction),
    Delete,
}

/// Kind of request in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    Cursor(CursorAction),
    Grid,
    Save,
}

/// Value a finished task hands back.
pub enum JobOutcome {
    Cursor {
        cursor: AttachmentCursor,
        action: CursorAction,
        result: crate::error::Result<Resolution>,
    },
    Grid {
        grid: ImageGrid,
        result: crate::error::Result<()>,
    },
    Saved(crate::error::Result<PathBuf>),
}

struct InFlight {
    kind: JobKind,
    handle: JoinHandle<JobOutcome>,
}

/// Complete TUI state.
pub struct App {
    // ── Backend ───────────────────────────────
    pub client: Arc<HttpClient>,
    content: Arc<Mutex<ContentStore>>,
    runtime: Handle,
    in_flight: Option<InFlight>,

    // ── Viewer ────────────────────────────────
    /// `None` while a cursor task owns it.
    pub cursor: Option<AttachmentCursor>,
    /// Ordering and filters the cursor was last configured with.
    pub ordering: Ordering,
    pub filters: Filters,
    limits: CursorLimits,
    /// Why the last resolve found nothing, if it did.
    pub not_found: Option<NotFoundReason>,
    /// Min-size values `f` cycles through.
    pub min_size_presets: Vec<u64>,

    // ── Grid ──────────────────────────────────
    /// `None` while a grid task owns it.
    pub grid: Option<ImageGrid>,
    grid_query: ImageQuery,
    /// Selected row in the grid table.
    pub grid_selected: usize,

    // ── UI state ──────────────────────────────
    pub screen: Screen,
    pub show_help: bool,
    pub confirm_delete: bool,
    /// Persistent banner for backend failures; cleared by the next success.
    pub error_banner: Option<String>,
    /// Transient status message and the instant it was set.
    pub status_message: Option<(String, Instant)>,
    pub download_dir: PathBuf,

    // ── Lifecycle ─────────────────────────────
    pub should_quit: bool,
}

impl App {
    /// Build the app from configuration. Must be called outside of an async
    /// context; `runtime` is used to spawn all requests.
    pub fn new(client: HttpClient, config: &Config, runtime: Handle) -> Self {
        let ordering = config.viewer.ordering;
        let filters = config.viewer.filters();
        let limits = config.viewer.limits();
        let grid_query = config.grid.query();
        let content = ContentStore::new(client.clone(), config.performance.content_cache_size);

        Self {
            client: Arc::new(client),
            content: Arc::new(Mutex::new(content)),
            runtime,
            in_flight: None,
            cursor: Some(AttachmentCursor::new(ordering, filters).with_limits(limits)),
            ordering,
            filters,
            limits,
            not_found: None,
            min_size_presets: config.viewer.min_size_presets.clone(),
            grid: Some(ImageGrid::new(grid_query.clone())),
            grid_query,
            grid_selected: 0,
            screen: Screen::Viewer,
            show_help: false,
            confirm_delete: false,
            error_banner: None,
            status_message: None,
            download_dir: config::download_dir(config),
            should_quit: false,
        }
    }

    /// A request is in flight; navigation is disabled.
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Record shown in the viewer, if any.
    pub fn current_record(&self) -> Option<&AttachmentRecord> {
        self.cursor.as_ref().and_then(|c| c.current_record())
    }

    /// Image selected in the grid, if any.
    pub fn selected_image(&self) -> Option<&AttachmentRecord> {
        self.grid
            .as_ref()
            .and_then(|g| g.images().get(self.grid_selected))
    }

    /// Offset of the cursor, when it is not out on a task.
    pub fn offset(&self) -> Option<u64> {
        self.cursor.as_ref().map(|c| c.offset())
    }

    // ── Viewer actions ─────────────────────────────────────────────

    /// Start resolving in `direction`. Ignored while busy.
    pub fn navigate(&mut self, direction: Direction) {
        if self.is_busy() {
            return;
        }
        if direction == Direction::Previous && self.ordering.is_random() {
            self.set_status(i18n::msg_previous_disabled());
            return;
        }
        self.spawn_cursor(CursorAction::Resolve(direction));
    }

    /// Delete the displayed attachment, then advance.
    pub fn delete_current(&mut self) {
        self.confirm_delete = false;
        if self.is_busy() || self.current_record().is_none() {
            return;
        }
        self.spawn_cursor(CursorAction::Delete);
    }

    /// Switch to the next ordering and restart.
    pub fn cycle_ordering(&mut self) {
        let ordering = self.ordering.cycle();
        self.reconfigure(ordering, self.filters);
    }

    /// Switch to the next min-size preset and restart.
    pub fn cycle_min_size(&mut self) {
        if self.min_size_presets.is_empty() {
            return;
        }
        let idx = self
            .min_size_presets
            .iter()
            .position(|&s| s == self.filters.min_size)
            .map(|i| (i + 1) % self.min_size_presets.len())
            .unwrap_or(0);
        let filters = Filters {
            min_size: self.min_size_presets[idx],
            ..self.filters
        };
        self.reconfigure(self.ordering, filters);
    }

    /// Show or hide PDF / Word / octet-stream attachments and restart.
    pub fn toggle_octet_like(&mut self) {
        let filters = Filters {
            allow_octet_like: !self.filters.allow_octet_like,
            ..self.filters
        };
        self.reconfigure(self.ordering, filters);
    }

    /// Apply a new ordering / filters and resolve from the start.
    fn reconfigure(&mut self, ordering: Ordering, filters: Filters) {
        if self.is_busy() {
            return;
        }
        let Some(cursor) = self.cursor.as_mut() else {
            return;
        };
        cursor.reconfigure(ordering, filters);
        self.ordering = ordering;
        self.filters = filters;
        self.not_found = None;
        self.spawn_cursor(CursorAction::Resolve(Direction::Initial));
    }

    fn spawn_cursor(&mut self, action: CursorAction) {
        let Some(mut cursor) = self.cursor.take() else {
            return;
        };
        let client = Arc::clone(&self.client);
        let content = Arc::clone(&self.content);
        let handle = self.runtime.spawn(async move {
            let result = match action {
                CursorAction::Resolve(direction) => cursor.resolve(&*client, direction).await,
                CursorAction::Delete => {
                    let deleted = cursor.current_record().map(|r| r.attachment_id.clone());
                    let result = cursor.delete_current(&*client).await;
                    let delete_refused = matches!(
                        result,
                        Err(AttachError::DeleteFailed { .. }) | Err(AttachError::NoCurrentRecord)
                    );
                    if let (Some(id), false) = (deleted, delete_refused) {
                        content.lock().await.invalidate(&id);
                    }
                    result
                }
            };
            JobOutcome::Cursor {
                cursor,
                action,
                result,
            }
        });
        self.in_flight = Some(InFlight {
            kind: JobKind::Cursor(action),
            handle,
        });
    }

    // ── Grid actions ───────────────────────────────────────────────

    /// Switch to the grid, loading the first page if needed.
    pub fn open_grid(&mut self) {
        self.screen = Screen::Grid;
        let needs_load = self.grid.as_ref().is_some_and(|g| !g.is_loaded());
        if needs_load {
            self.load_grid_page(1);
        }
    }

    pub fn grid_next_page(&mut self) {
        if let Some(page) = self.grid.as_ref().and_then(|g| g.next_page_number()) {
            self.load_grid_page(page);
        }
    }

    pub fn grid_previous_page(&mut self) {
        if let Some(page) = self.grid.as_ref().and_then(|g| g.previous_page_number()) {
            self.load_grid_page(page);
        }
    }

    pub fn grid_cycle_order(&mut self) {
        if self.is_busy() {
            return;
        }
        if let Some(grid) = self.grid.as_mut() {
            grid.set_order(grid.query().order.cycle());
            self.grid_query = grid.query().clone();
        }
        self.load_grid_page(1);
    }

    pub fn grid_flip_direction(&mut self) {
        if self.is_busy() {
            return;
        }
        if let Some(grid) = self.grid.as_mut() {
            grid.set_direction(grid.query().direction.flip());
            self.grid_query = grid.query().clone();
        }
        self.load_grid_page(1);
    }

    pub fn grid_toggle_all_types(&mut self) {
        if self.is_busy() {
            return;
        }
        if let Some(grid) = self.grid.as_mut() {
            grid.set_all_types(!grid.query().all_types);
            self.grid_query = grid.query().clone();
        }
        self.load_grid_page(1);
    }

    pub fn grid_select(&mut self, delta: isize) {
        let len = self.grid.as_ref().map_or(0, |g| g.images().len());
        if len == 0 {
            self.grid_selected = 0;
            return;
        }
        let next = self.grid_selected as isize + delta;
        self.grid_selected = next.clamp(0, len as isize - 1) as usize;
    }

    fn load_grid_page(&mut self, page: u32) {
        if self.is_busy() {
            return;
        }
        let Some(mut grid) = self.grid.take() else {
            return;
        };
        let client = Arc::clone(&self.client);
        let handle = self.runtime.spawn(async move {
            let result = grid.goto(&*client, page).await;
            JobOutcome::Grid { grid, result }
        });
        self.in_flight = Some(InFlight {
            kind: JobKind::Grid,
            handle,
        });
    }

    // ── Saving ─────────────────────────────────────────────────────

    /// Save the record on screen (viewer) or the selected image (grid).
    pub fn save_selected(&mut self) {
        if self.is_busy() {
            return;
        }
        let record = match self.screen {
            Screen::Viewer => self.current_record(),
            Screen::Grid => self.selected_image(),
        };
        let Some(record) = record.cloned() else {
            return;
        };
        let content = Arc::clone(&self.content);
        let dir = self.download_dir.clone();
        let handle = self.runtime.spawn(async move {
            let result = async {
                let bytes = content
                    .lock()
                    .await
                    .get_content(&record.attachment_id, false)
                    .await?;
                save_content(&bytes, &record.display_name(), &dir)
            }
            .await;
            JobOutcome::Saved(result)
        });
        self.in_flight = Some(InFlight {
            kind: JobKind::Save,
            handle,
        });
    }

    // ── Lifecycle ──────────────────────────────────────────────────

    /// Set a transient status message that auto-clears after a few seconds.
    pub fn set_status(&mut self, msg: &str) {
        self.status_message = Some((msg.to_string(), Instant::now()));
    }

    /// Called every tick: collects finished requests and clears expired
    /// status messages.
    pub fn tick(&mut self) {
        self.poll_in_flight();
        if let Some((_, when)) = &self.status_message {
            if when.elapsed().as_secs() >= 5 {
                self.status_message = None;
            }
        }
    }

    /// Collect the in-flight task if it has finished. Every outcome,
    /// including a panicked task, clears the busy state.
    fn poll_in_flight(&mut self) {
        let finished = self
            .in_flight
            .as_ref()
            .is_some_and(|f| f.handle.is_finished());
        if !finished {
            return;
        }
        let Some(InFlight { kind, handle }) = self.in_flight.take() else {
            return;
        };
        // The task is done, so this does not block.
        match self.runtime.block_on(handle) {
            Ok(outcome) => self.apply_outcome(outcome),
            Err(e) => {
                tracing::error!(error = %e, ?kind, "Background task failed");
                self.recover_after_failure(kind);
                self.error_banner = Some(i18n::err_task_failed().to_string());
            }
        }
    }

    /// Put back whatever a dead task took with it.
    fn recover_after_failure(&mut self, kind: JobKind) {
        match kind {
            JobKind::Cursor(_) => {
                self.cursor = Some(
                    AttachmentCursor::new(self.ordering, self.filters).with_limits(self.limits),
                );
            }
            JobKind::Grid => {
                self.grid = Some(ImageGrid::new(self.grid_query.clone()));
                self.grid_selected = 0;
            }
            JobKind::Save => {}
        }
    }

    /// Fold a finished request back into the state.
    pub fn apply_outcome(&mut self, outcome: JobOutcome) {
        match outcome {
            JobOutcome::Cursor {
                cursor,
                action,
                result,
            } => {
                self.cursor = Some(cursor);
                match result {
                    Ok(Resolution::Found(_)) => {
                        self.error_banner = None;
                        self.not_found = None;
                        if action == CursorAction::Delete {
                            self.set_status(i18n::msg_deleted());
                        }
                    }
                    Ok(Resolution::NotFound(reason)) => {
                        self.error_banner = None;
                        self.not_found = Some(reason);
                    }
                    Ok(Resolution::Unchanged) => {
                        self.set_status(i18n::msg_previous_disabled());
                    }
                    Err(e @ (AttachError::DeleteFailed { .. } | AttachError::NoCurrentRecord)) => {
                        tracing::warn!(error = %e, "Delete failed");
                        self.set_status(&format!("{}: {e}", i18n::err_delete_failed()));
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, ?action, "Attachment request failed");
                        self.error_banner = Some(format!("{}: {e}", i18n::err_backend()));
                    }
                }
            }
            JobOutcome::Grid { grid, result } => {
                let len = grid.images().len();
                self.grid = Some(grid);
                self.grid_selected = self.grid_selected.min(len.saturating_sub(1));
                match result {
                    Ok(()) => self.error_banner = None,
                    Err(e) => {
                        tracing::warn!(error = %e, "Image page request failed");
                        self.error_banner = Some(format!("{}: {e}", i18n::err_backend()));
                    }
                }
            }
            JobOutcome::Saved(result) => match result {
                Ok(path) => {
                    self.set_status(&format!("{} {}", i18n::msg_saved_to(), path.display()));
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Saving attachment failed");
                    self.set_status(&e.to_string());
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::attachment::AttachmentId;

    fn test_app(runtime: &tokio::runtime::Runtime) -> App {
        let client = HttpClient::new("http://127.0.0.1:9", std::time::Duration::from_secs(1))
            .expect("client");
        let mut config = Config::default();
        config.viewer.ordering = Ordering::IdAscending;
        App::new(client, &config, runtime.handle().clone())
    }

    fn record(id: i64) -> AttachmentRecord {
        AttachmentRecord {
            attachment_id: AttachmentId::Int(id),
            content_type: "image/png".to_string(),
            size: 10,
            filename: None,
            metadata: Default::default(),
        }
    }

    #[test]
    fn test_not_found_outcome_is_recorded() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut app = test_app(&rt);
        let cursor = app.cursor.take().unwrap();
        app.apply_outcome(JobOutcome::Cursor {
            cursor,
            action: CursorAction::Resolve(Direction::Next),
            result: Ok(Resolution::NotFound(NotFoundReason::FilterExhausted)),
        });
        assert!(app.cursor.is_some());
        assert_eq!(app.not_found, Some(NotFoundReason::FilterExhausted));
        assert!(app.error_banner.is_none());
    }

    #[test]
    fn test_transport_error_sets_banner_and_returns_cursor() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut app = test_app(&rt);
        let cursor = app.cursor.take().unwrap();
        app.apply_outcome(JobOutcome::Cursor {
            cursor,
            action: CursorAction::Resolve(Direction::Initial),
            result: Err(AttachError::Http {
                url: "http://x".to_string(),
                status: 502,
            }),
        });
        assert!(app.cursor.is_some());
        assert!(app.error_banner.is_some());
    }

    #[test]
    fn test_delete_failure_is_inline() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut app = test_app(&rt);
        let cursor = app.cursor.take().unwrap();
        app.apply_outcome(JobOutcome::Cursor {
            cursor,
            action: CursorAction::Delete,
            result: Err(AttachError::DeleteFailed {
                id: AttachmentId::Int(3),
                status: 403,
            }),
        });
        assert!(app.error_banner.is_none());
        assert!(app.status_message.is_some());
    }

    #[test]
    fn test_previous_in_random_does_not_spawn() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut app = test_app(&rt);
        app.ordering = Ordering::Random;
        app.navigate(Direction::Previous);
        assert!(!app.is_busy());
        assert!(app.cursor.is_some());
        assert!(app.status_message.is_some());
    }

    #[test]
    fn test_busy_until_request_finishes() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut app = test_app(&rt);
        app.navigate(Direction::Initial);
        assert!(app.is_busy());
        assert!(app.cursor.is_none());

        // A second navigation while busy is ignored.
        app.navigate(Direction::Next);

        // Nothing listens on port 9, so the request fails quickly.
        let deadline = Instant::now() + std::time::Duration::from_secs(10);
        while app.is_busy() && Instant::now() < deadline {
            std::thread::sleep(std::time::Duration::from_millis(20));
            app.tick();
        }
        assert!(!app.is_busy());
        assert!(app.cursor.is_some());
        assert!(app.error_banner.is_some());
        assert_eq!(app.offset(), Some(0));
    }

    async fn dead_task() -> JobOutcome {
        panic!("task died")
    }

    fn tick_until_idle(app: &mut App) {
        let deadline = Instant::now() + std::time::Duration::from_secs(10);
        while app.is_busy() && Instant::now() < deadline {
            std::thread::sleep(std::time::Duration::from_millis(20));
            app.tick();
        }
    }

    #[test]
    fn test_panicked_cursor_task_rebuilds_cursor() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut app = test_app(&rt);
        app.cursor.take();
        app.ordering = Ordering::SizeDescending;
        app.filters = Filters {
            min_size: 1024,
            allow_octet_like: false,
        };
        app.in_flight = Some(InFlight {
            kind: JobKind::Cursor(CursorAction::Resolve(Direction::Next)),
            handle: rt.spawn(dead_task()),
        });
        assert!(app.is_busy());

        tick_until_idle(&mut app);
        assert!(!app.is_busy());
        let cursor = app.cursor.as_ref().expect("cursor restored");
        assert_eq!(cursor.offset(), 0);
        assert_eq!(cursor.ordering(), Ordering::SizeDescending);
        assert_eq!(cursor.filters(), app.filters);
        assert_eq!(cursor.limits(), app.limits);
        assert!(app.error_banner.is_some());
    }

    #[test]
    fn test_panicked_grid_task_rebuilds_grid() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut app = test_app(&rt);
        app.grid.take();
        app.grid_query.all_types = true;
        app.grid_selected = 3;
        app.in_flight = Some(InFlight {
            kind: JobKind::Grid,
            handle: rt.spawn(dead_task()),
        });

        tick_until_idle(&mut app);
        assert!(!app.is_busy());
        let grid = app.grid.as_ref().expect("grid restored");
        assert_eq!(grid.query(), &app.grid_query);
        assert!(grid.query().all_types);
        assert!(!grid.is_loaded());
        assert_eq!(app.grid_selected, 0);
        assert!(app.error_banner.is_some());
        // The viewer cursor was never taken and is left alone.
        assert!(app.cursor.is_some());
    }

    #[test]
    fn test_grid_selection_is_clamped() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut app = test_app(&rt);
        let mut grid = app.grid.take().unwrap();
        grid.apply(crate::model::image::ImagePage {
            page: 1,
            total_pages: 1,
            images: vec![record(1), record(2), record(3)],
        });
        app.apply_outcome(JobOutcome::Grid {
            grid,
            result: Ok(()),
        });
        app.grid_select(10);
        assert_eq!(app.grid_selected, 2);
        app.grid_select(-10);
        assert_eq!(app.grid_selected, 0);
        assert_eq!(
            app.selected_image().map(|r| r.attachment_id.clone()),
            Some(AttachmentId::Int(1))
        );
    }
}
