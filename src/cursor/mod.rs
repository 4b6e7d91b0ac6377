//! The attachment browsing cursor.
//!
//! A cursor keeps a logical position inside a server-side attachment
//! collection and resolves, on demand, the next record that passes the
//! client-side [`Filters`]. Records that fail a filter are skipped by
//! fetching again; running off the end of a sorted collection wraps back to
//! offset 0. A single attempt budget bounds fetches, skips and wraps
//! together, so `resolve` always terminates even when every record is
//! filtered out.
//!
//! ```text
//!   next ──► offset+1 ─┐
//!   prev ──► offset-1 ─┤      ┌──────── skip: offset+1 ◄───────┐
//!                      ▼      ▼                                │
//!                   fetch(offset) ──► record ──► filters ──────┤
//!                      │                            │ pass     │ fail
//!                      ▼ missing                    ▼          │
//!              offset>0 ? offset=0 : NotFound     Found        │
//! ```

pub mod filter;

use tracing::{debug, info, trace};

use crate::client::{AttachmentSource, Fetched};
use crate::error::{AttachError, Result};
use crate::model::attachment::{AttachmentId, AttachmentRecord};
use crate::model::ordering::Ordering;

pub use filter::{is_octet_like, Filters, Verdict};

/// Default bound on fetches per `resolve` call.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 50;

/// Offsets above this value are the "previous from the first record"
/// sentinel. A not-found answer there wraps to offset 0.
pub const WRAP_SENTINEL_THRESHOLD: u64 = 1_000_000;

/// Offset used for "previous" from offset 0: past the end, so the next
/// fetch wraps.
pub const WRAP_SENTINEL_OFFSET: u64 = 999_999_999;

/// Navigation requested from the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Re-resolve at the current offset.
    Initial,
    Next,
    Previous,
}

/// Why `resolve` produced no record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundReason {
    /// The collection had nothing to offer at the start position.
    Empty,
    /// The attempt budget ran out while skipping filtered records.
    FilterExhausted,
}

/// Outcome of a `resolve` call.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Found(AttachmentRecord),
    NotFound(NotFoundReason),
    /// Navigation is disabled in the current ordering; nothing happened.
    Unchanged,
}

impl Resolution {
    pub fn record(&self) -> Option<&AttachmentRecord> {
        match self {
            Self::Found(r) => Some(r),
            _ => None,
        }
    }
}

/// The mutable part of a cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct CursorState {
    /// Position in the sorted collection. Always 0 under `Random`.
    pub offset: u64,
    pub ordering: Ordering,
    pub filters: Filters,
    /// Id of the last record `resolve` accepted.
    pub last_resolved_id: Option<AttachmentId>,
}

impl CursorState {
    pub fn new(ordering: Ordering, filters: Filters) -> Self {
        Self {
            offset: 0,
            ordering,
            filters,
            last_resolved_id: None,
        }
    }
}

/// Tunables for the resolve loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorLimits {
    pub max_attempts: u32,
    pub wrap_sentinel_threshold: u64,
}

impl Default for CursorLimits {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            wrap_sentinel_threshold: WRAP_SENTINEL_THRESHOLD,
        }
    }
}

impl CursorLimits {
    /// Offset stored by "previous" from offset 0. Always above the threshold.
    pub fn sentinel_offset(&self) -> u64 {
        WRAP_SENTINEL_OFFSET.max(self.wrap_sentinel_threshold.saturating_add(1))
    }
}

/// Cursor over a server-side attachment collection.
///
/// One cursor per viewer session. `resolve` takes `&mut self`, so two
/// resolves can never overlap on the same cursor.
#[derive(Debug, Clone)]
pub struct AttachmentCursor {
    state: CursorState,
    limits: CursorLimits,
    current: Option<AttachmentRecord>,
}

impl AttachmentCursor {
    pub fn new(ordering: Ordering, filters: Filters) -> Self {
        Self {
            state: CursorState::new(ordering, filters),
            limits: CursorLimits::default(),
            current: None,
        }
    }

    pub fn with_limits(mut self, limits: CursorLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn state(&self) -> &CursorState {
        &self.state
    }

    pub fn limits(&self) -> CursorLimits {
        self.limits
    }

    pub fn offset(&self) -> u64 {
        self.state.offset
    }

    pub fn ordering(&self) -> Ordering {
        self.state.ordering
    }

    pub fn filters(&self) -> Filters {
        self.state.filters
    }

    /// The record shown after the last successful `resolve`, if any.
    pub fn current_record(&self) -> Option<&AttachmentRecord> {
        self.current.as_ref()
    }

    /// Whether `previous` does anything under the current ordering.
    pub fn can_go_back(&self) -> bool {
        !self.state.ordering.is_random()
    }

    /// Change ordering and filters. Always restarts from offset 0 and
    /// forgets the current record.
    pub fn reconfigure(&mut self, ordering: Ordering, filters: Filters) {
        debug!(%ordering, min_size = filters.min_size, allow_octet_like = filters.allow_octet_like, "Reconfiguring cursor");
        self.state = CursorState::new(ordering, filters);
        self.current = None;
    }

    /// Resolve a record in `direction` using the configured attempt budget.
    pub async fn resolve<S>(&mut self, source: &S, direction: Direction) -> Result<Resolution>
    where
        S: AttachmentSource + ?Sized,
    {
        let max_attempts = self.limits.max_attempts;
        self.resolve_with_attempts(source, direction, max_attempts)
            .await
    }

    /// Resolve a record in `direction`, fetching at most `max_attempts`
    /// times.
    ///
    /// Transport errors abort the call and are returned as-is; the offset
    /// keeps whatever value it had reached.
    pub async fn resolve_with_attempts<S>(
        &mut self,
        source: &S,
        direction: Direction,
        max_attempts: u32,
    ) -> Result<Resolution>
    where
        S: AttachmentSource + ?Sized,
    {
        if !self.step(direction) {
            debug!("Previous is disabled under random ordering");
            return Ok(Resolution::Unchanged);
        }

        let ordering = self.state.ordering;
        let random = ordering.is_random();
        let max_attempts = max_attempts.max(1);
        let mut skipped = 0u32;

        for attempt in 1..=max_attempts {
            if random {
                self.state.offset = 0;
            }
            let offset = self.state.offset;

            let record = match source.fetch(ordering, offset).await? {
                Fetched::Record(record) => record,
                Fetched::Missing => {
                    if random || offset == 0 {
                        debug!(%ordering, attempt, "Collection has no attachment here");
                        self.current = None;
                        return Ok(Resolution::NotFound(NotFoundReason::Empty));
                    }
                    if offset > self.limits.wrap_sentinel_threshold {
                        debug!(offset, attempt, "Wrap sentinel exhausted, restarting at 0");
                    } else {
                        debug!(offset, attempt, "Past the end, wrapping to 0");
                    }
                    self.state.offset = 0;
                    continue;
                }
            };

            match self.state.filters.evaluate(&record) {
                Verdict::Accept => {
                    debug!(
                        id = %record.attachment_id,
                        offset,
                        attempt,
                        skipped,
                        "Resolved attachment"
                    );
                    self.state.last_resolved_id = Some(record.attachment_id.clone());
                    self.current = Some(record.clone());
                    return Ok(Resolution::Found(record));
                }
                verdict => {
                    trace!(id = %record.attachment_id, offset, ?verdict, "Skipping attachment");
                    skipped += 1;
                    if !random {
                        self.state.offset = offset.saturating_add(1);
                    }
                }
            }
        }

        info!(
            %ordering,
            max_attempts,
            skipped,
            "No attachment matched the filters within the attempt budget"
        );
        self.current = None;
        Ok(Resolution::NotFound(NotFoundReason::FilterExhausted))
    }

    /// Delete the displayed record and move on to the next one.
    ///
    /// On failure the cursor is left untouched and the error is returned.
    pub async fn delete_current<S>(&mut self, source: &S) -> Result<Resolution>
    where
        S: AttachmentSource + ?Sized,
    {
        let id = self
            .current
            .as_ref()
            .map(|r| r.attachment_id.clone())
            .ok_or(AttachError::NoCurrentRecord)?;

        source.delete(&id).await?;

        self.current = None;
        self.resolve(source, Direction::Next).await
    }

    /// Apply the offset change for `direction`. Returns `false` when the
    /// navigation is disabled.
    fn step(&mut self, direction: Direction) -> bool {
        let random = self.state.ordering.is_random();
        match direction {
            Direction::Initial => {}
            Direction::Next => {
                if !random {
                    self.state.offset = self.state.offset.saturating_add(1);
                }
            }
            Direction::Previous => {
                if random {
                    return false;
                }
                self.state.offset = match self.state.offset {
                    0 => self.limits.sentinel_offset(),
                    n => n - 1,
                };
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    /// In-memory collection. Random draws cycle through the records in
    /// order so tests are deterministic.
    struct MemorySource {
        records: Mutex<Vec<AttachmentRecord>>,
        fetches: AtomicUsize,
        offsets: Mutex<Vec<u64>>,
        random_next: AtomicUsize,
        fail_delete: bool,
    }

    impl MemorySource {
        fn new(records: Vec<AttachmentRecord>) -> Self {
            Self {
                records: Mutex::new(records),
                fetches: AtomicUsize::new(0),
                offsets: Mutex::new(Vec::new()),
                random_next: AtomicUsize::new(0),
                fail_delete: false,
            }
        }

        fn fetches(&self) -> usize {
            self.fetches.load(AtomicOrdering::SeqCst)
        }

        fn offsets(&self) -> Vec<u64> {
            self.offsets.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AttachmentSource for MemorySource {
        async fn fetch(&self, ordering: Ordering, offset: u64) -> Result<Fetched> {
            self.fetches.fetch_add(1, AtomicOrdering::SeqCst);
            self.offsets.lock().unwrap().push(offset);
            let mut records = self.records.lock().unwrap().clone();
            if records.is_empty() {
                return Ok(Fetched::Missing);
            }
            if ordering.is_random() {
                let i = self.random_next.fetch_add(1, AtomicOrdering::SeqCst) % records.len();
                return Ok(Fetched::Record(records[i].clone()));
            }
            match ordering {
                Ordering::SizeAscending => records.sort_by_key(|r| r.size),
                Ordering::SizeDescending => records.sort_by_key(|r| std::cmp::Reverse(r.size)),
                _ => {}
            }
            Ok(records
                .get(offset as usize)
                .cloned()
                .map(Fetched::Record)
                .unwrap_or(Fetched::Missing))
        }

        async fn delete(&self, id: &AttachmentId) -> Result<()> {
            if self.fail_delete {
                return Err(AttachError::DeleteFailed {
                    id: id.clone(),
                    status: 500,
                });
            }
            self.records
                .lock()
                .unwrap()
                .retain(|r| &r.attachment_id != id);
            Ok(())
        }
    }

    fn rec(id: i64, content_type: &str, size: u64) -> AttachmentRecord {
        AttachmentRecord {
            attachment_id: AttachmentId::Int(id),
            content_type: content_type.to_string(),
            size,
            filename: Some(format!("file{id}")),
            metadata: Default::default(),
        }
    }

    fn images(n: i64) -> Vec<AttachmentRecord> {
        (0..n).map(|i| rec(i, "image/jpeg", 100 + i as u64)).collect()
    }

    fn found_id(res: &Resolution) -> i64 {
        match res.record().map(|r| &r.attachment_id) {
            Some(AttachmentId::Int(n)) => *n,
            other => panic!("expected a found record, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_three_records_wrap_sequence() {
        let source = MemorySource::new(images(3));
        let mut cursor = AttachmentCursor::new(Ordering::IdAscending, Filters::default());

        let mut visited = Vec::new();
        let res = cursor.resolve(&source, Direction::Initial).await.unwrap();
        assert_eq!(found_id(&res), 0);
        visited.push(cursor.offset());
        for _ in 0..3 {
            cursor.resolve(&source, Direction::Next).await.unwrap();
            visited.push(cursor.offset());
        }
        assert_eq!(visited, vec![0, 1, 2, 0]);
        assert_eq!(cursor.current_record().unwrap().attachment_id, AttachmentId::Int(0));
    }

    #[tokio::test]
    async fn test_min_size_skip_scenario() {
        let source = MemorySource::new(vec![rec(10, "image/png", 500), rec(11, "image/png", 2000)]);
        let filters = Filters {
            min_size: 1000,
            allow_octet_like: true,
        };
        let mut cursor = AttachmentCursor::new(Ordering::IdAscending, filters);
        let res = cursor.resolve(&source, Direction::Initial).await.unwrap();
        assert_eq!(found_id(&res), 11);
        assert_eq!(cursor.offset(), 1);
        assert_eq!(cursor.state().last_resolved_id, Some(AttachmentId::Int(11)));
    }

    #[tokio::test]
    async fn test_all_pdfs_exhaust_attempts() {
        let records = (0..5).map(|i| rec(i, "application/pdf", 5000)).collect();
        let source = MemorySource::new(records);
        let filters = Filters {
            min_size: 0,
            allow_octet_like: false,
        };
        let mut cursor = AttachmentCursor::new(Ordering::IdAscending, filters);
        let res = cursor.resolve(&source, Direction::Initial).await.unwrap();
        assert_eq!(res, Resolution::NotFound(NotFoundReason::FilterExhausted));
        assert_eq!(source.fetches(), DEFAULT_MAX_ATTEMPTS as usize);
        assert!(cursor.current_record().is_none());
    }

    #[tokio::test]
    async fn test_all_filtered_random_exhausts() {
        let records = (0..5).map(|i| rec(i, "application/msword", 5000)).collect();
        let source = MemorySource::new(records);
        let filters = Filters {
            min_size: 0,
            allow_octet_like: false,
        };
        let mut cursor = AttachmentCursor::new(Ordering::Random, filters);
        let res = cursor
            .resolve_with_attempts(&source, Direction::Next, 7)
            .await
            .unwrap();
        assert_eq!(res, Resolution::NotFound(NotFoundReason::FilterExhausted));
        assert_eq!(source.fetches(), 7);
        assert_eq!(cursor.offset(), 0);
    }

    #[tokio::test]
    async fn test_empty_collection_is_empty_not_exhausted() {
        let source = MemorySource::new(Vec::new());
        let mut cursor = AttachmentCursor::new(Ordering::IdAscending, Filters::default());
        let res = cursor.resolve(&source, Direction::Initial).await.unwrap();
        assert_eq!(res, Resolution::NotFound(NotFoundReason::Empty));
        assert_eq!(source.fetches(), 1);

        let mut random = AttachmentCursor::new(Ordering::Random, Filters::default());
        let res = random.resolve(&source, Direction::Next).await.unwrap();
        assert_eq!(res, Resolution::NotFound(NotFoundReason::Empty));
    }

    #[tokio::test]
    async fn test_next_past_end_of_empty_collection_terminates() {
        let source = MemorySource::new(images(1));
        let mut cursor = AttachmentCursor::new(Ordering::IdAscending, Filters::default());
        cursor.resolve(&source, Direction::Initial).await.unwrap();
        source.records.lock().unwrap().clear();
        let res = cursor.resolve(&source, Direction::Next).await.unwrap();
        assert_eq!(res, Resolution::NotFound(NotFoundReason::Empty));
        // offset 1 missing -> wrap -> offset 0 missing -> stop
        assert_eq!(source.offsets(), vec![0, 1, 0]);
    }

    #[tokio::test]
    async fn test_random_offset_stays_zero() {
        let source = MemorySource::new(images(4));
        let mut cursor = AttachmentCursor::new(Ordering::Random, Filters::default());
        assert_eq!(cursor.offset(), 0);
        for direction in [Direction::Initial, Direction::Next, Direction::Next, Direction::Previous] {
            cursor.resolve(&source, direction).await.unwrap();
            assert_eq!(cursor.offset(), 0);
        }
        assert!(source.offsets().iter().all(|&o| o == 0));
    }

    #[tokio::test]
    async fn test_random_skips_do_not_move_offset() {
        let mut records = images(3);
        records[0].size = 1;
        records[1].size = 1;
        let source = MemorySource::new(records);
        let filters = Filters {
            min_size: 50,
            allow_octet_like: true,
        };
        let mut cursor = AttachmentCursor::new(Ordering::Random, filters);
        let res = cursor.resolve(&source, Direction::Initial).await.unwrap();
        assert_eq!(found_id(&res), 2);
        assert_eq!(source.offsets(), vec![0, 0, 0]);
    }

    #[tokio::test]
    async fn test_previous_is_noop_under_random() {
        let source = MemorySource::new(images(3));
        let mut cursor = AttachmentCursor::new(Ordering::Random, Filters::default());
        cursor.resolve(&source, Direction::Initial).await.unwrap();
        let before_state = cursor.state().clone();
        let before_record = cursor.current_record().cloned();
        let fetches = source.fetches();

        let res = cursor.resolve(&source, Direction::Previous).await.unwrap();
        assert_eq!(res, Resolution::Unchanged);
        assert_eq!(cursor.state(), &before_state);
        assert_eq!(cursor.current_record().cloned(), before_record);
        assert_eq!(source.fetches(), fetches);
        assert!(!cursor.can_go_back());
    }

    #[tokio::test]
    async fn test_previous_steps_back() {
        let source = MemorySource::new(images(3));
        let mut cursor = AttachmentCursor::new(Ordering::IdAscending, Filters::default());
        cursor.resolve(&source, Direction::Next).await.unwrap();
        cursor.resolve(&source, Direction::Next).await.unwrap();
        assert_eq!(cursor.offset(), 2);
        let res = cursor.resolve(&source, Direction::Previous).await.unwrap();
        assert_eq!(found_id(&res), 1);
        assert_eq!(cursor.offset(), 1);
    }

    #[tokio::test]
    async fn test_previous_from_start_uses_sentinel_then_wraps() {
        let source = MemorySource::new(images(3));
        let mut cursor = AttachmentCursor::new(Ordering::IdAscending, Filters::default());
        let res = cursor.resolve(&source, Direction::Previous).await.unwrap();
        assert_eq!(found_id(&res), 0);
        assert_eq!(cursor.offset(), 0);
        assert_eq!(source.offsets(), vec![WRAP_SENTINEL_OFFSET, 0]);
    }

    #[tokio::test]
    async fn test_sentinel_respects_configured_threshold() {
        let limits = CursorLimits {
            max_attempts: 10,
            wrap_sentinel_threshold: 5_000_000_000,
        };
        assert!(limits.sentinel_offset() > limits.wrap_sentinel_threshold);

        let source = MemorySource::new(images(2));
        let mut cursor =
            AttachmentCursor::new(Ordering::IdAscending, Filters::default()).with_limits(limits);
        cursor.resolve(&source, Direction::Previous).await.unwrap();
        assert_eq!(source.offsets(), vec![5_000_000_001, 0]);
    }

    #[tokio::test]
    async fn test_walk_terminates_within_budget() {
        let source = MemorySource::new(images(4));
        let mut cursor = AttachmentCursor::new(Ordering::SizeDescending, Filters::default());
        cursor.resolve(&source, Direction::Initial).await.unwrap();
        let mut seen_zero_again = false;
        for _ in 0..10 {
            let before = source.fetches();
            let res = cursor.resolve(&source, Direction::Next).await.unwrap();
            assert!(res.record().is_some());
            assert!(source.fetches() - before <= DEFAULT_MAX_ATTEMPTS as usize);
            if cursor.offset() == 0 {
                seen_zero_again = true;
            }
        }
        assert!(seen_zero_again);
    }

    #[tokio::test]
    async fn test_size_ordering_follows_sizes() {
        let source = MemorySource::new(vec![
            rec(1, "image/png", 300),
            rec(2, "image/png", 100),
            rec(3, "image/png", 200),
        ]);
        let mut cursor = AttachmentCursor::new(Ordering::SizeAscending, Filters::default());
        let mut ids = Vec::new();
        for direction in [Direction::Initial, Direction::Next, Direction::Next] {
            ids.push(found_id(&cursor.resolve(&source, direction).await.unwrap()));
        }
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[tokio::test]
    async fn test_resolved_records_always_pass_filters() {
        let records = vec![
            rec(0, "application/pdf", 9000),
            rec(1, "image/png", 10),
            rec(2, "image/png", 4000),
            rec(3, "application/octet-stream", 4000),
            rec(4, "image/gif", 20),
            rec(5, "text/plain", 1500),
        ];
        let source = MemorySource::new(records);
        let filters = Filters {
            min_size: 1000,
            allow_octet_like: false,
        };
        let mut cursor = AttachmentCursor::new(Ordering::IdAscending, filters);
        let mut ids = HashSet::new();
        cursor.resolve(&source, Direction::Initial).await.unwrap();
        for _ in 0..12 {
            let res = cursor.resolve(&source, Direction::Next).await.unwrap();
            let record = res.record().expect("some record passes");
            assert!(filters.accepts(record));
            ids.insert(found_id(&res));
        }
        assert_eq!(ids, HashSet::from([2, 5]));
    }

    #[tokio::test]
    async fn test_reconfigure_resets_offset_and_current() {
        let source = MemorySource::new(images(5));
        let mut cursor = AttachmentCursor::new(Ordering::IdAscending, Filters::default());
        for _ in 0..3 {
            cursor.resolve(&source, Direction::Next).await.unwrap();
        }
        assert_eq!(cursor.offset(), 3);

        cursor.reconfigure(
            Ordering::SizeAscending,
            Filters {
                min_size: 10,
                allow_octet_like: false,
            },
        );
        assert_eq!(cursor.offset(), 0);
        assert!(cursor.state().last_resolved_id.is_none());
        assert!(cursor.current_record().is_none());
        assert_eq!(cursor.ordering(), Ordering::SizeAscending);

        // Same ordering and filters still reset.
        cursor.resolve(&source, Direction::Next).await.unwrap();
        cursor.reconfigure(cursor.ordering(), cursor.filters());
        assert_eq!(cursor.offset(), 0);
    }

    #[tokio::test]
    async fn test_delete_advances_with_single_increment() {
        let source = MemorySource::new(images(5));
        let mut cursor = AttachmentCursor::new(Ordering::IdAscending, Filters::default());
        cursor.resolve(&source, Direction::Next).await.unwrap();
        assert_eq!(cursor.offset(), 1);
        assert_eq!(cursor.current_record().unwrap().attachment_id, AttachmentId::Int(1));

        let res = cursor.delete_current(&source).await.unwrap();
        assert_eq!(cursor.offset(), 2);
        // Record 1 is gone, so offset 2 now holds record 3.
        assert_eq!(found_id(&res), 3);
        assert_eq!(source.records.lock().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_failed_delete_leaves_cursor_untouched() {
        let mut source = MemorySource::new(images(3));
        source.fail_delete = true;
        let mut cursor = AttachmentCursor::new(Ordering::IdAscending, Filters::default());
        cursor.resolve(&source, Direction::Next).await.unwrap();
        let state = cursor.state().clone();
        let fetches = source.fetches();

        let err = cursor.delete_current(&source).await.unwrap_err();
        assert!(matches!(err, AttachError::DeleteFailed { status: 500, .. }));
        assert_eq!(cursor.state(), &state);
        assert!(cursor.current_record().is_some());
        assert_eq!(source.fetches(), fetches);
    }

    #[tokio::test]
    async fn test_delete_without_current_record() {
        let source = MemorySource::new(images(2));
        let mut cursor = AttachmentCursor::new(Ordering::IdAscending, Filters::default());
        let err = cursor.delete_current(&source).await.unwrap_err();
        assert!(matches!(err, AttachError::NoCurrentRecord));
    }

    #[tokio::test]
    async fn test_zero_attempts_still_fetches_once() {
        let source = MemorySource::new(images(2));
        let mut cursor = AttachmentCursor::new(Ordering::IdAscending, Filters::default());
        let res = cursor
            .resolve_with_attempts(&source, Direction::Initial, 0)
            .await
            .unwrap();
        assert_eq!(found_id(&res), 0);
        assert_eq!(source.fetches(), 1);
    }
}
