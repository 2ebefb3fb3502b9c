//! Paginated list - the client side of a cursor connection.
//!
//! A [`PaginatedList`] owns one connection for one list view: it fetches
//! the first page, grows by incremental loads, and is discarded on unmount.
//!
//! # States
//!
//! ```text
//! Idle ──► LoadingFirstPage ──► Ready ◄──► LoadingMore
//!                 │
//!                 └──────────► Failed ──(refetch)──► LoadingFirstPage
//! ```
//!
//! Only one fetch per list is ever in flight. A second request while one
//! is outstanding is a no-op, not a queued call.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::{debug, info, instrument, trace, warn};

use crate::error::{FetchError, ListError, ListResult};
use crate::metrics::{
    FetchTimer, record_edges_deduplicated, record_fetch_error, record_load_more_skipped,
    record_page_fetched, record_stale_page_discarded,
};
use crate::models::TenantScope;
use crate::ports::{
    ConnectionFetcher, DEFAULT_PAGE_SIZE, Edge, Notice, Notifier, PageInfo, PageRequest,
    TracingNotifier, clamp_page_size,
};

use super::lifecycle::{Lifecycle, MountGuard};
use super::merge::{dedup_edges, merge_edges};

/// Message shown when a load-more fails.
pub const LOAD_MORE_FAILED_NOTICE: &str = "Could not load more items. Scroll again to retry.";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for a paginated list.
#[derive(Debug, Clone)]
pub struct ListConfig {
    /// Page size requested for every page.
    pub page_size: i32,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

// =============================================================================
// State
// =============================================================================

/// Lifecycle phase of a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListPhase {
    Idle,
    LoadingFirstPage,
    Ready,
    LoadingMore,
    /// First page failed; the message is user-presentable.
    Failed { message: String },
}

/// Why a load request did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The last page said there is nothing after it.
    NoMorePages,
    /// Another fetch for this list is in flight.
    InFlight,
    /// The first page has not loaded (yet, or it failed).
    NotReady,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::NoMorePages => "no_more_pages",
            SkipReason::InFlight => "in_flight",
            SkipReason::NotReady => "not_ready",
        }
    }
}

/// Result of a load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A page was applied.
    Loaded { appended: usize, replaced: usize },
    /// Nothing was requested.
    Skipped(SkipReason),
    /// A page arrived after unmount and was thrown away.
    Discarded,
}

/// What a list view should render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView {
    /// Nothing to show yet.
    Loading,
    /// First page failed; replaces the list.
    Error { message: String },
    /// Loaded successfully with zero edges.
    Empty,
    /// Loaded with at least one edge.
    Items {
        count: usize,
        has_more: bool,
        loading_more: bool,
    },
}

/// Point-in-time copy of a list's connection state.
#[derive(Debug, Clone, PartialEq)]
pub struct ListSnapshot<T> {
    pub edges: Vec<Edge<T>>,
    pub page_info: PageInfo,
    pub total_count: Option<i64>,
    pub phase: ListPhase,
}

struct ListState<T> {
    edges: Vec<Edge<T>>,
    page_info: PageInfo,
    total_count: Option<i64>,
    phase: ListPhase,
}

impl<T> ListState<T> {
    fn idle() -> Self {
        Self {
            edges: Vec::new(),
            page_info: PageInfo::default(),
            total_count: None,
            phase: ListPhase::Idle,
        }
    }
}

/// RAII claim on the in-flight flag. Released on drop, including when the
/// owning future is cancelled.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

// =============================================================================
// PaginatedList
// =============================================================================

/// Client-side state of one cursor-paginated list view.
///
/// The list is shared (`Arc`) between the view and its scroll sentinel.
/// State lives behind a mutex that is never held across a fetch.
pub struct PaginatedList<F: ConnectionFetcher> {
    fetcher: Arc<F>,
    scope: TenantScope,
    filter: F::Filter,
    config: ListConfig,
    notifier: Arc<dyn Notifier>,
    state: Mutex<ListState<F::Node>>,
    in_flight: AtomicBool,
    lifecycle: Lifecycle,
}

impl<F: ConnectionFetcher> PaginatedList<F> {
    pub fn new(fetcher: Arc<F>, scope: TenantScope, filter: F::Filter, config: ListConfig) -> Self {
        Self {
            fetcher,
            scope,
            filter,
            config: ListConfig {
                page_size: clamp_page_size(Some(config.page_size)),
            },
            notifier: Arc::new(TracingNotifier),
            state: Mutex::new(ListState::idle()),
            in_flight: AtomicBool::new(false),
            lifecycle: Lifecycle::new(),
        }
    }

    /// Replace the notifier used for load-more failures.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn scope(&self) -> &TenantScope {
        &self.scope
    }

    pub fn resource(&self) -> &'static str {
        self.fetcher.resource()
    }

    /// Fetch the first page, replacing any existing state.
    ///
    /// On failure the list enters [`ListPhase::Failed`] with no edges.
    #[instrument(skip(self), fields(resource = self.fetcher.resource(), community = %self.scope.community_id))]
    pub async fn load_first(&self) -> ListResult<LoadOutcome> {
        if !self.lifecycle.is_mounted() {
            return Err(ListError::Unmounted);
        }
        let Some(_flight) = InFlight::acquire(&self.in_flight) else {
            trace!("First page already in flight");
            record_load_more_skipped(SkipReason::InFlight.as_str());
            return Ok(LoadOutcome::Skipped(SkipReason::InFlight));
        };

        {
            let mut state = self.state.lock();
            *state = ListState::idle();
            state.phase = ListPhase::LoadingFirstPage;
        }

        let request =
            PageRequest::first_page(self.scope.clone(), self.filter.clone(), self.config.page_size);
        let result = {
            let _timer = FetchTimer::new();
            self.fetcher.fetch(&request).await
        };

        if !self.lifecycle.is_mounted() {
            debug!("First page arrived after unmount, discarding");
            record_stale_page_discarded();
            self.state.lock().phase = ListPhase::Idle;
            return Ok(LoadOutcome::Discarded);
        }

        match result {
            Ok(connection) => {
                let (edges, stats) = dedup_edges(connection.edges);
                record_page_fetched("first");
                record_edges_deduplicated(stats.replaced as u64);

                let mut state = self.state.lock();
                state.edges = edges;
                state.page_info = connection.page_info;
                state.total_count = connection.total_count;
                state.phase = ListPhase::Ready;

                debug!(
                    edges = state.edges.len(),
                    has_next = state.page_info.has_next_page,
                    total = ?state.total_count,
                    "First page loaded"
                );
                Ok(LoadOutcome::Loaded {
                    appended: stats.appended,
                    replaced: stats.replaced,
                })
            }
            Err(e) => {
                record_fetch_error("first");
                warn!(error = %e, "⚠️  First page failed");

                let mut state = self.state.lock();
                *state = ListState::idle();
                state.phase = ListPhase::Failed {
                    message: user_message(&e),
                };
                Err(ListError::InitialFetchFailed(e))
            }
        }
    }

    /// Retry action: re-issue the first-page fetch with the same scope,
    /// filter and page size.
    pub async fn refetch(&self) -> ListResult<LoadOutcome> {
        info!(resource = self.fetcher.resource(), "🔄 Refetching list");
        self.load_first().await
    }

    /// Fetch the page after the current end cursor and merge it.
    ///
    /// No-op when there is no next page, when any fetch is in flight, or
    /// before the first page has loaded. On failure the edges and page
    /// info are left exactly as they were and a notice is raised.
    #[instrument(skip(self), fields(resource = self.fetcher.resource(), community = %self.scope.community_id))]
    pub async fn load_more(&self) -> ListResult<LoadOutcome> {
        if !self.lifecycle.is_mounted() {
            return Err(ListError::Unmounted);
        }
        let Some(_flight) = InFlight::acquire(&self.in_flight) else {
            return Ok(self.skip(SkipReason::InFlight));
        };

        let cursor = {
            let mut state = self.state.lock();
            if state.phase != ListPhase::Ready {
                drop(state);
                return Ok(self.skip(SkipReason::NotReady));
            }
            if !state.page_info.has_next_page {
                drop(state);
                return Ok(self.skip(SkipReason::NoMorePages));
            }
            let Some(cursor) = state.page_info.end_cursor.clone() else {
                drop(state);
                warn!("Page claims a next page but has no end cursor");
                return Ok(self.skip(SkipReason::NoMorePages));
            };
            state.phase = ListPhase::LoadingMore;
            cursor
        };

        trace!(after = %cursor, "Loading next page");
        let request = PageRequest::next_page(
            self.scope.clone(),
            self.filter.clone(),
            self.config.page_size,
            cursor,
        );
        let result = {
            let _timer = FetchTimer::new();
            self.fetcher.fetch(&request).await
        };

        if !self.lifecycle.is_mounted() {
            debug!("Page arrived after unmount, discarding");
            record_stale_page_discarded();
            self.state.lock().phase = ListPhase::Ready;
            return Ok(LoadOutcome::Discarded);
        }

        match result {
            Ok(connection) => {
                record_page_fetched("more");
                let mut state = self.state.lock();
                let stats = merge_edges(&mut state.edges, connection.edges);
                record_edges_deduplicated(stats.replaced as u64);

                let previous_end = state.page_info.end_cursor.take();
                state.page_info = connection.page_info;
                if state.page_info.end_cursor.is_none() {
                    state.page_info.end_cursor = previous_end;
                }
                if connection.total_count.is_some() {
                    state.total_count = connection.total_count;
                }
                state.phase = ListPhase::Ready;

                debug!(
                    appended = stats.appended,
                    replaced = stats.replaced,
                    edges = state.edges.len(),
                    has_next = state.page_info.has_next_page,
                    "Next page merged"
                );
                Ok(LoadOutcome::Loaded {
                    appended: stats.appended,
                    replaced: stats.replaced,
                })
            }
            Err(e) => {
                record_fetch_error("more");
                warn!(error = %e, "⚠️  Load more failed, keeping current items");
                self.state.lock().phase = ListPhase::Ready;
                self.notifier.notify(Notice::error(LOAD_MORE_FAILED_NOTICE));
                Err(ListError::LoadMoreFailed(e))
            }
        }
    }

    fn skip(&self, reason: SkipReason) -> LoadOutcome {
        trace!(reason = reason.as_str(), "Load more skipped");
        record_load_more_skipped(reason.as_str());
        LoadOutcome::Skipped(reason)
    }

    /// Whether the last page reported a next page.
    pub fn has_more(&self) -> bool {
        self.state.lock().page_info.has_next_page
    }

    /// Whether any fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn phase(&self) -> ListPhase {
        self.state.lock().phase.clone()
    }

    pub fn len(&self) -> usize {
        self.state.lock().edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy out the current connection state.
    pub fn snapshot(&self) -> ListSnapshot<F::Node> {
        let state = self.state.lock();
        ListSnapshot {
            edges: state.edges.clone(),
            page_info: state.page_info.clone(),
            total_count: state.total_count,
            phase: state.phase.clone(),
        }
    }

    /// What the view should render right now.
    pub fn view(&self) -> ListView {
        let state = self.state.lock();
        match &state.phase {
            ListPhase::Idle | ListPhase::LoadingFirstPage => ListView::Loading,
            ListPhase::Failed { message } => ListView::Error {
                message: message.clone(),
            },
            ListPhase::Ready | ListPhase::LoadingMore if state.edges.is_empty() => ListView::Empty,
            ListPhase::Ready | ListPhase::LoadingMore => ListView::Items {
                count: state.edges.len(),
                has_more: state.page_info.has_next_page,
                loading_more: state.phase == ListPhase::LoadingMore,
            },
        }
    }

    /// Detach the list from its view. Pages that complete afterwards are
    /// discarded and further loads return [`ListError::Unmounted`].
    pub fn unmount(&self) {
        debug!(resource = self.fetcher.resource(), "List unmounted");
        self.lifecycle.unmount();
    }

    pub fn is_mounted(&self) -> bool {
        self.lifecycle.is_mounted()
    }

    /// Guard that observes this list's mount state.
    pub fn mount_guard(&self) -> MountGuard {
        self.lifecycle.guard()
    }
}

/// Map a fetch error to the message shown in place of the list.
fn user_message(err: &FetchError) -> String {
    match err {
        FetchError::Transport(_) | FetchError::Timeout => {
            "Could not reach the server. Check your connection and try again.".to_string()
        }
        _ => "Something went wrong while loading. Please try again.".to_string(),
    }
}

// =============================================================================
// LoadMore seam
// =============================================================================

/// The part of a list a scroll sentinel drives.
#[async_trait]
pub trait LoadMore: Send + Sync {
    fn has_more(&self) -> bool;
    fn is_loading(&self) -> bool;
    fn mount_guard(&self) -> MountGuard;
    async fn load_more(&self) -> ListResult<LoadOutcome>;
}

#[async_trait]
impl<F: ConnectionFetcher> LoadMore for PaginatedList<F> {
    fn has_more(&self) -> bool {
        PaginatedList::has_more(self)
    }

    fn is_loading(&self) -> bool {
        PaginatedList::is_loading(self)
    }

    fn mount_guard(&self) -> MountGuard {
        PaginatedList::mount_guard(self)
    }

    async fn load_more(&self) -> ListResult<LoadOutcome> {
        PaginatedList::load_more(self).await
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    use tokio::sync::Notify;

    use crate::error::FetchResult;
    use crate::ports::{Connection, Cursor, Node};

    #[derive(Debug, Clone, PartialEq)]
    struct Item(String);

    impl Node for Item {
        fn node_id(&self) -> &str {
            &self.0
        }
    }

    /// Scripted fetcher: pops one response per call and counts calls.
    /// When `gate` is set, each fetch waits for a permit before answering.
    struct MockFetcher {
        responses: Mutex<VecDeque<FetchResult<Connection<Item>>>>,
        calls: AtomicUsize,
        requests: Mutex<Vec<PageRequest<()>>>,
        gate: Option<Arc<Notify>>,
    }

    impl MockFetcher {
        fn new(responses: Vec<FetchResult<Connection<Item>>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                calls: AtomicUsize::new(0),
                requests: Mutex::new(Vec::new()),
                gate: None,
            }
        }

        fn gated(responses: Vec<FetchResult<Connection<Item>>>, gate: Arc<Notify>) -> Self {
            Self {
                gate: Some(gate),
                ..Self::new(responses)
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ConnectionFetcher for MockFetcher {
        type Node = Item;
        type Filter = ();

        fn resource(&self) -> &'static str {
            "items"
        }

        async fn fetch(&self, request: &PageRequest<()>) -> FetchResult<Connection<Item>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().push(request.clone());
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.responses
                .lock()
                .pop_front()
                .unwrap_or_else(|| Err(FetchError::Transport("no scripted response".into())))
        }
    }

    #[derive(Default)]
    struct RecordingNotifier(Mutex<Vec<Notice>>);

    impl Notifier for RecordingNotifier {
        fn notify(&self, notice: Notice) {
            self.0.lock().push(notice);
        }
    }

    fn page(ids: impl IntoIterator<Item = u32>, has_next: bool) -> Connection<Item> {
        let edges: Vec<Edge<Item>> = ids
            .into_iter()
            .map(|n| Edge {
                node: Some(Item(format!("id-{n}"))),
                cursor: Cursor::new(format!("{n:08x}")),
            })
            .collect();
        Connection {
            page_info: PageInfo {
                has_next_page: has_next,
                has_previous_page: false,
                start_cursor: edges.first().map(|e| e.cursor.clone()),
                end_cursor: edges.last().map(|e| e.cursor.clone()),
            },
            total_count: Some(28),
            edges,
        }
    }

    fn list(fetcher: Arc<MockFetcher>) -> PaginatedList<MockFetcher> {
        PaginatedList::new(
            fetcher,
            TenantScope::community("c-1"),
            (),
            ListConfig { page_size: 20 },
        )
    }

    // Scénario: page 1 (20) + page 2 (10 dont 2 en double) => 28 uniques
    #[tokio::test]
    async fn test_two_pages_with_overlap_yield_unique_edges() {
        let fetcher = Arc::new(MockFetcher::new(vec![
            Ok(page(0..20, true)),
            Ok(page(18..28, false)),
        ]));
        let list = list(fetcher.clone());

        list.load_first().await.unwrap();
        assert_eq!(list.len(), 20);
        assert!(list.has_more());

        let outcome = list.load_more().await.unwrap();
        assert_eq!(outcome, LoadOutcome::Loaded { appended: 8, replaced: 2 });
        assert_eq!(list.len(), 28);
        assert!(!list.has_more());

        // Plus de pages: no-op, aucun appel réseau supplémentaire
        let outcome = list.load_more().await.unwrap();
        assert_eq!(outcome, LoadOutcome::Skipped(SkipReason::NoMorePages));
        assert_eq!(list.load_more().await.unwrap(), outcome);
        assert_eq!(fetcher.calls(), 2);
    }

    // Test critique: le cursor envoyé est le endCursor de la page précédente
    #[tokio::test]
    async fn test_next_page_uses_end_cursor_and_scope() {
        let fetcher = Arc::new(MockFetcher::new(vec![
            Ok(page(0..20, true)),
            Ok(page(20..30, true)),
        ]));
        let list = list(fetcher.clone());

        list.load_first().await.unwrap();
        list.load_more().await.unwrap();

        let requests = fetcher.requests.lock();
        assert!(requests[0].after().is_none());
        assert_eq!(requests[1].after(), Some(&Cursor::new(format!("{:08x}", 19))));
        assert!(requests.iter().all(|r| r.scope().community_id.as_str() == "c-1"));
        assert!(requests.iter().all(|r| r.first() == 20));
        drop(requests);

        // Le endCursor avance strictement
        assert_eq!(
            list.snapshot().page_info.end_cursor,
            Some(Cursor::new(format!("{:08x}", 29)))
        );
    }

    // Test critique: load_more pendant un chargement est un no-op
    #[tokio::test]
    async fn test_load_more_while_in_flight_is_noop() {
        let gate = Arc::new(Notify::new());
        let fetcher = Arc::new(MockFetcher::gated(
            vec![Ok(page(0..20, true)), Ok(page(20..30, false))],
            gate.clone(),
        ));
        let list = Arc::new(list(fetcher.clone()));

        gate.notify_one();
        list.load_first().await.unwrap();

        let background = {
            let list = list.clone();
            tokio::spawn(async move { list.load_more().await })
        };
        while !list.is_loading() {
            tokio::task::yield_now().await;
        }

        for _ in 0..5 {
            assert_eq!(
                list.load_more().await.unwrap(),
                LoadOutcome::Skipped(SkipReason::InFlight)
            );
        }
        assert_eq!(list.view(), ListView::Items { count: 20, has_more: true, loading_more: true });

        gate.notify_one();
        background.await.unwrap().unwrap();
        assert_eq!(fetcher.calls(), 2);
        assert_eq!(list.len(), 30);
        assert!(!list.is_loading());
    }

    // Test critique: un échec de load_more laisse l'état strictement inchangé
    #[tokio::test]
    async fn test_failed_load_more_preserves_state_and_notifies() {
        let fetcher = Arc::new(MockFetcher::new(vec![
            Ok(page(0..20, true)),
            Err(FetchError::Http {
                status: 500,
                message: "boom".into(),
            }),
            Ok(page(20..25, false)),
        ]));
        let notifier = Arc::new(RecordingNotifier::default());
        let list = list(fetcher.clone()).with_notifier(notifier.clone());

        list.load_first().await.unwrap();
        let before = list.snapshot();

        let err = list.load_more().await.unwrap_err();
        assert!(matches!(err, ListError::LoadMoreFailed(_)));
        assert_eq!(list.snapshot(), before);
        assert_eq!(notifier.0.lock().len(), 1);
        assert_eq!(notifier.0.lock()[0].level, crate::ports::NoticeLevel::Error);

        // Le retry (re-scroll) reprend avec le même cursor
        list.load_more().await.unwrap();
        assert_eq!(list.len(), 25);
        let requests = fetcher.requests.lock();
        assert_eq!(requests[1].after(), requests[2].after());
    }

    // Scénario: échec initial => état d'erreur, 0 edges, le retry refait la même requête
    #[tokio::test]
    async fn test_initial_failure_then_refetch() {
        let fetcher = Arc::new(MockFetcher::new(vec![
            Err(FetchError::Transport("offline".into())),
            Ok(page(0..3, false)),
        ]));
        let list = list(fetcher.clone());

        let err = list.load_first().await.unwrap_err();
        assert!(matches!(err, ListError::InitialFetchFailed(_)));
        assert_eq!(list.len(), 0);
        assert!(matches!(list.view(), ListView::Error { .. }));

        // load_more avant une première page réussie: no-op
        assert_eq!(
            list.load_more().await.unwrap(),
            LoadOutcome::Skipped(SkipReason::NotReady)
        );

        list.refetch().await.unwrap();
        assert_eq!(list.len(), 3);
        let requests = fetcher.requests.lock();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0], requests[1]);
    }

    // Un résultat vide n'est pas une erreur et se distingue du chargement
    #[tokio::test]
    async fn test_empty_result_is_distinct_state() {
        let fetcher = Arc::new(MockFetcher::new(vec![Ok(Connection::empty())]));
        let list = list(fetcher);

        assert_eq!(list.view(), ListView::Loading);
        list.load_first().await.unwrap();
        assert_eq!(list.view(), ListView::Empty);
        assert_eq!(list.phase(), ListPhase::Ready);
    }

    // Test critique: une page qui arrive après unmount est ignorée
    #[tokio::test]
    async fn test_page_after_unmount_is_discarded() {
        let gate = Arc::new(Notify::new());
        let fetcher = Arc::new(MockFetcher::gated(
            vec![Ok(page(0..20, true)), Ok(page(20..40, true))],
            gate.clone(),
        ));
        let list = Arc::new(list(fetcher));

        gate.notify_one();
        list.load_first().await.unwrap();
        let before = list.snapshot();

        let pending = {
            let list = list.clone();
            tokio::spawn(async move { list.load_more().await })
        };
        while !list.is_loading() {
            tokio::task::yield_now().await;
        }
        list.unmount();
        gate.notify_one();

        let outcome = tokio::time::timeout(Duration::from_secs(1), pending)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        assert_eq!(outcome, LoadOutcome::Discarded);
        assert_eq!(list.snapshot().edges, before.edges);
        assert!(matches!(list.load_more().await, Err(ListError::Unmounted)));
    }

    #[tokio::test]
    async fn test_first_page_after_unmount_leaves_list_idle() {
        let gate = Arc::new(Notify::new());
        let fetcher = Arc::new(MockFetcher::gated(vec![Ok(page(0..20, true))], gate.clone()));
        let list = Arc::new(list(fetcher));

        let pending = {
            let list = list.clone();
            tokio::spawn(async move { list.load_first().await })
        };
        while !list.is_loading() {
            tokio::task::yield_now().await;
        }
        list.unmount();
        gate.notify_one();

        let outcome = tokio::time::timeout(Duration::from_secs(1), pending)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        assert_eq!(outcome, LoadOutcome::Discarded);
        assert_eq!(list.phase(), ListPhase::Idle);
        assert!(!list.is_loading());
        assert!(list.is_empty());
    }

    // Un endCursor absent dans la nouvelle page ne fait pas régresser le cursor
    #[tokio::test]
    async fn test_end_cursor_never_regresses_on_empty_page() {
        let fetcher = Arc::new(MockFetcher::new(vec![
            Ok(page(0..5, true)),
            Ok(Connection::empty()),
        ]));
        let list = list(fetcher);

        list.load_first().await.unwrap();
        let end = list.snapshot().page_info.end_cursor;
        list.load_more().await.unwrap();

        let after = list.snapshot();
        assert_eq!(after.page_info.end_cursor, end);
        assert!(!after.page_info.has_next_page);
        assert_eq!(after.edges.len(), 5);
    }
}
