//! `portal browse`: page through one resource the way a list view does.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use portal_client::{GraphQlClient, GraphQlFetcher, Resource};
use portal_core::models::TenantScope;
use portal_core::ports::ConnectionFetcher;
use portal_core::services::{
    DEFAULT_VISIBILITY_THRESHOLD, ListConfig, ListView, PaginatedList, SentinelReport,
    attach_sentinel,
};
use portal_presenters::{Presenter, PresenterConfig, present_edges};

use crate::scroll::ScrollSimulator;

/// How a browse session runs.
#[derive(Debug, Clone)]
pub struct BrowseOptions {
    pub page_size: i32,
    pub scroll_interval: Duration,
    /// Stop once this many edges are printed.
    pub max_items: Option<usize>,
    /// Extra attempts for the first page.
    pub retries: u32,
    pub presenter: PresenterConfig,
}

/// What a browse session saw.
#[derive(Debug, Clone, Default)]
pub struct BrowseSummary {
    pub edges: usize,
    pub rendered: usize,
    pub total_count: Option<i64>,
    pub sentinel: SentinelReport,
}

/// Load the first page, then let the simulated sentinel pull further pages
/// until the list is exhausted, `max_items` is reached, or `stop` resolves.
/// Presented rows are printed to stdout as JSON lines.
pub async fn browse<R, S>(
    client: Arc<GraphQlClient>,
    scope: TenantScope,
    filter: R::Filter,
    options: &BrowseOptions,
    stop: S,
) -> Result<BrowseSummary>
where
    R: Resource,
    PresenterConfig: Presenter<R::Node>,
    <PresenterConfig as Presenter<R::Node>>::View: Serialize,
    S: std::future::Future<Output = ()>,
{
    let fetcher = Arc::new(GraphQlFetcher::<R>::new(client));
    let list = Arc::new(PaginatedList::new(
        fetcher,
        scope,
        filter,
        ListConfig {
            page_size: options.page_size,
        },
    ));

    run_session(list, options, stop).await
}

/// Drive one list through a browse session. The list is unmounted and the
/// summary filled on every exit past the first page.
async fn run_session<F, S>(
    list: Arc<PaginatedList<F>>,
    options: &BrowseOptions,
    stop: S,
) -> Result<BrowseSummary>
where
    F: ConnectionFetcher + 'static,
    PresenterConfig: Presenter<F::Node>,
    <PresenterConfig as Presenter<F::Node>>::View: Serialize,
    S: std::future::Future<Output = ()>,
{
    info!(resource = list.resource(), community = %list.scope().community_id, "📜 Loading list");
    load_first_with_retries(&list, options).await?;

    let mut summary = BrowseSummary::default();
    let scrolled = scroll(&list, options, stop, &mut summary).await;

    list.unmount();
    let snapshot = list.snapshot();
    summary.edges = snapshot.edges.len();
    summary.total_count = snapshot.total_count;

    summary.sentinel = match scrolled? {
        Some(sentinel) => sentinel.await.context("Sentinel task failed")?,
        None => SentinelReport::default(),
    };
    Ok(summary)
}

/// Print the loaded rows and keep scrolling until a stop condition. Returns
/// the sentinel task if one was attached; the caller unmounts the list.
async fn scroll<F, S>(
    list: &Arc<PaginatedList<F>>,
    options: &BrowseOptions,
    stop: S,
    summary: &mut BrowseSummary,
) -> Result<Option<JoinHandle<SentinelReport>>>
where
    F: ConnectionFetcher + 'static,
    PresenterConfig: Presenter<F::Node>,
    <PresenterConfig as Presenter<F::Node>>::View: Serialize,
    S: std::future::Future<Output = ()>,
{
    let mut printed = 0;
    summary.rendered += print_new(options, list, &mut printed)?;
    if list.view() == ListView::Empty {
        info!("📭 Nothing to show");
        return Ok(None);
    }
    if limit_reached(options, printed) {
        return Ok(None);
    }

    let source = ScrollSimulator::new(options.scroll_interval);
    let sentinel = attach_sentinel(list.clone(), &source, DEFAULT_VISIBILITY_THRESHOLD)
        .await
        .context("Failed to attach scroll sentinel")?;

    tokio::pin!(stop);
    let mut ticker = tokio::time::interval(options.scroll_interval);
    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = &mut stop => {
                info!("🛑 Browse interrupted");
                break;
            }
        }

        match print_new(options, list, &mut printed) {
            Ok(rendered) => summary.rendered += rendered,
            Err(e) => {
                list.unmount();
                let _ = sentinel.await;
                return Err(e);
            }
        }

        if limit_reached(options, printed) {
            debug!(printed, "Item limit reached");
            break;
        }
        if !list.has_more() && !list.is_loading() {
            break;
        }
    }

    Ok(Some(sentinel))
}

fn limit_reached(options: &BrowseOptions, printed: usize) -> bool {
    options.max_items.is_some_and(|max| printed >= max)
}

async fn load_first_with_retries<F>(list: &PaginatedList<F>, options: &BrowseOptions) -> Result<()>
where
    F: ConnectionFetcher,
{
    let mut result = list.load_first().await;
    let mut attempt = 0;
    while let Err(e) = &result {
        if attempt >= options.retries {
            break;
        }
        attempt += 1;
        let backoff = Duration::from_millis(250 * 2u64.pow(attempt.min(6)));
        warn!(error = %e, attempt, "⚠️  First page failed, retrying in {:?}", backoff);
        tokio::time::sleep(backoff).await;
        result = list.refetch().await;
    }

    result.map(|_| ()).context("Failed to load the first page")
}

/// Print rows not yet printed, never beyond `max_items`. Advances `printed`
/// past every consumed edge and returns how many rows were rendered.
fn print_new<F, V>(
    options: &BrowseOptions,
    list: &PaginatedList<F>,
    printed: &mut usize,
) -> Result<usize>
where
    F: ConnectionFetcher,
    PresenterConfig: Presenter<F::Node, View = V>,
    V: Serialize,
{
    let snapshot = list.snapshot();
    let from = (*printed).min(snapshot.edges.len());
    let budget = options
        .max_items
        .map_or(usize::MAX, |max| max.saturating_sub(from));
    let fresh = &snapshot.edges[from..snapshot.edges.len().min(from.saturating_add(budget))];

    let views = present_edges(&options.presenter, fresh);
    for view in &views {
        println!("{}", serde_json::to_string(view)?);
    }
    *printed = from + fresh.len();
    Ok(views.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::ops::Range;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use portal_core::error::FetchResult;
    use portal_core::models::Opportunity;
    use portal_core::ports::{Connection, Cursor, Edge, OpportunityFilter, PageInfo, PageRequest};

    struct QueuedFetcher {
        pages: Mutex<VecDeque<Connection<Opportunity>>>,
    }

    impl QueuedFetcher {
        fn new(pages: Vec<Connection<Opportunity>>) -> Self {
            Self {
                pages: Mutex::new(pages.into()),
            }
        }
    }

    #[async_trait]
    impl ConnectionFetcher for QueuedFetcher {
        type Node = Opportunity;
        type Filter = OpportunityFilter;

        fn resource(&self) -> &'static str {
            "opportunities"
        }

        async fn fetch(
            &self,
            _request: &PageRequest<OpportunityFilter>,
        ) -> FetchResult<Connection<Opportunity>> {
            Ok(self.pages.lock().unwrap().pop_front().unwrap_or_else(Connection::empty))
        }
    }

    fn opportunity(id: String) -> Opportunity {
        Opportunity {
            id,
            title: None,
            description: None,
            category: None,
            publish_status: None,
            points_to_earn: None,
            fee_required: None,
            capacity: None,
            place_name: None,
            starts_at: None,
            created_at: None,
        }
    }

    fn page(ids: Range<u32>, has_next: bool) -> Connection<Opportunity> {
        let edges: Vec<_> = ids
            .map(|i| Edge {
                node: Some(opportunity(format!("op-{i}"))),
                cursor: Cursor::new(format!("{i:04x}")),
            })
            .collect();
        Connection {
            page_info: PageInfo {
                has_next_page: has_next,
                has_previous_page: false,
                start_cursor: edges.first().map(|e| e.cursor.clone()),
                end_cursor: edges.last().map(|e| e.cursor.clone()),
            },
            total_count: Some(40),
            edges,
        }
    }

    fn options(max_items: Option<usize>) -> BrowseOptions {
        BrowseOptions {
            page_size: 20,
            scroll_interval: Duration::from_millis(1),
            max_items,
            retries: 0,
            presenter: PresenterConfig::default(),
        }
    }

    fn list(pages: Vec<Connection<Opportunity>>) -> Arc<PaginatedList<QueuedFetcher>> {
        Arc::new(PaginatedList::new(
            Arc::new(QueuedFetcher::new(pages)),
            TenantScope::community("neo88"),
            OpportunityFilter::default(),
            ListConfig { page_size: 20 },
        ))
    }

    // Une liste vide sort tôt mais remplit quand même le résumé
    #[tokio::test]
    async fn test_empty_list_still_fills_summary() {
        let list = list(vec![Connection::empty()]);

        let summary = run_session(list.clone(), &options(None), std::future::pending())
            .await
            .unwrap();

        assert_eq!(summary.edges, 0);
        assert_eq!(summary.rendered, 0);
        assert_eq!(summary.total_count, Some(0));
        assert!(!list.is_mounted());
    }

    // Test critique: --max-items borne la sortie au milieu d'une page
    #[tokio::test]
    async fn test_max_items_caps_rendered_rows() {
        let list = list(vec![page(0..20, true), page(20..40, false)]);

        let summary = tokio::time::timeout(
            Duration::from_secs(5),
            run_session(list.clone(), &options(Some(25)), std::future::pending()),
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(summary.rendered, 25);
        assert_eq!(summary.edges, 40);
        assert_eq!(summary.total_count, Some(40));
        assert!(!list.is_mounted());
    }

    #[tokio::test]
    async fn test_limit_within_first_page_skips_sentinel() {
        let list = list(vec![page(0..20, true)]);

        let summary = run_session(list.clone(), &options(Some(5)), std::future::pending())
            .await
            .unwrap();

        assert_eq!(summary.rendered, 5);
        assert_eq!(summary.edges, 20);
        assert_eq!(summary.sentinel, SentinelReport::default());
        assert!(!list.is_mounted());
    }
}
