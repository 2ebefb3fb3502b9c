//! End-to-end: paginated lists driven against the fixture GraphQL backend.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::oneshot;

use portal_client::{
    ClientConfig, GraphQlClient, GraphQlFetcher, Opportunities, Reservations, Wallets,
};
use portal_core::error::{FetchError, ListError};
use portal_core::models::{OpportunityCategory, TenantScope};
use portal_core::ports::{ConnectionFetcher, OpportunityFilter, PageRequest, WalletFilter};
use portal_core::services::{ListConfig, ListView, LoadOutcome, PaginatedList, SkipReason};
use portal_graphql::{ServerConfig, bind, build_schema, serve_listener};
use portal_storage::{FixtureConfig, seed, user_id};

struct Backend {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
}

impl Backend {
    async fn start() -> Self {
        let schema = build_schema(Arc::new(seed(&FixtureConfig::default())));
        let listener = bind(&ServerConfig::ephemeral()).await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel::<()>();

        tokio::spawn(serve_listener(schema, listener, false, async move {
            let _ = rx.await;
        }));

        Self {
            addr,
            shutdown: Some(tx),
        }
    }

    fn client(&self, path: &str) -> Arc<GraphQlClient> {
        let config = ClientConfig::for_endpoint(format!("http://{}{}", self.addr, path));
        Arc::new(GraphQlClient::new(config).unwrap())
    }
}

impl Drop for Backend {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

// Test critique: parcours complet d'une liste, page par page, sans doublon
#[tokio::test]
async fn test_walks_every_page_of_a_community() {
    let backend = Backend::start().await;
    let fetcher = Arc::new(GraphQlFetcher::<Opportunities>::new(backend.client("/graphql")));
    let list = PaginatedList::new(
        fetcher,
        TenantScope::community("neo88"),
        OpportunityFilter::default(),
        ListConfig::default(),
    );

    list.load_first().await.unwrap();
    assert_eq!(list.len(), 20);

    let mut pages = 1;
    while list.has_more() {
        let outcome = list.load_more().await.unwrap();
        assert!(matches!(outcome, LoadOutcome::Loaded { replaced: 0, .. }));
        pages += 1;
    }

    assert_eq!(pages, 3);
    assert_eq!(list.len(), 45);
    let snapshot = list.snapshot();
    assert_eq!(snapshot.total_count, Some(45));
    // Deux enregistrements non résolus sont servis avec node = null
    assert_eq!(snapshot.edges.iter().filter(|e| e.node.is_none()).count(), 2);
    assert_eq!(
        list.load_more().await.unwrap(),
        LoadOutcome::Skipped(SkipReason::NoMorePages)
    );
}

#[tokio::test]
async fn test_filter_and_user_scope_reach_the_backend() {
    let backend = Backend::start().await;
    let client = backend.client("/graphql");

    let quests = GraphQlFetcher::<Opportunities>::new(client.clone());
    let filter = OpportunityFilter {
        category: Some(OpportunityCategory::Quest),
        ..Default::default()
    };
    let page = quests
        .fetch(&PageRequest::first_page(TenantScope::community("kibotcha"), filter, 100))
        .await
        .unwrap();
    assert!(!page.edges.is_empty());
    assert!(page.edges.iter().all(|e| {
        e.node.as_ref().and_then(|n| n.category) == Some(OpportunityCategory::Quest)
    }));

    let reservations = GraphQlFetcher::<Reservations>::new(client.clone());
    let scope = TenantScope::community("neo88").with_user(user_id("neo88", 1));
    let page = reservations
        .fetch(&PageRequest::first_page(scope, Default::default(), 100))
        .await
        .unwrap();
    assert_eq!(page.total_count, Some(15));

    // Isolation: une autre communauté ne voit pas ces wallets
    let wallets = GraphQlFetcher::<Wallets>::new(client);
    let page = wallets
        .fetch(&PageRequest::first_page(
            TenantScope::community("unknown-community"),
            WalletFilter::default(),
            20,
        ))
        .await
        .unwrap();
    assert!(page.edges.is_empty());
    assert!(!page.page_info.has_next_page);
}

// Test critique: les erreurs du backend remontent avec le bon type
#[tokio::test]
async fn test_backend_errors_are_classified() {
    let backend = Backend::start().await;

    let fetcher = GraphQlFetcher::<Opportunities>::new(backend.client("/graphql"));
    let err = fetcher
        .fetch(&PageRequest::first_page(TenantScope::community(""), Default::default(), 20))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::GraphQl(_)));

    let fetcher = GraphQlFetcher::<Opportunities>::new(backend.client("/not-graphql"));
    let err = fetcher
        .fetch(&PageRequest::first_page(TenantScope::community("neo88"), Default::default(), 20))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Http { status: 404, .. }));
}

#[tokio::test]
async fn test_unreachable_backend_puts_list_in_error_state() {
    // Port lié puis libéré: plus personne n'écoute
    let listener = bind(&ServerConfig::ephemeral()).await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = ClientConfig::for_endpoint(format!("http://{addr}/graphql"));
    let fetcher = Arc::new(GraphQlFetcher::<Opportunities>::new(Arc::new(
        GraphQlClient::new(config).unwrap(),
    )));
    let list = PaginatedList::new(
        fetcher,
        TenantScope::community("neo88"),
        OpportunityFilter::default(),
        ListConfig::default(),
    );

    let err = list.load_first().await.unwrap_err();
    assert!(matches!(
        err,
        ListError::InitialFetchFailed(FetchError::Transport(_) | FetchError::Timeout)
    ));
    assert!(matches!(list.view(), ListView::Error { .. }));
    assert!(list.is_empty());
}
