//! Port trait for fetching connection pages.
//!
//! Implementations live in the infrastructure layer (e.g. `portal-client`).
//! A fetcher is the only way a list view talks to the backend.

use async_trait::async_trait;

use crate::error::FetchResult;
use crate::models::TenantScope;

use super::pagination::{Connection, Cursor, Node, clamp_page_size};

/// One page request.
///
/// The tenant scope is a constructor argument: a request cannot be built
/// without naming the community it is scoped to.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest<F> {
    scope: TenantScope,
    filter: F,
    first: i32,
    after: Option<Cursor>,
}

impl<F> PageRequest<F> {
    /// Request the first page.
    pub fn first_page(scope: TenantScope, filter: F, first: i32) -> Self {
        Self {
            scope,
            filter,
            first: clamp_page_size(Some(first)),
            after: None,
        }
    }

    /// Request the page following `after`.
    pub fn next_page(scope: TenantScope, filter: F, first: i32, after: Cursor) -> Self {
        Self {
            scope,
            filter,
            first: clamp_page_size(Some(first)),
            after: Some(after),
        }
    }

    pub fn scope(&self) -> &TenantScope {
        &self.scope
    }

    pub fn filter(&self) -> &F {
        &self.filter
    }

    /// Normalized page size.
    pub fn first(&self) -> i32 {
        self.first
    }

    pub fn after(&self) -> Option<&Cursor> {
        self.after.as_ref()
    }
}

/// Port trait for a connection data source.
///
/// Each list view owns one fetcher for one resource. Implementations must
/// not retry on their own; retries are user-initiated.
#[async_trait]
pub trait ConnectionFetcher: Send + Sync {
    /// Node type carried by the connection.
    type Node: Node + Clone + Send + Sync + 'static;
    /// Resource-specific narrowing filter.
    type Filter: Clone + Send + Sync + 'static;

    /// Short resource name, used for logging.
    fn resource(&self) -> &'static str;

    /// Fetch one page.
    async fn fetch(
        &self,
        request: &PageRequest<Self::Filter>,
    ) -> FetchResult<Connection<Self::Node>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_normalizes_size() {
        let scope = TenantScope::community("c-1");
        let req = PageRequest::first_page(scope.clone(), (), 500);
        assert_eq!(req.first(), crate::ports::MAX_PAGE_SIZE);
        assert!(req.after().is_none());

        let next = PageRequest::next_page(scope, (), 0, Cursor::new("ff"));
        assert_eq!(next.first(), 1);
        assert_eq!(next.after(), Some(&Cursor::new("ff")));
    }
}
