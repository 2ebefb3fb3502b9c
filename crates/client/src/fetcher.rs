//! [`ConnectionFetcher`] over the portal GraphQL API.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use portal_core::error::FetchResult;
use portal_core::ports::{Connection, ConnectionFetcher, Cursor, Edge, PageInfo, PageRequest};

use crate::client::GraphQlClient;
use crate::resources::Resource;

// -----------------------------------------------------------------------------
// Wire types
// -----------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Variables<'a, F: Serialize> {
    community_id: &'a str,
    user_id: Option<&'a str>,
    filter: &'a F,
    first: i32,
    cursor: Option<&'a str>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireConnection<N> {
    #[serde(default = "Vec::new")]
    edges: Vec<Option<WireEdge<N>>>,
    page_info: WirePageInfo,
    total_count: Option<i64>,
}

#[derive(Deserialize)]
struct WireEdge<N> {
    cursor: String,
    node: Option<N>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePageInfo {
    has_next_page: bool,
    #[serde(default)]
    has_previous_page: bool,
    start_cursor: Option<String>,
    end_cursor: Option<String>,
}

impl<N> WireConnection<N> {
    fn into_connection(self) -> Connection<N> {
        let received = self.edges.len();
        let edges: Vec<Edge<N>> = self
            .edges
            .into_iter()
            .flatten()
            .map(|e| Edge {
                node: e.node,
                cursor: Cursor::new(e.cursor),
            })
            .collect();
        if edges.len() != received {
            warn!(dropped = received - edges.len(), "Dropped null edges without a cursor");
        }

        Connection {
            edges,
            page_info: PageInfo {
                has_next_page: self.page_info.has_next_page,
                has_previous_page: self.page_info.has_previous_page,
                start_cursor: self.page_info.start_cursor.map(Cursor::new),
                end_cursor: self.page_info.end_cursor.map(Cursor::new),
            },
            total_count: self.total_count,
        }
    }
}

// -----------------------------------------------------------------------------
// GraphQlFetcher
// -----------------------------------------------------------------------------

/// Fetches pages of resource `R` from the portal GraphQL API.
pub struct GraphQlFetcher<R: Resource> {
    client: Arc<GraphQlClient>,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> GraphQlFetcher<R> {
    pub fn new(client: Arc<GraphQlClient>) -> Self {
        Self {
            client,
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> Clone for GraphQlFetcher<R> {
    fn clone(&self) -> Self {
        Self::new(self.client.clone())
    }
}

#[async_trait]
impl<R: Resource> ConnectionFetcher for GraphQlFetcher<R> {
    type Node = R::Node;
    type Filter = R::Filter;

    fn resource(&self) -> &'static str {
        R::FIELD
    }

    #[instrument(skip_all, fields(resource = R::FIELD, community = %request.scope().community_id, first = request.first()))]
    async fn fetch(&self, request: &PageRequest<R::Filter>) -> FetchResult<Connection<R::Node>> {
        let scope = request.scope();
        let variables = Variables {
            community_id: scope.community_id.as_str(),
            user_id: scope.user_id.as_ref().map(|u| u.as_str()),
            filter: request.filter(),
            first: request.first(),
            cursor: request.after().map(|c| c.value.as_str()),
        };

        let wire: WireConnection<R::Node> = self
            .client
            .query(R::DOCUMENT, R::FIELD, variables)
            .await?;
        let connection = wire.into_connection();

        debug!(
            edges = connection.edges.len(),
            has_next = connection.page_info.has_next_page,
            "Fetched page"
        );
        Ok(connection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_core::models::Opportunity;
    use portal_core::ports::OpportunityFilter;

    #[test]
    fn test_variables_shape() {
        let filter = OpportunityFilter {
            keyword: Some("tea".into()),
            ..Default::default()
        };
        let vars = Variables {
            community_id: "neo88",
            user_id: None,
            filter: &filter,
            first: 20,
            cursor: Some("00ff"),
        };
        let json = serde_json::to_value(&vars).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "communityId": "neo88",
                "userId": null,
                "filter": { "keyword": "tea" },
                "first": 20,
                "cursor": "00ff"
            })
        );
    }

    // Test critique: un node null est conservé avec son cursor
    #[test]
    fn test_null_node_edges_are_kept() {
        let json = serde_json::json!({
            "edges": [
                { "cursor": "01", "node": { "id": "op-1", "category": "QUEST" } },
                { "cursor": "02", "node": null },
                null
            ],
            "pageInfo": { "hasNextPage": true, "endCursor": "02" },
            "totalCount": 3
        });
        let wire: WireConnection<Opportunity> = serde_json::from_value(json).unwrap();
        let conn = wire.into_connection();

        assert_eq!(conn.edges.len(), 2);
        assert!(conn.edges[1].node.is_none());
        assert_eq!(conn.edges[1].cursor, Cursor::new("02"));
        assert_eq!(conn.page_info.end_cursor, Some(Cursor::new("02")));
        assert_eq!(conn.page_info.start_cursor, None);
    }
}
