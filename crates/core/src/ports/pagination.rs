//! Pagination types for list queries.
//!
//! These types implement Relay-style cursor pagination. Only forward
//! pagination (`first`/`after`) is used by list views; the backward
//! fields of [`PageInfo`] are carried through untouched.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default page size for list queries.
pub const DEFAULT_PAGE_SIZE: i32 = 20;
/// Maximum page size for list queries.
pub const MAX_PAGE_SIZE: i32 = 100;

/// Normalize a requested page size.
///
/// Missing values fall back to [`DEFAULT_PAGE_SIZE`]; everything is
/// clamped to `1..=MAX_PAGE_SIZE`.
pub fn clamp_page_size(first: Option<i32>) -> i32 {
    first.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
}

/// Opaque cursor for pagination.
///
/// The cursor value is implementation-specific and should be treated
/// as an opaque token by clients.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor {
    pub value: String,
}

impl Cursor {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

impl std::fmt::Display for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value)
    }
}

/// Forward pagination parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pagination {
    /// Number of items to fetch.
    pub first: Option<i32>,
    /// Cursor to start after.
    pub after: Option<Cursor>,
}

/// A node that can be identified within a connection.
///
/// Identity drives de-duplication when pages are merged.
pub trait Node {
    /// Stable identifier of this node.
    fn node_id(&self) -> &str;
}

/// Paginated result set with edges and page info.
///
/// This is the Relay connection pattern for cursor-based pagination.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection<T> {
    /// List of edges (node + cursor pairs) in server order.
    pub edges: Vec<Edge<T>>,
    /// Information about the current page.
    pub page_info: PageInfo,
    /// Total count of items. Informational only.
    pub total_count: Option<i64>,
}

impl<T> Connection<T> {
    /// A connection with no edges and no further pages.
    pub fn empty() -> Self {
        Self {
            edges: Vec::new(),
            page_info: PageInfo::default(),
            total_count: Some(0),
        }
    }
}

/// A single item in a paginated result.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge<T> {
    /// The item. `None` when the backend failed to resolve this node.
    pub node: Option<T>,
    /// Cursor for this item (used for pagination).
    pub cursor: Cursor,
}

impl<T: Node> Edge<T> {
    /// De-duplication key of this edge.
    ///
    /// The node id when a node is present; otherwise the cursor. The two
    /// live in separate key spaces, so an edge without a node never shares
    /// a key with a resolved node whatever its id looks like.
    pub fn dedup_key(&self) -> DedupKey {
        match &self.node {
            Some(node) => DedupKey::Id(node.node_id().to_string()),
            None => DedupKey::Cursor(self.cursor.value.clone()),
        }
    }
}

/// Identity of an edge inside a merged list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DedupKey {
    /// Id of a resolved node.
    Id(String),
    /// Cursor of an edge whose node is missing.
    Cursor(String),
}

impl fmt::Display for DedupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => f.write_str(id),
            Self::Cursor(cursor) => write!(f, "cursor:{cursor}"),
        }
    }
}

/// Information about the current page in a paginated result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageInfo {
    /// Whether there are more items after this page.
    pub has_next_page: bool,
    /// Whether there are items before this page.
    pub has_previous_page: bool,
    /// Cursor of the first item in this page.
    pub start_cursor: Option<Cursor>,
    /// Cursor of the last item in this page.
    pub end_cursor: Option<Cursor>,
}
