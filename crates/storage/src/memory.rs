//! In-memory catalog.
//!
//! Each resource is a table of rows tagged with their tenant. Rows are
//! listed newest first using keyset pagination on an insertion sequence,
//! so pages stay stable while new rows are inserted.

use std::collections::HashSet;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, instrument};

use portal_core::error::{StorageError, StorageResult};
use portal_core::models::{
    CommunityId, Membership, Opportunity, Reservation, TenantScope, Ticket, Transaction, UserId,
    Wallet,
};
use portal_core::ports::{
    Catalog, Connection, Cursor, Edge, MembershipFilter, OpportunityFilter, PageInfo, Pagination,
    ReservationFilter, TicketFilter, TransactionFilter, WalletFilter, clamp_page_size,
};

/// Maximum accepted length of a keyword filter.
pub const MAX_KEYWORD_LEN: usize = 100;

// =============================================================================
// Cursor encoding
// =============================================================================

/// Encode a row sequence number as an opaque cursor.
pub fn encode_cursor(seq: u64) -> Cursor {
    Cursor::new(hex::encode(seq.to_be_bytes()))
}

/// Decode a cursor produced by [`encode_cursor`].
pub fn decode_cursor(cursor: &Cursor) -> StorageResult<u64> {
    let bytes = hex::decode(&cursor.value)
        .map_err(|e| StorageError::InvalidCursor(format!("{}: {}", cursor.value, e)))?;
    let bytes: [u8; 8] = bytes.try_into().map_err(|v: Vec<u8>| {
        StorageError::InvalidCursor(format!("expected 8 bytes, got {}", v.len()))
    })?;
    Ok(u64::from_be_bytes(bytes))
}

// =============================================================================
// Rows & tables
// =============================================================================

/// Tenant tags attached to a stored row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowTags {
    pub community_id: CommunityId,
    /// Owning user, for user-owned resources.
    pub owner: Option<UserId>,
    /// Ids of related records, matched by reference filters.
    pub refs: Vec<String>,
}

impl RowTags {
    pub fn community(community_id: impl Into<CommunityId>) -> Self {
        Self {
            community_id: community_id.into(),
            owner: None,
            refs: Vec::new(),
        }
    }

    pub fn owned_by(mut self, user_id: impl Into<UserId>) -> Self {
        self.owner = Some(user_id.into());
        self
    }

    pub fn referencing(mut self, id: impl Into<String>) -> Self {
        self.refs.push(id.into());
        self
    }
}

#[derive(Debug, Clone)]
struct Row<T> {
    seq: u64,
    tags: RowTags,
    /// `None` models a record the backend can no longer resolve.
    node: Option<T>,
}

/// Per-resource row predicate.
trait RowFilter<T> {
    fn matches(&self, node: &T, tags: &RowTags) -> bool;

    /// Whether the filter sets no criteria. Unresolved rows only pass
    /// unfiltered queries.
    fn is_unfiltered(&self) -> bool;

    fn validate(&self) -> StorageResult<()> {
        Ok(())
    }
}

#[derive(Debug)]
struct Table<T> {
    rows: Vec<Row<T>>,
    /// Whether a user in the scope narrows this table to that user's rows.
    user_owned: bool,
}

impl<T: Clone> Table<T> {
    fn new(user_owned: bool) -> Self {
        Self {
            rows: Vec::new(),
            user_owned,
        }
    }

    fn push(&mut self, seq: u64, tags: RowTags, node: Option<T>) {
        self.rows.push(Row { seq, tags, node });
    }

    fn in_scope(&self, row: &Row<T>, scope: &TenantScope) -> bool {
        if row.tags.community_id != scope.community_id {
            return false;
        }
        match (&scope.user_id, self.user_owned) {
            (Some(user), true) => row.tags.owner.as_ref() == Some(user),
            _ => true,
        }
    }

    /// List rows newest first, after the pagination cursor.
    fn list<F: RowFilter<T>>(
        &self,
        scope: &TenantScope,
        filter: &F,
        pagination: &Pagination,
    ) -> StorageResult<Connection<T>> {
        filter.validate()?;
        let limit = clamp_page_size(pagination.first) as usize;
        let after = pagination.after.as_ref().map(decode_cursor).transpose()?;

        let matching: Vec<&Row<T>> = self
            .rows
            .iter()
            .rev()
            .filter(|row| self.in_scope(row, scope))
            .filter(|row| match &row.node {
                Some(node) => filter.matches(node, &row.tags),
                None => filter.is_unfiltered(),
            })
            .collect();
        let total_count = matching.len() as i64;

        // Fetch one extra to determine has_more
        let mut page: Vec<&Row<T>> = matching
            .into_iter()
            .filter(|row| after.is_none_or(|seq| row.seq < seq))
            .take(limit + 1)
            .collect();
        let has_more = page.len() > limit;
        if has_more {
            page.pop();
        }

        let edges: Vec<Edge<T>> = page
            .into_iter()
            .map(|row| Edge {
                node: row.node.clone(),
                cursor: encode_cursor(row.seq),
            })
            .collect();

        let page_info = PageInfo {
            has_next_page: has_more,
            has_previous_page: after.is_some(),
            start_cursor: edges.first().map(|e| e.cursor.clone()),
            end_cursor: edges.last().map(|e| e.cursor.clone()),
        };

        Ok(Connection {
            edges,
            page_info,
            total_count: Some(total_count),
        })
    }
}

// =============================================================================
// Filters
// =============================================================================

impl RowFilter<Opportunity> for OpportunityFilter {
    fn matches(&self, node: &Opportunity, _tags: &RowTags) -> bool {
        if self.category.is_some() && node.category != self.category {
            return false;
        }
        if self.publish_status.is_some() && node.publish_status != self.publish_status {
            return false;
        }
        if let Some(keyword) = &self.keyword {
            let keyword = keyword.to_lowercase();
            let title = node.title.as_deref().unwrap_or_default().to_lowercase();
            if !title.contains(&keyword) {
                return false;
            }
        }
        true
    }

    fn is_unfiltered(&self) -> bool {
        self == &OpportunityFilter::default()
    }

    fn validate(&self) -> StorageResult<()> {
        match &self.keyword {
            Some(k) if k.len() > MAX_KEYWORD_LEN => Err(StorageError::ValidationError(format!(
                "keyword exceeds maximum length of {} characters",
                MAX_KEYWORD_LEN
            ))),
            _ => Ok(()),
        }
    }
}

impl RowFilter<Reservation> for ReservationFilter {
    fn matches(&self, node: &Reservation, tags: &RowTags) -> bool {
        if self.status.is_some() && node.status != self.status {
            return false;
        }
        match &self.opportunity_id {
            Some(id) => tags.refs.contains(id),
            None => true,
        }
    }

    fn is_unfiltered(&self) -> bool {
        self == &ReservationFilter::default()
    }
}

impl RowFilter<Transaction> for TransactionFilter {
    fn matches(&self, node: &Transaction, tags: &RowTags) -> bool {
        if self.reason.is_some() && node.reason != self.reason {
            return false;
        }
        match &self.wallet_id {
            Some(id) => tags.refs.contains(id),
            None => true,
        }
    }

    fn is_unfiltered(&self) -> bool {
        self == &TransactionFilter::default()
    }
}

impl RowFilter<Membership> for MembershipFilter {
    fn matches(&self, node: &Membership, _tags: &RowTags) -> bool {
        (self.role.is_none() || node.role == self.role)
            && (self.status.is_none() || node.status == self.status)
    }

    fn is_unfiltered(&self) -> bool {
        self == &MembershipFilter::default()
    }
}

impl RowFilter<Ticket> for TicketFilter {
    fn matches(&self, node: &Ticket, _tags: &RowTags) -> bool {
        self.status.is_none() || node.status == self.status
    }

    fn is_unfiltered(&self) -> bool {
        self == &TicketFilter::default()
    }
}

impl RowFilter<Wallet> for WalletFilter {
    fn matches(&self, node: &Wallet, _tags: &RowTags) -> bool {
        self.kind.is_none() || node.kind == self.kind
    }

    fn is_unfiltered(&self) -> bool {
        self == &WalletFilter::default()
    }
}

// =============================================================================
// MemoryCatalog
// =============================================================================

#[derive(Debug)]
struct Tables {
    next_seq: u64,
    opportunities: Table<Opportunity>,
    reservations: Table<Reservation>,
    transactions: Table<Transaction>,
    memberships: Table<Membership>,
    tickets: Table<Ticket>,
    wallets: Table<Wallet>,
}

impl Tables {
    fn next_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }
}

/// Summary of what a catalog holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogStats {
    pub communities: usize,
    pub opportunities: usize,
    pub reservations: usize,
    pub transactions: usize,
    pub memberships: usize,
    pub tickets: usize,
    pub wallets: usize,
}

/// Thread-safe in-memory implementation of [`Catalog`].
///
/// Opportunities and memberships are community-wide; reservations,
/// transactions, tickets and wallets are narrowed to the scope's user
/// when one is given.
#[derive(Debug)]
pub struct MemoryCatalog {
    tables: RwLock<Tables>,
}

macro_rules! insert_fn {
    ($fn_name:ident, $table:ident, $ty:ty) => {
        /// Insert a row. Later inserts list before earlier ones.
        pub fn $fn_name(&self, tags: RowTags, node: Option<$ty>) -> Cursor {
            let mut tables = self.tables.write();
            let seq = tables.next_seq();
            tables.$table.push(seq, tags, node);
            encode_cursor(seq)
        }
    };
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables {
                next_seq: 0,
                opportunities: Table::new(false),
                reservations: Table::new(true),
                transactions: Table::new(true),
                memberships: Table::new(false),
                tickets: Table::new(true),
                wallets: Table::new(true),
            }),
        }
    }

    insert_fn!(insert_opportunity, opportunities, Opportunity);
    insert_fn!(insert_reservation, reservations, Reservation);
    insert_fn!(insert_transaction, transactions, Transaction);
    insert_fn!(insert_membership, memberships, Membership);
    insert_fn!(insert_ticket, tickets, Ticket);
    insert_fn!(insert_wallet, wallets, Wallet);

    pub fn stats(&self) -> CatalogStats {
        let tables = self.tables.read();
        let communities: HashSet<&CommunityId> = tables
            .opportunities
            .rows
            .iter()
            .map(|r| &r.tags.community_id)
            .chain(tables.memberships.rows.iter().map(|r| &r.tags.community_id))
            .chain(tables.wallets.rows.iter().map(|r| &r.tags.community_id))
            .collect();
        CatalogStats {
            communities: communities.len(),
            opportunities: tables.opportunities.rows.len(),
            reservations: tables.reservations.rows.len(),
            transactions: tables.transactions.rows.len(),
            memberships: tables.memberships.rows.len(),
            tickets: tables.tickets.rows.len(),
            wallets: tables.wallets.rows.len(),
        }
    }
}

impl Default for MemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Catalog for MemoryCatalog {
    #[instrument(skip(self), level = "debug")]
    async fn list_opportunities(
        &self,
        scope: &TenantScope,
        filter: &OpportunityFilter,
        pagination: &Pagination,
    ) -> StorageResult<Connection<Opportunity>> {
        let conn = self.tables.read().opportunities.list(scope, filter, pagination)?;
        debug!(edges = conn.edges.len(), has_next = conn.page_info.has_next_page, "Listed opportunities");
        Ok(conn)
    }

    #[instrument(skip(self), level = "debug")]
    async fn list_reservations(
        &self,
        scope: &TenantScope,
        filter: &ReservationFilter,
        pagination: &Pagination,
    ) -> StorageResult<Connection<Reservation>> {
        self.tables.read().reservations.list(scope, filter, pagination)
    }

    #[instrument(skip(self), level = "debug")]
    async fn list_transactions(
        &self,
        scope: &TenantScope,
        filter: &TransactionFilter,
        pagination: &Pagination,
    ) -> StorageResult<Connection<Transaction>> {
        self.tables.read().transactions.list(scope, filter, pagination)
    }

    #[instrument(skip(self), level = "debug")]
    async fn list_memberships(
        &self,
        scope: &TenantScope,
        filter: &MembershipFilter,
        pagination: &Pagination,
    ) -> StorageResult<Connection<Membership>> {
        self.tables.read().memberships.list(scope, filter, pagination)
    }

    #[instrument(skip(self), level = "debug")]
    async fn list_tickets(
        &self,
        scope: &TenantScope,
        filter: &TicketFilter,
        pagination: &Pagination,
    ) -> StorageResult<Connection<Ticket>> {
        self.tables.read().tickets.list(scope, filter, pagination)
    }

    #[instrument(skip(self), level = "debug")]
    async fn list_wallets(
        &self,
        scope: &TenantScope,
        filter: &WalletFilter,
        pagination: &Pagination,
    ) -> StorageResult<Connection<Wallet>> {
        self.tables.read().wallets.list(scope, filter, pagination)
    }
}
