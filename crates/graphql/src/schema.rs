//! GraphQL schema definition.
//!
//! Serves the portal list contract: every resource is a tenant-scoped,
//! forward-paginated connection
//! `resource(communityId, userId, filter, first, cursor)`.

use std::sync::Arc;

use async_graphql::{Context, EmptyMutation, EmptySubscription, Object, Result, Schema, SchemaBuilder};
use chrono::{DateTime, Utc};
use tracing::debug;

use portal_core::models::{self as domain, TenantScope};
use portal_core::ports::{self as ports, Catalog, Cursor, Pagination};

use crate::types::PortalSchema;

// -----------------------------------------------------------------------------
// Schema Configuration
// -----------------------------------------------------------------------------

/// Maximum query depth to prevent deeply nested queries (DoS protection).
/// Note: GraphQL introspection requires depth ~13, so we use 15 to allow it.
pub const MAX_QUERY_DEPTH: usize = 15;

/// Maximum query complexity score (DoS protection).
/// Each field has a default complexity of 1, nested objects multiply.
pub const MAX_QUERY_COMPLEXITY: usize = 500;

// -----------------------------------------------------------------------------
// Schema Builder
// -----------------------------------------------------------------------------

/// Build the portal schema over a catalog.
///
/// Includes query depth and complexity limits for DoS protection.
pub fn build_schema<C: Catalog + 'static>(catalog: Arc<C>) -> PortalSchema {
    schema_builder(catalog)
        .limit_depth(MAX_QUERY_DEPTH)
        .limit_complexity(MAX_QUERY_COMPLEXITY)
        .finish()
}

/// Create a schema builder with catalog data.
///
/// Remember to call `.limit_depth()` and `.limit_complexity()` before `.finish()`.
pub fn schema_builder<C: Catalog + 'static>(
    catalog: Arc<C>,
) -> SchemaBuilder<PortalQuery, EmptyMutation, EmptySubscription> {
    let catalog: Arc<dyn Catalog> = catalog;
    Schema::build(PortalQuery, EmptyMutation, EmptySubscription).data(catalog)
}

// -----------------------------------------------------------------------------
// Query Root
// -----------------------------------------------------------------------------

/// Query root: one connection field per portal resource.
#[derive(Default)]
pub struct PortalQuery;

#[Object]
impl PortalQuery {
    /// List opportunities of a community, newest first.
    async fn opportunities<'ctx>(
        &self,
        ctx: &Context<'ctx>,
        community_id: String,
        user_id: Option<String>,
        filter: Option<OpportunityFilterInput>,
        #[graphql(default = 20)] first: Option<i32>,
        cursor: Option<String>,
    ) -> Result<OpportunityConnection> {
        let scope = parse_scope(community_id, user_id)?;
        let filter = filter.unwrap_or_default().into_core()?;
        let pagination = parse_pagination(first, cursor)?;
        let catalog = ctx.data::<Arc<dyn Catalog>>()?;

        let connection = catalog.list_opportunities(&scope, &filter, &pagination).await?;
        debug!(community = %scope.community_id, edges = connection.edges.len(), "Served opportunities");
        Ok(OpportunityConnection::from(connection))
    }

    /// List reservations, narrowed to `userId` when given.
    async fn reservations<'ctx>(
        &self,
        ctx: &Context<'ctx>,
        community_id: String,
        user_id: Option<String>,
        filter: Option<ReservationFilterInput>,
        #[graphql(default = 20)] first: Option<i32>,
        cursor: Option<String>,
    ) -> Result<ReservationConnection> {
        let scope = parse_scope(community_id, user_id)?;
        let filter = filter.unwrap_or_default().into_core()?;
        let pagination = parse_pagination(first, cursor)?;
        let catalog = ctx.data::<Arc<dyn Catalog>>()?;

        let connection = catalog.list_reservations(&scope, &filter, &pagination).await?;
        Ok(ReservationConnection::from(connection))
    }

    /// List point transactions, narrowed to `userId` when given.
    async fn transactions<'ctx>(
        &self,
        ctx: &Context<'ctx>,
        community_id: String,
        user_id: Option<String>,
        filter: Option<TransactionFilterInput>,
        #[graphql(default = 20)] first: Option<i32>,
        cursor: Option<String>,
    ) -> Result<TransactionConnection> {
        let scope = parse_scope(community_id, user_id)?;
        let filter = filter.unwrap_or_default().into_core()?;
        let pagination = parse_pagination(first, cursor)?;
        let catalog = ctx.data::<Arc<dyn Catalog>>()?;

        let connection = catalog.list_transactions(&scope, &filter, &pagination).await?;
        Ok(TransactionConnection::from(connection))
    }

    /// List community memberships.
    async fn memberships<'ctx>(
        &self,
        ctx: &Context<'ctx>,
        community_id: String,
        user_id: Option<String>,
        filter: Option<MembershipFilterInput>,
        #[graphql(default = 20)] first: Option<i32>,
        cursor: Option<String>,
    ) -> Result<MembershipConnection> {
        let scope = parse_scope(community_id, user_id)?;
        let filter = filter.unwrap_or_default().into_core();
        let pagination = parse_pagination(first, cursor)?;
        let catalog = ctx.data::<Arc<dyn Catalog>>()?;

        let connection = catalog.list_memberships(&scope, &filter, &pagination).await?;
        Ok(MembershipConnection::from(connection))
    }

    /// List tickets, narrowed to `userId` when given.
    async fn tickets<'ctx>(
        &self,
        ctx: &Context<'ctx>,
        community_id: String,
        user_id: Option<String>,
        filter: Option<TicketFilterInput>,
        #[graphql(default = 20)] first: Option<i32>,
        cursor: Option<String>,
    ) -> Result<TicketConnection> {
        let scope = parse_scope(community_id, user_id)?;
        let filter = filter.unwrap_or_default().into_core();
        let pagination = parse_pagination(first, cursor)?;
        let catalog = ctx.data::<Arc<dyn Catalog>>()?;

        let connection = catalog.list_tickets(&scope, &filter, &pagination).await?;
        Ok(TicketConnection::from(connection))
    }

    /// List wallets, narrowed to `userId` when given.
    async fn wallets<'ctx>(
        &self,
        ctx: &Context<'ctx>,
        community_id: String,
        user_id: Option<String>,
        filter: Option<WalletFilterInput>,
        #[graphql(default = 20)] first: Option<i32>,
        cursor: Option<String>,
    ) -> Result<WalletConnection> {
        let scope = parse_scope(community_id, user_id)?;
        let filter = filter.unwrap_or_default().into_core();
        let pagination = parse_pagination(first, cursor)?;
        let catalog = ctx.data::<Arc<dyn Catalog>>()?;

        let connection = catalog.list_wallets(&scope, &filter, &pagination).await?;
        Ok(WalletConnection::from(connection))
    }
}

// -----------------------------------------------------------------------------
// Enums
// -----------------------------------------------------------------------------

/// Mirror a domain enum as a GraphQL enum. The domain's `Unknown`
/// variant has no GraphQL counterpart and is served as `null`.
macro_rules! mirror_enum {
    ($name:ident, $core:ty, [$($variant:ident),* $(,)?]) => {
        #[derive(async_graphql::Enum, Clone, Copy, Debug, PartialEq, Eq)]
        pub enum $name {
            $($variant),*
        }

        impl $name {
            fn from_core(value: Option<$core>) -> Option<Self> {
                match value? {
                    $(<$core>::$variant => Some(Self::$variant),)*
                    _ => None,
                }
            }

            fn into_core(self) -> $core {
                match self {
                    $(Self::$variant => <$core>::$variant,)*
                }
            }
        }
    };
}

mirror_enum!(OpportunityCategory, domain::OpportunityCategory, [Activity, Quest, Event]);
mirror_enum!(PublishStatus, domain::PublishStatus, [Public, CommunityInternal, Private]);
mirror_enum!(ReservationStatus, domain::ReservationStatus, [Applied, Accepted, Rejected, Canceled]);
mirror_enum!(
    TransactionReason,
    domain::TransactionReason,
    [PointIssued, PointReward, Donation, Grant, TicketPurchased, TicketRefunded, Onboarding]
);
mirror_enum!(MembershipRole, domain::MembershipRole, [Owner, Manager, Member]);
mirror_enum!(MembershipStatus, domain::MembershipStatus, [Pending, Joined, Left]);
mirror_enum!(TicketStatus, domain::TicketStatus, [Available, Disabled, Used]);
mirror_enum!(WalletKind, domain::WalletKind, [Community, Member]);

// -----------------------------------------------------------------------------
// Filter Inputs
// -----------------------------------------------------------------------------

#[derive(async_graphql::InputObject, Default)]
pub struct OpportunityFilterInput {
    pub category: Option<OpportunityCategory>,
    pub publish_status: Option<PublishStatus>,
    pub keyword: Option<String>,
}

impl OpportunityFilterInput {
    fn into_core(self) -> Result<ports::OpportunityFilter> {
        validate_filter_string(&self.keyword, "keyword")?;
        Ok(ports::OpportunityFilter {
            category: self.category.map(OpportunityCategory::into_core),
            publish_status: self.publish_status.map(PublishStatus::into_core),
            keyword: self.keyword,
        })
    }
}

#[derive(async_graphql::InputObject, Default)]
pub struct ReservationFilterInput {
    pub status: Option<ReservationStatus>,
    pub opportunity_id: Option<String>,
}

impl ReservationFilterInput {
    fn into_core(self) -> Result<ports::ReservationFilter> {
        validate_filter_string(&self.opportunity_id, "opportunityId")?;
        Ok(ports::ReservationFilter {
            status: self.status.map(ReservationStatus::into_core),
            opportunity_id: self.opportunity_id,
        })
    }
}

#[derive(async_graphql::InputObject, Default)]
pub struct TransactionFilterInput {
    pub reason: Option<TransactionReason>,
    pub wallet_id: Option<String>,
}

impl TransactionFilterInput {
    fn into_core(self) -> Result<ports::TransactionFilter> {
        validate_filter_string(&self.wallet_id, "walletId")?;
        Ok(ports::TransactionFilter {
            reason: self.reason.map(TransactionReason::into_core),
            wallet_id: self.wallet_id,
        })
    }
}

#[derive(async_graphql::InputObject, Default)]
pub struct MembershipFilterInput {
    pub role: Option<MembershipRole>,
    pub status: Option<MembershipStatus>,
}

impl MembershipFilterInput {
    fn into_core(self) -> ports::MembershipFilter {
        ports::MembershipFilter {
            role: self.role.map(MembershipRole::into_core),
            status: self.status.map(MembershipStatus::into_core),
        }
    }
}

#[derive(async_graphql::InputObject, Default)]
pub struct TicketFilterInput {
    pub status: Option<TicketStatus>,
}

impl TicketFilterInput {
    fn into_core(self) -> ports::TicketFilter {
        ports::TicketFilter {
            status: self.status.map(TicketStatus::into_core),
        }
    }
}

#[derive(async_graphql::InputObject, Default)]
pub struct WalletFilterInput {
    pub kind: Option<WalletKind>,
}

impl WalletFilterInput {
    fn into_core(self) -> ports::WalletFilter {
        ports::WalletFilter {
            kind: self.kind.map(WalletKind::into_core),
        }
    }
}

// -----------------------------------------------------------------------------
// Node Types
// -----------------------------------------------------------------------------

/// Opportunity type.
#[derive(async_graphql::SimpleObject)]
pub struct Opportunity {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<OpportunityCategory>,
    pub publish_status: Option<PublishStatus>,
    pub points_to_earn: Option<i64>,
    pub fee_required: Option<i64>,
    pub capacity: Option<i32>,
    pub place_name: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<domain::Opportunity> for Opportunity {
    fn from(o: domain::Opportunity) -> Self {
        Self {
            id: o.id,
            title: o.title,
            description: o.description,
            category: OpportunityCategory::from_core(o.category),
            publish_status: PublishStatus::from_core(o.publish_status),
            points_to_earn: o.points_to_earn,
            fee_required: o.fee_required,
            capacity: o.capacity,
            place_name: o.place_name,
            starts_at: o.starts_at,
            created_at: o.created_at,
        }
    }
}

/// Reservation type.
#[derive(async_graphql::SimpleObject)]
pub struct Reservation {
    pub id: String,
    pub status: Option<ReservationStatus>,
    pub opportunity_title: Option<String>,
    pub participant_count: Option<i32>,
    pub user_name: Option<String>,
    pub slot_starts_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<domain::Reservation> for Reservation {
    fn from(r: domain::Reservation) -> Self {
        Self {
            id: r.id,
            status: ReservationStatus::from_core(r.status),
            opportunity_title: r.opportunity_title,
            participant_count: r.participant_count,
            user_name: r.user_name,
            slot_starts_at: r.slot_starts_at,
            created_at: r.created_at,
        }
    }
}

/// Transaction type.
#[derive(async_graphql::SimpleObject)]
pub struct Transaction {
    pub id: String,
    pub reason: Option<TransactionReason>,
    pub from_wallet_name: Option<String>,
    pub to_wallet_name: Option<String>,
    pub from_point_change: Option<i64>,
    pub to_point_change: Option<i64>,
    pub comment: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<domain::Transaction> for Transaction {
    fn from(t: domain::Transaction) -> Self {
        Self {
            id: t.id,
            reason: TransactionReason::from_core(t.reason),
            from_wallet_name: t.from_wallet_name,
            to_wallet_name: t.to_wallet_name,
            from_point_change: t.from_point_change,
            to_point_change: t.to_point_change,
            comment: t.comment,
            created_at: t.created_at,
        }
    }
}

/// Membership type.
#[derive(async_graphql::SimpleObject)]
pub struct Membership {
    pub id: String,
    pub user_name: Option<String>,
    pub role: Option<MembershipRole>,
    pub status: Option<MembershipStatus>,
    pub headline: Option<String>,
    pub joined_at: Option<DateTime<Utc>>,
}

impl From<domain::Membership> for Membership {
    fn from(m: domain::Membership) -> Self {
        Self {
            id: m.id,
            user_name: m.user_name,
            role: MembershipRole::from_core(m.role),
            status: MembershipStatus::from_core(m.status),
            headline: m.headline,
            joined_at: m.joined_at,
        }
    }
}

/// Ticket type.
#[derive(async_graphql::SimpleObject)]
pub struct Ticket {
    pub id: String,
    pub status: Option<TicketStatus>,
    pub reason: Option<TransactionReason>,
    pub utility_name: Option<String>,
    pub points_required: Option<i64>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<domain::Ticket> for Ticket {
    fn from(t: domain::Ticket) -> Self {
        Self {
            id: t.id,
            status: TicketStatus::from_core(t.status),
            reason: TransactionReason::from_core(t.reason),
            utility_name: t.utility_name,
            points_required: t.points_required,
            created_at: t.created_at,
        }
    }
}

/// Wallet type.
#[derive(async_graphql::SimpleObject)]
pub struct Wallet {
    pub id: String,
    pub owner_name: Option<String>,
    pub kind: Option<WalletKind>,
    pub current_point: Option<i64>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<domain::Wallet> for Wallet {
    fn from(w: domain::Wallet) -> Self {
        Self {
            id: w.id,
            owner_name: w.owner_name,
            kind: WalletKind::from_core(w.kind),
            current_point: w.current_point,
            updated_at: w.updated_at,
        }
    }
}

// -----------------------------------------------------------------------------
// Connection Types (Relay-style pagination)
// -----------------------------------------------------------------------------

#[derive(async_graphql::SimpleObject)]
pub struct PageInfo {
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

/// Generate Relay-style connection types (Edge + Connection) with From impl.
///
/// `node` is nullable: an edge whose record can no longer be resolved is
/// still served with its cursor.
macro_rules! define_connection {
    ($node:ty, $core_model:ty, $edge:ident, $connection:ident) => {
        #[derive(async_graphql::SimpleObject)]
        pub struct $edge {
            pub node: Option<$node>,
            pub cursor: String,
        }

        #[derive(async_graphql::SimpleObject)]
        pub struct $connection {
            pub edges: Vec<$edge>,
            pub page_info: PageInfo,
            pub total_count: Option<i64>,
        }

        impl From<ports::Connection<$core_model>> for $connection {
            fn from(conn: ports::Connection<$core_model>) -> Self {
                Self {
                    edges: conn
                        .edges
                        .into_iter()
                        .map(|e| $edge {
                            node: e.node.map(<$node>::from),
                            cursor: e.cursor.value,
                        })
                        .collect(),
                    page_info: PageInfo {
                        has_next_page: conn.page_info.has_next_page,
                        has_previous_page: conn.page_info.has_previous_page,
                        start_cursor: conn.page_info.start_cursor.map(|c| c.value),
                        end_cursor: conn.page_info.end_cursor.map(|c| c.value),
                    },
                    total_count: conn.total_count,
                }
            }
        }
    };
}

define_connection!(Opportunity, domain::Opportunity, OpportunityEdge, OpportunityConnection);
define_connection!(Reservation, domain::Reservation, ReservationEdge, ReservationConnection);
define_connection!(Transaction, domain::Transaction, TransactionEdge, TransactionConnection);
define_connection!(Membership, domain::Membership, MembershipEdge, MembershipConnection);
define_connection!(Ticket, domain::Ticket, TicketEdge, TicketConnection);
define_connection!(Wallet, domain::Wallet, WalletEdge, WalletConnection);

// -----------------------------------------------------------------------------
// Helpers & Validation
// -----------------------------------------------------------------------------

/// Maximum length for cursor strings.
const MAX_CURSOR_LENGTH: usize = 64;
/// Maximum length for string filter parameters.
const MAX_FILTER_STRING_LENGTH: usize = 128;

/// Build the tenant scope from query arguments. The community is mandatory.
fn parse_scope(community_id: String, user_id: Option<String>) -> Result<TenantScope> {
    validate_filter_string(&Some(community_id.clone()), "communityId")?;
    validate_filter_string(&user_id, "userId")?;

    let scope = TenantScope::community(community_id);
    Ok(match user_id {
        Some(user) => scope.with_user(user),
        None => scope,
    })
}

/// Parse and validate a cursor string.
fn parse_cursor(s: String) -> Result<Cursor> {
    if s.len() > MAX_CURSOR_LENGTH {
        return Err(async_graphql::Error::new(format!(
            "Cursor too long: maximum {} characters allowed",
            MAX_CURSOR_LENGTH
        )));
    }

    if s.is_empty() || !s.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(async_graphql::Error::new(
            "Invalid cursor: must contain only hexadecimal characters",
        ));
    }

    Ok(Cursor::new(s))
}

fn parse_pagination(first: Option<i32>, cursor: Option<String>) -> Result<Pagination> {
    Ok(Pagination {
        first: Some(ports::clamp_page_size(first)),
        after: cursor.map(parse_cursor).transpose()?,
    })
}

/// Validate a filter string parameter.
fn validate_filter_string(s: &Option<String>, field_name: &str) -> Result<()> {
    if let Some(value) = s {
        if value.len() > MAX_FILTER_STRING_LENGTH {
            return Err(async_graphql::Error::new(format!(
                "{} too long: maximum {} characters allowed",
                field_name, MAX_FILTER_STRING_LENGTH
            )));
        }
        if value.is_empty() {
            return Err(async_graphql::Error::new(format!(
                "{} cannot be empty",
                field_name
            )));
        }
    }
    Ok(())
}
