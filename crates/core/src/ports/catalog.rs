//! Port traits for the serving side of the connection contract.
//!
//! The catalog answers tenant-scoped list queries. Implementations live in
//! the infrastructure layer (e.g. `portal-storage`).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::StorageResult;
use crate::models::{
    Membership, MembershipRole, MembershipStatus, Opportunity, OpportunityCategory, PublishStatus,
    Reservation, ReservationStatus, TenantScope, Ticket, TicketStatus, Transaction,
    TransactionReason, Wallet, WalletKind,
};

use super::pagination::{Connection, Pagination};

// =============================================================================
// Filter Types
// =============================================================================
//
// Tenant scoping is never a filter field: it is the mandatory `TenantScope`
// argument of every list call.

/// Filter options for opportunity queries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<OpportunityCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_status: Option<PublishStatus>,
    /// Case-insensitive match on title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
}

/// Filter options for reservation queries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ReservationStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opportunity_id: Option<String>,
}

/// Filter options for transaction queries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<TransactionReason>,
    /// Either side of the transaction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_id: Option<String>,
}

/// Filter options for membership queries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<MembershipRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<MembershipStatus>,
}

/// Filter options for ticket queries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TicketStatus>,
}

/// Filter options for wallet queries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<WalletKind>,
}

// =============================================================================
// Catalog Trait
// =============================================================================

/// Tenant-scoped list queries for every portal resource.
///
/// Results are ordered newest first. When the scope names a user, the
/// user-owned resources (reservations, transactions, tickets, wallets) are
/// narrowed to that user.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn list_opportunities(
        &self,
        scope: &TenantScope,
        filter: &OpportunityFilter,
        pagination: &Pagination,
    ) -> StorageResult<Connection<Opportunity>>;

    async fn list_reservations(
        &self,
        scope: &TenantScope,
        filter: &ReservationFilter,
        pagination: &Pagination,
    ) -> StorageResult<Connection<Reservation>>;

    async fn list_transactions(
        &self,
        scope: &TenantScope,
        filter: &TransactionFilter,
        pagination: &Pagination,
    ) -> StorageResult<Connection<Transaction>>;

    async fn list_memberships(
        &self,
        scope: &TenantScope,
        filter: &MembershipFilter,
        pagination: &Pagination,
    ) -> StorageResult<Connection<Membership>>;

    async fn list_tickets(
        &self,
        scope: &TenantScope,
        filter: &TicketFilter,
        pagination: &Pagination,
    ) -> StorageResult<Connection<Ticket>>;

    async fn list_wallets(
        &self,
        scope: &TenantScope,
        filter: &WalletFilter,
        pagination: &Pagination,
    ) -> StorageResult<Connection<Wallet>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Les filtres vides ne doivent pas envoyer de champs null au backend
    #[test]
    fn test_empty_filter_serializes_to_empty_object() {
        let json = serde_json::to_value(OpportunityFilter::default()).unwrap();
        assert_eq!(json, serde_json::json!({}));
    }

    #[test]
    fn test_filter_uses_wire_names() {
        let filter = OpportunityFilter {
            publish_status: Some(PublishStatus::CommunityInternal),
            ..Default::default()
        };
        let json = serde_json::to_value(filter).unwrap();
        assert_eq!(json, serde_json::json!({"publishStatus": "COMMUNITY_INTERNAL"}));
    }
}
