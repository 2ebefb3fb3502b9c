//! Deterministic seed data for the fixture backend.
//!
//! Every run produces the same rows in the same order, so cursors and
//! page boundaries are reproducible across restarts.

use chrono::DateTime;
use tracing::info;

use portal_core::models::{
    Membership, MembershipRole, MembershipStatus, Opportunity, OpportunityCategory, PublishStatus,
    Reservation, ReservationStatus, Ticket, TicketStatus, Transaction, TransactionReason, Wallet,
    WalletKind,
};

use crate::memory::{MemoryCatalog, RowTags};

/// 2025-04-01T00:00:00Z
const BASE_TIMESTAMP: i64 = 1_743_465_600;

const PLACES: &[&str] = &["Kibotcha", "Shikoku Hall", "Riverside Park", "Old School Gym"];
const USERS: &[&str] = &["Aoi", "Haruto", "Mei", "Sora", "Yui"];

/// Seed data configuration.
#[derive(Debug, Clone)]
pub struct FixtureConfig {
    /// Communities to seed, in insertion order.
    pub communities: Vec<String>,
    /// Rows per resource per community.
    pub rows_per_resource: usize,
    /// Users per community; user-owned rows rotate across them.
    pub users_per_community: usize,
    /// Every n-th row is stored without a resolvable node.
    pub unresolved_every: Option<usize>,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            communities: vec!["neo88".to_string(), "kibotcha".to_string()],
            rows_per_resource: 45,
            users_per_community: 3,
            unresolved_every: Some(17),
        }
    }
}

impl FixtureConfig {
    /// Small, fully resolvable data set for tests.
    pub fn small() -> Self {
        Self {
            communities: vec!["neo88".to_string()],
            rows_per_resource: 5,
            users_per_community: 1,
            unresolved_every: None,
        }
    }
}

/// Id of the `n`-th user of a community.
pub fn user_id(community: &str, n: usize) -> String {
    format!("{community}-user-{n}")
}

fn at(hours: usize) -> Option<DateTime<chrono::Utc>> {
    DateTime::from_timestamp(BASE_TIMESTAMP + hours as i64 * 3600, 0)
}

fn pick<T: Copy>(values: &[T], i: usize) -> T {
    values[i % values.len()]
}

/// Build a catalog seeded according to `config`.
pub fn seed(config: &FixtureConfig) -> MemoryCatalog {
    let catalog = MemoryCatalog::new();
    let users = config.users_per_community.max(1);

    for community in &config.communities {
        let resolvable = |i: usize| config.unresolved_every.is_none_or(|n| n == 0 || (i + 1) % n != 0);
        let owner = |i: usize| user_id(community, i % users);

        for i in 0..config.rows_per_resource {
            let id = format!("{community}-op-{i}");
            let node = resolvable(i).then(|| Opportunity {
                id: id.clone(),
                title: Some(format!("{} #{}", pick(&["Beach cleanup", "Farm day", "Quest: map the town", "Tea ceremony"], i), i + 1)),
                description: (i % 3 != 0).then(|| "Join neighbours for a morning together.".to_string()),
                category: Some(pick(
                    &[OpportunityCategory::Activity, OpportunityCategory::Quest, OpportunityCategory::Event],
                    i,
                )),
                publish_status: Some(pick(
                    &[PublishStatus::Public, PublishStatus::Public, PublishStatus::CommunityInternal],
                    i,
                )),
                points_to_earn: (i % 2 == 0).then_some(100 * (i as i64 % 5 + 1)),
                fee_required: (i % 4 == 1).then_some(1500),
                capacity: (i % 5 != 4).then_some(10 + i as i32 % 20),
                place_name: (i % 6 != 5).then(|| pick(PLACES, i).to_string()),
                starts_at: at(24 * (i + 7)),
                created_at: at(i),
            });
            catalog.insert_opportunity(RowTags::community(community.as_str()), node);
        }

        for i in 0..config.rows_per_resource {
            let opportunity_id = format!("{community}-op-{}", i % config.rows_per_resource.max(1));
            let node = resolvable(i).then(|| Reservation {
                id: format!("{community}-rsv-{i}"),
                status: Some(pick(
                    &[ReservationStatus::Applied, ReservationStatus::Accepted, ReservationStatus::Rejected, ReservationStatus::Canceled],
                    i,
                )),
                opportunity_title: Some(format!("Opportunity #{}", i + 1)),
                participant_count: Some(1 + i as i32 % 4),
                user_name: Some(pick(USERS, i).to_string()),
                slot_starts_at: at(24 * (i + 7) + 9),
                created_at: at(i + 1),
            });
            catalog.insert_reservation(
                RowTags::community(community.as_str())
                    .owned_by(owner(i))
                    .referencing(opportunity_id),
                node,
            );
        }

        for i in 0..users {
            catalog.insert_wallet(
                RowTags::community(community.as_str())
                    .owned_by(owner(i))
                    .referencing(format!("{community}-wallet-{i}")),
                Some(Wallet {
                    id: format!("{community}-wallet-{i}"),
                    owner_name: Some(pick(USERS, i).to_string()),
                    kind: Some(WalletKind::Member),
                    current_point: Some(1_000 + 250 * i as i64),
                    updated_at: at(i),
                }),
            );
        }
        catalog.insert_wallet(
            RowTags::community(community.as_str()).referencing(format!("{community}-wallet-community")),
            Some(Wallet {
                id: format!("{community}-wallet-community"),
                owner_name: Some(community.clone()),
                kind: Some(WalletKind::Community),
                current_point: Some(1_000_000),
                updated_at: at(0),
            }),
        );

        for i in 0..config.rows_per_resource {
            let reason = pick(
                &[
                    TransactionReason::PointReward,
                    TransactionReason::Donation,
                    TransactionReason::Grant,
                    TransactionReason::TicketPurchased,
                    TransactionReason::Onboarding,
                ],
                i,
            );
            let amount = 10 * (i as i64 % 9 + 1);
            let node = resolvable(i).then(|| Transaction {
                id: format!("{community}-tx-{i}"),
                reason: Some(reason),
                from_wallet_name: Some(community.clone()),
                to_wallet_name: Some(pick(USERS, i).to_string()),
                from_point_change: Some(-amount),
                to_point_change: Some(amount),
                comment: (i % 4 == 0).then(|| "Thanks for helping out!".to_string()),
                created_at: at(i + 2),
            });
            catalog.insert_transaction(
                RowTags::community(community.as_str())
                    .owned_by(owner(i))
                    .referencing(format!("{community}-wallet-community"))
                    .referencing(format!("{community}-wallet-{}", i % users)),
                node,
            );
        }

        for i in 0..config.rows_per_resource {
            let node = resolvable(i).then(|| Membership {
                id: format!("{community}-member-{i}"),
                user_name: Some(format!("{} {}", pick(USERS, i), i + 1)),
                role: Some(match i {
                    0 => MembershipRole::Owner,
                    1 | 2 => MembershipRole::Manager,
                    _ => MembershipRole::Member,
                }),
                status: Some(pick(
                    &[MembershipStatus::Joined, MembershipStatus::Joined, MembershipStatus::Pending, MembershipStatus::Left],
                    i,
                )),
                headline: (i % 3 == 0).then(|| "Loves the outdoors".to_string()),
                joined_at: at(i * 5),
            });
            catalog.insert_membership(RowTags::community(community.as_str()), node);
        }

        for i in 0..config.rows_per_resource {
            let node = resolvable(i).then(|| Ticket {
                id: format!("{community}-ticket-{i}"),
                status: Some(pick(&[TicketStatus::Available, TicketStatus::Used, TicketStatus::Disabled], i)),
                reason: Some(pick(&[TransactionReason::TicketPurchased, TransactionReason::Grant], i)),
                utility_name: Some(pick(&["Tea set", "Bike rental", "Onsen pass"], i).to_string()),
                points_required: Some(300 + 50 * (i as i64 % 4)),
                created_at: at(i + 3),
            });
            catalog.insert_ticket(RowTags::community(community.as_str()).owned_by(owner(i)), node);
        }
    }

    let stats = catalog.stats();
    info!(
        communities = stats.communities,
        opportunities = stats.opportunities,
        reservations = stats.reservations,
        transactions = stats.transactions,
        memberships = stats.memberships,
        tickets = stats.tickets,
        wallets = stats.wallets,
        "🌱 Fixture catalog seeded"
    );
    catalog
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_core::models::TenantScope;
    use portal_core::ports::{Catalog, OpportunityFilter, Pagination, ReservationFilter};

    #[test]
    fn test_seed_counts() {
        let catalog = seed(&FixtureConfig::default());
        let stats = catalog.stats();
        assert_eq!(stats.communities, 2);
        assert_eq!(stats.opportunities, 90);
        assert_eq!(stats.wallets, 2 * (3 + 1));
    }

    // Les données sont déterministes: deux seeds donnent les mêmes pages
    #[tokio::test]
    async fn test_seed_is_deterministic() {
        let a = seed(&FixtureConfig::default());
        let b = seed(&FixtureConfig::default());
        let scope = TenantScope::community("neo88");
        let pagination = Pagination::default();

        let pa = a.list_opportunities(&scope, &OpportunityFilter::default(), &pagination).await.unwrap();
        let pb = b.list_opportunities(&scope, &OpportunityFilter::default(), &pagination).await.unwrap();
        assert_eq!(pa, pb);
        assert_eq!(pa.edges.len(), 20);
        assert!(pa.page_info.has_next_page);
    }

    #[tokio::test]
    async fn test_unresolved_rows_present_by_default() {
        let catalog = seed(&FixtureConfig::default());
        let scope = TenantScope::community("kibotcha");
        let conn = catalog
            .list_opportunities(&scope, &OpportunityFilter::default(), &Pagination { first: Some(100), after: None })
            .await
            .unwrap();
        // 45 lignes, une sur 17 sans node: indices 16 et 33
        assert_eq!(conn.edges.iter().filter(|e| e.node.is_none()).count(), 2);
    }

    #[tokio::test]
    async fn test_user_owned_rows_rotate_across_users() {
        let catalog = seed(&FixtureConfig::default());
        let scope = TenantScope::community("neo88").with_user(user_id("neo88", 0));
        let conn = catalog
            .list_reservations(&scope, &ReservationFilter::default(), &Pagination { first: Some(100), after: None })
            .await
            .unwrap();
        assert_eq!(conn.total_count, Some(15));
    }
}
