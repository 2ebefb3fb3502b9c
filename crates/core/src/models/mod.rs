//! Domain models for the portal's list views.
//!
//! These are raw connection nodes as the backend returns them. Apart from
//! the identifier, every field is optional: a missing value is a normal
//! state that presenters resolve to a documented fallback. Enumerations
//! accept unknown values so a newer backend never breaks decoding.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ports::Node;

// =============================================================================
// Identifier Types
// =============================================================================

/// Macro to generate string identifier newtypes with common functionality.
///
/// Generates:
/// - `new()` / `as_str()`
/// - `Display` trait implementation
/// - `From<&str>` and `From<String>` implementations
macro_rules! string_id_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Wrap an identifier.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Borrow the identifier.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id_newtype!(
    /// Community (tenant) identifier.
    CommunityId
);

string_id_newtype!(
    /// Portal user identifier.
    UserId
);

// =============================================================================
// Tenant Scope
// =============================================================================

/// Tenancy boundary every list query runs under.
///
/// The community is mandatory. The user is optional and narrows
/// "my ..." views (my reservations, my tickets, my wallet history).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantScope {
    pub community_id: CommunityId,
    pub user_id: Option<UserId>,
}

impl TenantScope {
    /// Scope to a whole community.
    pub fn community(community_id: impl Into<CommunityId>) -> Self {
        Self {
            community_id: community_id.into(),
            user_id: None,
        }
    }

    /// Narrow the scope to a single user within the community.
    pub fn with_user(mut self, user_id: impl Into<UserId>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }
}

// =============================================================================
// Opportunities
// =============================================================================

/// Kind of opportunity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OpportunityCategory {
    Activity,
    Quest,
    Event,
    #[serde(other)]
    Unknown,
}

/// Publication state of an opportunity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PublishStatus {
    Public,
    CommunityInternal,
    Private,
    #[serde(other)]
    Unknown,
}

/// An activity or quest users can discover and reserve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Opportunity {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<OpportunityCategory>,
    pub publish_status: Option<PublishStatus>,
    /// Points granted on completion.
    pub points_to_earn: Option<i64>,
    /// Participation fee in yen.
    pub fee_required: Option<i64>,
    pub capacity: Option<i32>,
    pub place_name: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Reservations
// =============================================================================

/// Lifecycle of a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    Applied,
    Accepted,
    Rejected,
    Canceled,
    #[serde(other)]
    Unknown,
}

/// A reservation of an opportunity slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: String,
    pub status: Option<ReservationStatus>,
    pub opportunity_title: Option<String>,
    pub participant_count: Option<i32>,
    pub user_name: Option<String>,
    pub slot_starts_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Transactions
// =============================================================================

/// Why points moved between wallets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionReason {
    PointIssued,
    PointReward,
    Donation,
    Grant,
    TicketPurchased,
    TicketRefunded,
    Onboarding,
    #[serde(other)]
    Unknown,
}

/// A point movement between two wallets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
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

// =============================================================================
// Memberships
// =============================================================================

/// Role of a member within a community.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MembershipRole {
    Owner,
    Manager,
    Member,
    #[serde(other)]
    Unknown,
}

/// Membership state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MembershipStatus {
    Pending,
    Joined,
    Left,
    #[serde(other)]
    Unknown,
}

/// A user's membership in a community.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub id: String,
    pub user_name: Option<String>,
    pub role: Option<MembershipRole>,
    pub status: Option<MembershipStatus>,
    pub headline: Option<String>,
    pub joined_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Tickets
// =============================================================================

/// Ticket state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    Available,
    Disabled,
    Used,
    #[serde(other)]
    Unknown,
}

/// A ticket bought with points and redeemable for a utility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: String,
    pub status: Option<TicketStatus>,
    pub reason: Option<TransactionReason>,
    pub utility_name: Option<String>,
    pub points_required: Option<i64>,
    pub created_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Wallets
// =============================================================================

/// Wallet owner kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WalletKind {
    Community,
    Member,
    #[serde(other)]
    Unknown,
}

/// A point wallet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    pub id: String,
    pub owner_name: Option<String>,
    pub kind: Option<WalletKind>,
    pub current_point: Option<i64>,
    pub updated_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Node identity
// =============================================================================

macro_rules! impl_node {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Node for $ty {
                fn node_id(&self) -> &str {
                    &self.id
                }
            }
        )*
    };
}

impl_node!(Opportunity, Reservation, Transaction, Membership, Ticket, Wallet);

// =============================================================================
// Tests
// =============================================================================
