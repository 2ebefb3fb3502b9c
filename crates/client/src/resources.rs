//! Resource descriptors: one per portal list.
//!
//! A descriptor ties a root query field to its node and filter types and
//! carries the query document sent for every page.

use serde::Serialize;
use serde::de::DeserializeOwned;

use portal_core::models::{Membership, Opportunity, Reservation, Ticket, Transaction, Wallet};
use portal_core::ports::{
    MembershipFilter, Node, OpportunityFilter, ReservationFilter, TicketFilter, TransactionFilter,
    WalletFilter,
};

/// A paginated portal resource.
pub trait Resource: Send + Sync + 'static {
    type Node: Node + DeserializeOwned + Clone + Send + Sync + 'static;
    type Filter: Serialize + Clone + Send + Sync + 'static;

    /// Root query field.
    const FIELD: &'static str;
    /// Query document selecting one connection page.
    const DOCUMENT: &'static str;
}

/// Build a connection query document for a root field.
macro_rules! connection_document {
    ($op:literal, $field:literal, $filter:literal, $selection:literal) => {
        concat!(
            "query ", $op, "($communityId: String!, $userId: String, $filter: ", $filter,
            ", $first: Int, $cursor: String) { ",
            $field,
            "(communityId: $communityId, userId: $userId, filter: $filter, first: $first, cursor: $cursor) { ",
            "edges { cursor node { ", $selection, " } } ",
            "pageInfo { hasNextPage hasPreviousPage startCursor endCursor } ",
            "totalCount } }"
        )
    };
}

macro_rules! define_resource {
    ($name:ident, $node:ty, $filter:ty, $op:literal, $field:literal, $filter_input:literal, $selection:literal) => {
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl Resource for $name {
            type Node = $node;
            type Filter = $filter;

            const FIELD: &'static str = $field;
            const DOCUMENT: &'static str =
                connection_document!($op, $field, $filter_input, $selection);
        }
    };
}

define_resource!(
    Opportunities,
    Opportunity,
    OpportunityFilter,
    "Opportunities",
    "opportunities",
    "OpportunityFilterInput",
    "id title description category publishStatus pointsToEarn feeRequired capacity placeName startsAt createdAt"
);

define_resource!(
    Reservations,
    Reservation,
    ReservationFilter,
    "Reservations",
    "reservations",
    "ReservationFilterInput",
    "id status opportunityTitle participantCount userName slotStartsAt createdAt"
);

define_resource!(
    Transactions,
    Transaction,
    TransactionFilter,
    "Transactions",
    "transactions",
    "TransactionFilterInput",
    "id reason fromWalletName toWalletName fromPointChange toPointChange comment createdAt"
);

define_resource!(
    Memberships,
    Membership,
    MembershipFilter,
    "Memberships",
    "memberships",
    "MembershipFilterInput",
    "id userName role status headline joinedAt"
);

define_resource!(
    Tickets,
    Ticket,
    TicketFilter,
    "Tickets",
    "tickets",
    "TicketFilterInput",
    "id status reason utilityName pointsRequired createdAt"
);

define_resource!(
    Wallets,
    Wallet,
    WalletFilter,
    "Wallets",
    "wallets",
    "WalletFilterInput",
    "id ownerName kind currentPoint updatedAt"
);
