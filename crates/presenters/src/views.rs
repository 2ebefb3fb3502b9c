//! View records, one per portal entity.
//!
//! Every field is display-ready: free text falls back to an empty string,
//! counts to zero, enums and dates to the locale's "not set" label.

use serde::Serialize;

use portal_core::models::{Membership, Opportunity, Reservation, Ticket, Transaction, Wallet};

use crate::format;
use crate::labels;
use crate::{Presenter, PresenterConfig};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: &'static str,
    pub publish_status: &'static str,
    pub points_to_earn: String,
    pub fee: String,
    pub capacity: i32,
    pub place_name: String,
    pub starts_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationView {
    pub id: String,
    pub status: &'static str,
    pub opportunity_title: String,
    pub participant_count: i32,
    pub user_name: String,
    pub slot_starts_at: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionView {
    pub id: String,
    pub reason: &'static str,
    pub from_name: String,
    pub to_name: String,
    /// Change seen by the receiving wallet.
    pub point_change: String,
    pub comment: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipView {
    pub id: String,
    pub user_name: String,
    pub role: &'static str,
    pub status: &'static str,
    pub headline: String,
    pub joined_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketView {
    pub id: String,
    pub status: &'static str,
    pub reason: &'static str,
    pub utility_name: String,
    pub points_required: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletView {
    pub id: String,
    pub owner_name: String,
    pub kind: &'static str,
    pub balance: String,
    pub updated_at: String,
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

impl Presenter<Opportunity> for PresenterConfig {
    type View = OpportunityView;

    fn present(&self, node: &Opportunity) -> OpportunityView {
        OpportunityView {
            id: node.id.clone(),
            title: text(&node.title),
            description: text(&node.description),
            category: labels::category_label(node.category, self.locale),
            publish_status: labels::publish_status_label(node.publish_status, self.locale),
            points_to_earn: format::points(node.points_to_earn),
            fee: format::yen(node.fee_required, self.locale),
            capacity: node.capacity.unwrap_or(0),
            place_name: text(&node.place_name),
            starts_at: format::date_time(node.starts_at, self.offset(), self.locale),
        }
    }
}

impl Presenter<Reservation> for PresenterConfig {
    type View = ReservationView;

    fn present(&self, node: &Reservation) -> ReservationView {
        ReservationView {
            id: node.id.clone(),
            status: labels::reservation_status_label(node.status, self.locale),
            opportunity_title: text(&node.opportunity_title),
            participant_count: node.participant_count.unwrap_or(0),
            user_name: text(&node.user_name),
            slot_starts_at: format::date_time(node.slot_starts_at, self.offset(), self.locale),
            created_at: format::date(node.created_at, self.offset(), self.locale),
        }
    }
}

impl Presenter<Transaction> for PresenterConfig {
    type View = TransactionView;

    fn present(&self, node: &Transaction) -> TransactionView {
        TransactionView {
            id: node.id.clone(),
            reason: labels::transaction_reason_label(node.reason, self.locale),
            from_name: text(&node.from_wallet_name),
            to_name: text(&node.to_wallet_name),
            point_change: format::point_change(node.to_point_change),
            comment: text(&node.comment),
            created_at: format::date_time(node.created_at, self.offset(), self.locale),
        }
    }
}

impl Presenter<Membership> for PresenterConfig {
    type View = MembershipView;

    fn present(&self, node: &Membership) -> MembershipView {
        MembershipView {
            id: node.id.clone(),
            user_name: text(&node.user_name),
            role: labels::membership_role_label(node.role, self.locale),
            status: labels::membership_status_label(node.status, self.locale),
            headline: text(&node.headline),
            joined_at: format::date(node.joined_at, self.offset(), self.locale),
        }
    }
}

impl Presenter<Ticket> for PresenterConfig {
    type View = TicketView;

    fn present(&self, node: &Ticket) -> TicketView {
        TicketView {
            id: node.id.clone(),
            status: labels::ticket_status_label(node.status, self.locale),
            reason: labels::transaction_reason_label(node.reason, self.locale),
            utility_name: text(&node.utility_name),
            points_required: format::points(node.points_required),
            created_at: format::date(node.created_at, self.offset(), self.locale),
        }
    }
}

impl Presenter<Wallet> for PresenterConfig {
    type View = WalletView;

    fn present(&self, node: &Wallet) -> WalletView {
        WalletView {
            id: node.id.clone(),
            owner_name: text(&node.owner_name),
            kind: labels::wallet_kind_label(node.kind, self.locale),
            balance: format::points(node.current_point),
            updated_at: format::date_time(node.updated_at, self.offset(), self.locale),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Locale;
    use chrono::DateTime;
    use portal_core::models::{OpportunityCategory, TransactionReason};

    fn bare_opportunity() -> Opportunity {
        Opportunity {
            id: "op-1".into(),
            title: None,
            description: None,
            category: None,
            publish_status: None,
            points_to_earn: None,
            fee_required: None,
            capacity: None,
            place_name: None,
            starts_at: None,
            created_at: None,
        }
    }

    // Test critique: un node sans aucun champ optionnel donne les valeurs de repli
    #[test]
    fn test_all_fields_missing_yields_fallbacks() {
        let view = PresenterConfig::default().present(&bare_opportunity());
        assert_eq!(
            view,
            OpportunityView {
                id: "op-1".into(),
                title: String::new(),
                description: String::new(),
                category: "Not set",
                publish_status: "Not set",
                points_to_earn: "0 pt".into(),
                fee: "Free".into(),
                capacity: 0,
                place_name: String::new(),
                starts_at: "Not set".into(),
            }
        );

        let ja = PresenterConfig {
            locale: Locale::Ja,
            ..Default::default()
        };
        let wallet = ja.present(&Wallet {
            id: "w".into(),
            owner_name: None,
            kind: None,
            current_point: None,
            updated_at: None,
        });
        assert_eq!(wallet.kind, "未設定");
        assert_eq!(wallet.balance, "0 pt");
        assert_eq!(wallet.updated_at, "未設定");
    }

    #[test]
    fn test_bare_nodes_of_every_kind_present() {
        let cfg = PresenterConfig::default();
        let r = cfg.present(&Reservation {
            id: "r".into(),
            status: None,
            opportunity_title: None,
            participant_count: None,
            user_name: None,
            slot_starts_at: None,
            created_at: None,
        });
        assert_eq!(r.participant_count, 0);
        let t = cfg.present(&Transaction {
            id: "t".into(),
            reason: None,
            from_wallet_name: None,
            to_wallet_name: None,
            from_point_change: None,
            to_point_change: None,
            comment: None,
            created_at: None,
        });
        assert_eq!(t.point_change, "0 pt");
        let m = cfg.present(&Membership {
            id: "m".into(),
            user_name: None,
            role: None,
            status: None,
            headline: None,
            joined_at: None,
        });
        assert_eq!(m.role, "Not set");
        let k = cfg.present(&Ticket {
            id: "k".into(),
            status: None,
            reason: None,
            utility_name: None,
            points_required: None,
            created_at: None,
        });
        assert_eq!(k.points_required, "0 pt");
    }

    #[test]
    fn test_populated_opportunity() {
        let node = Opportunity {
            title: Some("Tea ceremony".into()),
            category: Some(OpportunityCategory::Quest),
            points_to_earn: Some(1200),
            fee_required: Some(1500),
            capacity: Some(12),
            starts_at: DateTime::from_timestamp(1_743_465_600, 0),
            ..bare_opportunity()
        };
        let view = PresenterConfig::default().present(&node);
        assert_eq!(view.category, "Quest");
        assert_eq!(view.points_to_earn, "1,200 pt");
        assert_eq!(view.fee, "¥1,500");
        assert_eq!(view.starts_at, "Apr 1, 2025 09:00");
    }

    #[test]
    fn test_transaction_shows_receiver_change() {
        let view = PresenterConfig::default().present(&Transaction {
            id: "t".into(),
            reason: Some(TransactionReason::Donation),
            from_wallet_name: Some("neo88".into()),
            to_wallet_name: Some("Aoi".into()),
            from_point_change: Some(-40),
            to_point_change: Some(40),
            comment: None,
            created_at: None,
        });
        assert_eq!(view.reason, "Donation");
        assert_eq!(view.point_change, "+40 pt");
    }
}
