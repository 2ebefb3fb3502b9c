//! Localized labels for enumerated fields.

use serde::{Deserialize, Serialize};

use portal_core::models::{
    MembershipRole, MembershipStatus, OpportunityCategory, PublishStatus, ReservationStatus,
    TicketStatus, TransactionReason, WalletKind,
};

/// Display language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ja,
}

impl Locale {
    fn pick(self, en: &'static str, ja: &'static str) -> &'static str {
        match self {
            Locale::En => en,
            Locale::Ja => ja,
        }
    }
}

impl std::str::FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "ja" => Ok(Locale::Ja),
            other => Err(format!("unsupported locale: {other}")),
        }
    }
}

/// Label for a missing value.
pub fn not_set(locale: Locale) -> &'static str {
    locale.pick("Not set", "未設定")
}

/// Label for a value this client does not recognize.
pub fn other(locale: Locale) -> &'static str {
    locale.pick("Other", "その他")
}

/// Label for a zero fee.
pub fn free(locale: Locale) -> &'static str {
    locale.pick("Free", "無料")
}

macro_rules! label_map {
    ($fn_name:ident, $ty:ty, { $($variant:ident => ($en:literal, $ja:literal)),* $(,)? }) => {
        pub fn $fn_name(value: Option<$ty>, locale: Locale) -> &'static str {
            match value {
                None => not_set(locale),
                $(Some(<$ty>::$variant) => locale.pick($en, $ja),)*
                Some(_) => other(locale),
            }
        }
    };
}

label_map!(category_label, OpportunityCategory, {
    Activity => ("Activity", "アクティビティ"),
    Quest => ("Quest", "クエスト"),
    Event => ("Event", "イベント"),
});

label_map!(publish_status_label, PublishStatus, {
    Public => ("Public", "公開"),
    CommunityInternal => ("Members only", "メンバー限定"),
    Private => ("Private", "非公開"),
});

label_map!(reservation_status_label, ReservationStatus, {
    Applied => ("Applied", "申込済み"),
    Accepted => ("Accepted", "承認済み"),
    Rejected => ("Rejected", "却下"),
    Canceled => ("Canceled", "キャンセル"),
});

label_map!(transaction_reason_label, TransactionReason, {
    PointIssued => ("Points issued", "ポイント発行"),
    PointReward => ("Reward", "報酬"),
    Donation => ("Donation", "寄付"),
    Grant => ("Grant", "付与"),
    TicketPurchased => ("Ticket purchase", "チケット購入"),
    TicketRefunded => ("Ticket refund", "チケット返金"),
    Onboarding => ("Welcome bonus", "参加ボーナス"),
});

label_map!(membership_role_label, MembershipRole, {
    Owner => ("Owner", "オーナー"),
    Manager => ("Manager", "管理者"),
    Member => ("Member", "メンバー"),
});

label_map!(membership_status_label, MembershipStatus, {
    Pending => ("Pending", "承認待ち"),
    Joined => ("Joined", "参加中"),
    Left => ("Left", "退会済み"),
});

label_map!(ticket_status_label, TicketStatus, {
    Available => ("Available", "利用可能"),
    Disabled => ("Disabled", "無効"),
    Used => ("Used", "使用済み"),
});

label_map!(wallet_kind_label, WalletKind, {
    Community => ("Community", "コミュニティ"),
    Member => ("Member", "メンバー"),
});
