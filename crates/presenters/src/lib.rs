//! Presenters for portal list views.
//!
//! A presenter maps a raw connection node to a display-ready view record.
//! Presenting is pure and total: every missing field maps to a documented
//! fallback, so any node the backend can send renders without failing.
//!
//! - [`labels`] - Localized enum labels
//! - [`format`] - Points, yen and timezone-aware dates
//! - [`views`] - View records and per-entity presenters

pub mod format;
pub mod labels;
pub mod views;

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use tracing::trace;

use portal_core::ports::{Edge, Node};

pub use labels::Locale;
pub use views::{
    MembershipView, OpportunityView, ReservationView, TicketView, TransactionView, WalletView,
};

/// Default display offset: Japan Standard Time.
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = 9 * 60;

/// Maps a node to its view record.
pub trait Presenter<N> {
    type View;

    fn present(&self, node: &N) -> Self::View;
}

/// Presentation settings shared by every presenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenterConfig {
    pub locale: Locale,
    /// Offset applied to timestamps before formatting.
    pub utc_offset_minutes: i32,
}

impl Default for PresenterConfig {
    fn default() -> Self {
        Self {
            locale: Locale::En,
            utc_offset_minutes: DEFAULT_UTC_OFFSET_MINUTES,
        }
    }
}

impl PresenterConfig {
    pub fn offset(&self) -> FixedOffset {
        format::offset_from_minutes(self.utc_offset_minutes)
    }
}

/// Present every edge that carries a node, in list order.
///
/// Edges whose node could not be resolved are skipped here; they stay in
/// the list state so de-duplication still accounts for them.
pub fn present_edges<N, P>(presenter: &P, edges: &[Edge<N>]) -> Vec<P::View>
where
    N: Node,
    P: Presenter<N>,
{
    edges
        .iter()
        .filter_map(|edge| match &edge.node {
            Some(node) => Some(presenter.present(node)),
            None => {
                trace!(cursor = %edge.cursor, "Skipping edge without node");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_core::models::Wallet;
    use portal_core::ports::Cursor;

    fn wallet(id: &str, points: i64) -> Wallet {
        Wallet {
            id: id.into(),
            owner_name: Some("Aoi".into()),
            kind: None,
            current_point: Some(points),
            updated_at: None,
        }
    }

    #[test]
    fn test_present_edges_skips_missing_nodes_in_order() {
        let edges = vec![
            Edge { node: Some(wallet("a", 10)), cursor: Cursor::new("01") },
            Edge { node: None, cursor: Cursor::new("02") },
            Edge { node: Some(wallet("b", 2000)), cursor: Cursor::new("03") },
        ];
        let views = present_edges(&PresenterConfig::default(), &edges);
        let ids: Vec<_> = views.iter().map(|v: &WalletView| v.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(views[1].balance, "2,000 pt");
    }
}
