//! Edge merging with id-keyed de-duplication.

use std::collections::HashMap;

use crate::ports::{DedupKey, Edge, Node};

/// Outcome of merging a page into an edge list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Edges whose key was new, appended in received order.
    pub appended: usize,
    /// Edges whose key already existed and were collapsed onto it.
    pub replaced: usize,
}

/// Merge `incoming` into `existing`.
///
/// An incoming edge whose key is already present replaces the existing
/// entry in place (fresh node, original position). New keys are appended
/// in the order received. The list is never re-sorted.
pub fn merge_edges<T: Node>(existing: &mut Vec<Edge<T>>, incoming: Vec<Edge<T>>) -> MergeStats {
    let mut index: HashMap<DedupKey, usize> = existing
        .iter()
        .enumerate()
        .map(|(pos, edge)| (edge.dedup_key(), pos))
        .collect();

    let mut stats = MergeStats::default();
    for edge in incoming {
        let key = edge.dedup_key();
        match index.get(&key) {
            Some(&pos) => {
                existing[pos] = edge;
                stats.replaced += 1;
            }
            None => {
                index.insert(key, existing.len());
                existing.push(edge);
                stats.appended += 1;
            }
        }
    }
    stats
}

/// De-duplicate a single page.
pub fn dedup_edges<T: Node>(edges: Vec<Edge<T>>) -> (Vec<Edge<T>>, MergeStats) {
    let mut out = Vec::with_capacity(edges.len());
    let stats = merge_edges(&mut out, edges);
    (out, stats)
}
