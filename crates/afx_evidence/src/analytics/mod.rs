use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::store::EvidenceStore;

/// Bucket name for pieces missing a classification field.
pub const UNKNOWN_BUCKET: &str = "unknown";

/// Composition statistics over the whole store. Distribution maps are
/// keyed by the wire value of the classification, so they iterate
/// deterministically.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreStats {
    pub total_entries: usize,
    pub total_pieces: usize,
    pub by_evidence_type: BTreeMap<String, usize>,
    pub by_quality_rating: BTreeMap<String, usize>,
    pub by_source_type: BTreeMap<String, usize>,
}

fn bump(map: &mut BTreeMap<String, usize>, bucket: Option<&str>) {
    let name = bucket.unwrap_or(UNKNOWN_BUCKET);
    *map.entry(name.to_string()).or_insert(0) += 1;
}

/// Counts entries and pieces and builds the per-field distributions.
/// Entries without pieces still count in `total_entries`.
pub fn build_store_stats(store: &EvidenceStore) -> StoreStats {
    let mut stats = StoreStats::default();
    for entry in store.snapshot() {
        stats.total_entries += 1;
        for piece in &entry.value.evidence_pieces {
            stats.total_pieces += 1;
            bump(
                &mut stats.by_evidence_type,
                piece.evidence_type.as_ref().map(|t| t.as_str()),
            );
            bump(
                &mut stats.by_quality_rating,
                piece.quality_rating.as_ref().map(|q| q.as_str()),
            );
            bump(
                &mut stats.by_source_type,
                piece.source_type.as_ref().map(|s| s.as_str()),
            );
        }
    }
    stats
}
