use crate::error::AppError;
use crate::ingest::load_theme_dataset_text;
use crate::store::{EvidenceStore, InitializeSummary};

/// Built-in sample dataset: two subjects with main evidence, named
/// attributes, and full collection metadata. Used by tests and quick
/// starts; goes through the regular ingest path.
pub fn demo_dataset_json() -> &'static str {
    include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../../fixtures/demo/theme_dataset.json"
    ))
}

/// Loads the demo dataset into the store.
pub fn seed_demo_store(store: &EvidenceStore) -> Result<InitializeSummary, AppError> {
    load_theme_dataset_text(store, demo_dataset_json())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_dataset_loads_without_warnings() {
        let store = EvidenceStore::new();
        let summary = seed_demo_store(&store).unwrap();
        assert_eq!(summary.subjects_seen, 2);
        assert_eq!(summary.entries_inserted, 4);
        assert_eq!(summary.pieces_total, 5);
        assert!(summary.warnings.is_empty());

        let main = store.lookup_main("Alpine Charm").unwrap();
        assert_eq!(main.evidence_pieces.len(), 1);
        assert!(store.lookup_attribute("Harbor Lights", "evening_atmosphere").is_some());
    }
}
