use afx_evidence::analytics::build_store_stats;
use afx_evidence::demo::seed_demo_store;
use afx_evidence::ingest::load_theme_dataset_text;
use afx_evidence::store::EvidenceStore;
use pretty_assertions::assert_eq;

#[test]
fn demo_store_distributions_are_exact() {
    let store = EvidenceStore::new();
    seed_demo_store(&store).unwrap();

    let stats = build_store_stats(&store);
    assert_eq!(stats.total_entries, 4);
    assert_eq!(stats.total_pieces, 5);

    let evidence_types: Vec<(&str, usize)> = stats
        .by_evidence_type
        .iter()
        .map(|(k, v)| (k.as_str(), *v))
        .collect();
    assert_eq!(
        evidence_types,
        vec![("behavioral_study", 2), ("cultural_observation", 3)]
    );

    let ratings: Vec<(&str, usize)> = stats
        .by_quality_rating
        .iter()
        .map(|(k, v)| (k.as_str(), *v))
        .collect();
    assert_eq!(ratings, vec![("excellent", 2), ("fair", 1), ("good", 2)]);

    let sources: Vec<(&str, usize)> = stats
        .by_source_type
        .iter()
        .map(|(k, v)| (k.as_str(), *v))
        .collect();
    assert_eq!(
        sources,
        vec![
            ("academic_research", 1),
            ("review_analysis", 1),
            ("tourism_board", 1),
            ("travel_guide", 2),
        ]
    );
}

#[test]
fn attribute_without_pieces_contributes_an_entry_and_zero_pieces() {
    let store = EvidenceStore::new();
    let summary =
        load_theme_dataset_text(&store, r#"{"paris": {"mood": {"search_hits": 3}}}"#).unwrap();
    assert!(summary.warnings.is_empty());

    let stats = build_store_stats(&store);
    assert_eq!(stats.total_entries, 1);
    assert_eq!(stats.total_pieces, 0);
    assert!(stats.by_evidence_type.is_empty());

    let mood = store.lookup_attribute("paris", "mood").unwrap();
    assert_eq!(mood.search_hits, Some(3));
    assert!(mood.evidence_pieces.is_empty());
}

#[test]
fn statistics_on_an_empty_store_are_all_zero() {
    let stats = build_store_stats(&EvidenceStore::new());
    assert_eq!(stats.total_entries, 0);
    assert_eq!(stats.total_pieces, 0);
    assert!(stats.by_evidence_type.is_empty());
    assert!(stats.by_quality_rating.is_empty());
    assert!(stats.by_source_type.is_empty());
}
