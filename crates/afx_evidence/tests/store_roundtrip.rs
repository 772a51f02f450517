use afx_evidence::ingest::{load_theme_dataset_text, parse_theme_dataset_text};
use afx_evidence::keys::generate_key;
use afx_evidence::store::EvidenceStore;
use pretty_assertions::assert_eq;

const ALPINE_DATASET: &str = r#"{
    "theme_evidence": {
        "Alpine Charm": {
            "main_theme": {
                "evidence_pieces": [
                    {
                        "text_content": "Wooden chalets line the valley road",
                        "source_url": "https://guides.example.com/alpine",
                        "relevance_score": 0.9,
                        "authority_score": 0.8,
                        "quality_rating": "excellent"
                    }
                ]
            },
            "collection_timestamp": "2026-03-01T08:00:00Z",
            "destination": "Alpine Village",
            "cultural_importance": {
                "evidence_pieces": [
                    {
                        "text_content": "Folk festivals run from June to September",
                        "source_url": "https://boards.example.com/events",
                        "relevance_score": 0.7,
                        "authority_score": 0.9,
                        "quality_rating": "good"
                    }
                ]
            }
        }
    }
}"#;

const ROME_DATASET: &str = r#"{
    "rome": {
        "main_theme": {
            "evidence_pieces": [
                {
                    "text_content": "Trevi fountain draws morning crowds",
                    "source_url": "https://guides.example.com/rome",
                    "relevance_score": 0.8,
                    "authority_score": 0.7
                }
            ]
        }
    }
}"#;

#[test]
fn ingested_records_come_back_by_every_lookup_path() {
    let dataset = parse_theme_dataset_text(ALPINE_DATASET).unwrap();
    let store = EvidenceStore::new();
    let summary = store.initialize(&dataset);

    assert_eq!(summary.subjects_seen, 1);
    assert_eq!(summary.entries_inserted, 2);
    assert!(summary.warnings.is_empty());

    assert_eq!(store.lookup_main("Alpine Charm"), dataset.bundles[0].main);
    assert_eq!(
        store.lookup_attribute("Alpine Charm", "cultural_importance"),
        Some(dataset.bundles[0].attributes[0].evidence.clone())
    );

    let rendered = generate_key("Alpine Charm", "cultural_importance").render();
    assert_eq!(
        store.lookup_by_key(&rendered),
        store.lookup_attribute("Alpine Charm", "cultural_importance")
    );
}

#[test]
fn second_initialize_fully_replaces_the_first() {
    let store = EvidenceStore::new();
    load_theme_dataset_text(&store, ALPINE_DATASET).unwrap();
    assert!(store.lookup_main("Alpine Charm").is_some());

    load_theme_dataset_text(&store, ROME_DATASET).unwrap();
    assert_eq!(store.entry_count(), 1);
    assert_eq!(store.lookup_main("Alpine Charm"), None);
    assert_eq!(store.lookup_attribute("Alpine Charm", "cultural_importance"), None);
    assert!(store.lookup_main("rome").is_some());
}

#[test]
fn clear_twice_equals_clear_once() {
    let store = EvidenceStore::new();
    load_theme_dataset_text(&store, ALPINE_DATASET).unwrap();

    assert_eq!(store.clear(), 2);
    assert_eq!(store.entry_count(), 0);
    assert_eq!(store.clear(), 0);
    assert_eq!(store.entry_count(), 0);
    assert_eq!(store.lookup_main("Alpine Charm"), None);
}

#[test]
fn get_all_for_subject_slots_main_and_normalized_attributes() {
    let store = EvidenceStore::new();
    load_theme_dataset_text(&store, ALPINE_DATASET).unwrap();

    let all = store.get_all_for_subject("Alpine Charm");
    let keys: Vec<&str> = all.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["cultural_importance", "main"]);
    assert_eq!(all.get("main").cloned(), store.lookup_main("Alpine Charm"));

    assert!(store.get_all_for_subject("nowhere").is_empty());
}

#[test]
fn lookups_against_an_empty_store_return_none() {
    let store = EvidenceStore::new();
    assert_eq!(store.lookup_main("anything"), None);
    assert_eq!(store.lookup_attribute("anything", "at all"), None);
    assert_eq!(store.lookup_by_key("anything_at_all_0"), None);
    assert!(store.get_all_for_subject("anything").is_empty());
    assert_eq!(store.entry_count(), 0);
}
