use serde::{Deserialize, Serialize};

use crate::domain::EvidencePiece;
use crate::store::EvidenceStore;

/// One matching piece: the rendered key of the entry holding it, the piece
/// itself, and the computed relevance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchHit {
    pub key: String,
    pub piece: EvidencePiece,
    pub relevance: i64,
}

/// Counts non-overlapping occurrences of `needle` in `haystack`. Both
/// sides must already be lowercased.
fn count_occurrences(haystack: &str, needle: &str) -> i64 {
    if needle.is_empty() {
        return 0;
    }
    let mut count = 0;
    let mut rest = haystack;
    while let Some(pos) = rest.find(needle) {
        count += 1;
        rest = &rest[pos + needle.len()..];
    }
    count
}

fn distinct_words(query_lower: &str) -> Vec<&str> {
    let mut words: Vec<&str> = query_lower.split_whitespace().collect();
    words.sort_unstable();
    words.dedup();
    words
}

fn score_lowered(text_lower: &str, query_lower: &str, words: &[&str]) -> i64 {
    let exact = count_occurrences(text_lower, query_lower);
    let mut word_hits = 0;
    for word in words {
        if text_lower.contains(*word) {
            word_hits += 1;
        }
    }
    2 * exact + word_hits
}

/// Relevance of a text for a query:
/// `2 * full_query_matches + distinct_word_hits`, where full matches are
/// non-overlapping case-insensitive occurrences of the whole query and
/// word hits count the distinct whitespace-separated query words present.
/// Query text is always literal, never a pattern.
pub fn relevance_score(text: &str, query: &str) -> i64 {
    let query_lower = query.trim().to_lowercase();
    let words = distinct_words(&query_lower);
    score_lowered(&text.to_lowercase(), &query_lower, &words)
}

/// Scans every stored entry's pieces and returns those with positive
/// relevance, descending. Ties keep scan order (entries in rendered-key
/// order, pieces in stored order) via the stable sort. Empty or
/// whitespace-only queries return no hits.
pub fn search_evidence(store: &EvidenceStore, query: &str) -> Vec<SearchHit> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    let query_lower = trimmed.to_lowercase();
    let words = distinct_words(&query_lower);

    let mut hits = Vec::new();
    for entry in store.snapshot() {
        let rendered = entry.key.render();
        for piece in &entry.value.evidence_pieces {
            let text = match piece.text_content.as_deref() {
                Some(t) => t,
                None => continue,
            };
            let relevance = score_lowered(&text.to_lowercase(), &query_lower, &words);
            if relevance == 0 {
                continue;
            }
            hits.push(SearchHit {
                key: rendered.clone(),
                piece: piece.clone(),
                relevance,
            });
        }
    }

    hits.sort_by(|a, b| b.relevance.cmp(&a.relevance));
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        AttributeEvidence, EvidencePiece, NamedAttributeEvidence, SubjectEvidenceBundle,
        ThemeDataset,
    };

    fn piece(text: &str) -> EvidencePiece {
        EvidencePiece {
            text_content: Some(text.to_string()),
            source_url: Some("https://example.com/source".to_string()),
            relevance_score: Some(0.5),
            authority_score: Some(0.5),
            ..Default::default()
        }
    }

    fn store_with(entries: Vec<(&str, &str, Vec<EvidencePiece>)>) -> EvidenceStore {
        let bundles = entries
            .into_iter()
            .map(|(subject, attribute, pieces)| SubjectEvidenceBundle {
                subject: subject.to_string(),
                attributes: vec![NamedAttributeEvidence {
                    name: attribute.to_string(),
                    evidence: AttributeEvidence {
                        attribute_name: Some(attribute.to_string()),
                        evidence_pieces: pieces,
                        ..Default::default()
                    },
                }],
                ..Default::default()
            })
            .collect();
        let store = EvidenceStore::new();
        store.initialize(&ThemeDataset {
            bundles,
            warnings: Vec::new(),
        });
        store
    }

    #[test]
    fn relevance_formula_pins() {
        assert_eq!(relevance_score("alpine village charm", "alpine charm"), 2);
        assert_eq!(relevance_score("alpine alpine retreat", "alpine charm"), 1);
        assert_eq!(relevance_score("Eiffel Tower built 1889", "eiffel"), 3);
        // Non-overlapping full matches: "aaaa" holds "aa" twice, not three times.
        assert_eq!(relevance_score("aaaa", "aa"), 5);
        assert_eq!(relevance_score("unrelated", "alpine"), 0);
    }

    #[test]
    fn duplicated_query_words_count_once() {
        assert_eq!(relevance_score("alpine retreat", "alpine alpine"), 1);
        assert_eq!(relevance_score("alpine alpine retreat", "alpine alpine"), 3);
    }

    #[test]
    fn multi_word_query_ranks_word_matches_numerically() {
        let store = store_with(vec![(
            "resort",
            "mood",
            vec![piece("alpine village charm"), piece("alpine alpine retreat")],
        )]);

        let hits = search_evidence(&store, "alpine charm");
        assert_eq!(hits.len(), 2);
        assert_eq!(
            hits[0].piece.text_content.as_deref(),
            Some("alpine village charm")
        );
        assert_eq!(hits[0].relevance, 2);
        assert_eq!(
            hits[1].piece.text_content.as_deref(),
            Some("alpine alpine retreat")
        );
        assert_eq!(hits[1].relevance, 1);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let store = store_with(vec![(
            "paris",
            "landmarks",
            vec![piece("Eiffel Tower built 1889")],
        )]);
        let hits = search_evidence(&store, "EIFFEL");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].relevance, 3);
    }

    #[test]
    fn empty_and_whitespace_queries_return_nothing() {
        let store = store_with(vec![("paris", "mood", vec![piece("anything")])]);
        assert!(search_evidence(&store, "").is_empty());
        assert!(search_evidence(&store, "   ").is_empty());
        assert!(search_evidence(&EvidenceStore::new(), "anything").is_empty());
    }

    #[test]
    fn ties_keep_rendered_key_order() {
        let store = store_with(vec![
            ("bravo", "mood", vec![piece("same text")]),
            ("alpha", "mood", vec![piece("same text")]),
        ]);

        let hits = search_evidence(&store, "same");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].relevance, hits[1].relevance);
        assert!(hits[0].key.starts_with("alpha_"));
        assert!(hits[1].key.starts_with("bravo_"));
    }

    #[test]
    fn pieces_without_text_are_skipped() {
        let mut no_text = piece("placeholder");
        no_text.text_content = None;
        let store = store_with(vec![("paris", "mood", vec![no_text])]);
        assert!(search_evidence(&store, "placeholder").is_empty());
    }

    #[test]
    fn query_metacharacters_stay_literal() {
        let store = store_with(vec![("paris", "mood", vec![piece("cost (a.b) rises")])]);
        let hits = search_evidence(&store, "(a.b)");
        assert_eq!(hits.len(), 1);
        assert!(search_evidence(&store, "(axb)").is_empty());
    }
}
