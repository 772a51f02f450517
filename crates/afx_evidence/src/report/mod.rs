use std::collections::BTreeMap;

use crate::analytics::build_store_stats;
use crate::domain::MAIN_EVIDENCE_ATTRIBUTE;
use crate::store::EvidenceStore;

struct SubjectCoverage {
    display: String,
    main_pieces: Option<usize>,
    attributes: BTreeMap<String, usize>,
}

/// Renders a deterministic markdown summary of the store: totals, per
/// subject coverage with piece counts, and the quality distribution.
/// Same store contents always produce byte-identical output.
pub fn generate_coverage_markdown(store: &EvidenceStore) -> String {
    let stats = build_store_stats(store);

    let mut subjects: BTreeMap<String, SubjectCoverage> = BTreeMap::new();
    for entry in store.snapshot() {
        let coverage = subjects
            .entry(entry.key.subject_norm.clone())
            .or_insert_with(|| SubjectCoverage {
                display: entry.key.subject_raw.clone(),
                main_pieces: None,
                attributes: BTreeMap::new(),
            });
        let pieces = entry.value.evidence_pieces.len();
        if entry.key.attribute_raw == MAIN_EVIDENCE_ATTRIBUTE {
            coverage.main_pieces = Some(pieces);
        } else {
            coverage
                .attributes
                .insert(entry.key.attribute_norm.clone(), pieces);
        }
    }

    let mut out = String::new();
    out.push_str("# Evidence Coverage Report\n");
    out.push('\n');
    out.push_str(&format!("Entries: {}\n", stats.total_entries));
    out.push_str(&format!("Pieces: {}\n", stats.total_pieces));
    out.push_str(&format!("Subjects: {}\n", subjects.len()));

    if subjects.is_empty() {
        out.push('\n');
        out.push_str("No evidence loaded.\n");
        return out;
    }

    out.push('\n');
    out.push_str("## Subject coverage\n");
    for coverage in subjects.values() {
        out.push('\n');
        out.push_str(&format!("### {}\n", coverage.display));
        out.push('\n');
        if let Some(pieces) = coverage.main_pieces {
            out.push_str(&format!("- main: {pieces}\n"));
        }
        for (attribute, pieces) in &coverage.attributes {
            out.push_str(&format!("- {attribute}: {pieces}\n"));
        }
    }

    if !stats.by_quality_rating.is_empty() {
        out.push('\n');
        out.push_str("## Quality ratings\n");
        out.push('\n');
        for (rating, count) in &stats.by_quality_rating {
            out.push_str(&format!("- {rating}: {count}\n"));
        }
    }

    out
}
