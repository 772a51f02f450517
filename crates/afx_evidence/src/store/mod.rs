use std::collections::BTreeMap;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::domain::{AttributeEvidence, ThemeDataset, ValidationWarning, MAIN_EVIDENCE_ATTRIBUTE};
use crate::keys::{generate_key, normalize_component, EvidenceKey};
use crate::validate::validate_attribute_evidence;

/// One stored record: the structured key it lives under plus its payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreEntry {
    pub key: EvidenceKey,
    pub value: AttributeEvidence,
}

/// Value-level report of one `initialize` call.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct InitializeSummary {
    pub subjects_seen: usize,
    pub entries_inserted: usize,
    pub pieces_total: usize,
    /// In-batch overwrites on rendered-key equality (last write wins).
    pub replaced_entries: usize,
    pub warnings: Vec<ValidationWarning>,
}

/// Keyed evidence store.
///
/// Explicitly constructed and owned by the caller, shared by reference.
/// The interior lock serves concurrent readers for lookups and search;
/// `initialize` and `clear` take the writer side.
#[derive(Debug, Default)]
pub struct EvidenceStore {
    entries: RwLock<BTreeMap<String, StoreEntry>>,
}

impl EvidenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the store contents with the dataset's bundles.
    ///
    /// Main evidence is stored under `(subject, "theme_evidence")`, each
    /// attribute under `(subject, name)` where `name` is the dataset map
    /// key. A dataset with no bundles leaves existing entries untouched
    /// and reports `INGEST_EMPTY_DATASET`. Never fails.
    pub fn initialize(&self, dataset: &ThemeDataset) -> InitializeSummary {
        let mut summary = InitializeSummary {
            subjects_seen: dataset.bundles.len(),
            warnings: dataset.warnings.clone(),
            ..Default::default()
        };

        if dataset.bundles.is_empty() {
            summary.warnings.push(ValidationWarning::new(
                "INGEST_EMPTY_DATASET",
                "No subject bundles in dataset; store left unchanged",
            ));
            return summary;
        }

        let mut next: BTreeMap<String, StoreEntry> = BTreeMap::new();
        for bundle in &dataset.bundles {
            if let Some(main) = &bundle.main {
                let key = generate_key(&bundle.subject, MAIN_EVIDENCE_ATTRIBUTE);
                insert_entry(&mut next, key, main.clone(), &mut summary);
            }
            for attr in &bundle.attributes {
                let key = generate_key(&bundle.subject, &attr.name);
                insert_entry(&mut next, key, attr.evidence.clone(), &mut summary);
            }
        }

        summary.entries_inserted = next.len();
        summary.pieces_total = next
            .values()
            .map(|e| e.value.evidence_pieces.len())
            .sum();

        let mut entries = self.entries.write().unwrap();
        *entries = next;
        summary
    }

    /// Main evidence for a subject, keyed under the reserved attribute.
    pub fn lookup_main(&self, subject: &str) -> Option<AttributeEvidence> {
        self.lookup_attribute(subject, MAIN_EVIDENCE_ATTRIBUTE)
    }

    pub fn lookup_attribute(&self, subject: &str, attribute: &str) -> Option<AttributeEvidence> {
        let rendered = generate_key(subject, attribute).render();
        self.entries
            .read()
            .unwrap()
            .get(&rendered)
            .map(|e| e.value.clone())
    }

    /// Direct probe by a previously rendered flat key.
    pub fn lookup_by_key(&self, key: &str) -> Option<AttributeEvidence> {
        self.entries
            .read()
            .unwrap()
            .get(key)
            .map(|e| e.value.clone())
    }

    /// Everything stored for a subject, grouped by normalized attribute
    /// name, with main evidence under the result key `"main"`.
    ///
    /// Attribute recovery is a structural match on the stored key parts,
    /// never a parse-back from the flat string, so names containing
    /// underscores group correctly.
    pub fn get_all_for_subject(&self, subject: &str) -> BTreeMap<String, AttributeEvidence> {
        let subject_norm = normalize_component(subject);
        let main_key = generate_key(subject, MAIN_EVIDENCE_ATTRIBUTE).render();
        let entries = self.entries.read().unwrap();

        let mut result = BTreeMap::new();
        if let Some(main) = entries.get(&main_key) {
            result.insert("main".to_string(), main.value.clone());
        }
        for entry in entries.values() {
            if entry.key.subject_norm != subject_norm
                || entry.key.attribute_raw == MAIN_EVIDENCE_ATTRIBUTE
            {
                continue;
            }
            result.insert(entry.key.attribute_norm.clone(), entry.value.clone());
        }
        result
    }

    /// Removes everything; returns how many entries were dropped.
    pub fn clear(&self) -> usize {
        let mut entries = self.entries.write().unwrap();
        let dropped = entries.len();
        entries.clear();
        dropped
    }

    pub fn entry_count(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().unwrap().is_empty()
    }

    /// Ordered copy of the current contents, rendered key ascending.
    pub fn snapshot(&self) -> Vec<StoreEntry> {
        self.entries.read().unwrap().values().cloned().collect()
    }
}

fn insert_entry(
    next: &mut BTreeMap<String, StoreEntry>,
    key: EvidenceKey,
    value: AttributeEvidence,
    summary: &mut InitializeSummary,
) {
    let rendered = key.render();
    summary
        .warnings
        .extend(validate_attribute_evidence(&format!("key={rendered}"), &value));
    if next.insert(rendered, StoreEntry { key, value }).is_some() {
        summary.replaced_entries += 1;
    }
}
